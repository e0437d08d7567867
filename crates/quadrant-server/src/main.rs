use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use quadrant::Calculator;
use quadrant_server::{app, init_tracing, Args};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_format);

    let calculator = Calculator::with_config(args.calculator_config());
    let address = args.address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!(%address, "listening");

    axum::serve(listener, app(calculator))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
