//! Command-line and environment configuration.

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use quadrant::plot::PlotOptions;
use quadrant::CalculatorConfig;

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Multi-line human-readable output.
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Server arguments. Each flag can also be set through a `QUADRANT_*`
/// environment variable.
#[derive(Parser, Debug)]
#[command(name = "quadrant-server", version, about = "Integral calculator HTTP server")]
pub struct Args {
    /// Address to bind.
    #[arg(long, env = "QUADRANT_HOST", default_value = "127.0.0.1")]
    pub host: String,
    /// Port to bind.
    #[arg(long, env = "QUADRANT_PORT", default_value_t = 8082)]
    pub port: u16,
    /// Plot width in pixels.
    #[arg(long, env = "QUADRANT_PLOT_WIDTH", default_value_t = 1500)]
    pub plot_width: u32,
    /// Plot height in pixels.
    #[arg(long, env = "QUADRANT_PLOT_HEIGHT", default_value_t = 900)]
    pub plot_height: u32,
    /// Log output format.
    #[arg(long, env = "QUADRANT_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl Args {
    /// `host:port`
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Calculator settings with the requested plot size.
    #[must_use]
    pub fn calculator_config(&self) -> CalculatorConfig {
        CalculatorConfig {
            plot: PlotOptions {
                width: self.plot_width,
                height: self.plot_height,
                ..PlotOptions::default()
            },
            ..CalculatorConfig::default()
        }
    }
}

/// Installs the global subscriber. `RUST_LOG` overrides the default `info`
/// filter.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["quadrant-server"]).unwrap();
        assert_eq!(args.address(), "127.0.0.1:8082");
        assert_eq!(args.log_format, LogFormat::Pretty);
        let config = args.calculator_config();
        assert_eq!((config.plot.width, config.plot.height), (1500, 900));
        assert_eq!(config.variable, "x");
    }

    #[test]
    fn test_flags() {
        let args = Args::try_parse_from([
            "quadrant-server",
            "--host",
            "0.0.0.0",
            "--port",
            "9000",
            "--plot-width",
            "640",
            "--plot-height",
            "480",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(args.address(), "0.0.0.0:9000");
        assert_eq!(args.log_format, LogFormat::Json);
        assert_eq!(args.calculator_config().plot.width, 640);
    }

    #[test]
    fn test_rejects_bad_format() {
        assert!(Args::try_parse_from(["quadrant-server", "--log-format", "xml"]).is_err());
    }
}
