//! HTTP front end for the quadrant calculator.
//!
//! - `POST /calculate` runs a [`quadrant::CalculationRequest`]
//! - `GET /example/{name}` returns a built-in example
//! - `GET /favicon.ico` is answered with `204 No Content`

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cli;
pub mod routes;

pub use cli::{init_tracing, Args, LogFormat};
pub use routes::app;
