//! PNG plots for Quadrant.
//!
//! Renders a function around its integration interval with the region
//! under the curve shaded and the bounds marked by dashed lines. The chart
//! carries a title, axis labels, tick marks and a legend.
//!
//! ```
//! use quadrant_core::ExprArena;
//! use quadrant_plot::{render_plot, PlotOptions};
//!
//! let mut arena = ExprArena::new();
//! let x = arena.symbol("x");
//! let f = arena.parse("x**2").unwrap();
//! let (a, b) = (arena.zero(), arena.integer(2));
//!
//! let png = render_plot(&arena, f, x, a, b, true, &PlotOptions::default()).unwrap();
//! assert!(png.starts_with(b"\x89PNG"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod render;
pub mod sample;

pub use error::PlotError;
pub use render::{render_plot, PlotOptions};
pub use sample::Samples;
