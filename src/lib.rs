//! tschart: headless planning engine for interactive time-series charts.
//!
//! The crate computes everything a chart host needs except pixels: time and
//! value axis ticks, stacked series bands, cursor snapping and the view model
//! of a single tooltip overlay shared by every chart on the page.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{ChartEngine, ChartInput, ChartVisualConfig};
pub use error::{ChartError, ChartResult};
