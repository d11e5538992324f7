//! catbars: horizontal categorical bar charts.
//!
//! Every decoration (title, axis labels, tick labels, legend, labels to the
//! right of the bars) is measured at render time and reserved from a fixed
//! canvas, so the remaining rectangle is exactly the plotting area.

pub mod api;
pub mod core;
pub mod error;
pub mod render;
pub mod telemetry;

pub use api::{BarChart, BarsInput, ChartJob, ChartOptions, StyleConfig};
pub use error::{ChartError, ChartResult};
