pub mod chart;
pub mod config;
pub mod ledger;
pub mod telemetry;
pub mod util;

pub use chart::{BubbleChart, ViewMode};
pub use config::{CanvasSize, ChartConfig};
pub use ledger::{LoadFilter, LoadReport, RecordError};
