//! Shared data model for the temperature trend-scoring pipeline.
//!
//! - `data`: `DataPoint` / `Signal` and the small enums (`Dimension`,
//!   `Confidence`, `Direction`) that describe them.
//! - `report`: `DimensionScore` / `Report`, the scoring engine's output shape.
//! - `error`: the workspace-wide `TemperatureError` and its `ErrorKind`
//!   classification, shared by every crate that can fail.
#![warn(missing_docs)]

mod data;
mod error;
mod report;

pub use data::{Confidence, DataPoint, Dimension, Direction, Signal};
pub use error::{ErrorKind, TemperatureError};
pub use report::{DimensionScore, Report, temperature_label};
