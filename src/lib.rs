//! histogram-rs: selection-synchronized histogram binning engine.
//!
//! This crate implements the data side of a search-catalog histogram view:
//! it discovers which result attributes are binnable, normalizes their
//! heterogeneous typed values into chart bin data, reconstructs the bin
//! boundaries a charting engine materialized during render, and maps chart
//! clicks back onto the selection state of the records that produced a bin.
//! Rendering itself stays behind the narrow [`chart::ChartSurface`] contract.

pub mod api;
pub mod chart;
pub mod core;
pub mod error;
pub mod interaction;
pub mod store;
pub mod telemetry;

pub use api::{DisplayState, HistogramController, HistogramEvent};
pub use error::{HistogramError, HistogramResult};
