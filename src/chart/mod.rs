//! Charting-collaborator contract.
//!
//! The binning engine drives a charting engine it does not implement. This
//! module pins down the narrow surface it needs: series submission, in-place
//! series replacement, resize, and a read-only query of the engine's
//! materialized bin state. Auto-chosen bin boundaries are not knowable ahead
//! of render, so [`RenderedState`] is the only sanctioned way to learn them;
//! hosts wrapping a real engine should treat its field expectations as a
//! versioned contract rather than reaching into engine internals ad hoc.

mod null_chart;

pub use null_chart::NullChart;

use serde::{Deserialize, Serialize};

use crate::core::values::BinnableValue;
use crate::error::HistogramResult;

/// Axis interpretation the engine settled on for the binned attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisKind {
    Category,
    Date,
    Linear,
}

/// Bin width as materialized by the engine.
///
/// `Months` is the typed rendition of the engine's `"M<n>"` shorthand: N
/// calendar months, which cannot be expressed as a fixed duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BinWidth {
    Fixed(f64),
    Months(u32),
}

/// Materialized bin configuration for a date or linear axis.
///
/// On date axes `start` and `end` carry epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinConfig {
    pub start: f64,
    pub end: f64,
    pub width: BinWidth,
}

/// Read-only snapshot of the engine state a completed render materialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedState {
    pub axis: AxisKind,
    /// Materialized category list, in axis order. Empty off category axes.
    pub categories: Vec<String>,
    pub bins: Option<BinConfig>,
    pub x_range: Option<(f64, f64)>,
    pub y_range: Option<(f64, f64)>,
}

/// Marker styling for one histogram series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesStyle {
    pub fill: String,
    pub outline: Option<String>,
    pub opacity: f64,
}

impl SeriesStyle {
    /// Faint fill used by the full-population series.
    #[must_use]
    pub fn population() -> Self {
        Self {
            fill: "rgba(120, 120, 120, .05)".to_owned(),
            outline: Some("rgba(120, 120, 120, .2)".to_owned()),
            opacity: 1.0,
        }
    }

    /// Denser fill overlaid for the selected subset.
    #[must_use]
    pub fn selection() -> Self {
        Self {
            fill: "rgba(120, 120, 120, .2)".to_owned(),
            outline: None,
            opacity: 1.0,
        }
    }
}

/// One histogram series submitted to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<BinnableValue>,
    /// `None` lets the engine auto-bin; `Some` pins the bin boundaries.
    pub bins: Option<BinConfig>,
    pub style: SeriesStyle,
}

impl Series {
    #[must_use]
    pub fn population(values: Vec<BinnableValue>) -> Self {
        Self {
            name: "Hits".to_owned(),
            values,
            bins: None,
            style: SeriesStyle::population(),
        }
    }

    #[must_use]
    pub fn selection(values: Vec<BinnableValue>) -> Self {
        Self {
            name: "Selected".to_owned(),
            values,
            bins: None,
            style: SeriesStyle::selection(),
        }
    }

    #[must_use]
    pub fn with_bins(mut self, bins: Option<BinConfig>) -> Self {
        self.bins = bins;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BarMode {
    Overlay,
    Group,
}

/// Layout request accompanying a render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub bar_mode: BarMode,
    /// `None` lets the engine auto-range; `Some` pins the axis.
    pub x_range: Option<(f64, f64)>,
    pub y_range: Option<(f64, f64)>,
}

impl Layout {
    #[must_use]
    pub fn auto() -> Self {
        Self {
            bar_mode: BarMode::Overlay,
            x_range: None,
            y_range: None,
        }
    }

    #[must_use]
    pub fn pinned(x_range: Option<(f64, f64)>, y_range: Option<(f64, f64)>) -> Self {
        Self {
            bar_mode: BarMode::Overlay,
            x_range,
            y_range,
        }
    }
}

/// Contract implemented by any charting backend.
///
/// All methods run on the UI thread; nothing blocks. The click subscription
/// lives with the host, which forwards events through the controller.
pub trait ChartSurface {
    fn render(&mut self, series: &[Series], layout: &Layout) -> HistogramResult<()>;

    /// Replaces one already-rendered series in place, leaving layout and bin
    /// configuration untouched.
    fn replace_series(&mut self, index: usize, series: Series) -> HistogramResult<()>;

    fn resize(&mut self);

    /// Materialized bin state of the last render, absent before any render.
    fn rendered_state(&self) -> Option<&RenderedState>;

    /// Tears down any rendered chart, e.g. to show an empty state.
    fn clear(&mut self);
}
