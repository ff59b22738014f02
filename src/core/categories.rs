use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::chart::{AxisKind, BinConfig, BinWidth, RenderedState};
use crate::core::values::format_timestamp;
use crate::error::{HistogramError, HistogramResult};

const MILLIS_PER_DAY: f64 = 24.0 * 3_600_000.0;

/// Upper bound on bins emitted by one category walk. A materialized config
/// whose span-to-width ratio exceeds this is rejected instead of walked.
const MAX_BINS: usize = 1 << 16;

/// One chart bin, reconstructed from materialized engine state.
///
/// Categories are derived, never stored by the engine: bin boundaries are
/// chosen by the engine's auto-binning and have to be recomputed after each
/// render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Category {
    /// Discrete bucket on a categorical axis; the value carries the
    /// categorical marker.
    Bucket(String),
    /// Date-axis bin, both bounds in the fixed-precision timestamp layout.
    DateRange { start: String, end: String },
    /// Linear-axis bin `[start, end]`.
    NumericRange { start: f64, end: f64 },
}

/// Extends a reported bin end by one bin width.
///
/// Auto-binning engines report `end` as the final bin's start rather than its
/// right edge, so that edge goes missing unless the config is widened before
/// it is pinned onto the re-rendered series. Month-denominated widths use the
/// 31-day worst case so the final calendar month is always covered.
#[must_use]
pub fn extend_final_bin(bins: BinConfig) -> BinConfig {
    let end = match bins.width {
        BinWidth::Fixed(width) => bins.end + width,
        BinWidth::Months(months) => bins.end + f64::from(months) * 31.0 * MILLIS_PER_DAY,
    };
    BinConfig { end, ..bins }
}

/// Derives the ordered category list from a render's materialized state.
///
/// Categorical axes return the engine's own category list verbatim. Date and
/// linear axes walk the materialized bin config from start to end in
/// width-sized steps; month-denominated widths advance by calendar-month
/// arithmetic so variable month lengths stay correct. A state with no bin
/// config yields an empty list rather than an error.
pub fn reconstruct_categories(state: &RenderedState) -> HistogramResult<Vec<Category>> {
    match state.axis {
        AxisKind::Category => Ok(state
            .categories
            .iter()
            .cloned()
            .map(Category::Bucket)
            .collect()),
        AxisKind::Date => match state.bins {
            Some(bins) => date_categories(bins),
            None => Ok(Vec::new()),
        },
        AxisKind::Linear => match state.bins {
            Some(bins) => numeric_categories(bins),
            None => Ok(Vec::new()),
        },
    }
}

fn numeric_categories(bins: BinConfig) -> HistogramResult<Vec<Category>> {
    let width = match bins.width {
        BinWidth::Fixed(width) => width,
        BinWidth::Months(_) => return Err(HistogramError::MonthWidthOnLinearAxis),
    };
    if !width.is_finite() || width <= 0.0 {
        return Err(HistogramError::InvalidBinWidth { width });
    }

    let mut categories = Vec::new();
    let mut start = bins.start;
    while start < bins.end {
        let end = start + width;
        if end <= start {
            // The width vanishes below f64 resolution at this magnitude and
            // the walk would never advance.
            return Err(HistogramError::InvalidBinWidth { width });
        }
        if categories.len() == MAX_BINS {
            return Err(HistogramError::InvalidData(format!(
                "bin walk from {} to {} at width {width} exceeds {MAX_BINS} bins",
                bins.start, bins.end
            )));
        }
        categories.push(Category::NumericRange { start, end });
        start = end;
    }
    Ok(categories)
}

fn date_categories(bins: BinConfig) -> HistogramResult<Vec<Category>> {
    if let BinWidth::Fixed(width) = bins.width {
        // Sub-millisecond widths truncate to a zero step on the epoch-millis
        // walk.
        if !width.is_finite() || width < 1.0 {
            return Err(HistogramError::InvalidBinWidth { width });
        }
    }
    if let BinWidth::Months(months) = bins.width {
        if months == 0 {
            return Err(HistogramError::InvalidBinWidth { width: 0.0 });
        }
    }

    let end = bins.end as i64;
    let mut start = bins.start as i64;
    let mut categories = Vec::new();
    while start < end {
        let Some(next) = advance(start, bins.width) else {
            break;
        };
        let (Some(period_start), Some(period_end)) = (instant(start), instant(next)) else {
            break;
        };
        if categories.len() == MAX_BINS {
            return Err(HistogramError::InvalidData(format!(
                "bin walk from {start} to {end} at width {:?} exceeds {MAX_BINS} bins",
                bins.width
            )));
        }
        categories.push(Category::DateRange {
            start: format_timestamp(period_start),
            end: format_timestamp(period_end),
        });
        start = next;
    }
    Ok(categories)
}

fn advance(millis: i64, width: BinWidth) -> Option<i64> {
    match width {
        BinWidth::Fixed(step) => millis.checked_add(step as i64),
        BinWidth::Months(months) => Some(
            instant(millis)?
                .checked_add_months(Months::new(months))?
                .timestamp_millis(),
        ),
    }
}

fn instant(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(millis)
}
