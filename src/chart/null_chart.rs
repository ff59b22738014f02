use chrono::{Datelike, Months, TimeZone, Utc};
use indexmap::IndexSet;
use ordered_float::NotNan;

use crate::chart::{
    AxisKind, BinConfig, BinWidth, ChartSurface, Layout, RenderedState, Series,
};
use crate::core::values::{BinnableValue, parse_timestamp_str};
use crate::error::{HistogramError, HistogramResult};

const TARGET_BIN_COUNT: f64 = 10.0;

/// Fixed date widths tried before falling back to calendar months, in ms.
const DATE_WIDTH_LADDER_MS: [i64; 12] = [
    1_000,          // second
    15_000,
    60_000,         // minute
    300_000,
    900_000,
    3_600_000,      // hour
    10_800_000,
    21_600_000,
    43_200_000,
    86_400_000,     // day
    604_800_000,    // week
    1_209_600_000,
];

/// Headless chart surface for tests and engine-free hosts.
///
/// Emulates the behavior this crate depends on from a real charting engine:
/// deterministic auto-binning when no bin config is pinned, honoring a pinned
/// config verbatim, and the quirk of reporting the final bin's start rather
/// than its right edge as the config `end`.
#[derive(Debug, Default)]
pub struct NullChart {
    series: Vec<Series>,
    rendered: Option<RenderedState>,
    last_layout: Option<Layout>,
    pub render_count: usize,
    pub replace_count: usize,
    pub resize_count: usize,
}

impl NullChart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn series(&self) -> &[Series] {
        &self.series
    }

    #[must_use]
    pub fn last_layout(&self) -> Option<&Layout> {
        self.last_layout.as_ref()
    }
}

impl ChartSurface for NullChart {
    fn render(&mut self, series: &[Series], layout: &Layout) -> HistogramResult<()> {
        self.render_count += 1;
        self.series = series.to_vec();
        self.last_layout = Some(layout.clone());
        self.rendered = materialize(series, layout);
        Ok(())
    }

    fn replace_series(&mut self, index: usize, series: Series) -> HistogramResult<()> {
        self.replace_count += 1;
        if index >= self.series.len() {
            return Err(HistogramError::SeriesIndexOutOfRange {
                index,
                rendered: self.series.len(),
            });
        }
        self.series[index] = series;
        Ok(())
    }

    fn resize(&mut self) {
        self.resize_count += 1;
    }

    fn rendered_state(&self) -> Option<&RenderedState> {
        self.rendered.as_ref()
    }

    fn clear(&mut self) {
        self.series.clear();
        self.rendered = None;
        self.last_layout = None;
    }
}

fn materialize(series: &[Series], layout: &Layout) -> Option<RenderedState> {
    let axis = detect_axis(series)?;
    let state = match axis {
        AxisKind::Category => {
            let categories = distinct_categories(series);
            let count = categories.len() as f64;
            RenderedState {
                axis,
                categories,
                bins: None,
                x_range: Some((-0.5, count - 0.5)),
                y_range: y_range(series, layout),
            }
        }
        AxisKind::Linear => {
            let bins = pinned_bins(series).or_else(|| auto_numeric_bins(series));
            RenderedState {
                axis,
                categories: Vec::new(),
                bins,
                x_range: layout.x_range.or_else(|| bins.map(bin_span)),
                y_range: y_range(series, layout),
            }
        }
        AxisKind::Date => {
            let bins = pinned_bins(series).or_else(|| auto_date_bins(series));
            RenderedState {
                axis,
                categories: Vec::new(),
                bins,
                x_range: layout.x_range.or_else(|| bins.map(bin_span)),
                y_range: y_range(series, layout),
            }
        }
    };
    Some(state)
}

fn detect_axis(series: &[Series]) -> Option<AxisKind> {
    series
        .iter()
        .flat_map(|series| series.values.iter())
        .next()
        .map(|value| match value {
            BinnableValue::Tagged(_) => AxisKind::Category,
            BinnableValue::Timestamp(_) => AxisKind::Date,
            BinnableValue::Number(_) => AxisKind::Linear,
        })
}

fn pinned_bins(series: &[Series]) -> Option<BinConfig> {
    series.first().and_then(|series| series.bins)
}

fn distinct_categories(series: &[Series]) -> Vec<String> {
    let mut categories: IndexSet<&str> = IndexSet::new();
    for series in series {
        for value in &series.values {
            if let BinnableValue::Tagged(tagged) = value {
                categories.insert(tagged.as_str());
            }
        }
    }
    categories.into_iter().map(str::to_owned).collect()
}

fn auto_numeric_bins(series: &[Series]) -> Option<BinConfig> {
    let mut min: Option<NotNan<f64>> = None;
    let mut max: Option<NotNan<f64>> = None;
    for series in series {
        for value in &series.values {
            let Some(number) = value.as_number().filter(|number| number.is_finite()) else {
                continue;
            };
            let number = NotNan::new(number).ok()?;
            min = Some(min.map_or(number, |current| current.min(number)));
            max = Some(max.map_or(number, |current| current.max(number)));
        }
    }
    let (min, max) = (min?.into_inner(), max?.into_inner());

    let width = nice_width(max - min);
    let start = (min / width).floor() * width;
    // Reported end is the final bin's start, mirroring the real engine.
    let end = (max / width).floor() * width;
    Some(BinConfig {
        start,
        end,
        width: BinWidth::Fixed(width),
    })
}

fn auto_date_bins(series: &[Series]) -> Option<BinConfig> {
    let mut min: Option<i64> = None;
    let mut max: Option<i64> = None;
    for series in series {
        for value in &series.values {
            let Some(text) = value.as_str() else { continue };
            let Some(parsed) = parse_timestamp_str(text) else {
                continue;
            };
            let millis = parsed.timestamp_millis();
            min = Some(min.map_or(millis, |current| current.min(millis)));
            max = Some(max.map_or(millis, |current| current.max(millis)));
        }
    }
    let (min, max) = (min?, max?);
    let range = max - min;

    for step in DATE_WIDTH_LADDER_MS {
        if range / step <= 12 {
            let start = min.div_euclid(step) * step;
            let end = max.div_euclid(step) * step;
            return Some(BinConfig {
                start: start as f64,
                end: end as f64,
                width: BinWidth::Fixed(step as f64),
            });
        }
    }

    // Roughly a month in ms, only used to pick the step count.
    let approx_month = 2_592_000_000_i64;
    let months = [1_u32, 3, 6, 12]
        .into_iter()
        .find(|months| range / (i64::from(*months) * approx_month) <= 12)
        .unwrap_or(12);
    month_bins(min, max, months)
}

fn month_bins(min: i64, max: i64, months: u32) -> Option<BinConfig> {
    let first = chrono::DateTime::<Utc>::from_timestamp_millis(min)?;
    let start = Utc
        .with_ymd_and_hms(first.year(), first.month(), 1, 0, 0, 0)
        .single()?;

    // Last bin start not past max, mirroring the under-reported end.
    let mut end = start;
    loop {
        let next = end.checked_add_months(Months::new(months))?;
        if next.timestamp_millis() > max {
            break;
        }
        end = next;
    }
    Some(BinConfig {
        start: start.timestamp_millis() as f64,
        end: end.timestamp_millis() as f64,
        width: BinWidth::Months(months),
    })
}

fn nice_width(range: f64) -> f64 {
    if !(range > 0.0) {
        return 1.0;
    }
    let raw = range / TARGET_BIN_COUNT;
    let magnitude = 10_f64.powf(raw.log10().floor());
    for multiple in [1.0, 2.0, 5.0] {
        if multiple * magnitude >= raw {
            return multiple * magnitude;
        }
    }
    10.0 * magnitude
}

fn bin_span(bins: BinConfig) -> (f64, f64) {
    let end = match bins.width {
        BinWidth::Fixed(width) => bins.end + width,
        BinWidth::Months(months) => bins.end + f64::from(months) * 31.0 * 86_400_000.0,
    };
    (bins.start, end)
}

fn y_range(series: &[Series], layout: &Layout) -> Option<(f64, f64)> {
    if let Some(range) = layout.y_range {
        return Some(range);
    }
    let count: usize = series.iter().map(|series| series.values.len()).sum();
    Some((0.0, count as f64))
}
