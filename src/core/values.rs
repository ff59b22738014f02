use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::types::{AttributeDescriptor, AttributeType};

/// Zero-width space appended to every categorical value.
///
/// The marker forces the charting engine onto a categorical axis even when the
/// raw strings look numeric, and keeps system-produced bucket values from
/// colliding with user data that happens to equal the bare string.
pub const CATEGORY_MARKER: char = '\u{200B}';

/// Fixed-precision timestamp layout (`YYYY-MM-DD HH:mm:ss.SS`).
///
/// Zero-padded and fixed-width, so lexicographic comparison of two formatted
/// timestamps agrees with chronological order.
const TIMESTAMP_SECONDS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Normalized form of one attribute value, as fed to the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BinnableValue {
    /// Numeric sample; may be NaN, which charting engines drop from bins.
    Number(f64),
    /// Categorical sample carrying the trailing [`CATEGORY_MARKER`].
    Tagged(String),
    /// Date sample in the fixed-precision timestamp layout.
    Timestamp(String),
}

impl BinnableValue {
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Tagged(value) | Self::Timestamp(value) => Some(value),
            Self::Number(_) => None,
        }
    }
}

/// Converts a raw attribute value into its binnable representation.
///
/// Returns `None` for absent (`null`) values and for date values that cannot
/// be parsed; the owning record then simply contributes nothing for this
/// attribute. Non-numeric input on a numeric attribute normalizes to NaN
/// rather than failing, matching how charting engines silently drop it.
#[must_use]
pub fn normalize(descriptor: &AttributeDescriptor, raw: &Value) -> Option<BinnableValue> {
    if raw.is_null() {
        return None;
    }

    if descriptor.attribute_type.is_categorical() {
        return Some(BinnableValue::Tagged(tag_category(&raw_to_string(raw))));
    }
    match descriptor.attribute_type {
        AttributeType::Date => {
            parse_timestamp(raw).map(|parsed| BinnableValue::Timestamp(format_timestamp(parsed)))
        }
        _ => Some(BinnableValue::Number(raw_to_f64(raw))),
    }
}

/// Appends the categorical marker to a raw string value.
#[must_use]
pub fn tag_category(raw: &str) -> String {
    let mut tagged = String::with_capacity(raw.len() + CATEGORY_MARKER.len_utf8());
    tagged.push_str(raw);
    tagged.push(CATEGORY_MARKER);
    tagged
}

/// Formats a timestamp in the fixed-precision layout used across binning,
/// category reconstruction, and click matching.
#[must_use]
pub fn format_timestamp(value: DateTime<Utc>) -> String {
    let centis = value.timestamp_subsec_millis() / 10;
    format!("{}.{centis:02}", value.format(TIMESTAMP_SECONDS_FORMAT))
}

/// Parses a raw date attribute value.
///
/// Accepts RFC 3339 strings (offsets are normalized to UTC), the crate's own
/// fixed-precision layout, bare `YYYY-MM-DD` dates, and epoch-millisecond
/// numbers.
#[must_use]
pub fn parse_timestamp(raw: &Value) -> Option<DateTime<Utc>> {
    match raw {
        Value::String(text) => parse_timestamp_str(text),
        Value::Number(number) => {
            DateTime::<Utc>::from_timestamp_millis(number.as_f64()? as i64)
        }
        _ => None,
    }
}

/// String flavor of [`parse_timestamp`], also used when reading formatted
/// timestamps back out of chart state.
#[must_use]
pub fn parse_timestamp_str(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(parsed.and_utc());
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(parsed.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

fn raw_to_string(raw: &Value) -> String {
    match raw {
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        other => other.to_string(),
    }
}

fn raw_to_f64(raw: &Value) -> f64 {
    match raw {
        Value::Number(number) => number.as_f64().unwrap_or(f64::NAN),
        Value::String(text) => text.trim().parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}
