use crate::core::categories::Category;
use crate::core::extract::record_values;
use crate::core::types::AttributeDescriptor;
use crate::core::values::BinnableValue;
use crate::store::Record;

/// Filters `records` down to those with at least one value inside `category`.
///
/// Multivalued records short-circuit on their first matching element. Records
/// with no value for the attribute never match.
#[must_use]
pub fn find_matches<'a>(
    records: &'a [Record],
    descriptor: &AttributeDescriptor,
    attribute: &str,
    category: &Category,
) -> Vec<&'a Record> {
    records
        .iter()
        .filter(|record| record_matches(record, descriptor, attribute, category))
        .collect()
}

/// True when any of the record's normalized values falls inside `category`.
#[must_use]
pub fn record_matches(
    record: &Record,
    descriptor: &AttributeDescriptor,
    attribute: &str,
    category: &Category,
) -> bool {
    record_values(record, descriptor, attribute)
        .iter()
        .any(|value| value_matches(value, category))
}

fn value_matches(value: &BinnableValue, category: &Category) -> bool {
    match (value, category) {
        // Tagged strings compare exactly; both sides carry the marker.
        (BinnableValue::Tagged(tagged), Category::Bucket(bucket)) => tagged == bucket,
        // Fixed-width zero-padded layout, so lexicographic order is
        // chronological order. Both bounds inclusive.
        (BinnableValue::Timestamp(formatted), Category::DateRange { start, end }) => {
            formatted.as_str() >= start.as_str() && formatted.as_str() <= end.as_str()
        }
        // Both bounds inclusive; NaN compares false on both sides.
        (BinnableValue::Number(number), Category::NumericRange { start, end }) => {
            *number >= *start && *number <= *end
        }
        _ => false,
    }
}
