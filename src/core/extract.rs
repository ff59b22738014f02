use serde_json::Value;
use smallvec::SmallVec;

use crate::core::types::AttributeDescriptor;
use crate::core::values::{BinnableValue, normalize};
use crate::store::Record;

/// Normalized values one record contributes for one attribute.
pub type RecordValues = SmallVec<[BinnableValue; 4]>;

/// Normalizes every value a record carries for `attribute`.
///
/// Multivalued attributes contribute each element of their array; a scalar on
/// a multivalued attribute still contributes that one value. Absent values
/// contribute nothing.
#[must_use]
pub fn record_values(record: &Record, descriptor: &AttributeDescriptor, attribute: &str) -> RecordValues {
    let mut values = RecordValues::new();
    let Some(raw) = record.properties.get(attribute) else {
        return values;
    };

    if descriptor.multivalued {
        if let Value::Array(elements) = raw {
            for element in elements {
                if let Some(value) = normalize(descriptor, element) {
                    values.push(value);
                }
            }
            return values;
        }
    }
    if let Some(value) = normalize(descriptor, raw) {
        values.push(value);
    }
    values
}

/// Extracts the normalized value array for `attribute` across `records`.
///
/// Order follows record order and values are not deduplicated. The full
/// result set and the selected subset go through this same path so the two
/// rendered series share identical bin boundaries.
#[must_use]
pub fn extract_values<'a, I>(
    records: I,
    descriptor: &AttributeDescriptor,
    attribute: &str,
) -> Vec<BinnableValue>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut values = Vec::new();
    for record in records {
        values.extend(record_values(record, descriptor, attribute));
    }
    values
}
