use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::core::types::AttributeRegistry;
use crate::store::Record;

/// One binnable attribute offered to the host's attribute picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeChoice {
    /// Raw attribute name used for binning and matching.
    pub value: String,
    /// Display label: the registry alias when present, the raw name otherwise.
    pub label: String,
}

/// Computes the set of attributes eligible for binning over a result set.
///
/// The union of property names is taken in first-seen order across records and
/// deduplicated, then filtered to attributes the registry knows about and does
/// not hide. Records with heterogeneous property sets are fine; a missing
/// attribute is simply absent from the union.
#[must_use]
pub fn discover_attributes<R>(records: &[Record], registry: &R) -> Vec<AttributeChoice>
where
    R: AttributeRegistry + ?Sized,
{
    let mut seen: IndexSet<&str> = IndexSet::new();
    for record in records {
        for name in record.properties.keys() {
            seen.insert(name.as_str());
        }
    }

    seen.into_iter()
        .filter_map(|name| {
            let descriptor = registry.lookup(name)?;
            if registry.is_hidden(name) {
                return None;
            }
            Some(AttributeChoice {
                value: name.to_owned(),
                label: descriptor.alias.clone().unwrap_or_else(|| name.to_owned()),
            })
        })
        .collect()
}
