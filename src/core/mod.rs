pub mod categories;
pub mod discovery;
pub mod extract;
pub mod matching;
pub mod types;
pub mod values;

pub use categories::{Category, extend_final_bin, reconstruct_categories};
pub use discovery::{AttributeChoice, discover_attributes};
pub use extract::{extract_values, record_values};
pub use matching::{find_matches, record_matches};
pub use types::{AttributeDescriptor, AttributeRegistry, AttributeType, InMemoryRegistry};
pub use values::{BinnableValue, CATEGORY_MARKER, format_timestamp, normalize, parse_timestamp};
