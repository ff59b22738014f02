use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Closed set of semantic attribute types understood by the binning engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeType {
    Date,
    Boolean,
    String,
    Geometry,
    Numeric,
}

impl AttributeType {
    /// True when values of this type bin onto a categorical axis.
    #[must_use]
    pub fn is_categorical(self) -> bool {
        matches!(self, Self::Boolean | Self::String | Self::Geometry)
    }
}

/// Per-attribute metadata supplied by the host's type registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDescriptor {
    pub attribute_type: AttributeType,
    pub multivalued: bool,
    pub hidden: bool,
    pub alias: Option<String>,
}

impl AttributeDescriptor {
    #[must_use]
    pub fn new(attribute_type: AttributeType) -> Self {
        Self {
            attribute_type,
            multivalued: false,
            hidden: false,
            alias: None,
        }
    }

    #[must_use]
    pub fn multivalued(mut self) -> Self {
        self.multivalued = true;
        self
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

/// Read-only attribute metadata lookup supplied by the host application.
///
/// Descriptors are immutable for the session from this crate's perspective.
pub trait AttributeRegistry {
    fn lookup(&self, attribute: &str) -> Option<&AttributeDescriptor>;

    /// True when the attribute must stay out of user-facing binning, whether
    /// registry-hidden or hidden by the host's display policy.
    fn is_hidden(&self, attribute: &str) -> bool;
}

/// `IndexMap`-backed registry for hosts and tests.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRegistry {
    descriptors: IndexMap<String, AttributeDescriptor>,
    policy_hidden: IndexSet<String>,
}

impl InMemoryRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, attribute: impl Into<String>, descriptor: AttributeDescriptor) {
        self.descriptors.insert(attribute.into(), descriptor);
    }

    #[must_use]
    pub fn with(mut self, attribute: impl Into<String>, descriptor: AttributeDescriptor) -> Self {
        self.insert(attribute, descriptor);
        self
    }

    /// Hides an attribute through display policy rather than its descriptor.
    pub fn hide_by_policy(&mut self, attribute: impl Into<String>) {
        self.policy_hidden.insert(attribute.into());
    }
}

impl AttributeRegistry for InMemoryRegistry {
    fn lookup(&self, attribute: &str) -> Option<&AttributeDescriptor> {
        self.descriptors.get(attribute)
    }

    fn is_hidden(&self, attribute: &str) -> bool {
        self.policy_hidden.contains(attribute)
            || self
                .descriptors
                .get(attribute)
                .is_some_and(|descriptor| descriptor.hidden)
    }
}
