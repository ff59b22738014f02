use histogram_rs::core::{
    AttributeDescriptor, AttributeType, InMemoryRegistry, discover_attributes,
};
use histogram_rs::store::Record;
use serde_json::json;

fn registry() -> InMemoryRegistry {
    InMemoryRegistry::new()
        .with("title", AttributeDescriptor::new(AttributeType::String))
        .with("created", AttributeDescriptor::new(AttributeType::Date))
        .with(
            "resolution",
            AttributeDescriptor::new(AttributeType::Numeric).with_alias("Resolution (m)"),
        )
        .with(
            "checksum",
            AttributeDescriptor::new(AttributeType::String).hidden(),
        )
}

#[test]
fn union_preserves_first_seen_order_and_deduplicates() {
    let records = vec![
        Record::new("a")
            .with_property("title", json!("one"))
            .with_property("created", json!("2024-01-01")),
        Record::new("b")
            .with_property("created", json!("2024-01-02"))
            .with_property("resolution", json!(30)),
    ];

    let choices = discover_attributes(&records, &registry());
    let names: Vec<&str> = choices.iter().map(|choice| choice.value.as_str()).collect();
    assert_eq!(names, vec!["title", "created", "resolution"]);
}

#[test]
fn registry_hidden_attributes_are_excluded_even_when_present_on_every_record() {
    let records = vec![
        Record::new("a").with_property("checksum", json!("abc")),
        Record::new("b").with_property("checksum", json!("def")),
    ];

    let choices = discover_attributes(&records, &registry());
    assert!(choices.is_empty());
}

#[test]
fn policy_hidden_attributes_are_excluded() {
    let mut registry = registry();
    registry.hide_by_policy("title");

    let records = vec![Record::new("a").with_property("title", json!("one"))];
    let choices = discover_attributes(&records, &registry);
    assert!(choices.is_empty());
}

#[test]
fn attributes_unknown_to_the_registry_are_excluded() {
    let records = vec![Record::new("a").with_property("mystery", json!("?"))];
    let choices = discover_attributes(&records, &registry());
    assert!(choices.is_empty());
}

#[test]
fn label_prefers_the_registered_alias() {
    let records = vec![
        Record::new("a")
            .with_property("title", json!("one"))
            .with_property("resolution", json!(30)),
    ];

    let choices = discover_attributes(&records, &registry());
    assert_eq!(choices[0].label, "title");
    assert_eq!(choices[1].label, "Resolution (m)");
}

#[test]
fn heterogeneous_property_sets_do_not_fault() {
    let records = vec![
        Record::new("a"),
        Record::new("b").with_property("title", json!("one")),
        Record::new("c").with_property("created", json!("2024-01-01")),
    ];

    let choices = discover_attributes(&records, &registry());
    let names: Vec<&str> = choices.iter().map(|choice| choice.value.as_str()).collect();
    assert_eq!(names, vec!["title", "created"]);
}

#[test]
fn empty_result_set_discovers_nothing() {
    assert!(discover_attributes(&[], &registry()).is_empty());
}
