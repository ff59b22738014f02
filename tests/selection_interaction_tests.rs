use histogram_rs::core::{AttributeDescriptor, AttributeType, Category};
use histogram_rs::interaction::{
    BinClickTracker, ClickCoordinate, ClickEvent, ClickPoint, ModifierKeys, clicked_bin_index,
    handle_click, resolve_click_category,
};
use histogram_rs::store::{InMemoryResults, Record, ResultStore};
use serde_json::json;

/// Seven bins `[0,10] .. [60,70]` with one record sitting mid-bin in each.
fn fixture() -> (Vec<Category>, InMemoryResults) {
    let categories: Vec<Category> = (0..7)
        .map(|bin| Category::NumericRange {
            start: f64::from(bin) * 10.0,
            end: f64::from(bin + 1) * 10.0,
        })
        .collect();
    let records: Vec<Record> = (0..7)
        .map(|bin| {
            Record::new(format!("r{bin}")).with_property("size", json!(bin * 10 + 5))
        })
        .collect();
    (categories, InMemoryResults::new(records))
}

fn descriptor() -> AttributeDescriptor {
    AttributeDescriptor::new(AttributeType::Numeric)
}

fn click(bin: usize) -> ClickEvent {
    ClickEvent::single(bin, ClickCoordinate::Numeric(bin as f64 * 10.0 + 5.0))
}

fn selected_ids(store: &InMemoryResults) -> Vec<String> {
    store
        .selected_records()
        .iter()
        .map(|record| record.id.clone())
        .collect()
}

#[test]
fn plain_click_selects_exactly_the_clicked_bin_and_clears_prior_selection() {
    let (categories, mut store) = fixture();
    let mut tracker = BinClickTracker::new();
    store.set_selected("r6", true);

    handle_click(&mut tracker, &click(2), &categories, &descriptor(), "size", &mut store);

    assert_eq!(selected_ids(&store), vec!["r2"]);
    assert_eq!(tracker.tracked_bins(), vec![2]);
}

#[test]
fn shift_click_selects_the_inclusive_range_from_the_tracked_span() {
    let (categories, mut store) = fixture();
    let mut tracker = BinClickTracker::new();

    handle_click(&mut tracker, &click(2), &categories, &descriptor(), "size", &mut store);
    tracker.arm(ModifierKeys::SHIFT);
    handle_click(&mut tracker, &click(5), &categories, &descriptor(), "size", &mut store);

    assert_eq!(selected_ids(&store), vec!["r2", "r3", "r4", "r5"]);
    let mut tracked = tracker.tracked_bins();
    tracked.sort_unstable();
    assert_eq!(tracked, vec![2, 3, 4, 5]);
}

#[test]
fn shift_click_below_the_tracked_span_extends_downward() {
    let (categories, mut store) = fixture();
    let mut tracker = BinClickTracker::new();

    handle_click(&mut tracker, &click(4), &categories, &descriptor(), "size", &mut store);
    tracker.arm(ModifierKeys::SHIFT);
    handle_click(&mut tracker, &click(1), &categories, &descriptor(), "size", &mut store);

    assert_eq!(selected_ids(&store), vec!["r1", "r2", "r3", "r4"]);
}

#[test]
fn shift_click_with_no_prior_selection_degrades_to_a_plain_selection() {
    let (categories, mut store) = fixture();
    let mut tracker = BinClickTracker::new();

    tracker.arm(ModifierKeys::SHIFT);
    handle_click(&mut tracker, &click(3), &categories, &descriptor(), "size", &mut store);

    assert_eq!(selected_ids(&store), vec!["r3"]);
    assert_eq!(tracker.tracked_bins(), vec![3]);
}

#[test]
fn ctrl_click_toggles_a_bin_independently_of_other_bins() {
    let (categories, mut store) = fixture();
    let mut tracker = BinClickTracker::new();

    handle_click(&mut tracker, &click(1), &categories, &descriptor(), "size", &mut store);

    tracker.arm(ModifierKeys::CTRL);
    handle_click(&mut tracker, &click(3), &categories, &descriptor(), "size", &mut store);
    assert_eq!(selected_ids(&store), vec!["r1", "r3"]);

    tracker.arm(ModifierKeys::CTRL);
    handle_click(&mut tracker, &click(3), &categories, &descriptor(), "size", &mut store);
    assert_eq!(selected_ids(&store), vec!["r1"]);
    assert_eq!(tracker.tracked_bins(), vec![1]);
}

#[test]
fn meta_behaves_like_ctrl() {
    let (categories, mut store) = fixture();
    let mut tracker = BinClickTracker::new();

    tracker.arm(ModifierKeys::META);
    handle_click(&mut tracker, &click(0), &categories, &descriptor(), "size", &mut store);
    assert_eq!(selected_ids(&store), vec!["r0"]);
}

#[test]
fn modifiers_reset_after_every_completed_click() {
    let (categories, mut store) = fixture();
    let mut tracker = BinClickTracker::new();

    tracker.arm(ModifierKeys::SHIFT);
    handle_click(&mut tracker, &click(3), &categories, &descriptor(), "size", &mut store);
    assert_eq!(tracker.armed(), ModifierKeys::NONE);

    // The next click without a new mousedown behaves as a plain click.
    handle_click(&mut tracker, &click(5), &categories, &descriptor(), "size", &mut store);
    assert_eq!(selected_ids(&store), vec!["r5"]);
}

#[test]
fn bin_index_resolves_to_the_maximum_point_number() {
    let event = ClickEvent {
        points: vec![
            ClickPoint {
                point_number: 1,
                x: ClickCoordinate::Numeric(15.0),
            },
            ClickPoint {
                point_number: 4,
                x: ClickCoordinate::Numeric(15.0),
            },
        ],
    };
    assert_eq!(clicked_bin_index(&event), Some(4));
    assert_eq!(clicked_bin_index(&ClickEvent { points: Vec::new() }), None);
}

#[test]
fn category_axis_clicks_resolve_to_the_literal_bucket() {
    let categories = vec![Category::Bucket("A\u{200B}".to_owned())];
    let event = ClickEvent::single(0, ClickCoordinate::Bucket("A\u{200B}".to_owned()));
    assert_eq!(
        resolve_click_category(&event, &categories),
        Some(Category::Bucket("A\u{200B}".to_owned()))
    );
}

#[test]
fn stale_category_list_resolves_to_no_selection_change() {
    let (_, mut store) = fixture();
    let mut tracker = BinClickTracker::new();
    store.set_selected("r0", true);

    // Result set changed under the pending click: categories are gone.
    tracker.arm(ModifierKeys::CTRL);
    handle_click(&mut tracker, &click(3), &[], &descriptor(), "size", &mut store);

    assert_eq!(selected_ids(&store), vec!["r0"]);
    assert!(tracker.tracked_bins().is_empty());
    assert_eq!(tracker.armed(), ModifierKeys::NONE);
}

#[test]
fn empty_click_event_is_a_no_op_beyond_modifier_reset() {
    let (categories, mut store) = fixture();
    let mut tracker = BinClickTracker::new();
    store.set_selected("r0", true);

    tracker.arm(ModifierKeys::SHIFT);
    handle_click(
        &mut tracker,
        &ClickEvent { points: Vec::new() },
        &categories,
        &descriptor(),
        "size",
        &mut store,
    );

    assert_eq!(selected_ids(&store), vec!["r0"]);
    assert_eq!(tracker.armed(), ModifierKeys::NONE);
}
