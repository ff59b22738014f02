//! Click-to-select interaction handling.
//!
//! A chart click resolves to a bin index and a reconstructed category, then to
//! the records whose values produced that bin, then to selection-store
//! mutations. Modifier keys are captured at mousedown time (the engine's
//! click event itself does not carry them) and armed on the tracker until the
//! click completes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use indexmap::IndexSet;

use crate::core::categories::Category;
use crate::core::matching::find_matches;
use crate::core::types::AttributeDescriptor;
use crate::core::values::format_timestamp;
use crate::store::{Record, ResultStore};

/// Modifier keys observed at the triggering mousedown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModifierKeys {
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
}

impl ModifierKeys {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        meta: false,
    };

    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        meta: false,
    };

    pub const META: Self = Self {
        shift: false,
        ctrl: false,
        meta: true,
    };
}

/// Clicked x-coordinate, typed per axis kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClickCoordinate {
    Numeric(f64),
    Timestamp(DateTime<Utc>),
    Bucket(String),
}

/// One constituent point reported by the engine's click event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClickPoint {
    pub point_number: usize,
    pub x: ClickCoordinate,
}

/// Click event as delivered by the engine's click subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClickEvent {
    pub points: Vec<ClickPoint>,
}

impl ClickEvent {
    #[must_use]
    pub fn single(point_number: usize, x: ClickCoordinate) -> Self {
        Self {
            points: vec![ClickPoint { point_number, x }],
        }
    }
}

/// Ephemeral per-component click state: armed modifiers plus the bin indices
/// toggled since the last full reset.
///
/// Reset entirely when the result set or the binned attribute changes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BinClickTracker {
    modifiers: ModifierKeys,
    selected_bins: IndexSet<usize>,
}

impl BinClickTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the modifier state captured at mousedown.
    pub fn arm(&mut self, modifiers: ModifierKeys) {
        self.modifiers = modifiers;
    }

    #[must_use]
    pub fn armed(&self) -> ModifierKeys {
        self.modifiers
    }

    pub fn reset_modifiers(&mut self) {
        self.modifiers = ModifierKeys::NONE;
    }

    pub fn reset_bins(&mut self) {
        self.selected_bins.clear();
    }

    pub fn reset(&mut self) {
        self.reset_modifiers();
        self.reset_bins();
    }

    #[must_use]
    pub fn contains(&self, bin: usize) -> bool {
        self.selected_bins.contains(&bin)
    }

    /// Tracked bin indices in toggle order.
    #[must_use]
    pub fn tracked_bins(&self) -> Vec<usize> {
        self.selected_bins.iter().copied().collect()
    }

    fn insert(&mut self, bin: usize) {
        self.selected_bins.insert(bin);
    }

    fn remove(&mut self, bin: usize) {
        self.selected_bins.shift_remove(&bin);
    }

    /// `(min, max)` over the tracked bins, `None` when nothing is tracked.
    #[must_use]
    pub fn span(&self) -> Option<(usize, usize)> {
        let min = self.selected_bins.iter().copied().min()?;
        let max = self.selected_bins.iter().copied().max()?;
        Some((min, max))
    }
}

/// Resolves the clicked bin index: the maximum `point_number` across reported
/// points. Clicking an overlapping bar can report a point per constituent
/// series; the later series' index is authoritative.
#[must_use]
pub fn clicked_bin_index(event: &ClickEvent) -> Option<usize> {
    event.points.iter().map(|point| point.point_number).max()
}

/// Resolves the clicked category.
///
/// Category-axis clicks yield the clicked bucket literally; date and numeric
/// clicks search the reconstructed ranges for the one containing the
/// coordinate. A stale category list (result set changed under a pending
/// click) resolves to `None`.
#[must_use]
pub fn resolve_click_category(event: &ClickEvent, categories: &[Category]) -> Option<Category> {
    let first = event.points.first()?;
    match &first.x {
        ClickCoordinate::Bucket(value) => Some(Category::Bucket(value.clone())),
        ClickCoordinate::Timestamp(clicked) => {
            let formatted = format_timestamp(*clicked);
            categories
                .iter()
                .find(|category| {
                    matches!(category, Category::DateRange { start, end }
                        if formatted.as_str() >= start.as_str()
                            && formatted.as_str() <= end.as_str())
                })
                .cloned()
        }
        ClickCoordinate::Numeric(coordinate) => categories
            .iter()
            .find(|category| {
                matches!(category, Category::NumericRange { start, end }
                    if *coordinate >= *start && *coordinate <= *end)
            })
            .cloned(),
    }
}

/// Runs one click interaction against the selection store.
///
/// Plain click: clear the selection, select the clicked bin, track only it.
/// Ctrl/meta: toggle the clicked bin's records and tracking independently.
/// Shift: select the contiguous inclusive range between the clicked index and
/// the tracked min/max, extending tracking across the traversed range; with
/// nothing tracked yet it degrades to a plain click. Armed modifiers reset on
/// every path.
pub fn handle_click<S>(
    tracker: &mut BinClickTracker,
    event: &ClickEvent,
    categories: &[Category],
    descriptor: &AttributeDescriptor,
    attribute: &str,
    store: &mut S,
) where
    S: ResultStore + ?Sized,
{
    let Some(index) = clicked_bin_index(event) else {
        tracker.reset_modifiers();
        return;
    };
    let modifiers = tracker.armed();
    debug!(bin = index, ?modifiers, attribute, "histogram bin clicked");

    if modifiers.shift {
        handle_shift_click(tracker, event, categories, descriptor, attribute, store, index);
    } else if modifiers.ctrl || modifiers.meta {
        handle_toggle_click(tracker, event, categories, descriptor, attribute, store, index);
    } else {
        store.deselect_all();
        tracker.reset_bins();
        select_clicked_bin(tracker, event, categories, descriptor, attribute, store, index);
    }

    tracker.reset_modifiers();
}

fn select_clicked_bin<S>(
    tracker: &mut BinClickTracker,
    event: &ClickEvent,
    categories: &[Category],
    descriptor: &AttributeDescriptor,
    attribute: &str,
    store: &mut S,
    index: usize,
) where
    S: ResultStore + ?Sized,
{
    let Some(category) = resolve_click_category(event, categories) else {
        return;
    };
    let ids = matched_ids(store.records(), descriptor, attribute, &category);
    for id in &ids {
        store.set_selected(id, true);
    }
    tracker.insert(index);
}

fn handle_toggle_click<S>(
    tracker: &mut BinClickTracker,
    event: &ClickEvent,
    categories: &[Category],
    descriptor: &AttributeDescriptor,
    attribute: &str,
    store: &mut S,
    index: usize,
) where
    S: ResultStore + ?Sized,
{
    let Some(category) = resolve_click_category(event, categories) else {
        return;
    };
    let ids = matched_ids(store.records(), descriptor, attribute, &category);
    if tracker.contains(index) {
        for id in &ids {
            store.set_selected(id, false);
        }
        tracker.remove(index);
    } else {
        for id in &ids {
            store.set_selected(id, true);
        }
        tracker.insert(index);
    }
}

fn handle_shift_click<S>(
    tracker: &mut BinClickTracker,
    event: &ClickEvent,
    categories: &[Category],
    descriptor: &AttributeDescriptor,
    attribute: &str,
    store: &mut S,
    index: usize,
) where
    S: ResultStore + ?Sized,
{
    let Some((min, max)) = tracker.span() else {
        // No anchor to extend from; fall back to a fresh single-bin selection.
        store.deselect_all();
        select_clicked_bin(tracker, event, categories, descriptor, attribute, store, index);
        return;
    };

    let (first, last) = if index <= min {
        (index, min)
    } else if index >= max {
        (max, index)
    } else {
        (min, index)
    };
    select_between(tracker, categories, descriptor, attribute, store, first, last);
}

fn select_between<S>(
    tracker: &mut BinClickTracker,
    categories: &[Category],
    descriptor: &AttributeDescriptor,
    attribute: &str,
    store: &mut S,
    first: usize,
    last: usize,
) where
    S: ResultStore + ?Sized,
{
    let mut ids = Vec::new();
    for (bin, category) in categories
        .iter()
        .enumerate()
        .skip(first)
        .take(last.saturating_sub(first) + 1)
    {
        tracker.insert(bin);
        ids.extend(matched_ids(store.records(), descriptor, attribute, category));
    }
    for id in &ids {
        store.set_selected(id, true);
    }
}

fn matched_ids(
    records: &[Record],
    descriptor: &AttributeDescriptor,
    attribute: &str,
    category: &Category,
) -> Vec<String> {
    find_matches(records, descriptor, attribute, category)
        .into_iter()
        .map(|record| record.id.clone())
        .collect()
}
