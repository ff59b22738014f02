//! Histogram lifecycle controller.
//!
//! Orchestrates re-binning and re-rendering as the result set, the selection
//! set, and the chosen attribute change, and routes chart clicks through the
//! interaction state machine. All work runs on the caller's thread in
//! response to discrete [`HistogramEvent`]s; a superseded render is never
//! aborted, the last-applied render wins.

use tracing::{debug, trace};

use crate::chart::{BinConfig, ChartSurface, Layout, Series};
use crate::core::categories::{Category, extend_final_bin, reconstruct_categories};
use crate::core::discovery::{AttributeChoice, discover_attributes};
use crate::core::extract::extract_values;
use crate::core::types::{AttributeDescriptor, AttributeRegistry};
use crate::error::HistogramResult;
use crate::interaction::{BinClickTracker, ClickEvent, ModifierKeys, handle_click};
use crate::store::ResultStore;

/// Index of the full-population series within a rendered chart.
pub const POPULATION_SERIES: usize = 0;
/// Index of the selected-subset overlay series.
pub const SELECTION_SERIES: usize = 1;

/// What the histogram area currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    /// The result set is empty.
    NoResults,
    /// No binning attribute has been chosen yet.
    NoAttribute,
    /// The chosen attribute yields no values across the current results.
    NoMatchingData,
    /// A chart is rendered and clickable.
    Chart,
}

/// Typed lifecycle and input events, dispatched via
/// [`HistogramController::handle_event`].
#[derive(Debug, Clone, PartialEq)]
pub enum HistogramEvent {
    /// The result-set reference changed (membership, not selection).
    ResultsChanged,
    /// Only the selection set changed.
    SelectionChanged,
    /// The user picked a different binning attribute.
    AttributeChanged(Option<String>),
    /// The chart container was resized.
    Resized,
    /// Mousedown on the chart's drag surface; carries the modifier keys the
    /// upcoming click should honor.
    DragHandleMouseDown(ModifierKeys),
    /// A resolved chart click.
    ChartClick(ClickEvent),
}

/// Orchestrates one histogram component instance.
///
/// Owns the chart surface, the attribute registry handle, and the per-instance
/// click tracking state; reads records and writes selection through the
/// [`ResultStore`] passed into each call.
pub struct HistogramController<C, R>
where
    C: ChartSurface,
    R: AttributeRegistry,
{
    chart: C,
    registry: R,
    attribute: Option<String>,
    bins: Option<BinConfig>,
    categories: Vec<Category>,
    pinned_x: Option<(f64, f64)>,
    pinned_y: Option<(f64, f64)>,
    display: DisplayState,
    tracker: BinClickTracker,
}

impl<C, R> HistogramController<C, R>
where
    C: ChartSurface,
    R: AttributeRegistry,
{
    #[must_use]
    pub fn new(chart: C, registry: R) -> Self {
        Self {
            chart,
            registry,
            attribute: None,
            bins: None,
            categories: Vec::new(),
            pinned_x: None,
            pinned_y: None,
            display: DisplayState::NoResults,
            tracker: BinClickTracker::new(),
        }
    }

    #[must_use]
    pub fn display_state(&self) -> DisplayState {
        self.display
    }

    #[must_use]
    pub fn attribute(&self) -> Option<&str> {
        self.attribute.as_deref()
    }

    /// Categories of the last completed render, in bin order.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn chart(&self) -> &C {
        &self.chart
    }

    /// Bin indices toggled since the last result-set or attribute change.
    #[must_use]
    pub fn tracked_bins(&self) -> Vec<usize> {
        self.tracker.tracked_bins()
    }

    /// Attributes currently offered for binning, for the host's picker.
    #[must_use]
    pub fn attribute_choices<S>(&self, store: &S) -> Vec<AttributeChoice>
    where
        S: ResultStore + ?Sized,
    {
        discover_attributes(store.records(), &self.registry)
    }

    /// Single dispatch point for lifecycle and input events.
    pub fn handle_event<S>(&mut self, store: &mut S, event: HistogramEvent) -> HistogramResult<()>
    where
        S: ResultStore + ?Sized,
    {
        match event {
            HistogramEvent::ResultsChanged => self.results_changed(store),
            HistogramEvent::SelectionChanged => self.selection_changed(store),
            HistogramEvent::AttributeChanged(attribute) => self.set_attribute(store, attribute),
            HistogramEvent::Resized => {
                self.handle_resize();
                Ok(())
            }
            HistogramEvent::DragHandleMouseDown(modifiers) => {
                self.arm_modifiers(modifiers);
                Ok(())
            }
            HistogramEvent::ChartClick(event) => self.handle_click(store, &event),
        }
    }

    /// Re-bins and re-renders for a new result set.
    pub fn results_changed<S>(&mut self, store: &S) -> HistogramResult<()>
    where
        S: ResultStore + ?Sized,
    {
        self.invalidate();
        self.show(store)
    }

    /// Switches the binned attribute and re-renders from scratch.
    pub fn set_attribute<S>(&mut self, store: &S, attribute: Option<String>) -> HistogramResult<()>
    where
        S: ResultStore + ?Sized,
    {
        self.attribute = attribute;
        self.invalidate();
        self.show(store)
    }

    /// Lighter-weight path for a selection-only change: swaps the overlay
    /// series in place without re-deriving the bin configuration.
    pub fn selection_changed<S>(&mut self, store: &S) -> HistogramResult<()>
    where
        S: ResultStore + ?Sized,
    {
        if self.display != DisplayState::Chart {
            return Ok(());
        }
        let Some((attribute, descriptor)) = self.binned_descriptor() else {
            return Ok(());
        };

        let selected = extract_values(store.selected_records(), &descriptor, &attribute);
        trace!(
            %attribute,
            selected = selected.len(),
            "replacing selection overlay series"
        );
        self.chart.replace_series(
            SELECTION_SERIES,
            Series::selection(selected).with_bins(self.bins),
        )
    }

    /// Asks the chart to recompute its layout. The host must keep re-arming
    /// modifiers via [`HistogramEvent::DragHandleMouseDown`] afterwards, since
    /// a real engine recreates its drag surfaces on relayout.
    pub fn handle_resize(&mut self) {
        self.chart.resize();
    }

    /// Captures the modifier keys held at mousedown for the upcoming click.
    pub fn arm_modifiers(&mut self, modifiers: ModifierKeys) {
        self.tracker.arm(modifiers);
    }

    /// Routes a chart click through the selection state machine, then
    /// refreshes the overlay series to reflect the mutated selection.
    pub fn handle_click<S>(&mut self, store: &mut S, event: &ClickEvent) -> HistogramResult<()>
    where
        S: ResultStore + ?Sized,
    {
        if self.display != DisplayState::Chart {
            return Ok(());
        }
        // No reconstructed bins means there is nothing to resolve the clicked
        // coordinate against.
        if self.categories.is_empty() {
            return Ok(());
        }
        let Some((attribute, descriptor)) = self.binned_descriptor() else {
            return Ok(());
        };

        handle_click(
            &mut self.tracker,
            event,
            &self.categories,
            &descriptor,
            &attribute,
            store,
        );
        self.selection_changed(store)
    }

    fn binned_descriptor(&self) -> Option<(String, AttributeDescriptor)> {
        let attribute = self.attribute.clone()?;
        let descriptor = self.registry.lookup(&attribute)?.clone();
        Some((attribute, descriptor))
    }

    fn invalidate(&mut self) {
        self.tracker.reset();
        self.bins = None;
        self.categories.clear();
        self.pinned_x = None;
        self.pinned_y = None;
    }

    /// Full two-phase render.
    ///
    /// Phase one renders the population series alone so the engine picks its
    /// bin configuration. Phase two pins the measured (and end-extended) bins
    /// onto both series and the measured axis ranges onto the layout, so the
    /// overlay aligns exactly and later overlay swaps cause no axis jumps.
    fn show<S>(&mut self, store: &S) -> HistogramResult<()>
    where
        S: ResultStore + ?Sized,
    {
        let records = store.records();
        if records.is_empty() {
            self.display = DisplayState::NoResults;
            self.chart.clear();
            return Ok(());
        }
        let Some((attribute, descriptor)) = self.binned_descriptor() else {
            self.display = DisplayState::NoAttribute;
            self.chart.clear();
            return Ok(());
        };

        let values = extract_values(records, &descriptor, &attribute);
        if values.is_empty() {
            debug!(%attribute, "no matching data for attribute");
            self.display = DisplayState::NoMatchingData;
            self.chart.clear();
            return Ok(());
        }

        self.chart
            .render(&[Series::population(values.clone())], &Layout::auto())?;
        let Some(measured) = self.chart.rendered_state().cloned() else {
            // Nothing materialized to measure. Render both series anyway so
            // later overlay swaps have a selection slot to land in; without
            // bin state no categories exist, so clicks stay inert.
            debug!(%attribute, "surface reported no rendered state");
            let selected = extract_values(store.selected_records(), &descriptor, &attribute);
            self.chart.render(
                &[Series::population(values), Series::selection(selected)],
                &Layout::auto(),
            )?;
            self.display = DisplayState::Chart;
            return Ok(());
        };

        self.bins = measured.bins.map(extend_final_bin);
        self.pinned_x = measured.x_range;
        self.pinned_y = measured.y_range;

        let selected = extract_values(store.selected_records(), &descriptor, &attribute);
        let series = [
            Series::population(values).with_bins(self.bins),
            Series::selection(selected).with_bins(self.bins),
        ];
        self.chart
            .render(&series, &Layout::pinned(self.pinned_x, self.pinned_y))?;

        let final_state = self.chart.rendered_state().cloned().unwrap_or(measured);
        self.categories = reconstruct_categories(&final_state)?;
        self.display = DisplayState::Chart;
        debug!(
            %attribute,
            bins = self.categories.len(),
            "histogram rendered"
        );
        Ok(())
    }
}
