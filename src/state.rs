use std::sync::Arc;

use crate::color::ColorMap;
use crate::data::aggregate::Aggregates;
use crate::data::filter::{filtered_indices, FilterCriteria};
use crate::data::model::ResaleDataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset, shared read-only via the loader cache
    /// (None until a file is loaded).
    pub dataset: Option<Arc<ResaleDataset>>,

    /// Current filter selection; replaced wholesale, never patched.
    pub criteria: FilterCriteria,

    /// Indices of transactions passing the current criteria (cached per
    /// interaction).
    pub visible_indices: Vec<usize>,

    /// Metrics and grouped tables for the current filtered view.
    pub aggregates: Aggregates,

    /// Per-town colours for the average-price chart.
    pub town_colors: ColorMap,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            criteria: FilterCriteria::default(),
            visible_indices: Vec::new(),
            aggregates: Aggregates::default(),
            town_colors: ColorMap::default(),
            status_message: None,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset: reset the criteria to unrestricted,
    /// rebuild the town colours, and compute the initial view.
    pub fn set_dataset(&mut self, dataset: Arc<ResaleDataset>) {
        self.criteria = FilterCriteria::unrestricted(&dataset);
        self.town_colors = ColorMap::new(&dataset.towns);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    /// Recompute the filtered view and every aggregate from the full
    /// dataset. Runs once per interaction; nothing carries over from the
    /// previous pass.
    pub fn refilter(&mut self) {
        if let Some(dataset) = &self.dataset {
            self.visible_indices = filtered_indices(dataset, &self.criteria);
            self.aggregates = Aggregates::compute(dataset, &self.visible_indices);
        }
    }

    /// Restore the unrestricted criteria for the loaded dataset.
    pub fn reset_filters(&mut self) {
        if let Some(dataset) = self.dataset.clone() {
            self.criteria = FilterCriteria::unrestricted(&dataset);
            self.refilter();
        }
    }
}
