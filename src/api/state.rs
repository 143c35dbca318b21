use std::sync::Arc;

use crate::api::QueryParams;
use crate::calculate::{clamp_min_participations, Scope, YearRange};
use crate::config::QueryDefaults;
use crate::models::Dataset;

#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub defaults: Arc<QueryDefaults>,
    /// `None` or `"*"` allows any origin
    pub cors_origin: Option<String>,
}

impl AppState {
    pub fn new(dataset: Arc<Dataset>, defaults: Arc<QueryDefaults>) -> Self {
        Self {
            dataset,
            defaults,
            cors_origin: None,
        }
    }

    pub fn with_cors_origin(mut self, origin: impl Into<String>) -> Self {
        self.cors_origin = Some(origin.into());
        self
    }

    /// Selectable year bounds; `(0, 0)` for a dataset without editions.
    pub fn year_bounds(&self) -> (u16, u16) {
        self.dataset
            .year_bounds(self.defaults.minimal_year)
            .unwrap_or((0, 0))
    }

    /// Resolve the period and region selection of a request.
    pub fn scope(&self, params: &QueryParams) -> Scope<'_> {
        let range = YearRange::clamped(params.first, params.last, self.year_bounds());
        let regions = params.region_selection();
        Scope::new(&self.dataset, range, regions.as_deref())
    }

    /// Participation threshold for a request, clamped to the editions in scope.
    pub fn min_participations(&self, params: &QueryParams, scope: &Scope) -> u32 {
        let requested = params.min.unwrap_or(self.defaults.min_participations);
        clamp_min_participations(requested, scope.editions.len())
    }

    pub fn display_limit(&self, params: &QueryParams) -> usize {
        params.limit.unwrap_or(self.defaults.display_limit).max(1)
    }
}
