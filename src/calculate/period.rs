//! Year-range slicing of the dataset.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Dataset, Edition};

/// Editions of a queried period, keyed by year in chronological order.
pub type Editions<'a> = BTreeMap<u16, &'a Edition>;

impl Dataset {
    /// Editions with `first <= year <= last`. An inverted range yields nothing.
    pub fn filter_by_period(&self, first: u16, last: u16) -> Editions<'_> {
        if first > last {
            debug!("Inverted period {}..{}, returning no editions", first, last);
            return BTreeMap::new();
        }

        self.editions()
            .range(first..=last)
            .map(|(year, edition)| (*year, edition))
            .collect()
    }
}

/// Inclusive year range requested by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub first: u16,
    pub last: u16,
}

impl YearRange {
    pub fn new(first: u16, last: u16) -> Self {
        Self { first, last }
    }

    /// Clamp both ends into `bounds`. Missing ends default to the bounds themselves.
    pub fn clamped(first: Option<u16>, last: Option<u16>, bounds: (u16, u16)) -> Self {
        let (lower, upper) = bounds;
        let first = first.unwrap_or(lower).clamp(lower, upper);
        let last = last.unwrap_or(upper).clamp(lower, upper);
        Self { first, last }
    }

    pub fn is_empty(&self) -> bool {
        self.first > self.last
    }

    pub fn contains(&self, year: u16) -> bool {
        self.first <= year && year <= self.last
    }
}

/// Clamp a minimum-participation threshold to `1..=editions_in_range`.
pub fn clamp_min_participations(requested: u32, editions_in_range: usize) -> u32 {
    let upper = u32::try_from(editions_in_range).unwrap_or(u32::MAX).max(1);
    requested.clamp(1, upper)
}
