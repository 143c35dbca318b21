//! Region selection.
//!
//! Region selectors work on display names. A selection is resolved once per
//! query into the set of admitted country codes.

use std::collections::{BTreeSet, HashSet};

use tracing::debug;

use crate::models::{Dataset, Team};

/// Display name that disables region filtering.
pub const ALL_REGIONS: &str = "Todas";

/// Resolved region filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RegionFilter {
    /// No filtering
    #[default]
    All,
    /// Only countries of the listed regions. An empty set admits nothing.
    Only {
        regions: BTreeSet<String>,
        countries: HashSet<String>,
    },
}

impl RegionFilter {
    /// Resolve selected display names against the dataset's regions.
    ///
    /// Selecting [`ALL_REGIONS`] disables filtering. An empty selection admits
    /// no country at all. Unknown names are ignored.
    pub fn resolve<S: AsRef<str>>(dataset: &Dataset, selected: &[S]) -> Self {
        if selected.iter().any(|s| s.as_ref().trim() == ALL_REGIONS) {
            return RegionFilter::All;
        }

        let names: HashSet<&str> = selected.iter().map(|s| s.as_ref().trim()).collect();
        let regions: BTreeSet<String> = dataset
            .regions()
            .iter()
            .filter(|(_, region)| names.contains(region.spanish_name.as_str()))
            .map(|(code, _)| code.clone())
            .collect();

        let countries: HashSet<String> = dataset
            .countries()
            .iter()
            .filter(|(_, country)| regions.contains(&country.region))
            .map(|(code, _)| code.clone())
            .collect();

        debug!(
            "Resolved {} region name(s) to {} region(s), {} countries",
            selected.len(),
            regions.len(),
            countries.len()
        );

        RegionFilter::Only { regions, countries }
    }

    /// Resolve an optional selection; `None` means no filtering.
    pub fn from_selection<S: AsRef<str>>(dataset: &Dataset, selected: Option<&[S]>) -> Self {
        match selected {
            Some(names) => Self::resolve(dataset, names),
            None => RegionFilter::All,
        }
    }

    /// Region codes of a restricted filter, `None` when unfiltered.
    pub fn region_codes(&self) -> Option<&BTreeSet<String>> {
        match self {
            RegionFilter::All => None,
            RegionFilter::Only { regions, .. } => Some(regions),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, RegionFilter::All)
    }

    pub fn country_in_region(&self, country: &str) -> bool {
        match self {
            RegionFilter::All => true,
            RegionFilter::Only { countries, .. } => countries.contains(country),
        }
    }

    pub fn admits(&self, team: &Team) -> bool {
        self.country_in_region(&team.country)
    }
}

/// Options for a region selector: the "all" sentinel, then every region display name.
pub fn region_options(dataset: &Dataset) -> Vec<String> {
    std::iter::once(ALL_REGIONS.to_string())
        .chain(dataset.regions().values().map(|r| r.spanish_name.clone()))
        .collect()
}
