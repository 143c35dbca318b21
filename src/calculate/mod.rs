//! Ranking and aggregation engine.
//!
//! Every function here is pure: it borrows a period slice of the dataset and
//! a resolved region filter, and returns a freshly built table or series.
//! Nothing is cached or accumulated between calls.
//!
//! - **period**: year-range slicing and parameter clamping
//! - **region**: region selection to country predicate
//! - **participation**: participation counts, finalists and roster repetition
//! - **ranking**: place-frequency and medal tables
//! - **distribution**: solved-count statistics, standings bands and series
//! - **overlap**: per-university roster overlap graphs
//! - **accumulate**: accumulated solved problems

mod accumulate;
mod distribution;
mod overlap;
mod participation;
mod period;
mod ranking;
mod region;

pub use accumulate::*;
pub use distribution::*;
pub use overlap::*;
pub use participation::*;
pub use period::*;
pub use ranking::*;
pub use region::*;

use serde::{Deserialize, Serialize};

use crate::models::{Dataset, Team};

/// What a table row or series is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    #[default]
    University,
    Country,
}

fn university_key(team: &Team) -> &str {
    &team.university
}

fn country_key(team: &Team) -> &str {
    &team.country
}

impl EntityKind {
    pub fn key_fn(self) -> fn(&Team) -> &str {
        match self {
            EntityKind::University => university_key,
            EntityKind::Country => country_key,
        }
    }

    pub fn key(self, team: &Team) -> &str {
        (self.key_fn())(team)
    }
}

impl std::str::FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "university" | "universities" => Ok(EntityKind::University),
            "country" | "countries" => Ok(EntityKind::Country),
            other => Err(format!(
                "unknown entity kind '{}' (expected: university, country)",
                other
            )),
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::University => write!(f, "university"),
            EntityKind::Country => write!(f, "country"),
        }
    }
}

/// A period slice plus the region filter that applies to it.
#[derive(Debug, Clone)]
pub struct Scope<'a> {
    pub range: YearRange,
    pub editions: Editions<'a>,
    pub regions: RegionFilter,
}

impl<'a> Scope<'a> {
    /// Slice `dataset` to `range` and resolve the region selection (`None` = all regions).
    pub fn new<S: AsRef<str>>(
        dataset: &'a Dataset,
        range: YearRange,
        regions: Option<&[S]>,
    ) -> Self {
        Self {
            range,
            editions: dataset.filter_by_period(range.first, range.last),
            regions: RegionFilter::from_selection(dataset, regions),
        }
    }

    pub fn years(&self) -> Vec<u16> {
        self.editions.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Country, Edition, Region};
    use std::collections::BTreeMap;

    #[test]
    fn test_entity_kind_key() {
        let team = Team::new("UH", "CU", 3);
        assert_eq!(EntityKind::University.key(&team), "UH");
        assert_eq!(EntityKind::Country.key(&team), "CU");
    }

    #[test]
    fn test_entity_kind_from_str() {
        assert_eq!("University".parse::<EntityKind>().unwrap(), EntityKind::University);
        assert_eq!("countries".parse::<EntityKind>().unwrap(), EntityKind::Country);
        assert!("team".parse::<EntityKind>().is_err());
        assert_eq!(EntityKind::Country.to_string(), "country");
    }

    #[test]
    fn test_scope_new() {
        let mut regions = BTreeMap::new();
        regions.insert(
            "r".to_string(),
            Region {
                spanish_name: "Caribe".to_string(),
                name: None,
            },
        );
        let mut countries = BTreeMap::new();
        countries.insert(
            "CU".to_string(),
            Country {
                region: "r".to_string(),
                name: None,
            },
        );
        let editions = (2010..=2014)
            .map(|y| (y, Edition::new(y, vec![Team::new("UH", "CU", 1)], 8)))
            .collect();
        let data = Dataset::new(editions, regions, countries);

        let scope = Scope::new(&data, YearRange::new(2011, 2013), Some(&["Caribe"][..]));
        assert_eq!(scope.years(), vec![2011, 2012, 2013]);
        assert!(scope.regions.country_in_region("CU"));

        let scope = Scope::new::<String>(&data, YearRange::new(2011, 2013), None);
        assert!(scope.regions.is_all());
    }
}
