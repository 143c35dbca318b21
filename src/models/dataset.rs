//! Contest dataset model.
//!
//! The dataset is loaded once and never mutated. Every aggregation borrows
//! from it and produces fresh result tables.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Team;

/// One contest year with its full team list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edition {
    pub year: u16,

    /// Teams in source order
    pub teams: Vec<Team>,

    /// Number of problems set that year
    pub problem_count: u32,
}

impl Edition {
    pub fn new(year: u16, teams: Vec<Team>, problem_count: u32) -> Self {
        Self {
            year,
            teams,
            problem_count,
        }
    }
}

/// Country metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    /// Region code this country belongs to
    pub region: String,

    #[serde(default)]
    pub name: Option<String>,
}

/// Region metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Display name shown in region selectors
    pub spanish_name: String,

    #[serde(default)]
    pub name: Option<String>,
}

/// The whole contest history.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    editions: BTreeMap<u16, Edition>,
    regions: BTreeMap<String, Region>,
    countries: BTreeMap<String, Country>,
}

impl Dataset {
    pub fn new(
        editions: BTreeMap<u16, Edition>,
        regions: BTreeMap<String, Region>,
        countries: BTreeMap<String, Country>,
    ) -> Self {
        Self {
            editions,
            regions,
            countries,
        }
    }

    /// All editions keyed by year.
    pub fn editions(&self) -> &BTreeMap<u16, Edition> {
        &self.editions
    }

    pub fn edition(&self, year: u16) -> Option<&Edition> {
        self.editions.get(&year)
    }

    pub fn regions(&self) -> &BTreeMap<String, Region> {
        &self.regions
    }

    pub fn countries(&self) -> &BTreeMap<String, Country> {
        &self.countries
    }

    /// Region code of a country, if the country is known.
    pub fn country_region(&self, country: &str) -> Option<&str> {
        self.countries.get(country).map(|c| c.region.as_str())
    }

    pub fn first_year(&self) -> Option<u16> {
        self.editions.keys().next().copied()
    }

    pub fn last_year(&self) -> Option<u16> {
        self.editions.keys().next_back().copied()
    }

    /// Selectable year bounds: no earlier than `minimal_year`, no later than the last edition.
    pub fn year_bounds(&self, minimal_year: u16) -> Option<(u16, u16)> {
        let first = self.first_year()?;
        let last = self.last_year()?;
        let lower = first.max(minimal_year).min(last);
        Some((lower, last))
    }

    /// Total number of team records across every edition.
    pub fn team_count(&self) -> usize {
        self.editions.values().map(|e| e.teams.len()).sum()
    }
}
