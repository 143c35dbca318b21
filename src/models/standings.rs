//! Place-frequency and medal table models.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::RangeInclusive;

/// Number of tracked places in a place table.
pub const PLACE_BUCKETS: usize = 12;

/// Medal band for a final place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    pub const ALL: [Medal; 3] = [Medal::Gold, Medal::Silver, Medal::Bronze];

    /// Places covered by this band.
    pub fn places(&self) -> RangeInclusive<u32> {
        match self {
            Medal::Gold => 1..=4,
            Medal::Silver => 5..=8,
            Medal::Bronze => 9..=12,
        }
    }

    /// Band for a place, if it earns a medal.
    pub fn for_place(place: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.places().contains(&place))
    }
}

impl std::fmt::Display for Medal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Medal::Gold => write!(f, "gold"),
            Medal::Silver => write!(f, "silver"),
            Medal::Bronze => write!(f, "bronze"),
        }
    }
}

/// Frequency of each place 1..=12.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceCounts([u32; PLACE_BUCKETS]);

impl PlaceCounts {
    /// Count one finish at `place`. Returns false when the place is outside 1..=12.
    pub fn record(&mut self, place: u32) -> bool {
        match Self::index(place) {
            Some(i) => {
                self.0[i] += 1;
                true
            }
            None => false,
        }
    }

    /// Frequency at `place`; zero outside the tracked range.
    pub fn get(&self, place: u32) -> u32 {
        Self::index(place).map(|i| self.0[i]).unwrap_or(0)
    }

    /// Sum over every tracked place.
    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    pub fn medal_count(&self, medal: Medal) -> u32 {
        medal.places().map(|p| self.get(p)).sum()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    fn index(place: u32) -> Option<usize> {
        let i = usize::try_from(place).ok()?.checked_sub(1)?;
        (i < PLACE_BUCKETS).then_some(i)
    }
}

/// One entity's row in the place table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceRow {
    /// University name or country code
    pub entity: String,

    pub places: PlaceCounts,

    /// Finishes inside places 1..=12
    pub total: u32,

    /// Editions in which the entity fielded a qualifying team
    pub participations: u32,
}

/// Entity x place(1..=12) frequency table, already in presentation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceTable {
    pub rows: Vec<PlaceRow>,
}

impl PlaceTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn get(&self, entity: &str) -> Option<&PlaceRow> {
        self.rows.iter().find(|r| r.entity == entity)
    }

    /// Keep only the named entities. Names not in the table are ignored.
    pub fn select<S: AsRef<str>>(&self, entities: &[S]) -> PlaceTable {
        let wanted: HashSet<&str> = entities.iter().map(|e| e.as_ref()).collect();
        PlaceTable {
            rows: self
                .rows
                .iter()
                .filter(|r| wanted.contains(r.entity.as_str()))
                .cloned()
                .collect(),
        }
    }
}

/// One entity's row in the medal table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedalRow {
    pub entity: String,
    pub gold: u32,
    pub silver: u32,
    pub bronze: u32,
    pub total: u32,
    pub participations: u32,
}

impl MedalRow {
    pub fn from_place_row(row: &PlaceRow) -> Self {
        let gold = row.places.medal_count(Medal::Gold);
        let silver = row.places.medal_count(Medal::Silver);
        let bronze = row.places.medal_count(Medal::Bronze);
        Self {
            entity: row.entity.clone(),
            gold,
            silver,
            bronze,
            total: gold + silver + bronze,
            participations: row.participations,
        }
    }
}
