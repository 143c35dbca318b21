//! Place-frequency and medal tables.
//!
//! Without a region filter a team's stored position is its place. With one,
//! places are recomputed from scratch among the admitted teams only: they are
//! stably sorted by stored position (unranked last) and numbered from 1.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use super::{Editions, EntityKind, RegionFilter};
use crate::models::{Edition, MedalRow, PlaceCounts, PlaceRow, PlaceTable, Team};

/// A qualifying team and the place it takes under the active filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Standing<'a> {
    /// `None` when the team has no usable position
    pub place: Option<u32>,
    pub team: &'a Team,
}

/// Standings of one edition under a region filter.
///
/// Unfiltered standings keep source order and stored positions. Restricted
/// standings come back in recomputed place order.
pub fn standings<'a>(edition: &'a Edition, filter: &RegionFilter) -> Vec<Standing<'a>> {
    if filter.is_all() {
        return edition
            .teams
            .iter()
            .map(|team| Standing {
                place: team.position.rank(),
                team,
            })
            .collect();
    }

    let mut admitted: Vec<&Team> = edition.teams.iter().filter(|t| filter.admits(t)).collect();
    // sort_by_key is stable, so equal positions keep source order
    admitted.sort_by_key(|t| t.position);

    admitted
        .into_iter()
        .zip(1u32..)
        .map(|(team, place)| Standing {
            place: Some(place),
            team,
        })
        .collect()
}

#[derive(Default)]
struct Tally {
    places: PlaceCounts,
    years: BTreeSet<u16>,
}

/// Build the place table keyed by an arbitrary entity key.
pub fn build_place_table_by<F>(
    editions: &Editions,
    key: F,
    filter: &RegionFilter,
    min_participations: u32,
) -> PlaceTable
where
    F: Fn(&Team) -> &str,
{
    let mut tallies: HashMap<&str, Tally> = HashMap::new();

    for (year, edition) in editions {
        for standing in standings(edition, filter) {
            let tally = tallies.entry(key(standing.team)).or_default();
            tally.years.insert(*year);
            if let Some(place) = standing.place {
                tally.places.record(place);
            }
        }
    }

    let mut rows: Vec<PlaceRow> = tallies
        .into_iter()
        .filter(|(_, tally)| tally.years.len() as u32 >= min_participations)
        .map(|(entity, tally)| PlaceRow {
            entity: entity.to_string(),
            places: tally.places,
            total: tally.places.total(),
            participations: tally.years.len() as u32,
        })
        .collect();

    rows.sort_by(|a, b| {
        b.places
            .as_slice()
            .cmp(a.places.as_slice())
            .then_with(|| b.total.cmp(&a.total))
            .then_with(|| b.participations.cmp(&a.participations))
            .then_with(|| a.entity.cmp(&b.entity))
    });

    debug!(
        "Place table: {} entities over {} editions (min participations {})",
        rows.len(),
        editions.len(),
        min_participations
    );

    PlaceTable { rows }
}

/// Build the entity x place(1..=12) table for universities or countries.
///
/// Entities appearing in fewer than `min_participations` editions are dropped.
pub fn build_place_table(
    editions: &Editions,
    kind: EntityKind,
    filter: &RegionFilter,
    min_participations: u32,
) -> PlaceTable {
    build_place_table_by(editions, kind.key_fn(), filter, min_participations)
}

/// Collapse a place table into medal bands, sorted for presentation.
pub fn medal_table(table: &PlaceTable) -> Vec<MedalRow> {
    let mut rows: Vec<MedalRow> = table.rows.iter().map(MedalRow::from_place_row).collect();

    rows.sort_by(|a, b| {
        (b.gold, b.silver, b.bronze, b.total, b.participations)
            .cmp(&(a.gold, a.silver, a.bronze, a.total, a.participations))
            .then_with(|| a.entity.cmp(&b.entity))
    });

    rows
}
