//! Participation counts and roster repetition.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use tracing::debug;

use super::{Editions, RegionFilter};
use crate::models::{
    FinalistRow, ParticipationRow, RepeatMetric, RepeatRow, TeamOverlap, UniversityParticipation,
};

/// Number of editions in which each country fielded at least one team.
///
/// The region filter applies to each country's own region.
pub fn count_country_participations(
    editions: &Editions,
    filter: &RegionFilter,
) -> BTreeMap<String, u32> {
    let mut counts: BTreeMap<String, u32> = BTreeMap::new();

    for edition in editions.values() {
        let present: HashSet<&str> = edition.teams.iter().map(|t| t.country.as_str()).collect();
        for country in present {
            *counts.entry(country.to_string()).or_default() += 1;
        }
    }

    counts.retain(|country, _| filter.country_in_region(country));
    debug!("Counted participations for {} countries", counts.len());
    counts
}

/// Number of editions in which each university fielded at least one team.
///
/// A university's country is the one on its most recent team. The region
/// filter applies to that country.
pub fn count_university_participations(
    editions: &Editions,
    filter: &RegionFilter,
) -> BTreeMap<String, UniversityParticipation> {
    let mut counts: BTreeMap<String, UniversityParticipation> = BTreeMap::new();

    for edition in editions.values() {
        let mut seen: HashSet<&str> = HashSet::new();
        for team in &edition.teams {
            let entry = counts
                .entry(team.university.clone())
                .or_insert_with(|| UniversityParticipation {
                    count: 0,
                    country: team.country.clone(),
                });
            if seen.insert(team.university.as_str()) {
                entry.count += 1;
            }
            entry.country.clone_from(&team.country);
        }
    }

    counts.retain(|_, p| filter.country_in_region(&p.country));
    debug!("Counted participations for {} universities", counts.len());
    counts
}

/// Apply a minimum-count threshold and order rows by count (descending), then name.
pub fn participation_ranking<'a, I>(counts: I, min_count: u32) -> Vec<ParticipationRow>
where
    I: IntoIterator<Item = (&'a str, u32)>,
{
    let mut rows: Vec<ParticipationRow> = counts
        .into_iter()
        .filter(|(_, count)| *count >= min_count)
        .map(|(name, count)| ParticipationRow {
            name: name.to_string(),
            count,
        })
        .collect();

    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    rows
}

/// Distinct finalist universities per country, keeping countries with at least `min_universities`.
pub fn count_country_finalists(
    editions: &Editions,
    filter: &RegionFilter,
    min_universities: u32,
) -> Vec<FinalistRow> {
    let mut by_country: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();

    for edition in editions.values() {
        for team in edition.teams.iter().filter(|t| filter.admits(t)) {
            by_country
                .entry(team.country.as_str())
                .or_default()
                .insert(team.university.as_str());
        }
    }

    let mut rows: Vec<FinalistRow> = by_country
        .into_iter()
        .map(|(country, universities)| FinalistRow {
            country: country.to_string(),
            universities: universities.len() as u32,
        })
        .filter(|row| row.universities >= min_universities)
        .collect();

    rows.sort_by(|a, b| {
        b.universities
            .cmp(&a.universities)
            .then_with(|| a.country.cmp(&b.country))
    });
    rows
}

/// Running state of the roster repetition fold.
#[derive(Debug, Default)]
struct RosterHistory {
    seen: HashSet<String>,
    stats: TeamOverlap,
}

/// Roster repetition per university.
///
/// Editions are folded in chronological order. For every team, each player
/// already seen for that university counts as a repeated player, and the team
/// counts once as repeated if any of its players was seen before.
pub fn count_team_overlaps(
    editions: &Editions,
    filter: &RegionFilter,
) -> BTreeMap<String, TeamOverlap> {
    let histories = editions.values().fold(
        BTreeMap::<String, RosterHistory>::new(),
        |mut acc, edition| {
            for team in edition.teams.iter().filter(|t| filter.admits(t)) {
                let history = acc.entry(team.university.clone()).or_default();
                history.stats.team_count += 1;

                let mut repeated = false;
                for player in &team.players {
                    if history.seen.contains(player) {
                        history.stats.repeated_player_count += 1;
                        repeated = true;
                    } else {
                        history.seen.insert(player.clone());
                    }
                }
                if repeated {
                    history.stats.repeated_team_count += 1;
                }
            }
            acc
        },
    );

    histories
        .into_iter()
        .map(|(university, history)| {
            let mut stats = history.stats;
            stats.distinct_players = history.seen.len() as u32;
            (university, stats)
        })
        .collect()
}

/// Rank universities with at least one repeated team by `metric`, descending.
pub fn rank_team_repeats(
    overlaps: &BTreeMap<String, TeamOverlap>,
    metric: RepeatMetric,
    limit: Option<usize>,
) -> Vec<RepeatRow> {
    let mut rows: Vec<RepeatRow> = overlaps
        .iter()
        .filter(|(_, o)| o.repeated_team_count != 0)
        .map(|(university, o)| RepeatRow {
            university: university.clone(),
            value: metric.value(o),
        })
        .collect();

    rows.sort_by(|a, b| {
        b.value
            .partial_cmp(&a.value)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.university.cmp(&b.university))
    });

    if let Some(limit) = limit {
        rows.truncate(limit);
    }
    rows
}

/// Universities with at least one admitted team in the period, sorted by name.
pub fn observed_universities(editions: &Editions, filter: &RegionFilter) -> Vec<String> {
    editions
        .values()
        .flat_map(|e| e.teams.iter())
        .filter(|t| filter.admits(t))
        .map(|t| t.university.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
