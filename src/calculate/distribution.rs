//! Solved-count statistics, standings bands and per-entity series.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::debug;

use super::{standings, Editions, EntityKind, RegionFilter, Standing};
use crate::models::{Edition, EntitySeries, QuartileBoundaries, QuartileSolved, SolveStats};

/// Standings where every admitted team has a place.
///
/// Teams without a stored position are numbered after the ranked field, in
/// source order. This matches the ordinal a restricted filter assigns them.
fn numbered_standings<'a>(edition: &'a Edition, filter: &RegionFilter) -> Vec<Standing<'a>> {
    let mut rows = standings(edition, filter);
    let ranked = rows.iter().filter(|s| s.place.is_some()).count() as u32;
    for (standing, place) in rows
        .iter_mut()
        .filter(|s| s.place.is_none())
        .zip(ranked + 1..)
    {
        standing.place = Some(place);
    }
    rows
}

fn admitted_solved(edition: &Edition, filter: &RegionFilter) -> Vec<u32> {
    edition
        .teams
        .iter()
        .filter(|t| filter.admits(t))
        .map(|t| t.solved)
        .collect()
}

/// Most frequent value of a sorted slice; the smallest value wins ties.
fn mode(sorted: &[u32]) -> Option<u32> {
    let mut best: Option<(u32, usize)> = None;
    let mut i = 0;
    while i < sorted.len() {
        let value = sorted[i];
        let run = sorted[i..].iter().take_while(|v| **v == value).count();
        if best.map_or(true, |(_, count)| run > count) {
            best = Some((value, run));
        }
        i += run;
    }
    best.map(|(value, _)| value)
}

/// Median of a sorted slice. Even-sized input averages the middle pair and
/// rounds half to even.
fn median_rounded(sorted: &[u32]) -> Option<u32> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    if n % 2 == 1 {
        return Some(sorted[n / 2]);
    }

    let sum = u64::from(sorted[n / 2 - 1]) + u64::from(sorted[n / 2]);
    let half = sum / 2;
    let rounded = if sum % 2 == 0 || half % 2 == 0 {
        half
    } else {
        half + 1
    };
    Some(rounded as u32)
}

fn summarize(year: u16, mut values: Vec<u32>) -> Option<SolveStats> {
    values.sort_unstable();
    let min = *values.first()?;
    let max = *values.last()?;
    let sum: u64 = values.iter().map(|v| u64::from(*v)).sum();

    Some(SolveStats {
        year,
        min,
        max,
        mode: mode(&values)?,
        mean: sum as f64 / values.len() as f64,
        median: median_rounded(&values)?,
    })
}

/// Min/max/mode/mean/median of solved counts per edition.
///
/// Editions without any admitted team produce no row, so the output can be
/// shorter than the period.
pub fn per_edition_solve_stats(editions: &Editions, filter: &RegionFilter) -> Vec<SolveStats> {
    let rows: Vec<SolveStats> = editions
        .iter()
        .filter_map(|(year, edition)| summarize(*year, admitted_solved(edition, filter)))
        .collect();

    debug!(
        "Solve stats for {} of {} editions",
        rows.len(),
        editions.len()
    );
    rows
}

/// Field-size standings bands per edition: `floor(n/4)`, `floor(n/2)`,
/// `floor(3n/4)` and `n`, where `n` is the number of admitted teams.
pub fn quartile_boundaries(editions: &Editions, filter: &RegionFilter) -> Vec<QuartileBoundaries> {
    editions
        .iter()
        .map(|(year, edition)| {
            let n = edition.teams.iter().filter(|t| filter.admits(t)).count() as u32;
            QuartileBoundaries {
                year: *year,
                q1_rank: n / 4,
                q2_rank: n / 2,
                q3_rank: n * 3 / 4,
                q4_rank: n,
            }
        })
        .collect()
}

/// Solved count at the top of each standings band.
///
/// Bands start at positions `1`, `q1+1`, `q2+1` and `q3+1` over the admitted
/// solved counts sorted from best to worst. Positions past the field size are
/// clamped to the last team. Editions without admitted teams are skipped.
pub fn quartile_solved_values(editions: &Editions, filter: &RegionFilter) -> Vec<QuartileSolved> {
    editions
        .iter()
        .filter_map(|(year, edition)| {
            let mut solved = admitted_solved(edition, filter);
            if solved.is_empty() {
                return None;
            }
            solved.sort_unstable_by(|a, b| b.cmp(a));

            let n = solved.len();
            let at = |position: usize| solved[position.clamp(1, n) - 1];
            Some(QuartileSolved {
                year: *year,
                q1: at(1),
                q2: at(n / 4 + 1),
                q3: at(n / 2 + 1),
                q4: at(n * 3 / 4 + 1),
            })
        })
        .collect()
}

/// Place and solved series for the selected entities, one slot per edition.
///
/// An entity missing from an edition (or filtered out) gets `None` in both
/// series for that slot. A present team without a stored position is placed
/// after the ranked field. When an entity has several admitted teams in one
/// edition its best-placed team is used. Entities absent from the whole
/// period are left out of the result.
pub fn per_entity_place_and_solved_series<S: AsRef<str>>(
    editions: &Editions,
    entities: &[S],
    kind: EntityKind,
    filter: &RegionFilter,
) -> BTreeMap<String, EntitySeries> {
    let wanted: HashSet<&str> = entities.iter().map(|e| e.as_ref()).collect();
    let mut series: BTreeMap<String, EntitySeries> = wanted
        .iter()
        .map(|e| (e.to_string(), EntitySeries::default()))
        .collect();

    for edition in editions.values() {
        let mut best: HashMap<&str, Standing> = HashMap::new();
        for standing in numbered_standings(edition, filter) {
            let key = kind.key(standing.team);
            if !wanted.contains(key) {
                continue;
            }
            let better = match best.get(key) {
                Some(current) => {
                    standing.place.unwrap_or(u32::MAX) < current.place.unwrap_or(u32::MAX)
                }
                None => true,
            };
            if better {
                best.insert(key, standing);
            }
        }

        for (entity, s) in series.iter_mut() {
            match best.get(entity.as_str()) {
                Some(standing) => {
                    s.place.push(standing.place);
                    s.solved.push(Some(standing.team.solved));
                }
                None => {
                    s.place.push(None);
                    s.solved.push(None);
                }
            }
        }
    }

    series.retain(|_, s| s.solved.iter().any(Option::is_some));
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Country, Dataset, Edition, Region, Team};
    use pretty_assertions::assert_eq;

    fn dataset(editions: Vec<Edition>) -> Dataset {
        let mut regions = BTreeMap::new();
        regions.insert(
            "a".to_string(),
            Region {
                spanish_name: "Asia".to_string(),
                name: None,
            },
        );
        regions.insert(
            "e".to_string(),
            Region {
                spanish_name: "Europa".to_string(),
                name: None,
            },
        );
        let mut countries = BTreeMap::new();
        for (code, region) in [("CN", "a"), ("JP", "a"), ("RU", "e")] {
            countries.insert(
                code.to_string(),
                Country {
                    region: region.to_string(),
                    name: None,
                },
            );
        }
        let editions = editions.into_iter().map(|e| (e.year, e)).collect();
        Dataset::new(editions, regions, countries)
    }

    fn field(year: u16, entries: &[(&str, &str, u32, u32)]) -> Edition {
        let teams = entries
            .iter()
            .map(|(u, c, solved, pos)| Team::new(*u, *c, *solved).with_position(*pos))
            .collect();
        Edition::new(year, teams, 12)
    }

    #[test]
    fn test_mode_smallest_on_tie() {
        assert_eq!(mode(&[1, 2, 2, 3, 3]), Some(2));
        assert_eq!(mode(&[4, 4, 5]), Some(4));
        assert_eq!(mode(&[7]), Some(7));
        assert_eq!(mode(&[]), None);
    }

    #[test]
    fn test_median_rounded() {
        assert_eq!(median_rounded(&[1, 2, 3]), Some(2));
        assert_eq!(median_rounded(&[1, 3]), Some(2));
        // 2.5 rounds to 2, 3.5 rounds to 4
        assert_eq!(median_rounded(&[2, 3]), Some(2));
        assert_eq!(median_rounded(&[3, 4]), Some(4));
        assert_eq!(median_rounded(&[]), None);
    }

    #[test]
    fn test_per_edition_solve_stats() {
        let data = dataset(vec![field(
            2015,
            &[
                ("A", "CN", 10, 1),
                ("B", "JP", 8, 2),
                ("C", "RU", 8, 3),
                ("D", "RU", 3, 4),
            ],
        )]);
        let editions = data.filter_by_period(2015, 2015);

        let stats = per_edition_solve_stats(&editions, &RegionFilter::All);
        assert_eq!(stats.len(), 1);
        let s = &stats[0];
        assert_eq!(s.year, 2015);
        assert_eq!(s.min, 3);
        assert_eq!(s.max, 10);
        assert_eq!(s.mode, 8);
        assert!((s.mean - 7.25).abs() < 1e-9);
        assert_eq!(s.median, 8);
    }

    #[test]
    fn test_solve_stats_skip_empty_editions() {
        let data = dataset(vec![
            field(2015, &[("A", "CN", 10, 1)]),
            field(2016, &[("R", "RU", 4, 1)]),
            field(2017, &[("B", "JP", 6, 1)]),
        ]);
        let editions = data.filter_by_period(2015, 2017);
        let asia = RegionFilter::resolve(&data, &["Asia"]);

        let stats = per_edition_solve_stats(&editions, &asia);
        let years: Vec<_> = stats.iter().map(|s| s.year).collect();
        assert_eq!(years, vec![2015, 2017]);
    }

    #[test]
    fn test_quartile_boundaries() {
        let entries: Vec<(String, u32)> = (1..=10).map(|i| (format!("U{}", i), i)).collect();
        let teams: Vec<(&str, &str, u32, u32)> = entries
            .iter()
            .map(|(u, i)| (u.as_str(), "CN", 20 - *i, *i))
            .collect();
        let data = dataset(vec![field(2018, &teams), field(2019, &[])]);
        let editions = data.filter_by_period(2018, 2019);

        let bands = quartile_boundaries(&editions, &RegionFilter::All);
        assert_eq!(
            bands,
            vec![
                QuartileBoundaries {
                    year: 2018,
                    q1_rank: 2,
                    q2_rank: 5,
                    q3_rank: 7,
                    q4_rank: 10,
                },
                QuartileBoundaries {
                    year: 2019,
                    q1_rank: 0,
                    q2_rank: 0,
                    q3_rank: 0,
                    q4_rank: 0,
                },
            ]
        );
    }

    #[test]
    fn test_quartile_solved_values() {
        let solved = [12u32, 11, 9, 9, 7, 6, 5, 3];
        let names: Vec<String> = (0..solved.len()).map(|i| format!("U{}", i)).collect();
        let teams: Vec<(&str, &str, u32, u32)> = names
            .iter()
            .zip(solved.iter())
            .enumerate()
            .map(|(i, (u, s))| (u.as_str(), "JP", *s, i as u32 + 1))
            .collect();
        let data = dataset(vec![field(2020, &teams)]);
        let editions = data.filter_by_period(2020, 2020);

        let values = quartile_solved_values(&editions, &RegionFilter::All);
        // n = 8: bands start at positions 1, 3, 5, 7
        assert_eq!(
            values,
            vec![QuartileSolved {
                year: 2020,
                q1: 12,
                q2: 9,
                q3: 7,
                q4: 5,
            }]
        );
    }

    #[test]
    fn test_quartile_solved_values_tiny_field() {
        let data = dataset(vec![field(2021, &[("A", "CN", 4, 1)]), field(2022, &[])]);
        let editions = data.filter_by_period(2021, 2022);

        let values = quartile_solved_values(&editions, &RegionFilter::All);
        assert_eq!(values.len(), 1);
        assert_eq!((values[0].q1, values[0].q4), (4, 4));
    }

    #[test]
    fn test_series_dense_with_nulls() {
        let data = dataset(vec![
            field(2010, &[("A", "CN", 5, 1), ("B", "RU", 4, 2)]),
            field(2011, &[("B", "RU", 6, 1)]),
            field(2012, &[("B", "RU", 2, 3), ("C", "JP", 3, 2), ("A", "CN", 7, 1)]),
        ]);
        let editions = data.filter_by_period(2010, 2012);

        let series = per_entity_place_and_solved_series(
            &editions,
            &["A", "B"],
            EntityKind::University,
            &RegionFilter::All,
        );

        assert_eq!(series["A"].place, vec![Some(1), None, Some(1)]);
        assert_eq!(series["A"].solved, vec![Some(5), None, Some(7)]);
        assert_eq!(series["B"].place, vec![Some(2), Some(1), Some(3)]);
        for s in series.values() {
            assert_eq!(s.place.len(), editions.len());
            assert_eq!(s.solved.len(), editions.len());
        }
    }

    #[test]
    fn test_series_region_restricted_rank() {
        let data = dataset(vec![field(
            2013,
            &[("R1", "RU", 9, 1), ("A", "CN", 8, 2), ("R2", "RU", 7, 3), ("B", "JP", 6, 4)],
        )]);
        let editions = data.filter_by_period(2013, 2013);
        let asia = RegionFilter::resolve(&data, &["Asia"]);

        let series =
            per_entity_place_and_solved_series(&editions, &["A", "B", "R1"], EntityKind::University, &asia);

        assert_eq!(series["A"].place, vec![Some(1)]);
        assert_eq!(series["B"].place, vec![Some(2)]);
        assert!(!series.contains_key("R1"));
    }

    #[test]
    fn test_series_country_uses_best_team() {
        let data = dataset(vec![field(
            2014,
            &[("A", "CN", 9, 1), ("B", "RU", 8, 2), ("C", "CN", 2, 3)],
        )]);
        let editions = data.filter_by_period(2014, 2014);

        let series =
            per_entity_place_and_solved_series(&editions, &["CN"], EntityKind::Country, &RegionFilter::All);
        assert_eq!(series["CN"].place, vec![Some(1)]);
        assert_eq!(series["CN"].solved, vec![Some(9)]);
    }

    #[test]
    fn test_series_numbers_unranked_teams() {
        let mut teams = vec![
            Team::new("A", "CN", 5).with_position(1),
            Team::new("HM", "CN", 1),
            Team::new("B", "JP", 3).with_position(2),
        ];
        teams[1].position = crate::models::Position::Unranked;
        let data = dataset(vec![Edition::new(2016, teams, 10)]);
        let editions = data.filter_by_period(2016, 2016);

        let all = per_entity_place_and_solved_series(
            &editions,
            &["HM"],
            EntityKind::University,
            &RegionFilter::All,
        );
        assert_eq!(all["HM"].place, vec![Some(3)]);
        assert_eq!(all["HM"].solved, vec![Some(1)]);

        // Same ordinal when every region is selected explicitly
        let asia = RegionFilter::resolve(&data, &["Asia"]);
        let restricted =
            per_entity_place_and_solved_series(&editions, &["HM"], EntityKind::University, &asia);
        assert_eq!(restricted, all);
    }

    #[test]
    fn test_series_omits_missing_entities() {
        let data = dataset(vec![field(2014, &[("A", "CN", 9, 1)])]);
        let editions = data.filter_by_period(2014, 2014);

        let series = per_entity_place_and_solved_series(
            &editions,
            &["Ghost"],
            EntityKind::University,
            &RegionFilter::All,
        );
        assert!(series.is_empty());
    }
}
