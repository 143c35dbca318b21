//! Accumulated solved problems per university.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Editions, RegionFilter};
use crate::models::AccumulatedSolved;

/// Accumulated totals, one row per university, in name order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccumulatedRanking {
    pub rows: Vec<AccumulatedSolved>,
}

impl AccumulatedRanking {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Rows by total solved problems, best first.
    pub fn by_solved(&self, limit: Option<usize>) -> Vec<AccumulatedSolved> {
        self.ranked(limit, |a, b| b.solved.cmp(&a.solved))
    }

    /// Rows by share of available problems solved, best first.
    pub fn by_percent(&self, limit: Option<usize>) -> Vec<AccumulatedSolved> {
        self.ranked(limit, |a, b| {
            b.percent.partial_cmp(&a.percent).unwrap_or(Ordering::Equal)
        })
    }

    fn ranked<F>(&self, limit: Option<usize>, order: F) -> Vec<AccumulatedSolved>
    where
        F: Fn(&AccumulatedSolved, &AccumulatedSolved) -> Ordering,
    {
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| order(a, b).then_with(|| a.university.cmp(&b.university)));
        if let Some(limit) = limit {
            rows.truncate(limit);
        }
        rows
    }
}

/// Sum solved problems and available problems per university.
///
/// Every admitted team adds its solved count and the problem count of its
/// edition. A university fielding two teams in one edition counts that
/// edition's problems twice.
pub fn accumulate_solved(editions: &Editions, filter: &RegionFilter) -> AccumulatedRanking {
    let mut totals: BTreeMap<&str, (u32, u32)> = BTreeMap::new();

    for edition in editions.values() {
        for team in edition.teams.iter().filter(|t| filter.admits(t)) {
            let entry = totals.entry(team.university.as_str()).or_default();
            entry.0 += team.solved;
            entry.1 += edition.problem_count;
        }
    }

    let rows: Vec<AccumulatedSolved> = totals
        .into_iter()
        .map(|(university, (solved, available))| AccumulatedSolved {
            university: university.to_string(),
            solved,
            available,
            percent: if available == 0 {
                0.0
            } else {
                f64::from(solved) * 100.0 / f64::from(available)
            },
        })
        .collect();

    debug!("Accumulated solved problems for {} universities", rows.len());
    AccumulatedRanking { rows }
}
