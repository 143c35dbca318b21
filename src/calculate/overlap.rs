//! Roster overlap between the editions a university attended.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::Editions;
use crate::models::{OverlapEdge, OverlapGraph, YearNode, GRAPH_FIRST_YEAR, GRAPH_LAST_YEAR};

pub type Rosters = BTreeMap<u16, BTreeSet<String>>;

/// Players fielded by `university` per edition.
///
/// A university with several teams in one edition gets the union of their
/// rosters. Editions it did not attend are absent from the map.
pub fn university_rosters(editions: &Editions, university: &str) -> Rosters {
    let mut rosters = Rosters::new();
    for (year, edition) in editions {
        for team in edition.teams.iter().filter(|t| t.university == university) {
            rosters
                .entry(*year)
                .or_default()
                .extend(team.players.iter().cloned());
        }
    }
    rosters
}

/// Build the overlap graph of one university over the fixed year axis.
///
/// Every year of the axis gets a node, filled when the university attended.
/// Each pair of attended years `y1 < y2` whose rosters share at least one
/// player gets an edge labeled with the number of shared players. Years
/// outside the axis are ignored.
pub fn build_overlap_graph(university: &str, rosters: &Rosters) -> OverlapGraph {
    let axis = GRAPH_FIRST_YEAR..=GRAPH_LAST_YEAR;

    let nodes: Vec<YearNode> = axis
        .clone()
        .map(|year| YearNode {
            year,
            participated: rosters.contains_key(&year),
        })
        .collect();

    let layout_edges = nodes.windows(2).map(|w| (w[0].year, w[1].year)).collect();

    let attended: Vec<(u16, &BTreeSet<String>)> = rosters
        .iter()
        .filter(|(year, _)| axis.contains(*year))
        .map(|(year, roster)| (*year, roster))
        .collect();

    let mut edges = Vec::new();
    for (i, (from, first)) in attended.iter().enumerate() {
        for (to, second) in &attended[i + 1..] {
            let shared = first.intersection(second).count() as u32;
            if shared > 0 {
                edges.push(OverlapEdge {
                    from: *from,
                    to: *to,
                    shared,
                });
            }
        }
    }

    debug!(
        "Overlap graph for {}: {} attended years, {} edges",
        university,
        attended.len(),
        edges.len()
    );

    OverlapGraph {
        university: university.to_string(),
        nodes,
        layout_edges,
        edges,
    }
}
