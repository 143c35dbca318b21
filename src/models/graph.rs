//! Roster overlap graph model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// First year drawn in an overlap graph.
pub const GRAPH_FIRST_YEAR: u16 = 2010;

/// Last year drawn in an overlap graph.
pub const GRAPH_LAST_YEAR: u16 = 2024;

/// One year node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearNode {
    pub year: u16,
    pub participated: bool,
}

/// Edge between two participated years sharing roster members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlapEdge {
    pub from: u16,
    pub to: u16,
    /// Number of shared players
    pub shared: u32,
}

/// Per-university graph over the fixed year axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlapGraph {
    pub university: String,

    /// One node per year, in order
    pub nodes: Vec<YearNode>,

    /// Consecutive-year pairs; layout only
    pub layout_edges: Vec<(u16, u16)>,

    /// Labeled edges, ordered by (from, to)
    pub edges: Vec<OverlapEdge>,
}

impl OverlapGraph {
    pub fn participated_years(&self) -> impl Iterator<Item = u16> + '_ {
        self.nodes.iter().filter(|n| n.participated).map(|n| n.year)
    }

    pub fn edge(&self, from: u16, to: u16) -> Option<&OverlapEdge> {
        self.edges.iter().find(|e| e.from == from && e.to == to)
    }

    /// Write the graph as Graphviz DOT.
    pub fn write_dot<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        writeln!(out, "digraph \"{}\" {{", escape(&self.university))?;
        writeln!(out, "  subgraph years {{")?;
        writeln!(out, "    rank=same;")?;
        for node in &self.nodes {
            if node.participated {
                writeln!(
                    out,
                    "    \"{}\" [shape=square, style=filled, fillcolor=\"#40e0d0\"];",
                    node.year
                )?;
            } else {
                writeln!(out, "    \"{}\" [shape=square];", node.year)?;
            }
        }
        for (from, to) in &self.layout_edges {
            writeln!(out, "    \"{}\" -> \"{}\" [style=invis];", from, to)?;
        }
        for edge in &self.edges {
            writeln!(
                out,
                "    \"{}\" -> \"{}\" [label=\"{}\"];",
                edge.from, edge.to, edge.shared
            )?;
        }
        writeln!(out, "  }}")?;
        writeln!(out, "}}")
    }

    /// Render as Graphviz DOT.
    pub fn to_dot(&self) -> Result<String, fmt::Error> {
        let mut out = String::new();
        self.write_dot(&mut out)?;
        Ok(out)
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
