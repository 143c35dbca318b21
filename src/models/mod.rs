//! Core data models: the contest dataset and the tables derived from it.

mod dataset;
mod graph;
mod standings;
mod stats;
mod team;

pub use dataset::*;
pub use graph::*;
pub use standings::*;
pub use stats::*;
pub use team::*;
