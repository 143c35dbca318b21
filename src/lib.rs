//! # Finals Stats
//!
//! Rankings, medal tables and participation statistics for the finals of a
//! collegiate programming contest, computed from a single JSON dataset.
//!
//! ## Architecture
//!
//! - **models**: Dataset types (editions, teams, regions) and result rows
//! - **storage**: Loading the dataset document from disk
//! - **calculate**: Pure ranking and aggregation functions
//! - **api**: Read-only REST API for a rendering front end
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod models;
pub mod storage;

pub use models::*;
