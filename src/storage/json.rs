//! JSON dataset reader.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::{debug, info, warn};

use super::StorageError;
use crate::models::{Country, Dataset, Edition, Region, Team};

/// Per-edition metadata section.
#[derive(Debug, Default, Deserialize)]
struct RawEditionStats {
    #[serde(default)]
    problems: Vec<serde_json::Value>,
}

/// The document as stored on disk.
#[derive(Debug, Deserialize)]
struct RawDocument {
    contests: BTreeMap<String, Vec<Team>>,

    #[serde(default)]
    regions: BTreeMap<String, Region>,

    #[serde(default)]
    countries: BTreeMap<String, Country>,

    #[serde(default)]
    stats: BTreeMap<String, RawEditionStats>,
}

/// Reads the dataset document from a file.
pub struct DatasetReader {
    path: PathBuf,
}

impl DatasetReader {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read and validate the whole dataset.
    pub fn read(&self) -> Result<Dataset, StorageError> {
        if !self.path.exists() {
            return Err(StorageError::PathNotFound(self.path.clone()));
        }

        let contents = fs::read_to_string(&self.path)?;
        let dataset = parse_dataset(&contents)?;

        info!(
            "Loaded {} editions ({} teams) from {:?}",
            dataset.editions().len(),
            dataset.team_count(),
            self.path
        );
        Ok(dataset)
    }
}

fn parse_year(key: &str) -> Result<u16, StorageError> {
    key.trim()
        .parse::<u16>()
        .map_err(|_| StorageError::InvalidDocument(format!("bad year key '{}'", key)))
}

/// Parse a dataset document from a JSON string.
pub fn parse_dataset(contents: &str) -> Result<Dataset, StorageError> {
    let raw: RawDocument = serde_json::from_str(contents)?;

    let mut problem_counts: BTreeMap<u16, u32> = BTreeMap::new();
    for (key, stats) in &raw.stats {
        problem_counts.insert(parse_year(key)?, stats.problems.len() as u32);
    }

    let mut editions = BTreeMap::new();
    let mut unranked = 0usize;
    let mut unknown_countries = 0usize;

    for (key, teams) in raw.contests {
        let year = parse_year(&key)?;
        if editions.contains_key(&year) {
            return Err(StorageError::InvalidDocument(format!(
                "duplicate edition {}",
                year
            )));
        }

        unranked += teams.iter().filter(|t| !t.position.is_ranked()).count();
        unknown_countries += teams
            .iter()
            .filter(|t| !raw.countries.contains_key(&t.country))
            .count();

        let problem_count = match problem_counts.get(&year) {
            Some(count) => *count,
            None => {
                debug!("No problem statistics for edition {}", year);
                0
            }
        };

        editions.insert(year, Edition::new(year, teams, problem_count));
    }

    if unranked > 0 {
        warn!(
            "{} team(s) have a non-numeric position and will rank last",
            unranked
        );
    }
    if unknown_countries > 0 {
        warn!(
            "{} team(s) reference a country missing from the countries section",
            unknown_countries
        );
    }

    Ok(Dataset::new(editions, raw.regions, raw.countries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Position;
    use tempfile::TempDir;

    const DOC: &str = r#"{
        "contests": {
            "2012": [
                {"university": "A", "country": "X", "players": ["a1", "a2"], "solved": 5, "position": 1},
                {"university": "B", "country": "Y", "players": ["b1"], "solved": "3", "position": "2"},
                {"university": "C", "country": "Y", "players": [], "solved": 0, "position": "HM"}
            ],
            "2013": []
        },
        "regions": {
            "r1": {"spanish_name": "Norteamérica", "name": "North America"},
            "r2": {"spanish_name": "Latinoamérica"}
        },
        "countries": {
            "X": {"region": "r1"},
            "Y": {"region": "r2", "name": "Cuba"}
        },
        "stats": {
            "2012": {"problems": ["A", "B", "C", "D"]}
        }
    }"#;

    #[test]
    fn test_parse_dataset() {
        let dataset = parse_dataset(DOC).unwrap();

        assert_eq!(dataset.editions().len(), 2);
        let e2012 = dataset.edition(2012).unwrap();
        assert_eq!(e2012.problem_count, 4);
        assert_eq!(e2012.teams.len(), 3);
        assert_eq!(e2012.teams[1].solved, 3);
        assert_eq!(e2012.teams[1].position, Position::Ranked(2));
        assert_eq!(e2012.teams[2].position, Position::Unranked);

        // Missing stats default to zero problems
        assert_eq!(dataset.edition(2013).unwrap().problem_count, 0);

        assert_eq!(dataset.regions()["r1"].spanish_name, "Norteamérica");
        assert_eq!(dataset.country_region("Y"), Some("r2"));
    }

    #[test]
    fn test_parse_dataset_preserves_team_order() {
        let dataset = parse_dataset(DOC).unwrap();
        let names: Vec<_> = dataset.edition(2012).unwrap().teams.iter().map(|t| t.university.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_parse_dataset_bad_year() {
        let doc = r#"{"contests": {"twenty": []}}"#;
        let err = parse_dataset(doc).unwrap_err();
        assert!(matches!(err, StorageError::InvalidDocument(_)));
    }

    #[test]
    fn test_parse_dataset_duplicate_year() {
        let doc = r#"{"contests": {"2012": [], " 2012": []}}"#;
        let err = parse_dataset(doc).unwrap_err();
        assert!(matches!(err, StorageError::InvalidDocument(_)));
    }

    #[test]
    fn test_parse_dataset_invalid_json() {
        let err = parse_dataset("{not json").unwrap_err();
        assert!(matches!(err, StorageError::Json(_)));
    }

    #[test]
    fn test_reader_roundtrip_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.json");
        std::fs::write(&path, DOC).unwrap();

        let reader = DatasetReader::new(path);
        assert!(reader.exists());
        let dataset = reader.read().unwrap();
        assert_eq!(dataset.first_year(), Some(2012));
        assert_eq!(dataset.last_year(), Some(2013));
    }

    #[test]
    fn test_reader_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let reader = DatasetReader::new(temp_dir.path().join("missing.json"));

        assert!(!reader.exists());
        assert!(matches!(reader.read(), Err(StorageError::PathNotFound(_))));
    }
}
