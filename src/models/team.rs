//! Team entry and final standing models.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Final standing of a team within one edition.
///
/// Sources sometimes carry a non-numeric position (honorable mentions,
/// blanks). Those become `Unranked`, which orders after every ranked value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Position {
    Ranked(u32),
    #[default]
    Unranked,
}

impl Position {
    /// Parse a textual position. Anything that is not a positive integer is unranked.
    pub fn parse(s: &str) -> Self {
        match s.trim().parse::<u32>() {
            Ok(n) if n > 0 => Position::Ranked(n),
            _ => Position::Unranked,
        }
    }

    /// Interpret a raw JSON value as a position.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Number(n) => match n.as_u64() {
                Some(v) if v > 0 && v <= u64::from(u32::MAX) => Position::Ranked(v as u32),
                _ => Position::Unranked,
            },
            serde_json::Value::String(s) => Position::parse(s),
            _ => Position::Unranked,
        }
    }

    /// Numeric rank, if any.
    pub fn rank(&self) -> Option<u32> {
        match self {
            Position::Ranked(n) => Some(*n),
            Position::Unranked => None,
        }
    }

    pub fn is_ranked(&self) -> bool {
        matches!(self, Position::Ranked(_))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Ranked(n) => write!(f, "{}", n),
            Position::Unranked => write!(f, "-"),
        }
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Position::Ranked(n) => serializer.serialize_u32(*n),
            Position::Unranked => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Position::from_json(&value))
    }
}

/// Solved counts arrive either as numbers or numeric strings.
fn solved_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    match &value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| de::Error::custom(format!("invalid solved count: {}", value))),
        serde_json::Value::String(s) => s
            .trim()
            .parse::<u32>()
            .map_err(|_| de::Error::custom(format!("invalid solved count: {:?}", s))),
        other => Err(de::Error::custom(format!("invalid solved count: {}", other))),
    }
}

/// One university's entry in one edition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// University name, taken literally (no normalization across spellings)
    pub university: String,

    /// Country code
    pub country: String,

    /// Roster for this edition
    #[serde(default)]
    pub players: BTreeSet<String>,

    /// Problems solved
    #[serde(deserialize_with = "solved_count")]
    pub solved: u32,

    /// Final standing over the full field
    #[serde(default)]
    pub position: Position,
}

impl Team {
    /// Create a new Team with an empty roster and no standing.
    pub fn new(university: impl Into<String>, country: impl Into<String>, solved: u32) -> Self {
        Self {
            university: university.into(),
            country: country.into(),
            players: BTreeSet::new(),
            solved,
            position: Position::Unranked,
        }
    }

    /// Builder method to set the final position.
    pub fn with_position(mut self, position: u32) -> Self {
        self.position = Position::Ranked(position);
        self
    }

    /// Builder method to set the roster.
    pub fn with_players<I, S>(mut self, players: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.players = players.into_iter().map(Into::into).collect();
        self
    }
}
