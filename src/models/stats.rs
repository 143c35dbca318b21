//! Derived statistics models.

use serde::{Deserialize, Serialize};

/// Participation count for one country or university.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipationRow {
    pub name: String,
    pub count: u32,
}

/// Per-university participation with the country it represents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniversityParticipation {
    /// Distinct editions with at least one team
    pub count: u32,

    /// Country of the most recent team seen
    pub country: String,
}

/// Number of distinct finalist universities of a country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalistRow {
    pub country: String,
    pub universities: u32,
}

/// Roster repetition statistics for one university.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamOverlap {
    /// Distinct player identifiers seen so far
    pub distinct_players: u32,

    /// Teams fielded
    pub team_count: u32,

    /// Teams with at least one previously seen player
    pub repeated_team_count: u32,

    /// Player slots filled by a previously seen player
    pub repeated_player_count: u32,
}

impl TeamOverlap {
    /// Share of teams with a returning member, in percent.
    pub fn repeated_team_percent(&self) -> f64 {
        if self.team_count == 0 {
            0.0
        } else {
            self.repeated_team_count as f64 * 100.0 / self.team_count as f64
        }
    }

    /// Returning player slots relative to distinct players, in percent.
    pub fn repeated_player_percent(&self) -> f64 {
        if self.distinct_players == 0 {
            0.0
        } else {
            self.repeated_player_count as f64 * 100.0 / self.distinct_players as f64
        }
    }
}

/// Which repetition figure to rank universities by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RepeatMetric {
    #[default]
    RepeatedTeams,
    RepeatedTeamsPercent,
    RepeatedPlayers,
    RepeatedPlayersPercent,
}

impl RepeatMetric {
    pub fn value(&self, overlap: &TeamOverlap) -> f64 {
        match self {
            RepeatMetric::RepeatedTeams => overlap.repeated_team_count as f64,
            RepeatMetric::RepeatedTeamsPercent => overlap.repeated_team_percent(),
            RepeatMetric::RepeatedPlayers => overlap.repeated_player_count as f64,
            RepeatMetric::RepeatedPlayersPercent => overlap.repeated_player_percent(),
        }
    }
}

impl std::str::FromStr for RepeatMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "teams" | "repeated_teams" => Ok(RepeatMetric::RepeatedTeams),
            "teams_percent" | "repeated_teams_percent" => Ok(RepeatMetric::RepeatedTeamsPercent),
            "players" | "repeated_players" => Ok(RepeatMetric::RepeatedPlayers),
            "players_percent" | "repeated_players_percent" => {
                Ok(RepeatMetric::RepeatedPlayersPercent)
            }
            other => Err(format!(
                "unknown metric '{}' (expected: teams, teams_percent, players, players_percent)",
                other
            )),
        }
    }
}

/// A university ranked by one repetition metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepeatRow {
    pub university: String,
    pub value: f64,
}

/// Summary of solved counts over one edition's qualifying teams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveStats {
    pub year: u16,
    pub min: u32,
    pub max: u32,
    /// Most frequent value; smallest wins ties
    pub mode: u32,
    pub mean: f64,
    /// Rounded half-to-even when the field size is even
    pub median: u32,
}

/// Field-size banding of one edition's standings.
///
/// These are positions in the standings, not quantiles of solved counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuartileBoundaries {
    pub year: u16,
    pub q1_rank: u32,
    pub q2_rank: u32,
    pub q3_rank: u32,
    /// Field size
    pub q4_rank: u32,
}

/// Solved count at the top of each standings band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuartileSolved {
    pub year: u16,
    pub q1: u32,
    pub q2: u32,
    pub q3: u32,
    pub q4: u32,
}

/// Place and solved series for one entity, aligned with the queried editions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySeries {
    pub place: Vec<Option<u32>>,
    pub solved: Vec<Option<u32>>,
}

/// Accumulated solved problems for one university.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccumulatedSolved {
    pub university: String,
    pub solved: u32,
    /// Problems set in every edition the university took part in, per team
    pub available: u32,
    pub percent: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_overlap_percentages() {
        let overlap = TeamOverlap {
            distinct_players: 8,
            team_count: 4,
            repeated_team_count: 1,
            repeated_player_count: 2,
        };

        assert!((overlap.repeated_team_percent() - 25.0).abs() < 1e-9);
        assert!((overlap.repeated_player_percent() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_team_overlap_zero_division() {
        let overlap = TeamOverlap::default();
        assert_eq!(overlap.repeated_team_percent(), 0.0);
        assert_eq!(overlap.repeated_player_percent(), 0.0);
    }

    #[test]
    fn test_repeat_metric_from_str() {
        assert_eq!(
            "teams".parse::<RepeatMetric>().unwrap(),
            RepeatMetric::RepeatedTeams
        );
        assert_eq!(
            "Players_Percent".parse::<RepeatMetric>().unwrap(),
            RepeatMetric::RepeatedPlayersPercent
        );
        assert!("bogus".parse::<RepeatMetric>().is_err());
    }

    #[test]
    fn test_repeat_metric_value() {
        let overlap = TeamOverlap {
            distinct_players: 10,
            team_count: 5,
            repeated_team_count: 2,
            repeated_player_count: 3,
        };
        assert_eq!(RepeatMetric::RepeatedTeams.value(&overlap), 2.0);
        assert_eq!(RepeatMetric::RepeatedPlayers.value(&overlap), 3.0);
        assert!((RepeatMetric::RepeatedTeamsPercent.value(&overlap) - 40.0).abs() < 1e-9);
        assert!((RepeatMetric::RepeatedPlayersPercent.value(&overlap) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_series_serialization_keeps_nulls() {
        let series = EntitySeries {
            place: vec![Some(3), None],
            solved: vec![Some(7), None],
        };
        let json = serde_json::to_string(&series).unwrap();
        assert_eq!(json, r#"{"place":[3,null],"solved":[7,null]}"#);
    }
}
