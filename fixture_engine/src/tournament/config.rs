//! Tournament configuration.

use crate::config::EngineConfig;
use crate::errors::{EngineError, EngineResult};
use crate::participants::{GroupingRules, SeedingMethod};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tournament format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TournamentFormat {
    SingleElimination,
    DoubleElimination,
    /// Everyone plays everyone, once or twice (home and away)
    RoundRobin { legs: u8 },
    /// Round robin inside each group
    GroupStage { groups: usize },
    /// One adaptive round at a time
    Swiss { rounds: u32 },
}

impl TournamentFormat {
    /// Parse a format label, filling omitted counts from the engine defaults
    ///
    /// Accepted labels: `single_elimination` (`knockout`), `double_elimination`,
    /// `round_robin` (`single_round_robin`), `double_round_robin`,
    /// `group_stage` (`group_knockout`) and `swiss`. Round robin, group stage and
    /// Swiss take an optional `:N` suffix for legs, groups or rounds.
    pub fn parse_with(label: &str, defaults: &EngineConfig) -> EngineResult<Self> {
        let normalized = label.trim().to_lowercase();
        let (name, count) = match normalized.split_once(':') {
            Some((name, count)) => {
                let count: u32 = count
                    .trim()
                    .parse()
                    .map_err(|_| EngineError::UnsupportedFormat(label.to_string()))?;
                (name.trim().to_string(), Some(count))
            }
            None => (normalized, None),
        };

        let format = match (name.as_str(), count) {
            ("single_elimination" | "knockout", None) => Self::SingleElimination,
            ("double_elimination", None) => Self::DoubleElimination,
            ("round_robin" | "single_round_robin", None) => Self::RoundRobin { legs: 1 },
            ("round_robin", Some(legs @ 1..=2)) => Self::RoundRobin { legs: legs as u8 },
            ("double_round_robin", None) => Self::RoundRobin { legs: 2 },
            ("group_stage" | "group_knockout", None) => Self::GroupStage {
                groups: defaults.default_group_count,
            },
            ("group_stage" | "group_knockout", Some(groups)) if groups > 0 => Self::GroupStage {
                groups: groups as usize,
            },
            ("swiss", None) => Self::Swiss {
                rounds: defaults.default_swiss_rounds,
            },
            ("swiss", Some(rounds)) if rounds > 0 => Self::Swiss { rounds },
            _ => return Err(EngineError::UnsupportedFormat(label.to_string())),
        };

        Ok(format)
    }

    /// Elimination formats built as a linked bracket
    pub fn is_bracket(&self) -> bool {
        matches!(self, Self::SingleElimination | Self::DoubleElimination)
    }

    /// Formats ranked by a standings table
    pub fn tracks_standings(&self) -> bool {
        !self.is_bracket()
    }
}

impl FromStr for TournamentFormat {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_with(s, &EngineConfig::default())
    }
}

impl fmt::Display for TournamentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SingleElimination => write!(f, "single_elimination"),
            Self::DoubleElimination => write!(f, "double_elimination"),
            Self::RoundRobin { legs } => write!(f, "round_robin:{legs}"),
            Self::GroupStage { groups } => write!(f, "group_stage:{groups}"),
            Self::Swiss { rounds } => write!(f, "swiss:{rounds}"),
        }
    }
}

/// Points awarded per result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub win: i32,
    pub draw: i32,
    pub loss: i32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            win: 3,
            draw: 1,
            loss: 0,
        }
    }
}

/// Competition configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentConfig {
    /// Competition name
    pub name: String,
    pub format: TournamentFormat,
    /// Scoring weights (engine default when absent)
    #[serde(default)]
    pub scoring: Option<ScoringWeights>,
    /// Ordering used for bracket placement
    #[serde(default)]
    pub seeding: SeedingMethod,
    /// Group allocation rules for group stages
    #[serde(default)]
    pub grouping: GroupingRules,
    /// Venue fields, in assignment order
    #[serde(default)]
    pub venue_fields: Vec<String>,
    /// Available start times, in assignment order
    #[serde(default)]
    pub time_slots: Vec<DateTime<Utc>>,
    /// Event start date, used to synthesize slots when none are given
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

impl TournamentConfig {
    pub fn new(name: impl Into<String>, format: TournamentFormat) -> Self {
        Self {
            name: name.into(),
            format,
            scoring: None,
            seeding: SeedingMethod::default(),
            grouping: GroupingRules::default(),
            venue_fields: Vec::new(),
            time_slots: Vec::new(),
            start_date: None,
        }
    }

    pub fn with_scoring(mut self, scoring: ScoringWeights) -> Self {
        self.scoring = Some(scoring);
        self
    }

    pub fn with_seeding(mut self, seeding: SeedingMethod) -> Self {
        self.seeding = seeding;
        self
    }

    pub fn with_grouping(mut self, grouping: GroupingRules) -> Self {
        self.grouping = grouping;
        self
    }

    pub fn with_fields(mut self, fields: Vec<String>) -> Self {
        self.venue_fields = fields;
        self
    }

    pub fn with_time_slots(mut self, slots: Vec<DateTime<Utc>>) -> Self {
        self.time_slots = slots;
        self
    }

    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    /// Effective scoring weights
    pub fn scoring_or(&self, defaults: &EngineConfig) -> ScoringWeights {
        self.scoring.unwrap_or(defaults.default_scoring)
    }

    /// Validate the configuration
    pub fn validate(&self) -> EngineResult<()> {
        match self.format {
            TournamentFormat::RoundRobin { legs } if !(1..=2).contains(&legs) => {
                return Err(EngineError::InvalidConfig(format!(
                    "round robin must have 1 or 2 legs, got {legs}"
                )));
            }
            TournamentFormat::GroupStage { groups: 0 } => {
                return Err(EngineError::InvalidConfig(
                    "group stage needs at least one group".to_string(),
                ));
            }
            TournamentFormat::Swiss { rounds: 0 } => {
                return Err(EngineError::InvalidConfig(
                    "swiss needs at least one round".to_string(),
                ));
            }
            _ => {}
        }

        if self.venue_fields.iter().any(|field| field.trim().is_empty()) {
            return Err(EngineError::InvalidConfig(
                "venue field names must not be blank".to_string(),
            ));
        }

        Ok(())
    }
}
