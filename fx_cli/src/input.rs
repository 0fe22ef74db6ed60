//! Competition input file.
//!
//! A JSON document describing one competition: its settings, the organizer
//! running it, the registered field, an optional referee pool and any results
//! already known.

use anyhow::{Context, Error};
use chrono::{DateTime, NaiveDate, Utc};
use fixture_engine::participants::{GroupingRules, Participant, SeedingMethod, UserId};
use fixture_engine::scoring::ScoreEntry;
use fixture_engine::tournament::{MatchId, MatchScore, ScoringWeights, TournamentConfig, TournamentFormat};
use fixture_engine::EngineConfig;
use serde::Deserialize;
use std::path::Path;

/// Competition as read from disk
#[derive(Debug, Clone, Deserialize)]
pub struct CompetitionFile {
    pub name: String,
    /// Format label, e.g. `knockout`, `round_robin:2` or `swiss:7`
    pub format: String,
    #[serde(default)]
    pub scoring: Option<ScoringWeights>,
    #[serde(default)]
    pub seeding: SeedingMethod,
    #[serde(default)]
    pub grouping: GroupingRules,
    #[serde(default)]
    pub venue_fields: Vec<String>,
    #[serde(default)]
    pub time_slots: Vec<DateTime<Utc>>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    pub organizer: UserId,
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub referees: Vec<UserId>,
    #[serde(default)]
    pub results: Vec<ResultLine>,
}

/// A result entered by the organizer after the draw
#[derive(Debug, Clone, Deserialize)]
pub struct ResultLine {
    pub match_id: MatchId,
    pub home: u32,
    pub away: u32,
    #[serde(default)]
    pub winner: Option<UserId>,
    #[serde(default)]
    pub walkover: bool,
}

impl ResultLine {
    pub fn entry(&self) -> ScoreEntry {
        let mut score = MatchScore::new(self.home, self.away);
        if self.walkover {
            score = score.walkover();
        }
        let entry = ScoreEntry::new(score);
        match self.winner {
            Some(winner) => entry.with_winner(winner),
            None => entry,
        }
    }
}

impl CompetitionFile {
    /// Read and parse a competition file
    pub fn load(path: &Path) -> Result<Self, Error> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Build the engine configuration, optionally replacing the format label
    pub fn tournament_config(
        &self,
        format_override: Option<&str>,
        defaults: &EngineConfig,
    ) -> Result<TournamentConfig, Error> {
        let label = format_override.unwrap_or(&self.format);
        let format = TournamentFormat::parse_with(label, defaults)?;

        let mut config = TournamentConfig::new(self.name.clone(), format)
            .with_seeding(self.seeding)
            .with_grouping(self.grouping.clone())
            .with_fields(self.venue_fields.clone())
            .with_time_slots(self.time_slots.clone());
        if let Some(scoring) = self.scoring {
            config = config.with_scoring(scoring);
        }
        if let Some(date) = self.start_date {
            config = config.with_start_date(date);
        }
        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "name": "Autumn Open",
        "format": "group_stage:2",
        "seeding": "seeded",
        "venue_fields": ["Court 1", "Court 2"],
        "start_date": "2026-10-24",
        "organizer": 100,
        "participants": [
            {"id": 1, "display_name": "Ada", "skill_level": "Professional"},
            {"id": 2, "display_name": "Brook", "age": 15, "gender": "female"},
            {"id": 3, "display_name": "Cem"},
            {"id": 4, "display_name": "Dara"}
        ],
        "referees": [200, 201],
        "results": [{"match_id": 1, "home": 0, "away": 3, "walkover": true}]
    }"#;

    #[test]
    fn test_parse_sample() {
        let file = CompetitionFile::parse(SAMPLE).unwrap();

        assert_eq!(file.organizer, UserId(100));
        assert_eq!(file.participants.len(), 4);
        assert_eq!(file.participants[0].skill_level.as_deref(), Some("Professional"));
        assert_eq!(file.referees, vec![UserId(200), UserId(201)]);
        assert_eq!(file.results[0].match_id, MatchId(1));
        assert!(file.results[0].entry().score.is_walkover);
    }

    #[test]
    fn test_tournament_config_from_label() {
        let file = CompetitionFile::parse(SAMPLE).unwrap();
        let defaults = EngineConfig::default();

        let config = file.tournament_config(None, &defaults).unwrap();
        assert_eq!(config.format, TournamentFormat::GroupStage { groups: 2 });
        assert_eq!(config.seeding, SeedingMethod::Seeded);
        assert_eq!(config.venue_fields.len(), 2);
        assert!(config.start_date.is_some());

        let config = file.tournament_config(Some("swiss"), &defaults).unwrap();
        assert_eq!(
            config.format,
            TournamentFormat::Swiss {
                rounds: defaults.default_swiss_rounds
            }
        );

        assert!(file.tournament_config(Some("ladder"), &defaults).is_err());
    }
}
