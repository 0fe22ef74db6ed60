//! Tournament module: competition configuration, match records and the
//! competition manager.
//!
//! This module provides:
//! - Format parsing and per-competition settings
//! - Match, score and proposal records
//! - Competition events for the notification layer
//! - An in-memory registry that runs draws, schedules and score consensus
//!
//! ## Example
//!
//! ```
//! use fixture_engine::config::EngineConfig;
//! use fixture_engine::participants::{Participant, UserId};
//! use fixture_engine::tournament::{CompetitionManager, TournamentConfig, TournamentFormat};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let manager = CompetitionManager::new(EngineConfig::default());
//!     let organizer = UserId(100);
//!     let field = (1..=4).map(|i| Participant::new(i, format!("Player {i}"))).collect();
//!
//!     let config = TournamentConfig::new("Spring Cup", TournamentFormat::RoundRobin { legs: 1 });
//!     let id = manager.create_competition(config, vec![organizer], field).await?;
//!
//!     let fixtures = manager.conduct_draw(id, organizer).await?;
//!     assert_eq!(fixtures.len(), 6);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod events;
pub mod manager;
pub mod models;

pub use config::{ScoringWeights, TournamentConfig, TournamentFormat};
pub use events::CompetitionEvent;
pub use manager::CompetitionManager;
pub use models::{
    CompetitionId, CompetitionSnapshot, Match, MatchId, MatchIdSequence, MatchScore, MatchStage,
    MatchStatus, ScheduleSlot, ScoreProposal, SetScore,
};
