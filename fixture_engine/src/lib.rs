//! # Fixture Engine
//!
//! Draws, fixtures, scheduling, standings and score consensus for competitive events.
//!
//! The engine is pure logic over in-memory entities. Participants, venue fields and
//! time slots come in as arguments; updated matches, tables and events go back out.
//! Persistence, transport and notification delivery belong to the caller.
//!
//! ## Flow
//!
//! - **Seeding**: coarse seed tiers from skill labels
//! - **Grouping**: age brackets, gender split or a fixed number of groups
//! - **Draw**: single/double elimination brackets, round robin, group stage, Swiss
//! - **Scheduling**: fields and time slots, then referees
//! - **Scoring**: propose, confirm or reject; referees and organizers settle directly
//! - **Advancement / Standings**: bracket winners move on, tables are recomputed
//!
//! ## Core Modules
//!
//! - [`participants`]: participant records, seeding and group allocation
//! - [`draw`]: bracket and fixture generation
//! - [`schedule`]: field/time slot and referee assignment
//! - [`standings`]: table computation
//! - [`scoring`]: score consensus and bracket advancement
//! - [`tournament`]: configuration, match records and the competition manager
//!
//! ## Example
//!
//! ```
//! use fixture_engine::draw::generate_single_elimination;
//! use fixture_engine::participants::{Participant, SeedingMethod};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let field: Vec<_> = (1..=5).map(|i| Participant::new(i, format!("P{i}"))).collect();
//! let mut rng = StdRng::seed_from_u64(7);
//!
//! let bracket = generate_single_elimination(&field, SeedingMethod::Random, &mut rng).unwrap();
//! assert_eq!(bracket.matches.len(), 7);
//! assert!(bracket.final_match().unwrap().next_match.is_none());
//! ```

/// Engine defaults loaded from the environment.
pub mod config;
pub use config::EngineConfig;

/// Engine error types.
pub mod errors;
pub use errors::{EngineError, EngineResult, ErrorKind};

pub mod draw;
pub mod participants;
pub mod schedule;
pub mod scoring;
pub mod standings;
pub mod tournament;

pub use participants::{Participant, UserId};
pub use standings::Standing;
pub use tournament::{
    CompetitionEvent, CompetitionId, CompetitionManager, Match, MatchId, MatchStatus,
    TournamentConfig, TournamentFormat,
};
