//! Scoring module: how a result becomes final and where it sends the players.
//!
//! - [`consensus`] governs propose/confirm/reject and direct result entry
//! - [`advancer`] moves bracket winners and losers into their next nodes
//!
//! ## Example
//!
//! ```
//! use fixture_engine::participants::UserId;
//! use fixture_engine::scoring::{ProposalOutcome, ScoreConsensus, ScoreEntry};
//! use fixture_engine::tournament::{Match, MatchId, MatchScore, MatchStage, MatchStatus};
//!
//! let consensus = ScoreConsensus::new(vec![UserId(100)]);
//! let mut game = Match::new(MatchId(1), 1, 1, MatchStage::Swiss)
//!     .pairing(Some(UserId(1)), Some(UserId(2)));
//!
//! let outcome = consensus
//!     .propose(&mut game, UserId(1), ScoreEntry::new(MatchScore::new(3, 1)))
//!     .unwrap();
//! assert_eq!(outcome, ProposalOutcome::AwaitingConfirmation { awaiting: vec![UserId(2)] });
//!
//! consensus.confirm(&mut game, UserId(2)).unwrap();
//! assert_eq!(game.status, MatchStatus::Completed);
//! assert_eq!(game.winner, Some(UserId(1)));
//! ```

pub mod advancer;
pub mod consensus;

pub use advancer::{Advancement, MatchArena, advance, place_entrant, routes};
pub use consensus::{ActorRole, ProposalOutcome, ScoreConsensus, ScoreEntry};
