//! Engine error types.

use crate::participants::UserId;
use crate::tournament::models::{CompetitionId, MatchId, MatchStatus};
use thiserror::Error;

/// Coarse classification of engine errors.
///
/// Callers surface `InvalidInput`, `Authorization` and `StateConflict` to users;
/// `Consistency` means an internal invariant broke and should be treated as a defect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    Authorization,
    StateConflict,
    Consistency,
}

/// Engine errors
#[derive(Debug, Error)]
pub enum EngineError {
    /// Fewer participants than the draw needs
    #[error("Not enough participants: need {needed}, have {current}")]
    NotEnoughParticipants { needed: usize, current: usize },

    /// Unknown tournament format label
    #[error("Unsupported tournament format: {0}")]
    UnsupportedFormat(String),

    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Empty field/slot sources with nothing to synthesize from
    #[error("No time slots available and no start date to derive them from")]
    NoSchedulingInput,

    /// Referee assignment requested with an empty pool
    #[error("No referees available")]
    NoReferees,

    /// Score entry does not fit the match
    #[error("Invalid score: {0}")]
    InvalidScore(String),

    /// Match not found
    #[error("Match not found: {0}")]
    MatchNotFound(MatchId),

    /// Competition not found
    #[error("Competition not found: {0}")]
    CompetitionNotFound(CompetitionId),

    /// Operation requested for a format that does not support it
    #[error("Operation not supported for {0} competitions")]
    FormatMismatch(String),

    /// Actor is neither organizer, referee nor seated participant
    #[error("User {actor} is not authorized to act on match {match_id}")]
    NotAuthorized { actor: UserId, match_id: MatchId },

    /// Competition-level action attempted by a non-organizer
    #[error("Only an organizer can {0}")]
    OrganizerOnly(&'static str),

    /// Direct result entry attempted by a participant
    #[error("Only an organizer or the match referee can record a result directly")]
    OfficialOnly,

    /// Proposer tried to settle their own proposal
    #[error("A score proposal cannot be confirmed or rejected by its proposer")]
    CannotConfirmOwnProposal,

    /// Second proposal while one is pending
    #[error("Match {0} already has a pending score proposal")]
    ProposalPending(MatchId),

    /// Confirm/reject with nothing pending
    #[error("Match {0} has no pending score proposal")]
    NoPendingProposal(MatchId),

    /// Match is not in the state the operation requires
    #[error("Match not in correct state: expected {expected}, got {actual}")]
    InvalidState {
        expected: MatchStatus,
        actual: MatchStatus,
    },

    /// Bracket node still waiting for a participant
    #[error("Match {0} does not have both participants yet")]
    ParticipantsUndetermined(MatchId),

    /// Draw re-run without a reset
    #[error("Draw already conducted")]
    AlreadyDrawn,

    /// Operation needs a completed draw
    #[error("Draw has not been conducted")]
    NotDrawn,

    /// Next Swiss round requested too early
    #[error("Round {round} still has unfinished matches")]
    RoundIncomplete { round: u32 },

    /// Every configured Swiss round has been generated
    #[error("All {rounds} Swiss rounds have been generated")]
    SwissRoundsExhausted { rounds: u32 },

    /// Winner propagation hit a node whose slots are taken
    #[error("Bracket node {0} cannot take another participant")]
    BracketSlotsFull(MatchId),

    /// Forward link points nowhere
    #[error("Match {from} links to unknown match {to}")]
    DanglingLink { from: MatchId, to: MatchId },

    /// Snapshot (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EngineError {
    /// Classify the error into one of the four engine error kinds
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::NotEnoughParticipants { .. }
            | EngineError::UnsupportedFormat(_)
            | EngineError::InvalidConfig(_)
            | EngineError::NoSchedulingInput
            | EngineError::NoReferees
            | EngineError::InvalidScore(_)
            | EngineError::MatchNotFound(_)
            | EngineError::CompetitionNotFound(_)
            | EngineError::FormatMismatch(_)
            | EngineError::Serialization(_) => ErrorKind::InvalidInput,

            EngineError::NotAuthorized { .. }
            | EngineError::OrganizerOnly(_)
            | EngineError::OfficialOnly
            | EngineError::CannotConfirmOwnProposal => ErrorKind::Authorization,

            EngineError::ProposalPending(_)
            | EngineError::NoPendingProposal(_)
            | EngineError::InvalidState { .. }
            | EngineError::ParticipantsUndetermined(_)
            | EngineError::AlreadyDrawn
            | EngineError::NotDrawn
            | EngineError::RoundIncomplete { .. }
            | EngineError::SwissRoundsExhausted { .. } => ErrorKind::StateConflict,

            EngineError::BracketSlotsFull(_) | EngineError::DanglingLink { .. } => {
                ErrorKind::Consistency
            }
        }
    }

    /// Get a message that is safe to show to end users
    ///
    /// Consistency errors describe engine internals and are replaced by a
    /// generic message; everything else is shown as is.
    pub fn client_message(&self) -> String {
        match self.kind() {
            ErrorKind::Consistency => "Internal bracket error, please contact the organizer".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
