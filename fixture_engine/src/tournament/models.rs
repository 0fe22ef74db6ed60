//! Match and competition data models.

use super::config::TournamentConfig;
use crate::errors::EngineResult;
use crate::participants::{Participant, UserId};
use crate::standings::Standing;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Competition ID type
pub type CompetitionId = Uuid;

/// Match identifier, stable within one competition
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MatchId(pub u32);

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Match status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// Waiting for a result
    Scheduled,
    /// A score proposal awaits confirmation
    PendingScore,
    /// Result is final
    Completed,
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Scheduled => "scheduled",
            Self::PendingScore => "pending_score",
            Self::Completed => "completed",
        };
        write!(f, "{repr}")
    }
}

/// Where a match sits in its competition
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum MatchStage {
    /// Winners' bracket
    Upper,
    /// Losers' bracket (double elimination)
    Lower,
    /// Last match of a bracket
    Final,
    /// Round robin fixture, with its group label for group stages
    League { group: Option<String> },
    /// Swiss round pairing
    Swiss,
}

impl MatchStage {
    /// Whether the match belongs to an elimination bracket
    pub fn is_bracket(&self) -> bool {
        matches!(self, Self::Upper | Self::Lower | Self::Final)
    }

    /// Group label for group-stage fixtures
    pub fn group(&self) -> Option<&str> {
        match self {
            Self::League { group } => group.as_deref(),
            _ => None,
        }
    }
}

/// Score of a single set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetScore {
    pub participant1: u32,
    pub participant2: u32,
}

/// Final score of a match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchScore {
    /// Goals/points for the participant in slot 1
    pub participant1: u32,
    /// Goals/points for the participant in slot 2
    pub participant2: u32,
    /// Per-set breakdown, if the sport has sets
    #[serde(default)]
    pub sets: Vec<SetScore>,
    /// Result decided by forfeit
    #[serde(default)]
    pub is_walkover: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

impl MatchScore {
    pub fn new(participant1: u32, participant2: u32) -> Self {
        Self {
            participant1,
            participant2,
            sets: Vec::new(),
            is_walkover: false,
            notes: None,
        }
    }

    pub fn with_sets(mut self, sets: Vec<SetScore>) -> Self {
        self.sets = sets;
        self
    }

    pub fn walkover(mut self) -> Self {
        self.is_walkover = true;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Pending score awaiting confirmation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreProposal {
    pub score: MatchScore,
    /// Winner the proposal resolves to (None for a draw)
    pub winner: Option<UserId>,
    pub proposed_by: UserId,
    pub proposed_at: DateTime<Utc>,
    /// Actors who accepted the proposal so far
    pub confirmed_by: Vec<UserId>,
}

/// Field and start time of a match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSlot {
    pub starts_at: DateTime<Utc>,
    pub field: String,
}

/// A fixture or bracket node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    /// Round number (1-indexed)
    pub round: u32,
    /// Position within the round (1-indexed)
    pub match_number: u32,
    #[serde(flatten)]
    pub stage: MatchStage,
    pub participant1: Option<UserId>,
    pub participant2: Option<UserId>,
    pub winner: Option<UserId>,
    /// Node that receives this match's winner
    pub next_match: Option<MatchId>,
    /// Node that receives this match's loser (double elimination)
    pub loser_next_match: Option<MatchId>,
    pub status: MatchStatus,
    pub score: Option<MatchScore>,
    pub pending: Option<ScoreProposal>,
    pub referee: Option<UserId>,
    pub schedule: Option<ScheduleSlot>,
    /// Auto-resolved or pass-through node; never played
    pub is_bye: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Match {
    /// Create an empty match
    pub fn new(id: MatchId, round: u32, match_number: u32, stage: MatchStage) -> Self {
        Self {
            id,
            round,
            match_number,
            stage,
            participant1: None,
            participant2: None,
            winner: None,
            next_match: None,
            loser_next_match: None,
            status: MatchStatus::Scheduled,
            score: None,
            pending: None,
            referee: None,
            schedule: None,
            is_bye: false,
            completed_at: None,
        }
    }

    /// Seat both participants
    pub fn pairing(mut self, participant1: Option<UserId>, participant2: Option<UserId>) -> Self {
        self.participant1 = participant1;
        self.participant2 = participant2;
        self
    }

    /// Whether the user holds one of the two slots
    pub fn is_seated(&self, user: UserId) -> bool {
        self.participant1 == Some(user) || self.participant2 == Some(user)
    }

    /// Both slots are filled
    pub fn is_ready(&self) -> bool {
        self.participant1.is_some() && self.participant2.is_some()
    }

    /// The other seated participant
    pub fn opponent_of(&self, user: UserId) -> Option<UserId> {
        if self.participant1 == Some(user) {
            self.participant2
        } else if self.participant2 == Some(user) {
            self.participant1
        } else {
            None
        }
    }

    /// Loser of a decided match
    pub fn loser(&self) -> Option<UserId> {
        self.winner.and_then(|winner| self.opponent_of(winner))
    }

    /// Number of empty participant slots
    pub fn open_slots(&self) -> usize {
        usize::from(self.participant1.is_none()) + usize::from(self.participant2.is_none())
    }

    /// Complete the match without play, advancing whoever is seated
    pub fn resolve_bye(&mut self) {
        self.is_bye = true;
        self.winner = self.participant1.or(self.participant2);
        self.status = MatchStatus::Completed;
        self.completed_at = Some(Utc::now());
    }
}

/// Hands out sequential match ids
#[derive(Debug, Clone, Default)]
pub struct MatchIdSequence {
    last: u32,
}

impl MatchIdSequence {
    /// Continue numbering after an existing id
    pub fn starting_after(last: u32) -> Self {
        Self { last }
    }

    pub fn next_id(&mut self) -> MatchId {
        self.last += 1;
        MatchId(self.last)
    }
}

/// Full state of one competition, as handed to the persistence layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitionSnapshot {
    pub id: CompetitionId,
    pub config: TournamentConfig,
    pub organizers: Vec<UserId>,
    pub participants: Vec<Participant>,
    pub matches: Vec<Match>,
    pub standings: Vec<Standing>,
    pub drawn_at: Option<DateTime<Utc>>,
}

impl CompetitionSnapshot {
    pub fn to_json(&self) -> EngineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display_matches_serde() {
        for status in [
            MatchStatus::Scheduled,
            MatchStatus::PendingScore,
            MatchStatus::Completed,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
        }
    }

    #[test]
    fn test_bye_resolution() {
        let mut node = Match::new(MatchId(1), 1, 1, MatchStage::Upper).pairing(Some(UserId(4)), None);
        node.resolve_bye();

        assert!(node.is_bye);
        assert_eq!(node.winner, Some(UserId(4)));
        assert_eq!(node.status, MatchStatus::Completed);
        assert!(node.score.is_none());
        assert_eq!(node.loser(), None);
    }

    #[test]
    fn test_seating_helpers() {
        let node = Match::new(MatchId(3), 1, 2, MatchStage::Swiss)
            .pairing(Some(UserId(1)), Some(UserId(2)));

        assert!(node.is_ready());
        assert!(node.is_seated(UserId(2)));
        assert!(!node.is_seated(UserId(3)));
        assert_eq!(node.opponent_of(UserId(1)), Some(UserId(2)));
        assert_eq!(node.open_slots(), 0);
    }

    #[test]
    fn test_match_serializes_stage_inline() {
        let node = Match::new(
            MatchId(1),
            1,
            1,
            MatchStage::League {
                group: Some("Group A".to_string()),
            },
        );
        let value = serde_json::to_value(&node).unwrap();

        assert_eq!(value["stage"], "league");
        assert_eq!(value["group"], "Group A");
        assert_eq!(value["status"], "scheduled");

        let back: Match = serde_json::from_value(value).unwrap();
        assert_eq!(back.stage.group(), Some("Group A"));
    }

    #[test]
    fn test_id_sequence() {
        let mut seq = MatchIdSequence::starting_after(6);
        assert_eq!(seq.next_id(), MatchId(7));
        assert_eq!(seq.next_id(), MatchId(8));
    }
}
