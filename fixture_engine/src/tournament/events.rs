//! Competition events handed to the notification collaborator.

use super::models::MatchId;
use crate::participants::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Something that happened in a competition
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CompetitionEvent {
    DrawCompleted { matches: usize },
    DrawReset,
    ScheduleGenerated { matches_scheduled: usize },
    RefereesAssigned { assigned: usize },
    ScoreProposed {
        match_id: MatchId,
        proposed_by: UserId,
        awaiting: Vec<UserId>,
    },
    ScoreConfirmed { match_id: MatchId, confirmed_by: UserId },
    ScoreRejected {
        match_id: MatchId,
        rejected_by: UserId,
        proposer: UserId,
    },
    ResultRecorded { match_id: MatchId, recorded_by: UserId },
    MatchCompleted { match_id: MatchId, winner: Option<UserId> },
    Advanced {
        participant: UserId,
        from: MatchId,
        to: MatchId,
    },
    ChampionDecided { champion: UserId },
    StandingsUpdated { group: Option<String> },
    SwissRoundGenerated { round: u32, matches: usize },
}

impl fmt::Display for CompetitionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::DrawCompleted { matches } => format!("draw completed with {matches} matches"),
            Self::DrawReset => "draw reset".to_string(),
            Self::ScheduleGenerated { matches_scheduled } => {
                format!("{matches_scheduled} matches scheduled")
            }
            Self::RefereesAssigned { assigned } => format!("{assigned} referees assigned"),
            Self::ScoreProposed {
                match_id,
                proposed_by,
                awaiting,
            } => format!(
                "user {proposed_by} proposed a score for match {match_id}, awaiting {} confirmation(s)",
                awaiting.len()
            ),
            Self::ScoreConfirmed {
                match_id,
                confirmed_by,
            } => format!("user {confirmed_by} confirmed the score for match {match_id}"),
            Self::ScoreRejected {
                match_id,
                rejected_by,
                ..
            } => format!("user {rejected_by} rejected the score for match {match_id}"),
            Self::ResultRecorded {
                match_id,
                recorded_by,
            } => format!("user {recorded_by} recorded the result of match {match_id}"),
            Self::MatchCompleted { match_id, winner } => match winner {
                Some(winner) => format!("match {match_id} won by user {winner}"),
                None => format!("match {match_id} drawn"),
            },
            Self::Advanced {
                participant,
                from,
                to,
            } => format!("user {participant} moved from match {from} to match {to}"),
            Self::ChampionDecided { champion } => format!("user {champion} won the competition"),
            Self::StandingsUpdated { group } => match group {
                Some(group) => format!("{group} standings updated"),
                None => "standings updated".to_string(),
            },
            Self::SwissRoundGenerated { round, matches } => {
                format!("swiss round {round} generated with {matches} matches")
            }
        };
        write!(f, "{repr}")
    }
}
