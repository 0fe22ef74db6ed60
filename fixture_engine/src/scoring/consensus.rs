//! Score consensus state machine.
//!
//! A match moves `scheduled -> pending_score -> completed`, or back from
//! `pending_score` to `scheduled` when a proposal is rejected. Every method
//! validates fully before touching the match, so a returned error leaves the
//! match exactly as it was.

use crate::errors::{EngineError, EngineResult};
use crate::participants::UserId;
use crate::tournament::models::{Match, MatchScore, MatchStatus, ScoreProposal};
use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Capacity in which an actor touches a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    Organizer,
    Referee,
    Participant,
}

/// A submitted result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub score: MatchScore,
    /// Explicit winner; inferred from the totals when absent
    #[serde(default)]
    pub winner: Option<UserId>,
}

impl ScoreEntry {
    pub fn new(score: MatchScore) -> Self {
        Self { score, winner: None }
    }

    pub fn with_winner(mut self, winner: UserId) -> Self {
        self.winner = Some(winner);
        self
    }
}

/// What a proposal led to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProposalOutcome {
    /// Applied straight away (referee entry)
    Completed { winner: Option<UserId> },
    /// Waiting for one of these actors to confirm
    AwaitingConfirmation { awaiting: Vec<UserId> },
}

/// Authorization and transitions for score entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreConsensus {
    organizers: Vec<UserId>,
}

impl ScoreConsensus {
    pub fn new(organizers: Vec<UserId>) -> Self {
        Self { organizers }
    }

    pub fn organizers(&self) -> &[UserId] {
        &self.organizers
    }

    pub fn is_organizer(&self, user: UserId) -> bool {
        self.organizers.contains(&user)
    }

    /// Resolve an actor's role: organizer, then referee, then seated participant
    pub fn role_of(&self, game: &Match, actor: UserId) -> Option<ActorRole> {
        if self.is_organizer(actor) {
            Some(ActorRole::Organizer)
        } else if game.referee == Some(actor) {
            Some(ActorRole::Referee)
        } else if game.is_seated(actor) {
            Some(ActorRole::Participant)
        } else {
            None
        }
    }

    fn authorize(&self, game: &Match, actor: UserId) -> EngineResult<ActorRole> {
        self.role_of(game, actor).ok_or(EngineError::NotAuthorized {
            actor,
            match_id: game.id,
        })
    }

    /// Submit a score
    ///
    /// The match referee's entry completes the match immediately. Anyone else
    /// authorized opens a proposal that another authorized actor must confirm.
    pub fn propose(
        &self,
        game: &mut Match,
        actor: UserId,
        entry: ScoreEntry,
    ) -> EngineResult<ProposalOutcome> {
        self.authorize(game, actor)?;
        match game.status {
            MatchStatus::Scheduled => {}
            MatchStatus::PendingScore => return Err(EngineError::ProposalPending(game.id)),
            MatchStatus::Completed => {
                return Err(EngineError::InvalidState {
                    expected: MatchStatus::Scheduled,
                    actual: game.status,
                });
            }
        }
        if !game.is_ready() {
            return Err(EngineError::ParticipantsUndetermined(game.id));
        }
        let winner = resolve_winner(game, &entry)?;

        if game.referee == Some(actor) {
            apply(game, entry.score, winner);
            info!("Referee {} completed match {}", actor, game.id);
            return Ok(ProposalOutcome::Completed { winner });
        }

        game.pending = Some(ScoreProposal {
            score: entry.score,
            winner,
            proposed_by: actor,
            proposed_at: Utc::now(),
            confirmed_by: Vec::new(),
        });
        game.status = MatchStatus::PendingScore;
        debug!("User {} proposed a score for match {}", actor, game.id);

        Ok(ProposalOutcome::AwaitingConfirmation {
            awaiting: self.who_needs_to_confirm(game),
        })
    }

    /// Accept the pending proposal and complete the match
    ///
    /// Returns the winner (None for a draw).
    pub fn confirm(&self, game: &mut Match, actor: UserId) -> EngineResult<Option<UserId>> {
        self.authorize(game, actor)?;
        let proposal = pending_proposal(game)?;
        if proposal.proposed_by == actor {
            return Err(EngineError::CannotConfirmOwnProposal);
        }

        let winner = proposal.winner;
        let score = proposal.score.clone();
        apply(game, score, winner);
        info!("User {} confirmed the score of match {}", actor, game.id);

        Ok(winner)
    }

    /// Discard the pending proposal and reopen the match
    ///
    /// Returns the discarded proposal so its author can be told.
    pub fn reject(&self, game: &mut Match, actor: UserId) -> EngineResult<ScoreProposal> {
        self.authorize(game, actor)?;
        let proposal = pending_proposal(game)?;
        if proposal.proposed_by == actor {
            return Err(EngineError::CannotConfirmOwnProposal);
        }

        let proposal = game
            .pending
            .take()
            .ok_or(EngineError::NoPendingProposal(game.id))?;
        game.status = MatchStatus::Scheduled;
        info!(
            "User {} rejected the score proposed by {} for match {}",
            actor, proposal.proposed_by, game.id
        );

        Ok(proposal)
    }

    /// Enter a final result directly, bypassing consensus
    ///
    /// Organizers and the match referee only. Works from `scheduled` and from
    /// `pending_score`, where the open proposal is discarded.
    pub fn record_result(
        &self,
        game: &mut Match,
        actor: UserId,
        entry: ScoreEntry,
    ) -> EngineResult<Option<UserId>> {
        match self.authorize(game, actor)? {
            ActorRole::Organizer | ActorRole::Referee => {}
            ActorRole::Participant => return Err(EngineError::OfficialOnly),
        }
        if game.status == MatchStatus::Completed {
            return Err(EngineError::InvalidState {
                expected: MatchStatus::Scheduled,
                actual: game.status,
            });
        }
        if !game.is_ready() {
            return Err(EngineError::ParticipantsUndetermined(game.id));
        }
        let winner = resolve_winner(game, &entry)?;

        apply(game, entry.score, winner);
        info!("User {} recorded the result of match {}", actor, game.id);

        Ok(winner)
    }

    /// Actors to notify about a pending proposal
    ///
    /// The referee and both seated participants, minus the proposer. Organizers
    /// may also confirm but are not asked to.
    pub fn who_needs_to_confirm(&self, game: &Match) -> Vec<UserId> {
        let Some(proposal) = &game.pending else {
            return Vec::new();
        };

        let mut awaiting = Vec::with_capacity(3);
        for candidate in [game.referee, game.participant1, game.participant2]
            .into_iter()
            .flatten()
        {
            if candidate != proposal.proposed_by && !awaiting.contains(&candidate) {
                awaiting.push(candidate);
            }
        }
        awaiting
    }
}

fn pending_proposal(game: &Match) -> EngineResult<&ScoreProposal> {
    match (&game.pending, game.status) {
        (Some(proposal), MatchStatus::PendingScore) => Ok(proposal),
        _ => Err(EngineError::NoPendingProposal(game.id)),
    }
}

/// Work out the winner of an entry
///
/// An explicit winner must hold a seat. Otherwise the higher total wins and
/// equal totals are a draw, which bracket matches cannot end in.
fn resolve_winner(game: &Match, entry: &ScoreEntry) -> EngineResult<Option<UserId>> {
    if let Some(winner) = entry.winner {
        if !game.is_seated(winner) {
            return Err(EngineError::InvalidScore(format!(
                "user {winner} does not play in match {}",
                game.id
            )));
        }
        return Ok(Some(winner));
    }

    let score = &entry.score;
    let winner = match score.participant1.cmp(&score.participant2) {
        std::cmp::Ordering::Greater => game.participant1,
        std::cmp::Ordering::Less => game.participant2,
        std::cmp::Ordering::Equal => None,
    };

    if winner.is_none() && game.stage.is_bracket() {
        return Err(EngineError::InvalidScore(format!(
            "match {} is an elimination match and needs a winner",
            game.id
        )));
    }

    Ok(winner)
}

fn apply(game: &mut Match, score: MatchScore, winner: Option<UserId>) {
    game.score = Some(score);
    game.winner = winner;
    game.pending = None;
    game.status = MatchStatus::Completed;
    game.completed_at = Some(Utc::now());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::tournament::models::{MatchId, MatchStage};

    const ORGANIZER: UserId = UserId(100);
    const REFEREE: UserId = UserId(200);
    const HOME: UserId = UserId(1);
    const AWAY: UserId = UserId(2);

    fn league_match() -> Match {
        let mut game = Match::new(MatchId(1), 1, 1, MatchStage::League { group: None })
            .pairing(Some(HOME), Some(AWAY));
        game.referee = Some(REFEREE);
        game
    }

    fn consensus() -> ScoreConsensus {
        ScoreConsensus::new(vec![ORGANIZER])
    }

    fn entry(home: u32, away: u32) -> ScoreEntry {
        ScoreEntry::new(MatchScore::new(home, away))
    }

    #[test]
    fn test_roles_in_priority_order() {
        let mut game = league_match();
        game.referee = Some(ORGANIZER);
        let consensus = consensus();

        assert_eq!(consensus.role_of(&game, ORGANIZER), Some(ActorRole::Organizer));
        assert_eq!(consensus.role_of(&game, HOME), Some(ActorRole::Participant));
        assert_eq!(consensus.role_of(&game, UserId(9)), None);
    }

    #[test]
    fn test_propose_then_confirm() {
        let consensus = consensus();
        let mut game = league_match();

        let outcome = consensus.propose(&mut game, HOME, entry(2, 1)).unwrap();
        assert_eq!(
            outcome,
            ProposalOutcome::AwaitingConfirmation {
                awaiting: vec![REFEREE, AWAY]
            }
        );
        assert_eq!(game.status, MatchStatus::PendingScore);
        assert!(game.score.is_none());

        let winner = consensus.confirm(&mut game, AWAY).unwrap();
        assert_eq!(winner, Some(HOME));
        assert_eq!(game.status, MatchStatus::Completed);
        assert_eq!(game.score, Some(MatchScore::new(2, 1)));
        assert!(game.pending.is_none());

        let err = consensus.confirm(&mut game, AWAY).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StateConflict);
    }

    #[test]
    fn test_reject_reopens_match() {
        let consensus = consensus();
        let mut game = league_match();

        consensus.propose(&mut game, HOME, entry(2, 1)).unwrap();
        let discarded = consensus.reject(&mut game, AWAY).unwrap();

        assert_eq!(discarded.proposed_by, HOME);
        assert_eq!(game.status, MatchStatus::Scheduled);
        assert!(game.score.is_none());
        assert!(consensus.propose(&mut game, AWAY, entry(1, 1)).is_ok());
    }

    #[test]
    fn test_referee_fast_path() {
        let consensus = consensus();
        let mut game = league_match();

        let outcome = consensus.propose(&mut game, REFEREE, entry(0, 3)).unwrap();

        assert_eq!(outcome, ProposalOutcome::Completed { winner: Some(AWAY) });
        assert_eq!(game.status, MatchStatus::Completed);
        assert!(game.pending.is_none());
    }

    #[test]
    fn test_second_proposal_conflicts() {
        let consensus = consensus();
        let mut game = league_match();

        consensus.propose(&mut game, HOME, entry(2, 1)).unwrap();
        let before = game.clone();
        let err = consensus.propose(&mut game, AWAY, entry(0, 1)).unwrap_err();

        assert!(matches!(err, EngineError::ProposalPending(_)));
        assert_eq!(game, before);
    }

    #[test]
    fn test_outsider_is_rejected_without_mutation() {
        let consensus = consensus();
        let mut game = league_match();
        let before = game.clone();

        let err = consensus.propose(&mut game, UserId(77), entry(1, 0)).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Authorization);
        assert_eq!(game, before);
    }

    #[test]
    fn test_proposer_cannot_settle_own_proposal() {
        let consensus = consensus();
        let mut game = league_match();

        consensus.propose(&mut game, HOME, entry(2, 1)).unwrap();

        assert!(matches!(
            consensus.confirm(&mut game, HOME),
            Err(EngineError::CannotConfirmOwnProposal)
        ));
        assert!(matches!(
            consensus.reject(&mut game, HOME),
            Err(EngineError::CannotConfirmOwnProposal)
        ));
        assert_eq!(game.status, MatchStatus::PendingScore);
    }

    #[test]
    fn test_confirm_without_proposal() {
        let consensus = consensus();
        let mut game = league_match();

        assert!(matches!(
            consensus.confirm(&mut game, AWAY),
            Err(EngineError::NoPendingProposal(_))
        ));
        assert!(matches!(
            consensus.reject(&mut game, ORGANIZER),
            Err(EngineError::NoPendingProposal(_))
        ));
    }

    #[test]
    fn test_organizer_can_confirm() {
        let consensus = consensus();
        let mut game = league_match();

        consensus.propose(&mut game, HOME, entry(1, 1)).unwrap();
        assert_eq!(consensus.confirm(&mut game, ORGANIZER).unwrap(), None);
    }

    #[test]
    fn test_bracket_draw_is_invalid() {
        let consensus = consensus();
        let mut game = league_match();
        game.stage = MatchStage::Upper;

        let err = consensus.propose(&mut game, HOME, entry(2, 2)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidScore(_)));

        let penalties = entry(2, 2).with_winner(AWAY);
        let outcome = consensus.propose(&mut game, HOME, penalties).unwrap();
        assert!(matches!(outcome, ProposalOutcome::AwaitingConfirmation { .. }));
        assert_eq!(game.pending.as_ref().unwrap().winner, Some(AWAY));
    }

    #[test]
    fn test_winner_must_be_seated() {
        let consensus = consensus();
        let mut game = league_match();

        let err = consensus
            .propose(&mut game, HOME, entry(1, 0).with_winner(UserId(5)))
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidScore(_)));
    }

    #[test]
    fn test_undetermined_participants() {
        let consensus = consensus();
        let mut game = Match::new(MatchId(5), 2, 1, MatchStage::Upper).pairing(Some(HOME), None);

        let err = consensus.propose(&mut game, HOME, entry(1, 0)).unwrap_err();
        assert!(matches!(err, EngineError::ParticipantsUndetermined(_)));
    }

    #[test]
    fn test_record_result_by_officials_only() {
        let consensus = consensus();
        let mut game = league_match();
        consensus.propose(&mut game, HOME, entry(2, 1)).unwrap();

        assert!(matches!(
            consensus.record_result(&mut game, AWAY, entry(0, 1)),
            Err(EngineError::OfficialOnly)
        ));

        let winner = consensus
            .record_result(
                &mut game,
                ORGANIZER,
                ScoreEntry::new(MatchScore::new(0, 1).walkover().with_notes("no show")),
            )
            .unwrap();
        assert_eq!(winner, Some(AWAY));
        assert!(game.pending.is_none());
        assert!(game.score.as_ref().unwrap().is_walkover);

        assert!(matches!(
            consensus.record_result(&mut game, REFEREE, entry(1, 0)),
            Err(EngineError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_who_needs_to_confirm_dedupes() {
        let consensus = consensus();
        let mut game = league_match();
        assert!(consensus.who_needs_to_confirm(&game).is_empty());

        game.referee = Some(AWAY);
        consensus.propose(&mut game, HOME, entry(1, 0)).unwrap();
        assert_eq!(consensus.who_needs_to_confirm(&game), vec![AWAY]);
    }
}
