//! Competition manager: the in-memory registry the surrounding service talks to.
//!
//! Lock order, outermost first: standings, participants, match board, single
//! match, events. A match lock is never held while waiting on the board.

use super::config::TournamentConfig;
use super::events::CompetitionEvent;
use super::models::{
    CompetitionId, CompetitionSnapshot, Match, MatchId, MatchIdSequence, MatchStage, MatchStatus,
    ScoreProposal,
};
use crate::config::EngineConfig;
use crate::draw;
use crate::errors::{EngineError, EngineResult};
use crate::participants::{Participant, UserId};
use crate::schedule::{ScheduleSummary, SlotGrid, assign_referees, assign_time_slots};
use crate::scoring::{ProposalOutcome, ScoreConsensus, ScoreEntry, place_entrant, routes};
use crate::standings::{Standing, calculate_group, calculate_grouped_standings};
use crate::tournament::config::TournamentFormat;
use chrono::{DateTime, Duration, Utc};
use log::{error, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard, RwLock};
use uuid::Uuid;

type MatchCell = Arc<Mutex<Match>>;

/// Matches of a competition, each behind its own lock
#[derive(Default)]
struct MatchBoard {
    drawn_at: Option<DateTime<Utc>>,
    cells: BTreeMap<MatchId, MatchCell>,
}

impl MatchBoard {
    fn replace(&mut self, matches: Vec<Match>) {
        self.cells = matches
            .into_iter()
            .map(|m| (m.id, Arc::new(Mutex::new(m))))
            .collect();
    }

    async fn lock_all(&self) -> Vec<MutexGuard<'_, Match>> {
        let mut guards = Vec::with_capacity(self.cells.len());
        for cell in self.cells.values() {
            guards.push(cell.lock().await);
        }
        guards
    }
}

/// One competition's live state
struct Competition {
    id: CompetitionId,
    config: TournamentConfig,
    consensus: ScoreConsensus,
    standings: Mutex<Vec<Standing>>,
    participants: RwLock<Vec<Participant>>,
    board: RwLock<MatchBoard>,
    events: Mutex<VecDeque<CompetitionEvent>>,
}

impl Competition {
    fn new(
        id: CompetitionId,
        config: TournamentConfig,
        organizers: Vec<UserId>,
        participants: Vec<Participant>,
    ) -> Self {
        Self {
            id,
            config,
            consensus: ScoreConsensus::new(organizers),
            standings: Mutex::new(Vec::new()),
            participants: RwLock::new(participants),
            board: RwLock::new(MatchBoard::default()),
            events: Mutex::new(VecDeque::new()),
        }
    }

    fn require_organizer(&self, actor: UserId, action: &'static str) -> EngineResult<()> {
        if self.consensus.is_organizer(actor) {
            Ok(())
        } else {
            Err(EngineError::OrganizerOnly(action))
        }
    }

    async fn emit(&self, event: CompetitionEvent) {
        self.events.lock().await.push_back(event);
    }

    async fn cell(&self, match_id: MatchId) -> EngineResult<MatchCell> {
        let board = self.board.read().await;
        if board.drawn_at.is_none() {
            return Err(EngineError::NotDrawn);
        }
        board
            .cells
            .get(&match_id)
            .cloned()
            .ok_or(EngineError::MatchNotFound(match_id))
    }

    async fn cells(&self) -> BTreeMap<MatchId, MatchCell> {
        self.board.read().await.cells.clone()
    }

    async fn snapshot_matches(&self) -> Vec<Match> {
        let cells = self.cells().await;
        let mut matches = Vec::with_capacity(cells.len());
        for cell in cells.values() {
            matches.push(cell.lock().await.clone());
        }
        matches
    }

    /// Run a transition on a copy of the match and store it only on success
    async fn update_match<T, F>(&self, match_id: MatchId, transition: F) -> EngineResult<(T, Match)>
    where
        F: FnOnce(&ScoreConsensus, &mut Match) -> EngineResult<T>,
    {
        let cell = self.cell(match_id).await?;
        let mut guard = cell.lock().await;
        let mut working = guard.clone();
        let value = transition(&self.consensus, &mut working)?;
        *guard = working.clone();
        Ok((value, working))
    }
}

/// Registry of competitions
#[derive(Clone)]
pub struct CompetitionManager {
    /// Engine defaults
    config: Arc<EngineConfig>,

    /// Live competitions
    competitions: Arc<RwLock<HashMap<CompetitionId, Arc<Competition>>>>,
}

impl CompetitionManager {
    /// Create a new competition manager
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config: Arc::new(config),
            competitions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn engine_config(&self) -> &EngineConfig {
        &self.config
    }

    /// Register a competition
    ///
    /// Fails with `InvalidConfig` if the manager's engine defaults are out of
    /// range.
    ///
    /// # Arguments
    ///
    /// * `config` - Format, scoring and venue settings
    /// * `organizers` - Users allowed to run the draw and settle results
    /// * `participants` - The field, as supplied by registration
    pub async fn create_competition(
        &self,
        config: TournamentConfig,
        organizers: Vec<UserId>,
        participants: Vec<Participant>,
    ) -> EngineResult<CompetitionId> {
        self.config.validate()?;
        config.validate()?;

        let id = Uuid::new_v4();
        info!(
            "Created competition {} ({}, {}) with {} participants",
            id,
            config.name,
            config.format,
            participants.len()
        );
        let competition = Competition::new(id, config, organizers, participants);
        self.competitions
            .write()
            .await
            .insert(id, Arc::new(competition));

        Ok(id)
    }

    async fn competition(&self, id: CompetitionId) -> EngineResult<Arc<Competition>> {
        self.competitions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(EngineError::CompetitionNotFound(id))
    }

    /// Remove a competition from the registry
    pub async fn remove_competition(&self, id: CompetitionId) -> EngineResult<()> {
        self.competitions
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(EngineError::CompetitionNotFound(id))
    }

    /// Run the draw with a freshly seeded generator
    pub async fn conduct_draw(&self, id: CompetitionId, actor: UserId) -> EngineResult<Vec<Match>> {
        let mut rng = StdRng::from_rng(&mut rand::rng());
        self.conduct_draw_with_rng(id, actor, &mut rng).await
    }

    /// Run the draw: seeds, groups and the initial fixture list
    ///
    /// Organizer-only. A competition is drawn once; `reset_draw` clears it for
    /// another attempt. Formats ranked by a table start with an all-zero one.
    pub async fn conduct_draw_with_rng<R>(
        &self,
        id: CompetitionId,
        actor: UserId,
        rng: &mut R,
    ) -> EngineResult<Vec<Match>>
    where
        R: Rng + ?Sized,
    {
        let competition = self.competition(id).await?;
        competition.require_organizer(actor, "conduct the draw")?;

        let mut standings = competition.standings.lock().await;
        let mut participants = competition.participants.write().await;
        let mut board = competition.board.write().await;
        if board.drawn_at.is_some() {
            return Err(EngineError::AlreadyDrawn);
        }

        let mut drawn = participants.clone();
        let outcome = draw::conduct(&mut drawn, &competition.config, rng)?;

        *standings = if competition.config.format.tracks_standings() {
            calculate_grouped_standings(&[], &drawn, &competition.config.scoring_or(&self.config))
        } else {
            Vec::new()
        };
        *participants = drawn;
        board.replace(outcome.matches.clone());
        board.drawn_at = Some(Utc::now());

        competition
            .emit(CompetitionEvent::DrawCompleted {
                matches: outcome.matches.len(),
            })
            .await;
        Ok(outcome.matches)
    }

    /// Throw away the draw so it can be run again
    pub async fn reset_draw(&self, id: CompetitionId, actor: UserId) -> EngineResult<()> {
        let competition = self.competition(id).await?;
        competition.require_organizer(actor, "reset the draw")?;

        let mut standings = competition.standings.lock().await;
        let mut participants = competition.participants.write().await;
        let mut board = competition.board.write().await;

        standings.clear();
        participants.iter_mut().for_each(Participant::clear_draw);
        *board = MatchBoard::default();

        info!("Draw of competition {id} reset");
        competition.emit(CompetitionEvent::DrawReset).await;
        Ok(())
    }

    /// Place every playable match on a field and time slot
    pub async fn generate_schedule(
        &self,
        id: CompetitionId,
        actor: UserId,
    ) -> EngineResult<ScheduleSummary> {
        let competition = self.competition(id).await?;
        competition.require_organizer(actor, "generate the schedule")?;
        let config = &competition.config;
        let grid = SlotGrid::resolve(
            &config.venue_fields,
            &config.time_slots,
            config.start_date,
            &self.config,
        )?;

        let board = competition.board.write().await;
        if board.drawn_at.is_none() {
            return Err(EngineError::NotDrawn);
        }
        let mut guards = board.lock_all().await;
        let mut matches: Vec<Match> = guards.iter().map(|g| (**g).clone()).collect();

        let summary = assign_time_slots(&mut matches, &grid)?;
        for (guard, scheduled) in guards.iter_mut().zip(matches) {
            guard.schedule = scheduled.schedule;
        }
        drop(guards);

        competition
            .emit(CompetitionEvent::ScheduleGenerated {
                matches_scheduled: summary.matches_scheduled,
            })
            .await;
        Ok(summary)
    }

    /// Hand out referees from a pool to matches without one
    pub async fn assign_referees(
        &self,
        id: CompetitionId,
        actor: UserId,
        pool: &[UserId],
    ) -> EngineResult<usize> {
        let competition = self.competition(id).await?;
        competition.require_organizer(actor, "assign referees")?;

        let board = competition.board.write().await;
        if board.drawn_at.is_none() {
            return Err(EngineError::NotDrawn);
        }
        let mut guards = board.lock_all().await;
        let mut matches: Vec<Match> = guards.iter().map(|g| (**g).clone()).collect();

        let assigned = assign_referees(
            &mut matches,
            pool,
            Duration::minutes(self.config.match_duration_minutes),
        )?;
        for (guard, updated) in guards.iter_mut().zip(matches) {
            guard.referee = updated.referee;
        }
        drop(guards);

        competition
            .emit(CompetitionEvent::RefereesAssigned { assigned })
            .await;
        Ok(assigned)
    }

    /// Submit a score for a match
    pub async fn propose_score(
        &self,
        id: CompetitionId,
        match_id: MatchId,
        actor: UserId,
        entry: ScoreEntry,
    ) -> EngineResult<ProposalOutcome> {
        let competition = self.competition(id).await?;
        let (outcome, game) = competition
            .update_match(match_id, |consensus, game| consensus.propose(game, actor, entry))
            .await?;

        match &outcome {
            ProposalOutcome::AwaitingConfirmation { awaiting } => {
                competition
                    .emit(CompetitionEvent::ScoreProposed {
                        match_id,
                        proposed_by: actor,
                        awaiting: awaiting.clone(),
                    })
                    .await;
            }
            ProposalOutcome::Completed { .. } => {
                competition
                    .emit(CompetitionEvent::ResultRecorded {
                        match_id,
                        recorded_by: actor,
                    })
                    .await;
                self.on_completed(&competition, &game).await?;
            }
        }

        Ok(outcome)
    }

    /// Accept a pending score; returns the winner (None for a draw)
    pub async fn confirm_score(
        &self,
        id: CompetitionId,
        match_id: MatchId,
        actor: UserId,
    ) -> EngineResult<Option<UserId>> {
        let competition = self.competition(id).await?;
        let (winner, game) = competition
            .update_match(match_id, |consensus, game| consensus.confirm(game, actor))
            .await?;

        competition
            .emit(CompetitionEvent::ScoreConfirmed {
                match_id,
                confirmed_by: actor,
            })
            .await;
        self.on_completed(&competition, &game).await?;

        Ok(winner)
    }

    /// Reject a pending score; returns the discarded proposal
    pub async fn reject_score(
        &self,
        id: CompetitionId,
        match_id: MatchId,
        actor: UserId,
    ) -> EngineResult<ScoreProposal> {
        let competition = self.competition(id).await?;
        let (proposal, _) = competition
            .update_match(match_id, |consensus, game| consensus.reject(game, actor))
            .await?;

        competition
            .emit(CompetitionEvent::ScoreRejected {
                match_id,
                rejected_by: actor,
                proposer: proposal.proposed_by,
            })
            .await;

        Ok(proposal)
    }

    /// Record a final result as an organizer or the match referee
    pub async fn record_result(
        &self,
        id: CompetitionId,
        match_id: MatchId,
        actor: UserId,
        entry: ScoreEntry,
    ) -> EngineResult<Option<UserId>> {
        let competition = self.competition(id).await?;
        let (winner, game) = competition
            .update_match(match_id, |consensus, game| {
                consensus.record_result(game, actor, entry)
            })
            .await?;

        competition
            .emit(CompetitionEvent::ResultRecorded {
                match_id,
                recorded_by: actor,
            })
            .await;
        self.on_completed(&competition, &game).await?;

        Ok(winner)
    }

    /// Actors to notify about a match's pending proposal
    pub async fn who_needs_to_confirm(
        &self,
        id: CompetitionId,
        match_id: MatchId,
    ) -> EngineResult<Vec<UserId>> {
        let competition = self.competition(id).await?;
        let cell = competition.cell(match_id).await?;
        let game = cell.lock().await;
        Ok(competition.consensus.who_needs_to_confirm(&game))
    }

    /// Pair the next Swiss round from the current standings
    pub async fn next_swiss_round(&self, id: CompetitionId, actor: UserId) -> EngineResult<Vec<Match>> {
        let competition = self.competition(id).await?;
        competition.require_organizer(actor, "generate a Swiss round")?;
        let TournamentFormat::Swiss { rounds } = competition.config.format else {
            return Err(EngineError::FormatMismatch(competition.config.format.to_string()));
        };

        let standings = competition.standings.lock().await;
        let participants = competition.participants.read().await;
        let mut board = competition.board.write().await;
        if board.drawn_at.is_none() {
            return Err(EngineError::NotDrawn);
        }

        let mut history = Vec::with_capacity(board.cells.len());
        for cell in board.cells.values() {
            history.push(cell.lock().await.clone());
        }
        let current = history.iter().map(|m| m.round).max().unwrap_or(0);
        if history
            .iter()
            .any(|m| m.round == current && m.status != MatchStatus::Completed)
        {
            return Err(EngineError::RoundIncomplete { round: current });
        }
        if current >= rounds {
            return Err(EngineError::SwissRoundsExhausted { rounds });
        }

        let last_id = board.cells.keys().next_back().map_or(0, |id| id.0);
        let mut seq = MatchIdSequence::starting_after(last_id);
        let pairings = draw::pair_swiss_round(&participants, &standings, &history, current + 1, &mut seq);
        for game in &pairings {
            board
                .cells
                .insert(game.id, Arc::new(Mutex::new(game.clone())));
        }

        info!(
            "Competition {}: Swiss round {} paired with {} matches",
            id,
            current + 1,
            pairings.len()
        );
        competition
            .emit(CompetitionEvent::SwissRoundGenerated {
                round: current + 1,
                matches: pairings.len(),
            })
            .await;
        Ok(pairings)
    }

    /// Current standings table
    pub async fn standings(&self, id: CompetitionId) -> EngineResult<Vec<Standing>> {
        let competition = self.competition(id).await?;
        let standings = competition.standings.lock().await;
        Ok(standings.clone())
    }

    /// All matches, by id
    pub async fn matches(&self, id: CompetitionId) -> EngineResult<Vec<Match>> {
        let competition = self.competition(id).await?;
        Ok(competition.snapshot_matches().await)
    }

    pub async fn get_match(&self, id: CompetitionId, match_id: MatchId) -> EngineResult<Match> {
        let competition = self.competition(id).await?;
        let cell = competition.cell(match_id).await?;
        let game = cell.lock().await;
        Ok(game.clone())
    }

    pub async fn participants(&self, id: CompetitionId) -> EngineResult<Vec<Participant>> {
        let competition = self.competition(id).await?;
        let participants = competition.participants.read().await;
        Ok(participants.clone())
    }

    /// Take every event emitted since the last call
    pub async fn drain_events(&self, id: CompetitionId) -> EngineResult<VecDeque<CompetitionEvent>> {
        let competition = self.competition(id).await?;
        let mut events = competition.events.lock().await;
        Ok(std::mem::take(&mut *events))
    }

    /// Capture a competition for persistence
    pub async fn export(&self, id: CompetitionId) -> EngineResult<CompetitionSnapshot> {
        let competition = self.competition(id).await?;
        let standings = competition.standings.lock().await;
        let participants = competition.participants.read().await;
        let board = competition.board.read().await;

        let mut matches = Vec::with_capacity(board.cells.len());
        for cell in board.cells.values() {
            matches.push(cell.lock().await.clone());
        }

        Ok(CompetitionSnapshot {
            id: competition.id,
            config: competition.config.clone(),
            organizers: competition.consensus.organizers().to_vec(),
            participants: participants.clone(),
            matches,
            standings: standings.clone(),
            drawn_at: board.drawn_at,
        })
    }

    /// Load a previously exported competition, replacing any live copy
    pub async fn import(&self, snapshot: CompetitionSnapshot) -> EngineResult<CompetitionId> {
        self.config.validate()?;
        snapshot.config.validate()?;

        let id = snapshot.id;
        let competition = Competition::new(id, snapshot.config, snapshot.organizers, snapshot.participants);
        {
            let mut board = competition.board.write().await;
            board.replace(snapshot.matches);
            board.drawn_at = snapshot.drawn_at;
        }
        *competition.standings.lock().await = snapshot.standings;

        self.competitions
            .write()
            .await
            .insert(id, Arc::new(competition));
        info!("Imported competition {id}");
        Ok(id)
    }

    /// Side effects of a match reaching `completed`
    async fn on_completed(&self, competition: &Competition, game: &Match) -> EngineResult<()> {
        competition
            .emit(CompetitionEvent::MatchCompleted {
                match_id: game.id,
                winner: game.winner,
            })
            .await;

        if game.stage.is_bracket() {
            self.advance_bracket(competition, game).await?;
            if let (MatchStage::Final, Some(champion)) = (&game.stage, game.winner) {
                info!("Competition {}: user {} is champion", competition.id, champion);
                competition
                    .emit(CompetitionEvent::ChampionDecided { champion })
                    .await;
            }
        } else {
            self.update_standings(competition, game.stage.group()).await;
        }

        Ok(())
    }

    /// Move the winner and loser on, following pass-through byes
    ///
    /// Each target node is locked on its own, so advancement never blocks play
    /// on unrelated matches.
    async fn advance_bracket(&self, competition: &Competition, from: &Match) -> EngineResult<()> {
        let cells = competition.cells().await;
        let mut queue = VecDeque::from([from.clone()]);

        while let Some(source) = queue.pop_front() {
            for (entrant, target) in routes(&source) {
                let cell = cells.get(&target).ok_or_else(|| {
                    error!("Match {} links to unknown match {}", source.id, target);
                    EngineError::DanglingLink {
                        from: source.id,
                        to: target,
                    }
                })?;

                let mut node = cell.lock().await;
                let resolved = place_entrant(&mut node, entrant)?;
                competition
                    .emit(CompetitionEvent::Advanced {
                        participant: entrant,
                        from: source.id,
                        to: target,
                    })
                    .await;
                if resolved {
                    queue.push_back(node.clone());
                }
            }
        }

        Ok(())
    }

    /// Recompute the table for one group (or the whole field)
    async fn update_standings(&self, competition: &Competition, group: Option<&str>) {
        let mut standings = competition.standings.lock().await;
        let participants = competition.participants.read().await.clone();
        let matches = competition.snapshot_matches().await;
        let weights = competition.config.scoring_or(&self.config);

        let table = calculate_group(&matches, &participants, &weights, group);
        let position = standings
            .iter()
            .position(|row| row.group.as_deref() == group)
            .unwrap_or(standings.len());
        standings.retain(|row| row.group.as_deref() != group);
        standings.splice(position..position, table);

        competition
            .emit(CompetitionEvent::StandingsUpdated {
                group: group.map(str::to_string),
            })
            .await;
    }
}
