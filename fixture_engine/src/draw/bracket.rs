//! Single and double elimination brackets.

use crate::errors::{EngineError, EngineResult};
use crate::participants::{Participant, SeedingMethod, UserId, order_for_draw};
use crate::scoring::advancer;
use crate::tournament::models::{Match, MatchId, MatchStage, MatchStatus};
use log::{debug, info};
use rand::Rng;

/// Minimum field for any bracket
const MIN_PARTICIPANTS: usize = 2;

/// Bracket nodes, numbered from 1 in creation order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bracket {
    pub matches: Vec<Match>,
}

impl Bracket {
    fn push(&mut self, round: u32, match_number: usize, stage: MatchStage) -> MatchId {
        let id = MatchId(self.matches.len() as u32 + 1);
        self.matches
            .push(Match::new(id, round, match_number as u32, stage));
        id
    }

    fn get_mut(&mut self, id: MatchId) -> &mut Match {
        // Ids are handed out by `push` as index + 1
        &mut self.matches[id.0 as usize - 1]
    }

    fn link_winner(&mut self, from: MatchId, to: MatchId) {
        self.get_mut(from).next_match = Some(to);
    }

    fn link_loser(&mut self, from: MatchId, to: MatchId) {
        self.get_mut(from).loser_next_match = Some(to);
    }

    /// The node without a forward link that decides the bracket
    pub fn final_match(&self) -> Option<&Match> {
        self.matches
            .iter()
            .find(|m| m.stage == MatchStage::Final)
    }

    /// Matches of one stage and round
    pub fn round(&self, stage: &MatchStage, round: u32) -> Vec<&Match> {
        self.matches
            .iter()
            .filter(|m| &m.stage == stage && m.round == round)
            .collect()
    }

    /// Participants that received a first-round bye
    pub fn bye_recipients(&self) -> Vec<UserId> {
        self.matches
            .iter()
            .filter(|m| m.round == 1 && m.stage != MatchStage::Lower && m.is_bye)
            .filter_map(|m| m.participant1.or(m.participant2))
            .collect()
    }

    pub fn into_matches(self) -> Vec<Match> {
        self.matches
    }
}

/// Number of first-round slots for a field: the next power of two
pub fn bracket_size(participants: usize) -> usize {
    participants.max(MIN_PARTICIPANTS).next_power_of_two()
}

/// Build a single elimination bracket
///
/// Byes fill every second slot from the top of the draw order, so they are
/// spread across the bracket and go to the highest seeds under seeded draws.
/// Bye nodes are resolved immediately and their winners seated in round 2.
pub fn generate_single_elimination<R>(
    participants: &[Participant],
    method: SeedingMethod,
    rng: &mut R,
) -> EngineResult<Bracket>
where
    R: Rng + ?Sized,
{
    let slots = first_round_slots(participants, method, rng)?;
    let mut bracket = Bracket::default();
    let upper = build_upper(&mut bracket, &slots, true);

    resolve_first_round_byes(&mut bracket, &upper[0])?;

    info!(
        "Single elimination bracket: {} participants, {} slots, {} matches",
        participants.len(),
        slots.len(),
        bracket.matches.len()
    );
    Ok(bracket)
}

/// Build a double elimination bracket
///
/// The upper bracket is laid out as in single elimination. For `2^k` slots the
/// lower bracket has `2(k-1)` rounds: odd rounds pair the previous lower
/// winners (round 1 pairs first-round losers), even rounds meet those winners
/// with the losers of the next upper round. The grand final takes the upper
/// and lower winners; there is no reset match.
///
/// Lower nodes starved by first-round byes are marked as byes: with no
/// possible entrant they are dead, with one they pass it straight through.
pub fn generate_double_elimination<R>(
    participants: &[Participant],
    method: SeedingMethod,
    rng: &mut R,
) -> EngineResult<Bracket>
where
    R: Rng + ?Sized,
{
    let slots = first_round_slots(participants, method, rng)?;
    let mut bracket = Bracket::default();
    let upper = build_upper(&mut bracket, &slots, false);
    let upper_rounds = upper.len();
    let grand_final_round = upper_rounds as u32 + 1;

    if upper_rounds == 1 {
        let grand_final = bracket.push(grand_final_round, 1, MatchStage::Final);
        bracket.link_winner(upper[0][0], grand_final);
        bracket.link_loser(upper[0][0], grand_final);
    } else {
        let mut previous: Vec<MatchId> = Vec::new();

        for j in 1..upper_rounds {
            let count = 1usize << (upper_rounds - 1 - j);

            let odd_round = 2 * j as u32 - 1;
            let mut odd = Vec::with_capacity(count);
            for i in 0..count {
                let id = bracket.push(odd_round, i + 1, MatchStage::Lower);
                if j == 1 {
                    bracket.link_loser(upper[0][2 * i], id);
                    bracket.link_loser(upper[0][2 * i + 1], id);
                } else {
                    bracket.link_winner(previous[2 * i], id);
                    bracket.link_winner(previous[2 * i + 1], id);
                }
                odd.push(id);
            }

            let even_round = 2 * j as u32;
            let mut even = Vec::with_capacity(count);
            for i in 0..count {
                let id = bracket.push(even_round, i + 1, MatchStage::Lower);
                bracket.link_winner(odd[i], id);
                bracket.link_loser(upper[j][i], id);
                even.push(id);
            }

            previous = even;
        }

        let grand_final = bracket.push(grand_final_round, 1, MatchStage::Final);
        bracket.link_winner(upper[upper_rounds - 1][0], grand_final);
        bracket.link_winner(previous[0], grand_final);
    }

    mark_starved_lower_nodes(&mut bracket);
    resolve_first_round_byes(&mut bracket, &upper[0])?;

    info!(
        "Double elimination bracket: {} participants, {} slots, {} matches",
        participants.len(),
        slots.len(),
        bracket.matches.len()
    );
    Ok(bracket)
}

/// Order the field and interleave byes at odd positions
fn first_round_slots<R>(
    participants: &[Participant],
    method: SeedingMethod,
    rng: &mut R,
) -> EngineResult<Vec<Option<UserId>>>
where
    R: Rng + ?Sized,
{
    if participants.len() < MIN_PARTICIPANTS {
        return Err(EngineError::NotEnoughParticipants {
            needed: MIN_PARTICIPANTS,
            current: participants.len(),
        });
    }

    let size = bracket_size(participants.len());
    let byes = size - participants.len();

    let mut slots: Vec<Option<UserId>> = order_for_draw(participants, method, rng)
        .iter()
        .map(|p| Some(p.id))
        .collect();
    for i in 0..byes {
        slots.insert(i * 2 + 1, None);
    }

    debug!("Bracket of {size} with {byes} byes");
    Ok(slots)
}

/// Create the upper bracket rounds, returning node ids per round
fn build_upper(
    bracket: &mut Bracket,
    slots: &[Option<UserId>],
    last_is_final: bool,
) -> Vec<Vec<MatchId>> {
    let rounds = slots.len().trailing_zeros();
    let stage_for = |round: u32| {
        if last_is_final && round == rounds {
            MatchStage::Final
        } else {
            MatchStage::Upper
        }
    };

    let mut upper: Vec<Vec<MatchId>> = Vec::with_capacity(rounds as usize);

    let mut first = Vec::with_capacity(slots.len() / 2);
    for (i, pair) in slots.chunks(2).enumerate() {
        let id = bracket.push(1, i + 1, stage_for(1));
        let node = bracket.get_mut(id);
        node.participant1 = pair[0];
        node.participant2 = pair[1];
        first.push(id);
    }
    upper.push(first);

    for round in 2..=rounds {
        let feeders = upper[round as usize - 2].clone();
        let mut current = Vec::with_capacity(feeders.len() / 2);
        for i in 0..feeders.len() / 2 {
            current.push(bracket.push(round, i + 1, stage_for(round)));
        }
        for (i, feeder) in feeders.into_iter().enumerate() {
            bracket.link_winner(feeder, current[i / 2]);
        }
        upper.push(current);
    }

    upper
}

/// Mark lower-bracket nodes that cannot receive two entrants
fn mark_starved_lower_nodes(bracket: &mut Bracket) {
    // First-round byes produce no loser
    for node in bracket.matches.iter_mut() {
        if node.round == 1 && node.stage == MatchStage::Upper && !node.is_ready() {
            node.is_bye = true;
            node.loser_next_match = None;
        }
    }

    // Feeders always precede the nodes they feed, so one pass in id order settles it
    for index in 0..bracket.matches.len() {
        if bracket.matches[index].stage != MatchStage::Lower {
            continue;
        }
        let id = bracket.matches[index].id;
        let live_feeders = bracket.matches[..index]
            .iter()
            .filter(|feeder| {
                let sends_winner = feeder.next_match == Some(id) && !is_dead(feeder);
                let sends_loser = feeder.loser_next_match == Some(id) && !feeder.is_bye;
                sends_winner || sends_loser
            })
            .count();

        let node = &mut bracket.matches[index];
        match live_feeders {
            0 => {
                node.is_bye = true;
                node.status = MatchStatus::Completed;
                node.next_match = None;
                debug!("Lower match {} has no entrants", node.id);
            }
            1 => {
                node.is_bye = true;
                debug!("Lower match {} passes its entrant through", node.id);
            }
            _ => {}
        }
    }
}

fn is_dead(node: &Match) -> bool {
    node.is_bye && node.status == MatchStatus::Completed && node.winner.is_none() && node.open_slots() == 2
}

fn resolve_first_round_byes(bracket: &mut Bracket, first_round: &[MatchId]) -> EngineResult<()> {
    for &id in first_round {
        let node = bracket.get_mut(id);
        if node.is_ready() {
            continue;
        }
        node.resolve_bye();
        debug!("Match {} resolved as a bye for {:?}", id, node.winner);
        advancer::advance(&mut bracket.matches, id)?;
    }
    Ok(())
}
