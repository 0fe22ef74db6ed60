//! Bracket advancement.

use crate::errors::{EngineError, EngineResult};
use crate::participants::UserId;
use crate::tournament::models::{Match, MatchId, MatchStatus};
use log::{debug, error};
use std::collections::{BTreeMap, VecDeque};

/// Lookup of bracket nodes by id
pub trait MatchArena {
    fn node(&self, id: MatchId) -> Option<&Match>;
    fn node_mut(&mut self, id: MatchId) -> Option<&mut Match>;
}

impl MatchArena for Vec<Match> {
    fn node(&self, id: MatchId) -> Option<&Match> {
        arena_index(self, id).map(|i| &self[i])
    }

    fn node_mut(&mut self, id: MatchId) -> Option<&mut Match> {
        arena_index(self, id).map(|i| &mut self[i])
    }
}

impl MatchArena for BTreeMap<MatchId, Match> {
    fn node(&self, id: MatchId) -> Option<&Match> {
        self.get(&id)
    }

    fn node_mut(&mut self, id: MatchId) -> Option<&mut Match> {
        self.get_mut(&id)
    }
}

/// Generated brackets number their nodes from 1, so try the direct slot first
fn arena_index(matches: &[Match], id: MatchId) -> Option<usize> {
    let direct = (id.0 as usize).checked_sub(1);
    match direct {
        Some(i) if matches.get(i).is_some_and(|m| m.id == id) => Some(i),
        _ => matches.iter().position(|m| m.id == id),
    }
}

/// A participant moved from one node to another
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advancement {
    pub participant: UserId,
    pub from: MatchId,
    pub to: MatchId,
    /// The target resolved itself as a bye on arrival
    pub auto_resolved: bool,
}

/// Where a completed node sends its winner and loser
pub fn routes(node: &Match) -> Vec<(UserId, MatchId)> {
    let mut routes = Vec::with_capacity(2);
    if let (Some(winner), Some(next)) = (node.winner, node.next_match) {
        routes.push((winner, next));
    }
    if let (Some(loser), Some(next)) = (node.loser(), node.loser_next_match) {
        routes.push((loser, next));
    }
    routes
}

/// Seat an entrant in the first empty slot of a node
///
/// Returns true when the node is a pass-through bye and resolved itself, in
/// which case its own routes must be followed next.
pub fn place_entrant(node: &mut Match, entrant: UserId) -> EngineResult<bool> {
    if node.status == MatchStatus::Completed || node.open_slots() == 0 {
        error!(
            "Cannot seat user {} in match {}: slots {:?}/{:?}, status {}",
            entrant, node.id, node.participant1, node.participant2, node.status
        );
        return Err(EngineError::BracketSlotsFull(node.id));
    }

    if node.participant1.is_none() {
        node.participant1 = Some(entrant);
    } else {
        node.participant2 = Some(entrant);
    }
    debug!("User {} seated in match {}", entrant, node.id);

    if node.is_bye {
        node.resolve_bye();
        return Ok(true);
    }

    Ok(false)
}

/// Propagate a completed node's winner (and loser) through the bracket
///
/// Pass-through byes are followed until every entrant rests in a node that
/// needs to be played.
pub fn advance<A>(arena: &mut A, from: MatchId) -> EngineResult<Vec<Advancement>>
where
    A: MatchArena + ?Sized,
{
    let mut advancements = Vec::new();
    let mut queue = VecDeque::from([from]);

    while let Some(id) = queue.pop_front() {
        let outgoing = routes(arena.node(id).ok_or(EngineError::MatchNotFound(id))?);

        for (entrant, target) in outgoing {
            let node = arena.node_mut(target).ok_or_else(|| {
                error!("Match {id} links to unknown match {target}");
                EngineError::DanglingLink { from: id, to: target }
            })?;
            let auto_resolved = place_entrant(node, entrant)?;

            advancements.push(Advancement {
                participant: entrant,
                from: id,
                to: target,
                auto_resolved,
            });
            if auto_resolved {
                queue.push_back(target);
            }
        }
    }

    Ok(advancements)
}
