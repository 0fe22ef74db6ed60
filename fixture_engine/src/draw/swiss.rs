//! Swiss pairing.

use crate::participants::{Participant, UserId};
use crate::standings::Standing;
use crate::tournament::models::{Match, MatchIdSequence, MatchStage};
use log::{debug, warn};
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

/// Pair one Swiss round from the current standings
///
/// Participants are ordered by points (ties keep registration order) and each
/// one, from the top, meets the highest-placed free participant they have not
/// played yet. When only previous opponents are left the pairing repeats
/// rather than leaving anyone out. With an odd field the lowest-placed
/// participant without an earlier bye sits out with an auto-resolved bye.
pub fn pair_swiss_round(
    participants: &[Participant],
    standings: &[Standing],
    history: &[Match],
    round: u32,
    seq: &mut MatchIdSequence,
) -> Vec<Match> {
    let points: HashMap<UserId, i64> = standings
        .iter()
        .map(|row| (row.participant_id, row.points))
        .collect();

    let mut order: Vec<UserId> = participants.iter().map(|p| p.id).collect();
    order.sort_by_key(|id| Reverse(points.get(id).copied().unwrap_or(0)));

    let mut played: HashSet<(UserId, UserId)> = HashSet::new();
    let mut had_bye: HashSet<UserId> = HashSet::new();
    for game in history {
        match (game.participant1, game.participant2) {
            (Some(a), Some(b)) => {
                played.insert(pair_key(a, b));
            }
            (Some(a), None) | (None, Some(a)) if game.is_bye => {
                had_bye.insert(a);
            }
            _ => {}
        }
    }

    let bye = if order.len() % 2 == 1 {
        let index = order
            .iter()
            .rposition(|id| !had_bye.contains(id))
            .unwrap_or(order.len() - 1);
        Some(order.remove(index))
    } else {
        None
    };

    let mut matches = Vec::with_capacity(order.len() / 2 + 1);
    let mut used = vec![false; order.len()];

    for i in 0..order.len() {
        if used[i] {
            continue;
        }
        used[i] = true;

        let fresh = (i + 1..order.len())
            .find(|&j| !used[j] && !played.contains(&pair_key(order[i], order[j])));
        let opponent = fresh.or_else(|| {
            let repeat = (i + 1..order.len()).find(|&j| !used[j]);
            if let Some(j) = repeat {
                warn!(
                    "Swiss round {}: users {} and {} meet again",
                    round, order[i], order[j]
                );
            }
            repeat
        });

        if let Some(j) = opponent {
            used[j] = true;
            matches.push(
                Match::new(seq.next_id(), round, matches.len() as u32 + 1, MatchStage::Swiss)
                    .pairing(Some(order[i]), Some(order[j])),
            );
        }
    }

    if let Some(resting) = bye {
        let mut node = Match::new(seq.next_id(), round, matches.len() as u32 + 1, MatchStage::Swiss)
            .pairing(Some(resting), None);
        node.resolve_bye();
        debug!("Swiss round {round}: user {resting} has a bye");
        matches.push(node);
    }

    matches
}

fn pair_key(a: UserId, b: UserId) -> (UserId, UserId) {
    (a.min(b), a.max(b))
}
