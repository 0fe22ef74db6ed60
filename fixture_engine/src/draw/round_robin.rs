//! Round robin and group stage fixtures.

use crate::participants::{ParticipantGroup, UserId};
use crate::tournament::models::{Match, MatchIdSequence, MatchStage};
use log::debug;

/// Generate round robin fixtures with the circle method
///
/// The first entrant stays fixed while the rest rotate one position per round.
/// Odd fields get a ghost entrant; whoever meets the ghost rests that round.
/// A second leg replays every round with home and away swapped, numbered after
/// the first leg. Fewer than two entrants yield no fixtures.
pub fn generate_round_robin(
    entrants: &[UserId],
    legs: u8,
    group: Option<&str>,
    seq: &mut MatchIdSequence,
) -> Vec<Match> {
    if entrants.len() < 2 {
        return Vec::new();
    }

    let mut circle: Vec<Option<UserId>> = entrants.iter().copied().map(Some).collect();
    if circle.len() % 2 == 1 {
        circle.push(None);
    }
    let size = circle.len();
    let rounds = size as u32 - 1;

    let mut pairings: Vec<Vec<(UserId, UserId)>> = Vec::with_capacity(rounds as usize);
    for _ in 0..rounds {
        let round: Vec<(UserId, UserId)> = (0..size / 2)
            .filter_map(|i| match (circle[i], circle[size - 1 - i]) {
                (Some(home), Some(away)) => Some((home, away)),
                _ => None,
            })
            .collect();
        pairings.push(round);

        if let Some(last) = circle.pop() {
            circle.insert(1, last);
        }
    }

    let stage = MatchStage::League {
        group: group.map(str::to_string),
    };
    let mut fixtures = Vec::with_capacity(pairings.iter().map(Vec::len).sum::<usize>() * legs as usize);

    for leg in 0..u32::from(legs) {
        for (r, round) in pairings.iter().enumerate() {
            let round_number = leg * rounds + r as u32 + 1;
            for (i, &(home, away)) in round.iter().enumerate() {
                let (home, away) = if leg == 0 { (home, away) } else { (away, home) };
                fixtures.push(
                    Match::new(seq.next_id(), round_number, i as u32 + 1, stage.clone())
                        .pairing(Some(home), Some(away)),
                );
            }
        }
    }

    debug!(
        "Round robin{}: {} entrants, {} legs, {} fixtures",
        group.map(|g| format!(" ({g})")).unwrap_or_default(),
        entrants.len(),
        legs,
        fixtures.len()
    );
    fixtures
}

/// Run each group through the round robin generator, stamping the group label
pub fn generate_group_stage(
    groups: &[ParticipantGroup],
    legs: u8,
    seq: &mut MatchIdSequence,
) -> Vec<Match> {
    groups
        .iter()
        .flat_map(|group| {
            let entrants: Vec<UserId> = group.participants.iter().map(|p| p.id).collect();
            generate_round_robin(&entrants, legs, Some(&group.label), seq)
        })
        .collect()
}
