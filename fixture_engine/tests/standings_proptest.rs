//! Property-based tests for standings and fixture generation
//!
//! Random result sheets are fed into the table calculator and random field
//! sizes into the generators, checking the invariants that must hold for any
//! input.

use fixture_engine::draw::generate_round_robin;
use fixture_engine::participants::{Participant, UserId};
use fixture_engine::standings::calculate_standings;
use fixture_engine::tournament::{
    Match, MatchId, MatchIdSequence, MatchScore, MatchStage, MatchStatus, ScoringWeights,
};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

fn field(n: usize) -> Vec<Participant> {
    (1..=n as i64)
        .map(|i| Participant::new(i, format!("Player {i}")))
        .collect()
}

/// Strategy for a list of completed results between up to `n` participants
fn results(n: usize) -> impl Strategy<Value = Vec<(i64, i64, u32, u32)>> {
    prop::collection::vec(
        (1..=n as i64, 1..=n as i64, 0u32..6, 0u32..6).prop_filter("no self matches", |(a, b, _, _)| a != b),
        0..40,
    )
}

fn played(results: &[(i64, i64, u32, u32)]) -> Vec<Match> {
    results
        .iter()
        .enumerate()
        .map(|(i, &(home, away, home_goals, away_goals))| {
            let mut game = Match::new(MatchId(i as u32 + 1), 1, i as u32 + 1, MatchStage::League { group: None })
                .pairing(Some(UserId(home)), Some(UserId(away)));
            game.winner = match home_goals.cmp(&away_goals) {
                std::cmp::Ordering::Greater => Some(UserId(home)),
                std::cmp::Ordering::Less => Some(UserId(away)),
                std::cmp::Ordering::Equal => None,
            };
            game.score = Some(MatchScore::new(home_goals, away_goals));
            game.status = MatchStatus::Completed;
            game
        })
        .collect()
}

proptest! {
    #[test]
    fn test_standings_are_idempotent(sheet in results(6)) {
        let participants = field(6);
        let matches = played(&sheet);
        let weights = ScoringWeights::default();

        let first = calculate_standings(&matches, &participants, &weights);
        let second = calculate_standings(&matches, &participants, &weights);

        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_results_balance(sheet in results(8)) {
        let participants = field(8);
        let table = calculate_standings(&played(&sheet), &participants, &ScoringWeights::default());

        let wins: u32 = table.iter().map(|row| row.wins).sum();
        let losses: u32 = table.iter().map(|row| row.losses).sum();
        let draws: u32 = table.iter().map(|row| row.draws).sum();
        let played: u32 = table.iter().map(|row| row.matches_played).sum();
        let goal_difference: i64 = table.iter().map(|row| row.goal_difference).sum();

        prop_assert_eq!(wins, losses);
        prop_assert_eq!(draws % 2, 0);
        prop_assert_eq!(played as usize, sheet.len() * 2);
        prop_assert_eq!(goal_difference, 0);

        for row in &table {
            prop_assert_eq!(row.points, i64::from(row.wins) * 3 + i64::from(row.draws));
            prop_assert!(row.form.len() <= 5);
        }
    }

    #[test]
    fn test_ranks_are_unique_and_ordered(sheet in results(7)) {
        let participants = field(7);
        let table = calculate_standings(&played(&sheet), &participants, &ScoringWeights::default());

        let ranks: Vec<usize> = table.iter().map(|row| row.rank).collect();
        prop_assert_eq!(ranks, (1..=7).collect::<Vec<_>>());

        for pair in table.windows(2) {
            let above = (pair[0].points, pair[0].goal_difference, pair[0].goals_for);
            let below = (pair[1].points, pair[1].goal_difference, pair[1].goals_for);
            prop_assert!(above >= below);
        }
    }

    #[test]
    fn test_round_robin_meets_everyone_once(n in 2usize..=16, legs in 1u8..=2) {
        let entrants: Vec<UserId> = (1..=n as i64).map(UserId).collect();
        let mut seq = MatchIdSequence::default();
        let fixtures = generate_round_robin(&entrants, legs, None, &mut seq);

        prop_assert_eq!(fixtures.len(), n * (n - 1) / 2 * legs as usize);

        let mut counts: HashMap<(UserId, UserId), usize> = HashMap::new();
        for fixture in &fixtures {
            let (a, b) = (fixture.participant1.unwrap(), fixture.participant2.unwrap());
            prop_assert_ne!(a, b);
            *counts.entry((a.min(b), a.max(b))).or_insert(0) += 1;
        }
        prop_assert_eq!(counts.len(), n * (n - 1) / 2);
        prop_assert!(counts.values().all(|&count| count == legs as usize));

        let rounds: HashSet<u32> = fixtures.iter().map(|f| f.round).collect();
        for round in rounds {
            let mut busy = HashSet::new();
            for fixture in fixtures.iter().filter(|f| f.round == round) {
                prop_assert!(busy.insert(fixture.participant1.unwrap()));
                prop_assert!(busy.insert(fixture.participant2.unwrap()));
            }
        }
    }
}
