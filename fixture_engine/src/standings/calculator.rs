//! Standings recomputation.

use super::models::{FormResult, Standing};
use crate::participants::{Participant, UserId};
use crate::tournament::config::ScoringWeights;
use crate::tournament::models::{Match, MatchStatus};
use log::warn;
use std::cmp::Reverse;
use std::collections::HashMap;

/// Compute a standings table from scratch
///
/// Every completed, scored, non-bye match between two known participants
/// counts. Rows are sorted by points, goal difference and goals for (all
/// descending); ties keep participant order and ranks are strictly increasing.
pub fn calculate_standings(
    matches: &[Match],
    participants: &[Participant],
    weights: &ScoringWeights,
) -> Vec<Standing> {
    let mut rows: Vec<Standing> = participants.iter().map(Standing::new).collect();
    let index: HashMap<UserId, usize> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| (row.participant_id, i))
        .collect();

    for game in matches {
        if game.status != MatchStatus::Completed || game.is_bye {
            continue;
        }
        let (Some(score), Some(home), Some(away)) =
            (&game.score, game.participant1, game.participant2)
        else {
            continue;
        };
        let (Some(&home_row), Some(&away_row)) = (index.get(&home), index.get(&away)) else {
            warn!(
                "Skipping match {}: participant not in this table",
                game.id
            );
            continue;
        };

        let (home_result, away_result) = match game.winner {
            Some(winner) if winner == home => (FormResult::W, FormResult::L),
            Some(winner) if winner == away => (FormResult::L, FormResult::W),
            _ => (FormResult::D, FormResult::D),
        };

        rows[home_row].record(
            score.participant1,
            score.participant2,
            home_result,
            points_for(home_result, weights),
        );
        rows[away_row].record(
            score.participant2,
            score.participant1,
            away_result,
            points_for(away_result, weights),
        );
    }

    rows.sort_by_key(|row| Reverse((row.points, row.goal_difference, row.goals_for)));
    for (i, row) in rows.iter_mut().enumerate() {
        row.rank = i + 1;
    }

    rows
}

/// Compute one table per group, concatenated in group order
///
/// Groups appear in the order their first participant does; ranks restart at 1
/// in every group.
pub fn calculate_grouped_standings(
    matches: &[Match],
    participants: &[Participant],
    weights: &ScoringWeights,
) -> Vec<Standing> {
    let mut labels: Vec<Option<&str>> = Vec::new();
    for participant in participants {
        let label = participant.group.as_deref();
        if !labels.contains(&label) {
            labels.push(label);
        }
    }

    labels
        .into_iter()
        .flat_map(|label| calculate_group(matches, participants, weights, label))
        .collect()
}

/// Compute the table of a single group
pub fn calculate_group(
    matches: &[Match],
    participants: &[Participant],
    weights: &ScoringWeights,
    group: Option<&str>,
) -> Vec<Standing> {
    let members: Vec<Participant> = participants
        .iter()
        .filter(|p| p.group.as_deref() == group)
        .cloned()
        .collect();
    let fixtures: Vec<Match> = matches
        .iter()
        .filter(|m| m.stage.group() == group)
        .cloned()
        .collect();

    calculate_standings(&fixtures, &members, weights)
}

fn points_for(result: FormResult, weights: &ScoringWeights) -> i32 {
    match result {
        FormResult::W => weights.win,
        FormResult::D => weights.draw,
        FormResult::L => weights.loss,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tournament::models::{MatchId, MatchScore, MatchStage};

    fn played(id: u32, home: i64, away: i64, goals: (u32, u32)) -> Match {
        let mut game = Match::new(MatchId(id), 1, id, MatchStage::League { group: None })
            .pairing(Some(UserId(home)), Some(UserId(away)));
        game.status = MatchStatus::Completed;
        game.score = Some(MatchScore::new(goals.0, goals.1));
        game.winner = match goals.0.cmp(&goals.1) {
            std::cmp::Ordering::Greater => Some(UserId(home)),
            std::cmp::Ordering::Less => Some(UserId(away)),
            std::cmp::Ordering::Equal => None,
        };
        game
    }

    fn field(n: i64) -> Vec<Participant> {
        (1..=n).map(|i| Participant::new(i, format!("P{i}"))).collect()
    }

    #[test]
    fn test_basic_table() {
        let matches = vec![played(1, 1, 2, (2, 0)), played(2, 2, 3, (1, 1)), played(3, 3, 1, (0, 3))];
        let table = calculate_standings(&matches, &field(3), &ScoringWeights::default());

        assert_eq!(table[0].participant_id, UserId(1));
        assert_eq!(table[0].points, 6);
        assert_eq!(table[0].goal_difference, 5);
        assert_eq!(table[1].participant_id, UserId(2));
        assert_eq!(table[1].points, 1);
        assert_eq!(table[2].participant_id, UserId(3));
        assert_eq!(table[2].form_string(), "DL");
        assert_eq!(
            table.iter().map(|r| r.rank).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_tie_breakers() {
        // Two pairs level on points, separated by goal difference
        let matches = vec![
            played(1, 1, 2, (0, 3)),
            played(2, 3, 4, (2, 2)),
            played(3, 1, 3, (1, 0)),
        ];
        let table = calculate_standings(&matches, &field(4), &ScoringWeights::default());
        let order: Vec<_> = table.iter().map(|r| r.participant_id.0).collect();

        assert_eq!(order, vec![2, 1, 4, 3]);
    }

    #[test]
    fn test_goals_for_breaks_remaining_tie() {
        let matches = vec![played(1, 1, 2, (3, 3)), played(2, 3, 4, (1, 1))];
        let table = calculate_standings(&matches, &field(4), &ScoringWeights::default());
        let order: Vec<_> = table.iter().map(|r| r.participant_id.0).collect();

        assert_eq!(order, vec![1, 2, 3, 4]);
        assert_eq!(table[2].rank, 3);
        assert_eq!(table[3].rank, 4);
    }

    #[test]
    fn test_custom_weights() {
        let weights = ScoringWeights {
            win: 2,
            draw: 1,
            loss: -1,
        };
        let table = calculate_standings(&[played(1, 1, 2, (1, 0))], &field(2), &weights);

        assert_eq!(table[0].points, 2);
        assert_eq!(table[1].points, -1);
    }

    #[test]
    fn test_ignores_unfinished_and_byes() {
        let mut pending = played(1, 1, 2, (5, 0));
        pending.status = MatchStatus::PendingScore;
        let mut bye = Match::new(MatchId(2), 1, 2, MatchStage::Swiss).pairing(Some(UserId(3)), None);
        bye.resolve_bye();

        let table = calculate_standings(&[pending, bye], &field(3), &ScoringWeights::default());
        assert!(table.iter().all(|r| r.matches_played == 0));
    }

    #[test]
    fn test_unknown_participant_is_skipped() {
        let table = calculate_standings(
            &[played(1, 1, 99, (1, 0))],
            &field(2),
            &ScoringWeights::default(),
        );
        assert!(table.iter().all(|r| r.matches_played == 0));
    }

    #[test]
    fn test_grouped_tables_rank_per_group() {
        let mut participants = field(4);
        participants[0].group = Some("Group A".to_string());
        participants[1].group = Some("Group B".to_string());
        participants[2].group = Some("Group A".to_string());
        participants[3].group = Some("Group B".to_string());

        let mut a = played(1, 1, 3, (0, 1));
        a.stage = MatchStage::League {
            group: Some("Group A".to_string()),
        };
        let mut b = played(2, 2, 4, (2, 0));
        b.stage = MatchStage::League {
            group: Some("Group B".to_string()),
        };

        let table = calculate_grouped_standings(&[a, b], &participants, &ScoringWeights::default());
        let summary: Vec<_> = table
            .iter()
            .map(|r| (r.group.clone().unwrap_or_default(), r.participant_id.0, r.rank))
            .collect();

        assert_eq!(
            summary,
            vec![
                ("Group A".to_string(), 3, 1),
                ("Group A".to_string(), 1, 2),
                ("Group B".to_string(), 2, 1),
                ("Group B".to_string(), 4, 2),
            ]
        );
    }
}
