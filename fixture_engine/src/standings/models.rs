//! Standings table rows.

use crate::participants::{Participant, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of results kept in a participant's form
pub const FORM_LENGTH: usize = 5;

/// Single result in a participant's form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormResult {
    W,
    D,
    L,
}

impl fmt::Display for FormResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::W => "W",
            Self::D => "D",
            Self::L => "L",
        };
        write!(f, "{repr}")
    }
}

/// One row of a standings table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub participant_id: UserId,
    pub participant_name: String,
    pub group: Option<String>,
    pub matches_played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub points: i64,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i64,
    /// Most recent results, oldest first
    pub form: Vec<FormResult>,
    /// 1-based position after sorting
    pub rank: usize,
}

impl Standing {
    /// Zeroed row for a participant
    pub fn new(participant: &Participant) -> Self {
        Self {
            participant_id: participant.id,
            participant_name: participant.display_name.clone(),
            group: participant.group.clone(),
            matches_played: 0,
            wins: 0,
            draws: 0,
            losses: 0,
            points: 0,
            goals_for: 0,
            goals_against: 0,
            goal_difference: 0,
            form: Vec::new(),
            rank: 0,
        }
    }

    /// Record one result
    pub(crate) fn record(&mut self, scored: u32, conceded: u32, result: FormResult, points: i32) {
        self.matches_played += 1;
        self.goals_for = self.goals_for.saturating_add(scored);
        self.goals_against = self.goals_against.saturating_add(conceded);
        self.goal_difference = i64::from(self.goals_for) - i64::from(self.goals_against);
        self.points += i64::from(points);

        match result {
            FormResult::W => self.wins += 1,
            FormResult::D => self.draws += 1,
            FormResult::L => self.losses += 1,
        }

        self.form.push(result);
        if self.form.len() > FORM_LENGTH {
            self.form.remove(0);
        }
    }

    /// Form as a compact string, e.g. `WWDLW`
    pub fn form_string(&self) -> String {
        self.form.iter().map(ToString::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_is_bounded() {
        let mut row = Standing::new(&Participant::new(1, "Ada"));
        for result in [
            FormResult::L,
            FormResult::W,
            FormResult::W,
            FormResult::D,
            FormResult::L,
            FormResult::W,
        ] {
            row.record(1, 1, result, 0);
        }

        assert_eq!(row.form.len(), FORM_LENGTH);
        assert_eq!(row.form_string(), "WWDLW");
        assert_eq!(row.matches_played, 6);
    }

    #[test]
    fn test_goal_difference_goes_negative() {
        let mut row = Standing::new(&Participant::new(1, "Ada"));
        row.record(0, 4, FormResult::L, 0);
        row.record(1, 0, FormResult::W, 3);

        assert_eq!(row.goal_difference, -3);
        assert_eq!(row.points, 3);
    }

    #[test]
    fn test_huge_scores_saturate() {
        let mut row = Standing::new(&Participant::new(1, "Ada"));
        row.record(u32::MAX, 1, FormResult::W, 3);
        row.record(5, u32::MAX, FormResult::L, 0);

        assert_eq!(row.goals_for, u32::MAX);
        assert_eq!(row.goals_against, u32::MAX);
        assert_eq!(row.goal_difference, 0);
        assert_eq!(row.matches_played, 2);
    }
}
