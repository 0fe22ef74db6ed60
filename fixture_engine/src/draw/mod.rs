//! Draw module: turns a seeded field into its initial fixture list.
//!
//! - Elimination formats build a linked bracket ([`bracket`])
//! - Round robin and group stages use the circle method ([`round_robin`])
//! - Swiss pairs one round at a time ([`swiss`])

pub mod bracket;
pub mod round_robin;
pub mod swiss;

pub use bracket::{Bracket, bracket_size, generate_double_elimination, generate_single_elimination};
pub use round_robin::{generate_group_stage, generate_round_robin};
pub use swiss::pair_swiss_round;

use crate::errors::{EngineError, EngineResult};
use crate::participants::{Participant, ParticipantGroup, UserId, allocate_groups, assign_seeds};
use crate::tournament::config::{TournamentConfig, TournamentFormat};
use crate::tournament::models::{Match, MatchIdSequence};
use log::info;
use rand::Rng;

/// Result of a draw
#[derive(Debug, Clone, Default)]
pub struct DrawOutcome {
    pub matches: Vec<Match>,
    /// Groups formed for a group stage (empty otherwise)
    pub groups: Vec<ParticipantGroup>,
}

/// Run the draw for a competition
///
/// Seeds are assigned to unseeded participants first. Group labels and bye
/// flags are written back to `participants`; outside a group stage any group
/// label carried over from registration is cleared so the field shares one
/// table.
pub fn conduct<R>(
    participants: &mut [Participant],
    config: &TournamentConfig,
    rng: &mut R,
) -> EngineResult<DrawOutcome>
where
    R: Rng + ?Sized,
{
    if participants.len() < 2 {
        return Err(EngineError::NotEnoughParticipants {
            needed: 2,
            current: participants.len(),
        });
    }

    assign_seeds(participants);
    if !matches!(config.format, TournamentFormat::GroupStage { .. }) {
        participants.iter_mut().for_each(|p| p.group = None);
    }

    let mut seq = MatchIdSequence::default();
    let entrants: Vec<UserId> = participants.iter().map(|p| p.id).collect();

    let outcome = match config.format {
        TournamentFormat::SingleElimination => DrawOutcome {
            matches: generate_single_elimination(participants, config.seeding, rng)?.into_matches(),
            groups: Vec::new(),
        },
        TournamentFormat::DoubleElimination => DrawOutcome {
            matches: generate_double_elimination(participants, config.seeding, rng)?.into_matches(),
            groups: Vec::new(),
        },
        TournamentFormat::RoundRobin { legs } => DrawOutcome {
            matches: generate_round_robin(&entrants, legs, None, &mut seq),
            groups: Vec::new(),
        },
        TournamentFormat::GroupStage { groups } => {
            let mut rules = config.grouping.clone();
            if rules.age_brackets.is_empty() && !rules.gender_restricted && rules.group_count.is_none() {
                rules.group_count = Some(groups);
            }
            let groups = allocate_groups(participants, &rules);
            DrawOutcome {
                matches: generate_group_stage(&groups, 1, &mut seq),
                groups,
            }
        }
        TournamentFormat::Swiss { .. } => DrawOutcome {
            matches: pair_swiss_round(participants, &[], &[], 1, &mut seq),
            groups: Vec::new(),
        },
    };

    mark_bye_recipients(participants, &outcome.matches);

    info!(
        "Draw for {} ({}): {} participants, {} matches",
        config.name,
        config.format,
        participants.len(),
        outcome.matches.len()
    );
    Ok(outcome)
}

/// Flag participants that advanced from round 1 without playing
pub fn mark_bye_recipients(participants: &mut [Participant], matches: &[Match]) {
    for game in matches.iter().filter(|m| m.round == 1 && m.is_bye) {
        let Some(winner) = game.winner else {
            continue;
        };
        if let Some(participant) = participants.iter_mut().find(|p| p.id == winner) {
            participant.is_bye = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::participants::GroupingRules;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn field(n: i64) -> Vec<Participant> {
        (1..=n).map(|i| Participant::new(i, format!("P{i}"))).collect()
    }

    #[test]
    fn test_draw_rejects_tiny_field() {
        let mut participants = field(1);
        let config = TournamentConfig::new("Cup", TournamentFormat::RoundRobin { legs: 1 });
        let mut rng = StdRng::seed_from_u64(0);

        let err = conduct(&mut participants, &config, &mut rng).unwrap_err();
        assert!(matches!(err, EngineError::NotEnoughParticipants { .. }));
    }

    #[test]
    fn test_draw_seeds_and_flags_byes() {
        let mut participants = field(3);
        let config = TournamentConfig::new("Cup", TournamentFormat::SingleElimination);
        let mut rng = StdRng::seed_from_u64(0);

        let outcome = conduct(&mut participants, &config, &mut rng).unwrap();

        assert_eq!(outcome.matches.len(), 3);
        assert!(participants.iter().all(|p| p.seed.is_some()));
        assert_eq!(participants.iter().filter(|p| p.is_bye).count(), 1);
    }

    #[test]
    fn test_group_stage_uses_format_group_count() {
        let mut participants = field(8);
        let config = TournamentConfig::new("Cup", TournamentFormat::GroupStage { groups: 2 });
        let mut rng = StdRng::seed_from_u64(0);

        let outcome = conduct(&mut participants, &config, &mut rng).unwrap();

        assert_eq!(outcome.groups.len(), 2);
        // Two groups of four: 6 fixtures each
        assert_eq!(outcome.matches.len(), 12);
        assert!(outcome.matches.iter().all(|m| m.stage.group().is_some()));
    }

    #[test]
    fn test_group_stage_prefers_declared_rules() {
        let mut participants = field(4);
        participants[0].gender = Some(crate::participants::Gender::Female);
        participants[1].gender = Some(crate::participants::Gender::Female);
        let config = TournamentConfig::new("Cup", TournamentFormat::GroupStage { groups: 4 })
            .with_grouping(GroupingRules {
                gender_restricted: true,
                ..GroupingRules::default()
            });
        let mut rng = StdRng::seed_from_u64(0);

        let outcome = conduct(&mut participants, &config, &mut rng).unwrap();
        let labels: Vec<_> = outcome.groups.iter().map(|g| g.label.as_str()).collect();

        assert_eq!(labels, vec!["Men", "Women"]);
        assert_eq!(outcome.matches.len(), 2);
    }

    #[test]
    fn test_league_draw_drops_registration_groups() {
        let mut participants = field(4);
        for participant in &mut participants {
            participant.group = Some("Registration Pool".to_string());
        }
        let config = TournamentConfig::new("Cup", TournamentFormat::RoundRobin { legs: 1 });
        let mut rng = StdRng::seed_from_u64(0);

        conduct(&mut participants, &config, &mut rng).unwrap();
        assert!(participants.iter().all(|p| p.group.is_none()));
    }

    #[test]
    fn test_swiss_draw_is_first_round_only() {
        let mut participants = field(6);
        let config = TournamentConfig::new("Cup", TournamentFormat::Swiss { rounds: 5 });
        let mut rng = StdRng::seed_from_u64(0);

        let outcome = conduct(&mut participants, &config, &mut rng).unwrap();
        assert_eq!(outcome.matches.len(), 3);
        assert!(outcome.matches.iter().all(|m| m.round == 1));
    }
}
