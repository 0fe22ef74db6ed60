//! Seed assignment and draw ordering.

use super::models::{Participant, SkillTier};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// First seed handed out to participants outside the fixed tiers
const FIRST_OPEN_SEED: u32 = 3;

/// How participants are ordered before bracket placement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedingMethod {
    /// Shuffle the field
    #[default]
    Random,
    /// Ascending seed, unseeded participants last
    Seeded,
    /// Keep the order the participants were supplied in
    Manual,
}

/// Assign seeds to every participant that does not have one yet
///
/// Professionals share seed 1 and advanced players share seed 2; everyone else
/// gets a unique seed from 3 upwards in list order. Participants that already
/// carry a seed are left untouched.
///
/// # Returns
///
/// * `usize` - Number of participants that received a seed
pub fn assign_seeds(participants: &mut [Participant]) -> usize {
    let mut next_open_seed = FIRST_OPEN_SEED;
    let mut assigned = 0;

    for participant in participants.iter_mut().filter(|p| p.seed.is_none()) {
        let tier = SkillTier::from_label(participant.skill_level.as_deref());
        let seed = tier.fixed_seed().unwrap_or_else(|| {
            let seed = next_open_seed;
            next_open_seed += 1;
            seed
        });
        participant.seed = Some(seed);
        assigned += 1;
    }

    assigned
}

/// Order participants for placement according to the seeding method
pub fn order_for_draw<R>(
    participants: &[Participant],
    method: SeedingMethod,
    rng: &mut R,
) -> Vec<Participant>
where
    R: Rng + ?Sized,
{
    let mut ordered = participants.to_vec();

    match method {
        SeedingMethod::Random => ordered.shuffle(rng),
        SeedingMethod::Seeded => ordered.sort_by_key(|p| p.seed.unwrap_or(u32::MAX)),
        SeedingMethod::Manual => {}
    }

    ordered
}
