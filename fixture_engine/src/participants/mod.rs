//! Participant module: identities, seeding and group allocation.
//!
//! This module covers the part of a draw that runs before any fixture exists:
//! - Participant records as supplied by the registration layer
//! - Coarse seed tiers derived from skill labels
//! - Draw ordering (random, seeded or manual)
//! - Group allocation by age bracket, gender or fixed group count
//!
//! ## Example
//!
//! ```
//! use fixture_engine::participants::{GroupingRules, Participant, allocate_groups, assign_seeds};
//!
//! let mut participants = vec![
//!     Participant::new(1, "Ada").with_skill_level("professional"),
//!     Participant::new(2, "Brook"),
//!     Participant::new(3, "Cyd").with_skill_level("advanced"),
//! ];
//!
//! assign_seeds(&mut participants);
//! assert_eq!(participants[0].seed, Some(1));
//! assert_eq!(participants[1].seed, Some(3));
//! assert_eq!(participants[2].seed, Some(2));
//!
//! let rules = GroupingRules { group_count: Some(2), ..GroupingRules::default() };
//! let groups = allocate_groups(&mut participants, &rules);
//! assert_eq!(groups.len(), 2);
//! assert_eq!(participants[1].group.as_deref(), Some("Group B"));
//! ```

pub mod grouping;
pub mod models;
pub mod seeding;

pub use grouping::{GroupingRules, ParticipantGroup, allocate_groups, group_label};
pub use models::{AgeBracket, Gender, Participant, SkillTier, UserId};
pub use seeding::{SeedingMethod, assign_seeds, order_for_draw};
