//! Participant data models.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a user known to the engine: participant, referee or organizer.
///
/// Parsed once at the boundary; downstream code never re-inspects raw ids.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Gender as declared at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// Coarse skill tier parsed from the free-form registration label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillTier {
    Professional,
    Advanced,
    Other,
}

impl SkillTier {
    /// Parse a registration label (English or Turkish, case-insensitive)
    pub fn from_label(label: Option<&str>) -> Self {
        let Some(label) = label else {
            return SkillTier::Other;
        };

        match label.trim().to_lowercase().as_str() {
            "professional" | "profesyonel" => SkillTier::Professional,
            // "İleri" lowercases to a dotted i followed by a combining dot
            "advanced" | "ileri" | "i\u{307}leri" => SkillTier::Advanced,
            _ => SkillTier::Other,
        }
    }

    /// Shared seed for the tier, if it has one
    pub fn fixed_seed(self) -> Option<u32> {
        match self {
            SkillTier::Professional => Some(1),
            SkillTier::Advanced => Some(2),
            SkillTier::Other => None,
        }
    }
}

/// Age bracket used by age-based group allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeBracket {
    /// Under 12
    Mini,
    /// 12-13
    Cadet,
    /// 14-17
    Youth,
    /// 18-34
    Adult,
    /// 35 and over
    Veteran,
    /// No age given, or the participant's bracket was not declared
    Open,
}

impl AgeBracket {
    /// Bucket an age into its bracket
    pub fn for_age(age: Option<u32>) -> Self {
        match age {
            None | Some(0) => AgeBracket::Open,
            Some(age) if age < 12 => AgeBracket::Mini,
            Some(age) if age < 14 => AgeBracket::Cadet,
            Some(age) if age < 18 => AgeBracket::Youth,
            Some(age) if age < 35 => AgeBracket::Adult,
            Some(_) => AgeBracket::Veteran,
        }
    }

    /// Group label for the bracket
    pub fn label(self) -> &'static str {
        match self {
            AgeBracket::Mini => "Mini",
            AgeBracket::Cadet => "Cadet",
            AgeBracket::Youth => "Youth",
            AgeBracket::Adult => "Adult",
            AgeBracket::Veteran => "Veteran",
            AgeBracket::Open => "Open",
        }
    }
}

impl fmt::Display for AgeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Competition participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// User ID
    pub id: UserId,
    /// Display name
    pub display_name: String,
    /// Raw skill label from registration
    #[serde(default)]
    pub skill_level: Option<String>,
    /// Age in years
    #[serde(default)]
    pub age: Option<u32>,
    /// Declared gender
    #[serde(default)]
    pub gender: Option<Gender>,
    /// Seed (None until the draw assigns one)
    #[serde(default)]
    pub seed: Option<u32>,
    /// Group label (None until the draw assigns one)
    #[serde(default)]
    pub group: Option<String>,
    /// Whether the participant received a first-round bye
    #[serde(default)]
    pub is_bye: bool,
}

impl Participant {
    /// Create a participant with only identity and name
    pub fn new(id: impl Into<UserId>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            skill_level: None,
            age: None,
            gender: None,
            seed: None,
            group: None,
            is_bye: false,
        }
    }

    pub fn with_skill_level(mut self, label: impl Into<String>) -> Self {
        self.skill_level = Some(label.into());
        self
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Clear everything a draw writes (seed, group, bye flag)
    pub fn clear_draw(&mut self) {
        self.seed = None;
        self.group = None;
        self.is_bye = false;
    }
}
