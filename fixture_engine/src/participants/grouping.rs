//! Group allocation.

use super::models::{AgeBracket, Gender, Participant};
use log::debug;
use serde::{Deserialize, Serialize};

/// Rules for splitting participants into groups
///
/// Applied in priority order: declared age brackets, then gender restriction,
/// then a fixed group count, then a single catch-all group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupingRules {
    /// Age brackets the competition is open to
    pub age_brackets: Vec<AgeBracket>,
    /// Split men and women into separate groups
    pub gender_restricted: bool,
    /// Fixed number of groups, filled round-robin
    pub group_count: Option<usize>,
}

/// A named subset of participants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantGroup {
    pub label: String,
    pub participants: Vec<Participant>,
}

impl ParticipantGroup {
    fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            participants: Vec::new(),
        }
    }
}

/// Alphabetic group label: `Group A` .. `Group Z`, then `Group 27` onwards
pub fn group_label(index: usize) -> String {
    if index < 26 {
        format!("Group {}", (b'A' + index as u8) as char)
    } else {
        format!("Group {}", index + 1)
    }
}

/// Partition participants into groups
///
/// Each participant's `group` field is set as a side effect. Empty groups are
/// dropped from the result; group order follows the rule that produced them.
pub fn allocate_groups(
    participants: &mut [Participant],
    rules: &GroupingRules,
) -> Vec<ParticipantGroup> {
    let mut groups = if !rules.age_brackets.is_empty() {
        by_age(participants, &rules.age_brackets)
    } else if rules.gender_restricted {
        by_gender(participants)
    } else {
        match rules.group_count {
            Some(count) if count > 1 => by_count(participants, count),
            _ => {
                let mut open = ParticipantGroup::new(AgeBracket::Open.label());
                open.participants = participants.to_vec();
                vec![open]
            }
        }
    };

    groups.retain(|group| !group.participants.is_empty());

    for group in &mut groups {
        for member in &mut group.participants {
            member.group = Some(group.label.clone());
            if let Some(participant) = participants.iter_mut().find(|p| p.id == member.id) {
                participant.group = Some(group.label.clone());
            }
        }
        debug!("{}: {} participants", group.label, group.participants.len());
    }

    groups
}

fn by_age(participants: &[Participant], declared: &[AgeBracket]) -> Vec<ParticipantGroup> {
    let mut brackets: Vec<AgeBracket> = Vec::new();
    for bracket in declared.iter().chain(std::iter::once(&AgeBracket::Open)) {
        if !brackets.contains(bracket) {
            brackets.push(*bracket);
        }
    }

    let mut groups: Vec<ParticipantGroup> = brackets
        .iter()
        .map(|bracket| ParticipantGroup::new(bracket.label()))
        .collect();

    for participant in participants {
        let bracket = AgeBracket::for_age(participant.age);
        // Undeclared brackets fall into the open group
        let index = brackets
            .iter()
            .position(|b| *b == bracket)
            .unwrap_or(brackets.len() - 1);
        groups[index].participants.push(participant.clone());
    }

    groups
}

fn by_gender(participants: &[Participant]) -> Vec<ParticipantGroup> {
    let mut men = ParticipantGroup::new("Men");
    let mut women = ParticipantGroup::new("Women");

    for participant in participants {
        match participant.gender {
            Some(Gender::Female) => women.participants.push(participant.clone()),
            _ => men.participants.push(participant.clone()),
        }
    }

    vec![men, women]
}

fn by_count(participants: &[Participant], count: usize) -> Vec<ParticipantGroup> {
    let mut groups: Vec<ParticipantGroup> = (0..count)
        .map(|i| ParticipantGroup::new(group_label(i)))
        .collect();

    for (i, participant) in participants.iter().enumerate() {
        groups[i % count].participants.push(participant.clone());
    }

    groups
}
