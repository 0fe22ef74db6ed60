//! Referee auto-assignment.

use crate::errors::{EngineError, EngineResult};
use crate::participants::UserId;
use crate::tournament::models::{Match, MatchStatus};
use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use std::collections::HashMap;

/// Give every open match without a referee one from the pool
///
/// Scheduled matches are handled first in start-time order, then unscheduled
/// ones in list order. A referee never officiates a match they play in, and
/// never two scheduled matches that start less than `match_duration` apart.
/// The least loaded eligible referee is chosen, ties going to pool order.
/// Existing assignments count towards a referee's load.
///
/// # Returns
///
/// * `usize` - Number of matches that received a referee
pub fn assign_referees(
    matches: &mut [Match],
    pool: &[UserId],
    match_duration: Duration,
) -> EngineResult<usize> {
    if pool.is_empty() {
        return Err(EngineError::NoReferees);
    }

    let mut load: HashMap<UserId, usize> = pool.iter().map(|r| (*r, 0)).collect();
    let mut busy: Vec<(UserId, DateTime<Utc>)> = Vec::new();
    for game in matches.iter() {
        if let Some(referee) = game.referee {
            if let Some(count) = load.get_mut(&referee) {
                *count += 1;
            }
            if let Some(slot) = &game.schedule {
                busy.push((referee, slot.starts_at));
            }
        }
    }

    let mut pending: Vec<usize> = (0..matches.len())
        .filter(|&i| {
            let game = &matches[i];
            game.referee.is_none() && !game.is_bye && game.status != MatchStatus::Completed
        })
        .collect();
    // Scheduled first, by start time; the sort is stable for equal keys
    pending.sort_by_key(|&i| match &matches[i].schedule {
        Some(slot) => (0, Some(slot.starts_at)),
        None => (1, None),
    });

    let mut assigned = 0;
    for index in pending {
        let game = &matches[index];
        let starts_at = game.schedule.as_ref().map(|slot| slot.starts_at);

        let chosen = pool
            .iter()
            .copied()
            .filter(|referee| !game.is_seated(*referee))
            .filter(|referee| match starts_at {
                Some(start) => !busy
                    .iter()
                    .any(|(other, at)| other == referee && (*at - start).abs() < match_duration),
                None => true,
            })
            .min_by_key(|referee| load.get(referee).copied().unwrap_or(0));

        let Some(referee) = chosen else {
            debug!("No free referee for match {}", game.id);
            continue;
        };

        matches[index].referee = Some(referee);
        *load.entry(referee).or_insert(0) += 1;
        if let Some(start) = starts_at {
            busy.push((referee, start));
        }
        assigned += 1;
    }

    info!("Assigned referees to {assigned} matches");
    Ok(assigned)
}
