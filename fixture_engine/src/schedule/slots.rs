//! Field and time slot assignment.

use crate::config::EngineConfig;
use crate::errors::{EngineError, EngineResult};
use crate::tournament::models::{Match, ScheduleSlot};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Venue fields and start times available to a competition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotGrid {
    pub fields: Vec<String>,
    pub slots: Vec<DateTime<Utc>>,
}

impl SlotGrid {
    /// Build the grid, synthesizing defaults for empty inputs
    ///
    /// An empty field list becomes the configured default field. An empty slot
    /// list becomes `day_slots` hourly slots from `day_start_hour` on the start
    /// date; without a start date there is nothing to schedule against. A grid
    /// that still ends up with no fields or no slots is rejected.
    pub fn resolve(
        fields: &[String],
        slots: &[DateTime<Utc>],
        start_date: Option<NaiveDate>,
        config: &EngineConfig,
    ) -> EngineResult<Self> {
        let fields = if fields.is_empty() {
            vec![config.default_field.clone()]
        } else {
            fields.to_vec()
        };

        let slots = if slots.is_empty() {
            let date = start_date.ok_or(EngineError::NoSchedulingInput)?;
            let first = date
                .and_hms_opt(config.day_start_hour, 0, 0)
                .ok_or_else(|| {
                    EngineError::InvalidConfig(format!(
                        "day start hour {} is not a valid hour",
                        config.day_start_hour
                    ))
                })?
                .and_utc();
            (0..config.day_slots)
                .map(|i| first + Duration::hours(i64::from(i)))
                .collect()
        } else {
            slots.to_vec()
        };

        let grid = Self { fields, slots };
        grid.ensure_usable()?;
        Ok(grid)
    }

    fn ensure_usable(&self) -> EngineResult<()> {
        if self.fields.is_empty() || self.slots.is_empty() {
            return Err(EngineError::NoSchedulingInput);
        }
        Ok(())
    }

    /// Number of distinct field/slot pairs
    pub fn capacity(&self) -> usize {
        self.fields.len() * self.slots.len()
    }
}

/// What a scheduling pass did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub matches_scheduled: usize,
    pub fields: usize,
    pub time_slots_used: usize,
    pub time_slots_available: usize,
    /// More matches than field/slot pairs; some pairs are shared
    pub overbooked: bool,
}

/// Assign fields and start times to matches in order
///
/// Fields cycle match by match; each completed pass over the fields moves to
/// the next time slot, and slots wrap around once exhausted. Bye matches are
/// never played and are left unscheduled. Fails without touching `matches`
/// when the grid has no fields or no slots.
pub fn assign_time_slots(matches: &mut [Match], grid: &SlotGrid) -> EngineResult<ScheduleSummary> {
    grid.ensure_usable()?;

    let field_count = grid.fields.len();
    let slot_count = grid.slots.len();
    let mut scheduled = 0;

    for game in matches.iter_mut().filter(|m| !m.is_bye) {
        let field = &grid.fields[scheduled % field_count];
        let starts_at = grid.slots[(scheduled / field_count) % slot_count];
        game.schedule = Some(ScheduleSlot {
            starts_at,
            field: field.clone(),
        });
        scheduled += 1;
    }

    let overbooked = scheduled > grid.capacity();
    if overbooked {
        warn!(
            "{} matches exceed {} fields x {} slots; slots are reused",
            scheduled, field_count, slot_count
        );
    }

    let summary = ScheduleSummary {
        matches_scheduled: scheduled,
        fields: field_count,
        time_slots_used: scheduled.div_ceil(field_count).min(slot_count),
        time_slots_available: slot_count,
        overbooked,
    };
    info!(
        "Scheduled {} matches on {} fields across {} time slots",
        summary.matches_scheduled, summary.fields, summary.time_slots_used
    );
    Ok(summary)
}
