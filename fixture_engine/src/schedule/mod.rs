//! Schedule module: places matches on venue fields and time slots, and hands
//! out referees.

pub mod referees;
pub mod slots;

pub use referees::assign_referees;
pub use slots::{ScheduleSummary, SlotGrid, assign_time_slots};
