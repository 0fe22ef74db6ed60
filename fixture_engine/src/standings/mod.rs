//! Standings module.
//!
//! Tables are always recomputed from the full list of completed matches, so a
//! corrected score is reflected the next time the table is built.

pub mod calculator;
pub mod models;

pub use calculator::{calculate_group, calculate_grouped_standings, calculate_standings};
pub use models::{FORM_LENGTH, FormResult, Standing};
