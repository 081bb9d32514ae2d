// ABOUTME: Requirement status derivation from subtask progress
// ABOUTME: Phase classification, status cascade, schedule fields and the requirement aggregate

pub mod derivation;
pub mod error;
pub mod phase;
pub mod requirement;
pub mod schedule;
pub mod types;

pub use derivation::derive_requirement_status;
pub use error::{RequirementError, Result, ScheduleError};
pub use phase::{aggregate_phases, classify_phase, PhaseCounts, PhaseSummary};
pub use schedule::{
    delay_status, duration_hours, parse_timestamp, recalculate_subtask_fields, Clock, FixedClock,
    SystemClock,
};
pub use types::*;
