// ABOUTME: Requirement aggregate that owns its subtasks
// ABOUTME: Every subtask mutation refreshes schedule fields and re-derives the status

use reqflow_core::generate_prefixed_id;
use reqflow_core::validation::{
    validate_description, validate_name, validate_priority, validate_title,
    validate_version_number,
};
use tracing::{debug, info, warn};

use crate::derivation::derive_requirement_status;
use crate::error::{RequirementError, Result};
use crate::phase::{aggregate_phases, PhaseSummary};
use crate::schedule::{recalculate_subtask_fields, Clock};
use crate::types::{
    Requirement, RequirementCreateInput, RequirementStatus, Subtask, SubtaskCreateInput,
    SubtaskStatus, SubtaskUpdateInput,
};

impl Requirement {
    /// Create a requirement with no subtasks
    pub fn new(input: RequirementCreateInput, clock: &impl Clock) -> Result<Self> {
        let title = validate_title(&input.title)?;
        let version = validate_version_number(&input.version)?;
        let priority = input
            .priority
            .as_deref()
            .map(validate_priority)
            .transpose()?;
        let description = validate_description(input.description.as_deref())?;
        let now = clock.now();

        let requirement = Self {
            id: generate_prefixed_id("req"),
            title,
            version,
            priority,
            description,
            status: RequirementStatus::PendingPrototype,
            subtasks: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        debug!("Created requirement {} for version {}", requirement.id, requirement.version);
        Ok(requirement)
    }

    pub fn subtask(&self, subtask_id: &str) -> Option<&Subtask> {
        self.subtasks.iter().find(|s| s.id == subtask_id)
    }

    /// Append a subtask and return its ID
    pub fn add_subtask(&mut self, input: SubtaskCreateInput, clock: &impl Clock) -> Result<String> {
        let name = validate_name(&input.name)?;
        let now = clock.now();

        let mut subtask = Subtask::new(generate_prefixed_id("sub"), name);
        subtask.phase = Some(input.phase.unwrap_or_else(|| subtask.phase()));
        subtask.estimated_start = input.estimated_start;
        subtask.estimated_end = input.estimated_end;
        subtask.actual_start = input.actual_start;
        subtask.actual_end = input.actual_end;
        if let Some(status) = input.status {
            apply_status(&mut subtask, status, now);
        }

        let subtask = recalculate_subtask_fields(subtask, clock)?;
        let id = subtask.id.clone();
        debug!("Adding subtask {} ({}) to {}", id, subtask.name, self.id);

        self.subtasks.push(subtask);
        self.touch(now);
        Ok(id)
    }

    /// Apply field updates to one subtask
    pub fn update_subtask(
        &mut self,
        subtask_id: &str,
        input: SubtaskUpdateInput,
        clock: &impl Clock,
    ) -> Result<()> {
        let name = input.name.as_deref().map(validate_name).transpose()?;
        let now = clock.now();

        let index = self.position_of(subtask_id)?;
        let mut subtask = self.subtasks[index].clone();

        if let Some(name) = name {
            subtask.name = name;
        }
        if let Some(phase) = input.phase {
            subtask.phase = Some(phase);
        }
        if let Some(value) = input.estimated_start {
            subtask.estimated_start = value;
        }
        if let Some(value) = input.estimated_end {
            subtask.estimated_end = value;
        }
        if let Some(value) = input.actual_start {
            subtask.actual_start = value;
        }
        let actual_end_given = input.actual_end.is_some();
        if let Some(value) = input.actual_end {
            subtask.actual_end = value;
        }
        if let Some(status) = input.status {
            // A reopened subtask has no finish date unless one is supplied
            if subtask.status == SubtaskStatus::Completed
                && status != SubtaskStatus::Completed
                && !actual_end_given
            {
                subtask.actual_end = None;
            }
            apply_status(&mut subtask, status, now);
        }

        // Only replace once the whole update is known to be consistent
        self.subtasks[index] = recalculate_subtask_fields(subtask, clock)?;
        debug!("Updated subtask {} on {}", subtask_id, self.id);

        self.touch(now);
        Ok(())
    }

    /// Remove a subtask, returning it
    pub fn remove_subtask(&mut self, subtask_id: &str, clock: &impl Clock) -> Result<Subtask> {
        let index = self.position_of(subtask_id)?;
        let removed = self.subtasks.remove(index);
        debug!("Removed subtask {} from {}", subtask_id, self.id);

        self.touch(clock.now());
        Ok(removed)
    }

    /// Recompute every subtask's schedule fields and the status, e.g. after import.
    ///
    /// `Paused` is kept. `Released` is kept while the subtasks still derive to
    /// `Completed`.
    pub fn recalculate(&mut self, clock: &impl Clock) -> Result<()> {
        self.subtasks = self
            .subtasks
            .iter()
            .cloned()
            .map(|s| recalculate_subtask_fields(s, clock))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let derived = derive_requirement_status(&self.subtasks);
        match self.status {
            RequirementStatus::Paused => {}
            RequirementStatus::Released if derived == RequirementStatus::Completed => {}
            RequirementStatus::Released => {
                warn!(
                    "Requirement {} is released but its subtasks derive to {}",
                    self.id, derived
                );
                self.status = derived;
            }
            _ => self.status = derived,
        }
        Ok(())
    }

    /// Move to `Released` or `Paused`, the two states not derived from subtasks
    pub fn set_lifecycle(&mut self, status: RequirementStatus, clock: &impl Clock) -> Result<()> {
        match status {
            RequirementStatus::Paused => {}
            RequirementStatus::Released => {
                let derived = derive_requirement_status(&self.subtasks);
                if derived != RequirementStatus::Completed {
                    return Err(RequirementError::NotCompleted(derived));
                }
            }
            other => return Err(RequirementError::DerivedStatus(other)),
        }

        info!("Requirement {} moved to {}", self.id, status);
        self.status = status;
        self.updated_at = clock.now();
        Ok(())
    }

    /// Leave a manual state and go back to the derived status
    pub fn resume(&mut self, clock: &impl Clock) {
        self.refresh_status();
        self.updated_at = clock.now();
    }

    pub fn refresh_status(&mut self) {
        self.status = derive_requirement_status(&self.subtasks);
    }

    pub fn status_breakdown(&self) -> PhaseSummary {
        aggregate_phases(&self.subtasks)
    }

    /// Share of completed subtasks, 0-100 rounded down
    pub fn progress_percent(&self) -> u8 {
        if self.subtasks.is_empty() {
            return 0;
        }
        let completed = self
            .subtasks
            .iter()
            .filter(|s| s.status == SubtaskStatus::Completed)
            .count();
        (completed * 100 / self.subtasks.len()) as u8
    }

    fn position_of(&self, subtask_id: &str) -> Result<usize> {
        self.subtasks
            .iter()
            .position(|s| s.id == subtask_id)
            .ok_or_else(|| RequirementError::SubtaskNotFound(subtask_id.to_string()))
    }

    fn touch(&mut self, now: chrono::DateTime<chrono::Utc>) {
        if self.status.is_manual() {
            info!(
                "Subtask change on {} requirement {}; status is derived again",
                self.status, self.id
            );
        }
        self.refresh_status();
        self.updated_at = now;
    }
}

/// Set a subtask status, stamping actual dates on the transition if missing
fn apply_status(subtask: &mut Subtask, status: SubtaskStatus, now: chrono::DateTime<chrono::Utc>) {
    match status {
        SubtaskStatus::InProgress | SubtaskStatus::Completed if subtask.actual_start.is_none() => {
            subtask.actual_start = Some(now);
        }
        _ => {}
    }
    if status == SubtaskStatus::Completed && subtask.actual_end.is_none() {
        subtask.actual_end = Some(now);
    }
    subtask.status = status;
}
