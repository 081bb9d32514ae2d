// ABOUTME: Subtask phase classification and per-phase status counts
// ABOUTME: Name-based phase fallback plus the aggregate used by status derivation

use crate::types::{Phase, Subtask, SubtaskStatus};
use serde::Serialize;

/// Name fragments per phase, checked in this order; first hit wins
const PHASE_KEYWORDS: &[(Phase, &[&str])] = &[
    (Phase::Prototype, &["原型设计"]),
    (Phase::Ui, &["视觉设计", "UI设计"]),
    (Phase::Development, &["开发", "前端", "后端", "数据"]),
    (Phase::Testing, &["测试"]),
    (Phase::Acceptance, &["验收"]),
];

/// Classify a subtask into a phase from its name
pub fn classify_phase(name: &str) -> Phase {
    PHASE_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| name.contains(kw)))
        .map(|(phase, _)| *phase)
        .unwrap_or(Phase::Other)
}

/// Status counts for one phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseCounts {
    pub completed: usize,
    pub in_progress: usize,
    pub not_started: usize,
    pub paused: usize,
    pub total: usize,
}

impl PhaseCounts {
    fn record(&mut self, status: SubtaskStatus) {
        self.total += 1;
        match status {
            SubtaskStatus::Completed => self.completed += 1,
            SubtaskStatus::InProgress => self.in_progress += 1,
            SubtaskStatus::NotStarted => self.not_started += 1,
            SubtaskStatus::Paused => self.paused += 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn has_in_progress(&self) -> bool {
        self.in_progress > 0
    }

    /// Every subtask completed. An empty phase counts as complete.
    pub fn is_fully_completed(&self) -> bool {
        self.completed == self.total
    }

    pub fn is_all_not_started(&self) -> bool {
        self.not_started == self.total
    }
}

/// Counts for the five pipeline phases
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PhaseSummary {
    pub prototype: PhaseCounts,
    pub ui: PhaseCounts,
    pub development: PhaseCounts,
    pub testing: PhaseCounts,
    pub acceptance: PhaseCounts,
}

impl PhaseSummary {
    /// Counts for a pipeline phase; `None` for `Phase::Other`
    pub fn get(&self, phase: Phase) -> Option<&PhaseCounts> {
        match phase {
            Phase::Prototype => Some(&self.prototype),
            Phase::Ui => Some(&self.ui),
            Phase::Development => Some(&self.development),
            Phase::Testing => Some(&self.testing),
            Phase::Acceptance => Some(&self.acceptance),
            Phase::Other => None,
        }
    }

    fn get_mut(&mut self, phase: Phase) -> Option<&mut PhaseCounts> {
        match phase {
            Phase::Prototype => Some(&mut self.prototype),
            Phase::Ui => Some(&mut self.ui),
            Phase::Development => Some(&mut self.development),
            Phase::Testing => Some(&mut self.testing),
            Phase::Acceptance => Some(&mut self.acceptance),
            Phase::Other => None,
        }
    }

    /// Pipeline phases with their counts, in delivery order
    pub fn iter(&self) -> impl Iterator<Item = (Phase, &PhaseCounts)> + '_ {
        Phase::PIPELINE
            .into_iter()
            .filter_map(move |phase| self.get(phase).map(|counts| (phase, counts)))
    }
}

/// Count subtask statuses per pipeline phase. `Other` subtasks are not counted.
pub fn aggregate_phases(subtasks: &[Subtask]) -> PhaseSummary {
    let mut summary = PhaseSummary::default();
    for subtask in subtasks {
        if let Some(counts) = summary.get_mut(subtask.phase()) {
            counts.record(subtask.status);
        }
    }
    summary
}
