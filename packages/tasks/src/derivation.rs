// ABOUTME: Aggregate requirement status derived from subtask progress
// ABOUTME: Waterfall cascade checked from the latest phase back to the earliest

use crate::phase::{aggregate_phases, PhaseCounts};
use crate::types::{Phase, RequirementStatus, Subtask, SubtaskStatus};

/// One pipeline step: the phase, its predecessor, and the labels it can produce
struct Stage {
    phase: Phase,
    predecessor: Option<Phase>,
    in_progress: RequirementStatus,
    pending: RequirementStatus,
}

/// Latest phase first so the most advanced true state wins
const STAGES: [Stage; 5] = [
    Stage {
        phase: Phase::Acceptance,
        predecessor: Some(Phase::Testing),
        in_progress: RequirementStatus::AcceptanceInProgress,
        pending: RequirementStatus::PendingAcceptance,
    },
    Stage {
        phase: Phase::Testing,
        predecessor: Some(Phase::Development),
        in_progress: RequirementStatus::TestingInProgress,
        pending: RequirementStatus::PendingTesting,
    },
    Stage {
        phase: Phase::Development,
        predecessor: Some(Phase::Ui),
        in_progress: RequirementStatus::DevelopmentInProgress,
        pending: RequirementStatus::PendingDevelopment,
    },
    Stage {
        phase: Phase::Ui,
        predecessor: Some(Phase::Prototype),
        in_progress: RequirementStatus::UiDesignInProgress,
        pending: RequirementStatus::PendingUiDesign,
    },
    Stage {
        phase: Phase::Prototype,
        predecessor: None,
        in_progress: RequirementStatus::PrototypeInProgress,
        pending: RequirementStatus::PendingPrototype,
    },
];

/// Derive a requirement's lifecycle status from its subtasks.
///
/// Never yields `Released` or `Paused`; those are set by hand.
pub fn derive_requirement_status(subtasks: &[Subtask]) -> RequirementStatus {
    if subtasks.is_empty() {
        return RequirementStatus::PendingPrototype;
    }

    if subtasks
        .iter()
        .all(|s| s.status == SubtaskStatus::Completed)
    {
        return RequirementStatus::Completed;
    }

    let summary = aggregate_phases(subtasks);
    let empty = PhaseCounts::default();

    for stage in &STAGES {
        let counts = summary.get(stage.phase).unwrap_or(&empty);
        if counts.is_empty() {
            continue;
        }

        if counts.has_in_progress() {
            return stage.in_progress;
        }

        // Prototype has no predecessor, so it is pending as soon as nothing has started
        let predecessor_done = stage
            .predecessor
            .and_then(|p| summary.get(p))
            .map_or(true, PhaseCounts::is_fully_completed);

        if predecessor_done && counts.is_all_not_started() {
            return stage.pending;
        }
    }

    fallback_status(subtasks)
}

/// Reached when no stage rule matched, e.g. partially completed phases or
/// subtasks that fall outside the pipeline
fn fallback_status(subtasks: &[Subtask]) -> RequirementStatus {
    if let Some(active) = subtasks
        .iter()
        .find(|s| s.status == SubtaskStatus::InProgress)
    {
        return match active.phase() {
            Phase::Prototype => RequirementStatus::PrototypeInProgress,
            Phase::Ui => RequirementStatus::UiDesignInProgress,
            Phase::Testing => RequirementStatus::TestingInProgress,
            // Unclassified work in flight is reported as development
            Phase::Development | Phase::Acceptance | Phase::Other => {
                RequirementStatus::DevelopmentInProgress
            }
        };
    }

    // Some work is done but no phase is cleanly pending
    if subtasks
        .iter()
        .any(|s| s.status == SubtaskStatus::Completed)
    {
        return RequirementStatus::DevelopmentInProgress;
    }

    RequirementStatus::PendingPrototype
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use crate::types::SubtaskStatus::{Completed, InProgress, NotStarted, Paused};

    fn subtasks(entries: &[(&str, SubtaskStatus)]) -> Vec<Subtask> {
        entries.iter()
            .enumerate()
            .map(|(i, (name, status))| Subtask::new(format!("sub-{}", i), *name).with_status(*status))
            .collect()
    }

    #[test]
    fn test_empty_is_pending_prototype() {
        assert_eq!(derive_requirement_status(&[]), RequirementStatus::PendingPrototype);
    }

    #[test]
    fn test_all_completed_regardless_of_names() {
        let list = subtasks(&[("需求评审", Completed), ("测试", Completed), ("杂项", Completed)]);
        assert_eq!(derive_requirement_status(&list), RequirementStatus::Completed);
    }

    #[test]
    fn test_idempotent() {
        let list = subtasks(&[("原型设计", Completed), ("视觉设计", InProgress)]);
        let first = derive_requirement_status(&list);
        let second = derive_requirement_status(&list);
        assert_eq!(first, second);
    }

    #[rstest]
    #[case::ui_in_progress(
        &[("原型设计", Completed), ("视觉设计", InProgress)],
        RequirementStatus::UiDesignInProgress
    )]
    #[case::pending_testing(
        &[("前端开发", Completed), ("测试", NotStarted)],
        RequirementStatus::PendingTesting
    )]
    #[case::pending_ui(
        &[("原型设计", Completed), ("视觉设计", NotStarted)],
        RequirementStatus::PendingUiDesign
    )]
    #[case::pending_development(
        &[("原型设计", Completed), ("UI设计", Completed), ("后端开发", NotStarted)],
        RequirementStatus::PendingDevelopment
    )]
    #[case::development_in_progress(
        &[("前端开发", InProgress), ("后端开发", NotStarted)],
        RequirementStatus::DevelopmentInProgress
    )]
    #[case::testing_in_progress(
        &[("前端开发", Completed), ("测试", InProgress)],
        RequirementStatus::TestingInProgress
    )]
    #[case::pending_acceptance(
        &[("测试", Completed), ("验收", NotStarted)],
        RequirementStatus::PendingAcceptance
    )]
    #[case::acceptance_in_progress(
        &[("测试", Completed), ("验收", InProgress)],
        RequirementStatus::AcceptanceInProgress
    )]
    #[case::prototype_in_progress(
        &[("原型设计", InProgress), ("视觉设计", NotStarted)],
        RequirementStatus::PrototypeInProgress
    )]
    #[case::nothing_started(
        &[("原型设计", NotStarted), ("视觉设计", NotStarted), ("前端开发", NotStarted)],
        RequirementStatus::PendingPrototype
    )]
    fn test_cascade(#[case] entries: &[(&str, SubtaskStatus)], #[case] expected: RequirementStatus) {
        assert_eq!(derive_requirement_status(&subtasks(entries)), expected);
    }

    #[test]
    fn test_later_phase_in_progress_wins() {
        let list = subtasks(&[
            ("原型设计", NotStarted),
            ("视觉设计", InProgress),
            ("测试", InProgress),
        ]);
        assert_eq!(derive_requirement_status(&list), RequirementStatus::TestingInProgress);
    }

    #[test]
    fn test_pending_requires_predecessor_complete() {
        // Development is unfinished, so testing is not yet pending
        let list = subtasks(&[("前端开发", Completed), ("后端开发", NotStarted), ("测试", NotStarted)]);
        assert_ne!(derive_requirement_status(&list), RequirementStatus::PendingTesting);
        assert_eq!(
            derive_requirement_status(&list),
            RequirementStatus::DevelopmentInProgress
        );
    }

    #[test]
    fn test_missing_predecessor_phase_counts_as_complete() {
        // No development subtasks at all: testing is pending straight away
        let list = subtasks(&[("测试", NotStarted), ("需求评审", Completed)]);
        assert_eq!(derive_requirement_status(&list), RequirementStatus::PendingTesting);
    }

    #[test]
    fn test_fallback_in_progress_other_is_development() {
        let list = subtasks(&[("需求评审", InProgress), ("原型设计", Completed)]);
        assert_eq!(
            derive_requirement_status(&list),
            RequirementStatus::DevelopmentInProgress
        );
    }

    #[test]
    fn test_fallback_partial_completion_is_development() {
        // Prototype partly done, nothing running: no stage rule applies
        let list = subtasks(&[("原型设计", Completed), ("原型设计评审", NotStarted)]);
        assert_eq!(
            derive_requirement_status(&list),
            RequirementStatus::DevelopmentInProgress
        );
    }

    #[test]
    fn test_fallback_only_paused_and_other() {
        let list = subtasks(&[("杂项", NotStarted), ("前端开发", Paused)]);
        assert_eq!(derive_requirement_status(&list), RequirementStatus::PendingPrototype);
    }

    #[test]
    fn test_paused_subtask_keeps_phase_incomplete() {
        let list = subtasks(&[("前端开发", Completed), ("后端开发", Paused), ("测试", NotStarted)]);
        // Development not fully complete, testing not pending; dev has no not-started
        // subtasks either, so the fallback reports development
        assert_eq!(
            derive_requirement_status(&list),
            RequirementStatus::DevelopmentInProgress
        );
    }

    #[test]
    fn test_explicit_phase_used_over_name() {
        let list = vec![
            Subtask::new("a", "联调").with_phase(Phase::Development).with_status(Completed),
            Subtask::new("b", "走查").with_phase(Phase::Testing).with_status(NotStarted),
        ];
        assert_eq!(derive_requirement_status(&list), RequirementStatus::PendingTesting);
    }

    #[test]
    fn test_never_yields_manual_states() {
        let statuses = [NotStarted, InProgress, Completed, Paused];
        let names = ["原型设计", "视觉设计", "前端开发", "测试", "验收", "杂项"];
        for (i, name) in names.iter().enumerate() {
            for status in statuses {
                let list = subtasks(&[(*name, status), (names[(i + 1) % names.len()], NotStarted)]);
                assert!(!derive_requirement_status(&list).is_manual());
            }
        }
    }
}
