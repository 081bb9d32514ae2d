// ABOUTME: Table rendering for requirements, subtasks and versions
// ABOUTME: Builds comfy-table tables; printing is left to the commands

use chrono::{DateTime, Utc};
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};
use reqflow_storage::Version;
use reqflow_tasks::{PhaseSummary, Requirement};
use std::fmt::Write;

const EMPTY_CELL: &str = "—";

/// Render a timestamp; a pattern chrono cannot render falls back to the default
pub fn format_timestamp(value: Option<DateTime<Utc>>, format: &str) -> String {
    let Some(dt) = value else {
        return EMPTY_CELL.to_string();
    };

    let mut rendered = String::new();
    if write!(rendered, "{}", dt.format(format)).is_ok() {
        return rendered;
    }
    dt.format(reqflow_config::DEFAULT_DATE_FORMAT).to_string()
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn subtask_table(requirement: &Requirement, date_format: &str) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "ID",
        "Name",
        "Phase",
        "Status",
        "Est. start",
        "Est. end",
        "Est. hours",
        "Actual hours",
        "Delay",
    ]);

    for subtask in &requirement.subtasks {
        table.add_row(vec![
            subtask.id.clone(),
            subtask.name.clone(),
            subtask.phase().to_string(),
            subtask.status.to_string(),
            format_timestamp(subtask.estimated_start, date_format),
            format_timestamp(subtask.estimated_end, date_format),
            subtask.estimated_duration_hours.to_string(),
            subtask.actual_duration_hours.to_string(),
            subtask.delay_status.to_string(),
        ]);
    }

    table
}

pub fn phase_table(summary: &PhaseSummary) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "Phase",
        "Completed",
        "In progress",
        "Not started",
        "Paused",
        "Total",
    ]);

    for (phase, counts) in summary.iter() {
        table.add_row(vec![
            phase.to_string(),
            counts.completed.to_string(),
            counts.in_progress.to_string(),
            counts.not_started.to_string(),
            counts.paused.to_string(),
            counts.total.to_string(),
        ]);
    }

    table
}

pub fn version_table(versions: &[Version], date_format: &str) -> Table {
    let mut table = new_table();
    table.set_header(vec!["ID", "Version", "Platforms", "Release date", "Description"]);

    for version in versions {
        let platforms = if version.platforms.is_empty() {
            EMPTY_CELL.to_string()
        } else {
            version.platforms.join(", ")
        };
        table.add_row(vec![
            version.id.clone(),
            version.version_number.clone(),
            platforms,
            format_timestamp(version.release_date, date_format),
            version
                .description
                .clone()
                .unwrap_or_else(|| EMPTY_CELL.to_string()),
        ]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use reqflow_tasks::{FixedClock, RequirementCreateInput, SubtaskCreateInput};

    #[test]
    fn test_format_timestamp() {
        let dt = Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap();
        assert_eq!(format_timestamp(Some(dt), "%Y-%m-%d %H:%M"), "2024-04-01 09:00");
        assert_eq!(format_timestamp(None, "%Y-%m-%d"), EMPTY_CELL);
    }

    #[test]
    fn test_format_timestamp_bad_pattern_falls_back() {
        let dt = Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap();
        assert_eq!(format_timestamp(Some(dt), "%Q"), "2024-04-01 09:00");
    }

    #[test]
    fn test_subtask_table_lists_every_subtask() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap());
        let mut req = Requirement::new(
            RequirementCreateInput {
                title: "搜索优化".to_string(),
                version: "1.0.0".to_string(),
                ..Default::default()
            },
            &clock,
        )
        .unwrap();
        for name in ["原型设计", "前端开发"] {
            req.add_subtask(
                SubtaskCreateInput {
                    name: name.to_string(),
                    ..Default::default()
                },
                &clock,
            )
            .unwrap();
        }

        let rendered = subtask_table(&req, "%Y-%m-%d").to_string();
        assert!(rendered.contains("原型设计"));
        assert!(rendered.contains("前端开发"));
        assert!(rendered.contains("development"));
    }
}
