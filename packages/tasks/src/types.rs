// ABOUTME: Requirement and subtask type definitions
// ABOUTME: Lifecycle statuses, phases, delay states and create/update inputs

use chrono::{DateTime, Utc};
use reqflow_core::double_option;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubtaskStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    Paused,
}

impl SubtaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubtaskStatus::NotStarted => "not-started",
            SubtaskStatus::InProgress => "in-progress",
            SubtaskStatus::Completed => "completed",
            SubtaskStatus::Paused => "paused",
        }
    }
}

impl fmt::Display for SubtaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubtaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "not-started" | "未开始" => Ok(SubtaskStatus::NotStarted),
            "in-progress" | "进行中" => Ok(SubtaskStatus::InProgress),
            "completed" | "已完成" => Ok(SubtaskStatus::Completed),
            "paused" | "已暂停" => Ok(SubtaskStatus::Paused),
            _ => Err(format!(
                "Invalid subtask status: {}. Must be one of: not-started, in-progress, completed, paused",
                s
            )),
        }
    }
}

/// Whether a subtask finished (or is finishing) relative to its estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DelayStatus {
    OnTime,
    Late,
    Early,
    #[default]
    Unknown,
}

impl fmt::Display for DelayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DelayStatus::OnTime => "on-time",
            DelayStatus::Late => "late",
            DelayStatus::Early => "early",
            DelayStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Delivery pipeline phase a subtask belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Prototype,
    Ui,
    Development,
    Testing,
    Acceptance,
    Other,
}

impl Phase {
    /// The five pipeline phases, in delivery order (`Other` excluded)
    pub const PIPELINE: [Phase; 5] = [
        Phase::Prototype,
        Phase::Ui,
        Phase::Development,
        Phase::Testing,
        Phase::Acceptance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Prototype => "prototype",
            Phase::Ui => "ui",
            Phase::Development => "development",
            Phase::Testing => "testing",
            Phase::Acceptance => "acceptance",
            Phase::Other => "other",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "prototype" => Ok(Phase::Prototype),
            "ui" => Ok(Phase::Ui),
            "development" => Ok(Phase::Development),
            "testing" => Ok(Phase::Testing),
            "acceptance" => Ok(Phase::Acceptance),
            "other" => Ok(Phase::Other),
            _ => Err(format!(
                "Invalid phase: {}. Must be one of: prototype, ui, development, testing, acceptance, other",
                s
            )),
        }
    }
}

/// Requirement lifecycle, in pipeline order
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum RequirementStatus {
    #[default]
    PendingPrototype,
    PrototypeInProgress,
    PendingUiDesign,
    UiDesignInProgress,
    PendingDevelopment,
    DevelopmentInProgress,
    PendingTesting,
    TestingInProgress,
    PendingAcceptance,
    AcceptanceInProgress,
    Completed,
    Released,
    Paused,
}

impl RequirementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequirementStatus::PendingPrototype => "pending-prototype",
            RequirementStatus::PrototypeInProgress => "prototype-in-progress",
            RequirementStatus::PendingUiDesign => "pending-ui-design",
            RequirementStatus::UiDesignInProgress => "ui-design-in-progress",
            RequirementStatus::PendingDevelopment => "pending-development",
            RequirementStatus::DevelopmentInProgress => "development-in-progress",
            RequirementStatus::PendingTesting => "pending-testing",
            RequirementStatus::TestingInProgress => "testing-in-progress",
            RequirementStatus::PendingAcceptance => "pending-acceptance",
            RequirementStatus::AcceptanceInProgress => "acceptance-in-progress",
            RequirementStatus::Completed => "completed",
            RequirementStatus::Released => "released",
            RequirementStatus::Paused => "paused",
        }
    }

    /// Label shown on the version board
    pub fn label(&self) -> &'static str {
        match self {
            RequirementStatus::PendingPrototype => "待原型设计",
            RequirementStatus::PrototypeInProgress => "原型设计中",
            RequirementStatus::PendingUiDesign => "待UI设计",
            RequirementStatus::UiDesignInProgress => "UI设计中",
            RequirementStatus::PendingDevelopment => "待开发",
            RequirementStatus::DevelopmentInProgress => "开发中",
            RequirementStatus::PendingTesting => "待测试",
            RequirementStatus::TestingInProgress => "测试中",
            RequirementStatus::PendingAcceptance => "待验收",
            RequirementStatus::AcceptanceInProgress => "验收中",
            RequirementStatus::Completed => "已完成",
            RequirementStatus::Released => "已上线",
            RequirementStatus::Paused => "已暂停",
        }
    }

    /// True for the states set by hand rather than derived from subtasks
    pub fn is_manual(&self) -> bool {
        matches!(self, RequirementStatus::Released | RequirementStatus::Paused)
    }
}

impl fmt::Display for RequirementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    pub id: String,
    pub name: String,
    /// Explicit phase; records created before the field existed fall back to the name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<Phase>,
    #[serde(default)]
    pub status: SubtaskStatus,

    // Schedule
    #[serde(default)]
    pub estimated_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub estimated_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub actual_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub actual_end: Option<DateTime<Utc>>,

    // Derived from the schedule
    #[serde(default)]
    pub estimated_duration_hours: u64,
    #[serde(default)]
    pub actual_duration_hours: u64,
    #[serde(default)]
    pub delay_status: DelayStatus,
}

impl Subtask {
    /// New subtask with default status, durations and delay state
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            phase: None,
            status: SubtaskStatus::NotStarted,
            estimated_start: None,
            estimated_end: None,
            actual_start: None,
            actual_end: None,
            estimated_duration_hours: 0,
            actual_duration_hours: 0,
            delay_status: DelayStatus::Unknown,
        }
    }

    pub fn with_status(mut self, status: SubtaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = Some(phase);
        self
    }

    /// Effective phase: the explicit field, else classified from the name
    pub fn phase(&self) -> Phase {
        self.phase
            .unwrap_or_else(|| crate::phase::classify_phase(&self.name))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtaskCreateInput {
    pub name: String,
    pub phase: Option<Phase>,
    pub status: Option<SubtaskStatus>,
    pub estimated_start: Option<DateTime<Utc>>,
    pub estimated_end: Option<DateTime<Utc>>,
    pub actual_start: Option<DateTime<Utc>>,
    pub actual_end: Option<DateTime<Utc>>,
}

/// Partial update. Date fields: `None` leaves the value, `Some(None)` clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtaskUpdateInput {
    pub name: Option<String>,
    pub phase: Option<Phase>,
    pub status: Option<SubtaskStatus>,
    #[serde(default, deserialize_with = "double_option")]
    pub estimated_start: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub estimated_end: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub actual_start: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub actual_end: Option<Option<DateTime<Utc>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirement {
    pub id: String,
    pub title: String,
    pub version: String,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: RequirementStatus,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementCreateInput {
    pub title: String,
    pub version: String,
    pub priority: Option<String>,
    pub description: Option<String>,
}
