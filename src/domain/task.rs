use chrono::{DateTime, Days, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use ulid::Ulid;

use crate::domain::board::StatusId;
use crate::domain::folder::FolderId;
use crate::domain::sprint::SprintId;

/// Allowed story point values, smallest to largest
pub const POINT_SCALE: [u32; 7] = [1, 2, 3, 5, 8, 13, 20];

/// Checks a story point value against the allowed scale
pub fn points_on_scale(points: u32) -> bool {
    POINT_SCALE.contains(&points)
}

/// Unique identifier for a task. Subtasks share the same id space.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(String);

impl TaskId {
    /// Generates a fresh time-ordered id
    pub fn generate() -> Self {
        Self(Ulid::new().to_string())
    }

    /// Returns the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for TaskId {
    type Err = crate::error::SprintdeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if Ulid::from_string(s).is_ok() {
            Ok(Self(s.to_string()))
        } else {
            Err(crate::error::SprintdeckError::InvalidId(s.to_string()))
        }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Priority level of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
            Self::Critical => write!(f, "Critical"),
        }
    }
}

/// How a completed recurring task schedules its follow-up occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceKind {
    Completion,
    Weekly,
    Biweekly,
    Monthly,
    Yearly,
}

impl RecurrenceKind {
    /// Due date of the follow-up occurrence. `Completion` recurs immediately
    /// and carries no due date.
    pub fn next_due(&self, from: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Completion => None,
            Self::Weekly => from.checked_add_days(Days::new(7)),
            Self::Biweekly => from.checked_add_days(Days::new(14)),
            Self::Monthly => from.checked_add_months(Months::new(1)),
            Self::Yearly => from.checked_add_months(Months::new(12)),
        }
    }
}

/// Where a task sits: the backlog or a board column
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    #[default]
    Backlog,
    Board(StatusId),
}

const BACKLOG: &str = "backlog";

impl TaskStatus {
    pub fn is_backlog(&self) -> bool {
        matches!(self, Self::Backlog)
    }

    /// Returns the persisted string form
    pub fn as_str(&self) -> &str {
        match self {
            Self::Backlog => BACKLOG,
            Self::Board(id) => id.as_str(),
        }
    }

    /// The column id, if the task is on a board
    pub fn column(&self) -> Option<&StatusId> {
        match self {
            Self::Backlog => None,
            Self::Board(id) => Some(id),
        }
    }
}

impl From<String> for TaskStatus {
    fn from(s: String) -> Self {
        if s == BACKLOG {
            Self::Backlog
        } else {
            Self::Board(StatusId::new(s))
        }
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lightweight subtask summary embedded in the parent task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtaskRef {
    pub id: TaskId,
    pub title: String,
    pub completed: bool,
}

/// A timestamped comment in a task's activity log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub timestamp: DateTime<Utc>,
    pub comment: String,
}

/// A task or subtask. Subtasks are full records in the same collection,
/// linked to their parent through `parent_task_id` and summarized in the
/// parent's `subtasks` list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub points: u32,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub sprint_id: Option<SprintId>,
    pub folder_id: Option<FolderId>,
    pub status: TaskStatus,
    #[serde(default)]
    pub subtasks: Vec<SubtaskRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrenceKind>,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub activity_log: Vec<ActivityEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_order: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_task_id: Option<TaskId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,
}

impl Task {
    /// Creates a new backlog task with default points and priority
    pub fn new(id: TaskId, title: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            title,
            description: None,
            points: 1,
            priority: Priority::default(),
            due_date: None,
            sprint_id: None,
            folder_id: None,
            status: TaskStatus::Backlog,
            subtasks: Vec::new(),
            recurrence: None,
            completed: false,
            created_at: now,
            updated_at: now,
            activity_log: Vec::new(),
            manual_order: None,
            parent_task_id: None,
            expanded: None,
        }
    }

    /// Stamps the last-modified time
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn is_subtask(&self) -> bool {
        self.parent_task_id.is_some()
    }

    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_some()
    }

    /// Whether the subtask list is shown. Unset means expanded.
    pub fn is_expanded(&self) -> bool {
        self.expanded != Some(false)
    }

    /// Builds the summary entry a parent keeps for this subtask
    pub fn summary(&self) -> SubtaskRef {
        SubtaskRef {
            id: self.id.clone(),
            title: self.title.clone(),
            completed: self.completed,
        }
    }

    /// Appends a comment to the activity log
    pub fn log_comment(&mut self, comment: String) {
        self.activity_log.push(ActivityEntry {
            timestamp: Utc::now(),
            comment,
        });
        self.touch();
    }

    /// Shallow-merges a patch into the record and stamps `updated_at`.
    /// A `comment` in the patch lands in the activity log.
    pub fn apply_patch(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(points) = patch.points {
            self.points = points;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(sprint_id) = patch.sprint_id {
            self.sprint_id = sprint_id;
        }
        if let Some(folder_id) = patch.folder_id {
            self.folder_id = folder_id;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(recurrence) = patch.recurrence {
            self.recurrence = recurrence;
        }
        if let Some(expanded) = patch.expanded {
            self.expanded = Some(expanded);
        }
        if let Some(comment) = patch.comment {
            self.activity_log.push(ActivityEntry {
                timestamp: Utc::now(),
                comment,
            });
        }
        self.touch();
    }
}

/// Input for creating a task. Unset fields fall back to defaults.
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub points: Option<u32>,
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDate>,
    pub sprint_id: Option<SprintId>,
    pub folder_id: Option<FolderId>,
    pub status: Option<TaskStatus>,
    pub recurrence: Option<RecurrenceKind>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Field-level changes applied to an existing task. The outer `Option` is
/// "change this field or not"; the inner one carries the new value, with
/// `None` clearing the field.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub points: Option<u32>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<NaiveDate>>,
    pub sprint_id: Option<Option<SprintId>>,
    pub folder_id: Option<Option<FolderId>>,
    pub status: Option<TaskStatus>,
    pub completed: Option<bool>,
    pub recurrence: Option<Option<RecurrenceKind>>,
    pub expanded: Option<bool>,
    pub comment: Option<String>,
}
