use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

pub const DEFAULT_GROUP_COLOR: &str = "#5c6b7a";
pub const DEFAULT_GROUP_ICON: &str = "ph-list-checks";
pub const DEFAULT_ACCENT_COLOR: &str = "#6c7ae0";
pub const DEFAULT_TASK_ICON: &str = "ph-check-circle";
pub const DEFAULT_THEME_VARIANT: &str = "base";

#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, sqlx::Type,
)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    /// Sort weight: high=3, medium=2, low=1.
    pub fn weight(self) -> u8 {
        match self {
            TaskPriority::High => 3,
            TaskPriority::Medium => 2,
            TaskPriority::Low => 1,
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskPriority::Low => write!(f, "low"),
            TaskPriority::Medium => write!(f, "medium"),
            TaskPriority::High => write!(f, "high"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid task priority: {0}")]
pub struct ParseTaskPriorityError(String);

impl FromStr for TaskPriority {
    type Err = ParseTaskPriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            _ => Err(ParseTaskPriorityError(s.to_string())),
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, sqlx::Type,
)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RepeatFrequency {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
}

impl fmt::Display for RepeatFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepeatFrequency::None => write!(f, "none"),
            RepeatFrequency::Daily => write!(f, "daily"),
            RepeatFrequency::Weekly => write!(f, "weekly"),
            RepeatFrequency::Monthly => write!(f, "monthly"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid repeat frequency: {0}")]
pub struct ParseRepeatFrequencyError(String);

impl FromStr for RepeatFrequency {
    type Err = ParseRepeatFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(RepeatFrequency::None),
            "daily" => Ok(RepeatFrequency::Daily),
            "weekly" => Ok(RepeatFrequency::Weekly),
            "monthly" => Ok(RepeatFrequency::Monthly),
            _ => Err(ParseRepeatFrequencyError(s.to_string())),
        }
    }
}

/// A named collection of tasks (a category or context such as "Chores").
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct TaskGroup {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub color: String,
    pub icon: String,
    /// Advisory; equal values are ordered by name.
    pub display_order: i64,
    pub created_at: DateTime<Utc>,
}

/// A group together with the number of tasks currently assigned to it.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct GroupSummary {
    #[sqlx(flatten)]
    pub group: TaskGroup,
    pub task_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// `None` places the task in the inbox.
    pub group_id: Option<Uuid>,
    pub priority: TaskPriority,
    pub accent_color: String,
    pub icon: String,
    pub theme_variant: String,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub due_at: Option<DateTime<Utc>>,
    pub repeat_frequency: RepeatFrequency,
    /// Number of frequency units between occurrences. Ignored when the frequency is `None`.
    pub repeat_interval: u32,
    /// Last calendar date on which an occurrence may fall.
    pub repeat_until: Option<NaiveDate>,
    pub position: i64,
}

impl Task {
    pub fn is_recurring(&self) -> bool {
        self.repeat_frequency != RepeatFrequency::None
    }
}

impl Default for Task {
    fn default() -> Self {
        Self {
            id: Uuid::now_v7(),
            title: "".to_string(),
            description: None,
            group_id: None,
            priority: TaskPriority::Medium,
            accent_color: DEFAULT_ACCENT_COLOR.to_string(),
            icon: DEFAULT_TASK_ICON.to_string(),
            theme_variant: DEFAULT_THEME_VARIANT.to_string(),
            is_completed: false,
            created_at: Utc::now(),
            completed_at: None,
            due_at: None,
            repeat_frequency: RepeatFrequency::None,
            repeat_interval: 1,
            repeat_until: None,
            position: 0,
        }
    }
}

/// A task joined with the display attributes of its group, as consumed by the ordering engine.
#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct TaskWithGroup {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub task: Task,
    pub group_name: Option<String>,
    pub group_order: Option<i64>,
}

impl TaskWithGroup {
    pub fn new(task: Task, group: Option<&TaskGroup>) -> Self {
        Self {
            task,
            group_name: group.map(|g| g.name.clone()),
            group_order: group.map(|g| g.display_order),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewTaskData {
    pub title: String,
    pub description: Option<String>,
    pub group_id: Option<Uuid>,
    pub priority: Option<TaskPriority>,
    pub due_at: Option<DateTime<Utc>>,
    pub repeat_frequency: Option<RepeatFrequency>,
    /// Validated to be positive; defaults to 1.
    pub repeat_interval: Option<i64>,
    pub repeat_until: Option<NaiveDate>,
    /// `None` or 0 means "append after the last task of the group".
    pub position: Option<i64>,
    pub accent_color: Option<String>,
    pub icon: Option<String>,
    pub theme_variant: Option<String>,
}

impl NewTaskData {
    /// Build the creation payload for the occurrence that follows `source`.
    pub fn next_occurrence_of(source: &Task, due_at: DateTime<Utc>) -> Self {
        Self {
            title: source.title.clone(),
            description: source.description.clone(),
            group_id: source.group_id,
            priority: Some(source.priority),
            due_at: Some(due_at),
            repeat_frequency: Some(source.repeat_frequency),
            repeat_interval: Some(i64::from(source.repeat_interval)),
            repeat_until: source.repeat_until,
            position: None,
            accent_color: Some(source.accent_color.clone()),
            icon: Some(source.icon.clone()),
            theme_variant: Some(source.theme_variant.clone()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateTaskData {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub priority: Option<TaskPriority>,
    pub due_at: Option<Option<DateTime<Utc>>>,
    pub repeat_frequency: Option<RepeatFrequency>,
    pub repeat_interval: Option<i64>,
    pub repeat_until: Option<Option<NaiveDate>>,
    pub accent_color: Option<String>,
    pub icon: Option<String>,
    pub theme_variant: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewGroupData {
    pub name: String,
    pub color: Option<String>,
    pub icon: Option<String>,
    /// `None` or 0 appends the group after the current last one.
    pub display_order: Option<i64>,
}

impl NewGroupData {
    pub fn named(name: &str, color: &str, icon: &str) -> Self {
        Self {
            name: name.to_string(),
            color: Some(color.to_string()),
            icon: Some(icon.to_string()),
            display_order: None,
        }
    }
}

/// The groups that must always exist, created once at startup.
pub fn default_groups() -> Vec<NewGroupData> {
    vec![
        NewGroupData::named("Todo", "#7c8cff", "ph-list-checks"),
        NewGroupData::named("Recurring", "#4ade80", "ph-repeat"),
    ]
}

#[derive(Debug)]
pub enum ToggleResult {
    /// The task became complete; `next` holds the spawned occurrence, if any.
    Completed { task: Task, next: Option<Task> },
    Reopened(Task),
}

impl ToggleResult {
    pub fn task(&self) -> &Task {
        match self {
            ToggleResult::Completed { task, .. } => task,
            ToggleResult::Reopened(task) => task,
        }
    }
}
