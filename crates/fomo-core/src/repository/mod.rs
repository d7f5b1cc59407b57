use crate::board::{Board, GroupSelection};
use crate::db::DbPool;
use crate::error::CoreError;
use crate::models::{
    default_groups, GroupSummary, NewGroupData, NewTaskData, Task, TaskGroup, TaskWithGroup,
    ToggleResult, UpdateTaskData,
};
use crate::ordering::SortCriterion;
use crate::recurrence::RecurrenceEngine;
use async_trait::async_trait;
use uuid::Uuid;

pub mod groups;
pub mod tasks;

/// Domain-specific trait for task operations
#[async_trait]
pub trait TaskRepository {
    /// Create a task; a missing or zero position is replaced by the group's max position + 1.
    async fn add_task(&self, data: NewTaskData) -> Result<Task, CoreError>;
    async fn find_task_by_id(&self, id: Uuid) -> Result<Option<Task>, CoreError>;
    async fn find_tasks_by_short_id_prefix(&self, short_id: &str) -> Result<Vec<Task>, CoreError>;
    /// Every task joined with its group, optionally restricted to one group.
    async fn find_tasks(&self, group_id: Option<Uuid>) -> Result<Vec<TaskWithGroup>, CoreError>;
    /// `find_tasks` followed by the ordering engine.
    async fn list_sorted(
        &self,
        criterion: SortCriterion,
        group_id: Option<Uuid>,
    ) -> Result<Vec<TaskWithGroup>, CoreError>;
    async fn update_task(&self, id: Uuid, data: UpdateTaskData) -> Result<Task, CoreError>;
    async fn delete_task(&self, id: Uuid) -> Result<(), CoreError>;
    /// Highest position within a group (`None` is the inbox); 0 when empty.
    async fn max_position(&self, group_id: Option<Uuid>) -> Result<i64, CoreError>;
    /// Flip completion. Completing a recurring task spawns its next occurrence
    /// in the same transaction.
    async fn toggle_completion(&self, id: Uuid) -> Result<ToggleResult, CoreError>;
    /// Persist the occurrence following `task`, or return `None` if the series has ended.
    async fn spawn_next_occurrence(&self, task: &Task) -> Result<Option<Task>, CoreError>;
    /// Reassign group and position. Positions below 1 are stored as 0; siblings are untouched.
    async fn move_task(
        &self,
        id: Uuid,
        group_id: Option<Uuid>,
        position: Option<i64>,
    ) -> Result<Task, CoreError>;
    /// Place a task at a 1-based position within its group and renumber siblings 1..n.
    async fn reorder_task(&self, id: Uuid, position: i64) -> Result<Vec<Task>, CoreError>;
}

/// Domain-specific trait for group operations
#[async_trait]
pub trait GroupRepository {
    async fn add_group(&self, data: NewGroupData) -> Result<TaskGroup, CoreError>;
    async fn find_group_by_id(&self, id: Uuid) -> Result<Option<TaskGroup>, CoreError>;
    async fn find_group_by_name(&self, name: &str) -> Result<Option<TaskGroup>, CoreError>;
    /// All groups with task counts, by display order then name.
    async fn find_groups(&self) -> Result<Vec<GroupSummary>, CoreError>;
    /// Delete a group; its tasks move to the inbox. Default groups are protected.
    async fn delete_group(&self, id: Uuid) -> Result<(), CoreError>;
    async fn reorder_group(&self, id: Uuid, position: i64) -> Result<Vec<TaskGroup>, CoreError>;
    /// Create any missing default group. Returns the groups that were created.
    async fn ensure_default_groups(&self) -> Result<Vec<TaskGroup>, CoreError>;
}

/// Main repository trait that composes all domain traits
#[async_trait]
pub trait Repository: TaskRepository + GroupRepository + Send + Sync {
    async fn load_board(
        &self,
        criterion: SortCriterion,
        selection: &GroupSelection,
        spotlight_size: usize,
    ) -> Result<Board, CoreError> {
        let tasks = self.find_tasks(None).await?;
        let groups = self.find_groups().await?;
        Ok(Board::build(
            tasks,
            &groups,
            criterion,
            selection,
            spotlight_size,
        ))
    }
}

/// SQLite implementation of the repository pattern
pub struct SqliteRepository {
    pool: DbPool,
    recurrence: RecurrenceEngine,
    default_groups: Vec<NewGroupData>,
}

impl SqliteRepository {
    pub fn new(pool: DbPool, recurrence: RecurrenceEngine, default_groups: Vec<NewGroupData>) -> Self {
        Self {
            pool,
            recurrence,
            default_groups,
        }
    }

    /// UTC recurrence and the built-in default groups.
    pub fn with_defaults(pool: DbPool) -> Self {
        Self::new(pool, RecurrenceEngine::default(), default_groups())
    }

    /// Get a reference to the database pool for internal use across modules
    pub(crate) fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub(crate) fn recurrence(&self) -> &RecurrenceEngine {
        &self.recurrence
    }

    pub(crate) fn default_groups(&self) -> &[NewGroupData] {
        &self.default_groups
    }
}

impl Repository for SqliteRepository {}
