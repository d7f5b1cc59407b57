use crate::error::CoreError;
use crate::models::{
    NewTaskData, Task, TaskWithGroup, ToggleResult, UpdateTaskData, DEFAULT_ACCENT_COLOR,
    DEFAULT_TASK_ICON, DEFAULT_THEME_VARIANT,
};
use crate::ordering::{sort_tasks, SortCriterion};
use crate::recurrence::RecurrenceEngine;
use crate::repository::SqliteRepository;
use crate::validation::{
    normalize_move_position, short_id_pattern, validate_interval, validate_title,
};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, Transaction};
use tracing::{debug, info};
use uuid::Uuid;

// SQLITE_BUSY (5) and SQLITE_BUSY_SNAPSHOT (517): another connection holds
// the write lock or committed since this transaction started reading.
fn is_busy(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .map_or(false, |code| matches!(&*code, "5" | "517"))
}

const TASK_WITH_GROUP_SELECT: &str = r#"SELECT t.*, g.name AS group_name, g.display_order AS group_order
    FROM tasks t
    LEFT JOIN task_groups g ON t.group_id = g.id"#;

#[async_trait]
impl super::TaskRepository for SqliteRepository {
    async fn add_task(&self, data: NewTaskData) -> Result<Task, CoreError> {
        let mut tx = self.pool().begin().await?;
        let task = Self::add_task_in_transaction(&mut tx, data).await?;
        tx.commit().await?;
        Ok(task)
    }

    async fn find_task_by_id(&self, id: Uuid) -> Result<Option<Task>, CoreError> {
        let task = sqlx::query_as("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(task)
    }

    async fn find_tasks_by_short_id_prefix(&self, short_id: &str) -> Result<Vec<Task>, CoreError> {
        // Ids are stored as 16-byte blobs; match against their hex form.
        let pattern = short_id_pattern(short_id)?;

        let tasks: Vec<Task> = sqlx::query_as("SELECT * FROM tasks WHERE hex(id) LIKE $1")
            .bind(pattern)
            .fetch_all(self.pool())
            .await?;
        Ok(tasks)
    }

    async fn find_tasks(&self, group_id: Option<Uuid>) -> Result<Vec<TaskWithGroup>, CoreError> {
        let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new(TASK_WITH_GROUP_SELECT);
        if let Some(group_id) = group_id {
            query_builder.push(" WHERE t.group_id = ");
            query_builder.push_bind(group_id);
        }

        let tasks: Vec<TaskWithGroup> = query_builder
            .build_query_as()
            .fetch_all(self.pool())
            .await?;
        Ok(tasks)
    }

    async fn list_sorted(
        &self,
        criterion: SortCriterion,
        group_id: Option<Uuid>,
    ) -> Result<Vec<TaskWithGroup>, CoreError> {
        let tasks = self.find_tasks(group_id).await?;
        debug!(%criterion, count = tasks.len(), "sorting tasks");
        Ok(sort_tasks(tasks, criterion, group_id))
    }

    async fn update_task(&self, id: Uuid, data: UpdateTaskData) -> Result<Task, CoreError> {
        let mut tx = self.pool().begin().await?;

        if Self::find_task_by_id_in_transaction(&mut tx, id).await?.is_none() {
            return Err(CoreError::NotFound(id.to_string()));
        }
        Self::update_task_fields(&mut tx, id, &data).await?;

        let updated_task = Self::find_task_by_id_in_transaction(&mut tx, id)
            .await?
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;

        tx.commit().await?;
        Ok(updated_task)
    }

    async fn delete_task(&self, id: Uuid) -> Result<(), CoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn max_position(&self, group_id: Option<Uuid>) -> Result<i64, CoreError> {
        let mut conn = self.pool().acquire().await?;
        Self::max_position_on(&mut conn, group_id).await
    }

    async fn toggle_completion(&self, id: Uuid) -> Result<ToggleResult, CoreError> {
        self.toggle_once(id).await.map_err(|e| match e {
            CoreError::Database(ref db) if is_busy(db) => {
                debug!(task_id = %id, "toggle lost a write race");
                CoreError::Conflict(id.to_string())
            }
            other => other,
        })
    }

    async fn spawn_next_occurrence(&self, task: &Task) -> Result<Option<Task>, CoreError> {
        let mut tx = self.pool().begin().await?;
        let next = Self::spawn_in_transaction(&mut tx, self.recurrence(), task).await?;
        tx.commit().await?;
        Ok(next)
    }

    async fn move_task(
        &self,
        id: Uuid,
        group_id: Option<Uuid>,
        position: Option<i64>,
    ) -> Result<Task, CoreError> {
        let mut tx = self.pool().begin().await?;

        if let Some(group_id) = group_id {
            Self::ensure_group_exists(&mut tx, group_id).await?;
        }

        let moved: Task = sqlx::query_as(
            r#"UPDATE tasks
            SET group_id = $1, position = $2
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(group_id)
        .bind(normalize_move_position(position))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| CoreError::NotFound(id.to_string()))?;

        tx.commit().await?;
        debug!(task_id = %id, position = moved.position, "task moved");
        Ok(moved)
    }

    async fn reorder_task(&self, id: Uuid, position: i64) -> Result<Vec<Task>, CoreError> {
        let mut tx = self.pool().begin().await?;

        let task = Self::find_task_by_id_in_transaction(&mut tx, id)
            .await?
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;

        let mut siblings: Vec<Task> = sqlx::query_as(
            "SELECT * FROM tasks WHERE group_id IS $1 AND id != $2 ORDER BY position, created_at, id",
        )
        .bind(task.group_id)
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        let index = (position.max(1) as usize - 1).min(siblings.len());
        siblings.insert(index, task);

        for (i, sibling) in siblings.iter_mut().enumerate() {
            let dense = i as i64 + 1;
            if sibling.position != dense {
                sqlx::query("UPDATE tasks SET position = $1 WHERE id = $2")
                    .bind(dense)
                    .bind(sibling.id)
                    .execute(&mut *tx)
                    .await?;
                sibling.position = dense;
            }
        }

        tx.commit().await?;
        Ok(siblings)
    }
}

impl SqliteRepository {
    /// One toggle attempt. A concurrent writer surfaces either as zero rows
    /// updated or as SQLITE_BUSY from the conditional update.
    async fn toggle_once(&self, id: Uuid) -> Result<ToggleResult, CoreError> {
        let mut tx = self.pool().begin().await?;

        let task = Self::find_task_by_id_in_transaction(&mut tx, id)
            .await?
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;

        let completing = !task.is_completed;
        let completed_at = completing.then(Utc::now);

        // Only the two completion columns are written, and only if nobody
        // flipped the flag since we read it.
        let result = sqlx::query(
            r#"UPDATE tasks
            SET is_completed = $1, completed_at = $2
            WHERE id = $3 AND is_completed = $4
            "#,
        )
        .bind(completing)
        .bind(completed_at)
        .bind(id)
        .bind(task.is_completed)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::Conflict(id.to_string()));
        }

        let task = Task {
            is_completed: completing,
            completed_at,
            ..task
        };

        if !completing {
            tx.commit().await?;
            debug!(task_id = %id, "task reopened");
            return Ok(ToggleResult::Reopened(task));
        }

        let next = if task.is_recurring() {
            Self::spawn_in_transaction(&mut tx, self.recurrence(), &task).await?
        } else {
            None
        };

        tx.commit().await?;
        debug!(task_id = %id, spawned = next.is_some(), "task completed");
        Ok(ToggleResult::Completed { task, next })
    }

    /// Add a task within an existing transaction
    pub(crate) async fn add_task_in_transaction<'a>(
        tx: &mut Transaction<'a, Sqlite>,
        data: NewTaskData,
    ) -> Result<Task, CoreError> {
        let title = validate_title(&data.title)?;
        let repeat_interval = validate_interval(data.repeat_interval)?;

        if let Some(group_id) = data.group_id {
            Self::ensure_group_exists(tx, group_id).await?;
        }

        let position = match data.position {
            Some(p) if p > 0 => p,
            _ => Self::max_position_on(tx, data.group_id).await? + 1,
        };

        let task = Task {
            id: Uuid::now_v7(),
            title,
            description: data.description.filter(|d| !d.trim().is_empty()),
            group_id: data.group_id,
            priority: data.priority.unwrap_or_default(),
            accent_color: data
                .accent_color
                .unwrap_or_else(|| DEFAULT_ACCENT_COLOR.to_string()),
            icon: data.icon.unwrap_or_else(|| DEFAULT_TASK_ICON.to_string()),
            theme_variant: data
                .theme_variant
                .unwrap_or_else(|| DEFAULT_THEME_VARIANT.to_string()),
            is_completed: false,
            created_at: Utc::now(),
            completed_at: None,
            due_at: data.due_at,
            repeat_frequency: data.repeat_frequency.unwrap_or_default(),
            repeat_interval,
            repeat_until: data.repeat_until,
            position,
        };

        sqlx::query(
            r#"INSERT INTO tasks (id, title, description, group_id, priority, accent_color, icon, theme_variant,
                is_completed, created_at, completed_at, due_at, repeat_frequency, repeat_interval, repeat_until, position)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.group_id)
        .bind(task.priority)
        .bind(&task.accent_color)
        .bind(&task.icon)
        .bind(&task.theme_variant)
        .bind(task.is_completed)
        .bind(task.created_at)
        .bind(task.completed_at)
        .bind(task.due_at)
        .bind(task.repeat_frequency)
        .bind(task.repeat_interval)
        .bind(task.repeat_until)
        .bind(task.position)
        .execute(&mut **tx)
        .await?;

        debug!(task_id = %task.id, position = task.position, "task created");
        Ok(task)
    }

    /// Create the occurrence after `task` inside the caller's transaction.
    pub(crate) async fn spawn_in_transaction<'a>(
        tx: &mut Transaction<'a, Sqlite>,
        engine: &RecurrenceEngine,
        task: &Task,
    ) -> Result<Option<Task>, CoreError> {
        let Some(next_due) = engine.next_due_date(task, Utc::now()) else {
            debug!(task_id = %task.id, "recurrence series has no further occurrence");
            return Ok(None);
        };

        let next = Self::add_task_in_transaction(tx, NewTaskData::next_occurrence_of(task, next_due))
            .await?;
        info!(
            source_id = %task.id,
            next_id = %next.id,
            due_at = %next_due,
            "spawned next occurrence"
        );
        Ok(Some(next))
    }

    /// Find a task by ID within an existing transaction
    pub(crate) async fn find_task_by_id_in_transaction<'a>(
        tx: &mut Transaction<'a, Sqlite>,
        id: Uuid,
    ) -> Result<Option<Task>, CoreError> {
        let task = sqlx::query_as("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?;
        Ok(task)
    }

    pub(crate) async fn max_position_on(
        conn: &mut sqlx::SqliteConnection,
        group_id: Option<Uuid>,
    ) -> Result<i64, CoreError> {
        // `IS` compares NULL to NULL, so the inbox is one group of its own.
        let max: i64 =
            sqlx::query_scalar("SELECT COALESCE(MAX(position), 0) FROM tasks WHERE group_id IS $1")
                .bind(group_id)
                .fetch_one(conn)
                .await?;
        Ok(max)
    }

    pub(crate) async fn ensure_group_exists(
        conn: &mut sqlx::SqliteConnection,
        group_id: Uuid,
    ) -> Result<(), CoreError> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM task_groups WHERE id = $1")
            .bind(group_id)
            .fetch_optional(conn)
            .await?;
        found
            .map(|_| ())
            .ok_or_else(|| CoreError::NotFound(format!("Group {}", group_id)))
    }

    /// Update task fields within an existing transaction
    pub(crate) async fn update_task_fields<'a>(
        tx: &mut Transaction<'a, Sqlite>,
        id: Uuid,
        data: &UpdateTaskData,
    ) -> Result<(), CoreError> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE tasks SET ");
        let mut separated = qb.separated(", ");
        let mut updated = false;

        if let Some(title) = &data.title {
            separated.push("title = ");
            separated.push_bind_unseparated(validate_title(title)?);
            updated = true;
        }

        if let Some(description) = &data.description {
            separated.push("description = ");
            separated.push_bind_unseparated(description.clone());
            updated = true;
        }

        if let Some(priority) = data.priority {
            separated.push("priority = ");
            separated.push_bind_unseparated(priority);
            updated = true;
        }

        if let Some(due_at) = data.due_at {
            separated.push("due_at = ");
            separated.push_bind_unseparated(due_at);
            updated = true;
        }

        if let Some(frequency) = data.repeat_frequency {
            separated.push("repeat_frequency = ");
            separated.push_bind_unseparated(frequency);
            updated = true;
        }

        if data.repeat_interval.is_some() {
            separated.push("repeat_interval = ");
            separated.push_bind_unseparated(validate_interval(data.repeat_interval)?);
            updated = true;
        }

        if let Some(repeat_until) = data.repeat_until {
            separated.push("repeat_until = ");
            separated.push_bind_unseparated(repeat_until);
            updated = true;
        }

        if let Some(accent_color) = &data.accent_color {
            separated.push("accent_color = ");
            separated.push_bind_unseparated(accent_color.clone());
            updated = true;
        }

        if let Some(icon) = &data.icon {
            separated.push("icon = ");
            separated.push_bind_unseparated(icon.clone());
            updated = true;
        }

        if let Some(theme_variant) = &data.theme_variant {
            separated.push("theme_variant = ");
            separated.push_bind_unseparated(theme_variant.clone());
            updated = true;
        }

        if updated {
            qb.push(" WHERE id = ");
            qb.push_bind(id);
            qb.build().execute(&mut **tx).await?;
        }

        Ok(())
    }
}
