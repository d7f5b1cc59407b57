use crate::error::CoreError;
use crate::models::{
    GroupSummary, NewGroupData, TaskGroup, DEFAULT_GROUP_COLOR, DEFAULT_GROUP_ICON,
};
use crate::repository::SqliteRepository;
use crate::validation::slugify;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Sqlite, Transaction};
use tracing::{debug, info};
use uuid::Uuid;

#[async_trait]
impl super::GroupRepository for SqliteRepository {
    async fn add_group(&self, data: NewGroupData) -> Result<TaskGroup, CoreError> {
        let mut tx = self.pool().begin().await?;
        let group = Self::add_group_in_transaction(&mut tx, data).await?;
        tx.commit().await?;
        Ok(group)
    }

    async fn find_group_by_id(&self, id: Uuid) -> Result<Option<TaskGroup>, CoreError> {
        let group = sqlx::query_as("SELECT * FROM task_groups WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(group)
    }

    async fn find_group_by_name(&self, name: &str) -> Result<Option<TaskGroup>, CoreError> {
        let group = sqlx::query_as("SELECT * FROM task_groups WHERE name = $1")
            .bind(name)
            .fetch_optional(self.pool())
            .await?;
        Ok(group)
    }

    async fn find_groups(&self) -> Result<Vec<GroupSummary>, CoreError> {
        let groups = sqlx::query_as(
            r#"SELECT g.*, COUNT(t.id) AS task_count
            FROM task_groups g
            LEFT JOIN tasks t ON t.group_id = g.id
            GROUP BY g.id
            ORDER BY g.display_order, g.name
            "#,
        )
        .fetch_all(self.pool())
        .await?;
        Ok(groups)
    }

    async fn delete_group(&self, id: Uuid) -> Result<(), CoreError> {
        let mut tx = self.pool().begin().await?;

        let group: TaskGroup = sqlx::query_as("SELECT * FROM task_groups WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Group {}", id)))?;

        if self.default_groups().iter().any(|d| d.name == group.name) {
            return Err(CoreError::ProtectedGroup(group.name));
        }

        // Tasks outlive their group and fall back to the inbox.
        let orphaned = sqlx::query("UPDATE tasks SET group_id = NULL WHERE group_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM task_groups WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        debug!(group = %group.name, orphaned, "group deleted");
        Ok(())
    }

    async fn reorder_group(&self, id: Uuid, position: i64) -> Result<Vec<TaskGroup>, CoreError> {
        let mut tx = self.pool().begin().await?;

        let group: TaskGroup = sqlx::query_as("SELECT * FROM task_groups WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Group {}", id)))?;

        let mut groups: Vec<TaskGroup> = sqlx::query_as(
            "SELECT * FROM task_groups WHERE id != $1 ORDER BY display_order, name",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        let index = (position.max(1) as usize - 1).min(groups.len());
        groups.insert(index, group);

        for (i, group) in groups.iter_mut().enumerate() {
            let dense = i as i64 + 1;
            if group.display_order != dense {
                sqlx::query("UPDATE task_groups SET display_order = $1 WHERE id = $2")
                    .bind(dense)
                    .bind(group.id)
                    .execute(&mut *tx)
                    .await?;
                group.display_order = dense;
            }
        }

        tx.commit().await?;
        Ok(groups)
    }

    async fn ensure_default_groups(&self) -> Result<Vec<TaskGroup>, CoreError> {
        let mut tx = self.pool().begin().await?;
        let mut created = Vec::new();

        for defaults in self.default_groups() {
            let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM task_groups WHERE name = $1")
                .bind(&defaults.name)
                .fetch_optional(&mut *tx)
                .await?;
            if exists.is_none() {
                let group = Self::add_group_in_transaction(&mut tx, defaults.clone()).await?;
                info!(group = %group.name, "created default group");
                created.push(group);
            }
        }

        tx.commit().await?;
        Ok(created)
    }
}

impl SqliteRepository {
    pub(crate) async fn add_group_in_transaction<'a>(
        tx: &mut Transaction<'a, Sqlite>,
        data: NewGroupData,
    ) -> Result<TaskGroup, CoreError> {
        let name = data.name.trim().to_string();
        if name.is_empty() {
            return Err(CoreError::InvalidInput("Group name cannot be empty".to_string()));
        }

        let taken: Option<i64> = sqlx::query_scalar("SELECT 1 FROM task_groups WHERE name = $1")
            .bind(&name)
            .fetch_optional(&mut **tx)
            .await?;
        if taken.is_some() {
            return Err(CoreError::InvalidInput(format!(
                "A group named '{}' already exists",
                name
            )));
        }

        let slug = Self::unique_slug(tx, &name).await?;

        let display_order = match data.display_order {
            Some(order) if order > 0 => order,
            _ => {
                let max: i64 =
                    sqlx::query_scalar("SELECT COALESCE(MAX(display_order), 0) FROM task_groups")
                        .fetch_one(&mut **tx)
                        .await?;
                max + 1
            }
        };

        let group: TaskGroup = sqlx::query_as(
            r#"INSERT INTO task_groups (id, name, slug, color, icon, display_order, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&name)
        .bind(&slug)
        .bind(data.color.unwrap_or_else(|| DEFAULT_GROUP_COLOR.to_string()))
        .bind(data.icon.unwrap_or_else(|| DEFAULT_GROUP_ICON.to_string()))
        .bind(display_order)
        .bind(Utc::now())
        .fetch_one(&mut **tx)
        .await?;

        Ok(group)
    }

    /// `name` slugified, with `-2`, `-3`, ... appended until it is free.
    async fn unique_slug<'a>(
        tx: &mut Transaction<'a, Sqlite>,
        name: &str,
    ) -> Result<String, CoreError> {
        let base = match slugify(name) {
            s if s.is_empty() => "group".to_string(),
            s => s,
        };

        let mut candidate = base.clone();
        let mut suffix = 1;
        loop {
            let taken: Option<i64> = sqlx::query_scalar("SELECT 1 FROM task_groups WHERE slug = $1")
                .bind(&candidate)
                .fetch_optional(&mut **tx)
                .await?;
            if taken.is_none() {
                return Ok(candidate);
            }
            suffix += 1;
            candidate = format!("{}-{}", base, suffix);
        }
    }
}
