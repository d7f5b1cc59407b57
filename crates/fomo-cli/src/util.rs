use anyhow::{anyhow, Result};
use fomo_core::error::CoreError;
use fomo_core::ordering::SortCriterion;
use fomo_core::repository::Repository;
use tracing::warn;
use uuid::Uuid;

pub async fn resolve_task_id(repo: &impl Repository, short_id: &str) -> Result<Uuid> {
    if short_id.len() < 2 {
        return Err(anyhow!(CoreError::InvalidInput(
            "Short ID must be at least 2 characters long.".to_string()
        )));
    }
    let tasks = repo.find_tasks_by_short_id_prefix(short_id).await?;
    if tasks.len() == 1 {
        Ok(tasks[0].id)
    } else if tasks.is_empty() {
        Err(anyhow!(CoreError::NotFound(format!(
            "No task found with ID prefix '{}'",
            short_id
        ))))
    } else {
        let task_info: Vec<(String, String)> = tasks
            .into_iter()
            .map(|t| (t.id.to_string(), t.title))
            .collect();
        Err(anyhow!(CoreError::AmbiguousId(task_info)))
    }
}

/// Look up a group by exact name.
pub async fn resolve_group_id(repo: &impl Repository, name: &str) -> Result<Uuid> {
    repo.find_group_by_name(name)
        .await?
        .map(|g| g.id)
        .ok_or_else(|| anyhow!(CoreError::NotFound(format!("Group '{}' not found", name))))
}

/// Unknown criteria fall back to priority ordering instead of failing the command.
pub fn resolve_sort(raw: Option<&str>, default: SortCriterion) -> SortCriterion {
    match raw {
        None => default,
        Some(value) => value.parse().unwrap_or_else(|e| {
            warn!(error = %e, "falling back to priority ordering");
            SortCriterion::Priority
        }),
    }
}
