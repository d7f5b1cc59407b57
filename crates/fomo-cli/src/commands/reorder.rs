use anyhow::Result;
use fomo_core::repository::Repository;

use crate::cli::ReorderCommand;
use crate::util::resolve_task_id;

pub async fn reorder_task(repo: &impl Repository, command: ReorderCommand) -> Result<()> {
    let task_id = resolve_task_id(repo, &command.id).await?;
    let siblings = repo.reorder_task(task_id, command.position).await?;

    for task in &siblings {
        let marker = if task.id == task_id { "→" } else { " " };
        println!("{} {:>3}. {}", marker, task.position, task.title);
    }

    Ok(())
}
