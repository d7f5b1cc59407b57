use anyhow::Result;
use fomo_core::repository::Repository;
use fomo_core::validation::parse_position;

use crate::cli::MoveCommand;
use crate::util::{resolve_group_id, resolve_task_id};

pub async fn move_task(repo: &impl Repository, command: MoveCommand) -> Result<()> {
    let task_id = resolve_task_id(repo, &command.id).await?;
    let position = parse_position(command.position.as_deref())?;
    let group_id = match command.group.as_deref() {
        Some(name) => Some(resolve_group_id(repo, name).await?),
        None => None,
    };

    let task = repo.move_task(task_id, group_id, position).await?;
    println!(
        "Moved '{}' to {} at position {}",
        task.title,
        command.group.as_deref().unwrap_or("Inbox"),
        task.position
    );

    Ok(())
}
