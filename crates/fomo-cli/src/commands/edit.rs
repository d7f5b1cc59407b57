use anyhow::Result;
use chrono_tz::Tz;
use fomo_core::models::UpdateTaskData;
use fomo_core::repository::Repository;

use crate::cli::EditCommand;
use crate::parser::{parse_due_date, parse_until_date};
use crate::util::resolve_task_id;
use crate::views::table::short_id;

pub async fn edit_task(repo: &impl Repository, command: EditCommand, tz: &Tz) -> Result<()> {
    let task_id = resolve_task_id(repo, &command.id).await?;

    let description = if command.description_clear {
        Some(None)
    } else {
        command.description.map(Some)
    };

    let due_at = if command.due_clear {
        Some(None)
    } else if let Some(due_str) = command.due.as_deref() {
        Some(Some(parse_due_date(due_str, tz)?))
    } else {
        None
    };

    let repeat_until = if command.until_clear {
        Some(None)
    } else if let Some(until_str) = command.until.as_deref() {
        Some(Some(parse_until_date(until_str)?))
    } else {
        None
    };

    let update_data = UpdateTaskData {
        title: command.title,
        description,
        priority: command.priority,
        due_at,
        repeat_frequency: command.every,
        repeat_interval: command.interval,
        repeat_until,
        accent_color: command.color,
        icon: command.icon,
        theme_variant: command.theme,
    };

    let updated_task = repo.update_task(task_id, update_data).await?;
    println!(
        "Updated task '{}' ({})",
        updated_task.title,
        short_id(&updated_task.id)
    );

    Ok(())
}
