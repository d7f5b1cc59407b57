use anyhow::Result;
use chrono_tz::Tz;
use fomo_core::models::NewTaskData;
use fomo_core::repository::Repository;
use fomo_core::timezone::format_with_timezone;
use owo_colors::{OwoColorize, Style};

use crate::cli::AddCommand;
use crate::parser::{parse_due_date, parse_until_date};
use crate::util::resolve_group_id;
use crate::views::table::short_id;

pub async fn add_task(repo: &impl Repository, command: AddCommand, tz: &Tz) -> Result<()> {
    let due_at = command
        .due
        .as_deref()
        .map(|d| parse_due_date(d, tz))
        .transpose()?;
    let repeat_until = command.until.as_deref().map(parse_until_date).transpose()?;
    let group_id = match command.group.as_deref() {
        Some(name) => Some(resolve_group_id(repo, name).await?),
        None => None,
    };

    let new_task_data = NewTaskData {
        title: command.title,
        description: command.description,
        group_id,
        priority: command.priority,
        due_at,
        repeat_frequency: command.every,
        repeat_interval: command.interval,
        repeat_until,
        position: command.position,
        accent_color: command.color,
        icon: command.icon,
        theme_variant: command.theme,
    };

    let added_task = repo.add_task(new_task_data).await?;

    let success_style = Style::new().green().bold();
    let info_style = Style::new().blue();

    let label = if added_task.is_recurring() {
        "Created recurring task:"
    } else {
        "Created task:"
    };
    println!(
        "{} {} {}",
        "✓".style(success_style),
        label,
        added_task.title.bright_white().bold()
    );
    println!(
        "  {} Task ID: {}",
        "→".style(info_style),
        short_id(&added_task.id).yellow()
    );
    if let Some(due_at) = added_task.due_at {
        println!(
            "  {} Due: {}",
            "→".style(info_style),
            format_with_timezone(due_at, tz, "%Y-%m-%d %H:%M").cyan()
        );
    }
    if added_task.is_recurring() {
        println!(
            "  {} Repeats every {} ({})",
            "→".style(info_style),
            added_task.repeat_interval,
            added_task.repeat_frequency
        );
    }

    Ok(())
}
