use anyhow::Result;
use chrono_tz::Tz;
use fomo_core::models::ToggleResult;
use fomo_core::repository::Repository;
use fomo_core::timezone::format_with_timezone;
use owo_colors::OwoColorize;

use crate::cli::ToggleCommand;
use crate::util::resolve_task_id;
use crate::views::table::short_id;

pub async fn toggle_task(repo: &impl Repository, command: ToggleCommand, tz: &Tz) -> Result<()> {
    let task_id = resolve_task_id(repo, &command.id).await?;

    let result = repo.toggle_completion(task_id).await?;
    let task = result.task();

    match &result {
        ToggleResult::Completed { next, .. } => {
            println!("{} Completed task: '{}'", "✓".green().bold(), task.title);
            match next {
                Some(next) => {
                    let due = next
                        .due_at
                        .map(|d| format_with_timezone(d, tz, "%Y-%m-%d %H:%M"))
                        .unwrap_or_default();
                    println!(
                        "  {} Next occurrence {} due {}",
                        "↻".cyan(),
                        short_id(&next.id).yellow(),
                        due.cyan()
                    );
                }
                None if task.is_recurring() => {
                    println!("  Recurrence has ended; no further occurrences.");
                }
                None => {}
            }
        }
        ToggleResult::Reopened(_) => {
            println!("Reopened task: '{}'", task.title);
        }
    }

    Ok(())
}
