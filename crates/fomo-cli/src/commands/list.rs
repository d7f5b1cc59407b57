use anyhow::Result;
use chrono_tz::Tz;
use fomo_core::repository::Repository;

use crate::cli::ListCommand;
use crate::config::Config;
use crate::util::{resolve_group_id, resolve_sort};
use crate::views::table::display_tasks;

pub async fn list_tasks(
    repo: &impl Repository,
    command: ListCommand,
    config: &Config,
    tz: &Tz,
) -> Result<()> {
    let criterion = resolve_sort(command.sort.as_deref(), config.default_sort);
    let group_id = match command.group.as_deref() {
        Some(name) => Some(resolve_group_id(repo, name).await?),
        None => None,
    };

    let tasks = repo.list_sorted(criterion, group_id).await?;
    display_tasks(&tasks, tz);

    Ok(())
}
