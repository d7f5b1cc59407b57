use anyhow::Result;
use chrono_tz::Tz;
use fomo_core::board::GroupSelection;
use fomo_core::repository::Repository;

use crate::cli::BoardCommand;
use crate::config::Config;
use crate::util::{resolve_group_id, resolve_sort};
use crate::views::table::display_board;

pub async fn show_board(
    repo: &impl Repository,
    command: BoardCommand,
    config: &Config,
    tz: &Tz,
) -> Result<()> {
    let criterion = resolve_sort(command.sort.as_deref(), config.default_sort);

    let mut group_ids = Vec::with_capacity(command.groups.len());
    for name in &command.groups {
        group_ids.push(resolve_group_id(repo, name).await?);
    }
    let selection = GroupSelection::from_parts(group_ids, command.inbox, command.all);

    let board = repo
        .load_board(criterion, &selection, config.spotlight_size)
        .await?;

    if command.json {
        println!("{}", serde_json::to_string_pretty(&board)?);
    } else {
        display_board(&board, tz);
    }

    Ok(())
}
