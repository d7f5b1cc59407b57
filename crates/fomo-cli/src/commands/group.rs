use anyhow::Result;
use fomo_core::models::NewGroupData;
use fomo_core::repository::Repository;
use owo_colors::OwoColorize;

use crate::cli::{GroupCommand, GroupSubcommand};
use crate::util::resolve_group_id;
use crate::views::table::display_groups;

pub async fn group_command(repo: &impl Repository, command: GroupCommand) -> Result<()> {
    match command.command {
        GroupSubcommand::Add(add) => {
            let group = repo
                .add_group(NewGroupData {
                    name: add.name,
                    color: add.color,
                    icon: add.icon,
                    display_order: None,
                })
                .await?;
            println!(
                "{} Created group '{}' ({}) at position {}",
                "✓".green().bold(),
                group.name.bold(),
                group.slug,
                group.display_order
            );
        }
        GroupSubcommand::List => {
            let groups = repo.find_groups().await?;
            display_groups(&groups);
        }
        GroupSubcommand::Delete(delete) => {
            let group_id = resolve_group_id(repo, &delete.name).await?;
            repo.delete_group(group_id).await?;
            println!(
                "Deleted group '{}'; its tasks moved to the inbox",
                delete.name
            );
        }
        GroupSubcommand::Reorder(reorder) => {
            let group_id = resolve_group_id(repo, &reorder.name).await?;
            let groups = repo.reorder_group(group_id, reorder.position).await?;
            for group in &groups {
                let marker = if group.id == group_id { "→" } else { " " };
                println!("{} {:>3}. {}", marker, group.display_order, group.name);
            }
        }
    }

    Ok(())
}
