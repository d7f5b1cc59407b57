use chrono_tz::Tz;
use clap::Parser;
use dialoguer::Confirm;
use fomo_core::db;
use fomo_core::error::CoreError;
use fomo_core::recurrence::RecurrenceEngine;
use fomo_core::repository::{GroupRepository, SqliteRepository, TaskRepository};
use owo_colors::{OwoColorize, Style};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use util::resolve_task_id;

mod cli;
mod commands;
mod config;
mod parser;
mod util;
mod views;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("fomo=warn,fomo_core=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();

    let config = config::Config::new().unwrap_or_else(|e| {
        warn!(error = %e, "invalid configuration, using defaults");
        config::Config::default()
    });

    let recurrence = RecurrenceEngine::from_timezone_name(&config.timezone).unwrap_or_else(|e| {
        warn!(error = %e, "falling back to UTC for recurrence");
        RecurrenceEngine::default()
    });
    let tz: Tz = recurrence.timezone();
    debug!(database = %config.database_path, timezone = %tz, "starting");

    let db_pool = match db::establish_connection(&config.database_path).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    };
    let repository = SqliteRepository::new(db_pool, recurrence, config.default_groups.clone());

    if let Err(e) = repository.ensure_default_groups().await {
        handle_error(e.into());
    }

    let result = match cli.command {
        cli::Commands::Add(command) => commands::add::add_task(&repository, command, &tz).await,
        cli::Commands::List(command) => {
            commands::list::list_tasks(&repository, command, &config, &tz).await
        }
        cli::Commands::Board(command) => {
            commands::board::show_board(&repository, command, &config, &tz).await
        }
        cli::Commands::Toggle(command) => {
            commands::toggle::toggle_task(&repository, command, &tz).await
        }
        cli::Commands::Move(command) => commands::r#move::move_task(&repository, command).await,
        cli::Commands::Reorder(command) => {
            commands::reorder::reorder_task(&repository, command).await
        }
        cli::Commands::Edit(command) => commands::edit::edit_task(&repository, command, &tz).await,
        cli::Commands::Delete(command) => {
            let task_id = match resolve_task_id(&repository, &command.id).await {
                Ok(id) => id,
                Err(e) => handle_error(e),
            };
            let task = match repository.find_task_by_id(task_id).await {
                Ok(Some(t)) => t,
                Ok(None) => handle_error(
                    CoreError::NotFound(format!("Task with ID '{}' not found.", task_id)).into(),
                ),
                Err(e) => handle_error(e.into()),
            };

            if !command.force {
                let confirmation = Confirm::new()
                    .with_prompt(format!(
                        "Are you sure you want to delete task '{}'?",
                        task.title
                    ))
                    .default(false)
                    .interact()
                    .unwrap_or(false);

                if !confirmation {
                    println!("Deletion cancelled.");
                    return;
                }
            }
            commands::delete::delete_task(&repository, task_id).await
        }
        cli::Commands::Group(command) => commands::group::group_command(&repository, command).await,
    };

    if let Err(e) = result {
        handle_error(e);
    }
}

fn handle_error(err: anyhow::Error) -> ! {
    let error_style = Style::new().red().bold();

    if let Some(core_error) = err.downcast_ref::<CoreError>() {
        match core_error {
            CoreError::NotFound(s) => {
                eprintln!("{} {}", "Error:".style(error_style), s);
            }
            CoreError::AmbiguousId(tasks) => {
                eprintln!("{}", "Error: Ambiguous ID.".style(error_style));
                eprintln!("Did you mean one of these?");
                for (id, title) in tasks {
                    eprintln!("  {} ({})", id.yellow(), title);
                }
            }
            CoreError::InvalidInput(s) => {
                eprintln!("{} Invalid input: {}", "Error:".style(error_style), s);
            }
            CoreError::ProtectedGroup(name) => {
                eprintln!(
                    "{} Group '{}' is a default group and cannot be deleted",
                    "Error:".style(error_style),
                    name.yellow()
                );
            }
            CoreError::Conflict(task_id) => {
                eprintln!(
                    "{} Task '{}' changed while it was being updated; run the command again",
                    "Error:".style(error_style),
                    task_id.yellow()
                );
            }
            CoreError::Database(db_err) => {
                eprintln!("{} {}: {}", "Error:".style(error_style), err, db_err);
            }
            _ => eprintln!("{} {}", "Error:".style(error_style), err),
        }
    } else {
        eprintln!("{} {:#}", "Error:".style(error_style), err);
    }
    std::process::exit(1);
}
