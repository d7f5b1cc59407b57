use clap::{Parser, Subcommand};
use fomo_core::models::{RepeatFrequency, TaskPriority};

/// Fomo: a task board with groups, priorities and recurring tasks
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Add a new task
    Add(AddCommand),
    /// List tasks in display order
    List(ListCommand),
    /// Show the board: group columns, inbox, spotlight and stats
    Board(BoardCommand),
    /// Mark a task as done, or undo it
    Toggle(ToggleCommand),
    /// Move a task to another group and/or position
    Move(MoveCommand),
    /// Put a task at a position within its group and renumber the rest
    Reorder(ReorderCommand),
    /// Edit a task
    Edit(EditCommand),
    /// Delete a task
    Delete(DeleteCommand),
    /// Manage groups
    Group(GroupCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct AddCommand {
    /// The title of the task
    pub title: String,
    /// The description of the task
    #[clap(short, long)]
    pub description: Option<String>,
    /// Name of the group to put the task in (omit for the inbox)
    #[clap(short, long)]
    pub group: Option<String>,
    /// Priority: low, medium or high
    #[clap(short, long)]
    pub priority: Option<TaskPriority>,
    /// The due date (e.g. "tomorrow 9am", "2025-12-24 18:00")
    #[clap(long)]
    pub due: Option<String>,
    /// Repeat frequency: none, daily, weekly or monthly
    #[clap(long)]
    pub every: Option<RepeatFrequency>,
    /// Number of frequency units between occurrences
    #[clap(long, allow_negative_numbers = true)]
    pub interval: Option<i64>,
    /// Last date on which an occurrence may fall (YYYY-MM-DD)
    #[clap(long)]
    pub until: Option<String>,
    /// Manual position within the group (defaults to the end)
    #[clap(long)]
    pub position: Option<i64>,
    #[clap(long)]
    pub color: Option<String>,
    #[clap(long)]
    pub icon: Option<String>,
    #[clap(long)]
    pub theme: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ListCommand {
    /// Sort criterion: priority, date or group
    #[clap(short, long)]
    pub sort: Option<String>,
    /// Only show tasks in this group
    #[clap(short, long)]
    pub group: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct BoardCommand {
    /// Sort criterion: priority, date or group
    #[clap(short, long)]
    pub sort: Option<String>,
    /// Groups to show (repeatable); all groups when omitted
    #[clap(short, long, num_args = 1..)]
    pub groups: Vec<String>,
    /// Show the inbox column alongside the selected groups
    #[clap(long)]
    pub inbox: bool,
    /// Show every group regardless of other selections
    #[clap(long)]
    pub all: bool,
    /// Print the board as JSON
    #[clap(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ToggleCommand {
    /// The ID (or unique prefix) of the task
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct MoveCommand {
    /// The ID (or unique prefix) of the task
    pub id: String,
    /// Target group name (omit to move to the inbox)
    #[clap(short, long)]
    pub group: Option<String>,
    /// Position within the target group; below 1 parks the task at 0
    #[clap(short, long, allow_hyphen_values = true)]
    pub position: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ReorderCommand {
    /// The ID (or unique prefix) of the task
    pub id: String,
    /// 1-based position within the task's group
    pub position: i64,
}

#[derive(Parser, Debug, Clone)]
pub struct EditCommand {
    /// The ID (or unique prefix) of the task to edit
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, conflicts_with = "description")]
    pub description_clear: bool,

    #[arg(long)]
    pub priority: Option<TaskPriority>,

    #[arg(long)]
    pub due: Option<String>,
    #[arg(long, conflicts_with = "due")]
    pub due_clear: bool,

    #[arg(long)]
    pub every: Option<RepeatFrequency>,
    #[arg(long, allow_negative_numbers = true)]
    pub interval: Option<i64>,

    #[arg(long)]
    pub until: Option<String>,
    #[arg(long, conflicts_with = "until")]
    pub until_clear: bool,

    #[arg(long)]
    pub color: Option<String>,
    #[arg(long)]
    pub icon: Option<String>,
    #[arg(long)]
    pub theme: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteCommand {
    /// The ID (or unique prefix) of the task to delete
    pub id: String,
    /// Force deletion without confirmation
    #[clap(short, long)]
    pub force: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct GroupCommand {
    #[command(subcommand)]
    pub command: GroupSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum GroupSubcommand {
    /// Add a new group
    Add(AddGroupCommand),
    /// List groups with their task counts
    List,
    /// Delete a group; its tasks move to the inbox
    Delete(DeleteGroupCommand),
    /// Put a group at a 1-based position and renumber the rest
    Reorder(ReorderGroupCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct AddGroupCommand {
    /// The name of the group
    pub name: String,
    #[arg(long)]
    pub color: Option<String>,
    #[arg(long)]
    pub icon: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteGroupCommand {
    /// The name of the group to delete
    pub name: String,
}

#[derive(Parser, Debug, Clone)]
pub struct ReorderGroupCommand {
    /// The name of the group
    pub name: String,
    pub position: i64,
}
