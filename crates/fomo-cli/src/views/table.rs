use chrono::Utc;
use chrono_humanize::Humanize;
use chrono_tz::Tz;
use comfy_table::{Attribute, Cell, Color, Row, Table};
use fomo_core::board::{Board, BoardStats};
use fomo_core::models::{GroupSummary, RepeatFrequency, TaskPriority, TaskWithGroup};
use fomo_core::timezone::format_with_timezone;
use owo_colors::OwoColorize;

const INBOX_LABEL: &str = "Inbox";

pub fn short_id(id: &uuid::Uuid) -> String {
    id.simple().to_string()[..8].to_string()
}

fn title_cell(task: &TaskWithGroup) -> Cell {
    let mut display_title = String::new();
    if task.task.is_recurring() {
        display_title.push('↻');
        display_title.push(' ');
    }
    display_title.push_str(&task.task.title);

    let cell = Cell::new(display_title);
    if task.task.is_completed {
        return cell.add_attribute(Attribute::CrossedOut).fg(Color::DarkGrey);
    }
    match task.task.priority {
        TaskPriority::High => cell.fg(Color::Red).add_attribute(Attribute::Bold),
        TaskPriority::Medium => cell.fg(Color::Yellow),
        TaskPriority::Low => cell.fg(Color::Green),
    }
}

fn due_cell(task: &TaskWithGroup, tz: &Tz) -> Cell {
    let Some(due_at) = task.task.due_at else {
        return Cell::new("-");
    };
    let text = format!(
        "{} ({})",
        format_with_timezone(due_at, tz, "%Y-%m-%d %H:%M"),
        due_at.humanize()
    );
    let now = Utc::now();
    if task.task.is_completed {
        Cell::new(text)
    } else if due_at < now {
        Cell::new(text).fg(Color::Red)
    } else if due_at.with_timezone(tz).date_naive() == now.with_timezone(tz).date_naive() {
        Cell::new(text).fg(Color::Yellow)
    } else {
        Cell::new(text)
    }
}

fn repeat_label(task: &TaskWithGroup) -> String {
    match task.task.repeat_frequency {
        RepeatFrequency::None => "-".to_string(),
        frequency => {
            let mut label = if task.task.repeat_interval == 1 {
                frequency.to_string()
            } else {
                format!("every {} ({})", task.task.repeat_interval, frequency)
            };
            if let Some(until) = task.task.repeat_until {
                label.push_str(&format!(" until {}", until));
            }
            label
        }
    }
}

pub fn display_tasks(tasks: &[TaskWithGroup], tz: &Tz) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Priority", "Due", "Group", "Pos", "Repeats"]);

    for task in tasks {
        let mut row = Row::new();
        row.add_cell(Cell::new(short_id(&task.task.id)));
        row.add_cell(title_cell(task));
        row.add_cell(Cell::new(task.task.priority.to_string()));
        row.add_cell(due_cell(task, tz));
        row.add_cell(Cell::new(task.group_name.as_deref().unwrap_or(INBOX_LABEL)));
        row.add_cell(Cell::new(task.task.position));
        row.add_cell(Cell::new(repeat_label(task)));
        table.add_row(row);
    }

    println!("{table}");
}

pub fn display_groups(groups: &[GroupSummary]) {
    if groups.is_empty() {
        println!("No groups found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Order", "Name", "Slug", "Tasks", "Color", "Icon"]);

    for summary in groups {
        let group = &summary.group;
        let mut row = Row::new();
        row.add_cell(Cell::new(group.display_order));
        row.add_cell(Cell::new(&group.name).add_attribute(Attribute::Bold));
        row.add_cell(Cell::new(&group.slug));
        row.add_cell(Cell::new(summary.task_count));
        row.add_cell(Cell::new(&group.color));
        row.add_cell(Cell::new(&group.icon));
        table.add_row(row);
    }

    println!("{table}");
}

fn display_stats(stats: &BoardStats) {
    println!(
        "{} total  {} done  {} high priority  {} repeating",
        stats.total.bold(),
        stats.completed.green(),
        stats.high_priority.red(),
        stats.repeating.cyan()
    );
}

pub fn display_board(board: &Board, tz: &Tz) {
    display_stats(&board.stats);

    if !board.spotlight.is_empty() {
        println!("\n{} (sorted by {})", "Spotlight".bold().yellow(), board.criterion);
        display_tasks(&board.spotlight, tz);
    }

    if let Some(inbox) = &board.inbox {
        println!(
            "\n{} ({} tasks)",
            INBOX_LABEL.bold().bright_white(),
            board.inbox_total
        );
        display_tasks(inbox, tz);
    }

    for column in &board.columns {
        println!(
            "\n{} ({} tasks)",
            column.group.group.name.bold().bright_white(),
            column.group.task_count
        );
        display_tasks(&column.tasks, tz);
    }
}
