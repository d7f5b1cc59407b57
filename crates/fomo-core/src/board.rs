//! Assembles the board view: one column per visible group, an inbox column,
//! the spotlight list and summary counters.

use serde::Serialize;
use uuid::Uuid;

use crate::models::{GroupSummary, TaskPriority, TaskWithGroup};
use crate::ordering::{sort_tasks, spotlight, SortCriterion};

/// Which groups the board shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GroupSelection {
    /// Every group column plus the inbox.
    #[default]
    All,
    Selected {
        groups: Vec<Uuid>,
        include_inbox: bool,
    },
}

impl GroupSelection {
    /// Nothing chosen at all means "show everything", as does an explicit `view_all`.
    pub fn from_parts(groups: Vec<Uuid>, include_inbox: bool, view_all: bool) -> Self {
        if view_all || (groups.is_empty() && !include_inbox) {
            GroupSelection::All
        } else {
            GroupSelection::Selected {
                groups,
                include_inbox,
            }
        }
    }

    pub fn includes(&self, group_id: Option<Uuid>) -> bool {
        match (self, group_id) {
            (GroupSelection::All, _) => true,
            (GroupSelection::Selected { include_inbox, .. }, None) => *include_inbox,
            (GroupSelection::Selected { groups, .. }, Some(id)) => groups.contains(&id),
        }
    }

    pub fn shows_inbox(&self) -> bool {
        match self {
            GroupSelection::All => true,
            GroupSelection::Selected { include_inbox, .. } => *include_inbox,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BoardColumn {
    pub group: GroupSummary,
    pub tasks: Vec<TaskWithGroup>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BoardStats {
    pub total: usize,
    pub completed: usize,
    pub high_priority: usize,
    pub repeating: usize,
}

impl BoardStats {
    pub fn from_tasks(tasks: &[TaskWithGroup]) -> Self {
        Self {
            total: tasks.len(),
            completed: tasks.iter().filter(|t| t.task.is_completed).count(),
            high_priority: tasks
                .iter()
                .filter(|t| t.task.priority == TaskPriority::High)
                .count(),
            repeating: tasks.iter().filter(|t| t.task.is_recurring()).count(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Board {
    pub criterion: SortCriterion,
    /// Every selected task in display order.
    pub tasks: Vec<TaskWithGroup>,
    pub columns: Vec<BoardColumn>,
    /// `None` when the inbox column is hidden.
    pub inbox: Option<Vec<TaskWithGroup>>,
    /// Number of ungrouped tasks regardless of the selection.
    pub inbox_total: usize,
    pub spotlight: Vec<TaskWithGroup>,
    pub stats: BoardStats,
}

impl Board {
    pub fn build(
        all_tasks: Vec<TaskWithGroup>,
        groups: &[GroupSummary],
        criterion: SortCriterion,
        selection: &GroupSelection,
        spotlight_size: usize,
    ) -> Self {
        let spotlight = spotlight(&all_tasks, spotlight_size);
        let inbox_total = all_tasks.iter().filter(|t| t.task.group_id.is_none()).count();

        let selected: Vec<TaskWithGroup> = all_tasks
            .into_iter()
            .filter(|t| selection.includes(t.task.group_id))
            .collect();
        let tasks = sort_tasks(selected, criterion, None);

        let mut visible: Vec<&GroupSummary> = groups
            .iter()
            .filter(|g| match selection {
                GroupSelection::All => true,
                GroupSelection::Selected { groups, .. } => groups.contains(&g.group.id),
            })
            .collect();
        visible.sort_by(|a, b| {
            a.group
                .display_order
                .cmp(&b.group.display_order)
                .then_with(|| a.group.name.cmp(&b.group.name))
        });

        let columns = visible
            .into_iter()
            .map(|summary| BoardColumn {
                group: summary.clone(),
                tasks: tasks
                    .iter()
                    .filter(|t| t.task.group_id == Some(summary.group.id))
                    .cloned()
                    .collect(),
            })
            .collect();

        let inbox = selection.shows_inbox().then(|| {
            tasks
                .iter()
                .filter(|t| t.task.group_id.is_none())
                .cloned()
                .collect()
        });

        Self {
            criterion,
            stats: BoardStats::from_tasks(&tasks),
            tasks,
            columns,
            inbox,
            inbox_total,
            spotlight,
        }
    }
}
