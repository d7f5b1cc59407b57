//! Deterministic display ordering for tasks.
//!
//! Every criterion is a chain of comparator keys ending in the task id
//! (UUIDv7, so time-ordered and unique), which makes the result a total order
//! independent of the order rows came back from the store.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::TaskWithGroup;

/// Number of tasks shown in the spotlight summary.
pub const DEFAULT_SPOTLIGHT_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortCriterion {
    /// Priority weight desc, position asc, group order asc, created-at desc.
    #[default]
    Priority,
    /// Due date asc (undated last), priority weight desc, group order asc, created-at asc.
    Date,
    /// Group order asc, group name asc, priority weight desc, position asc, created-at desc.
    Group,
}

impl fmt::Display for SortCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortCriterion::Priority => write!(f, "priority"),
            SortCriterion::Date => write!(f, "date"),
            SortCriterion::Group => write!(f, "group"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid sort criterion: {0}")]
pub struct ParseSortCriterionError(String);

impl FromStr for SortCriterion {
    type Err = ParseSortCriterionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "priority" => Ok(SortCriterion::Priority),
            "date" => Ok(SortCriterion::Date),
            "group" => Ok(SortCriterion::Group),
            _ => Err(ParseSortCriterionError(s.to_string())),
        }
    }
}

impl SortCriterion {
    /// Compare two tasks under this criterion.
    pub fn compare(self, a: &TaskWithGroup, b: &TaskWithGroup) -> Ordering {
        let keys = match self {
            SortCriterion::Priority => priority_keys(a, b),
            SortCriterion::Date => date_keys(a, b),
            SortCriterion::Group => group_keys(a, b),
        };
        keys.then_with(|| a.task.id.cmp(&b.task.id))
    }
}

fn weight_desc(a: &TaskWithGroup, b: &TaskWithGroup) -> Ordering {
    b.task.priority.weight().cmp(&a.task.priority.weight())
}

fn position_asc(a: &TaskWithGroup, b: &TaskWithGroup) -> Ordering {
    a.task.position.cmp(&b.task.position)
}

// Inbox tasks carry no group order and sort first, as NULL does in an ascending SQLite ORDER BY.
fn group_order_asc(a: &TaskWithGroup, b: &TaskWithGroup) -> Ordering {
    a.group_order.cmp(&b.group_order)
}

fn group_name_asc(a: &TaskWithGroup, b: &TaskWithGroup) -> Ordering {
    a.group_name.cmp(&b.group_name)
}

fn due_asc_nulls_last(a: &TaskWithGroup, b: &TaskWithGroup) -> Ordering {
    match (a.task.due_at, b.task.due_at) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn priority_keys(a: &TaskWithGroup, b: &TaskWithGroup) -> Ordering {
    weight_desc(a, b)
        .then_with(|| position_asc(a, b))
        .then_with(|| group_order_asc(a, b))
        .then_with(|| b.task.created_at.cmp(&a.task.created_at))
}

fn date_keys(a: &TaskWithGroup, b: &TaskWithGroup) -> Ordering {
    due_asc_nulls_last(a, b)
        .then_with(|| weight_desc(a, b))
        .then_with(|| group_order_asc(a, b))
        .then_with(|| a.task.created_at.cmp(&b.task.created_at))
}

fn group_keys(a: &TaskWithGroup, b: &TaskWithGroup) -> Ordering {
    group_order_asc(a, b)
        .then_with(|| group_name_asc(a, b))
        .then_with(|| weight_desc(a, b))
        .then_with(|| position_asc(a, b))
        .then_with(|| b.task.created_at.cmp(&a.task.created_at))
}

/// Restrict to a single group (exact match) when `group_id` is given.
pub fn filter_by_group(tasks: Vec<TaskWithGroup>, group_id: Option<Uuid>) -> Vec<TaskWithGroup> {
    match group_id {
        Some(id) => tasks
            .into_iter()
            .filter(|t| t.task.group_id == Some(id))
            .collect(),
        None => tasks,
    }
}

/// Filter by group, then order by `criterion`.
pub fn sort_tasks(
    tasks: Vec<TaskWithGroup>,
    criterion: SortCriterion,
    group_id: Option<Uuid>,
) -> Vec<TaskWithGroup> {
    let mut tasks = filter_by_group(tasks, group_id);
    tasks.sort_by(|a, b| criterion.compare(a, b));
    tasks
}

/// The top `size` tasks under the priority ordering.
pub fn spotlight(tasks: &[TaskWithGroup], size: usize) -> Vec<TaskWithGroup> {
    let mut ranked: Vec<TaskWithGroup> = tasks.to_vec();
    ranked.sort_by(|a, b| SortCriterion::Priority.compare(a, b));
    ranked.truncate(size);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Task, TaskPriority};
    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;
    use rstest::rstest;

    fn task(n: u128, title: &str, priority: TaskPriority) -> TaskWithGroup {
        TaskWithGroup {
            task: Task {
                id: Uuid::from_u128(n),
                title: title.to_string(),
                priority,
                created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
                    + Duration::minutes(n as i64),
                ..Default::default()
            },
            group_name: None,
            group_order: None,
        }
    }

    fn titles(tasks: &[TaskWithGroup]) -> Vec<&str> {
        tasks.iter().map(|t| t.task.title.as_str()).collect()
    }

    #[rstest]
    #[case("priority", SortCriterion::Priority)]
    #[case("", SortCriterion::Priority)]
    #[case("DATE", SortCriterion::Date)]
    #[case(" group ", SortCriterion::Group)]
    fn test_parse_sort_criterion(#[case] input: &str, #[case] expected: SortCriterion) {
        assert_eq!(input.parse::<SortCriterion>().unwrap(), expected);
    }

    #[test]
    fn test_parse_sort_criterion_rejects_unknown() {
        assert!("alphabetical".parse::<SortCriterion>().is_err());
    }

    #[test]
    fn test_priority_sort_orders_by_weight() {
        let tasks = vec![
            task(1, "low", TaskPriority::Low),
            task(2, "high", TaskPriority::High),
            task(3, "medium", TaskPriority::Medium),
        ];
        let sorted = sort_tasks(tasks, SortCriterion::Priority, None);
        assert_eq!(titles(&sorted), vec!["high", "medium", "low"]);
    }

    #[test]
    fn test_priority_sort_ties_on_position_then_newest_first() {
        let mut a = task(1, "a", TaskPriority::Medium);
        a.task.position = 2;
        let mut b = task(2, "b", TaskPriority::Medium);
        b.task.position = 1;
        let c = task(3, "c", TaskPriority::Medium);
        let mut d = task(4, "d", TaskPriority::Medium);
        d.task.position = 2;

        let sorted = sort_tasks(vec![a, b, c, d], SortCriterion::Priority, None);
        // c has position 0; d and a share position 2, newer first.
        assert_eq!(titles(&sorted), vec!["c", "b", "d", "a"]);
    }

    #[test]
    fn test_date_sort_puts_undated_last_regardless_of_priority() {
        let base = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let undated = task(1, "undated-high", TaskPriority::High);
        let mut later = task(2, "later-low", TaskPriority::Low);
        later.task.due_at = Some(base + Duration::days(3));
        let mut sooner = task(3, "sooner-low", TaskPriority::Low);
        sooner.task.due_at = Some(base);

        let sorted = sort_tasks(vec![undated, later, sooner], SortCriterion::Date, None);
        assert_eq!(titles(&sorted), vec!["sooner-low", "later-low", "undated-high"]);
    }

    #[test]
    fn test_date_sort_same_due_breaks_on_weight_then_oldest_first() {
        let due = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let mut a = task(1, "a-medium", TaskPriority::Medium);
        let mut b = task(2, "b-high", TaskPriority::High);
        let mut c = task(3, "c-medium", TaskPriority::Medium);
        for t in [&mut a, &mut b, &mut c] {
            t.task.due_at = Some(due);
        }
        let sorted = sort_tasks(vec![c, a, b], SortCriterion::Date, None);
        assert_eq!(titles(&sorted), vec!["b-high", "a-medium", "c-medium"]);
    }

    #[test]
    fn test_group_sort_uses_order_then_name_with_inbox_first() {
        let mut work = task(1, "work", TaskPriority::Low);
        work.group_order = Some(1);
        work.group_name = Some("Work".to_string());
        let mut alpha = task(2, "alpha", TaskPriority::Low);
        alpha.group_order = Some(2);
        alpha.group_name = Some("Alpha".to_string());
        let mut home = task(3, "home", TaskPriority::High);
        home.group_order = Some(1);
        home.group_name = Some("Home".to_string());
        let inbox = task(4, "inbox", TaskPriority::Low);

        let sorted = sort_tasks(vec![work, alpha, home, inbox], SortCriterion::Group, None);
        assert_eq!(titles(&sorted), vec!["inbox", "home", "work", "alpha"]);
    }

    #[test]
    fn test_group_filter_is_exact() {
        let group = Uuid::from_u128(99);
        let mut grouped = task(1, "grouped", TaskPriority::Low);
        grouped.task.group_id = Some(group);
        let inbox = task(2, "inbox", TaskPriority::High);
        let mut other = task(3, "other", TaskPriority::High);
        other.task.group_id = Some(Uuid::from_u128(100));

        let sorted = sort_tasks(vec![grouped, inbox, other], SortCriterion::Priority, Some(group));
        assert_eq!(titles(&sorted), vec!["grouped"]);
    }

    #[test]
    fn test_spotlight_takes_top_by_priority() {
        let tasks: Vec<_> = (0..8)
            .map(|n| {
                let priority = if n % 2 == 0 { TaskPriority::High } else { TaskPriority::Low };
                task(n, &format!("t{n}"), priority)
            })
            .collect();
        let top = spotlight(&tasks, DEFAULT_SPOTLIGHT_SIZE);
        assert_eq!(top.len(), 5);
        assert!(top[..4].iter().all(|t| t.task.priority == TaskPriority::High));
        assert_eq!(top[4].task.priority, TaskPriority::Low);
    }

    fn arb_tasks() -> impl Strategy<Value = Vec<TaskWithGroup>> {
        prop::collection::vec(
            (
                0u8..3,
                0i64..4,
                prop::option::of(0i64..5),
                prop::option::of(0i64..3),
                0i64..3,
            ),
            0..40,
        )
        .prop_map(|rows| {
            let base = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
            rows.into_iter()
                .enumerate()
                .map(|(i, (p, position, due, order, created))| {
                    let priority = match p {
                        0 => TaskPriority::Low,
                        1 => TaskPriority::Medium,
                        _ => TaskPriority::High,
                    };
                    let mut t = task(i as u128 + 1, &format!("t{i}"), priority);
                    t.task.position = position;
                    t.task.due_at = due.map(|d| base + Duration::days(d));
                    t.task.created_at = base + Duration::hours(created);
                    t.group_order = order;
                    t.group_name = order.map(|o| format!("g{o}"));
                    t
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_sort_does_not_depend_on_input_order(tasks in arb_tasks()) {
            for criterion in [SortCriterion::Priority, SortCriterion::Date, SortCriterion::Group] {
                let forward = sort_tasks(tasks.clone(), criterion, None);
                let mut reversed_input = tasks.clone();
                reversed_input.reverse();
                let backward = sort_tasks(reversed_input, criterion, None);
                let ids = |v: &[TaskWithGroup]| v.iter().map(|t| t.task.id).collect::<Vec<_>>();
                prop_assert_eq!(ids(&forward), ids(&backward));
                prop_assert_eq!(forward.len(), tasks.len());
            }
        }

        #[test]
        fn prop_date_sort_never_puts_undated_before_dated(tasks in arb_tasks()) {
            let sorted = sort_tasks(tasks, SortCriterion::Date, None);
            let first_undated = sorted.iter().position(|t| t.task.due_at.is_none());
            if let Some(idx) = first_undated {
                prop_assert!(sorted[idx..].iter().all(|t| t.task.due_at.is_none()));
            }
        }
    }
}
