use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fomo_core::board::{Board, GroupSelection};
use fomo_core::models::{
    GroupSummary, RepeatFrequency, Task, TaskGroup, TaskPriority, TaskWithGroup,
};
use fomo_core::ordering::{sort_tasks, SortCriterion};
use fomo_core::recurrence::RecurrenceEngine;
use uuid::Uuid;

fn create_test_groups(count: usize) -> Vec<GroupSummary> {
    (0..count)
        .map(|i| GroupSummary {
            group: TaskGroup {
                id: Uuid::now_v7(),
                name: format!("Group {}", i),
                slug: format!("group-{}", i),
                color: "#5c6b7a".to_string(),
                icon: "ph-list-checks".to_string(),
                display_order: i as i64 + 1,
                created_at: Utc::now(),
            },
            task_count: 0,
        })
        .collect()
}

fn create_test_tasks(count: usize, groups: &[GroupSummary], rng: &mut fastrand::Rng) -> Vec<TaskWithGroup> {
    let base = Utc.with_ymd_and_hms(2030, 1, 1, 9, 0, 0).unwrap();
    (0..count)
        .map(|i| {
            let group = (rng.u8(..4) > 0).then(|| &groups[rng.usize(..groups.len())].group);
            let task = Task {
                title: format!("Benchmark Task {}", i),
                group_id: group.map(|g| g.id),
                priority: match rng.u8(..3) {
                    0 => TaskPriority::Low,
                    1 => TaskPriority::Medium,
                    _ => TaskPriority::High,
                },
                due_at: rng.bool().then(|| base + Duration::hours(rng.i64(0..24 * 365))),
                position: rng.i64(0..50),
                ..Default::default()
            };
            TaskWithGroup::new(task, group)
        })
        .collect()
}

fn bench_sort_tasks(c: &mut Criterion) {
    let mut rng = fastrand::Rng::with_seed(7);
    let groups = create_test_groups(8);
    let mut group = c.benchmark_group("sort_tasks");

    for size in [100usize, 1_000, 10_000] {
        let tasks = create_test_tasks(size, &groups, &mut rng);
        for criterion in [SortCriterion::Priority, SortCriterion::Date, SortCriterion::Group] {
            group.bench_with_input(
                BenchmarkId::new(criterion.to_string(), size),
                &tasks,
                |b, tasks| b.iter(|| sort_tasks(black_box(tasks.clone()), criterion, None)),
            );
        }
    }
    group.finish();
}

fn bench_board_build(c: &mut Criterion) {
    let mut rng = fastrand::Rng::with_seed(11);
    let groups = create_test_groups(8);
    let tasks = create_test_tasks(1_000, &groups, &mut rng);
    let selection = GroupSelection::All;

    c.bench_function("board_build_1000", |b| {
        b.iter(|| {
            Board::build(
                black_box(tasks.clone()),
                &groups,
                SortCriterion::Priority,
                &selection,
                5,
            )
        })
    });
}

fn bench_next_due_date(c: &mut Criterion) {
    let engine = RecurrenceEngine::new(chrono_tz::Europe::Warsaw);
    let now = Utc::now();
    let task = Task {
        title: "Pay rent".to_string(),
        due_at: Some(Utc.with_ymd_and_hms(2030, 1, 31, 8, 0, 0).unwrap()),
        repeat_frequency: RepeatFrequency::Monthly,
        ..Default::default()
    };

    c.bench_function("next_due_date_monthly", |b| {
        b.iter(|| engine.next_due_date(black_box(&task), black_box(now)))
    });
}

criterion_group!(benches, bench_sort_tasks, bench_board_build, bench_next_due_date);
criterion_main!(benches);
