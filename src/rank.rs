// Orders pending tasks by urgency before packing.

use crate::models::{ScheduleWarning, Task, WarningKind};

#[derive(Debug, Clone, Default)]
pub struct Ranking {
    pub ranked: Vec<Task>,           // most urgent first
    pub skipped: Vec<ScheduleWarning>, // tasks without a due date
}

/// Rank tasks by priority tier, then by due date.
///
/// Rules:
/// - high < medium < low < anything else
/// - earlier due date first within a tier
/// - tasks without a due date are left out and reported as skipped
/// - ties keep their input order (stable sort)
pub fn rank(tasks: &[Task]) -> Ranking {
    let mut ranking = Ranking::default();

    for task in tasks {
        if task.due_at.is_none() {
            ranking.skipped.push(ScheduleWarning {
                kind: WarningKind::SkippedNoDueDate,
                task_id: task.id,
                detail: format!("\"{}\" has no due date", task.title),
            });
            continue;
        }
        ranking.ranked.push(task.clone());
    }

    ranking.ranked.sort_by(|a, b| {
        a.priority
            .rank()
            .cmp(&b.priority.rank())
            .then_with(|| a.due_at.cmp(&b.due_at))
    });

    ranking
}
