/*
Session packer.
Greedy allocation of study sessions into free windows, most urgent task first.
Favours deadline risk over total throughput, so the result is predictable
rather than optimal.
*/

use chrono::{DateTime, Duration, FixedOffset};
use tracing::debug;
use uuid::Uuid;

use crate::calendar::{MIN_SESSION_MIN, subtract_intervals};
use crate::error::Result;
use crate::models::{
    AvailabilityWindow, BusyInterval, ScheduleWarning, ScheduledEvent, Task, WarningKind,
};
use crate::preferences;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Packing {
    pub events: Vec<ScheduledEvent>,   // sorted by start
    pub warnings: Vec<ScheduleWarning>, // in task order
}

// Earliest window that still has MIN_SESSION_MIN before `due`.
// The pool is chronological, so a window starting at or after the
// due date ends the search.
fn next_window(pool: &[AvailabilityWindow], due: DateTime<FixedOffset>) -> Option<(usize, i64)> {
    for (i, w) in pool.iter().enumerate() {
        if w.start >= due {
            return None;
        }
        let limit = w.end.min(due);
        let available = (limit - w.start).num_minutes();
        if available >= MIN_SESSION_MIN {
            return Some((i, available));
        }
    }
    None
}

// Take `[start - break, end + break)` out of every window so the next
// session, in this window or a neighbouring slot, keeps the break gap.
fn reserve(
    pool: &mut Vec<AvailabilityWindow>,
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
    break_min: i64,
) {
    let blocked = [BusyInterval::new(
        start - Duration::minutes(break_min),
        end + Duration::minutes(break_min),
    )];

    let mut next = Vec::with_capacity(pool.len());
    for w in pool.drain(..) {
        for (s, e) in subtract_intervals(w.start, w.end, &blocked) {
            if (e - s).num_minutes() >= MIN_SESSION_MIN {
                next.push(AvailabilityWindow {
                    day: w.day,
                    start: s,
                    end: e,
                });
            }
        }
    }
    *pool = next;
}

fn session_event(
    task: &Task,
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
    index: usize,
) -> ScheduledEvent {
    let minutes = (end - start).num_minutes();
    ScheduledEvent {
        // stable across runs with identical input
        id: Uuid::new_v5(&task.id, start.to_rfc3339().as_bytes()),
        task_id: task.id,
        title: task.title.clone(),
        start,
        end,
        priority: task.priority,
        subject_name: task.subject.as_ref().map(|s| s.name.clone()),
        description: Some(format!("Study session {index} ({minutes} min)")),
    }
}

/// Allocate study sessions for `ranked` tasks into `windows`.
///
/// For each task, in order:
/// - remaining = estimated - studied, tasks with nothing left are skipped
/// - take the earliest window with at least `MIN_SESSION_MIN` before the due date
/// - chunk = min(remaining, max_duration, available)
/// - reserve the chunk plus `break_min` on both sides from the shared pool
///
/// Tasks that only partly fit are reported as `PartiallyScheduled`,
/// tasks that get nothing as `Unschedulable`. Limits outside the allowed
/// preference ranges fail with `InvalidPreferences`.
pub fn pack(
    ranked: &[Task],
    windows: &[AvailabilityWindow],
    break_min: i64,
    max_duration: i64,
) -> Result<Packing> {
    preferences::validate_limits(break_min, max_duration)?;

    let mut pool: Vec<AvailabilityWindow> = windows.to_vec();
    pool.sort_by(|a, b| a.start.cmp(&b.start));
    let had_windows = !pool.is_empty();

    let mut packing = Packing::default();

    for task in ranked {
        let Some(due) = task.due_at else {
            continue;
        };
        if task.estimated_min.unwrap_or(0) <= 0 {
            debug!("task {} has no effort estimate, skipping", task.id);
            continue;
        }
        let needed = task.remaining_min();
        if needed == 0 {
            debug!("task {} already fully studied, skipping", task.id);
            continue;
        }

        if !had_windows {
            packing.warnings.push(ScheduleWarning {
                kind: WarningKind::Unschedulable,
                task_id: task.id,
                detail: format!("no free time in the horizon for \"{}\"", task.title),
            });
            continue;
        }

        let mut remaining = needed;
        let mut sessions = 0;
        while remaining > 0 {
            let Some((idx, available)) = next_window(&pool, due) else {
                break;
            };
            let chunk = remaining.min(max_duration).min(available);
            let start = pool[idx].start;
            let end = start + Duration::minutes(chunk);

            sessions += 1;
            packing.events.push(session_event(task, start, end, sessions));
            reserve(&mut pool, start, end, break_min);
            remaining -= chunk;
        }

        let scheduled = needed - remaining;
        debug!(
            "task {}: {} of {} min in {} sessions",
            task.id, scheduled, needed, sessions
        );

        if remaining > 0 {
            let warning = if scheduled == 0 {
                ScheduleWarning {
                    kind: WarningKind::Unschedulable,
                    task_id: task.id,
                    detail: format!(
                        "no free time left before the due date of \"{}\"",
                        task.title
                    ),
                }
            } else {
                ScheduleWarning {
                    kind: WarningKind::PartiallyScheduled {
                        scheduled_min: scheduled,
                        remaining_min: remaining,
                    },
                    task_id: task.id,
                    detail: format!(
                        "\"{}\": {scheduled} of {needed} min fit before the due date",
                        task.title
                    ),
                }
            };
            packing.warnings.push(warning);
        }
    }

    packing.events.sort_by(|a, b| a.start.cmp(&b.start));
    Ok(packing)
}
