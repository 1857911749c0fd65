// Groups scheduled sessions by calendar day for display.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::ScheduledEvent;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DaySchedule {
    pub date: NaiveDate,
    pub total_min: i64,
    pub events: Vec<ScheduledEvent>, // by start time
}

/// Group events by the local date of their start, days ascending.
pub fn project(events: &[ScheduledEvent]) -> Vec<DaySchedule> {
    let by_day = events.iter().fold(
        BTreeMap::<NaiveDate, Vec<ScheduledEvent>>::new(),
        |mut acc, e| {
            acc.entry(e.start.date_naive()).or_default().push(e.clone());
            acc
        },
    );

    by_day
        .into_iter()
        .map(|(date, mut events)| {
            events.sort_by(|a, b| a.start.cmp(&b.start));
            DaySchedule {
                date,
                total_min: events.iter().map(ScheduledEvent::duration_min).sum(),
                events,
            }
        })
        .collect()
}
