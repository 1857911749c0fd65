use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
    // anything the client sends that we don't recognise
    #[serde(other)]
    Unknown,
}

impl Priority {
    /// Tier used for ordering, lower runs first.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
            Priority::Unknown => 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subject {
    pub name: String,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub priority: Priority,
    pub due_at: Option<DateTime<FixedOffset>>,
    pub estimated_min: Option<i64>, // total effort
    #[serde(default)]
    pub study_min: i64, // already logged
    pub subject: Option<Subject>,
    pub status: TaskStatus,
    pub created_at: DateTime<FixedOffset>,
    pub notes: Option<String>,
}

impl Task {
    /// Effort still to be scheduled, floored at zero.
    pub fn remaining_min(&self) -> i64 {
        let estimated = self.estimated_min.unwrap_or(0);
        (estimated - self.study_min.max(0)).max(0)
    }

    pub fn is_pending(&self) -> bool {
        self.status != TaskStatus::Done
    }
}

/// Weekday availability. Mon-Fri on by default.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DayAvailability {
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
    pub saturday: bool,
    pub sunday: bool,
}

impl Default for DayAvailability {
    fn default() -> Self {
        Self {
            monday: true,
            tuesday: true,
            wednesday: true,
            thursday: true,
            friday: true,
            saturday: false,
            sunday: false,
        }
    }
}

impl DayAvailability {
    pub fn none() -> Self {
        Self {
            monday: false,
            tuesday: false,
            wednesday: false,
            thursday: false,
            friday: false,
            saturday: false,
            sunday: false,
        }
    }

    pub fn is_enabled(&self, day: Weekday) -> bool {
        match day {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }

    pub fn any_enabled(&self) -> bool {
        [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ]
        .into_iter()
        .any(|d| self.is_enabled(d))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum TimeSlot {
    Morning,
    Afternoon,
    Evening,
}

impl TimeSlot {
    pub const ALL: [TimeSlot; 3] = [TimeSlot::Morning, TimeSlot::Afternoon, TimeSlot::Evening];

    /// Fixed wall-clock bounds of the slot.
    pub fn bounds(self) -> (NaiveTime, NaiveTime) {
        let (start_h, end_h) = match self {
            TimeSlot::Morning => (8, 12),
            TimeSlot::Afternoon => (12, 18),
            TimeSlot::Evening => (18, 22),
        };
        (
            NaiveTime::from_hms_opt(start_h, 0, 0).unwrap_or(NaiveTime::MIN),
            NaiveTime::from_hms_opt(end_h, 0, 0).unwrap_or(NaiveTime::MIN),
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimeSlots {
    pub morning: bool,
    pub afternoon: bool,
    pub evening: bool,
}

impl Default for TimeSlots {
    fn default() -> Self {
        Self {
            morning: true,
            afternoon: true,
            evening: true,
        }
    }
}

impl TimeSlots {
    pub fn only(slot: TimeSlot) -> Self {
        Self {
            morning: slot == TimeSlot::Morning,
            afternoon: slot == TimeSlot::Afternoon,
            evening: slot == TimeSlot::Evening,
        }
    }

    pub fn is_enabled(&self, slot: TimeSlot) -> bool {
        match slot {
            TimeSlot::Morning => self.morning,
            TimeSlot::Afternoon => self.afternoon,
            TimeSlot::Evening => self.evening,
        }
    }

    /// Enabled slots in chronological order.
    pub fn enabled(&self) -> impl Iterator<Item = TimeSlot> + '_ {
        TimeSlot::ALL.into_iter().filter(|s| self.is_enabled(*s))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Preferences {
    pub days: DayAvailability,
    pub time_slots: TimeSlots,
    pub break_time: i64,   // minutes between sessions, 5..=60 step 5
    pub max_duration: i64, // longest session, 30..=240 step 15
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            days: DayAvailability::default(),
            time_slots: TimeSlots::default(),
            break_time: 15,
            max_duration: 60,
        }
    }
}

/// A half-open busy stretch `[start, end)` on the user's calendar.
///
/// `task_id` is set when the stretch is an already committed study session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BusyInterval {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    #[serde(default)]
    pub task_id: Option<Uuid>,
}

impl BusyInterval {
    pub fn new(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Self {
        Self {
            start,
            end,
            task_id: None,
        }
    }

    pub fn minutes(&self) -> i64 {
        (self.end - self.start).num_minutes().max(0)
    }
}

/// Committed calendar entry, either user-created or a stored study session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: Uuid,
    pub title: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub task_id: Option<Uuid>,
}

impl CalendarEvent {
    pub fn busy(&self) -> BusyInterval {
        BusyInterval {
            start: self.start,
            end: self.end,
            task_id: self.task_id,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AvailabilityWindow {
    pub day: NaiveDate,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl AvailabilityWindow {
    pub fn minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

// One study session produced by the packer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduledEvent {
    pub id: Uuid,
    pub task_id: Uuid,
    pub title: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub priority: Priority,
    pub subject_name: Option<String>,
    pub description: Option<String>,
}

impl ScheduledEvent {
    pub fn duration_min(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WarningKind {
    SkippedNoDueDate,
    PartiallyScheduled {
        scheduled_min: i64,
        remaining_min: i64,
    },
    Unschedulable,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduleWarning {
    #[serde(flatten)]
    pub kind: WarningKind,
    pub task_id: Uuid,
    pub detail: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Db {
    pub preferences: Preferences,
    pub tasks: Vec<Task>,
    pub events: Vec<CalendarEvent>,
}
