use crate::errors::ScheduleError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category is the reminder class an event belongs to
///
/// Stored as lowercase text in the `reminder_time` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Morning,
    Afternoon,
}

impl Category {
    /// The column value this category is stored as
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Morning => "morning",
            Category::Afternoon => "afternoon",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "morning" => Ok(Category::Morning),
            "afternoon" => Ok(Category::Afternoon),
            other => Err(ScheduleError::UnknownCategory(other.to_string())),
        }
    }
}

/// Event represents one row of the events table
///
/// Rows are seeded externally; this system only reads them and mutates
/// `remind_days`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    /// The notification text is exactly the event name
    pub name: String,
    /// Consecutive days this event has been reminded
    pub remind_days: i32,
    pub reminder_time: Category,
    /// Scheduled wall-clock time as `HH:MM` text, parsed on every cycle
    pub time: String,
}

impl Event {
    /// Whether an afternoon event has used up its consecutive reminder days
    ///
    /// Morning events are never exhausted.
    pub fn is_exhausted(&self, max_remind_days: i32) -> bool {
        self.reminder_time == Category::Afternoon && self.remind_days >= max_remind_days
    }
}
