// Reminder cycle module

pub mod engine;

pub use engine::{afternoon_exhausted, is_eligible, CycleOutcome, ReminderEngine, ReminderPolicy};
