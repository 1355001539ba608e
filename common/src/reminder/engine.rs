// Reminder cycle engine implementation

use crate::db::EventStore;
use crate::errors::CycleError;
use crate::models::{Category, Event};
use crate::notify::Notifier;
use crate::schedule;
use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Policy knobs for the reminder cycle
#[derive(Debug, Clone)]
pub struct ReminderPolicy {
    /// Consecutive days an afternoon event is reminded before the category resets
    pub max_remind_days: i32,
    /// Zone the wall clock is evaluated in
    pub timezone: Tz,
}

impl Default for ReminderPolicy {
    fn default() -> Self {
        Self {
            max_remind_days: 3,
            timezone: schedule::default_timezone(),
        }
    }
}

/// Result of one reminder cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleOutcome {
    /// Reminders delivered this cycle
    pub reminders_sent: usize,
    /// Whether the afternoon counters were reset this cycle
    pub reset_performed: bool,
}

/// Whether an event may be reminded this cycle given its counter
///
/// Morning events are always eligible; afternoon events only while their
/// counter is below the limit.
pub fn is_eligible(event: &Event, max_remind_days: i32) -> bool {
    match event.reminder_time {
        Category::Morning => true,
        Category::Afternoon => event.remind_days < max_remind_days,
    }
}

/// Whether every afternoon event has used up its consecutive reminder days
///
/// Vacuously true when the category is empty.
pub fn afternoon_exhausted(events: &[Event], max_remind_days: i32) -> bool {
    events
        .iter()
        .filter(|e| e.reminder_time == Category::Afternoon)
        .all(|e| e.remind_days >= max_remind_days)
}

/// Runs one reminder cycle over the event table
///
/// A cycle loads all events, sends at most one reminder for the first event
/// whose scheduled time matches the current wall-clock minute, and applies
/// the afternoon reset rule when that category is exhausted.
pub struct ReminderEngine {
    policy: ReminderPolicy,
    store: Arc<dyn EventStore>,
    notifier: Arc<dyn Notifier>,
}

impl ReminderEngine {
    /// Create a new reminder engine
    pub fn new(
        policy: ReminderPolicy,
        store: Arc<dyn EventStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            policy,
            store,
            notifier,
        }
    }

    /// Run one cycle against the current wall clock
    #[instrument(skip(self))]
    pub async fn run_cycle(&self) -> Result<CycleOutcome, CycleError> {
        self.run_cycle_at(Utc::now()).await
    }

    /// Run one cycle as of the given instant
    #[instrument(skip(self, now))]
    pub async fn run_cycle_at(&self, now: DateTime<Utc>) -> Result<CycleOutcome, CycleError> {
        let events = self.store.list_events().await?;
        let (current_hour, current_minute) = schedule::local_minute(now, self.policy.timezone);
        debug!(
            event_count = events.len(),
            current_hour, current_minute, "Scanning events"
        );

        let mut outcome = CycleOutcome::default();
        let mut reminder_sent = false;

        for event in &events {
            let scheduled = schedule::parse_event_time(&event.time)?;
            let due = scheduled.hour() == current_hour && scheduled.minute() == current_minute;

            if due && is_eligible(event, self.policy.max_remind_days) {
                if self.send_reminder(event).await {
                    self.store.increment_remind_days(event.id).await?;
                    info!(
                        event_id = event.id,
                        event_name = %event.name,
                        category = %event.reminder_time,
                        day = event.remind_days + 1,
                        max_remind_days = self.policy.max_remind_days,
                        "Reminder sent"
                    );
                    reminder_sent = true;
                    outcome.reminders_sent += 1;
                    break;
                }
            }
        }

        if !reminder_sent && afternoon_exhausted(&events, self.policy.max_remind_days) {
            info!("All afternoon events reached the reminder limit, resetting counters");
            self.store.reset_remind_days(Category::Afternoon).await?;
            outcome.reset_performed = true;

            if let Some(first) = self.store.first_event_in_category(Category::Afternoon).await? {
                if self.send_reminder(&first).await {
                    self.store.increment_remind_days(first.id).await?;
                    info!(
                        event_id = first.id,
                        event_name = %first.name,
                        "Sent first afternoon reminder after reset"
                    );
                    outcome.reminders_sent += 1;
                }
            }
        }

        Ok(outcome)
    }

    /// Send a notification for the event, logging a failure as "not sent"
    async fn send_reminder(&self, event: &Event) -> bool {
        match self.notifier.notify(&event.name).await {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    event_id = event.id,
                    event_name = %event.name,
                    error = %e,
                    "Failed to send reminder"
                );
                false
            }
        }
    }
}
