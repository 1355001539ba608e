// Property-based tests for the reminder cycle selection logic

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use common::db::EventStore;
use common::errors::{DatabaseError, NotifyError};
use common::models::{Category, Event};
use common::notify::Notifier;
use common::reminder::{afternoon_exhausted, is_eligible, CycleOutcome, ReminderEngine, ReminderPolicy};
use proptest::prelude::*;
use std::sync::Arc;
use tokio::sync::Mutex;

// Test doubles for the store and notifier seams

struct InMemoryEventStore {
    events: Arc<Mutex<Vec<Event>>>,
}

impl InMemoryEventStore {
    fn new(events: Vec<Event>) -> Self {
        Self {
            events: Arc::new(Mutex::new(events)),
        }
    }

    async fn snapshot(&self) -> Vec<Event> {
        self.events.lock().await.clone()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn list_events(&self) -> Result<Vec<Event>, DatabaseError> {
        let mut events = self.events.lock().await.clone();
        events.sort_by_key(|e| e.id);
        Ok(events)
    }

    async fn increment_remind_days(&self, event_id: i64) -> Result<(), DatabaseError> {
        let mut events = self.events.lock().await;
        if let Some(event) = events.iter_mut().find(|e| e.id == event_id) {
            event.remind_days += 1;
        }
        Ok(())
    }

    async fn reset_remind_days(&self, category: Category) -> Result<(), DatabaseError> {
        let mut events = self.events.lock().await;
        for event in events.iter_mut().filter(|e| e.reminder_time == category) {
            event.remind_days = 0;
        }
        Ok(())
    }

    async fn first_event_in_category(
        &self,
        category: Category,
    ) -> Result<Option<Event>, DatabaseError> {
        let events = self.events.lock().await;
        Ok(events
            .iter()
            .filter(|e| e.reminder_time == category)
            .min_by_key(|e| e.id)
            .cloned())
    }
}

struct FixedOutcomeNotifier {
    fail: bool,
}

#[async_trait]
impl Notifier for FixedOutcomeNotifier {
    async fn notify(&self, _text: &str) -> Result<(), NotifyError> {
        if self.fail {
            Err(NotifyError::RequestFailed("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

const MAX_REMIND_DAYS: i32 = 3;

/// 07:30 on the Etc/GMT-3 wall clock
fn at_local_0730() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 4, 30, 0).unwrap()
}

async fn run_cycle(events: Vec<Event>, fail_sends: bool) -> (CycleOutcome, Vec<Event>) {
    let store = Arc::new(InMemoryEventStore::new(events));
    let engine = ReminderEngine::new(
        ReminderPolicy::default(),
        store.clone(),
        Arc::new(FixedOutcomeNotifier { fail: fail_sends }),
    );
    let outcome = engine.run_cycle_at(at_local_0730()).await.unwrap();
    (outcome, store.snapshot().await)
}

// Strategies

fn arb_mixed_events() -> impl Strategy<Value = Vec<Event>> {
    prop::collection::vec((any::<bool>(), 0i32..=5, any::<bool>()), 0..12).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (afternoon, remind_days, due))| Event {
                id: i as i64 + 1,
                name: format!("event-{}", i + 1),
                remind_days,
                reminder_time: if afternoon {
                    Category::Afternoon
                } else {
                    Category::Morning
                },
                time: if due { "07:30" } else { "23:45" }.to_string(),
            })
            .collect()
    })
}

fn arb_exhausted_afternoon_events() -> impl Strategy<Value = Vec<Event>> {
    prop::collection::vec(MAX_REMIND_DAYS..=MAX_REMIND_DAYS + 3, 1..8).prop_map(|counters| {
        counters
            .into_iter()
            .enumerate()
            .map(|(i, remind_days)| Event {
                id: i as i64 + 1,
                name: format!("event-{}", i + 1),
                remind_days,
                reminder_time: Category::Afternoon,
                time: "23:45".to_string(),
            })
            .collect()
    })
}

/// *For any* counter value, a morning event stays eligible for reminding.
#[test]
fn property_morning_events_always_eligible() {
    proptest!(|(remind_days in 0i32..1000)| {
        let event = Event {
            id: 1,
            name: "standup".to_string(),
            remind_days,
            reminder_time: Category::Morning,
            time: "07:30".to_string(),
        };
        prop_assert!(is_eligible(&event, MAX_REMIND_DAYS));
    });
}

/// *For any* counter value, an afternoon event is eligible exactly while its
/// counter is below the limit.
#[test]
fn property_afternoon_eligibility_tracks_counter() {
    proptest!(|(remind_days in 0i32..10, max in 1i32..10)| {
        let event = Event {
            id: 1,
            name: "retro".to_string(),
            remind_days,
            reminder_time: Category::Afternoon,
            time: "16:00".to_string(),
        };
        prop_assert_eq!(is_eligible(&event, max), remind_days < max);
    });
}

/// *For any* event set, the exhaustion flag agrees with the per-event check
/// and ignores morning events entirely.
#[test]
fn property_exhaustion_matches_per_event_check() {
    proptest!(|(events in arb_mixed_events(), max in 1i32..8)| {
        let expected = events
            .iter()
            .all(|e| e.reminder_time == Category::Morning || e.is_exhausted(max));
        prop_assert_eq!(afternoon_exhausted(&events, max), expected);
    });
}

/// *For any* event set with a non-exhausted afternoon category, one cycle
/// increments at most one counter, and by exactly 1.
#[test]
fn property_at_most_one_counter_increment_per_cycle() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    proptest!(|(events in arb_mixed_events())| {
        prop_assume!(!afternoon_exhausted(&events, MAX_REMIND_DAYS));

        let before = events.clone();
        let (outcome, after) = rt.block_on(run_cycle(events, false));

        let deltas: Vec<i32> = before
            .iter()
            .zip(after.iter())
            .map(|(b, a)| a.remind_days - b.remind_days)
            .collect();

        prop_assert!(deltas.iter().all(|d| *d == 0 || *d == 1));
        prop_assert!(deltas.iter().sum::<i32>() <= 1);
        prop_assert_eq!(outcome.reminders_sent, deltas.iter().sum::<i32>() as usize);
        prop_assert!(!outcome.reset_performed);
    });
}

/// *For any* event set with a non-exhausted afternoon category, failed sends
/// leave every counter untouched.
#[test]
fn property_failed_sends_never_change_counters() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    proptest!(|(events in arb_mixed_events())| {
        prop_assume!(!afternoon_exhausted(&events, MAX_REMIND_DAYS));

        let before = events.clone();
        let (outcome, after) = rt.block_on(run_cycle(events, true));

        prop_assert_eq!(after, before);
        prop_assert_eq!(outcome, CycleOutcome::default());
    });
}

/// *For any* fully exhausted afternoon category with no due event, the cycle
/// resets every counter to 0 and re-reminds the first event by id.
#[test]
fn property_exhausted_category_resets_and_restarts() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    proptest!(|(events in arb_exhausted_afternoon_events())| {
        let (outcome, after) = rt.block_on(run_cycle(events, false));

        prop_assert!(outcome.reset_performed);
        prop_assert_eq!(outcome.reminders_sent, 1);
        prop_assert_eq!(after[0].remind_days, 1);
        prop_assert!(after[1..].iter().all(|e| e.remind_days == 0));
    });
}

/// *For any* fully exhausted afternoon category, a failing notifier still
/// resets the counters but leaves them all at 0.
#[test]
fn property_exhausted_category_reset_survives_send_failure() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    proptest!(|(events in arb_exhausted_afternoon_events())| {
        let (outcome, after) = rt.block_on(run_cycle(events, true));

        prop_assert!(outcome.reset_performed);
        prop_assert_eq!(outcome.reminders_sent, 0);
        prop_assert!(after.iter().all(|e| e.remind_days == 0));
    });
}
