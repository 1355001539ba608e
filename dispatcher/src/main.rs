// Dispatcher binary entry point
//
// Runs exactly one reminder cycle per invocation; an external scheduler
// (cron, a systemd timer) provides the periodic tick.

use anyhow::Context;
use common::config::Settings;
use common::db::{DbPool, EventRepository, EventStore};
use common::notify::{Notifier, TelegramNotifier};
use common::reminder::{ReminderEngine, ReminderPolicy};
use common::telemetry;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let settings = Settings::load().context("Failed to load configuration")?;

    telemetry::init_logging(&settings.observability.log_level)?;

    info!("Starting reminder dispatcher");

    settings
        .validate()
        .map_err(|reason| anyhow::anyhow!(reason))
        .context("Invalid configuration")?;

    // Initialize database connection pool
    let db_pool = DbPool::new(&settings.database).await.map_err(|e| {
        error!(error = %e, "Failed to initialize database pool");
        e
    })?;

    // Wire the store, notifier and engine together
    let store = Arc::new(EventRepository::new(db_pool.clone())) as Arc<dyn EventStore>;
    let notifier = Arc::new(TelegramNotifier::new(&settings.telegram)?) as Arc<dyn Notifier>;
    let policy = ReminderPolicy {
        max_remind_days: settings.reminder.max_remind_days,
        timezone: settings.reminder.timezone,
    };
    let engine = ReminderEngine::new(policy, store, notifier);

    // Run one cycle and exit
    let result = engine.run_cycle().await;
    db_pool.close().await;

    match result {
        Ok(outcome) => {
            info!(
                reminders_sent = outcome.reminders_sent,
                reset_performed = outcome.reset_performed,
                "Reminder cycle finished"
            );
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Reminder cycle aborted");
            Err(e.into())
        }
    }
}
