//! Background scheduler for automatic report generation
//!
//! Polls the report_schedules table at a configurable interval and
//! generates a report for every schedule whose next run time has
//! passed. Enabled via an environment variable:
//!
//! - `BANTO_SCHEDULE_INTERVAL`: Poll interval in seconds (e.g., "300")

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::interval;
use tracing::{error, info, warn};

use banto_core::{Database, ReportSchedule, ReportType};

use crate::handlers::run_generation;

/// Configuration for the report scheduler
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Seconds between polls of the schedule table
    pub poll_interval_secs: u64,
}

impl SchedulerConfig {
    /// Parse configuration from environment variables
    ///
    /// Returns None if scheduling is not configured (BANTO_SCHEDULE_INTERVAL not set)
    pub fn from_env() -> Option<Self> {
        let poll_interval_secs: u64 = std::env::var("BANTO_SCHEDULE_INTERVAL")
            .ok()
            .and_then(|s| s.parse().ok())?;

        if poll_interval_secs == 0 {
            warn!("BANTO_SCHEDULE_INTERVAL is 0, scheduled reports disabled");
            return None;
        }

        Some(Self { poll_interval_secs })
    }
}

/// Start the report scheduler as a background task
///
/// Spawns a tokio task that runs indefinitely, picking up due schedules
/// at the configured interval.
pub fn start_report_scheduler(db: Database, config: SchedulerConfig) {
    info!(
        "Starting report scheduler: polling every {} seconds",
        config.poll_interval_secs
    );

    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(config.poll_interval_secs));

        // Skip the first immediate tick so startup doesn't trigger a run
        ticker.tick().await;

        loop {
            ticker.tick().await;

            if let Err(e) = run_due_schedules(&db) {
                error!("Schedule poll failed: {}", e);
            }
        }
    });
}

/// Run every schedule that is currently due
fn run_due_schedules(db: &Database) -> banto_core::Result<()> {
    let now = Utc::now();
    let due = db.due_schedules(now)?;

    for schedule in due {
        match run_schedule(db, &schedule, now) {
            Ok(report_id) => {
                info!(
                    schedule_id = schedule.id,
                    report_id, "Scheduled report generated"
                );
            }
            Err(e) => {
                error!(
                    schedule_id = schedule.id,
                    error = %e,
                    "Scheduled report generation failed"
                );
                // Push the next run forward anyway so a broken schedule
                // doesn't retry on every poll
                if let Err(e) = db.update_schedule_run(
                    schedule.id,
                    now,
                    Some(next_run_after(schedule.report_type, now)),
                ) {
                    error!(schedule_id = schedule.id, error = %e, "Failed to reschedule");
                }
            }
        }
    }

    Ok(())
}

/// Generate one scheduled report and advance its next run time
fn run_schedule(
    db: &Database,
    schedule: &ReportSchedule,
    now: DateTime<Utc>,
) -> banto_core::Result<i64> {
    let stored = run_generation(
        db,
        schedule.report_type,
        schedule.store_id.as_deref(),
        Some(schedule.id),
    )?;

    db.update_schedule_run(
        schedule.id,
        now,
        Some(next_run_after(schedule.report_type, now)),
    )?;

    Ok(stored.id)
}

/// Next due time for a schedule that just ran
fn next_run_after(report_type: ReportType, now: DateTime<Utc>) -> DateTime<Utc> {
    match report_type {
        ReportType::Weekly => now + chrono::Duration::days(7),
        ReportType::Monthly => now + chrono::Duration::days(30),
    }
}
