//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! One periodic task: the cleanup sweep that bounds the lifetime of
//! unverified registration state and its queued mail.
//!
//! ```text
//! Scheduler (every hour)
//!     │
//!     └─► run_cleanup_sweep()
//!             ├─► delete pending_registrations older than 1h (collect emails)
//!             ├─► delete mail older than 1h (≤500 rows per run)
//!             └─► delete remaining mail per collected email
//! ```

use anyhow::Result;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::domains::registration::models::{PendingRegistration, QueuedMail};
use crate::domains::registration::otp::{CLEANUP_RETENTION_MINUTES, MAIL_CLEANUP_BATCH_SIZE};

/// Start all scheduled tasks
pub async fn start_scheduler(pool: PgPool) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    // Cleanup sweep - runs every hour
    let cleanup_pool = pool.clone();
    let cleanup_job = Job::new_async("0 0 * * * *", move |_uuid, _lock| {
        let pool = cleanup_pool.clone();
        Box::pin(async move {
            if let Err(e) = run_cleanup_sweep(&pool).await {
                tracing::error!("Cleanup sweep failed: {}", e);
            }
        })
    })?;

    scheduler.add(cleanup_job).await?;
    scheduler.start().await?;

    tracing::info!("Scheduled tasks started (cleanup sweep every hour)");
    Ok(scheduler)
}

/// Run the cleanup sweep once.
///
/// Each step commits independently; an error aborts the remaining steps but
/// completed batches stay durable. The mail-age step is capped per run, so a
/// large backlog drains across multiple scheduled runs.
pub async fn run_cleanup_sweep(pool: &PgPool) -> Result<()> {
    tracing::info!("Running cleanup sweep");

    let cutoff = Utc::now() - Duration::minutes(CLEANUP_RETENTION_MINUTES);

    // 1. Reap registrations whose first issuance is past retention.
    let expired_emails = PendingRegistration::delete_created_before(cutoff, pool).await?;
    if expired_emails.is_empty() {
        tracing::info!("No expired registrations found");
    } else {
        tracing::info!(
            "Deleted {} expired pending registrations",
            expired_emails.len()
        );
    }

    // 2. Reap old queued mail, bounded per run.
    let old_mail = QueuedMail::delete_started_before(cutoff, MAIL_CLEANUP_BATCH_SIZE, pool).await?;
    if old_mail > 0 {
        tracing::info!("Deleted {} old mail documents", old_mail);
    }

    // 3. Mail for reaped registrations that step 2's age cutoff missed
    //    (e.g. a resend queued just before expiry).
    let mut undelivered = 0u64;
    for email in &expired_emails {
        undelivered += QueuedMail::delete_for_recipient(email, pool).await?;
    }
    if undelivered > 0 {
        tracing::info!(
            "Deleted {} mail documents for expired registrations",
            undelivered
        );
    }

    Ok(())
}
