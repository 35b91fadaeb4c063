//! Daily digest trigger

use std::sync::Arc;

use chrono::{DateTime, Days, NaiveTime, Utc};
use tracing::{error, info};

use emenu_core::services::{DigestService, Mailer};

/// First instant at `run_at` (UTC) strictly after `now`.
pub fn next_run(now: DateTime<Utc>, run_at: NaiveTime) -> DateTime<Utc> {
    let today = now.date_naive().and_time(run_at).and_utc();
    if today > now {
        today
    } else {
        today.checked_add_days(Days::new(1)).unwrap_or(today)
    }
}

/// Runs the digest once a day until the task is dropped.
pub async fn run_daily(digest: Arc<DigestService>, mailer: Arc<dyn Mailer>, run_at: NaiveTime) {
    loop {
        let now = Utc::now();
        let next = next_run(now, run_at);
        info!("Next digest run at {}", next);
        tokio::time::sleep((next - now).to_std().unwrap_or_default()).await;

        match digest.run(next.date_naive(), mailer.as_ref()).await {
            Ok(report) => info!(
                sent = report.sent,
                failed = report.failed.len(),
                "Digest run finished"
            ),
            Err(e) => error!("Digest run failed: {}", e),
        }
    }
}
