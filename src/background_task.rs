use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::time::interval;

use crate::{
    limiter::rate_limiter::SlidingWindowLimiter,
    repositories::submission::SubmissionRepository,
};

/// Deletes submissions older than the retention window, once a day.
pub async fn start_purge_task<R: SubmissionRepository>(repo: R, retention_days: u32) {
    let mut interval = interval(Duration::from_secs(60 * 60 * 24));

    loop {
        interval.tick().await;

        match repo.delete_older_than(retention_days).await {
            Ok(count) => tracing::info!("Purged {} expired submissions", count),
            Err(e) => tracing::error!("Purge failed: {}", e),
        }
    }
}

/// Drops rate-limiter entries for addresses whose windows have fully expired.
/// Without this the per-address table grows with every distinct client seen.
pub async fn start_limiter_sweep(limiter: Arc<SlidingWindowLimiter>, window: Duration) {
    let mut interval = interval(window);

    loop {
        interval.tick().await;

        limiter.sweep_expired(Instant::now());
        tracing::debug!(
            tracked = limiter.tracked_clients(),
            "rate limiter sweep complete"
        );
    }
}
