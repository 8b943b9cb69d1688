//! Background re-ingestion of the live register.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use sponsorgrid_io::Normalizer;
use sponsorgrid_register_client::{ingest, CsvSource, IngestOutcome};
use tokio::task::JoinError;
use tokio::time::MissedTickBehavior;

/// Fetch and parse on a blocking thread.
pub async fn run_ingest(source: Arc<dyn CsvSource>) -> Result<IngestOutcome, JoinError> {
    tokio::task::spawn_blocking(move || ingest(source.as_ref(), &mut Normalizer::new(), Utc::now())).await
}

#[derive(Debug, Default)]
pub struct RefreshScheduler {
    scheduled: AtomicBool,
}

impl RefreshScheduler {
    /// Start the periodic refresh task. Returns false (and starts nothing)
    /// if it is already running. Must be called inside a Tokio runtime.
    pub fn schedule(&self, source: Arc<dyn CsvSource>, interval: Duration) -> bool {
        if self.scheduled.swap(true, Ordering::SeqCst) {
            return false;
        }
        tracing::info!(interval_secs = interval.as_secs(), "scheduling register refresh");
        tokio::spawn(refresh_loop(source, interval));
        true
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled.load(Ordering::SeqCst)
    }
}

async fn refresh_loop(source: Arc<dyn CsvSource>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // First tick completes immediately
    ticker.tick().await;

    loop {
        ticker.tick().await;
        match run_ingest(source.clone()).await {
            Ok(outcome) => match outcome.fallback_reason() {
                None => tracing::info!(
                    records = outcome.sponsors().len(),
                    skipped = outcome.skipped_count(),
                    "scheduled refresh complete"
                ),
                Some(reason) => tracing::warn!(%reason, "scheduled refresh fell back"),
            },
            Err(e) => tracing::error!(error = %e, "scheduled refresh task failed"),
        }
    }
}
