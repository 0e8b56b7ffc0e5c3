// Periodic corpus rebuilds
use super::{CorpusHandle, DocumentSource};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};

/// Rebuilds the corpus from its source on a fixed interval
pub struct RefreshScheduler {
    handle: CorpusHandle,
    source: Arc<dyn DocumentSource>,
    interval_secs: u64,
}

impl RefreshScheduler {
    pub fn new(handle: CorpusHandle, source: Arc<dyn DocumentSource>, interval_secs: u64) -> Self {
        Self {
            handle,
            source,
            interval_secs,
        }
    }

    /// Start the background scheduler
    /// Returns a handle that can be used to stop the scheduler
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                "Corpus refresh scheduler started (interval: {}s)",
                self.interval_secs
            );

            let mut ticker = interval(Duration::from_secs(self.interval_secs.max(1)));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; the corpus was just loaded
            ticker.tick().await;

            loop {
                ticker.tick().await;
                self.run_once().await;
            }
        })
    }

    async fn run_once(&self) {
        match self.handle.refresh(self.source.clone()).await {
            Ok((report, published)) => {
                if !report.failures.is_empty() {
                    warn!(
                        "Corpus refresh dropped {} documents",
                        report.failures.len()
                    );
                }
                if published {
                    info!("Corpus refreshed: {} recipes", report.parsed);
                }
            }
            Err(e) => {
                error!("Corpus refresh failed, keeping previous snapshot: {}", e);
            }
        }
    }
}
