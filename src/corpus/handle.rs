// Published corpus snapshot shared between request handlers
use super::{BatchReport, Corpus, DocumentSource};
use crate::error::{Error, Result};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

/// Holds the currently published corpus.
///
/// Readers take an `Arc` to the live snapshot and work on it without holding
/// the lock. A refresh builds a complete new corpus first and then swaps the
/// `Arc`; a published snapshot is never mutated. Refreshes run one at a time,
/// so a snapshot is never replaced by one built from an older read.
#[derive(Clone, Default)]
pub struct CorpusHandle {
    current: Arc<RwLock<Arc<Corpus>>>,
    refreshing: Arc<Mutex<()>>,
}

impl CorpusHandle {
    pub fn new(corpus: Corpus) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(corpus))),
            refreshing: Arc::default(),
        }
    }

    /// The snapshot visible right now
    pub async fn snapshot(&self) -> Arc<Corpus> {
        self.current.read().await.clone()
    }

    /// Replace the live snapshot, returning the previous one
    pub async fn publish(&self, corpus: Corpus) -> Arc<Corpus> {
        let next = Arc::new(corpus);
        let mut guard = self.current.write().await;
        std::mem::replace(&mut *guard, next)
    }

    /// Rebuild from a source and publish when the content changed.
    ///
    /// Parsing runs on the blocking pool. Returns the batch report and whether
    /// a new snapshot was published.
    pub async fn refresh(&self, source: Arc<dyn DocumentSource>) -> Result<(BatchReport, bool)> {
        let _refreshing = self.refreshing.lock().await;
        let (corpus, report) = tokio::task::spawn_blocking(move || Corpus::load(source.as_ref()))
            .await
            .map_err(|e| Error::Internal(format!("Corpus rebuild task failed: {e}")))??;

        if corpus.fingerprint() == self.snapshot().await.fingerprint() {
            debug!("Corpus unchanged, keeping current snapshot");
            return Ok((report, false));
        }

        let documents = corpus.len();
        self.publish(corpus).await;
        info!("Published new corpus snapshot with {} recipes", documents);
        Ok((report, true))
    }
}
