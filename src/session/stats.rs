//! Corpus summary kept in sync with the document service.

use crate::backend::{ApiError, CorpusStats, DocumentApi};

/// Holds the latest corpus snapshot; refreshed on mount and after each successful upload.
#[derive(Debug, Default)]
pub struct StatsSync {
    snapshot: Option<CorpusStats>,
}

impl StatsSync {
    /// Start without a snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest snapshot, if any fetch has succeeded.
    pub fn snapshot(&self) -> Option<&CorpusStats> {
        self.snapshot.as_ref()
    }

    /// Fetch the current stats and replace the snapshot wholesale. See [`StatsSync::apply`].
    pub async fn refresh<A>(&mut self, api: &A) -> bool
    where
        A: DocumentApi + ?Sized,
    {
        self.apply(api.fetch_stats().await)
    }

    /// Install a fetched snapshot.
    ///
    /// Failures are logged and leave the previous snapshot untouched. Returns whether the
    /// snapshot was replaced.
    pub fn apply(&mut self, fetched: Result<CorpusStats, ApiError>) -> bool {
        match fetched {
            Ok(stats) => {
                tracing::debug!(total_chunks = stats.total_chunks, "Corpus stats refreshed");
                self.snapshot = Some(stats);
                true
            }
            Err(error) => {
                tracing::warn!(error = %error, "Error fetching stats");
                false
            }
        }
    }
}
