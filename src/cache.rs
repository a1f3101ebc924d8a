//! A lazy, TTL-driven cache for the current flag snapshot.
use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::Mutex;

use crate::{
    config::CacheConfig,
    eval::Evaluator,
    fetcher::{FetchOutcome, SnapshotFetcher},
    snapshot::FlagTable,
    Error, Result,
};

/// A lazily refreshed cache of the current flag snapshot.
///
/// The cache holds at most one snapshot and refreshes it only when a caller
/// asks for an [`Evaluator`] while the held snapshot is older than the
/// configured TTL. Refreshes are conditional: when a snapshot is already held,
/// its version is sent as an `If-None-Match` precondition and a `304` response
/// merely resets the freshness timer. There is no background polling.
///
/// Each cache is an independent instance with its own TTL clock and snapshot
/// slot; there is no process-wide shared state. A mutex serializes the
/// check-staleness/refresh/swap sequence across concurrent callers, so two
/// tasks never trigger simultaneous refreshes of the same cache.
///
/// A failed refresh propagates out of the [`evaluator`](SnapshotCache::evaluator)
/// call that triggered it and leaves any previously held snapshot untouched;
/// the next call retries.
pub struct SnapshotCache {
    fetcher: SnapshotFetcher,
    ttl: Duration,
    state: Mutex<CacheState>,
}

#[derive(Default)]
struct CacheState {
    table: Option<Arc<FlagTable>>,
    /// Time of the last successful fetch or confirmed-unchanged response.
    fetched_at: Option<Instant>,
}

impl CacheState {
    fn is_stale(&self, ttl: Duration) -> bool {
        self.fetched_at
            .map_or(true, |fetched_at| fetched_at.elapsed() >= ttl)
    }
}

impl SnapshotCache {
    /// Create a new cache from the given configuration.
    ///
    /// Fails immediately with [`Error::EmptyBaseUrl`], [`Error::EmptyToken`],
    /// or [`Error::InvalidBaseUrl`] on bad configuration, rather than
    /// deferring the failure to first use. No network request is made here;
    /// the first fetch happens on the first [`evaluator`](SnapshotCache::evaluator)
    /// call.
    pub fn new(config: CacheConfig) -> Result<SnapshotCache> {
        if config.base_url.is_empty() {
            return Err(Error::EmptyBaseUrl);
        }
        if config.token.is_empty() {
            return Err(Error::EmptyToken);
        }

        let fetcher = SnapshotFetcher::new(&config)?;

        Ok(SnapshotCache {
            fetcher,
            ttl: config.ttl,
            state: Mutex::new(CacheState::default()),
        })
    }

    /// Return an [`Evaluator`] over the current snapshot, bound to
    /// `subject_key`.
    ///
    /// Cheap to call repeatedly (e.g., once per incoming request): within the
    /// TTL window this performs no I/O and only clones a reference to the
    /// compiled flag table. When the snapshot is stale or missing, the call
    /// suspends while a (conditional) fetch runs; fetch errors propagate to
    /// the caller of this specific call.
    pub async fn evaluator(&self, subject_key: Option<&str>) -> Result<Evaluator> {
        let mut state = self.state.lock().await;

        if state.is_stale(self.ttl) {
            self.refresh(&mut state).await?;
        }

        let table = state
            .table
            .clone()
            // A successful refresh always installs a table: an unconditional
            // fetch cannot legally answer 304.
            .expect("fresh cache must hold a snapshot table");

        Ok(Evaluator::new(table, subject_key))
    }

    async fn refresh(&self, state: &mut CacheState) -> Result<()> {
        let prior_version = state.table.as_ref().map(|table| table.version());

        match self.fetcher.fetch(prior_version).await? {
            FetchOutcome::Changed(snapshot) => {
                state.table = Some(Arc::new(snapshot.into()));
            }
            FetchOutcome::Unchanged => {}
        }
        state.fetched_at = Some(Instant::now());

        Ok(())
    }
}
