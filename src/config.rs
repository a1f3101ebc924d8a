use std::time::Duration;

use crate::{cache::SnapshotCache, Result};

/// Configuration for [`SnapshotCache`].
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub(crate) base_url: String,
    pub(crate) token: String,
    pub(crate) ttl: Duration,
}

impl CacheConfig {
    /// Default time a cached snapshot is served without revalidation.
    pub const DEFAULT_TTL: Duration = Duration::from_millis(30_000);

    /// Create a configuration for the given service base URL and access
    /// token.
    ///
    /// ```
    /// # use flagpole::CacheConfig;
    /// CacheConfig::new("https://flags.example.com", "sdk-token");
    /// ```
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> CacheConfig {
        CacheConfig {
            base_url: base_url.into(),
            token: token.into(),
            ttl: CacheConfig::DEFAULT_TTL,
        }
    }

    /// Override the snapshot time-to-live.
    ///
    /// ```
    /// # use flagpole::CacheConfig;
    /// # use std::time::Duration;
    /// let config = CacheConfig::new("https://flags.example.com", "sdk-token")
    ///     .with_ttl(Duration::from_secs(5));
    /// ```
    pub fn with_ttl(mut self, ttl: Duration) -> CacheConfig {
        self.ttl = ttl;
        self
    }

    /// Create a new [`SnapshotCache`] using this configuration.
    ///
    /// Fails if the base URL or token is empty, or if the base URL does not
    /// parse.
    pub fn to_cache(self) -> Result<SnapshotCache> {
        SnapshotCache::new(self)
    }
}
