//! The Rust SDK for Flagpole, a feature-flag service.
//!
//! # Overview
//!
//! The SDK revolves around a [`SnapshotCache`] that holds a versioned
//! [`Snapshot`] of flag state for one project/environment pair and hands out
//! short-lived [`Evaluator`]s. The cache is lazy: it fetches only when an
//! [`evaluator`](SnapshotCache::evaluator) call finds the held snapshot older
//! than the configured TTL, and revalidates conditionally so an unchanged
//! snapshot costs no payload transfer or re-parsing. There is no background
//! polling and no process-wide state; caches pointed at different
//! environments are fully independent.
//!
//! An evaluator is bound to an optional *subject key* (an opaque identity
//! string, e.g. a user id) and answers [`is_enabled`](Evaluator::is_enabled)
//! queries without further I/O. Per flag, rules apply in strict precedence
//! order: deny list, allow list, deterministic percentage rollout, parent
//! inheritance, then the flag's base state.
//!
//! # Error Handling
//!
//! Errors are represented by the [`Error`] enum. Conditions that can arise
//! from ordinary races between flag administration and evaluation — unknown
//! flags, parent cycles, over-deep inheritance chains — never error and
//! resolve to a boolean instead.
//!
//! # Logging
//!
//! The crate uses the [`log`](https://docs.rs/log/latest/log/) crate for
//! logging messages under the `flagpole` target. Consider integrating a
//! `log`-compatible logger implementation for better visibility into SDK
//! operations.
//!
//! # Examples
//!
//! ```no_run
//! # use flagpole::{CacheConfig, Result};
//! # async fn handle_request() -> Result<()> {
//! let cache = CacheConfig::new("https://flags.example.com", "sdk-token").to_cache()?;
//!
//! let evaluator = cache.evaluator(Some("user-42")).await?;
//! if evaluator.is_enabled("dark-mode")? {
//!     // render the dark variant
//! }
//! # Ok(())
//! # }
//! ```

#![warn(rustdoc::missing_crate_level_docs)]
#![warn(missing_docs)]

mod bucketing;
mod cache;
mod config;
mod error;
mod eval;
mod fetcher;
mod snapshot;

pub use bucketing::{rollout_bucket, MAX_INPUT_LEN};
pub use cache::SnapshotCache;
pub use config::CacheConfig;
pub use error::{Error, Result};
pub use eval::{Evaluator, MAX_PARENT_DEPTH};
pub use snapshot::{FlagTable, Snapshot, SnapshotFlag};
