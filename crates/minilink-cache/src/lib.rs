//! Memoizing read-through cache with time-based invalidation.
//!
//! One [`MemoCache`] backs any number of registered operations. Each
//! registration pairs an operation name with its own TTL, so a service can
//! cache different reads at different lifetimes over a single shared store.
//!
//! ```
//! use minilink_cache::MemoCache;
//! use std::time::Duration;
//!
//! # async fn example() {
//! let cache = MemoCache::new();
//! let reads = cache.register::<u64>("count_rows", Duration::from_secs(300));
//!
//! let value = reads
//!     .get_or_compute("table-a", || async { Ok::<_, String>(42) })
//!     .await
//!     .unwrap();
//! assert_eq!(value, 42);
//! # }
//! ```

pub mod memo;

pub use memo::{CachedOp, MemoCache};
