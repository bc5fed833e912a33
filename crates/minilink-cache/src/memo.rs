use dashmap::DashMap;
use jiff::{SignedDuration, Timestamp};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Identity of one memoized call: the operation name plus its arguments.
///
/// Keying on the name keeps two operations registered against the same cache
/// from ever colliding, whatever their argument strings look like.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MemoKey {
    op: &'static str,
    args: String,
}

/// One memoized result: when it was computed and what it was.
#[derive(Debug, Clone)]
struct MemoEntry {
    computed_at: Timestamp,
    value: serde_json::Value,
}

/// Shared backing store for memoized operation results.
///
/// Cheap to clone; clones share one store. Entries are written on miss or
/// expiry and are never proactively deleted, so the map holds at most one
/// entry per distinct call signature ever made.
#[derive(Debug, Clone, Default)]
pub struct MemoCache {
    entries: Arc<DashMap<MemoKey, MemoEntry>>,
}

impl MemoCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an operation under `op` with its own TTL.
    ///
    /// Distinct registrations share this cache's store; giving each a
    /// distinct name is the caller's contract.
    pub fn register<T>(&self, op: &'static str, ttl: Duration) -> CachedOp<T> {
        // A TTL too large for the time type simply never expires.
        let ttl = SignedDuration::try_from(ttl).unwrap_or(SignedDuration::MAX);
        CachedOp {
            cache: self.clone(),
            op,
            ttl,
            _result: PhantomData,
        }
    }

    /// Number of entries currently stored, fresh or stale.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Handle for one registered operation.
///
/// Wraps a read with memoization: repeated calls with the same argument
/// string within the TTL return the stored result without re-invoking the
/// read; after the TTL elapses the next call recomputes and refreshes the
/// entry in place.
#[derive(Debug, Clone)]
pub struct CachedOp<T> {
    cache: MemoCache,
    op: &'static str,
    ttl: SignedDuration,
    _result: PhantomData<fn() -> T>,
}

impl<T> CachedOp<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Returns the memoized result for `args`, computing it via `fetch` on a
    /// miss.
    ///
    /// A stored entry that is stale, or that cannot be decoded back into
    /// `T`, counts as a miss; lookup problems never surface to the caller.
    /// An error from `fetch` propagates unchanged and nothing is cached.
    pub async fn get_or_compute<E, F, Fut>(&self, args: &str, fetch: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let key = MemoKey {
            op: self.op,
            args: args.to_string(),
        };

        if let Some(value) = self.lookup(&key) {
            debug!(op = self.op, args, "cache hit");
            return Ok(value);
        }

        trace!(op = self.op, args, "cache miss, computing");
        let computed = fetch().await?;
        self.store(key, &computed);
        Ok(computed)
    }

    fn lookup(&self, key: &MemoKey) -> Option<T> {
        let entry = self.cache.entries.get(key)?;

        let fresh = match entry.computed_at.checked_add(self.ttl) {
            Ok(valid_until) => Timestamp::now() < valid_until,
            // TTL overflows the timestamp range: the entry never expires.
            Err(_) => true,
        };
        if !fresh {
            trace!(op = self.op, args = %key.args, "cache entry expired");
            return None;
        }

        match serde_json::from_value(entry.value.clone()) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(
                    op = self.op,
                    args = %key.args,
                    error = %err,
                    "cache entry undecodable, treating as miss"
                );
                None
            }
        }
    }

    fn store(&self, key: MemoKey, value: &T) {
        match serde_json::to_value(value) {
            Ok(json) => {
                self.cache.entries.insert(
                    key,
                    MemoEntry {
                        computed_at: Timestamp::now(),
                        value: json,
                    },
                );
            }
            Err(err) => {
                warn!(op = self.op, error = %err, "result not serializable, skipping cache");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_fetch(
        count: &Arc<AtomicUsize>,
        value: u64,
    ) -> impl Future<Output = Result<u64, String>> {
        let count = Arc::clone(count);
        async move {
            count.fetch_add(1, Ordering::SeqCst);
            Ok(value)
        }
    }

    #[tokio::test]
    async fn second_call_within_ttl_skips_fetch() {
        let cache = MemoCache::new();
        let op = cache.register::<u64>("reads", Duration::from_secs(60));
        let calls = Arc::new(AtomicUsize::new(0));

        let first = op
            .get_or_compute("k", || counting_fetch(&calls, 7))
            .await
            .unwrap();
        let second = op
            .get_or_compute("k", || counting_fetch(&calls, 99))
            .await
            .unwrap();

        assert_eq!(first, 7);
        assert_eq!(second, 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn expired_entry_is_recomputed_and_refreshed() {
        let cache = MemoCache::new();
        let op = cache.register::<u64>("reads", Duration::from_millis(50));
        let calls = Arc::new(AtomicUsize::new(0));

        let first = op
            .get_or_compute("k", || counting_fetch(&calls, 1))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        let second = op
            .get_or_compute("k", || counting_fetch(&calls, 2))
            .await
            .unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        // The refreshed entry serves subsequent calls again.
        let third = op
            .get_or_compute("k", || counting_fetch(&calls, 3))
            .await
            .unwrap();
        assert_eq!(third, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn distinct_args_are_cached_independently() {
        let cache = MemoCache::new();
        let op = cache.register::<u64>("reads", Duration::from_secs(60));
        let calls = Arc::new(AtomicUsize::new(0));

        let a = op
            .get_or_compute("a", || counting_fetch(&calls, 1))
            .await
            .unwrap();
        let b = op
            .get_or_compute("b", || counting_fetch(&calls, 2))
            .await
            .unwrap();

        assert_eq!((a, b), (1, 2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn registrations_on_one_store_do_not_collide() {
        let cache = MemoCache::new();
        let numbers = cache.register::<u64>("numbers", Duration::from_secs(60));
        let words = cache.register::<String>("words", Duration::from_secs(60));

        let n = numbers
            .get_or_compute("k", || async { Ok::<_, String>(5) })
            .await
            .unwrap();
        let w = words
            .get_or_compute("k", || async { Ok::<_, String>("five".to_string()) })
            .await
            .unwrap();

        assert_eq!(n, 5);
        assert_eq!(w, "five");
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn fetch_error_propagates_and_is_not_cached() {
        let cache = MemoCache::new();
        let op = cache.register::<u64>("reads", Duration::from_secs(60));
        let calls = Arc::new(AtomicUsize::new(0));

        let err = op
            .get_or_compute("k", || async { Err::<u64, String>("boom".to_string()) })
            .await
            .unwrap_err();
        assert_eq!(err, "boom");
        assert!(cache.is_empty());

        // The next call computes afresh rather than replaying the failure.
        let value = op
            .get_or_compute("k", || counting_fetch(&calls, 8))
            .await
            .unwrap();
        assert_eq!(value, 8);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn undecodable_entry_counts_as_miss() {
        let cache = MemoCache::new();
        let op = cache.register::<u64>("reads", Duration::from_secs(60));

        // Plant an entry whose stored shape no longer matches the result
        // type, as if written by an older build.
        cache.entries.insert(
            MemoKey {
                op: "reads",
                args: "k".to_string(),
            },
            MemoEntry {
                computed_at: Timestamp::now(),
                value: serde_json::json!({"unexpected": true}),
            },
        );

        let calls = Arc::new(AtomicUsize::new(0));
        let value = op
            .get_or_compute("k", || counting_fetch(&calls, 4))
            .await
            .unwrap();

        assert_eq!(value, 4);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn entries_survive_across_clones() {
        let cache = MemoCache::new();
        let op_a = cache.register::<u64>("reads", Duration::from_secs(60));
        let op_b = cache.clone().register::<u64>("reads", Duration::from_secs(60));

        op_a.get_or_compute("k", || async { Ok::<_, String>(11) })
            .await
            .unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let value = op_b
            .get_or_compute("k", || counting_fetch(&calls, 12))
            .await
            .unwrap();

        assert_eq!(value, 11);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
