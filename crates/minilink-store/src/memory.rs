use async_trait::async_trait;
use dashmap::DashMap;
use minilink_core::{LinkRecord, LinkStore, ShortCode, StoreError, UserRecord, UserStore};
use std::sync::Arc;

type Result<T> = std::result::Result<T, StoreError>;

/// In-memory link store backed by a DashMap.
///
/// Clones share one map, so any handle observes writes made through another.
/// DashMap's sharded locks let unrelated keys proceed concurrently, and a
/// `get_mut` holds the shard lock for the whole read-modify-write, which is
/// what makes `increment_lookups` atomic per key.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLinkStore {
    entries: Arc<DashMap<String, LinkRecord>>,
}

impl InMemoryLinkStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LinkStore for InMemoryLinkStore {
    async fn get(&self, code: &ShortCode) -> Result<Option<LinkRecord>> {
        Ok(self.entries.get(code.as_str()).map(|e| e.clone()))
    }

    async fn put(&self, code: &ShortCode, record: LinkRecord) -> Result<()> {
        self.entries.insert(code.as_str().to_owned(), record);
        Ok(())
    }

    async fn increment_lookups(&self, code: &ShortCode) -> Result<()> {
        match self.entries.get_mut(code.as_str()) {
            Some(mut entry) => {
                entry.lookups += 1;
                Ok(())
            }
            None => Err(StoreError::Operation(format!(
                "cannot count lookup for unknown code: {code}"
            ))),
        }
    }

    async fn flush(&self) -> Result<()> {
        // Nothing outlives the process; there is nothing to make durable.
        Ok(())
    }
}

/// In-memory user store backed by a DashMap. Clones share one map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserStore {
    entries: Arc<DashMap<String, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn get(&self, user_id: &str) -> Result<Option<UserRecord>> {
        Ok(self.entries.get(user_id).map(|e| e.clone()))
    }

    async fn put(&self, user_id: &str, record: UserRecord) -> Result<()> {
        self.entries.insert(user_id.to_owned(), record);
        Ok(())
    }

    async fn append_link(&self, user_id: &str, code: &ShortCode) -> Result<()> {
        self.entries
            .entry(user_id.to_owned())
            .or_insert_with(|| UserRecord::new("", user_id))
            .links
            .push(code.clone());
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> ShortCode {
        ShortCode::new_unchecked(s)
    }

    #[tokio::test]
    async fn put_and_get() {
        let store = InMemoryLinkStore::new();

        store
            .put(&code("a1b2c"), LinkRecord::new("https://example.com", "alice"))
            .await
            .unwrap();

        let record = store.get(&code("a1b2c")).await.unwrap().unwrap();
        assert_eq!(record.full_link, "https://example.com");
        assert_eq!(record.lookups, 0);
    }

    #[tokio::test]
    async fn get_unknown_code_is_none() {
        let store = InMemoryLinkStore::new();
        assert!(store.get(&code("nope1")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn put_overwrites_existing_record() {
        let store = InMemoryLinkStore::new();

        store
            .put(&code("a1b2c"), LinkRecord::new("https://old.example", "alice"))
            .await
            .unwrap();
        store
            .put(&code("a1b2c"), LinkRecord::new("https://new.example", "bob"))
            .await
            .unwrap();

        let record = store.get(&code("a1b2c")).await.unwrap().unwrap();
        assert_eq!(record.full_link, "https://new.example");
        assert_eq!(record.owner, "bob");
    }

    #[tokio::test]
    async fn increment_counts_up() {
        let store = InMemoryLinkStore::new();
        store
            .put(&code("a1b2c"), LinkRecord::new("https://example.com", "alice"))
            .await
            .unwrap();

        for _ in 0..3 {
            store.increment_lookups(&code("a1b2c")).await.unwrap();
        }

        let record = store.get(&code("a1b2c")).await.unwrap().unwrap();
        assert_eq!(record.lookups, 3);
    }

    #[tokio::test]
    async fn increment_unknown_code_fails() {
        let store = InMemoryLinkStore::new();
        let err = store.increment_lookups(&code("nope1")).await.unwrap_err();
        assert!(matches!(err, StoreError::Operation(_)));
    }

    #[tokio::test]
    async fn concurrent_increments_do_not_lose_updates() {
        let store = Arc::new(InMemoryLinkStore::new());
        store
            .put(&code("a1b2c"), LinkRecord::new("https://example.com", "alice"))
            .await
            .unwrap();

        let mut handles = vec![];
        for _ in 0..50 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.increment_lookups(&code("a1b2c")).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let record = store.get(&code("a1b2c")).await.unwrap().unwrap();
        assert_eq!(record.lookups, 50);
    }

    #[tokio::test]
    async fn append_link_creates_then_appends() {
        let store = InMemoryUserStore::new();

        store.append_link("alice", &code("aaaaa")).await.unwrap();
        let user = store.get("alice").await.unwrap().unwrap();
        assert_eq!(user.links, vec![code("aaaaa")]);

        store.append_link("alice", &code("bbbbb")).await.unwrap();
        let user = store.get("alice").await.unwrap().unwrap();
        assert_eq!(user.links, vec![code("aaaaa"), code("bbbbb")]);
    }

    #[tokio::test]
    async fn append_link_keeps_existing_record_fields() {
        let store = InMemoryUserStore::new();
        store
            .put("alice", UserRecord::new("s3cret", "Alice"))
            .await
            .unwrap();

        store.append_link("alice", &code("aaaaa")).await.unwrap();

        let user = store.get("alice").await.unwrap().unwrap();
        assert_eq!(user.token, "s3cret");
        assert_eq!(user.username, "Alice");
        assert_eq!(user.links, vec![code("aaaaa")]);
    }

    #[tokio::test]
    async fn authenticate_matches_exact_token() {
        let store = InMemoryUserStore::new();
        store
            .put("alice", UserRecord::new("s3cret", "Alice"))
            .await
            .unwrap();

        assert!(store.authenticate("alice", "s3cret").await.unwrap());
        assert!(!store.authenticate("alice", "wrong").await.unwrap());
        assert!(!store.authenticate("alice", "s3cret ").await.unwrap());
        assert!(!store.authenticate("nobody", "s3cret").await.unwrap());
    }
}
