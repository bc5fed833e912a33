use async_trait::async_trait;
use dashmap::DashMap;
use minilink_core::{LinkRecord, LinkStore, ShortCode, StoreError, UserRecord, UserStore};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info};

type Result<T> = std::result::Result<T, StoreError>;

fn io_error(path: &Path, err: std::io::Error) -> StoreError {
    StoreError::Unavailable(format!("{}: {err}", path.display()))
}

/// Reads a JSON object file into a map. A missing file is an empty store;
/// an unreadable or unparseable file fails loudly.
async fn load_entries<V: DeserializeOwned>(path: &Path) -> Result<DashMap<String, V>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => {
            let parsed: BTreeMap<String, V> = serde_json::from_slice(&bytes)
                .map_err(|err| StoreError::InvalidData(format!("{}: {err}", path.display())))?;
            Ok(parsed.into_iter().collect())
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "store file absent, starting empty");
            Ok(DashMap::new())
        }
        Err(err) => Err(io_error(path, err)),
    }
}

/// Writes a snapshot of the map as a JSON object file.
///
/// The snapshot goes to a sibling temp file which is synced and then renamed
/// over the target, so a crash mid-write leaves the previous file intact.
async fn persist_entries<V: Serialize + Clone>(
    path: &Path,
    entries: &DashMap<String, V>,
) -> Result<()> {
    let snapshot: BTreeMap<String, V> = entries
        .iter()
        .map(|entry| (entry.key().clone(), entry.value().clone()))
        .collect();
    let bytes = serde_json::to_vec_pretty(&snapshot)
        .map_err(|err| StoreError::InvalidData(err.to_string()))?;

    let tmp = path.with_extension("json.tmp");
    let mut file = tokio::fs::File::create(&tmp)
        .await
        .map_err(|err| io_error(&tmp, err))?;
    file.write_all(&bytes)
        .await
        .map_err(|err| io_error(&tmp, err))?;
    file.sync_all().await.map_err(|err| io_error(&tmp, err))?;
    drop(file);
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|err| io_error(path, err))?;

    Ok(())
}

/// Link store persisted as a JSON file.
///
/// All reads and writes go through an in-memory mirror; only `flush` touches
/// the disk. Flushes are serialized so two concurrent callers cannot
/// interleave their temp-file writes.
#[derive(Debug)]
pub struct FileLinkStore {
    path: PathBuf,
    entries: DashMap<String, LinkRecord>,
    flush_lock: Mutex<()>,
}

impl FileLinkStore {
    /// Opens the store at `path`, loading any existing contents.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = load_entries(&path).await?;
        info!(path = %path.display(), links = entries.len(), "opened link store");
        Ok(Self {
            path,
            entries,
            flush_lock: Mutex::new(()),
        })
    }
}

#[async_trait]
impl LinkStore for FileLinkStore {
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
        let _guard = self.flush_lock.lock().await;
        persist_entries(&self.path, &self.entries).await
    }
}

/// User store persisted as a JSON file.
#[derive(Debug)]
pub struct FileUserStore {
    path: PathBuf,
    entries: DashMap<String, UserRecord>,
    flush_lock: Mutex<()>,
}

impl FileUserStore {
    /// Opens the store at `path`, loading any existing contents.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = load_entries(&path).await?;
        info!(path = %path.display(), users = entries.len(), "opened user store");
        Ok(Self {
            path,
            entries,
            flush_lock: Mutex::new(()),
        })
    }
}

#[async_trait]
impl UserStore for FileUserStore {
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
        let _guard = self.flush_lock.lock().await;
        persist_entries(&self.path, &self.entries).await
    }
}
