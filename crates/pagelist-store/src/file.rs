//! File-backed state store.
//!
//! The whole key space is kept in memory and persisted as one JSON snapshot:
//!
//! ```text
//! { "entries": { "<key>": "<hex-encoded value>", ... } }
//! ```
//!
//! Every `put_state` rewrites the snapshot through a temporary file in the
//! same directory followed by a rename, so a reader never observes a
//! half-written snapshot.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::StateStore;

#[derive(Default, Serialize, Deserialize)]
struct Snapshot {
    entries: BTreeMap<String, String>,
}

/// A [`StateStore`] persisted to a single JSON file.
pub struct FileStateStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl FileStateStore {
    /// Open the snapshot at `path`, or start empty if the file does not exist.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read(&path) {
            Ok(bytes) if bytes.is_empty() => BTreeMap::new(),
            Ok(bytes) => decode_snapshot(&bytes)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), keys = entries.len(), "opened state snapshot");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Location of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, Vec<u8>>) -> StoreResult<()> {
        let snapshot = Snapshot {
            entries: entries
                .iter()
                .map(|(k, v)| (k.clone(), hex::encode(v)))
                .collect(),
        };
        let bytes = serde_json::to_vec_pretty(&snapshot)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }
}

fn decode_snapshot(bytes: &[u8]) -> StoreResult<BTreeMap<String, Vec<u8>>> {
    let snapshot: Snapshot =
        serde_json::from_slice(bytes).map_err(|e| StoreError::Serialization(e.to_string()))?;
    snapshot
        .entries
        .into_iter()
        .map(|(k, v)| {
            let value = hex::decode(&v)
                .map_err(|e| StoreError::Serialization(format!("key {k}: {e}")))?;
            Ok((k, value))
        })
        .collect()
}

impl StateStore for FileStateStore {
    fn get_state(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn put_state(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        let previous = entries.insert(key.to_string(), value.to_vec());
        if let Err(e) = self.persist(&entries) {
            // Keep memory in step with what is on disk.
            match previous {
                Some(old) => entries.insert(key.to_string(), old),
                None => entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }
}

impl std::fmt::Debug for FileStateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStateStore")
            .field("path", &self.path)
            .finish()
    }
}
