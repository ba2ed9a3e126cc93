use crate::address::Address;
use crate::error::StoreError;
use crate::store::PrivateInfoStorage;
use crate::whitelist::Whitelist;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to replace snapshot: {0}")]
    Persist(#[from] tempfile::PersistError),
    #[error("failed to parse snapshot: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("snapshot whitelist is invalid: {0}")]
    Invalid(#[from] StoreError),
    #[error("snapshot whitelist must start with owner {0}")]
    OwnerNotFirst(Address),
    #[error("snapshot capacity must hold at least the owner, got {0}")]
    InvalidCapacity(usize),
}

/// Persisted state of one store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub owner: Address,
    pub capacity: usize,
    pub kii_private_info: String,
    pub whitelist: Vec<Address>,
}

impl StoreSnapshot {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Writes the snapshot to a temp file next to `path` and renames it into
    /// place, so readers see either the old or the new state.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(tmp.as_file_mut(), self)?;
        tmp.as_file_mut().flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(path)?;
        Ok(())
    }
}

/// Exclusive advisory lock on a snapshot, held through a `<state>.lock`
/// sidecar file. Released on drop.
#[derive(Debug)]
pub struct SnapshotLock {
    _file: File,
    path: PathBuf,
}

impl SnapshotLock {
    /// Blocks until no other holder, in this or another process, has the
    /// lock for `state`.
    pub fn acquire(state: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = Self::sidecar(state.as_ref());
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&path)?;
        file.lock_exclusive()?;
        Ok(Self { _file: file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sidecar(state: &Path) -> PathBuf {
        let mut name = state.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }
}

impl PrivateInfoStorage {
    pub fn snapshot(&self) -> StoreSnapshot {
        let state = self.lock();
        StoreSnapshot {
            owner: self.owner(),
            capacity: state.whitelist.capacity(),
            kii_private_info: state.kii_private_info.clone(),
            whitelist: state.whitelist.members().to_vec(),
        }
    }

    /// Rebuilds a store from `snapshot`, re-checking every whitelist invariant.
    pub fn restore(snapshot: StoreSnapshot) -> Result<Self, SnapshotError> {
        if snapshot.capacity == 0 {
            return Err(SnapshotError::InvalidCapacity(snapshot.capacity));
        }
        if snapshot.whitelist.first() != Some(&snapshot.owner) {
            return Err(SnapshotError::OwnerNotFirst(snapshot.owner));
        }
        let whitelist = Whitelist::from_members(snapshot.capacity, snapshot.whitelist)?;
        Ok(Self::from_parts(
            snapshot.owner,
            whitelist,
            snapshot.kii_private_info,
        ))
    }
}
