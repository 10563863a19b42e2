use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Per-file async locks so operations on the same file never interleave.
#[derive(Debug, Default)]
pub struct FileLocks {
    locks: DashMap<PathBuf, Arc<Mutex<()>>>,
}

impl FileLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, file: &Path) -> OwnedMutexGuard<()> {
        // Clone out of the map so no shard guard is held across the await.
        let lock = self
            .locks
            .entry(file.to_path_buf())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        lock.lock_owned().await
    }

    /// Drops the lock entry for `file` unless someone is holding or waiting on it.
    pub fn forget(&self, file: &Path) {
        self.locks
            .remove_if(file, |_, lock| Arc::strong_count(lock) == 1);
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
