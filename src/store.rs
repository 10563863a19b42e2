use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::blame::AnnotationRecord;
use crate::error::BlameError;

/// Key-value storage of annotation records, keyed by file.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get(&self, file: &Path) -> Result<Option<AnnotationRecord>, BlameError>;

    async fn set(&self, file: &Path, record: AnnotationRecord) -> Result<(), BlameError>;

    async fn delete(&self, file: &Path) -> Result<(), BlameError>;

    async fn clear(&self) -> Result<(), BlameError>;

    /// Files that currently have a record.
    async fn keys(&self) -> Result<Vec<PathBuf>, BlameError>;
}

#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: RwLock<HashMap<PathBuf, AnnotationRecord>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn get(&self, file: &Path) -> Result<Option<AnnotationRecord>, BlameError> {
        Ok(self.records.read().get(file).cloned())
    }

    async fn set(&self, file: &Path, record: AnnotationRecord) -> Result<(), BlameError> {
        self.records.write().insert(file.to_path_buf(), record);
        Ok(())
    }

    async fn delete(&self, file: &Path) -> Result<(), BlameError> {
        self.records.write().remove(file);
        Ok(())
    }

    async fn clear(&self) -> Result<(), BlameError> {
        self.records.write().clear();
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<PathBuf>, BlameError> {
        Ok(self.records.read().keys().cloned().collect())
    }
}
