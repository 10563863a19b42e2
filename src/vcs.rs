use async_trait::async_trait;
use std::path::Path;

use crate::blame::{BlameEntry, RevisionMetadata};
use crate::error::BlameError;

/// Source of blame and history data for working-copy files.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VersionControlClient: Send + Sync {
    /// Per-line blame, ordered by line.
    async fn blame_file(&self, file: &Path) -> Result<Vec<BlameEntry>, BlameError>;

    /// Author, date and message for each of `revisions`.
    async fn logs_for_revisions(
        &self,
        file: &Path,
        revisions: &[String],
    ) -> Result<Vec<RevisionMetadata>, BlameError>;
}
