//! Blame overlay orchestration.
//!
//! [`Blamer`] owns the lifecycle of per-file annotation records: fetching
//! blame and revision logs, materializing decorations, swapping the
//! emphasized decoration as the caret moves, and tearing everything down
//! when a file is cleared or closed.

mod active_line;
mod locks;
mod record;

pub use active_line::{ActiveLine, ActiveLineRegister};
pub use locks::FileLocks;
pub use record::{
    join_metadata, unique_revisions, AnnotationRecord, BlameEntry, LineAnnotation,
    RevisionMetadata,
};

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

use crate::config::ConfigProvider;
use crate::error::BlameError;
use crate::integrations::status::{generic_failure_message, status_text, LOADING_ICON};
use crate::integrations::{
    BusyIndicator, Decoration, DecorationKind, DecorationRenderer, EditorContext, Notifier,
    SelectionChangeEvent, StatusIndicator, TextEditor,
};
use crate::store::RecordStore;
use crate::vcs::VersionControlClient;

/// Everything the blamer talks to.
pub struct Collaborators {
    pub store: Arc<dyn RecordStore>,
    pub vcs: Arc<dyn VersionControlClient>,
    pub renderer: Arc<dyn DecorationRenderer>,
    pub config: Arc<dyn ConfigProvider>,
    pub editors: Arc<dyn EditorContext>,
    pub status: Arc<dyn StatusIndicator>,
    pub notifier: Arc<dyn Notifier>,
}

pub struct Blamer {
    store: Arc<dyn RecordStore>,
    vcs: Arc<dyn VersionControlClient>,
    renderer: Arc<dyn DecorationRenderer>,
    config: Arc<dyn ConfigProvider>,
    editors: Arc<dyn EditorContext>,
    status: Arc<dyn StatusIndicator>,
    notifier: Arc<dyn Notifier>,
    file_locks: FileLocks,
    active_line: ActiveLineRegister,
    // Serializes track_line. Always taken before any file lock.
    tracking: tokio::sync::Mutex<()>,
}

impl Blamer {
    pub fn new(collaborators: Collaborators) -> Self {
        let Collaborators {
            store,
            vcs,
            renderer,
            config,
            editors,
            status,
            notifier,
        } = collaborators;

        Self {
            store,
            vcs,
            renderer,
            config,
            editors,
            status,
            notifier,
            file_locks: FileLocks::new(),
            active_line: ActiveLineRegister::new(),
            tracking: tokio::sync::Mutex::new(()),
        }
    }

    /// The line currently carrying the emphasized decoration, if any.
    pub fn active_line(&self) -> Option<ActiveLine> {
        self.active_line.current()
    }

    pub async fn records_for_file(
        &self,
        file: &Path,
    ) -> Result<Option<AnnotationRecord>, BlameError> {
        self.store.get(file).await
    }

    pub fn active_editor(&self) -> Option<TextEditor> {
        self.editors.active_editor()
    }

    // ---- show / clear / toggle ----

    pub async fn show_blame_for_file(&self, editor: &TextEditor, file: &Path) {
        let _guard = self.file_locks.lock(file).await;
        self.show_locked(editor, file).await;
    }

    pub async fn show_blame_for_active_editor(&self) {
        match self.active_editor() {
            Some(editor) => self.show_blame_for_file(&editor, &editor.document).await,
            None => debug!("No active editor, nothing to blame"),
        }
    }

    pub async fn clear_blame_for_file(&self, file: &Path) {
        let _guard = self.file_locks.lock(file).await;
        if let Err(err) = self.clear_locked(file).await {
            self.report_failure("Failed to clear blame", file, &err);
        }
    }

    pub async fn clear_blame_for_active_editor(&self) {
        match self.active_editor() {
            Some(editor) => self.clear_blame_for_file(&editor.document).await,
            None => debug!("No active editor, nothing to clear"),
        }
    }

    pub async fn clear_blame_for_all_files(&self) {
        let files = match self.store.keys().await {
            Ok(files) => files,
            Err(err) => {
                error!(error = %err, "Failed to list blamed files");
                self.notifier.show_error(&generic_failure_message());
                return;
            }
        };

        info!(files = files.len(), "Clearing blame for all files");
        futures::future::join_all(files.iter().map(|file| self.clear_blame_for_file(file)))
            .await;

        if let Some(stale) = self.active_line.take() {
            stale.decoration.dispose();
        }
        if let Err(err) = self.store.clear().await {
            error!(error = %err, "Failed to clear record store");
            self.notifier.show_error(&generic_failure_message());
        }
    }

    pub async fn toggle_blame_for_file(&self, editor: &TextEditor, file: &Path) {
        let _guard = self.file_locks.lock(file).await;
        match self.store.get(file).await {
            Ok(Some(_)) => {
                if let Err(err) = self.clear_locked(file).await {
                    self.report_failure("Failed to clear blame", file, &err);
                }
            }
            Ok(None) => self.show_locked(editor, file).await,
            Err(err) => self.report_failure("Failed to toggle blame", file, &err),
        }
    }

    pub async fn toggle_blame_for_active_editor(&self) {
        match self.active_editor() {
            Some(editor) => self.toggle_blame_for_file(&editor, &editor.document).await,
            None => debug!("No active editor, nothing to toggle"),
        }
    }

    pub async fn handle_closed_document(&self, file: &Path) {
        debug!(file = %file.display(), "Document closed, clearing blame");
        {
            let _guard = self.file_locks.lock(file).await;
            if let Err(err) = self.clear_locked(file).await {
                self.report_failure("Failed to clear blame for closed document", file, &err);
            }
        }
        self.file_locks.forget(file);
    }

    /// Fetches revision logs unless disabled by configuration.
    ///
    /// Leaves a "Fetching logs..." status up; the caller hides it.
    pub async fn get_logs_for_file(
        &self,
        file: &Path,
        revisions: &[String],
    ) -> Result<Vec<RevisionMetadata>, BlameError> {
        if !self.config.enable_logs() {
            debug!("Logging disabled, will not fetch revision logs");
            return Ok(Vec::new());
        }

        info!(
            file = %file.display(),
            revisions = revisions.len(),
            "Fetching logs for revisions"
        );
        self.status.show();
        self.status
            .set_text(&status_text("Fetching logs...", Some(LOADING_ICON)));

        self.vcs.logs_for_revisions(file, revisions).await
    }

    pub async fn auto_blame(&self, editor: Option<&TextEditor>) {
        let Some(editor) = editor else {
            return;
        };

        let file = editor.file();
        let _guard = self.file_locks.lock(file).await;
        if let Err(err) = self.auto_blame_locked(editor, file).await {
            self.report_failure("Failed to auto-blame file", file, &err);
        }
    }

    // ---- active line tracking ----

    pub async fn track_line(&self, event: SelectionChangeEvent) {
        let Some(editor) = event.editor else {
            return;
        };

        let _tracking = self.tracking.lock().await;

        let previous = self.active_line.take();
        if let Some(previous) = &previous {
            previous.decoration.dispose();
        }

        if let Err(err) = self.restore_previous_decoration(previous).await {
            error!(error = %err, "Failed to restore previous line decoration");
            self.notifier.show_error(&generic_failure_message());
        }

        let file = editor.document.clone();
        let line = editor.active_line();
        if let Err(err) = self.set_updated_decoration(&editor, &file, line).await {
            error!(
                file = %file.display(),
                line,
                error = %err,
                "Failed to set active line decoration"
            );
            self.notifier.show_error(&generic_failure_message());
        }
    }

    async fn restore_previous_decoration(
        &self,
        previous: Option<ActiveLine>,
    ) -> Result<(), BlameError> {
        let Some(previous) = previous else {
            return Ok(());
        };

        let _guard = self.file_locks.lock(&previous.file).await;
        let restored = self
            .swap_line_decoration(
                &previous.editor,
                &previous.file,
                previous.line,
                DecorationKind::Blame,
            )
            .await?;

        if restored.is_some() {
            debug!(
                file = %previous.file.display(),
                line = previous.line,
                "Reverted line-end decoration"
            );
        }
        Ok(())
    }

    async fn set_updated_decoration(
        &self,
        editor: &TextEditor,
        file: &Path,
        line: u32,
    ) -> Result<(), BlameError> {
        let _guard = self.file_locks.lock(file).await;
        let Some(decoration) = self
            .swap_line_decoration(editor, file, line, DecorationKind::ActiveLine)
            .await?
        else {
            return Ok(());
        };

        debug!(file = %file.display(), line, "Setting new line decoration");
        let stale = self.active_line.install(ActiveLine {
            editor: editor.clone(),
            file: file.to_path_buf(),
            line,
            decoration,
        });
        if let Some(stale) = stale {
            stale.decoration.dispose();
        }
        Ok(())
    }

    /// Recreates the decoration on `line` with `kind`. Caller holds the file lock.
    ///
    /// Returns `None` when the file or line has no annotation. If an emphasis
    /// cannot be created the line falls back to a plain blame decoration; it is
    /// dropped from the record only when that fails too.
    async fn swap_line_decoration(
        &self,
        editor: &TextEditor,
        file: &Path,
        line: u32,
        kind: DecorationKind,
    ) -> Result<Option<Decoration>, BlameError> {
        let Some(mut record) = self.store.get(file).await? else {
            return Ok(None);
        };
        let Some(existing) = record.get(line).cloned() else {
            return Ok(None);
        };

        existing.decoration.dispose();
        match self.decorate(editor, line, &existing.metadata, kind).await {
            Ok(decoration) => {
                record.insert(
                    line,
                    LineAnnotation {
                        decoration: decoration.clone(),
                        metadata: existing.metadata,
                    },
                );
                self.store.set(file, record).await?;
                Ok(Some(decoration))
            }
            Err(err) => {
                let fallback = match kind {
                    DecorationKind::Blame => None,
                    _ => self
                        .decorate(editor, line, &existing.metadata, DecorationKind::Blame)
                        .await
                        .ok(),
                };

                match fallback {
                    Some(decoration) => {
                        debug!(
                            file = %file.display(),
                            line,
                            "Kept plain blame after failed emphasis"
                        );
                        record.insert(
                            line,
                            LineAnnotation {
                                decoration,
                                metadata: existing.metadata,
                            },
                        );
                    }
                    None => {
                        record.remove(line);
                    }
                }
                self.store.set(file, record).await?;
                Err(err)
            }
        }
    }

    // ---- internals; callers hold the file lock ----

    async fn show_locked(&self, editor: &TextEditor, file: &Path) {
        info!(file = %file.display(), "Blaming file");
        let started = Instant::now();
        let busy = BusyIndicator::begin(self.status.as_ref(), "Blaming file...");

        match self.blame_locked(editor, file).await {
            Ok(lines) => {
                metrics::counter!("blamer_files_blamed_total").increment(1);
                metrics::histogram!("blamer_blame_duration_seconds")
                    .record(started.elapsed().as_secs_f64());
                debug!(file = %file.display(), lines, "Blame applied");
            }
            Err(err) => self.report_failure("Failed to blame file", file, &err),
        }

        drop(busy);
    }

    async fn blame_locked(
        &self,
        editor: &TextEditor,
        file: &Path,
    ) -> Result<usize, BlameError> {
        self.clear_locked(file).await?;

        let blame = self.vcs.blame_file(file).await?;
        let revisions = unique_revisions(&blame);
        let logs = self.get_logs_for_file(file, &revisions).await?;

        let record = self.build_record(editor, &blame, &logs).await?;
        let lines = record.len();
        self.store.set(file, record).await?;
        Ok(lines)
    }

    /// All-or-nothing: on failure every decoration created so far is disposed.
    async fn build_record(
        &self,
        editor: &TextEditor,
        blame: &[BlameEntry],
        logs: &[RevisionMetadata],
    ) -> Result<AnnotationRecord, BlameError> {
        let mut record = AnnotationRecord::new();

        for (line, metadata) in join_metadata(blame, logs) {
            match self.decorate(editor, line, &metadata, DecorationKind::Blame).await {
                Ok(decoration) => {
                    let replaced = record.insert(line, LineAnnotation { decoration, metadata });
                    if let Some(replaced) = replaced {
                        replaced.decoration.dispose();
                    }
                }
                Err(err) => {
                    record.dispose_all();
                    return Err(err);
                }
            }
        }

        Ok(record)
    }

    async fn clear_locked(&self, file: &Path) -> Result<(), BlameError> {
        let record = self.store.get(file).await?;

        if let Some(stale) = self.active_line.release_for(file) {
            stale.decoration.dispose();
        }

        let Some(record) = record else {
            return Ok(());
        };

        debug!(file = %file.display(), lines = record.len(), "Clearing existing blame");
        record.dispose_all();
        self.store.delete(file).await
    }

    async fn auto_blame_locked(
        &self,
        editor: &TextEditor,
        file: &Path,
    ) -> Result<(), BlameError> {
        if let Some(existing) = self.store.get(file).await? {
            return self.reapply_decorations(editor, file, existing).await;
        }

        if !self.config.auto_blame() {
            return Ok(());
        }

        self.show_locked(editor, file).await;
        Ok(())
    }

    /// Rebuilds every decoration of `existing` against `editor`, keeping kinds.
    async fn reapply_decorations(
        &self,
        editor: &TextEditor,
        file: &Path,
        existing: AnnotationRecord,
    ) -> Result<(), BlameError> {
        debug!(
            file = %file.display(),
            lines = existing.len(),
            "Re-applying existing decorations"
        );
        let mut refreshed = AnnotationRecord::new();

        for (line, annotation) in existing.iter() {
            let kind = annotation.decoration.kind();
            annotation.decoration.dispose();

            let created = self.decorate(editor, line, &annotation.metadata, kind).await;
            let decoration = match created {
                Ok(decoration) => decoration,
                Err(err) => {
                    refreshed.dispose_all();
                    self.clear_locked(file).await?;
                    return Err(err);
                }
            };

            if kind == DecorationKind::ActiveLine {
                self.active_line.rebind(file, line, editor, decoration.clone());
            }
            refreshed.insert(
                line,
                LineAnnotation {
                    decoration,
                    metadata: annotation.metadata.clone(),
                },
            );
        }

        self.store.set(file, refreshed).await
    }

    async fn decorate(
        &self,
        editor: &TextEditor,
        line: u32,
        metadata: &RevisionMetadata,
        kind: DecorationKind,
    ) -> Result<Decoration, BlameError> {
        let handle = self.renderer.create(editor, line, metadata, kind).await?;
        Ok(Decoration::new(kind, handle))
    }

    fn report_failure(&self, message: &str, file: &Path, err: &BlameError) {
        metrics::counter!("blamer_failures_total").increment(1);
        error!(file = %file.display(), error = %err, "{}", message);
        self.notifier.show_error(&generic_failure_message());
        self.status.hide();
    }
}
