
use std::path::Path;
use std::sync::Arc;
use test_context::AsyncTestContext;

use crate::blame::{Blamer, Collaborators};
use crate::config::{Config, SharedConfig};
use crate::store::InMemoryRecordStore;
use crate::vcs::VersionControlClient;

use test_utils::{FakeEditors, FakeRenderer, FakeVcs, RecordingNotifier, RecordingStatus};

// Common test utilities and helpers
pub(crate) mod test_utils {
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use uuid::Uuid;

    use crate::blame::{BlameEntry, RevisionMetadata};
    use crate::error::BlameError;
    use crate::integrations::{
        DecorationHandle, DecorationKind, DecorationRenderer, EditorContext, Notifier,
        StatusIndicator, TextEditor,
    };
    use crate::vcs::VersionControlClient;

    #[derive(Debug, Clone)]
    pub struct CreatedDecoration {
        pub editor: Uuid,
        pub line: u32,
        pub kind: DecorationKind,
        pub disposals: Arc<AtomicUsize>,
    }

    impl CreatedDecoration {
        pub fn disposals(&self) -> usize {
            self.disposals.load(Ordering::SeqCst)
        }
    }

    struct FakeHandle(Arc<AtomicUsize>);

    impl DecorationHandle for FakeHandle {
        fn dispose(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[derive(Default)]
    pub struct FakeRenderer {
        created: Mutex<Vec<CreatedDecoration>>,
        fail_after: Mutex<Option<usize>>,
        fail_kind: Mutex<Option<DecorationKind>>,
    }

    impl FakeRenderer {
        /// Every creation after the first `count` fails.
        pub fn fail_after(&self, count: usize) {
            *self.fail_after.lock() = Some(count);
        }

        /// Every creation of `kind` fails; other kinds still render.
        pub fn fail_kind(&self, kind: DecorationKind) {
            *self.fail_kind.lock() = Some(kind);
        }

        pub fn created(&self) -> Vec<CreatedDecoration> {
            self.created.lock().clone()
        }

        pub fn live(&self, kind: DecorationKind) -> Vec<CreatedDecoration> {
            self.created()
                .into_iter()
                .filter(|created| created.kind == kind && created.disposals() == 0)
                .collect()
        }

        pub fn all_disposed_once(&self) -> bool {
            self.created().iter().all(|created| created.disposals() == 1)
        }

        pub fn none_disposed_twice(&self) -> bool {
            self.created().iter().all(|created| created.disposals() <= 1)
        }
    }

    #[async_trait]
    impl DecorationRenderer for FakeRenderer {
        async fn create(
            &self,
            editor: &TextEditor,
            line: u32,
            _metadata: &RevisionMetadata,
            kind: DecorationKind,
        ) -> Result<Box<dyn DecorationHandle>, BlameError> {
            tokio::task::yield_now().await;

            let mut created = self.created.lock();
            if let Some(limit) = *self.fail_after.lock() {
                if created.len() >= limit {
                    return Err(BlameError::Decoration("renderer unavailable".to_string()));
                }
            }
            if *self.fail_kind.lock() == Some(kind) {
                return Err(BlameError::Decoration(format!("cannot render {}", kind)));
            }

            let disposals = Arc::new(AtomicUsize::new(0));
            created.push(CreatedDecoration {
                editor: editor.id,
                line,
                kind,
                disposals: disposals.clone(),
            });
            Ok(Box::new(FakeHandle(disposals)))
        }
    }

    #[derive(Default)]
    pub struct FakeVcs {
        blames: Mutex<HashMap<PathBuf, Vec<BlameEntry>>>,
        logs: Mutex<HashMap<String, RevisionMetadata>>,
        pub log_requests: Mutex<Vec<Vec<String>>>,
        pub blame_calls: AtomicUsize,
        pub fail_blame: AtomicBool,
    }

    impl FakeVcs {
        /// Blames line `n` (one-based) to `revisions[n - 1]`.
        pub fn with_file(&self, file: &str, revisions: &[&str]) {
            let entries = revisions
                .iter()
                .enumerate()
                .map(|(index, revision)| BlameEntry::new(index as u32 + 1, *revision))
                .collect();
            self.blames.lock().insert(PathBuf::from(file), entries);
        }

        pub fn with_log(&self, revision: &str, author: &str, date: &str, message: &str) {
            self.logs.lock().insert(
                revision.to_string(),
                RevisionMetadata {
                    revision: revision.to_string(),
                    author: Some(author.to_string()),
                    date: Some(date.to_string()),
                    message: Some(message.to_string()),
                },
            );
        }

        pub fn blame_calls(&self) -> usize {
            self.blame_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl VersionControlClient for FakeVcs {
        async fn blame_file(&self, file: &Path) -> Result<Vec<BlameEntry>, BlameError> {
            self.blame_calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;

            if self.fail_blame.load(Ordering::SeqCst) {
                return Err(BlameError::VersionControl(
                    "svn: E155007: not a working copy".to_string(),
                ));
            }
            Ok(self.blames.lock().get(file).cloned().unwrap_or_default())
        }

        async fn logs_for_revisions(
            &self,
            _file: &Path,
            revisions: &[String],
        ) -> Result<Vec<RevisionMetadata>, BlameError> {
            self.log_requests.lock().push(revisions.to_vec());
            tokio::task::yield_now().await;

            let logs = self.logs.lock();
            Ok(revisions
                .iter()
                .filter_map(|revision| logs.get(revision).cloned())
                .collect())
        }
    }

    #[derive(Default)]
    pub struct RecordingStatus {
        visible: Mutex<bool>,
        texts: Mutex<Vec<String>>,
    }

    impl RecordingStatus {
        pub fn is_visible(&self) -> bool {
            *self.visible.lock()
        }

        pub fn texts(&self) -> Vec<String> {
            self.texts.lock().clone()
        }
    }

    impl StatusIndicator for RecordingStatus {
        fn set_text(&self, text: &str) {
            self.texts.lock().push(text.to_string());
        }

        fn show(&self) {
            *self.visible.lock() = true;
        }

        fn hide(&self) {
            *self.visible.lock() = false;
        }
    }

    #[derive(Default)]
    pub struct RecordingNotifier {
        messages: Mutex<Vec<String>>,
    }

    impl RecordingNotifier {
        pub fn messages(&self) -> Vec<String> {
            self.messages.lock().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn show_error(&self, message: &str) {
            self.messages.lock().push(message.to_string());
        }
    }

    #[derive(Default)]
    pub struct FakeEditors {
        active: Mutex<Option<TextEditor>>,
    }

    impl FakeEditors {
        pub fn set_active(&self, editor: Option<TextEditor>) {
            *self.active.lock() = editor;
        }
    }

    impl EditorContext for FakeEditors {
        fn active_editor(&self) -> Option<TextEditor> {
            self.active.lock().clone()
        }
    }
}

/// A blamer wired to recording fakes.
pub struct BlamerContext {
    pub blamer: Arc<Blamer>,
    pub store: Arc<InMemoryRecordStore>,
    pub vcs: Arc<FakeVcs>,
    pub renderer: Arc<FakeRenderer>,
    pub config: Arc<SharedConfig>,
    pub editors: Arc<FakeEditors>,
    pub status: Arc<RecordingStatus>,
    pub notifier: Arc<RecordingNotifier>,
}

impl BlamerContext {
    pub fn new() -> Self {
        let vcs = Arc::new(FakeVcs::default());
        Self::build(vcs.clone(), vcs)
    }

    /// Same wiring, but blame and logs come from `client`.
    pub fn with_vcs(client: Arc<dyn VersionControlClient>) -> Self {
        Self::build(Arc::new(FakeVcs::default()), client)
    }

    fn build(vcs: Arc<FakeVcs>, client: Arc<dyn VersionControlClient>) -> Self {
        let store = Arc::new(InMemoryRecordStore::new());
        let renderer = Arc::new(FakeRenderer::default());
        let config = Arc::new(SharedConfig::new(Config::default()));
        let editors = Arc::new(FakeEditors::default());
        let status = Arc::new(RecordingStatus::default());
        let notifier = Arc::new(RecordingNotifier::default());

        let blamer = Arc::new(Blamer::new(Collaborators {
            store: store.clone(),
            vcs: client,
            renderer: renderer.clone(),
            config: config.clone(),
            editors: editors.clone(),
            status: status.clone(),
            notifier: notifier.clone(),
        }));

        Self {
            blamer,
            store,
            vcs,
            renderer,
            config,
            editors,
            status,
            notifier,
        }
    }

    pub fn set_config(&self, enable_logs: bool, auto_blame: bool) {
        self.config.update(Config {
            enable_logs,
            auto_blame,
            ..Config::default()
        });
    }

    pub async fn has_record(&self, file: &str) -> bool {
        self.blamer
            .records_for_file(Path::new(file))
            .await
            .unwrap()
            .is_some()
    }
}

#[async_trait::async_trait]
impl AsyncTestContext for BlamerContext {
    async fn setup() -> Self {
        BlamerContext::new()
    }

    async fn teardown(self) {
        self.blamer.clear_blame_for_all_files().await;
        assert!(self.store.is_empty());
        assert!(self.renderer.none_disposed_twice(), "a decoration was disposed twice");
    }
}
