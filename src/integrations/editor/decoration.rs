use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::sync::Arc;

use super::TextEditor;
use crate::blame::RevisionMetadata;
use crate::error::BlameError;

/// Visual flavour of a line decoration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecorationKind {
    /// Plain inline blame annotation.
    Blame,
    /// Emphasized annotation on the caret line.
    ActiveLine,
}

impl DecorationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecorationKind::Blame => "blame",
            DecorationKind::ActiveLine => "active_line",
        }
    }

    /// Default rendering options a renderer may apply for this kind.
    pub fn style(&self) -> serde_json::Value {
        match self {
            DecorationKind::Blame => json!({
                "color": "rgba(153, 153, 153, 0.35)",
                "margin": "0 0 0 3em",
                "isWholeLine": true
            }),
            DecorationKind::ActiveLine => json!({
                "color": "rgba(153, 153, 153, 0.85)",
                "margin": "0 0 0 3em",
                "fontStyle": "italic",
                "isWholeLine": true
            }),
        }
    }
}

impl fmt::Display for DecorationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendering resource owned by the host editor.
pub trait DecorationHandle: Send + Sync {
    fn dispose(&self);
}

/// Paints line decorations onto an editor.
#[async_trait]
pub trait DecorationRenderer: Send + Sync {
    async fn create(
        &self,
        editor: &TextEditor,
        line: u32,
        metadata: &RevisionMetadata,
        kind: DecorationKind,
    ) -> Result<Box<dyn DecorationHandle>, BlameError>;
}

struct DecorationInner {
    kind: DecorationKind,
    handle: Mutex<Option<Box<dyn DecorationHandle>>>,
}

impl Drop for DecorationInner {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.get_mut().take() {
            handle.dispose();
        }
    }
}

/// Shared owner of a renderer handle.
///
/// Clones refer to the same handle. The handle is released exactly once,
/// either by the first `dispose` or when the last clone is dropped.
#[derive(Clone)]
pub struct Decoration {
    inner: Arc<DecorationInner>,
}

impl Decoration {
    pub fn new(kind: DecorationKind, handle: Box<dyn DecorationHandle>) -> Self {
        Self {
            inner: Arc::new(DecorationInner {
                kind,
                handle: Mutex::new(Some(handle)),
            }),
        }
    }

    pub fn kind(&self) -> DecorationKind {
        self.inner.kind
    }

    pub fn dispose(&self) {
        let handle = self.inner.handle.lock().take();
        if let Some(handle) = handle {
            handle.dispose();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.handle.lock().is_none()
    }

    pub fn same_handle(&self, other: &Decoration) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Decoration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decoration")
            .field("kind", &self.kind())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
