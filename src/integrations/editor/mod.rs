mod decoration;

pub use decoration::{Decoration, DecorationHandle, DecorationKind, DecorationRenderer};

use std::path::{Path, PathBuf};
use uuid::Uuid;

/// A live editor surface showing one document.
///
/// Editor ids are not stable: closing and reopening a document yields a new
/// editor, so decorations are always rebuilt rather than moved between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEditor {
    pub id: Uuid,
    pub document: PathBuf,
    /// Zero-based caret line.
    pub cursor_line: u32,
}

impl TextEditor {
    pub fn new(document: impl Into<PathBuf>) -> Self {
        Self {
            id: Uuid::new_v4(),
            document: document.into(),
            cursor_line: 0,
        }
    }

    pub fn with_cursor(mut self, cursor_line: u32) -> Self {
        self.cursor_line = cursor_line;
        self
    }

    pub fn file(&self) -> &Path {
        &self.document
    }

    /// One-based line the caret is on, matching blame line numbering.
    pub fn active_line(&self) -> u32 {
        self.cursor_line + 1
    }
}

/// Caret/selection change reported by the editor host.
#[derive(Debug, Clone, Default)]
pub struct SelectionChangeEvent {
    pub editor: Option<TextEditor>,
}

impl SelectionChangeEvent {
    pub fn new(editor: TextEditor) -> Self {
        Self {
            editor: Some(editor),
        }
    }
}

/// Resolves which editor currently has focus.
pub trait EditorContext: Send + Sync {
    fn active_editor(&self) -> Option<TextEditor>;
}
