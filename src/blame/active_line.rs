use parking_lot::Mutex;
use std::path::{Path, PathBuf};

use crate::integrations::{Decoration, TextEditor};

/// The one line in the process carrying the emphasized decoration.
#[derive(Debug, Clone)]
pub struct ActiveLine {
    pub editor: TextEditor,
    pub file: PathBuf,
    pub line: u32,
    pub decoration: Decoration,
}

/// Single-slot register for the active line.
///
/// The lock is never held across an await point; every operation is a
/// short swap of the slot contents.
#[derive(Debug, Default)]
pub struct ActiveLineRegister {
    slot: Mutex<Option<ActiveLine>>,
}

impl ActiveLineRegister {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<ActiveLine> {
        self.slot.lock().clone()
    }

    pub fn take(&self) -> Option<ActiveLine> {
        self.slot.lock().take()
    }

    /// Installs `active` and hands back whatever was there before.
    pub fn install(&self, active: ActiveLine) -> Option<ActiveLine> {
        self.slot.lock().replace(active)
    }

    /// Empties the slot only if it points into `file`.
    pub fn release_for(&self, file: &Path) -> Option<ActiveLine> {
        let mut slot = self.slot.lock();
        match slot.as_ref() {
            Some(active) if active.file == file => slot.take(),
            _ => None,
        }
    }

    /// Points the slot at a rebuilt decoration after the file's editor changed.
    pub fn rebind(
        &self,
        file: &Path,
        line: u32,
        editor: &TextEditor,
        decoration: Decoration,
    ) -> bool {
        let mut slot = self.slot.lock();
        match slot.as_mut() {
            Some(active) if active.file == file && active.line == line => {
                active.editor = editor.clone();
                active.decoration = decoration;
                true
            }
            _ => false,
        }
    }
}
