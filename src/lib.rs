//! Version-control blame overlay for live editors.
//!
//! The [`Blamer`] keeps a per-file cache of line annotations in a
//! [`RecordStore`], renders them through a [`DecorationRenderer`] and moves
//! a single emphasized decoration along with the caret.

pub mod blame;
pub mod commands;
pub mod config;
pub mod error;
pub mod integrations;
pub mod logging;
pub mod store;
pub mod vcs;

#[cfg(test)]
mod tests;

pub use blame::{
    ActiveLine, AnnotationRecord, BlameEntry, Blamer, Collaborators, LineAnnotation,
    RevisionMetadata,
};
pub use commands::BlameCommand;
pub use config::{Config, ConfigProvider, LogLevel, SharedConfig};
pub use error::BlameError;
pub use integrations::{
    Decoration, DecorationHandle, DecorationKind, DecorationRenderer, EditorContext, Notifier,
    SelectionChangeEvent, StatusIndicator, TextEditor,
};
pub use store::{InMemoryRecordStore, RecordStore};
pub use vcs::VersionControlClient;
