pub mod editor;
pub mod status;

pub use editor::{
    Decoration, DecorationHandle, DecorationKind, DecorationRenderer, EditorContext,
    SelectionChangeEvent, TextEditor,
};
pub use status::{BusyIndicator, Notifier, StatusIndicator};
