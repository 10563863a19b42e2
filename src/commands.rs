use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::blame::Blamer;
use crate::error::BlameError;

/// User-facing commands, each acting on the active editor's file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlameCommand {
    ShowBlame,
    ClearBlame,
    ClearAllBlame,
    ToggleBlame,
}

impl BlameCommand {
    pub const ALL: [BlameCommand; 4] = [
        BlameCommand::ShowBlame,
        BlameCommand::ClearBlame,
        BlameCommand::ClearAllBlame,
        BlameCommand::ToggleBlame,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            BlameCommand::ShowBlame => "svnBlamer.showBlame",
            BlameCommand::ClearBlame => "svnBlamer.clearBlame",
            BlameCommand::ClearAllBlame => "svnBlamer.clearAllBlame",
            BlameCommand::ToggleBlame => "svnBlamer.toggleBlame",
        }
    }
}

impl fmt::Display for BlameCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for BlameCommand {
    type Err = BlameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlameCommand::ALL
            .into_iter()
            .find(|command| command.id() == s)
            .ok_or_else(|| BlameError::UnknownCommand(s.to_string()))
    }
}

impl Blamer {
    pub async fn execute(&self, command: BlameCommand) {
        debug!(command = %command, "Executing command");
        match command {
            BlameCommand::ShowBlame => self.show_blame_for_active_editor().await,
            BlameCommand::ClearBlame => self.clear_blame_for_active_editor().await,
            BlameCommand::ClearAllBlame => self.clear_blame_for_all_files().await,
            BlameCommand::ToggleBlame => self.toggle_blame_for_active_editor().await,
        }
    }
}
