use core_text::TextError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by editing commands. Messages are written for the status line.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Text(#[from] TextError),
    #[error("Already at oldest change")]
    NothingToUndo,
    #[error("Already at newest change")]
    NothingToRedo,
    #[error("Not an editor command: {0}")]
    UnknownCommand(String),
    #[error("No write since last change (add ! to override)")]
    UnsavedChanges,
    #[error("No file name")]
    NoFileName,
    #[error("Mark not set")]
    MarkNotSet,
    #[error("Nothing in register {0}")]
    EmptyRegister(char),
    #[error("\"{}\": {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
