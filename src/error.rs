use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Registration-time failures. These surface during startup, before the
/// registry is handed to the host, and are the only fatal errors in the
/// crate.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("command '{0}' is already registered")]
    DuplicateCommand(String),
}

/// Everything that can go wrong inside one command invocation. The
/// `Display` text is what the user sees; the dispatcher reports each value
/// through the notifier and the host carries on.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("missing argument (usage: {usage})")]
    MissingArgument { usage: String },

    #[error("nothing is selected")]
    EmptySelection,

    #[error("{}: not a regular file", path.display())]
    InvalidTargetKind { path: PathBuf },

    #[error("{}: no such file or directory", path.display())]
    TargetNotFound { path: PathBuf },

    #[error(transparent)]
    Spawn(#[from] SpawnError),

    #[error("{0}")]
    Failed(String),
}

/// Failure to launch or run an external program.
#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("cannot safely quote '{0}' for shell use")]
    Unquotable(String),
}
