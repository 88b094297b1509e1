//! Command dispatch and selection resolution for an interactive file
//! browser's `:` command layer.
//!
//! The host feeds this crate three things: the raw line the user submitted,
//! a snapshot of the current selection (focused entry plus mark set), and
//! the capabilities a command may use (process spawning, notifications).
//! The crate tokenizes the line, finds the command in a startup-time
//! registry, resolves the target set (marks win over focus), and runs the
//! command, which typically launches an external program through the single
//! spawn boundary with shell-safe argument handling. Failures come back as
//! notifications; the host process never terminates on a command error.
//!
//! Typical wiring:
//! - at startup, [`Dispatcher::standard`] builds the registry from the
//!   built-ins plus the user's config file;
//! - per keystroke in the command prompt, [`Dispatcher::complete`];
//! - on submit, [`Dispatcher::run`].

pub mod builtins;
pub mod command;
pub mod complete;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod invoke;
pub mod line;
pub mod notify;
pub mod registry;
pub mod selection;

pub use command::{Command, HostEnv};
pub use config::Config;
pub use dispatch::Dispatcher;
pub use error::{CommandError, RegistryError, SpawnError};
pub use invoke::{Invocation, OsSpawner, SpawnOutcome, Spawner, shell_quote};
pub use line::CommandLine;
pub use notify::{MemoryNotifier, Notifier};
pub use registry::Registry;
pub use selection::Selection;
