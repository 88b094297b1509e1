use std::path::{Path, PathBuf};

use tracing::warn;

use crate::complete::complete_from_directory;
use crate::error::{CommandError, SpawnError};
use crate::invoke::{Invocation, SpawnOutcome, Spawner};
use crate::line::CommandLine;
use crate::notify::Notifier;
use crate::selection::Selection;

/// The narrow slice of host capability a command may touch: where the
/// browser is, what is selected, how to launch processes, and how to talk
/// back to the user. Commands never see the host itself, and never mutate
/// the selection.
pub struct HostEnv<'a> {
    pub cwd: &'a Path,
    pub selection: &'a Selection,
    pub spawner: &'a dyn Spawner,
    pub notifier: &'a dyn Notifier,
}

impl HostEnv<'_> {
    pub fn spawn(&self, invocation: &Invocation) -> Result<SpawnOutcome, SpawnError> {
        self.spawner.spawn(invocation)
    }

    /// Resolves a user-typed path argument against the browsing directory.
    pub fn resolve_path(&self, raw: &str) -> PathBuf {
        let path = Path::new(raw);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}

/// A registered command: one `execute` per submitted line, one `complete`
/// per tab press.
pub trait Command {
    /// Registered name; what the user types after `:`.
    fn name(&self) -> &str;

    /// One-line usage string, shown in missing-argument errors.
    fn usage(&self) -> String {
        self.name().to_string()
    }

    /// Runs the command against the resolved target set. Must not panic on
    /// any input; every failure travels as a [`CommandError`] or a
    /// notification, never as an unwound fault.
    fn execute(
        &self,
        line: &CommandLine,
        targets: &[PathBuf],
        env: &HostEnv,
    ) -> Result<(), CommandError>;

    /// Completion candidates for the argument under the cursor, recomputed
    /// from scratch on every press (no iterator state survives between
    /// presses). The default completes against the browsing directory's
    /// entries, which is what most path-taking commands want.
    fn complete(&self, line: &CommandLine, env: &HostEnv) -> Vec<String> {
        complete_from_directory(env.cwd, line.partial())
    }
}

/// Runs `action` once per target, skipping and reporting targets that are
/// missing or (when `require_file` is set) not regular files. One bad
/// target never aborts the rest; that is the partial-failure contract every
/// multi-target command shares. An empty target set is an error: the caller
/// was target-oriented and nothing is selected.
pub fn for_each_target(
    targets: &[PathBuf],
    env: &HostEnv,
    require_file: bool,
    mut action: impl FnMut(&Path) -> Result<(), CommandError>,
) -> Result<(), CommandError> {
    if targets.is_empty() {
        return Err(CommandError::EmptySelection);
    }
    for target in targets {
        let result = check_target(target, require_file).and_then(|_| action(target));
        if let Err(err) = result {
            warn!(path = %target.display(), error = %err, "skipping target");
            env.notifier.error(&err.to_string());
        }
    }
    Ok(())
}

fn check_target(path: &Path, require_file: bool) -> Result<(), CommandError> {
    if !path.exists() {
        return Err(CommandError::TargetNotFound {
            path: path.to_path_buf(),
        });
    }
    if require_file && !path.is_file() {
        return Err(CommandError::InvalidTargetKind {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}
