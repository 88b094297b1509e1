use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::SpawnError;

/// One external-process launch, assembled immediately before the spawn and
/// discarded after it. Paths always travel as discrete `OsString` argv
/// entries, byte-for-byte as the host reported them; the only exception is
/// [`Invocation::shell`], where every interpolated path must already have
/// gone through [`shell_quote`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub argv: Vec<OsString>,
    pub detached: bool,
    pub capture_output: bool,
}

impl Invocation {
    /// Blocking launch: the caller waits for the child to exit.
    pub fn blocking(argv: Vec<OsString>) -> Self {
        Self {
            argv,
            detached: false,
            capture_output: false,
        }
    }

    /// Blocking launch that also collects the child's stdout.
    pub fn captured(argv: Vec<OsString>) -> Self {
        Self {
            argv,
            detached: false,
            capture_output: true,
        }
    }

    /// Fire-and-forget launch: returns as soon as the child has started,
    /// with its stdio detached from the interactive session.
    pub fn detached(argv: Vec<OsString>) -> Self {
        Self {
            argv,
            detached: true,
            capture_output: false,
        }
    }

    /// Escape hatch for commands that genuinely need shell features
    /// (redirection, pipes). Callers are responsible for building `script`
    /// exclusively from literals and [`shell_quote`]d values.
    pub fn shell(script: String, detached: bool) -> Self {
        Self {
            argv: vec!["/bin/sh".into(), "-c".into(), script.into()],
            detached,
            capture_output: false,
        }
    }
}

/// What a spawn produced. A detached launch is deliberately unobserved past
/// startup; a blocking launch always reports how the child ended, so a
/// child killed by a signal (`exit_code: None`) is distinguishable from one
/// that exited cleanly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpawnOutcome {
    /// Fire-and-forget launch that started successfully.
    Detached,
    /// Blocking launch whose child has ended.
    Exited {
        /// Exit code; `None` when the child was killed by a signal.
        exit_code: Option<i32>,
        /// Captured stdout; empty unless `capture_output` was set.
        stdout: String,
    },
}

impl SpawnOutcome {
    pub fn exited(exit_code: Option<i32>) -> Self {
        Self::Exited {
            exit_code,
            stdout: String::new(),
        }
    }

    /// True for a started detached launch and for a blocking child that
    /// exited with code zero. Signal death is a failure.
    pub fn success(&self) -> bool {
        matches!(
            self,
            Self::Detached
                | Self::Exited {
                    exit_code: Some(0),
                    ..
                }
        )
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Detached => None,
            Self::Exited { exit_code, .. } => *exit_code,
        }
    }

    pub fn stdout(&self) -> &str {
        match self {
            Self::Detached => "",
            Self::Exited { stdout, .. } => stdout,
        }
    }
}

/// The single point where the core touches the operating system's process
/// API. Hosts use [`OsSpawner`]; tests substitute a recording
/// implementation.
pub trait Spawner {
    fn spawn(&self, invocation: &Invocation) -> Result<SpawnOutcome, SpawnError>;
}

/// Real spawner backed by `std::process`.
#[derive(Debug, Default)]
pub struct OsSpawner;

impl Spawner for OsSpawner {
    fn spawn(&self, invocation: &Invocation) -> Result<SpawnOutcome, SpawnError> {
        let Some(program) = invocation.argv.first().cloned() else {
            return Err(SpawnError::Launch {
                program: String::new(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "empty argv"),
            });
        };
        debug!(
            program = ?program,
            args = ?&invocation.argv[1..],
            detached = invocation.detached,
            "spawning"
        );
        let mut command = Command::new(&program);
        command.args(&invocation.argv[1..]);
        let launch = |source| SpawnError::Launch {
            program: program.to_string_lossy().into_owned(),
            source,
        };
        if invocation.detached {
            command
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null());
            // The child's lifetime is unmanaged past this point.
            command.spawn().map_err(launch)?;
            Ok(SpawnOutcome::Detached)
        } else if invocation.capture_output {
            let output = command.stdin(Stdio::null()).output().map_err(launch)?;
            Ok(SpawnOutcome::Exited {
                exit_code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            })
        } else {
            let status = command.status().map_err(launch)?;
            Ok(SpawnOutcome::exited(status.code()))
        }
    }
}

/// Quotes a path for interpolation into a shell string. Paths the quoting
/// routine cannot represent exactly (non-UTF-8, embedded NUL) are rejected
/// rather than passed through altered.
pub fn shell_quote(path: &Path) -> Result<String, SpawnError> {
    let text = path
        .to_str()
        .ok_or_else(|| SpawnError::Unquotable(path.to_string_lossy().into_owned()))?;
    shlex::try_join([text]).map_err(|_| SpawnError::Unquotable(text.to_owned()))
}
