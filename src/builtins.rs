//! The built-in command set: thin glue from parsed input and resolved
//! targets to external programs, all through the one spawn boundary.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::command::{Command, HostEnv, for_each_target};
use crate::error::{CommandError, RegistryError};
use crate::invoke::{Invocation, shell_quote};
use crate::line::CommandLine;
use crate::registry::Registry;

/// Installs the built-in command set. Called once at startup, before any
/// user-config commands; a duplicate here is a startup bug and is surfaced
/// before the registry is handed to the host.
pub fn register_builtins(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register(Box::new(Edit))?;
    registry.register(Box::new(Vscode))?;
    registry.register(Box::new(VscodeDir))?;
    registry.register(Box::new(Dol))?;
    registry.register(Box::new(TerminalHere))?;
    registry.register(Box::new(Trash))?;
    registry.register(Box::new(CopyContent))?;
    registry.register(Box::new(RenameEdit))?;
    registry.register(Box::new(GitClone))?;
    Ok(())
}

fn resolve_editor() -> String {
    env::var("EDITOR")
        .or_else(|_| env::var("VISUAL"))
        .unwrap_or_else(|_| "vi".into())
}

fn edit_file(path: &Path, env: &HostEnv) -> Result<(), CommandError> {
    let outcome = env.spawn(&Invocation::blocking(vec![
        resolve_editor().into(),
        path.into(),
    ]))?;
    if !outcome.success() {
        return Err(CommandError::Failed(format!(
            "editor exited with status {}",
            outcome
                .exit_code()
                .map(|code| code.to_string())
                .unwrap_or_else(|| "unknown".into())
        )));
    }
    env.notifier.info(&format!("Edited {}", path.display()));
    Ok(())
}

/// `:edit [path]`: open files in the user's editor, blocking until the
/// editor exits. With no argument every resolved target is edited in turn;
/// an explicit trailing argument is taken verbatim so paths with spaces
/// need no quoting.
struct Edit;

impl Command for Edit {
    fn name(&self) -> &str {
        "edit"
    }

    fn usage(&self) -> String {
        "edit [path]".into()
    }

    fn execute(
        &self,
        line: &CommandLine,
        targets: &[PathBuf],
        env: &HostEnv,
    ) -> Result<(), CommandError> {
        if let Some(rest) = line.rest(1) {
            let target = env.resolve_path(rest);
            if !target.exists() {
                return Err(CommandError::TargetNotFound { path: target });
            }
            if target.is_dir() {
                return Err(CommandError::InvalidTargetKind { path: target });
            }
            return edit_file(&target, env);
        }
        for_each_target(targets, env, true, |path| edit_file(path, env))
    }
}

/// `:vscode`: open each resolved target in VS Code, one detached launch
/// per target, in mark order.
struct Vscode;

impl Command for Vscode {
    fn name(&self) -> &str {
        "vscode"
    }

    fn execute(
        &self,
        _line: &CommandLine,
        targets: &[PathBuf],
        env: &HostEnv,
    ) -> Result<(), CommandError> {
        for_each_target(targets, env, false, |path| {
            env.spawn(&Invocation::detached(vec!["code".into(), path.into()]))?;
            Ok(())
        })
    }
}

/// `:vscodedir`: new VS Code window on the browsing directory, ignoring
/// the selection.
struct VscodeDir;

impl Command for VscodeDir {
    fn name(&self) -> &str {
        "vscodedir"
    }

    fn execute(
        &self,
        _line: &CommandLine,
        _targets: &[PathBuf],
        env: &HostEnv,
    ) -> Result<(), CommandError> {
        env.spawn(&Invocation::detached(vec![
            "code".into(),
            env.cwd.into(),
            "-n".into(),
        ]))?;
        Ok(())
    }
}

/// `:dol`: open the browsing directory in a new Dolphin window.
struct Dol;

impl Command for Dol {
    fn name(&self) -> &str {
        "dol"
    }

    fn execute(
        &self,
        _line: &CommandLine,
        _targets: &[PathBuf],
        env: &HostEnv,
    ) -> Result<(), CommandError> {
        env.spawn(&Invocation::detached(vec![
            "dolphin".into(),
            "--new-window".into(),
            env.cwd.into(),
        ]))?;
        Ok(())
    }
}

/// `:terminal`: open a terminal emulator in the browsing directory.
struct TerminalHere;

impl Command for TerminalHere {
    fn name(&self) -> &str {
        "terminal"
    }

    fn execute(
        &self,
        _line: &CommandLine,
        _targets: &[PathBuf],
        env: &HostEnv,
    ) -> Result<(), CommandError> {
        env.spawn(&Invocation::detached(vec![
            "konsole".into(),
            env.cwd.into(),
        ]))?;
        Ok(())
    }
}

/// `:trash`: move every resolved target to the system trash via
/// `trash-put`. Missing targets are reported and skipped; the rest still
/// go.
struct Trash;

impl Command for Trash {
    fn name(&self) -> &str {
        "trash"
    }

    fn execute(
        &self,
        _line: &CommandLine,
        targets: &[PathBuf],
        env: &HostEnv,
    ) -> Result<(), CommandError> {
        for_each_target(targets, env, false, |path| {
            env.spawn(&Invocation::detached(vec![
                "trash-put".into(),
                path.into(),
            ]))?;
            Ok(())
        })
    }
}

/// `:copy_content`: pipe each resolved regular file into the X clipboard.
/// Needs shell redirection, so this goes through the quoted shell escape
/// hatch; directories are refused per target.
struct CopyContent;

impl Command for CopyContent {
    fn name(&self) -> &str {
        "copy_content"
    }

    fn execute(
        &self,
        _line: &CommandLine,
        targets: &[PathBuf],
        env: &HostEnv,
    ) -> Result<(), CommandError> {
        for_each_target(targets, env, true, |path| {
            let script = format!("xclip -sel c < {}", shell_quote(path)?);
            let outcome = env.spawn(&Invocation::shell(script, false))?;
            if !outcome.success() {
                return Err(CommandError::Failed(format!(
                    "xclip failed for {}",
                    path.display()
                )));
            }
            env.notifier.info(&format!("{} copied", path.display()));
            Ok(())
        })
    }
}

/// `:rename_edit`: rename the focused entry by editing its name in the
/// user's editor. Single target only. The scratch file holding the name is
/// removed on every exit path, including editor failure; empty or unchanged
/// content aborts the rename.
struct RenameEdit;

impl Command for RenameEdit {
    fn name(&self) -> &str {
        "rename_edit"
    }

    fn execute(
        &self,
        _line: &CommandLine,
        targets: &[PathBuf],
        env: &HostEnv,
    ) -> Result<(), CommandError> {
        let target = match targets {
            [] => return Err(CommandError::EmptySelection),
            [single] => single.clone(),
            _ => {
                return Err(CommandError::Failed(
                    "rename_edit works on one entry at a time".into(),
                ));
            }
        };
        if !target.exists() {
            return Err(CommandError::TargetNotFound { path: target });
        }
        let current_name = target
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                CommandError::Failed(format!("{} has no file name", target.display()))
            })?;
        let parent = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => env.cwd.to_path_buf(),
        };

        let scratch = ScratchFile::create(&parent, &current_name)?;
        let outcome = env.spawn(&Invocation::blocking(vec![
            resolve_editor().into(),
            scratch.path().into(),
        ]))?;
        if !outcome.success() {
            return Err(CommandError::Failed(
                "editor exited without saving a new name".into(),
            ));
        }

        let new_name = scratch.read_first_line()?;
        validate_new_name(&new_name, &current_name)?;
        let dest = parent.join(&new_name);
        if dest.exists() {
            return Err(CommandError::Failed(format!(
                "{} already exists",
                dest.display()
            )));
        }
        fs::rename(&target, &dest).map_err(|err| {
            CommandError::Failed(format!("renaming {}: {err}", target.display()))
        })?;
        env.notifier
            .info(&format!("Renamed {current_name} -> {new_name}"));
        Ok(())
    }
}

/// `:git <url>`: clone a repository into the browsing directory. The URL
/// is the rest of the line, verbatim.
struct GitClone;

impl Command for GitClone {
    fn name(&self) -> &str {
        "git"
    }

    fn usage(&self) -> String {
        "git <url>".into()
    }

    fn execute(
        &self,
        line: &CommandLine,
        _targets: &[PathBuf],
        env: &HostEnv,
    ) -> Result<(), CommandError> {
        let url = line.rest(1).ok_or(CommandError::MissingArgument {
            usage: self.usage(),
        })?;
        let outcome = env.spawn(&Invocation::blocking(vec![
            "git".into(),
            "-C".into(),
            env.cwd.into(),
            "clone".into(),
            url.into(),
        ]))?;
        if !outcome.success() {
            return Err(CommandError::Failed(format!("git clone {url} failed")));
        }
        env.notifier.info(&format!("Cloned {url}"));
        Ok(())
    }
}

fn validate_new_name(name: &str, current: &str) -> Result<(), CommandError> {
    if name.is_empty() {
        return Err(CommandError::Failed(
            "new name is empty; rename aborted".into(),
        ));
    }
    if name == current {
        return Err(CommandError::Failed("name is unchanged".into()));
    }
    if name == "." || name == ".." {
        return Err(CommandError::Failed(format!("invalid name '{name}'")));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(CommandError::Failed(
            "name cannot contain path separators".into(),
        ));
    }
    Ok(())
}

/// Scratch file holding the name being edited; removed on drop so no exit
/// path leaks it.
struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    fn create(dir: &Path, contents: &str) -> Result<Self, CommandError> {
        let path = dir.join(format!(".wayline-rename-{}", std::process::id()));
        fs::write(&path, format!("{contents}\n")).map_err(|err| {
            CommandError::Failed(format!("creating {}: {err}", path.display()))
        })?;
        Ok(Self { path })
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn read_first_line(&self) -> Result<String, CommandError> {
        let contents = fs::read_to_string(&self.path).map_err(|err| {
            CommandError::Failed(format!("reading {}: {err}", self.path.display()))
        })?;
        Ok(contents.lines().next().unwrap_or("").trim().to_string())
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}
