//! User configuration: command aliases and declarative extension commands,
//! read best-effort from `<config dir>/wayline/config.toml`.
//!
//! ```toml
//! [aliases]
//! e = "edit"
//!
//! [commands.gimp]
//! argv = ["gimp", "{}"]
//! detached = true
//! per_target = true
//! ```

use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::warn;

use crate::command::{Command, HostEnv, for_each_target};
use crate::error::{CommandError, RegistryError};
use crate::invoke::Invocation;
use crate::line::CommandLine;
use crate::registry::Registry;

#[derive(Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    aliases: HashMap<String, String>,
    #[serde(default)]
    commands: HashMap<String, UserCommandSpec>,
}

/// A user extension command declared as data instead of code. Each `"{}"`
/// element of `argv` is replaced by a target path as its own argument,
/// never spliced into a longer word, so no quoting question arises.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct UserCommandSpec {
    pub argv: Vec<String>,
    #[serde(default = "default_true")]
    pub detached: bool,
    /// Spawn once per resolved target instead of once in total.
    #[serde(default)]
    pub per_target: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug)]
pub struct Config {
    pub aliases: HashMap<String, String>,
    pub commands: HashMap<String, UserCommandSpec>,
}

impl Default for Config {
    fn default() -> Self {
        let mut aliases = HashMap::new();
        aliases.insert("code".into(), "vscode".into());
        aliases.insert("kon".into(), "terminal".into());
        aliases.insert("rm".into(), "trash".into());
        Self {
            aliases,
            commands: HashMap::new(),
        }
    }
}

impl Config {
    /// Parses a config file's contents and merges it over the defaults.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(contents).context("parsing config")?;
        let mut config = Self::default();
        config.aliases.extend(raw.aliases);
        config.commands.extend(raw.commands);
        Ok(config)
    }
}

/// Best-effort load: a missing file means defaults, a broken file is
/// reported and otherwise ignored. Never fails the startup.
pub fn load_config() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    match read_config(&path) {
        Ok(Some(config)) => config,
        Ok(None) => Config::default(),
        Err(err) => {
            warn!(path = %path.display(), "failed to load config: {err:#}");
            Config::default()
        }
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("wayline").join("config.toml"))
}

fn read_config(path: &Path) -> Result<Option<Config>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Config::from_toml(&contents).map(Some)
}

/// Registers every user-declared command, in name order. A name colliding
/// with a built-in is a duplicate like any other.
pub fn register_user_commands(
    registry: &mut Registry,
    config: &Config,
) -> Result<(), RegistryError> {
    let mut names: Vec<_> = config.commands.keys().cloned().collect();
    names.sort();
    for name in names {
        let spec = config.commands[&name].clone();
        registry.register(Box::new(UserCommand { name, spec }))?;
    }
    Ok(())
}

/// Bridges a [`UserCommandSpec`] into the command registry.
struct UserCommand {
    name: String,
    spec: UserCommandSpec,
}

impl Command for UserCommand {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(
        &self,
        _line: &CommandLine,
        targets: &[PathBuf],
        env: &HostEnv,
    ) -> Result<(), CommandError> {
        if self.spec.per_target {
            for_each_target(targets, env, false, |path| {
                env.spawn(&Invocation {
                    argv: substitute_one(&self.spec.argv, path),
                    detached: self.spec.detached,
                    capture_output: false,
                })?;
                Ok(())
            })
        } else {
            env.spawn(&Invocation {
                argv: splice_targets(&self.spec.argv, targets)?,
                detached: self.spec.detached,
                capture_output: false,
            })?;
            Ok(())
        }
    }
}

/// Template expansion for one target: `"{}"` becomes the path; with no
/// placeholder the path is appended. Paths stay `OsString` so odd file
/// names reach the child untouched.
fn substitute_one(template: &[String], path: &Path) -> Vec<OsString> {
    let mut argv = Vec::with_capacity(template.len() + 1);
    let mut replaced = false;
    for word in template {
        if word == "{}" {
            argv.push(path.into());
            replaced = true;
        } else {
            argv.push(word.clone().into());
        }
    }
    if !replaced {
        argv.push(path.into());
    }
    argv
}

/// Template expansion for a single spawn: each `"{}"` expands to the whole
/// target set, one argument per path. A template without placeholders is
/// selection-independent and passes through untouched.
fn splice_targets(template: &[String], targets: &[PathBuf]) -> Result<Vec<OsString>, CommandError> {
    if !template.iter().any(|word| word == "{}") {
        return Ok(template.iter().map(|word| word.clone().into()).collect());
    }
    if targets.is_empty() {
        return Err(CommandError::EmptySelection);
    }
    let mut argv = Vec::new();
    for word in template {
        if word == "{}" {
            argv.extend(targets.iter().map(OsString::from));
        } else {
            argv.push(word.clone().into());
        }
    }
    Ok(argv)
}
