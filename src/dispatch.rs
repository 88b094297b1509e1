use std::collections::HashMap;

use tracing::debug;

use crate::builtins::register_builtins;
use crate::command::HostEnv;
use crate::config::{self, Config};
use crate::error::RegistryError;
use crate::line::CommandLine;
use crate::registry::Registry;

/// Front door for the host: one [`Dispatcher::run`] per submitted line, one
/// [`Dispatcher::complete`] per completion keystroke. Owns the registry and
/// the alias table, and is the boundary where every command failure turns
/// into a notification instead of propagating.
pub struct Dispatcher {
    registry: Registry,
    aliases: HashMap<String, String>,
}

impl Dispatcher {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            aliases: HashMap::new(),
        }
    }

    /// Standard startup: built-ins, then the user's config file.
    pub fn standard() -> Result<Self, RegistryError> {
        Self::with_config(config::load_config())
    }

    pub fn with_config(config: Config) -> Result<Self, RegistryError> {
        let mut registry = Registry::new();
        register_builtins(&mut registry)?;
        config::register_user_commands(&mut registry, &config)?;
        Ok(Self {
            registry,
            aliases: config.aliases,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Runs one submitted line. A leading `:` from the prompt is accepted
    /// and ignored. All failures are reported through `env.notifier`;
    /// nothing reaches the host and the registry is untouched by a failing
    /// invocation. Blank input is a no-op.
    pub fn run(&self, raw: &str, env: &HostEnv) {
        let raw = raw.strip_prefix(':').unwrap_or(raw);
        let line = CommandLine::parse(raw);
        if line.name().is_empty() {
            return;
        }
        let name = self.resolve_alias(line.name());
        let Some(command) = self.registry.lookup(name) else {
            env.notifier
                .error(&format!("unknown command: {}", line.name()));
            return;
        };
        let targets = env.selection.resolve();
        debug!(command = name, targets = targets.len(), "dispatching");
        if let Err(err) = command.execute(&line, &targets, env) {
            env.notifier.error(&format!("{name}: {err}"));
        }
    }

    /// Completion candidates for a partially typed line: registered names
    /// while the command word is still being typed, otherwise whatever the
    /// matched command offers. Recomputed in full on every press.
    pub fn complete(&self, raw: &str, env: &HostEnv) -> Vec<String> {
        let raw = raw.strip_prefix(':').unwrap_or(raw);
        let line = CommandLine::parse(raw);
        if line.completing_name() {
            return self.registry.prefix_matches(line.name());
        }
        match self.registry.lookup(self.resolve_alias(line.name())) {
            Some(command) => command.complete(&line, env),
            None => Vec::new(),
        }
    }

    fn resolve_alias<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map(String::as_str).unwrap_or(name)
    }
}
