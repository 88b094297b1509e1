use std::collections::BTreeMap;

use crate::command::Command;
use crate::error::RegistryError;

/// Maps command names to implementations. Populated once at startup from
/// the built-ins plus any user-configured commands; read-only afterwards,
/// so lookups can be shared freely without locking.
#[derive(Default)]
pub struct Registry {
    commands: BTreeMap<String, Box<dyn Command>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a command under its own name. Names are case-sensitive and
    /// permanent; a second registration of the same name is refused.
    pub fn register(&mut self, command: Box<dyn Command>) -> Result<(), RegistryError> {
        let name = command.name().to_string();
        if self.commands.contains_key(&name) {
            return Err(RegistryError::DuplicateCommand(name));
        }
        self.commands.insert(name, command);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&dyn Command> {
        self.commands.get(name).map(|command| command.as_ref())
    }

    /// Registered names starting with `partial`, in lexicographic order.
    /// The default completion source while the command word is being typed.
    pub fn prefix_matches(&self, partial: &str) -> Vec<String> {
        self.commands
            .keys()
            .filter(|name| name.starts_with(partial))
            .cloned()
            .collect()
    }

    /// All registered names, in lexicographic order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }
}
