use crate::command::CommandSpec;
use crate::error::DefinitionError;
use std::collections::BTreeMap;
use tracing::debug;

/// Supplier of ready-built commands, e.g. a plugin or a module of the host
/// application.
pub trait CommandSource {
    /// Build every command this source provides.
    fn commands(&self) -> Result<Vec<CommandSpec>, DefinitionError>;
}

/// Commands known to the shell, keyed by name.
///
/// Registration happens before the shell starts; the registry is not meant to
/// be shared between threads.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, CommandSpec>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a command. A second command with the same name is rejected.
    pub fn register(&mut self, command: CommandSpec) -> Result<(), DefinitionError> {
        if self.commands.contains_key(command.name()) {
            return Err(DefinitionError::DuplicateCommand(command.name().to_string()));
        }
        debug!(command = command.name(), "command registered");
        self.commands.insert(command.name().to_string(), command);
        Ok(())
    }

    /// Register everything a source provides and return the loaded names.
    ///
    /// Stops at the first definition error; commands registered before it stay.
    pub fn load_from(&mut self, source: &dyn CommandSource) -> Result<Vec<String>, DefinitionError> {
        let mut loaded = Vec::new();
        for command in source.commands()? {
            let name = command.name().to_string();
            self.register(command)?;
            loaded.push(name);
        }
        Ok(loaded)
    }

    pub fn get(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Commands in name order.
    pub fn iter(&self) -> impl Iterator<Item = &CommandSpec> {
        self.commands.values()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
