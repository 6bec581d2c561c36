use crate::argument::ArgumentSpec;
use crate::env::ExecutionContext;
use crate::error::DefinitionError;
use crate::parser::Arguments;
use anyhow::Result;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Behaviour run when a command line has been parsed and bound.
///
/// A blanket implementation exists for functions and closures with the same
/// signature, so most commands are declared inline with
/// [`CommandSpec::from_fn`]:
///
/// ```
/// use typed_shell::command::CommandSpec;
/// use std::io::Write;
///
/// let hello = CommandSpec::from_fn("hello", |_args, ctx| {
///     writeln!(ctx.out(), "hello!")?;
///     Ok(())
/// })
/// .unwrap();
/// assert_eq!(hello.name(), "hello");
/// ```
pub trait CommandAction {
    /// Run the command to completion.
    ///
    /// An `Err` is reported by the interpreter and does not stop the shell.
    fn execute(&self, args: &Arguments, ctx: &mut ExecutionContext<'_>) -> Result<()>;
}

impl<F> CommandAction for F
where
    F: Fn(&Arguments, &mut ExecutionContext<'_>) -> Result<()>,
{
    fn execute(&self, args: &Arguments, ctx: &mut ExecutionContext<'_>) -> Result<()> {
        self(args, ctx)
    }
}

/// A named command with its declared arguments and the action to run.
///
/// Specs are built once while the host application sets up the shell and are
/// read-only afterwards.
#[derive(Clone)]
pub struct CommandSpec {
    name: String,
    description: Option<String>,
    arguments: HashMap<String, ArgumentSpec>,
    mandatory: Vec<ArgumentSpec>,
    action: Rc<dyn CommandAction>,
}

impl CommandSpec {
    /// Create a command without arguments. Fails when `name` is blank.
    pub fn new(
        name: impl Into<String>,
        action: impl CommandAction + 'static,
    ) -> Result<Self, DefinitionError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DefinitionError::BlankName("command"));
        }
        Ok(Self {
            name,
            description: None,
            arguments: HashMap::new(),
            mandatory: Vec::new(),
            action: Rc::new(action),
        })
    }

    /// Create a command from a closure.
    pub fn from_fn<F>(name: impl Into<String>, action: F) -> Result<Self, DefinitionError>
    where
        F: Fn(&Arguments, &mut ExecutionContext<'_>) -> Result<()> + 'static,
    {
        Self::new(name, action)
    }

    /// Declare an argument. Names must be unique within the command.
    pub fn add_argument(&mut self, spec: ArgumentSpec) -> Result<(), DefinitionError> {
        if self.arguments.contains_key(spec.name()) {
            return Err(DefinitionError::DuplicateArgument {
                command: self.name.clone(),
                argument: spec.name().to_string(),
            });
        }
        if spec.is_mandatory() {
            self.mandatory.push(spec.clone());
        }
        self.arguments.insert(spec.name().to_string(), spec);
        Ok(())
    }

    /// Chaining form of [`CommandSpec::add_argument`].
    pub fn with_argument(mut self, spec: ArgumentSpec) -> Result<Self, DefinitionError> {
        self.add_argument(spec)?;
        Ok(self)
    }

    /// One-line summary shown by `help`.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn argument(&self, name: &str) -> Option<&ArgumentSpec> {
        self.arguments.get(name)
    }

    pub fn arguments(&self) -> impl Iterator<Item = &ArgumentSpec> {
        self.arguments.values()
    }

    pub fn has_arguments(&self) -> bool {
        !self.arguments.is_empty()
    }

    /// Snapshot of the mandatory arguments in declaration order.
    pub fn mandatory_arguments(&self) -> Vec<ArgumentSpec> {
        self.mandatory.clone()
    }

    /// True when the whole trimmed line is exactly this command's name.
    ///
    /// Only the exit command is recognised this way; other commands are
    /// matched by the first word of the line.
    pub fn matches_name(&self, line: &str) -> bool {
        line.trim() == self.name
    }

    pub fn action(&self) -> &dyn CommandAction {
        self.action.as_ref()
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("arguments", &self.arguments)
            .field("mandatory", &self.mandatory)
            .finish_non_exhaustive()
    }
}
