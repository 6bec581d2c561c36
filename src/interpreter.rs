use crate::builtin;
use crate::command::CommandSpec;
use crate::env::ExecutionContext;
use crate::error::{DefinitionError, ExecutionError};
use crate::event::{CommandEvent, CommandListener, Listeners};
use crate::io_adapters::{BufReadLines, LineReader};
use crate::parser::{LineParser, ParsedLine};
use crate::registry::CommandRegistry;
use crate::settings::Settings;
use std::io::{self, Write};
use std::rc::Rc;
use tracing::{debug, error, info, warn};

/// Lifecycle of an [`Interpreter`]. Once stopped it never runs again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    Stopped,
}

/// The read-parse-execute loop.
///
/// The interpreter owns the registered commands, the listeners, the input and
/// the output. It reads one line at a time, binds it to a command, runs the
/// command and goes on until the exit command is entered or the input ends.
/// Unknown commands, syntax and parse errors and failing commands are reported
/// on the output and never end the loop.
///
/// Example
/// ```
/// use std::io::{Cursor, Write};
/// use typed_shell::argument::{ArgumentSpec, ValueType};
/// use typed_shell::command::CommandSpec;
/// use typed_shell::io_adapters::{BufReadLines, MemWriter};
/// use typed_shell::registry::CommandRegistry;
/// use typed_shell::{Interpreter, Settings, State};
///
/// let greet = CommandSpec::from_fn("greet", |args, ctx| {
///     writeln!(ctx.out(), "Hello, {}!", args.get_str("name").unwrap_or_default())?;
///     Ok(())
/// })
/// .unwrap()
/// .with_argument(ArgumentSpec::valued("name", ValueType::String, true).unwrap())
/// .unwrap();
///
/// let mut registry = CommandRegistry::new();
/// registry.register(greet).unwrap();
///
/// let (out, buffer) = MemWriter::with_handle();
/// let mut sh = Interpreter::new(registry, Settings::default().with_prompt(""))
///     .unwrap()
///     .with_reader(BufReadLines::new(Cursor::new("greet --name=Ada\nexit\n")))
///     .with_output(out);
///
/// sh.run().unwrap();
/// assert_eq!(sh.state(), State::Stopped);
/// assert_eq!(String::from_utf8(buffer.borrow().clone()).unwrap(), "Hello, Ada!\nGoodbye\n");
/// ```
pub struct Interpreter {
    registry: CommandRegistry,
    exit: CommandSpec,
    listeners: Listeners,
    settings: Settings,
    reader: Option<Box<dyn LineReader>>,
    out: Box<dyn Write>,
    state: State,
}

impl Interpreter {
    /// Create an interpreter reading standard input and writing standard output.
    ///
    /// Fails when a registered command takes the exit command's name.
    pub fn new(registry: CommandRegistry, settings: Settings) -> Result<Self, DefinitionError> {
        let exit = builtin::exit_command(&settings.exit_command)?;
        if registry.contains(exit.name()) {
            return Err(DefinitionError::ReservedName(exit.name().to_string()));
        }
        Ok(Self {
            registry,
            exit,
            listeners: Listeners::new(),
            settings,
            reader: Some(Box::new(BufReadLines::new(io::stdin().lock()))),
            out: Box::new(io::stdout()),
            state: State::Running,
        })
    }

    /// Replace the line source.
    pub fn with_reader(mut self, reader: impl LineReader + 'static) -> Self {
        self.reader = Some(Box::new(reader));
        self
    }

    /// Replace the output stream.
    pub fn with_output(mut self, out: impl Write + 'static) -> Self {
        self.out = Box::new(out);
        self
    }

    /// Register one more command.
    pub fn add_command(&mut self, command: CommandSpec) -> Result<(), DefinitionError> {
        if command.name() == self.exit.name() {
            return Err(DefinitionError::ReservedName(command.name().to_string()));
        }
        self.registry.register(command)
    }

    /// Returns `false` if this listener was already registered.
    pub fn add_listener(&mut self, listener: Rc<dyn CommandListener>) -> bool {
        self.listeners.add(listener)
    }

    /// Returns `false` if this listener was not registered.
    pub fn remove_listener(&mut self, listener: &Rc<dyn CommandListener>) -> bool {
        self.listeners.remove(listener)
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Read and execute lines until the shell stops.
    ///
    /// Returns immediately on a stopped interpreter. Only I/O failures of the
    /// reader or the output end the loop with an error.
    pub fn run(&mut self) -> io::Result<()> {
        if self.state == State::Stopped {
            return Ok(());
        }
        info!(commands = self.registry.len(), "shell started");
        if let Some(text) = &self.settings.startup_text {
            writeln!(self.out, "{text}")?;
        }

        while self.state == State::Running {
            let line = match self.reader.as_deref_mut() {
                Some(reader) => reader.read_line(&self.settings.prompt, &mut *self.out)?,
                None => None,
            };
            match line {
                Some(line) => self.execute_line(&line)?,
                None => {
                    debug!("end of input");
                    self.stop()?;
                }
            }
        }
        Ok(())
    }

    /// Parse and execute a single line.
    ///
    /// Blank lines and lines given to a stopped interpreter are ignored.
    pub fn execute_line(&mut self, line: &str) -> io::Result<()> {
        let line = line.trim();
        if line.is_empty() || self.state == State::Stopped {
            return Ok(());
        }
        debug!(line, "executing line");

        let parser = LineParser::new(&self.registry, &self.exit);
        let (invocation, exiting) = match parser.parse(line) {
            Ok(ParsedLine::Command(invocation)) => (invocation, false),
            Ok(ParsedLine::Exit(invocation)) => (invocation, true),
            Ok(ParsedLine::NotFound(name)) => {
                warn!(command = %name, "command not found");
                writeln!(self.out, "{}", self.settings.not_found_text)?;
                return Ok(());
            }
            Err(err) => {
                warn!(%err, line, "line rejected");
                writeln!(self.out, "{err}")?;
                return Ok(());
            }
        };

        let command = invocation.command();
        let result = {
            let input = self
                .reader
                .as_deref_mut()
                .map(|reader| reader as &mut dyn LineReader);
            let mut ctx = ExecutionContext::new(
                &invocation,
                &mut *self.out,
                input,
                &self.registry,
                &self.exit,
                &self.listeners,
            );
            command.action().execute(invocation.arguments(), &mut ctx)
        };

        if let Err(source) = result {
            let err = ExecutionError {
                command: command.name().to_string(),
                source,
            };
            error!(%err, "command failed");
            writeln!(self.out, "{err}")?;
        }

        if exiting {
            {
                let mut event = CommandEvent::new(&invocation, None);
                self.listeners.propagate_stop(&mut event);
            }
            self.stop()?;
        }
        Ok(())
    }

    fn stop(&mut self) -> io::Result<()> {
        self.state = State::Stopped;
        self.reader = None;
        writeln!(self.out, "{}", self.settings.stop_text)?;
        self.out.flush()?;
        info!("shell stopped");
        Ok(())
    }
}
