use crate::event::{CommandEvent, Listeners};
use crate::command::CommandSpec;
use crate::io_adapters::LineReader;
use crate::parser::{Arguments, Invocation};
use crate::registry::CommandRegistry;
use std::any::Any;
use std::io::{self, Write};

/// What a running command can see and touch.
///
/// The context lives for one execution: it borrows the invocation being run,
/// the shell's output and input, the known commands and the listeners.
pub struct ExecutionContext<'a> {
    invocation: &'a Invocation<'a>,
    out: &'a mut dyn Write,
    input: Option<&'a mut dyn LineReader>,
    registry: &'a CommandRegistry,
    exit: &'a CommandSpec,
    listeners: &'a Listeners,
}

impl<'a> ExecutionContext<'a> {
    pub(crate) fn new(
        invocation: &'a Invocation<'a>,
        out: &'a mut dyn Write,
        input: Option<&'a mut dyn LineReader>,
        registry: &'a CommandRegistry,
        exit: &'a CommandSpec,
        listeners: &'a Listeners,
    ) -> Self {
        Self {
            invocation,
            out,
            input,
            registry,
            exit,
            listeners,
        }
    }

    pub fn invocation(&self) -> &'a Invocation<'a> {
        self.invocation
    }

    pub fn arguments(&self) -> &'a Arguments {
        self.invocation.arguments()
    }

    /// The shell's output stream.
    pub fn out(&mut self) -> &mut dyn Write {
        &mut *self.out
    }

    /// Read one more line from the shell's own input.
    ///
    /// Returns `None` at end of input or when the shell has no reader attached.
    pub fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        match self.input.as_deref_mut() {
            Some(reader) => reader.read_line(prompt, &mut *self.out),
            None => Ok(None),
        }
    }

    /// Every command the shell knows, e.g. for listing them.
    pub fn registry(&self) -> &'a CommandRegistry {
        self.registry
    }

    /// The command that stops the shell. It is not part of the registry.
    pub fn exit_command(&self) -> &'a CommandSpec {
        self.exit
    }

    /// Send this invocation to the registered listeners.
    ///
    /// A fresh event is built for every call. Returns whether a listener
    /// consumed it.
    pub fn send_to_listeners(&self, payload: Option<Box<dyn Any>>) -> bool {
        let mut event = CommandEvent::new(self.invocation, payload);
        self.listeners.propagate(&mut event)
    }
}
