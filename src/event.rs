//! Passing executed commands on to observers of the shell.
//!
//! A command may hand its invocation, plus an optional payload, to the
//! listeners registered on the interpreter. Listeners are notified in the
//! order they were added, and any of them can consume the event to keep it
//! from the ones after it.

use crate::parser::Invocation;
use std::any::Any;
use std::rc::Rc;
use tracing::trace;

/// An invocation on its way through the listener chain.
pub struct CommandEvent<'a> {
    invocation: &'a Invocation<'a>,
    payload: Option<Box<dyn Any>>,
    consumed: bool,
}

impl<'a> CommandEvent<'a> {
    pub fn new(invocation: &'a Invocation<'a>, payload: Option<Box<dyn Any>>) -> Self {
        Self {
            invocation,
            payload,
            consumed: false,
        }
    }

    pub fn invocation(&self) -> &'a Invocation<'a> {
        self.invocation
    }

    /// The payload downcast to `T`, if there is one of that type.
    pub fn payload<T: Any>(&self) -> Option<&T> {
        self.payload.as_deref()?.downcast_ref()
    }

    /// Stop the event from reaching the remaining listeners.
    pub fn consume(&mut self) {
        self.consumed = true;
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }
}

/// Observer of commands executed by the shell.
///
/// Listeners are shared through `Rc`; use `Cell`/`RefCell` for any state they
/// update.
pub trait CommandListener {
    /// A command sent its invocation to the listeners.
    fn command_received(&self, event: &mut CommandEvent<'_>);

    /// The exit command was entered and the shell is about to stop.
    fn stop_requested(&self, _event: &mut CommandEvent<'_>) {}
}

/// Listeners in registration order.
#[derive(Default)]
pub struct Listeners {
    listeners: Vec<Rc<dyn CommandListener>>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener. Returns `false` if this very handle is already present.
    pub fn add(&mut self, listener: Rc<dyn CommandListener>) -> bool {
        if self.position(&listener).is_some() {
            return false;
        }
        self.listeners.push(listener);
        true
    }

    /// Remove a listener by identity. Returns `false` if it was not registered.
    pub fn remove(&mut self, listener: &Rc<dyn CommandListener>) -> bool {
        match self.position(listener) {
            Some(index) => {
                self.listeners.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Notify listeners of `event` until one consumes it.
    ///
    /// Returns whether the event was consumed.
    pub fn propagate(&self, event: &mut CommandEvent<'_>) -> bool {
        self.notify(event, |listener, event| listener.command_received(event))
    }

    /// Same as [`Listeners::propagate`] for the shutdown notification.
    pub fn propagate_stop(&self, event: &mut CommandEvent<'_>) -> bool {
        self.notify(event, |listener, event| listener.stop_requested(event))
    }

    fn notify(
        &self,
        event: &mut CommandEvent<'_>,
        call: impl Fn(&dyn CommandListener, &mut CommandEvent<'_>),
    ) -> bool {
        let command = event.invocation().command().name();
        for (index, listener) in self.listeners.iter().enumerate() {
            trace!(command, listener = index, "notifying listener");
            call(listener.as_ref(), event);
            if event.is_consumed() {
                trace!(command, listener = index, "event consumed");
                return true;
            }
        }
        false
    }

    fn position(&self, listener: &Rc<dyn CommandListener>) -> Option<usize> {
        self.listeners.iter().position(|l| Rc::ptr_eq(l, listener))
    }
}
