use crate::argument::{ArgumentKind, ArgumentSpec};
use crate::command::{CommandAction, CommandSpec};
use crate::env::ExecutionContext;
use crate::error::DefinitionError;
use crate::parser::Arguments;
use anyhow::Result;
use std::io::Write;

/// Action of the exit command. The interpreter stops on its own; running the
/// command does nothing.
pub struct Exit;

impl CommandAction for Exit {
    fn execute(&self, _args: &Arguments, _ctx: &mut ExecutionContext<'_>) -> Result<()> {
        Ok(())
    }
}

/// Build the exit command under `name`.
///
/// Surrounding whitespace is dropped, since lines are trimmed before they
/// are matched against the exit command.
pub fn exit_command(name: &str) -> Result<CommandSpec, DefinitionError> {
    Ok(CommandSpec::new(name.trim(), Exit)?.with_description("Exit the shell"))
}

/// Lists every registered command with its arguments, then the exit command.
pub struct Help;

impl CommandAction for Help {
    fn execute(&self, _args: &Arguments, ctx: &mut ExecutionContext<'_>) -> Result<()> {
        let registry = ctx.registry();
        let exit = ctx.exit_command();
        let out = ctx.out();
        writeln!(out, "Available commands:")?;
        for command in registry.iter().chain([exit]) {
            match command.description() {
                Some(description) => writeln!(out, "  {} - {}", usage(command), description)?,
                None => writeln!(out, "  {}", usage(command))?,
            }
        }
        Ok(())
    }
}

/// Build the `help` command.
pub fn help_command() -> Result<CommandSpec, DefinitionError> {
    Ok(CommandSpec::new("help", Help)?.with_description("Show this help message"))
}

/// One-line synopsis: mandatory arguments in declaration order, then the
/// optional ones by name.
pub fn usage(command: &CommandSpec) -> String {
    let mut optional: Vec<&ArgumentSpec> = command
        .arguments()
        .filter(|spec| !spec.is_mandatory())
        .collect();
    optional.sort_by(|a, b| a.name().cmp(b.name()));

    let mut line = command.name().to_string();
    for spec in command.mandatory_arguments() {
        line.push(' ');
        line.push_str(&synopsis(&spec));
    }
    for spec in optional {
        line.push_str(&format!(" [{}]", synopsis(spec)));
    }
    line
}

fn synopsis(spec: &ArgumentSpec) -> String {
    match spec.kind() {
        ArgumentKind::Flag => format!("--{}", spec.name()),
        ArgumentKind::Valued(value_type) => format!("--{}=<{}>", spec.name(), value_type),
    }
}
