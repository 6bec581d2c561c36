use anyhow::Context;
use argh::FromArgs;
use std::fs;
use std::io::{IsTerminal, Write};
use std::rc::Rc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use typed_shell::argument::{ArgumentSpec, ValueType};
use typed_shell::builtin;
use typed_shell::command::CommandSpec;
use typed_shell::error::DefinitionError;
use typed_shell::event::{CommandEvent, CommandListener};
use typed_shell::io_adapters::EditorReader;
use typed_shell::registry::{CommandRegistry, CommandSource};
use typed_shell::{Interpreter, Settings};

#[derive(FromArgs)]
/// Interactive shell with a handful of demo commands.
struct Options {
    #[argh(option, default = "String::from(\"> \")")]
    /// text shown before every line. Defaults to "> ".
    prompt: String,

    #[argh(option, default = "String::from(\"exit\")")]
    /// command that leaves the shell. Defaults to "exit".
    exit_command: String,

    #[argh(option)]
    /// log filter, e.g. "debug" or "typed_shell=trace". Overrides RUST_LOG.
    log_level: Option<String>,

    #[argh(switch)]
    /// do not print the greeting on start.
    no_banner: bool,

    #[argh(switch)]
    /// do not keep entered lines in the editor history.
    no_history: bool,
}

/// Logs every command that reaches the listeners.
struct LogListener;

impl CommandListener for LogListener {
    fn command_received(&self, event: &mut CommandEvent<'_>) {
        info!(
            command = event.invocation().command().name(),
            code = ?event.payload::<Option<i32>>(),
            "command notified"
        );
    }

    fn stop_requested(&self, _event: &mut CommandEvent<'_>) {
        info!("exit requested");
    }
}

const MAX_ECHO_TIMES: i64 = 1000;

/// The commands this binary ships with.
struct DemoCommands;

impl CommandSource for DemoCommands {
    fn commands(&self) -> Result<Vec<CommandSpec>, DefinitionError> {
        let greet = CommandSpec::from_fn("greet", |args, ctx| {
            let name = args.get_str("name").context("name is mandatory")?;
            let greeting = format!("Hello, {name}!");
            if args.contains("loud") {
                writeln!(ctx.out(), "{}", greeting.to_uppercase())?;
            } else {
                writeln!(ctx.out(), "{greeting}")?;
            }
            Ok(())
        })?
        .with_description("Greet someone")
        .with_argument(ArgumentSpec::valued("name", ValueType::String, true)?)?
        .with_argument(ArgumentSpec::flag("loud")?)?;

        let sum = CommandSpec::from_fn("sum", |args, ctx| {
            let a = args.get_f64("a").context("a is mandatory")?;
            let b = args.get_f64("b").context("b is mandatory")?;
            writeln!(ctx.out(), "{}", a + b)?;
            Ok(())
        })?
        .with_description("Add two numbers")
        .with_argument(ArgumentSpec::valued("a", ValueType::Decimal, true)?)?
        .with_argument(ArgumentSpec::valued("b", ValueType::Decimal, true)?)?;

        let stat = CommandSpec::from_fn("stat", |args, ctx| {
            let path = args.get_path("path").context("path is mandatory")?;
            let meta = fs::metadata(path)
                .with_context(|| format!("cannot stat {}", path.display()))?;
            let kind = if meta.is_dir() {
                "directory"
            } else if meta.is_file() {
                "file"
            } else {
                "other"
            };
            writeln!(ctx.out(), "{}: {kind}, {} bytes", path.display(), meta.len())?;
            Ok(())
        })?
        .with_description("Show the type and size of a file")
        .with_argument(ArgumentSpec::valued("path", ValueType::FilePath, true)?)?;

        let echo = CommandSpec::from_fn("echo", |args, ctx| {
            let text = args.get_str("text").context("text is mandatory")?;
            let times = args.get_i64("times").unwrap_or(1);
            if !(0..=MAX_ECHO_TIMES).contains(&times) {
                anyhow::bail!("times must be between 0 and {MAX_ECHO_TIMES}, got {times}");
            }
            let separator = match args.get_bool("newline") {
                Some(false) => " ",
                _ => "\n",
            };
            let out = ctx.out();
            for i in 0..times {
                if i > 0 {
                    write!(out, "{separator}")?;
                }
                write!(out, "{text}")?;
            }
            writeln!(out)?;
            Ok(())
        })?
        .with_description("Print a text, possibly several times")
        .with_argument(ArgumentSpec::valued("text", ValueType::String, true)?)?
        .with_argument(ArgumentSpec::valued("times", ValueType::Long, false)?)?
        .with_argument(ArgumentSpec::valued("newline", ValueType::Boolean, false)?)?;

        let notify = CommandSpec::from_fn("notify", |args, ctx| {
            let consumed = ctx.send_to_listeners(Some(Box::new(args.get_i32("code"))));
            if consumed {
                writeln!(ctx.out(), "notification handled")?;
            } else {
                writeln!(ctx.out(), "notification sent")?;
            }
            Ok(())
        })?
        .with_description("Send a notification to the shell listeners")
        .with_argument(ArgumentSpec::valued("code", ValueType::Integer, false)?)?;

        Ok(vec![greet, sum, stat, echo, notify])
    }
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let options: Options = argh::from_env();
    init_tracing(options.log_level.as_deref());

    let mut registry = CommandRegistry::new();
    let loaded = registry.load_from(&DemoCommands)?;
    info!(?loaded, "demo commands loaded");
    registry.register(builtin::help_command()?)?;

    let mut settings = Settings::default()
        .with_prompt(options.prompt)
        .with_exit_command(options.exit_command.as_str());
    if !options.no_banner {
        settings = settings.with_startup_text(format!(
            "Type \"help\" to list the commands, \"{}\" to leave.",
            options.exit_command
        ));
    }

    let mut sh = Interpreter::new(registry, settings)?;
    // Piped input is read line by line without the editor.
    if std::io::stdin().is_terminal() {
        let editor = EditorReader::new()
            .context("cannot open the line editor")?
            .with_history(!options.no_history);
        sh = sh.with_reader(editor);
    }
    sh.add_listener(Rc::new(LogListener));

    sh.run()?;
    Ok(())
}
