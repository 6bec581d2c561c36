use crate::argument::Value;
use crate::command::CommandSpec;
use crate::error::{LineError, SyntaxError};
use crate::lexer::{self, Token};
use crate::registry::CommandRegistry;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Arguments bound for one invocation, keyed by argument name.
///
/// Only arguments written on the line are present. Flags map to `None`,
/// valued arguments to their converted value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: HashMap<String, Option<Value>>,
}

impl Arguments {
    /// True when the argument was written on the line, flag or valued.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// The value of a valued argument, `None` if absent or a flag.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name).and_then(Option::as_ref)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn get_i32(&self, name: &str) -> Option<i32> {
        self.get(name).and_then(Value::as_i32)
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_f64)
    }

    pub fn get_path(&self, name: &str) -> Option<&Path> {
        self.get(name).and_then(Value::as_path)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    fn insert(&mut self, name: &str, value: Option<Value>) -> Result<(), SyntaxError> {
        if self.values.contains_key(name) {
            return Err(SyntaxError::RepeatedArgument(name.to_string()));
        }
        self.values.insert(name.to_string(), value);
        Ok(())
    }
}

/// A parsed line: the command to run and its bound arguments.
#[derive(Debug, Clone)]
pub struct Invocation<'r> {
    command: &'r CommandSpec,
    arguments: Arguments,
}

impl<'r> Invocation<'r> {
    pub fn command(&self) -> &'r CommandSpec {
        self.command
    }

    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }
}

/// Outcome of parsing one non-empty line.
#[derive(Debug)]
pub enum ParsedLine<'r> {
    /// A registered command with its bound arguments.
    Command(Invocation<'r>),
    /// The whole line was the exit command.
    Exit(Invocation<'r>),
    /// No command is registered under this name.
    NotFound(String),
}

/// Resolves lines against a registry and an exit command.
pub struct LineParser<'r> {
    registry: &'r CommandRegistry,
    exit: &'r CommandSpec,
}

impl<'r> LineParser<'r> {
    pub fn new(registry: &'r CommandRegistry, exit: &'r CommandSpec) -> Self {
        Self { registry, exit }
    }

    /// Parse a line into an invocation.
    ///
    /// The line is trimmed first; callers skip lines that are empty after
    /// trimming.
    pub fn parse(&self, line: &str) -> Result<ParsedLine<'r>, LineError> {
        let line = line.trim();
        let name = lexer::extract_command_name(line);

        if self.exit.matches_name(line) {
            debug!(command = self.exit.name(), "exit command requested");
            return Ok(ParsedLine::Exit(Invocation {
                command: self.exit,
                arguments: Arguments::default(),
            }));
        }

        let Some(command) = self.registry.get(name) else {
            debug!(command = name, "command not found");
            return Ok(ParsedLine::NotFound(name.to_string()));
        };

        let tokens = lexer::split_into_tokens(&line[name.len()..])?;
        let arguments = bind(command, tokens)?;
        debug!(command = name, arguments = arguments.len(), "line bound");

        Ok(ParsedLine::Command(Invocation { command, arguments }))
    }
}

/// Check tokens against the command's declared arguments and convert values.
fn bind(command: &CommandSpec, tokens: Vec<Token>) -> Result<Arguments, LineError> {
    if !command.has_arguments() && !tokens.is_empty() {
        return Err(SyntaxError::ArgumentsNotAccepted.into());
    }

    let mut arguments = Arguments::default();

    for token in tokens {
        let spec = command
            .argument(token.name())
            .ok_or_else(|| SyntaxError::UnknownArgument(token.name().to_string()))?;

        match token {
            Token::Valued { name, value } => {
                if spec.is_flag() {
                    return Err(SyntaxError::FlagWithValue(name).into());
                }
                let parsed = spec.parse(&value)?;
                arguments.insert(&name, Some(parsed))?;
            }
            Token::Flag(name) => {
                if !spec.is_flag() {
                    return Err(SyntaxError::MissingValue(name).into());
                }
                arguments.insert(&name, None)?;
            }
        }
    }

    if let Some(missing) = command
        .mandatory_arguments()
        .into_iter()
        .find(|spec| !arguments.contains(spec.name()))
    {
        return Err(SyntaxError::MissingMandatory(missing.name().to_string()).into());
    }

    Ok(arguments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::{ArgumentSpec, ValueType};
    use crate::env::ExecutionContext;
    use crate::error::ParseError;

    fn noop(_args: &Arguments, _ctx: &mut ExecutionContext<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    fn registry() -> CommandRegistry {
        let mut registry = CommandRegistry::new();
        registry
            .register(
                CommandSpec::new("greet", noop)
                    .unwrap()
                    .with_argument(ArgumentSpec::valued("name", ValueType::String, true).unwrap())
                    .unwrap()
                    .with_argument(ArgumentSpec::flag("loud").unwrap())
                    .unwrap()
                    .with_argument(ArgumentSpec::valued("times", ValueType::Integer, false).unwrap())
                    .unwrap(),
            )
            .unwrap();
        registry
            .register(CommandSpec::new("ping", noop).unwrap())
            .unwrap();
        registry
    }

    fn exit() -> CommandSpec {
        CommandSpec::new("exit", noop).unwrap()
    }

    fn bound<'r>(parsed: ParsedLine<'r>) -> Invocation<'r> {
        match parsed {
            ParsedLine::Command(invocation) => invocation,
            other => panic!("expected a command, got {other:?}"),
        }
    }

    #[test]
    fn test_mandatory_value_is_bound() {
        let (registry, exit) = (registry(), exit());
        let parser = LineParser::new(&registry, &exit);

        let invocation = bound(parser.parse("greet --name=Ada").unwrap());
        assert_eq!(invocation.command().name(), "greet");
        assert_eq!(invocation.arguments().get_str("name"), Some("Ada"));
        assert_eq!(invocation.arguments().len(), 1);
    }

    #[test]
    fn test_missing_mandatory_is_named() {
        let (registry, exit) = (registry(), exit());
        let parser = LineParser::new(&registry, &exit);

        let err = parser.parse("greet").unwrap_err();
        assert_eq!(
            err,
            LineError::Syntax(SyntaxError::MissingMandatory("name".to_string()))
        );

        let err = parser.parse("greet --loud").unwrap_err();
        assert_eq!(
            err,
            LineError::Syntax(SyntaxError::MissingMandatory("name".to_string()))
        );
    }

    #[test]
    fn test_flags_bind_without_value() {
        let (registry, exit) = (registry(), exit());
        let parser = LineParser::new(&registry, &exit);

        let invocation = bound(parser.parse("greet --loud --name=Ada --times=3").unwrap());
        let args = invocation.arguments();
        assert!(args.contains("loud"));
        assert_eq!(args.get("loud"), None);
        assert_eq!(args.get_i32("times"), Some(3));
    }

    #[test]
    fn test_zero_argument_command() {
        let (registry, exit) = (registry(), exit());
        let parser = LineParser::new(&registry, &exit);

        let invocation = bound(parser.parse("ping").unwrap());
        assert!(invocation.arguments().is_empty());

        let err = parser.parse("ping --x").unwrap_err();
        assert_eq!(err, LineError::Syntax(SyntaxError::ArgumentsNotAccepted));
        assert!(err.to_string().contains("does not accept arguments"));
    }

    #[test]
    fn test_unknown_command_is_not_an_error() {
        let (registry, exit) = (registry(), exit());
        let parser = LineParser::new(&registry, &exit);

        match parser.parse("launch --now").unwrap() {
            ParsedLine::NotFound(name) => assert_eq!(name, "launch"),
            other => panic!("expected not found, got {other:?}"),
        }
    }

    #[test]
    fn test_exit_needs_the_whole_line() {
        let (registry, exit) = (registry(), exit());
        let parser = LineParser::new(&registry, &exit);

        assert!(matches!(parser.parse("  exit  ").unwrap(), ParsedLine::Exit(_)));
        assert!(matches!(
            parser.parse("exit --now").unwrap(),
            ParsedLine::NotFound(_)
        ));
    }

    #[test]
    fn test_argument_mismatches() {
        let (registry, exit) = (registry(), exit());
        let parser = LineParser::new(&registry, &exit);

        assert_eq!(
            parser.parse("greet --name=Ada --color=red").unwrap_err(),
            LineError::Syntax(SyntaxError::UnknownArgument("color".to_string()))
        );
        assert_eq!(
            parser.parse("greet --name=Ada --loud=yes").unwrap_err(),
            LineError::Syntax(SyntaxError::FlagWithValue("loud".to_string()))
        );
        assert_eq!(
            parser.parse("greet --name").unwrap_err(),
            LineError::Syntax(SyntaxError::MissingValue("name".to_string()))
        );
        assert_eq!(
            parser.parse("greet --name=Ada --name=Bob").unwrap_err(),
            LineError::Syntax(SyntaxError::RepeatedArgument("name".to_string()))
        );
    }

    #[test]
    fn test_bad_value_reports_parse_error() {
        let (registry, exit) = (registry(), exit());
        let parser = LineParser::new(&registry, &exit);

        let err = parser.parse("greet --name=Ada --times=many").unwrap_err();
        assert_eq!(
            err,
            LineError::Parse(ParseError {
                argument: "times".to_string(),
                raw: "many".to_string(),
                expected: ValueType::Integer,
            })
        );
    }

    #[test]
    fn test_malformed_and_stray_tokens() {
        let (registry, exit) = (registry(), exit());
        let parser = LineParser::new(&registry, &exit);

        assert!(matches!(
            parser.parse("greet --name=a=b").unwrap_err(),
            LineError::Syntax(SyntaxError::MalformedToken(_))
        ));
        assert!(matches!(
            parser.parse("greet name=Ada").unwrap_err(),
            LineError::Syntax(SyntaxError::StrayText(_))
        ));
    }

    #[test]
    fn test_bound_values_reparse_to_the_same_value() {
        let (registry, exit) = (registry(), exit());
        let parser = LineParser::new(&registry, &exit);

        let invocation = bound(parser.parse("greet --name=Ada Lovelace --times=-12").unwrap());
        let command = invocation.command();
        for (name, value) in invocation.arguments().iter() {
            let value = value.unwrap();
            let spec = command.argument(name).unwrap();
            assert_eq!(&spec.parse(&value.to_string()).unwrap(), value);
        }
    }
}
