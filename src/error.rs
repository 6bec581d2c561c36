use crate::argument::ValueType;
use thiserror::Error;

/// Mistakes made while declaring commands and arguments.
///
/// These are raised eagerly while the host application builds its command set
/// and are the only errors that leave the shell. Everything a user can cause by
/// typing a line is reported through [`LineError`] or [`ExecutionError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// An argument or command name was empty or made only of whitespace.
    #[error("{0} name can't be empty or blank")]
    BlankName(&'static str),

    /// A flag argument was declared mandatory.
    #[error("flag argument \"{0}\" can't be mandatory")]
    MandatoryFlag(String),

    /// The command already declares an argument with this name.
    #[error("argument \"{argument}\" is already declared by command \"{command}\"")]
    DuplicateArgument { command: String, argument: String },

    /// The registry already holds a command with this name.
    #[error("command \"{0}\" is already registered")]
    DuplicateCommand(String),

    /// A registered command shadows the exit command.
    #[error("command name \"{0}\" is reserved for the exit command")]
    ReservedName(String),
}

/// A line that does not fit the grammar or the target command's arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    /// A token is neither `name` nor `name=value`.
    #[error("You inserted too many characters in \"{0}\"")]
    MalformedToken(String),

    /// Text sits between the command name and the first `--` separator.
    #[error("Unexpected text \"{0}\": arguments must start with \"--\"")]
    StrayText(String),

    /// Tokens were given to a command that declares no arguments.
    #[error("This command does not accept arguments!")]
    ArgumentsNotAccepted,

    /// The command does not declare an argument with this name.
    #[error("The parameter \"{0}\" is not accepted by this command")]
    UnknownArgument(String),

    /// A value was bound to a flag argument.
    #[error("The parameter \"{0}\" does not accept values!")]
    FlagWithValue(String),

    /// A valued argument was written without a value.
    #[error("The parameter \"{0}\" must accept values!")]
    MissingValue(String),

    /// The same argument appeared twice on one line.
    #[error("The parameter \"{0}\" was given more than once")]
    RepeatedArgument(String),

    /// A mandatory argument is absent.
    #[error("You have missed the mandatory parameter \"{0}\"")]
    MissingMandatory(String),
}

/// A value that could not be converted into its declared type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cannot parse \"{raw}\" as {expected} for parameter \"{argument}\"")]
pub struct ParseError {
    /// Name of the argument being bound.
    pub argument: String,
    /// The text as typed on the line.
    pub raw: String,
    /// The type the text should have converted to.
    pub expected: ValueType,
}

/// Recoverable failure of the parse/bind stage for one line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// A command's action returned an error.
#[derive(Debug, Error)]
#[error("command \"{command}\" failed: {source:#}")]
pub struct ExecutionError {
    /// Name of the command that failed.
    pub command: String,
    #[source]
    pub source: anyhow::Error,
}
