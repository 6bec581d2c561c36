//! Splitting a command line into the command name and its argument tokens.
//!
//! Arguments are separated by a whitespace character followed by two dashes,
//! so a line reads `name --flag --key=value`. The characters `;`, `:`, `,` and
//! `=` are reserved: none may appear in a token except the single `=` that
//! separates a name from its value.

use crate::error::SyntaxError;
use regex::Regex;
use std::sync::LazyLock;

static SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s--").expect("valid regex"));
static VALUED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^;:,=]+)=([^;:,=]+)$").expect("valid regex"));
static FLAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^;:,=]+$").expect("valid regex"));

/// One argument as written on the line, before it is checked against a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `--name`
    Flag(String),
    /// `--name=value`
    Valued { name: String, value: String },
}

impl Token {
    pub fn name(&self) -> &str {
        match self {
            Token::Flag(name) => name,
            Token::Valued { name, .. } => name,
        }
    }
}

/// The command name: everything before the first whitespace character.
pub fn extract_command_name(line: &str) -> &str {
    match line.find(char::is_whitespace) {
        Some(end) => &line[..end],
        None => line,
    }
}

/// Split what follows the command name into tokens.
///
/// Text in front of the first separator must be blank, otherwise
/// `greet name=Ada` would silently turn into an argument called ` name`.
pub fn split_into_tokens(remainder: &str) -> Result<Vec<Token>, SyntaxError> {
    let mut segments = SEPARATOR.split(remainder);

    if let Some(head) = segments.next() {
        let head = head.trim();
        if !head.is_empty() {
            return Err(SyntaxError::StrayText(head.to_string()));
        }
    }

    segments
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(classify)
        .collect()
}

fn classify(segment: &str) -> Result<Token, SyntaxError> {
    if let Some(caps) = VALUED.captures(segment) {
        return Ok(Token::Valued {
            name: caps[1].to_string(),
            value: caps[2].to_string(),
        });
    }
    if FLAG.is_match(segment) {
        return Ok(Token::Flag(segment.to_string()));
    }
    Err(SyntaxError::MalformedToken(segment.to_string()))
}
