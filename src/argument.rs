use crate::error::{DefinitionError, ParseError};
use std::fmt;
use std::path::PathBuf;

/// Type a valued argument converts its text into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// Text taken as-is.
    String,
    /// 32-bit signed integer.
    Integer,
    /// 64-bit signed integer.
    Long,
    /// 64-bit floating point number. NaN and infinities are rejected.
    Decimal,
    /// A filesystem path. Nothing is checked on disk while parsing.
    FilePath,
    /// `true` (any case) or anything else for `false`.
    Boolean,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::String => "string",
            ValueType::Integer => "integer",
            ValueType::Long => "long",
            ValueType::Decimal => "decimal",
            ValueType::FilePath => "file path",
            ValueType::Boolean => "boolean",
        };
        f.write_str(name)
    }
}

/// Whether an argument is a bare switch or carries a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentKind {
    /// Present or absent, e.g. `--verbose`.
    Flag,
    /// Written as `--name=value` and converted to the given type.
    Valued(ValueType),
}

/// A typed value bound to a valued argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i32),
    Long(i64),
    Decimal(f64),
    FilePath(PathBuf),
    Boolean(bool),
}

impl Value {
    /// The type this value was parsed as.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::String(_) => ValueType::String,
            Value::Integer(_) => ValueType::Integer,
            Value::Long(_) => ValueType::Long,
            Value::Decimal(_) => ValueType::Decimal,
            Value::FilePath(_) => ValueType::FilePath,
            Value::Boolean(_) => ValueType::Boolean,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Integer(x) => Some(*x),
            _ => None,
        }
    }

    /// Integers widen to `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(x) => Some(i64::from(*x)),
            Value::Long(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Decimal(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&std::path::Path> {
        match self {
            Value::FilePath(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

/// Renders the textual form accepted back by [`ArgumentSpec::parse`].
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Integer(x) => write!(f, "{x}"),
            Value::Long(x) => write!(f, "{x}"),
            Value::Decimal(x) => write!(f, "{x}"),
            Value::FilePath(p) => write!(f, "{}", p.display()),
            Value::Boolean(b) => write!(f, "{b}"),
        }
    }
}

/// Description of one argument accepted by a command.
///
/// In the line `get --verbose --file=foo.txt`, `verbose` is a flag and `file`
/// is a valued argument. Two specs are equal when their names are equal.
#[derive(Debug, Clone)]
pub struct ArgumentSpec {
    name: String,
    kind: ArgumentKind,
    mandatory: bool,
}

impl ArgumentSpec {
    /// Create an argument of any kind.
    ///
    /// Fails when the name is blank or when a flag is declared mandatory.
    pub fn new(
        name: impl Into<String>,
        kind: ArgumentKind,
        mandatory: bool,
    ) -> Result<Self, DefinitionError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DefinitionError::BlankName("argument"));
        }
        if kind == ArgumentKind::Flag && mandatory {
            return Err(DefinitionError::MandatoryFlag(name));
        }
        Ok(Self {
            name,
            kind,
            mandatory,
        })
    }

    /// Create an optional flag argument.
    pub fn flag(name: impl Into<String>) -> Result<Self, DefinitionError> {
        Self::new(name, ArgumentKind::Flag, false)
    }

    /// Create an argument that takes a value of `value_type`.
    pub fn valued(
        name: impl Into<String>,
        value_type: ValueType,
        mandatory: bool,
    ) -> Result<Self, DefinitionError> {
        Self::new(name, ArgumentKind::Valued(value_type), mandatory)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ArgumentKind {
        self.kind
    }

    pub fn is_flag(&self) -> bool {
        self.kind == ArgumentKind::Flag
    }

    pub fn is_mandatory(&self) -> bool {
        self.mandatory
    }

    /// `None` for flags.
    pub fn value_type(&self) -> Option<ValueType> {
        match self.kind {
            ArgumentKind::Flag => None,
            ArgumentKind::Valued(t) => Some(t),
        }
    }

    /// Convert raw text into a value of the declared type.
    ///
    /// Flags have no declared type; their text is returned as a string.
    pub fn parse(&self, raw: &str) -> Result<Value, ParseError> {
        let Some(value_type) = self.value_type() else {
            return Ok(Value::String(raw.to_string()));
        };
        let fail = || ParseError {
            argument: self.name.clone(),
            raw: raw.to_string(),
            expected: value_type,
        };
        let value = match value_type {
            ValueType::String => Value::String(raw.to_string()),
            ValueType::Boolean => Value::Boolean(raw.eq_ignore_ascii_case("true")),
            ValueType::Integer => Value::Integer(raw.parse().map_err(|_| fail())?),
            ValueType::Long => Value::Long(raw.parse().map_err(|_| fail())?),
            ValueType::Decimal => {
                let x: f64 = raw.parse().map_err(|_| fail())?;
                if !x.is_finite() {
                    return Err(fail());
                }
                Value::Decimal(x)
            }
            ValueType::FilePath => Value::FilePath(PathBuf::from(raw)),
        };
        Ok(value)
    }
}

impl PartialEq for ArgumentSpec {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ArgumentSpec {}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_mandatory_flag_is_rejected() {
        let err = ArgumentSpec::new("verbose", ArgumentKind::Flag, true).unwrap_err();
        assert_eq!(err, DefinitionError::MandatoryFlag("verbose".to_string()));
    }

    #[test]
    fn test_blank_names_are_rejected() {
        assert!(ArgumentSpec::flag("").is_err());
        assert!(ArgumentSpec::valued("  ", ValueType::String, false).is_err());
    }

    #[test]
    fn test_flag_has_no_value_type() {
        let spec = ArgumentSpec::flag("verbose").unwrap();
        assert!(spec.is_flag());
        assert!(!spec.is_mandatory());
        assert_eq!(spec.value_type(), None);
    }

    #[test]
    fn test_equality_is_by_name() {
        let a = ArgumentSpec::valued("x", ValueType::Integer, true).unwrap();
        let b = ArgumentSpec::flag("x").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_integer() {
        let spec = ArgumentSpec::valued("count", ValueType::Integer, false).unwrap();
        assert_eq!(spec.parse("42").unwrap(), Value::Integer(42));
        assert_eq!(spec.parse("-7").unwrap(), Value::Integer(-7));

        let err = spec.parse("x").unwrap_err();
        assert_eq!(err.raw, "x");
        assert_eq!(err.argument, "count");
        assert_eq!(err.expected, ValueType::Integer);
    }

    #[test]
    fn test_parse_integer_overflow_fails() {
        let spec = ArgumentSpec::valued("count", ValueType::Integer, false).unwrap();
        assert!(spec.parse("3000000000").is_err());

        let spec = ArgumentSpec::valued("count", ValueType::Long, false).unwrap();
        assert_eq!(spec.parse("3000000000").unwrap(), Value::Long(3_000_000_000));
    }

    #[test]
    fn test_parse_decimal_ignores_locale() {
        let spec = ArgumentSpec::valued("ratio", ValueType::Decimal, false).unwrap();
        assert_eq!(spec.parse("0.25").unwrap(), Value::Decimal(0.25));
        assert!(spec.parse("0,25").is_err());
    }

    #[test]
    fn test_parse_decimal_rejects_non_finite() {
        let spec = ArgumentSpec::valued("ratio", ValueType::Decimal, false).unwrap();
        for raw in ["NaN", "nan", "inf", "-inf", "infinity", "Infinity", "1e400"] {
            let err = spec.parse(raw).unwrap_err();
            assert_eq!(err.raw, raw);
            assert_eq!(err.expected, ValueType::Decimal);
        }
    }

    #[test]
    fn test_parse_boolean_is_lenient() {
        let spec = ArgumentSpec::valued("on", ValueType::Boolean, false).unwrap();
        assert_eq!(spec.parse("TRUE").unwrap(), Value::Boolean(true));
        assert_eq!(spec.parse("True").unwrap(), Value::Boolean(true));
        assert_eq!(spec.parse("yes").unwrap(), Value::Boolean(false));
    }

    #[test]
    fn test_parse_file_path_does_not_touch_disk() {
        let spec = ArgumentSpec::valued("file", ValueType::FilePath, false).unwrap();
        let value = spec.parse("/definitely/not/here.txt").unwrap();
        assert_eq!(value.as_path(), Some(std::path::Path::new("/definitely/not/here.txt")));
    }

    fn reparse(spec: &ArgumentSpec, raw: &str) -> (Value, Value) {
        let first = spec.parse(raw).unwrap();
        let second = spec.parse(&first.to_string()).unwrap();
        (first, second)
    }

    proptest! {
        #[test]
        fn prop_string_round_trips(raw in "[^;:,=]+") {
            let spec = ArgumentSpec::valued("s", ValueType::String, false).unwrap();
            let (first, second) = reparse(&spec, &raw);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_integer_round_trips(x in any::<i32>()) {
            let spec = ArgumentSpec::valued("i", ValueType::Integer, false).unwrap();
            let (first, second) = reparse(&spec, &x.to_string());
            prop_assert_eq!(first, Value::Integer(x));
            prop_assert_eq!(second, Value::Integer(x));
        }

        #[test]
        fn prop_long_round_trips(x in any::<i64>()) {
            let spec = ArgumentSpec::valued("l", ValueType::Long, false).unwrap();
            let (first, second) = reparse(&spec, &x.to_string());
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_decimal_round_trips(x in -1.0e12f64..1.0e12f64) {
            let spec = ArgumentSpec::valued("d", ValueType::Decimal, false).unwrap();
            let (first, second) = reparse(&spec, &x.to_string());
            prop_assert_eq!(first, Value::Decimal(x));
            prop_assert_eq!(second, Value::Decimal(x));
        }

        #[test]
        fn prop_boolean_round_trips(raw in "[a-zA-Z]{1,6}") {
            let spec = ArgumentSpec::valued("b", ValueType::Boolean, false).unwrap();
            let (first, second) = reparse(&spec, &raw);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_file_path_round_trips_by_text(raw in "[a-z0-9_./]{1,24}") {
            let spec = ArgumentSpec::valued("p", ValueType::FilePath, false).unwrap();
            let (first, second) = reparse(&spec, &raw);
            prop_assert_eq!(first.to_string(), second.to_string());
        }
    }
}
