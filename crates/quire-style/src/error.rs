//! Error taxonomy
//!
//! Parsing never fails as a whole: every problem is recorded as a [`ParseError`]
//! in the stylesheet's error log and parsing resumes at the next recoverable point.
//! [`StyleError`] is reserved for APIs that are allowed to fail.

use serde::{Serialize, Serializer};

/// Failure converting one raw declaration value into a typed value
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValueError {
    #[error("invalid unit '{0}'")]
    InvalidUnit(String),

    #[error("invalid color '{0}'")]
    InvalidColor(String),

    #[error("invalid url '{0}'")]
    InvalidUrl(String),

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("'{value}' is not a valid keyword for {property}")]
    UnknownKeyword { property: String, value: String },

    #[error("expected {expected} value(s) but found {found}")]
    PartCount { expected: &'static str, found: usize },

    #[error("unrecognised value part '{0}'")]
    UnexpectedPart(String),

    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Failure while splitting a rule body into declarations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("declaration '{0}' has no ':' separator")]
    MissingColon(String),

    #[error("unterminated {quote} quote")]
    UnterminatedQuote { quote: char },

    #[error("unbalanced parentheses")]
    UnbalancedParentheses,
}

/// Failure compiling selector text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("'>' must sit between two compounds")]
    DanglingCombinator,

    #[error("unsupported character '{0}'")]
    InvalidCharacter(char),

    #[error("'{0}' must be followed by a name")]
    MissingName(char),

    #[error("a compound can only carry one id")]
    DuplicateId,

    #[error("unsupported pseudo selector '{0}'")]
    UnsupportedPseudo(String),
}

/// The cause of a rule-scoped parse failure
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("could not parse value of '{property}': {source}")]
    Value {
        property: String,
        #[source]
        source: ValueError,
    },

    #[error("'{0}' has no value")]
    MissingValue(String),

    #[error("malformed value '{value}' for {property}")]
    MalformedValue { property: String, value: String },

    #[error("declaration has no property name")]
    EmptyName,

    #[error("statement is not followed by a block")]
    MissingBlock,

    #[error("block is missing its closing brace")]
    UnterminatedBlock,

    #[error("unbalanced braces in nested block")]
    UnbalancedBraces,

    #[error("unexpected '}}'")]
    UnexpectedCloseBrace,

    #[error("nesting deeper than {limit} levels")]
    NestingTooDeep { limit: usize },

    #[error("rule limit of {limit} reached")]
    TooManyRules { limit: usize },

    #[error("invalid selector: {0}")]
    InvalidSelector(#[from] SelectorError),

    #[error("variables can only be declared on style definitions")]
    MisplacedVariable,
}

/// One entry in a stylesheet's error log
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error("{context} (offset {offset}): {kind}")]
pub struct ParseError {
    /// Byte offset into the stylesheet text
    pub offset: usize,
    /// Selector, predicate or declaration text the error belongs to
    pub context: String,
    /// What went wrong
    #[serde(rename = "cause", serialize_with = "serialize_display")]
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(offset: usize, context: impl Into<String>, kind: impl Into<ParseErrorKind>) -> Self {
        Self {
            offset,
            context: context.into(),
            kind: kind.into(),
        }
    }
}

fn serialize_display<S: Serializer>(kind: &ParseErrorKind, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(kind)
}

/// Crate-level error
#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    #[error("stylesheet has {count} error(s), first: {first}")]
    Conformance { count: usize, first: ParseError },

    #[error("invalid property registration: {0}")]
    Registry(String),
}

pub type Result<T> = std::result::Result<T, StyleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new(12, ".a", ParseErrorKind::MissingValue("color".into()));
        assert_eq!(err.to_string(), ".a (offset 12): 'color' has no value");
    }

    #[test]
    fn test_parse_error_serializes_cause_as_text() {
        let err = ParseError::new(3, "div >", SelectorError::DanglingCombinator);
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["offset"], 3);
        assert_eq!(json["context"], "div >");
        assert_eq!(json["cause"], "invalid selector: '>' must sit between two compounds");
    }

    #[test]
    fn test_value_error_wraps_token_error() {
        let err: ValueError = TokenError::UnbalancedParentheses.into();
        assert_eq!(err.to_string(), "unbalanced parentheses");
    }
}
