//! Error types for expression parsing and evaluation.

use std::fmt;
use std::ops::Range;
use thiserror::Error;

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Result type for evaluation.
pub type EvalResult<T> = Result<T, EvalError>;

/// A byte range in an expression string, half-open [start, end).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn from_range(range: Range<usize>) -> Self {
        Self {
            start: range.start as u32,
            end: range.end as u32,
        }
    }

    /// Merge two spans into one that covers both.
    #[inline]
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    #[inline]
    pub fn to_range(self) -> Range<usize> {
        self.start as usize..self.end as usize
    }

    /// The text this span covers, or `""` if it is out of bounds.
    pub fn slice(self, source: &str) -> &str {
        source.get(self.to_range()).unwrap_or("")
    }
}

/// An expression that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    /// The error message.
    pub message: String,
    /// The span where the error occurred.
    pub span: Span,
    /// The error code.
    pub code: ParseErrorCode,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span, code: ParseErrorCode) -> Self {
        Self {
            message: message.into(),
            span,
            code,
        }
    }

    pub fn unexpected_token(expected: &str, found: &str, span: Span) -> Self {
        Self::new(
            format!("Expected {}, found {}", expected, found),
            span,
            ParseErrorCode::UnexpectedToken,
        )
    }

    pub fn unexpected_end(expected: &str, span: Span) -> Self {
        Self::new(
            format!("Expected {}, found end of expression", expected),
            span,
            ParseErrorCode::UnexpectedEnd,
        )
    }

    pub fn unterminated_string(span: Span) -> Self {
        Self::new(
            "Unterminated string literal",
            span,
            ParseErrorCode::UnterminatedString,
        )
    }

    pub fn invalid_number(text: &str, span: Span) -> Self {
        Self::new(
            format!("Invalid number: {}", text),
            span,
            ParseErrorCode::InvalidNumber,
        )
    }

    pub fn invalid_character(c: char, span: Span) -> Self {
        Self::new(
            format!("Invalid character: {:?}", c),
            span,
            ParseErrorCode::InvalidCharacter,
        )
    }
}

/// Error codes for expression parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorCode {
    UnexpectedToken,
    UnexpectedEnd,
    UnterminatedString,
    InvalidNumber,
    InvalidCharacter,
}

impl ParseErrorCode {
    /// Get the error code as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnexpectedToken => "unexpected-token",
            Self::UnexpectedEnd => "unexpected-end",
            Self::UnterminatedString => "unterminated-string",
            Self::InvalidNumber => "invalid-number",
            Self::InvalidCharacter => "invalid-character",
        }
    }
}

impl fmt::Display for ParseErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A failure while evaluating a well-formed expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct EvalError {
    /// The error message.
    pub message: String,
    /// The error code.
    pub code: EvalErrorCode,
}

impl EvalError {
    pub fn new(message: impl Into<String>, code: EvalErrorCode) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(message, EvalErrorCode::TypeError)
    }

    pub fn uri_error() -> Self {
        Self::new("URI malformed", EvalErrorCode::UriError)
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::new(message, EvalErrorCode::Unsupported)
    }
}

/// Error codes for evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvalErrorCode {
    /// An operation was applied to a value of the wrong type.
    TypeError,
    /// A percent-encoded string could not be decoded.
    UriError,
    /// The expression uses something this evaluator refuses to run.
    Unsupported,
}

impl EvalErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TypeError => "type-error",
            Self::UriError => "uri-error",
            Self::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for EvalErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
