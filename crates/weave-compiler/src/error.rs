//! Compilation errors.

use smol_str::SmolStr;
use thiserror::Error;
use weave_expr::{EvalError, ParseError};

/// Result type for compilation.
pub type CompileResult<T> = Result<T, CompileError>;

/// A directive whose expression could not be compiled or evaluated.
///
/// Errors are not recovered: the first failing directive aborts the compile.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error("invalid expression for `{directive}` directive: {source}")]
    Parse {
        directive: SmolStr,
        expression: String,
        source: ParseError,
    },
    #[error("failed to evaluate `{directive}` directive: {source}")]
    Eval {
        directive: SmolStr,
        expression: String,
        source: EvalError,
    },
}

impl CompileError {
    /// The name of the directive that failed.
    pub fn directive(&self) -> &str {
        match self {
            Self::Parse { directive, .. } | Self::Eval { directive, .. } => directive,
        }
    }

    /// The expression source the directive was bound to.
    pub fn expression(&self) -> &str {
        match self {
            Self::Parse { expression, .. } | Self::Eval { expression, .. } => expression,
        }
    }

    /// Get the error code as a string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Parse { source, .. } => source.code.as_str(),
            Self::Eval { source, .. } => source.code.as_str(),
        }
    }
}
