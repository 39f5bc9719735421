//! Expressions for weave templates.
//!
//! This crate turns the text inside templates into values:
//!
//! - [`parse_text`] compiles `Hi {{ name }}` into the expression `"Hi "+name`
//! - [`extract_dependencies`] lists the data keys an expression reads
//! - [`generate`] parses an expression into an [`Evaluator`] that runs it
//!   against a [`Data`] context

pub mod ast;
pub mod builtins;
pub mod data;
pub mod dependencies;
pub mod error;
pub mod eval;
pub mod interpolation;
pub mod lexer;
pub mod parser;
pub mod value;

pub use builtins::{Builtin, Function, Method};
pub use data::Data;
pub use dependencies::{extract_dependencies, is_global, GLOBALS};
pub use error::{
    EvalError, EvalErrorCode, EvalResult, ParseError, ParseErrorCode, ParseResult, Span,
};
pub use eval::{generate, Evaluator};
pub use interpolation::{find_interpolations, has_interpolation, parse_text, Interpolation};
pub use parser::parse_expression;
pub use value::{format_number, Object, Value};
