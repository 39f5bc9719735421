//! Free-identifier extraction.

use crate::ast::Expr;
use crate::error::ParseResult;
use crate::parser::parse_expression;
use once_cell::sync::Lazy;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;

/// Names that always resolve to the language or the built-ins, never to data.
pub const GLOBALS: &[&str] = &[
    "true",
    "false",
    "undefined",
    "null",
    "NaN",
    "Infinity",
    "isNaN",
    "typeof",
    "in",
    "decodeURI",
    "decodeURIComponent",
    "encodeURI",
    "encodeURIComponent",
    "unescape",
    "escape",
    "eval",
    "isFinite",
    "Number",
    "String",
    "parseFloat",
    "parseInt",
];

static GLOBAL_SET: Lazy<FxHashSet<&'static str>> = Lazy::new(|| GLOBALS.iter().copied().collect());

/// Check whether a name is a built-in global.
pub fn is_global(name: &str) -> bool {
    GLOBAL_SET.contains(name)
}

/// Extract the free identifiers of an expression, in first-occurrence order.
///
/// ```
/// use weave_expr::extract_dependencies;
///
/// let deps = extract_dependencies("typeof String(name) === 'string' && hello.split('')").unwrap();
/// assert_eq!(deps, ["name", "hello"]);
/// ```
pub fn extract_dependencies(source: &str) -> ParseResult<Vec<SmolStr>> {
    Ok(parse_expression(source)?.dependencies())
}

impl Expr {
    /// Free identifiers referenced by this expression, in first-occurrence
    /// order. Property names and object keys are not references.
    pub fn dependencies(&self) -> Vec<SmolStr> {
        let mut seen = FxHashSet::default();
        let mut deps = Vec::new();
        self.walk(&mut |expr| {
            if let Expr::Ident(name, _) = expr {
                if !is_global(name) && seen.insert(name.clone()) {
                    deps.push(name.clone());
                }
            }
        });
        deps
    }
}
