//! Expression evaluation.

use crate::ast::{BinaryOp, Expr, Literal, LogicalOp, UnaryOp};
use crate::builtins::{Builtin, Function};
use crate::data::Data;
use crate::error::{EvalError, EvalResult, ParseResult};
use crate::parser::parse_expression;
use crate::value::{Object, Value};
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use std::cmp::Ordering;

/// Parse an expression once and return a reusable evaluator.
///
/// ```
/// use weave_expr::{generate, Data, Value};
///
/// let greet = generate(r#""Hi "+user.name"#).unwrap();
/// let data = Data::from(serde_json::json!({ "user": { "name": "Ada" } }));
/// assert_eq!(greet.call(&data).unwrap(), Value::from("Hi Ada"));
/// ```
pub fn generate(source: &str) -> ParseResult<Evaluator> {
    let expr = parse_expression(source)?;
    let dependencies = expr.dependencies();
    tracing::trace!(expression = source, ?dependencies, "generated evaluator");
    Ok(Evaluator {
        source: source.to_string(),
        expr,
        dependencies,
    })
}

/// A parsed expression and the data keys it reads.
#[derive(Debug, Clone)]
pub struct Evaluator {
    source: String,
    expr: Expr,
    dependencies: Vec<SmolStr>,
}

impl Evaluator {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Free identifiers, in first-occurrence order.
    pub fn dependencies(&self) -> &[SmolStr] {
        &self.dependencies
    }

    /// Evaluate against a data context. Each dependency is bound to the
    /// context's value for that key, or `undefined` when the key is absent.
    pub fn call(&self, data: &Data) -> EvalResult<Value> {
        let locals: FxHashMap<&str, Value> = self
            .dependencies
            .iter()
            .map(|name| (name.as_str(), data.lookup(name)))
            .collect();
        let scope = Scope {
            source: &self.source,
            locals,
        };
        scope.eval(&self.expr)
    }
}

struct Scope<'a> {
    source: &'a str,
    locals: FxHashMap<&'a str, Value>,
}

impl Scope<'_> {
    fn resolve(&self, name: &str) -> Value {
        if let Some(value) = self.locals.get(name) {
            return value.clone();
        }
        match name {
            "NaN" => Value::Number(f64::NAN),
            "Infinity" => Value::Number(f64::INFINITY),
            _ => Builtin::from_name(name)
                .map(|builtin| Value::Function(Function::Builtin(builtin)))
                .unwrap_or_default(),
        }
    }

    fn eval(&self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Literal(literal) => Ok(match literal {
                Literal::Number(n) => Value::Number(*n),
                Literal::String(s) => Value::String(s.clone()),
                Literal::Bool(b) => Value::Bool(*b),
                Literal::Null => Value::Null,
                Literal::Undefined => Value::Undefined,
            }),
            Expr::Ident(name, _) => Ok(self.resolve(name)),
            Expr::Array(items) => items
                .iter()
                .map(|item| self.eval(item))
                .collect::<EvalResult<Vec<_>>>()
                .map(Value::Array),
            Expr::Object(props) => {
                let mut object = Object::default();
                for prop in props {
                    object.insert(prop.key.clone(), self.eval(&prop.value)?);
                }
                Ok(Value::Object(object))
            }
            Expr::Member { object, property } => self.eval(object)?.get_property(property),
            Expr::Index { object, index } => {
                let object = self.eval(object)?;
                let key = self.eval(index)?.to_property_key();
                object.get_property(&key)
            }
            Expr::Call { callee, args, span } => {
                let function = self.eval(callee)?;
                let args = args
                    .iter()
                    .map(|arg| self.eval(arg))
                    .collect::<EvalResult<Vec<_>>>()?;
                match function {
                    Value::Function(function) => function.call(&args),
                    _ => {
                        let callee_text = match callee.as_ref() {
                            Expr::Ident(name, _) => name.to_string(),
                            _ => span.slice(self.source).to_string(),
                        };
                        Err(EvalError::type_error(format!(
                            "{} is not a function",
                            callee_text
                        )))
                    }
                }
            }
            Expr::Unary { op, operand } => {
                let value = self.eval(operand)?;
                Ok(match op {
                    UnaryOp::Not => Value::Bool(!value.is_truthy()),
                    UnaryOp::Neg => Value::Number(-value.to_number()),
                    UnaryOp::Plus => Value::Number(value.to_number()),
                    UnaryOp::Typeof => Value::String(value.type_of().to_string()),
                })
            }
            Expr::Binary { op, left, right } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                binary(*op, &left, &right)
            }
            Expr::Logical { op, left, right } => {
                let left = self.eval(left)?;
                let short_circuit = match op {
                    LogicalOp::And => !left.is_truthy(),
                    LogicalOp::Or => left.is_truthy(),
                    LogicalOp::Nullish => !left.is_nullish(),
                };
                if short_circuit {
                    Ok(left)
                } else {
                    self.eval(right)
                }
            }
            Expr::Conditional {
                test,
                consequent,
                alternate,
            } => {
                if self.eval(test)?.is_truthy() {
                    self.eval(consequent)
                } else {
                    self.eval(alternate)
                }
            }
        }
    }
}

fn binary(op: BinaryOp, left: &Value, right: &Value) -> EvalResult<Value> {
    let number = |f: fn(f64, f64) -> f64| Value::Number(f(left.to_number(), right.to_number()));
    let ordering = |accept: fn(Ordering) -> bool| {
        Value::Bool(left.compare(right).is_some_and(accept))
    };
    Ok(match op {
        BinaryOp::Add => left.add(right),
        BinaryOp::Sub => number(|a, b| a - b),
        BinaryOp::Mul => number(|a, b| a * b),
        BinaryOp::Div => number(|a, b| a / b),
        BinaryOp::Rem => number(|a, b| a % b),
        BinaryOp::Lt => ordering(Ordering::is_lt),
        BinaryOp::Gt => ordering(Ordering::is_gt),
        BinaryOp::LtEq => ordering(Ordering::is_le),
        BinaryOp::GtEq => ordering(Ordering::is_ge),
        BinaryOp::Eq => Value::Bool(left.loose_eq(right)),
        BinaryOp::NotEq => Value::Bool(!left.loose_eq(right)),
        BinaryOp::StrictEq => Value::Bool(left.strict_eq(right)),
        BinaryOp::StrictNotEq => Value::Bool(!left.strict_eq(right)),
        BinaryOp::In => Value::Bool(right.has_property(left)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvalErrorCode;
    use crate::interpolation::parse_text;
    use serde_json::json;

    fn eval(source: &str, data: serde_json::Value) -> Value {
        generate(source).unwrap().call(&Data::from(data)).unwrap()
    }

    #[test]
    fn test_plain_text_round_trips() {
        for text in ["plain", r#"say "hi""#, r"back\slash", "tab\tand\nnewline", "", "{{ open"] {
            let value = eval(&parse_text(text), json!({}));
            assert_eq!(value, Value::from(text), "text: {:?}", text);
        }
    }

    #[test]
    fn test_interpolated_text() {
        let value = eval(&parse_text("Hi {{ a }}, {{ b }} end"), json!({ "a": 1, "b": 2 }));
        assert_eq!(value, Value::from("Hi 1, 2 end"));
    }

    #[test]
    fn test_absent_dependency_is_undefined() {
        assert_eq!(eval("missing", json!({})), Value::Undefined);
        assert_eq!(eval("typeof missing", json!({})), Value::from("undefined"));
        assert_eq!(eval("missing ?? 'fallback'", json!({})), Value::from("fallback"));
    }

    #[test]
    fn test_globals_resolve_to_builtins() {
        let value = eval(
            "typeof String(name) === 'string' && hello.split('')",
            json!({ "name": 7, "hello": "hi" }),
        );
        assert_eq!(value, Value::Array(vec![Value::from("h"), Value::from("i")]));
        assert_eq!(eval("isNaN(parseInt(x))", json!({ "x": "abc" })), Value::from(true));
    }

    #[test]
    fn test_operators() {
        let data = json!({ "n": 5, "s": "5", "list": [1, 2, 3], "obj": { "k": true } });
        assert_eq!(eval("n * 2 + 1", data.clone()), Value::from(11));
        assert_eq!(eval("n % 3", data.clone()), Value::from(2));
        assert_eq!(eval("n == s", data.clone()), Value::from(true));
        assert_eq!(eval("n === s", data.clone()), Value::from(false));
        assert_eq!(eval("n > 3 ? 'big' : 'small'", data.clone()), Value::from("big"));
        assert_eq!(eval("list.length", data.clone()), Value::from(3));
        assert_eq!(eval("list[1] + list[2]", data.clone()), Value::from(5));
        assert_eq!(eval("'k' in obj", data.clone()), Value::from(true));
        assert_eq!(eval("!obj.k || n", data.clone()), Value::from(5));
        assert_eq!(eval("'a' < 'b'", data.clone()), Value::from(true));
        assert_eq!(eval("NaN < 1", data), Value::from(false));
    }

    #[test]
    fn test_object_and_array_literals() {
        let value = eval("{ label: title, count, tags: [1, 'x'] }", json!({ "title": "T", "count": 2 }));
        assert_eq!(
            value,
            Value::from(json!({ "label": "T", "count": 2, "tags": [1, "x"] }))
        );
    }

    #[test]
    fn test_type_errors() {
        let err = generate("user.name")
            .unwrap()
            .call(&Data::new())
            .unwrap_err();
        assert_eq!(err.code, EvalErrorCode::TypeError);

        let err = generate("items.nope()")
            .unwrap()
            .call(&Data::from(json!({ "items": [] })))
            .unwrap_err();
        assert_eq!(err.message, "items.nope is not a function");

        let err = generate("eval('1')").unwrap().call(&Data::new()).unwrap_err();
        assert_eq!(err.code, EvalErrorCode::Unsupported);
    }

    #[test]
    fn test_dependencies_exposed() {
        let evaluator = generate(r#""x"+a.b+c"#).unwrap();
        assert_eq!(evaluator.dependencies(), ["a", "c"]);
        assert_eq!(evaluator.source(), r#""x"+a.b+c"#);
    }
}
