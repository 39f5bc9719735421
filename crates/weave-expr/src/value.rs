//! Runtime values.
//!
//! Values follow the loose typing rules template authors expect from
//! JavaScript: string concatenation with `+`, truthiness, `typeof`, and
//! number formatting that prints `1` rather than `1.0`.

use crate::builtins::{Function, Method};
use crate::error::{EvalError, EvalResult};
use indexmap::IndexMap;
use smol_str::SmolStr;
use std::cmp::Ordering;
use std::fmt;

/// An object's properties, in insertion order.
pub type Object = IndexMap<SmolStr, Value>;

/// A runtime value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(Object),
    Function(Function),
}

impl Value {
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) | Value::Function(_) => true,
        }
    }

    /// The `typeof` string.
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null | Value::Array(_) | Value::Object(_) => "object",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Function(_) => "function",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Numeric conversion.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Number(n) => *n,
            Value::String(s) => string_to_number(s),
            Value::Array(_) => string_to_number(&self.to_js_string()),
            Value::Object(_) | Value::Function(_) => f64::NAN,
        }
    }

    /// String conversion.
    pub fn to_js_string(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.clone(),
            Value::Array(items) => join(items, ","),
            Value::Object(_) => "[object Object]".to_string(),
            Value::Function(f) => format!("function {}() {{ [native code] }}", f.name()),
        }
    }

    /// `===`. Arrays and objects compare by contents.
    pub fn strict_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            _ => self == other,
        }
    }

    /// `==`.
    pub fn loose_eq(&self, other: &Value) -> bool {
        use Value::*;
        match (self, other) {
            (Undefined | Null, Undefined | Null) => true,
            (Undefined | Null, _) | (_, Undefined | Null) => false,
            (Number(_), String(_)) | (String(_), Number(_)) => {
                self.to_number() == other.to_number()
            }
            (Bool(_), _) => Number(self.to_number()).loose_eq(other),
            (_, Bool(_)) => self.loose_eq(&Number(other.to_number())),
            (Array(_) | Object(_), Number(_) | String(_)) => {
                String(self.to_js_string()).loose_eq(other)
            }
            (Number(_) | String(_), Array(_) | Object(_)) => {
                self.loose_eq(&String(other.to_js_string()))
            }
            _ => self.strict_eq(other),
        }
    }

    /// `+`: concatenates when either side converts to a string.
    pub fn add(&self, other: &Value) -> Value {
        let stringy = |v: &Value| {
            matches!(
                v,
                Value::String(_) | Value::Array(_) | Value::Object(_) | Value::Function(_)
            )
        };
        if stringy(self) || stringy(other) {
            let mut out = self.to_js_string();
            out.push_str(&other.to_js_string());
            Value::String(out)
        } else {
            Value::Number(self.to_number() + other.to_number())
        }
    }

    /// Relational comparison. `None` when either side is `NaN`.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            _ => self.to_number().partial_cmp(&other.to_number()),
        }
    }

    /// Read a property. Reading from `undefined` or `null` is a type error.
    pub fn get_property(&self, key: &str) -> EvalResult<Value> {
        match self {
            Value::Undefined | Value::Null => Err(EvalError::type_error(format!(
                "Cannot read properties of {} (reading '{}')",
                self.to_js_string(),
                key
            ))),
            Value::String(s) => {
                if key == "length" {
                    return Ok(Value::Number(s.chars().count() as f64));
                }
                if let Some(index) = array_index(key) {
                    return Ok(s
                        .chars()
                        .nth(index)
                        .map(|c| Value::String(c.to_string()))
                        .unwrap_or_default());
                }
                Ok(self.bound_method(key))
            }
            Value::Array(items) => {
                if key == "length" {
                    return Ok(Value::Number(items.len() as f64));
                }
                if let Some(index) = array_index(key) {
                    return Ok(items.get(index).cloned().unwrap_or_default());
                }
                Ok(self.bound_method(key))
            }
            Value::Object(props) => match props.get(key) {
                Some(value) => Ok(value.clone()),
                None => Ok(self.bound_method(key)),
            },
            Value::Bool(_) | Value::Number(_) => Ok(self.bound_method(key)),
            Value::Function(f) => Ok(match key {
                "name" => Value::String(f.name().to_string()),
                _ => Value::Undefined,
            }),
        }
    }

    fn bound_method(&self, key: &str) -> Value {
        match Method::lookup(self, key) {
            Some(method) => Value::Function(Function::Method {
                receiver: Box::new(self.clone()),
                method,
            }),
            None => Value::Undefined,
        }
    }

    /// `key in self`.
    pub fn has_property(&self, key: &Value) -> EvalResult<bool> {
        let key = key.to_property_key();
        match self {
            Value::Object(props) => Ok(props.contains_key(key.as_str())),
            Value::Array(items) => Ok(key == "length"
                || array_index(&key).is_some_and(|index| index < items.len())),
            _ => Err(EvalError::type_error(format!(
                "Cannot use 'in' operator to search for '{}' in {}",
                key,
                self.to_js_string()
            ))),
        }
    }

    /// The property name a value denotes inside `[...]`.
    pub fn to_property_key(&self) -> String {
        self.to_js_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_js_string())
    }
}

/// Join array items the way `Array.prototype.join` does.
pub fn join(items: &[Value], separator: &str) -> String {
    items
        .iter()
        .map(|item| match item {
            Value::Undefined | Value::Null => String::new(),
            other => other.to_js_string(),
        })
        .collect::<Vec<_>>()
        .join(separator)
}

/// A canonical array index: digits only, no leading zeros.
fn array_index(key: &str) -> Option<usize> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    if !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}

/// String to number conversion: surrounding whitespace is ignored, the empty
/// string is zero, anything malformed is `NaN`.
pub fn string_to_number(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }

    let (sign, unsigned) = match s.as_bytes()[0] {
        b'-' => (-1.0, &s[1..]),
        b'+' => (1.0, &s[1..]),
        _ => (1.0, s),
    };

    if unsigned == "Infinity" {
        return sign * f64::INFINITY;
    }

    if let Some(hex) = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
    {
        // Signed hex is not a number.
        if sign < 0.0 || s.starts_with('+') || hex.is_empty() {
            return f64::NAN;
        }
        return u64::from_str_radix(hex, 16)
            .map(|n| n as f64)
            .unwrap_or(f64::NAN);
    }

    if unsigned.starts_with(|c: char| c == '+' || c == '-') {
        return f64::NAN;
    }
    let valid = unsigned
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if !valid || !unsigned.bytes().any(|b| b.is_ascii_digit()) {
        return f64::NAN;
    }
    unsigned
        .parse::<f64>()
        .map(|n| sign * n)
        .unwrap_or(f64::NAN)
}

/// Format a number the way template output expects: integral values without
/// a fraction, shortest round-trip digits, exponent form only for very large
/// or very small magnitudes.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let sign = if n < 0.0 { "-" } else { "" };
    let sci = format!("{:e}", n.abs());
    let Some((mantissa, exponent)) = sci.split_once('e') else {
        return n.to_string();
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return n.to_string();
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    // Position of the decimal point relative to the first digit.
    let point = exponent + 1;

    let body = if k <= point && point <= 21 {
        format!("{}{}", digits, "0".repeat((point - k) as usize))
    } else if 0 < point && point <= 21 {
        let (int, frac) = digits.split_at(point as usize);
        format!("{}.{}", int, frac)
    } else if -6 < point && point <= 0 {
        format!("0.{}{}", "0".repeat((-point) as usize), digits)
    } else {
        let exp_sign = if exponent >= 0 { "+" } else { "-" };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{}e{}{}", first, exp_sign, exponent.abs())
        } else {
            format!("{}.{}e{}{}", first, rest, exp_sign, exponent.abs())
        }
    };

    format!("{}{}", sign, body)
}

/// Fixed-point formatting with `digits` fraction digits. Ties round away
/// from zero.
pub fn to_fixed(n: f64, digits: usize) -> String {
    if !n.is_finite() || n.abs() >= 1e21 {
        return format_number(n);
    }
    let scale = 10f64.powi(digits as i32);
    let scaled = n.abs() * scale;
    let rounded = if scaled.fract() == 0.5 && scaled < 9_007_199_254_740_992.0 {
        (scaled.floor() + 1.0) / scale
    } else {
        n.abs()
    };
    let body = format!("{:.*}", digits, rounded);
    if n < 0.0 {
        format!("-{}", body)
    } else {
        body
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Object> for Value {
    fn from(props: Object) -> Self {
        Value::Object(props)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(props) => Value::Object(
                props
                    .into_iter()
                    .map(|(k, v)| (SmolStr::from(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(-42.0), "-42");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(123456789012345680000.0), "123456789012345680000");
        assert_eq!(format_number(0.000001), "0.000001");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_to_fixed() {
        assert_eq!(to_fixed(3.14159, 2), "3.14");
        assert_eq!(to_fixed(2.5, 0), "3");
        assert_eq!(to_fixed(-2.5, 0), "-3");
        assert_eq!(to_fixed(1.0, 3), "1.000");
        assert_eq!(to_fixed(-0.0001, 2), "-0.00");
        assert_eq!(to_fixed(-0.0, 2), "0.00");
    }

    #[test]
    fn test_string_to_number() {
        assert_eq!(string_to_number("  12 "), 12.0);
        assert_eq!(string_to_number(""), 0.0);
        assert_eq!(string_to_number("0x1f"), 31.0);
        assert_eq!(string_to_number("-Infinity"), f64::NEG_INFINITY);
        assert!(string_to_number("12px").is_nan());
        assert!(string_to_number("inf").is_nan());
        assert!(string_to_number("-0x1").is_nan());
    }

    #[test]
    fn test_add_concatenates_strings() {
        let hi = Value::from("Hi ");
        assert_eq!(hi.add(&Value::from(1)), Value::from("Hi 1"));
        assert_eq!(Value::from(1).add(&Value::from(2)), Value::from(3));
        assert_eq!(Value::from(true).add(&Value::Null), Value::from(1));
        assert_eq!(
            Value::from(vec![Value::from(1), Value::Null]).add(&Value::from("!")),
            Value::from("1,!")
        );
    }

    #[test]
    fn test_equality() {
        assert!(Value::from(1).loose_eq(&Value::from("1")));
        assert!(!Value::from(1).strict_eq(&Value::from("1")));
        assert!(Value::Null.loose_eq(&Value::Undefined));
        assert!(!Value::Null.loose_eq(&Value::from(0)));
        assert!(Value::from(true).loose_eq(&Value::from("1")));
        assert!(!Value::Number(f64::NAN).strict_eq(&Value::Number(f64::NAN)));
    }

    #[test]
    fn test_truthiness_and_typeof() {
        assert!(!Value::from("").is_truthy());
        assert!(Value::Array(Vec::new()).is_truthy());
        assert!(!Value::Number(f64::NAN).is_truthy());
        assert_eq!(Value::Null.type_of(), "object");
        assert_eq!(Value::from("x").type_of(), "string");
    }

    #[test]
    fn test_get_property() {
        let user = Value::from(json!({ "name": "Ada", "tags": ["a", "b"] }));
        assert_eq!(user.get_property("name").unwrap(), Value::from("Ada"));
        assert_eq!(user.get_property("missing").unwrap(), Value::Undefined);

        let tags = user.get_property("tags").unwrap();
        assert_eq!(tags.get_property("length").unwrap(), Value::from(2));
        assert_eq!(tags.get_property("1").unwrap(), Value::from("b"));
        assert_eq!(tags.get_property("01").unwrap(), Value::Undefined);

        let err = Value::Undefined.get_property("name").unwrap_err();
        assert_eq!(
            err.message,
            "Cannot read properties of undefined (reading 'name')"
        );
    }

    #[test]
    fn test_has_property() {
        let obj = Value::from(json!({ "a": 1 }));
        assert!(obj.has_property(&Value::from("a")).unwrap());
        assert!(!obj.has_property(&Value::from("b")).unwrap());
        let arr = Value::from(json!([1, 2]));
        assert!(arr.has_property(&Value::from(1)).unwrap());
        assert!(!arr.has_property(&Value::from(2)).unwrap());
        assert!(Value::from("s").has_property(&Value::from("length")).is_err());
    }
}
