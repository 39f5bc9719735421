//! Built-in functions and methods.

use crate::error::{EvalError, EvalResult};
use crate::value::{format_number, join, to_fixed, Value};

static UNDEFINED: Value = Value::Undefined;

/// A callable value.
#[derive(Debug, Clone, PartialEq)]
pub enum Function {
    /// A global such as `parseInt`.
    Builtin(Builtin),
    /// A method already bound to the value it was read from.
    Method { receiver: Box<Value>, method: Method },
}

impl Function {
    pub fn name(&self) -> &'static str {
        match self {
            Function::Builtin(builtin) => builtin.name(),
            Function::Method { method, .. } => method.name(),
        }
    }

    pub fn call(&self, args: &[Value]) -> EvalResult<Value> {
        match self {
            Function::Builtin(builtin) => builtin.call(args),
            Function::Method { receiver, method } => method.call(receiver, args),
        }
    }
}

/// Global functions available to every expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    String,
    Number,
    ParseInt,
    ParseFloat,
    IsNaN,
    IsFinite,
    EncodeURI,
    EncodeURIComponent,
    DecodeURI,
    DecodeURIComponent,
    Escape,
    Unescape,
    Eval,
}

impl Builtin {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "String" => Self::String,
            "Number" => Self::Number,
            "parseInt" => Self::ParseInt,
            "parseFloat" => Self::ParseFloat,
            "isNaN" => Self::IsNaN,
            "isFinite" => Self::IsFinite,
            "encodeURI" => Self::EncodeURI,
            "encodeURIComponent" => Self::EncodeURIComponent,
            "decodeURI" => Self::DecodeURI,
            "decodeURIComponent" => Self::DecodeURIComponent,
            "escape" => Self::Escape,
            "unescape" => Self::Unescape,
            "eval" => Self::Eval,
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Number => "Number",
            Self::ParseInt => "parseInt",
            Self::ParseFloat => "parseFloat",
            Self::IsNaN => "isNaN",
            Self::IsFinite => "isFinite",
            Self::EncodeURI => "encodeURI",
            Self::EncodeURIComponent => "encodeURIComponent",
            Self::DecodeURI => "decodeURI",
            Self::DecodeURIComponent => "decodeURIComponent",
            Self::Escape => "escape",
            Self::Unescape => "unescape",
            Self::Eval => "eval",
        }
    }

    pub fn call(&self, args: &[Value]) -> EvalResult<Value> {
        let first = arg(args, 0);
        Ok(match self {
            Self::String => match args.first() {
                Some(value) => Value::String(value.to_js_string()),
                None => Value::String(String::new()),
            },
            Self::Number => Value::Number(args.first().map_or(0.0, Value::to_number)),
            Self::ParseInt => Value::Number(parse_int(&first.to_js_string(), arg(args, 1))),
            Self::ParseFloat => Value::Number(parse_float(&first.to_js_string())),
            Self::IsNaN => Value::Bool(first.to_number().is_nan()),
            Self::IsFinite => Value::Bool(first.to_number().is_finite()),
            Self::EncodeURI => Value::String(encode_uri(&first.to_js_string(), URI_RESERVED)),
            Self::EncodeURIComponent => Value::String(encode_uri(&first.to_js_string(), "")),
            Self::DecodeURI => Value::String(decode_uri(&first.to_js_string(), URI_RESERVED)?),
            Self::DecodeURIComponent => Value::String(decode_uri(&first.to_js_string(), "")?),
            Self::Escape => Value::String(escape(&first.to_js_string())),
            Self::Unescape => Value::String(unescape(&first.to_js_string())),
            Self::Eval => {
                return Err(EvalError::unsupported(
                    "eval is not available in template expressions",
                ))
            }
        })
    }
}

/// Methods of strings, arrays, numbers and booleans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Split,
    Join,
    ToUpperCase,
    ToLowerCase,
    Trim,
    IndexOf,
    Includes,
    Slice,
    Concat,
    CharAt,
    StartsWith,
    EndsWith,
    Replace,
    ToString,
    ToFixed,
}

impl Method {
    /// Find the method `name` on a receiver.
    pub fn lookup(receiver: &Value, name: &str) -> Option<Self> {
        let method = match name {
            "split" => Self::Split,
            "join" => Self::Join,
            "toUpperCase" => Self::ToUpperCase,
            "toLowerCase" => Self::ToLowerCase,
            "trim" => Self::Trim,
            "indexOf" => Self::IndexOf,
            "includes" => Self::Includes,
            "slice" => Self::Slice,
            "concat" => Self::Concat,
            "charAt" => Self::CharAt,
            "startsWith" => Self::StartsWith,
            "endsWith" => Self::EndsWith,
            "replace" => Self::Replace,
            "toString" => Self::ToString,
            "toFixed" => Self::ToFixed,
            _ => return None,
        };
        let supported = match receiver {
            Value::String(_) => !matches!(method, Self::Join | Self::ToFixed),
            Value::Array(_) => matches!(
                method,
                Self::Join
                    | Self::IndexOf
                    | Self::Includes
                    | Self::Slice
                    | Self::Concat
                    | Self::ToString
            ),
            Value::Number(_) => matches!(method, Self::ToFixed | Self::ToString),
            Value::Bool(_) | Value::Object(_) => method == Self::ToString,
            Value::Undefined | Value::Null | Value::Function(_) => false,
        };
        supported.then_some(method)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Split => "split",
            Self::Join => "join",
            Self::ToUpperCase => "toUpperCase",
            Self::ToLowerCase => "toLowerCase",
            Self::Trim => "trim",
            Self::IndexOf => "indexOf",
            Self::Includes => "includes",
            Self::Slice => "slice",
            Self::Concat => "concat",
            Self::CharAt => "charAt",
            Self::StartsWith => "startsWith",
            Self::EndsWith => "endsWith",
            Self::Replace => "replace",
            Self::ToString => "toString",
            Self::ToFixed => "toFixed",
        }
    }

    pub fn call(&self, receiver: &Value, args: &[Value]) -> EvalResult<Value> {
        match receiver {
            Value::String(s) => self.call_string(s, args),
            Value::Array(items) => Ok(self.call_array(items, args)),
            Value::Number(n) => self.call_number(*n, args),
            other => Ok(Value::String(other.to_js_string())),
        }
    }

    fn call_string(&self, s: &str, args: &[Value]) -> EvalResult<Value> {
        let text = |i: usize| arg(args, i).to_js_string();
        Ok(match self {
            Self::Split => split(s, arg(args, 0), arg(args, 1)),
            Self::ToUpperCase => Value::String(s.to_uppercase()),
            Self::ToLowerCase => Value::String(s.to_lowercase()),
            Self::Trim => Value::String(s.trim().to_string()),
            Self::IndexOf => Value::Number(string_index_of(s, &text(0), arg(args, 1))),
            Self::Includes => Value::Bool(s.contains(text(0).as_str())),
            Self::Slice => {
                let chars: Vec<char> = s.chars().collect();
                let (start, end) = slice_bounds(chars.len(), arg(args, 0), arg(args, 1));
                Value::String(chars[start..end].iter().collect())
            }
            Self::Concat => {
                let mut out = s.to_string();
                for value in args {
                    out.push_str(&value.to_js_string());
                }
                Value::String(out)
            }
            Self::CharAt => {
                let index = to_integer(arg(args, 0).to_number());
                let c = if index >= 0.0 {
                    s.chars().nth(index as usize)
                } else {
                    None
                };
                Value::String(c.map(String::from).unwrap_or_default())
            }
            Self::StartsWith => Value::Bool(s.starts_with(text(0).as_str())),
            Self::EndsWith => Value::Bool(s.ends_with(text(0).as_str())),
            Self::Replace => {
                let pattern = text(0);
                let replacement = match arg(args, 1) {
                    Value::Function(f) => f.call(&[Value::String(pattern.clone())])?.to_js_string(),
                    other => other.to_js_string(),
                };
                Value::String(s.replacen(pattern.as_str(), &replacement, 1))
            }
            Self::ToString => Value::String(s.to_string()),
            Self::Join | Self::ToFixed => Value::Undefined,
        })
    }

    fn call_array(&self, items: &[Value], args: &[Value]) -> Value {
        match self {
            Self::Join => {
                let separator = match arg(args, 0) {
                    Value::Undefined => ",".to_string(),
                    other => other.to_js_string(),
                };
                Value::String(join(items, &separator))
            }
            Self::IndexOf => {
                let needle = arg(args, 0);
                let found = items.iter().position(|item| item.strict_eq(needle));
                Value::Number(found.map_or(-1.0, |i| i as f64))
            }
            Self::Includes => {
                let needle = arg(args, 0);
                Value::Bool(items.iter().any(|item| same_value_zero(item, needle)))
            }
            Self::Slice => {
                let (start, end) = slice_bounds(items.len(), arg(args, 0), arg(args, 1));
                Value::Array(items[start..end].to_vec())
            }
            Self::Concat => {
                let mut out = items.to_vec();
                for value in args {
                    match value {
                        Value::Array(more) => out.extend(more.iter().cloned()),
                        other => out.push(other.clone()),
                    }
                }
                Value::Array(out)
            }
            _ => Value::String(join(items, ",")),
        }
    }

    fn call_number(&self, n: f64, args: &[Value]) -> EvalResult<Value> {
        match self {
            Self::ToFixed => {
                let digits = to_integer(arg(args, 0).to_number());
                if !(0.0..=100.0).contains(&digits) {
                    return Err(EvalError::type_error(
                        "toFixed() digits argument must be between 0 and 100",
                    ));
                }
                Ok(Value::String(to_fixed(n, digits as usize)))
            }
            _ => {
                let radix = match arg(args, 0) {
                    Value::Undefined => 10.0,
                    other => to_integer(other.to_number()),
                };
                number_to_string(n, radix).map(Value::String)
            }
        }
    }
}

fn arg(args: &[Value], index: usize) -> &Value {
    args.get(index).unwrap_or(&UNDEFINED)
}

/// Truncate toward zero, mapping `NaN` to zero.
fn to_integer(n: f64) -> f64 {
    if n.is_nan() {
        0.0
    } else {
        n.trunc()
    }
}

/// Resolve `slice(start, end)` arguments against a length.
fn slice_bounds(len: usize, start: &Value, end: &Value) -> (usize, usize) {
    let resolve = |value: &Value, default: usize| -> usize {
        if matches!(value, Value::Undefined) {
            return default;
        }
        let n = to_integer(value.to_number());
        if n < 0.0 {
            (len as f64 + n).max(0.0) as usize
        } else {
            n.min(len as f64) as usize
        }
    };
    let start = resolve(start, 0);
    let end = resolve(end, len);
    (start, end.max(start))
}

fn same_value_zero(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) if x.is_nan() && y.is_nan() => true,
        _ => a.strict_eq(b),
    }
}

fn split(s: &str, separator: &Value, limit: &Value) -> Value {
    let limit = match limit {
        Value::Undefined => usize::MAX,
        other => to_integer(other.to_number()).max(0.0) as usize,
    };
    let parts: Vec<Value> = match separator {
        Value::Undefined => vec![Value::String(s.to_string())],
        other => {
            let separator = other.to_js_string();
            if separator.is_empty() {
                s.chars().map(|c| Value::String(c.to_string())).collect()
            } else {
                s.split(separator.as_str())
                    .map(|part| Value::String(part.to_string()))
                    .collect()
            }
        }
    };
    Value::Array(parts.into_iter().take(limit).collect())
}

/// `indexOf` over characters.
fn string_index_of(s: &str, needle: &str, from: &Value) -> f64 {
    let from = to_integer(from.to_number()).max(0.0) as usize;
    let start_byte = s
        .char_indices()
        .nth(from)
        .map_or(s.len(), |(byte, _)| byte);
    if from > 0 && start_byte == s.len() && !needle.is_empty() {
        return -1.0;
    }
    match s[start_byte..].find(needle) {
        Some(offset) => s[..start_byte + offset].chars().count() as f64,
        None => -1.0,
    }
}

fn number_to_string(n: f64, radix: f64) -> EvalResult<String> {
    if !(2.0..=36.0).contains(&radix) {
        return Err(EvalError::type_error(
            "toString() radix must be between 2 and 36",
        ));
    }
    if radix == 10.0 || !n.is_finite() {
        return Ok(format_number(n));
    }
    if n.fract() != 0.0 || n.abs() > 9_007_199_254_740_992.0 {
        return Err(EvalError::unsupported(
            "toString() with a radix is only supported for safe integers",
        ));
    }

    let radix = radix as u64;
    let mut value = n.abs() as u64;
    let mut digits = Vec::new();
    loop {
        let digit = (value % radix) as u32;
        digits.push(std::char::from_digit(digit, radix as u32).unwrap_or('0'));
        value /= radix;
        if value == 0 {
            break;
        }
    }
    if n < 0.0 {
        digits.push('-');
    }
    Ok(digits.iter().rev().collect())
}

fn parse_int(s: &str, radix: &Value) -> f64 {
    let s = s.trim_start();
    let (negative, mut rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut radix = match radix {
        Value::Undefined => 0,
        other => to_integer(other.to_number()) as i64,
    };
    if radix != 0 && !(2..=36).contains(&radix) {
        return f64::NAN;
    }
    if radix == 0 || radix == 16 {
        if let Some(hex) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
            rest = hex;
            radix = 16;
        }
    }
    if radix == 0 {
        radix = 10;
    }

    let digits: Vec<u32> = rest
        .chars()
        .map_while(|c| c.to_digit(radix as u32))
        .collect();
    if digits.is_empty() {
        return f64::NAN;
    }
    let value = digits
        .into_iter()
        .fold(0.0, |acc, d| acc * radix as f64 + f64::from(d));
    if negative {
        -value
    } else {
        value
    }
}

fn parse_float(s: &str) -> f64 {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        return if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - digits_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return f64::NAN;
    }
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().unwrap_or(f64::NAN)
}

/// Characters `encodeURI` leaves alone in addition to the unreserved set.
const URI_RESERVED: &str = ";,/?:@&=+$#";
const URI_UNRESERVED_MARKS: &str = "-_.!~*'()";

fn encode_uri(s: &str, keep: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_ascii_alphanumeric() || URI_UNRESERVED_MARKS.contains(c) || keep.contains(c) {
            out.push(c);
        } else {
            let mut buf = [0u8; 4];
            for byte in c.encode_utf8(&mut buf).bytes() {
                out.push_str(&format!("%{:02X}", byte));
            }
        }
    }
    out
}

fn decode_uri(s: &str, keep: &str) -> EvalResult<String> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'%' {
            out.push(bytes[i]);
            i += 1;
            continue;
        }
        let byte = s
            .get(i + 1..i + 3)
            .and_then(|hex| u8::from_str_radix(hex, 16).ok())
            .ok_or_else(EvalError::uri_error)?;
        if byte.is_ascii() && keep.contains(byte as char) {
            out.extend_from_slice(&bytes[i..i + 3]);
        } else {
            out.push(byte);
        }
        i += 3;
    }
    String::from_utf8(out).map_err(|_| EvalError::uri_error())
}

const ESCAPE_KEEP: &str = "@*_+-./";

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for unit in s.encode_utf16() {
        match char::from_u32(u32::from(unit)) {
            Some(c) if c.is_ascii_alphanumeric() || ESCAPE_KEEP.contains(c) => out.push(c),
            _ if unit < 256 => out.push_str(&format!("%{:02X}", unit)),
            _ => out.push_str(&format!("%u{:04X}", unit)),
        }
    }
    out
}

fn unescape(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut units: Vec<u16> = Vec::with_capacity(chars.len());
    let hex = |digits: &[char]| -> Option<u16> {
        let text: String = digits.iter().collect();
        if text.chars().all(|c| c.is_ascii_hexdigit()) {
            u16::from_str_radix(&text, 16).ok()
        } else {
            None
        }
    };

    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '%' {
            if chars.get(i + 1) == Some(&'u') && i + 6 <= chars.len() {
                if let Some(unit) = hex(&chars[i + 2..i + 6]) {
                    units.push(unit);
                    i += 6;
                    continue;
                }
            }
            if i + 3 <= chars.len() {
                if let Some(unit) = hex(&chars[i + 1..i + 3]) {
                    units.push(unit);
                    i += 3;
                    continue;
                }
            }
        }
        let mut buf = [0u16; 2];
        units.extend_from_slice(chars[i].encode_utf16(&mut buf));
        i += 1;
    }
    String::from_utf16_lossy(&units)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(builtin: Builtin, args: &[Value]) -> Value {
        builtin.call(args).unwrap()
    }

    fn method(receiver: Value, name: &str, args: &[Value]) -> Value {
        let method = Method::lookup(&receiver, name).unwrap();
        method.call(&receiver, args).unwrap()
    }

    #[test]
    fn test_string_and_number_conversions() {
        assert_eq!(call(Builtin::String, &[Value::from(12)]), Value::from("12"));
        assert_eq!(call(Builtin::String, &[]), Value::from(""));
        assert_eq!(call(Builtin::Number, &[Value::from(" 3.5 ")]), Value::from(3.5));
        assert_eq!(call(Builtin::Number, &[]), Value::from(0));
    }

    #[test]
    fn test_parse_int_and_float() {
        assert_eq!(call(Builtin::ParseInt, &[Value::from("42px")]), Value::from(42));
        assert_eq!(call(Builtin::ParseInt, &[Value::from(" -0x1A")]), Value::from(-26));
        assert_eq!(
            call(Builtin::ParseInt, &[Value::from("101"), Value::from(2)]),
            Value::from(5)
        );
        assert!(call(Builtin::ParseInt, &[Value::from("px")]).to_number().is_nan());
        assert_eq!(call(Builtin::ParseFloat, &[Value::from("3.14abc")]), Value::from(3.14));
        assert_eq!(call(Builtin::ParseFloat, &[Value::from("1e3x")]), Value::from(1000));
        assert_eq!(call(Builtin::ParseFloat, &[Value::from("2e")]), Value::from(2));
        assert!(call(Builtin::ParseFloat, &[Value::from(".")]).to_number().is_nan());
    }

    #[test]
    fn test_is_nan_and_is_finite() {
        assert_eq!(call(Builtin::IsNaN, &[Value::from("abc")]), Value::from(true));
        assert_eq!(call(Builtin::IsNaN, &[Value::from("12")]), Value::from(false));
        assert_eq!(call(Builtin::IsFinite, &[Value::from("12")]), Value::from(true));
        assert_eq!(call(Builtin::IsFinite, &[Value::Undefined]), Value::from(false));
    }

    #[test]
    fn test_uri_functions() {
        let text = Value::from("a b&c/é");
        assert_eq!(
            call(Builtin::EncodeURIComponent, &[text.clone()]),
            Value::from("a%20b%26c%2F%C3%A9")
        );
        assert_eq!(call(Builtin::EncodeURI, &[text]), Value::from("a%20b&c/%C3%A9"));
        assert_eq!(
            call(Builtin::DecodeURIComponent, &[Value::from("a%20b%26c%2F%C3%A9")]),
            Value::from("a b&c/é")
        );
        assert_eq!(
            call(Builtin::DecodeURI, &[Value::from("a%20b%26c")]),
            Value::from("a b%26c")
        );
        let err = Builtin::DecodeURIComponent
            .call(&[Value::from("%E0%A4%A")])
            .unwrap_err();
        assert_eq!(err.code, crate::error::EvalErrorCode::UriError);
    }

    #[test]
    fn test_escape_and_unescape() {
        assert_eq!(call(Builtin::Escape, &[Value::from("a b+ä€")]), Value::from("a%20b+%E4%u20AC"));
        assert_eq!(
            call(Builtin::Unescape, &[Value::from("a%20b+%E4%u20AC%zz")]),
            Value::from("a b+ä€%zz")
        );
    }

    #[test]
    fn test_eval_is_rejected() {
        let err = Builtin::Eval.call(&[Value::from("1")]).unwrap_err();
        assert_eq!(err.code, crate::error::EvalErrorCode::Unsupported);
    }

    #[test]
    fn test_string_methods() {
        let hello = Value::from("hello");
        assert_eq!(
            method(hello.clone(), "split", &[Value::from("")]),
            Value::Array("hello".chars().map(|c| Value::from(c.to_string())).collect())
        );
        assert_eq!(
            method(Value::from("a,b,c"), "split", &[Value::from(","), Value::from(2)]),
            Value::Array(vec![Value::from("a"), Value::from("b")])
        );
        assert_eq!(method(hello.clone(), "toUpperCase", &[]), Value::from("HELLO"));
        assert_eq!(method(hello.clone(), "indexOf", &[Value::from("l")]), Value::from(2));
        assert_eq!(
            method(hello.clone(), "indexOf", &[Value::from("l"), Value::from(3)]),
            Value::from(3)
        );
        assert_eq!(method(hello.clone(), "slice", &[Value::from(-3)]), Value::from("llo"));
        assert_eq!(method(hello.clone(), "charAt", &[Value::from(1)]), Value::from("e"));
        assert_eq!(
            method(hello.clone(), "replace", &[Value::from("l"), Value::from("L")]),
            Value::from("heLlo")
        );
        assert_eq!(method(Value::from("  x "), "trim", &[]), Value::from("x"));
        assert!(Method::lookup(&hello, "join").is_none());
    }

    #[test]
    fn test_array_methods() {
        let items = Value::Array(vec![Value::from(1), Value::Null, Value::from("c")]);
        assert_eq!(method(items.clone(), "join", &[]), Value::from("1,,c"));
        assert_eq!(method(items.clone(), "join", &[Value::from(" - ")]), Value::from("1 -  - c"));
        assert_eq!(method(items.clone(), "indexOf", &[Value::from("c")]), Value::from(2));
        assert_eq!(method(items.clone(), "indexOf", &[Value::from("1")]), Value::from(-1));
        assert_eq!(
            method(items.clone(), "slice", &[Value::from(1)]),
            Value::Array(vec![Value::Null, Value::from("c")])
        );
        assert_eq!(
            method(
                Value::Array(vec![Value::from(1)]),
                "concat",
                &[Value::Array(vec![Value::from(2)]), Value::from(3)]
            ),
            Value::Array(vec![Value::from(1), Value::from(2), Value::from(3)])
        );
        assert_eq!(
            method(Value::Array(vec![Value::Number(f64::NAN)]), "includes", &[Value::Number(f64::NAN)]),
            Value::from(true)
        );
    }

    #[test]
    fn test_number_methods() {
        assert_eq!(method(Value::from(1.005), "toFixed", &[Value::from(1)]), Value::from("1.0"));
        assert_eq!(method(Value::from(255), "toString", &[Value::from(16)]), Value::from("ff"));
        assert_eq!(method(Value::from(-5), "toString", &[Value::from(2)]), Value::from("-101"));
        assert_eq!(method(Value::from(1.5), "toString", &[]), Value::from("1.5"));
        assert!(Method::lookup(&Value::from(1), "toFixed")
            .unwrap()
            .call(&Value::from(1), &[Value::from(101)])
            .is_err());
    }
}
