//! Dynamic value semantics used by the comparison kinds.
//!
//! Values follow the usual scripting-language rules: a runtime type tag,
//! truthiness, string and number conversion, and coercing equality. Arrays
//! and objects parsed from a descriptor are distinct references, so two of
//! them are never equal to each other under either equality.

use crate::types::Value;

/// Runtime type tag of a value (`typeof`).
pub fn type_of(v: &Value) -> &'static str {
    match v {
        Value::Undefined => "undefined",
        Value::Null | Value::Array(_) | Value::Object(_) => "object",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
    }
}

pub fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Undefined | Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => !(n.is_nan() || *n == 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    let abs = n.abs();
    if abs >= 1e21 || abs < 1e-6 {
        let s = format!("{n:e}");
        match s.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => s,
        }
    } else {
        format!("{n}")
    }
}

/// String conversion as used when a value is interpolated into text.
pub fn to_display_string(v: &Value) -> String {
    match v {
        Value::Undefined => "undefined".to_string(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_to_string(*n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Undefined | Value::Null => String::new(),
                other => to_display_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Reduces arrays and objects to their string form; primitives are returned as is.
pub fn to_primitive(v: &Value) -> Value {
    match v {
        Value::Array(_) | Value::Object(_) => Value::String(to_display_string(v)),
        other => other.clone(),
    }
}

pub fn to_number(v: &Value) -> f64 {
    match v {
        Value::Undefined => f64::NAN,
        Value::Null => 0.0,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Number(n) => *n,
        Value::String(s) => string_to_number(s),
        Value::Array(_) | Value::Object(_) => to_number(&to_primitive(v)),
    }
}

fn radix_to_number(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    let mut acc = 0.0_f64;
    for c in digits.chars() {
        match c.to_digit(radix) {
            Some(d) => acc = acc * f64::from(radix) + f64::from(d),
            None => return f64::NAN,
        }
    }
    acc
}

fn string_to_number(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }
    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if let Some(prefix) = s.get(..2) {
        let rest = &s[2..];
        match prefix {
            "0x" | "0X" => return radix_to_number(rest, 16),
            "0o" | "0O" => return radix_to_number(rest, 8),
            "0b" | "0B" => return radix_to_number(rest, 2),
            _ => {}
        }
    }
    // `str::parse` also accepts spellings such as "inf" and "nan"
    if s
        .chars()
        .any(|c| c.is_alphabetic() && c != 'e' && c != 'E')
    {
        return f64::NAN;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

/// Identity of type and value, no coercion.
pub fn strict_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        _ => false,
    }
}

/// Equality after type coercion.
pub fn loose_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Undefined | Value::Null, Value::Undefined | Value::Null) => true,
        (Value::Undefined | Value::Null, _) | (_, Value::Undefined | Value::Null) => false,
        (Value::Array(_) | Value::Object(_), Value::Array(_) | Value::Object(_)) => false,
        (Value::Number(x), Value::String(_)) => *x == to_number(b),
        (Value::String(_), Value::Number(y)) => to_number(a) == *y,
        (Value::Bool(_), _) => loose_equals(&Value::Number(to_number(a)), b),
        (_, Value::Bool(_)) => loose_equals(a, &Value::Number(to_number(b))),
        (Value::Array(_) | Value::Object(_), _) => loose_equals(&to_primitive(a), b),
        (_, Value::Array(_) | Value::Object(_)) => loose_equals(a, &to_primitive(b)),
        _ => strict_equals(a, b),
    }
}

/// Natural ordering: two strings compare by UTF-16 code unit, anything else
/// numerically. Comparisons involving NaN are false.
pub fn less_than(a: &Value, b: &Value) -> bool {
    let pa = to_primitive(a);
    let pb = to_primitive(b);
    if let (Value::String(x), Value::String(y)) = (&pa, &pb) {
        return x.encode_utf16().lt(y.encode_utf16());
    }
    let (x, y) = (to_number(&pa), to_number(&pb));
    x < y
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn obj() -> Value {
        let mut map = IndexMap::new();
        map.insert("id".to_string(), Value::Number(1.0));
        Value::Object(map)
    }

    #[test]
    fn type_tags() {
        assert_eq!(type_of(&Value::Undefined), "undefined");
        assert_eq!(type_of(&Value::Null), "object");
        assert_eq!(type_of(&Value::Array(vec![])), "object");
        assert_eq!(type_of(&Value::from(200)), "number");
        assert_eq!(type_of(&Value::from("x")), "string");
        assert_eq!(type_of(&Value::from(true)), "boolean");
    }

    #[test]
    fn truthiness_of_containers_and_zero() {
        assert!(is_truthy(&Value::Object(IndexMap::new())));
        assert!(is_truthy(&Value::Array(vec![])));
        assert!(is_truthy(&Value::from("0")));
        assert!(!is_truthy(&Value::from(0)));
        assert!(!is_truthy(&Value::Number(-0.0)));
        assert!(!is_truthy(&Value::Number(f64::NAN)));
        assert!(!is_truthy(&Value::from("")));
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&Value::Undefined));
    }

    #[test]
    fn number_formatting() {
        assert_eq!(number_to_string(200.0), "200");
        assert_eq!(number_to_string(-1.5), "-1.5");
        assert_eq!(number_to_string(1e21), "1e+21");
        assert_eq!(number_to_string(1.5e-7), "1.5e-7");
        assert_eq!(number_to_string(-0.0), "0");
    }

    #[test]
    fn display_of_compounds() {
        let arr = Value::Array(vec![Value::from(1), Value::Null, Value::from("a")]);
        assert_eq!(to_display_string(&arr), "1,,a");
        assert_eq!(to_display_string(&obj()), "[object Object]");
    }

    #[test]
    fn string_to_number_rules() {
        assert_eq!(to_number(&Value::from(" 123 ")), 123.0);
        assert_eq!(to_number(&Value::from("")), 0.0);
        assert_eq!(to_number(&Value::from("0x1F")), 31.0);
        assert_eq!(to_number(&Value::from("-Infinity")), f64::NEG_INFINITY);
        assert!(to_number(&Value::from("inf")).is_nan());
        assert!(to_number(&Value::from("12px")).is_nan());
    }

    #[test]
    fn strict_equality_has_no_coercion() {
        assert!(strict_equals(&Value::from(200), &Value::from(200)));
        assert!(!strict_equals(&Value::from("200"), &Value::from(200)));
        assert!(!strict_equals(&Value::Number(f64::NAN), &Value::Number(f64::NAN)));
        assert!(strict_equals(&Value::Number(0.0), &Value::Number(-0.0)));
        assert!(!strict_equals(&obj(), &obj()));
    }

    #[test]
    fn loose_equality_coerces() {
        assert!(loose_equals(&Value::from("123"), &Value::from(123)));
        assert!(loose_equals(&Value::Null, &Value::Undefined));
        assert!(!loose_equals(&Value::Null, &Value::from(0)));
        assert!(loose_equals(&Value::from(true), &Value::from(1)));
        assert!(loose_equals(&Value::from(false), &Value::from("0")));
        assert!(loose_equals(
            &Value::Array(vec![Value::from(1), Value::from(2)]),
            &Value::from("1,2")
        ));
        assert!(loose_equals(&obj(), &Value::from("[object Object]")));
        assert!(!loose_equals(&obj(), &obj()));
    }

    #[test]
    fn ordering() {
        assert!(!less_than(&Value::from(250), &Value::from(200)));
        assert!(less_than(&Value::from(150), &Value::from(200)));
        assert!(less_than(&Value::from("apple"), &Value::from("banana")));
        // lexical, not numeric
        assert!(less_than(&Value::from("10"), &Value::from("9")));
        assert!(less_than(&Value::from("9"), &Value::from(10)));
        assert!(!less_than(&Value::Undefined, &Value::from(1)));
        assert!(less_than(&Value::Null, &Value::from(1)));
    }
}
