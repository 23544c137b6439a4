//! Coercion and comparison algebra (C3): `to_number`, `to_boolean`,
//! `to_string`, loose/strict/deep equality, ordering.
//!
//! Grounded on `original_source/src/number.c`, `boolean.c`, `string.c`
//! (`jsonlogic_to_string`), and `compare.c`.

use crate::value::Value;

/// Which dialect's truthiness/ordering rule applies. Only `to_boolean`
/// differs between dialects (§4.3); every other coercion is shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    JsonLogic,
    CertLogic,
}

/// `to-boolean`, dialect-parameterized (grounded on `boolean.c`'s
/// `jsonlogic_to_boolean`/`certlogic_to_boolean`, which differ only in the
/// object case).
pub fn to_boolean(v: &Value, dialect: Dialect) -> Value {
    match v {
        Value::Number(n) => Value::boolean(!(*n == 0.0 || n.is_nan())),
        Value::Boolean(_) => v.clone(),
        Value::String(s) => Value::boolean(!s.is_empty()),
        Value::Null => Value::boolean(false),
        // Arrays are false iff empty -- this is different to JavaScript,
        // per the grounding source's own comment.
        Value::Array(a) => Value::boolean(!a.is_empty()),
        Value::Object(o) => match dialect {
            Dialect::JsonLogic => Value::boolean(true),
            Dialect::CertLogic => Value::boolean(!o.is_empty()),
        },
        Value::Error(..) => v.clone(),
    }
}

/// `to_bool`: interprets errors as false, per the grounding source's comment
/// on `jsonlogic_to_bool`.
pub fn to_bool(v: &Value, dialect: Dialect) -> bool {
    matches!(to_boolean(v, dialect), Value::Boolean(true))
}

pub fn not(v: &Value, dialect: Dialect) -> Value {
    match to_boolean(v, dialect) {
        Value::Boolean(b) => Value::boolean(!b),
        other => other, // errors pass through unchanged
    }
}

const ASCII_WHITESPACE: &[char] = &['\t', '\n', '\x0b', '\x0c', '\r', ' '];

/// `to-number` (§4.3). Grounded on `number.c`'s `jsonlogic_to_number`, except
/// for the Object case: the grounding source asserts/aborts there (undefined
/// behavior in release builds); this crate implements the spec's safe,
/// defined `NaN` result instead (see DESIGN.md).
pub fn to_number(v: &Value) -> f64 {
    match v {
        Value::Number(n) => *n,
        Value::Null => 0.0,
        Value::Boolean(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::String(s) => {
            let text = s.to_string_lossy();
            let trimmed = text.trim_matches(ASCII_WHITESPACE);
            match trimmed {
                "" => 0.0,
                "Infinity" | "+Infinity" => f64::INFINITY,
                "-Infinity" => f64::NEG_INFINITY,
                other => other.parse::<f64>().unwrap_or(f64::NAN),
            }
        }
        Value::Array(a) => match (a.len(), a.get(0)) {
            (0, _) => 0.0,
            (1, Some(only)) => to_number(only),
            _ => f64::NAN,
        },
        Value::Object(_) => f64::NAN,
        Value::Error(..) => f64::NAN,
    }
}

/// `to-string`, the *display* form (not the JSON form -- see [`crate::stringify`]
/// for that). Grounded on `string.c`'s `jsonlogic_to_string`.
pub fn to_string(v: &Value) -> String {
    match v {
        Value::Number(n) => {
            if n.is_finite() {
                format_number(*n)
            } else {
                // to_string of a non-finite number still prints numerically
                // in the grounding source's display form (only the JSON
                // stringifier substitutes "null" for non-finite numbers).
                n.to_string()
            }
        }
        Value::Null => "null".to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::String(s) => s.to_string_lossy(),
        Value::Array(a) => a
            .as_slice()
            .iter()
            .map(to_string)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
        Value::Error(_, msg) => msg.to_string(),
    }
}

pub(crate) fn format_number(n: f64) -> String {
    // Rust's `Display` for f64 already produces the shortest round-tripping
    // decimal representation; integral values print without a trailing
    // ".0" exponent-free form here to match JSON-number conventions.
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Strict equality (§4.3): numbers/strings by value/content; arrays and
/// objects by payload identity (`Rc::ptr_eq` -- this crate has no heap
/// payload for booleans, unlike the grounding source's singleton handles,
/// so boolean identity reduces to value equality). Errors short-circuit by
/// returning the left operand, matching `compare.c`'s `jsonlogic_strict_equal`.
pub fn strict_equal(a: &Value, b: &Value) -> Value {
    if let Value::Error(..) = a {
        return a.clone();
    }
    if let Value::Error(..) = b {
        return b.clone();
    }
    let result = match (a, b) {
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Null, Value::Null) => true,
        (Value::Boolean(x), Value::Boolean(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => std::rc::Rc::ptr_eq(x, y),
        (Value::Object(x), Value::Object(y)) => std::rc::Rc::ptr_eq(x, y),
        _ => false,
    };
    Value::boolean(result)
}

pub fn strict_not_equal(a: &Value, b: &Value) -> Value {
    match strict_equal(a, b) {
        Value::Boolean(r) => Value::boolean(!r),
        other => other,
    }
}

/// Deep structural equality (§4.3), no cycle detection.
pub fn deep_strict_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Null, Value::Null) => true,
        (Value::Boolean(x), Value::Boolean(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len()
                && x.as_slice()
                    .iter()
                    .zip(y.as_slice())
                    .all(|(xi, yi)| deep_strict_equal(xi, yi))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter().all(|(k, v)| {
                    y.get_with_hash(k.hash(), k.as_units())
                        .is_some_and(|yv| deep_strict_equal(v, yv))
                })
        }
        (Value::Error(xk, _), Value::Error(yk, _)) => xk == yk,
        _ => false,
    }
}

/// Loose (`==`) equality (§4.3). Grounded on `compare.c`'s `jsonlogic_equal`:
/// error short-circuiting is position-dependent, not symmetric -- the left
/// operand's error wins outright, but a right-side coercion error only
/// surfaces when the left operand was the number being compared against it.
/// This is preserved deliberately (§8's Laws: "the leftmost error wins").
pub fn loose_equal(a: &Value, b: &Value) -> Value {
    if let Value::Error(..) = a {
        return a.clone();
    }
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => Value::boolean(x == y),
        (Value::Number(x), _) => {
            if let Value::Error(..) = b {
                return b.clone();
            }
            Value::boolean(*x == to_number(b))
        }
        (_, Value::Number(y)) => Value::boolean(to_number(a) == *y),
        (Value::Null, Value::Null) => Value::boolean(true),
        (Value::Null, _) | (_, Value::Null) => Value::boolean(false),
        _ if std::mem::discriminant(a) == std::mem::discriminant(b) => strict_equal(a, b),
        (Value::String(_), Value::Boolean(_)) | (Value::Boolean(_), Value::String(_)) => {
            Value::boolean(to_number(a) == to_number(b))
        }
        (Value::String(_) | Value::Boolean(_), Value::Array(_) | Value::Object(_)) => {
            loose_equal(a, &Value::string_from_str(&to_string(b)))
        }
        (Value::Array(_) | Value::Object(_), Value::String(_) | Value::Boolean(_)) => {
            loose_equal(&Value::string_from_str(&to_string(a)), b)
        }
        _ => Value::boolean(false),
    }
}

pub fn loose_not_equal(a: &Value, b: &Value) -> Value {
    match loose_equal(a, b) {
        Value::Boolean(r) => Value::boolean(!r),
        other => other,
    }
}

/// Internal total-order comparator, grounded on `compare.c`'s
/// `jsonlogic_comapre` (sic). Numeric if either side is a number;
/// lexicographic if either side is a string; otherwise an arbitrary but
/// defined order over type discriminants. Kept private and unused by any
/// public built-in: the public ordering operators (`lt`/`gt`/`le`/`ge`
/// below) implement the grounding source's *actual* `<`/`>`/`<=`/`>=`
/// behavior, which falls back to `false` rather than this comparator in the
/// "neither side is number/string" case. See DESIGN.md for the reconciled
/// Open Question.
#[allow(dead_code)]
fn compare_handles(a: &Value, b: &Value) -> std::cmp::Ordering {
    if a.is_number() || b.is_number() {
        return to_number(a)
            .partial_cmp(&to_number(b))
            .unwrap_or(std::cmp::Ordering::Equal);
    }
    if a.is_string() || b.is_string() {
        return to_string(a).cmp(&to_string(b));
    }
    type_rank(a).cmp(&type_rank(b))
}

fn type_rank(v: &Value) -> u8 {
    match v {
        Value::Null => 0,
        Value::Boolean(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
        Value::Error(..) => 6,
    }
}

fn numeric_or_string_order(a: &Value, b: &Value) -> Option<std::cmp::Ordering> {
    if let Value::Error(..) = a {
        return None;
    }
    if let Value::Error(..) = b {
        return None;
    }
    if a.is_number() || b.is_number() {
        return to_number(a).partial_cmp(&to_number(b));
    }
    if a.is_string() || b.is_string() {
        return Some(to_string(a).cmp(&to_string(b)));
    }
    None
}

fn ordering_error(a: &Value, b: &Value) -> Option<Value> {
    if let Value::Error(..) = a {
        return Some(a.clone());
    }
    if let Value::Error(..) = b {
        return Some(b.clone());
    }
    None
}

/// `<`, grounded on `compare.c`'s `jsonlogic_lt`: numeric/lexicographic
/// comparison when applicable, `false` otherwise (not the discriminator
/// fallback of the internal comparator above).
pub fn lt(a: &Value, b: &Value) -> Value {
    if let Some(err) = ordering_error(a, b) {
        return err;
    }
    Value::boolean(numeric_or_string_order(a, b) == Some(std::cmp::Ordering::Less))
}

pub fn gt(a: &Value, b: &Value) -> Value {
    if let Some(err) = ordering_error(a, b) {
        return err;
    }
    Value::boolean(numeric_or_string_order(a, b) == Some(std::cmp::Ordering::Greater))
}

/// `<=`: falls back to loose equality on the equality case, per §4.3.
pub fn le(a: &Value, b: &Value) -> Value {
    if let Some(err) = ordering_error(a, b) {
        return err;
    }
    if a.is_number() || b.is_number() || a.is_string() || b.is_string() {
        return Value::boolean(!matches!(
            numeric_or_string_order(a, b),
            Some(std::cmp::Ordering::Greater) | None
        ));
    }
    loose_equal(a, b)
}

pub fn ge(a: &Value, b: &Value) -> Value {
    if let Some(err) = ordering_error(a, b) {
        return err;
    }
    if a.is_number() || b.is_number() || a.is_string() || b.is_string() {
        return Value::boolean(!matches!(
            numeric_or_string_order(a, b),
            Some(std::cmp::Ordering::Less) | None
        ));
    }
    loose_equal(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn to_boolean_number_false_iff_zero_or_nan() {
        assert_eq!(
            to_boolean(&Value::number(0.0), Dialect::JsonLogic),
            Value::boolean(false)
        );
        assert_eq!(
            to_boolean(&Value::number(f64::NAN), Dialect::JsonLogic),
            Value::boolean(false)
        );
        assert_eq!(
            to_boolean(&Value::number(1.0), Dialect::JsonLogic),
            Value::boolean(true)
        );
    }

    #[test]
    fn to_boolean_object_differs_by_dialect() {
        let empty = Value::empty_object();
        assert_eq!(
            to_boolean(&empty, Dialect::JsonLogic),
            Value::boolean(true)
        );
        assert_eq!(
            to_boolean(&empty, Dialect::CertLogic),
            Value::boolean(false)
        );
    }

    #[test]
    fn to_boolean_array_is_false_iff_empty() {
        assert_eq!(
            to_boolean(&Value::empty_array(), Dialect::JsonLogic),
            Value::boolean(false)
        );
        assert_eq!(
            to_boolean(&Value::array(vec![Value::null()]), Dialect::JsonLogic),
            Value::boolean(true)
        );
    }

    #[test]
    fn to_number_object_is_nan() {
        assert!(to_number(&Value::empty_object()).is_nan());
    }

    #[test]
    fn to_number_string_trims_and_parses() {
        assert_eq!(to_number(&Value::string_from_str("  42 ")), 42.0);
        assert_eq!(to_number(&Value::string_from_str("")), 0.0);
        assert!(to_number(&Value::string_from_str("nope")).is_nan());
        assert_eq!(to_number(&Value::string_from_str("Infinity")), f64::INFINITY);
    }

    #[test]
    fn to_number_single_element_array_recurses() {
        assert_eq!(to_number(&Value::array(vec![Value::number(5.0)])), 5.0);
        assert_eq!(to_number(&Value::empty_array()), 0.0);
        assert!(to_number(&Value::array(vec![Value::number(1.0), Value::number(2.0)])).is_nan());
    }

    #[test]
    fn to_string_object_is_fixed_literal() {
        assert_eq!(to_string(&Value::empty_object()), "[object Object]");
    }

    #[test]
    fn to_string_array_joins_without_brackets() {
        assert_eq!(
            to_string(&Value::array(vec![Value::number(1.0), Value::number(2.0)])),
            "1,2"
        );
    }

    #[test]
    fn loose_equal_leftmost_error_wins() {
        let err = Value::error_default(ErrorKind::IllegalArgument);
        let result = loose_equal(&err, &Value::number(1.0));
        assert!(result.is_error());
    }

    #[test]
    fn loose_equal_number_and_string() {
        assert_eq!(
            loose_equal(&Value::number(1.0), &Value::string_from_str("1")),
            Value::boolean(true)
        );
    }

    #[test]
    fn strict_equal_arrays_require_identity() {
        let a = Value::array(vec![Value::number(1.0)]);
        let b = Value::array(vec![Value::number(1.0)]);
        assert_eq!(strict_equal(&a, &b), Value::boolean(false));
        let c = a.clone();
        assert_eq!(strict_equal(&a, &c), Value::boolean(true));
    }

    #[test]
    fn deep_strict_equal_compares_structurally() {
        let a = Value::array(vec![Value::number(1.0), Value::string_from_str("a")]);
        let b = Value::array(vec![Value::number(1.0), Value::string_from_str("a")]);
        assert!(deep_strict_equal(&a, &b));
    }

    #[test]
    fn ordering_falls_back_to_false_for_incomparable_types() {
        assert_eq!(lt(&Value::null(), &Value::boolean(true)), Value::boolean(false));
        assert_eq!(gt(&Value::null(), &Value::boolean(true)), Value::boolean(false));
    }

    #[test]
    fn le_falls_back_to_loose_equality() {
        assert_eq!(le(&Value::null(), &Value::null()), Value::boolean(true));
    }
}
