//! Data-access built-ins (C8): `var`, `missing`, `missing_some`.
//!
//! Grounded on `original_source/src/jsonlogic.c`'s `jsonlogic_op_VAR`/
//! `_MISSING`/`_MISSING_SOME` and `original_source/src/object.c`'s
//! `jsonlogic_get_utf16_sized`/`jsonlogic_get_index` member lookups.

use std::any::Any;

use crate::coerce;
use crate::value::array::ArrayBuf;
use crate::value::Value;

/// Member access by string key: `"length"` is special-cased for strings and
/// arrays, otherwise a numeric-looking key indexes directly, and anything
/// else falls through to the generic lookup for the value's own type.
/// Errors pass themselves through; booleans, numbers, and null have no
/// members and yield `null`.
fn get_member(value: &Value, key: &str) -> Value {
    match value {
        Value::String(s) => {
            if key == "length" {
                return Value::number(s.len() as f64);
            }
            match key.parse::<usize>() {
                Ok(index) => match s.code_unit_at(index) {
                    Some(unit) => Value::string_from_utf16(&[unit]),
                    None => Value::Null,
                },
                Err(_) => Value::Null,
            }
        }
        Value::Array(items) => {
            if key == "length" {
                return Value::number(items.len() as f64);
            }
            match key.parse::<usize>() {
                Ok(index) => items.get(index).cloned().unwrap_or(Value::Null),
                Err(_) => Value::Null,
            }
        }
        Value::Object(obj) => obj.get(key).cloned().unwrap_or(Value::Null),
        Value::Error(..) => value.clone(),
        Value::Number(_) | Value::Boolean(_) | Value::Null => Value::Null,
    }
}

/// Member access by numeric index, used when `var`'s path argument is
/// itself a whole number rather than a dotted string.
fn get_index(value: &Value, index: usize) -> Value {
    match value {
        Value::String(s) => match s.code_unit_at(index) {
            Some(unit) => Value::string_from_utf16(&[unit]),
            None => Value::Null,
        },
        Value::Array(items) => items.get(index).cloned().unwrap_or(Value::Null),
        Value::Object(_) => get_member(value, &coerce::to_string(&Value::number(index as f64))),
        Value::Error(..) => value.clone(),
        Value::Number(_) | Value::Boolean(_) | Value::Null => Value::Null,
    }
}

/// `var`: no argument or a `null` argument returns `data` itself; a whole
/// number indexes directly; otherwise the argument is coerced to a string
/// and traversed one `.`-separated segment at a time. Every segment,
/// including the last, falls back to the default value (`args[1]`, or
/// `null`) the moment it resolves to `null` — including when the whole path
/// is the empty string, which instead returns `data` unchanged.
pub fn var(_context: &dyn Any, data: &Value, args: &[Value]) -> Value {
    let path_arg = match args.first() {
        None => return data.clone(),
        Some(v) if v.is_null() => return data.clone(),
        Some(v) => v,
    };

    if let Value::Number(n) = path_arg {
        if n.is_finite() && *n >= 0.0 && n.fract() == 0.0 {
            return get_index(data, *n as usize);
        }
    }

    let default_value = args.get(1).cloned().unwrap_or(Value::Null);
    let path = coerce::to_string(path_arg);

    if path.is_empty() {
        return data.clone();
    }

    let mut current = data.clone();
    for segment in path.split('.') {
        current = get_member(&current, segment);
        if current.is_null() {
            return default_value;
        }
    }
    current
}

/// `missing`: `args[0]` as an array of keys, or `args` itself taken as the
/// key list; a key is missing when `var` resolves it to `null` or the empty
/// string.
pub fn missing(_context: &dyn Any, data: &Value, args: &[Value]) -> Value {
    let owned_keys;
    let keys: &[Value] = match args.first() {
        Some(Value::Array(items)) => items.as_slice(),
        _ => {
            owned_keys = args.to_vec();
            &owned_keys
        }
    };

    let mut out = ArrayBuf::with_capacity(keys.len());
    for key in keys {
        let value = var(&(), data, std::slice::from_ref(key));
        let is_missing = value.is_null() || matches!(&value, Value::String(s) if s.is_empty());
        if is_missing {
            out.push(key.clone());
        }
    }
    Value::Array(std::rc::Rc::new(out.take()))
}

/// `missing_some`: `[need_count, keys]`; if at least `need_count` of `keys`
/// are present, returns an empty array (the requirement is satisfied),
/// otherwise behaves like `missing(keys)`.
pub fn missing_some(_context: &dyn Any, data: &Value, args: &[Value]) -> Value {
    let (need_count, options) = match args {
        [need, options, ..] => (coerce::to_number(need), options),
        _ => return Value::Null,
    };

    let options_len = match options {
        Value::Array(items) => items.len(),
        _ => 1,
    };

    let missing_result = missing(&(), data, std::slice::from_ref(options));
    let Value::Array(missing_items) = &missing_result else {
        return missing_result;
    };

    if (options_len as f64) - (missing_items.len() as f64) >= need_count {
        return Value::Array(std::rc::Rc::new(ArrayBuf::new().take()));
    }

    missing_result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::object::ObjectBuf;
    use crate::value::string::JsonString;

    fn obj(pairs: Vec<(&str, Value)>) -> Value {
        let mut buf = ObjectBuf::new();
        for (k, v) in pairs {
            buf.set(JsonString::from_str(k), v);
        }
        Value::Object(std::rc::Rc::new(buf.take()))
    }

    #[test]
    fn no_arg_returns_data() {
        let data = Value::number(7.0);
        assert_eq!(var(&(), &data, &[]), data);
    }

    #[test]
    fn dotted_path_traverses_nested_objects() {
        let data = obj(vec![("a", obj(vec![("b", Value::number(9.0))]))]);
        let result = var(&(), &data, &[Value::string_from_str("a.b")]);
        assert_eq!(result, Value::number(9.0));
    }

    #[test]
    fn missing_segment_falls_back_to_default() {
        let data = obj(vec![]);
        let result = var(&(), &data, &[Value::string_from_str("a.b"), Value::string_from_str("fallback")]);
        assert_eq!(result, Value::string_from_str("fallback"));
    }

    #[test]
    fn empty_string_path_returns_data() {
        let data = Value::number(3.0);
        let result = var(&(), &data, &[Value::string_from_str("")]);
        assert_eq!(result, data);
    }

    #[test]
    fn missing_reports_absent_keys() {
        let data = obj(vec![("a", Value::number(1.0))]);
        let result = missing(
            &(),
            &data,
            &[Value::string_from_str("a"), Value::string_from_str("b")],
        );
        assert_eq!(result, {
            let mut buf = ArrayBuf::new();
            buf.push(Value::string_from_str("b"));
            Value::Array(std::rc::Rc::new(buf.take()))
        });
    }
}
