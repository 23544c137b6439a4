//! String built-ins (C8): `cat`, `substr`, `log`.
//!
//! Grounded on `original_source/src/jsonlogic.c`'s `jsonlogic_op_CAT`/`_LOG`
//! and `original_source/src/string.c`'s `jsonlogic_string_substr`, which
//! operates on UTF-16 code units rather than Unicode scalar values or bytes.

use std::any::Any;

use crate::coerce;
use crate::value::string::JsonString;
use crate::value::Value;

/// Concatenates the string coercion of every argument, skipping `null`
/// operands entirely (not even an empty string is inserted for them).
pub fn cat(_context: &dyn Any, _data: &Value, args: &[Value]) -> Value {
    let mut out = String::new();
    for arg in args {
        if arg.is_null() {
            continue;
        }
        out.push_str(&coerce::to_string(arg));
    }
    Value::string_from_str(&out)
}

/// `substr`: `[string, index]` or `[string, index, size]`, all three
/// operating on UTF-16 code units.
///
/// Negative `index` counts back from the end (clamped to 0 if it
/// overshoots); negative `size` is a length of `string.len() + size` units
/// copied from `index`, matching the grounding source's
/// `sz_size = string->size + dbl_size` used as a length from `sz_index`, not
/// a position relative to the whole string — this can still ask for an end
/// before `index`, which is clamped to an empty result instead of
/// underflowing.
pub fn substr(_context: &dyn Any, _data: &Value, args: &[Value]) -> Value {
    let (value, index, size) = match args {
        [v, i] => (v, i, None),
        [v, i, s, ..] => (v, i, Some(s)),
        _ => return Value::error_default(crate::error::ErrorKind::IllegalArgument),
    };

    let units: Vec<u16> = coerce::to_string(value).encode_utf16().collect();
    let len = units.len() as i64;
    let dbl_index = coerce::to_number(index) as i64;

    let start = if dbl_index < 0 {
        (len + dbl_index).max(0)
    } else {
        dbl_index.min(len)
    };

    let end = match size {
        None => len,
        Some(s) => {
            let dbl_size = coerce::to_number(s) as i64;
            let raw_end = if dbl_size < 0 {
                start + (len + dbl_size)
            } else {
                start + dbl_size
            };
            raw_end.clamp(start, len)
        }
    };

    if end <= start {
        return Value::string_from_str("");
    }

    let slice = &units[start as usize..end as usize];
    Value::string(JsonString::from_utf16(slice.to_vec()))
}

/// `log`: writes the stringified argument to stdout and returns it
/// unchanged. The one built-in with an observable side effect (§1A).
pub fn log(_context: &dyn Any, _data: &Value, args: &[Value]) -> Value {
    let value = args.first().cloned().unwrap_or(Value::Null);
    println!("{}", crate::stringify::stringify(&value));
    value
}
