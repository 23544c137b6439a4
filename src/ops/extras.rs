//! Extra, non-default built-ins (C8): `DAYS`, `HOURS`, `NOW`, `ZIP`,
//! `COMBINATIONS`.
//!
//! Grounded on `original_source/src/extras.c`'s `jsonlogic_extra_*` family.
//! That file also defines `PARSE_TIME`, `TIME_SINCE`, `FORMAT_TIME`, and
//! `ADD_YEARS`, all of which depend on a hand-rolled ISO-8601 parser whose
//! definition never appears in this corpus (only call sites and a
//! declaration) — they are left out here rather than guessed at.

use std::any::Any;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::coerce;
use crate::error::ErrorKind;
use crate::value::array::ArrayBuf;
use crate::value::Value;

pub fn days(_context: &dyn Any, _data: &Value, args: &[Value]) -> Value {
    match args.first() {
        None => Value::error_default(ErrorKind::IllegalArgument),
        Some(v) => Value::number(coerce::to_number(v) * 24.0 * 60.0 * 60.0 * 1000.0),
    }
}

pub fn hours(_context: &dyn Any, _data: &Value, args: &[Value]) -> Value {
    match args.first() {
        None => Value::error_default(ErrorKind::IllegalArgument),
        Some(v) => Value::number(coerce::to_number(v) * 60.0 * 60.0 * 1000.0),
    }
}

/// Milliseconds since the Unix epoch, matching the grounding source's
/// `gettimeofday`-based clock.
pub fn now(_context: &dyn Any, _data: &Value, _args: &[Value]) -> Value {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => Value::number(elapsed.as_millis() as f64),
        Err(_) => Value::error_default(ErrorKind::InternalError),
    }
}

/// `zip`: transposes N equal-role arrays into an array of N-tuples, one per
/// index of the shortest input array.
pub fn zip(_context: &dyn Any, _data: &Value, args: &[Value]) -> Value {
    if args.is_empty() {
        return Value::Array(std::rc::Rc::new(ArrayBuf::new().take()));
    }

    let mut arrays = Vec::with_capacity(args.len());
    for arg in args {
        match arg {
            Value::Array(items) => arrays.push(items.as_slice()),
            _ => return Value::error_default(ErrorKind::IllegalArgument),
        }
    }

    let min_len = arrays.iter().map(|a| a.len()).min().unwrap_or(0);
    let mut out = ArrayBuf::with_capacity(min_len);
    for index in 0..min_len {
        let mut row = ArrayBuf::with_capacity(arrays.len());
        for array in &arrays {
            row.push(array[index].clone());
        }
        out.push(Value::Array(std::rc::Rc::new(row.take())));
    }
    Value::Array(std::rc::Rc::new(out.take()))
}

/// `combinations`: the cartesian product of every argument array, each
/// combination an array with one element drawn from each argument in order
/// (rightmost argument cycling fastest).
pub fn combinations(_context: &dyn Any, _data: &Value, args: &[Value]) -> Value {
    let empty = || Value::Array(std::rc::Rc::new(ArrayBuf::new().take()));

    if args.is_empty() {
        return empty();
    }

    let mut arrays = Vec::with_capacity(args.len());
    for arg in args {
        match arg {
            Value::Array(items) => {
                if items.is_empty() {
                    return empty();
                }
                arrays.push(items.as_slice());
            }
            _ => return empty(),
        }
    }

    let mut out = ArrayBuf::new();
    let mut current = Vec::with_capacity(arrays.len());
    build_combinations(&arrays, &mut current, &mut out);
    Value::Array(std::rc::Rc::new(out.take()))
}

fn build_combinations(remaining: &[&[Value]], current: &mut Vec<Value>, out: &mut ArrayBuf) {
    match remaining.split_first() {
        None => {
            let mut row = ArrayBuf::with_capacity(current.len());
            for value in current.iter() {
                row.push(value.clone());
            }
            out.push(Value::Array(std::rc::Rc::new(row.take())));
        }
        Some((first, rest)) => {
            for item in *first {
                current.push(item.clone());
                build_combinations(rest, current, out);
                current.pop();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(x: f64) -> Value {
        Value::number(x)
    }

    fn arr(items: Vec<Value>) -> Value {
        let mut buf = ArrayBuf::with_capacity(items.len());
        for item in items {
            buf.push(item);
        }
        Value::Array(std::rc::Rc::new(buf.take()))
    }

    #[test]
    fn days_and_hours_convert_to_milliseconds() {
        assert_eq!(days(&(), &Value::Null, &[n(1.0)]), n(86_400_000.0));
        assert_eq!(hours(&(), &Value::Null, &[n(1.0)]), n(3_600_000.0));
    }

    #[test]
    fn zip_transposes_to_the_shortest_array() {
        let result = zip(&(), &Value::Null, &[arr(vec![n(1.0), n(2.0)]), arr(vec![n(3.0), n(4.0), n(5.0)])]);
        assert_eq!(result, arr(vec![arr(vec![n(1.0), n(3.0)]), arr(vec![n(2.0), n(4.0)])]));
    }

    #[test]
    fn combinations_is_the_cartesian_product() {
        let result = combinations(&(), &Value::Null, &[arr(vec![n(1.0), n(2.0)]), arr(vec![n(3.0), n(4.0)])]);
        assert_eq!(
            result,
            arr(vec![
                arr(vec![n(1.0), n(3.0)]),
                arr(vec![n(1.0), n(4.0)]),
                arr(vec![n(2.0), n(3.0)]),
                arr(vec![n(2.0), n(4.0)]),
            ])
        );
    }

    #[test]
    fn combinations_empty_args_is_empty_array() {
        assert_eq!(combinations(&(), &Value::Null, &[]), arr(vec![]));
    }
}
