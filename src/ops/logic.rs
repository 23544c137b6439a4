//! Logic and comparison built-ins (C8): `! !! == === != !== < <= > >=`.
//!
//! Grounded on `original_source/src/jsonlogic.c`'s `jsonlogic_op_NOT` family
//! and the chained `jsonlogic_op_LT`/`_LE`/`_GT`/`_GE` 3-argument range-check
//! shortcut (`a < b < c` tests `a < b` then `b < c`, short-circuiting on the
//! first error or `false`). CertLogic ships its own `!`/`!!` entry points
//! that apply its own truthiness rule rather than the permissive one; the
//! registry dispatch is otherwise identical (§4.7).

use std::any::Any;

use crate::coerce::{self, Dialect};
use crate::value::Value;

fn not_with(dialect: Dialect, args: &[Value]) -> Value {
    match args.first() {
        None => Value::boolean(true),
        Some(v) => coerce::not(v, dialect),
    }
}

fn to_bool_with(dialect: Dialect, args: &[Value]) -> Value {
    match args.first() {
        None => Value::boolean(false),
        Some(v) => coerce::to_boolean(v, dialect),
    }
}

pub fn not(_context: &dyn Any, _data: &Value, args: &[Value]) -> Value {
    not_with(Dialect::JsonLogic, args)
}

pub fn to_bool(_context: &dyn Any, _data: &Value, args: &[Value]) -> Value {
    to_bool_with(Dialect::JsonLogic, args)
}

pub fn cert_not(_context: &dyn Any, _data: &Value, args: &[Value]) -> Value {
    not_with(Dialect::CertLogic, args)
}

pub fn cert_to_bool(_context: &dyn Any, _data: &Value, args: &[Value]) -> Value {
    to_bool_with(Dialect::CertLogic, args)
}

pub fn eq(_context: &dyn Any, _data: &Value, args: &[Value]) -> Value {
    match args {
        [] => Value::boolean(true),
        [only] => coerce::loose_equal(only, &Value::Null),
        [a, b, ..] => coerce::loose_equal(a, b),
    }
}

pub fn strict_eq(_context: &dyn Any, _data: &Value, args: &[Value]) -> Value {
    match args {
        [] => Value::boolean(true),
        [only] => coerce::strict_equal(only, &Value::Null),
        [a, b, ..] => coerce::strict_equal(a, b),
    }
}

pub fn ne(_context: &dyn Any, _data: &Value, args: &[Value]) -> Value {
    match args {
        [] => Value::boolean(false),
        [only] => coerce::loose_not_equal(only, &Value::Null),
        [a, b, ..] => coerce::loose_not_equal(a, b),
    }
}

pub fn strict_ne(_context: &dyn Any, _data: &Value, args: &[Value]) -> Value {
    match args {
        [] => Value::boolean(false),
        [only] => coerce::strict_not_equal(only, &Value::Null),
        [a, b, ..] => coerce::strict_not_equal(a, b),
    }
}

/// Shared chained-comparison shape for `<`/`<=`/`>`/`>=`: with 3+ arguments,
/// `op(a[0], a[1])` short-circuits on error or `false`; otherwise the result
/// is `op(a[1], a[2])`.
fn chained(op: fn(&Value, &Value) -> Value, zero_ary: Value, args: &[Value]) -> Value {
    match args {
        [] => zero_ary,
        [only] => op(only, &Value::Null),
        [a, b] => op(a, b),
        [a, b, c, ..] => {
            let first = op(a, b);
            if matches!(first, Value::Error(..) | Value::Boolean(false)) {
                return first;
            }
            op(b, c)
        }
    }
}

pub fn lt(_context: &dyn Any, _data: &Value, args: &[Value]) -> Value {
    chained(coerce::lt, Value::boolean(false), args)
}

pub fn le(_context: &dyn Any, _data: &Value, args: &[Value]) -> Value {
    chained(coerce::le, Value::boolean(true), args)
}

pub fn gt(_context: &dyn Any, _data: &Value, args: &[Value]) -> Value {
    chained(coerce::gt, Value::boolean(false), args)
}

pub fn ge(_context: &dyn Any, _data: &Value, args: &[Value]) -> Value {
    chained(coerce::ge, Value::boolean(true), args)
}
