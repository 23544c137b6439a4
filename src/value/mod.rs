//! The tagged value type (C1) and its containers (C2).
//!
//! Grounded in idiom on `subset_julia_vm/src/vm/value/value_enum.rs` — a
//! tagged enum wrapping owning references to heap payloads, with cheap
//! `Clone` — but the variant *set* here is this spec's, not the teacher's
//! Julia type lattice.

pub mod array;
pub mod object;
pub mod string;

use std::rc::Rc;

use array::JsonArray;
use object::JsonObject;
use string::JsonString;

use crate::error::ErrorKind;

/// A JSON-like value handle (§3). Primitive variants are `Copy`-cheap;
/// heap variants hold an `Rc` share of an immutable, already-finished
/// container — cloning a `Value` is always O(1).
#[derive(Debug, Clone)]
pub enum Value {
    Number(f64),
    Null,
    Boolean(bool),
    String(Rc<JsonString>),
    Array(Rc<JsonArray>),
    Object(Rc<JsonObject>),
    /// An error sentinel: kind plus a human-readable message.
    Error(ErrorKind, Rc<str>),
}

impl Value {
    pub fn null() -> Value {
        Value::Null
    }

    pub fn boolean(b: bool) -> Value {
        Value::Boolean(b)
    }

    pub fn number(n: f64) -> Value {
        Value::Number(n)
    }

    pub fn string_from_str(s: &str) -> Value {
        Value::String(Rc::new(JsonString::from_str(s)))
    }

    pub fn string_from_utf16(units: &[u16]) -> Value {
        Value::String(Rc::new(JsonString::from_utf16(units.to_vec())))
    }

    pub fn string(s: JsonString) -> Value {
        Value::String(Rc::new(s))
    }

    pub fn empty_array() -> Value {
        Value::Array(Rc::new(JsonArray::from_vec(Vec::new())))
    }

    pub fn array(items: Vec<Value>) -> Value {
        Value::Array(Rc::new(JsonArray::from_vec(items)))
    }

    pub fn empty_object() -> Value {
        Value::Object(Rc::new(object::ObjectBuf::new().take()))
    }

    pub fn object(entries: Vec<(String, Value)>) -> Value {
        let mut buf = object::ObjectBuf::new();
        for (k, v) in entries {
            buf.set(JsonString::from_str(&k), v);
        }
        Value::Object(Rc::new(buf.take()))
    }

    pub fn error(kind: ErrorKind, message: impl Into<Rc<str>>) -> Value {
        Value::Error(kind, message.into())
    }

    pub fn error_default(kind: ErrorKind) -> Value {
        Value::Error(kind, Rc::from(kind.default_message()))
    }

    // -- type predicates ---------------------------------------------------

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Value::Boolean(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(..))
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Value::Error(kind, _) => Some(*kind),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Value::Error(_, msg) => Some(msg),
            _ => None,
        }
    }

    /// Lossily decode a string value to an owned `String` (surrogate pairs
    /// decoded, lone surrogates replaced). Returns `None` for non-strings.
    pub fn as_str(&self) -> Option<String> {
        match self {
            Value::String(s) => Some(s.to_string_lossy()),
            _ => None,
        }
    }

    pub fn as_json_string(&self) -> Option<&JsonString> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&JsonArray> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&JsonObject> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    // -- lifecycle compatibility surface (§3, §6) ---------------------------

    /// Returns a clone of `self` (the Rust analogue of an `incref`: a cheap
    /// `Rc::clone`/`Copy`). Kept as a named function because §6 names
    /// `incref` as part of the public lifecycle surface.
    pub fn incref(&self) -> Value {
        self.clone()
    }

    /// A no-op: dropping a `Value` already releases its share. Kept as a
    /// named function for API-surface parity with §6.
    pub fn decref(self) {}

    /// The strong-count of the underlying heap payload, or 1 for primitive
    /// variants that own no heap share. Exists for the refcount invariant
    /// tests in §8.
    pub fn get_refcount(&self) -> usize {
        match self {
            Value::String(rc) => Rc::strong_count(rc),
            Value::Array(rc) => Rc::strong_count(rc),
            Value::Object(rc) => Rc::strong_count(rc),
            Value::Error(_, rc) => Rc::strong_count(rc),
            Value::Number(_) | Value::Null | Value::Boolean(_) => 1,
        }
    }

    /// A documented no-op (§3, §9): the builder/take discipline used
    /// throughout this crate's containers makes user-constructed cycles
    /// structurally unreachable, so there is nothing for `dissolve` to break.
    /// Retained because §6 names it as part of the public lifecycle surface.
    pub fn dissolve(self) -> Value {
        self
    }

    /// An iterator over this value, per §6: arrays yield elements, objects
    /// yield keys, strings yield one-code-unit substrings; any other type
    /// yields a single `IllegalArgument` error item.
    pub fn iter(&self) -> ValueIter {
        ValueIter {
            value: self.clone(),
            index: 0,
            done: false,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        crate::coerce::deep_strict_equal(self, other)
    }
}

/// Iterator over a [`Value`]'s elements/keys/code-units (§6).
#[derive(Debug)]
pub struct ValueIter {
    value: Value,
    index: usize,
    done: bool,
}

impl Iterator for ValueIter {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        if self.done {
            return None;
        }
        match &self.value {
            Value::Array(arr) => match arr.get(self.index) {
                Some(v) => {
                    self.index += 1;
                    Some(v.clone())
                }
                None => {
                    self.done = true;
                    None
                }
            },
            Value::Object(obj) => {
                let mut it = obj.iter().skip(self.index);
                match it.next() {
                    Some((k, _)) => {
                        self.index += 1;
                        Some(Value::string(JsonString::from_utf16(k.as_units().to_vec())))
                    }
                    None => {
                        self.done = true;
                        None
                    }
                }
            }
            Value::String(s) => match s.code_unit_at(self.index) {
                Some(unit) => {
                    self.index += 1;
                    Some(Value::string_from_utf16(&[unit]))
                }
                None => {
                    self.done = true;
                    None
                }
            },
            Value::Error(..) => {
                self.done = true;
                Some(self.value.clone())
            }
            Value::Number(_) | Value::Boolean(_) | Value::Null => {
                self.done = true;
                Some(Value::error_default(ErrorKind::IllegalArgument))
            }
        }
    }
}
