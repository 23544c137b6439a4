//! Array container (C2): a fixed, immutable sequence of values built via
//! [`ArrayBuf`]'s geometric-growth `Vec`-backed builder.

use crate::value::Value;

#[derive(Debug, PartialEq)]
pub struct JsonArray {
    items: Box<[Value]>,
}

impl JsonArray {
    pub fn from_vec(items: Vec<Value>) -> Self {
        JsonArray {
            items: items.into_boxed_slice(),
        }
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }
}

/// Growable array builder; `take` hands the caller an exactly-sized
/// `JsonArray` (spare `Vec` capacity is dropped), matching §3's invariant
/// that "buffer growth is amortized only in the builder type, not in
/// finished arrays."
#[derive(Debug, Default)]
pub struct ArrayBuf {
    items: Vec<Value>,
}

impl ArrayBuf {
    pub fn new() -> Self {
        ArrayBuf { items: Vec::new() }
    }

    pub fn with_capacity(cap: usize) -> Self {
        ArrayBuf {
            items: Vec::with_capacity(cap),
        }
    }

    pub fn push(&mut self, value: Value) {
        self.items.push(value);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Shrink to the first `n` elements, dropping the rest. Only meaningful
    /// on the builder, per §4.2.
    pub fn truncate(&mut self, n: usize) {
        self.items.truncate(n);
    }

    pub fn take(self) -> JsonArray {
        JsonArray::from_vec(self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_yields_exact_length() {
        let mut buf = ArrayBuf::with_capacity(8);
        buf.push(Value::number(1.0));
        buf.push(Value::number(2.0));
        let arr = buf.take();
        assert_eq!(arr.len(), 2);
    }

    #[test]
    fn truncate_shrinks_builder() {
        let mut buf = ArrayBuf::new();
        buf.push(Value::number(1.0));
        buf.push(Value::number(2.0));
        buf.push(Value::number(3.0));
        buf.truncate(1);
        assert_eq!(buf.len(), 1);
    }
}
