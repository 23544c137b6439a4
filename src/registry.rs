//! Operation registry (C6): a name -> `{context, function}` map used by the
//! evaluator to dispatch ordinary (non-special-form) operators.
//!
//! Grounded directly on `original_source/src/operations.c`'s
//! `jsonlogic_operations_set_with_hash`/resize algorithm — the same
//! open-addressed, linear-probing, load-factor-≤-0.5, double-on-overflow
//! discipline as [`crate::value::object::ObjectBuf`] (§4.2), but starting at
//! capacity 16 rather than 4, per the grounding source's own starting size
//! for this table. Unlike the object container, a registry stays mutable
//! after construction (`set`/`extend` take `&mut self`) — callers build
//! custom dialects by layering `extend` calls over a default registry, so
//! there is no builder/finished split here.

use std::any::Any;
use std::rc::Rc;

use crate::value::string::{fnv1a_utf16, JsonString};
use crate::value::Value;

/// The shape every built-in operation implements: given its own context
/// pointer, the current data value, and the already-evaluated argument
/// list, produce a result value.
///
/// A plain function pointer is sufficient since no built-in needs
/// heap-captured closure state beyond what `context` already threads
/// through, mirroring the grounding source's `void *context` parameter.
pub type OperationFn = fn(context: &dyn Any, data: &Value, args: &[Value]) -> Value;

/// An operation entry: a function together with whatever context it closes
/// over (often `()`, sometimes a dialect marker).
///
#[derive(Clone)]
pub struct Operation {
    pub context: Rc<dyn Any>,
    pub func: OperationFn,
}

impl Operation {
    pub fn call(&self, data: &Value, args: &[Value]) -> Value {
        (self.func)(self.context.as_ref(), data, args)
    }
}

struct Slot {
    name: Option<JsonString>,
    hash: u64,
    op: Option<Operation>,
}

fn empty_slot() -> Slot {
    Slot {
        name: None,
        hash: 0,
        op: None,
    }
}

/// An operation table: name lookup by pre-computed hash, insert-or-update,
/// and bulk merge from another registry.
#[derive(Default)]
pub struct Registry {
    slots: Vec<Slot>,
    used: usize,
}

impl Registry {
    pub fn new() -> Self {
        Registry {
            slots: Vec::new(),
            used: 0,
        }
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.used
    }

    pub fn is_empty(&self) -> bool {
        self.used == 0
    }

    /// Look up an operation by a pre-hashed name, via linear probing from
    /// `hash % capacity`.
    pub fn get_with_hash(&self, hash: u64, name: &[u16]) -> Option<&Operation> {
        let capacity = self.capacity();
        if capacity == 0 {
            return None;
        }
        let start = (hash % capacity as u64) as usize;
        let mut index = start;
        loop {
            let slot = &self.slots[index];
            match &slot.name {
                None => return None,
                Some(n) if n.as_units() == name => return slot.op.as_ref(),
                Some(_) => {}
            }
            index = (index + 1) % capacity;
            if index == start {
                return None;
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Operation> {
        let units: Vec<u16> = name.encode_utf16().collect();
        let hash = fnv1a_utf16(&units);
        self.get_with_hash(hash, &units)
    }

    /// Insert or update `name` -> `{context, func}`. Grounded on
    /// `jsonlogic_operations_set_with_hash`: empty-slot insert when load
    /// factor allows, update-in-place on name match, otherwise a
    /// capacity-doubling resize that re-probes old entries in ascending
    /// slot-index order.
    pub fn set(&mut self, name: &str, context: Rc<dyn Any>, func: OperationFn) {
        let name = JsonString::from_str(name);
        let op = Operation { context, func };

        if self.slots.is_empty() {
            let new_size = 16usize;
            self.slots = (0..new_size).map(|_| empty_slot()).collect();
            let hash = name.hash();
            let index = (hash % new_size as u64) as usize;
            self.slots[index] = Slot {
                name: Some(name),
                hash,
                op: Some(op),
            };
            self.used = 1;
            return;
        }

        let size = self.capacity();
        let hash = name.hash();
        let start = (hash % size as u64) as usize;
        let mut index = start;
        loop {
            let is_empty = self.slots[index].name.is_none();
            if is_empty {
                if self.used + 1 > size / 2 {
                    break; // resize and insert instead
                }
                self.slots[index] = Slot {
                    name: Some(name),
                    hash,
                    op: Some(op),
                };
                self.used += 1;
                return;
            }
            let matches = self.slots[index]
                .name
                .as_ref()
                .is_some_and(|n| n.as_units() == name.as_units());
            if matches {
                self.slots[index] = Slot {
                    name: Some(name),
                    hash,
                    op: Some(op),
                };
                return;
            }
            index = (index + 1) % size;
            if index == start {
                break; // fully probed a saturated table; resize and insert
            }
        }

        self.resize_and_insert(name, hash, op);
    }

    fn resize_and_insert(&mut self, name: JsonString, hash: u64, op: Operation) {
        let new_size = self.capacity() * 2;
        let mut new_slots: Vec<Slot> = (0..new_size).map(|_| empty_slot()).collect();

        let old_slots = std::mem::take(&mut self.slots);
        for slot in old_slots {
            if let (Some(n), Some(o)) = (slot.name, slot.op) {
                let h = slot.hash;
                let start = (h % new_size as u64) as usize;
                let mut index = start;
                loop {
                    if new_slots[index].name.is_none() {
                        new_slots[index] = Slot {
                            name: Some(n),
                            hash: h,
                            op: Some(o),
                        };
                        break;
                    }
                    index = (index + 1) % new_size;
                }
            }
        }

        let start = (hash % new_size as u64) as usize;
        let mut index = start;
        loop {
            let is_empty = new_slots[index].name.is_none();
            if is_empty {
                new_slots[index] = Slot {
                    name: Some(name),
                    hash,
                    op: Some(op),
                };
                break;
            }
            let matches = new_slots[index]
                .name
                .as_ref()
                .is_some_and(|n| n.as_units() == name.as_units());
            if matches {
                new_slots[index] = Slot {
                    name: Some(name),
                    hash,
                    op: Some(op),
                };
                break;
            }
            index = (index + 1) % new_size;
        }

        self.slots = new_slots;
        self.used += 1;
    }

    /// Build a registry from a fixed list of `(name, context, func)` entries,
    /// computing each name's hash once at construction time.
    ///
    /// Grounded on `jsonlogic_operations_build`'s NULL-terminated build-entry
    /// array, reworked here as an ordinary Rust slice.
    pub fn build(entries: &[(&str, Rc<dyn Any>, OperationFn)]) -> Registry {
        let mut registry = Registry::new();
        for (name, context, func) in entries {
            registry.set(name, Rc::clone(context), *func);
        }
        registry
    }

    /// Copy every entry of `other` into `self`, `other` taking priority on
    /// name collisions.
    ///
    /// Grounded on `jsonlogic_operations_extend`, which memcpy's wholesale
    /// into an empty target and falls back to per-entry `set` otherwise;
    /// here the empty-target case is just the general loop with zero prior
    /// entries, so no separate fast path is needed.
    pub fn extend(&mut self, other: &Registry) {
        for slot in other.slots.iter() {
            if let (Some(name), Some(op)) = (&slot.name, &slot.op) {
                self.set(&name.to_string_lossy(), Rc::clone(&op.context), op.func);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &dyn Any, _: &Value, _: &[Value]) -> Value {
        Value::null()
    }

    fn answer(_: &dyn Any, _: &Value, _: &[Value]) -> Value {
        Value::number(42.0)
    }

    #[test]
    fn get_after_build_returns_operation() {
        let reg = Registry::build(&[("noop", Rc::new(()), noop), ("answer", Rc::new(()), answer)]);
        assert!(reg.get("noop").is_some());
        let op = reg.get("answer").unwrap();
        assert_eq!(op.call(&Value::null(), &[]), Value::number(42.0));
        assert!(reg.get("missing").is_none());
    }

    #[test]
    fn set_twice_updates_in_place_without_growing_len() {
        let mut reg = Registry::new();
        reg.set("x", Rc::new(()), noop);
        reg.set("x", Rc::new(()), answer);
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.get("x").unwrap().call(&Value::null(), &[]), Value::number(42.0));
    }

    #[test]
    fn all_entries_survive_a_resize() {
        let entries: Vec<(&str, Rc<dyn Any>, OperationFn)> = vec![
            ("a", Rc::new(()), noop),
            ("b", Rc::new(()), noop),
            ("c", Rc::new(()), noop),
            ("d", Rc::new(()), noop),
            ("e", Rc::new(()), noop),
            ("f", Rc::new(()), noop),
            ("g", Rc::new(()), noop),
            ("h", Rc::new(()), noop),
            ("i", Rc::new(()), noop),
        ];
        let reg = Registry::build(&entries);
        assert_eq!(reg.len(), entries.len());
        for (name, _, _) in &entries {
            assert!(reg.get(name).is_some(), "missing {name}");
        }
    }

    #[test]
    fn extend_prefers_the_extending_registry_on_collision() {
        let mut base = Registry::build(&[("x", Rc::new(()), noop)]);
        let overrides = Registry::build(&[("x", Rc::new(()), answer), ("y", Rc::new(()), answer)]);
        base.extend(&overrides);
        assert_eq!(base.len(), 2);
        assert_eq!(
            base.get("x").unwrap().call(&Value::null(), &[]),
            Value::number(42.0)
        );
        assert_eq!(
            base.get("y").unwrap().call(&Value::null(), &[]),
            Value::number(42.0)
        );
    }
}
