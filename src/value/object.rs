//! Object container (C2): an open-addressed hash table from string keys to
//! values, with linear probing and slot-order iteration.
//!
//! Grounded directly on `original_source/src/object.c`'s `jsonlogic_objbuf_set`:
//! starting capacity 4, resize (double) once `used + 1 > capacity / 2`, and on
//! resize, re-probe every existing entry into the new table **in ascending
//! old-slot-index order** before inserting the triggering entry. That resize
//! discipline is what makes iteration order ("table-slot order", §4.2)
//! coincide with insertion order across the object's lifetime, not merely at
//! construction.

use crate::value::string::JsonString;
use crate::value::Value;

struct Entry {
    key: Option<JsonString>,
    value: Value,
}

/// A finished, immutable object. Slots are emptied with `key: None`; the
/// `used`/`size` relationship (`used * 2 <= size`) is an invariant maintained
/// entirely by [`ObjectBuf`], since a finished `JsonObject` offers no
/// mutation.
#[derive(Debug)]
pub struct JsonObject {
    entries: Box<[Entry]>,
    used: usize,
}

impl std::fmt::Debug for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry")
            .field("key", &self.key.as_ref().map(JsonString::to_string_lossy))
            .field("value", &self.value)
            .finish()
    }
}

impl JsonObject {
    pub fn len(&self) -> usize {
        self.used
    }

    pub fn is_empty(&self) -> bool {
        self.used == 0
    }

    fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Look up a value by a pre-hashed key, via linear probing from
    /// `hash % capacity`.
    pub fn get_with_hash(&self, hash: u64, key: &[u16]) -> Option<&Value> {
        let capacity = self.capacity();
        if capacity == 0 {
            return None;
        }
        let start = (hash % capacity as u64) as usize;
        let mut index = start;
        loop {
            let entry = &self.entries[index];
            match &entry.key {
                None => return None,
                Some(k) if k.as_units() == key => return Some(&entry.value),
                Some(_) => {}
            }
            index = (index + 1) % capacity;
            if index == start {
                return None;
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        let units: Vec<u16> = key.encode_utf16().collect();
        let hash = crate::value::string::fnv1a_utf16(&units);
        self.get_with_hash(hash, &units)
    }

    /// Iterate entries in slot order (§4.2: this *is* insertion order, by
    /// construction of the resize procedure, not a separately tracked list).
    pub fn iter(&self) -> impl Iterator<Item = (&JsonString, &Value)> {
        self.entries
            .iter()
            .filter_map(|e| e.key.as_ref().map(|k| (k, &e.value)))
    }
}

impl PartialEq for JsonObject {
    fn eq(&self, other: &Self) -> bool {
        if self.used != other.used {
            return false;
        }
        self.iter().all(|(k, v)| {
            other
                .get_with_hash(k.hash(), k.as_units())
                .is_some_and(|ov| ov == v)
        })
    }
}

/// Builder for [`JsonObject`]; `set` inserts-or-updates, `take` finishes.
#[derive(Debug, Default)]
pub struct ObjectBuf {
    entries: Vec<Entry>,
    used: usize,
}

impl ObjectBuf {
    pub fn new() -> Self {
        ObjectBuf {
            entries: Vec::new(),
            used: 0,
        }
    }

    fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Insert or update `key` -> `value`. Grounded on
    /// `jsonlogic_objbuf_set`: empty-slot insert when load factor allows,
    /// update-in-place on key match, otherwise a capacity-doubling resize
    /// that re-probes old entries in ascending slot-index order.
    pub fn set(&mut self, key: JsonString, value: Value) {
        if self.entries.is_empty() {
            let new_size = 4usize;
            self.entries = (0..new_size)
                .map(|_| Entry {
                    key: None,
                    value: Value::null(),
                })
                .collect();
            let hash = key.hash();
            let index = (hash % new_size as u64) as usize;
            self.entries[index] = Entry {
                key: Some(key),
                value,
            };
            self.used = 1;
            return;
        }

        let size = self.capacity();
        let hash = key.hash();
        let start = (hash % size as u64) as usize;
        let mut index = start;
        loop {
            let is_empty = self.entries[index].key.is_none();
            if is_empty {
                if self.used + 1 > size / 2 {
                    break; // resize and insert instead
                }
                self.entries[index] = Entry {
                    key: Some(key),
                    value,
                };
                self.used += 1;
                return;
            }
            let matches = self.entries[index]
                .key
                .as_ref()
                .is_some_and(|k| k.as_units() == key.as_units());
            if matches {
                self.entries[index] = Entry {
                    key: Some(key),
                    value,
                };
                return;
            }
            index = (index + 1) % size;
            if index == start {
                break; // fully probed a saturated table; resize and insert
            }
        }

        self.resize_and_insert(key, value);
    }

    fn resize_and_insert(&mut self, key: JsonString, value: Value) {
        let new_size = self.capacity() * 2;
        let mut new_entries: Vec<Entry> = (0..new_size)
            .map(|_| Entry {
                key: None,
                value: Value::null(),
            })
            .collect();

        let old_entries = std::mem::take(&mut self.entries);
        for entry in old_entries {
            if let Some(k) = entry.key {
                let hash = k.hash();
                let start = (hash % new_size as u64) as usize;
                let mut index = start;
                loop {
                    if new_entries[index].key.is_none() {
                        new_entries[index] = Entry {
                            key: Some(k),
                            value: entry.value,
                        };
                        break;
                    }
                    index = (index + 1) % new_size;
                }
            }
        }

        let hash = key.hash();
        let start = (hash % new_size as u64) as usize;
        let mut index = start;
        loop {
            let is_empty = new_entries[index].key.is_none();
            if is_empty {
                new_entries[index] = Entry {
                    key: Some(key),
                    value,
                };
                break;
            }
            let matches = new_entries[index]
                .key
                .as_ref()
                .is_some_and(|k| k.as_units() == key.as_units());
            if matches {
                new_entries[index] = Entry {
                    key: Some(key),
                    value,
                };
                break;
            }
            index = (index + 1) % new_size;
        }

        self.entries = new_entries;
        self.used += 1;
    }

    pub fn len(&self) -> usize {
        self.used
    }

    pub fn is_empty(&self) -> bool {
        self.used == 0
    }

    pub fn take(self) -> JsonObject {
        JsonObject {
            entries: self.entries.into_boxed_slice(),
            used: self.used,
        }
    }
}
