//! Built-in operations (C8) and their default registries.
//!
//! Grounded on `original_source/src/compile_operations.c`'s four built-in
//! name tables (`bultin_names`, `extra_names`, `certlogic_names`,
//! `certlogic_extra_names`). The four registries below mirror those tables,
//! minus the entries whose implementation depends on a missing grounding
//! source (the ISO-8601 date/time parser backing `timestamp`, `time-since`,
//! `format-time`, `add-years`, `plusTime`, `after`, `before`,
//! `not-after`/`not-before`, and the UVCI helpers) — see `extras.rs`.
//!
//! The registries are cached `thread_local!` values rather than a
//! `once_cell::sync::Lazy` static: `Registry` holds `Rc`-based operation
//! contexts and `JsonString`'s cached hash in a `Cell`, neither `Sync`, the
//! same single-threaded-by-design tradeoff the rest of this crate's `Value`
//! tree makes. Each thread builds and keeps its own copy on first use.

mod arithmetic;
mod arrays;
mod extras;
mod logic;
mod strings;
mod var;

use std::rc::Rc;

use crate::registry::{OperationFn, Registry};

type Entry = (&'static str, OperationFn);

const JSON_LOGIC_ENTRIES: &[Entry] = &[
    ("!", logic::not),
    ("!!", logic::to_bool),
    ("!=", logic::ne),
    ("!==", logic::strict_ne),
    ("%", arithmetic::modulo),
    ("*", arithmetic::mul),
    ("+", arithmetic::add),
    ("-", arithmetic::sub),
    ("/", arithmetic::div),
    ("<", logic::lt),
    ("<=", logic::le),
    ("==", logic::eq),
    ("===", logic::strict_eq),
    (">", logic::gt),
    (">=", logic::ge),
    ("cat", strings::cat),
    ("in", arrays::includes),
    ("log", strings::log),
    ("max", arrays::max),
    ("merge", arrays::merge),
    ("min", arrays::min),
    ("missing", var::missing),
    ("missing_some", var::missing_some),
    ("substr", strings::substr),
    ("var", var::var),
];

const JSON_LOGIC_EXTRA_ENTRIES: &[Entry] = &[
    ("combinations", extras::combinations),
    ("days", extras::days),
    ("hours", extras::hours),
    ("now", extras::now),
    ("zip", extras::zip),
];

const CERT_LOGIC_ENTRIES: &[Entry] = &[
    ("!", logic::cert_not),
    ("+", arithmetic::add),
    ("<", logic::lt),
    ("<=", logic::le),
    (">", logic::gt),
    (">=", logic::ge),
    ("===", logic::strict_eq),
    ("var", var::var),
    ("in", arrays::includes),
];

const CERT_LOGIC_EXTRA_ENTRIES: &[Entry] = &[
    ("!", logic::cert_not),
    ("!!", logic::cert_to_bool),
    ("!=", logic::ne),
    ("!==", logic::strict_ne),
    ("%", arithmetic::modulo),
    ("*", arithmetic::mul),
    ("+", arithmetic::add),
    ("-", arithmetic::sub),
    ("/", arithmetic::div),
    ("<", logic::lt),
    ("<=", logic::le),
    ("==", logic::eq),
    ("===", logic::strict_eq),
    (">", logic::gt),
    (">=", logic::ge),
    ("cat", strings::cat),
    ("in", arrays::includes),
    ("log", strings::log),
    ("max", arrays::max),
    ("merge", arrays::merge),
    ("min", arrays::min),
    ("missing", var::missing),
    ("missing_some", var::missing_some),
    ("substr", strings::substr),
    ("var", var::var),
    ("combinations", extras::combinations),
    ("days", extras::days),
    ("hours", extras::hours),
    ("now", extras::now),
    ("zip", extras::zip),
];

fn build(entries: &[Entry]) -> Registry {
    let mut registry = Registry::new();
    for (name, func) in entries {
        registry.set(name, Rc::new(()), *func);
    }
    registry
}

thread_local! {
    static JSON_LOGIC_BUILTINS: Registry = build(JSON_LOGIC_ENTRIES);
    static JSON_LOGIC_EXTRAS: Registry = {
        let mut registry = build(JSON_LOGIC_ENTRIES);
        registry.extend(&build(JSON_LOGIC_EXTRA_ENTRIES));
        registry
    };
    static CERT_LOGIC_BUILTINS: Registry = build(CERT_LOGIC_ENTRIES);
    static CERT_LOGIC_EXTRAS: Registry = build(CERT_LOGIC_EXTRA_ENTRIES);
}

/// The default JsonLogic registry: the operators in the grounding source's
/// core built-in table, without its dated/optional extras.
pub fn with_json_logic_builtins<R>(f: impl FnOnce(&Registry) -> R) -> R {
    JSON_LOGIC_BUILTINS.with(f)
}

/// The JsonLogic registry extended with the implemented subset of extras
/// (`combinations`, `days`, `hours`, `now`, `zip`).
pub fn with_json_logic_extras<R>(f: impl FnOnce(&Registry) -> R) -> R {
    JSON_LOGIC_EXTRAS.with(f)
}

/// The default CertLogic registry: a narrower operator set than JsonLogic's,
/// with its own dialect-aware `!`.
pub fn with_cert_logic_builtins<R>(f: impl FnOnce(&Registry) -> R) -> R {
    CERT_LOGIC_BUILTINS.with(f)
}

/// The CertLogic registry extended with the JsonLogic core operators plus
/// the implemented extras, as the grounding source's `certlogic_extra_names`
/// table does.
pub fn with_cert_logic_extras<R>(f: impl FnOnce(&Registry) -> R) -> R {
    CERT_LOGIC_EXTRAS.with(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn json_logic_builtins_has_every_core_operator() {
        with_json_logic_builtins(|registry| {
            for (name, _) in JSON_LOGIC_ENTRIES {
                assert!(registry.get(name).is_some(), "missing {name}");
            }
        });
    }

    #[test]
    fn cert_logic_builtins_excludes_jsonlogic_only_operators() {
        with_cert_logic_builtins(|registry| {
            assert!(registry.get("var").is_some());
            assert!(registry.get("cat").is_none());
        });
    }

    #[test]
    fn extras_layer_adds_without_losing_builtins() {
        with_json_logic_extras(|registry| {
            assert!(registry.get("+").is_some());
            assert!(registry.get("now").is_some());
            let result = registry.get("days").unwrap().call(&Value::Null, &[Value::number(1.0)]);
            assert_eq!(result, Value::number(86_400_000.0));
        });
    }
}
