//! The rule evaluator (C7): a recursive walk that turns a rule value plus a
//! data value into a result value, dispatching special forms directly and
//! ordinary operators through a [`Registry`].
//!
//! Grounded on `original_source/src/apply.c`'s `jsonlogic_apply_custom` and
//! `original_source/src/certlogic.c`'s `certlogic_apply_custom` (the latter
//! reusing `apply.c` wholesale via textual inclusion and swapping in its own
//! truthiness rule and special-form subset).

use std::cell::RefCell;

use crate::coerce::{self, Dialect};
use crate::error::ErrorKind;
use crate::registry::Registry;
use crate::value::array::ArrayBuf;
use crate::value::object::ObjectBuf;
use crate::value::string::JsonString;
use crate::value::Value;

/// Which rule dialect governs this evaluation: which special forms are
/// recognized and which truthiness rule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lang {
    JsonLogic,
    CertLogic,
}

impl Lang {
    fn dialect(self) -> Dialect {
        match self {
            Lang::JsonLogic => Dialect::JsonLogic,
            Lang::CertLogic => Dialect::CertLogic,
        }
    }
}

/// Evaluate `rule` against `data` using the default JsonLogic registry.
pub fn apply(rule: &Value, data: &Value) -> Value {
    crate::ops::with_json_logic_builtins(|registry| apply_custom(rule, data, registry))
}

/// Evaluate `rule` against `data` using a caller-supplied registry.
pub fn apply_custom(rule: &Value, data: &Value, registry: &Registry) -> Value {
    eval(rule, data, registry, Lang::JsonLogic)
}

/// Evaluate `rule` against `data` using the default CertLogic registry.
pub fn certlogic_apply(rule: &Value, data: &Value) -> Value {
    crate::ops::with_cert_logic_builtins(|registry| certlogic_apply_custom(rule, data, registry))
}

/// Evaluate `rule` against `data` using a caller-supplied CertLogic registry.
pub fn certlogic_apply_custom(rule: &Value, data: &Value, registry: &Registry) -> Value {
    eval(rule, data, registry, Lang::CertLogic)
}

fn eval(rule: &Value, data: &Value, registry: &Registry, lang: Lang) -> Value {
    match rule {
        Value::Array(items) => {
            let mut out = ArrayBuf::with_capacity(items.len());
            for item in items.as_slice() {
                out.push(eval(item, data, registry, lang));
            }
            Value::Array(std::rc::Rc::new(out.take()))
        }
        Value::Object(obj) => {
            if obj.len() != 1 {
                return rule.clone();
            }
            let (op_name, raw_args) = obj.iter().next().expect("len == 1 checked above");
            let op = op_name.to_string_lossy();

            let args: Vec<Value> = match raw_args {
                Value::Array(a) => a.as_slice().to_vec(),
                other => vec![other.clone()],
            };

            eval_operator(&op, &args, data, registry, lang)
        }
        _ => rule.clone(),
    }
}

fn eval_operator(op: &str, args: &[Value], data: &Value, registry: &Registry, lang: Lang) -> Value {
    match (op, lang) {
        ("if", _) | ("?:", Lang::JsonLogic) => eval_if(args, data, registry, lang),
        ("and", _) => eval_and(args, data, registry, lang),
        ("or", Lang::JsonLogic) => eval_or(args, data, registry, lang),
        ("filter", Lang::JsonLogic) => eval_filter(args, data, registry, lang),
        ("map", Lang::JsonLogic) => eval_map(args, data, registry, lang),
        ("reduce", _) => eval_reduce(args, data, registry, lang),
        ("all", Lang::JsonLogic) => eval_all(args, data, registry, lang),
        ("some", Lang::JsonLogic) => eval_some(args, data, registry, lang),
        ("none", Lang::JsonLogic) => eval_none(args, data, registry, lang),
        _ => eval_ordinary(op, args, data, registry, lang),
    }
}

fn eval_if(args: &[Value], data: &Value, registry: &Registry, lang: Lang) -> Value {
    let mut i = 0;
    while i + 1 < args.len() {
        let cond = eval(&args[i], data, registry, lang);
        if coerce::to_bool(&cond, lang.dialect()) {
            return eval(&args[i + 1], data, registry, lang);
        }
        i += 2;
    }
    if i < args.len() {
        eval(&args[i], data, registry, lang)
    } else {
        Value::null()
    }
}

fn eval_and(args: &[Value], data: &Value, registry: &Registry, lang: Lang) -> Value {
    let mut last = Value::null();
    for arg in args {
        last = eval(arg, data, registry, lang);
        if !coerce::to_bool(&last, lang.dialect()) {
            return last;
        }
    }
    last
}

fn eval_or(args: &[Value], data: &Value, registry: &Registry, lang: Lang) -> Value {
    let mut last = Value::null();
    for arg in args {
        last = eval(arg, data, registry, lang);
        if coerce::to_bool(&last, lang.dialect()) {
            return last;
        }
    }
    last
}

fn eval_filter(args: &[Value], data: &Value, registry: &Registry, lang: Lang) -> Value {
    let Some(list_expr) = args.first() else {
        return Value::empty_array();
    };
    let Some(pred_expr) = args.get(1) else {
        return Value::empty_array();
    };
    let list = eval(list_expr, data, registry, lang);
    if matches!(list, Value::Error(..)) {
        return list;
    }
    let Value::Array(items) = &list else {
        return Value::empty_array();
    };
    let mut out = ArrayBuf::new();
    for item in items.as_slice() {
        let kept = eval(pred_expr, item, registry, lang);
        if coerce::to_bool(&kept, lang.dialect()) {
            out.push(item.clone());
        }
    }
    Value::Array(std::rc::Rc::new(out.take()))
}

fn eval_map(args: &[Value], data: &Value, registry: &Registry, lang: Lang) -> Value {
    let Some(list_expr) = args.first() else {
        return Value::empty_array();
    };
    let Some(pred_expr) = args.get(1) else {
        return Value::empty_array();
    };
    let list = eval(list_expr, data, registry, lang);
    if matches!(list, Value::Error(..)) {
        return list;
    }
    let Value::Array(items) = &list else {
        return Value::empty_array();
    };
    let mut out = ArrayBuf::with_capacity(items.len());
    for item in items.as_slice() {
        out.push(eval(pred_expr, item, registry, lang));
    }
    Value::Array(std::rc::Rc::new(out.take()))
}

/// `reduce`'s per-iteration context: `accumulator` and `current` (and,
/// in the certificate dialect, the outer `data`), realized as a small
/// interior-mutability cell instead of a general hash map since only
/// these fixed slots are ever addressed.
struct ReduceContext {
    accumulator: RefCell<Value>,
    current: RefCell<Value>,
    outer_data: Option<Value>,
}

impl ReduceContext {
    /// Build the object handed to `body_expr` for one iteration, reading
    /// the cells as of the call -- this is a fresh, read-only snapshot, not
    /// the mutable cell itself (finished `JsonObject`s never expose interior
    /// mutability, per §3).
    fn snapshot(&self) -> Value {
        let mut buf = ObjectBuf::new();
        buf.set(JsonString::from_str("accumulator"), self.accumulator.borrow().clone());
        buf.set(JsonString::from_str("current"), self.current.borrow().clone());
        if let Some(data) = &self.outer_data {
            buf.set(JsonString::from_str("data"), data.clone());
        }
        Value::Object(std::rc::Rc::new(buf.take()))
    }
}

fn eval_reduce(args: &[Value], data: &Value, registry: &Registry, lang: Lang) -> Value {
    let Some(list_expr) = args.first() else {
        return Value::null();
    };
    let init = args.get(2).cloned().unwrap_or(Value::null());
    let list = eval(list_expr, data, registry, lang);
    if matches!(list, Value::Error(..)) {
        return list;
    }
    let Value::Array(items) = &list else {
        return init;
    };
    let Some(body_expr) = args.get(1) else {
        return init;
    };

    let ctx = ReduceContext {
        accumulator: RefCell::new(init),
        current: RefCell::new(Value::null()),
        outer_data: matches!(lang, Lang::CertLogic).then(|| data.clone()),
    };

    for item in items.as_slice() {
        *ctx.current.borrow_mut() = item.clone();
        let snapshot = ctx.snapshot();
        let next = eval(body_expr, &snapshot, registry, lang);
        *ctx.accumulator.borrow_mut() = next;
    }

    ctx.accumulator.into_inner()
}

fn eval_all(args: &[Value], data: &Value, registry: &Registry, lang: Lang) -> Value {
    let Some(list_expr) = args.first() else {
        return Value::boolean(false);
    };
    let Some(pred_expr) = args.get(1) else {
        return Value::boolean(false);
    };
    let list = eval(list_expr, data, registry, lang);
    if matches!(list, Value::Error(..)) {
        return list;
    }
    let Value::Array(items) = &list else {
        return Value::boolean(false);
    };
    if items.is_empty() {
        return Value::boolean(false);
    }
    let all = items.as_slice().iter().all(|item| {
        let result = eval(pred_expr, item, registry, lang);
        coerce::to_bool(&result, lang.dialect())
    });
    Value::boolean(all)
}

fn eval_some(args: &[Value], data: &Value, registry: &Registry, lang: Lang) -> Value {
    let Some(list_expr) = args.first() else {
        return Value::boolean(false);
    };
    let Some(pred_expr) = args.get(1) else {
        return Value::boolean(false);
    };
    let list = eval(list_expr, data, registry, lang);
    if matches!(list, Value::Error(..)) {
        return list;
    }
    let Value::Array(items) = &list else {
        return Value::boolean(false);
    };
    let any = items.as_slice().iter().any(|item| {
        let result = eval(pred_expr, item, registry, lang);
        coerce::to_bool(&result, lang.dialect())
    });
    Value::boolean(any)
}

fn eval_none(args: &[Value], data: &Value, registry: &Registry, lang: Lang) -> Value {
    match eval_some(args, data, registry, lang) {
        Value::Boolean(b) => Value::boolean(!b),
        other => other,
    }
}

fn eval_ordinary(op: &str, args: &[Value], data: &Value, registry: &Registry, lang: Lang) -> Value {
    let evaluated: Vec<Value> = args.iter().map(|a| eval(a, data, registry, lang)).collect();
    match registry.get(op) {
        Some(operation) => operation.call(data, &evaluated),
        None => Value::error_default(ErrorKind::IllegalOperation),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_str;

    fn run(rule_json: &str, data_json: &str) -> Value {
        let rule = parse_str(rule_json).unwrap();
        let data = parse_str(data_json).unwrap();
        apply(&rule, &data)
    }

    #[test]
    fn non_object_rule_is_itself() {
        assert_eq!(run("5", "null"), Value::number(5.0));
        assert_eq!(run("\"x\"", "null"), Value::string_from_str("x"));
    }

    #[test]
    fn arrays_evaluate_elementwise() {
        let v = run(r#"[{"var": "a"}, {"var": "b"}]"#, r#"{"a": 1, "b": 2}"#);
        assert_eq!(v, Value::array(vec![Value::number(1.0), Value::number(2.0)]));
    }

    #[test]
    fn multi_key_object_is_treated_as_data() {
        let rule = Value::object(vec![
            ("a".into(), Value::number(1.0)),
            ("b".into(), Value::number(2.0)),
        ]);
        let result = apply(&rule, &Value::null());
        assert_eq!(result, rule);
    }

    #[test]
    fn if_picks_first_truthy_branch() {
        assert_eq!(
            run(r#"{"if": [false, "a", true, "b", "c"]}"#, "null"),
            Value::string_from_str("b")
        );
        assert_eq!(run(r#"{"if": [false, "a"]}"#, "null"), Value::null());
    }

    #[test]
    fn and_short_circuits_on_first_falsy() {
        assert_eq!(run(r#"{"and": [1, 0, 2]}"#, "null"), Value::number(0.0));
        assert_eq!(run(r#"{"and": [1, 2]}"#, "null"), Value::number(2.0));
        assert_eq!(run(r#"{"and": []}"#, "null"), Value::null());
    }

    #[test]
    fn or_short_circuits_on_first_truthy() {
        assert_eq!(run(r#"{"or": [0, 3, 4]}"#, "null"), Value::number(3.0));
    }

    #[test]
    fn filter_keeps_only_truthy_predicate_results() {
        let v = run(
            r#"{"filter": [[1,2,3,4], {">": [{"var": ""}, 2]}]}"#,
            "null",
        );
        assert_eq!(v, Value::array(vec![Value::number(3.0), Value::number(4.0)]));
    }

    #[test]
    fn map_transforms_each_element() {
        let v = run(r#"{"map": [[1,2,3], {"*": [{"var": ""}, 2]}]}"#, "null");
        assert_eq!(
            v,
            Value::array(vec![
                Value::number(2.0),
                Value::number(4.0),
                Value::number(6.0)
            ])
        );
    }

    #[test]
    fn reduce_folds_with_accumulator_and_current() {
        let v = run(
            r#"{"reduce": [[1,2,3,4], {"+": [{"var": "accumulator"}, {"var": "current"}]}, 0]}"#,
            "null",
        );
        assert_eq!(v, Value::number(10.0));
    }

    #[test]
    fn all_some_none_are_false_on_empty_or_non_array() {
        assert_eq!(run(r#"{"all": [[], {"var": ""}]}"#, "null"), Value::boolean(false));
        assert_eq!(run(r#"{"some": [[], {"var": ""}]}"#, "null"), Value::boolean(false));
        assert_eq!(run(r#"{"none": [[], {"var": ""}]}"#, "null"), Value::boolean(true));
    }

    #[test]
    fn all_requires_every_element_truthy() {
        assert_eq!(run(r#"{"all": [[1,2,3], {">": [{"var": ""}, 0]}]}"#, "null"), Value::boolean(true));
        assert_eq!(run(r#"{"all": [[1,2,-1], {">": [{"var": ""}, 0]}]}"#, "null"), Value::boolean(false));
    }

    #[test]
    fn unknown_operator_is_illegal_operation() {
        let result = run(r#"{"nope": []}"#, "null");
        assert_eq!(result.error_kind(), Some(ErrorKind::IllegalOperation));
    }

    #[test]
    fn certlogic_has_no_or_filter_map_all_some_none() {
        let rule = parse_str(r#"{"or": [true, false]}"#).unwrap();
        let result = certlogic_apply(&rule, &Value::null());
        assert_eq!(result.error_kind(), Some(ErrorKind::IllegalOperation));
    }

    #[test]
    fn certlogic_reduce_binds_outer_data() {
        let rule = parse_str(
            r#"{"reduce": [[1,2], {"+": [{"var": "accumulator"}, {"var": "data.offset"}]}, 0]}"#,
        )
        .unwrap();
        let data = parse_str(r#"{"offset": 10}"#).unwrap();
        let result = certlogic_apply(&rule, &data);
        assert_eq!(result, Value::number(20.0));
    }
}
