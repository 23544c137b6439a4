//! Cross-module scenario tests, end to end from a JSON string through
//! evaluation and back. Each test here is a scenario a unit test can't
//! exercise in isolation — evaluation order, dialect registries, malformed
//! input, or full parse/apply/stringify round trips.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;

use jsonlogic::coerce::deep_strict_equal;
use jsonlogic::{apply, apply_custom, apply_json_str, parse, parse_str, stringify, Error, ErrorKind, Registry, Value};

fn record(context: &dyn Any, _data: &Value, args: &[Value]) -> Value {
    let log = context
        .downcast_ref::<RefCell<Vec<Value>>>()
        .expect("recording ops are always given a RefCell<Vec<Value>> context");
    let first = args.first().cloned().unwrap_or(Value::null());
    log.borrow_mut().push(first.clone());
    first
}

#[test]
fn if_short_circuits_and_never_evaluates_later_branches() {
    let conditions = Rc::new(RefCell::new(Vec::new()));
    let consequences = Rc::new(RefCell::new(Vec::new()));

    let mut registry = Registry::new();
    jsonlogic::with_json_logic_builtins(|base| registry.extend(base));
    registry.set("push.if", conditions.clone(), record);
    registry.set("push.then", consequences.clone(), record);
    registry.set("push.else", consequences.clone(), record);

    let rule = parse_str(
        r#"{"if": [
            {"push.if": [true]}, {"push.then": ["first"]},
            {"push.if": [false]}, {"push.then": ["second"]},
            {"push.else": ["third"]}
        ]}"#,
    )
    .unwrap();

    let result = apply_custom(&rule, &Value::null(), &registry);
    assert_eq!(result, Value::string_from_str("first"));
    assert_eq!(conditions.borrow().clone(), vec![Value::boolean(true)]);
    assert_eq!(consequences.borrow().clone(), vec![Value::string_from_str("first")]);
}

#[test]
fn substr_negative_size_uses_utf16_code_units() {
    assert_eq!(apply_json_str(r#"{"substr": ["äöü", 0, -2]}"#, "null").unwrap(), "\"ä\"");
}

#[test]
fn var_with_fallback_on_missing_path() {
    assert_eq!(apply_json_str(r#"{"var": ["a", "fallback"]}"#, "null").unwrap(), "\"fallback\"");
}

#[test]
fn malformed_json_reports_syntax_error_with_position() {
    let result = parse(br#"{"foo": "bar" "a":"b"}"#);
    let err = result.unwrap_err();
    assert_eq!(err.line_info().lineno, 1);
    assert!(matches!(Error::from(err), Error::Parse(_)));
}

#[test]
fn unknown_operator_is_illegal_operation() {
    let rule = parse_str(r#"{"fubar": []}"#).unwrap();
    let result = apply(&rule, &Value::null());
    assert_eq!(result.error_kind(), Some(ErrorKind::IllegalOperation));
}

#[test]
fn deep_equality_holds_after_a_parse_round_trip() {
    let parsed = parse_str(r#"[1,"a",{"k":true}]"#).unwrap();
    let built = Value::array(vec![
        Value::number(1.0),
        Value::string_from_str("a"),
        Value::object(vec![("k".to_string(), Value::boolean(true))]),
    ]);
    assert!(deep_strict_equal(&parsed, &built));
}

#[test]
fn stringify_then_parse_round_trips_a_nested_rule() {
    let rule = parse_str(r#"{"and": [{"var": "a"}, {">": [{"var": "b"}, 1]}]}"#).unwrap();
    let text = stringify(&rule);
    let reparsed = parse_str(&text).unwrap();
    assert!(deep_strict_equal(&rule, &reparsed));
}

#[test]
fn certlogic_and_jsonlogic_disagree_on_or() {
    assert_eq!(apply_json_str(r#"{"or": [true, false]}"#, "null").unwrap(), "true");
    let cert_rule = parse_str(r#"{"or": [true, false]}"#).unwrap();
    let cert_result = jsonlogic::certlogic_apply(&cert_rule, &Value::null());
    assert_eq!(cert_result.error_kind(), Some(ErrorKind::IllegalOperation));
}

/// Cross-check the stringifier against an independent JSON implementation,
/// rather than just re-parsing with our own reader.
#[test]
fn stringify_output_matches_an_independent_json_parser() {
    let source = r#"{"merge": [[1, 2], [3], "x"]}"#;
    let rule = parse_str(source).unwrap();
    let text = stringify(&rule);

    let ours: serde_json::Value = serde_json::from_str(&text).unwrap();
    let oracle: serde_json::Value = serde_json::from_str(source).unwrap();
    assert_eq!(ours, oracle);
}

/// Object starting capacity is 4, resizing once `used + 1 > capacity / 2`, so
/// six entries force at least one resize. Iteration order should still
/// match insertion order afterwards.
#[test]
fn object_iteration_order_survives_a_resize() {
    let keys = ["a", "b", "c", "d", "e", "f"];
    let rule = Value::object(
        keys.iter()
            .map(|k| (k.to_string(), Value::string_from_str(k)))
            .collect(),
    );
    let object = rule.as_object().unwrap();
    let seen: Vec<String> = object.iter().map(|(k, _)| k.to_string_lossy()).collect();
    assert_eq!(seen, keys.to_vec());
}

/// `apply` evaluates a rule against data without observably mutating either:
/// a shared substructure's refcount should be the same before and after.
#[test]
fn apply_does_not_mutate_shared_refcounts() {
    let shared = Value::array(vec![Value::number(1.0), Value::number(2.0)]);
    let data = Value::object(vec![("xs".to_string(), shared.clone())]);
    let rule = parse_str(r#"{"var": "xs"}"#).unwrap();

    let before = shared.get_refcount();
    {
        let result = apply(&rule, &data);
        assert!(deep_strict_equal(&result, &shared));
    }
    let after = shared.get_refcount();

    assert_eq!(before, after);
}
