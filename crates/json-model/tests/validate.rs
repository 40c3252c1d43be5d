//! Per-kind acceptance and rejection behavior.

use json_model::factory::{
    array, array_any, bool_, custom, enum_of, int, literal, none, num, object, pattern, raw, str_,
    tuple,
};
use json_model::{ErrorKind, Model, Validated};
use regex::Regex;
use serde_json::{json, Value};

fn accept(model: &Model, value: Value) -> Value {
    match model.validate(&value) {
        Validated::Valid { value, .. } => value,
        Validated::Invalid { error } => panic!("expected {value} to validate, got: {error}"),
    }
}

fn reject(model: &Model, value: Value) -> json_model::ErrorDetail {
    match model.validate(&value) {
        Validated::Valid { value, .. } => panic!("expected a failure, got value {value}"),
        Validated::Invalid { error } => *error,
    }
}

// ------------------------------------------------------------------- leaves

#[test]
fn raw_accepts_anything() {
    let model = raw();
    for value in [json!(null), json!(true), json!(1.5), json!("x"), json!([1]), json!({"a": 1})] {
        assert_eq!(accept(&model, value.clone()), value);
    }
}

#[test]
fn none_rejects_everything() {
    let model = none();
    let error = reject(&model, json!(null));
    assert_eq!(error.kind, ErrorKind::NotConfigured);
}

#[test]
fn bool_type_check() {
    let model = bool_();
    assert_eq!(accept(&model, json!(true)), json!(true));
    assert_eq!(accept(&model, json!(false)), json!(false));
    let error = reject(&model, json!(1));
    assert_eq!(error.kind, ErrorKind::FaultyValue);
    assert_eq!(error.property_path, "<root>");
}

#[test]
fn num_type_and_bounds() {
    let model = num().range(1.0, 10.0);
    assert_eq!(accept(&model, json!(1)), json!(1));
    assert_eq!(accept(&model, json!(10.0)), json!(10.0));
    reject(&model, json!(0));
    reject(&model, json!(11));
    reject(&model, json!("5"));
}

#[test]
fn num_exclusive_bounds() {
    let model = num().range(1.0, 10.0).exclusive();
    reject(&model, json!(1));
    reject(&model, json!(10));
    assert_eq!(accept(&model, json!(5)), json!(5));
}

#[test]
fn int_rejects_fractions() {
    let model = int();
    assert_eq!(accept(&model, json!(3)), json!(3));
    assert_eq!(accept(&model, json!(-2)), json!(-2));
    reject(&model, json!(3.5));
}

#[test]
fn str_length_bounds_count_chars() {
    let model = str_().range(2.0, 3.0);
    assert_eq!(accept(&model, json!("ab")), json!("ab"));
    // Multi-byte chars count as one.
    assert_eq!(accept(&model, json!("äöü")), json!("äöü"));
    reject(&model, json!("a"));
    reject(&model, json!("abcd"));
    reject(&model, json!(12));
}

#[test]
fn str_pattern_alternatives() {
    let model = pattern(Regex::new("^a+$").unwrap()).pattern(Regex::new("^b+$").unwrap());
    assert_eq!(accept(&model, json!("aaa")), json!("aaa"));
    assert_eq!(accept(&model, json!("bb")), json!("bb"));
    let error = reject(&model, json!("ab"));
    assert_eq!(error.kind, ErrorKind::FaultyValue);
}

#[test]
fn str_without_patterns_accepts_any_string() {
    assert_eq!(accept(&str_(), json!("anything")), json!("anything"));
}

#[test]
fn literal_strict_membership() {
    let model = literal(json!({"a": [1, 2]}));
    assert_eq!(accept(&model, json!({"a": [1, 2]})), json!({"a": [1, 2]}));
    reject(&model, json!({"a": [2, 1]}));
    reject(&model, json!(null));
}

#[test]
fn enum_membership() {
    let model = enum_of(vec![json!(1), json!("two")]);
    assert_eq!(accept(&model, json!(1)), json!(1));
    assert_eq!(accept(&model, json!("two")), json!("two"));
    reject(&model, json!(2));
}

// --------------------------------------------------------------- containers

#[test]
fn object_required_property() {
    let model = object(vec![("id", num())]);
    let error = reject(&model, json!({}));
    assert_eq!(error.kind, ErrorKind::RequiredProperty);
    assert_eq!(error.property_path, "<root>.id");
}

#[test]
fn object_optional_property_is_skipped_when_absent() {
    let model = object(vec![("id", num()), ("name", str_().optional())]);
    assert_eq!(accept(&model, json!({"id": 1})), json!({"id": 1}));
}

#[test]
fn object_optional_default_is_substituted() {
    let model = object(vec![("name", str_().optional().with_default(json!("anon")))]);
    assert_eq!(accept(&model, json!({})), json!({"name": "anon"}));
}

#[test]
fn object_optional_null_default_is_substituted() {
    // An intentional null default is distinct from "no default".
    let model = object(vec![("name", str_().optional().with_default(Value::Null))]);
    assert_eq!(accept(&model, json!({})), json!({"name": null}));
}

#[test]
fn object_drops_undeclared_properties() {
    let model = object(vec![("id", num())]);
    assert_eq!(accept(&model, json!({"id": 1, "extra": true})), json!({"id": 1}));
}

#[test]
fn object_aborts_on_first_child_failure() {
    let model = object(vec![("a", num()), ("b", num())]);
    let error = reject(&model, json!({"a": "bad", "b": "bad"}));
    assert_eq!(error.property_path, "<root>.a");
}

#[test]
fn object_rejects_non_objects() {
    reject(&object(vec![("id", num())]), json!([1]));
}

#[test]
fn array_without_matcher_passes_through() {
    let model = array_any();
    assert_eq!(accept(&model, json!([1, "x", null])), json!([1, "x", null]));
    reject(&model, json!("nope"));
}

#[test]
fn array_strict_aborts_on_first_faulty_item() {
    let model = array(num());
    assert_eq!(accept(&model, json!([1, 2, 3])), json!([1, 2, 3]));
    let error = reject(&model, json!([1, "x", 3]));
    assert_eq!(error.property_path, "<root>[1]");
}

#[test]
fn array_length_bounds() {
    let model = array(num()).range(1.0, 2.0);
    assert_eq!(accept(&model, json!([1])), json!([1]));
    reject(&model, json!([]));
    reject(&model, json!([1, 2, 3]));
}

#[test]
fn tuple_validates_per_position() {
    let model = tuple(vec![num(), str_()]);
    assert_eq!(accept(&model, json!([1, "x"])), json!([1, "x"]));
    let error = reject(&model, json!(["x", "y"]));
    assert_eq!(error.property_path, "<root>[0]");
}

#[test]
fn tuple_length_mismatch() {
    let model = tuple(vec![num(), str_()]);
    let short = reject(&model, json!([1]));
    assert_eq!(short.kind, ErrorKind::FaultyValue);
    let long = reject(&model, json!([1, "x", "extra"]));
    assert_eq!(long.kind, ErrorKind::FaultyValue);
}

#[test]
fn nested_path_reporting() {
    let model = object(vec![("items", array(object(vec![("id", num())])))]);
    let error = reject(&model, json!({"items": [{"id": 1}, {}]}));
    assert_eq!(error.kind, ErrorKind::RequiredProperty);
    assert_eq!(error.property_path, "<root>.items[1].id");
}

// ------------------------------------------------------------------- custom

#[test]
fn custom_accepts_and_transforms() {
    let model = custom(|_path, value| {
        let n = value.as_f64().ok_or_else(|| "expected a number".to_string())?;
        Ok(json!(n * 2.0))
    });
    assert_eq!(accept(&model, json!(21)), json!(42.0));
    let error = reject(&model, json!("x"));
    assert_eq!(error.kind, ErrorKind::FaultyValue);
    assert_eq!(error.message, "expected a number");
}

#[test]
fn custom_receives_the_property_path() {
    let model = object(vec![(
        "x",
        custom(|path, value| {
            assert_eq!(path, "<root>.x");
            Ok(value.clone())
        }),
    )]);
    accept(&model, json!({"x": 1}));
}

#[test]
fn custom_panic_is_wrapped_as_unknown() {
    let model = custom(|_path, _value| panic!("boom"));
    let error = reject(&model, json!(1));
    assert_eq!(error.kind, ErrorKind::Unknown);
    assert!(error.message.contains("boom"), "got: {}", error.message);
}

// --------------------------------------------------------------------- pipe

#[test]
fn pipe_chains_transformations() {
    let double = custom(|_p, v| Ok(json!(v.as_f64().unwrap_or(0.0) * 2.0)));
    let model = num().pipe(vec![double, num().max(10.0)]);
    assert_eq!(accept(&model, json!(4)), json!(8.0));
    // Later stages see the transformed output: 6 doubles to 12, over the max.
    reject(&model, json!(6));
}

#[test]
fn pipe_first_stage_failure_aborts() {
    let never_called = custom(|_p, _v| panic!("stage must not run"));
    let model = num().pipe(vec![never_called]);
    let error = reject(&model, json!("not a number"));
    assert_eq!(error.kind, ErrorKind::FaultyValue);
}
