//! Interaction of the suppression policies: stop-on-error containment,
//! remove-faulty filtering, union trial matching, and global defaults.

use json_model::factory::{array, custom, enum_of, literal, num, object, str_, union};
use json_model::{ErrorKind, ModelConfig, ModelFactory, Validated};
use serde_json::{json, Value};

// ------------------------------------------------------------ stop-on-error

#[test]
fn stop_on_error_containment() {
    let schema = object(vec![
        ("a", num()),
        ("b", object(vec![("c", num())]).stop_on_error()),
    ]);
    match schema.validate(&json!({"a": 1, "b": {"c": "bad"}})) {
        Validated::Valid { value, warning } => {
            assert_eq!(value, json!({"a": 1, "b": null}));
            let warning = warning.expect("demoted failure must surface as a warning");
            assert_eq!(warning.kind, ErrorKind::FaultyValue);
            assert_eq!(warning.property_path, "<root>.b.c");
        }
        Validated::Invalid { error } => panic!("containment failed: {error}"),
    }
}

#[test]
fn stop_on_error_resolves_to_configured_default() {
    let schema = object(vec![(
        "b",
        num().stop_on_error().with_default(json!(0)),
    )]);
    match schema.validate(&json!({"b": "bad"})) {
        Validated::Valid { value, warning } => {
            assert_eq!(value, json!({"b": 0}));
            assert!(warning.is_some());
        }
        Validated::Invalid { error } => panic!("unexpected failure: {error}"),
    }
}

#[test]
fn stop_on_error_at_the_root() {
    let schema = num().stop_on_error();
    match schema.validate(&json!("bad")) {
        Validated::Valid { value, warning } => {
            assert_eq!(value, Value::Null);
            assert!(warning.is_some());
        }
        Validated::Invalid { error } => panic!("unexpected failure: {error}"),
    }
}

#[test]
fn global_stop_on_error_default() {
    let f = ModelFactory::with_config(ModelConfig {
        stop_on_error: true,
        ..Default::default()
    });
    let schema = f.num();
    assert!(schema.validate(&json!("bad")).is_ok());
}

// ------------------------------------------------------------ remove-faulty

#[test]
fn remove_faulty_drops_items_and_rechecks_bounds() {
    let schema = array(enum_of(vec![json!(1), json!(2)]))
        .remove_faulty()
        .range(2.0, 4.0);
    match schema.validate(&json!([1, 99, 2])) {
        Validated::Valid { value, warning } => {
            assert_eq!(value, json!([1, 2]));
            let warning = warning.expect("dropped item must surface as a warning");
            assert_eq!(warning.property_path, "<root>[1]");
        }
        Validated::Invalid { error } => panic!("unexpected failure: {error}"),
    }
}

#[test]
fn remove_faulty_post_filter_bounds_can_fail() {
    let schema = array(enum_of(vec![json!(1), json!(2)]))
        .remove_faulty()
        .range(2.0, 4.0);
    // Pre-filter count 2 passes; post-filter count 1 violates the range.
    match schema.validate(&json!([1, 99])) {
        Validated::Invalid { error } => {
            assert_eq!(error.kind, ErrorKind::FaultyValue);
            // The dropped item's demoted warning is still reported.
            assert_eq!(error.warnings.len(), 1);
        }
        Validated::Valid { value, .. } => panic!("expected failure, got {value}"),
    }
}

#[test]
fn remove_faulty_collects_one_warning_per_dropped_item() {
    let schema = array(num()).remove_faulty();
    match schema.validate(&json!(["a", 1, "b"])) {
        Validated::Valid { value, warning } => {
            assert_eq!(value, json!([1]));
            let warning = warning.expect("warnings expected");
            assert_eq!(warning.kind, ErrorKind::Combined);
            assert_eq!(warning.errors.len(), 2);
        }
        Validated::Invalid { error } => panic!("unexpected failure: {error}"),
    }
}

#[test]
fn global_remove_faulty_default() {
    let f = ModelFactory::with_config(ModelConfig {
        remove_faulty: true,
        ..Default::default()
    });
    let schema = f.array(f.num());
    assert_eq!(
        schema.validate(&json!([1, "x", 2])).into_value(),
        Some(json!([1, 2]))
    );
}

#[test]
fn active_warning_scope_disables_nested_remove_faulty() {
    // Documented coupling: once a warning-only scope is active (the outer
    // array's filtering), an inner array's remove-faulty flag is ignored and
    // it validates strictly.
    let inner = array(enum_of(vec![json!(1), json!(2)])).remove_faulty();
    let outer = array(inner).remove_faulty();
    match outer.validate(&json!([[1, 99]])) {
        Validated::Valid { value, warning } => {
            // The inner array failed strictly on 99, so the outer filter
            // dropped the whole inner array instead of just the bad item.
            assert_eq!(value, json!([]));
            let warning = warning.expect("dropped inner array must warn");
            assert_eq!(warning.property_path, "<root>[0][1]");
        }
        Validated::Invalid { error } => panic!("unexpected failure: {error}"),
    }
}

// -------------------------------------------------------------------- union

#[test]
fn union_first_match_wins() {
    let schema = union(vec![literal(json!(1)), custom(|_p, _v| Ok(json!("X")))]);
    assert_eq!(schema.validate(&json!(1)).into_value(), Some(json!(1)));
    // A non-1 input falls through to the custom alternative.
    assert_eq!(schema.validate(&json!(2)).into_value(), Some(json!("X")));
}

#[test]
fn union_aggregates_per_alternative_errors() {
    let schema = union(vec![num(), str_()]);
    match schema.validate(&json!(true)) {
        Validated::Invalid { error } => {
            assert_eq!(error.kind, ErrorKind::FaultyValue);
            assert_eq!(error.errors.len(), 2);
        }
        Validated::Valid { value, .. } => panic!("expected failure, got {value}"),
    }
}

#[test]
fn failed_trial_warnings_are_rolled_back() {
    // The first alternative demotes `a` to a warning, then fails on the
    // missing `b`; its warning must not leak into the final report.
    let first = object(vec![("a", num().stop_on_error()), ("b", num())]);
    let schema = union(vec![first, object(vec![("a", str_())])]);
    match schema.validate(&json!({"a": "bad"})) {
        Validated::Valid { value, warning } => {
            assert_eq!(value, json!({"a": "bad"}));
            assert!(warning.is_none(), "trial warning leaked: {warning:?}");
        }
        Validated::Invalid { error } => panic!("unexpected failure: {error}"),
    }
}

#[test]
fn successful_trial_warnings_are_kept() {
    let first = object(vec![("a", num().stop_on_error())]);
    let schema = union(vec![first]);
    match schema.validate(&json!({"a": "bad"})) {
        Validated::Valid { value, warning } => {
            assert_eq!(value, json!({"a": null}));
            assert!(warning.is_some());
        }
        Validated::Invalid { error } => panic!("unexpected failure: {error}"),
    }
}

#[test]
fn union_inside_remove_faulty_array() {
    let schema = array(union(vec![num(), str_()])).remove_faulty();
    match schema.validate(&json!([1, true, "x"])) {
        Validated::Valid { value, warning } => {
            assert_eq!(value, json!([1, "x"]));
            assert!(warning.is_some());
        }
        Validated::Invalid { error } => panic!("unexpected failure: {error}"),
    }
}
