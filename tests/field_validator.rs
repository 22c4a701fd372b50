//! Field Validator Tests
//!
//! Cross-field validation of raw collections:
//! - Keys must be unique across the collection
//! - Wrapper, base and specs are checked on every field
//! - The error carries the full report and a flat message

use fieldrules::field::{auto_fields, FieldDescriptor, WrappedField};
use fieldrules::validate::{CheckKind, FieldLabel, FieldValidator};
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn raw(order: i64, item: FieldDescriptor) -> Value {
    WrappedField::new(format!("field-{}", order), order, item).to_value()
}

fn sample_collection() -> Vec<Value> {
    let mut fields: Vec<Value> = auto_fields().iter().map(WrappedField::to_value).collect();
    fields.push(raw(0, FieldDescriptor::string("title", &json!({ "lengthMax": 120 })).unwrap()));
    fields.push(raw(1, FieldDescriptor::select("tags", &json!({ "multiple": true })).unwrap()));
    fields.push(raw(2, FieldDescriptor::url("site", &json!({})).unwrap()));
    fields
}

// =============================================================================
// Passing Collections
// =============================================================================

/// A collection built from constructors passes.
#[test]
fn test_constructed_collection_passes() {
    assert!(FieldValidator::new().validate_all(&sample_collection()).is_ok());
}

/// Validation is deterministic.
#[test]
fn test_validation_is_deterministic() {
    let fields = sample_collection();
    let validator = FieldValidator::new();
    let first = validator.report(&fields);
    for _ in 0..20 {
        assert_eq!(validator.report(&fields), first);
    }
}

// =============================================================================
// Failing Collections
// =============================================================================

/// Only the duplicated fields fail the unique check.
#[test]
fn test_duplicate_key_marks_only_offenders() {
    let mut fields = sample_collection();
    fields.push(raw(3, FieldDescriptor::number("title", &json!({})).unwrap()));

    let report = FieldValidator::new().report(&fields);
    for checks in report.fields() {
        assert_eq!(checks.unique, checks.key.as_deref() != Some("title"), "{:?}", checks.key);
        assert!(checks.wrapper && checks.base && checks.specs);
    }
}

/// All failures are collected, not just the first.
#[test]
fn test_failures_are_collected() {
    let mut fields = sample_collection();
    fields[3]["id"] = json!(3);
    fields[4]["item"]["title"] = Value::Null;
    fields[5]["item"]["specs"]["bogus"] = json!(true);

    let err = FieldValidator::new().validate_all(&fields).unwrap_err();
    let failed: Vec<(String, CheckKind)> = err
        .report()
        .failures()
        .iter()
        .map(|f| (f.label.to_string(), f.check))
        .collect();
    assert_eq!(
        failed,
        vec![
            ("\"title\"".to_string(), CheckKind::Wrapper),
            ("\"tags\"".to_string(), CheckKind::Base),
            ("\"site\"".to_string(), CheckKind::Specs),
        ]
    );
    assert_eq!(
        err.to_string(),
        "Schema validation failed. \"title\": Field wrapper failed validation;\
         \"tags\": Base settings failed validation;\
         \"site\": Specifications failed validation;"
    );
    assert_eq!(err.status_code(), 400);
}

/// Specs are checked against the shape of the declared type.
#[test]
fn test_specs_checked_against_declared_type() {
    let field = json!({
        "id": "x",
        "order": 0,
        "item": {
            "key": "size",
            "type": "json",
            "title": "Size",
            "specs": { "maxSize": -1, "mayBeEmpty": true }
        }
    });

    let report = FieldValidator::new().report(&[field]);
    let failed: Vec<CheckKind> = report.fields()[0].failed().collect();
    assert_eq!(failed, vec![CheckKind::Specs]);
}

/// A keyless field is reported by position, apart from any key that looks
/// like a position.
#[test]
fn test_keyless_field_reported_by_position() {
    let mut fields = sample_collection();
    fields[4]["item"]["key"] = json!("#3");
    fields[3]["item"].as_object_mut().unwrap().remove("key");
    fields[4]["order"] = json!(1.25);

    let report = FieldValidator::new().report(&fields);
    assert_eq!(
        report.errors(),
        vec![
            (FieldLabel::Index(3), vec!["Base settings failed validation".to_string()]),
            (FieldLabel::Key("#3".into()), vec!["Field wrapper failed validation".to_string()]),
        ]
    );
}

/// An unknown type tag fails the specs check instead of aborting.
#[test]
fn test_unknown_type_reported() {
    let mut fields = sample_collection();
    fields[3]["item"]["type"] = json!("money");

    let report = FieldValidator::new().report(&fields);
    assert!(!report.ok());
    assert_eq!(
        report.errors(),
        vec![(FieldLabel::Key("title".into()), vec!["Specifications failed validation".to_string()])]
    );
}
