//! Rule Compiler Tests
//!
//! End-to-end compilation through the public API:
//! - Typed constructors compile to the documented rule sets
//! - Raw input with an unknown type tag fails the whole call
//! - Custom predicates report the documented failure details

use fieldrules::field::{auto_fields, FieldDescriptor, WrappedField};
use fieldrules::rules::{
    CompileError, Outcome, Predicate, PrimitiveType, RuleCompiler, INVALID_IDS, INVALID_JSON,
    URL_DOMAIN_NOT_ALLOWED,
};
use fieldrules::CompilerConfig;
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn wrapped(order: i64, item: FieldDescriptor) -> WrappedField {
    WrappedField::new(format!("field-{}", order), order, item)
}

fn no_context() -> Value {
    Value::Null
}

// =============================================================================
// Scenario Tests
// =============================================================================

/// A consent checkbox compiles to an equality rule.
#[test]
fn test_boolean_only_true_scenario() {
    let fields = vec![wrapped(0, FieldDescriptor::boolean("agree", &json!({ "onlyTrue": true })).unwrap())];
    let compiled = RuleCompiler::default().compile(&fields);

    assert_eq!(
        compiled["agree"].to_value(),
        json!({ "type": "boolean", "rules": { "is": true } })
    );
}

/// A bounded required number keeps its bounds and forbids zero.
#[test]
fn test_number_scenario() {
    let fields = vec![wrapped(
        0,
        FieldDescriptor::number("qty", &json!({ "min": 0, "max": 100, "mayBeEmpty": false })).unwrap(),
    )];
    let compiled = RuleCompiler::default().compile(&fields);
    let set = &compiled["qty"];

    assert_eq!(set.kind, PrimitiveType::Number);
    let rules = set.rules.as_ref().unwrap();
    assert_eq!(rules.min, Some(0.0));
    assert_eq!(rules.max, Some(100.0));
    assert_eq!(rules.is_not, Some(json!(0)));
    assert!(rules.custom.is_none());
}

/// A single select that may be empty gets the empty string in its enum.
#[test]
fn test_select_scenario() {
    let fields = vec![wrapped(
        0,
        FieldDescriptor::select("status", &json!({ "allowedValues": ["a", "b"], "multiple": false })).unwrap(),
    )];
    let compiled = RuleCompiler::default().compile(&fields);
    let mut values = compiled["status"].rules.as_ref().unwrap().enum_values.clone().unwrap();
    values.sort();

    assert_eq!(values, vec!["", "a", "b"]);
}

// =============================================================================
// Whole-Collection Tests
// =============================================================================

/// Every field of a mixed collection gets an entry keyed by its key.
#[test]
fn test_mixed_collection() {
    let mut fields = auto_fields();
    fields.push(wrapped(1, FieldDescriptor::email("contact", &json!({})).unwrap()));
    fields.push(wrapped(2, FieldDescriptor::json("meta", &json!({})).unwrap()));
    fields.push(wrapped(3, FieldDescriptor::relation("owner", &json!({ "collection": "users" })).unwrap()));

    let compiled = RuleCompiler::default().compile(&fields);
    let keys: Vec<&str> = compiled.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["_id", "contact", "createdAt", "meta", "owner", "updatedAt"]);

    let id_rules = compiled["_id"].rules.as_ref().unwrap();
    assert_eq!(id_rules.min, Some(24.0));
    assert_eq!(id_rules.max, Some(24.0));
    assert_eq!(id_rules.is_not, Some(json!("")));

    assert!(compiled["createdAt"].rules.is_none());
    assert_eq!(compiled["updatedAt"].to_value(), json!({ "type": "date", "rules": { "isNot": null } }));
}

/// Compiling twice yields equal but separate maps.
#[test]
fn test_compile_is_repeatable() {
    let fields = vec![wrapped(0, FieldDescriptor::string("s", &json!({ "pattern": "^x" })).unwrap())];
    let compiler = RuleCompiler::default();

    let mut first = compiler.compile(&fields);
    let second = compiler.compile(&fields);
    assert_eq!(first, second);

    first.clear();
    assert_eq!(second.len(), 1);
}

/// An unknown type tag anywhere in raw input fails the whole call.
#[test]
fn test_unknown_type_is_fatal() {
    let good = wrapped(0, FieldDescriptor::boolean("ok", &json!({})).unwrap()).to_value();
    let bad = json!({
        "id": "x",
        "order": 1,
        "item": { "key": "c", "type": "color", "title": "Color", "specs": {} }
    });

    let err = RuleCompiler::default().compile_value(&json!([good, bad])).unwrap_err();
    assert_eq!(err, CompileError::UnsupportedType("color".into()));
    assert_eq!(err.to_string(), "Unsupported config type: color");
}

/// Stored specs that break their shape are a field error, not a type error.
#[test]
fn test_bad_stored_specs() {
    let bad = json!([{
        "id": "x",
        "order": 0,
        "item": { "key": "n", "type": "number", "title": "N", "specs": { "min": "low", "max": null } }
    }]);

    let err = RuleCompiler::default().compile_value(&bad).unwrap_err();
    assert_eq!(err.code(), "FIELD_SPEC_SHAPE");
}

// =============================================================================
// Predicate Tests
// =============================================================================

/// JSON text predicate accepts any valid JSON and blank input.
#[test]
fn test_json_predicate() {
    let fields = vec![wrapped(0, FieldDescriptor::json("payload", &json!({})).unwrap())];
    let compiled = RuleCompiler::default().compile(&fields);
    let predicate = compiled["payload"].custom().unwrap();

    for text in ["", "{}", "[]", "\"x\"", "12", "{\"a\": [1, 2]}"] {
        assert_eq!(predicate.check(&json!(text), &no_context()), Outcome::pass(), "{text}");
    }
    for text in ["{name: \"x\"}", "{\"a\":1,}", "{\"a\":1", "hello"] {
        assert_eq!(predicate.check(&json!(text), &no_context()), Outcome::fail(INVALID_JSON), "{text}");
    }
}

/// JSON size is enforced only when configured.
#[test]
fn test_json_size_enforcement() {
    let compiler = RuleCompiler::new(CompilerConfig {
        enforce_json_max_size: true,
        ..Default::default()
    });
    let fields = vec![wrapped(0, FieldDescriptor::json("payload", &json!({ "maxSize": 8 })).unwrap())];
    let compiled = compiler.compile(&fields);
    let predicate = compiled["payload"].custom().unwrap();

    assert!(predicate.check(&json!("[1,2]"), &no_context()).result);
    assert!(!predicate.check(&json!("[1,2,3,4,5]"), &no_context()).result);
}

/// URL host matching ignores case and a leading www.
#[test]
fn test_url_domains() {
    let fields = vec![wrapped(
        0,
        FieldDescriptor::url("site", &json!({ "allowedDomains": ["Company.com"] })).unwrap(),
    )];
    let compiled = RuleCompiler::default().compile(&fields);
    let predicate = compiled["site"].custom().unwrap();

    assert!(predicate.check(&json!("https://www.COMPANY.com/about"), &no_context()).result);
    assert!(predicate.check(&json!("company.com"), &no_context()).result);
    assert_eq!(
        predicate.check(&json!("https://other.org"), &no_context()),
        Outcome::fail(URL_DOMAIN_NOT_ALLOWED)
    );
}

/// Multiple relation ids are checked element by element.
#[test]
fn test_relation_ids() {
    let fields = vec![wrapped(
        0,
        FieldDescriptor::relation("members", &json!({ "multiple": true })).unwrap(),
    )];
    let compiled = RuleCompiler::default().compile(&fields);
    let predicate = compiled["members"].custom().unwrap();
    assert_eq!(predicate, &Predicate::RecordIdList);

    let good = "507f1f77bcf86cd799439011";
    assert!(predicate.check(&json!([]), &no_context()).result);
    assert!(predicate.check(&json!([good, good]), &no_context()).result);
    assert_eq!(
        predicate.check(&json!([good, "nope"]), &no_context()),
        Outcome::fail(INVALID_IDS)
    );
}

/// Predicates serialize by name with their parameters.
#[test]
fn test_predicate_introspection() {
    let fields = vec![wrapped(
        0,
        FieldDescriptor::email("mail", &json!({ "exceptDomains": ["Spam.io"] })).unwrap(),
    )];
    let compiled = RuleCompiler::default().compile(&fields);

    assert_eq!(
        compiled["mail"].to_value(),
        json!({
            "type": "string",
            "rules": {
                "custom": {
                    "name": "email",
                    "allowedDomains": [],
                    "exceptDomains": ["spam.io"],
                    "mayBeEmpty": true
                }
            }
        })
    );
}
