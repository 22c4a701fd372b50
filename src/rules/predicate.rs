//! Custom predicates carried by compiled rule sets
//!
//! A predicate is a run-time check no static rule expresses: domain lists,
//! JSON syntax, record id shape, date ranges, free-form patterns.
//!
//! Predicates never fail with an error. A rejected value is an `Outcome`
//! with `result == false` and a reason in `details`.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::de::IgnoredAny;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::field::{parse_date, EmailSpecs, UrlSpecs, RECORD_ID_LENGTH};

pub const DATE_OUT_OF_RANGE: &str = "Date is out of allowed range";
pub const INVALID_DATE: &str = "Invalid date format";
pub const INVALID_EMAIL: &str = "Invalid email format";
pub const EMAIL_DOMAIN_NOT_ALLOWED: &str = "Email domain is not allowed";
pub const INVALID_URL: &str = "Invalid URL format";
pub const URL_DOMAIN_NOT_ALLOWED: &str = "URL domain is not allowed";
pub const INVALID_JSON: &str = "Invalid JSON format";
pub const JSON_TOO_LARGE: &str = "JSON exceeds maximum size";
pub const INVALID_ID: &str = "Invalid ID format";
pub const INVALID_IDS: &str = "One or more IDs are invalid";
pub const PATTERN_MISMATCH: &str = "Value does not match pattern";
pub const INVALID_PATTERN: &str = "Invalid pattern";

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid"));

/// Scheme and userinfo are optional; host must have a dotted name.
static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:[a-z][a-z0-9+.\-]*://)?(?:[^\s/@]+@)?(?:[a-z0-9](?:[a-z0-9\-]*[a-z0-9])?\.)+[a-z]{2,}(?::\d{1,5})?(?:[/?#]\S*)?$",
    )
    .expect("url regex is valid")
});

/// Result of running a predicate on a candidate value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub result: bool,
    /// Failure reason; empty on success
    pub details: String,
}

impl Outcome {
    pub fn pass() -> Self {
        Self {
            result: true,
            details: String::new(),
        }
    }

    pub fn fail(details: impl Into<String>) -> Self {
        Self {
            result: false,
            details: details.into(),
        }
    }

    fn from_check(ok: bool, details: &str) -> Self {
        if ok {
            Self::pass()
        } else {
            Self::fail(details)
        }
    }
}

/// Regular expression compiled once and kept with its source.
///
/// Compares and serializes by source. A source that does not compile is kept
/// so the predicate can report it.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    regex: Option<Regex>,
}

impl CompiledPattern {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let regex = Regex::new(&source).ok();
        Self { source, regex }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns `true` if the source compiled
    pub fn is_valid(&self) -> bool {
        self.regex.is_some()
    }
}

impl PartialEq for CompiledPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Serialize for CompiledPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

/// Named run-time check with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "name", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Predicate {
    /// String must contain a match of a regular expression
    Pattern { pattern: CompiledPattern },
    /// Date must fall inside `[min, max]`; a missing bound is open
    DateRange {
        min: Option<DateTime<Utc>>,
        max: Option<DateTime<Utc>>,
    },
    /// Well-formed email whose domain passes the lists
    Email {
        allowed_domains: Vec<String>,
        except_domains: Vec<String>,
        may_be_empty: bool,
    },
    /// Well-formed URL whose host passes the lists
    Url {
        allowed_domains: Vec<String>,
        except_domains: Vec<String>,
        may_be_empty: bool,
        strip_www: bool,
    },
    /// Syntactically valid JSON text, optionally size-limited
    Json { max_size: Option<u64> },
    /// One record id
    RecordId { allow_empty: bool },
    /// List of record ids
    RecordIdList,
}

impl Predicate {
    /// Pattern predicate; the expression is compiled here, once.
    pub fn pattern(source: impl Into<String>) -> Self {
        Predicate::Pattern {
            pattern: CompiledPattern::new(source),
        }
    }

    /// Email predicate with domain lists lower-cased for matching.
    pub fn email(specs: &EmailSpecs) -> Self {
        Predicate::Email {
            allowed_domains: normalize_domains(&specs.allowed_domains, false),
            except_domains: normalize_domains(&specs.except_domains, false),
            may_be_empty: specs.may_be_empty,
        }
    }

    /// URL predicate with host lists lower-cased (and `www.`-stripped) for matching.
    pub fn url(specs: &UrlSpecs, strip_www: bool) -> Self {
        Predicate::Url {
            allowed_domains: normalize_domains(&specs.allowed_domains, strip_www),
            except_domains: normalize_domains(&specs.except_domains, strip_www),
            may_be_empty: specs.may_be_empty,
            strip_www,
        }
    }

    /// Runs the check on `value`.
    ///
    /// `context` is the record being validated; no built-in predicate reads it.
    pub fn check(&self, value: &Value, _context: &Value) -> Outcome {
        match self {
            Predicate::Pattern { pattern } => check_pattern(pattern, value),
            Predicate::DateRange { min, max } => check_date_range(*min, *max, value),
            Predicate::Email {
                allowed_domains,
                except_domains,
                may_be_empty,
            } => {
                let text = match classify(value) {
                    Text::Empty => return Outcome::from_check(*may_be_empty, INVALID_EMAIL),
                    Text::Other => return Outcome::fail(INVALID_EMAIL),
                    Text::Present(text) => text,
                };
                if !EMAIL_REGEX.is_match(text) {
                    return Outcome::fail(INVALID_EMAIL);
                }
                let domain = text.rsplit('@').next().unwrap_or_default().to_lowercase();
                Outcome::from_check(
                    domain_permitted(&domain, allowed_domains, except_domains),
                    EMAIL_DOMAIN_NOT_ALLOWED,
                )
            }
            Predicate::Url {
                allowed_domains,
                except_domains,
                may_be_empty,
                strip_www,
            } => {
                let text = match classify(value) {
                    Text::Empty => return Outcome::from_check(*may_be_empty, INVALID_URL),
                    Text::Other => return Outcome::fail(INVALID_URL),
                    Text::Present(text) => text,
                };
                if !URL_REGEX.is_match(text) {
                    return Outcome::fail(INVALID_URL);
                }
                let host = url_host(text, *strip_www);
                Outcome::from_check(
                    domain_permitted(&host, allowed_domains, except_domains),
                    URL_DOMAIN_NOT_ALLOWED,
                )
            }
            Predicate::Json { max_size } => check_json(*max_size, value),
            Predicate::RecordId { allow_empty } => match value {
                Value::Null if *allow_empty => Outcome::pass(),
                Value::String(s) if s.is_empty() && *allow_empty => Outcome::pass(),
                Value::String(s) => Outcome::from_check(is_record_id(s), INVALID_ID),
                _ => Outcome::fail(INVALID_ID),
            },
            Predicate::RecordIdList => {
                let all_valid = value.as_array().is_some_and(|ids| {
                    ids.iter().all(|id| id.as_str().is_some_and(is_record_id))
                });
                Outcome::from_check(all_valid, INVALID_IDS)
            }
        }
    }
}

/// Returns `true` if `s` has the shape of a record id: an opaque string of
/// exactly `RECORD_ID_LENGTH` characters.
pub fn is_record_id(s: &str) -> bool {
    s.chars().count() == RECORD_ID_LENGTH
}

enum Text<'a> {
    /// Empty string or null
    Empty,
    Present(&'a str),
    /// Not a string at all
    Other,
}

fn classify(value: &Value) -> Text<'_> {
    match value {
        Value::Null => Text::Empty,
        Value::String(s) if s.is_empty() => Text::Empty,
        Value::String(s) => Text::Present(s),
        _ => Text::Other,
    }
}

fn normalize_domains(domains: &[String], strip_www: bool) -> Vec<String> {
    domains
        .iter()
        .map(|d| {
            let d = d.trim().to_lowercase();
            match d.strip_prefix("www.") {
                Some(bare) if strip_www => bare.to_string(),
                _ => d,
            }
        })
        .collect()
}

fn domain_permitted(domain: &str, allowed: &[String], except: &[String]) -> bool {
    let allowed_ok = allowed.is_empty() || allowed.iter().any(|d| d == domain);
    let except_ok = !except.iter().any(|d| d == domain);
    allowed_ok && except_ok
}

/// Extracts the lower-cased host of a URL that may lack a scheme.
fn url_host(url: &str, strip_www: bool) -> String {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let authority = rest
        .split(|c: char| matches!(c, '/' | '?' | '#'))
        .next()
        .unwrap_or_default();
    let host_port = authority.rsplit('@').next().unwrap_or_default();
    let host = host_port.split(':').next().unwrap_or_default().to_lowercase();

    match host.strip_prefix("www.") {
        Some(bare) if strip_www => bare.to_string(),
        _ => host,
    }
}

fn check_pattern(pattern: &CompiledPattern, value: &Value) -> Outcome {
    let Some(regex) = &pattern.regex else {
        return Outcome::fail(INVALID_PATTERN);
    };
    match value {
        // Emptiness is enforced by `isNot`
        Value::Null => Outcome::pass(),
        Value::String(s) if s.is_empty() => Outcome::pass(),
        Value::String(s) => Outcome::from_check(regex.is_match(s), PATTERN_MISMATCH),
        _ => Outcome::fail(PATTERN_MISMATCH),
    }
}

fn check_date_range(min: Option<DateTime<Utc>>, max: Option<DateTime<Utc>>, value: &Value) -> Outcome {
    if value.is_null() {
        return Outcome::pass();
    }
    let Some(date) = parse_date(value) else {
        return Outcome::fail(INVALID_DATE);
    };
    let above_min = min.map_or(true, |min| date >= min);
    let below_max = max.map_or(true, |max| date <= max);
    Outcome::from_check(above_min && below_max, DATE_OUT_OF_RANGE)
}

fn check_json(max_size: Option<u64>, value: &Value) -> Outcome {
    let Some(text) = value.as_str() else {
        return Outcome::fail(INVALID_JSON);
    };
    if text.trim().is_empty() {
        return Outcome::pass();
    }
    if max_size.is_some_and(|max| text.len() as u64 > max) {
        return Outcome::fail(JSON_TOO_LARGE);
    }
    Outcome::from_check(serde_json::from_str::<IgnoredAny>(text).is_ok(), INVALID_JSON)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx() -> Value {
        json!({})
    }

    #[test]
    fn test_outcome_constructors() {
        assert_eq!(Outcome::pass(), Outcome { result: true, details: String::new() });
        assert_eq!(Outcome::fail("nope").details, "nope");
    }

    #[test]
    fn test_email_format() {
        let p = Predicate::email(&EmailSpecs::default());
        assert_eq!(p.check(&json!("user@company.com"), &ctx()), Outcome::pass());
        assert_eq!(p.check(&json!("invalid-email"), &ctx()), Outcome::fail(INVALID_EMAIL));
        assert_eq!(p.check(&json!("a b@c.com"), &ctx()), Outcome::fail(INVALID_EMAIL));
        assert_eq!(p.check(&json!(42), &ctx()), Outcome::fail(INVALID_EMAIL));
    }

    #[test]
    fn test_email_uses_last_at() {
        let p = Predicate::email(&EmailSpecs {
            allowed_domains: vec!["company.com".into()],
            ..EmailSpecs::default()
        });
        // A second '@' fails the format check
        assert_eq!(p.check(&json!("a@b@company.com"), &ctx()), Outcome::fail(INVALID_EMAIL));
        assert!(p.check(&json!("first.last@Company.com"), &ctx()).result);
    }

    #[test]
    fn test_empty_email_depends_on_flag() {
        let optional = Predicate::email(&EmailSpecs::default());
        assert!(optional.check(&json!(""), &ctx()).result);
        assert!(optional.check(&Value::Null, &ctx()).result);

        let required = Predicate::email(&EmailSpecs {
            may_be_empty: false,
            ..EmailSpecs::default()
        });
        assert_eq!(required.check(&json!(""), &ctx()), Outcome::fail(INVALID_EMAIL));
    }

    #[test]
    fn test_url_host_extraction() {
        assert_eq!(url_host("https://www.Company.com:8080/page?q=1", true), "company.com");
        assert_eq!(url_host("company.com/page", true), "company.com");
        assert_eq!(url_host("ftp://user:pw@files.example.org", false), "files.example.org");
        assert_eq!(url_host("http://www.example.org#top", false), "www.example.org");
    }

    #[test]
    fn test_url_format() {
        let p = Predicate::url(&UrlSpecs::default(), true);
        assert!(p.check(&json!("https://example.com"), &ctx()).result);
        assert!(p.check(&json!("example.com/path/to?x=1"), &ctx()).result);
        assert_eq!(p.check(&json!("not a url"), &ctx()), Outcome::fail(INVALID_URL));
        assert_eq!(p.check(&json!("https://"), &ctx()), Outcome::fail(INVALID_URL));
    }

    #[test]
    fn test_url_www_stripped_on_both_sides() {
        let p = Predicate::url(
            &UrlSpecs {
                allowed_domains: vec!["WWW.Company.com".into()],
                ..UrlSpecs::default()
            },
            true,
        );
        assert!(p.check(&json!("https://company.com"), &ctx()).result);
        assert!(p.check(&json!("https://www.company.com"), &ctx()).result);
        assert_eq!(
            p.check(&json!("https://shop.company.com"), &ctx()),
            Outcome::fail(URL_DOMAIN_NOT_ALLOWED)
        );
    }

    #[test]
    fn test_url_www_kept_when_disabled() {
        let p = Predicate::url(
            &UrlSpecs {
                allowed_domains: vec!["company.com".into()],
                ..UrlSpecs::default()
            },
            false,
        );
        assert_eq!(
            p.check(&json!("https://www.company.com"), &ctx()),
            Outcome::fail(URL_DOMAIN_NOT_ALLOWED)
        );
    }

    #[test]
    fn test_json_syntax() {
        let p = Predicate::Json { max_size: None };
        for text in ["{}", "[]", "null", "1.5", "\"s\"", r#"{"a":[1,{"b":null}],"c":true}"#, "   ", ""] {
            assert_eq!(p.check(&json!(text), &ctx()), Outcome::pass(), "{}", text);
        }
        for text in [r#"{name: "x"}"#, r#"{"a":1,}"#, r#"{"a":1"#, "hello world"] {
            assert_eq!(p.check(&json!(text), &ctx()), Outcome::fail(INVALID_JSON), "{}", text);
        }
        assert_eq!(p.check(&json!({ "a": 1 }), &ctx()), Outcome::fail(INVALID_JSON));
    }

    #[test]
    fn test_json_size_limit() {
        let p = Predicate::Json { max_size: Some(4) };
        assert!(p.check(&json!("[1]"), &ctx()).result);
        assert_eq!(p.check(&json!("[1,2]"), &ctx()), Outcome::fail(JSON_TOO_LARGE));
    }

    #[test]
    fn test_record_id() {
        let p = Predicate::RecordId { allow_empty: false };
        assert!(p.check(&json!("507f1f77bcf86cd799439011"), &ctx()).result);
        assert_eq!(p.check(&json!("507f1f77bcf86cd79943901"), &ctx()), Outcome::fail(INVALID_ID));
        assert_eq!(p.check(&json!(42), &ctx()), Outcome::fail(INVALID_ID));
        assert_eq!(p.check(&json!(""), &ctx()), Outcome::fail(INVALID_ID));

        let optional = Predicate::RecordId { allow_empty: true };
        assert!(optional.check(&json!(""), &ctx()).result);
    }

    #[test]
    fn test_record_ids_are_opaque() {
        let opaque = "abcdefghijklmnopqrstuvwx";
        assert_eq!(opaque.len(), RECORD_ID_LENGTH);

        let single = Predicate::RecordId { allow_empty: false };
        assert_eq!(single.check(&json!(opaque), &ctx()), Outcome::pass());
        assert_eq!(single.check(&json!("short"), &ctx()), Outcome::fail(INVALID_ID));
        assert_eq!(
            single.check(&json!(format!("{}y", opaque)), &ctx()),
            Outcome::fail(INVALID_ID)
        );

        let list = Predicate::RecordIdList;
        assert_eq!(list.check(&json!([opaque, "507f1f77bcf86cd799439011"]), &ctx()), Outcome::pass());
        assert_eq!(list.check(&json!([opaque, "short"]), &ctx()), Outcome::fail(INVALID_IDS));
    }

    #[test]
    fn test_record_id_list() {
        let p = Predicate::RecordIdList;
        assert!(p.check(&json!([]), &ctx()).result);
        assert!(p.check(&json!(["507f1f77bcf86cd799439011", "507f191e810c19729de860ea"]), &ctx()).result);
        assert_eq!(
            p.check(&json!(["507f1f77bcf86cd799439011", "bad"]), &ctx()),
            Outcome::fail(INVALID_IDS)
        );
        assert_eq!(p.check(&json!("507f1f77bcf86cd799439011"), &ctx()), Outcome::fail(INVALID_IDS));
    }

    #[test]
    fn test_pattern() {
        let p = Predicate::pattern("^[A-Z]{3}$");
        assert!(p.check(&json!("ABC"), &ctx()).result);
        assert!(p.check(&json!(""), &ctx()).result);
        assert_eq!(p.check(&json!("abc"), &ctx()), Outcome::fail(PATTERN_MISMATCH));

        let broken = Predicate::pattern("(");
        assert_eq!(broken.check(&json!("x"), &ctx()), Outcome::fail(INVALID_PATTERN));
        assert_eq!(broken.check(&json!("y"), &ctx()), Outcome::fail(INVALID_PATTERN));
    }

    #[test]
    fn test_pattern_compiled_once() {
        let p = Predicate::pattern("^[a-z]+$");
        let Predicate::Pattern { pattern } = &p else {
            panic!("unexpected predicate {:?}", p);
        };
        assert!(pattern.is_valid());
        assert_eq!(pattern.as_str(), "^[a-z]+$");
        assert!(!CompiledPattern::new("[").is_valid());

        // Matching is unanchored unless the expression anchors itself
        let loose = Predicate::pattern("[A-Z]+");
        assert!(loose.check(&json!("abcD"), &ctx()).result);

        assert_eq!(
            serde_json::to_value(&p).unwrap(),
            json!({ "name": "pattern", "pattern": "^[a-z]+$" })
        );
        assert_eq!(p, Predicate::pattern("^[a-z]+$"));
    }

    #[test]
    fn test_date_range_inclusive() {
        let min = parse_date(&json!("2020-01-01T00:00:00.000Z"));
        let max = parse_date(&json!("2025-12-31T23:59:59.999Z"));
        let p = Predicate::DateRange { min, max };

        assert!(p.check(&json!("2020-01-01T00:00:00.000Z"), &ctx()).result);
        assert!(p.check(&json!("2025-12-31T23:59:59.999Z"), &ctx()).result);
        assert!(p.check(&json!("2023-06-15"), &ctx()).result);
        assert_eq!(p.check(&json!("2019-12-31"), &ctx()), Outcome::fail(DATE_OUT_OF_RANGE));
        assert_eq!(p.check(&json!("2026-01-01"), &ctx()), Outcome::fail(DATE_OUT_OF_RANGE));
        assert_eq!(p.check(&json!("someday"), &ctx()), Outcome::fail(INVALID_DATE));
        assert!(p.check(&Value::Null, &ctx()).result);
    }

    #[test]
    fn test_serialized_for_introspection() {
        let p = Predicate::RecordId { allow_empty: true };
        assert_eq!(
            serde_json::to_value(&p).unwrap(),
            json!({ "name": "recordId", "allowEmpty": true })
        );
    }
}
