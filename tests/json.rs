//! serde round trips of structs holding `Opt` fields.

use mox::Opt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
struct Omitting {
    #[serde(default, skip_serializing_if = "Opt::is_absent")]
    name: Opt<String>,
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
struct Nulling {
    #[serde(default)]
    name: Opt<String>,
}

#[test]
fn omitted_when_absent() {
    let present = Omitting {
        name: Opt::some("sb".into()),
    };
    assert_eq!(serde_json::to_string(&present).unwrap(), r#"{"name":"sb"}"#);
    assert_eq!(serde_json::to_string(&Omitting::default()).unwrap(), "{}");
}

#[test]
fn null_when_absent_without_skip() {
    let present = Nulling {
        name: Opt::some("sb".into()),
    };
    let text = serde_json::to_string(&present).unwrap();
    assert_eq!(text, r#"{"name":"sb"}"#);
    assert_eq!(serde_json::from_str::<Nulling>(&text).unwrap(), present);

    let absent = Nulling::default();
    let text = serde_json::to_string(&absent).unwrap();
    assert_eq!(text, r#"{"name":null}"#);
    // `null` reads back as absent, so the round trip is lossless.
    let back: Nulling = serde_json::from_str(&text).unwrap();
    assert_eq!(back, absent);
    assert_eq!(back.name.or_empty(), "");
}

#[test]
fn missing_field_is_absent() {
    let v: Nulling = serde_json::from_str("{}").unwrap();
    assert!(v.name.is_absent());
    let v: Omitting = serde_json::from_str(r#"{"name":""}"#).unwrap();
    assert_eq!(v.name, Opt::some(String::new()));
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Mixed {
    #[serde(default, skip_serializing_if = "Opt::is_absent")]
    ids: Opt<Vec<u32>>,
    #[serde(default, skip_serializing_if = "Opt::is_absent")]
    timeout: Opt<mox::Duration>,
    #[serde(default)]
    score: Opt<f64>,
}

#[test]
fn bare_inner_values() {
    let m = Mixed {
        ids: Opt::some(vec![1, 2]),
        timeout: Opt::some(mox::Duration::from_millis(1500)),
        score: Opt::Absent,
    };
    let json = serde_json::to_value(&m).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"ids": [1, 2], "timeout": 1_500_000_000i64, "score": null})
    );
    let back: Mixed = serde_json::from_value(json).unwrap();
    assert_eq!(back, m);
}

#[test]
fn durations_read_from_text() {
    let m: Mixed = serde_json::from_str(r#"{"timeout":"2m"}"#).unwrap();
    assert_eq!(m.timeout, Opt::some(mox::Duration::from_secs(120)));
    assert!(m.ids.is_absent());
}

#[test]
fn type_mismatch_is_an_error() {
    assert!(serde_json::from_str::<Mixed>(r#"{"ids":"nope"}"#).is_err());
}
