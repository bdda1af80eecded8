//! End-to-end tests for `mox::coerce` with `#[derive(FormBind)]`.
#![cfg(feature = "derive")]

use std::collections::HashMap;

use mox::{BindError, FieldKind, FormBind, FormValues, Opt, ScalarKind};

fn values(pairs: &[(&str, &[&str])]) -> FormValues {
    let mut out = FormValues::new();
    for (key, vs) in pairs {
        out.set(*key, vs.iter().map(|v| v.to_string()).collect());
    }
    out
}

// ---------------------------------------------------------------------------
// Basic person record
// ---------------------------------------------------------------------------

#[derive(Debug, Default, PartialEq, FormBind)]
#[form(rename_all = "PascalCase")]
struct Person {
    name: String,
    tags: Vec<String>,
    age: i32,
    nick: Opt<String>,
}

#[test]
fn person_without_nick() {
    let mut p = Person::default();
    mox::coerce(
        &mut p,
        &values(&[
            ("Name", &["Bob"]),
            ("Age", &["30"]),
            ("Tags", &["a", "b"]),
            ("Nick", &[]),
        ]),
    )
    .unwrap();
    assert_eq!(
        p,
        Person {
            name: "Bob".into(),
            tags: vec!["a".into(), "b".into()],
            age: 30,
            nick: Opt::Absent,
        }
    );
}

#[test]
fn person_with_empty_nick() {
    let mut p = Person::default();
    mox::coerce(
        &mut p,
        &values(&[
            ("Name", &["Bob"]),
            ("Age", &["30"]),
            ("Tags", &["a", "b"]),
            ("Nick", &[""]),
        ]),
    )
    .unwrap();
    assert_eq!(p.nick, Opt::some(String::new()));
}

#[test]
fn person_bad_age_keeps_earlier_fields() {
    let mut p = Person::default();
    let err = mox::coerce(
        &mut p,
        &values(&[
            ("Name", &["Bob"]),
            ("Age", &["abc"]),
            ("Tags", &["a", "b"]),
            ("Nick", &["bobby"]),
        ]),
    )
    .unwrap_err();

    assert_eq!(err.field(), Some("age"));
    assert_eq!(err.key(), "parse_error");
    assert_eq!(
        err.to_string(),
        r#"cannot convert age="abc" to i32: invalid syntax"#
    );
    assert_eq!(p.name, "Bob");
    assert_eq!(p.tags, ["a", "b"]);
    // Declared after the failing field, never visited.
    assert_eq!(p.nick, Opt::Absent);
}

#[test]
fn missing_names_leave_sentinels() {
    let mut p = Person {
        name: "sentinel".into(),
        tags: vec!["keep".into()],
        age: -1,
        nick: Opt::some("n".into()),
    };
    mox::coerce(&mut p, &values(&[("Age", &["7"]), ("Other", &["x"])])).unwrap();
    assert_eq!(p.name, "sentinel");
    assert_eq!(p.tags, ["keep"]);
    assert_eq!(p.age, 7);
    assert_eq!(p.nick, Opt::some("n".to_string()));
}

#[test]
fn lookup_is_by_external_name() {
    let mut p = Person::default();
    mox::coerce(&mut p, &values(&[("name", &["lower"])])).unwrap();
    assert_eq!(p.name, "");
}

// ---------------------------------------------------------------------------
// Unsupported kinds
// ---------------------------------------------------------------------------

#[derive(Debug, Default, FormBind)]
struct Inner {
    x: i32,
}

#[derive(Debug, Default, FormBind)]
struct WithNested {
    before: String,
    inner: Inner,
    after: String,
}

#[test]
fn nested_struct_field_is_unsupported() {
    let mut w = WithNested::default();
    let err = mox::coerce(
        &mut w,
        &values(&[("before", &["b"]), ("inner", &["1"]), ("after", &["a"])]),
    )
    .unwrap_err();
    assert_eq!(
        err,
        BindError::UnsupportedKind {
            field: "inner".into(),
            kind: "struct"
        }
    );
    assert_eq!(w.before, "b");
    assert_eq!(w.after, "");
}

#[test]
fn unsupported_field_without_values_is_skipped() {
    let mut w = WithNested::default();
    mox::coerce(&mut w, &values(&[("after", &["a"])])).unwrap();
    assert_eq!(w.after, "a");
}

#[derive(Debug, Default, FormBind)]
struct WithMap {
    meta: HashMap<String, String>,
    extra: serde_json::Value,
}

#[test]
fn maps_and_values_are_unsupported() {
    let mut w = WithMap::default();
    let err = mox::coerce(&mut w, &values(&[("meta", &["1"])])).unwrap_err();
    assert_eq!(err.to_string(), "unsupported kind: meta is map");

    let err = mox::coerce(&mut w, &values(&[("extra", &["1"])])).unwrap_err();
    assert_eq!(err.key(), "unsupported_kind");
    assert_eq!(err.field(), Some("extra"));
}

#[derive(Debug, Default, FormBind)]
struct OptNested {
    inner: Opt<Inner>,
}

#[test]
fn optional_nested_struct_is_unsupported() {
    let mut w = OptNested::default();
    let err = mox::coerce(&mut w, &values(&[("inner", &["1"])])).unwrap_err();
    assert_eq!(
        err,
        BindError::UnsupportedOptionKind {
            field: "inner".into(),
            kind: "struct"
        }
    );
}

// ---------------------------------------------------------------------------
// Non-struct destinations
// ---------------------------------------------------------------------------

#[derive(Debug, FormBind)]
enum Choice {
    #[allow(dead_code)]
    A,
}

#[test]
fn enums_are_not_structs() {
    let err = mox::coerce(&mut Choice::A, &FormValues::new()).unwrap_err();
    assert_eq!(err.to_string(), "only structs can be bound: kind=enum");
    assert_eq!(err.field(), None);
}

#[test]
fn one_level_of_indirection_is_followed() {
    let mut boxed = Box::new(Person::default());
    mox::coerce(&mut boxed, &values(&[("Age", &["5"])])).unwrap();
    assert_eq!(boxed.age, 5);

    let mut p = Person::default();
    let mut by_ref = &mut p;
    mox::coerce(&mut by_ref, &values(&[("Age", &["6"])])).unwrap();
    assert_eq!(p.age, 6);
}

// ---------------------------------------------------------------------------
// Names: rename, tags, skip
// ---------------------------------------------------------------------------

#[derive(Debug, Default, FormBind)]
#[form(rename_all = "camelCase")]
struct Names {
    user_name: String,
    #[form(rename = "p")]
    page_number: u32,
    #[form("tag,omitempty")]
    tags: Vec<String>,
    #[form(" , id")]
    ident: u8,
    #[form(skip)]
    cache: String,
    #[form("-")]
    secret: String,
    r#type: String,
}

#[test]
fn external_names() {
    let mut n = Names::default();
    mox::coerce(
        &mut n,
        &values(&[
            ("userName", &["ann"]),
            ("p", &["3"]),
            ("tag", &["x", "y"]),
            ("id", &["9"]),
            ("cache", &["no"]),
            ("secret", &["no"]),
            ("-", &["no"]),
            ("type", &["t"]),
        ]),
    )
    .unwrap();
    assert_eq!(n.user_name, "ann");
    assert_eq!(n.page_number, 3);
    assert_eq!(n.tags, ["x", "y"]);
    assert_eq!(n.ident, 9);
    assert_eq!(n.cache, "");
    assert_eq!(n.secret, "");
    assert_eq!(n.r#type, "t");
}

#[test]
fn descriptor_table() {
    let mut n = Names::default();
    let slots = n.form_fields().unwrap();
    let names: Vec<_> = slots.iter().map(|s| (s.name, s.ident)).collect();
    assert_eq!(
        names,
        [
            ("userName", "user_name"),
            ("p", "page_number"),
            ("tag", "tags"),
            ("id", "ident"),
            ("type", "type"),
        ]
    );
    assert_eq!(slots[1].kind(), FieldKind::Plain(ScalarKind::U32));
    assert_eq!(slots[2].kind(), FieldKind::Slice(ScalarKind::Str));
}

#[derive(Debug, Default, FormBind)]
struct Generic<T> {
    value: T,
    label: String,
}

#[test]
fn generic_structs() {
    let mut g: Generic<Opt<f64>> = Generic::default();
    mox::coerce(&mut g, &values(&[("value", &["2.5"]), ("label", &["l"])])).unwrap();
    assert_eq!(g.value, Opt::some(2.5));
    assert_eq!(g.label, "l");
}

// ---------------------------------------------------------------------------
// Every supported kind at once
// ---------------------------------------------------------------------------

#[derive(Debug, Default, PartialEq, FormBind)]
struct AllKinds {
    str_v: String,
    bool_v: bool,
    isize_v: isize,
    i8_v: i8,
    i16_v: i16,
    i32_v: i32,
    i64_v: i64,
    usize_v: usize,
    u8_v: u8,
    u16_v: u16,
    u32_v: u32,
    u64_v: u64,
    f32_v: f32,
    f64_v: f64,
    dur_v: mox::Duration,

    ptr_str: Option<String>,
    ptr_bool: Option<bool>,
    ptr_i64: Option<i64>,
    ptr_u8: Option<u8>,
    ptr_f32: Option<f32>,
    box_i16: Box<i16>,

    slice_str: Vec<String>,
    slice_bool: Vec<bool>,
    slice_i32: Vec<i32>,
    slice_u64: Vec<u64>,
    slice_f64: Vec<f64>,
    slice_ptr: Vec<Option<u16>>,

    array_str: [String; 2],
    array_bool: [bool; 2],
    array_i8: [i8; 2],
    array_u32: [u32; 2],
    array_f32: [f32; 2],

    opt_str: Opt<String>,
    opt_bool: Opt<bool>,
    opt_isize: Opt<isize>,
    opt_i8: Opt<i8>,
    opt_u16: Opt<u16>,
    opt_usize: Opt<usize>,
    opt_f64: Opt<f64>,
    opt_dur: Opt<mox::Duration>,

    opt_slice_str: Opt<Vec<String>>,
    opt_slice_bool: Opt<Vec<bool>>,
    opt_slice_i64: Opt<Vec<i64>>,
    opt_slice_u8: Opt<Vec<u8>>,
    opt_slice_f32: Opt<Vec<f32>>,
}

#[test]
fn all_kinds_bind() {
    let input = values(&[
        ("str_v", &["test"]),
        ("bool_v", &["true"]),
        ("isize_v", &["-42"]),
        ("i8_v", &["-8"]),
        ("i16_v", &["16"]),
        ("i32_v", &["32"]),
        ("i64_v", &["64"]),
        ("usize_v", &["42"]),
        ("u8_v", &["8"]),
        ("u16_v", &["16"]),
        ("u32_v", &["32"]),
        ("u64_v", &["64"]),
        ("f32_v", &["3.5"]),
        ("f64_v", &["-0.25"]),
        ("dur_v", &["1h30m"]),
        ("ptr_str", &["ptrTest"]),
        ("ptr_bool", &["T"]),
        ("ptr_i64", &["99"]),
        ("ptr_u8", &["7"]),
        ("ptr_f32", &["1.25"]),
        ("box_i16", &["-3"]),
        ("slice_str", &["slice1", "slice2"]),
        ("slice_bool", &["true", "0"]),
        ("slice_i32", &["1", "-2"]),
        ("slice_u64", &["3", "4"]),
        ("slice_f64", &["0.5", "1e3"]),
        ("slice_ptr", &["5", "6"]),
        ("array_str", &["array1", "array2"]),
        ("array_bool", &["true", "false"]),
        ("array_i8", &["1", "2"]),
        ("array_u32", &["3", "4"]),
        ("array_f32", &["0.5", "1.5"]),
        ("opt_str", &["optionStr"]),
        ("opt_bool", &["false"]),
        ("opt_isize", &["-1"]),
        ("opt_i8", &["12"]),
        ("opt_u16", &["65535"]),
        ("opt_usize", &["0"]),
        ("opt_f64", &["6.25"]),
        ("opt_dur", &["250ms"]),
        ("opt_slice_str", &["optSlice1", "optSlice2"]),
        ("opt_slice_bool", &["true", "false"]),
        ("opt_slice_i64", &["-1", "1"]),
        ("opt_slice_u8", &["0", "255"]),
        ("opt_slice_f32", &["2.5", "-2.5"]),
    ]);

    let mut got = AllKinds::default();
    mox::coerce(&mut got, &input).unwrap();

    let want = AllKinds {
        str_v: "test".into(),
        bool_v: true,
        isize_v: -42,
        i8_v: -8,
        i16_v: 16,
        i32_v: 32,
        i64_v: 64,
        usize_v: 42,
        u8_v: 8,
        u16_v: 16,
        u32_v: 32,
        u64_v: 64,
        f32_v: 3.5,
        f64_v: -0.25,
        dur_v: mox::Duration::from_secs(90 * 60),
        ptr_str: Some("ptrTest".into()),
        ptr_bool: Some(true),
        ptr_i64: Some(99),
        ptr_u8: Some(7),
        ptr_f32: Some(1.25),
        box_i16: Box::new(-3),
        slice_str: vec!["slice1".into(), "slice2".into()],
        slice_bool: vec![true, false],
        slice_i32: vec![1, -2],
        slice_u64: vec![3, 4],
        slice_f64: vec![0.5, 1000.0],
        slice_ptr: vec![Some(5), Some(6)],
        array_str: ["array1".into(), "array2".into()],
        array_bool: [true, false],
        array_i8: [1, 2],
        array_u32: [3, 4],
        array_f32: [0.5, 1.5],
        opt_str: Opt::some("optionStr".into()),
        opt_bool: Opt::some(false),
        opt_isize: Opt::some(-1),
        opt_i8: Opt::some(12),
        opt_u16: Opt::some(65535),
        opt_usize: Opt::some(0),
        opt_f64: Opt::some(6.25),
        opt_dur: Opt::some(mox::Duration::from_millis(250)),
        opt_slice_str: Opt::some(vec!["optSlice1".into(), "optSlice2".into()]),
        opt_slice_bool: Opt::some(vec![true, false]),
        opt_slice_i64: Opt::some(vec![-1, 1]),
        opt_slice_u8: Opt::some(vec![0, 255]),
        opt_slice_f32: Opt::some(vec![2.5, -2.5]),
    };
    assert_eq!(got, want);
}

#[test]
fn all_kinds_from_query_string() {
    let mut got = AllKinds::default();
    let input: FormValues = "str_v=a+b&slice_i32=1&slice_i32=2&opt_bool&array_i8=9"
        .split('&')
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .map(|(k, v)| (k, v.replace('+', " ")))
        .collect();
    mox::coerce(&mut got, &input).unwrap();
    assert_eq!(got.str_v, "a b");
    assert_eq!(got.slice_i32, [1, 2]);
    assert_eq!(got.opt_bool, Opt::some(true));
    assert_eq!(got.array_i8, [9, 0]);
}
