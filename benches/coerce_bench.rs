use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mox::prelude::*;

#[derive(Debug, Default, FormBind, Validate)]
#[form(rename_all = "camelCase")]
struct Search {
    #[validate(length(min = 1))]
    query: String,
    #[validate(range(min = 1))]
    page: Opt<u32>,
    per_page: u16,
    exact: Opt<bool>,
    timeout: Opt<Duration>,
    tags: Vec<String>,
    ids: Opt<Vec<i64>>,
}

fn search_values(tags: usize) -> FormValues {
    let mut values = FormValues::new();
    values.append("query", "rust forms");
    values.append("page", "3");
    values.append("perPage", "50");
    values.append("exact", "");
    values.append("timeout", "1m30s");
    for i in 0..tags {
        values.append("tags", format!("tag{i}"));
        values.append("ids", i.to_string());
    }
    values
}

// -----------------------------------------------------------------------
// Coercion
// -----------------------------------------------------------------------

fn bench_coerce(c: &mut Criterion) {
    let small = search_values(2);
    c.bench_function("coerce_search_small", |b| {
        b.iter(|| {
            let mut dest = Search::default();
            mox::coerce(&mut dest, black_box(&small))
        })
    });

    let large = search_values(1000);
    c.bench_function("coerce_search_1000_items", |b| {
        b.iter(|| {
            let mut dest = Search::default();
            mox::coerce(&mut dest, black_box(&large))
        })
    });

    let bad: FormValues = [("query", "x"), ("page", "")].into_iter().collect();
    c.bench_function("coerce_empty_optional_error", |b| {
        b.iter(|| {
            let mut dest = Search::default();
            mox::coerce(&mut dest, black_box(&bad))
        })
    });
}

// -----------------------------------------------------------------------
// Coercion + validation
// -----------------------------------------------------------------------

fn bench_bind(c: &mut Criterion) {
    let values = search_values(2);
    c.bench_function("bind_search_valid", |b| {
        b.iter(|| {
            let mut dest = Search::default();
            mox::bind(&mut dest, black_box(&values))
        })
    });

    let invalid: FormValues = [("query", ""), ("page", "0")].into_iter().collect();
    c.bench_function("bind_search_invalid", |b| {
        b.iter(|| {
            let mut dest = Search::default();
            mox::bind(&mut dest, black_box(&invalid))
        })
    });
}

fn bench_duration(c: &mut Criterion) {
    c.bench_function("duration_parse", |b| {
        b.iter(|| Duration::parse(black_box("1h15m30.5s")))
    });
}

fn bench_json(c: &mut Criterion) {
    let value: Opt<Vec<i64>> = Opt::some((0..100).collect());
    c.bench_function("json_opt_vec_100", |b| {
        b.iter(|| serde_json::to_string(black_box(&value)))
    });
}

criterion_group!(benches, bench_coerce, bench_bind, bench_duration, bench_json);
criterion_main!(benches);
