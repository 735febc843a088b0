use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use unit_ledger::ingestion::delimited::parse_delimited_str;
use unit_ledger::query::{run_query, FieldMapping, FilterQuery, NumericRange, Pagination};
use unit_ledger::types::{Record, Value};

const PHASES: [&str; 4] = ["North Phase", "South Phase", "East Phase", "West Phase"];
const TYPES: [&str; 3] = ["Apartment", "Villa", "Penthouse"];
const STATUSES: [&str; 3] = ["Available", "Sold", "Reserved"];

fn synthetic_units(n: usize) -> Vec<Record> {
    (0..n)
        .map(|i| {
            Record::from_iter([
                ("Unit Name", Value::text(format!("U-{i:05}"))),
                ("Phase: Phase Name", Value::text(PHASES[i % PHASES.len()])),
                ("Unit Type", Value::text(TYPES[i % TYPES.len()])),
                ("Building Name", Value::text(format!("Tower {}", i % 7))),
                ("Number of rooms", Value::text(((i % 5) + 1).to_string())),
                ("Unit Status", Value::text(STATUSES[i % STATUSES.len()])),
                ("Unit Price", Value::text((100_000 + (i % 900) * 1_000).to_string())),
                ("Unit Gross Area", Value::Number(40.0 + (i % 260) as f64)),
            ])
        })
        .collect()
}

fn synthetic_csv(n: usize) -> String {
    let mut out = String::from("Unit Name;Phase: Phase Name;Unit Type;Number of rooms;Unit Status;Unit Price\n");
    for i in 0..n {
        out.push_str(&format!(
            "U-{i:05};{};{};{};{};{}\n",
            PHASES[i % PHASES.len()],
            TYPES[i % TYPES.len()],
            (i % 5) + 1,
            STATUSES[i % STATUSES.len()],
            100_000 + (i % 900) * 1_000
        ));
    }
    out
}

fn bench_query(c: &mut Criterion) {
    let mapping = FieldMapping::default();
    let mut group = c.benchmark_group("run_query");

    for n in [1_000usize, 10_000] {
        let units = synthetic_units(n);

        group.bench_with_input(BenchmarkId::new("unfiltered", n), &units, |b, units| {
            b.iter(|| run_query(black_box(units), &FilterQuery::default(), Pagination::default(), &mapping))
        });

        let query = FilterQuery {
            search: "tower 3".to_string(),
            price: NumericRange::new(200_000.0, 700_000.0),
            status: "available".to_string(),
            ..Default::default()
        };
        group.bench_with_input(BenchmarkId::new("search_price_status", n), &units, |b, units| {
            b.iter(|| run_query(black_box(units), &query, Pagination::new(2, 25), &mapping))
        });
    }
    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let text = synthetic_csv(10_000);
    c.bench_function("parse_delimited_str/10000", |b| {
        b.iter(|| parse_delimited_str(black_box(&text)))
    });
}

criterion_group!(benches, bench_query, bench_parse);
criterion_main!(benches);
