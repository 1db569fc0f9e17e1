use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tablegate::{
    ColumnDescriptor, ConditionRule, ConditionSet, DataClass, FilterDescriptor, FilterOp,
    MutationClauseBuilder, PageWindow, QueryBuilder, Record, SortDescriptor, TableRef, Value,
};

/// `n` columns alternating int / nvarchar / date.
fn columns(n: usize) -> Vec<ColumnDescriptor> {
    (0..n)
        .map(|i| {
            let ty = match i % 3 {
                0 => "int",
                1 => "nvarchar(50)",
                _ => "date",
            };
            ColumnDescriptor::new(format!("col{i}"), ty)
        })
        .collect()
}

fn filters(n: usize) -> Vec<FilterDescriptor> {
    (0..n)
        .map(|i| match i % 3 {
            0 => FilterDescriptor::new(format!("col{i}"), FilterOp::GreaterEquals, "42"),
            1 => FilterDescriptor::new(format!("col{i}"), FilterOp::Contains, "50%_off"),
            _ => FilterDescriptor::new(format!("col{i}"), FilterOp::LessThan, "31/12/2024"),
        })
        .collect()
}

fn record(n: usize) -> Record {
    (0..n)
        .map(|i| {
            let v = match i % 3 {
                0 => Value::from(i as i64),
                1 => Value::from("text"),
                _ => Value::from("01/02/2024"),
            };
            (format!("col{i}"), v)
        })
        .collect()
}

fn bench_build_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_builder/build");
    let table = TableRef::with_schema("dbo", "t");

    for n in [1, 5, 10, 50, 100] {
        let cols = columns(n);
        let fs = filters(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                let q = QueryBuilder::new(&cols)
                    .build(
                        &fs,
                        Some(&SortDescriptor::desc("col0")),
                        Some(&PageWindow::new(50, 100)),
                    )
                    .unwrap();
                black_box(q.select_sql(&table));
            });
        });
    }

    group.finish();
}

fn bench_build_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("mutation/insert");
    let table = TableRef::new("t");

    for n in [1, 10, 50, 100] {
        let cols = columns(n);
        let rec = record(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                let insert = MutationClauseBuilder::new(&cols).build_insert(&rec).unwrap();
                black_box(insert.to_sql(&table));
            });
        });
    }

    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("condition/validate");

    for n in [1, 10, 50] {
        let rules: Vec<ConditionRule> = (0..n)
            .map(|i| {
                ConditionRule::new(
                    format!("col{i}"),
                    DataClass::Numeric,
                    "range",
                    r#"{"min":0,"max":1000}"#,
                )
                .required()
            })
            .collect();
        let set = ConditionSet::compile(&rules).unwrap();
        let payload: Record = (0..n)
            .map(|i| (format!("col{i}"), Value::from(i as i64 * 37)))
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(n), &payload, |b, payload| {
            b.iter(|| black_box(set.validate(payload)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build_query, bench_build_insert, bench_validate);
criterion_main!(benches);
