//! Invariants checked over generated inputs.

use tablegate::{
    ColumnDescriptor, ConditionRule, DataClass, FilterDescriptor, FilterOp, MutationClauseBuilder,
    PageWindow, QueryBuilder, Record, SortDescriptor, TableRef, Value, date, validate,
};

const HOSTILE: &[&str] = &[
    "'",
    "x' OR '1'='1",
    "1; DROP TABLE People",
    "-- comment",
    "a]; DELETE FROM [People",
    "]]'--;",
    "%_[",
];

const OPS: &[FilterOp] = &[
    FilterOp::Equals,
    FilterOp::NotEquals,
    FilterOp::Contains,
    FilterOp::StartsWith,
    FilterOp::EndsWith,
    FilterOp::GreaterThan,
    FilterOp::GreaterEquals,
    FilterOp::LessThan,
    FilterOp::LessEquals,
];

fn columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::new("Id", "int").identity(),
        ColumnDescriptor::new("Name", "nvarchar(50)"),
        ColumnDescriptor::new("Notes", "nvarchar(max)"),
        ColumnDescriptor::new("Odd]Name", "varchar(10)"),
    ]
}

fn assert_no_raw(sql: &str, value: &str) {
    for needle in ["'", ";", "--"] {
        if value.contains(needle) {
            assert!(!sql.contains(needle), "{needle:?} leaked into {sql:?}");
        }
    }
    assert!(!sql.contains(value), "raw value leaked into {sql:?}");
}

#[test]
fn filter_values_never_reach_sql_text() {
    let cols = columns();
    let table = TableRef::new("People");
    for value in HOSTILE {
        for op in OPS {
            let filters = vec![
                FilterDescriptor::new("Name", *op, *value),
                FilterDescriptor::new("Odd]Name", *op, *value),
            ];
            let q = QueryBuilder::new(&cols)
                .build(&filters, Some(&SortDescriptor::asc("Notes")), Some(&PageWindow::new(5, 0)))
                .unwrap();
            let sql = q.select_sql(&table);

            assert_no_raw(&sql, value);
            assert!(sql.contains("[Odd]]Name] "));
            assert_eq!(q.params.len(), 4);
        }
    }
}

#[test]
fn record_values_never_reach_sql_text() {
    let cols = columns();
    let table = TableRef::new("People");
    let writer = MutationClauseBuilder::new(&cols);

    for value in HOSTILE {
        let mut record = Record::new();
        record.insert("Id".into(), Value::from(1));
        record.insert("Name".into(), Value::from(*value));
        record.insert("Notes".into(), Value::from(*value));
        let mut keys = Record::new();
        keys.insert("Name".into(), Value::from(*value));

        let insert = writer.build_insert(&record).unwrap();
        let update = writer.build_update(&record, &["Id"]).unwrap();
        let delete = writer.build_delete(&["Name"], &keys).unwrap();

        for sql in [insert.to_sql(&table), update.to_sql(&table), delete.to_sql(&table)] {
            assert_no_raw(&sql, value);
        }
    }
}

#[test]
fn hostile_payload_keys_are_ignored() {
    let cols = columns();
    let mut record = Record::new();
    record.insert("Name".into(), Value::from("ok"));
    record.insert("Name] = 1; --".into(), Value::from("x"));

    let insert = MutationClauseBuilder::new(&cols).build_insert(&record).unwrap();
    assert_eq!(insert.columns_sql, "[Name]");
}

#[test]
fn parameter_names_are_legal_identifiers() {
    let cols = vec![
        ColumnDescriptor::new("Unit Price", "money"),
        ColumnDescriptor::new("Unit-Price", "money"),
        ColumnDescriptor::new("Ünit", "money"),
    ];
    let mut record = Record::new();
    for c in &cols {
        record.insert(c.name.clone(), Value::from(1.5));
    }
    let insert = MutationClauseBuilder::new(&cols).build_insert(&record).unwrap();

    let mut seen = std::collections::HashSet::new();
    for p in insert.params.iter() {
        assert!(!p.name.is_empty());
        assert!(p.name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
        assert!(seen.insert(p.name.clone()), "duplicate name {}", p.name);
    }
}

#[test]
fn day_first_dates_round_trip() {
    for year in [1900, 1999, 2000, 2024, 2100] {
        for month in 1..=12u32 {
            for day in 1..=31u32 {
                let input = format!("{day:02}/{month:02}/{year}");
                let Ok(canonical) = date::to_canonical(&input) else {
                    continue;
                };
                let reparsed = date::parse_canonical(&canonical).unwrap();
                assert_eq!(reparsed.to_day_first(), input);
            }
        }
    }
}

#[test]
fn date_times_round_trip() {
    for input in ["01/01/2025 00:00", "31/12/2099 23:59", "15/06/1980 09:05"] {
        let canonical = date::to_canonical(input).unwrap();
        assert!(canonical.ends_with(":00"));
        assert_eq!(date::parse_canonical(&canonical).unwrap().to_day_first(), input);
    }
}

#[test]
fn ambiguity_rule_holds_for_every_pair() {
    for a in 1..=31u32 {
        for b in 1..=31u32 {
            let input = format!("{a:02}/{b:02}/2025");
            let american = date::is_ambiguous_american_format(&input);
            assert_eq!(american, a <= 12 && b > 12, "{input}");
            if american {
                assert!(date::parse(&input).unwrap_err().is_american());
            }
        }
    }
    assert!(date::is_ambiguous_american_format("10/31/2025"));
    assert!(!date::is_ambiguous_american_format("31/10/2025"));
    assert!(!date::is_ambiguous_american_format("01/01/2025"));
}

#[test]
fn independent_failures_are_all_reported() {
    let rules = vec![
        ConditionRule::new("Name", DataClass::Text, "length", r#"{"max":3}"#),
        ConditionRule::new("Price", DataClass::Numeric, "range", r#"{"max":10}"#),
    ];
    let mut payload = Record::new();
    payload.insert("Name".into(), Value::from("too long"));
    payload.insert("Price".into(), Value::from(99));

    let verdict = validate(&rules, &payload).unwrap();
    assert_eq!(verdict.errors.len(), 2);
    assert!(!verdict.is_valid);
}
