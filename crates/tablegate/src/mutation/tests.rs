use super::*;
use chrono::{NaiveDate, NaiveDateTime};

fn columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::new("Id", "int").identity(),
        ColumnDescriptor::new("Code", "nvarchar(10)").not_null(),
        ColumnDescriptor::new("Name", "nvarchar(50)"),
        ColumnDescriptor::new("Unit Price", "decimal(10,2)"),
        ColumnDescriptor::new("Born", "date"),
        ColumnDescriptor::new("Seen", "datetime2"),
        ColumnDescriptor::new("Active", "bit"),
    ]
}

fn record(pairs: &[(&str, Value)]) -> Record {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), v.clone()))
        .collect()
}

#[test]
fn test_insert_excludes_identity() {
    let cols = vec![
        ColumnDescriptor::new("Id", "int").identity(),
        ColumnDescriptor::new("Name", "nvarchar(50)"),
    ];
    let rec = record(&[("Id", Value::from(5)), ("Name", Value::from("x"))]);
    let insert = MutationClauseBuilder::new(&cols).build_insert(&rec).unwrap();

    assert_eq!(insert.columns, vec!["Name".to_string()]);
    assert_eq!(insert.columns_sql, "[Name]");
    assert_eq!(insert.values_sql, "@Name");
    assert_eq!(insert.params.get("Name"), Some(&SqlValue::Text("x".into())));
    assert!(insert.params.get("Id").is_none());
}

#[test]
fn test_insert_skips_blank_and_unknown_fields() {
    let cols = columns();
    let rec = record(&[
        ("Code", Value::from("A1")),
        ("Name", Value::from("  ")),
        ("Born", Value::Null),
        ("Bogus]; --", Value::from("x")),
    ]);
    let insert = MutationClauseBuilder::new(&cols).build_insert(&rec).unwrap();
    assert_eq!(insert.columns_sql, "[Code]");
    assert_eq!(insert.params.len(), 1);
}

#[test]
fn test_insert_sanitizes_param_names() {
    let cols = columns();
    let rec = record(&[("Unit Price", Value::from(9.5)), ("Active", Value::from("1"))]);
    let insert = MutationClauseBuilder::new(&cols).build_insert(&rec).unwrap();

    assert_eq!(insert.columns_sql, "[Unit Price], [Active]");
    assert_eq!(insert.values_sql, "@Unit_Price, @Active");
    assert_eq!(insert.params.get("Unit_Price"), Some(&SqlValue::Float(9.5)));
    assert_eq!(insert.params.get("Active"), Some(&SqlValue::Bool(true)));
}

#[test]
fn test_insert_colliding_param_names() {
    let cols = vec![
        ColumnDescriptor::new("a b", "int"),
        ColumnDescriptor::new("a_b", "int"),
    ];
    let rec = record(&[("a b", Value::from(1)), ("a_b", Value::from(2))]);
    let insert = MutationClauseBuilder::new(&cols).build_insert(&rec).unwrap();
    assert_eq!(insert.values_sql, "@a_b, @a_b_2");
}

#[test]
fn test_insert_empty_payload() {
    let cols = columns();
    let rec = record(&[("Id", Value::from(1)), ("Name", Value::from(""))]);
    let err = MutationClauseBuilder::new(&cols).build_insert(&rec).unwrap_err();
    assert_eq!(err, GateError::EmptyPayload);
}

#[test]
fn test_insert_dates_resolved() {
    let cols = columns();
    let rec = record(&[
        ("Born", Value::from("29/02/2024")),
        ("Seen", Value::from("01/03/2024 14:30")),
    ]);
    let insert = MutationClauseBuilder::new(&cols).build_insert(&rec).unwrap();
    assert_eq!(
        insert.params.get("Born"),
        Some(&SqlValue::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()))
    );
    let seen = NaiveDateTime::parse_from_str("2024-03-01 14:30", "%Y-%m-%d %H:%M").unwrap();
    assert_eq!(insert.params.get("Seen"), Some(&SqlValue::DateTime(seen)));
}

#[test]
fn test_insert_rejects_american_date() {
    let cols = columns();
    let rec = record(&[("Code", Value::from("A")), ("Born", Value::from("10/31/2025"))]);
    let err = MutationClauseBuilder::new(&cols).build_insert(&rec).unwrap_err();
    assert_eq!(err.error_type(), "DateFormatViolation");
    assert_eq!(err.column(), Some("Born"));
    assert!(err.is_client_error());
}

#[test]
fn test_non_text_date_value_is_date_violation() {
    let cols = columns();
    let builder = MutationClauseBuilder::new(&cols);
    for (column, value) in [
        ("Born", Value::from(20251031)),
        ("Seen", Value::from(true)),
        ("Born", Value::from(1.5)),
    ] {
        let err = builder.build_insert(&record(&[(column, value)])).unwrap_err();
        assert_eq!(err.error_type(), "DateFormatViolation");
        assert_eq!(err.column(), Some(column));
    }
}

#[test]
fn test_insert_rejects_bad_number() {
    let cols = columns();
    let rec = record(&[("Unit Price", Value::from("lots"))]);
    let err = MutationClauseBuilder::new(&cols).build_insert(&rec).unwrap_err();
    assert_eq!(err.error_type(), "InvalidValue");
    assert_eq!(err.column(), Some("Unit Price"));
}

#[test]
fn test_insert_to_sql() {
    let cols = columns();
    let rec = record(&[("Code", Value::from("A")), ("Name", Value::from("B"))]);
    let insert = MutationClauseBuilder::new(&cols).build_insert(&rec).unwrap();
    assert_eq!(
        insert.to_sql(&TableRef::with_schema("dbo", "Items")),
        "INSERT INTO [dbo].[Items] ([Code], [Name]) VALUES (@Code, @Name)"
    );
}

#[test]
fn test_update_basic() {
    let cols = columns();
    let rec = record(&[
        ("Id", Value::from(7)),
        ("Name", Value::from("New")),
        ("Active", Value::from(false)),
    ]);
    let update = MutationClauseBuilder::new(&cols)
        .build_update(&rec, &["Id"])
        .unwrap();

    assert_eq!(update.set_sql, "SET [Name] = @Name, [Active] = @Active");
    assert_eq!(update.where_sql, "WHERE [Id] = @where_Id");
    assert_eq!(update.params.get("where_Id"), Some(&SqlValue::Int(7)));
    assert_eq!(
        update.to_sql(&TableRef::new("Items")),
        "UPDATE [Items] SET [Name] = @Name, [Active] = @Active WHERE [Id] = @where_Id"
    );
}

#[test]
fn test_update_composite_key_disjoint_namespace() {
    let cols = columns();
    let rec = record(&[
        ("Code", Value::from("A1")),
        ("Name", Value::from("x")),
        ("Born", Value::from("01/01/2000")),
    ]);
    let update = MutationClauseBuilder::new(&cols)
        .build_update(&rec, &["Code", "Name"])
        .unwrap();

    assert_eq!(update.set_sql, "SET [Born] = @Born");
    assert_eq!(
        update.where_sql,
        "WHERE [Code] = @where_Code AND [Name] = @where_Name"
    );
    assert_eq!(update.params.len(), 3);
}

#[test]
fn test_update_blank_sets_null() {
    let cols = columns();
    let rec = record(&[("Id", Value::from(1)), ("Name", Value::from(""))]);
    let update = MutationClauseBuilder::new(&cols)
        .build_update(&rec, &["Id"])
        .unwrap();
    assert_eq!(update.params.get("Name"), Some(&SqlValue::Null));
}

#[test]
fn test_update_blank_not_null_rejected() {
    let cols = columns();
    let rec = record(&[("Id", Value::from(1)), ("Code", Value::Null)]);
    let err = MutationClauseBuilder::new(&cols)
        .build_update(&rec, &["Id"])
        .unwrap_err();
    assert_eq!(err.column(), Some("Code"));
}

#[test]
fn test_update_requires_primary_key() {
    let cols = columns();
    let rec = record(&[("Name", Value::from("x"))]);
    let err = MutationClauseBuilder::new(&cols)
        .build_update(&rec, &[])
        .unwrap_err();
    assert_eq!(err, GateError::NoPrimaryKey);
}

#[test]
fn test_update_missing_key_value() {
    let cols = columns();
    let rec = record(&[("Name", Value::from("x"))]);
    let err = MutationClauseBuilder::new(&cols)
        .build_update(&rec, &["Id"])
        .unwrap_err();
    assert_eq!(err, GateError::MissingKeyValue("Id".into()));
}

#[test]
fn test_update_only_keys_is_empty_payload() {
    let cols = columns();
    let rec = record(&[("Id", Value::from(1))]);
    let err = MutationClauseBuilder::new(&cols)
        .build_update(&rec, &["Id"])
        .unwrap_err();
    assert_eq!(err, GateError::EmptyPayload);
}

#[test]
fn test_delete_single() {
    let cols = columns();
    let keys = record(&[("Id", Value::from("42"))]);
    let delete = MutationClauseBuilder::new(&cols)
        .build_delete(&["Id"], &keys)
        .unwrap();
    assert_eq!(delete.where_sql, "WHERE [Id] = @where_Id");
    assert_eq!(delete.params.get("where_Id"), Some(&SqlValue::Int(42)));
    assert_eq!(
        delete.to_sql(&TableRef::new("Items")),
        "DELETE FROM [Items] WHERE [Id] = @where_Id"
    );
}

#[test]
fn test_delete_requires_key() {
    let cols = columns();
    let err = MutationClauseBuilder::new(&cols)
        .build_delete(&[], &Record::new())
        .unwrap_err();
    assert_eq!(err, GateError::NoPrimaryKey);
}

#[test]
fn test_delete_unknown_key_column() {
    let cols = columns();
    let keys = record(&[("Nope", Value::from(1))]);
    let err = MutationClauseBuilder::new(&cols)
        .build_delete(&["Nope"], &keys)
        .unwrap_err();
    assert_eq!(err, GateError::UnknownColumn("Nope".into()));
}

#[test]
fn test_bulk_delete_per_record() {
    let cols = columns();
    let records = vec![
        record(&[("Id", Value::from(1))]),
        record(&[("Id", Value::from(2))]),
    ];
    let deletes = MutationClauseBuilder::new(&cols)
        .build_bulk_delete(&["Id"], &records)
        .unwrap();
    assert_eq!(deletes.len(), 2);
    assert_eq!(deletes[1].params.get("where_Id"), Some(&SqlValue::Int(2)));
}

#[test]
fn test_bulk_delete_reports_failing_row() {
    let cols = columns();
    let records = vec![
        record(&[("Id", Value::from(1))]),
        record(&[("Name", Value::from("no key"))]),
    ];
    let err = MutationClauseBuilder::new(&cols)
        .build_bulk_delete(&["Id"], &records)
        .unwrap_err();
    assert!(matches!(err, GateError::Row { index: 1, .. }));
    assert_eq!(err.error_type(), "MissingKeyValue");
}

#[test]
fn test_record_get_case_insensitive() {
    let rec = record(&[("name", Value::from("x"))]);
    assert_eq!(record_get(&rec, "Name"), Some(&Value::from("x")));
    assert_eq!(record_get(&rec, "Other"), None);
}
