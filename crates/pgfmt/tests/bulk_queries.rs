use pgfmt::helpers::{self, ColumnConfig, ColumnInput, ColumnSet, ColumnSetOptions, QueryPart, TableName};
use pgfmt::{
    FormatOptions, IsolationLevel, Modifier, Object, TransactionMode, UpdateOptions, Value, format,
    row,
};

fn users() -> ColumnSet {
    ColumnSet::with_options(
        [
            ColumnInput::from("?id"),
            ColumnInput::from("name"),
            ColumnConfig::new("meta").modifier(Modifier::Json).into(),
            ColumnConfig::new("seen").cast("timestamptz").into(),
        ],
        ColumnSetOptions::new().table(TableName::with_schema("app", "users").unwrap()),
    )
    .unwrap()
}

fn data() -> Vec<Object> {
    vec![
        row([
            ("id", Value::from(1)),
            ("name", "Ann".into()),
            ("meta", Value::object([("x", 1)])),
            ("seen", Value::Null),
        ]),
        row([
            ("id", Value::from(2)),
            ("name", "O'Hara".into()),
            ("meta", Value::object([("x", 2)])),
            ("seen", Value::Null),
        ]),
    ]
}

#[test]
fn insert_with_returning() {
    let sql = helpers::insert(&data(), Some(&users()), None).unwrap() + " RETURNING id";
    assert_eq!(
        sql,
        r#"INSERT INTO "app"."users" ("name","meta","seen") VALUES ('Ann','{"x":1}',NULL::timestamptz),('O''Hara','{"x":2}',NULL::timestamptz) RETURNING id"#
    );
}

#[test]
fn insert_column_list_matches_names_without_conditional_columns() {
    let cs = users();
    let insertable = ColumnSet::new(cs.columns().iter().filter(|c| !c.is_cnd())).unwrap();
    let sql = helpers::insert(&data(), Some(&cs), None).unwrap();
    assert!(sql.contains(&format!("({})", insertable.names())));
}

#[test]
fn multi_row_update_with_where_clause() {
    let update = helpers::update(&data(), Some(&users()), None, &UpdateOptions::new()).unwrap();
    let sql = format("$1^ WHERE v.id = t.id", &Value::from(vec![update]), &FormatOptions::new()).unwrap();
    assert_eq!(
        sql,
        r#"UPDATE "app"."users" AS t SET "name"=v."name","meta"=v."meta","seen"=v."seen" FROM (VALUES (1,'Ann','{"x":1}',NULL::timestamptz),(2,'O''Hara','{"x":2}',NULL::timestamptz)) AS v ("id","name","meta","seen") WHERE v.id = t.id"#
    );
}

#[test]
fn single_row_update_from_template() {
    let cs = ColumnSet::new(["name", "?active"]).unwrap();
    let template = format!("UPDATE users SET {} WHERE id = ${{id}}", cs.assign(Default::default()).unwrap());
    assert_eq!(template, "UPDATE users SET \"name\"=${name} WHERE id = ${id}");

    let values = Value::object([("id", Value::from(5)), ("name", "Eve".into())]);
    let sql = format(&template, &values, &FormatOptions::new()).unwrap();
    assert_eq!(sql, r#"UPDATE users SET "name"='Eve' WHERE id = 5"#);
}

#[test]
fn values_as_derived_table() {
    let cs = ColumnSet::new(["a", "b"]).unwrap();
    let rows = vec![row([("a", Value::from(1)), ("b", "x".into())]), row([("a", Value::from(2)), ("b", "y".into())])];
    let values = helpers::values(&rows, Some(&cs)).unwrap();
    let sql = format(
        "SELECT * FROM (VALUES $1^) AS t ($2~)",
        &Value::from(vec![Value::from(values), Value::from(vec!["a", "b"])]),
        &FormatOptions::new(),
    )
    .unwrap();
    assert_eq!(sql, r#"SELECT * FROM (VALUES (1,'x'),(2,'y')) AS t ("a","b")"#);
}

#[test]
fn transaction_script() {
    let mode = TransactionMode::new()
        .isolation_level(IsolationLevel::Serializable)
        .read_only(false);
    let begin = mode.begin(true);
    let values = Value::object([("id", 3)]);
    let sql = helpers::concat([
        QueryPart::from(&begin),
        QueryPart::formatted("DELETE FROM app.users WHERE id = ${id}", &values),
        QueryPart::from("COMMIT;"),
    ])
    .unwrap();
    assert_eq!(
        sql,
        "BEGIN ISOLATION LEVEL SERIALIZABLE READ WRITE;DELETE FROM app.users WHERE id = 3;COMMIT"
    );
}
