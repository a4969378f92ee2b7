use super::*;
use crate::ctf::Raw;
use crate::value::Object;
use serde_json::json;

fn obj(pairs: Vec<(&str, Value)>) -> Value {
    Value::object(pairs)
}

fn fmt(query: &str, values: &Value) -> FormatResult<String> {
    format(query, values, &FormatOptions::new())
}

#[test]
fn modifier_parsing() {
    assert_eq!(Modifier::parse("^"), Some(Modifier::Raw));
    assert_eq!(Modifier::parse(":list"), Some(Modifier::Csv));
    assert_eq!(Modifier::parse(":alias"), Some(Modifier::Alias));
    assert_eq!(Modifier::parse(":jsonb"), None);
    assert_eq!(Modifier::parse("^x"), None);
    assert_eq!(Modifier::parse(""), None);
    assert_eq!(Modifier::Json.to_string(), ":json");
    assert_eq!(Modifier::Name.to_string(), "~");
}

#[test]
fn positional_from_array() {
    let values = Value::from(vec![Value::Int(1), Value::from("x")]);
    assert_eq!(fmt("SELECT $1, $2", &values).unwrap(), "SELECT 1, 'x'");
}

#[test]
fn scalar_acts_as_single_element_array() {
    assert_eq!(fmt("id = $1", &Value::Int(5)).unwrap(), "id = 5");
    let err = fmt("$2", &Value::Int(5)).unwrap_err();
    assert!(matches!(err, FormatError::IndexOutOfRange { index: 2, len: 1 }));
}

#[test]
fn positional_out_of_range() {
    let values = Value::from(vec![1]);
    let err = fmt("$1, $3", &values).unwrap_err();
    assert!(err.is_template_error());
    assert_eq!(
        err.to_string(),
        "Variable $3 out of range. Parameters array length: 1"
    );
}

#[test]
fn positional_with_cast_keeps_cast() {
    let values = Value::from(vec!["2024-01-01"]);
    assert_eq!(fmt("$1::date", &values).unwrap(), "'2024-01-01'::date");
}

#[test]
fn named_from_object() {
    let values = obj(vec![("id", 7.into()), ("name", "it's".into())]);
    assert_eq!(
        fmt("WHERE id = ${id} AND name = $/name/", &values).unwrap(),
        "WHERE id = 7 AND name = 'it''s'"
    );
}

#[test]
fn missing_named_property_names_the_key() {
    let err = fmt("$/missing/", &Value::Object(Object::new())).unwrap_err();
    assert!(err.is_template_error());
    assert_eq!(err.missing_property(), Some("missing"));
}

#[test]
fn modifiers_apply() {
    let values = obj(vec![
        ("table", "Users".into()),
        ("cols", Value::from(vec!["a", "b"])),
        ("ids", Value::from(vec![1, 2, 3])),
        ("doc", obj(vec![("k", "v".into())])),
        ("expr", "now()".into()),
        ("pattern", "it's".into()),
    ]);
    assert_eq!(
        fmt(
            "SELECT ${cols~} FROM ${table:name} WHERE id IN ($<ids:csv>) AND d = ${doc:json} AND t = $(expr^) AND n LIKE '%${pattern#}%'",
            &values
        )
        .unwrap(),
        r#"SELECT "a","b" FROM "Users" WHERE id IN (1,2,3) AND d = '{"k":"v"}' AND t = now() AND n LIKE '%it''s%'"#
    );
}

#[test]
fn alias_modifier() {
    let values = obj(vec![("a", "Total".into())]);
    assert_eq!(fmt("count(*) AS ${a:alias}", &values).unwrap(), r#"count(*) AS "Total""#);
}

#[test]
fn this_and_nested_paths() {
    let values = obj(vec![
        ("id", 1.into()),
        ("user", obj(vec![("name", "bob".into())])),
    ]);
    assert_eq!(fmt("${user.name}", &values).unwrap(), "'bob'");
    assert_eq!(fmt("${this:json}", &values).unwrap(), r#"'{"id":1,"user":{"name":"bob"}}'"#);
    assert_eq!(fmt("${this.id}", &values).unwrap(), "1");
    assert!(fmt("${user.age}", &values).is_err());
}

#[test]
fn styles_are_resolved_independently() {
    let values = obj(vec![("t", "logs".into())]);
    assert_eq!(
        fmt("SELECT * FROM ${t~} WHERE id = $1", &values).unwrap(),
        r#"SELECT * FROM "logs" WHERE id = $1"#
    );
    let values = Value::from(vec![9]);
    assert_eq!(fmt("${t~} $1", &values).unwrap(), "${t~} 9");
}

#[test]
fn double_dollar_escapes() {
    assert_eq!(fmt("SELECT '$$1'", &Value::Null).unwrap(), "SELECT '$1'");
}

#[test]
fn partial_keeps_unresolved_tokens() {
    let opts = FormatOptions::new().partial(true);
    let values = obj(vec![("a", 1.into())]);
    assert_eq!(
        format("${a} ${b:json} $$", &values, &opts).unwrap(),
        "1 ${b:json} $$"
    );
    let values = Value::from(vec![1]);
    assert_eq!(format("$1 $2", &values, &opts).unwrap(), "1 $2");
}

#[test]
fn default_value_for_missing_properties() {
    let opts = FormatOptions::new().default_value(Value::Null);
    let values = obj(vec![("a", 1.into())]);
    assert_eq!(format("${a}, ${b}", &values, &opts).unwrap(), "1, NULL");
}

#[test]
fn value_errors_carry_the_token() {
    let values = obj(vec![("n", Value::Null)]);
    let err = fmt("x = ${n#}", &values).unwrap_err();
    assert!(matches!(err, FormatError::Placeholder { ref token, .. } if token == "${n#}"));
    assert_eq!(err.kind(), crate::ErrorKind::Formatting);
}

#[test]
fn raw_custom_type_in_template() {
    let values = obj(vec![("ts", Value::custom(Raw::new("DEFAULT")))]);
    assert_eq!(fmt("VALUES(${ts:json})", &values).unwrap(), "VALUES(DEFAULT)");
}

#[test]
fn malformed_template_is_an_error() {
    let err = fmt("SELECT ${a", &obj(vec![])).unwrap_err();
    assert!(matches!(err, FormatError::MalformedToken { .. }));
    let err = fmt("SELECT ${}", &obj(vec![("a", 1.into())])).unwrap_err();
    assert!(err.is_template_error());
}

#[test]
fn bracket_text_without_object_is_sql() {
    let sql = fmt(r"SELECT $1 WHERE code ~ '^\$(\d+)'", &Value::from(vec![1])).unwrap();
    assert_eq!(sql, r"SELECT 1 WHERE code ~ '^\$(\d+)'");
    assert_eq!(fmt("SELECT '${' || $1", &Value::from("x")).unwrap(), "SELECT '${' || 'x'");

    let options = FormatOptions::new().partial(true);
    let sql = format("SELECT ${a} || '$(' ", &obj(vec![("a", 1.into())]), &options).unwrap();
    assert_eq!(sql, "SELECT 1 || '$(' ");
}

#[test]
fn json_object_source() {
    let values = Value::from(json!({"id": 7, "user": {"name": "ann"}}));
    assert_eq!(
        fmt("SELECT * FROM t WHERE id = ${id} AND name = ${user.name}", &values).unwrap(),
        "SELECT * FROM t WHERE id = 7 AND name = 'ann'"
    );
    let err = fmt("SELECT ${id}, ${missing}", &values).unwrap_err();
    assert_eq!(err.missing_property(), Some("missing"));
}

#[test]
fn json_array_source() {
    let values = Value::from(json!([1, "b"]));
    assert_eq!(fmt("SELECT $1, $2", &values).unwrap(), "SELECT 1, 'b'");
    assert!(fmt("SELECT $3", &values).unwrap_err().is_template_error());
}

#[test]
fn nested_json_property() {
    let values = obj(vec![("doc", Value::from(json!({"a": {"b": "x"}, "n": [1, 2]})))]);
    assert_eq!(fmt("${doc.a.b}", &values).unwrap(), "'x'");
    assert_eq!(fmt("${doc:json}", &values).unwrap(), r#"'{"a":{"b":"x"},"n":[1,2]}'"#);
    assert_eq!(fmt("${doc.n:csv}", &values).unwrap(), "1,2");
    assert!(fmt("${doc.a.c}", &values).is_err());
}

#[test]
fn highest_positional_index() {
    assert_eq!(max_positional("SELECT 1").unwrap(), 0);
    assert_eq!(max_positional("$2, $10, ${a}, $1").unwrap(), 10);
    assert_eq!(max_positional("label = '${' AND id = $1").unwrap(), 1);
}
