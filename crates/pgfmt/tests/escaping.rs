use pgfmt::formatting;
use pgfmt::{FormatOptions, Value, format, quote_name};

const HOSTILE: &[&str] = &[
    "'; DROP TABLE users; --",
    "O'Reilly",
    "''",
    "\\' OR 1=1 --",
    "$1 ${x}",
    "\"quoted\"",
];

fn unquote_literal(sql: &str) -> String {
    let inner = sql
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .expect("literal is wrapped in single quotes");
    assert!(!inner.replace("''", "").contains('\''), "stray quote in {sql}");
    inner.replace("''", "'")
}

#[test]
fn text_literals_always_round_trip() {
    for input in HOSTILE {
        let sql = formatting::value(&Value::from(*input)).unwrap();
        assert_eq!(unquote_literal(&sql), *input);
    }
}

#[test]
fn names_always_round_trip() {
    for input in HOSTILE {
        let quoted = quote_name(input);
        let inner = quoted
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .unwrap();
        assert!(!inner.replace("\"\"", "").contains('"'));
        assert_eq!(inner.replace("\"\"", "\""), *input);
    }
}

#[test]
fn placeholder_text_in_values_is_not_reexpanded() {
    let values = Value::from(vec![Value::from("${secret}"), Value::from("$2")]);
    let sql = format("SELECT $1, $2", &values, &FormatOptions::new()).unwrap();
    assert_eq!(sql, "SELECT '${secret}', '$2'");
}

#[test]
fn json_values_are_quoted_as_one_literal() {
    let values = Value::object([("doc", Value::object([("q", "it's")]))]);
    let sql = format("SELECT ${doc:json}", &values, &FormatOptions::new()).unwrap();
    assert_eq!(sql, r#"SELECT '{"q":"it''s"}'"#);
}
