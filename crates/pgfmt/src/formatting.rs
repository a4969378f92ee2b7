//! Value formatting.
//!
//! Stateless functions turning a single [`Value`] into an escaped SQL literal.
//! [`format`] is the entry point for whole query templates.
//!
//! | value                 | SQL                                   |
//! |-----------------------|---------------------------------------|
//! | `Null`                | `NULL`                                |
//! | `Bool`                | `TRUE` / `FALSE`                      |
//! | `Int` / `Float`       | `42`, `1.5`, `'NaN'`, `'+Infinity'`   |
//! | `Text`                | `'it''s'`                             |
//! | `Date`                | `'2024-01-02T03:04:05.000+00:00'`     |
//! | `Bytes`               | `'\x0a0b'`                            |
//! | `Array`               | `ARRAY[1,2]`, empty: `'{}'`           |
//! | `Object` / `Json`     | `'{"a":1}'`                           |
//! | `Custom`              | whatever [`ToPostgres`](crate::ToPostgres) produces |

use crate::ctf;
use crate::error::{FormatError, FormatResult};
use crate::ident::{is_simple_alias, quote_name, write_quoted};
use crate::template::{self, FormatOptions, Modifier};
use crate::value::Value;
use chrono::{DateTime, SecondsFormat, Utc};

/// Format a query template against a values source.
///
/// See [`template`](crate::template) for the placeholder syntax.
pub fn format(query: &str, values: &Value, options: &FormatOptions) -> FormatResult<String> {
    template::format(query, values, options)
}

/// Format a value as an escaped SQL literal.
pub fn value(value: &Value) -> FormatResult<String> {
    format_value(value, false)
}

/// Format a value; with `raw`, text-like values are inserted without quotes or escaping.
///
/// **Warning**: raw output bypasses escaping. Only use with trusted input.
pub fn format_value(value: &Value, raw: bool) -> FormatResult<String> {
    let (resolved, raw_type) = ctf::resolve(value)?;
    let raw = raw || raw_type;
    Ok(match &*resolved {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => bool(*b).to_string(),
        Value::Int(i) => number(*i),
        Value::Float(f) => float(*f),
        Value::Numeric(s) => numeric(s)?,
        Value::Text(s) => text(s, raw),
        Value::Date(d) => date(d, raw),
        Value::Bytes(b) => buffer(b, raw),
        Value::Array(items) => array(items)?,
        v @ (Value::Object(_) | Value::Json(_)) => json(v, raw)?,
        Value::Custom(_) => return Err(unresolved()),
    })
}

/// Format a value as required by a placeholder modifier.
///
/// Raw custom types ignore the modifier and are spliced verbatim.
pub fn format_modified(value: &Value, modifier: Option<Modifier>) -> FormatResult<String> {
    let (resolved, raw_type) = ctf::resolve(value)?;
    if raw_type {
        return format_value(&resolved, true);
    }
    match modifier {
        None => format_value(&resolved, false),
        Some(Modifier::Raw) => format_value(&resolved, true),
        Some(Modifier::Name) => name(&resolved),
        Some(Modifier::Alias) => match &*resolved {
            Value::Text(s) => alias(s),
            other => Err(FormatError::invalid_value(format!(
                "an alias must be a text string, got {other:?}"
            ))),
        },
        Some(Modifier::Json) => json(&resolved, false),
        Some(Modifier::Csv) => csv(&resolved),
        Some(Modifier::Value) => open_value(&resolved),
    }
}

/// Quote text, doubling embedded single quotes. With `raw`, returns the text unchanged.
pub fn text(s: &str, raw: bool) -> String {
    if raw {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    push_escaped(s, &mut out);
    out.push('\'');
    out
}

fn push_escaped(s: &str, out: &mut String) {
    for ch in s.chars() {
        if ch == '\'' {
            out.push_str("''");
        } else {
            out.push(ch);
        }
    }
}

pub fn bool(b: bool) -> &'static str {
    if b { "TRUE" } else { "FALSE" }
}

pub fn number(n: i64) -> String {
    n.to_string()
}

/// Finite floats render as decimal text; special values as quoted literals.
pub fn float(f: f64) -> String {
    if f.is_nan() {
        "'NaN'".to_string()
    } else if f == f64::INFINITY {
        "'+Infinity'".to_string()
    } else if f == f64::NEG_INFINITY {
        "'-Infinity'".to_string()
    } else {
        f.to_string()
    }
}

/// Validate and pass through exact numeric text such as `-12.50` or `1e10`.
fn numeric(s: &str) -> FormatResult<String> {
    let body = s.strip_prefix('-').unwrap_or(s);
    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(pos) => (&body[..pos], Some(&body[pos + 1..])),
        None => (body, None),
    };
    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (mantissa, None),
    };
    let digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
    let exponent_ok = exponent.is_none_or(|e| digits(e.strip_prefix(['-', '+']).unwrap_or(e)));
    if digits(int_part) && frac_part.is_none_or(digits) && exponent_ok {
        Ok(s.to_string())
    } else {
        Err(FormatError::invalid_value(format!(
            "'{s}' is not a valid number"
        )))
    }
}

/// UTC timestamp with millisecond precision and explicit offset.
pub fn date(d: &DateTime<Utc>, raw: bool) -> String {
    let s = d.to_rfc3339_opts(SecondsFormat::Millis, false);
    if raw { s } else { format!("'{s}'") }
}

/// `bytea` hex format: `'\x0a0b'`.
pub fn buffer(bytes: &[u8], raw: bool) -> String {
    let s = format!("\\x{}", hex::encode(bytes));
    if raw { s } else { format!("'{s}'") }
}

/// SQL array constructor: `ARRAY[1,2]`, nested `ARRAY[[1,2],[3,4]]`, empty `'{}'`.
pub fn array(items: &[Value]) -> FormatResult<String> {
    if items.is_empty() {
        return Ok("'{}'".to_string());
    }
    let mut out = String::from("ARRAY");
    write_array_body(items, &mut out)?;
    Ok(out)
}

fn write_array_body(items: &[Value], out: &mut String) -> FormatResult<()> {
    out.push('[');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let (resolved, raw_type) = ctf::resolve(item)?;
        match &*resolved {
            Value::Array(inner) if !raw_type && !inner.is_empty() => {
                write_array_body(inner, out)?;
            }
            v => out.push_str(&format_value(v, raw_type)?),
        }
    }
    out.push(']');
    Ok(())
}

/// Comma-separated values: array elements, object values, or a single value.
pub fn csv(value: &Value) -> FormatResult<String> {
    let (resolved, raw_type) = ctf::resolve(value)?;
    if raw_type {
        return format_value(&resolved, true);
    }
    match &*resolved {
        Value::Array(items) => join(items.iter(), self::value),
        Value::Object(map) => join(map.values(), self::value),
        other => format_value(other, false),
    }
}

fn join<'a>(
    items: impl Iterator<Item = &'a Value>,
    f: impl Fn(&Value) -> FormatResult<String>,
) -> FormatResult<String> {
    let parts = items.map(f).collect::<FormatResult<Vec<_>>>()?;
    Ok(parts.join(","))
}

/// JSON text, quoted as a literal unless `raw`.
pub fn json(value: &Value, raw: bool) -> FormatResult<String> {
    let s = serde_json::to_string(&value.to_json()?)?;
    Ok(text(&s, raw))
}

/// SQL name(s): a quoted identifier, `*`, or a comma-separated list from an
/// array of names or an object's keys.
pub fn name(value: &Value) -> FormatResult<String> {
    let (resolved, _) = ctf::resolve(value)?;
    match &*resolved {
        Value::Text(s) => single_name(s),
        Value::Array(items) => {
            if items.is_empty() {
                return Err(FormatError::invalid_value(
                    "cannot retrieve sql names from an empty array",
                ));
            }
            let parts = items
                .iter()
                .map(|item| match item {
                    Value::Text(s) => single_name(s),
                    other => Err(invalid_name(other)),
                })
                .collect::<FormatResult<Vec<_>>>()?;
            Ok(parts.join(","))
        }
        Value::Object(map) => {
            if map.is_empty() {
                return Err(FormatError::invalid_value(
                    "cannot retrieve sql names from an empty object",
                ));
            }
            let parts = map.keys().map(|k| single_name(k)).collect::<FormatResult<Vec<_>>>()?;
            Ok(parts.join(","))
        }
        other => Err(invalid_name(other)),
    }
}

fn single_name(s: &str) -> FormatResult<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(FormatError::invalid_value("invalid sql name: empty string"));
    }
    if trimmed == "*" {
        return Ok("*".to_string());
    }
    Ok(quote_name(s))
}

fn invalid_name(v: &Value) -> FormatError {
    FormatError::invalid_value(format!("invalid sql name: {v:?}"))
}

/// SQL alias: parts matching `[a-z_][a-z0-9_$]*` stay bare, others are quoted.
pub fn alias(name: &str) -> FormatResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(FormatError::invalid_value("invalid sql alias: empty string"));
    }
    let mut out = String::with_capacity(name.len() + 2);
    for (i, part) in name.split('.').enumerate() {
        if part.is_empty() {
            return Err(FormatError::invalid_value(format!(
                "invalid sql alias '{name}'"
            )));
        }
        if i > 0 {
            out.push('.');
        }
        if is_simple_alias(part) {
            out.push_str(part);
        } else {
            write_quoted(part, &mut out);
        }
    }
    Ok(out)
}

/// Escaped text without the surrounding quotes (`:value` / `#`).
fn open_value(value: &Value) -> FormatResult<String> {
    match value {
        Value::Null => Err(FormatError::invalid_value(
            "null cannot be used as open text",
        )),
        Value::Text(s) => {
            let mut out = String::with_capacity(s.len());
            push_escaped(s, &mut out);
            Ok(out)
        }
        Value::Float(f) if !f.is_finite() => Ok(float(*f).trim_matches('\'').to_string()),
        Value::Array(_) | Value::Object(_) | Value::Json(_) => Err(FormatError::invalid_value(
            format!("{value:?} cannot be used as open text"),
        )),
        other => format_value(other, true),
    }
}

fn unresolved() -> FormatError {
    FormatError::invalid_value("custom type did not resolve to a plain value")
}
