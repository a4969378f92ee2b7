//! Query templates.
//!
//! A template is SQL text with placeholders that are replaced by formatted values:
//!
//! - positional: `$1`, `$2`, ... resolved against an array (or a single value as `$1`)
//! - named: `${name}`, `$(name)`, `$<name>`, `$[name]`, `$/name/` resolved against an object;
//!   `this` is the object itself and `a.b` walks nested objects
//! - modifiers: `^`/`:raw`, `~`/`:name`, `#`/`:value`, `:alias`, `:json`, `:csv`/`:list`
//! - `$$` renders a single `$`
//!
//! Named placeholders are left untouched when the values are an array or a single
//! value, and positional ones when the values are an object. This allows staged
//! templating, e.g. filling in table names while keeping `$1` for the server.
//! A JSON object or array ([`Value::Json`]) as the source behaves like the
//! equivalent [`Value::Object`] or [`Value::Array`].
//!
//! Bracketed text that is not a valid named placeholder (`${`, `$(\d+)`) is
//! SQL text. It is an error only when the values are an object, where it is
//! most likely a mistyped placeholder.
//!
//! # Example
//! ```ignore
//! use pgfmt::{FormatOptions, Value, template};
//!
//! let values = Value::object([("table", Value::from("users")), ("id", 7.into())]);
//! let sql = template::format("SELECT * FROM ${table~} WHERE id = $<id>", &values, &FormatOptions::new())?;
//! assert_eq!(sql, r#"SELECT * FROM "users" WHERE id = 7"#);
//! # Ok::<(), pgfmt::FormatError>(())
//! ```

mod scan;

#[cfg(test)]
mod tests;

pub use scan::{Segment, tokenize};

use crate::error::{FormatError, FormatResult};
use crate::formatting::format_modified;
use crate::value::Value;
use std::borrow::Cow;
use std::fmt;

/// Formatting modifier of a placeholder or column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    /// `^` / `:raw`: insert without escaping.
    Raw,
    /// `~` / `:name`: SQL name(s).
    Name,
    /// `:alias`: SQL alias, quoted only when needed.
    Alias,
    /// `:json`: JSON literal.
    Json,
    /// `:csv` / `:list`: comma-separated values.
    Csv,
    /// `#` / `:value`: escaped text without quotes.
    Value,
}

impl Modifier {
    /// Parse a complete modifier, e.g. `"^"` or `":json"`.
    pub fn parse(s: &str) -> Option<Self> {
        match Self::parse_prefix(s) {
            Some((m, len)) if len == s.len() => Some(m),
            _ => None,
        }
    }

    /// Parse a modifier at the start of `s`, returning it with its length.
    ///
    /// `:` must be followed by a whole word, so `::int` and `:jsonb` are not modifiers.
    pub(crate) fn parse_prefix(s: &str) -> Option<(Self, usize)> {
        let bytes = s.as_bytes();
        match bytes.first()? {
            b'^' => Some((Modifier::Raw, 1)),
            b'~' => Some((Modifier::Name, 1)),
            b'#' => Some((Modifier::Value, 1)),
            b':' => {
                let word_len = bytes[1..]
                    .iter()
                    .position(|b| !(b.is_ascii_alphanumeric() || *b == b'_'))
                    .unwrap_or(bytes.len() - 1);
                let m = match &s[1..1 + word_len] {
                    "raw" => Modifier::Raw,
                    "name" => Modifier::Name,
                    "alias" => Modifier::Alias,
                    "json" => Modifier::Json,
                    "csv" | "list" => Modifier::Csv,
                    "value" => Modifier::Value,
                    _ => return None,
                };
                Some((m, 1 + word_len))
            }
            _ => None,
        }
    }

    /// Canonical placeholder suffix.
    pub fn suffix(self) -> &'static str {
        match self {
            Modifier::Raw => "^",
            Modifier::Name => "~",
            Modifier::Alias => ":alias",
            Modifier::Json => ":json",
            Modifier::Csv => ":csv",
            Modifier::Value => "#",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Options for [`format`].
#[derive(Debug, Clone, Default)]
pub struct FormatOptions {
    /// Leave unresolvable placeholders in place instead of failing.
    ///
    /// `$$` is also kept as `$$`, so the output can be formatted again.
    pub partial: bool,
    /// Value used for named placeholders whose property is missing.
    pub default: Option<Value>,
}

impl FormatOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable partial formatting.
    pub fn partial(mut self, partial: bool) -> Self {
        self.partial = partial;
        self
    }

    /// Set the value used for missing named properties.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

enum Positional<'v> {
    Found(&'v Value),
    OutOfRange(usize),
    /// Object sources do not resolve positional placeholders.
    Ignored,
}

fn positional(values: &Value, index: usize) -> Positional<'_> {
    match values {
        Value::Array(items) => items
            .get(index - 1)
            .map_or(Positional::OutOfRange(items.len()), Positional::Found),
        Value::Object(_) => Positional::Ignored,
        single if index == 1 => Positional::Found(single),
        _ => Positional::OutOfRange(1),
    }
}

/// Resolve a property path against an object; `this` is the object itself.
///
/// Paths continue into JSON documents; values found there are converted
/// with [`Value::from_json`].
fn lookup<'v>(root: &'v Value, path: &str) -> Option<Cow<'v, Value>> {
    let mut parts = path.split('.').peekable();
    if parts.peek() == Some(&"this") {
        parts.next();
    }

    let mut current = root;
    while let Some(part) = parts.next() {
        match current {
            Value::Object(map) => current = map.get(part)?,
            Value::Json(json) => {
                let mut node = json.as_object()?.get(part)?;
                for part in parts.by_ref() {
                    node = node.as_object()?.get(part)?;
                }
                return Some(Cow::Owned(Value::from_json(node.clone())));
            }
            _ => return None,
        }
    }
    Some(Cow::Borrowed(current))
}

/// A JSON object or array used as the values source acts as the plain
/// object or array it describes.
fn source(values: &Value) -> Cow<'_, Value> {
    match values {
        Value::Json(json @ (serde_json::Value::Object(_) | serde_json::Value::Array(_))) => {
            Cow::Owned(Value::from_json(json.clone()))
        }
        other => Cow::Borrowed(other),
    }
}

/// Format a query template against a values source.
pub fn format(query: &str, values: &Value, options: &FormatOptions) -> FormatResult<String> {
    let segments = tokenize(query)?;
    let values = source(values);
    let values = values.as_ref();
    let mut out = String::with_capacity(query.len());

    for segment in segments {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Dollar => out.push_str(if options.partial { "$$" } else { "$" }),
            Segment::Positional {
                index,
                modifier,
                token,
            } => match positional(values, index) {
                Positional::Found(v) => {
                    out.push_str(&format_modified(v, modifier).map_err(|e| e.at_token(token))?);
                }
                Positional::Ignored => out.push_str(token),
                Positional::OutOfRange(_) if options.partial => out.push_str(token),
                Positional::OutOfRange(len) => {
                    return Err(FormatError::IndexOutOfRange { index, len });
                }
            },
            Segment::Named {
                name,
                modifier,
                token,
            } => {
                if !matches!(values, Value::Object(_)) {
                    out.push_str(token);
                    continue;
                }
                let value = match (lookup(values, name), &options.default) {
                    (Some(v), _) => v,
                    (None, Some(default)) => Cow::Borrowed(default),
                    (None, None) if options.partial => {
                        out.push_str(token);
                        continue;
                    }
                    (None, None) => return Err(FormatError::MissingProperty(name.to_string())),
                };
                out.push_str(&format_modified(&value, modifier).map_err(|e| e.at_token(token))?);
            }
            Segment::Malformed {
                offset,
                message,
                token,
            } => {
                if matches!(values, Value::Object(_)) && !options.partial {
                    return Err(FormatError::MalformedToken { offset, message });
                }
                out.push_str(token);
            }
        }
    }

    Ok(out)
}

/// Highest positional placeholder index used in `query` (0 when there is none).
pub fn max_positional(query: &str) -> FormatResult<usize> {
    Ok(tokenize(query)?
        .iter()
        .filter_map(|s| match s {
            Segment::Positional { index, .. } => Some(*index),
            _ => None,
        })
        .max()
        .unwrap_or(0))
}
