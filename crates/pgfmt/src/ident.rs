//! SQL identifier handling.
//!
//! - Names are always rendered double-quoted, with `"` escaped as `""`.
//! - Aliases stay bare when they match `[a-z_][a-z0-9_$]*`, and are quoted otherwise.
//! - Qualified names (`schema.table`) may mix bare and quoted parts:
//!   `public."UserTable"`.

use crate::error::{FormatError, FormatResult};

/// Quote a SQL name: `users` -> `"users"`, `a"b` -> `"a""b"`.
pub fn quote_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    write_quoted(name, &mut out);
    out
}

pub(crate) fn write_quoted(name: &str, out: &mut String) {
    out.push('"');
    for ch in name.chars() {
        if ch == '"' {
            out.push_str("\"\"");
        } else {
            out.push(ch);
        }
    }
    out.push('"');
}

/// `[a-z_][a-z0-9_$]*`: an alias that needs no quoting.
pub(crate) fn is_simple_alias(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first == '_' || first.is_ascii_lowercase())
        && chars.all(|c| c == '_' || c == '$' || c.is_ascii_lowercase() || c.is_ascii_digit())
}

/// `[A-Za-z0-9_$]+`: a property name usable inside a `${...}` placeholder.
pub(crate) fn is_variable_name(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_variable_char)
}

pub(crate) fn is_variable_char(c: char) -> bool {
    c == '_' || c == '$' || c.is_ascii_alphanumeric()
}

/// Split a possibly qualified identifier into its unescaped parts.
///
/// - Dotted: `schema.table`
/// - Quoted: `"CamelCase"."UserTable"`
/// - Mixed: `public."User.Table"`
///
/// Unquoted parts must match `[A-Za-z_][A-Za-z0-9_$]*`.
pub(crate) fn split_qualified(s: &str) -> FormatResult<Vec<String>> {
    if s.is_empty() {
        return Err(FormatError::definition("Identifier cannot be empty"));
    }
    if s.contains('\0') {
        return Err(FormatError::definition(
            "Identifier cannot contain NUL character",
        ));
    }

    let mut parts = Vec::new();
    let mut chars = s.chars().peekable();

    while chars.peek().is_some() {
        if !parts.is_empty() {
            match chars.next() {
                Some('.') => {
                    if chars.peek().is_none() {
                        return Err(FormatError::definition(format!(
                            "Trailing '.' in identifier '{s}'"
                        )));
                    }
                }
                Some(c) => {
                    return Err(FormatError::definition(format!(
                        "Expected '.' between identifier parts, got '{c}'"
                    )));
                }
                None => break,
            }
        }

        if chars.peek() == Some(&'"') {
            chars.next();
            let mut name = String::new();
            loop {
                match chars.next() {
                    Some('"') => {
                        if chars.peek() == Some(&'"') {
                            chars.next();
                            name.push('"');
                        } else {
                            break;
                        }
                    }
                    Some(c) => name.push(c),
                    None => {
                        return Err(FormatError::definition(format!(
                            "Unclosed quoted identifier in '{s}'"
                        )));
                    }
                }
            }
            if name.is_empty() {
                return Err(FormatError::definition("Empty quoted identifier"));
            }
            parts.push(name);
            continue;
        }

        let mut name = String::new();
        while let Some(&c) = chars.peek() {
            if c == '.' {
                break;
            }
            let ok = if name.is_empty() {
                c == '_' || c.is_ascii_alphabetic()
            } else {
                is_variable_char(c)
            };
            if !ok {
                return Err(FormatError::definition(format!(
                    "Invalid character '{c}' in identifier '{s}'"
                )));
            }
            name.push(c);
            chars.next();
        }
        if name.is_empty() {
            return Err(FormatError::definition(format!(
                "Empty identifier segment in '{s}'"
            )));
        }
        parts.push(name);
    }

    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_and_escapes() {
        assert_eq!(quote_name("users"), r#""users""#);
        assert_eq!(quote_name(r#"has"quote"#), r#""has""quote""#);
    }

    #[test]
    fn simple_alias_rules() {
        assert!(is_simple_alias("t"));
        assert!(is_simple_alias("_tmp$1"));
        assert!(!is_simple_alias("Tbl"));
        assert!(!is_simple_alias("1t"));
        assert!(!is_simple_alias(""));
    }

    #[test]
    fn split_simple_and_dotted() {
        assert_eq!(split_qualified("users").unwrap(), ["users"]);
        assert_eq!(split_qualified("public.users").unwrap(), ["public", "users"]);
    }

    #[test]
    fn split_quoted_parts() {
        assert_eq!(
            split_qualified(r#"public."User.Table""#).unwrap(),
            ["public", "User.Table"]
        );
        assert_eq!(split_qualified(r#""has""quote""#).unwrap(), [r#"has"quote"#]);
    }

    #[test]
    fn split_rejects_bad_input() {
        assert!(split_qualified("").is_err());
        assert!(split_qualified("1table").is_err());
        assert!(split_qualified("my table").is_err());
        assert!(split_qualified("schema..table").is_err());
        assert!(split_qualified("schema.").is_err());
        assert!(split_qualified(r#""unclosed"#).is_err());
    }
}
