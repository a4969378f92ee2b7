use super::Modifier;
use crate::error::{FormatError, FormatResult};
use crate::ident::is_variable_char;

/// A piece of a query template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Literal SQL text.
    Text(&'a str),
    /// `$$`, rendered as a single `$`.
    Dollar,
    /// `$1`, `$2:json`, ...
    Positional {
        index: usize,
        modifier: Option<Modifier>,
        token: &'a str,
    },
    /// `${name}`, `$(name^)`, `$<a.b>`, `$[name:csv]`, `$/name/`
    Named {
        name: &'a str,
        modifier: Option<Modifier>,
        token: &'a str,
    },
    /// Bracketed text that is not a valid named placeholder, e.g. `${` or `$(\d+)`.
    ///
    /// Rendered verbatim unless it is resolved against an object.
    Malformed {
        offset: usize,
        message: String,
        token: &'a str,
    },
}

fn closing_bracket(open: u8) -> Option<u8> {
    match open {
        b'{' => Some(b'}'),
        b'(' => Some(b')'),
        b'<' => Some(b'>'),
        b'[' => Some(b']'),
        b'/' => Some(b'/'),
        _ => None,
    }
}

/// Split a query template into text and placeholder segments.
pub fn tokenize(query: &str) -> FormatResult<Vec<Segment<'_>>> {
    let bytes = query.as_bytes();
    let mut out = Vec::new();
    let mut text_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'$' {
            i += 1;
            continue;
        }

        let segment = match bytes.get(i + 1) {
            Some(b'$') => Some((Segment::Dollar, i + 2)),
            Some(b'1'..=b'9') => Some(positional(query, i)?),
            Some(&open) => match closing_bracket(open) {
                Some(close) => Some(named(query, i, close)),
                None => None,
            },
            None => None,
        };

        match segment {
            Some((segment, end)) => {
                if text_start < i {
                    out.push(Segment::Text(&query[text_start..i]));
                }
                out.push(segment);
                i = end;
                text_start = end;
            }
            None => i += 1,
        }
    }

    if text_start < bytes.len() {
        out.push(Segment::Text(&query[text_start..]));
    }
    Ok(out)
}

fn positional(query: &str, start: usize) -> FormatResult<(Segment<'_>, usize)> {
    let bytes = query.as_bytes();
    let mut end = start + 1;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let index: usize = query[start + 1..end]
        .parse()
        .map_err(|_| FormatError::malformed(start, "placeholder index is too large"))?;

    let (modifier, end) = match Modifier::parse_prefix(&query[end..]) {
        Some((m, len)) => (Some(m), end + len),
        None => (None, end),
    };

    Ok((
        Segment::Positional {
            index,
            modifier,
            token: &query[start..end],
        },
        end,
    ))
}

fn named(query: &str, start: usize, close: u8) -> (Segment<'_>, usize) {
    let body_start = start + 2;
    let Some(len) = query.as_bytes()[body_start..].iter().position(|&b| b == close) else {
        return malformed(
            query,
            start,
            body_start,
            format!("missing closing '{}'", close as char),
        );
    };
    let body_end = body_start + len;
    let end = body_end + 1;
    let body = query[body_start..body_end].trim();

    let name_len = body
        .find(|c: char| !(is_variable_char(c) || c == '.'))
        .unwrap_or(body.len());
    let (name, rest) = body.split_at(name_len);
    if name.is_empty() {
        return malformed(query, start, end, "empty property name".to_string());
    }
    if name.split('.').any(str::is_empty) {
        return malformed(query, start, end, format!("invalid property path '{name}'"));
    }

    let rest = rest.trim();
    let modifier = if rest.is_empty() {
        None
    } else {
        match Modifier::parse_prefix(rest) {
            Some((m, len)) if len == rest.len() => Some(m),
            _ => {
                return malformed(
                    query,
                    start,
                    end,
                    format!("invalid modifier '{rest}' for property '{name}'"),
                );
            }
        }
    };

    (
        Segment::Named {
            name,
            modifier,
            token: &query[start..end],
        },
        end,
    )
}

fn malformed(query: &str, start: usize, end: usize, message: String) -> (Segment<'_>, usize) {
    (
        Segment::Malformed {
            offset: start,
            message,
            token: &query[start..end],
        },
        end,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_one_segment() {
        assert_eq!(
            tokenize("SELECT 1").unwrap(),
            vec![Segment::Text("SELECT 1")]
        );
        assert!(tokenize("").unwrap().is_empty());
    }

    #[test]
    fn positional_with_modifiers() {
        let segs = tokenize("a = $1 AND b = $12:json AND c = $3^").unwrap();
        assert_eq!(
            segs,
            vec![
                Segment::Text("a = "),
                Segment::Positional { index: 1, modifier: None, token: "$1" },
                Segment::Text(" AND b = "),
                Segment::Positional { index: 12, modifier: Some(Modifier::Json), token: "$12:json" },
                Segment::Text(" AND c = "),
                Segment::Positional { index: 3, modifier: Some(Modifier::Raw), token: "$3^" },
            ]
        );
    }

    #[test]
    fn casts_are_not_modifiers() {
        let segs = tokenize("$1::int, $2:jsonb").unwrap();
        assert_eq!(
            segs,
            vec![
                Segment::Positional { index: 1, modifier: None, token: "$1" },
                Segment::Text("::int, "),
                Segment::Positional { index: 2, modifier: None, token: "$2" },
                Segment::Text(":jsonb"),
            ]
        );
    }

    #[test]
    fn all_named_bracket_styles() {
        for (q, token) in [
            ("${id}", "${id}"),
            ("$(id)", "$(id)"),
            ("$<id>", "$<id>"),
            ("$[id]", "$[id]"),
            ("$/id/", "$/id/"),
        ] {
            assert_eq!(
                tokenize(q).unwrap(),
                vec![Segment::Named { name: "id", modifier: None, token }]
            );
        }
    }

    #[test]
    fn named_with_spaces_path_and_modifier() {
        assert_eq!(
            tokenize("${ user.name :csv }").unwrap(),
            vec![Segment::Named {
                name: "user.name",
                modifier: Some(Modifier::Csv),
                token: "${ user.name :csv }",
            }]
        );
    }

    #[test]
    fn double_dollar_and_stray_dollar() {
        assert_eq!(
            tokenize("a$$b $x $0").unwrap(),
            vec![Segment::Text("a"), Segment::Dollar, Segment::Text("b $x $0")]
        );
    }

    #[test]
    fn malformed_named_tokens() {
        let segs = tokenize("SELECT ${id").unwrap();
        assert_eq!(segs[0], Segment::Text("SELECT "));
        assert!(matches!(
            segs[1],
            Segment::Malformed { offset: 7, token: "${", .. }
        ));
        assert_eq!(segs[2], Segment::Text("id"));

        for q in ["${}", "${a b}", "${a..b}", "${a:bogus}"] {
            assert!(matches!(
                tokenize(q).unwrap().as_slice(),
                [Segment::Malformed { token, .. }] if *token == q
            ));
        }
    }

    #[test]
    fn regex_text_is_not_a_placeholder() {
        let segs = tokenize(r"code ~ '^\$(\d+)' AND id = $1").unwrap();
        assert!(matches!(segs[1], Segment::Malformed { token: r"$(\d+)", .. }));
        assert!(matches!(segs[3], Segment::Positional { index: 1, .. }));
    }
}
