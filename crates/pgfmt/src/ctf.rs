//! Custom type formatting.
//!
//! Any type can control how it is rendered into SQL by implementing
//! [`ToPostgres`] and being wrapped into [`Value::Custom`](crate::Value::Custom).
//!
//! # Example
//! ```ignore
//! use pgfmt::{FormatResult, ToPostgres, Value};
//!
//! #[derive(Debug)]
//! struct Point { x: f64, y: f64 }
//!
//! impl ToPostgres for Point {
//!     fn to_postgres(&self) -> FormatResult<Value> {
//!         Ok(Value::Text(format!("ST_MakePoint({}, {})", self.x, self.y)))
//!     }
//!     fn raw_type(&self) -> bool {
//!         true
//!     }
//! }
//!
//! let sql = pgfmt::formatting::value(&Value::custom(Point { x: 1.0, y: 2.0 }))?;
//! assert_eq!(sql, "ST_MakePoint(1, 2)");
//! # Ok::<(), pgfmt::FormatError>(())
//! ```

use crate::error::{FormatError, FormatResult};
use crate::value::Value;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Maximum number of chained [`ToPostgres`] conversions for a single value.
pub const MAX_CUSTOM_DEPTH: usize = 32;

/// Capability of a type to produce its own SQL representation.
pub trait ToPostgres: fmt::Debug + Send + Sync {
    /// Produce the value to format in place of `self`.
    fn to_postgres(&self) -> FormatResult<Value>;

    /// When `true`, the produced value is spliced into SQL without escaping.
    fn raw_type(&self) -> bool {
        false
    }

    /// Type name used in error messages.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Pre-rendered SQL text, inserted verbatim.
///
/// **Warning**: This bypasses escaping. Only use with trusted SQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raw(pub String);

impl Raw {
    pub fn new(sql: impl Into<String>) -> Self {
        Self(sql.into())
    }
}

impl ToPostgres for Raw {
    fn to_postgres(&self) -> FormatResult<Value> {
        Ok(Value::Text(self.0.clone()))
    }

    fn raw_type(&self) -> bool {
        true
    }
}

/// Resolve custom types until a plain value remains.
///
/// Returns the plain value and whether any step in the chain asked for raw output.
pub(crate) fn resolve(value: &Value) -> FormatResult<(Cow<'_, Value>, bool)> {
    let Value::Custom(first) = value else {
        return Ok((Cow::Borrowed(value), false));
    };

    let mut current: Arc<dyn ToPostgres> = Arc::clone(first);
    let mut raw = false;
    for _ in 0..MAX_CUSTOM_DEPTH {
        raw |= current.raw_type();
        let next = current
            .to_postgres()
            .map_err(|e| FormatError::CustomType {
                type_name: current.type_name(),
                value: format!("{current:?}"),
                source: Box::new(e),
            })?;
        match next {
            Value::Custom(inner) => current = inner,
            plain => return Ok((Cow::Owned(plain), raw)),
        }
    }

    Err(FormatError::CustomTypeLoop {
        type_name: first.type_name(),
        depth: MAX_CUSTOM_DEPTH,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Money(i64);

    impl ToPostgres for Money {
        fn to_postgres(&self) -> FormatResult<Value> {
            Ok(Value::Text(format!("{}.{:02}", self.0 / 100, self.0 % 100)))
        }
    }

    #[derive(Debug, Clone)]
    struct Forever;

    impl ToPostgres for Forever {
        fn to_postgres(&self) -> FormatResult<Value> {
            Ok(Value::custom(self.clone()))
        }
    }

    #[derive(Debug)]
    struct Broken;

    impl ToPostgres for Broken {
        fn to_postgres(&self) -> FormatResult<Value> {
            Err(FormatError::invalid_value("not today"))
        }
    }

    #[test]
    fn plain_values_pass_through() {
        let v = Value::Int(7);
        let (resolved, raw) = resolve(&v).unwrap();
        assert!(matches!(resolved, Cow::Borrowed(Value::Int(7))));
        assert!(!raw);
    }

    #[test]
    fn resolves_custom_value() {
        let v = Value::custom(Money(1234));
        let (resolved, raw) = resolve(&v).unwrap();
        assert_eq!(resolved.into_owned(), Value::Text("12.34".into()));
        assert!(!raw);
    }

    #[test]
    fn raw_flag_is_reported() {
        let v = Value::custom(Raw::new("now()"));
        let (resolved, raw) = resolve(&v).unwrap();
        assert_eq!(resolved.into_owned(), Value::Text("now()".into()));
        assert!(raw);
    }

    #[test]
    fn self_returning_type_is_an_error() {
        let err = resolve(&Value::custom(Forever)).unwrap_err();
        assert!(matches!(err, FormatError::CustomTypeLoop { depth: MAX_CUSTOM_DEPTH, .. }));
    }

    #[test]
    fn failure_carries_type_context() {
        let err = resolve(&Value::custom(Broken)).unwrap_err();
        match err {
            FormatError::CustomType { type_name, value, .. } => {
                assert!(type_name.ends_with("Broken"));
                assert_eq!(value, "Broken");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
