//! `BEGIN` statements for transaction modes.
//!
//! # Example
//!
//! ```ignore
//! use pgfmt::{IsolationLevel, TransactionMode};
//!
//! let mode = TransactionMode::new()
//!     .isolation_level(IsolationLevel::Serializable)
//!     .read_only(true)
//!     .deferrable(true);
//! assert_eq!(mode.begin(true), "BEGIN ISOLATION LEVEL SERIALIZABLE READ ONLY DEFERRABLE");
//! ```

use std::fmt;

/// Transaction isolation level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IsolationLevel {
    /// Server default; no clause is generated.
    #[default]
    None,
    Serializable,
    RepeatableRead,
    ReadCommitted,
}

impl IsolationLevel {
    /// SQL keywords in lower case, `None` for the server default.
    pub fn as_sql(&self) -> Option<&'static str> {
        match self {
            IsolationLevel::None => None,
            IsolationLevel::Serializable => Some("serializable"),
            IsolationLevel::RepeatableRead => Some("repeatable read"),
            IsolationLevel::ReadCommitted => Some("read committed"),
        }
    }
}

/// Isolation level and access flags of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TransactionMode {
    pub isolation_level: IsolationLevel,
    /// `Some(true)`: READ ONLY, `Some(false)`: READ WRITE.
    pub read_only: Option<bool>,
    /// `Some(true)`: DEFERRABLE, `Some(false)`: NOT DEFERRABLE.
    pub deferrable: Option<bool>,
}

impl TransactionMode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn isolation_level(mut self, level: IsolationLevel) -> Self {
        self.isolation_level = level;
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = Some(read_only);
        self
    }

    pub fn deferrable(mut self, deferrable: bool) -> Self {
        self.deferrable = Some(deferrable);
        self
    }

    /// The `begin` statement for this mode; `cap` selects upper-case keywords.
    pub fn begin(&self, cap: bool) -> String {
        let mut sql = String::from("begin");
        if let Some(level) = self.isolation_level.as_sql() {
            sql.push_str(" isolation level ");
            sql.push_str(level);
        }
        match self.read_only {
            Some(true) => sql.push_str(" read only"),
            Some(false) => sql.push_str(" read write"),
            None => {}
        }
        match self.deferrable {
            Some(true) => sql.push_str(" deferrable"),
            Some(false) => sql.push_str(" not deferrable"),
            None => {}
        }
        if cap { sql.to_uppercase() } else { sql }
    }
}

impl fmt::Display for TransactionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.begin(false))
    }
}
