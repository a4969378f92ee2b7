//! # pgfmt
//!
//! Injection-safe SQL formatting for PostgreSQL.
//!
//! ## Features
//!
//! - **Value formatting**: every [`Value`] maps to exactly one escaped SQL literal
//! - **Custom types**: implement [`ToPostgres`] to control how a type is rendered
//! - **Query templates**: `$1` / `${name}` placeholders with modifiers (`^`, `~`, `:json`, `:csv`, ...)
//! - **Bulk statements**: multi-row INSERT / UPDATE / VALUES / SET from a [`ColumnSet`]
//! - **Statement descriptors**: validated [`PreparedStatement`] / [`ParameterizedQuery`] with cached `parse()`
//! - **Transaction modes**: `BEGIN ISOLATION LEVEL ...` from a [`TransactionMode`]
//!
//! Nothing here talks to a database; the output is plain SQL text (or a
//! descriptor) for whatever driver executes it.
//!
//! ## Templates
//!
//! ```ignore
//! use pgfmt::{FormatOptions, Value, format};
//!
//! let values = Value::object([
//!     ("table", Value::from("users")),
//!     ("ids", Value::from(vec![1, 2, 3])),
//! ]);
//! let sql = format("SELECT * FROM ${table~} WHERE id IN ($<ids:csv>)", &values, &FormatOptions::new())?;
//! assert_eq!(sql, r#"SELECT * FROM "users" WHERE id IN (1,2,3)"#);
//! # Ok::<(), pgfmt::FormatError>(())
//! ```
//!
//! ## Bulk helpers
//!
//! ```ignore
//! use pgfmt::helpers::{self, ColumnSet, TableName};
//! use pgfmt::{Value, row};
//!
//! let cs = ColumnSet::new(["a", "b"])?;
//! let data = row([("a", Value::from(1)), ("b", "x".into())]);
//! let sql = helpers::insert(&data, Some(&cs), Some(&TableName::new("T")?))?;
//! assert_eq!(sql, r#"INSERT INTO "T" ("a","b") VALUES (1,'x')"#);
//! # Ok::<(), pgfmt::FormatError>(())
//! ```
//!
//! ## Derive
//!
//! With the default `derive` feature, `#[derive(ToRow)]` turns a struct into
//! a data row for the helpers:
//!
//! ```ignore
//! use pgfmt::ToRow;
//!
//! #[derive(ToRow)]
//! #[pgfmt(rename_all = "camelCase")]
//! struct User {
//!     user_id: i64,
//!     #[pgfmt(skip)]
//!     password: String,
//! }
//! ```

pub mod ctf;
pub mod error;
pub mod formatting;
pub mod helpers;
mod ident;
pub mod prelude;
pub mod statement;
pub mod template;
pub mod tx_mode;
pub mod value;

pub use ctf::{MAX_CUSTOM_DEPTH, Raw, ToPostgres};
pub use error::{ErrorKind, FormatError, FormatResult};
pub use formatting::format;
pub use helpers::{Column, ColumnConfig, ColumnSet, Helpers, HelpersConfig, TableName, UpdateOptions};
pub use ident::quote_name;
pub use statement::{
    ParameterizedBasic, ParameterizedQuery, PreparedBasic, PreparedStatement, QueryFile,
    QueryFileOptions, QuerySource, RowMode,
};
pub use template::{FormatOptions, Modifier};
pub use tx_mode::{IsolationLevel, TransactionMode};
pub use value::{Object, ToRow, Value, row, to_row};

#[cfg(feature = "derive")]
pub use pgfmt_derive::ToRow;
