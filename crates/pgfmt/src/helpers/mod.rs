//! Column metadata and bulk statement generation.
//!
//! A [`ColumnSet`] describes the columns of a table once; the helpers then
//! turn rows into SQL:
//!
//! ```ignore
//! use pgfmt::helpers::{self, ColumnSet, TableName, UpdateOptions};
//! use pgfmt::{Value, row};
//!
//! let cs = ColumnSet::new(["?id", "name", "score"])?;
//! let users = TableName::new("users")?;
//! let rows = vec![
//!     row([("id", Value::from(1)), ("name", "ann".into()), ("score", 3.into())]),
//!     row([("id", Value::from(2)), ("name", "bob".into()), ("score", 5.into())]),
//! ];
//!
//! let sql = helpers::insert(&rows, Some(&cs), Some(&users))?;
//! // INSERT INTO "users" ("name","score") VALUES ('ann',3),('bob',5)
//!
//! let sql = helpers::update(&rows, Some(&cs), Some(&users), &UpdateOptions::new())?
//!     + " WHERE v.id = t.id";
//! // UPDATE "users" AS t SET "name"=v."name","score"=v."score"
//! //   FROM (VALUES (1,'ann',3),(2,'bob',5)) AS v ("id","name","score") WHERE v.id = t.id
//! # Ok::<(), pgfmt::FormatError>(())
//! ```
//!
//! Per row, a column value is resolved as follows:
//!
//! 1. the skip hook may drop the column (SET generation only);
//! 2. the init hook, when present, computes the value;
//! 3. otherwise the row property is used, or the column default;
//! 4. with none of these the row is rejected with
//!    [`FormatError::MissingColumnProperty`](crate::FormatError::MissingColumnProperty).

mod bulk;
mod column;
mod column_set;
mod config;
mod table_name;


pub use bulk::{Helpers, QueryPart, Rows, concat, insert, sets, update, values};
pub use column::{Column, ColumnConfig, ColumnDescriptor, ColumnInput, InitHook, SkipHook};
pub use column_set::{AssignColumnsOptions, AssignOptions, ColumnSet, ColumnSetOptions, ColumnSkip};
pub use config::{HelpersConfig, UpdateOptions};
pub use table_name::TableName;
