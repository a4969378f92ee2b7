//! Convenient imports for typical `pgfmt` usage.
//!
//! ```ignore
//! use pgfmt::prelude::*;
//! ```

pub use crate::helpers::{self, ColumnConfig, ColumnSet, TableName, UpdateOptions};
pub use crate::{
    FormatError, FormatOptions, FormatResult, Modifier, Object, ParameterizedQuery,
    PreparedStatement, ToPostgres, ToRow, TransactionMode, Value, format, row,
};
