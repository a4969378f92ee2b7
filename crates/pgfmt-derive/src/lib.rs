//! Derive macros for pgfmt
//!
//! Provides `#[derive(ToRow)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod to_row;

/// Derive `ToRow` for a struct with named fields.
///
/// Every field becomes one property of the row, converted with
/// `pgfmt::Value::from`, in declaration order.
///
/// # Example
///
/// ```ignore
/// use pgfmt::ToRow;
///
/// #[derive(ToRow)]
/// #[pgfmt(rename_all = "camelCase")]
/// struct User {
///     user_id: i64,
///     #[pgfmt(rename = "mail")]
///     email: Option<String>,
///     #[pgfmt(skip)]
///     password_hash: String,
/// }
/// ```
///
/// # Attributes
///
/// - `#[pgfmt(rename_all = "...")]` on the struct: `snake_case`, `camelCase`,
///   `PascalCase`, `kebab-case`, `SCREAMING_SNAKE_CASE`, `lowercase`, `UPPERCASE`
/// - `#[pgfmt(rename = "name")]` on a field: property name for this field
/// - `#[pgfmt(skip)]` on a field: leave the field out of the row
#[proc_macro_derive(ToRow, attributes(pgfmt))]
pub fn derive_to_row(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    to_row::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
