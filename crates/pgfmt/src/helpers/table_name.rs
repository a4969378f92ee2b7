use crate::ctf::ToPostgres;
use crate::error::{FormatError, FormatResult};
use crate::ident::{quote_name, split_qualified};
use crate::value::Value;
use std::fmt;

/// A table name with an optional schema.
///
/// The table and schema are kept unescaped; [`name`](TableName::name) is the
/// quoted, fully qualified form. Equality compares `(schema, table)`.
///
/// ```ignore
/// let t = TableName::with_schema("public", "Users")?;
/// assert_eq!(t.name(), r#""public"."Users""#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName {
    schema: Option<String>,
    table: String,
    name: String,
}

impl TableName {
    /// A table without schema. The text is used as-is; dots are not split.
    pub fn new(table: impl Into<String>) -> FormatResult<Self> {
        Self::build(None, table.into())
    }

    /// A schema-qualified table.
    pub fn with_schema(schema: impl Into<String>, table: impl Into<String>) -> FormatResult<Self> {
        let schema = schema.into();
        if schema.trim().is_empty() {
            return Err(FormatError::definition("Schema name cannot be empty"));
        }
        Self::build(Some(schema), table.into())
    }

    /// Parse `table`, `schema.table` or quoted forms such as `public."User.Table"`.
    pub fn parse(s: &str) -> FormatResult<Self> {
        let mut parts = split_qualified(s.trim())?;
        match parts.len() {
            1 => Self::build(None, parts.remove(0)),
            2 => {
                let table = parts.remove(1);
                Self::build(Some(parts.remove(0)), table)
            }
            n => Err(FormatError::definition(format!(
                "Table name '{s}' has {n} parts, expected 'table' or 'schema.table'"
            ))),
        }
    }

    fn build(schema: Option<String>, table: String) -> FormatResult<Self> {
        if table.trim().is_empty() {
            return Err(FormatError::definition("Table name cannot be empty"));
        }
        let name = match &schema {
            Some(schema) => format!("{}.{}", quote_name(schema), quote_name(&table)),
            None => quote_name(&table),
        };
        Ok(Self {
            schema,
            table,
            name,
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// Quoted, fully qualified name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl std::str::FromStr for TableName {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl ToPostgres for TableName {
    fn to_postgres(&self) -> FormatResult<Value> {
        Ok(Value::Text(self.name.clone()))
    }

    fn raw_type(&self) -> bool {
        true
    }
}

impl From<TableName> for Value {
    fn from(t: TableName) -> Self {
        Value::custom(t)
    }
}
