use super::column::Column;
use super::column_set::{AssignColumnsOptions, ColumnSet, ColumnSetOptions};
use super::config::{HelpersConfig, UpdateOptions};
use super::table_name::TableName;
use crate::error::{FormatError, FormatResult};
use crate::formatting::alias;
use crate::statement::QueryFile;
use crate::template::{self, FormatOptions};
use crate::value::{Object, Value};
use std::borrow::Cow;

// ==================== Input ====================

/// Data for a bulk helper: one row or many.
#[derive(Debug, Clone, Copy)]
pub enum Rows<'a> {
    One(&'a Object),
    Many(&'a [Object]),
}

impl<'a> Rows<'a> {
    pub fn len(&self) -> usize {
        match self {
            Rows::One(_) => 1,
            Rows::Many(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> std::slice::Iter<'a, Object> {
        match *self {
            Rows::One(row) => std::slice::from_ref(row).iter(),
            Rows::Many(rows) => rows.iter(),
        }
    }
}

impl<'a> From<&'a Object> for Rows<'a> {
    fn from(row: &'a Object) -> Self {
        Rows::One(row)
    }
}

impl<'a> From<&'a [Object]> for Rows<'a> {
    fn from(rows: &'a [Object]) -> Self {
        Rows::Many(rows)
    }
}

impl<'a> From<&'a Vec<Object>> for Rows<'a> {
    fn from(rows: &'a Vec<Object>) -> Self {
        Rows::Many(rows)
    }
}

impl<'a, const N: usize> From<&'a [Object; N]> for Rows<'a> {
    fn from(rows: &'a [Object; N]) -> Self {
        Rows::Many(rows)
    }
}

/// One query for [`concat`].
#[derive(Debug, Clone)]
pub enum QueryPart<'a> {
    Text(&'a str),
    /// A template formatted before joining.
    Formatted {
        query: &'a str,
        values: &'a Value,
        options: FormatOptions,
    },
    File(&'a QueryFile),
}

impl<'a> QueryPart<'a> {
    pub fn formatted(query: &'a str, values: &'a Value) -> Self {
        QueryPart::Formatted {
            query,
            values,
            options: FormatOptions::default(),
        }
    }
}

impl<'a> From<&'a str> for QueryPart<'a> {
    fn from(s: &'a str) -> Self {
        QueryPart::Text(s)
    }
}

impl<'a> From<&'a String> for QueryPart<'a> {
    fn from(s: &'a String) -> Self {
        QueryPart::Text(s)
    }
}

impl<'a> From<&'a QueryFile> for QueryPart<'a> {
    fn from(f: &'a QueryFile) -> Self {
        QueryPart::File(f)
    }
}

// ==================== Helpers ====================

/// Statement generators sharing one [`HelpersConfig`].
///
/// The free functions [`insert`], [`update`], [`values`] and [`sets`] use the
/// default config.
#[derive(Debug, Clone, Default)]
pub struct Helpers {
    config: HelpersConfig,
}

impl Helpers {
    pub fn new(config: HelpersConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HelpersConfig {
        &self.config
    }

    /// `INSERT INTO <table> ("a","b") VALUES (..),(..)`.
    ///
    /// Conditional columns are left out. Without a table (neither passed nor
    /// bound to the column set) only the column list and VALUES are generated.
    pub fn insert<'a>(
        &self,
        data: impl Into<Rows<'a>>,
        columns: Option<&ColumnSet>,
        table: Option<&TableName>,
    ) -> FormatResult<String> {
        let rows = data.into();
        if rows.is_empty() {
            return Err(FormatError::EmptyData(
                "Cannot generate an INSERT from an empty array".to_string(),
            ));
        }
        let columns = resolve_columns(rows, columns, "INSERT")?;
        let insertable: Vec<&Column> = columns.columns().iter().filter(|c| !c.is_cnd()).collect();
        if insertable.is_empty() {
            return Err(FormatError::definition(
                "Cannot generate an INSERT without any columns",
            ));
        }

        let mut sql = String::new();
        if let Some(table) = table.or(columns.table()) {
            sql.push_str(self.config.keyword("INSERT INTO ", "insert into "));
            sql.push_str(table.name());
            sql.push(' ');
        }
        sql.push('(');
        sql.push_str(&join(insertable.iter().map(|c| c.escaped_name())));
        sql.push_str(") ");
        sql.push_str(self.config.keyword("VALUES ", "values "));
        write_rows(&mut sql, rows, &insertable)?;
        Ok(sql)
    }

    /// UPDATE for one row (`UPDATE <table> SET ..`) or many rows
    /// (`UPDATE <table> AS t SET "a"=v."a" FROM (VALUES ..) AS v ("id","a")`).
    ///
    /// Skip hooks only apply to single-row updates. In multi-row updates
    /// conditional columns are part of the VALUES list but are not assigned.
    pub fn update<'a>(
        &self,
        data: impl Into<Rows<'a>>,
        columns: Option<&ColumnSet>,
        table: Option<&TableName>,
        options: &UpdateOptions,
    ) -> FormatResult<String> {
        let kw = |upper, lower| self.config.keyword(upper, lower);
        match data.into() {
            Rows::One(row) => {
                let assignments = self.sets(row, columns)?;
                if assignments.is_empty() {
                    return Err(FormatError::definition(
                        "Cannot generate an UPDATE without any columns",
                    ));
                }
                let mut sql = String::new();
                if let Some(table) = table.or(columns.and_then(ColumnSet::table)) {
                    sql.push_str(kw("UPDATE ", "update "));
                    sql.push_str(table.name());
                    sql.push(' ');
                }
                sql.push_str(kw("SET ", "set "));
                sql.push_str(&assignments);
                Ok(sql)
            }
            rows @ Rows::Many(list) => {
                if list.is_empty() {
                    return nothing_to_update(options);
                }
                let columns = resolve_columns(rows, columns, "UPDATE")?;
                let value_alias = alias(&options.value_alias)?;
                let assignments = columns.assign_columns(&AssignColumnsOptions {
                    from: Some(options.value_alias.as_str()),
                    ..Default::default()
                })?;
                if assignments.is_empty() {
                    return Err(FormatError::definition(
                        "Cannot generate an UPDATE without any columns",
                    ));
                }

                let mut sql = String::new();
                if let Some(table) = table.or(columns.table()) {
                    sql.push_str(kw("UPDATE ", "update "));
                    sql.push_str(table.name());
                    sql.push(' ');
                    sql.push_str(kw("AS ", "as "));
                    sql.push_str(&alias(&options.table_alias)?);
                    sql.push(' ');
                }
                sql.push_str(kw("SET ", "set "));
                sql.push_str(&assignments);
                sql.push(' ');
                sql.push_str(kw("FROM (VALUES ", "from (values "));
                let all: Vec<&Column> = columns.columns().iter().collect();
                write_rows(&mut sql, rows, &all)?;
                sql.push_str(") ");
                sql.push_str(kw("AS ", "as "));
                sql.push_str(&value_alias);
                sql.push_str(" (");
                sql.push_str(&columns.names());
                sql.push(')');
                Ok(sql)
            }
        }
    }

    /// `(..),(..)` value tuples for every row, in column order.
    pub fn values<'a>(
        &self,
        data: impl Into<Rows<'a>>,
        columns: Option<&ColumnSet>,
    ) -> FormatResult<String> {
        let rows = data.into();
        if rows.is_empty() {
            return Err(FormatError::EmptyData(
                "Cannot generate values from an empty array".to_string(),
            ));
        }
        let columns = resolve_columns(rows, columns, "values")?;
        if columns.is_empty() {
            return Err(FormatError::definition(
                "Cannot generate values without any columns",
            ));
        }
        let all: Vec<&Column> = columns.columns().iter().collect();
        let mut sql = String::new();
        write_rows(&mut sql, rows, &all)?;
        Ok(sql)
    }

    /// `"a"=1,"b"='x'` assignments for one row.
    ///
    /// Skip hooks run first; conditional columns are kept only when the row
    /// has their property. Returns an empty string when nothing is left.
    pub fn sets(&self, row: &Object, columns: Option<&ColumnSet>) -> FormatResult<String> {
        let columns = resolve_columns(Rows::One(row), columns, "SET")?;
        let mut parts = Vec::with_capacity(columns.len());
        for column in columns.columns() {
            if column.skipped(row) || (column.is_cnd() && !row.contains_key(column.prop())) {
                continue;
            }
            parts.push(format!("{}={}", column.escaped_name(), column.render(row, 0)?));
        }
        Ok(parts.join(","))
    }

    /// Join queries with `;`.
    ///
    /// Each part is trimmed of surrounding whitespace and semicolons; empty
    /// parts are dropped.
    pub fn concat<'a>(&self, parts: impl IntoIterator<Item = QueryPart<'a>>) -> FormatResult<String> {
        concat(parts)
    }
}

fn resolve_columns<'c>(
    rows: Rows<'_>,
    columns: Option<&'c ColumnSet>,
    what: &str,
) -> FormatResult<Cow<'c, ColumnSet>> {
    match (columns, rows) {
        (Some(cs), _) => Ok(Cow::Borrowed(cs)),
        (None, Rows::One(row)) => Ok(Cow::Owned(ColumnSet::from_object(
            row,
            ColumnSetOptions::default(),
        )?)),
        (None, Rows::Many(_)) => Err(FormatError::definition(format!(
            "A column set is required to generate a multi-row {what}"
        ))),
    }
}

fn write_rows(out: &mut String, rows: Rows<'_>, columns: &[&Column]) -> FormatResult<()> {
    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push('(');
        for (j, column) in columns.iter().enumerate() {
            if j > 0 {
                out.push(',');
            }
            out.push_str(&column.render(row, i)?);
        }
        out.push(')');
    }
    Ok(())
}

fn nothing_to_update(options: &UpdateOptions) -> FormatResult<String> {
    options.empty_update.clone().ok_or_else(|| {
        FormatError::EmptyData("Cannot generate an UPDATE from an empty array".to_string())
    })
}

fn join(parts: impl Iterator<Item = String>) -> String {
    parts.collect::<Vec<_>>().join(",")
}

fn trim_query(s: &str) -> &str {
    s.trim_matches(|c: char| c == ';' || c.is_whitespace())
}

// ==================== Free functions ====================

/// [`Helpers::insert`] with the default config.
pub fn insert<'a>(
    data: impl Into<Rows<'a>>,
    columns: Option<&ColumnSet>,
    table: Option<&TableName>,
) -> FormatResult<String> {
    Helpers::default().insert(data, columns, table)
}

/// [`Helpers::update`] with the default config.
pub fn update<'a>(
    data: impl Into<Rows<'a>>,
    columns: Option<&ColumnSet>,
    table: Option<&TableName>,
    options: &UpdateOptions,
) -> FormatResult<String> {
    Helpers::default().update(data, columns, table, options)
}

/// [`Helpers::values`] with the default config.
pub fn values<'a>(data: impl Into<Rows<'a>>, columns: Option<&ColumnSet>) -> FormatResult<String> {
    Helpers::default().values(data, columns)
}

/// [`Helpers::sets`] with the default config.
pub fn sets(row: &Object, columns: Option<&ColumnSet>) -> FormatResult<String> {
    Helpers::default().sets(row, columns)
}

/// Join queries with `;`, see [`Helpers::concat`].
pub fn concat<'a>(parts: impl IntoIterator<Item = QueryPart<'a>>) -> FormatResult<String> {
    let mut out = Vec::new();
    for part in parts {
        let text = match part {
            QueryPart::Text(s) => Cow::Borrowed(s),
            QueryPart::Formatted {
                query,
                values,
                options,
            } => Cow::Owned(template::format(query, values, &options)?),
            QueryPart::File(file) => Cow::Owned(file.text()?),
        };
        let trimmed = trim_query(&text);
        if !trimmed.is_empty() {
            out.push(trimmed.to_string());
        }
    }
    Ok(out.join(";"))
}
