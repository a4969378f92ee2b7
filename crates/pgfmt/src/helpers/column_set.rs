use super::column::{Column, ColumnInput};
use super::table_name::TableName;
use crate::error::{FormatError, FormatResult};
use crate::formatting::alias;
use crate::value::Object;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Options for [`ColumnSet::with_options`].
#[derive(Debug, Clone, Default)]
pub struct ColumnSetOptions {
    /// Table the columns belong to; used when a helper is called without one.
    pub table: Option<TableName>,
    /// Columns were taken from inherited properties too. Informational.
    pub inherit: bool,
}

impl ColumnSetOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, table: TableName) -> Self {
        self.table = Some(table);
        self
    }

    pub fn inherit(mut self, inherit: bool) -> Self {
        self.inherit = inherit;
        self
    }
}

/// Options for [`ColumnSet::assign`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AssignOptions<'a> {
    /// Row deciding which columns to assign: skip hooks run against it and
    /// conditional columns are kept only when it has their property.
    pub source: Option<&'a Object>,
    /// Alias prefixed to every column name.
    pub prefix: Option<&'a str>,
}

/// Columns left out by [`ColumnSet::assign_columns`].
#[derive(Clone)]
pub enum ColumnSkip {
    Names(Vec<String>),
    Predicate(Arc<dyn Fn(&Column) -> bool + Send + Sync>),
}

impl ColumnSkip {
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Column) -> bool + Send + Sync + 'static,
    {
        ColumnSkip::Predicate(Arc::new(f))
    }

    fn matches(&self, column: &Column) -> bool {
        match self {
            ColumnSkip::Names(names) => names.iter().any(|n| n == column.name()),
            ColumnSkip::Predicate(f) => f(column),
        }
    }
}

impl fmt::Debug for ColumnSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnSkip::Names(names) => f.debug_tuple("Names").field(names).finish(),
            ColumnSkip::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Options for [`ColumnSet::assign_columns`].
#[derive(Debug, Clone, Default)]
pub struct AssignColumnsOptions<'a> {
    /// Alias of the side values are read from.
    pub from: Option<&'a str>,
    /// Alias of the side being assigned.
    pub to: Option<&'a str>,
    pub skip: Option<ColumnSkip>,
}

/// An ordered set of uniquely named columns, optionally bound to a table.
///
/// ```ignore
/// let cs = ColumnSet::with_options(
///     ["id", "name", "?tenant"],
///     ColumnSetOptions::new().table(TableName::new("users")?),
/// )?;
/// assert_eq!(cs.names(), r#""id","name","tenant""#);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ColumnSet {
    columns: Vec<Column>,
    table: Option<TableName>,
    inherit: bool,
}

impl ColumnSet {
    pub fn new<I>(columns: I) -> FormatResult<Self>
    where
        I: IntoIterator,
        I::Item: Into<ColumnInput>,
    {
        Self::with_options(columns, ColumnSetOptions::default())
    }

    pub fn with_options<I>(columns: I, options: ColumnSetOptions) -> FormatResult<Self>
    where
        I: IntoIterator,
        I::Item: Into<ColumnInput>,
    {
        let set = Self {
            columns: Vec::new(),
            table: options.table,
            inherit: options.inherit,
        };
        set.extend(columns)
    }

    /// Columns named after the keys of an object, in key order.
    pub fn from_object(object: &Object, options: ColumnSetOptions) -> FormatResult<Self> {
        Self::with_options(object.keys(), options)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn table(&self) -> Option<&TableName> {
        self.table.as_ref()
    }

    pub fn inherits(&self) -> bool {
        self.inherit
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// New set with `columns` appended; any name already present is an error.
    pub fn extend<I>(&self, columns: I) -> FormatResult<ColumnSet>
    where
        I: IntoIterator,
        I::Item: Into<ColumnInput>,
    {
        let mut out = self.clone();
        let mut seen: HashSet<String> = out.columns.iter().map(|c| c.name().to_string()).collect();
        for input in columns {
            let column = Column::try_from(input.into())?;
            if !seen.insert(column.name().to_string()) {
                return Err(FormatError::definition(format!(
                    "Duplicate column name \"{}\"",
                    column.name()
                )));
            }
            out.columns.push(column);
        }
        Ok(out)
    }

    /// New set where each of `columns` replaces the column of the same name in
    /// place, or is appended. Among duplicates the later one wins.
    pub fn merge<I>(&self, columns: I) -> FormatResult<ColumnSet>
    where
        I: IntoIterator,
        I::Item: Into<ColumnInput>,
    {
        let mut out = self.clone();
        for input in columns {
            let column = Column::try_from(input.into())?;
            match out.columns.iter_mut().find(|c| c.name() == column.name()) {
                Some(existing) => *existing = column,
                None => out.columns.push(column),
            }
        }
        Ok(out)
    }

    /// Comma-separated quoted column names: `"id","name"`.
    pub fn names(&self) -> String {
        join(self.columns.iter().map(Column::escaped_name))
    }

    /// Comma-separated column placeholders: `${id},${data:json}::jsonb`.
    pub fn variables(&self) -> String {
        join(self.columns.iter().map(Column::variable))
    }

    /// `"name"=${prop}` assignments for an UPDATE template.
    ///
    /// Without a source, conditional columns are left out.
    pub fn assign(&self, options: AssignOptions<'_>) -> FormatResult<String> {
        let prefix = options.prefix.map(alias).transpose()?;
        let parts = self
            .columns
            .iter()
            .filter(|c| match options.source {
                Some(source) => !c.skipped(source) && (!c.is_cnd() || source.contains_key(c.prop())),
                None => !c.is_cnd(),
            })
            .map(|c| {
                let mut s = String::new();
                if let Some(p) = &prefix {
                    s.push_str(p);
                    s.push('.');
                }
                s.push_str(&c.escaped_name());
                s.push('=');
                s.push_str(&c.variable());
                s
            });
        Ok(join(parts))
    }

    /// `to."name"=from."name"` assignments between two aliases.
    ///
    /// Conditional columns are left out.
    pub fn assign_columns(&self, options: &AssignColumnsOptions<'_>) -> FormatResult<String> {
        let from = options.from.map(alias).transpose()?;
        let to = options.to.map(alias).transpose()?;
        let parts = self
            .columns
            .iter()
            .filter(|c| !c.is_cnd())
            .filter(|c| options.skip.as_ref().is_none_or(|s| !s.matches(c)))
            .map(|c| {
                let name = c.escaped_name();
                let mut s = String::new();
                if let Some(to) = &to {
                    s.push_str(to);
                    s.push('.');
                }
                s.push_str(&name);
                s.push('=');
                if let Some(from) = &from {
                    s.push_str(from);
                    s.push('.');
                }
                s.push_str(&name);
                s
            });
        Ok(join(parts))
    }

    /// Copy of `source` reduced to the set's columns, keyed by column name.
    ///
    /// Columns are filled from init hooks, row properties or defaults; skipped
    /// columns and columns with nothing to fill are left out.
    pub fn prepare(&self, source: &Object) -> FormatResult<Object> {
        let mut target = Object::with_capacity(self.columns.len());
        for column in &self.columns {
            if column.skipped(source) {
                continue;
            }
            let desc = column.descriptor(source);
            if !column.has_init() && desc.value.is_none() {
                continue;
            }
            let value = column.resolve(source, 0)?.into_owned();
            target.insert(column.name().to_string(), value);
        }
        Ok(target)
    }
}

fn join(parts: impl Iterator<Item = String>) -> String {
    parts.collect::<Vec<_>>().join(",")
}

impl IntoIterator for ColumnSet {
    type Item = Column;
    type IntoIter = std::vec::IntoIter<Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.into_iter()
    }
}

impl<'a> IntoIterator for &'a ColumnSet {
    type Item = &'a Column;
    type IntoIter = std::slice::Iter<'a, Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

impl fmt::Display for ColumnSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ColumnSet {{")?;
        if let Some(table) = &self.table {
            writeln!(f, "    table: {table}")?;
        }
        if self.inherit {
            writeln!(f, "    inherit: true")?;
        }
        writeln!(f, "    columns: [")?;
        for column in &self.columns {
            writeln!(f, "        {column}")?;
        }
        writeln!(f, "    ]")?;
        write!(f, "}}")
    }
}
