use crate::error::{FormatError, FormatResult};
use crate::formatting::format_modified;
use crate::ident::{is_variable_char, is_variable_name, quote_name};
use crate::template::Modifier;
use crate::value::{Object, Value};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// What a column hook sees for one data row.
#[derive(Debug, Clone, Copy)]
pub struct ColumnDescriptor<'a> {
    /// The whole data row.
    pub source: &'a Object,
    /// Column name.
    pub name: &'a str,
    /// The row's property value, or the column default when the property is absent.
    pub value: Option<&'a Value>,
    /// Whether the row has the property.
    pub exists: bool,
}

/// Computes a column value from its descriptor.
pub type InitHook = Arc<dyn Fn(&ColumnDescriptor<'_>) -> FormatResult<Value> + Send + Sync>;

/// Decides whether a column is left out for a row.
pub type SkipHook = Arc<dyn Fn(&ColumnDescriptor<'_>) -> bool + Send + Sync>;

/// Column configuration, turned into a [`Column`] by `Column::try_from`.
///
/// ```ignore
/// let col = Column::try_from(
///     ColumnConfig::new("created")
///         .prop("createdAt")
///         .cast("timestamptz")
///         .def(Value::Null),
/// )?;
/// assert_eq!(col.variable(), "${createdAt}::timestamptz");
/// ```
#[derive(Clone, Default)]
pub struct ColumnConfig {
    name: String,
    prop: Option<String>,
    modifier: Option<Modifier>,
    cast: Option<String>,
    cnd: bool,
    def: Option<Value>,
    init: Option<InitHook>,
    skip: Option<SkipHook>,
}

impl ColumnConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Source property, when it differs from the column name.
    pub fn prop(mut self, prop: impl Into<String>) -> Self {
        self.prop = Some(prop.into());
        self
    }

    pub fn modifier(mut self, modifier: Modifier) -> Self {
        self.modifier = Some(modifier);
        self
    }

    /// SQL type cast, with or without the leading `::`.
    pub fn cast(mut self, cast: impl Into<String>) -> Self {
        self.cast = Some(cast.into());
        self
    }

    /// Conditional column: never inserted, only updated when the row has it.
    pub fn cnd(mut self, cnd: bool) -> Self {
        self.cnd = cnd;
        self
    }

    /// Value used when the row lacks the property.
    pub fn def(mut self, value: impl Into<Value>) -> Self {
        self.def = Some(value.into());
        self
    }

    pub fn init<F>(mut self, f: F) -> Self
    where
        F: Fn(&ColumnDescriptor<'_>) -> FormatResult<Value> + Send + Sync + 'static,
    {
        self.init = Some(Arc::new(f));
        self
    }

    pub fn skip<F>(mut self, f: F) -> Self
    where
        F: Fn(&ColumnDescriptor<'_>) -> bool + Send + Sync + 'static,
    {
        self.skip = Some(Arc::new(f));
        self
    }
}

/// Any accepted way of declaring a column.
#[derive(Clone)]
pub enum ColumnInput {
    /// Shorthand: `"name"`, `"?name"` (conditional), `"name:json"`, `"name^"`.
    Name(String),
    Config(ColumnConfig),
    Column(Column),
}

impl From<&str> for ColumnInput {
    fn from(s: &str) -> Self {
        ColumnInput::Name(s.to_string())
    }
}

impl From<String> for ColumnInput {
    fn from(s: String) -> Self {
        ColumnInput::Name(s)
    }
}

impl From<&String> for ColumnInput {
    fn from(s: &String) -> Self {
        ColumnInput::Name(s.clone())
    }
}

impl From<ColumnConfig> for ColumnInput {
    fn from(c: ColumnConfig) -> Self {
        ColumnInput::Config(c)
    }
}

impl From<Column> for ColumnInput {
    fn from(c: Column) -> Self {
        ColumnInput::Column(c)
    }
}

impl From<&Column> for ColumnInput {
    fn from(c: &Column) -> Self {
        ColumnInput::Column(c.clone())
    }
}

/// A table column as used by the bulk helpers.
#[derive(Clone)]
pub struct Column {
    name: String,
    prop: Option<String>,
    modifier: Option<Modifier>,
    cast: Option<String>,
    cnd: bool,
    def: Option<Value>,
    init: Option<InitHook>,
    skip: Option<SkipHook>,
}

impl Column {
    /// Create a column from shorthand syntax.
    pub fn new(shorthand: &str) -> FormatResult<Self> {
        let s = shorthand.trim();
        let (cnd, rest) = match s.strip_prefix('?') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let name_len = rest
            .find(|c: char| !is_variable_char(c))
            .unwrap_or(rest.len());
        let (name, suffix) = rest.split_at(name_len);
        if name.is_empty() {
            return Err(FormatError::definition(format!(
                "Invalid column syntax: '{shorthand}'"
            )));
        }
        let modifier = if suffix.is_empty() {
            None
        } else {
            Some(Modifier::parse(suffix).ok_or_else(|| {
                FormatError::definition(format!("Invalid column syntax: '{shorthand}'"))
            })?)
        };

        Ok(Self {
            name: name.to_string(),
            prop: None,
            modifier,
            cast: None,
            cnd,
            def: None,
            init: None,
            skip: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source property read from each row.
    pub fn prop(&self) -> &str {
        self.prop.as_deref().unwrap_or(&self.name)
    }

    pub fn modifier(&self) -> Option<Modifier> {
        self.modifier
    }

    pub fn cast(&self) -> Option<&str> {
        self.cast.as_deref()
    }

    pub fn is_cnd(&self) -> bool {
        self.cnd
    }

    pub fn def(&self) -> Option<&Value> {
        self.def.as_ref()
    }

    pub fn has_init(&self) -> bool {
        self.init.is_some()
    }

    pub fn has_skip(&self) -> bool {
        self.skip.is_some()
    }

    /// Quoted column name.
    pub fn escaped_name(&self) -> String {
        quote_name(&self.name)
    }

    /// `::type`, or an empty string without a cast.
    pub fn cast_text(&self) -> String {
        self.cast
            .as_deref()
            .map_or_else(String::new, |c| format!("::{c}"))
    }

    /// Named placeholder for the column, e.g. `${data:json}::jsonb`.
    pub fn variable(&self) -> String {
        let modifier = self.modifier.map_or("", Modifier::suffix);
        format!("${{{}{}}}{}", self.prop(), modifier, self.cast_text())
    }

    pub(crate) fn descriptor<'a>(&'a self, source: &'a Object) -> ColumnDescriptor<'a> {
        let found = source.get(self.prop());
        ColumnDescriptor {
            source,
            name: &self.name,
            value: found.or(self.def.as_ref()),
            exists: found.is_some(),
        }
    }

    /// Whether the skip hook leaves this column out for `source`.
    pub(crate) fn skipped(&self, source: &Object) -> bool {
        match &self.skip {
            Some(skip) => skip(&self.descriptor(source)),
            None => false,
        }
    }

    /// Value of this column for row number `row`: the init hook result, the
    /// property value, or the default.
    pub(crate) fn resolve<'a>(&'a self, source: &'a Object, row: usize) -> FormatResult<Cow<'a, Value>> {
        let desc = self.descriptor(source);
        if let Some(init) = &self.init {
            return init(&desc)
                .map(Cow::Owned)
                .map_err(|e| e.at_column(&self.name, row));
        }
        desc.value
            .map(Cow::Borrowed)
            .ok_or_else(|| FormatError::MissingColumnProperty {
                column: self.name.clone(),
                prop: self.prop().to_string(),
                row,
            })
    }

    /// Formatted value of this column for a row, cast included.
    pub(crate) fn render(&self, source: &Object, row: usize) -> FormatResult<String> {
        let value = self.resolve(source, row)?;
        let mut sql =
            format_modified(&value, self.modifier).map_err(|e| e.at_column(&self.name, row))?;
        if let Some(cast) = &self.cast {
            sql.push_str("::");
            sql.push_str(cast);
        }
        Ok(sql)
    }
}

impl TryFrom<ColumnConfig> for Column {
    type Error = FormatError;

    fn try_from(config: ColumnConfig) -> FormatResult<Self> {
        let name = config.name.trim();
        if name.is_empty() {
            return Err(FormatError::definition("Column name cannot be empty"));
        }

        let prop = match config.prop.as_deref().map(str::trim) {
            Some(prop) if !is_variable_name(prop) => {
                return Err(FormatError::definition(format!(
                    "Invalid property name '{prop}' for column '{name}'"
                )));
            }
            Some(prop) if prop == name => None,
            Some(prop) => Some(prop.to_string()),
            None if !is_variable_name(name) => {
                return Err(FormatError::definition(format!(
                    "Column '{name}' needs a property name"
                )));
            }
            None => None,
        };

        let cast = config
            .cast
            .as_deref()
            .map(|c| c.trim().trim_start_matches(':').trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        Ok(Self {
            name: name.to_string(),
            prop,
            modifier: config.modifier,
            cast,
            cnd: config.cnd,
            def: config.def,
            init: config.init,
            skip: config.skip,
        })
    }
}

impl TryFrom<ColumnInput> for Column {
    type Error = FormatError;

    fn try_from(input: ColumnInput) -> FormatResult<Self> {
        match input {
            ColumnInput::Name(s) => Column::new(&s),
            ColumnInput::Config(c) => Column::try_from(c),
            ColumnInput::Column(c) => Ok(c),
        }
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("name", &self.name)
            .field("prop", &self.prop)
            .field("modifier", &self.modifier)
            .field("cast", &self.cast)
            .field("cnd", &self.cnd)
            .field("def", &self.def)
            .field("init", &self.init.is_some())
            .field("skip", &self.skip.is_some())
            .finish()
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.cnd {
            f.write_str("?")?;
        }
        f.write_str(&self.escaped_name())?;
        if let Some(m) = self.modifier {
            write!(f, "{m}")?;
        }
        f.write_str(&self.cast_text())
    }
}
