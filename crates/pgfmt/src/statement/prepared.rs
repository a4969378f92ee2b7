use super::{ParseCache, QuerySource, RowMode, validate_text};
use crate::error::{FormatError, FormatResult};
use crate::value::Value;

/// Validated prepared statement, ready for the driver.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedBasic {
    pub name: String,
    pub text: String,
    pub values: Vec<Value>,
    pub binary: bool,
    pub row_mode: RowMode,
    /// Maximum number of rows to return.
    pub rows: Option<u32>,
}

/// A named server-side prepared statement.
#[derive(Debug)]
pub struct PreparedStatement {
    name: String,
    text: QuerySource,
    values: Vec<Value>,
    binary: bool,
    row_mode: RowMode,
    rows: Option<u32>,
    version: u64,
    cache: ParseCache<PreparedBasic>,
}

impl PreparedStatement {
    pub fn new(name: impl Into<String>, text: impl Into<QuerySource>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            values: Vec::new(),
            binary: false,
            row_mode: RowMode::default(),
            rows: None,
            version: 0,
            cache: ParseCache::default(),
        }
    }

    pub fn with_values<V: Into<Value>>(mut self, values: impl IntoIterator<Item = V>) -> Self {
        self.set_values(values);
        self
    }

    pub fn with_binary(mut self, binary: bool) -> Self {
        self.set_binary(binary);
        self
    }

    pub fn with_row_mode(mut self, mode: RowMode) -> Self {
        self.set_row_mode(mode);
        self
    }

    pub fn with_rows(mut self, rows: u32) -> Self {
        self.set_rows(Some(rows));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &QuerySource {
        &self.text
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn binary(&self) -> bool {
        self.binary
    }

    pub fn row_mode(&self) -> RowMode {
        self.row_mode
    }

    pub fn rows(&self) -> Option<u32> {
        self.rows
    }

    /// Incremented by every setter; a cached parse result is only reused for
    /// the version it was built for.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.version += 1;
    }

    pub fn set_text(&mut self, text: impl Into<QuerySource>) {
        self.text = text.into();
        self.version += 1;
    }

    pub fn set_values<V: Into<Value>>(&mut self, values: impl IntoIterator<Item = V>) {
        self.values = values.into_iter().map(Into::into).collect();
        self.version += 1;
    }

    pub fn set_binary(&mut self, binary: bool) {
        self.binary = binary;
        self.version += 1;
    }

    pub fn set_row_mode(&mut self, mode: RowMode) {
        self.row_mode = mode;
        self.version += 1;
    }

    pub fn set_rows(&mut self, rows: Option<u32>) {
        self.rows = rows;
        self.version += 1;
    }

    /// Validate the statement.
    ///
    /// Requires a non-empty name and text, a loadable query file, a positive
    /// `rows` limit when set, and a value for every `$N` in the text.
    pub fn parse(&self) -> FormatResult<PreparedBasic> {
        self.cache.get_or_parse(self.version, &self.text, |text| {
            let result = self.build(text);
            #[cfg(feature = "tracing")]
            super::log_parse(
                &self.name,
                &result,
                result.as_ref().map_or(0, |b| b.text.len()),
                self.values.len(),
            );
            result
        })
    }

    fn build(&self, text: FormatResult<String>) -> FormatResult<PreparedBasic> {
        if self.name.trim().is_empty() {
            return Err(FormatError::statement(
                "Prepared statement: property 'name' must be a non-empty text string",
            ));
        }
        let what = format!("Prepared statement '{}'", self.name);
        let text = validate_text(&what, text, &self.values)?;
        if self.rows == Some(0) {
            return Err(FormatError::statement(format!(
                "{what}: property 'rows' must be a positive integer"
            )));
        }

        Ok(PreparedBasic {
            name: self.name.clone(),
            text,
            values: self.values.clone(),
            binary: self.binary,
            row_mode: self.row_mode,
            rows: self.rows,
        })
    }
}

impl Clone for PreparedStatement {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            text: self.text.clone(),
            values: self.values.clone(),
            binary: self.binary,
            row_mode: self.row_mode,
            rows: self.rows,
            version: self.version,
            cache: ParseCache::default(),
        }
    }
}
