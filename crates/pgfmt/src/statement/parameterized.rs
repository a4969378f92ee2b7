use super::{ParseCache, QuerySource, RowMode, validate_text};
use crate::error::FormatResult;
use crate::value::Value;

/// Validated parameterized query, ready for the driver.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterizedBasic {
    pub text: String,
    pub values: Vec<Value>,
    pub binary: bool,
    pub row_mode: RowMode,
}

/// An unnamed query whose `$N` parameters are bound by the server.
#[derive(Debug)]
pub struct ParameterizedQuery {
    text: QuerySource,
    values: Vec<Value>,
    binary: bool,
    row_mode: RowMode,
    version: u64,
    cache: ParseCache<ParameterizedBasic>,
}

impl ParameterizedQuery {
    pub fn new(text: impl Into<QuerySource>) -> Self {
        Self {
            text: text.into(),
            values: Vec::new(),
            binary: false,
            row_mode: RowMode::default(),
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

    pub fn version(&self) -> u64 {
        self.version
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

    /// Validate the query: non-empty text, a loadable query file and a value
    /// for every `$N` in the text.
    pub fn parse(&self) -> FormatResult<ParameterizedBasic> {
        self.cache.get_or_parse(self.version, &self.text, |text| {
            let result = validate_text("Parameterized query", text, &self.values).map(|text| {
                ParameterizedBasic {
                    text,
                    values: self.values.clone(),
                    binary: self.binary,
                    row_mode: self.row_mode,
                }
            });
            #[cfg(feature = "tracing")]
            super::log_parse(
                "parameterized",
                &result,
                result.as_ref().map_or(0, |b| b.text.len()),
                self.values.len(),
            );
            result
        })
    }
}

impl Clone for ParameterizedQuery {
    fn clone(&self) -> Self {
        Self {
            text: self.text.clone(),
            values: self.values.clone(),
            binary: self.binary,
            row_mode: self.row_mode,
            version: self.version,
            cache: ParseCache::default(),
        }
    }
}
