//! Statement descriptors for server-side parameter binding.
//!
//! [`PreparedStatement`] and [`ParameterizedQuery`] pair SQL text with values
//! and driver options. `parse()` validates them and returns a plain
//! descriptor for the execution layer, or the error as data. Results are
//! cached until the statement is modified or its query file changes.
//!
//! ```ignore
//! use pgfmt::{PreparedStatement, RowMode};
//!
//! let mut ps = PreparedStatement::new("find-user", "SELECT * FROM users WHERE id = $1")
//!     .with_values([7])
//!     .with_row_mode(RowMode::Array);
//! let basic = ps.parse()?;
//! assert_eq!(basic.values.len(), 1);
//!
//! ps.set_values([8]); // invalidates the cached parse result
//! # Ok::<(), pgfmt::FormatError>(())
//! ```

mod parameterized;
mod prepared;
mod query_file;


pub use parameterized::{ParameterizedBasic, ParameterizedQuery};
pub use prepared::{PreparedBasic, PreparedStatement};
pub use query_file::{QueryFile, QueryFileOptions};

use crate::error::{FormatError, FormatResult};
use crate::template::max_positional;
use crate::value::Value;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Where a statement's SQL comes from.
#[derive(Debug, Clone)]
pub enum QuerySource {
    Text(String),
    File(Arc<QueryFile>),
}

impl QuerySource {
    /// Current SQL text; query files are prepared first.
    pub fn resolve(&self) -> FormatResult<String> {
        match self {
            QuerySource::Text(text) => Ok(text.clone()),
            QuerySource::File(file) => {
                file.prepare();
                file.text()
            }
        }
    }

    fn is_file(&self) -> bool {
        matches!(self, QuerySource::File(_))
    }
}

impl From<&str> for QuerySource {
    fn from(s: &str) -> Self {
        QuerySource::Text(s.to_string())
    }
}

impl From<String> for QuerySource {
    fn from(s: String) -> Self {
        QuerySource::Text(s)
    }
}

impl From<QueryFile> for QuerySource {
    fn from(f: QueryFile) -> Self {
        QuerySource::File(Arc::new(f))
    }
}

impl From<Arc<QueryFile>> for QuerySource {
    fn from(f: Arc<QueryFile>) -> Self {
        QuerySource::File(f)
    }
}

/// Shape of result rows requested from the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowMode {
    /// Rows as column-name keyed objects.
    #[default]
    Object,
    /// Rows as arrays of values.
    Array,
}

impl RowMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowMode::Object => "object",
            RowMode::Array => "array",
        }
    }
}

impl fmt::Display for RowMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==================== Parse cache ====================

#[derive(Debug)]
struct Cached<T> {
    version: u64,
    /// File text the result was built from.
    file_text: Option<String>,
    result: FormatResult<T>,
}

/// Last parse result of a statement, keyed by the statement version.
#[derive(Debug)]
pub(crate) struct ParseCache<T> {
    slot: Mutex<Option<Cached<T>>>,
}

impl<T> Default for ParseCache<T> {
    fn default() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }
}

impl<T: Clone> ParseCache<T> {
    fn get_or_parse(
        &self,
        version: u64,
        source: &QuerySource,
        build: impl FnOnce(FormatResult<String>) -> FormatResult<T>,
    ) -> FormatResult<T> {
        let text = source.resolve();
        let file_text = if source.is_file() {
            text.as_ref().ok().cloned()
        } else {
            None
        };

        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(cached) = slot.as_ref() {
            if cached.version == version && cached.file_text == file_text {
                #[cfg(feature = "tracing")]
                tracing::trace!(target: "pgfmt.statement", version, "parse cache hit");
                return cached.result.clone();
            }
        }

        let result = build(text);
        *slot = Some(Cached {
            version,
            file_text,
            result: result.clone(),
        });
        result
    }
}

// ==================== Validation ====================

/// Check the statement text and that every `$N` has a value.
fn validate_text(
    what: &str,
    text: FormatResult<String>,
    values: &[Value],
) -> FormatResult<String> {
    let text = text.map_err(|e| FormatError::Statement {
        message: format!("{what}: failed to load query text"),
        source: Some(Box::new(e)),
    })?;
    if text.trim().is_empty() {
        return Err(FormatError::statement(format!(
            "{what}: property 'text' must be a non-empty text string"
        )));
    }

    let highest = max_positional(&text).map_err(|e| FormatError::Statement {
        message: format!("{what}: invalid query text"),
        source: Some(Box::new(e)),
    })?;
    if highest > values.len() {
        return Err(FormatError::Statement {
            message: format!("{what}: not enough values"),
            source: Some(Box::new(FormatError::IndexOutOfRange {
                index: highest,
                len: values.len(),
            })),
        });
    }
    Ok(text)
}

#[cfg(feature = "tracing")]
fn log_parse<T>(what: &str, result: &FormatResult<T>, text_len: usize, value_count: usize) {
    match result {
        Ok(_) => tracing::debug!(
            target: "pgfmt.statement",
            statement = what,
            text_len,
            value_count,
            "statement parsed"
        ),
        Err(err) => tracing::warn!(
            target: "pgfmt.statement",
            statement = what,
            error = %err,
            "statement is invalid"
        ),
    }
}
