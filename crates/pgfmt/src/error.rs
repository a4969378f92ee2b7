//! Error types for pgfmt

use thiserror::Error;

/// Result type alias for pgfmt operations
pub type FormatResult<T> = Result<T, FormatError>;

/// Broad classification of a [`FormatError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A value cannot be rendered in the requested context.
    Formatting,
    /// A placeholder is missing, out of range or malformed.
    TemplateResolution,
    /// A data row lacks a property required by a column.
    ColumnResolution,
    /// A bulk helper received no rows.
    EmptyData,
    /// A statement wrapper is incomplete, or its query file failed to load.
    StatementDefinition,
}

/// Error types for formatting and statement generation
#[derive(Debug, Clone, Error)]
pub enum FormatError {
    /// Value cannot be formatted in its context
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// A custom type failed while producing its value
    #[error("Custom type {type_name} failed to format {value}: {source}")]
    CustomType {
        type_name: &'static str,
        value: String,
        #[source]
        source: Box<FormatError>,
    },

    /// A custom type kept producing custom types
    #[error("Custom type {type_name} did not resolve after {depth} nested conversions")]
    CustomTypeLoop { type_name: &'static str, depth: usize },

    /// Named placeholder without a matching property
    #[error("Property '{0}' doesn't exist")]
    MissingProperty(String),

    /// Positional placeholder beyond the values array
    #[error("Variable ${index} out of range. Parameters array length: {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Placeholder syntax error
    #[error("Malformed placeholder at offset {offset}: {message}")]
    MalformedToken { offset: usize, message: String },

    /// Failure while formatting the value of a placeholder
    #[error("Cannot format placeholder {token}: {source}")]
    Placeholder {
        token: String,
        #[source]
        source: Box<FormatError>,
    },

    /// Invalid column, column set or table definition
    #[error("Invalid definition: {0}")]
    Definition(String),

    /// Row lacks the property a column reads from
    #[error("Property '{prop}' doesn't exist for column \"{column}\" in row {row}")]
    MissingColumnProperty {
        column: String,
        prop: String,
        row: usize,
    },

    /// Failure while formatting the value of a column
    #[error("Cannot format column \"{column}\" in row {row}: {source}")]
    ColumnValue {
        column: String,
        row: usize,
        #[source]
        source: Box<FormatError>,
    },

    /// Bulk helper invoked without rows
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Statement wrapper failed validation
    #[error("{message}")]
    Statement {
        message: String,
        #[source]
        source: Option<Box<FormatError>>,
    },

    /// Query file could not be loaded or pre-formatted
    #[error("Query file '{file}': {message}")]
    QueryFile { file: String, message: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl FormatError {
    /// Create an invalid value error
    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::InvalidValue(message.into())
    }

    /// Create a definition error
    pub fn definition(message: impl Into<String>) -> Self {
        Self::Definition(message.into())
    }

    /// Create a statement definition error without an underlying cause
    pub fn statement(message: impl Into<String>) -> Self {
        Self::Statement {
            message: message.into(),
            source: None,
        }
    }

    pub(crate) fn malformed(offset: usize, message: impl Into<String>) -> Self {
        Self::MalformedToken {
            offset,
            message: message.into(),
        }
    }

    /// Attach placeholder context to a value formatting error.
    pub(crate) fn at_token(self, token: &str) -> Self {
        match self {
            // Template errors already name what went wrong.
            e @ (Self::MissingProperty(_)
            | Self::IndexOutOfRange { .. }
            | Self::MalformedToken { .. }) => e,
            e => Self::Placeholder {
                token: token.to_string(),
                source: Box::new(e),
            },
        }
    }

    /// Attach column and row context to a value formatting error.
    pub(crate) fn at_column(self, column: &str, row: usize) -> Self {
        match self {
            e @ Self::MissingColumnProperty { .. } => e,
            e => Self::ColumnValue {
                column: column.to_string(),
                row,
                source: Box::new(e),
            },
        }
    }

    /// Classify the error.
    ///
    /// Context wrappers report the kind of the error they wrap.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidValue(_)
            | Self::CustomType { .. }
            | Self::CustomTypeLoop { .. }
            | Self::Definition(_)
            | Self::Serialization(_) => ErrorKind::Formatting,
            Self::MissingProperty(_) | Self::IndexOutOfRange { .. } | Self::MalformedToken { .. } => {
                ErrorKind::TemplateResolution
            }
            Self::Placeholder { source, .. } | Self::ColumnValue { source, .. } => source.kind(),
            Self::MissingColumnProperty { .. } => ErrorKind::ColumnResolution,
            Self::EmptyData(_) => ErrorKind::EmptyData,
            Self::Statement { .. } | Self::QueryFile { .. } => ErrorKind::StatementDefinition,
        }
    }

    /// Check if a placeholder could not be resolved
    pub fn is_template_error(&self) -> bool {
        self.kind() == ErrorKind::TemplateResolution
    }

    /// Check if a row could not provide a column value
    pub fn is_column_error(&self) -> bool {
        self.kind() == ErrorKind::ColumnResolution
    }

    /// Check if this is an empty data error
    pub fn is_empty_data(&self) -> bool {
        matches!(self, Self::EmptyData(_))
    }

    /// Name of the missing property, if this is a missing-property error.
    pub fn missing_property(&self) -> Option<&str> {
        match self {
            Self::MissingProperty(name) => Some(name),
            Self::MissingColumnProperty { prop, .. } => Some(prop),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for FormatError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn wrapper_reports_inner_kind() {
        let err = FormatError::invalid_value("bad").at_token("${a}");
        assert_eq!(err.kind(), ErrorKind::Formatting);
        assert!(err.source().is_some());
        assert_eq!(
            err.to_string(),
            "Cannot format placeholder ${a}: Invalid value: bad"
        );
    }

    #[test]
    fn template_errors_are_not_wrapped() {
        let err = FormatError::MissingProperty("x".into()).at_token("${x}");
        assert!(matches!(err, FormatError::MissingProperty(_)));
        assert!(err.is_template_error());
        assert_eq!(err.missing_property(), Some("x"));
    }

    #[test]
    fn column_context() {
        let err = FormatError::invalid_value("nope").at_column("price", 3);
        assert_eq!(
            err.to_string(),
            "Cannot format column \"price\" in row 3: Invalid value: nope"
        );
    }
}
