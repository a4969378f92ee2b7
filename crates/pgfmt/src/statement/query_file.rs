use crate::ctf::ToPostgres;
use crate::error::{FormatError, FormatResult};
use crate::template::{self, FormatOptions};
use crate::value::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard};
use std::time::SystemTime;

/// Options for [`QueryFile`].
#[derive(Debug, Clone, Default)]
pub struct QueryFileOptions {
    /// Values applied to the file text once it is loaded (partial formatting,
    /// unresolved placeholders are kept).
    pub params: Option<Value>,
    /// Reload the file on [`QueryFile::prepare`] when it changed on disk.
    pub debug: bool,
}

impl QueryFileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn params(mut self, params: impl Into<Value>) -> Self {
        self.params = Some(params.into());
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

#[derive(Debug)]
struct Loaded {
    result: Result<String, FormatError>,
    modified: Option<SystemTime>,
}

/// SQL text loaded from a file.
///
/// Load failures do not panic or fail construction; they are kept and
/// reported by [`text`](QueryFile::text) and [`error`](QueryFile::error).
///
/// ```ignore
/// let qf = QueryFile::with_options(
///     "sql/users/find.sql",
///     QueryFileOptions::new().params(Value::object([("schema", "app")])),
/// );
/// let sql = qf.text()?;
/// ```
#[derive(Debug)]
pub struct QueryFile {
    path: PathBuf,
    options: QueryFileOptions,
    loaded: RwLock<Loaded>,
}

impl QueryFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::with_options(path, QueryFileOptions::default())
    }

    pub fn with_options(path: impl AsRef<Path>, options: QueryFileOptions) -> Self {
        let path = path.as_ref().to_path_buf();
        let loaded = load(&path, &options);
        Self {
            path,
            options,
            loaded: RwLock::new(loaded),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn options(&self) -> &QueryFileOptions {
        &self.options
    }

    /// In debug mode, reload the file if its modification time changed.
    pub fn prepare(&self) {
        if !self.options.debug {
            return;
        }
        let current = modified(&self.path);
        if current.is_some() && current == self.read().modified {
            return;
        }
        let reloaded = load(&self.path, &self.options);
        *self.loaded.write().unwrap_or_else(PoisonError::into_inner) = reloaded;
    }

    /// The loaded SQL text, or the load error.
    pub fn text(&self) -> FormatResult<String> {
        self.read().result.clone()
    }

    pub fn error(&self) -> Option<FormatError> {
        self.read().result.as_ref().err().cloned()
    }

    fn read(&self) -> RwLockReadGuard<'_, Loaded> {
        self.loaded.read().unwrap_or_else(PoisonError::into_inner)
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

fn load(path: &Path, options: &QueryFileOptions) -> Loaded {
    let file_error = |message: String| FormatError::QueryFile {
        file: path.display().to_string(),
        message,
    };

    let result = fs::read_to_string(path)
        .map_err(|e| file_error(e.to_string()))
        .and_then(|text| match &options.params {
            Some(params) => {
                template::format(&text, params, &FormatOptions::new().partial(true))
                    .map_err(|e| file_error(e.to_string()))
            }
            None => Ok(text),
        });

    #[cfg(feature = "tracing")]
    if let Err(err) = &result {
        tracing::warn!(target: "pgfmt.file", file = %path.display(), error = %err, "query file failed to load");
    }

    Loaded {
        result,
        modified: modified(path),
    }
}

impl ToPostgres for QueryFile {
    fn to_postgres(&self) -> FormatResult<Value> {
        self.prepare();
        self.text().map(Value::Text)
    }

    fn raw_type(&self) -> bool {
        true
    }
}
