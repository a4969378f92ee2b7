/// Configuration for the statement generating helpers.
#[derive(Debug, Clone)]
pub struct HelpersConfig {
    /// Write SQL keywords in upper case.
    pub cap_sql: bool,
}

impl Default for HelpersConfig {
    fn default() -> Self {
        Self { cap_sql: true }
    }
}

impl HelpersConfig {
    /// Create a new config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set keyword case.
    pub fn cap_sql(mut self, cap: bool) -> Self {
        self.cap_sql = cap;
        self
    }

    pub(crate) fn keyword<'a>(&self, upper: &'a str, lower: &'a str) -> &'a str {
        if self.cap_sql { upper } else { lower }
    }
}

/// Options for UPDATE generation.
#[derive(Debug, Clone)]
pub struct UpdateOptions {
    /// Alias of the updated table in a multi-row UPDATE.
    pub table_alias: String,
    /// Alias of the VALUES list in a multi-row UPDATE.
    pub value_alias: String,
    /// Returned instead of an error when a multi-row update gets no rows.
    pub empty_update: Option<String>,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            table_alias: "t".to_string(),
            value_alias: "v".to_string(),
            empty_update: None,
        }
    }
}

impl UpdateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table_alias(mut self, alias: impl Into<String>) -> Self {
        self.table_alias = alias.into();
        self
    }

    pub fn value_alias(mut self, alias: impl Into<String>) -> Self {
        self.value_alias = alias.into();
        self
    }

    pub fn empty_update(mut self, sql: impl Into<String>) -> Self {
        self.empty_update = Some(sql.into());
        self
    }
}
