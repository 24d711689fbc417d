use super::truncate_sql_bytes;
use std::fmt;
use std::time::Duration;

/// Context information about the statement being executed.
#[derive(Debug, Clone)]
pub struct QueryContext {
    /// The SQL sent to the server.
    pub sql: String,
    /// Number of bound parameters.
    pub param_count: usize,
    /// Optional name identifying where the statement came from
    /// (e.g. `distinct_values`, `list_tables`).
    pub tag: Option<String>,
}

impl QueryContext {
    /// Create a new query context.
    pub fn new(sql: &str, param_count: usize) -> Self {
        Self {
            sql: sql.to_string(),
            param_count,
            tag: None,
        }
    }

    /// Add a tag to identify this statement.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

/// Maximum length for error messages in `QueryResult::Error`.
const MAX_ERROR_LEN: usize = 512;

/// Outcome of a statement, reported when its cursor is released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResult {
    /// Number of rows the caller fetched before releasing the cursor.
    Rows(usize),
    /// The statement or a fetch failed (message truncated to 512 bytes).
    Error(String),
}

impl QueryResult {
    /// Create an error result, truncating the message.
    pub fn error(msg: &str) -> Self {
        if msg.len() > MAX_ERROR_LEN {
            Self::Error(format!("{}...", truncate_sql_bytes(msg, MAX_ERROR_LEN)))
        } else {
            Self::Error(msg.to_string())
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryResult::Rows(n) => write!(f, "{n} rows"),
            QueryResult::Error(e) => write!(f, "error: {e}"),
        }
    }
}

/// Trait for observing statement execution.
pub trait QueryHook: Send + Sync {
    /// Called before a statement is executed.
    fn before_query(&self, _ctx: &QueryContext) {}

    /// Called once the statement's cursor is released, on success or failure.
    fn after_query(&self, _ctx: &QueryContext, _duration: Duration, _result: &QueryResult) {}
}
