//! Query hooks for SQL execution.
//!
//! The backend never logs through global state. Instead a [`QueryHook`] is
//! injected into [`Backend`](crate::Backend) and notified around every
//! statement:
//!
//! - [`QueryHook::before_query`] right before the statement is sent
//! - [`QueryHook::after_query`] when the scoped cursor is released, with the
//!   number of rows fetched or the translated error
//!
//! # Example
//!
//! ```rust,ignore
//! use mariadb_backend::{Backend, CompositeHook, StatsHook, TracingSqlHook};
//! use std::sync::Arc;
//!
//! let stats = Arc::new(StatsHook::new());
//! let hook = CompositeHook::new()
//!     .add(TracingSqlHook::new())
//!     .add_arc(stats.clone());
//!
//! let mut backend = Backend::connect(params)?.with_hook(hook);
//! backend.list_tables(None)?;
//! println!("{:?}", stats.stats());
//! ```

mod hooks;
mod tracing_hook;
mod types;


pub use hooks::{CompositeHook, NoopHook, QueryStats, StatsHook};
pub use tracing_hook::TracingSqlHook;
pub use types::{QueryContext, QueryHook, QueryResult};

/// Truncate `sql` to at most `max_bytes`, backing off to a char boundary.
fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}
