//! # mariadb-backend
//!
//! A MariaDB/MySQL SQL backend for tabular data sources.
//!
//! ## Features
//!
//! - **SELECT assembly**: fixed clause order, OFFSET/LIMIT paging, optional `SAMPLE n SECOND` clause
//! - **Scoped execution**: every cursor is released when its guard drops, errors included
//! - **Schema inference**: column type codes become continuous, discrete, time or string variables
//! - **Query monitoring**: timing, logging and statistics through pluggable hooks
//! - **Configuration**: connection parameters from maps, URLs or TOML
//!
//! ## Query Builder
//!
//! ```
//! use mariadb_backend::SelectQuery;
//!
//! let sql = SelectQuery::new("`shop`.`orders`")
//!     .fields(["`id`", "(`price`)+0"])
//!     .filter("`status` = 'paid'")
//!     .order_by(["`id`"])
//!     .limit(10)
//!     .to_sql();
//!
//! assert_eq!(
//!     sql,
//!     "SELECT `id`, (`price`)+0 FROM `shop`.`orders` WHERE `status` = 'paid' ORDER BY `id` LIMIT 10"
//! );
//! ```
//!
//! ## Backend
//!
//! ```ignore
//! use mariadb_backend::{Backend, ConnectionParams, TracingSqlHook};
//! use std::collections::HashMap;
//!
//! let params = ConnectionParams::from_url("mariadb://reader:secret@db:3306/shop")?;
//! let mut backend = Backend::connect(params)?.with_hook(TracingSqlHook::new());
//!
//! for table in backend.list_tables(Some("shop"))? {
//!     let vars = backend.scan_table(&table.qualified_name, &HashMap::new(), true)?;
//!     println!("{}: {} columns", table.name, vars.len());
//! }
//! ```

pub mod backend;
pub mod config;
pub mod driver;
pub mod error;
pub mod ident;
pub mod inference;
pub mod monitor;
pub mod query;
pub mod type_code;
pub mod value;
pub mod variable;

pub use backend::{Backend, ScopedCursor, TableDesc};
pub use config::{ConfigError, ConnectionParams, DEFAULT_PORT};
pub use driver::{ColumnDescription, Connection, Cursor};
pub use error::{BackendError, BackendResult, DriverError};
pub use ident::{quote_identifier, unquote_identifier};
pub use inference::{DistinctValues, Probe, RULES};
pub use monitor::{
    CompositeHook, NoopHook, QueryContext, QueryHook, QueryResult, QueryStats, StatsHook,
    TracingSqlHook,
};
pub use query::{SelectQuery, create_sql_query, distinct_values_query, list_tables_query};
pub use type_code::TypeCode;
pub use value::{Row, Value};
pub use variable::{Variable, VariableKind};

#[cfg(feature = "mysql")]
pub use mysql;
