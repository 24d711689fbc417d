//! The backend façade: one connection, scoped cursors, schema inspection.
//!
//! [`Backend`] exclusively owns its connection. Every statement runs through
//! [`Backend::execute`], which hands back a [`ScopedCursor`]; dropping the
//! guard releases the driver cursor, whether the caller finished normally,
//! returned early with `?`, or panicked. Driver failures are translated into
//! [`BackendError`] before the caller sees them.
//!
//! # Example
//!
//! ```rust,ignore
//! use mariadb_backend::{Backend, ConnectionParams, SelectQuery};
//! use std::collections::HashMap;
//!
//! let params = ConnectionParams::from_url("mysql://reader@localhost/shop")?;
//! let mut backend = Backend::connect(params)?;
//!
//! let vars = backend.scan_table("`shop`.`orders`", &HashMap::new(), true)?;
//! let fields: Vec<_> = vars.iter().filter_map(|v| v.to_sql()).collect();
//! let sql = SelectQuery::new("`shop`.`orders`").fields(fields).limit(10).to_sql();
//!
//! let rows = backend.execute(&sql, &[])?.fetch_all()?;
//! ```

use crate::config::ConnectionParams;
use crate::driver::{ColumnDescription, Connection, Cursor};
use crate::error::{BackendError, BackendResult, DriverError};
use crate::ident::quote_qualified;
use crate::inference::{self, DistinctValues, Probe};
use crate::monitor::{NoopHook, QueryContext, QueryHook, QueryResult};
use crate::query::{MAX_DISTINCT_VALUES, distinct_values_query, list_tables_query};
use crate::value::{Row, Value};
use crate::variable::Variable;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A base table found by [`Backend::list_tables`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDesc {
    pub schema: String,
    pub name: String,
    /// `` `schema`.`name` ``, ready to use as a table reference.
    pub qualified_name: String,
}

impl TableDesc {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        let schema = schema.into();
        let name = name.into();
        let qualified_name = quote_qualified(&schema, &name);
        Self {
            schema,
            name,
            qualified_name,
        }
    }
}

/// A cursor scoped to one statement.
///
/// Fetch errors are translated into [`BackendError`]. The underlying cursor is
/// closed and the hook notified when the guard is dropped.
pub struct ScopedCursor<'a, K: Cursor> {
    cursor: K,
    hook: &'a dyn QueryHook,
    ctx: QueryContext,
    started: Instant,
    fetched: usize,
    error: Option<String>,
}

impl<'a, K: Cursor> ScopedCursor<'a, K> {
    fn new(cursor: K, hook: &'a dyn QueryHook, ctx: QueryContext) -> Self {
        Self {
            cursor,
            hook,
            ctx,
            started: Instant::now(),
            fetched: 0,
            error: None,
        }
    }

    fn run(&mut self, params: &[Value]) -> BackendResult<()> {
        let result = self.cursor.execute(&self.ctx.sql, params);
        self.translate(result)
    }

    fn translate<T>(&mut self, result: Result<T, DriverError>) -> BackendResult<T> {
        result.map_err(|err| {
            let err = BackendError::from_driver(&err);
            self.error = Some(err.message().to_string());
            err
        })
    }

    /// Columns of the result set.
    pub fn description(&self) -> &[ColumnDescription] {
        self.cursor.description()
    }

    /// Column names of the result set.
    pub fn column_names(&self) -> Vec<&str> {
        self.description().iter().map(|c| c.name.as_str()).collect()
    }

    /// Fetch the next row, `None` when exhausted.
    pub fn fetch_one(&mut self) -> BackendResult<Option<Row>> {
        let result = self.cursor.fetch_one();
        let row = self.translate(result)?;
        if row.is_some() {
            self.fetched += 1;
        }
        Ok(row)
    }

    /// Fetch all remaining rows.
    pub fn fetch_all(&mut self) -> BackendResult<Vec<Row>> {
        let result = self.cursor.fetch_all();
        let rows = self.translate(result)?;
        self.fetched += rows.len();
        Ok(rows)
    }

    /// Rows fetched so far.
    pub fn fetched(&self) -> usize {
        self.fetched
    }

    /// The statement this cursor executed.
    pub fn sql(&self) -> &str {
        &self.ctx.sql
    }
}

impl<K: Cursor> Drop for ScopedCursor<'_, K> {
    fn drop(&mut self) {
        self.cursor.close();
        let result = match self.error.take() {
            Some(message) => QueryResult::error(&message),
            None => QueryResult::Rows(self.fetched),
        };
        self.hook.after_query(&self.ctx, self.started.elapsed(), &result);
    }
}

/// A MariaDB backend bound to one live connection.
pub struct Backend<C: Connection> {
    params: ConnectionParams,
    connection: C,
    hook: Arc<dyn QueryHook>,
}

impl<C: Connection> Backend<C> {
    /// Human-readable name of this backend.
    pub const DISPLAY_NAME: &'static str = "MariaDB";

    /// Wrap an already open connection.
    pub fn with_connection(params: ConnectionParams, connection: C) -> Self {
        Self {
            params,
            connection,
            hook: Arc::new(NoopHook),
        }
    }

    /// Install a query hook.
    pub fn with_hook<H: QueryHook + 'static>(mut self, hook: H) -> Self {
        self.hook = Arc::new(hook);
        self
    }

    /// Install an Arc-wrapped query hook.
    pub fn with_hook_arc(mut self, hook: Arc<dyn QueryHook>) -> Self {
        self.hook = hook;
        self
    }

    /// Normalized connection parameters.
    pub fn params(&self) -> &ConnectionParams {
        &self.params
    }

    /// The underlying connection.
    pub fn connection(&self) -> &C {
        &self.connection
    }

    /// Consume the backend, returning its connection.
    pub fn into_connection(self) -> C {
        self.connection
    }

    /// Execute `sql` with positional `params` and return a scoped cursor.
    ///
    /// ```rust,ignore
    /// let mut cur = backend.execute("SELECT `id` FROM `t` WHERE `k` = ?", &["x".into()])?;
    /// while let Some(row) = cur.fetch_one()? {
    ///     println!("{row:?}");
    /// }
    /// // cursor released here
    /// ```
    pub fn execute(
        &mut self,
        sql: &str,
        params: &[Value],
    ) -> BackendResult<ScopedCursor<'_, C::Cursor<'_>>> {
        self.execute_ctx(QueryContext::new(sql, params.len()), params)
    }

    /// Like [`Backend::execute`], tagging the statement for hooks.
    pub fn execute_tagged(
        &mut self,
        tag: &str,
        sql: &str,
        params: &[Value],
    ) -> BackendResult<ScopedCursor<'_, C::Cursor<'_>>> {
        self.execute_ctx(QueryContext::new(sql, params.len()).with_tag(tag), params)
    }

    fn execute_ctx(
        &mut self,
        ctx: QueryContext,
        params: &[Value],
    ) -> BackendResult<ScopedCursor<'_, C::Cursor<'_>>> {
        let hook: &dyn QueryHook = &*self.hook;
        hook.before_query(&ctx);

        let cursor = match self.connection.cursor() {
            Ok(cursor) => cursor,
            Err(err) => {
                let err = BackendError::from_driver(&err);
                hook.after_query(&ctx, Duration::ZERO, &QueryResult::error(err.message()));
                return Err(err);
            }
        };

        let mut scoped = ScopedCursor::new(cursor, hook, ctx);
        scoped.run(params)?;
        Ok(scoped)
    }

    /// Run `sql` and hand the cursor to `consume`; the cursor is released
    /// when `consume` returns, whatever the outcome.
    pub fn with_query<'a, T, F>(
        &'a mut self,
        sql: &str,
        params: &[Value],
        consume: F,
    ) -> BackendResult<T>
    where
        F: FnOnce(&mut ScopedCursor<'a, C::Cursor<'a>>) -> BackendResult<T>,
    {
        let mut cursor = self.execute(sql, params)?;
        consume(&mut cursor)
    }

    /// Distinct values of `field` in `table`, as text.
    ///
    /// Returns an empty list when the column has more than
    /// [`MAX_DISTINCT_VALUES`] distinct values. Every returned row yields one
    /// value; NULL renders as `NULL`.
    pub fn get_distinct_values(&mut self, field: &str, table: &str) -> BackendResult<Vec<String>> {
        let sql = distinct_values_query(field, table);
        let rows = self.execute_tagged("distinct_values", &sql, &[])?.fetch_all()?;
        if rows.len() > MAX_DISTINCT_VALUES {
            return Ok(Vec::new());
        }
        Ok(rows
            .iter()
            .map(|row| row.first().unwrap_or(&Value::Null).to_string())
            .collect())
    }

    /// Build the variable for one column.
    ///
    /// With `probe_table`, integer and character columns are probed for
    /// distinct values in that table; probe failures propagate.
    pub fn create_variable(
        &mut self,
        field_name: &str,
        field_metadata: &ColumnDescription,
        overrides: &HashMap<String, Variable>,
        probe_table: Option<&str>,
    ) -> BackendResult<Variable> {
        let probe = match probe_table {
            Some(table) => Some(Probe::new(self as &mut dyn DistinctValues, table)),
            None => None,
        };
        inference::create_variable(field_name, field_metadata, overrides, probe)
    }

    /// List base tables, optionally within one schema.
    pub fn list_tables(&mut self, schema: Option<&str>) -> BackendResult<Vec<TableDesc>> {
        let sql = list_tables_query(schema);
        let rows = self.execute_tagged("list_tables", &sql, &[])?.fetch_all()?;
        Ok(rows
            .iter()
            .filter_map(|row| match row.as_slice() {
                [schema, name, ..] => Some(TableDesc::new(schema.to_text()?, name.to_text()?)),
                _ => None,
            })
            .collect())
    }

    /// Column metadata of an arbitrary query, without fetching rows.
    pub fn get_fields(&mut self, query: &str) -> BackendResult<Vec<ColumnDescription>> {
        let sql = format!("SELECT * FROM ({query}) AS t LIMIT 0");
        let cursor = self.execute_tagged("get_fields", &sql, &[])?;
        Ok(cursor.description().to_vec())
    }

    /// Planner row estimate for `query`, from `EXPLAIN`.
    ///
    /// `None` when the plan has no usable `rows` column.
    pub fn count_approx(&mut self, query: &str) -> BackendResult<Option<u64>> {
        let sql = format!("EXPLAIN {query}");
        let mut cursor = self.execute_tagged("count_approx", &sql, &[])?;
        let Some(idx) = cursor
            .description()
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case("rows"))
        else {
            return Ok(None);
        };
        let row = cursor.fetch_one()?;
        Ok(row.and_then(|row| row.get(idx).and_then(Value::as_u64)))
    }

    /// Infer a variable for every column of `table`.
    ///
    /// `table` is a table reference as accepted by [`SelectQuery`](crate::SelectQuery).
    /// With `probe`, ambiguous columns are probed against the same table.
    pub fn scan_table(
        &mut self,
        table: &str,
        overrides: &HashMap<String, Variable>,
        probe: bool,
    ) -> BackendResult<Vec<Variable>> {
        let columns = self.get_fields(&format!("SELECT * FROM {table}"))?;
        let probe_table = probe.then_some(table);
        columns
            .iter()
            .map(|column| self.create_variable(&column.name, column, overrides, probe_table))
            .collect()
    }
}

impl<C: Connection> DistinctValues for Backend<C> {
    fn distinct_values(&mut self, field: &str, table: &str) -> BackendResult<Vec<String>> {
        self.get_distinct_values(field, table)
    }
}

#[cfg(feature = "mysql")]
impl Backend<mysql::Conn> {
    /// Connect using normalized parameters.
    pub fn connect(params: ConnectionParams) -> BackendResult<Self> {
        let connection = crate::driver::mysql_driver::connect(&params)?;
        tracing::debug!(
            target: "mariadb_backend.connection",
            host = params.host.as_deref().unwrap_or("localhost"),
            port = params.port,
            database = params.database.as_deref().unwrap_or("-"),
            "connected"
        );
        Ok(Self::with_connection(params, connection))
    }

    /// Replace the connection with a fresh one opened from the stored parameters.
    pub fn reconnect(&mut self) -> BackendResult<()> {
        self.connection = crate::driver::mysql_driver::connect(&self.params)?;
        Ok(())
    }
}
