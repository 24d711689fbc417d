//! SELECT statement assembly.
//!
//! [`SelectQuery`] is a value object holding the structural fragments of a
//! scan (projection, filters, grouping, ordering, paging, sampling). Rendering
//! is pure string construction with a fixed clause order:
//!
//! ```text
//! SELECT … FROM … [WHERE …] [GROUP BY …] [ORDER BY …] [OFFSET …] [LIMIT …] [SAMPLE … SECOND]
//! ```
//!
//! Filters, projections and the table reference are emitted verbatim. Callers
//! are responsible for passing well-formed predicates and quoted identifiers;
//! only [`distinct_values_query`] quotes on its own.
//!
//! # Example
//!
//! ```
//! use mariadb_backend::SelectQuery;
//!
//! let sql = SelectQuery::new("`shop`.`orders`")
//!     .fields(["`id`", "(`total`)+0"])
//!     .filter("`status` = 'paid'")
//!     .order_by(["`id`"])
//!     .limit(100)
//!     .to_sql();
//!
//! assert_eq!(
//!     sql,
//!     "SELECT `id`, (`total`)+0 FROM `shop`.`orders` WHERE `status` = 'paid' ORDER BY `id` LIMIT 100"
//! );
//! ```

use crate::ident::quote_identifier;
use std::fmt;

/// Row cap of the distinct-values probe: 20 categories plus one sentinel row.
pub const DISTINCT_VALUES_LIMIT: u64 = 21;

/// Largest number of distinct values accepted as categories.
pub const MAX_DISTINCT_VALUES: usize = 20;

/// The fragments of a single SELECT statement.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectQuery {
    /// Table reference (already quoted or schema-qualified)
    table: String,
    /// Projection expressions
    fields: Vec<String>,
    /// WHERE predicates, ANDed
    filters: Vec<String>,
    /// GROUP BY expressions
    group_by: Vec<String>,
    /// ORDER BY expressions
    order_by: Vec<String>,
    /// OFFSET
    offset: Option<u64>,
    /// LIMIT
    limit: Option<u64>,
    /// SAMPLE n SECOND
    sample_seconds: Option<u64>,
}

impl SelectQuery {
    /// Start a query against `table`.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    // ==================== projection ====================

    /// Append one projection expression.
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.fields.push(field.into());
        self
    }

    /// Append projection expressions.
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    // ==================== WHERE ====================

    /// Append a filter predicate. Predicates are joined with `AND`.
    pub fn filter(mut self, predicate: impl Into<String>) -> Self {
        self.filters.push(predicate.into());
        self
    }

    /// Append several filter predicates.
    pub fn filters<I, S>(mut self, predicates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters.extend(predicates.into_iter().map(Into::into));
        self
    }

    // ==================== GROUP BY / ORDER BY ====================

    /// Append GROUP BY expressions.
    pub fn group_by<I, S>(mut self, exprs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_by.extend(exprs.into_iter().map(Into::into));
        self
    }

    /// Append ORDER BY expressions (direction included by the caller).
    pub fn order_by<I, S>(mut self, exprs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order_by.extend(exprs.into_iter().map(Into::into));
        self
    }

    // ==================== paging / sampling ====================

    /// Set OFFSET.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Set LIMIT.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Only scan for `seconds` seconds (`SAMPLE n SECOND`).
    pub fn sample_seconds(mut self, seconds: u64) -> Self {
        self.sample_seconds = Some(seconds);
        self
    }

    /// Set OFFSET, LIMIT and SAMPLE from optional values.
    pub fn paging(mut self, offset: Option<u64>, limit: Option<u64>, sample: Option<u64>) -> Self {
        self.offset = offset;
        self.limit = limit;
        self.sample_seconds = sample;
        self
    }

    // ==================== accessors ====================

    /// Table reference.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Projection expressions in order.
    pub fn projection(&self) -> &[String] {
        &self.fields
    }

    /// Render the SQL string.
    ///
    /// Never fails. An empty projection renders an incomplete statement
    /// (`SELECT  FROM t`) rather than being rejected.
    pub fn to_sql(&self) -> String {
        let mut sql = String::with_capacity(64);
        self.write_sql(&mut sql);
        sql
    }

    fn write_sql(&self, sql: &mut String) {
        sql.push_str("SELECT ");
        sql.push_str(&self.fields.join(", "));
        sql.push_str(" FROM ");
        sql.push_str(&self.table);

        if !self.filters.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.filters.join(" AND "));
        }

        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_by.join(", "));
        }

        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_by.join(", "));
        }

        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        if let Some(seconds) = self.sample_seconds {
            sql.push_str(&format!(" SAMPLE {seconds} SECOND"));
        }
    }
}

impl fmt::Display for SelectQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

/// Construct a SELECT statement from its fragments.
///
/// Empty `filters`, `group_by` and `order_by` slices omit their clauses;
/// `None` omits OFFSET, LIMIT and SAMPLE.
#[allow(clippy::too_many_arguments)]
pub fn create_sql_query(
    table: &str,
    fields: &[&str],
    filters: &[&str],
    group_by: &[&str],
    order_by: &[&str],
    offset: Option<u64>,
    limit: Option<u64>,
    sample_seconds: Option<u64>,
) -> String {
    SelectQuery::new(table)
        .fields(fields.iter().copied())
        .filters(filters.iter().copied())
        .group_by(group_by.iter().copied())
        .order_by(order_by.iter().copied())
        .paging(offset, limit, sample_seconds)
        .to_sql()
}

/// Query returning the distinct values of one column.
///
/// Groups and orders by the quoted column and caps the result at
/// [`DISTINCT_VALUES_LIMIT`] rows; a full result means "too many values".
pub fn distinct_values_query(field: &str, table: &str) -> String {
    let column = quote_identifier(field);
    SelectQuery::new(table)
        .field(column.as_str())
        .group_by([column.as_str()])
        .order_by([column.as_str()])
        .limit(DISTINCT_VALUES_LIMIT)
        .to_sql()
}

/// Query listing base tables, optionally restricted to one schema.
///
/// Returns two columns, `Schema` and `Name`, ordered by schema then name.
/// `schema` is interpolated as-is and must come from a trusted source.
pub fn list_tables_query(schema: Option<&str>) -> String {
    let schema_clause = match schema {
        Some(schema) => format!("\n  AND TABLE_SCHEMA = '{schema}'"),
        None => String::new(),
    };

    format!(
        r#"SELECT TABLE_SCHEMA AS "Schema",
       TABLE_NAME AS "Name"
FROM information_schema.TABLES
WHERE TABLE_TYPE = 'BASE TABLE'{schema_clause}
ORDER BY TABLE_SCHEMA, TABLE_NAME"#
    )
}

#[cfg(test)]
mod tests;
