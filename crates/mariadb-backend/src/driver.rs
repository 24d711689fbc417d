//! Database driver seam.
//!
//! The backend talks to the database only through [`Connection`] and
//! [`Cursor`]. A binding for the `mysql` crate is provided behind the `mysql`
//! feature; tests plug in fakes.

use crate::error::DriverError;
use crate::type_code::TypeCode;
use crate::value::{Row, Value};
use serde::{Deserialize, Serialize};

#[cfg(feature = "mysql")]
pub mod mysql_driver;

/// Metadata of one result column.
///
/// Only `type_code` drives schema inference; the rest is informational.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescription {
    pub name: String,
    pub type_code: TypeCode,
    /// Declared column length (display width for numerics).
    pub length: u32,
    /// Digits after the decimal point.
    pub decimals: u8,
    pub nullable: bool,
}

impl ColumnDescription {
    pub fn new(name: impl Into<String>, type_code: impl Into<TypeCode>) -> Self {
        Self {
            name: name.into(),
            type_code: type_code.into(),
            length: 0,
            decimals: 0,
            nullable: true,
        }
    }
}

/// A cursor over one statement's results.
pub trait Cursor {
    /// Execute `sql`, binding `params` positionally.
    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<(), DriverError>;

    /// Columns of the current result set; empty before `execute`.
    fn description(&self) -> &[ColumnDescription];

    /// Fetch the next row, `None` when exhausted.
    fn fetch_one(&mut self) -> Result<Option<Row>, DriverError>;

    /// Fetch all remaining rows.
    fn fetch_all(&mut self) -> Result<Vec<Row>, DriverError> {
        let mut rows = Vec::new();
        while let Some(row) = self.fetch_one()? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Release server-side resources. Must be idempotent.
    fn close(&mut self) {}
}

/// A live database connection handing out cursors.
pub trait Connection {
    type Cursor<'c>: Cursor
    where
        Self: 'c;

    /// Open a cursor borrowing this connection.
    fn cursor(&mut self) -> Result<Self::Cursor<'_>, DriverError>;
}
