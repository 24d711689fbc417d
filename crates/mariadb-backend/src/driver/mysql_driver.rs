//! [`Connection`] binding for the synchronous `mysql` crate.
//!
//! Result sets are read eagerly when a statement executes, so a
//! [`MysqlCursor`] never holds a half-consumed stream on the connection.

use super::{ColumnDescription, Connection, Cursor};
use crate::config::ConnectionParams;
use crate::error::DriverError;
use crate::type_code::TypeCode;
use crate::value::{Row, Value};
use mysql::consts::ColumnFlags;
use mysql::prelude::Queryable;
use mysql::{Column, Conn, OptsBuilder, Params};
use std::collections::VecDeque;
use std::time::Duration;

/// Open a connection from normalized parameters.
pub fn connect(params: &ConnectionParams) -> Result<Conn, DriverError> {
    Conn::new(opts_from_params(params)).map_err(driver_error)
}

fn opts_from_params(params: &ConnectionParams) -> OptsBuilder {
    let mut opts = OptsBuilder::new()
        .ip_or_hostname(params.host.clone())
        .tcp_port(params.port)
        .user(params.user.clone())
        .pass(params.password.clone())
        .db_name(params.database.clone());

    for (key, value) in &params.options {
        match key.as_str() {
            "socket" => opts = opts.socket(Some(value.clone())),
            "connect_timeout" => match value.parse::<u64>() {
                Ok(secs) => opts = opts.tcp_connect_timeout(Some(Duration::from_secs(secs))),
                Err(_) => tracing::warn!(
                    target: "mariadb_backend.config",
                    value = %value,
                    "ignoring non-numeric connect_timeout"
                ),
            },
            other => tracing::debug!(
                target: "mariadb_backend.config",
                option = other,
                "connection option not understood by the mysql driver; ignored"
            ),
        }
    }
    opts
}

/// Cursor over a `mysql::Conn`.
pub struct MysqlCursor<'c> {
    conn: &'c mut Conn,
    columns: Vec<ColumnDescription>,
    rows: VecDeque<Row>,
}

impl<'c> MysqlCursor<'c> {
    fn new(conn: &'c mut Conn) -> Self {
        Self {
            conn,
            columns: Vec::new(),
            rows: VecDeque::new(),
        }
    }

    fn run(&mut self, sql: &str, params: &[Value]) -> mysql::Result<()> {
        if params.is_empty() {
            let mut result = self.conn.query_iter(sql)?;
            self.columns = describe(result.columns().as_ref());
            self.rows = buffer(&mut result)?;
        } else {
            let bound = Params::Positional(params.iter().map(to_mysql_value).collect());
            let mut result = self.conn.exec_iter(sql, bound)?;
            self.columns = describe(result.columns().as_ref());
            self.rows = buffer(&mut result)?;
        }
        Ok(())
    }
}

impl Cursor for MysqlCursor<'_> {
    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<(), DriverError> {
        self.close();
        self.run(sql, params).map_err(driver_error)
    }

    fn description(&self) -> &[ColumnDescription] {
        &self.columns
    }

    fn fetch_one(&mut self) -> Result<Option<Row>, DriverError> {
        Ok(self.rows.pop_front())
    }

    fn fetch_all(&mut self) -> Result<Vec<Row>, DriverError> {
        Ok(self.rows.drain(..).collect())
    }

    fn close(&mut self) {
        self.columns.clear();
        self.rows.clear();
    }
}

impl Connection for Conn {
    type Cursor<'c> = MysqlCursor<'c>;

    fn cursor(&mut self) -> Result<MysqlCursor<'_>, DriverError> {
        Ok(MysqlCursor::new(self))
    }
}

fn describe(columns: &[Column]) -> Vec<ColumnDescription> {
    columns
        .iter()
        .map(|col| ColumnDescription {
            name: col.name_str().into_owned(),
            type_code: TypeCode(col.column_type() as u8),
            length: col.column_length(),
            decimals: col.decimals(),
            nullable: !col.flags().contains(ColumnFlags::NOT_NULL_FLAG),
        })
        .collect()
}

fn buffer<I>(rows: I) -> mysql::Result<VecDeque<Row>>
where
    I: Iterator<Item = mysql::Result<mysql::Row>>,
{
    rows.map(|row| {
        row.map(|row| {
            row.unwrap_raw()
                .into_iter()
                .map(|cell| cell.map_or(Value::Null, from_mysql_value))
                .collect()
        })
    })
    .collect()
}

fn driver_error(err: mysql::Error) -> DriverError {
    match &err {
        mysql::Error::MySqlError(server) => {
            DriverError::server(err.to_string(), server.code, server.message.clone())
        }
        _ => DriverError::new(err.to_string()),
    }
}

fn from_mysql_value(value: mysql::Value) -> Value {
    match value {
        mysql::Value::NULL => Value::Null,
        mysql::Value::Bytes(bytes) => match String::from_utf8(bytes) {
            Ok(text) => Value::Text(text),
            Err(err) => Value::Bytes(err.into_bytes()),
        },
        mysql::Value::Int(v) => Value::Int(v),
        mysql::Value::UInt(v) => Value::UInt(v),
        mysql::Value::Float(v) => Value::Float(f64::from(v)),
        mysql::Value::Double(v) => Value::Float(v),
        mysql::Value::Date(y, mo, d, h, mi, s, us) => Value::Date(y, mo, d, h, mi, s, us),
        mysql::Value::Time(neg, days, h, mi, s, us) => Value::Time(neg, days, h, mi, s, us),
    }
}

fn to_mysql_value(value: &Value) -> mysql::Value {
    match value {
        Value::Null => mysql::Value::NULL,
        Value::Int(v) => mysql::Value::Int(*v),
        Value::UInt(v) => mysql::Value::UInt(*v),
        Value::Float(v) => mysql::Value::Double(*v),
        Value::Text(s) => mysql::Value::Bytes(s.clone().into_bytes()),
        Value::Bytes(b) => mysql::Value::Bytes(b.clone()),
        Value::Date(y, mo, d, h, mi, s, us) => {
            mysql::Value::Date(*y, *mo, *d, *h, *mi, *s, *us)
        }
        Value::Time(neg, days, h, mi, s, us) => mysql::Value::Time(*neg, *days, *h, *mi, *s, *us),
    }
}
