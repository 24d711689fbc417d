//! Scripted in-memory driver shared by the integration tests.

#![allow(dead_code)]

use mariadb_backend::{
    Backend, ColumnDescription, Connection, ConnectionParams, Cursor, DriverError, Row, TypeCode,
    Value,
};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

/// The scripted outcome of one statement.
#[derive(Debug, Clone, Default)]
pub struct Script {
    pub columns: Vec<ColumnDescription>,
    pub rows: Vec<Row>,
    pub execute_error: Option<DriverError>,
    /// Fail the fetch once this many rows have been returned.
    pub fail_after: Option<usize>,
}

impl Script {
    pub fn columns(columns: &[(&str, TypeCode)]) -> Self {
        Self {
            columns: columns
                .iter()
                .map(|(name, code)| ColumnDescription::new(*name, *code))
                .collect(),
            ..Self::default()
        }
    }

    pub fn rows(mut self, rows: Vec<Row>) -> Self {
        self.rows = rows;
        self
    }

    pub fn text(self, values: &[&str]) -> Self {
        self.rows(values.iter().map(|v| vec![Value::from(*v)]).collect())
    }

    pub fn fail_after(mut self, rows: usize) -> Self {
        self.fail_after = Some(rows);
        self
    }

    pub fn error(err: DriverError) -> Self {
        Self {
            execute_error: Some(err),
            ..Self::default()
        }
    }
}

/// Observable driver state, shared with the test body.
#[derive(Debug, Default)]
pub struct Ledger {
    /// Cursors currently open.
    pub live: Cell<usize>,
    /// Statements executed, in order.
    pub statements: RefCell<Vec<String>>,
}

impl Ledger {
    pub fn live(&self) -> usize {
        self.live.get()
    }

    pub fn statements(&self) -> Vec<String> {
        self.statements.borrow().clone()
    }
}

pub struct ScriptedConnection {
    scripts: VecDeque<Script>,
    ledger: Rc<Ledger>,
    /// Fail cursor acquisition with this error.
    pub refuse_cursor: Option<DriverError>,
}

pub struct ScriptedCursor<'c> {
    conn: &'c mut ScriptedConnection,
    script: Script,
    position: usize,
    open: bool,
}

impl Connection for ScriptedConnection {
    type Cursor<'c> = ScriptedCursor<'c>;

    fn cursor(&mut self) -> Result<ScriptedCursor<'_>, DriverError> {
        if let Some(err) = self.refuse_cursor.clone() {
            return Err(err);
        }
        let ledger = &self.ledger;
        ledger.live.set(ledger.live.get() + 1);
        Ok(ScriptedCursor {
            conn: self,
            script: Script::default(),
            position: 0,
            open: true,
        })
    }
}

impl Cursor for ScriptedCursor<'_> {
    fn execute(&mut self, sql: &str, _params: &[Value]) -> Result<(), DriverError> {
        self.conn.ledger.statements.borrow_mut().push(sql.to_string());
        self.script = self.conn.scripts.pop_front().unwrap_or_default();
        match self.script.execute_error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn description(&self) -> &[ColumnDescription] {
        &self.script.columns
    }

    fn fetch_one(&mut self) -> Result<Option<Row>, DriverError> {
        if self.script.fail_after == Some(self.position) {
            return Err(DriverError::server(
                "ERROR 2013 (HY000): Lost connection to server during query",
                2013,
                "Lost connection to server during query\n",
            ));
        }
        let row = self.script.rows.get(self.position).cloned();
        self.position += 1;
        Ok(row)
    }

    fn close(&mut self) {
        if self.open {
            self.open = false;
            let ledger = &self.conn.ledger;
            ledger.live.set(ledger.live.get() - 1);
        }
    }
}

/// A backend over scripted statements, plus its ledger.
pub fn scripted(scripts: Vec<Script>) -> (Backend<ScriptedConnection>, Rc<Ledger>) {
    let ledger = Rc::new(Ledger::default());
    let conn = ScriptedConnection {
        scripts: scripts.into(),
        ledger: Rc::clone(&ledger),
        refuse_cursor: None,
    };
    let params = ConnectionParams::new().host("db.internal").database("shop");
    (Backend::with_connection(params, conn), ledger)
}

/// A backend whose connection cannot hand out cursors.
pub fn refusing(err: DriverError) -> (Backend<ScriptedConnection>, Rc<Ledger>) {
    let (backend, ledger) = scripted(Vec::new());
    let mut conn = backend.into_connection();
    conn.refuse_cursor = Some(err);
    (Backend::with_connection(ConnectionParams::new(), conn), ledger)
}
