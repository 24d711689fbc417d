mod support;

use mariadb_backend::{
    BackendError, DriverError, QueryContext, QueryHook, QueryResult, StatsHook, TypeCode, Value,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use support::{Script, refusing, scripted};

/// Records every hook callback in order.
#[derive(Default)]
struct Journal {
    events: Mutex<Vec<String>>,
}

impl Journal {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl QueryHook for Journal {
    fn before_query(&self, ctx: &QueryContext) {
        let tag = ctx.tag.clone().unwrap_or_default();
        self.events.lock().unwrap().push(format!("before {tag} {}", ctx.sql));
    }

    fn after_query(&self, _ctx: &QueryContext, _duration: Duration, result: &QueryResult) {
        self.events.lock().unwrap().push(format!("after {result}"));
    }
}

#[test]
fn cursor_released_after_success() {
    let (mut backend, ledger) = scripted(vec![
        Script::columns(&[("n", TypeCode::LONG)]).rows(vec![vec![Value::Int(7)]]),
    ]);

    let rows = backend.execute("SELECT 7 AS n", &[]).unwrap().fetch_all().unwrap();
    assert_eq!(rows, vec![vec![Value::Int(7)]]);
    assert_eq!(ledger.live(), 0);
}

#[test]
fn cursor_released_after_mid_fetch_error() {
    let (mut backend, ledger) = scripted(vec![
        Script::columns(&[("n", TypeCode::LONG)])
            .text(&["1", "2", "3"])
            .fail_after(2),
    ]);

    let mut seen = Vec::new();
    let result: Result<(), BackendError> = backend.with_query("SELECT n FROM t", &[], |cursor| {
        assert_eq!(ledger.live(), 1);
        while let Some(row) = cursor.fetch_one()? {
            seen.push(row);
        }
        Ok(())
    });

    let err = result.unwrap_err();
    assert_eq!(seen.len(), 2);
    assert_eq!(err.message(), "Lost connection to server during query");
    assert_eq!(ledger.live(), 0);
}

#[test]
fn cursor_released_after_execute_error() {
    let (mut backend, ledger) = scripted(vec![Script::error(DriverError::new(
        "You have an error in your SQL syntax",
    ))]);

    let err = backend.execute("SELEKT 1", &[]).err().unwrap();
    assert_eq!(err.to_string(), "You have an error in your SQL syntax");
    assert_eq!(ledger.live(), 0);
    assert_eq!(ledger.statements(), vec!["SELEKT 1"]);
}

#[test]
fn cursor_released_when_consumer_bails_early() {
    let (mut backend, ledger) = scripted(vec![
        Script::columns(&[("n", TypeCode::LONG)]).text(&["1", "2"]),
    ]);

    let result: Result<(), BackendError> = backend.with_query("SELECT n FROM t", &[], |cursor| {
        cursor.fetch_one()?;
        Err(BackendError::new("caller gave up"))
    });

    assert_eq!(result.unwrap_err().message(), "caller gave up");
    assert_eq!(ledger.live(), 0);
}

#[test]
fn cursor_acquire_failure_is_translated() {
    let journal = Arc::new(Journal::default());
    let (backend, ledger) = refusing(DriverError::new(""));
    let mut backend = backend.with_hook_arc(journal.clone());

    let err = backend.execute("SELECT 1", &[]).err().unwrap();
    assert_eq!(err.message(), "unknown database error");
    assert_eq!(ledger.live(), 0);
    assert_eq!(
        journal.events(),
        vec!["before  SELECT 1", "after error: unknown database error"]
    );
}

#[test]
fn hook_notified_once_per_statement() {
    let journal = Arc::new(Journal::default());
    let (backend, _ledger) = scripted(vec![
        Script::columns(&[("n", TypeCode::LONG)]).text(&["1", "2"]),
        Script::columns(&[("f", TypeCode::VAR_STRING)]).text(&["a"]),
    ]);
    let mut backend = backend.with_hook_arc(journal.clone());

    backend
        .with_query("SELECT n FROM t", &[], |cursor| cursor.fetch_all())
        .unwrap();
    backend.get_distinct_values("f", "`t`").unwrap();

    assert_eq!(
        journal.events(),
        vec![
            "before  SELECT n FROM t".to_string(),
            "after 2 rows".to_string(),
            "before distinct_values SELECT `f` FROM `t` GROUP BY `f` ORDER BY `f` LIMIT 21"
                .to_string(),
            "after 1 rows".to_string(),
        ]
    );
}

#[test]
fn stats_hook_counts_failures() {
    let stats = Arc::new(StatsHook::new());
    let (backend, ledger) = scripted(vec![
        Script::columns(&[("n", TypeCode::LONG)]).text(&["1", "2", "3"]),
        Script::columns(&[("n", TypeCode::LONG)]).text(&["1"]).fail_after(0),
    ]);
    let mut backend = backend.with_hook_arc(stats.clone());

    backend
        .with_query("SELECT n FROM a", &[], |cursor| cursor.fetch_all())
        .unwrap();
    backend
        .with_query("SELECT n FROM b", &[], |cursor| cursor.fetch_all())
        .unwrap_err();

    let snapshot = stats.stats();
    assert_eq!(snapshot.total_queries, 2);
    assert_eq!(snapshot.failed_queries, 1);
    assert_eq!(snapshot.rows_fetched, 3);
    assert_eq!(ledger.live(), 0);
}

#[test]
fn positional_params_reach_the_driver() {
    let (mut backend, ledger) = scripted(vec![Script::columns(&[("id", TypeCode::LONGLONG)])]);

    let cursor = backend
        .execute(
            "SELECT `id` FROM `orders` WHERE `status` = ? AND `total` > ?",
            &["paid".into(), 10.5.into()],
        )
        .unwrap();
    assert_eq!(cursor.column_names(), vec!["id"]);
    drop(cursor);

    assert_eq!(ledger.live(), 0);
    assert_eq!(ledger.statements().len(), 1);
}
