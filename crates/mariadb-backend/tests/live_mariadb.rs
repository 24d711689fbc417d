//! Round trip against a real server. Runs only when `MARIADB_URL` is set.

use mariadb_backend::{
    Backend, BackendResult, CompositeHook, ConnectionParams, SelectQuery, StatsHook,
    TracingSqlHook, VariableKind, quote_identifier,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("mariadb_backend=debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

fn params_from_env() -> Option<ConnectionParams> {
    dotenvy::dotenv().ok();
    let url = match std::env::var("MARIADB_URL") {
        Ok(v) => v,
        Err(_) => {
            eprintln!("MARIADB_URL is not set; skipping live MariaDB test");
            return None;
        }
    };
    Some(ConnectionParams::from_url(&url).expect("MARIADB_URL must be a mysql:// or mariadb:// URL"))
}

#[test]
fn scan_probe_and_select() -> BackendResult<()> {
    let Some(params) = params_from_env() else {
        return Ok(());
    };
    init_tracing();

    let stats = Arc::new(StatsHook::new());
    let hook = CompositeHook::new()
        .add(TracingSqlHook::new())
        .add_arc(stats.clone());
    let mut backend = Backend::connect(params)?.with_hook(hook);

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before UNIX_EPOCH")
        .as_nanos();
    let table = format!("mariadb_backend_live_{}_{}", std::process::id(), nanos);
    let quoted = quote_identifier(&table);

    backend.execute(
        &format!(
            "CREATE TEMPORARY TABLE {quoted} (
                id BIGINT PRIMARY KEY,
                price DECIMAL(10, 2),
                paid BIT(1),
                sold DATE,
                size CHAR(4),
                note TEXT
            )"
        ),
        &[],
    )?;
    for (id, size) in [(1, "S"), (2, "M"), (3, "M")] {
        backend.execute(
            &format!("INSERT INTO {quoted} VALUES (?, 9.99, b'1', '2024-02-29', ?, 'n/a')"),
            &[id.into(), size.into()],
        )?;
    }

    let vars = backend.scan_table(&quoted, &HashMap::new(), true)?;
    let by_name: HashMap<_, _> = vars.iter().map(|v| (v.name(), v)).collect();

    assert_eq!(by_name["id"].values(), ["1", "2", "3"]);
    assert_eq!(by_name["price"].kind(), &VariableKind::Continuous);
    assert_eq!(by_name["paid"].values(), ["0", "1"]);
    assert!(by_name["sold"].is_time());
    assert_eq!(by_name["size"].values(), ["M", "S"]);
    assert_eq!(by_name["sold"].to_sql(), Some("UNIX_TIMESTAMP(`sold`)"));

    let fields: Vec<_> = vars.iter().filter_map(|v| v.to_sql()).collect();
    let sql = SelectQuery::new(quoted.as_str())
        .fields(fields)
        .order_by(["`id`"])
        .limit(2)
        .to_sql();
    let rows = backend.execute(&sql, &[])?.fetch_all()?;
    assert_eq!(rows.len(), 2);

    let err = backend
        .execute(&format!("SELECT nope FROM {quoted}"), &[])
        .err()
        .expect("unknown column must fail");
    assert!(err.message().contains("nope"));

    let snapshot = stats.stats();
    assert_eq!(snapshot.failed_queries, 1);
    Ok(())
}
