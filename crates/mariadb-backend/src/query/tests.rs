use super::*;

#[test]
fn test_select_basic() {
    let sql = SelectQuery::new("t").fields(["a", "b"]).to_sql();
    assert_eq!(sql, "SELECT a, b FROM t");
}

#[test]
fn test_all_clauses_in_fixed_order() {
    let sql = SelectQuery::new("`t`")
        .sample_seconds(5)
        .limit(10)
        .offset(20)
        .order_by(["`a` DESC"])
        .group_by(["`a`"])
        .filter("`a` > 1")
        .filter("`b` IS NOT NULL")
        .field("`a`")
        .to_sql();

    assert_eq!(
        sql,
        "SELECT `a` FROM `t` WHERE `a` > 1 AND `b` IS NOT NULL GROUP BY `a` \
         ORDER BY `a` DESC OFFSET 20 LIMIT 10 SAMPLE 5 SECOND"
    );
}

#[test]
fn test_zero_paging_values_are_rendered() {
    let sql = SelectQuery::new("t").field("a").offset(0).limit(0).to_sql();
    assert_eq!(sql, "SELECT a FROM t OFFSET 0 LIMIT 0");
}

#[test]
fn test_empty_fields_render_incomplete_statement() {
    let sql = SelectQuery::new("t").to_sql();
    assert_eq!(sql, "SELECT  FROM t");
}

#[test]
fn test_filter_contents_are_not_escaped() {
    let sql = SelectQuery::new("t").field("a").filter("name = 'O''Brien'").to_sql();
    assert_eq!(sql, "SELECT a FROM t WHERE name = 'O''Brien'");
}

#[test]
fn test_create_sql_query_omits_missing_clauses() {
    let sql = create_sql_query("t", &["a"], &[], &[], &[], None, Some(3), None);
    assert_eq!(sql, "SELECT a FROM t LIMIT 3");

    let sql = create_sql_query(
        "t",
        &["a", "COUNT(*)"],
        &["a > 0"],
        &["a"],
        &["a"],
        Some(1),
        Some(2),
        Some(30),
    );
    assert_eq!(
        sql,
        "SELECT a, COUNT(*) FROM t WHERE a > 0 GROUP BY a ORDER BY a OFFSET 1 LIMIT 2 SAMPLE 30 SECOND"
    );
}

#[test]
fn test_display_matches_to_sql() {
    let q = SelectQuery::new("t").field("a").limit(1);
    assert_eq!(q.to_string(), q.to_sql());
    assert_eq!(q.table(), "t");
    assert_eq!(q.projection(), ["a".to_string()]);
}

#[test]
fn test_distinct_values_query() {
    let sql = distinct_values_query("color", "`shop`.`items`");
    assert_eq!(
        sql,
        "SELECT `color` FROM `shop`.`items` GROUP BY `color` ORDER BY `color` LIMIT 21"
    );
}

#[test]
fn test_distinct_values_query_escapes_field() {
    let sql = distinct_values_query("a`b", "t");
    assert_eq!(sql, "SELECT `a``b` FROM t GROUP BY `a``b` ORDER BY `a``b` LIMIT 21");
}

#[test]
fn test_list_tables_query_without_schema() {
    let sql = list_tables_query(None);
    assert!(sql.starts_with("SELECT TABLE_SCHEMA AS \"Schema\""));
    assert!(sql.contains("FROM information_schema.TABLES"));
    assert!(sql.contains("WHERE TABLE_TYPE = 'BASE TABLE'"));
    assert!(!sql.contains("AND TABLE_SCHEMA"));
    assert!(sql.ends_with("ORDER BY TABLE_SCHEMA, TABLE_NAME"));
}

#[test]
fn test_list_tables_query_with_schema() {
    let sql = list_tables_query(Some("shop"));
    assert!(sql.contains("WHERE TABLE_TYPE = 'BASE TABLE'\n  AND TABLE_SCHEMA = 'shop'"));
    let order = sql.find("ORDER BY").unwrap();
    let filter = sql.find("AND TABLE_SCHEMA").unwrap();
    assert!(filter < order);
}
