//! Integration tests for SQLite metadata introspection.
//!
//! Each test seeds a temp-file database through a plain writable connection,
//! then registers it read-only and runs describe calls against it.

use db_introspect::config::DataSourceConfig;
use db_introspect::db::SqlType;
use db_introspect::models::{NamespaceFilter, TableKind};
use db_introspect::{DataSourceRegistry, DbError, DbPool, DescribeRequest};
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Connection, SqliteConnection};
use tempfile::TempDir;

const SEED_SCHEMA: &[&str] = &[
    "CREATE TABLE user_account (
        user_account_id INTEGER PRIMARY KEY AUTOINCREMENT,
        email VARCHAR(120) NOT NULL,
        display_name VARCHAR(60),
        balance DECIMAL(10,2),
        created_at TIMESTAMP NOT NULL
    )",
    "CREATE TABLE order_line (
        order_id INTEGER NOT NULL,
        line_no INTEGER NOT NULL,
        sku VARCHAR(40) NOT NULL,
        quantity INTEGER NOT NULL,
        PRIMARY KEY (order_id, line_no)
    )",
    "CREATE VIEW active_account AS
        SELECT user_account_id, email FROM user_account",
];

/// Create a seeded database file and a registry with it registered as "acct".
async fn setup() -> (TempDir, DataSourceRegistry) {
    let dir = TempDir::new().expect("create temp dir");
    let db_path = dir.path().join("test.db");

    let options = SqliteConnectOptions::new()
        .filename(&db_path)
        .create_if_missing(true);
    let mut conn = SqliteConnection::connect_with(&options)
        .await
        .expect("open writable connection");
    for ddl in SEED_SCHEMA {
        sqlx::query(ddl).execute(&mut conn).await.expect("seed ddl");
    }
    conn.close().await.expect("close seed connection");

    let registry = DataSourceRegistry::new();
    let config = DataSourceConfig::parse(&format!("acct=sqlite://{}", db_path.display()))
        .expect("parse data source");
    registry.register(config).await.expect("register");

    (dir, registry)
}

#[tokio::test]
async fn test_describe_lists_tables_and_views() {
    let (_dir, registry) = setup().await;

    let info = registry
        .describe_database(Some("acct"), &DescribeRequest::new())
        .await
        .expect("describe");

    assert_eq!(info.product_name, "SQLite");
    assert!(!info.product_version.is_empty());

    let names: Vec<&str> = info.tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["active_account", "order_line", "user_account"]);

    let view = &info.tables[0];
    assert_eq!(view.table_kind, TableKind::View);
    assert_eq!(view.upper_camel_name, "ActiveAccount");

    let table = &info.tables[2];
    assert_eq!(table.table_kind, TableKind::Table);
    assert_eq!(table.upper_camel_name, "UserAccount");
}

#[tokio::test]
async fn test_describe_column_details() {
    let (_dir, registry) = setup().await;

    let info = registry
        .describe_database(Some("acct"), &DescribeRequest::new())
        .await
        .expect("describe");
    let table = info
        .tables
        .iter()
        .find(|t| t.name == "user_account")
        .expect("user_account present");

    assert_eq!(table.columns.len(), 5);

    let id = &table.columns[0];
    assert_eq!(id.name, "user_account_id");
    assert_eq!(id.lower_camel_name, "userAccountId");
    assert_eq!(id.ordinal_position, 1);
    assert_eq!(id.data_type, SqlType::Integer);
    assert!(id.autoincrement);
    assert_eq!(id.key_seq, Some(1));
    assert_eq!(id.rust_type.as_deref(), Some("i32"));

    let email = &table.columns[1];
    assert_eq!(email.data_type, SqlType::Varchar);
    assert_eq!(email.column_size, Some(120));
    assert!(!email.nullable);
    assert_eq!(email.rust_type.as_deref(), Some("String"));
    assert!(!email.autoincrement);
    assert!(email.key_seq.is_none());

    let display_name = &table.columns[2];
    assert!(display_name.nullable);

    let balance = &table.columns[3];
    assert_eq!(balance.data_type, SqlType::Decimal);
    assert_eq!(balance.column_size, Some(10));
    assert_eq!(balance.decimal_digits, Some(2));
    assert_eq!(balance.rust_type.as_deref(), Some("rust_decimal::Decimal"));

    let created_at = &table.columns[4];
    assert_eq!(created_at.data_type, SqlType::Timestamp);
    assert_eq!(created_at.rust_type.as_deref(), Some("chrono::NaiveDateTime"));
}

#[tokio::test]
async fn test_describe_composite_primary_key() {
    let (_dir, registry) = setup().await;

    let info = registry
        .describe_database(Some("acct"), &DescribeRequest::new())
        .await
        .expect("describe");
    let table = info
        .tables
        .iter()
        .find(|t| t.name == "order_line")
        .expect("order_line present");

    let order_id = table.columns.iter().find(|c| c.name == "order_id").unwrap();
    let line_no = table.columns.iter().find(|c| c.name == "line_no").unwrap();
    let sku = table.columns.iter().find(|c| c.name == "sku").unwrap();

    assert_eq!(order_id.key_seq, Some(1));
    assert_eq!(line_no.key_seq, Some(2));
    assert!(sku.key_seq.is_none());
    // Plain INTEGER PRIMARY KEY member without AUTOINCREMENT
    assert!(!order_id.autoincrement);
}

#[tokio::test]
async fn test_describe_table_name_pattern() {
    let (_dir, registry) = setup().await;

    let request = DescribeRequest::new().with_table_name_pattern("user%");
    let info = registry
        .describe_database(Some("acct"), &request)
        .await
        .expect("describe");

    assert_eq!(info.tables.len(), 1);
    assert_eq!(info.tables[0].name, "user_account");
}

#[tokio::test]
async fn test_describe_table_kind_filter() {
    let (_dir, registry) = setup().await;

    let tables_only = DescribeRequest::new().with_table_kinds(vec![TableKind::Table]);
    let info = registry
        .describe_database(Some("acct"), &tables_only)
        .await
        .expect("describe");
    assert!(info.tables.iter().all(|t| t.table_kind == TableKind::Table));
    assert_eq!(info.tables.len(), 2);

    let views_only = DescribeRequest::new().with_table_kinds(vec![TableKind::View]);
    let info = registry
        .describe_database(Some("acct"), &views_only)
        .await
        .expect("describe");
    assert_eq!(info.tables.len(), 1);
    assert_eq!(info.tables[0].name, "active_account");
}

#[tokio::test]
async fn test_describe_namespace_filters() {
    let (_dir, registry) = setup().await;

    // SQLite has no catalogs; an exact catalog filter matches nothing
    let request = DescribeRequest::new().with_catalog("main");
    let info = registry
        .describe_database(Some("acct"), &request)
        .await
        .expect("describe");
    assert!(info.tables.is_empty());
    assert_eq!(info.product_name, "SQLite");
    assert!(!info.product_version.is_empty());

    // A wildcard-only schema pattern still matches unqualified entries
    let request = DescribeRequest::new().with_schema_pattern("%");
    assert_eq!(request.schema_pattern, NamespaceFilter::Matching("%".into()));
    let info = registry
        .describe_database(Some("acct"), &request)
        .await
        .expect("describe");
    assert_eq!(info.tables.len(), 3);
}

#[tokio::test]
async fn test_describe_type_override() {
    let (_dir, registry) = setup().await;

    let request = DescribeRequest::new().with_type_override(SqlType::Integer, "u32");
    let info = registry
        .describe_database(Some("acct"), &request)
        .await
        .expect("describe");
    let table = info
        .tables
        .iter()
        .find(|t| t.name == "order_line")
        .expect("order_line present");
    let quantity = table.columns.iter().find(|c| c.name == "quantity").unwrap();

    assert_eq!(quantity.rust_type.as_deref(), Some("u32"));
    // Codes not overridden keep the default mapping
    let sku = table.columns.iter().find(|c| c.name == "sku").unwrap();
    assert_eq!(sku.rust_type.as_deref(), Some("String"));
}

#[tokio::test]
async fn test_describe_empty_table_kinds() {
    let (_dir, registry) = setup().await;

    // An explicit empty kind list matches nothing, but the call still succeeds
    let request = DescribeRequest::new().with_table_kinds(vec![]);
    let info = registry
        .describe_database(Some("acct"), &request)
        .await
        .expect("describe");

    assert!(info.tables.is_empty());
    assert_eq!(info.product_name, "SQLite");
    assert!(!info.product_version.is_empty());
}

#[tokio::test]
async fn test_failed_describe_releases_connection() {
    let dir = TempDir::new().expect("create temp dir");
    let db_path = dir.path().join("broken.db");

    // A view whose base table is gone makes the columns query error mid-call
    let options = SqliteConnectOptions::new()
        .filename(&db_path)
        .create_if_missing(true);
    let mut conn = SqliteConnection::connect_with(&options)
        .await
        .expect("open writable connection");
    sqlx::query("CREATE TABLE a (id INTEGER PRIMARY KEY)")
        .execute(&mut conn)
        .await
        .expect("create table");
    sqlx::query("CREATE VIEW v AS SELECT id FROM a")
        .execute(&mut conn)
        .await
        .expect("create view");
    sqlx::query("DROP TABLE a")
        .execute(&mut conn)
        .await
        .expect("drop table");
    conn.close().await.expect("close seed connection");

    let registry = DataSourceRegistry::new();
    let config = DataSourceConfig::parse(&format!("broken=sqlite://{}", db_path.display()))
        .expect("parse data source");
    registry.register(config).await.expect("register");

    let result = registry
        .describe_database(Some("broken"), &DescribeRequest::new())
        .await;
    assert!(result.is_err());

    // Repair the schema; the single pooled connection must be back in the
    // pool for the retry to acquire it
    let mut conn = SqliteConnection::connect_with(&options)
        .await
        .expect("reopen writable connection");
    sqlx::query("CREATE TABLE a (id INTEGER PRIMARY KEY)")
        .execute(&mut conn)
        .await
        .expect("recreate table");
    conn.close().await.expect("close repair connection");

    let info = registry
        .describe_database(Some("broken"), &DescribeRequest::new())
        .await
        .expect("describe after repair");
    assert_eq!(info.tables.len(), 2);
}

#[tokio::test]
async fn test_acquire_timeout_reports_configured_value() {
    let dir = TempDir::new().expect("create temp dir");
    let db_path = dir.path().join("slow.db");

    let options = SqliteConnectOptions::new()
        .filename(&db_path)
        .create_if_missing(true);
    let mut conn = SqliteConnection::connect_with(&options)
        .await
        .expect("open writable connection");
    sqlx::query("CREATE TABLE t (id INTEGER PRIMARY KEY)")
        .execute(&mut conn)
        .await
        .expect("seed ddl");
    conn.close().await.expect("close seed connection");

    let registry = DataSourceRegistry::new();
    let config = DataSourceConfig::parse(&format!(
        "slow=sqlite://{}?acquire_timeout=1&max_connections=1",
        db_path.display()
    ))
    .expect("parse data source");
    registry.register(config).await.expect("register");

    // Hold the pool's only connection so describe has to wait it out
    let DbPool::SQLite(pool) = registry.resolve(Some("slow")).await.expect("resolve") else {
        panic!("expected a SQLite pool");
    };
    let _held = pool.acquire().await.expect("hold the only connection");

    let result = registry
        .describe_database(Some("slow"), &DescribeRequest::new())
        .await;
    match result {
        Err(DbError::Timeout {
            operation,
            elapsed_secs,
        }) => {
            assert!(operation.contains("acquire"));
            assert_eq!(elapsed_secs, 1);
        }
        other => panic!("expected a timeout, got {:?}", other),
    }
}

#[tokio::test]
async fn test_describe_default_source_resolution() {
    let (_dir, registry) = setup().await;

    // First registered source is the primary
    for alias in [None, Some(""), Some("default")] {
        let info = registry
            .describe_database(alias, &DescribeRequest::new())
            .await
            .expect("describe via default alias");
        assert_eq!(info.tables.len(), 3);
    }

    let result = registry
        .describe_database(Some("missing"), &DescribeRequest::new())
        .await;
    assert!(matches!(result, Err(DbError::DataSourceNotFound { .. })));
}

#[tokio::test]
async fn test_describe_releases_connection_between_calls() {
    let (_dir, registry) = setup().await;

    // SQLite pools default to a single connection; back-to-back calls only
    // work if each call returns its connection to the pool.
    for _ in 0..3 {
        let info = registry
            .describe_database(Some("acct"), &DescribeRequest::new())
            .await
            .expect("describe");
        assert_eq!(info.tables.len(), 3);
    }

    registry.close_all().await;
    assert_eq!(registry.source_count().await, 0);
}
