//! Database metadata introspection.
//!
//! This module implements the one-shot metadata read: acquire a single
//! connection, run three metadata queries (columns, primary keys, tables)
//! against the engine's system catalogs, and assemble the nested
//! `DatabaseInfo` → `TableInfo` → `ColumnInfo` result.
//!
//! # Architecture
//!
//! SQL queries are organized in the `queries` submodule with constants for
//! each database type. Database-specific implementations are in their
//! respective submodules (postgres, mysql, sqlite), each providing the same
//! interface. The call is all-or-nothing: any query failure propagates and
//! no partial result is returned. The acquired connection goes back to the
//! pool on every exit path.

use crate::db::pool::{DataSourceRegistry, DbPool};
use crate::db::types::TypeMap;
use crate::error::{DbError, DbResult};
use crate::models::{
    ColumnInfo, DatabaseInfo, DatabaseProduct, DescribeRequest, NamespaceFilter, TableKind,
};
use std::collections::HashMap;
use tracing::debug;

/// Metadata reader over a database-specific pool.
pub struct DatabaseInspector;

impl DatabaseInspector {
    /// Describe the tables and columns of the database behind `pool`.
    pub async fn describe_database(
        pool: &DbPool,
        request: &DescribeRequest,
    ) -> DbResult<DatabaseInfo> {
        let type_map = TypeMap::merged(&request.type_overrides);
        match pool {
            DbPool::Postgres(p) => postgres::describe_database(p, request, &type_map).await,
            DbPool::MySql(p) => mysql::describe_database(p, request, &type_map).await,
            DbPool::SQLite(p) => sqlite::describe_database(p, request, &type_map).await,
        }
    }
}

impl DataSourceRegistry {
    /// Describe the database behind a named data source.
    ///
    /// `None`, the empty string and `"default"` select the primary source.
    pub async fn describe_database(
        &self,
        data_source: Option<&str>,
        request: &DescribeRequest,
    ) -> DbResult<DatabaseInfo> {
        let pool = self.resolve(data_source).await?;
        DatabaseInspector::describe_database(&pool, request).await
    }
}

/// Apply the PostgreSQL schema accommodation: when the reported product is
/// PostgreSQL (case-insensitive), the schema pattern is forced to `public`
/// regardless of caller input, keeping system catalogs out of the result.
fn effective_schema_filter(product_name: &str, requested: NamespaceFilter) -> NamespaceFilter {
    match DatabaseProduct::from_product_name(product_name) {
        DatabaseProduct::PostgreSql => NamespaceFilter::Matching("public".to_string()),
        _ => requested,
    }
}

/// Acquire one pooled connection, reporting the pool's configured acquire
/// timeout when the wait is exhausted.
async fn acquire<DB: sqlx::Database>(
    pool: &sqlx::Pool<DB>,
) -> DbResult<sqlx::pool::PoolConnection<DB>> {
    pool.acquire().await.map_err(|e| match e {
        sqlx::Error::PoolTimedOut => DbError::timeout(
            "connection pool acquire",
            pool.options().get_acquire_timeout().as_secs() as u32,
        ),
        other => DbError::from(other),
    })
}

/// Two-level column lookup keyed by (table name, column name).
///
/// Preserves insertion order so each table's columns come back in the
/// relative order the columns query returned them.
#[derive(Debug, Default)]
struct ColumnIndex {
    entries: Vec<(String, ColumnInfo)>,
    by_key: HashMap<(String, String), usize>,
}

impl ColumnIndex {
    fn insert(&mut self, table: &str, column: ColumnInfo) {
        let key = (table.to_string(), column.name.clone());
        self.by_key.insert(key, self.entries.len());
        self.entries.push((table.to_string(), column));
    }

    /// Set the primary-key sequence on a (table, column) entry.
    /// Returns false on a lookup miss; misses are not errors.
    fn set_key_seq(&mut self, table: &str, column: &str, seq: u16) -> bool {
        match self.by_key.get(&(table.to_string(), column.to_string())) {
            Some(&i) => {
                self.entries[i].1.set_key_seq(seq);
                true
            }
            None => false,
        }
    }

    /// The columns recorded for `table`, in insertion order.
    fn columns_for_table(&self, table: &str) -> Vec<ColumnInfo> {
        self.entries
            .iter()
            .filter(|(t, _)| t == table)
            .map(|(_, c)| c.clone())
            .collect()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// information_schema table-type name for a kind (PostgreSQL/MySQL).
fn information_schema_kind(kind: TableKind) -> &'static str {
    match kind {
        TableKind::Table => "BASE TABLE",
        TableKind::View => "VIEW",
    }
}

// =============================================================================
// SQL Query Templates
// =============================================================================
//
// Centralized metadata queries. Each database has its own submodule with
// queries adapted to its specific system catalogs. Catalog and schema
// filters are tri-state: a NULL bind disables the predicate.

mod queries {
    pub mod postgres {
        pub const VERSION: &str = "SELECT current_setting('server_version')";

        pub const COLUMNS: &str = r#"
            SELECT
                c.table_name,
                c.column_name,
                c.data_type,
                c.character_maximum_length AS char_length,
                c.numeric_precision AS num_precision,
                c.numeric_scale AS num_scale,
                c.is_nullable,
                c.ordinal_position,
                CASE
                    WHEN c.is_identity = 'YES' OR c.column_default LIKE 'nextval(%' THEN 'YES'
                    ELSE 'NO'
                END AS is_autoincrement,
                col_description(
                    to_regclass(quote_ident(c.table_schema) || '.' || quote_ident(c.table_name)),
                    c.ordinal_position::int
                ) AS remarks
            FROM information_schema.columns c
            WHERE ($1::text IS NULL OR c.table_catalog = $1)
            AND ($2::text IS NULL OR c.table_schema LIKE $2)
            ORDER BY c.table_name, c.ordinal_position
            "#;

        pub const PRIMARY_KEYS: &str = r#"
            SELECT
                kcu.table_name,
                kcu.column_name,
                kcu.ordinal_position AS key_seq
            FROM information_schema.table_constraints tc
            JOIN information_schema.key_column_usage kcu
                ON tc.constraint_name = kcu.constraint_name
                AND tc.table_schema = kcu.table_schema
            WHERE tc.constraint_type = 'PRIMARY KEY'
            AND ($1::text IS NULL OR tc.table_catalog = $1)
            AND ($2::text IS NULL OR tc.table_schema LIKE $2)
            "#;

        pub const TABLES: &str = r#"
            SELECT
                t.table_catalog,
                t.table_schema,
                t.table_name,
                t.table_type,
                obj_description(
                    to_regclass(quote_ident(t.table_schema) || '.' || quote_ident(t.table_name))
                ) AS remarks
            FROM information_schema.tables t
            WHERE ($1::text IS NULL OR t.table_catalog = $1)
            AND ($2::text IS NULL OR t.table_schema LIKE $2)
            AND ($3::text IS NULL OR t.table_name LIKE $3)
            AND t.table_type = ANY($4)
            ORDER BY t.table_name
            "#;
    }

    pub mod mysql {
        pub const VERSION: &str = "SELECT version()";
        pub const CURRENT_DATABASE: &str = "SELECT DATABASE()";

        // The catalog filter maps to the database qualifier (TABLE_SCHEMA),
        // matching wire-driver convention. The third bind pair scopes to the
        // connected database when the caller applied no namespace filter.
        pub const COLUMNS: &str = r#"
            SELECT
                CONVERT(TABLE_NAME USING utf8) AS table_name,
                CONVERT(COLUMN_NAME USING utf8) AS column_name,
                CONVERT(DATA_TYPE USING utf8) AS type_name,
                CHARACTER_MAXIMUM_LENGTH AS char_length,
                NUMERIC_PRECISION AS num_precision,
                NUMERIC_SCALE AS num_scale,
                CONVERT(IS_NULLABLE USING utf8) AS is_nullable,
                ORDINAL_POSITION AS ordinal_position,
                CASE WHEN EXTRA LIKE '%auto_increment%' THEN 'YES' ELSE 'NO' END AS is_autoincrement,
                CONVERT(COLUMN_COMMENT USING utf8) AS remarks
            FROM information_schema.COLUMNS
            WHERE (? IS NULL OR TABLE_SCHEMA = ?)
            AND (? IS NULL OR TABLE_SCHEMA LIKE ?)
            AND (? IS NULL OR TABLE_SCHEMA = ?)
            ORDER BY TABLE_NAME, ORDINAL_POSITION
            "#;

        pub const PRIMARY_KEYS: &str = r#"
            SELECT
                CONVERT(TABLE_NAME USING utf8) AS table_name,
                CONVERT(COLUMN_NAME USING utf8) AS column_name,
                ORDINAL_POSITION AS key_seq
            FROM information_schema.KEY_COLUMN_USAGE
            WHERE CONSTRAINT_NAME = 'PRIMARY'
            AND (? IS NULL OR TABLE_SCHEMA = ?)
            AND (? IS NULL OR TABLE_SCHEMA LIKE ?)
            AND (? IS NULL OR TABLE_SCHEMA = ?)
            "#;

        // {kinds} is replaced with literal kind names from the TableKind enum.
        pub const TABLES: &str = r#"
            SELECT
                CONVERT(TABLE_SCHEMA USING utf8) AS table_schema,
                CONVERT(TABLE_NAME USING utf8) AS table_name,
                CONVERT(TABLE_TYPE USING utf8) AS table_type,
                CONVERT(TABLE_COMMENT USING utf8) AS remarks
            FROM information_schema.TABLES
            WHERE (? IS NULL OR TABLE_SCHEMA = ?)
            AND (? IS NULL OR TABLE_SCHEMA LIKE ?)
            AND (? IS NULL OR TABLE_SCHEMA = ?)
            AND (? IS NULL OR TABLE_NAME LIKE ?)
            AND TABLE_TYPE IN ({kinds})
            ORDER BY TABLE_NAME
            "#;
    }

    pub mod sqlite {
        pub const VERSION: &str = "SELECT sqlite_version()";

        pub const COLUMNS: &str = r#"
            SELECT
                m.name AS table_name,
                p.name AS column_name,
                p.type AS type_name,
                p."notnull" AS not_null,
                p.cid AS cid,
                CASE
                    WHEN p.pk = 1 AND lower(p.type) = 'integer'
                        AND m.sql LIKE '%AUTOINCREMENT%' THEN 'YES'
                    ELSE 'NO'
                END AS is_autoincrement
            FROM sqlite_master m
            JOIN pragma_table_info(m.name) p
            WHERE m.type IN ('table', 'view')
            AND m.name NOT LIKE 'sqlite_%'
            ORDER BY m.name, p.cid
            "#;

        pub const PRIMARY_KEYS: &str = r#"
            SELECT
                m.name AS table_name,
                p.name AS column_name,
                p.pk AS key_seq
            FROM sqlite_master m
            JOIN pragma_table_info(m.name) p
            WHERE m.type = 'table'
            AND m.name NOT LIKE 'sqlite_%'
            AND p.pk > 0
            ORDER BY m.name, p.pk
            "#;

        // {kinds} is replaced with literal kind names from the TableKind enum.
        pub const TABLES: &str = r#"
            SELECT name, type FROM sqlite_master
            WHERE type IN ({kinds})
            AND name NOT LIKE 'sqlite_%'
            AND (? IS NULL OR name LIKE ?)
            ORDER BY name
            "#;
    }
}

// =============================================================================
// Database-Specific Implementations
// =============================================================================

mod postgres {
    use super::*;
    use crate::models::TableInfo;
    use sqlx::{PgPool, Row};

    const PRODUCT_NAME: &str = "PostgreSQL";

    pub async fn describe_database(
        pool: &PgPool,
        request: &DescribeRequest,
        type_map: &TypeMap,
    ) -> DbResult<DatabaseInfo> {
        // One connection for the whole call; returned to the pool on drop.
        let mut conn = acquire(pool).await?;

        let product_version: String = sqlx::query_scalar(queries::postgres::VERSION)
            .fetch_one(&mut *conn)
            .await?;

        // An explicit empty kind list matches nothing
        let kinds = request.effective_table_kinds();
        if kinds.is_empty() {
            return Ok(DatabaseInfo {
                product_name: PRODUCT_NAME.to_string(),
                product_version,
                tables: Vec::new(),
            });
        }

        let schema = effective_schema_filter(PRODUCT_NAME, request.schema_pattern.clone());
        let catalog_param = request.catalog.as_sql_param();
        let schema_param = schema.as_sql_param();

        let mut index = ColumnIndex::default();
        let column_rows = sqlx::query(queries::postgres::COLUMNS)
            .bind(catalog_param.as_deref())
            .bind(schema_param.as_deref())
            .fetch_all(&mut *conn)
            .await?;
        for row in &column_rows {
            let table: String = row.get("table_name");
            let name: String = row.get("column_name");
            let type_name: String = row.get("data_type");
            let ordinal: i32 = row.get("ordinal_position");
            let char_length: Option<i32> = row.try_get("char_length").ok().flatten();
            let precision: Option<i32> = row.try_get("num_precision").ok().flatten();
            let scale: Option<i32> = row.try_get("num_scale").ok().flatten();
            let nullable: String = row.get("is_nullable");
            let autoincrement: String = row.get("is_autoincrement");
            let remarks: Option<String> = row.try_get("remarks").ok().flatten();

            let mut col = ColumnInfo::new(
                &name,
                crate::db::types::SqlType::from_type_name(&type_name),
                &type_name,
                ordinal as u32,
            )
            .with_nullable(nullable == "YES")
            .with_autoincrement(autoincrement == "YES")
            .resolve_type(type_map);

            if let Some(size) = char_length.or(precision) {
                col = col.with_size(size as u32);
            }
            if let Some(digits) = scale {
                col = col.with_decimal_digits(digits as u32);
            }
            if let Some(r) = remarks.filter(|r| !r.is_empty()) {
                col = col.with_remarks(r);
            }
            index.insert(&table, col);
        }
        debug!(count = index.len(), "Collected PostgreSQL columns");

        let pk_rows = sqlx::query(queries::postgres::PRIMARY_KEYS)
            .bind(catalog_param.as_deref())
            .bind(schema_param.as_deref())
            .fetch_all(&mut *conn)
            .await?;
        for row in &pk_rows {
            let table: String = row.get("table_name");
            let column: String = row.get("column_name");
            let seq: i32 = row.get("key_seq");
            // A miss means the column fell outside the filters; skip it.
            index.set_key_seq(&table, &column, seq as u16);
        }
        debug!(count = pk_rows.len(), "Collected PostgreSQL primary keys");

        let kind_names: Vec<String> = kinds
            .into_iter()
            .map(|k| information_schema_kind(k).to_string())
            .collect();
        let table_rows = sqlx::query(queries::postgres::TABLES)
            .bind(catalog_param.as_deref())
            .bind(schema_param.as_deref())
            .bind(request.table_name_pattern.as_deref())
            .bind(kind_names)
            .fetch_all(&mut *conn)
            .await?;

        let mut tables = Vec::with_capacity(table_rows.len());
        for row in &table_rows {
            let name: String = row.get("table_name");
            let kind: String = row.get("table_type");
            let mut table = TableInfo::new(&name, TableKind::parse(&kind));
            if let Ok(Some(cat)) = row.try_get::<Option<String>, _>("table_catalog") {
                table = table.with_catalog(cat);
            }
            if let Ok(Some(sch)) = row.try_get::<Option<String>, _>("table_schema") {
                table = table.with_schema(sch);
            }
            if let Ok(Some(remarks)) = row.try_get::<Option<String>, _>("remarks") {
                if !remarks.is_empty() {
                    table = table.with_remarks(remarks);
                }
            }
            tables.push(table.with_columns(index.columns_for_table(&name)));
        }
        debug!(count = tables.len(), "Listed PostgreSQL tables");

        Ok(DatabaseInfo {
            product_name: PRODUCT_NAME.to_string(),
            product_version,
            tables,
        })
    }
}

mod mysql {
    use super::*;
    use crate::models::TableInfo;
    use sqlx::{MySqlPool, Row};

    const PRODUCT_NAME: &str = "MySQL";

    /// Safely get a string from a MySQL row.
    /// MySQL may return VARBINARY instead of VARCHAR depending on charset configuration.
    fn get_string(row: &sqlx::mysql::MySqlRow, column: &str) -> String {
        row.try_get::<String, _>(column)
            .ok()
            .or_else(|| {
                row.try_get::<Vec<u8>, _>(column)
                    .ok()
                    .and_then(|bytes| String::from_utf8(bytes).ok())
            })
            .unwrap_or_default()
    }

    /// Safely get an optional string from a MySQL row.
    fn get_optional_string(row: &sqlx::mysql::MySqlRow, column: &str) -> Option<String> {
        row.try_get::<Option<String>, _>(column)
            .ok()
            .flatten()
            .or_else(|| {
                row.try_get::<Option<Vec<u8>>, _>(column)
                    .ok()
                    .flatten()
                    .and_then(|bytes| String::from_utf8(bytes).ok())
            })
    }

    /// Try to get a u64 value from a row, handling MySQL version differences.
    /// MySQL 5.x may return BIGINT (i64), MySQL 8.x returns BIGINT UNSIGNED (u64).
    fn try_get_u64(row: &sqlx::mysql::MySqlRow, column: &str) -> Option<u64> {
        if let Ok(Some(v)) = row.try_get::<Option<u64>, _>(column) {
            return Some(v);
        }
        if let Ok(Some(v)) = row.try_get::<Option<i64>, _>(column) {
            return Some(v as u64);
        }
        None
    }

    pub async fn describe_database(
        pool: &MySqlPool,
        request: &DescribeRequest,
        type_map: &TypeMap,
    ) -> DbResult<DatabaseInfo> {
        let mut conn = acquire(pool).await?;

        let product_version: String = sqlx::query_scalar(queries::mysql::VERSION)
            .fetch_one(&mut *conn)
            .await?;

        let kinds = request.effective_table_kinds();
        if kinds.is_empty() {
            return Ok(DatabaseInfo {
                product_name: PRODUCT_NAME.to_string(),
                product_version,
                tables: Vec::new(),
            });
        }

        let schema = effective_schema_filter(PRODUCT_NAME, request.schema_pattern.clone());
        let catalog_param = request.catalog.as_sql_param();
        let schema_param = schema.as_sql_param();

        // Without any namespace filter, scope to the connected database
        // instead of scanning every schema on the server.
        let default_db: Option<String> = if catalog_param.is_none() && schema_param.is_none() {
            sqlx::query_scalar(queries::mysql::CURRENT_DATABASE)
                .fetch_one(&mut *conn)
                .await?
        } else {
            None
        };

        let mut index = ColumnIndex::default();
        let column_rows = sqlx::query(queries::mysql::COLUMNS)
            .bind(catalog_param.as_deref())
            .bind(catalog_param.as_deref())
            .bind(schema_param.as_deref())
            .bind(schema_param.as_deref())
            .bind(default_db.as_deref())
            .bind(default_db.as_deref())
            .fetch_all(&mut *conn)
            .await?;
        for row in &column_rows {
            let table = get_string(row, "table_name");
            let name = get_string(row, "column_name");
            let type_name = get_string(row, "type_name");
            let ordinal = try_get_u64(row, "ordinal_position").unwrap_or(0);
            let nullable = get_string(row, "is_nullable");
            let autoincrement = get_string(row, "is_autoincrement");
            let remarks = get_optional_string(row, "remarks");

            let mut col = ColumnInfo::new(
                &name,
                crate::db::types::SqlType::from_type_name(&type_name),
                &type_name,
                ordinal as u32,
            )
            .with_nullable(nullable == "YES")
            .with_autoincrement(autoincrement == "YES")
            .resolve_type(type_map);

            if let Some(size) =
                try_get_u64(row, "char_length").or_else(|| try_get_u64(row, "num_precision"))
            {
                col = col.with_size(size as u32);
            }
            if let Some(digits) = try_get_u64(row, "num_scale") {
                col = col.with_decimal_digits(digits as u32);
            }
            if let Some(r) = remarks.filter(|r| !r.is_empty()) {
                col = col.with_remarks(r);
            }
            index.insert(&table, col);
        }
        debug!(count = index.len(), "Collected MySQL columns");

        let pk_rows = sqlx::query(queries::mysql::PRIMARY_KEYS)
            .bind(catalog_param.as_deref())
            .bind(catalog_param.as_deref())
            .bind(schema_param.as_deref())
            .bind(schema_param.as_deref())
            .bind(default_db.as_deref())
            .bind(default_db.as_deref())
            .fetch_all(&mut *conn)
            .await?;
        for row in &pk_rows {
            let table = get_string(row, "table_name");
            let column = get_string(row, "column_name");
            let seq = try_get_u64(row, "key_seq").unwrap_or(0);
            index.set_key_seq(&table, &column, seq as u16);
        }
        debug!(count = pk_rows.len(), "Collected MySQL primary keys");

        let kind_list = kinds
            .into_iter()
            .map(|k| format!("'{}'", information_schema_kind(k)))
            .collect::<Vec<_>>()
            .join(", ");
        let tables_query = queries::mysql::TABLES.replace("{kinds}", &kind_list);
        let table_rows = sqlx::query(&tables_query)
            .bind(catalog_param.as_deref())
            .bind(catalog_param.as_deref())
            .bind(schema_param.as_deref())
            .bind(schema_param.as_deref())
            .bind(default_db.as_deref())
            .bind(default_db.as_deref())
            .bind(request.table_name_pattern.as_deref())
            .bind(request.table_name_pattern.as_deref())
            .fetch_all(&mut *conn)
            .await?;

        let mut tables = Vec::with_capacity(table_rows.len());
        for row in &table_rows {
            let name = get_string(row, "table_name");
            let kind = get_string(row, "table_type");
            // The database qualifier reports as the catalog, per driver convention.
            let mut table = TableInfo::new(&name, TableKind::parse(&kind))
                .with_catalog(get_string(row, "table_schema"));
            if let Some(remarks) = get_optional_string(row, "remarks") {
                if !remarks.is_empty() {
                    table = table.with_remarks(remarks);
                }
            }
            tables.push(table.with_columns(index.columns_for_table(&name)));
        }
        debug!(count = tables.len(), "Listed MySQL tables");

        Ok(DatabaseInfo {
            product_name: PRODUCT_NAME.to_string(),
            product_version,
            tables,
        })
    }
}

mod sqlite {
    use super::*;
    use crate::models::TableInfo;
    use sqlx::{Row, SqlitePool};

    const PRODUCT_NAME: &str = "SQLite";

    /// sqlite_master type name for a kind.
    fn sqlite_kind(kind: TableKind) -> &'static str {
        match kind {
            TableKind::Table => "table",
            TableKind::View => "view",
        }
    }

    /// Parse size and fractional digits from a declared type like
    /// `VARCHAR(30)` or `DECIMAL(10,2)`.
    pub(super) fn parse_declared_size(type_name: &str) -> (Option<u32>, Option<u32>) {
        let Some(start) = type_name.find('(') else {
            return (None, None);
        };
        let Some(end) = type_name[start..].find(')') else {
            return (None, None);
        };
        let inner = &type_name[start + 1..start + end];
        let mut parts = inner.split(',').map(str::trim);
        let size = parts.next().and_then(|p| p.parse().ok());
        let digits = parts.next().and_then(|p| p.parse().ok());
        (size, digits)
    }

    pub async fn describe_database(
        pool: &SqlitePool,
        request: &DescribeRequest,
        type_map: &TypeMap,
    ) -> DbResult<DatabaseInfo> {
        let mut conn = acquire(pool).await?;

        let product_version: String = sqlx::query_scalar(queries::sqlite::VERSION)
            .fetch_one(&mut *conn)
            .await?;

        let kinds = request.effective_table_kinds();
        if kinds.is_empty() {
            return Ok(DatabaseInfo {
                product_name: PRODUCT_NAME.to_string(),
                product_version,
                tables: Vec::new(),
            });
        }

        // SQLite has no catalog/schema namespaces. A filter that cannot
        // match unqualified entries matches nothing here.
        let schema = effective_schema_filter(PRODUCT_NAME, request.schema_pattern.clone());
        if !request.catalog.accepts_unqualified() || !schema.accepts_unqualified() {
            return Ok(DatabaseInfo {
                product_name: PRODUCT_NAME.to_string(),
                product_version,
                tables: Vec::new(),
            });
        }

        let mut index = ColumnIndex::default();
        let column_rows = sqlx::query(queries::sqlite::COLUMNS)
            .fetch_all(&mut *conn)
            .await?;
        for row in &column_rows {
            let table: String = row.get("table_name");
            let name: String = row.get("column_name");
            let type_name: String = row.get("type_name");
            let not_null: i64 = row.get("not_null");
            let cid: i64 = row.get("cid");
            let autoincrement: String = row.get("is_autoincrement");

            let mut col = ColumnInfo::new(
                &name,
                crate::db::types::SqlType::from_type_name(&type_name),
                &type_name,
                (cid + 1) as u32,
            )
            .with_nullable(not_null == 0)
            .with_autoincrement(autoincrement == "YES")
            .resolve_type(type_map);

            let (size, digits) = parse_declared_size(&type_name);
            if let Some(size) = size {
                col = col.with_size(size);
            }
            if let Some(digits) = digits {
                col = col.with_decimal_digits(digits);
            }
            index.insert(&table, col);
        }
        debug!(count = index.len(), "Collected SQLite columns");

        let pk_rows = sqlx::query(queries::sqlite::PRIMARY_KEYS)
            .fetch_all(&mut *conn)
            .await?;
        for row in &pk_rows {
            let table: String = row.get("table_name");
            let column: String = row.get("column_name");
            let seq: i64 = row.get("key_seq");
            index.set_key_seq(&table, &column, seq as u16);
        }
        debug!(count = pk_rows.len(), "Collected SQLite primary keys");

        let kind_list = kinds
            .into_iter()
            .map(|k| format!("'{}'", sqlite_kind(k)))
            .collect::<Vec<_>>()
            .join(", ");
        let tables_query = queries::sqlite::TABLES.replace("{kinds}", &kind_list);
        let table_rows = sqlx::query(&tables_query)
            .bind(request.table_name_pattern.as_deref())
            .bind(request.table_name_pattern.as_deref())
            .fetch_all(&mut *conn)
            .await?;

        let mut tables = Vec::with_capacity(table_rows.len());
        for row in &table_rows {
            let name: String = row.get("name");
            let kind: String = row.get("type");
            let table = TableInfo::new(&name, TableKind::parse(&kind))
                .with_columns(index.columns_for_table(&name));
            tables.push(table);
        }
        debug!(count = tables.len(), "Listed SQLite tables");

        Ok(DatabaseInfo {
            product_name: PRODUCT_NAME.to_string(),
            product_version,
            tables,
        })
    }
}
