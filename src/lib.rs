//! Database metadata introspection.
//!
//! This library builds a normalized, transient model of a database's tables
//! and columns (SQLite, PostgreSQL, MySQL). Given a named data source and
//! optional catalog/schema/table filters, it acquires one connection, runs
//! the metadata queries, and returns a nested
//! [`DatabaseInfo`](models::DatabaseInfo) → `TableInfo` → `ColumnInfo` result.

pub mod config;
pub mod db;
pub mod error;
pub mod models;

pub use db::{DataSourceRegistry, DatabaseInspector, DbPool};
pub use error::{DbError, DbResult};
pub use models::{DatabaseInfo, DescribeRequest};
