//! Data models for metadata introspection.
//!
//! This module re-exports all model types used throughout the crate.

pub mod database;
pub mod request;
pub mod source;

// Re-export commonly used types
pub use database::{ColumnInfo, DatabaseInfo, DatabaseProduct, TableInfo, TableKind};
pub use request::{DescribeRequest, NamespaceFilter};
pub use source::{DataSourceInfo, DatabaseType};
