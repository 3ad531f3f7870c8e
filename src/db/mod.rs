//! Database access: pools, type normalization, metadata introspection.

pub mod inspector;
pub mod pool;
pub mod types;

pub use inspector::DatabaseInspector;
pub use pool::{DataSourceRegistry, DbPool};
pub use types::{SqlType, TypeMap};
