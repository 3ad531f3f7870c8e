//! Introspection result models.
//!
//! The nested `DatabaseInfo` → `TableInfo` → `ColumnInfo` structure is the
//! only externally visible artifact of an introspection call. All values are
//! transient: built fresh per call, returned, discarded.

use crate::db::types::{SqlType, TypeMap};
use inflector::Inflector;
use serde::{Deserialize, Serialize};

/// Derive an UpperCamelCase identifier from a snake_case name.
///
/// The input is lower-cased first so ALL_CAPS names from case-insensitive
/// engines normalize the same way: `USER_ACCOUNT_ID` -> `UserAccountId`.
pub fn upper_camel(name: &str) -> String {
    name.to_lowercase().to_pascal_case()
}

/// Derive a lowerCamelCase identifier from a snake_case name.
pub fn lower_camel(name: &str) -> String {
    name.to_lowercase().to_camel_case()
}

/// Normalized database product, parsed from the reported product name.
///
/// Dialect accommodations key on this enum rather than on raw strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseProduct {
    PostgreSql,
    MySql,
    Sqlite,
    Other,
}

impl DatabaseProduct {
    /// Parse from a reported product name, case-insensitively.
    pub fn from_product_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        match lower.as_str() {
            "postgresql" => Self::PostgreSql,
            "mysql" | "mariadb" => Self::MySql,
            "sqlite" => Self::Sqlite,
            _ => Self::Other,
        }
    }
}

/// Kind of table object included in introspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    Table,
    View,
}

impl TableKind {
    /// Parse table kind from an engine-specific string.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "view" => Self::View,
            // "table", "base table" and anything unrecognized
            _ => Self::Table,
        }
    }
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Table => write!(f, "TABLE"),
            Self::View => write!(f, "VIEW"),
        }
    }
}

/// A single column of an introspected table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    /// Normalized SQL type code for the column.
    pub data_type: SqlType,
    /// Type name as reported by the engine (e.g. `varchar`, `INTEGER`).
    pub type_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decimal_digits: Option<u32>,
    pub nullable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    /// 1-based position of the column in its table.
    pub ordinal_position: u32,
    pub autoincrement: bool,
    /// Derived lowerCamelCase name, for generated identifiers.
    pub lower_camel_name: String,
    /// Rust type name resolved from the merged type map. None when the
    /// merged map has no entry for the column's type code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rust_type: Option<String>,
    /// Primary-key sequence number (1-based). None when the column is not
    /// part of the primary key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_seq: Option<u16>,
}

impl ColumnInfo {
    /// Create a new column info, deriving the lowerCamelCase name.
    pub fn new(
        name: impl Into<String>,
        data_type: SqlType,
        type_name: impl Into<String>,
        ordinal_position: u32,
    ) -> Self {
        let name = name.into();
        let lower_camel_name = lower_camel(&name);
        Self {
            name,
            data_type,
            type_name: type_name.into(),
            column_size: None,
            decimal_digits: None,
            nullable: false,
            remarks: None,
            ordinal_position,
            autoincrement: false,
            lower_camel_name,
            rust_type: None,
            key_seq: None,
        }
    }

    /// Set the column size (character length or numeric precision).
    pub fn with_size(mut self, size: u32) -> Self {
        self.column_size = Some(size);
        self
    }

    /// Set the number of fractional digits.
    pub fn with_decimal_digits(mut self, digits: u32) -> Self {
        self.decimal_digits = Some(digits);
        self
    }

    /// Set whether the column accepts NULL.
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Set the column comment.
    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }

    /// Set the autoincrement flag.
    pub fn with_autoincrement(mut self, autoincrement: bool) -> Self {
        self.autoincrement = autoincrement;
        self
    }

    /// Resolve the Rust type name from the merged type map.
    /// Leaves `rust_type` unset when the map has no entry for the code.
    pub fn resolve_type(mut self, type_map: &TypeMap) -> Self {
        self.rust_type = type_map.resolve(self.data_type).map(String::from);
        self
    }

    /// Mark this column as primary-key member `seq` (1-based).
    pub fn set_key_seq(&mut self, seq: u16) {
        self.key_seq = Some(seq);
    }
}

/// A single introspected table or view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub name: String,
    pub table_kind: TableKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    /// Derived UpperCamelCase name, for generated identifiers.
    pub upper_camel_name: String,
    /// Columns reported for this table, in retrieval order.
    pub columns: Vec<ColumnInfo>,
}

impl TableInfo {
    /// Create a new table info, deriving the UpperCamelCase name.
    pub fn new(name: impl Into<String>, table_kind: TableKind) -> Self {
        let name = name.into();
        let upper_camel_name = upper_camel(&name);
        Self {
            catalog: None,
            schema: None,
            name,
            table_kind,
            remarks: None,
            upper_camel_name,
            columns: Vec::new(),
        }
    }

    /// Set the catalog qualifier.
    pub fn with_catalog(mut self, catalog: impl Into<String>) -> Self {
        self.catalog = Some(catalog.into());
        self
    }

    /// Set the schema qualifier.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Set the table comment.
    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }

    /// Attach the table's columns.
    pub fn with_columns(mut self, columns: Vec<ColumnInfo>) -> Self {
        self.columns = columns;
        self
    }
}

/// The assembled introspection result for one database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseInfo {
    pub product_name: String,
    pub product_version: String,
    /// Tables in tables-query result order.
    pub tables: Vec<TableInfo>,
}
