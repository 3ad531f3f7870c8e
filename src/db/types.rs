//! Normalized SQL type codes and the type-name map.
//!
//! Engines report column types as free-form names (`int4`, `VARCHAR(30)`,
//! `DATETIME`). [`SqlType`] normalizes them onto the standard SQL type codes
//! (the `java.sql.Types` numbering, the de facto interop convention), and
//! [`TypeMap`] maps those codes to Rust type names for generated identifiers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Normalized SQL type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SqlType {
    Bit,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Float,
    Real,
    Double,
    Numeric,
    Decimal,
    Char,
    Varchar,
    LongVarchar,
    NVarchar,
    Date,
    Time,
    Timestamp,
    TimestampWithTimezone,
    Binary,
    VarBinary,
    LongVarBinary,
    Boolean,
    Blob,
    Clob,
    Other,
}

impl SqlType {
    /// The standard numeric type code.
    pub fn code(&self) -> i32 {
        match self {
            Self::Bit => -7,
            Self::TinyInt => -6,
            Self::SmallInt => 5,
            Self::Integer => 4,
            Self::BigInt => -5,
            Self::Float => 6,
            Self::Real => 7,
            Self::Double => 8,
            Self::Numeric => 2,
            Self::Decimal => 3,
            Self::Char => 1,
            Self::Varchar => 12,
            Self::LongVarchar => -1,
            Self::NVarchar => -9,
            Self::Date => 91,
            Self::Time => 92,
            Self::Timestamp => 93,
            Self::TimestampWithTimezone => 2014,
            Self::Binary => -2,
            Self::VarBinary => -3,
            Self::LongVarBinary => -4,
            Self::Boolean => 16,
            Self::Blob => 2004,
            Self::Clob => 2005,
            Self::Other => 1111,
        }
    }

    /// Look up a type by its standard numeric code.
    pub fn from_code(code: i32) -> Option<Self> {
        const ALL: &[SqlType] = &[
            SqlType::Bit,
            SqlType::TinyInt,
            SqlType::SmallInt,
            SqlType::Integer,
            SqlType::BigInt,
            SqlType::Float,
            SqlType::Real,
            SqlType::Double,
            SqlType::Numeric,
            SqlType::Decimal,
            SqlType::Char,
            SqlType::Varchar,
            SqlType::LongVarchar,
            SqlType::NVarchar,
            SqlType::Date,
            SqlType::Time,
            SqlType::Timestamp,
            SqlType::TimestampWithTimezone,
            SqlType::Binary,
            SqlType::VarBinary,
            SqlType::LongVarBinary,
            SqlType::Boolean,
            SqlType::Blob,
            SqlType::Clob,
            SqlType::Other,
        ];
        ALL.iter().copied().find(|t| t.code() == code)
    }

    /// Normalize an engine-reported type name onto a code.
    ///
    /// Size/precision suffixes (`varchar(30)`, `decimal(10,2)`) and trailing
    /// modifiers (`bigint unsigned`) are ignored.
    pub fn from_type_name(type_name: &str) -> Self {
        let lower = type_name.to_lowercase();
        let base = lower
            .split('(')
            .next()
            .unwrap_or(&lower)
            .split(" unsigned")
            .next()
            .unwrap_or(&lower)
            .trim();

        match base {
            "char" | "character" | "bpchar" | "nchar" => Self::Char,
            "varchar" | "character varying" | "text" => Self::Varchar,
            "nvarchar" => Self::NVarchar,
            "tinytext" | "mediumtext" | "longtext" => Self::LongVarchar,
            "numeric" => Self::Numeric,
            "decimal" => Self::Decimal,
            "bit" => Self::Bit,
            "bool" | "boolean" => Self::Boolean,
            "tinyint" => Self::TinyInt,
            "smallint" | "int2" => Self::SmallInt,
            "int" | "integer" | "int4" | "mediumint" | "serial" => Self::Integer,
            "bigint" | "int8" | "bigserial" => Self::BigInt,
            "real" | "float4" => Self::Real,
            "float" => Self::Float,
            "double" | "double precision" | "float8" => Self::Double,
            "bytea" | "binary" => Self::Binary,
            "varbinary" => Self::VarBinary,
            "blob" | "tinyblob" | "mediumblob" | "longblob" => Self::Blob,
            "clob" => Self::Clob,
            "date" => Self::Date,
            "time" | "time without time zone" | "time with time zone" | "timetz" => Self::Time,
            "timestamp" | "timestamp without time zone" | "datetime" => Self::Timestamp,
            "timestamptz" | "timestamp with time zone" => Self::TimestampWithTimezone,
            _ => Self::Other,
        }
    }
}

/// Mapping from SQL type codes to Rust type names.
///
/// The default covers the common character, numeric, binary and temporal
/// families. Callers merge their own entries on top; codes absent from the
/// merged map resolve to nothing, silently.
#[derive(Debug, Clone)]
pub struct TypeMap {
    entries: HashMap<SqlType, String>,
}

impl Default for TypeMap {
    fn default() -> Self {
        let mut entries = HashMap::new();
        let mut put = |t: SqlType, name: &str| {
            entries.insert(t, name.to_string());
        };
        put(SqlType::Char, "String");
        put(SqlType::Varchar, "String");
        put(SqlType::NVarchar, "String");
        put(SqlType::LongVarchar, "String");
        put(SqlType::Numeric, "rust_decimal::Decimal");
        put(SqlType::Decimal, "rust_decimal::Decimal");
        put(SqlType::Bit, "bool");
        put(SqlType::TinyInt, "i32");
        put(SqlType::SmallInt, "i32");
        put(SqlType::Integer, "i32");
        put(SqlType::BigInt, "i64");
        put(SqlType::Real, "f32");
        put(SqlType::Float, "f64");
        put(SqlType::Double, "f64");
        put(SqlType::Binary, "Vec<u8>");
        put(SqlType::VarBinary, "Vec<u8>");
        put(SqlType::LongVarBinary, "Vec<u8>");
        put(SqlType::Date, "chrono::NaiveDate");
        put(SqlType::Time, "chrono::NaiveTime");
        put(SqlType::Timestamp, "chrono::NaiveDateTime");
        put(SqlType::TimestampWithTimezone, "chrono::DateTime<chrono::Utc>");
        Self { entries }
    }
}

impl TypeMap {
    /// Build the effective map: defaults with `overrides` merged on top.
    pub fn merged(overrides: &HashMap<SqlType, String>) -> Self {
        let mut map = Self::default();
        for (t, name) in overrides {
            map.entries.insert(*t, name.clone());
        }
        map
    }

    /// Resolve a type code to a Rust type name, if mapped.
    pub fn resolve(&self, data_type: SqlType) -> Option<&str> {
        self.entries.get(&data_type).map(String::as_str)
    }

    /// Number of mapped codes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
