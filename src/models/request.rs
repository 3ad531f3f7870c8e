//! Introspection request models.

use crate::db::types::SqlType;
use crate::models::database::TableKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tri-state namespace qualifier filter.
///
/// `Any` applies no filter, `Unqualified` matches only entries without the
/// qualifier, and `Matching` holds an exact catalog name or a SQL LIKE
/// pattern for schemas.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamespaceFilter {
    #[default]
    Any,
    Unqualified,
    Matching(String),
}

impl NamespaceFilter {
    /// The filter value to bind in SQL: None disables the predicate,
    /// the empty string stands for "unqualified only".
    pub fn as_sql_param(&self) -> Option<String> {
        match self {
            Self::Any => None,
            Self::Unqualified => Some(String::new()),
            Self::Matching(v) => Some(v.clone()),
        }
    }

    /// Whether this filter accepts entries that carry no qualifier at all.
    /// Used by engines without catalog/schema namespaces.
    pub fn accepts_unqualified(&self) -> bool {
        match self {
            Self::Any | Self::Unqualified => true,
            // A LIKE pattern of only wildcards still matches the empty name
            Self::Matching(p) => !p.is_empty() && p.chars().all(|c| c == '%'),
        }
    }

    /// True when no filtering was requested.
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }
}

/// Parameters for a `describe_database` call.
///
/// The default request applies no filters, includes tables and views, and
/// uses the built-in type map. Builder methods narrow it down.
#[derive(Debug, Clone, Default)]
pub struct DescribeRequest {
    /// Exact catalog filter.
    pub catalog: NamespaceFilter,
    /// Schema name pattern filter (SQL LIKE semantics).
    pub schema_pattern: NamespaceFilter,
    /// Table name pattern (SQL LIKE semantics). None matches all tables.
    pub table_name_pattern: Option<String>,
    /// Table kinds to include. None defaults to tables and views.
    pub table_kinds: Option<Vec<TableKind>>,
    /// Type-map entries merged over the built-in defaults; these win on conflict.
    pub type_overrides: HashMap<SqlType, String>,
}

impl DescribeRequest {
    /// Create a request with no filters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by exact catalog name. An empty string matches only
    /// catalog-less entries.
    pub fn with_catalog(mut self, catalog: impl Into<String>) -> Self {
        let catalog = catalog.into();
        self.catalog = if catalog.is_empty() {
            NamespaceFilter::Unqualified
        } else {
            NamespaceFilter::Matching(catalog)
        };
        self
    }

    /// Filter by schema name pattern (SQL LIKE semantics). An empty string
    /// matches only schema-less entries.
    pub fn with_schema_pattern(mut self, pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        self.schema_pattern = if pattern.is_empty() {
            NamespaceFilter::Unqualified
        } else {
            NamespaceFilter::Matching(pattern)
        };
        self
    }

    /// Filter table names by a SQL LIKE pattern.
    pub fn with_table_name_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.table_name_pattern = Some(pattern.into());
        self
    }

    /// Restrict the table kinds to include.
    pub fn with_table_kinds(mut self, kinds: Vec<TableKind>) -> Self {
        self.table_kinds = Some(kinds);
        self
    }

    /// Override or add a type-map entry for one SQL type code.
    pub fn with_type_override(mut self, data_type: SqlType, rust_type: impl Into<String>) -> Self {
        self.type_overrides.insert(data_type, rust_type.into());
        self
    }

    /// The table kinds to query, defaulting to tables and views.
    pub fn effective_table_kinds(&self) -> Vec<TableKind> {
        match &self.table_kinds {
            Some(kinds) => kinds.clone(),
            None => vec![TableKind::Table, TableKind::View],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_request_has_no_filters() {
        let req = DescribeRequest::new();
        assert!(req.catalog.is_any());
        assert!(req.schema_pattern.is_any());
        assert!(req.table_name_pattern.is_none());
        assert_eq!(
            req.effective_table_kinds(),
            vec![TableKind::Table, TableKind::View]
        );
    }

    #[test]
    fn test_empty_string_means_unqualified() {
        let req = DescribeRequest::new().with_catalog("").with_schema_pattern("");
        assert_eq!(req.catalog, NamespaceFilter::Unqualified);
        assert_eq!(req.schema_pattern, NamespaceFilter::Unqualified);
    }

    #[test]
    fn test_filter_sql_params() {
        assert_eq!(NamespaceFilter::Any.as_sql_param(), None);
        assert_eq!(
            NamespaceFilter::Unqualified.as_sql_param(),
            Some(String::new())
        );
        assert_eq!(
            NamespaceFilter::Matching("public".into()).as_sql_param(),
            Some("public".to_string())
        );
    }

    #[test]
    fn test_accepts_unqualified() {
        assert!(NamespaceFilter::Any.accepts_unqualified());
        assert!(NamespaceFilter::Unqualified.accepts_unqualified());
        assert!(NamespaceFilter::Matching("%".into()).accepts_unqualified());
        assert!(!NamespaceFilter::Matching("public".into()).accepts_unqualified());
    }

    #[test]
    fn test_restricting_table_kinds() {
        let req = DescribeRequest::new().with_table_kinds(vec![TableKind::Table]);
        assert_eq!(req.effective_table_kinds(), vec![TableKind::Table]);
    }

    #[test]
    fn test_type_override_collected() {
        let req = DescribeRequest::new().with_type_override(SqlType::Numeric, "f64");
        assert_eq!(
            req.type_overrides.get(&SqlType::Numeric).map(String::as_str),
            Some("f64")
        );
    }
}
