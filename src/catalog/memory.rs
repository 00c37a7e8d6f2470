//! In-process table store
//!
//! This module provides a table store that serves collections from memory.
//! It backs offline browsing from a JSON catalog document and doubles as the
//! store used throughout the test suite.

use super::{CatalogError, TableQuery, TableStore};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::future::Future;
use std::path::Path;

/// A table store holding its collections as JSON records in memory.
///
/// Tables can be marked as failing, which makes every query against them
/// return a request error. This simulates an unreachable backend for a
/// single collection while the others keep working.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    /// Records per table name
    tables: HashMap<String, Vec<Value>>,
    /// Tables whose queries fail
    failing: HashSet<String>,
}

impl MemoryStore {
    /// Creates an empty store without any tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a catalog document of the form `{"series": [...], "short_films": [...], "episodes": [...]}`
    ///
    /// Every top-level key becomes a table. Keys whose value is not an array
    /// are rejected.
    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path).map_err(|e| CatalogError::FileReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::from_json_str(&content)
    }

    /// Parses a catalog document from a string.
    pub fn from_json_str(content: &str) -> Result<Self, CatalogError> {
        let document: HashMap<String, Value> =
            serde_json::from_str(content).map_err(|e| CatalogError::ParseError(e.to_string()))?;

        let mut store = Self::new();
        for (table, value) in document {
            match value {
                Value::Array(records) => {
                    store.tables.insert(table, records);
                }
                _ => {
                    return Err(CatalogError::ParseError(format!(
                        "table '{}' is not an array of records",
                        table
                    )));
                }
            }
        }

        Ok(store)
    }

    /// Adds (or replaces) a table built from serializable records.
    pub fn with_table<T: serde::Serialize>(
        mut self,
        table: &str,
        records: &[T],
    ) -> Result<Self, CatalogError> {
        let values = records
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CatalogError::ParseError(e.to_string()))?;
        self.tables.insert(table.to_string(), values);
        Ok(self)
    }

    /// Makes every query against `table` fail.
    pub fn with_failing_table(mut self, table: &str) -> Self {
        self.failing.insert(table.to_string());
        self
    }

    /// Runs a query synchronously.
    fn run_query<T: DeserializeOwned>(&self, query: &TableQuery) -> Result<Vec<T>, CatalogError> {
        if self.failing.contains(&query.table) {
            return Err(CatalogError::RequestError(format!(
                "table '{}' is unavailable",
                query.table
            )));
        }

        let records = self
            .tables
            .get(&query.table)
            .ok_or_else(|| CatalogError::TableNotFound(query.table.clone()))?;

        let mut selected: Vec<&Value> = match &query.filter {
            Some((field, expected)) => records
                .iter()
                .filter(|record| {
                    record
                        .get(field)
                        .is_some_and(|value| field_text(value) == *expected)
                })
                .collect(),
            None => records.iter().collect(),
        };

        if let Some(field) = &query.order_by {
            // Stable sort keeps insertion order for equal keys
            selected.sort_by(|a, b| compare_fields(a.get(field), b.get(field)));
        }

        selected
            .into_iter()
            .map(|record| {
                serde_json::from_value(record.clone())
                    .map_err(|e| CatalogError::ParseError(e.to_string()))
            })
            .collect()
    }
}

impl TableStore for MemoryStore {
    fn select<T>(
        &self,
        query: &TableQuery,
    ) -> impl Future<Output = Result<Vec<T>, CatalogError>> + Send
    where
        T: DeserializeOwned + Send + 'static,
    {
        std::future::ready(self.run_query(query))
    }
}

/// Renders a field the way an equality filter in a query string sees it.
fn field_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Orders two optional field values; numbers numerically, everything else as text.
fn compare_fields(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(x), Some(y)) => field_text(x).cmp(&field_text(y)),
        // Missing values sort last
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
