//! Data store capability: row-level access to a remote relational store
//!
//! Rows travel as JSON objects in the store's native (snake_case) schema.
//! Translation to the camelCase shapes exposed to callers happens in the
//! repository layer.

pub mod postgres;
pub mod rest;

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    config::{StoreBackend, StoreConfig},
    error::{AppError, AppResult},
};

/// A single row
pub type Record = serde_json::Map<String, Value>;

/// Row filter understood by every backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Eq(String, String),
    Gte(String, String),
    Lte(String, String),
    IsNull(String),
}

impl Filter {
    pub fn eq(column: &str, value: impl ToString) -> Self {
        Filter::Eq(column.to_string(), value.to_string())
    }

    pub fn gte(column: &str, value: impl ToString) -> Self {
        Filter::Gte(column.to_string(), value.to_string())
    }

    pub fn lte(column: &str, value: impl ToString) -> Self {
        Filter::Lte(column.to_string(), value.to_string())
    }

    pub fn is_null(column: &str) -> Self {
        Filter::IsNull(column.to_string())
    }

    pub fn column(&self) -> &str {
        match self {
            Filter::Eq(c, _) | Filter::Gte(c, _) | Filter::Lte(c, _) | Filter::IsNull(c) => c,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DataStore: Send + Sync {
    /// All rows matching every filter, in store order
    async fn fetch_rows(&self, table: &str, filters: &[Filter]) -> AppResult<Vec<Record>>;

    /// First row matching every filter
    async fn fetch_one(&self, table: &str, filters: &[Filter]) -> AppResult<Option<Record>>;

    async fn insert_row(&self, table: &str, record: Record) -> AppResult<Record>;

    /// Apply `patch` to matching rows and return them as updated
    async fn update_rows(&self, table: &str, filters: &[Filter], patch: Record) -> AppResult<Vec<Record>>;

    /// Delete matching rows and return how many went away
    async fn delete_rows(&self, table: &str, filters: &[Filter]) -> AppResult<u64>;
}

/// Build the store selected by configuration
pub async fn connect(config: &StoreConfig) -> AppResult<Arc<dyn DataStore>> {
    let store: Arc<dyn DataStore> = match config.backend {
        StoreBackend::Rest => Arc::new(rest::RestStore::new(config)?),
        StoreBackend::Postgres => Arc::new(postgres::PgStore::connect(config).await?),
    };
    Ok(store)
}

/// Render a native identity value (number, string, ...) as a string
pub fn id_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Deserialize a row into a typed struct
pub fn from_record<T: DeserializeOwned>(table: &str, record: Record) -> AppResult<T> {
    serde_json::from_value(Value::Object(record))
        .map_err(|e| AppError::Store(format!("Malformed row in {}: {}", table, e)))
}

/// Mutations without a filter would touch the whole table
fn require_filters(operation: &str, table: &str, filters: &[Filter]) -> AppResult<()> {
    if filters.is_empty() {
        return Err(AppError::Internal(format!(
            "Refusing unfiltered {} on {}",
            operation, table
        )));
    }
    Ok(())
}
