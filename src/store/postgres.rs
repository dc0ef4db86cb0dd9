//! Direct Postgres backend
//!
//! Rows are selected as `to_jsonb(t)` so both backends hand the same JSON
//! records to the repository. Filter values are bound as text and compared
//! against the column's text form, which orders ISO dates and `HH:MM` times
//! correctly.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};

use super::{require_filters, DataStore, Filter, Record};
use crate::{
    config::StoreConfig,
    error::{AppError, AppResult},
};

#[derive(Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub async fn connect(config: &StoreConfig) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect(&config.url)
            .await?;
        Ok(Self::new(pool))
    }

    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Quote a table or column name, accepting only plain identifiers
pub fn quote_ident(name: &str) -> AppResult<String> {
    let mut chars = name.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(AppError::Internal(format!("Invalid identifier '{}'", name)));
    }
    Ok(format!("\"{}\"", name))
}

/// WHERE clause with placeholders starting at `$first`, plus the values to bind
pub fn where_clause(filters: &[Filter], first: usize) -> AppResult<(String, Vec<String>)> {
    let mut conditions = Vec::new();
    let mut binds = Vec::new();
    let mut idx = first;

    for filter in filters {
        let column = quote_ident(filter.column())?;
        match filter {
            Filter::Eq(_, value) => {
                conditions.push(format!("{}::text = ${}", column, idx));
                binds.push(value.clone());
                idx += 1;
            }
            Filter::Gte(_, value) => {
                conditions.push(format!("{}::text >= ${}", column, idx));
                binds.push(value.clone());
                idx += 1;
            }
            Filter::Lte(_, value) => {
                conditions.push(format!("{}::text <= ${}", column, idx));
                binds.push(value.clone());
                idx += 1;
            }
            Filter::IsNull(_) => conditions.push(format!("{} IS NULL", column)),
        }
    }

    let clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    Ok((clause, binds))
}

/// Quoted column list of a record
fn columns(record: &Record) -> AppResult<String> {
    let quoted = record
        .keys()
        .map(|k| quote_ident(k))
        .collect::<AppResult<Vec<_>>>()?;
    Ok(quoted.join(", "))
}

fn into_records(table: &str, rows: Vec<Value>) -> AppResult<Vec<Record>> {
    rows.into_iter()
        .map(|row| match row {
            Value::Object(record) => Ok(record),
            other => Err(AppError::Store(format!(
                "Expected a row object from {}, got {}",
                table, other
            ))),
        })
        .collect()
}

#[async_trait]
impl DataStore for PgStore {
    async fn fetch_rows(&self, table: &str, filters: &[Filter]) -> AppResult<Vec<Record>> {
        let (clause, binds) = where_clause(filters, 1)?;
        let query = format!("SELECT to_jsonb(t) FROM {} t {}", quote_ident(table)?, clause);
        tracing::debug!(%query, "Postgres select");

        let mut builder = sqlx::query_scalar::<_, Value>(&query);
        for value in binds {
            builder = builder.bind(value);
        }
        into_records(table, builder.fetch_all(&self.pool).await?)
    }

    async fn fetch_one(&self, table: &str, filters: &[Filter]) -> AppResult<Option<Record>> {
        let (clause, binds) = where_clause(filters, 1)?;
        let query = format!(
            "SELECT to_jsonb(t) FROM {} t {} LIMIT 1",
            quote_ident(table)?,
            clause
        );
        tracing::debug!(%query, "Postgres select one");

        let mut builder = sqlx::query_scalar::<_, Value>(&query);
        for value in binds {
            builder = builder.bind(value);
        }
        let row = builder.fetch_optional(&self.pool).await?;
        Ok(into_records(table, row.into_iter().collect())?.into_iter().next())
    }

    async fn insert_row(&self, table: &str, record: Record) -> AppResult<Record> {
        let table_ident = quote_ident(table)?;
        let cols = columns(&record)?;
        let query = format!(
            "INSERT INTO {table} AS t ({cols}) \
             SELECT {cols} FROM jsonb_populate_record(NULL::{table}, $1) \
             RETURNING to_jsonb(t)",
            table = table_ident,
            cols = cols,
        );
        tracing::debug!(%query, "Postgres insert");

        let row = sqlx::query_scalar::<_, Value>(&query)
            .bind(Value::Object(record))
            .fetch_one(&self.pool)
            .await?;
        into_records(table, vec![row])?
            .pop()
            .ok_or_else(|| AppError::Store(format!("Insert into {} returned no row", table)))
    }

    async fn update_rows(&self, table: &str, filters: &[Filter], patch: Record) -> AppResult<Vec<Record>> {
        require_filters("update", table, filters)?;
        if patch.is_empty() {
            return Err(AppError::Validation("Nothing to update".to_string()));
        }

        let table_ident = quote_ident(table)?;
        let cols = columns(&patch)?;
        let (clause, binds) = where_clause(filters, 2)?;
        let query = format!(
            "UPDATE {table} AS t SET ({cols}) = \
             (SELECT {cols} FROM jsonb_populate_record(NULL::{table}, $1)) \
             {clause} RETURNING to_jsonb(t)",
            table = table_ident,
            cols = cols,
            clause = clause,
        );
        tracing::debug!(%query, "Postgres update");

        let mut builder = sqlx::query_scalar::<_, Value>(&query).bind(Value::Object(patch));
        for value in binds {
            builder = builder.bind(value);
        }
        into_records(table, builder.fetch_all(&self.pool).await?)
    }

    async fn delete_rows(&self, table: &str, filters: &[Filter]) -> AppResult<u64> {
        require_filters("delete", table, filters)?;
        let (clause, binds) = where_clause(filters, 1)?;
        let query = format!("DELETE FROM {} {}", quote_ident(table)?, clause);
        tracing::debug!(%query, "Postgres delete");

        let mut builder = sqlx::query(&query);
        for value in binds {
            builder = builder.bind(value);
        }
        let result = builder.execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
