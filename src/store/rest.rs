//! PostgREST / Supabase style REST backend

use async_trait::async_trait;
use reqwest::{header, Client, Method, RequestBuilder, Response};
use serde_json::Value;

use super::{require_filters, DataStore, Filter, Record};
use crate::{
    config::StoreConfig,
    error::{AppError, AppResult},
};

#[derive(Clone)]
pub struct RestStore {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl RestStore {
    pub fn new(config: &StoreConfig) -> AppResult<Self> {
        let client = Client::builder()
            .pool_max_idle_per_host(config.max_connections as usize)
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        let url = format!("{}/rest/v1/{}", self.base_url, table);
        let mut builder = self.client.request(method, url);
        if let Some(key) = &self.api_key {
            builder = builder.header("apikey", key).bearer_auth(key);
        }
        builder
    }

    /// Mutations ask for the affected rows back
    fn returning(&self, method: Method, table: &str) -> RequestBuilder {
        self.request(method, table)
            .header("Prefer", "return=representation")
    }

    async fn rows(table: &str, response: Response) -> AppResult<Vec<Record>> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Store(format!("{} on {}: {}", status, table, body)));
        }

        let body: Value = response.json().await?;
        match body {
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(record) => Ok(record),
                    other => Err(AppError::Store(format!(
                        "Expected a row object from {}, got {}",
                        table, other
                    ))),
                })
                .collect(),
            Value::Object(record) => Ok(vec![record]),
            Value::Null => Ok(Vec::new()),
            other => Err(AppError::Store(format!(
                "Unexpected response from {}: {}",
                table, other
            ))),
        }
    }
}

/// PostgREST query-string operators
pub fn query_pairs(filters: &[Filter]) -> Vec<(String, String)> {
    filters
        .iter()
        .map(|filter| match filter {
            Filter::Eq(column, value) => (column.clone(), format!("eq.{}", value)),
            Filter::Gte(column, value) => (column.clone(), format!("gte.{}", value)),
            Filter::Lte(column, value) => (column.clone(), format!("lte.{}", value)),
            Filter::IsNull(column) => (column.clone(), "is.null".to_string()),
        })
        .collect()
}

#[async_trait]
impl DataStore for RestStore {
    async fn fetch_rows(&self, table: &str, filters: &[Filter]) -> AppResult<Vec<Record>> {
        tracing::debug!(table, ?filters, "REST select");
        let response = self
            .request(Method::GET, table)
            .query(&[("select", "*")])
            .query(&query_pairs(filters))
            .send()
            .await?;
        Self::rows(table, response).await
    }

    async fn fetch_one(&self, table: &str, filters: &[Filter]) -> AppResult<Option<Record>> {
        tracing::debug!(table, ?filters, "REST select one");
        let response = self
            .request(Method::GET, table)
            .query(&[("select", "*"), ("limit", "1")])
            .query(&query_pairs(filters))
            .send()
            .await?;
        Ok(Self::rows(table, response).await?.into_iter().next())
    }

    async fn insert_row(&self, table: &str, record: Record) -> AppResult<Record> {
        tracing::debug!(table, "REST insert");
        let response = self
            .returning(Method::POST, table)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&Value::Object(record))
            .send()
            .await?;
        Self::rows(table, response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Store(format!("Insert into {} returned no row", table)))
    }

    async fn update_rows(&self, table: &str, filters: &[Filter], patch: Record) -> AppResult<Vec<Record>> {
        require_filters("update", table, filters)?;
        tracing::debug!(table, ?filters, "REST update");
        let response = self
            .returning(Method::PATCH, table)
            .query(&query_pairs(filters))
            .json(&Value::Object(patch))
            .send()
            .await?;
        Self::rows(table, response).await
    }

    async fn delete_rows(&self, table: &str, filters: &[Filter]) -> AppResult<u64> {
        require_filters("delete", table, filters)?;
        tracing::debug!(table, ?filters, "REST delete");
        let response = self
            .returning(Method::DELETE, table)
            .query(&query_pairs(filters))
            .send()
            .await?;
        Ok(Self::rows(table, response).await?.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_pairs_use_postgrest_operators() {
        let pairs = query_pairs(&[
            Filter::eq("hospital_id", "hospital-42"),
            Filter::gte("date", "2024-02-01"),
            Filter::lte("date", "2024-02-28"),
            Filter::is_null("deleted_at"),
        ]);
        assert_eq!(
            pairs,
            vec![
                ("hospital_id".to_string(), "eq.hospital-42".to_string()),
                ("date".to_string(), "gte.2024-02-01".to_string()),
                ("date".to_string(), "lte.2024-02-28".to_string()),
                ("deleted_at".to_string(), "is.null".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_unfiltered_delete_is_refused_before_any_request() {
        let store = RestStore::new(&StoreConfig::default()).unwrap();
        let result = store.delete_rows("appointments", &[]).await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
