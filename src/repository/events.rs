//! Audit events repository

use std::sync::Arc;

use serde_json::Value;

use crate::{
    error::AppResult,
    store::{DataStore, Record},
};

pub const TABLE: &str = "app_events";

/// One row of the audit trail
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub event_name: String,
    pub user_id: Option<String>,
    pub hospital_id: Option<String>,
    pub event_props: Value,
}

#[derive(Clone)]
pub struct EventsRepository {
    store: Arc<dyn DataStore>,
}

impl EventsRepository {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    pub async fn insert(&self, event: NewEvent) -> AppResult<()> {
        let mut record = Record::new();
        record.insert("event_name".into(), Value::String(event.event_name));
        record.insert("user_id".into(), event.user_id.map(Value::String).unwrap_or(Value::Null));
        record.insert(
            "hospital_id".into(),
            event.hospital_id.map(Value::String).unwrap_or(Value::Null),
        );
        record.insert("event_props".into(), event.event_props);

        self.store.insert_row(TABLE, record).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MockDataStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_insert_writes_audit_columns() {
        let mut store = MockDataStore::new();
        store
            .expect_insert_row()
            .withf(|table, record| {
                table == "app_events"
                    && Value::Object(record.clone())
                        == json!({
                            "event_name": "appointment_deleted",
                            "user_id": null,
                            "hospital_id": "h-1",
                            "event_props": {"appointment_id": "apt-1"}
                        })
            })
            .times(1)
            .returning(|_, record| Ok(record));

        let repo = EventsRepository::new(Arc::new(store));
        repo.insert(NewEvent {
            event_name: "appointment_deleted".to_string(),
            user_id: None,
            hospital_id: Some("h-1".to_string()),
            event_props: json!({"appointment_id": "apt-1"}),
        })
        .await
        .unwrap();
    }
}
