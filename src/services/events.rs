//! Audit trail service

use serde_json::Value;

use crate::repository::{events::NewEvent, Repository};

#[derive(Clone)]
pub struct EventsService {
    repository: Repository,
}

impl EventsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Record an audit event. Store failures are logged and swallowed so the
    /// mutation that triggered the event is never rolled back or reported as
    /// failed because of telemetry.
    pub async fn log_event(&self, event_name: &str, hospital_id: &str, user_id: Option<&str>, properties: Value) {
        let event = NewEvent {
            event_name: event_name.to_string(),
            user_id: user_id.map(str::to_string),
            hospital_id: Some(hospital_id.to_string()),
            event_props: match properties {
                Value::Null => Value::Object(Default::default()),
                props => props,
            },
        };

        if let Err(e) = self.repository.events.insert(event).await {
            tracing::warn!("Audit event '{}' could not be stored: {}", event_name, e);
        }
    }
}
