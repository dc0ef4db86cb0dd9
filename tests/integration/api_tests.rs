//! API integration tests
//!
//! Run against a server started with a seeded store:
//! `PANEL_TEST_HOSPITAL=<id> cargo test -- --ignored`

use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

fn hospital_id() -> String {
    std::env::var("PANEL_TEST_HOSPITAL").unwrap_or_else(|_| "hospital-1".to_string())
}

/// Request carrying the active hospital header
fn panel(client: &Client, method: reqwest::Method, path: &str) -> RequestBuilder {
    client
        .request(method, format!("{}{}", BASE_URL, path))
        .header("X-Hospital-Id", hospital_id())
        .header("X-User-Id", "integration-tests")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_missing_hospital_header_is_rejected() {
    let client = Client::new();

    let response = client
        .get(format!("{}/appointments", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["message"].as_str().unwrap_or_default().contains("X-Hospital-Id"));
}

#[tokio::test]
#[ignore]
async fn test_list_appointments_paginates() {
    let client = Client::new();

    let response = panel(&client, reqwest::Method::GET, "/appointments?page=1&per_page=5")
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["page"], 1);
    assert_eq!(body["per_page"], 5);
    let appointments = body["appointments"].as_array().expect("No appointments array");
    assert!(appointments.len() <= 5);
    for entry in appointments {
        assert!(entry["display_status"].is_string());
        assert!(entry["id"].is_string());
    }
}

#[tokio::test]
#[ignore]
async fn test_malformed_date_filter_is_bad_request() {
    let client = Client::new();

    let response = panel(&client, reqwest::Method::GET, "/appointments?start_date=01.02.2024")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_update_unknown_appointment_is_not_found() {
    let client = Client::new();

    let response = panel(&client, reqwest::Method::PUT, "/appointments/00000000-missing")
        .json(&json!({ "status": "cancelled" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_calendar_for_leap_february() {
    let client = Client::new();

    let response = panel(&client, reqwest::Method::GET, "/schedules/calendar?year=2024&month=2")
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["days"].as_array().map(Vec::len), Some(29));
    assert_eq!(body["days"][0]["date"], "2024-02-01");
}

#[tokio::test]
#[ignore]
async fn test_invalid_calendar_month() {
    let client = Client::new();

    let response = panel(&client, reqwest::Method::GET, "/schedules/calendar?year=2024&month=13")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_timed_holiday_blocks_slot_until_deleted() {
    let client = Client::new();

    let response = panel(&client, reqwest::Method::POST, "/hospital/holidays")
        .json(&json!({
            "date": "2031-04-01",
            "reason": "Fire drill",
            "is_full_day": false,
            "start_time": "10:00",
            "end_time": "11:00"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let holiday: Value = response.json().await.expect("Failed to parse response");
    let holiday_id = holiday["id"].as_str().expect("No holiday id").to_string();

    for (time, expected) in [("10:15", true), ("11:00", false), ("13:00", false)] {
        let response = panel(
            &client,
            reqwest::Method::GET,
            &format!("/appointments/blocked?date=2031-04-01&time={}", time),
        )
        .send()
        .await
        .expect("Failed to send request");

        let body: Value = response.json().await.expect("Failed to parse response");
        assert_eq!(body["blocked"], expected, "slot {}", time);
    }

    let response = panel(&client, reqwest::Method::DELETE, &format!("/hospital/holidays/{}", holiday_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);

    let response = panel(&client, reqwest::Method::DELETE, &format!("/hospital/holidays/{}", holiday_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_timed_holiday_without_end_is_rejected() {
    let client = Client::new();

    let response = panel(&client, reqwest::Method::POST, "/hospital/holidays")
        .json(&json!({
            "date": "2031-04-02",
            "reason": "Half day",
            "is_full_day": false,
            "start_time": "13:00"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_hospital_working_hours_round_trip() {
    let client = Client::new();

    let response = panel(&client, reqwest::Method::GET, "/hospital/working-hours")
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let original: Value = response.json().await.expect("Failed to parse response");

    let response = panel(&client, reqwest::Method::PUT, "/hospital/working-hours")
        .json(&json!({
            "is_open_24_hours": false,
            "days": {
                "monday": { "is_open": true, "start": "08:30", "end": "17:15" }
            }
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["days"]["monday"]["start"], "08:30");
    assert_eq!(body["days"]["monday"]["end"], "17:15");
    assert_eq!(body["days"]["tuesday"]["is_open"], false);

    // Restore what was there before
    let days = original["days"].clone();
    panel(&client, reqwest::Method::PUT, "/hospital/working-hours")
        .json(&json!({ "is_open_24_hours": original["is_open_24_hours"], "days": days }))
        .send()
        .await
        .expect("Failed to send request");
}

#[tokio::test]
#[ignore]
async fn test_inverted_working_hours_are_rejected() {
    let client = Client::new();

    let response = panel(&client, reqwest::Method::PUT, "/hospital/working-hours")
        .json(&json!({
            "is_open_24_hours": false,
            "days": {
                "friday": { "is_open": true, "start": "18:00", "end": "09:00" }
            }
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}
