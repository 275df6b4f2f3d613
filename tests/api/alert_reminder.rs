use basename_alerts::domain::alert_preference::AlertPreference;
use basename_alerts::store::{KeyValueStore, StoreError};
use chrono::Utc;
use std::sync::Arc;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{expiring_in, expiring_in_utc_string, TestApp};

/// A store whose connection is gone.
struct UnreachableStore;

fn connection_refused() -> StoreError {
    StoreError::Redis(redis::RedisError::from((
        redis::ErrorKind::IoError,
        "connection refused",
    )))
}

#[async_trait::async_trait]
impl KeyValueStore for UnreachableStore {
    async fn keys(&self, _prefix: &str) -> Result<Vec<String>, StoreError> {
        Err(connection_refused())
    }

    async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(connection_refused())
    }

    async fn set(&self, _key: &str, _value: String) -> Result<(), StoreError> {
        Err(connection_refused())
    }
}

fn alert(test_app: &TestApp, expires_in_days: i64) -> AlertPreference {
    AlertPreference {
        enabled: true,
        token: Some(String::from("T")),
        url: Some(test_app.push_url()),
        base_name: String::from("alice"),
        expiry_date: Some(expiring_in(expires_in_days)),
        last_notification_sent: None,
    }
}

#[tokio::test]
async fn reminders_are_rejected_without_a_matching_secret() {
    let test_app = TestApp::spawn_app().await;
    test_app
        .store_alert("alert:42:alice", &alert(&test_app, 1))
        .await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&test_app.push_server)
        .await;

    let same_length_secret = format!("Bearer {}", "x".repeat(test_app.cron_secret.len()));

    // This is a common practice and it is called table-driven tests.
    let test_cases = vec![
        (None, "missing authorization header"),
        (Some("Bearer wrong-secret"), "wrong secret"),
        (Some(same_length_secret.as_str()), "wrong secret of the same length"),
        (Some(test_app.cron_secret.as_str()), "secret without bearer scheme"),
    ];

    for (authorization, error_message) in test_cases {
        let response = test_app.trigger_reminders(authorization).await;

        assert_eq!(
            401,
            response.status().as_u16(),
            "The API did not fail with 401 status when request had {}",
            error_message
        );
    }

    let stored = test_app.load_alert("alert:42:alice").await.unwrap();
    assert!(stored.last_notification_sent.is_none());
}

#[tokio::test]
async fn alert_expiring_tomorrow_is_notified() {
    let test_app = TestApp::spawn_app().await;
    test_app
        .store_alert("alert:42:alice", &alert(&test_app, 1))
        .await;

    Mock::given(path("/push"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&test_app.push_server)
        .await;

    let before = Utc::now();
    let response = test_app.trigger_reminders_authorized().await;
    let after = Utc::now();

    assert_eq!(200, response.status().as_u16());

    let report: serde_json::Value = response.json().await.unwrap();
    assert_eq!(report["success"], true);
    assert_eq!(report["notificationsSent"], serde_json::json!([42]));

    let sent_at = test_app
        .load_alert("alert:42:alice")
        .await
        .unwrap()
        .last_notification_sent
        .expect("lastNotificationSent was not stamped");
    assert!(before <= sent_at && sent_at <= after);
}

#[tokio::test]
async fn alert_expiring_in_five_days_is_skipped() {
    let test_app = TestApp::spawn_app().await;
    let preference = alert(&test_app, 5);
    test_app.store_alert("alert:42:alice", &preference).await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&test_app.push_server)
        .await;

    let response = test_app.trigger_reminders_authorized().await;
    let report: serde_json::Value = response.json().await.unwrap();

    assert_eq!(report["notificationsSentCount"], 0);
    assert_eq!(report["skipped"][0]["fid"], 42);
    assert!(report["skipped"][0]["reason"]
        .as_str()
        .unwrap()
        .contains("5 days until expiry"));
    assert_eq!(
        test_app.load_alert("alert:42:alice").await,
        Some(preference)
    );
}

#[tokio::test]
async fn reminders_can_be_triggered_with_post() {
    let test_app = TestApp::spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/cron/alert-reminder", test_app.address))
        .header("Authorization", format!("Bearer {}", test_app.cron_secret))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(200, response.status().as_u16());

    let report: serde_json::Value = response.json().await.unwrap();
    assert_eq!(report["notificationsSentCount"], 0);
    assert_eq!(report["errorsCount"], 0);
}

#[tokio::test]
async fn running_twice_a_day_notifies_once() {
    let test_app = TestApp::spawn_app().await;
    test_app
        .store_alert("alert:42:alice", &alert(&test_app, 0))
        .await;

    Mock::given(path("/push"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&test_app.push_server)
        .await;

    test_app.trigger_reminders_authorized().await;
    let response = test_app.trigger_reminders_authorized().await;
    let report: serde_json::Value = response.json().await.unwrap();

    assert_eq!(report["notificationsSentCount"], 0);
    assert_eq!(report["skipped"][0]["reason"], "Already notified today");
}

#[tokio::test]
async fn corrupt_alerts_are_reported_as_errors() {
    let test_app = TestApp::spawn_app().await;
    test_app
        .backend
        .set("alert:7:bob", String::from("not json at all"))
        .await
        .unwrap();
    test_app
        .store_alert("alert:42:alice", &alert(&test_app, 1))
        .await;

    Mock::given(path("/push"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&test_app.push_server)
        .await;

    let response = test_app.trigger_reminders_authorized().await;

    assert_eq!(200, response.status().as_u16());

    let report: serde_json::Value = response.json().await.unwrap();
    assert_eq!(report["notificationsSent"], serde_json::json!([42]));
    assert_eq!(report["errorsCount"], 1);
    assert_eq!(report["errors"][0]["key"], "alert:7:bob");
}

#[tokio::test]
async fn failed_deliveries_are_listed_as_undelivered() {
    let test_app = TestApp::spawn_app().await;
    test_app
        .store_alert("alert:42:alice", &alert(&test_app, 1))
        .await;

    Mock::given(path("/push"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&test_app.push_server)
        .await;

    let response = test_app.trigger_reminders_authorized().await;
    let report: serde_json::Value = response.json().await.unwrap();

    assert_eq!(report["notificationsSentCount"], 0);
    assert_eq!(report["undeliveredCount"], 1);
    assert_eq!(report["undelivered"][0]["fid"], 42);
    assert!(test_app
        .load_alert("alert:42:alice")
        .await
        .unwrap()
        .last_notification_sent
        .is_none());
}

#[tokio::test]
async fn utc_string_expiry_dates_are_notified() {
    let test_app = TestApp::spawn_app().await;
    let mut preference = alert(&test_app, 1);
    preference.expiry_date = Some(expiring_in_utc_string(1));
    test_app.store_alert("alert:42:alice", &preference).await;

    Mock::given(path("/push"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&test_app.push_server)
        .await;

    let response = test_app.trigger_reminders_authorized().await;
    let report: serde_json::Value = response.json().await.unwrap();

    assert_eq!(report["notificationsSent"], serde_json::json!([42]));
}

#[tokio::test]
async fn unreachable_store_returns_500() {
    let test_app = TestApp::spawn_app_with_backend(Arc::new(UnreachableStore)).await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&test_app.push_server)
        .await;

    let response = test_app.trigger_reminders_authorized().await;

    assert_eq!(500, response.status().as_u16());

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to process alert notifications"));
}
