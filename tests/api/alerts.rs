use basename_alerts::domain::delivery_credential::DeliveryCredential;
use basename_alerts::domain::subscriber_id::SubscriberId;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{expiring_in, expiring_in_utc_string, TestApp};

#[tokio::test]
async fn setup_persists_the_alert_and_sends_a_confirmation() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(path("/push"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&test_app.push_server)
        .await;

    let body = serde_json::json!({
        "enabled": true,
        "baseName": "alice",
        "expiryDate": expiring_in(30),
        "token": "T",
        "url": test_app.push_url(),
    });
    let response = test_app.post_setup_alert(Some("42"), body).await;

    assert_eq!(200, response.status().as_u16());

    let stored = test_app.load_alert("alert:42:alice").await.unwrap();
    assert!(stored.enabled);
    assert_eq!(stored.token.as_deref(), Some("T"));

    let registration = test_app
        .store
        .get_notification_details(SubscriberId::from(42))
        .await
        .unwrap();
    assert_eq!(
        registration,
        Some(DeliveryCredential {
            token: String::from("T"),
            url: test_app.push_url(),
        })
    );

    let received_requests = test_app.push_server.received_requests().await.unwrap();
    let confirmation: serde_json::Value =
        serde_json::from_slice(&received_requests[0].body).unwrap();
    assert_eq!(confirmation["body"], "alice Alert has been set");
}

#[tokio::test]
async fn setup_without_credentials_sends_nothing() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&test_app.push_server)
        .await;

    let body = serde_json::json!({
        "enabled": false,
        "baseName": "alice",
    });
    let response = test_app.post_setup_alert(Some("42"), body).await;

    assert_eq!(200, response.status().as_u16());

    let stored = test_app.load_alert("alert:42:alice").await.unwrap();
    assert!(!stored.enabled);
}

#[tokio::test]
async fn setup_accepts_utc_string_expiry_dates() {
    let test_app = TestApp::spawn_app().await;
    let expiry_date = expiring_in_utc_string(30);

    let body = serde_json::json!({
        "enabled": true,
        "baseName": "alice",
        "expiryDate": expiry_date,
    });
    let response = test_app.post_setup_alert(Some("42"), body).await;

    assert_eq!(200, response.status().as_u16());

    let stored = test_app.load_alert("alert:42:alice").await.unwrap();
    assert_eq!(stored.expiry_date, Some(expiry_date));
}

#[tokio::test]
async fn setup_returns_400_when_request_is_invalid() {
    let test_app = TestApp::spawn_app().await;

    // This is a common practice and it is called table-driven tests. In this case, it simulates different kind of possible
    // requests where API should return 400.
    let test_cases = vec![
        (
            None,
            serde_json::json!({"enabled": true, "baseName": "alice", "expiryDate": expiring_in(3)}),
            "missing FID header",
        ),
        (
            Some("alice"),
            serde_json::json!({"enabled": true, "baseName": "alice", "expiryDate": expiring_in(3)}),
            "non numeric FID header",
        ),
        (
            Some("42"),
            serde_json::json!({"enabled": true, "expiryDate": expiring_in(3)}),
            "missing basename",
        ),
        (
            Some("42"),
            serde_json::json!({"enabled": "yes", "baseName": "alice", "expiryDate": expiring_in(3)}),
            "enabled is not a boolean",
        ),
        (
            Some("42"),
            serde_json::json!({"enabled": true, "baseName": "alice"}),
            "enabling without expiry date",
        ),
        (
            Some("42"),
            serde_json::json!({"enabled": true, "baseName": "al:ice", "expiryDate": expiring_in(3)}),
            "basename with key separator",
        ),
        (
            Some("42"),
            serde_json::json!({"enabled": true, "baseName": "alice", "expiryDate": "15 Mar 2025 GMT"}),
            "unreadable expiry date",
        ),
    ];

    for (fid, invalid_body, error_message) in test_cases {
        let response = test_app.post_setup_alert(fid, invalid_body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 status when payload was {}",
            error_message
        );
    }

    assert!(test_app.load_alert("alert:42:alice").await.is_none());
}

#[tokio::test]
async fn status_returns_the_stored_alert() {
    let test_app = TestApp::spawn_app().await;
    let expiry_date = expiring_in(10);

    let body = serde_json::json!({
        "enabled": true,
        "baseName": "alice",
        "expiryDate": expiry_date,
    });
    test_app.post_setup_alert(Some("42"), body).await;

    let response = test_app.get_alert_status(Some("42"), Some("alice")).await;

    assert_eq!(200, response.status().as_u16());

    let status: serde_json::Value = response.json().await.unwrap();
    assert_eq!(status["enabled"], true);
    assert_eq!(status["baseName"], "alice");
    assert_eq!(status["expiryDate"], expiry_date.as_str());
}

#[tokio::test]
async fn status_of_unknown_alert_is_disabled() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app.get_alert_status(Some("42"), Some("nobody")).await;

    assert_eq!(200, response.status().as_u16());

    let status: serde_json::Value = response.json().await.unwrap();
    assert_eq!(status, serde_json::json!({"enabled": false}));
}

#[tokio::test]
async fn status_returns_400_without_fid_or_basename() {
    let test_app = TestApp::spawn_app().await;

    let test_cases = vec![
        (None, Some("alice"), "missing FID header"),
        (Some("42"), None, "missing baseName parameter"),
    ];

    for (fid, base_name, error_message) in test_cases {
        let response = test_app.get_alert_status(fid, base_name).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 status when request had {}",
            error_message
        );
    }
}
