//! Login and registration against a mocked parcel service.

#![allow(clippy::unwrap_used)]

use parcel_console::{ConsoleError, Registration, auth};
use parcel_console_integration_tests::TestService;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

fn registration(email: &str) -> Registration {
    Registration {
        firstname: "Ada".to_string(),
        lastname: "Lovelace".to_string(),
        email: email.to_string(),
        username: "ada".to_string(),
        password: SecretString::from("correct horse battery"),
    }
}

#[tokio::test]
async fn login_installs_token_for_later_requests() {
    let service = TestService::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/authenticate"))
        .and(body_json(json!({ "username": "ada", "password": "hunter22" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "jwt.token.value" })))
        .expect(1)
        .mount(&service.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/parcels"))
        .and(header("authorization", "Bearer jwt.token.value"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&service.server)
        .await;

    let token = auth::login(&service.client, "ada", &SecretString::from("hunter22"))
        .await
        .unwrap();

    assert_eq!(token.expose_secret(), "jwt.token.value");
    assert!(service.client.has_token().await);
    service.console.parcels().load_all().await.unwrap();
}

#[tokio::test]
async fn rejected_login_is_service_unavailable() {
    let service = TestService::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/authenticate"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&service.server)
        .await;

    let result = auth::login(&service.client, "ada", &SecretString::from("wrong")).await;

    assert!(matches!(result, Err(ConsoleError::ServiceUnavailable(_))));
    assert!(!service.client.has_token().await);
}

#[tokio::test]
async fn register_sends_all_fields() {
    let service = TestService::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/register"))
        .and(body_json(json!({
            "firstname": "Ada",
            "lastname": "Lovelace",
            "email": "ada@depot.io",
            "username": "ada",
            "password": "correct horse battery"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&service.server)
        .await;

    auth::register(&service.client, &registration("ada@depot.io"))
        .await
        .unwrap();
}

#[tokio::test]
async fn register_duplicate_email_is_conflict() {
    let service = TestService::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/register"))
        .respond_with(ResponseTemplate::new(409).set_body_string("Email already exists"))
        .mount(&service.server)
        .await;

    let err = auth::register(&service.client, &registration("ada@depot.io"))
        .await
        .unwrap_err();

    assert!(matches!(err, ConsoleError::Conflict(_)));
    assert_eq!(err.notification().title, "Email Already Exists");
}

#[tokio::test]
async fn register_server_error_is_service_unavailable() {
    let service = TestService::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/register"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&service.server)
        .await;

    let result = auth::register(&service.client, &registration("ada@depot.io")).await;
    assert!(matches!(result, Err(ConsoleError::ServiceUnavailable(_))));
}

#[tokio::test]
async fn register_invalid_email_never_posts() {
    let service = TestService::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/register"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&service.server)
        .await;

    let result = auth::register(&service.client, &registration("ada.depot.io")).await;
    assert!(matches!(result, Err(ConsoleError::Validation(_))));
}
