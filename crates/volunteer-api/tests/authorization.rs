//! Authorization tests
//!
//! Each protected route is probed with credentials that fail at a different
//! step. The first failing step decides the response, and nothing is written.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use common::{assert_error, tokens, TestApp};
use volunteer_api::Store;

/// A write request and the body it carries
struct Probe {
    method: Method,
    uri: &'static str,
    body: Option<Value>,
}

fn event_writes() -> Vec<Probe> {
    vec![
        Probe {
            method: Method::POST,
            uri: "/events",
            body: Some(json!({ "name": "new event", "organisation_id": 1 })),
        },
        Probe {
            method: Method::PATCH,
            uri: "/events/1",
            body: Some(json!({ "name": "new name" })),
        },
        Probe {
            method: Method::DELETE,
            uri: "/events/1",
            body: None,
        },
    ]
}

fn participant_writes() -> Vec<Probe> {
    vec![
        Probe {
            method: Method::POST,
            uri: "/events/3/participants",
            body: Some(json!({ "user_id": 1 })),
        },
        Probe {
            method: Method::DELETE,
            uri: "/events/1/participants",
            body: Some(json!({ "user_id": 1 })),
        },
    ]
}

fn all_writes() -> Vec<Probe> {
    let mut probes = event_writes();
    probes.extend(participant_writes());
    probes
}

async fn send(app: &TestApp, probe: &Probe, token: Option<&str>) -> (StatusCode, Value) {
    app.send(probe.method.clone(), probe.uri, token, probe.body.clone())
        .await
}

/// Snapshot of everything a write could change
async fn snapshot(app: &TestApp) -> Vec<volunteer_core::Event> {
    app.store.list_events().await.unwrap()
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn test_missing_credentials() {
    let app = TestApp::new().await;
    let before = snapshot(&app).await;

    for probe in all_writes() {
        let response = send(&app, &probe, None).await;
        assert_error(&response, StatusCode::UNAUTHORIZED, "authorization_header_missing");
    }

    assert_eq!(snapshot(&app).await, before);
}

#[tokio::test]
async fn test_unknown_token() {
    let app = TestApp::new().await;

    for probe in all_writes() {
        let response = send(&app, &probe, Some("forged-token")).await;
        assert_error(&response, StatusCode::UNAUTHORIZED, "invalid_token");
    }
}

#[tokio::test]
async fn test_malformed_authorization_header() {
    let app = TestApp::new().await;

    for header in ["Basic abc", "Bearer", "Bearer a b", tokens::ORG] {
        let request = axum::http::Request::builder()
            .method(Method::DELETE)
            .uri("/events/1")
            .header("authorization", header)
            .body(axum::body::Body::empty())
            .unwrap();

        let response = app.send_request(request).await;
        assert_error(&response, StatusCode::UNAUTHORIZED, "invalid_header");
    }
    assert!(app.store.get_event(1).await.unwrap().is_some());
}

#[tokio::test]
async fn test_authentication_precedes_body_parsing() {
    let app = TestApp::new().await;
    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/events")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("not json"))
        .unwrap();

    assert_error(
        &app.send_request(request).await,
        StatusCode::UNAUTHORIZED,
        "authorization_header_missing",
    );
}

#[tokio::test]
async fn test_reads_need_no_credentials() {
    let app = TestApp::new().await;

    for uri in ["/events", "/events/1", "/organisations", "/organisations/1"] {
        let (status, body) = app.get(uri).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert_eq!(body["success"], true);
    }
}

// =============================================================================
// Permission gate
// =============================================================================

#[tokio::test]
async fn test_owner_without_permission_is_denied() {
    let app = TestApp::new().await;
    let before = snapshot(&app).await;

    for probe in event_writes() {
        let response = send(&app, &probe, Some(tokens::ORG_NO_PERMISSIONS)).await;
        assert_error(&response, StatusCode::FORBIDDEN, "unauthorized");
    }
    for probe in participant_writes() {
        let response = send(&app, &probe, Some(tokens::USER_NO_PERMISSIONS)).await;
        assert_error(&response, StatusCode::FORBIDDEN, "unauthorized");
    }

    assert_eq!(snapshot(&app).await, before);
}

#[tokio::test]
async fn test_wrong_permission_is_denied() {
    let app = TestApp::new().await;

    // Holding update:event does not allow creating
    let response = app
        .send(
            Method::POST,
            "/events",
            Some(tokens::ORG_UPDATE_ONLY),
            Some(json!({
                "name": "E1",
                "organisation_id": 1,
                "start_datetime": "2021-01-12T10:00:00",
                "end_datetime": "2021-01-12T12:00:00",
            })),
        )
        .await;
    assert_error(&response, StatusCode::FORBIDDEN, "unauthorized");

    // ...but does allow updating
    let (status, _) = app
        .send(
            Method::PATCH,
            "/events/1",
            Some(tokens::ORG_UPDATE_ONLY),
            Some(json!({ "name": "renamed" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_permission_gate_precedes_everything_else() {
    let app = TestApp::new().await;

    // Unknown organisation, unknown event and malformed bodies all hide
    // behind the missing permission
    let probes = [
        (Method::POST, "/events", Some(json!({ "organisation_id": 100 }))),
        (Method::PATCH, "/events/1000", Some(json!({ "organisation_id": 2 }))),
        (Method::DELETE, "/events/1000", None),
        (Method::POST, "/events/1000/participants", Some(json!({}))),
    ];

    for (method, uri, body) in probes {
        let response = app
            .send(method, uri, Some(tokens::STRANGER_NO_PERMISSIONS), body)
            .await;
        assert_error(&response, StatusCode::FORBIDDEN, "unauthorized");
    }

    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/events")
        .header("authorization", format!("Bearer {}", tokens::STRANGER_NO_PERMISSIONS))
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{broken"))
        .unwrap();
    assert_error(
        &app.send_request(request).await,
        StatusCode::FORBIDDEN,
        "unauthorized",
    );
}

// =============================================================================
// Ownership
// =============================================================================

#[tokio::test]
async fn test_non_owner_with_permission_is_denied() {
    let app = TestApp::new().await;
    let before = snapshot(&app).await;

    for probe in all_writes() {
        let response = send(&app, &probe, Some(tokens::STRANGER)).await;
        assert_error(&response, StatusCode::FORBIDDEN, "access is forbidden");
    }

    assert_eq!(snapshot(&app).await, before);
}

#[tokio::test]
async fn test_organisation_cannot_create_for_another_organisation() {
    let app = TestApp::new().await;

    let response = app
        .send(
            Method::POST,
            "/events",
            Some(tokens::ORG),
            Some(json!({ "name": "new event", "organisation_id": 2 })),
        )
        .await;
    assert_error(&response, StatusCode::FORBIDDEN, "access is forbidden");
}

#[tokio::test]
async fn test_organisation_cannot_touch_other_events() {
    let app = TestApp::new().await;

    // Event 2 belongs to organisation 2, which has no identity at all
    let response = app
        .send(
            Method::PATCH,
            "/events/2",
            Some(tokens::ORG),
            Some(json!({ "name": "hijacked" })),
        )
        .await;
    assert_error(&response, StatusCode::FORBIDDEN, "access is forbidden");

    let response = app
        .send(Method::DELETE, "/events/2", Some(tokens::ORG), None)
        .await;
    assert_error(&response, StatusCode::FORBIDDEN, "access is forbidden");
    assert!(app.store.get_event(2).await.unwrap().is_some());
}

#[tokio::test]
async fn test_participation_is_managed_by_the_user_only() {
    let app = TestApp::new().await;

    // The owning organisation cannot enrol or drop a user
    let response = app
        .send(
            Method::DELETE,
            "/events/1/participants",
            Some(tokens::ORG),
            Some(json!({ "user_id": 1 })),
        )
        .await;
    assert_error(&response, StatusCode::FORBIDDEN, "access is forbidden");

    // A user cannot act for another user, even one without an identity
    let response = app
        .send(
            Method::POST,
            "/events/3/participants",
            Some(tokens::USER),
            Some(json!({ "user_id": 3 })),
        )
        .await;
    assert_error(&response, StatusCode::FORBIDDEN, "access is forbidden");

    let event = app.store.get_event(1).await.unwrap().unwrap();
    assert!(event.participants.contains(&1));
}

#[tokio::test]
async fn test_ownership_precedes_body_validation() {
    let app = TestApp::new().await;

    let response = app
        .send(
            Method::PATCH,
            "/events/1",
            Some(tokens::STRANGER),
            Some(json!({ "organisation_id": 2, "end_datetime": "garbage" })),
        )
        .await;
    assert_error(&response, StatusCode::FORBIDDEN, "access is forbidden");
}

#[tokio::test]
async fn test_reasons_are_independently_triggerable() {
    let app = TestApp::new().await;
    let body = json!({ "name": "new event", "organisation_id": 1 });

    let owner_without_permission = app
        .send(Method::POST, "/events", Some(tokens::ORG_UPDATE_ONLY), Some(body.clone()))
        .await;
    let permitted_non_owner = app
        .send(Method::POST, "/events", Some(tokens::STRANGER), Some(body.clone()))
        .await;
    let failing_both = app
        .send(
            Method::POST,
            "/events",
            Some(tokens::STRANGER_NO_PERMISSIONS),
            Some(body.clone()),
        )
        .await;
    let allowed = app
        .send(Method::POST, "/events", Some(tokens::ORG), Some(body))
        .await;

    assert_error(&owner_without_permission, StatusCode::FORBIDDEN, "unauthorized");
    assert_error(&permitted_non_owner, StatusCode::FORBIDDEN, "access is forbidden");
    assert_error(&failing_both, StatusCode::FORBIDDEN, "unauthorized");
    assert_eq!(allowed.0, StatusCode::OK);
}
