//! Shared harness: a fixture-seeded router and a fixed token table

#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use volunteer_api::fixtures::{self, ORGANISATION_IDENTITY, USER_IDENTITY};
use volunteer_api::{create_router, AppState, MemoryStore};
use volunteer_auth::{StaticVerifier, VerifiedIdentity};
use volunteer_core::{IdentityRef, Permission};

pub const STRANGER_IDENTITY: &str = "auth0|000000000000000000000000";

/// Tokens accepted by the test verifier
pub mod tokens {
    /// Organisation 1 with every permission
    pub const ORG: &str = "org-token";
    /// Organisation 1 without permissions
    pub const ORG_NO_PERMISSIONS: &str = "org-no-permissions";
    /// Organisation 1 holding only `update:event`
    pub const ORG_UPDATE_ONLY: &str = "org-update-only";
    /// User 1 with every permission
    pub const USER: &str = "user-token";
    /// User 1 without permissions
    pub const USER_NO_PERMISSIONS: &str = "user-no-permissions";
    /// An identity that owns nothing, with every permission
    pub const STRANGER: &str = "stranger-token";
    /// An identity that owns nothing and holds nothing
    pub const STRANGER_NO_PERMISSIONS: &str = "stranger-no-permissions";
}

fn identity(subject: &str, permissions: &[Permission]) -> VerifiedIdentity {
    VerifiedIdentity::new(IdentityRef::new(subject).expect("test subject is not blank"))
        .with_permissions(permissions.iter().map(Permission::as_str))
}

fn verifier() -> StaticVerifier {
    StaticVerifier::new()
        .with_token(tokens::ORG, identity(ORGANISATION_IDENTITY, &Permission::ALL))
        .with_token(tokens::ORG_NO_PERMISSIONS, identity(ORGANISATION_IDENTITY, &[]))
        .with_token(
            tokens::ORG_UPDATE_ONLY,
            identity(ORGANISATION_IDENTITY, &[Permission::UpdateEvent]),
        )
        .with_token(tokens::USER, identity(USER_IDENTITY, &Permission::ALL))
        .with_token(tokens::USER_NO_PERMISSIONS, identity(USER_IDENTITY, &[]))
        .with_token(tokens::STRANGER, identity(STRANGER_IDENTITY, &Permission::ALL))
        .with_token(tokens::STRANGER_NO_PERMISSIONS, identity(STRANGER_IDENTITY, &[]))
}

/// Router over a freshly seeded store
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    pub async fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        fixtures::seed(store.as_ref())
            .await
            .expect("fixtures should seed");

        let state = Arc::new(AppState::new(store.clone(), Arc::new(verifier())));
        Self {
            router: create_router(state),
            store,
        }
    }

    /// Send a request and decode the JSON response
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.send_request(builder.body(body).expect("request should build"))
            .await
    }

    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None, None).await
    }
}

/// Assert an error envelope
pub fn assert_error(response: &(StatusCode, Value), status: StatusCode, message: &str) {
    let (actual, body) = response;
    assert_eq!(*actual, status, "unexpected status, body: {}", body);
    assert_eq!(body["success"], Value::Bool(false));
    assert_eq!(body["error"], Value::from(status.as_u16()));
    assert_eq!(body["message"], Value::from(message));
}
