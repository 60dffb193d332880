//! Shared test fixtures: the real router wired to seeded in-memory
//! directories, driven through `tower::ServiceExt::oneshot`.

use crate::config::AuthdConfig;
use crate::create_app;
use crate::state::AppState;
use axum::body::Body;
use axum::Router;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use identity::{
    hash_password, scope_set, ClientRecord, InMemoryClientDirectory, InMemoryUserDirectory, Scope,
    UserRecord,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// The seeds mirror the demo deployment: client "client"/"password" with
/// user_creation + user_authorize, user "amy"/"password" with user_profile.
pub struct TestFixture {
    pub app: Router,
    pub state: AppState,
}

impl TestFixture {
    pub fn new() -> Self {
        let _ = env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .is_test(true)
            .try_init();

        let clients = Arc::new(InMemoryClientDirectory::new());
        clients.register(
            "client",
            ClientRecord {
                secret: "password".to_string(),
                scopes: scope_set([Scope::UserCreation, Scope::UserAuthorize]),
            },
        );
        let users = Arc::new(InMemoryUserDirectory::new());
        users.register(
            "amy",
            UserRecord {
                password_hash: hash_password("password").expect("hash seed password"),
                scopes: scope_set([Scope::UserProfile]),
            },
        );

        let state = AppState::new(AuthdConfig::default(), clients, users);
        let app = create_app(state.clone());
        Self { app, state }
    }

    /// Issue a client token for the seeded demo client.
    pub async fn client_token(&self) -> String {
        let response = self
            .post_form(
                "/token",
                "grant_type=client_credentials&client_id=client&client_secret=password",
                &[],
            )
            .await;
        response.assert_ok();
        response.json["access_token"]
            .as_str()
            .expect("access_token in response")
            .to_string()
    }

    /// Issue a user token through the password grant, authenticated by
    /// `client_token`.
    pub async fn user_token(&self, username: &str, password: &str, client_token: &str) -> String {
        let response = self
            .post_form(
                "/token",
                &format!("grant_type=password&username={username}&password={password}"),
                &[Self::bearer(client_token)],
            )
            .await;
        response.assert_ok();
        response.json["access_token"]
            .as_str()
            .expect("access_token in response")
            .to_string()
    }

    pub async fn get(&self, uri: &str, headers: &[(&str, String)]) -> TestResponse {
        let mut builder = Request::builder().method(Method::GET).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, value);
        }
        self.send(builder.body(Body::empty()).expect("build request"))
            .await
    }

    pub async fn post_form(
        &self,
        uri: &str,
        body: &str,
        headers: &[(&str, String)],
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("Content-Type", "application/x-www-form-urlencoded");
        for (name, value) in headers {
            builder = builder.header(*name, value);
        }
        self.send(
            builder
                .body(Body::from(body.to_string()))
                .expect("build request"),
        )
        .await
    }

    pub async fn post_json<T: Serialize>(
        &self,
        uri: &str,
        body: &T,
        headers: &[(&str, String)],
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("Content-Type", "application/json");
        for (name, value) in headers {
            builder = builder.header(*name, value);
        }
        let payload = serde_json::to_vec(body).expect("serialize request body");
        self.send(builder.body(Body::from(payload)).expect("build request"))
            .await
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("send request");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("read response body")
            .to_bytes();
        let body = String::from_utf8_lossy(&bytes).to_string();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        TestResponse { status, body, json }
    }

    /// Authorization header carrying a bearer token.
    pub fn bearer(token: &str) -> (&'static str, String) {
        ("Authorization", format!("Bearer {token}"))
    }

    /// Authorization header carrying Basic credentials.
    pub fn basic(id: &str, secret: &str) -> (&'static str, String) {
        (
            "Authorization",
            format!("Basic {}", STANDARD.encode(format!("{id}:{secret}"))),
        )
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: String,
    pub json: Value,
}

impl TestResponse {
    pub fn assert_status(&self, expected: StatusCode) {
        assert_eq!(
            self.status, expected,
            "unexpected status, body: {}",
            self.body
        );
    }

    pub fn assert_ok(&self) {
        self.assert_status(StatusCode::OK);
    }

    pub fn json_as<T: DeserializeOwned>(&self) -> T {
        serde_json::from_value(self.json.clone()).expect("deserialize response body")
    }
}
