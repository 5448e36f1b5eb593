#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use agrinit_api::auth::jwt::JwtConfig;
use agrinit_api::auth::{AuthError, AuthProvider, AuthUserRecord, Session, SessionUser};
use agrinit_api::config::{AuthBackend, LogFormat, ServerConfig, StoreBackend, DEFAULT_ROUTE_PREFIX};
use agrinit_api::router::build_app_router;
use agrinit_api::state::AppState;
use agrinit_core::user::CallerIdentity;
use agrinit_db::kv::{KvError, KvStore, MemoryKvStore};

/// Token accepted by every [`StubAuthProvider`] built with [`StubAuthProvider::with_default_user`].
pub const VALID_TOKEN: &str = "valid-test-token";
pub const TEST_USER_ID: &str = "user-0001";

/// Prefix every test path goes through.
pub const PREFIX: &str = DEFAULT_ROUTE_PREFIX;

/// `"/initiatives"` -> `"/make-server/initiatives"`.
pub fn path(route: &str) -> String {
    format!("{PREFIX}{route}")
}

/// Build a test `ServerConfig` with safe defaults.
///
/// Memory store, local auth settings (unused by the stub provider), no anon
/// key, and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        route_prefix: DEFAULT_ROUTE_PREFIX.to_string(),
        request_timeout_secs: 30,
        log_format: LogFormat::Pretty,
        store: StoreBackend::Memory,
        auth: AuthBackend::Local {
            jwt: test_jwt_config(),
        },
        public_anon_key: None,
    }
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret".to_string(),
        access_token_expiry_mins: 15,
    }
}

// ---------------------------------------------------------------------------
// Scripted auth provider
// ---------------------------------------------------------------------------

/// Auth provider with a fixed token table.
///
/// Counts `get_user` calls so tests can assert the gate reached (or did not
/// reach) the provider, and can be switched into an outage mode.
#[derive(Default)]
pub struct StubAuthProvider {
    tokens: Mutex<HashMap<String, CallerIdentity>>,
    created: Mutex<Vec<(String, String)>>,
    lookups: AtomicUsize,
    unavailable: AtomicBool,
}

impl StubAuthProvider {
    pub fn with_default_user() -> Self {
        let stub = Self::default();
        stub.add_token(VALID_TOKEN, TEST_USER_ID);
        stub
    }

    pub fn add_token(&self, token: &str, user_id: &str) {
        self.tokens.lock().unwrap().insert(
            token.to_string(),
            CallerIdentity {
                user_id: user_id.to_string(),
                email: Some(format!("{user_id}@example.com")),
            },
        );
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), AuthError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(AuthError::Unavailable("stub outage".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl AuthProvider for StubAuthProvider {
    async fn create_user(
        &self,
        email: &str,
        _password: &str,
        _name: &str,
    ) -> Result<AuthUserRecord, AuthError> {
        self.check_available()?;
        let mut created = self.created.lock().unwrap();
        if created.iter().any(|(_, e)| e == email) {
            return Err(AuthError::Rejected(
                "A user with this email address has already been registered".into(),
            ));
        }
        let id = format!("stub-user-{}", created.len() + 1);
        created.push((id.clone(), email.to_string()));
        Ok(AuthUserRecord {
            id,
            email: email.to_string(),
        })
    }

    async fn sign_in(&self, email: &str, _password: &str) -> Result<Session, AuthError> {
        self.check_available()?;
        let created = self.created.lock().unwrap();
        let (id, _) = created
            .iter()
            .find(|(_, e)| e == email)
            .ok_or(AuthError::InvalidCredentials)?;
        Ok(Session {
            access_token: format!("token-for-{id}"),
            expires_in: 3600,
            user: SessionUser {
                id: id.clone(),
                email: Some(email.to_string()),
                name: None,
            },
        })
    }

    async fn get_user(&self, access_token: &str) -> Result<CallerIdentity, AuthError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        self.tokens
            .lock()
            .unwrap()
            .get(access_token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}

// ---------------------------------------------------------------------------
// Failing store
// ---------------------------------------------------------------------------

/// Store whose every operation fails like an unreachable database.
pub struct FailingKvStore;

#[async_trait]
impl KvStore for FailingKvStore {
    async fn get(&self, _key: &str) -> Result<Option<Value>, KvError> {
        Err(KvError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn set(&self, _key: &str, _value: Value) -> Result<(), KvError> {
        Err(KvError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn delete(&self, _key: &str) -> Result<(), KvError> {
        Err(KvError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn get_by_prefix(&self, _prefix: &str) -> Result<Vec<Value>, KvError> {
        Err(KvError::Database(sqlx::Error::PoolTimedOut))
    }
}

// ---------------------------------------------------------------------------
// App builders
// ---------------------------------------------------------------------------

/// Everything a test needs to drive the app and inspect its collaborators.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryKvStore>,
    pub auth: Arc<StubAuthProvider>,
}

/// Build the full application router over a fresh memory store and a stub
/// provider that accepts [`VALID_TOKEN`].
pub fn build_test_app() -> TestApp {
    build_test_app_with_config(test_config())
}

pub fn build_test_app_with_config(config: ServerConfig) -> TestApp {
    let store = Arc::new(MemoryKvStore::new());
    let auth = Arc::new(StubAuthProvider::with_default_user());
    let state = AppState {
        store: store.clone(),
        auth: auth.clone(),
        config: Arc::new(config.clone()),
    };
    TestApp {
        router: build_app_router(state, &config),
        store,
        auth,
    }
}

/// Build the app over arbitrary collaborators.
pub fn build_app_with(store: Arc<dyn KvStore>, auth: Arc<dyn AuthProvider>) -> Router {
    let config = test_config();
    let state = AppState {
        store,
        auth,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(
        app,
        Request::builder().uri(uri).body(Body::empty()).unwrap(),
    )
    .await
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, json_request(Method::POST, uri, None, &body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    send(app, json_request(Method::POST, uri, Some(token), &body)).await
}

pub async fn put_json_auth(app: Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    send(app, json_request(Method::PUT, uri, Some(token), &body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(
        app,
        Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

/// Collect the response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create an initiative through the API and return its JSON.
pub async fn create_initiative(app: &Router, body: Value) -> Value {
    let response = post_json_auth(app.clone(), &path("/initiatives"), VALID_TOKEN, body).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["initiative"].clone()
}
