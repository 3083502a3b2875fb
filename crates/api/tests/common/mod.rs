#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use kindquest_api::auth::jwt::{generate_access_token, JwtConfig};
use kindquest_api::auth::password::hash_password;
use kindquest_api::cache::{CacheConfig, MemoryCache};
use kindquest_api::config::ServerConfig;
use kindquest_api::router::build_app_router;
use kindquest_api::state::AppState;
use kindquest_cloud::{ChatError, ChatService, ObjectStorage, StorageError};
use kindquest_core::roles::{ROLE_ADMIN, ROLE_USER};
use kindquest_core::types::DbId;
use kindquest_db::models::city::CreateCity;
use kindquest_db::models::lookup::{CreateLookup, LookupKind};
use kindquest_db::models::region::CreateRegion;
use kindquest_db::models::user::{CreateUser, User};
use kindquest_db::repositories::{CityRepo, LookupRepo, RegionRepo, UserRepo};
use kindquest_events::QueuePublisher;
use sqlx::PgPool;
use tower::ServiceExt;

const TEST_JWT_SECRET: &str = "integration-test-secret-that-is-long-enough";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        db_max_connections: 5,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 15,
        },
        cache: CacheConfig::default(),
    }
}

// ---------------------------------------------------------------------------
// Fakes for external collaborators
// ---------------------------------------------------------------------------

/// Object storage that keeps keys in memory.
#[derive(Default)]
pub struct FakeStorage {
    pub stored: Mutex<Vec<String>>,
    pub deleted: Mutex<Vec<String>>,
}

#[async_trait]
impl ObjectStorage for FakeStorage {
    async fn put(&self, key: &str, _bytes: Vec<u8>, _content_type: &str) -> Result<(), StorageError> {
        self.stored.lock().unwrap().push(key.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.deleted.lock().unwrap().push(key.to_string());
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("http://storage.test/kindquest/{key}")
    }
}

/// Chat service that hands out sequential room ids, or always fails.
#[derive(Default)]
pub struct FakeChat {
    pub fail: bool,
    rooms: AtomicUsize,
}

impl FakeChat {
    pub fn failing() -> Self {
        Self {
            fail: true,
            rooms: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ChatService for FakeChat {
    async fn create_room(&self, _name: &str) -> Result<String, ChatError> {
        if self.fail {
            return Err(ChatError::Api {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        let n = self.rooms.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("room-{n}"))
    }
}

// ---------------------------------------------------------------------------
// App builders
// ---------------------------------------------------------------------------

/// Collaborators a test may want to inspect or swap.
pub struct TestDeps {
    pub storage: Arc<FakeStorage>,
    pub chat: Arc<dyn ChatService>,
}

impl Default for TestDeps {
    fn default() -> Self {
        Self {
            storage: Arc::new(FakeStorage::default()),
            chat: Arc::new(FakeChat::default()),
        }
    }
}

/// Build the full application router with the production middleware stack,
/// an in-process cache, fake storage/chat and a detached queue.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, TestDeps::default())
}

pub fn build_test_app_with(pool: PgPool, deps: TestDeps) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        cache: Arc::new(MemoryCache::new()),
        storage: deps.storage,
        chat: deps.chat,
        queue: QueuePublisher::detached(),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user row directly.
pub async fn create_user(pool: &PgPool, email: &str) -> User {
    let input = CreateUser {
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        middle_name: None,
        email: email.to_string(),
        password_hash: hash_password("test_password_123!").expect("hashing should succeed"),
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

/// Access token for a user with the `user` role.
pub fn user_token(user_id: DbId) -> String {
    generate_access_token(user_id, ROLE_USER, &test_config().jwt).expect("token should sign")
}

/// Access token for a user with the `admin` role.
pub fn admin_token(user_id: DbId) -> String {
    generate_access_token(user_id, ROLE_ADMIN, &test_config().jwt).expect("token should sign")
}

/// Create a user and return it with a `user` token.
pub async fn signed_in_user(pool: &PgPool, email: &str) -> (User, String) {
    let user = create_user(pool, email).await;
    let token = user_token(user.id);
    (user, token)
}

/// Create a user and return it with an `admin` token.
pub async fn signed_in_admin(pool: &PgPool, email: &str) -> (User, String) {
    let user = create_user(pool, email).await;
    let token = admin_token(user.id);
    (user, token)
}

/// Insert a region and a city in it, returning `(region_id, city_id)`.
pub async fn seed_city(pool: &PgPool, region: &str, city: &str) -> (DbId, DbId) {
    let region = RegionRepo::create(pool, &CreateRegion { name: region.to_string() })
        .await
        .expect("region insert");
    let city = CityRepo::create(
        pool,
        &CreateCity {
            name: city.to_string(),
            latitude: 55.79,
            longitude: 49.12,
            region_id: region.id,
        },
    )
    .await
    .expect("city insert");
    (region.id, city.id)
}

pub async fn seed_lookup(pool: &PgPool, kind: LookupKind, name: &str) -> DbId {
    LookupRepo::create(pool, kind, &CreateLookup { name: name.to_string() })
        .await
        .expect("lookup insert")
        .id
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

/// POST with no body, e.g. association endpoints.
pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// One part of a multipart form. `filename` marks a file part.
pub struct FormPart<'a> {
    pub name: &'a str,
    pub filename: Option<&'a str>,
    pub content_type: Option<&'a str>,
    pub data: &'a [u8],
}

const BOUNDARY: &str = "kindquest-test-boundary";

pub async fn post_multipart_auth(
    app: Router,
    uri: &str,
    parts: &[FormPart<'_>],
    token: &str,
) -> Response<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        let disposition = match part.filename {
            Some(filename) => format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{filename}\"\r\n",
                part.name
            ),
            None => format!("Content-Disposition: form-data; name=\"{}\"\r\n", part.name),
        };
        body.extend_from_slice(disposition.as_bytes());
        if let Some(content_type) = part.content_type {
            body.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}
