mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, build_test_app_with, post_json_auth, post_multipart_auth,
    signed_in_user, FormPart, TestDeps,
};
use serde_json::json;
use sqlx::PgPool;

fn folder(name: &str) -> FormPart<'_> {
    FormPart {
        name: "folder",
        filename: None,
        content_type: None,
        data: name.as_bytes(),
    }
}

fn image<'a>(filename: &'a str, content_type: &'a str, data: &'a [u8]) -> FormPart<'a> {
    FormPart {
        name: "file",
        filename: Some(filename),
        content_type: Some(content_type),
        data,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn upload_stores_under_folder(pool: PgPool) {
    let (_, token) = signed_in_user(&pool, "user@example.com").await;
    let deps = TestDeps::default();
    let storage = deps.storage.clone();
    let app = build_test_app_with(pool, deps);

    let parts = [folder("avatars"), image("me.jpeg", "image/jpeg", b"jpeg bytes")];
    let response = post_multipart_auth(app, "/api/v1/uploads", &parts, &token).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let key = json["key"].as_str().unwrap();
    assert!(key.starts_with("avatars/"));
    assert!(key.ends_with(".jpeg"));
    assert_eq!(json["url"], format!("http://storage.test/kindquest/{key}"));
    assert_eq!(storage.stored.lock().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn upload_rejects_bad_input(pool: PgPool) {
    let (_, token) = signed_in_user(&pool, "user@example.com").await;
    let app = build_test_app(pool);

    let unsupported = [folder("docs"), image("notes.txt", "text/plain", b"hello")];
    let response = post_multipart_auth(app.clone(), "/api/v1/uploads", &unsupported, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let empty = [folder("avatars"), image("me.png", "image/png", b"")];
    let response = post_multipart_auth(app.clone(), "/api/v1/uploads", &empty, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bad_folder = [folder("../etc"), image("me.png", "image/png", b"png")];
    let response = post_multipart_auth(app.clone(), "/api/v1/uploads", &bad_folder, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let no_file = [folder("avatars")];
    let response = post_multipart_auth(app, "/api/v1/uploads", &no_file, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn public_urls_keep_request_order(pool: PgPool) {
    let (_, token) = signed_in_user(&pool, "user@example.com").await;
    let app = build_test_app(pool);

    let body = json!({ "keys": ["b/2.png", "a/1.png"] });
    let response = post_json_auth(app, "/api/v1/uploads/urls", body, &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["urls"],
        json!([
            "http://storage.test/kindquest/b/2.png",
            "http://storage.test/kindquest/a/1.png"
        ])
    );
}
