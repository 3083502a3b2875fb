mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_reports_database_status(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
    assert_eq!(json["cache_healthy"], true);
    assert!(json["version"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn responses_carry_a_request_id(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(app, "/health").await;

    assert!(response.headers().contains_key("x-request-id"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_route_is_not_found(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(app, "/api/v1/nothing-here").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn preflight_from_the_web_client_is_allowed(pool: PgPool) {
    use axum::body::Body;
    use axum::http::{Method, Request};
    use tower::ServiceExt;

    let app = build_test_app(pool);
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/regions")
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:5173"
    );
}
