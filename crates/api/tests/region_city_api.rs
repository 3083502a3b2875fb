mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, delete_auth, get, patch_json_auth, post_json, post_json_auth,
    seed_city, signed_in_admin, signed_in_user,
};
use kindquest_db::models::region::CreateRegion;
use kindquest_db::repositories::RegionRepo;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn region_lifecycle(pool: PgPool) {
    let (_, token) = signed_in_user(&pool, "editor@example.com").await;
    let app = build_test_app(pool);

    let created = post_json_auth(app.clone(), "/api/v1/regions", json!({ "name": "Tatarstan" }), &token).await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let id = body_json(created).await["id"].as_i64().unwrap();

    let fetched = get(app.clone(), &format!("/api/v1/regions/{id}")).await;
    assert_eq!(fetched.status(), StatusCode::OK);
    assert_eq!(body_json(fetched).await["name"], "Tatarstan");

    let renamed = patch_json_auth(
        app.clone(),
        &format!("/api/v1/regions/{id}"),
        json!({ "name": "Republic of Tatarstan" }),
        &token,
    )
    .await;
    assert_eq!(renamed.status(), StatusCode::OK);
    assert_eq!(body_json(renamed).await["name"], "Republic of Tatarstan");

    let deleted = delete_auth(app.clone(), &format!("/api/v1/regions/{id}"), &token).await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let gone = get(app.clone(), &format!("/api/v1/regions/{id}")).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(gone).await["code"], "NOT_FOUND");

    let again = delete_auth(app, &format!("/api/v1/regions/{id}"), &token).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn region_names_are_unique_among_live_rows(pool: PgPool) {
    let (_, token) = signed_in_user(&pool, "editor@example.com").await;
    let app = build_test_app(pool);

    let first = post_json_auth(app.clone(), "/api/v1/regions", json!({ "name": "Samara" }), &token).await;
    assert_eq!(first.status(), StatusCode::CREATED);
    let id = body_json(first).await["id"].as_i64().unwrap();

    let dup = post_json_auth(app.clone(), "/api/v1/regions", json!({ "name": "Samara" }), &token).await;
    assert_eq!(dup.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_json(dup).await["error"],
        "Region with name 'Samara' already exists"
    );

    delete_auth(app.clone(), &format!("/api/v1/regions/{id}"), &token).await;
    let reused = post_json_auth(app, "/api/v1/regions", json!({ "name": "Samara" }), &token).await;
    assert_eq!(reused.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn writes_require_authentication(pool: PgPool) {
    let app = build_test_app(pool);
    let response = post_json(app, "/api/v1/regions", json!({ "name": "Kazan" })).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn region_list_is_served_from_cache(pool: PgPool) {
    RegionRepo::create(&pool, &CreateRegion { name: "Perm".into() })
        .await
        .unwrap();
    let app = build_test_app(pool.clone());

    let first = body_json(get(app.clone(), "/api/v1/regions").await).await;
    assert_eq!(first.as_array().unwrap().len(), 1);

    // Written behind the API's back, so the cached list must not see it yet.
    RegionRepo::create(&pool, &CreateRegion { name: "Ufa".into() })
        .await
        .unwrap();
    let second = body_json(get(app, "/api/v1/regions").await).await;
    assert_eq!(second.as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn city_coordinates_are_validated(pool: PgPool) {
    let (region_id, _) = seed_city(&pool, "Tatarstan", "Kazan").await;
    let (_, token) = signed_in_user(&pool, "editor@example.com").await;
    let app = build_test_app(pool);

    let body = json!({
        "name": "Nowhere",
        "latitude": 91.0,
        "longitude": 200.0,
        "regionId": region_id
    });
    let response = post_json_auth(app, "/api/v1/cities", body, &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    let fields: Vec<&str> = json["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["latitude", "longitude"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn city_in_missing_region_is_not_found(pool: PgPool) {
    let (_, token) = signed_in_user(&pool, "editor@example.com").await;
    let app = build_test_app(pool);

    let body = json!({ "name": "Kazan", "latitude": 55.79, "longitude": 49.12, "regionId": 9999 });
    let response = post_json_auth(app, "/api/v1/cities", body, &token).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cities_filter_by_region(pool: PgPool) {
    let (tatarstan, _) = seed_city(&pool, "Tatarstan", "Kazan").await;
    seed_city(&pool, "Bashkortostan", "Ufa").await;
    let app = build_test_app(pool);

    let all = body_json(get(app.clone(), "/api/v1/cities").await).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let filtered = body_json(get(app, &format!("/api/v1/cities?regionId={tatarstan}")).await).await;
    let filtered = filtered.as_array().unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0]["name"], "Kazan");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn city_bulk_is_all_or_nothing(pool: PgPool) {
    let (region_id, _) = seed_city(&pool, "Tatarstan", "Kazan").await;
    let (_, admin) = signed_in_admin(&pool, "admin@example.com").await;
    let app = build_test_app(pool);

    let duplicate_in_request = json!([
        { "name": "Elabuga", "latitude": 55.75, "longitude": 52.05, "regionId": region_id },
        { "name": "Elabuga", "latitude": 55.75, "longitude": 52.05, "regionId": region_id }
    ]);
    let response = post_json_auth(app.clone(), "/api/v1/cities/bulk", duplicate_in_request, &admin).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert!(body_json(response).await["error"]
        .as_str()
        .unwrap()
        .contains("in request"));

    let already_taken = json!([
        { "name": "Chistopol", "latitude": 55.36, "longitude": 50.64, "regionId": region_id },
        { "name": "Kazan", "latitude": 55.79, "longitude": 49.12, "regionId": region_id }
    ]);
    let response = post_json_auth(app.clone(), "/api/v1/cities/bulk", already_taken, &admin).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert!(body_json(response).await["error"]
        .as_str()
        .unwrap()
        .contains("already exists"));

    let cities = body_json(get(app.clone(), &format!("/api/v1/cities?regionId={region_id}")).await).await;
    assert_eq!(cities.as_array().unwrap().len(), 1);

    let valid = json!([
        { "name": "Chistopol", "latitude": 55.36, "longitude": 50.64, "regionId": region_id },
        { "name": "Elabuga", "latitude": 55.75, "longitude": 52.05, "regionId": region_id }
    ]);
    let response = post_json_auth(app, "/api/v1/cities/bulk", valid, &admin).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn city_bulk_requires_admin(pool: PgPool) {
    let (region_id, _) = seed_city(&pool, "Tatarstan", "Kazan").await;
    let (_, token) = signed_in_user(&pool, "editor@example.com").await;
    let app = build_test_app(pool);

    let body = json!([{ "name": "Elabuga", "latitude": 55.75, "longitude": 52.05, "regionId": region_id }]);
    let response = post_json_auth(app, "/api/v1/cities/bulk", body, &token).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_region_body_is_a_validation_error(pool: PgPool) {
    let (_, token) = signed_in_user(&pool, "editor@example.com").await;
    let app = build_test_app(pool);

    let response = post_json_auth(app, "/api/v1/regions", json!({}), &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["details"][0]["field"], "name");
    assert_eq!(json["details"][0]["code"], "required");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn every_mistyped_city_field_is_reported(pool: PgPool) {
    let (_, token) = signed_in_user(&pool, "editor@example.com").await;
    let app = build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/cities",
        json!({ "name": 5, "latitude": "x", "longitude": 50.1 }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    let issues: Vec<(String, String)> = json["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| {
            (
                d["field"].as_str().unwrap().to_string(),
                d["code"].as_str().unwrap().to_string(),
            )
        })
        .collect();
    assert_eq!(
        issues,
        vec![
            ("latitude".to_string(), "type".to_string()),
            ("name".to_string(), "type".to_string()),
            ("regionId".to_string(), "required".to_string()),
        ]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_city_filter_is_a_bad_request(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(app, "/api/v1/cities?regionId=samara").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}
