mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, build_test_app_with, delete_auth, get, patch_json_auth,
    post_auth, post_json_auth, post_multipart_auth, put_json_auth, seed_city, seed_lookup,
    signed_in_admin, signed_in_user, FormPart, TestDeps,
};
use kindquest_db::models::lookup::LookupKind;
use serde_json::{json, Value};
use sqlx::PgPool;

struct Fixture {
    city_id: i64,
    type_id: i64,
    help_type_id: i64,
}

async fn fixture(pool: &PgPool) -> Fixture {
    let (_, city_id) = seed_city(pool, "Tatarstan", "Kazan").await;
    Fixture {
        city_id,
        type_id: seed_lookup(pool, LookupKind::OrganizationType, "Shelter").await,
        help_type_id: seed_lookup(pool, LookupKind::HelpType, "Volunteering").await,
    }
}

fn organization_body(f: &Fixture, name: &str) -> Value {
    json!({
        "name": name,
        "cityId": f.city_id,
        "organizationTypeId": f.type_id,
        "summary": "Animal shelter",
        "contacts": [{ "name": "phone", "value": "+7 843 000-00-00" }]
    })
}

async fn create_organization(app: axum::Router, f: &Fixture, token: &str) -> i64 {
    let response = post_json_auth(app, "/api/v1/organizations", organization_body(f, "Paws"), token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn creator_becomes_owner(pool: PgPool) {
    let f = fixture(&pool).await;
    let (owner, token) = signed_in_user(&pool, "owner@example.com").await;
    let app = build_test_app(pool);

    let response = post_json_auth(app.clone(), "/api/v1/organizations", organization_body(&f, "Paws"), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["ownerIds"], json!([owner.id]));
    assert_eq!(json["isApproved"], false);
    assert_eq!(json["contacts"][0]["name"], "phone");

    let id = json["id"].as_i64().unwrap();
    let fetched = get(app, &format!("/api/v1/organizations/{id}")).await;
    assert_eq!(fetched.status(), StatusCode::OK);
    assert_eq!(body_json(fetched).await["name"], "Paws");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn nested_contact_errors_carry_their_path(pool: PgPool) {
    let f = fixture(&pool).await;
    let (_, token) = signed_in_user(&pool, "owner@example.com").await;
    let app = build_test_app(pool);

    let mut body = organization_body(&f, "Paws");
    body["contacts"] = json!([{ "name": "", "value": "x" }]);
    let response = post_json_auth(app, "/api/v1/organizations", body, &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["details"][0]["field"], "contacts[0].name");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_city_is_not_found(pool: PgPool) {
    let f = fixture(&pool).await;
    let (_, token) = signed_in_user(&pool, "owner@example.com").await;
    let app = build_test_app(pool);

    let mut body = organization_body(&f, "Paws");
    body["cityId"] = json!(9999);
    let response = post_json_auth(app, "/api/v1/organizations", body, &token).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_owner_is_forbidden_everywhere(pool: PgPool) {
    let f = fixture(&pool).await;
    let (_, owner) = signed_in_user(&pool, "owner@example.com").await;
    let (stranger_user, stranger) = signed_in_user(&pool, "stranger@example.com").await;
    let app = build_test_app(pool);
    let id = create_organization(app.clone(), &f, &owner).await;

    let update = patch_json_auth(
        app.clone(),
        &format!("/api/v1/organizations/{id}"),
        json!({ "summary": "hijacked" }),
        &stranger,
    )
    .await;
    assert_eq!(update.status(), StatusCode::FORBIDDEN);

    let help_type = post_auth(
        app.clone(),
        &format!("/api/v1/organizations/{id}/help-types/{}", f.help_type_id),
        &stranger,
    )
    .await;
    assert_eq!(help_type.status(), StatusCode::FORBIDDEN);

    let add_self = post_auth(
        app.clone(),
        &format!("/api/v1/organizations/{id}/owners/{}", stranger_user.id),
        &stranger,
    )
    .await;
    assert_eq!(add_self.status(), StatusCode::FORBIDDEN);

    let post = post_json_auth(
        app.clone(),
        &format!("/api/v1/organizations/{id}/updates"),
        json!({ "title": "News", "text": "We moved" }),
        &stranger,
    )
    .await;
    assert_eq!(post.status(), StatusCode::FORBIDDEN);

    let delete = delete_auth(app.clone(), &format!("/api/v1/organizations/{id}"), &stranger).await;
    assert_eq!(delete.status(), StatusCode::FORBIDDEN);

    // Ownership is checked before existence.
    let missing = delete_auth(app, "/api/v1/organizations/9999", &stranger).await;
    assert_eq!(missing.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn help_types_attach_once(pool: PgPool) {
    let f = fixture(&pool).await;
    let (_, owner) = signed_in_user(&pool, "owner@example.com").await;
    let app = build_test_app(pool);
    let id = create_organization(app.clone(), &f, &owner).await;
    let uri = format!("/api/v1/organizations/{id}/help-types/{}", f.help_type_id);

    let added = post_auth(app.clone(), &uri, &owner).await;
    assert_eq!(added.status(), StatusCode::CREATED);
    assert_eq!(body_json(added).await["helpTypes"][0]["name"], "Volunteering");

    let again = post_auth(app.clone(), &uri, &owner).await;
    assert_eq!(again.status(), StatusCode::CONFLICT);

    let filtered = get(
        app.clone(),
        &format!("/api/v1/organizations?helpTypeId={}", f.help_type_id),
    )
    .await;
    assert_eq!(body_json(filtered).await.as_array().unwrap().len(), 1);

    let removed = delete_auth(app.clone(), &uri, &owner).await;
    assert_eq!(removed.status(), StatusCode::NO_CONTENT);
    let removed_again = delete_auth(app, &uri, &owner).await;
    assert_eq!(removed_again.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn owners_can_be_shared_but_never_emptied(pool: PgPool) {
    let f = fixture(&pool).await;
    let (first, owner) = signed_in_user(&pool, "owner@example.com").await;
    let (second, second_token) = signed_in_user(&pool, "second@example.com").await;
    let app = build_test_app(pool);
    let id = create_organization(app.clone(), &f, &owner).await;

    let last = delete_auth(
        app.clone(),
        &format!("/api/v1/organizations/{id}/owners/{}", first.id),
        &owner,
    )
    .await;
    assert_eq!(last.status(), StatusCode::CONFLICT);

    let added = post_auth(
        app.clone(),
        &format!("/api/v1/organizations/{id}/owners/{}", second.id),
        &owner,
    )
    .await;
    assert_eq!(added.status(), StatusCode::CREATED);
    assert_eq!(body_json(added).await.as_array().unwrap().len(), 2);

    let duplicate = post_auth(
        app.clone(),
        &format!("/api/v1/organizations/{id}/owners/{}", second.id),
        &owner,
    )
    .await;
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    // The new owner can now hand the organization over completely.
    let handed_over = delete_auth(
        app.clone(),
        &format!("/api/v1/organizations/{id}/owners/{}", first.id),
        &second_token,
    )
    .await;
    assert_eq!(handed_over.status(), StatusCode::NO_CONTENT);

    let update = patch_json_auth(
        app,
        &format!("/api/v1/organizations/{id}"),
        json!({ "summary": "new hands" }),
        &owner,
    )
    .await;
    assert_eq!(update.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn approval_is_admin_only(pool: PgPool) {
    let f = fixture(&pool).await;
    let (_, owner) = signed_in_user(&pool, "owner@example.com").await;
    let (_, admin) = signed_in_admin(&pool, "admin@example.com").await;
    let app = build_test_app(pool);
    let id = create_organization(app.clone(), &f, &owner).await;
    let uri = format!("/api/v1/organizations/{id}/approve");

    let by_owner = patch_json_auth(app.clone(), &uri, json!({ "isApproved": true }), &owner).await;
    assert_eq!(by_owner.status(), StatusCode::FORBIDDEN);

    let by_admin = patch_json_auth(app, &uri, json!({ "isApproved": true }), &admin).await;
    assert_eq!(by_admin.status(), StatusCode::OK);
    assert_eq!(body_json(by_admin).await["isApproved"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn progress_updates_belong_to_the_organization(pool: PgPool) {
    let f = fixture(&pool).await;
    let (_, owner) = signed_in_user(&pool, "owner@example.com").await;
    let app = build_test_app(pool);
    let id = create_organization(app.clone(), &f, &owner).await;
    let uri = format!("/api/v1/organizations/{id}/updates");

    let created = post_json_auth(
        app.clone(),
        &uri,
        json!({ "title": "First week", "text": "Twelve dogs found homes" }),
        &owner,
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let update_id = body_json(created).await["id"].as_i64().unwrap();

    let listed = body_json(get(app.clone(), &uri).await).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let edited = patch_json_auth(
        app.clone(),
        &format!("{uri}/{update_id}"),
        json!({ "title": "First month" }),
        &owner,
    )
    .await;
    assert_eq!(edited.status(), StatusCode::OK);
    assert_eq!(body_json(edited).await["title"], "First month");

    let deleted = delete_auth(app.clone(), &format!("{uri}/{update_id}"), &owner).await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);
    let listed = body_json(get(app, &uri).await).await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn gallery_upload_and_replace(pool: PgPool) {
    let f = fixture(&pool).await;
    let (_, owner) = signed_in_user(&pool, "owner@example.com").await;
    let deps = TestDeps::default();
    let storage = deps.storage.clone();
    let app = build_test_app_with(pool, deps);
    let id = create_organization(app.clone(), &f, &owner).await;
    let uri = format!("/api/v1/organizations/{id}/gallery");

    let file = FormPart {
        name: "file",
        filename: Some("dogs.png"),
        content_type: Some("image/png"),
        data: b"\x89PNG fake image bytes",
    };
    let uploaded = post_multipart_auth(app.clone(), &uri, &[file], &owner).await;
    assert_eq!(uploaded.status(), StatusCode::CREATED);
    let json = body_json(uploaded).await;
    let key = json["gallery"][0].as_str().unwrap().to_string();
    assert!(key.starts_with(&format!("organizations/{id}/")));
    assert!(key.ends_with(".png"));
    assert_eq!(
        json["galleryUrls"][0],
        format!("http://storage.test/kindquest/{key}")
    );
    assert_eq!(*storage.stored.lock().unwrap(), vec![key.clone()]);

    let foreign = put_json_auth(app.clone(), &uri, json!({ "keys": ["avatars/x.png"] }), &owner).await;
    assert_eq!(foreign.status(), StatusCode::BAD_REQUEST);

    let cleared = put_json_auth(app, &uri, json!({ "keys": [] }), &owner).await;
    assert_eq!(cleared.status(), StatusCode::OK);
    assert!(body_json(cleared).await["gallery"].as_array().unwrap().is_empty());
    assert_eq!(*storage.deleted.lock().unwrap(), vec![key]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn bulk_creation_is_admin_only_and_atomic(pool: PgPool) {
    let f = fixture(&pool).await;
    let (_, owner) = signed_in_user(&pool, "owner@example.com").await;
    let (_, admin) = signed_in_admin(&pool, "admin@example.com").await;
    let app = build_test_app(pool);

    let batch = json!([organization_body(&f, "Paws"), organization_body(&f, "Claws")]);
    let by_user = post_json_auth(app.clone(), "/api/v1/organizations/bulk", batch.clone(), &owner).await;
    assert_eq!(by_user.status(), StatusCode::FORBIDDEN);

    let mut with_bad_type = batch.clone();
    with_bad_type[1]["organizationTypeId"] = json!(9999);
    let rejected = post_json_auth(app.clone(), "/api/v1/organizations/bulk", with_bad_type, &admin).await;
    assert_eq!(rejected.status(), StatusCode::NOT_FOUND);
    let listed = body_json(get(app.clone(), "/api/v1/organizations").await).await;
    assert!(listed.as_array().unwrap().is_empty());

    let created = post_json_auth(app, "/api/v1/organizations/bulk", batch, &admin).await;
    assert_eq!(created.status(), StatusCode::CREATED);
    assert_eq!(body_json(created).await.as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn bulk_items_carry_their_help_types(pool: PgPool) {
    let f = fixture(&pool).await;
    let (admin_user, admin) = signed_in_admin(&pool, "admin@example.com").await;
    let app = build_test_app(pool);

    let mut with_help = organization_body(&f, "Paws");
    with_help["helpTypeIds"] = json!([f.help_type_id]);
    let mut with_unknown = organization_body(&f, "Claws");
    with_unknown["helpTypeIds"] = json!([987654]);

    let rejected = post_json_auth(
        app.clone(),
        "/api/v1/organizations/bulk",
        json!([with_help.clone(), with_unknown]),
        &admin,
    )
    .await;
    assert_eq!(rejected.status(), StatusCode::NOT_FOUND);
    let listed = body_json(get(app.clone(), "/api/v1/organizations").await).await;
    assert!(listed.as_array().unwrap().is_empty());

    let created = post_json_auth(
        app.clone(),
        "/api/v1/organizations/bulk",
        json!([with_help, organization_body(&f, "Claws")]),
        &admin,
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let rows = body_json(created).await;
    let paws_id = rows
        .as_array()
        .unwrap()
        .iter()
        .find(|o| o["name"] == "Paws")
        .unwrap()["id"]
        .as_i64()
        .unwrap();

    let detail = body_json(get(app, &format!("/api/v1/organizations/{paws_id}")).await).await;
    assert_eq!(detail["helpTypes"][0]["id"], f.help_type_id);
    assert_eq!(detail["ownerIds"], json!([admin_user.id]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn organization_without_city_is_a_validation_error(pool: PgPool) {
    let f = fixture(&pool).await;
    let (_, token) = signed_in_user(&pool, "owner@example.com").await;
    let app = build_test_app(pool);

    let mut body = organization_body(&f, "Paws");
    body.as_object_mut().unwrap().remove("cityId");
    body["contacts"] = json!([{ "name": "phone", "value": 7 }]);

    let response = post_json_auth(app, "/api/v1/organizations", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    let fields: Vec<&str> = json["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["cityId", "contacts[0].value"]);
}
