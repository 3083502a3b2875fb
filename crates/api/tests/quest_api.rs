mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, delete_auth, get, patch_json_auth, post_auth, post_json_auth,
    seed_city, seed_lookup, signed_in_user,
};
use kindquest_db::models::lookup::LookupKind;
use serde_json::json;
use sqlx::PgPool;

async fn create_quest(app: axum::Router, token: &str, body: serde_json::Value) -> serde_json::Value {
    let response = post_json_auth(app, "/api/v1/quests", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn quest_detail_includes_categories_and_participants(pool: PgPool) {
    let (_, city_id) = seed_city(&pool, "Tatarstan", "Kazan").await;
    let category = seed_lookup(&pool, LookupKind::Category, "Ecology").await;
    let (owner, owner_token) = signed_in_user(&pool, "owner@example.com").await;
    let (_, volunteer) = signed_in_user(&pool, "volunteer@example.com").await;
    let app = build_test_app(pool);

    let quest = create_quest(
        app.clone(),
        &owner_token,
        json!({
            "title": "Clean the riverbank",
            "experienceReward": 50,
            "cityId": city_id,
            "categoryIds": [category],
            "steps": [{ "title": "Bring gloves" }, { "title": "Collect litter" }]
        }),
    )
    .await;
    let id = quest["id"].as_i64().unwrap();
    assert_eq!(quest["ownerId"], owner.id);
    assert_eq!(quest["status"], "active");
    assert_eq!(quest["categoryIds"], json!([category]));
    assert_eq!(quest["steps"].as_array().unwrap().len(), 2);

    let joined = post_auth(app.clone(), &format!("/api/v1/quests/{id}/join"), &volunteer).await;
    assert_eq!(joined.status(), StatusCode::CREATED);
    let again = post_auth(app.clone(), &format!("/api/v1/quests/{id}/join"), &volunteer).await;
    assert_eq!(again.status(), StatusCode::CONFLICT);

    let detail = body_json(get(app.clone(), &format!("/api/v1/quests/{id}")).await).await;
    assert_eq!(detail["participantCount"], 1);

    let by_category = body_json(get(app, &format!("/api/v1/quests?categoryId={category}")).await).await;
    assert_eq!(by_category.as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_category_is_rejected(pool: PgPool) {
    let (_, city_id) = seed_city(&pool, "Tatarstan", "Kazan").await;
    let (_, token) = signed_in_user(&pool, "owner@example.com").await;
    let app = build_test_app(pool);

    let body = json!({ "title": "Plant trees", "cityId": city_id, "categoryIds": [4242] });
    let response = post_json_auth(app, "/api/v1/quests", body, &token).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_the_owner_edits_a_quest(pool: PgPool) {
    let (_, city_id) = seed_city(&pool, "Tatarstan", "Kazan").await;
    let (_, owner) = signed_in_user(&pool, "owner@example.com").await;
    let (_, stranger) = signed_in_user(&pool, "stranger@example.com").await;
    let app = build_test_app(pool);
    let quest = create_quest(app.clone(), &owner, json!({ "title": "Feed cats", "cityId": city_id })).await;
    let id = quest["id"].as_i64().unwrap();

    let by_stranger = patch_json_auth(
        app.clone(),
        &format!("/api/v1/quests/{id}"),
        json!({ "title": "Feed dogs" }),
        &stranger,
    )
    .await;
    assert_eq!(by_stranger.status(), StatusCode::FORBIDDEN);

    let missing = patch_json_auth(app.clone(), "/api/v1/quests/9999", json!({ "title": "x" }), &stranger).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let by_owner = patch_json_auth(
        app.clone(),
        &format!("/api/v1/quests/{id}"),
        json!({ "title": "Feed dogs", "status": "archived" }),
        &owner,
    )
    .await;
    assert_eq!(by_owner.status(), StatusCode::OK);
    let json = body_json(by_owner).await;
    assert_eq!(json["title"], "Feed dogs");
    assert_eq!(json["status"], "archived");

    let deleted = delete_auth(app.clone(), &format!("/api/v1/quests/{id}"), &owner).await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);
    let gone = get(app, &format!("/api/v1/quests/{id}")).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn completion_awards_experience_once(pool: PgPool) {
    let (_, city_id) = seed_city(&pool, "Tatarstan", "Kazan").await;
    let (_, owner) = signed_in_user(&pool, "owner@example.com").await;
    let (volunteer_user, volunteer) = signed_in_user(&pool, "volunteer@example.com").await;
    let app = build_test_app(pool);

    let achievement = post_json_auth(
        app.clone(),
        "/api/v1/achievements",
        json!({ "title": "River keeper", "rarity": "rare" }),
        &owner,
    )
    .await;
    let achievement_id = body_json(achievement).await["id"].as_i64().unwrap();
    let quest = create_quest(
        app.clone(),
        &owner,
        json!({
            "title": "Clean the riverbank",
            "experienceReward": 250,
            "achievementId": achievement_id,
            "cityId": city_id
        }),
    )
    .await;
    let id = quest["id"].as_i64().unwrap();
    let complete_uri = format!("/api/v1/quests/{id}/participants/{}/complete", volunteer_user.id);

    // Completion needs a participation first.
    let not_joined = post_auth(app.clone(), &complete_uri, &owner).await;
    assert_eq!(not_joined.status(), StatusCode::NOT_FOUND);

    post_auth(app.clone(), &format!("/api/v1/quests/{id}/join"), &volunteer).await;

    let by_participant = post_auth(app.clone(), &complete_uri, &volunteer).await;
    assert_eq!(by_participant.status(), StatusCode::FORBIDDEN);

    let completed = post_auth(app.clone(), &complete_uri, &owner).await;
    assert_eq!(completed.status(), StatusCode::OK);
    let json = body_json(completed).await;
    assert_eq!(json["experience"], 250);
    assert_eq!(json["level"], 2);
    assert_eq!(json["achievementId"], achievement_id);
    assert_eq!(json["participation"]["isCompleted"], true);

    let twice = post_auth(app.clone(), &complete_uri, &owner).await;
    assert_eq!(twice.status(), StatusCode::CONFLICT);

    let profile = body_json(get(app.clone(), &format!("/api/v1/users/{}", volunteer_user.id)).await).await;
    assert_eq!(profile["experience"], 250);
    assert_eq!(profile["level"], 2);

    let received = body_json(
        get(app.clone(), &format!("/api/v1/users/{}/achievements", volunteer_user.id)).await,
    )
    .await;
    assert_eq!(received.as_array().unwrap().len(), 1);
    assert_eq!(received[0]["title"], "River keeper");

    let quests = body_json(get(app, &format!("/api/v1/users/{}/quests", volunteer_user.id)).await).await;
    assert_eq!(quests[0]["id"], id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn completion_for_a_deleted_volunteer_changes_nothing(pool: PgPool) {
    let (_, city_id) = seed_city(&pool, "Tatarstan", "Kazan").await;
    let (_, owner) = signed_in_user(&pool, "owner@example.com").await;
    let (volunteer_user, volunteer) = signed_in_user(&pool, "volunteer@example.com").await;
    let app = build_test_app(pool.clone());

    let quest = create_quest(
        app.clone(),
        &owner,
        json!({ "title": "Plant trees", "experienceReward": 100, "cityId": city_id }),
    )
    .await;
    let id = quest["id"].as_i64().unwrap();
    post_auth(app.clone(), &format!("/api/v1/quests/{id}/join"), &volunteer).await;

    let left = delete_auth(app.clone(), "/api/v1/users/me", &volunteer).await;
    assert_eq!(left.status(), StatusCode::NO_CONTENT);

    let complete_uri = format!("/api/v1/quests/{id}/participants/{}/complete", volunteer_user.id);
    let response = post_auth(app, &complete_uri, &owner).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let completed: bool = sqlx::query_scalar(
        "SELECT is_completed FROM user_quests WHERE user_id = $1 AND quest_id = $2",
    )
    .bind(volunteer_user.id)
    .bind(id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert!(!completed);
}
