//! Integration tests for the `/initiatives` resource.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};

use agrinit_core::category::Category;
use agrinit_core::initiative::{Initiative, InitiativeStatus};
use agrinit_db::kv::KvStore;
use agrinit_db::repositories::InitiativeRepo;
use common::{
    body_json, create_initiative, delete_auth, get, path, post_json, post_json_auth,
    put_json_auth, send, VALID_TOKEN, TEST_USER_ID,
};

fn wells_payload() -> Value {
    json!({
        "title": "Solar wells",
        "description": "Solar pumps for three village wells",
        "category": "ري وموارد مائية",
        "targetArea": "Northern valley",
        "beneficiaries": 120,
        "budget": 45000
    })
}

fn timestamp(value: &Value) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value.as_str().unwrap())
        .unwrap()
        .with_timezone(&Utc)
}

fn seeded(id: &str, created_secs: i64) -> Initiative {
    let at = Utc.timestamp_opt(1_700_000_000 + created_secs, 0).unwrap();
    Initiative {
        id: id.to_string(),
        title: format!("Initiative {id}"),
        description: "Seeded".to_string(),
        category: Category::Livestock,
        status: InitiativeStatus::Active,
        target_area: String::new(),
        beneficiaries: 0,
        budget: 0,
        created_by: "seed".to_string(),
        created_at: at,
        updated_at: at,
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_returns_201_with_fresh_record() {
    let app = common::build_test_app();
    let response = post_json_auth(
        app.router.clone(),
        &path("/initiatives"),
        VALID_TOKEN,
        wells_payload(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Initiative created successfully");

    let initiative = &json["initiative"];
    assert!(!initiative["id"].as_str().unwrap().is_empty());
    assert_eq!(initiative["createdBy"], TEST_USER_ID);
    assert_eq!(initiative["status"], "active");
    assert_eq!(initiative["beneficiaries"], 120);
    assert_eq!(initiative["createdAt"], initiative["updatedAt"]);
    assert_eq!(app.store.len().await, 1);
}

#[tokio::test]
async fn two_creates_get_distinct_ids() {
    let app = common::build_test_app();
    let first = create_initiative(&app.router, wells_payload()).await;
    let second = create_initiative(&app.router, wells_payload()).await;
    assert_ne!(first["id"], second["id"]);
}

#[tokio::test]
async fn create_coerces_amounts_and_defaults_optional_fields() {
    let app = common::build_test_app();
    let created = create_initiative(
        &app.router,
        json!({
            "title": "Goat cooperative",
            "description": "Shared herd",
            "category": "تربية حيوانية",
            "beneficiaries": "40",
            "budget": -5
        }),
    )
    .await;

    assert_eq!(created["beneficiaries"], 40);
    assert_eq!(created["budget"], 0);
    assert_eq!(created["targetArea"], "");
}

#[tokio::test]
async fn create_missing_required_field_is_400_and_writes_nothing() {
    let app = common::build_test_app();
    let response = post_json_auth(
        app.router.clone(),
        &path("/initiatives"),
        VALID_TOKEN,
        json!({ "title": "No description", "category": "أخرى" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Title, description, and category are required");
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn create_with_unknown_status_is_400() {
    let app = common::build_test_app();
    let mut payload = wells_payload();
    payload["status"] = json!("archived");

    let response =
        post_json_auth(app.router.clone(), &path("/initiatives"), VALID_TOKEN, payload).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn create_without_token_is_401_and_never_reaches_provider() {
    let app = common::build_test_app();
    let response = post_json(app.router.clone(), &path("/initiatives"), wells_payload()).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert_eq!(json["error"], "Unauthorized - No token provided");
    assert_eq!(app.auth.lookups(), 0);
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn create_with_rejected_token_is_401_and_writes_nothing() {
    let app = common::build_test_app();
    let response = post_json_auth(
        app.router.clone(),
        &path("/initiatives"),
        "forged-token",
        wells_payload(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Unauthorized - Invalid token");
    assert_eq!(app.auth.lookups(), 1);
    assert!(app.store.is_empty().await);
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_after_create_equals_created_record() {
    let app = common::build_test_app();
    let created = create_initiative(&app.router, wells_payload()).await;
    let id = created["id"].as_str().unwrap();

    let response = get(app.router, &path(&format!("/initiatives/{id}"))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["initiative"], created);
}

#[tokio::test]
async fn get_unknown_id_is_404() {
    let app = common::build_test_app();
    let response = get(app.router, &path("/initiatives/does-not-exist")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[tokio::test]
async fn list_is_public_and_newest_first() {
    let app = common::build_test_app();
    for initiative in [seeded("b", 10), seeded("a", 30), seeded("c", 20), seeded("d", 30)] {
        InitiativeRepo::save(&*app.store, &initiative)
            .await
            .unwrap();
    }

    let response = get(app.router, &path("/initiatives")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let ids: Vec<&str> = json["initiatives"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["a", "d", "c", "b"]);
}

#[tokio::test]
async fn list_of_empty_store_is_empty_array() {
    let app = common::build_test_app();
    let json = body_json(get(app.router, &path("/initiatives")).await).await;
    assert_eq!(json, json!({ "initiatives": [] }));
}

#[tokio::test]
async fn list_skips_values_that_are_not_initiatives() {
    let app = common::build_test_app();
    InitiativeRepo::save(&*app.store, &seeded("good", 0))
        .await
        .unwrap();
    app.store
        .set("initiative:broken", json!("not an object"))
        .await
        .unwrap();

    let json = body_json(get(app.router, &path("/initiatives")).await).await;
    assert_eq!(json["initiatives"].as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_merges_fields_and_preserves_immutables() {
    let app = common::build_test_app();
    let created = create_initiative(&app.router, wells_payload()).await;
    let id = created["id"].as_str().unwrap();

    let response = put_json_auth(
        app.router.clone(),
        &path(&format!("/initiatives/{id}")),
        VALID_TOKEN,
        json!({
            "status": "completed",
            "budget": 50000,
            "id": "hijacked",
            "createdBy": "someone-else",
            "createdAt": "2001-01-01T00:00:00Z"
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Initiative updated successfully");

    let updated = &json["initiative"];
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["createdBy"], created["createdBy"]);
    assert_eq!(updated["createdAt"], created["createdAt"]);
    assert_eq!(updated["title"], created["title"]);
    assert_eq!(updated["status"], "completed");
    assert_eq!(updated["budget"], 50000);
    assert!(timestamp(&updated["updatedAt"]) > timestamp(&created["updatedAt"]));

    let stored = get(app.router, &path(&format!("/initiatives/{id}"))).await;
    assert_eq!(&body_json(stored).await["initiative"], updated);
}

#[tokio::test]
async fn consecutive_updates_strictly_increase_updated_at() {
    let app = common::build_test_app();
    let created = create_initiative(&app.router, wells_payload()).await;
    let uri = path(&format!("/initiatives/{}", created["id"].as_str().unwrap()));

    let mut previous = timestamp(&created["updatedAt"]);
    for n in 0..3 {
        let response = put_json_auth(
            app.router.clone(),
            &uri,
            VALID_TOKEN,
            json!({ "beneficiaries": n }),
        )
        .await;
        let current = timestamp(&body_json(response).await["initiative"]["updatedAt"]);
        assert!(current > previous);
        previous = current;
    }
}

#[tokio::test]
async fn update_with_blank_title_is_400() {
    let app = common::build_test_app();
    let created = create_initiative(&app.router, wells_payload()).await;
    let uri = path(&format!("/initiatives/{}", created["id"].as_str().unwrap()));

    let response = put_json_auth(app.router, &uri, VALID_TOKEN, json!({ "title": "  " })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_with_blank_status_keeps_status() {
    let app = common::build_test_app();
    let created = create_initiative(&app.router, wells_payload()).await;
    let uri = path(&format!("/initiatives/{}", created["id"].as_str().unwrap()));

    let response = put_json_auth(
        app.router,
        &uri,
        VALID_TOKEN,
        json!({ "status": "", "budget": 10 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["initiative"]["status"], "active");
    assert_eq!(json["initiative"]["budget"], 10);
}

#[tokio::test]
async fn update_without_token_is_401_and_keeps_record() {
    let app = common::build_test_app();
    let created = create_initiative(&app.router, wells_payload()).await;
    let uri = path(&format!("/initiatives/{}", created["id"].as_str().unwrap()));
    let lookups_before = app.auth.lookups();

    let request = Request::builder()
        .method(Method::PUT)
        .uri(uri.as_str())
        .header("content-type", "application/json")
        .body(Body::from(json!({ "title": "Renamed" }).to_string()))
        .unwrap();
    let response = send(app.router.clone(), request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert_eq!(json["error"], "Unauthorized - No token provided");
    assert_eq!(app.auth.lookups(), lookups_before);

    let stored = body_json(get(app.router, &uri).await).await;
    assert_eq!(stored["initiative"]["title"], created["title"]);
    assert_eq!(stored["initiative"]["updatedAt"], created["updatedAt"]);
}

#[tokio::test]
async fn update_with_rejected_token_is_401() {
    let app = common::build_test_app();
    let created = create_initiative(&app.router, wells_payload()).await;
    let uri = path(&format!("/initiatives/{}", created["id"].as_str().unwrap()));
    let lookups_before = app.auth.lookups();

    let response = put_json_auth(
        app.router.clone(),
        &uri,
        "forged-token",
        json!({ "title": "Renamed" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert_eq!(json["error"], "Unauthorized - Invalid token");
    assert_eq!(app.auth.lookups(), lookups_before + 1);

    let stored = body_json(get(app.router, &uri).await).await;
    assert_eq!(stored["initiative"]["title"], created["title"]);
}

#[tokio::test]
async fn update_unknown_id_is_404() {
    let app = common::build_test_app();
    let response = put_json_auth(
        app.router,
        &path("/initiatives/does-not-exist"),
        VALID_TOKEN,
        json!({ "title": "New" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn any_authenticated_user_may_update() {
    let app = common::build_test_app();
    app.auth.add_token("other-token", "user-0002");
    let created = create_initiative(&app.router, wells_payload()).await;
    let uri = path(&format!("/initiatives/{}", created["id"].as_str().unwrap()));

    let response = put_json_auth(app.router, &uri, "other-token", json!({ "budget": 1 })).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["initiative"]["createdBy"], TEST_USER_ID);
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_then_delete_again_is_404() {
    let app = common::build_test_app();
    let created = create_initiative(&app.router, wells_payload()).await;
    let uri = path(&format!("/initiatives/{}", created["id"].as_str().unwrap()));

    let response = delete_auth(app.router.clone(), &uri, VALID_TOKEN).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "message": "Initiative deleted successfully" })
    );
    assert!(app.store.is_empty().await);

    let again = delete_auth(app.router.clone(), &uri, VALID_TOKEN).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);

    let fetched = get(app.router, &uri).await;
    assert_eq!(fetched.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_with_invalid_token_keeps_record() {
    let app = common::build_test_app();
    let created = create_initiative(&app.router, wells_payload()).await;
    let uri = path(&format!("/initiatives/{}", created["id"].as_str().unwrap()));

    let response = delete_auth(app.router, &uri, "forged-token").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(app.store.len().await, 1);
}

#[tokio::test]
async fn delete_without_token_is_401_and_keeps_record() {
    let app = common::build_test_app();
    let created = create_initiative(&app.router, wells_payload()).await;
    let uri = path(&format!("/initiatives/{}", created["id"].as_str().unwrap()));
    let lookups_before = app.auth.lookups();

    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri.as_str())
        .body(Body::empty())
        .unwrap();
    let response = send(app.router.clone(), request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
    assert_eq!(app.auth.lookups(), lookups_before);
    assert_eq!(get(app.router, &uri).await.status(), StatusCode::OK);
}
