//! Integration tests for the `/api/todos` resource.
//!
//! Every test drives the full router (middleware included) against its own
//! migrated SQLite database.

mod common;

use axum::http::StatusCode;
use chrono::{DateTime, Duration, NaiveTime, Utc};
use common::{body_json, delete, get, patch, post_json, put_json};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use assert_matches::assert_matches;
use todo_api::error::AppError;
use todo_api::service::TodoService;
use todo_core::error::CoreError;
use todo_core::todo::UpdateTodo;
use todo_core::types::TodoId;
use todo_db::repositories::TodoRepo;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A due date `days` from now, pinned to `hour`:00 UTC.
fn due_in(days: i64, hour: u32) -> DateTime<Utc> {
    let date = (Utc::now() + Duration::days(days)).date_naive();
    date.and_time(NaiveTime::from_hms_opt(hour, 0, 0).unwrap())
        .and_utc()
}

/// POST a todo and return the created item.
async fn create(pool: &SqlitePool, body: Value) -> Value {
    let app = common::build_test_app(pool.clone());
    let response = post_json(app, "/api/todos", &body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

async fn create_titled(pool: &SqlitePool, title: &str) -> Value {
    create(pool, json!({ "title": title })).await
}

fn todo_uri(item: &Value) -> String {
    format!("/api/todos/{}", item["id"].as_str().unwrap())
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn create_returns_201_with_location_and_defaults(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/todos", &json!({ "title": "Buy milk" })).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response
        .headers()
        .get("location")
        .expect("Created response must carry a Location header")
        .to_str()
        .unwrap()
        .to_string();

    let item = body_json(response).await;
    assert_eq!(location, todo_uri(&item));
    assert_eq!(item["title"], "Buy milk");
    assert_eq!(item["isCompleted"], false);
    assert_eq!(item["tag"], "uncategorized");
    assert_eq!(item["priority"], 1);
    assert!(item["dueDate"].is_null());
    assert!(item["createdAt"].is_string());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_ignores_client_supplied_state(pool: SqlitePool) {
    let item = create(
        &pool,
        json!({
            "id": "00000000-0000-0000-0000-000000000001",
            "title": "Walk the dog",
            "isCompleted": true,
            "tag": "home",
            "priority": 3,
        }),
    )
    .await;

    assert_ne!(item["id"], "00000000-0000-0000-0000-000000000001");
    assert_eq!(item["isCompleted"], false);
    assert_eq!(item["tag"], "home");
    assert_eq!(item["priority"], 3);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_drops_due_date_in_the_past(pool: SqlitePool) {
    let yesterday = (Utc::now() - Duration::days(1)).date_naive().to_string();
    let item = create(&pool, json!({ "title": "Late", "dueDate": yesterday })).await;

    assert!(item["dueDate"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_accepts_plain_date_from_date_picker(pool: SqlitePool) {
    let date = (Utc::now() + Duration::days(3)).date_naive();
    let item = create(&pool, json!({ "title": "Dentist", "dueDate": date.to_string() })).await;

    let due: DateTime<Utc> = item["dueDate"].as_str().unwrap().parse().unwrap();
    assert_eq!(due.date_naive(), date);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_reports_every_invalid_field_at_once(pool: SqlitePool) {
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/todos",
        &json!({ "title": "@", "tag": "bad_tag!", "priority": 7 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["title"], "Validation Error");
    assert_eq!(json["status"], 400);
    assert_eq!(
        json["errors"]["title"],
        json!([
            "Title must be between 2 and 200 characters",
            "Title contains invalid characters"
        ])
    );
    assert_eq!(json["errors"]["tag"], json!(["Tag contains invalid characters"]));
    assert_eq!(json["errors"]["priority"], json!(["Invalid priority level"]));

    // Nothing was persisted.
    let page = body_json(get(common::build_test_app(pool), "/api/todos").await).await;
    assert_eq!(page["totalCount"], 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_without_title_is_rejected(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/todos", &json!({ "description": "no title" })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["errors"]["title"][0], "Title is required");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_with_unparseable_due_date_reports_the_field(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/todos",
        &json!({ "title": "Buy milk", "dueDate": "not-a-date" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["title"], "Validation Error");
    assert!(json["errors"]["dueDate"].is_array());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_with_null_priority_reports_the_field(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/todos",
        &json!({ "title": "Buy milk", "priority": null }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["errors"]["priority"].is_array());
}

// ---------------------------------------------------------------------------
// Get
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn get_returns_created_item(pool: SqlitePool) {
    let created = create_titled(&pool, "Read a book").await;

    let response = get(common::build_test_app(pool), &todo_uri(&created)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, created);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn get_unknown_id_returns_404(pool: SqlitePool) {
    let uri = format!("/api/todos/{}", TodoId::now_v7());
    let response = get(common::build_test_app(pool), &uri).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn list_paginates_newest_first(pool: SqlitePool) {
    for title in ["First", "Second", "Third"] {
        create_titled(&pool, title).await;
    }

    let app = common::build_test_app(pool.clone());
    let page = body_json(get(app, "/api/todos?pageNumber=1&pageSize=2").await).await;
    assert_eq!(page["totalCount"], 3);
    assert_eq!(page["pageNumber"], 1);
    assert_eq!(page["pageSize"], 2);
    assert_eq!(page["totalPages"], 2);
    let titles: Vec<_> = page["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Third", "Second"]);

    let app = common::build_test_app(pool.clone());
    let page = body_json(get(app, "/api/todos?pageNumber=2&pageSize=2").await).await;
    assert_eq!(page["items"].as_array().unwrap().len(), 1);
    assert_eq!(page["items"][0]["title"], "First");

    let app = common::build_test_app(pool);
    let page = body_json(get(app, "/api/todos?pageNumber=9&pageSize=2").await).await;
    assert!(page["items"].as_array().unwrap().is_empty());
    assert_eq!(page["totalCount"], 3);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_uses_default_paging(pool: SqlitePool) {
    let page = body_json(get(common::build_test_app(pool), "/api/todos").await).await;

    assert_eq!(page["pageNumber"], 1);
    assert_eq!(page["pageSize"], 10);
    assert_eq!(page["totalPages"], 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_rejects_out_of_range_paging(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/todos?pageNumber=0&pageSize=101").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(
        json["errors"]["pageNumber"],
        json!(["Page number must be between 1 and 2147483647"])
    );
    assert_eq!(
        json["errors"]["pageSize"],
        json!(["Page size must be between 1 and 100"])
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_rejects_page_numbers_too_large_to_offset(pool: SqlitePool) {
    create_titled(&pool, "Only one").await;

    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/todos?pageNumber=4611686018427387904&pageSize=10").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["errors"]["pageNumber"].is_array());

    let app = common::build_test_app(pool);
    let response = get(app, "/api/todos?pageNumber=2147483647&pageSize=100").await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_json(response).await;
    assert!(page["items"].as_array().unwrap().is_empty());
    assert_eq!(page["totalCount"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_filters_title_case_insensitively(pool: SqlitePool) {
    create_titled(&pool, "Buy MILK").await;
    create_titled(&pool, "Walk the dog").await;

    let app = common::build_test_app(pool);
    let page = body_json(get(app, "/api/todos?titleFilter=milk").await).await;

    assert_eq!(page["totalCount"], 1);
    assert_eq!(page["items"][0]["title"], "Buy MILK");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_filters_by_creation_range(pool: SqlitePool) {
    create_titled(&pool, "Today").await;

    let tomorrow = (Utc::now() + Duration::days(1)).date_naive();
    let app = common::build_test_app(pool.clone());
    let page = body_json(get(app, &format!("/api/todos?createdFrom={tomorrow}")).await).await;
    assert_eq!(page["totalCount"], 0);

    let app = common::build_test_app(pool);
    let page = body_json(get(app, &format!("/api/todos?createdTo={tomorrow}")).await).await;
    assert_eq!(page["totalCount"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_hides_soft_deleted_unless_asked(pool: SqlitePool) {
    let keep = create_titled(&pool, "Keep me").await;
    let gone = create_titled(&pool, "Delete me").await;

    let response = delete(common::build_test_app(pool.clone()), &todo_uri(&gone)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool.clone());
    let page = body_json(get(app, "/api/todos").await).await;
    assert_eq!(page["totalCount"], 1);
    assert_eq!(page["items"][0]["id"], keep["id"]);

    let app = common::build_test_app(pool);
    let page = body_json(get(app, "/api/todos?includeDeleted=true").await).await;
    assert_eq!(page["totalCount"], 2);
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn put_merges_fields_and_keeps_created_at(pool: SqlitePool) {
    let created = create(&pool, json!({ "title": "Old title", "description": "keep me" })).await;
    let uri = todo_uri(&created);

    let app = common::build_test_app(pool.clone());
    let response = put_json(
        app,
        &uri,
        &json!({ "title": "  New title  ", "priority": 2, "tag": "home" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let item = body_json(get(common::build_test_app(pool.clone()), &uri).await).await;
    assert_eq!(item["title"], "New title");
    assert_eq!(item["description"], "keep me");
    assert_eq!(item["priority"], 2);
    assert_eq!(item["tag"], "home");
    assert_eq!(item["createdAt"], created["createdAt"]);

    let id: TodoId = created["id"].as_str().unwrap().parse().unwrap();
    let stored = TodoRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert!(stored.modified_at.is_some(), "update must stamp modified_at");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn put_requires_title_and_priority(pool: SqlitePool) {
    let created = create_titled(&pool, "Something").await;

    let app = common::build_test_app(pool);
    let response = put_json(app, &todo_uri(&created), &json!({ "description": "x" })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["errors"]["title"], json!(["Title is required"]));
    assert_eq!(json["errors"]["priority"], json!(["Priority is required"]));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn put_with_unparseable_due_date_reports_the_field(pool: SqlitePool) {
    let created = create_titled(&pool, "Something").await;

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &todo_uri(&created),
        &json!({ "title": "Something", "priority": 1, "dueDate": "31/12/2030" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["errors"]["dueDate"].is_array());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn put_unknown_id_returns_404(pool: SqlitePool) {
    let uri = format!("/api/todos/{}", TodoId::now_v7());
    let app = common::build_test_app(pool);
    let response = put_json(app, &uri, &json!({ "title": "Ghost", "priority": 1 })).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn put_on_completed_todo_may_keep_the_same_due_date(pool: SqlitePool) {
    let created = create(&pool, json!({ "title": "Pay rent", "dueDate": due_in(3, 15) })).await;
    let uri = todo_uri(&created);

    let toggle = patch(common::build_test_app(pool.clone()), &format!("{uri}/complete")).await;
    assert_eq!(toggle.status(), StatusCode::NO_CONTENT);

    // Same calendar date, different time of day.
    let app = common::build_test_app(pool.clone());
    let response = put_json(
        app,
        &uri,
        &json!({ "title": "Pay rent", "priority": 1, "dueDate": due_in(3, 9) }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let item = body_json(get(common::build_test_app(pool), &uri).await).await;
    assert_eq!(item["isCompleted"], true);
}

// ---------------------------------------------------------------------------
// Complete / delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn toggle_complete_flips_back_and_forth(pool: SqlitePool) {
    let created = create_titled(&pool, "Water plants").await;
    let uri = todo_uri(&created);

    for expected in [true, false] {
        let response = patch(common::build_test_app(pool.clone()), &format!("{uri}/complete")).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let item = body_json(get(common::build_test_app(pool.clone()), &uri).await).await;
        assert_eq!(item["isCompleted"], expected);
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn toggle_unknown_id_returns_404(pool: SqlitePool) {
    let uri = format!("/api/todos/{}/complete", TodoId::now_v7());
    let response = patch(common::build_test_app(pool), &uri).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn soft_delete_is_idempotent(pool: SqlitePool) {
    let created = create_titled(&pool, "Twice").await;
    let uri = todo_uri(&created);

    for _ in 0..2 {
        let response = delete(common::build_test_app(pool.clone()), &uri).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    let response = get(common::build_test_app(pool), &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_unknown_id_returns_404(pool: SqlitePool) {
    let uri = format!("/api/todos/{}", TodoId::now_v7());

    let soft = delete(common::build_test_app(pool.clone()), &uri).await;
    assert_eq!(soft.status(), StatusCode::NOT_FOUND);

    let hard = delete(common::build_test_app(pool), &format!("{uri}/permanent")).await;
    assert_eq!(hard.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn hard_delete_removes_the_row(pool: SqlitePool) {
    let created = create_titled(&pool, "Temporary").await;
    let permanent = format!("{}/permanent", todo_uri(&created));

    let response = delete(common::build_test_app(pool.clone()), &permanent).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let id: TodoId = created["id"].as_str().unwrap().parse().unwrap();
    assert!(TodoRepo::find_by_id(&pool, id).await.unwrap().is_none());

    let again = delete(common::build_test_app(pool), &permanent).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// End-to-end scenario
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn full_lifecycle_scenario(pool: SqlitePool) {
    // Create.
    let created = create(
        &pool,
        json!({ "title": "Ship release", "dueDate": due_in(1, 12), "tag": "work" }),
    )
    .await;
    let uri = todo_uri(&created);

    // Complete.
    let response = patch(common::build_test_app(pool.clone()), &format!("{uri}/complete")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let item = body_json(get(common::build_test_app(pool.clone()), &uri).await).await;
    assert_eq!(item["isCompleted"], true);

    // Moving the due date of a completed todo is refused.
    let app = common::build_test_app(pool.clone());
    let response = put_json(
        app,
        &uri,
        &json!({ "title": "Ship release", "priority": 1, "dueDate": due_in(5, 12) }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(
        json["errors"]["dueDate"],
        json!(["Cannot change due date of a completed todo"])
    );

    // Soft delete hides it.
    let response = delete(common::build_test_app(pool.clone()), &uri).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = get(common::build_test_app(pool.clone()), &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Hard delete still finds the soft-deleted row and removes it.
    let response = delete(common::build_test_app(pool.clone()), &format!("{uri}/permanent")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = get(common::build_test_app(pool.clone()), &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool);
    let page = body_json(get(app, "/api/todos?includeDeleted=true").await).await;
    assert_eq!(page["totalCount"], 0);
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn service_get_all_optionally_includes_deleted(pool: SqlitePool) {
    create_titled(&pool, "Visible").await;
    let hidden = create_titled(&pool, "Hidden").await;
    delete(common::build_test_app(pool.clone()), &todo_uri(&hidden)).await;

    let service = TodoService::new(&pool);
    assert_eq!(service.get_all(false).await.unwrap().len(), 1);
    assert_eq!(service.get_all(true).await.unwrap().len(), 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn service_update_partial_keeps_completed_due_date(pool: SqlitePool) {
    let created = create(&pool, json!({ "title": "Pay rent", "dueDate": due_in(3, 15) })).await;
    let uri = todo_uri(&created);
    patch(common::build_test_app(pool.clone()), &format!("{uri}/complete")).await;
    let id: TodoId = created["id"].as_str().unwrap().parse().unwrap();

    let moved = UpdateTodo {
        title: Some("Pay rent".into()),
        priority: Some(1),
        due_date: Some(due_in(5, 15)),
        ..UpdateTodo::default()
    };
    let err = TodoService::new(&pool)
        .update_partial(id, &moved)
        .await
        .unwrap_err();
    assert_matches!(
        err,
        AppError::Core(CoreError::Validation(ref errors)) if errors.has_field("dueDate")
    );

    let stored = TodoRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(
        stored.due_date.map(|d| d.date_naive()),
        Some(due_in(3, 15).date_naive())
    );
}
