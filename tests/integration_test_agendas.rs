mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn test_overlapping_active_agenda_rejected_until_deactivated() {
    let app = TestApp::new().await;
    let service_id = app.seed_service("Massage").await;
    let first = app.seed_agenda(&service_id, json!({})).await;

    let overlapping = json!({ "date_start": "2025-11-15", "date_end": "2025-12-15" });
    let (status, body) = app.create_agenda(&service_id, overlapping.clone()).await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");
    assert_eq!(body["status"], "error");

    let (status, _) = app.get(&format!("/agenda/delete/{}", first)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.create_agenda(&service_id, overlapping).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["active"], true);
}

#[tokio::test]
async fn test_touching_ranges_conflict_and_disjoint_ranges_do_not() {
    let app = TestApp::new().await;
    let service_id = app.seed_service("Massage").await;
    app.seed_agenda(&service_id, json!({})).await;

    let (status, _) = app.create_agenda(&service_id, json!({ "date_start": "2025-11-30", "date_end": "2025-12-10" })).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app.create_agenda(&service_id, json!({ "date_start": "2025-10-01", "date_end": "2025-12-31" })).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app.create_agenda(&service_id, json!({ "date_start": "2025-12-01", "date_end": "2025-12-31" })).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");

    let other_service = app.seed_service("Facial").await;
    let (status, body) = app.create_agenda(&other_service, json!({})).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
}

#[tokio::test]
async fn test_inactive_agenda_may_overlap() {
    let app = TestApp::new().await;
    let service_id = app.seed_service("Massage").await;
    app.seed_agenda(&service_id, json!({})).await;

    let (status, body) = app.create_agenda(&service_id, json!({ "active": false })).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["active"], false);
}

#[tokio::test]
async fn test_activate_rechecks_overlap() {
    let app = TestApp::new().await;
    let service_id = app.seed_service("Massage").await;
    let first = app.seed_agenda(&service_id, json!({})).await;

    app.get(&format!("/agenda/delete/{}", first)).await;
    let second = app.seed_agenda(&service_id, json!({ "date_start": "2025-11-20", "date_end": "2025-12-20" })).await;

    let (status, _) = app.get(&format!("/agenda/activate/{}", first)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app.get(&format!("/agenda/activate/{}", second)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Agenda is already active");

    app.get(&format!("/agenda/delete/{}", second)).await;
    let (status, _) = app.get(&format!("/agenda/activate/{}", first)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get(&format!("/agenda/show/{}", first)).await;
    assert_eq!(body["data"]["active"], true);
    assert!(common::stamped_at_fixed_now(&body["data"]["updated_at"]), "{body}");

    let (status, _) = app.get("/agenda/activate/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_rechecks_overlap_only_when_dates_move() {
    let app = TestApp::new().await;
    let service_id = app.seed_service("Massage").await;
    app.seed_agenda(&service_id, json!({})).await;
    let december = app.seed_agenda(&service_id, json!({ "date_start": "2025-12-01", "date_end": "2025-12-31" })).await;

    let (status, _) = app.post(&format!("/agenda/update/{}", december), json!({ "date_start": "2025-11-20" })).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app.post(&format!("/agenda/update/{}", december), json!({
        "work_start": "10:00",
        "notes": "Holiday hours"
    })).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["work_start"], "10:00:00");
    assert_eq!(body["data"]["notes"], "Holiday hours");
    assert!(common::stamped_at_fixed_now(&body["data"]["updated_at"]), "{body}");
    assert_eq!(body["data"]["date_start"], "2025-12-01");

    let (status, body) = app.post(&format!("/agenda/update/{}", december), json!({ "date_end": "2026-01-15" })).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["date_end"], "2026-01-15");
}

#[tokio::test]
async fn test_update_can_clear_break() {
    let app = TestApp::new().await;
    let service_id = app.seed_service("Massage").await;
    let id = app.seed_agenda(&service_id, json!({ "break_start": "12:00", "break_end": "13:00" })).await;

    let (status, body) = app.post(&format!("/agenda/update/{}", id), json!({
        "break_start": null,
        "break_end": null
    })).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(body["data"]["break_start"].is_null());
    assert!(body["data"]["break_end"].is_null());
}

#[tokio::test]
async fn test_check_date_range_availability() {
    let app = TestApp::new().await;
    let service_id = app.seed_service("Massage").await;
    let agenda_id = app.seed_agenda(&service_id, json!({})).await;

    let (status, body) = app.post("/agenda/check-disponibilidad", json!({
        "service_id": service_id,
        "date_start": "2025-11-25",
        "date_end": "2025-12-05"
    })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["available"], false);

    let (_, body) = app.post("/agenda/check-disponibilidad", json!({
        "service_id": service_id,
        "date_start": "2025-11-25",
        "date_end": "2025-12-05",
        "exclude_id": agenda_id
    })).await;
    assert_eq!(body["data"]["available"], true);

    let (_, body) = app.post("/agenda/check-disponibilidad", json!({
        "service_id": service_id,
        "date_start": "2025-12-01",
        "date_end": "2025-12-05"
    })).await;
    assert_eq!(body["data"]["available"], true);

    let (status, body) = app.post("/agenda/check-disponibilidad", json!({
        "service_id": service_id,
        "date_start": "2025-12-05",
        "date_end": "2025-12-01"
    })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["date_end"].is_string());
}

#[tokio::test]
async fn test_invalid_agenda_definitions() {
    let app = TestApp::new().await;
    let service_id = app.seed_service("Massage").await;

    let (status, body) = app.create_agenda(&service_id, json!({
        "date_start": "2025-11-30",
        "date_end": "2025-11-01",
        "work_start": "17:00",
        "work_end": "09:00",
        "interval_minutes": 0
    })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    for field in ["date_end", "work_end", "interval_minutes"] {
        assert!(body["errors"][field].is_string(), "missing {field}: {body}");
    }

    let (status, body) = app.create_agenda(&service_id, json!({ "active_weekdays": [1, 8] })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["active_weekdays"].is_string());

    let (status, body) = app.create_agenda(&service_id, json!({ "active_weekdays": [] })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["active_weekdays"].is_string());

    let (status, body) = app.create_agenda(&service_id, json!({ "break_start": "12:00" })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["break_end"].is_string());

    let (status, body) = app.create_agenda(&service_id, json!({ "break_start": "08:00", "break_end": "09:30" })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["break_start"].is_string());

    let (status, body) = app.create_agenda(&service_id, json!({ "work_start": "nine" })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["work_start"].is_string());

    let (status, body) = app.post("/agenda/store", json!({
        "service_id": service_id,
        "date_start": "2025-11-01",
        "date_end": "2025-11-30",
        "work_start": "09:00",
        "work_end": "17:00",
        "active_weekdays": [1, 2, 3, 4, 5]
    })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["interval_minutes"].is_string());

    let (status, _) = app.create_agenda("no-such-service", json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_agenda_returns_not_found() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/agenda/show/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");

    let (status, _) = app.get("/agenda/delete/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.post("/agenda/update/missing", json!({ "notes": "x" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
