mod common;

use axum::http::StatusCode;
use common::{slot_labels, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_morning_agenda_yields_six_half_hour_slots() {
    let app = TestApp::new().await;
    let service_id = app.seed_service("Haircut").await;
    let agenda_id = app.seed_agenda(&service_id, json!({ "work_start": "09:00", "work_end": "12:00" })).await;

    let (status, body) = app.get(&format!("/agenda/show/{}?fecha=2025-11-10", agenda_id)).await;
    assert_eq!(status, StatusCode::OK);

    let data = &body["data"];
    assert_eq!(data["slot_date"], "2025-11-10");
    assert!(data.get("slot_message").is_none());
    assert_eq!(
        slot_labels(&data["slots"]),
        vec!["09:00-09:30", "09:30-10:00", "10:00-10:30", "10:30-11:00", "11:00-11:30", "11:30-12:00"]
    );
    assert!(data["slots"].as_array().unwrap().iter().all(|s| s["available"] == true));
}

#[tokio::test]
async fn test_break_skips_to_its_end() {
    let app = TestApp::new().await;
    let service_id = app.seed_service("Massage").await;
    let agenda_id = app.seed_agenda(&service_id, json!({
        "work_start": "09:00",
        "work_end": "12:00",
        "break_start": "10:00",
        "break_end": "10:15"
    })).await;

    let (_, body) = app.get(&format!("/agenda/show/{}?fecha=2025-11-10", agenda_id)).await;
    let labels = slot_labels(&body["data"]["slots"]);

    assert_eq!(labels[..3], ["09:00-09:30", "09:30-10:00", "10:15-10:45"]);
    assert!(labels.iter().all(|l| !l.starts_with("10:0")));
    assert_eq!(labels.last().unwrap(), "11:15-11:45");
}

#[tokio::test]
async fn test_slot_running_into_break_is_shortened() {
    let app = TestApp::new().await;
    let service_id = app.seed_service("Consulting").await;
    let agenda_id = app.seed_agenda(&service_id, json!({
        "work_start": "09:00",
        "work_end": "12:00",
        "interval_minutes": 40,
        "break_start": "10:00",
        "break_end": "10:30"
    })).await;

    let (_, body) = app.get(&format!("/agenda/show/{}?fecha=2025-11-10", agenda_id)).await;
    assert_eq!(
        slot_labels(&body["data"]["slots"]),
        vec!["09:00-09:40", "09:40-10:00", "10:30-11:10", "11:10-11:50"]
    );
}

#[tokio::test]
async fn test_slot_date_defaults_to_today() {
    let app = TestApp::new().await;
    let service_id = app.seed_service("Nails").await;
    let agenda_id = app.seed_agenda(&service_id, json!({})).await;

    let (_, body) = app.get(&format!("/agenda/show/{}", agenda_id)).await;
    assert_eq!(body["data"]["slot_date"], "2025-11-03");
    assert_eq!(body["data"]["slots"].as_array().unwrap().len(), 16);
    assert_eq!(body["data"]["weekday_names"], json!(["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]));
}

#[tokio::test]
async fn test_unbookable_dates_return_message_instead_of_error() {
    let app = TestApp::new().await;
    let service_id = app.seed_service("Yoga").await;
    let agenda_id = app.seed_agenda(&service_id, json!({})).await;

    let (status, body) = app.get(&format!("/agenda/show/{}?fecha=2025-12-01", agenda_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["slots"], json!([]));
    assert_eq!(body["data"]["slot_message"], "The selected date is outside the agenda's date range");

    // 2025-11-08 is a Saturday
    let (status, body) = app.get(&format!("/agenda/show/{}?fecha=2025-11-08", agenda_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["slots"], json!([]));
    assert_eq!(body["data"]["slot_message"], "The selected day is not active for this agenda");
}

#[tokio::test]
async fn test_inactive_agenda_lists_no_slots() {
    let app = TestApp::new().await;
    let service_id = app.seed_service("Pilates").await;
    let user_id = app.seed_user("ana@example.com").await;
    let agenda_id = app.seed_agenda(&service_id, json!({ "active": false })).await;

    let (status, body) = app.get(&format!("/agenda/show/{}?fecha=2025-11-03", agenda_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["slots"], json!([]));
    assert_eq!(body["data"]["slot_message"], "The agenda is not active");

    let (_, listing) = app.get("/agenda/index?fecha=2025-11-03").await;
    assert_eq!(listing["data"][0]["slots"], json!([]));

    app.get(&format!("/agenda/activate/{}", agenda_id)).await;
    let (_, body) = app.get(&format!("/agenda/show/{}?fecha=2025-11-03", agenda_id)).await;
    assert_eq!(body["data"]["slots"].as_array().unwrap().len(), 16);
    assert!(body["data"]["slot_message"].is_null());

    let (status, _) = app.book(&user_id, &service_id, &agenda_id, "2025-11-03", "09:00", "09:30").await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_malformed_slot_date_is_a_validation_error() {
    let app = TestApp::new().await;
    let service_id = app.seed_service("Spa").await;
    let agenda_id = app.seed_agenda(&service_id, json!({})).await;

    let (status, body) = app.get(&format!("/agenda/show/{}?fecha=10-11-2025", agenda_id)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["fecha"].is_string());
}

#[tokio::test]
async fn test_booked_slot_is_unavailable_until_cancelled() {
    let app = TestApp::new().await;
    let service_id = app.seed_service("Barber").await;
    let user_id = app.seed_user("ana@example.com").await;
    let agenda_id = app.seed_agenda(&service_id, json!({ "work_start": "09:00", "work_end": "11:00" })).await;

    let (status, booking) = app.book(&user_id, &service_id, &agenda_id, "2025-11-10", "09:30", "10:00").await;
    assert_eq!(status, StatusCode::CREATED, "{booking}");
    let reservation_id = booking["data"]["id"].as_str().unwrap();

    let (_, body) = app.get(&format!("/agenda/show/{}?fecha=2025-11-10", agenda_id)).await;
    let availability: Vec<bool> = body["data"]["slots"].as_array().unwrap()
        .iter()
        .map(|s| s["available"].as_bool().unwrap())
        .collect();
    assert_eq!(availability, vec![true, false, true, true]);

    let (_, other_day) = app.get(&format!("/agenda/show/{}?fecha=2025-11-11", agenda_id)).await;
    assert!(other_day["data"]["slots"].as_array().unwrap().iter().all(|s| s["available"] == true));

    app.get(&format!("/reservas/delete/{}", reservation_id)).await;
    let (_, body) = app.get(&format!("/agenda/show/{}?fecha=2025-11-10", agenda_id)).await;
    assert!(body["data"]["slots"].as_array().unwrap().iter().all(|s| s["available"] == true));
}

#[tokio::test]
async fn test_service_listing_shows_only_active_agendas_in_date_order() {
    let app = TestApp::new().await;
    let service_id = app.seed_service("Tattoo").await;

    let december = app.seed_agenda(&service_id, json!({ "date_start": "2025-12-01", "date_end": "2025-12-31" })).await;
    let november = app.seed_agenda(&service_id, json!({})).await;
    let january = app.seed_agenda(&service_id, json!({ "date_start": "2026-01-01", "date_end": "2026-01-31" })).await;
    app.get(&format!("/agenda/delete/{}", january)).await;

    let (status, body) = app.get(&format!("/agenda/servicio/{}?fecha=2025-11-10", service_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);

    let ids: Vec<&str> = body["data"].as_array().unwrap().iter().map(|a| a["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec![november.as_str(), december.as_str()]);
    assert_eq!(body["data"][0]["slots"].as_array().unwrap().len(), 16);
    assert!(body["data"][1]["slot_message"].is_string());

    let (status, _) = app.get("/agenda/servicio/does-not-exist").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_agenda_index_filters() {
    let app = TestApp::new().await;
    let first = app.seed_service("Physio").await;
    let second = app.seed_service("Dentist").await;

    app.seed_agenda(&first, json!({})).await;
    let inactive = app.seed_agenda(&first, json!({ "date_start": "2026-02-01", "date_end": "2026-02-28" })).await;
    app.get(&format!("/agenda/delete/{}", inactive)).await;
    app.seed_agenda(&second, json!({ "date_start": "2025-11-15", "date_end": "2025-11-20" })).await;

    let (_, all) = app.get("/agenda/index").await;
    assert_eq!(all["total"], 3);

    let (_, by_service) = app.get(&format!("/agenda/index?servicio_id={}", first)).await;
    assert_eq!(by_service["total"], 2);

    let (_, active) = app.get(&format!("/agenda/index?servicio_id={}&activo=true", first)).await;
    assert_eq!(active["total"], 1);

    let (_, window) = app.get("/agenda/index?fecha_inicio=2025-11-10&fecha_fin=2025-11-30").await;
    assert_eq!(window["total"], 1);
    assert_eq!(window["data"][0]["service_id"], second.as_str());
}
