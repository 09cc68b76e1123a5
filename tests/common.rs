use agenda_backend::{
    api::router::create_router,
    config::Config,
    infra::{clock::FixedClock, factory::{run_sqlite_migrations, sqlite_state}},
    state::AppState,
};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{json, Value};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

/// Monday 2025-11-03, 08:00.
pub fn fixed_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 11, 3)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
}

/// `updated_at` as stamped by the fixed clock.
#[allow(dead_code)]
pub fn stamped_at_fixed_now(value: &serde_json::Value) -> bool {
    value.as_str().is_some_and(|s| s.starts_with("2025-11-03T08:00:00"))
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        run_sqlite_migrations(&pool).await;

        let config = Config {
            database_url: db_url,
            port: 0,
            db_max_connections: None,
            log_dir: "./logs".to_string(),
        };

        let state = Arc::new(sqlite_state(&config, pool.clone(), Arc::new(FixedClock(fixed_now()))));
        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .unwrap()
        ).await.unwrap();

        split(response).await
    }

    pub async fn post(&self, uri: &str, payload: Value) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap()
        ).await.unwrap();

        split(response).await
    }

    /// Business + service, returning the service id.
    pub async fn seed_service(&self, name: &str) -> String {
        let (status, business) = self.post("/negocios/store", json!({ "name": format!("{} Studio", name) })).await;
        assert_eq!(status, StatusCode::CREATED, "{business}");
        let business_id = business["data"]["id"].as_str().unwrap();

        let (status, service) = self.post("/servicios/store", json!({
            "business_id": business_id,
            "name": name,
            "duration_minutes": 30,
            "price": 25.0
        })).await;
        assert_eq!(status, StatusCode::CREATED, "{service}");
        service["data"]["id"].as_str().unwrap().to_string()
    }

    pub async fn seed_user(&self, email: &str) -> String {
        let (status, user) = self.post("/usuarios/store", json!({
            "name": "Ana Customer",
            "email": email
        })).await;
        assert_eq!(status, StatusCode::CREATED, "{user}");
        user["data"]["id"].as_str().unwrap().to_string()
    }

    /// November 2025, weekdays only, 09:00-17:00 in 30 minute steps. `extra`
    /// overrides any field.
    pub async fn create_agenda(&self, service_id: &str, extra: Value) -> (StatusCode, Value) {
        let mut body = json!({
            "service_id": service_id,
            "date_start": "2025-11-01",
            "date_end": "2025-11-30",
            "work_start": "09:00",
            "work_end": "17:00",
            "interval_minutes": 30,
            "active_weekdays": [1, 2, 3, 4, 5]
        });
        if let (Some(base), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
            for (k, v) in extra {
                base.insert(k.clone(), v.clone());
            }
        }
        self.post("/agenda/store", body).await
    }

    pub async fn seed_agenda(&self, service_id: &str, extra: Value) -> String {
        let (status, agenda) = self.create_agenda(service_id, extra).await;
        assert_eq!(status, StatusCode::CREATED, "{agenda}");
        agenda["data"]["id"].as_str().unwrap().to_string()
    }

    pub async fn book(
        &self,
        user_id: &str,
        service_id: &str,
        agenda_id: &str,
        date: &str,
        start: &str,
        end: &str,
    ) -> (StatusCode, Value) {
        self.post("/reservas/store", json!({
            "user_id": user_id,
            "service_id": service_id,
            "agenda_id": agenda_id,
            "date_reserved": date,
            "time_start": start,
            "time_end": end,
            "total_price": 25.0
        })).await
    }
}

async fn split(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

/// `"HH:MM-HH:MM"` labels of a slot list.
#[allow(dead_code)]
pub fn slot_labels(slots: &Value) -> Vec<String> {
    slots
        .as_array()
        .unwrap()
        .iter()
        .map(|s| format!("{}-{}", s["start"].as_str().unwrap(), s["end"].as_str().unwrap()))
        .collect()
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
