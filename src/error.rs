use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::error;

use crate::domain::services::reservation_rules::BookingRejection;

/// Field name → human-readable reason.
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid input: {message}")]
    Validation { message: String, fields: FieldErrors },
    #[error("Invalid state: {0}")]
    State(String),
    #[error("Reservation rejected: {0}")]
    Rejected(#[from] BookingRejection),
}

impl AppError {
    pub fn validation(message: impl Into<String>, fields: FieldErrors) -> Self {
        AppError::Validation { message: message.into(), fields }
    }

    /// Validation failure on a single field.
    pub fn invalid_field(field: &str, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        let mut fields = FieldErrors::new();
        fields.insert(field.to_string(), reason.clone());
        AppError::Validation { message: reason, fields }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Database(e) => {
                if let Some(db_err) = e.as_database_error() {
                    let code = db_err.code().unwrap_or_default();

                    // 2067 = SQLite Unique Constraint
                    // 23505 = PostgreSQL Unique Violation
                    if code == "2067" || code == "23505" {
                        return (
                            StatusCode::CONFLICT,
                            Json(json!({ "status": "error", "message": "Resource already exists (duplicate entry)" }))
                        ).into_response();
                    }
                }

                error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Validation { message, fields } => {
                return (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({ "status": "error", "message": message, "errors": fields }))
                ).into_response();
            }
            AppError::State(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Rejected(reason) => {
                return (
                    rejection_status(reason),
                    Json(json!({ "status": "error", "message": reason.to_string(), "reason": reason.code() }))
                ).into_response();
            }
        };

        let body = Json(json!({
            "status": "error",
            "message": message
        }));

        (status, body).into_response()
    }
}

fn rejection_status(reason: &BookingRejection) -> StatusCode {
    match reason {
        BookingRejection::AgendaUnavailable => StatusCode::NOT_FOUND,
        BookingRejection::SlotTaken => StatusCode::CONFLICT,
        BookingRejection::DateOutOfRange
        | BookingRejection::DayNotActive
        | BookingRejection::OutsideWorkingHours
        | BookingRejection::OverlapsBreak => StatusCode::UNPROCESSABLE_ENTITY,
    }
}
