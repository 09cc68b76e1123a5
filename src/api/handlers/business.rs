use axum::{extract::{State, Path}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::{requests::CreateBusinessRequest, responses::ApiResponse};
use crate::api::extractors::json::ValidJson;
use crate::api::validation::Validator;
use crate::domain::models::business::Business;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn create_business(
    State(state): State<Arc<AppState>>,
    ValidJson(payload): ValidJson<CreateBusinessRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut v = Validator::default();
    let name = v.required("name", payload.name.as_deref()).map(str::to_string);
    let Some(name) = name else {
        return Err(v.into_error("Invalid business data"));
    };

    let business = Business::new(name, payload.email, payload.phone, payload.address);
    let created = state.business_repo.create(&business).await?;

    info!("Business created: {}", created.id);
    Ok((StatusCode::CREATED, Json(ApiResponse::with_message("Business created", created))))
}

pub async fn get_business(
    State(state): State<Arc<AppState>>,
    Path(business_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let business = state.business_repo.find_by_id(&business_id).await?
        .ok_or(AppError::NotFound("Business not found".into()))?;

    Ok(Json(ApiResponse::data(business)))
}
