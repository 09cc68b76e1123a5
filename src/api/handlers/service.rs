use axum::{extract::{State, Path, Query}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::{
    requests::{CreateServiceRequest, ServiceQuery, UpdateServiceRequest},
    responses::ApiResponse,
};
use crate::api::extractors::json::ValidJson;
use crate::api::validation::Validator;
use crate::domain::models::service::{NewServiceParams, Service, ServiceFilter};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

const DUPLICATE_NAME: &str = "A service with this name already exists for the business";

async fn load_service(state: &AppState, id: &str) -> Result<Service, AppError> {
    state.service_repo.find_by_id(id).await?
        .ok_or(AppError::NotFound("Service not found".into()))
}

fn check_numbers(v: &mut Validator, duration: Option<i32>, price: Option<f64>) {
    if let Some(d) = duration {
        v.check(d >= 1, "duration_minutes", "must be at least 1");
    }
    if let Some(p) = price {
        v.check(p.is_finite() && p >= 0.0, "price", "must not be negative");
    }
}

pub async fn create_service(
    State(state): State<Arc<AppState>>,
    ValidJson(payload): ValidJson<CreateServiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut v = Validator::default();
    let business_id = v.required("business_id", payload.business_id.as_deref()).map(str::to_string);
    let name = v.required("name", payload.name.as_deref()).map(str::to_string);
    let duration = v.required_value("duration_minutes", payload.duration_minutes);
    let price = v.required_value("price", payload.price);
    check_numbers(&mut v, duration, price);

    let (Some(business_id), Some(name), Some(duration_minutes), Some(price)) = (business_id, name, duration, price) else {
        return Err(v.into_error("Invalid service data"));
    };
    v.finish("Invalid service data")?;

    state.business_repo.find_by_id(&business_id).await?
        .ok_or(AppError::NotFound("Business not found".into()))?;

    if state.service_repo.find_by_name(&business_id, &name).await?.is_some() {
        return Err(AppError::Conflict(DUPLICATE_NAME.into()));
    }

    let service = Service::new(NewServiceParams {
        business_id,
        name,
        description: payload.description,
        duration_minutes,
        price,
        active: payload.active.unwrap_or(true),
    });
    let created = state.service_repo.create(&service).await?;

    info!("Service created: {} ({})", created.name, created.id);
    Ok((StatusCode::CREATED, Json(ApiResponse::with_message("Service created", created))))
}

pub async fn list_services(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ServiceQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = ServiceFilter { business_id: query.negocio_id, active: query.activo };
    let services = state.service_repo.list(&filter).await?;
    Ok(Json(ApiResponse::list(services)))
}

pub async fn get_service(
    State(state): State<Arc<AppState>>,
    Path(service_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let service = load_service(&state, &service_id).await?;
    Ok(Json(ApiResponse::data(service)))
}

pub async fn update_service(
    State(state): State<Arc<AppState>>,
    Path(service_id): Path<String>,
    ValidJson(payload): ValidJson<UpdateServiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut service = load_service(&state, &service_id).await?;

    let mut v = Validator::default();
    let name = match payload.name.as_deref() {
        Some(raw) => v.required("name", Some(raw)).map(str::to_string),
        None => None,
    };
    check_numbers(&mut v, payload.duration_minutes, payload.price);
    v.finish("Invalid service data")?;

    if let Some(name) = name
        && name != service.name
    {
        if let Some(other) = state.service_repo.find_by_name(&service.business_id, &name).await?
            && other.id != service.id
        {
            return Err(AppError::Conflict(DUPLICATE_NAME.into()));
        }
        service.name = name;
    }

    if let Some(description) = payload.description {
        service.description = description;
    }
    if let Some(d) = payload.duration_minutes {
        service.duration_minutes = d;
    }
    if let Some(p) = payload.price {
        service.price = p;
    }
    if let Some(active) = payload.active {
        service.active = active;
    }
    service.updated_at = state.clock.timestamp();

    let updated = state.service_repo.update(&service).await?;
    info!("Service updated: {}", updated.id);
    Ok(Json(ApiResponse::with_message("Service updated", updated)))
}

/// Hard delete; agendas and reservations of the service go with it.
pub async fn delete_service(
    State(state): State<Arc<AppState>>,
    Path(service_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.service_repo.delete(&service_id).await?;
    info!("Service deleted: {}", service_id);
    Ok(Json(ApiResponse::message("Service deleted")))
}

pub async fn list_business_services(
    State(state): State<Arc<AppState>>,
    Path(business_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.business_repo.find_by_id(&business_id).await?
        .ok_or(AppError::NotFound("Business not found".into()))?;

    let filter = ServiceFilter { business_id: Some(business_id), active: Some(true) };
    let services = state.service_repo.list(&filter).await?;
    Ok(Json(ApiResponse::list(services)))
}

pub async fn toggle_service(
    State(state): State<Arc<AppState>>,
    Path(service_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut service = load_service(&state, &service_id).await?;
    service.active = !service.active;
    service.updated_at = state.clock.timestamp();

    let updated = state.service_repo.update(&service).await?;
    let message = if updated.active { "Service activated" } else { "Service deactivated" };

    info!("{}: {}", message, updated.id);
    Ok(Json(ApiResponse::with_message(message, updated)))
}
