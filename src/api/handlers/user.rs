use axum::{extract::{State, Path}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::{
    requests::CreateUserRequest,
    responses::{ApiResponse, UserView},
};
use crate::api::extractors::json::ValidJson;
use crate::api::validation::Validator;
use crate::domain::models::{reservation::ReservationFilter, user::User};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

async fn load_user(state: &AppState, id: &str) -> Result<User, AppError> {
    state.user_repo.find_by_id(id).await?
        .ok_or(AppError::NotFound("User not found".into()))
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    ValidJson(payload): ValidJson<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut v = Validator::default();
    let name = v.required("name", payload.name.as_deref()).map(str::to_string);
    let email = v.required("email", payload.email.as_deref()).map(str::to_string);
    if let Some(email) = &email {
        v.check(email.contains('@'), "email", "must be a valid email address");
    }

    let (Some(name), Some(email)) = (name, email) else {
        return Err(v.into_error("Invalid user data"));
    };
    v.finish("Invalid user data")?;

    let user = User::new(name, email, payload.phone);
    let created = state.user_repo.create(&user).await?;

    info!("User created: {}", created.id);
    Ok((StatusCode::CREATED, Json(ApiResponse::with_message("User created", created))))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = load_user(&state, &user_id).await?;
    let counts = state.reservation_repo.count_by_state_for_user(&user.id).await?;

    Ok(Json(ApiResponse::data(UserView::new(user, &counts))))
}

/// Soft delete. Refused while the user still holds pending or confirmed
/// reservations.
pub async fn deactivate_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = load_user(&state, &user_id).await?;

    let open: i64 = state.reservation_repo.count_by_state_for_user(&user.id).await?
        .into_iter()
        .filter(|(s, _)| s.is_open())
        .map(|(_, n)| n)
        .sum();

    if open > 0 {
        return Err(AppError::State(format!(
            "The user has {} pending or confirmed reservations",
            open
        )));
    }

    state.user_repo.set_active(&user.id, false).await?;
    info!("User deactivated: {}", user.id);
    Ok(Json(ApiResponse::message("User deactivated")))
}

pub async fn activate_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = load_user(&state, &user_id).await?;
    state.user_repo.set_active(&user.id, true).await?;

    info!("User activated: {}", user.id);
    Ok(Json(ApiResponse::message("User activated")))
}

pub async fn reservation_history(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = load_user(&state, &user_id).await?;
    let filter = ReservationFilter { user_id: Some(user.id), ..Default::default() };
    let reservations = state.reservation_repo.list(&filter).await?;

    Ok(Json(ApiResponse::list(reservations)))
}
