use axum::{extract::{State, Path, Query}, http::StatusCode, response::IntoResponse, Json};
use chrono::{NaiveDate, NaiveTime};
use crate::state::AppState;
use crate::api::dtos::{
    requests::{CheckSlotRequest, CreateReservationRequest, ReservationQuery, UpdateReservationRequest},
    responses::{ApiResponse, AvailabilityResponse},
};
use crate::api::extractors::json::ValidJson;
use crate::api::validation::Validator;
use crate::domain::models::agenda::Agenda;
use crate::domain::models::reservation::{NewReservationParams, Reservation, ReservationFilter, ReservationState};
use crate::domain::models::time::TimeInterval;
use crate::domain::services::availability::is_free;
use crate::domain::services::lifecycle::{apply, Outcome, Transition};
use crate::domain::services::reservation_rules::{check_reservation, BookingRejection, Candidate};
use crate::error::AppError;
use std::sync::Arc;
use tracing::{info, warn};

async fn load_reservation(state: &AppState, id: &str) -> Result<Reservation, AppError> {
    state.reservation_repo.find_by_id(id).await?
        .ok_or(AppError::NotFound("Reservation not found".into()))
}

fn parse_state(v: &mut Validator, raw: Option<&str>) -> Option<ReservationState> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    match raw.parse::<ReservationState>() {
        Ok(s) => Some(s),
        Err(reason) => {
            v.reject("state", reason);
            None
        }
    }
}

/// Runs the booking gate for `reservation` against its agenda and the
/// agenda's other reservations that day. The agenda must belong to the
/// reservation's service.
async fn gate(state: &AppState, reservation: &Reservation, exclude_id: Option<&str>) -> Result<(), AppError> {
    let agenda: Option<Agenda> = state.agenda_repo.find_by_id(&reservation.agenda_id).await?;

    if let Some(agenda) = &agenda
        && agenda.service_id != reservation.service_id
    {
        return Err(AppError::invalid_field("agenda_id", "the agenda does not belong to the selected service"));
    }

    let siblings = state.reservation_repo
        .list_active_for_day(&reservation.agenda_id, reservation.date_reserved)
        .await?;

    let candidate = Candidate {
        date: reservation.date_reserved,
        start: reservation.time_start,
        end: reservation.time_end,
        exclude_id,
    };

    check_reservation(agenda.as_ref(), &siblings, &candidate).map_err(|reason| {
        warn!(
            agenda_id = %reservation.agenda_id,
            date = %reservation.date_reserved,
            reason = reason.code(),
            "Reservation rejected"
        );
        AppError::Rejected(reason)
    })
}

fn slot_taken(reservation: &Reservation) -> AppError {
    warn!(
        agenda_id = %reservation.agenda_id,
        date = %reservation.date_reserved,
        "Reservation lost the slot to a concurrent booking"
    );
    AppError::Rejected(BookingRejection::SlotTaken)
}

fn check_times(v: &mut Validator, start: Option<NaiveTime>, end: Option<NaiveTime>) {
    if let (Some(s), Some(e)) = (start, end) {
        v.check(e > s, "time_end", "must be after time_start");
    }
}

fn check_not_past(v: &mut Validator, date: Option<NaiveDate>, today: NaiveDate) {
    if let Some(d) = date {
        v.check(d >= today, "date_reserved", "must not be in the past");
    }
}

fn check_price(v: &mut Validator, price: Option<f64>) {
    if let Some(p) = price {
        v.check(p.is_finite() && p >= 0.0, "total_price", "must not be negative");
    }
}

pub async fn create_reservation(
    State(state): State<Arc<AppState>>,
    ValidJson(payload): ValidJson<CreateReservationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut v = Validator::default();
    let user_id = v.required("user_id", payload.user_id.as_deref()).map(str::to_string);
    let service_id = v.required("service_id", payload.service_id.as_deref()).map(str::to_string);
    let agenda_id = v.required("agenda_id", payload.agenda_id.as_deref()).map(str::to_string);
    let date = v.date("date_reserved", payload.date_reserved.as_deref());
    let start = v.time("time_start", payload.time_start.as_deref());
    let end = v.time("time_end", payload.time_end.as_deref());
    let price = v.required_value("total_price", payload.total_price);
    let requested_state = parse_state(&mut v, payload.state.as_deref());
    check_times(&mut v, start, end);
    check_not_past(&mut v, date, state.clock.today());
    check_price(&mut v, price);

    let (Some(user_id), Some(service_id), Some(agenda_id), Some(date), Some(start), Some(end), Some(total_price)) =
        (user_id, service_id, agenda_id, date, start, end, price)
    else {
        return Err(v.into_error("Invalid reservation data"));
    };
    v.finish("Invalid reservation data")?;

    state.user_repo.find_by_id(&user_id).await?
        .ok_or(AppError::NotFound("User not found".into()))?;
    state.service_repo.find_by_id(&service_id).await?
        .ok_or(AppError::NotFound("Service not found".into()))?;

    let reservation = Reservation::new(NewReservationParams {
        user_id,
        service_id,
        agenda_id,
        date_reserved: date,
        time_start: start,
        time_end: end,
        state: requested_state,
        notes: payload.notes,
        total_price,
    });

    gate(&state, &reservation, None).await?;

    let created = state.reservation_repo.create_if_free(&reservation).await?
        .ok_or_else(|| slot_taken(&reservation))?;

    info!(
        "Reservation created: {} on {} {}-{}",
        created.id, created.date_reserved, created.time_start, created.time_end
    );
    Ok((StatusCode::CREATED, Json(ApiResponse::with_message("Reservation created", created))))
}

pub async fn list_reservations(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReservationQuery>,
) -> Result<impl IntoResponse, AppError> {
    let mut v = Validator::default();
    let estado = parse_state(&mut v, query.estado.as_deref());
    let date_from = v.optional_date("fecha_desde", query.fecha_desde.as_deref());
    let date_to = v.optional_date("fecha_hasta", query.fecha_hasta.as_deref());
    v.finish("Invalid reservation filter")?;

    let filter = ReservationFilter {
        user_id: query.usuario_id,
        service_id: query.servicio_id,
        agenda_id: query.agenda_id,
        state: estado,
        date_from,
        date_to,
    };
    let reservations = state.reservation_repo.list(&filter).await?;
    Ok(Json(ApiResponse::list(reservations)))
}

pub async fn get_reservation(
    State(state): State<Arc<AppState>>,
    Path(reservation_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let reservation = load_reservation(&state, &reservation_id).await?;
    Ok(Json(ApiResponse::data(reservation)))
}

/// Partial update. Moving the reservation re-runs the whole booking gate
/// with the reservation itself excluded; a state change follows the
/// lifecycle rules.
pub async fn update_reservation(
    State(state): State<Arc<AppState>>,
    Path(reservation_id): Path<String>,
    ValidJson(payload): ValidJson<UpdateReservationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let existing = load_reservation(&state, &reservation_id).await?;
    let mut reservation = existing.clone();

    let mut v = Validator::default();
    if let Some(raw) = payload.service_id.as_deref()
        && let Some(id) = v.required("service_id", Some(raw))
    {
        reservation.service_id = id.to_string();
    }
    if let Some(raw) = payload.agenda_id.as_deref()
        && let Some(id) = v.required("agenda_id", Some(raw))
    {
        reservation.agenda_id = id.to_string();
    }
    if payload.date_reserved.is_some()
        && let Some(d) = v.date("date_reserved", payload.date_reserved.as_deref())
    {
        reservation.date_reserved = d;
    }
    if payload.time_start.is_some()
        && let Some(t) = v.time("time_start", payload.time_start.as_deref())
    {
        reservation.time_start = t;
    }
    if payload.time_end.is_some()
        && let Some(t) = v.time("time_end", payload.time_end.as_deref())
    {
        reservation.time_end = t;
    }
    let requested_state = parse_state(&mut v, payload.state.as_deref());
    check_price(&mut v, payload.total_price);
    check_times(&mut v, Some(reservation.time_start), Some(reservation.time_end));

    let moved = reservation.service_id != existing.service_id
        || reservation.agenda_id != existing.agenda_id
        || reservation.date_reserved != existing.date_reserved
        || reservation.time_start != existing.time_start
        || reservation.time_end != existing.time_end;
    if reservation.date_reserved != existing.date_reserved {
        check_not_past(&mut v, Some(reservation.date_reserved), state.clock.today());
    }
    v.finish("Invalid reservation data")?;

    if let Some(requested) = requested_state
        && let Some(step) = Transition::towards(existing.state, requested)?
        && let Outcome::Applied(next) = apply(existing.state, step)?
    {
        reservation.state = next;
    }
    if let Some(notes) = payload.notes {
        reservation.notes = notes;
    }
    if let Some(price) = payload.total_price {
        reservation.total_price = price;
    }
    reservation.updated_at = state.clock.timestamp();

    let updated = if moved {
        if !existing.state.is_open() {
            return Err(AppError::State(format!(
                "A {} reservation cannot be rescheduled",
                existing.state
            )));
        }
        if reservation.service_id != existing.service_id {
            state.service_repo.find_by_id(&reservation.service_id).await?
                .ok_or(AppError::NotFound("Service not found".into()))?;
        }

        gate(&state, &reservation, Some(reservation.id.as_str())).await?;
        state.reservation_repo.reschedule_if_free(&reservation).await?
            .ok_or_else(|| slot_taken(&reservation))?
    } else {
        state.reservation_repo.update(&reservation).await?
    };

    info!("Reservation updated: {} ({})", updated.id, updated.state);
    Ok(Json(ApiResponse::with_message("Reservation updated", updated)))
}

async fn transition(state: &AppState, id: &str, step: Transition) -> Result<Json<ApiResponse<Reservation>>, AppError> {
    let mut reservation = load_reservation(state, id).await?;

    match apply(reservation.state, step)? {
        Outcome::Unchanged => {
            let message = format!("Reservation is already {}", reservation.state);
            Ok(Json(ApiResponse::with_message(message, reservation)))
        }
        Outcome::Applied(next) => {
            reservation.state = next;
            reservation.updated_at = state.clock.timestamp();
            let updated = state.reservation_repo.update(&reservation).await?;

            info!("Reservation {} is now {}", updated.id, updated.state);
            Ok(Json(ApiResponse::with_message(format!("Reservation {}", updated.state), updated)))
        }
    }
}

/// Cancels; the slot becomes free for other bookings.
pub async fn cancel_reservation(
    State(state): State<Arc<AppState>>,
    Path(reservation_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    transition(&state, &reservation_id, Transition::Cancel).await
}

pub async fn confirm_reservation(
    State(state): State<Arc<AppState>>,
    Path(reservation_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    transition(&state, &reservation_id, Transition::Confirm).await
}

pub async fn complete_reservation(
    State(state): State<Arc<AppState>>,
    Path(reservation_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    transition(&state, &reservation_id, Transition::Complete).await
}

pub async fn list_user_reservations(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.user_repo.find_by_id(&user_id).await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    let filter = ReservationFilter { user_id: Some(user_id), ..Default::default() };
    let reservations = state.reservation_repo.list(&filter).await?;
    Ok(Json(ApiResponse::list(reservations)))
}

/// Strict-overlap check against the agenda's slot-holding reservations.
pub async fn check_slot_availability(
    State(state): State<Arc<AppState>>,
    ValidJson(payload): ValidJson<CheckSlotRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut v = Validator::default();
    let agenda_id = v.required("agenda_id", payload.agenda_id.as_deref()).map(str::to_string);
    let date = v.date("date_reserved", payload.date_reserved.as_deref());
    let start = v.time("time_start", payload.time_start.as_deref());
    let end = v.time("time_end", payload.time_end.as_deref());
    check_times(&mut v, start, end);

    let (Some(agenda_id), Some(date), Some(start), Some(end)) = (agenda_id, date, start, end) else {
        return Err(v.into_error("Invalid availability query"));
    };
    v.finish("Invalid availability query")?;

    state.agenda_repo.find_by_id(&agenda_id).await?
        .ok_or(AppError::NotFound("Agenda not found".into()))?;

    let same_day = state.reservation_repo.list_active_for_day(&agenda_id, date).await?;
    let exclude = payload.exclude_id.as_deref();
    let others = same_day.iter().filter(|r| Some(r.id.as_str()) != exclude);
    let available = is_free(TimeInterval::from_times(start, end), others);

    let body = AvailabilityResponse {
        available,
        message: if available {
            "The time slot is available".into()
        } else {
            BookingRejection::SlotTaken.to_string()
        },
    };
    Ok(Json(ApiResponse::data(body)))
}
