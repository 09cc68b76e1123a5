use axum::{extract::{State, Path, Query}, http::StatusCode, response::IntoResponse, Json};
use chrono::NaiveDate;
use crate::state::AppState;
use crate::api::dtos::{
    requests::{AgendaQuery, AgendaRequest, CheckAgendaRequest, SlotDateQuery},
    responses::{AgendaView, ApiResponse, AvailabilityResponse},
};
use crate::api::extractors::json::ValidJson;
use crate::api::validation::Validator;
use crate::domain::models::agenda::{Agenda, AgendaFilter, NewAgendaParams};
use crate::domain::models::time::{Weekday, WeekdaySet};
use crate::domain::services::agenda_rules::{has_conflict, validate_agenda};
use crate::domain::services::availability::day_slots;
use crate::error::AppError;
use std::sync::Arc;
use tracing::{info, warn};

const OVERLAPPING_AGENDA: &str = "An active agenda already covers an overlapping date range for this service";

async fn load_agenda(state: &AppState, id: &str) -> Result<Agenda, AppError> {
    state.agenda_repo.find_by_id(id).await?
        .ok_or(AppError::NotFound("Agenda not found".into()))
}

async fn ensure_service(state: &AppState, service_id: &str) -> Result<(), AppError> {
    state.service_repo.find_by_id(service_id).await?
        .ok_or(AppError::NotFound("Service not found".into()))?;
    Ok(())
}

/// `fecha` if given, otherwise today.
fn slot_date(state: &AppState, fecha: Option<&str>) -> Result<NaiveDate, AppError> {
    let mut v = Validator::default();
    let date = v.optional_date("fecha", fecha);
    v.finish("Invalid slot date")?;
    Ok(date.unwrap_or_else(|| state.clock.today()))
}

async fn view(state: &AppState, agenda: Agenda, date: NaiveDate) -> Result<AgendaView, AppError> {
    let same_day = state.reservation_repo.list_active_for_day(&agenda.id, date).await?;
    let day = day_slots(&agenda, date, &same_day);
    Ok(AgendaView::new(agenda, day))
}

async fn views(state: &AppState, agendas: Vec<Agenda>, date: NaiveDate) -> Result<Vec<AgendaView>, AppError> {
    let mut out = Vec::with_capacity(agendas.len());
    for agenda in agendas {
        out.push(view(state, agenda, date).await?);
    }
    Ok(out)
}

fn parse_weekdays(v: &mut Validator, raw: &[i64]) -> WeekdaySet {
    let mut days = Vec::with_capacity(raw.len());
    for n in raw {
        match Weekday::try_from(*n) {
            Ok(day) => days.push(day),
            Err(e) => v.reject("active_weekdays", e.to_string()),
        }
    }
    days.into_iter().collect()
}

async fn reject_overlap(state: &AppState, agenda: &Agenda, exclude: Option<&str>) -> Result<(), AppError> {
    let active = state.agenda_repo.list_active_by_service(&agenda.service_id).await?;
    if has_conflict(&active, &agenda.service_id, agenda.date_start, agenda.date_end, exclude) {
        warn!("Agenda overlap rejected for service {} ({} .. {})", agenda.service_id, agenda.date_start, agenda.date_end);
        return Err(AppError::Conflict(OVERLAPPING_AGENDA.into()));
    }
    Ok(())
}

pub async fn create_agenda(
    State(state): State<Arc<AppState>>,
    ValidJson(payload): ValidJson<AgendaRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut v = Validator::default();
    let service_id = v.required("service_id", payload.service_id.as_deref()).map(str::to_string);
    let date_start = v.date("date_start", payload.date_start.as_deref());
    let date_end = v.date("date_end", payload.date_end.as_deref());
    let work_start = v.time("work_start", payload.work_start.as_deref());
    let work_end = v.time("work_end", payload.work_end.as_deref());
    let interval_minutes = v.required_value("interval_minutes", payload.interval_minutes);
    let weekdays = v.required_value("active_weekdays", payload.active_weekdays.as_deref())
        .map(|raw| parse_weekdays(&mut v, raw));
    let break_start = v.optional_time("break_start", payload.break_start.flatten().as_deref());
    let break_end = v.optional_time("break_end", payload.break_end.flatten().as_deref());

    let (
        Some(service_id),
        Some(date_start),
        Some(date_end),
        Some(work_start),
        Some(work_end),
        Some(interval_minutes),
        Some(active_weekdays),
    ) = (service_id, date_start, date_end, work_start, work_end, interval_minutes, weekdays)
    else {
        return Err(v.into_error("Invalid agenda data"));
    };
    v.finish("Invalid agenda data")?;

    let agenda = Agenda::new(NewAgendaParams {
        service_id,
        date_start,
        date_end,
        work_start,
        work_end,
        interval_minutes,
        active_weekdays,
        break_start,
        break_end,
        active: payload.active.unwrap_or(true),
        auto_generate_slots: payload.auto_generate_slots.unwrap_or(true),
        notes: payload.notes.flatten(),
    });
    validate_agenda(&agenda)?;
    ensure_service(&state, &agenda.service_id).await?;

    if agenda.active {
        reject_overlap(&state, &agenda, None).await?;
    }

    let created = state.agenda_repo.create(&agenda).await?;
    info!("Agenda created: {} for service {}", created.id, created.service_id);

    let today = state.clock.today();
    let body = view(&state, created, today).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::with_message("Agenda created", body))))
}

pub async fn list_agendas(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AgendaQuery>,
) -> Result<impl IntoResponse, AppError> {
    let mut v = Validator::default();
    let starts_from = v.optional_date("fecha_inicio", query.fecha_inicio.as_deref());
    let ends_by = v.optional_date("fecha_fin", query.fecha_fin.as_deref());
    v.finish("Invalid agenda filter")?;
    let date = slot_date(&state, query.fecha.as_deref())?;

    let filter = AgendaFilter {
        service_id: query.servicio_id,
        active: query.activo,
        starts_from,
        ends_by,
    };
    let agendas = state.agenda_repo.list(&filter).await?;

    Ok(Json(ApiResponse::list(views(&state, agendas, date).await?)))
}

pub async fn get_agenda(
    State(state): State<Arc<AppState>>,
    Path(agenda_id): Path<String>,
    Query(query): Query<SlotDateQuery>,
) -> Result<impl IntoResponse, AppError> {
    let date = slot_date(&state, query.fecha.as_deref())?;
    let agenda = load_agenda(&state, &agenda_id).await?;

    Ok(Json(ApiResponse::data(view(&state, agenda, date).await?)))
}

pub async fn update_agenda(
    State(state): State<Arc<AppState>>,
    Path(agenda_id): Path<String>,
    ValidJson(payload): ValidJson<AgendaRequest>,
) -> Result<impl IntoResponse, AppError> {
    let existing = load_agenda(&state, &agenda_id).await?;
    let mut agenda = existing.clone();

    let mut v = Validator::default();
    if let Some(raw) = payload.service_id.as_deref()
        && let Some(id) = v.required("service_id", Some(raw))
    {
        agenda.service_id = id.to_string();
    }
    if payload.date_start.is_some()
        && let Some(d) = v.date("date_start", payload.date_start.as_deref())
    {
        agenda.date_start = d;
    }
    if payload.date_end.is_some()
        && let Some(d) = v.date("date_end", payload.date_end.as_deref())
    {
        agenda.date_end = d;
    }
    if payload.work_start.is_some()
        && let Some(t) = v.time("work_start", payload.work_start.as_deref())
    {
        agenda.work_start = t;
    }
    if payload.work_end.is_some()
        && let Some(t) = v.time("work_end", payload.work_end.as_deref())
    {
        agenda.work_end = t;
    }
    if let Some(raw) = payload.active_weekdays.as_deref() {
        agenda.active_weekdays = sqlx::types::Json(parse_weekdays(&mut v, raw));
    }
    if let Some(raw) = payload.break_start {
        agenda.break_start = v.optional_time("break_start", raw.as_deref());
    }
    if let Some(raw) = payload.break_end {
        agenda.break_end = v.optional_time("break_end", raw.as_deref());
    }
    v.finish("Invalid agenda data")?;

    if let Some(n) = payload.interval_minutes {
        agenda.interval_minutes = n;
    }
    if let Some(active) = payload.active {
        agenda.active = active;
    }
    if let Some(auto) = payload.auto_generate_slots {
        agenda.auto_generate_slots = auto;
    }
    if let Some(notes) = payload.notes {
        agenda.notes = notes;
    }
    validate_agenda(&agenda)?;

    let service_changed = agenda.service_id != existing.service_id;
    if service_changed {
        ensure_service(&state, &agenda.service_id).await?;
    }

    let dates_changed = agenda.date_start != existing.date_start || agenda.date_end != existing.date_end;
    if agenda.active && (dates_changed || service_changed || !existing.active) {
        reject_overlap(&state, &agenda, Some(agenda.id.as_str())).await?;
    }

    agenda.updated_at = state.clock.timestamp();
    let updated = state.agenda_repo.update(&agenda).await?;
    info!("Agenda updated: {}", updated.id);

    let today = state.clock.today();
    let body = view(&state, updated, today).await?;
    Ok(Json(ApiResponse::with_message("Agenda updated", body)))
}

/// Soft delete.
pub async fn deactivate_agenda(
    State(state): State<Arc<AppState>>,
    Path(agenda_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let agenda = load_agenda(&state, &agenda_id).await?;
    state.agenda_repo.set_active(&agenda.id, false, state.clock.timestamp()).await?;

    info!("Agenda deactivated: {}", agenda.id);
    Ok(Json(ApiResponse::message("Agenda deactivated")))
}

pub async fn activate_agenda(
    State(state): State<Arc<AppState>>,
    Path(agenda_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let agenda = load_agenda(&state, &agenda_id).await?;
    if agenda.active {
        return Ok(Json(ApiResponse::message("Agenda is already active")));
    }

    reject_overlap(&state, &agenda, Some(agenda.id.as_str())).await?;
    state.agenda_repo.set_active(&agenda.id, true, state.clock.timestamp()).await?;

    info!("Agenda activated: {}", agenda.id);
    Ok(Json(ApiResponse::message("Agenda activated")))
}

pub async fn list_service_agendas(
    State(state): State<Arc<AppState>>,
    Path(service_id): Path<String>,
    Query(query): Query<SlotDateQuery>,
) -> Result<impl IntoResponse, AppError> {
    let date = slot_date(&state, query.fecha.as_deref())?;
    ensure_service(&state, &service_id).await?;

    let agendas = state.agenda_repo.list_active_by_service(&service_id).await?;
    Ok(Json(ApiResponse::list(views(&state, agendas, date).await?)))
}

pub async fn check_agenda_availability(
    State(state): State<Arc<AppState>>,
    ValidJson(payload): ValidJson<CheckAgendaRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut v = Validator::default();
    let service_id = v.required("service_id", payload.service_id.as_deref()).map(str::to_string);
    let date_start = v.date("date_start", payload.date_start.as_deref());
    let date_end = v.date("date_end", payload.date_end.as_deref());
    if let (Some(s), Some(e)) = (date_start, date_end) {
        v.check(s <= e, "date_end", "must be on or after date_start");
    }

    let (Some(service_id), Some(date_start), Some(date_end)) = (service_id, date_start, date_end) else {
        return Err(v.into_error("Invalid availability query"));
    };
    v.finish("Invalid availability query")?;

    let active = state.agenda_repo.list_active_by_service(&service_id).await?;
    let conflict = has_conflict(&active, &service_id, date_start, date_end, payload.exclude_id.as_deref());

    let body = if conflict {
        AvailabilityResponse { available: false, message: OVERLAPPING_AGENDA.into() }
    } else {
        AvailabilityResponse { available: true, message: "The date range is available".into() }
    };
    Ok(Json(ApiResponse::data(body)))
}
