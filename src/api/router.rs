use axum::{
    body::Body,
    extract::Request,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{agenda, business, health, reservation, service, user};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Businesses
        .route("/negocios/store", post(business::create_business))
        .route("/negocios/show/{id}", get(business::get_business))

        // Users
        .route("/usuarios/store", post(user::create_user))
        .route("/usuarios/show/{id}", get(user::get_user))
        .route("/usuarios/delete/{id}", get(user::deactivate_user))
        .route("/usuarios/activate/{id}", get(user::activate_user))
        .route("/usuarios/historial-reservas/{id}", get(user::reservation_history))

        // Services
        .route("/servicios/store", post(service::create_service))
        .route("/servicios/index", get(service::list_services))
        .route("/servicios/show/{id}", get(service::get_service))
        .route("/servicios/update/{id}", post(service::update_service))
        .route("/servicios/delete/{id}", get(service::delete_service))
        .route("/servicios/negocio/{negocio_id}", get(service::list_business_services))
        .route("/servicios/toggle/{id}", get(service::toggle_service))

        // Agendas
        .route("/agenda/store", post(agenda::create_agenda))
        .route("/agenda/index", get(agenda::list_agendas))
        .route("/agenda/show/{id}", get(agenda::get_agenda))
        .route("/agenda/update/{id}", post(agenda::update_agenda))
        .route("/agenda/delete/{id}", get(agenda::deactivate_agenda))
        .route("/agenda/activate/{id}", get(agenda::activate_agenda))
        .route("/agenda/servicio/{servicio_id}", get(agenda::list_service_agendas))
        .route("/agenda/check-disponibilidad", post(agenda::check_agenda_availability))

        // Reservations
        .route("/reservas/store", post(reservation::create_reservation))
        .route("/reservas/index", get(reservation::list_reservations))
        .route("/reservas/show/{id}", get(reservation::get_reservation))
        .route("/reservas/update/{id}", post(reservation::update_reservation))
        .route("/reservas/delete/{id}", get(reservation::cancel_reservation))
        .route("/reservas/confirmar/{id}", get(reservation::confirm_reservation))
        .route("/reservas/completar/{id}", get(reservation::complete_reservation))
        .route("/reservas/usuario/{usuario_id}", get(reservation::list_user_reservations))
        .route("/reservas/verificar-disponibilidad", post(reservation::check_slot_availability))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
