use std::sync::Arc;
use crate::domain::ports::{
    AgendaRepository, BusinessRepository, Clock, ReservationRepository, ServiceRepository, UserRepository,
};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub business_repo: Arc<dyn BusinessRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub service_repo: Arc<dyn ServiceRepository>,
    pub agenda_repo: Arc<dyn AgendaRepository>,
    pub reservation_repo: Arc<dyn ReservationRepository>,
    pub clock: Arc<dyn Clock>,
}
