use crate::domain::models::{
    agenda::{Agenda, AgendaFilter},
    business::Business,
    reservation::{Reservation, ReservationFilter, ReservationState},
    service::{Service, ServiceFilter},
    user::User,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

#[async_trait]
pub trait BusinessRepository: Send + Sync {
    async fn create(&self, business: &Business) -> Result<Business, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Business>, AppError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn set_active(&self, id: &str, active: bool) -> Result<(), AppError>;
}

#[async_trait]
pub trait ServiceRepository: Send + Sync {
    async fn create(&self, service: &Service) -> Result<Service, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Service>, AppError>;
    async fn find_by_name(&self, business_id: &str, name: &str) -> Result<Option<Service>, AppError>;
    async fn list(&self, filter: &ServiceFilter) -> Result<Vec<Service>, AppError>;
    async fn update(&self, service: &Service) -> Result<Service, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait AgendaRepository: Send + Sync {
    async fn create(&self, agenda: &Agenda) -> Result<Agenda, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Agenda>, AppError>;
    async fn list(&self, filter: &AgendaFilter) -> Result<Vec<Agenda>, AppError>;
    /// Active agendas of one service, earliest `date_start` first.
    async fn list_active_by_service(&self, service_id: &str) -> Result<Vec<Agenda>, AppError>;
    async fn update(&self, agenda: &Agenda) -> Result<Agenda, AppError>;
    async fn set_active(&self, id: &str, active: bool, at: DateTime<Utc>) -> Result<(), AppError>;
}

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Inserts the reservation unless a slot-holding sibling on the same agenda
    /// and day overlaps it. The check and the insert share one transaction that
    /// holds a write lock on the agenda. `None` means the slot was taken.
    async fn create_if_free(&self, reservation: &Reservation) -> Result<Option<Reservation>, AppError>;
    /// Same guarantee as `create_if_free` for moving an existing reservation.
    async fn reschedule_if_free(&self, reservation: &Reservation) -> Result<Option<Reservation>, AppError>;
    /// Writes fields that do not affect the occupied slot.
    async fn update(&self, reservation: &Reservation) -> Result<Reservation, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Reservation>, AppError>;
    /// Newest date first, then latest start first.
    async fn list(&self, filter: &ReservationFilter) -> Result<Vec<Reservation>, AppError>;
    /// Non-cancelled reservations of one agenda on one day.
    async fn list_active_for_day(&self, agenda_id: &str, date: NaiveDate) -> Result<Vec<Reservation>, AppError>;
    async fn count_by_state_for_user(&self, user_id: &str) -> Result<Vec<(ReservationState, i64)>, AppError>;
}

/// Source of "today" for slot listings and date validation, and of the
/// timestamps stamped on updated records.
pub trait Clock: Send + Sync {
    /// Local wall-clock time.
    fn now(&self) -> NaiveDateTime;

    fn timestamp(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}
