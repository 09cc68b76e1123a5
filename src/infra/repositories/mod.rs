pub mod sqlite_agenda_repo;
pub mod sqlite_business_repo;
pub mod sqlite_reservation_repo;
pub mod sqlite_service_repo;
pub mod sqlite_user_repo;

pub mod postgres_agenda_repo;
pub mod postgres_business_repo;
pub mod postgres_reservation_repo;
pub mod postgres_service_repo;
pub mod postgres_user_repo;
