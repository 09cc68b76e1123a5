pub mod agenda_rules;
pub mod availability;
pub mod lifecycle;
pub mod overlap;
pub mod reservation_rules;
pub mod slots;
