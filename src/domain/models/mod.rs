pub mod agenda;
pub mod business;
pub mod reservation;
pub mod service;
pub mod time;
pub mod user;
