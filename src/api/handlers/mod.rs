pub mod agenda;
pub mod business;
pub mod health;
pub mod reservation;
pub mod service;
pub mod user;
