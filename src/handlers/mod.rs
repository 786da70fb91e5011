pub mod appointments;
pub mod auth;
pub mod extract;
pub mod health;
pub mod schedule;
pub mod services;
