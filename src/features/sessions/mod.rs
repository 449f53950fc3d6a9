//! Explicit sessions: created at login, cleared at logout.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::SessionService;
