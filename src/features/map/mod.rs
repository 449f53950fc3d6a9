//! Map surfaces: filtering, per-context policy, marker reconciliation and
//! viewport control.
//!
//! A surface is mounted for one session in one [`models::ViewContext`] and
//! holds its own copy of the location collection. Every action on it runs
//! under the surface lock and answers an overlay patch describing exactly
//! which markers changed.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::MapService;
