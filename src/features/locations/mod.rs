//! Location records and their persistence seam.
//!
//! `LocationStore` is the per-surface canonical collection; it never talks to
//! storage itself. `LocationRepository` is where a real backend plugs in, with
//! `InMemoryLocationRepository` as the bundled volatile implementation.

pub mod dtos;
pub mod models;
pub mod services;

pub use services::{InMemoryLocationRepository, LocationRepository, LocationStore};
