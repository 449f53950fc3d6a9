pub mod locations;
pub mod map;
pub mod sessions;
