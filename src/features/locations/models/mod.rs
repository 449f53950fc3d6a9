mod location;
mod seed;

pub use location::{
    Coordinates, Location, LocationCategory, LocationId, LocationStatus, NewLocation,
};
pub use seed::{demo_locations, DEMO_USER_ID};
