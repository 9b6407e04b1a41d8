//! Bus tracking data models, types, and traits.

pub mod city;
pub mod route;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use city::{default_cities, City, DEFAULT_CITIES};
pub use route::{Route, RouteLeg};
pub use traits::CityStore;
pub use types::{Coordinate, Result, TransitError, TravelMode};
