//! Geodesic query utilities.

pub mod queries;

pub use queries::{haversine_distance, haversine_interpolate};
