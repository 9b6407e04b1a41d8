//! Spatial query utilities for distance calculations.
//!
//! Uses Haversine formula for accurate distances on Earth's surface.

use geo::{Distance, Haversine, InterpolatePoint};

use crate::models::types::Coordinate;

/// Calculate Haversine distance between two coordinates in meters
pub fn haversine_distance(c1: Coordinate, c2: Coordinate) -> f64 {
    Haversine.distance(c1.to_point(), c2.to_point())
}

/// Point at `ratio` (0..=1) of the way along the great circle from `start` to `end`
pub fn haversine_interpolate(start: Coordinate, end: Coordinate, ratio: f64) -> Coordinate {
    Haversine
        .point_at_ratio_between(start.to_point(), end.to_point(), ratio)
        .into()
}
