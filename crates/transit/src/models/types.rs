//! Core data types and enums for bus tracking.

use geo::Point;

use crate::identifiers::*;

// ============================================================================
// Enums
// ============================================================================

/// How the route provider should travel between two points
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TravelMode {
    #[default]
    Automobile,
    Walking,
}

// ============================================================================
// Data Structures
// ============================================================================

/// A (latitude, longitude) pair in decimal degrees.
///
/// `geo` works in (x, y) order, so conversions to and from [`Point`] swap the
/// components: x is longitude, y is latitude.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    pub fn to_point(self) -> Point {
        Point::new(self.longitude, self.latitude)
    }
}

impl From<Point> for Coordinate {
    fn from(point: Point) -> Self {
        Self::new(point.y(), point.x())
    }
}

impl From<Coordinate> for Point {
    fn from(coordinate: Coordinate) -> Self {
        coordinate.to_point()
    }
}

impl From<Coordinate> for geo::Coord {
    fn from(coordinate: Coordinate) -> Self {
        geo::Coord {
            x: coordinate.longitude,
            y: coordinate.latitude,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    #[error("City not found: {0}")]
    CityNotFound(CityName),

    #[error("No route available: {0}")]
    NoRoute(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, TransitError>;
