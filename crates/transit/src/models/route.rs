//! Driving routes as an ordered sequence of legs.

use geo::{BoundingRect, LineString, MultiPoint, Point, Rect};

use crate::models::types::*;

/// One segment of a route
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RouteLeg {
    /// Length of the leg in meters
    pub distance: f64,
    /// Where the leg ends; stands in for the whole leg when placing a marker
    pub point: Coordinate,
}

impl RouteLeg {
    pub fn new(distance: f64, point: Coordinate) -> Self {
        Self { distance, point }
    }
}

/// An immutable route between two coordinates.
///
/// The total distance is accumulated in leg order, the same way a walk over
/// the legs accumulates it, so a walk that reaches the last leg always lands
/// on exactly `total_distance`.
#[derive(Clone, Debug)]
pub struct Route {
    legs: Vec<RouteLeg>,
    total_distance: f64,
    path: LineString,
    bounding_region: Option<Rect>,
}

impl Route {
    /// Build a route whose drawable path is the sequence of leg points.
    pub fn new(legs: Vec<RouteLeg>) -> Result<Self> {
        let path = legs.iter().map(|leg| geo::Coord::from(leg.point)).collect();
        Self::with_path(legs, path)
    }

    /// Build a route with a finer polyline for drawing than the legs provide.
    pub fn with_path(legs: Vec<RouteLeg>, path: LineString) -> Result<Self> {
        for (index, leg) in legs.iter().enumerate() {
            if !leg.distance.is_finite() || leg.distance < 0.0 {
                return Err(TransitError::InvalidData(format!(
                    "leg {} has invalid distance {}",
                    index, leg.distance
                )));
            }

            if !leg.point.is_finite() {
                return Err(TransitError::InvalidData(format!(
                    "leg {} has a non-finite point",
                    index
                )));
            }
        }

        if path.coords().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
            return Err(TransitError::InvalidData(
                "route path contains non-finite coordinates".into(),
            ));
        }

        let total_distance = legs.iter().fold(0.0, |total, leg| total + leg.distance);
        if !total_distance.is_finite() {
            return Err(TransitError::InvalidData(
                "route total distance overflows".into(),
            ));
        }

        let points: MultiPoint = path
            .points()
            .chain(legs.iter().map(|leg| leg.point.to_point()))
            .collect::<Vec<Point>>()
            .into();
        let bounding_region = points.bounding_rect();

        Ok(Self {
            legs,
            total_distance,
            path,
            bounding_region,
        })
    }

    pub fn legs(&self) -> &[RouteLeg] {
        &self.legs
    }

    /// Sum of all leg distances in meters
    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    pub fn path(&self) -> &LineString {
        &self.path
    }

    /// Envelope of every point on the route, `None` when the route is empty
    pub fn bounding_region(&self) -> Option<Rect> {
        self.bounding_region
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }
}
