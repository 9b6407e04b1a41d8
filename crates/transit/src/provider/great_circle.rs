//! Offline route provider following the great circle between two points.
//!
//! No road network is involved; the arc is cut into legs of bounded length so
//! a position simulated along it still moves in visible steps.

use crate::models::route::{Route, RouteLeg};
use crate::models::types::*;
use crate::network::traits::{RouteFuture, RouteProvider};
use crate::spatial::queries::{haversine_distance, haversine_interpolate};

/// Default upper bound on a single leg, in meters
pub const DEFAULT_MAX_LEG_LENGTH: f64 = 10_000.0;

/// Shortest leg length accepted by [`GreatCircleRouteProvider::new`], in meters
pub const MIN_LEG_LENGTH: f64 = 1.0;

/// Upper bound on the number of legs in one route
pub const MAX_LEGS: usize = 100_000;

#[derive(Clone, Debug)]
pub struct GreatCircleRouteProvider {
    max_leg_length: f64,
}

impl GreatCircleRouteProvider {
    /// `max_leg_length` must be finite and at least [`MIN_LEG_LENGTH`],
    /// otherwise the default is used
    pub fn new(max_leg_length: f64) -> Self {
        let max_leg_length = if max_leg_length >= MIN_LEG_LENGTH && max_leg_length.is_finite() {
            max_leg_length
        } else {
            DEFAULT_MAX_LEG_LENGTH
        };

        Self { max_leg_length }
    }

    pub fn max_leg_length(&self) -> f64 {
        self.max_leg_length
    }

    /// Synchronous core of [`RouteProvider::compute_route`]
    pub fn route_between(&self, from: Coordinate, to: Coordinate) -> Result<Route> {
        if !from.is_finite() || !to.is_finite() {
            return Err(TransitError::NoRoute(
                "endpoints must be finite coordinates".into(),
            ));
        }

        let length = haversine_distance(from, to);
        let leg_count = (length / self.max_leg_length).ceil();
        if leg_count > MAX_LEGS as f64 {
            return Err(TransitError::NoRoute(format!(
                "{length:.0}m would need {leg_count} legs, more than {MAX_LEGS}"
            )));
        }
        let leg_count = (leg_count as usize).max(1);

        let mut legs = Vec::with_capacity(leg_count);
        let mut path = Vec::with_capacity(leg_count + 1);
        path.push(geo::Coord::from(from));

        let mut previous = from;
        for i in 1..=leg_count {
            // Land exactly on the destination instead of trusting the interpolation
            let point = if i == leg_count {
                to
            } else {
                haversine_interpolate(from, to, i as f64 / leg_count as f64)
            };

            legs.push(RouteLeg::new(haversine_distance(previous, point), point));
            path.push(geo::Coord::from(point));
            previous = point;
        }

        Route::with_path(legs, path.into())
    }
}

impl Default for GreatCircleRouteProvider {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LEG_LENGTH)
    }
}

impl RouteProvider for GreatCircleRouteProvider {
    fn compute_route<'a>(
        &'a self,
        from: Coordinate,
        to: Coordinate,
        // Every mode follows the same arc
        _mode: TravelMode,
    ) -> RouteFuture<'a> {
        Box::pin(async move { self.route_between(from, to) })
    }
}
