//! Pluggable routing traits.
//!
//! Directions are a platform service (MapKit, a routing server, ...), so the
//! crate only defines the seam and an offline fallback.

use std::future::Future;
use std::pin::Pin;

use crate::models::route::Route;
use crate::models::types::{Coordinate, Result, TravelMode};

pub type RouteFuture<'a> = Pin<Box<dyn Future<Output = Result<Route>> + Send + 'a>>;

/// Compute a route between two coordinates.
///
/// Failure (`TransitError::NoRoute`) is expected: no network, no road
/// connection, service refused. Callers degrade instead of erroring out.
pub trait RouteProvider: Send + Sync {
    fn compute_route<'a>(
        &'a self,
        from: Coordinate,
        to: Coordinate,
        mode: TravelMode,
    ) -> RouteFuture<'a>;
}
