use std::sync::{Arc, Mutex};

use otobus_core::detail::{BusDetailSession, DetailStatus, LocationListener};
use otobus_core::overlay::route_geojson;
use otobus_core::region::MapRegion;
use otobus_core::transit::{
    Coordinate, Route, RouteFuture, RouteProvider, TransitError, TravelMode,
};
use tokio::task::JoinHandle;

use crate::records::{
    CoordinateRecord, DetailSnapshotRecord, DetailStatusRecord, RegionRecord, RouteLegRecord,
    TravelModeRecord, TripRecord,
};

/// Implemented by the shell to move the bus marker.
///
/// Called from a background thread; hop to the UI thread before touching views.
#[uniffi::export(with_foreign)]
pub trait BusLocationListener: Send + Sync {
    fn on_bus_location(&self, position: CoordinateRecord, region: RegionRecord);
    fn on_status(&self, status: DetailStatusRecord);
}

/// Platform directions (MapKit, Google Directions, ...).
///
/// Return `None` when no route could be found. May block; it runs off the
/// async workers.
#[uniffi::export(with_foreign)]
pub trait RouteSource: Send + Sync {
    fn compute_route(
        &self,
        from: CoordinateRecord,
        to: CoordinateRecord,
        mode: TravelModeRecord,
    ) -> Option<Vec<RouteLegRecord>>;
}

pub(crate) struct ListenerBridge(pub(crate) Arc<dyn BusLocationListener>);

impl LocationListener for ListenerBridge {
    fn on_bus_location(&self, position: Coordinate, region: MapRegion) {
        self.0.on_bus_location(position.into(), region.into());
    }

    fn on_status(&self, status: DetailStatus) {
        self.0.on_status(status.into());
    }
}

pub(crate) struct ForeignRouteProvider(pub(crate) Arc<dyn RouteSource>);

impl RouteProvider for ForeignRouteProvider {
    fn compute_route<'a>(
        &'a self,
        from: Coordinate,
        to: Coordinate,
        mode: TravelMode,
    ) -> RouteFuture<'a> {
        let source = Arc::clone(&self.0);

        Box::pin(async move {
            let legs = tokio::task::spawn_blocking(move || {
                source.compute_route(from.into(), to.into(), mode.into())
            })
            .await
            .map_err(|error| TransitError::NoRoute(format!("route source failed: {error}")))?;

            match legs {
                Some(legs) => Route::new(legs.into_iter().map(Into::into).collect()),
                None => Err(TransitError::NoRoute("route source found no route".into())),
            }
        })
    }
}

/// One open bus detail screen. Closing it, or dropping the last reference,
/// stops the simulated bus.
#[derive(uniffi::Object)]
pub struct DetailSession {
    inner: Arc<BusDetailSession>,
    loader: Mutex<Option<JoinHandle<()>>>,
}

impl DetailSession {
    pub(crate) fn new(inner: Arc<BusDetailSession>, loader: JoinHandle<()>) -> Self {
        Self {
            inner,
            loader: Mutex::new(Some(loader)),
        }
    }
}

#[uniffi::export]
impl DetailSession {
    /// The trip this screen was opened for
    pub fn trip(&self) -> TripRecord {
        self.inner.trip().clone().into()
    }

    pub fn snapshot(&self) -> DetailSnapshotRecord {
        self.inner.snapshot().into()
    }

    /// GeoJSON feature of the route line, once a route is known
    pub fn route_geojson(&self) -> Option<String> {
        let route = self.inner.snapshot().route?;

        match route_geojson(&route) {
            Ok(json) => Some(json),
            Err(error) => {
                tracing::warn!(%error, "failed to encode route geojson");
                None
            }
        }
    }

    pub fn close(&self) {
        let loader = match self.loader.lock() {
            Ok(mut loader) => loader.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(loader) = loader {
            loader.abort();
        }

        self.inner.close();
    }
}

impl Drop for DetailSession {
    fn drop(&mut self) {
        self.close();
    }
}
