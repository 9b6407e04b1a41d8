//! The bus detail screen: resolve cities, fetch a route, move the bus.
//!
//! A [`BusDetailSession`] is the scope of one detail screen. It owns the
//! position simulator, so closing or dropping the session is what stops the
//! periodic updates.

use std::sync::{Arc, Mutex, MutexGuard};

use otobus_transit::{CityName, CityStore, Coordinate, Route, RouteProvider, TransitError};
use rand::Rng;
use tokio::sync::watch;

use crate::catalog::ScheduledTrip;
use crate::config::TrackerConfig;
use crate::region::MapRegion;
use crate::simulation::{RoutePositionSimulator, Scheduler, SimulationError, SimulationState};

/// Collaborators a session needs, shared between sessions.
#[derive(Clone)]
pub struct TrackingContext {
    pub cities: Arc<dyn CityStore>,
    pub routes: Arc<dyn RouteProvider>,
    pub scheduler: Arc<dyn Scheduler>,
    pub config: TrackerConfig,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum DetailStatus {
    Loading,
    /// One of the cities is missing from the store; no map is shown
    CitiesUnavailable,
    /// The map is shown without a route and the bus never moves
    RouteUnavailable,
    Tracking,
    Closed,
}

#[derive(Clone, Debug)]
pub struct DetailSnapshot {
    pub status: DetailStatus,
    pub from: Option<Coordinate>,
    pub to: Option<Coordinate>,
    pub route: Option<Arc<Route>>,
    pub region: MapRegion,
    pub bus_location: Option<Coordinate>,
}

/// Receives updates as they happen, for shells that prefer push over polling
/// [`BusDetailSession::subscribe`].
pub trait LocationListener: Send + Sync {
    fn on_bus_location(&self, position: Coordinate, region: MapRegion);

    fn on_status(&self, _status: DetailStatus) {}
}

#[derive(Debug, thiserror::Error)]
pub enum DetailError {
    #[error("city lookup failed: {0}")]
    CitiesUnavailable(#[source] TransitError),

    #[error("route unavailable: {0}")]
    RouteUnavailable(#[source] TransitError),

    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error("session was closed")]
    Closed,
}

pub struct BusDetailSession {
    trip: ScheduledTrip,
    from: CityName,
    to: CityName,
    context: TrackingContext,
    state: Arc<watch::Sender<DetailSnapshot>>,
    simulator: Mutex<RoutePositionSimulator>,
    listener: Option<Arc<dyn LocationListener>>,
}

impl BusDetailSession {
    pub fn new(
        trip: ScheduledTrip,
        from: CityName,
        to: CityName,
        context: TrackingContext,
        listener: Option<Arc<dyn LocationListener>>,
    ) -> Self {
        let (state, _) = watch::channel(DetailSnapshot {
            status: DetailStatus::Loading,
            from: None,
            to: None,
            route: None,
            region: context.config.initial_region,
            bus_location: None,
        });
        let simulator = RoutePositionSimulator::new(Arc::clone(&context.scheduler));

        Self {
            trip,
            from,
            to,
            context,
            state: Arc::new(state),
            simulator: Mutex::new(simulator),
            listener,
        }
    }

    pub fn trip(&self) -> &ScheduledTrip {
        &self.trip
    }

    pub fn snapshot(&self) -> DetailSnapshot {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DetailSnapshot> {
        self.state.subscribe()
    }

    pub fn simulation_state(&self) -> SimulationState {
        self.lock_simulator().state()
    }

    fn lock_simulator(&self) -> MutexGuard<'_, RoutePositionSimulator> {
        // A panicking update callback must not keep the session from stopping
        self.simulator
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Move to a failure status unless the session was closed meanwhile
    fn degrade(&self, status: DetailStatus) {
        let changed = self.state.send_if_modified(|snapshot| {
            if snapshot.status == DetailStatus::Closed {
                return false;
            }
            snapshot.status = status;
            true
        });

        if changed {
            self.notify_status(status);
        }
    }

    fn notify_status(&self, status: DetailStatus) {
        if let Some(listener) = &self.listener {
            listener.on_status(status);
        }
    }

    /// Resolve both cities, compute the route and start moving the bus.
    ///
    /// Every failure leaves the session in a degraded but valid state, and the
    /// error only says why.
    pub async fn load<R>(&self, rng: R) -> Result<(), DetailError>
    where
        R: Rng + Send + 'static,
    {
        let cities = &self.context.cities;
        let endpoints = cities
            .lookup(&self.from)
            .and_then(|from| Ok((from, cities.lookup(&self.to)?)));

        let (from, to) = match endpoints {
            Ok(endpoints) => endpoints,
            Err(error) => {
                tracing::warn!(from = %self.from, to = %self.to, %error, "city lookup failed");
                self.degrade(DetailStatus::CitiesUnavailable);
                return Err(DetailError::CitiesUnavailable(error));
            }
        };

        self.state.send_modify(|snapshot| {
            snapshot.from = Some(from);
            snapshot.to = Some(to);
        });

        let route = self
            .context
            .routes
            .compute_route(from, to, self.context.config.travel_mode)
            .await;

        let route = match route {
            Ok(route) => Arc::new(route),
            Err(error) => {
                tracing::warn!(from = %self.from, to = %self.to, %error, "no route, showing map only");
                self.degrade(DetailStatus::RouteUnavailable);
                return Err(DetailError::RouteUnavailable(error));
            }
        };

        tracing::info!(
            from = %self.from,
            to = %self.to,
            legs = route.legs().len(),
            total_distance = route.total_distance(),
            "route computed"
        );

        // Checked under the simulator lock so a concurrent close cannot be missed
        let mut simulator = self.lock_simulator();
        if self.state.borrow().status == DetailStatus::Closed {
            return Err(DetailError::Closed);
        }

        let region = route
            .bounding_region()
            .map(MapRegion::from_rect)
            .unwrap_or(self.context.config.initial_region);
        self.state.send_modify(|snapshot| {
            snapshot.route = Some(Arc::clone(&route));
            snapshot.region = region;
        });

        let state = Arc::clone(&self.state);
        let listener = self.listener.clone();
        simulator.start(route, self.context.config.tick_interval(), rng, move |position| {
            let mut region = MapRegion::default();
            state.send_modify(|snapshot| {
                snapshot.bus_location = Some(position);
                snapshot.region = snapshot.region.recentered(position);
                region = snapshot.region;
            });

            tracing::debug!(
                latitude = position.latitude,
                longitude = position.longitude,
                "bus position updated"
            );
            if let Some(listener) = &listener {
                listener.on_bus_location(position, region);
            }
        })?;
        self.state
            .send_modify(|snapshot| snapshot.status = DetailStatus::Tracking);
        drop(simulator);

        self.notify_status(DetailStatus::Tracking);
        Ok(())
    }

    /// Stop the bus and mark the session closed. Safe to call repeatedly.
    pub fn close(&self) {
        let mut simulator = self.lock_simulator();
        simulator.stop();

        let closed_now = self.state.send_if_modified(|snapshot| {
            let open = snapshot.status != DetailStatus::Closed;
            snapshot.status = DetailStatus::Closed;
            open
        });
        drop(simulator);

        if closed_now {
            tracing::info!(trip = %self.trip.trip.id, "detail session closed");
            self.notify_status(DetailStatus::Closed);
        }
    }
}
