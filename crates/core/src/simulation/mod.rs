//! Simulated bus positions along a route.
//!
//! There is no vehicle telemetry. A position is produced by drawing a random
//! traveled distance and snapping it to the leg that distance falls on, and a
//! scheduled cycle repeats that every few seconds.

use std::sync::Arc;
use std::time::Duration;

use otobus_transit::{Coordinate, Route};
use rand::Rng;

pub mod scheduler;
#[cfg(test)]
pub(crate) mod testing;

pub use scheduler::{CycleHandle, Scheduler, Tick, TokioScheduler};

/// No leg covers the requested distance
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("no position at {distance}m on a route of {total_distance}m")]
pub struct PositionNotFound {
    pub distance: f64,
    pub total_distance: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimulationError {
    #[error("simulation interval must be greater than zero")]
    ZeroInterval,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum SimulationState {
    Idle,
    Running,
}

/// Uniform draw from `[0, route.total_distance()]`.
pub fn sample_distance<R: Rng + ?Sized>(route: &Route, rng: &mut R) -> f64 {
    let total = route.total_distance();
    if total <= 0.0 {
        return 0.0;
    }

    rng.random_range(0.0..=total)
}

/// Representative point of the first leg whose accumulated distance reaches
/// `distance`.
///
/// Leg boundaries belong to the earlier leg: on legs of 3m and 2m, 3m is still
/// on the first leg and 3.0001m is on the second.
pub fn position_at_distance(route: &Route, distance: f64) -> Result<Coordinate, PositionNotFound> {
    let mut accumulated = 0.0;

    for leg in route.legs() {
        accumulated += leg.distance;
        if accumulated >= distance {
            return Ok(leg.point);
        }
    }

    Err(PositionNotFound {
        distance,
        total_distance: route.total_distance(),
    })
}

fn tick<R: Rng + ?Sized>(route: &Route, rng: &mut R) -> Option<Coordinate> {
    let distance = sample_distance(route, rng);

    match position_at_distance(route, distance) {
        Ok(position) => Some(position),
        Err(error) => {
            tracing::trace!(%error, "skipping simulation tick");
            None
        }
    }
}

/// A running simulation cycle. Stops when dropped.
#[derive(Debug)]
pub struct SimulationHandle {
    cycle: CycleHandle,
}

impl SimulationHandle {
    /// Cancel the cycle; safe to call more than once.
    pub fn stop(&mut self) {
        self.cycle.cancel();
    }

    pub fn is_running(&self) -> bool {
        self.cycle.is_active()
    }
}

/// Start calling `on_update` with a fresh position every `interval`.
///
/// Ticks whose sample falls outside the route are skipped without calling
/// `on_update`.
pub fn start_simulation<R, F>(
    scheduler: &dyn Scheduler,
    route: Arc<Route>,
    interval: Duration,
    mut rng: R,
    mut on_update: F,
) -> Result<SimulationHandle, SimulationError>
where
    R: Rng + Send + 'static,
    F: FnMut(Coordinate) + Send + 'static,
{
    if interval.is_zero() {
        return Err(SimulationError::ZeroInterval);
    }

    let cycle = scheduler.schedule_repeating(
        interval,
        Box::new(move || {
            if let Some(position) = tick(&route, &mut rng) {
                on_update(position);
            }
        }),
    );

    Ok(SimulationHandle { cycle })
}

/// Owner of at most one simulation cycle.
///
/// Starting again replaces the running cycle, and dropping the simulator
/// stops whatever is running.
pub struct RoutePositionSimulator {
    scheduler: Arc<dyn Scheduler>,
    active: Option<SimulationHandle>,
}

impl RoutePositionSimulator {
    pub fn new(scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            scheduler,
            active: None,
        }
    }

    pub fn state(&self) -> SimulationState {
        match &self.active {
            Some(handle) if handle.is_running() => SimulationState::Running,
            _ => SimulationState::Idle,
        }
    }

    pub fn start<R, F>(
        &mut self,
        route: Arc<Route>,
        interval: Duration,
        rng: R,
        on_update: F,
    ) -> Result<(), SimulationError>
    where
        R: Rng + Send + 'static,
        F: FnMut(Coordinate) + Send + 'static,
    {
        if interval.is_zero() {
            return Err(SimulationError::ZeroInterval);
        }

        self.stop();

        tracing::debug!(
            legs = route.legs().len(),
            total_distance = route.total_distance(),
            ?interval,
            "starting simulation"
        );
        self.active = Some(start_simulation(
            self.scheduler.as_ref(),
            route,
            interval,
            rng,
            on_update,
        )?);

        Ok(())
    }

    pub fn stop(&mut self) {
        if let Some(mut handle) = self.active.take() {
            handle.stop();
            tracing::debug!("simulation stopped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::testing::CountingScheduler;
    use otobus_transit::RouteLeg;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::Mutex;

    const A: Coordinate = Coordinate::new(41.0, 28.9);
    const B: Coordinate = Coordinate::new(40.3, 29.1);
    const C: Coordinate = Coordinate::new(39.9, 32.8);

    fn three_leg_route() -> Route {
        Route::new(vec![
            RouteLeg::new(3.0, A),
            RouteLeg::new(2.0, B),
            RouteLeg::new(5.0, C),
        ])
        .unwrap()
    }

    fn recorder() -> (Arc<Mutex<Vec<Coordinate>>>, impl FnMut(Coordinate) + Send + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |c| sink.lock().unwrap().push(c))
    }

    #[test]
    fn test_position_leg_boundaries() {
        let route = three_leg_route();

        assert_eq!(position_at_distance(&route, 0.0), Ok(A));
        assert_eq!(position_at_distance(&route, 3.0), Ok(A));
        assert_eq!(position_at_distance(&route, 3.0001), Ok(B));
        assert_eq!(position_at_distance(&route, 5.0), Ok(B));
        assert_eq!(position_at_distance(&route, 9.999), Ok(C));
        assert_eq!(position_at_distance(&route, 10.0), Ok(C));
    }

    #[test]
    fn test_position_past_end() {
        let route = three_leg_route();

        assert_eq!(
            position_at_distance(&route, 10.0001),
            Err(PositionNotFound {
                distance: 10.0001,
                total_distance: 10.0
            })
        );
    }

    #[test]
    fn test_empty_route_never_has_position() {
        let route = Route::new(vec![]).unwrap();

        assert!(position_at_distance(&route, 0.0).is_err());
        assert!(position_at_distance(&route, 1.0).is_err());
        assert_eq!(sample_distance(&route, &mut StdRng::seed_from_u64(1)), 0.0);
    }

    #[test]
    fn test_zero_length_route_samples_zero() {
        let route = Route::new(vec![RouteLeg::new(0.0, A)]).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..10 {
            assert_eq!(sample_distance(&route, &mut rng), 0.0);
        }
        assert_eq!(position_at_distance(&route, 0.0), Ok(A));
    }

    #[test]
    fn test_sample_is_deterministic_for_seed() {
        let route = three_leg_route();
        let first: Vec<f64> = {
            let mut rng = StdRng::seed_from_u64(42);
            (0..5).map(|_| sample_distance(&route, &mut rng)).collect()
        };
        let second: Vec<f64> = {
            let mut rng = StdRng::seed_from_u64(42);
            (0..5).map(|_| sample_distance(&route, &mut rng)).collect()
        };

        assert_eq!(first, second);
    }

    proptest! {
        #[test]
        fn prop_sample_stays_on_route(
            distances in proptest::collection::vec(0.0f64..50_000.0, 1..40),
            seed in any::<u64>(),
        ) {
            let legs = distances
                .iter()
                .enumerate()
                .map(|(i, d)| RouteLeg::new(*d, Coordinate::new(i as f64, 0.0)))
                .collect::<Vec<_>>();
            let route = Route::new(legs.clone()).unwrap();
            let mut rng = StdRng::seed_from_u64(seed);

            let distance = sample_distance(&route, &mut rng);
            prop_assert!(distance >= 0.0 && distance <= route.total_distance());

            let position = position_at_distance(&route, distance);
            prop_assert!(position.is_ok());
            prop_assert!(legs.iter().any(|leg| Ok(leg.point) == position));
        }

        #[test]
        fn prop_full_distance_is_last_reachable_leg(
            distances in proptest::collection::vec(0.0f64..50_000.0, 1..40),
        ) {
            let legs = distances
                .iter()
                .enumerate()
                .map(|(i, d)| RouteLeg::new(*d, Coordinate::new(i as f64, 0.0)))
                .collect::<Vec<_>>();
            let route = Route::new(legs).unwrap();

            prop_assert!(position_at_distance(&route, route.total_distance()).is_ok());
        }
    }

    #[test]
    fn test_start_rejects_zero_interval() {
        let scheduler = CountingScheduler::default();
        let result = start_simulation(
            &scheduler,
            Arc::new(three_leg_route()),
            Duration::ZERO,
            StdRng::seed_from_u64(1),
            |_| {},
        );

        assert_eq!(result.unwrap_err(), SimulationError::ZeroInterval);
        assert_eq!(scheduler.started(), 0);
    }

    #[test]
    fn test_ticks_emit_route_points() {
        let scheduler = CountingScheduler::default();
        let (seen, on_update) = recorder();

        let handle = start_simulation(
            &scheduler,
            Arc::new(three_leg_route()),
            Duration::from_secs(5),
            StdRng::seed_from_u64(3),
            on_update,
        )
        .unwrap();
        assert!(handle.is_running());
        assert_eq!(scheduler.last_period(), Some(Duration::from_secs(5)));

        for _ in 0..20 {
            scheduler.fire();
        }

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 20);
        assert!(seen.iter().all(|c| [A, B, C].contains(c)));
    }

    #[test]
    fn test_empty_route_ticks_are_skipped() {
        let scheduler = CountingScheduler::default();
        let (seen, on_update) = recorder();

        let _handle = start_simulation(
            &scheduler,
            Arc::new(Route::new(vec![]).unwrap()),
            Duration::from_secs(5),
            StdRng::seed_from_u64(3),
            on_update,
        )
        .unwrap();

        scheduler.fire();
        scheduler.fire();

        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(scheduler.active(), 1);
    }

    #[test]
    fn test_handle_drop_cancels_cycle() {
        let scheduler = CountingScheduler::default();
        let handle = start_simulation(
            &scheduler,
            Arc::new(three_leg_route()),
            Duration::from_secs(5),
            StdRng::seed_from_u64(3),
            |_| {},
        )
        .unwrap();

        drop(handle);

        assert_eq!(scheduler.started(), 1);
        assert_eq!(scheduler.cancelled(), 1);
        assert_eq!(scheduler.active(), 0);
    }

    #[test]
    fn test_restart_keeps_one_cycle() {
        let scheduler = CountingScheduler::default();
        let mut simulator = RoutePositionSimulator::new(Arc::new(scheduler.clone()));
        let route = Arc::new(three_leg_route());

        simulator
            .start(Arc::clone(&route), Duration::from_secs(5), StdRng::seed_from_u64(1), |_| {})
            .unwrap();
        simulator
            .start(route, Duration::from_secs(5), StdRng::seed_from_u64(2), |_| {})
            .unwrap();

        assert_eq!(simulator.state(), SimulationState::Running);
        assert_eq!(scheduler.started(), 2);
        assert_eq!(scheduler.cancelled(), 1);
        assert_eq!(scheduler.active(), 1);
    }

    #[test]
    fn test_stop_when_idle_is_noop() {
        let scheduler = CountingScheduler::default();
        let mut simulator = RoutePositionSimulator::new(Arc::new(scheduler.clone()));

        simulator.stop();
        simulator.stop();

        assert_eq!(simulator.state(), SimulationState::Idle);
        assert_eq!(scheduler.cancelled(), 0);
    }

    #[test]
    fn test_stop_then_drop() {
        let scheduler = CountingScheduler::default();
        let mut simulator = RoutePositionSimulator::new(Arc::new(scheduler.clone()));

        simulator
            .start(
                Arc::new(three_leg_route()),
                Duration::from_secs(5),
                StdRng::seed_from_u64(1),
                |_| {},
            )
            .unwrap();
        simulator.stop();
        assert_eq!(simulator.state(), SimulationState::Idle);

        drop(simulator);
        assert_eq!(scheduler.cancelled(), 1);
    }

    #[test]
    fn test_simulator_drop_cancels() {
        let scheduler = CountingScheduler::default();
        let mut simulator = RoutePositionSimulator::new(Arc::new(scheduler.clone()));

        simulator
            .start(
                Arc::new(three_leg_route()),
                Duration::from_secs(5),
                StdRng::seed_from_u64(1),
                |_| {},
            )
            .unwrap();
        drop(simulator);

        assert_eq!(scheduler.active(), 0);
    }

    #[test]
    fn test_failed_restart_keeps_running_cycle() {
        let scheduler = CountingScheduler::default();
        let mut simulator = RoutePositionSimulator::new(Arc::new(scheduler.clone()));
        let route = Arc::new(three_leg_route());

        simulator
            .start(Arc::clone(&route), Duration::from_secs(5), StdRng::seed_from_u64(1), |_| {})
            .unwrap();
        let result = simulator.start(route, Duration::ZERO, StdRng::seed_from_u64(2), |_| {});

        assert_eq!(result, Err(SimulationError::ZeroInterval));
        assert_eq!(simulator.state(), SimulationState::Running);
        assert_eq!(scheduler.active(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_simulation_updates_every_interval() {
        let (seen, on_update) = recorder();
        let mut simulator = RoutePositionSimulator::new(Arc::new(TokioScheduler::current()));

        simulator
            .start(
                Arc::new(three_leg_route()),
                Duration::from_secs(5),
                StdRng::seed_from_u64(9),
                on_update,
            )
            .unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(seen.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_secs(15)).await;
        assert_eq!(seen.lock().unwrap().len(), 3);

        simulator.stop();
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(seen.lock().unwrap().len(), 3);
    }
}
