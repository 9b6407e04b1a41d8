//! Scheduler double that fires ticks by hand and counts cycles.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::scheduler::{CycleHandle, Scheduler, Tick};

#[derive(Default)]
struct Cycles {
    started: usize,
    cancelled: usize,
    last_period: Option<Duration>,
    live: Vec<(usize, Tick)>,
}

#[derive(Clone, Default)]
pub(crate) struct CountingScheduler {
    cycles: Arc<Mutex<Cycles>>,
}

impl CountingScheduler {
    pub fn started(&self) -> usize {
        self.cycles.lock().unwrap().started
    }

    pub fn cancelled(&self) -> usize {
        self.cycles.lock().unwrap().cancelled
    }

    pub fn active(&self) -> usize {
        self.cycles.lock().unwrap().live.len()
    }

    pub fn last_period(&self) -> Option<Duration> {
        self.cycles.lock().unwrap().last_period
    }

    /// Run one tick of every live cycle
    pub fn fire(&self) {
        let mut cycles = self.cycles.lock().unwrap();
        for (_, tick) in cycles.live.iter_mut() {
            tick();
        }
    }
}

impl Scheduler for CountingScheduler {
    fn schedule_repeating(&self, period: Duration, tick: Tick) -> CycleHandle {
        let id = {
            let mut cycles = self.cycles.lock().unwrap();
            let id = cycles.started;
            cycles.started += 1;
            cycles.last_period = Some(period);
            cycles.live.push((id, tick));
            id
        };

        let cycles = Arc::clone(&self.cycles);
        CycleHandle::new(move || {
            let mut cycles = cycles.lock().unwrap();
            cycles.cancelled += 1;
            cycles.live.retain(|(live_id, _)| *live_id != id);
        })
    }
}
