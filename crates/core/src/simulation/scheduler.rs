use std::fmt;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::time::{self, Instant, MissedTickBehavior};

pub type Tick = Box<dyn FnMut() + Send + 'static>;

/// Runs a callback on a fixed period until the returned handle is cancelled.
pub trait Scheduler: Send + Sync {
    /// The first call to `tick` happens one `period` after scheduling.
    /// Calls for one cycle never overlap.
    fn schedule_repeating(&self, period: Duration, tick: Tick) -> CycleHandle;
}

/// Ownership of one repeating cycle. Cancels on drop.
pub struct CycleHandle {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl CycleHandle {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Stop the cycle. Later calls do nothing.
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }
}

impl Drop for CycleHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for CycleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CycleHandle")
            .field("active", &self.is_active())
            .finish()
    }
}

/// Drives each cycle from its own task on a tokio runtime.
#[derive(Clone, Debug)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Scheduler on the runtime we are currently inside of.
    ///
    /// Panics outside a runtime, like [`Handle::current`].
    pub fn current() -> Self {
        Self::new(Handle::current())
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_repeating(&self, period: Duration, mut tick: Tick) -> CycleHandle {
        // interval_at rejects a zero period
        let period = period.max(Duration::from_millis(1));

        let task = self.handle.spawn(async move {
            let mut ticks = time::interval_at(Instant::now() + period, period);
            // a stalled runtime should not replay a burst of positions
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticks.tick().await;
                tick();
            }
        });

        CycleHandle::new(move || task.abort())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, Tick) {
        let count = Arc::new(AtomicUsize::new(0));
        let tick_count = Arc::clone(&count);
        let tick: Tick = Box::new(move || {
            tick_count.fetch_add(1, Ordering::SeqCst);
        });
        (count, tick)
    }

    #[test]
    fn test_cycle_handle_cancels_once() {
        let cancelled = Arc::new(AtomicUsize::new(0));
        let count = Arc::clone(&cancelled);

        let mut handle = CycleHandle::new(move || {
            count.fetch_add(1, Ordering::SeqCst);
        });
        assert!(handle.is_active());

        handle.cancel();
        handle.cancel();
        drop(handle);

        assert_eq!(cancelled.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cycle_handle_cancels_on_drop() {
        let cancelled = Arc::new(AtomicUsize::new(0));
        let count = Arc::clone(&cancelled);

        drop(CycleHandle::new(move || {
            count.fetch_add(1, Ordering::SeqCst);
        }));

        assert_eq!(cancelled.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_first_tick_after_period() {
        let (count, tick) = counter();
        let _cycle = TokioScheduler::current().schedule_repeating(Duration::from_secs(5), tick);

        time::sleep(Duration::from_millis(4_900)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        time::sleep(Duration::from_millis(200)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_cancel_stops_ticks() {
        let (count, tick) = counter();
        let mut cycle = TokioScheduler::current().schedule_repeating(Duration::from_secs(5), tick);

        time::sleep(Duration::from_millis(5_100)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        cycle.cancel();
        time::sleep(Duration::from_secs(30)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
