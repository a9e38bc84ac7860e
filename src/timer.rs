use std::time::Duration;
use crate::host::{Scheduler, TimerHandle};

struct ArmedTimer {
    handle: TimerHandle,
    interval: Duration,
    elapsed: Duration,
}

/// Repeating timers driven by the frame loop instead of the OS clock.
#[derive(Default)]
pub struct FrameScheduler {
    next_id: u64,
    timers: Vec<ArmedTimer>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances every armed timer by `dt` and returns the handles that fired,
    /// once per whole interval elapsed.
    pub fn advance(&mut self, dt: Duration) -> Vec<TimerHandle> {
        let mut fired = Vec::new();
        for timer in self.timers.iter_mut() {
            timer.elapsed += dt;
            while timer.elapsed >= timer.interval {
                timer.elapsed -= timer.interval;
                fired.push(timer.handle);
            }
        }
        fired
    }

    pub fn active_count(&self) -> usize {
        self.timers.len()
    }

    pub fn is_armed(&self, handle: TimerHandle) -> bool {
        self.timers.iter().any(|t| t.handle == handle)
    }
}

impl Scheduler for FrameScheduler {
    fn arm(&mut self, interval: Duration) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        // A zero interval would never leave the while loop in advance()
        let interval = interval.max(Duration::from_millis(1));
        self.timers.push(ArmedTimer { handle, interval, elapsed: Duration::ZERO });
        handle
    }

    fn clear(&mut self, handle: TimerHandle) {
        self.timers.retain(|t| t.handle != handle);
    }
}
