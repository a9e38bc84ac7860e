use std::time::Duration;

/// Identifies one armed repeating timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub u64);

/// Repeating timer primitive supplied by the host.
pub trait Scheduler {
    fn arm(&mut self, interval: Duration) -> TimerHandle;
    fn clear(&mut self, handle: TimerHandle);
}

/// Hover and page-visibility queries, answered at the moment they are asked.
pub trait Environment {
    fn is_hovered(&self) -> bool;
    fn is_hidden(&self) -> bool;
}

/// Applies the positional transform and hidden marking for the active slide.
pub trait Renderer {
    fn reconcile(&mut self, index: usize, count: usize);
}

/// Signals sampled once per frame by the main loop.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PolledSignals {
    pub hovered: bool,
    pub hidden: bool,
}

impl Environment for PolledSignals {
    fn is_hovered(&self) -> bool {
        self.hovered
    }

    fn is_hidden(&self) -> bool {
        self.hidden
    }
}
