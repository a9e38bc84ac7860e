use std::time::Duration;
use tracing::{debug, trace};
use crate::host::{Environment, PolledSignals, Renderer, Scheduler, TimerHandle};
use crate::state::PlaybackState;

/// Wraps a raw slide counter into `[0, count)`. `None` when there are no slides.
pub fn normalize_index(current: i64, count: usize) -> Option<usize> {
    let count = i64::try_from(count).ok().filter(|c| *c > 0)?;
    usize::try_from(current.rem_euclid(count)).ok()
}

/// Drives the current slide and the autoplay timer of one announcement bar.
///
/// Three independent causes can keep the timer from running: an explicit
/// (sticky) pause, the pointer hovering the bar, and the page being hidden.
/// Only an explicit `start`/`resume` clears the first one; the other two clear
/// themselves, and the timer is re-armed only once neither of them holds.
pub struct SlideshowController<S, E, R> {
    scheduler: S,
    environment: E,
    renderer: R,

    slide_count: usize,
    current: i64,

    autoplay: Option<Duration>,
    timer: Option<TimerHandle>,
    state: PlaybackState,
}

impl<S: Scheduler, E: Environment, R: Renderer> SlideshowController<S, E, R> {
    pub fn new(
        slide_count: usize,
        autoplay: Option<Duration>,
        scheduler: S,
        environment: E,
        renderer: R,
    ) -> Self {
        Self {
            scheduler,
            environment,
            renderer,
            slide_count,
            current: 0,
            autoplay: autoplay.filter(|interval| !interval.is_zero()),
            timer: None,
            state: PlaybackState::Idle,
        }
    }

    /// Shows the initial slide and starts autoplay when it is configured.
    pub fn attach(&mut self) {
        if self.state == PlaybackState::Detached {
            return;
        }
        self.render();
        self.start(None);
    }

    /// Releases the timer. Every later call is ignored.
    pub fn detach(&mut self) {
        self.clear_timer();
        if self.state != PlaybackState::Detached {
            debug!(index = ?self.index(), "detached");
        }
        self.state = PlaybackState::Detached;
    }

    pub fn advance(&mut self, delta: i64) {
        if self.state == PlaybackState::Detached {
            return;
        }
        self.current = self.current.wrapping_add(delta);
        self.render();
    }

    pub fn start(&mut self, interval: Option<Duration>) {
        let Some(default_interval) = self.autoplay else {
            return;
        };
        if self.state == PlaybackState::Detached {
            return;
        }

        let interval = interval
            .filter(|interval| !interval.is_zero())
            .unwrap_or(default_interval);
        self.arm(interval);
        self.state = PlaybackState::Running;
        debug!(?interval, index = ?self.index(), "autoplay started");
    }

    /// Clears the timer without touching the sticky pause.
    pub fn stop(&mut self) {
        self.clear_timer();
        if self.state == PlaybackState::Running {
            self.state = PlaybackState::Idle;
            debug!(index = ?self.index(), "autoplay stopped");
        }
    }

    pub fn pause(&mut self) {
        if self.state == PlaybackState::Detached {
            return;
        }
        self.clear_timer();
        self.state = PlaybackState::Paused;
        debug!(index = ?self.index(), "autoplay paused");
    }

    /// Explicit resume: clears the sticky pause and restarts autoplay.
    pub fn resume(&mut self) {
        if !self.is_autoplay_enabled() {
            return;
        }
        self.start(None);
    }

    /// Resume triggered by a transient cause ending (pointer left, page visible).
    ///
    /// Never overrides the sticky pause, and re-checks hover and visibility
    /// now rather than trusting the event that triggered it.
    pub fn resume_transient(&mut self) {
        if !self.is_autoplay_enabled() || self.is_explicitly_paused() {
            return;
        }
        if self.state == PlaybackState::Detached {
            return;
        }

        let hover = self.environment.is_hovered();
        let hidden = self.environment.is_hidden();
        if hover || hidden {
            self.suspend(hover, hidden);
        } else if self.state != PlaybackState::Running || self.timer.is_none() {
            self.start(None);
        }
    }

    pub fn on_tick(&mut self, handle: TimerHandle) {
        if self.timer != Some(handle) {
            trace!(?handle, "tick from a cleared timer ignored");
            return;
        }
        if self.environment.is_hovered() || self.environment.is_hidden() {
            trace!(index = ?self.index(), "tick skipped");
            return;
        }
        self.advance(1);
    }

    pub fn on_pointer_enter(&mut self) {
        if !self.is_autoplay_enabled() || self.is_explicitly_paused() {
            return;
        }
        if self.state == PlaybackState::Detached {
            return;
        }
        let hidden = self.environment.is_hidden();
        self.suspend(true, hidden);
    }

    pub fn on_pointer_leave(&mut self) {
        self.resume_transient();
    }

    /// Hidden suspends, visible resumes; both go through the same re-check.
    pub fn on_visibility_change(&mut self) {
        self.resume_transient();
    }

    pub fn is_autoplay_enabled(&self) -> bool {
        self.autoplay.is_some()
    }

    pub fn is_explicitly_paused(&self) -> bool {
        self.state.is_paused()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn has_active_timer(&self) -> bool {
        self.timer.is_some()
    }

    /// Raw counter, not wrapped.
    pub fn current(&self) -> i64 {
        self.current
    }

    pub fn index(&self) -> Option<usize> {
        normalize_index(self.current, self.slide_count)
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn environment(&self) -> &E {
        &self.environment
    }

    pub fn environment_mut(&mut self) -> &mut E {
        &mut self.environment
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    // Every path that arms a timer goes through here
    fn arm(&mut self, interval: Duration) {
        self.clear_timer();
        self.timer = Some(self.scheduler.arm(interval));
    }

    fn clear_timer(&mut self) {
        if let Some(handle) = self.timer.take() {
            self.scheduler.clear(handle);
        }
    }

    fn suspend(&mut self, hover: bool, hidden: bool) {
        self.clear_timer();
        let suspended = PlaybackState::Suspended { hover, hidden };
        if self.state != suspended {
            debug!(hover, hidden, index = ?self.index(), "autoplay suspended");
        }
        self.state = suspended;
    }

    fn render(&mut self) {
        if let Some(index) = self.index() {
            self.renderer.reconcile(index, self.slide_count);
        }
    }
}

impl<S: Scheduler, R: Renderer> SlideshowController<S, PolledSignals, R> {
    /// Stores this frame's signals and dispatches an event for each one that changed.
    pub fn sync_signals(&mut self, signals: PolledSignals) {
        let previous = self.environment;
        self.environment = signals;

        if signals.hovered != previous.hovered {
            if signals.hovered {
                self.on_pointer_enter();
            } else {
                self.on_pointer_leave();
            }
        }
        if signals.hidden != previous.hidden {
            self.on_visibility_change();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_autoplay;
    use crate::slide::SlideTrack;
    use crate::timer::FrameScheduler;
    use proptest::prelude::*;

    type TestController = SlideshowController<FrameScheduler, PolledSignals, SlideTrack>;

    fn controller(slides: usize, autoplay: Option<&str>) -> TestController {
        let track = SlideTrack::new((0..slides).map(|i| format!("Announcement {i}")).collect());
        let mut controller = SlideshowController::new(
            slides,
            parse_autoplay(autoplay),
            FrameScheduler::new(),
            PolledSignals::default(),
            track,
        );
        controller.attach();
        controller
    }

    // Advances the frame clock one second at a time, dispatching every fire.
    fn run_secs(controller: &mut TestController, secs: u64) {
        for _ in 0..secs {
            let fired = controller.scheduler_mut().advance(Duration::from_secs(1));
            for handle in fired {
                controller.on_tick(handle);
            }
        }
    }

    fn visible_slides(controller: &TestController) -> Vec<usize> {
        controller
            .renderer()
            .slides()
            .iter()
            .enumerate()
            .filter(|(_, slide)| !slide.hidden)
            .map(|(i, _)| i)
            .collect()
    }

    fn hover(controller: &mut TestController, hovered: bool) {
        let hidden = controller.environment().hidden;
        controller.sync_signals(PolledSignals { hovered, hidden });
    }

    fn hide(controller: &mut TestController, hidden: bool) {
        let hovered = controller.environment().hovered;
        controller.sync_signals(PolledSignals { hovered, hidden });
    }

    proptest! {
        #[test]
        fn normalize_matches_euclidean_modulo(n in any::<i64>(), count in 1usize..1000) {
            let index = normalize_index(n, count).unwrap();
            prop_assert!(index < count);
            prop_assert_eq!(index as i64, n.rem_euclid(count as i64));
            prop_assert_eq!(normalize_index(index as i64, count), Some(index));
        }
    }

    #[test]
    fn normalize_without_slides_is_none() {
        assert_eq!(normalize_index(5, 0), None);
        assert_eq!(normalize_index(-1, 3), Some(2));
        assert_eq!(normalize_index(-4, 3), Some(2));
    }

    #[test]
    fn autoplay_cycles_through_slides() {
        let mut bar = controller(3, Some("2"));
        assert_eq!(bar.state(), PlaybackState::Running);
        assert_eq!(bar.index(), Some(0));
        assert_eq!(visible_slides(&bar), vec![0]);

        let mut sequence = vec![bar.index().unwrap()];
        for _ in 0..3 {
            run_secs(&mut bar, 2);
            sequence.push(bar.index().unwrap());
            assert_eq!(visible_slides(&bar), vec![bar.index().unwrap()]);
        }
        assert_eq!(sequence, vec![0, 1, 2, 0]);
    }

    #[test]
    fn start_twice_keeps_one_timer() {
        let mut bar = controller(3, Some("1"));
        bar.start(None);
        bar.start(None);

        assert_eq!(bar.scheduler_mut().active_count(), 1);
        run_secs(&mut bar, 1);
        assert_eq!(bar.index(), Some(1));
    }

    #[test]
    fn start_with_override_uses_that_interval() {
        let mut bar = controller(4, Some("10"));
        bar.start(Some(Duration::from_secs(1)));

        run_secs(&mut bar, 2);
        assert_eq!(bar.index(), Some(2));
        assert_eq!(bar.scheduler_mut().active_count(), 1);
    }

    #[test]
    fn hover_suspends_and_leave_resumes_from_same_index() {
        let mut bar = controller(3, Some("2"));
        run_secs(&mut bar, 2);
        assert_eq!(bar.index(), Some(1));

        hover(&mut bar, true);
        assert!(!bar.has_active_timer());
        assert_eq!(bar.state(), PlaybackState::Suspended { hover: true, hidden: false });

        run_secs(&mut bar, 5);
        assert_eq!(bar.index(), Some(1));

        hover(&mut bar, false);
        assert_eq!(bar.state(), PlaybackState::Running);
        assert!(bar.has_active_timer());
        run_secs(&mut bar, 2);
        assert_eq!(bar.index(), Some(2));
    }

    #[test]
    fn pause_survives_hover_and_visibility() {
        let mut bar = controller(3, Some("1"));
        bar.pause();
        assert!(bar.is_explicitly_paused());

        hover(&mut bar, true);
        hover(&mut bar, false);
        hide(&mut bar, true);
        hide(&mut bar, false);

        assert_eq!(bar.state(), PlaybackState::Paused);
        assert!(!bar.has_active_timer());
        assert_eq!(bar.scheduler_mut().active_count(), 0);
        run_secs(&mut bar, 5);
        assert_eq!(bar.index(), Some(0));

        bar.resume();
        assert!(!bar.is_explicitly_paused());
        run_secs(&mut bar, 1);
        assert_eq!(bar.index(), Some(1));
    }

    #[test]
    fn transient_resume_leaves_pause_alone() {
        let mut bar = controller(3, Some("1"));
        bar.pause();
        bar.resume_transient();

        assert!(bar.is_explicitly_paused());
        assert!(!bar.has_active_timer());
    }

    #[test]
    fn leaving_hover_while_hidden_keeps_timer_cleared() {
        let mut bar = controller(3, Some("1"));
        hover(&mut bar, true);
        hide(&mut bar, true);
        hover(&mut bar, false);

        assert!(!bar.has_active_timer());
        assert_eq!(bar.state(), PlaybackState::Suspended { hover: false, hidden: true });
        run_secs(&mut bar, 3);
        assert_eq!(bar.index(), Some(0));

        hide(&mut bar, false);
        assert!(bar.has_active_timer());
        run_secs(&mut bar, 1);
        assert_eq!(bar.index(), Some(1));
    }

    #[test]
    fn visible_while_still_hovered_keeps_timer_cleared() {
        let mut bar = controller(3, Some("1"));
        hide(&mut bar, true);
        hover(&mut bar, true);
        hide(&mut bar, false);

        assert!(!bar.has_active_timer());
        assert_eq!(bar.state(), PlaybackState::Suspended { hover: true, hidden: false });

        hover(&mut bar, false);
        assert_eq!(bar.state(), PlaybackState::Running);
    }

    #[test]
    fn ticks_are_skipped_while_hovered() {
        let mut bar = controller(3, Some("1"));
        // Explicit start while the pointer is over the bar keeps the timer armed
        bar.environment_mut().hovered = true;
        bar.start(None);

        run_secs(&mut bar, 3);
        assert_eq!(bar.index(), Some(0));
        assert!(bar.has_active_timer());

        bar.environment_mut().hovered = false;
        run_secs(&mut bar, 1);
        assert_eq!(bar.index(), Some(1));
    }

    #[test]
    fn stale_tick_is_ignored() {
        let mut bar = controller(3, Some("1"));
        let stale = bar.scheduler_mut().arm(Duration::from_secs(1));
        bar.on_tick(stale);
        assert_eq!(bar.index(), Some(0));
    }

    #[test]
    fn stop_keeps_pause_flag_untouched() {
        let mut bar = controller(3, Some("1"));
        bar.stop();
        assert_eq!(bar.state(), PlaybackState::Idle);
        assert!(!bar.is_explicitly_paused());
        assert!(!bar.has_active_timer());

        bar.pause();
        bar.stop();
        assert!(bar.is_explicitly_paused());
    }

    #[test]
    fn missing_or_invalid_autoplay_disables_start() {
        for attribute in [None, Some("soon"), Some(""), Some("0")] {
            let mut bar = controller(3, attribute);
            assert!(!bar.is_autoplay_enabled());

            bar.start(None);
            bar.resume();
            hover(&mut bar, true);
            hover(&mut bar, false);

            assert!(!bar.has_active_timer());
            assert_eq!(bar.scheduler_mut().active_count(), 0);
            assert_eq!(bar.state(), PlaybackState::Idle);
        }
    }

    #[test]
    fn manual_advance_wraps_both_ways() {
        let mut bar = controller(3, None);
        bar.advance(-1);
        assert_eq!(bar.current(), -1);
        assert_eq!(bar.index(), Some(2));
        assert_eq!(visible_slides(&bar), vec![2]);

        bar.advance(2);
        assert_eq!(bar.index(), Some(1));
        assert_eq!(visible_slides(&bar), vec![1]);
    }

    #[test]
    fn zero_slides_accepts_index_updates() {
        let mut bar = controller(0, Some("1"));
        run_secs(&mut bar, 3);

        assert_eq!(bar.current(), 3);
        assert_eq!(bar.index(), None);
        assert!(bar.renderer().slides().is_empty());
    }

    #[test]
    fn detach_clears_timer_and_ignores_later_calls() {
        let mut bar = controller(3, Some("1"));
        bar.detach();

        assert_eq!(bar.state(), PlaybackState::Detached);
        assert_eq!(bar.scheduler_mut().active_count(), 0);

        bar.start(None);
        bar.resume();
        hover(&mut bar, true);
        hover(&mut bar, false);
        bar.advance(1);

        assert_eq!(bar.state(), PlaybackState::Detached);
        assert!(!bar.has_active_timer());
        assert_eq!(bar.index(), Some(0));
    }
}
