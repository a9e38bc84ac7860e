#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PlaybackState {
    Idle,                                    // Created, autoplay disabled, or stopped by the host
    Running,                                 // Timer armed, ticks advance the slides
    Suspended { hover: bool, hidden: bool }, // Timer cleared until both transient causes clear
    Paused,                                  // Sticky: only an explicit resume/start leaves it
    Detached,                                // Torn down, every later call is ignored
}

impl PlaybackState {
    pub fn is_paused(self) -> bool {
        self == PlaybackState::Paused
    }
}
