pub const BAR_WIDTH: i32 = 1280;              // Default window / bar width
pub const BAR_HEIGHT: i32 = 48;               // Default window / bar height
pub const FPS: u32 = 60;                      // Frames per second
pub const FRAME_TIME: f32 = 1.0 / FPS as f32; // Time per frame (seconds)

pub const SLIDE_DURATION: f32 = 0.5;          // Duration of the horizontal slide animation (seconds)
pub const FONT_SIZE: i32 = 20;                // Announcement text size
pub const MARKER_FONT_SIZE: i32 = 10;         // "paused" marker text size

pub const DEFAULT_ANNOUNCEMENT: &str = "Welcome to our store";
