use std::time::Duration;
use anyhow::Result;
use clap::Parser;
use raylib::prelude::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod constants;
mod controller;
mod host;
mod slide;
mod slide_loader;
mod state;
mod timer;

use crate::config::{Args, BarConfig};
use crate::constants::*;
use crate::controller::SlideshowController;
use crate::host::PolledSignals;
use crate::slide::SlideTrack;
use crate::timer::FrameScheduler;

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "announcement_bar=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = BarConfig::resolve(Args::parse())?;
    info!(
        slides = config.slides.len(),
        autoplay = ?config.autoplay,
        "Starting announcement bar"
    );

    let (mut rl, thread) = raylib::init()
        .size(config.width, config.height)
        .title("Announcement Bar")
        .vsync()
        .resizable()
        .build();
    rl.set_target_fps(FPS);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);

    // --- Controller ---
    let track = SlideTrack::new(config.slides);
    let mut controller = SlideshowController::new(
        track.len(),
        config.autoplay,
        FrameScheduler::new(),
        PolledSignals::default(),
        track,
    );
    controller.attach();

    // --- Main Loop ---
    while !rl.window_should_close() {
        let dt = rl.get_frame_time();
        let bounds = Rectangle::new(
            0.0,
            0.0,
            rl.get_screen_width() as f32,
            rl.get_screen_height() as f32,
        );

        // 1. Sample hover / visibility and dispatch whatever changed
        controller.sync_signals(PolledSignals {
            hovered: rl.is_cursor_on_screen()
                && bounds.check_collision_point_rec(rl.get_mouse_position()),
            hidden: rl.is_window_minimized() || rl.is_window_hidden(),
        });

        // 2. Keyboard navigation
        if rl.is_key_pressed(KeyboardKey::KEY_RIGHT) {
            controller.advance(1);
        }
        if rl.is_key_pressed(KeyboardKey::KEY_LEFT) {
            controller.advance(-1);
        }
        if rl.is_key_pressed(KeyboardKey::KEY_SPACE) {
            if controller.is_explicitly_paused() {
                controller.resume();
            } else {
                controller.pause();
            }
        }

        // 3. Fire autoplay timers
        let fired = controller.scheduler_mut().advance(Duration::from_secs_f32(dt));
        for handle in fired {
            controller.on_tick(handle);
        }

        // 4. Animate and draw
        controller.renderer_mut().update(dt);

        let mut d = rl.begin_drawing(&thread);
        d.clear_background(Color::BLACK);
        controller.renderer().draw(&mut d, bounds);

        if controller.is_explicitly_paused() {
            let marker_y = bounds.height as i32 - MARKER_FONT_SIZE - 4;
            d.draw_text("paused", 8, marker_y, MARKER_FONT_SIZE, Color::GRAY);
        }
    }

    controller.detach();
    info!("Announcement bar closed");
    Ok(())
}
