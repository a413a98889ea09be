//! Danmaku Sim headless runner
//!
//! Usage: `danmaku-sim [scenario.json] [frames]`
//!
//! Loads a scenario (or the built-in demo), steps it at the fixed simulation
//! rate and logs live bullet counts once per simulated second.

use danmaku_sim::consts::{FPS, SCREEN_BOUNDS};
use danmaku_sim::renderer::{Drawable, InstanceBatch, RenderStates};
use danmaku_sim::{Hitbox, Pattern, Settings};

const DEFAULT_FRAMES: u32 = 60 * 30;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load(path),
        None => {
            log::info!("No scenario given, running the demo");
            Settings::default()
        }
    };
    let frames = match args.next().map(|s| s.parse::<u32>()) {
        Some(Ok(frames)) => frames,
        Some(Err(e)) => {
            log::warn!("Invalid frame count ({e}); running {DEFAULT_FRAMES} frames");
            DEFAULT_FRAMES
        }
        None => DEFAULT_FRAMES,
    };

    let mut manager = settings.build_manager();
    // Stationary player near the bottom of the playfield
    let player_offset = glam::Vec2::new(0.0, SCREEN_BOUNDS.height * 0.35);
    let player = Hitbox::player(SCREEN_BOUNDS.center() + player_offset);
    let mut batch = InstanceBatch::with_capacity(4096);
    let mut hits = 0u32;
    let mut peak = 0usize;
    let seconds_per_log = FPS as u32;

    for frame in 1..=frames {
        manager.update();
        peak = peak.max(manager.bullet_count());

        if frame % seconds_per_log == 0 {
            if manager.check_player_collision(&player) {
                hits += 1;
            }
            batch.clear();
            manager.draw(&mut batch, &RenderStates::default());
            let per_pattern: Vec<String> = manager
                .patterns()
                .map(|p| format!("{}={}", p.name(), p.bullets().len()))
                .collect();
            log::info!(
                "t={:>3}s bullets={} drawn={} ({} bytes) [{}]",
                frame / seconds_per_log,
                manager.bullet_count(),
                batch.len(),
                batch.as_bytes().len(),
                per_pattern.join(" ")
            );
        }
    }

    log::info!(
        "Ran {} frames: peak {} bullets, player hit on {} of {} checks",
        frames,
        peak,
        hits,
        frames / seconds_per_log
    );
}
