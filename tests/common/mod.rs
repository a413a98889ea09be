//! Shared helpers for integration tests.
//!
//! Patterns come from the demo scenario so every concrete choreography is
//! covered with realistic parameters.

#![allow(dead_code)]

use danmaku_sim::consts::SCREEN_BOUNDS;
use danmaku_sim::{Pattern, Settings};
use glam::Vec2;

/// One fresh instance of every pattern in the demo scenario, all on `seed`
pub fn all_patterns(seed: u64) -> Vec<Box<dyn Pattern>> {
    Settings::default()
        .patterns
        .iter()
        .map(|spec| spec.build(spec.params().to_pattern_params(SCREEN_BOUNDS, seed)))
        .collect()
}

/// Bullet state that must replay exactly under the same seed
pub fn snapshot(pattern: &dyn Pattern) -> Vec<(Vec2, Vec2)> {
    pattern
        .bullets()
        .iter()
        .map(|b| (b.position(), b.velocity()))
        .collect()
}

pub fn run(pattern: &mut dyn Pattern, frames: u32) {
    for _ in 0..frames {
        pattern.step();
    }
}
