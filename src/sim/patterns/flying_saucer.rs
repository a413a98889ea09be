//! Flying Saucer: expanding rings that orbit four emitters while sinking
//!
//! Every shot fires one ring of talismans from each of four emitters and
//! records the whole burst as a single wave. Each wave orbits at a target
//! radius that depends only on its age:
//! - Phase 1: quadratic ease-in
//! - Phase 2: slow linear growth
//! - Phase 3: fast linear growth, with a faster descent
//!
//! The radius curve is memoized per age in a [`TargetRadiusCache`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::FPS;
use crate::palette::{self, Rgba};
use crate::sim::bullet::{BulletFlag, BulletKind};
use crate::sim::pattern::{Pattern, PatternCore, PatternParams};
use crate::sim::wave::WaveBook;

/// Talisman colors, one picked per shot
const SAUCER_COLORS: [Rgba; 8] = [
    palette::RED,
    palette::ORANGE,
    palette::YELLOW,
    palette::GREEN,
    palette::BLUE,
    palette::CYAN,
    palette::VIOLET,
    palette::MAGENTA,
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlyingSaucerConfig {
    /// Wave age (frames) where phase 2 starts
    pub phase1_checkpoint: u32,
    /// Wave age (frames) where phase 3 starts
    pub phase2_checkpoint: u32,
    /// Pixels per second
    pub start_velocity: f32,
    /// Pixels per second squared
    pub phase1_accel: f32,
    pub phase2_velocity: f32,
    pub phase3_velocity: f32,
    /// Emitter positions relative to the pattern source
    pub source_offsets: Vec<Vec2>,
    /// Pixels per frame before phase 3
    pub descent_speed: f32,
    /// Pixels per frame from phase 3 on
    pub descent_speed_late: f32,
    pub bounds_expansion: f32,
}

impl Default for FlyingSaucerConfig {
    fn default() -> Self {
        Self {
            phase1_checkpoint: 120,
            phase2_checkpoint: 300,
            start_velocity: 20.0,
            phase1_accel: 60.0,
            phase2_velocity: 35.0,
            phase3_velocity: 90.0,
            source_offsets: vec![
                Vec2::new(-180.0, 50.0),
                Vec2::new(180.0, 50.0),
                Vec2::new(100.0, -150.0),
                Vec2::new(-100.0, -150.0),
            ],
            descent_speed: 1.0,
            descent_speed_late: 1.1,
            bounds_expansion: 1.0,
        }
    }
}

/// Orbit radius for a wave of the given age.
///
/// Continuous across the checkpoints: each phase starts from the radius the
/// previous one reached.
pub fn target_radius(config: &FlyingSaucerConfig, frame: u32) -> f32 {
    let seconds = |frames: u32| frames as f32 / FPS;
    let p1 = config.phase1_checkpoint;
    let p2 = config.phase2_checkpoint.max(p1);

    let ease_in = |t: f32| t * config.start_velocity + t * t * config.phase1_accel;
    if frame < p1 {
        return ease_in(seconds(frame));
    }
    let phase1_added = ease_in(seconds(p1));
    if frame < p2 {
        return seconds(frame - p1) * config.phase2_velocity + phase1_added;
    }
    let phase2_added = seconds(p2 - p1) * config.phase2_velocity;
    seconds(frame - p2) * config.phase3_velocity + phase1_added + phase2_added
}

/// Append-only memo of [`target_radius`] indexed by wave age.
///
/// Ages only ever grow by one per frame, so the table is filled contiguously.
/// Asking for an age past the end is a bookkeeping bug.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetRadiusCache {
    radii: Vec<f32>,
}

impl Default for TargetRadiusCache {
    fn default() -> Self {
        // Age 0 is never queried by a moving wave
        Self { radii: vec![0.0] }
    }
}

impl TargetRadiusCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.radii.len()
    }

    pub fn is_empty(&self) -> bool {
        self.radii.is_empty()
    }

    /// Cached radius for `frame`, extending the table by one if needed.
    ///
    /// Returns 0.0 (no orbit) on a gap.
    pub fn get(&mut self, config: &FlyingSaucerConfig, frame: u32) -> f32 {
        let index = frame as usize;
        if let Some(&radius) = self.radii.get(index) {
            return radius;
        }
        if index != self.radii.len() {
            log::error!(
                "Target radius requested for frame {} but only {} frames are cached",
                frame,
                self.radii.len()
            );
            debug_assert!(false, "target radius cache gap at frame {frame}");
            return 0.0;
        }
        let radius = target_radius(config, frame);
        self.radii.push(radius);
        radius
    }
}

#[derive(Debug, Clone)]
pub struct FlyingSaucer {
    core: PatternCore,
    config: FlyingSaucerConfig,
    waves: WaveBook,
    radii: TargetRadiusCache,
    /// Flips which emitters spin in reverse on every shot
    alternate: bool,
}

impl FlyingSaucer {
    pub fn new(params: PatternParams, config: FlyingSaucerConfig) -> Self {
        let mut core = PatternCore::new(params);
        core.expand_bounds(config.bounds_expansion);
        Self {
            core,
            config,
            waves: WaveBook::new(),
            radii: TargetRadiusCache::new(),
            alternate: false,
        }
    }

    pub fn shot_sources(&self) -> impl Iterator<Item = Vec2> + '_ {
        let source = self.core.source;
        self.config.source_offsets.iter().map(move |offset| source + *offset)
    }

    pub fn radius_cache(&self) -> &TargetRadiusCache {
        &self.radii
    }
}

impl Pattern for FlyingSaucer {
    fn name(&self) -> &'static str {
        "flying_saucer"
    }

    fn core(&self) -> &PatternCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PatternCore {
        &mut self.core
    }

    fn spawn_bullets(&mut self) {
        if !self.core.can_shoot() {
            return;
        }
        let mut shot_angle = self.core.random_angle();
        let color = SAUCER_COLORS[self.core.random_index(SAUCER_COLORS.len())];
        let sources: Vec<Vec2> = self.shot_sources().collect();
        let center = self.core.source;
        let count = self.core.stream_count;
        let speed = self.core.base_speed;

        for (n, pos) in sources.iter().enumerate() {
            let first = self.core.bullets.len();
            for i in 0..count {
                let angle = shot_angle + i as f32 * 360.0 / count as f32;
                self.core.spawn(BulletKind::Talisman, *pos, speed, angle).color = color;
            }
            // Diagonal emitters pair up; `alternate` swaps which pair reverses
            let reverse = ((pos.x > center.x) ^ (pos.y > center.y)) != self.alternate;
            if reverse {
                for bullet in &mut self.core.bullets[first..] {
                    bullet.set_flag(BulletFlag::ReverseRotation);
                }
            }
            if n + 1 == sources.len() / 2 {
                shot_angle = self.core.random_angle();
            }
        }

        self.waves
            .add_wave(sources.len() * count as usize, self.core.bullets.len());
        self.alternate = !self.alternate;
    }

    fn process_movement(&mut self) {
        self.waves.increment_wave_frames();
        let speed = self.core.base_speed;
        for (range, age) in self.waves.spans() {
            let radius = self.radii.get(&self.config, age);
            let descent = if age < self.config.phase2_checkpoint {
                self.config.descent_speed
            } else {
                self.config.descent_speed_late
            };
            for bullet in &mut self.core.bullets[range] {
                bullet.process_movement();
                let arc_speed = if bullet.flag() == BulletFlag::Neutral { speed } else { -speed };
                bullet.rotate_arc(radius, arc_speed);
                bullet.adjust_position(Vec2::new(0.0, descent));
            }
        }
    }

    fn delete_out_of_bounds_bullets(&mut self) {
        self.waves.delete_out_of_bounds_bullets(&mut self.core, |_| false);
    }

    fn delete_all_bullets(&mut self) {
        self.core.delete_all_bullets();
        self.waves.clear();
    }

    fn reset_pattern(&mut self) {
        self.core.reset();
        self.alternate = false;
    }

    fn waves(&self) -> Option<&WaveBook> {
        Some(&self.waves)
    }

    /// Saucers stay on screen while paused
    fn draws_when_inactive(&self) -> bool {
        true
    }
}
