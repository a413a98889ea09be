//! Pattern abstraction
//!
//! A pattern owns its bullets, a frame counter and a shot-timing policy.
//! Concrete choreographies implement [`Pattern`] and keep their shared state
//! in a [`PatternCore`]; the manager only ever talks to the trait.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bounds::Bounds;
use super::bullet::{Bullet, BulletKind, Laser};
use super::wave::WaveBook;
use crate::consts::{DEFAULT_BOUNDS_EXPANSION, FPS, SCREEN_BOUNDS};

/// Constructor-time values shared by every pattern
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatternParams {
    /// Origin of generation
    pub source: Vec2,
    /// Bullets per shot
    pub stream_count: u32,
    /// Shots per second; 0 fires exactly once
    pub shot_frequency: f32,
    pub base_speed: f32,
    /// Visible playfield the active region is derived from
    pub playfield: Bounds,
    pub seed: u64,
}

impl PatternParams {
    pub fn new(source: Vec2, stream_count: u32, shot_frequency: f32, base_speed: f32) -> Self {
        Self {
            source,
            stream_count,
            shot_frequency,
            base_speed,
            playfield: SCREEN_BOUNDS,
            seed: 0,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_playfield(mut self, playfield: Bounds) -> Self {
        self.playfield = playfield;
        self
    }
}

/// Frames between shots for a frequency, or `None` if it never fires
pub fn frames_per_shot(frequency: f32) -> Option<u32> {
    if frequency <= 0.0 || !frequency.is_finite() {
        return None;
    }
    Some(((FPS / frequency).floor() as u32).max(1))
}

/// State shared by every pattern
#[derive(Debug, Clone)]
pub struct PatternCore {
    pub source: Vec2,
    pub stream_count: u32,
    pub shot_frequency: f32,
    pub base_speed: f32,
    playfield: Bounds,
    /// Active region; bullets outside are culled
    bounds: Bounds,
    /// Owned bullets. Spawners, when a pattern uses them, sit at the front.
    pub bullets: Vec<Bullet>,
    frame: u32,
    active: bool,
    /// One-shot latch for frequency 0
    fired_once: bool,
    seed: u64,
    rng: Pcg32,
    warned_frequency: bool,
}

impl PatternCore {
    pub fn new(params: PatternParams) -> Self {
        let shot_frequency = params.shot_frequency.clamp(0.0, FPS);
        if shot_frequency != params.shot_frequency {
            log::warn!(
                "Shot frequency {} clamped to {}",
                params.shot_frequency,
                shot_frequency
            );
        }
        let mut core = Self {
            source: params.source,
            stream_count: params.stream_count,
            shot_frequency,
            base_speed: params.base_speed,
            playfield: params.playfield,
            bounds: params.playfield,
            bullets: Vec::new(),
            frame: 0,
            active: true,
            fired_once: false,
            seed: params.seed,
            rng: Pcg32::seed_from_u64(params.seed),
            warned_frequency: false,
        };
        core.expand_bounds(DEFAULT_BOUNDS_EXPANSION);
        core
    }

    #[inline]
    pub fn frame(&self) -> u32 {
        self.frame
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    #[inline]
    pub fn playfield(&self) -> Bounds {
        self.playfield
    }

    /// Adds playfield width/height * factor to each side of the active region
    pub fn expand_bounds(&mut self, factor: f32) {
        let playfield = self.playfield;
        self.bounds.expand(factor, &playfield);
    }

    #[inline]
    pub fn is_out_of_bounds(&self, bullet: &Bullet) -> bool {
        !self.bounds.contains(bullet.position())
    }

    #[inline]
    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn increment_frame(&mut self) {
        if self.active {
            self.frame += 1;
        }
    }

    /// Default timing: `shot_frequency` shots per second, or once if it is 0
    pub fn can_shoot(&mut self) -> bool {
        if self.shot_frequency == 0.0 {
            if self.fired_once {
                return false;
            }
            self.fired_once = true;
            return true;
        }
        self.can_shoot_at(self.shot_frequency)
    }

    /// Timing for a secondary stream with its own frequency
    pub fn can_shoot_at(&mut self, frequency: f32) -> bool {
        match frames_per_shot(frequency) {
            Some(interval) => self.can_shoot_every(interval),
            None => {
                if !self.warned_frequency {
                    log::warn!("Non-positive shot frequency {frequency}; stream never fires");
                    self.warned_frequency = true;
                }
                false
            }
        }
    }

    /// True on frames that are multiples of `interval`
    #[inline]
    pub fn can_shoot_every(&self, interval: u32) -> bool {
        interval > 0 && self.frame % interval == 0
    }

    /// Straight-line step for every bullet
    pub fn advance_bullets(&mut self) {
        for bullet in &mut self.bullets {
            bullet.process_movement();
        }
    }

    /// Remove bullets that left the active region, preserving order
    pub fn delete_out_of_bounds_bullets(&mut self) {
        let bounds = self.bounds;
        self.bullets.retain(|b| bounds.contains(b.position()));
    }

    pub fn delete_all_bullets(&mut self) {
        self.bullets.clear();
    }

    /// Rewind timing and randomness; bullets stay but restart their animation
    pub fn reset(&mut self) {
        self.frame = 0;
        self.fired_once = false;
        self.rng = Pcg32::seed_from_u64(self.seed);
        for bullet in &mut self.bullets {
            bullet.reset_bullet();
        }
    }

    // === Random helpers ===

    /// Whole-degree angle in [0, 360)
    pub fn random_angle(&mut self) -> f32 {
        self.rng.random_range(0..360) as f32
    }

    pub fn random_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.rng.random_range(0..len)
    }

    pub fn coin_flip(&mut self) -> bool {
        self.rng.random_bool(0.5)
    }

    /// Source position jittered by up to half the variance on each axis
    pub fn random_position(&mut self, variance_x: u32, variance_y: u32) -> Vec2 {
        let dx = self.jitter(variance_x);
        let dy = self.jitter(variance_y);
        self.source + Vec2::new(dx, dy)
    }

    fn jitter(&mut self, variance: u32) -> f32 {
        if variance == 0 {
            return 0.0;
        }
        self.rng.random_range(0..variance) as f32 - (variance / 2) as f32
    }

    // === Generation helpers ===

    pub fn add_bullet(&mut self, bullet: Bullet) {
        self.bullets.push(bullet);
    }

    /// Append a bullet of `kind` with default look; returns it for tweaking
    pub fn spawn(
        &mut self,
        kind: BulletKind,
        position: Vec2,
        speed: f32,
        angle_degrees: f32,
    ) -> &mut Bullet {
        self.bullets.push(Bullet::new(kind, position, speed, angle_degrees));
        let last = self.bullets.len() - 1;
        &mut self.bullets[last]
    }

    pub fn add_laser(&mut self, position: Vec2, angle_degrees: f32, laser: Laser) -> &mut Bullet {
        self.spawn(BulletKind::Laser(laser), position, 0.0, angle_degrees)
    }

    /// Spawners always go to the front so "first N bullets" finds them
    pub fn add_spawner(&mut self, position: Vec2, speed: f32, angle_degrees: f32, visible: bool) {
        let spawner = Bullet::new(BulletKind::Spawner { visible }, position, speed, angle_degrees);
        self.bullets.insert(0, spawner);
    }
}

/// A bullet choreography driven once per frame by the manager
pub trait Pattern {
    fn name(&self) -> &'static str;

    fn core(&self) -> &PatternCore;

    fn core_mut(&mut self) -> &mut PatternCore;

    /// Create new bullets if the timing rule says so. Default does nothing.
    fn spawn_bullets(&mut self) {}

    /// Advance every bullet one step. Default is straight-line motion.
    fn process_movement(&mut self) {
        self.core_mut().advance_bullets();
    }

    fn delete_out_of_bounds_bullets(&mut self) {
        self.core_mut().delete_out_of_bounds_bullets();
    }

    fn increment_frame(&mut self) {
        self.core_mut().increment_frame();
    }

    /// Rewind the pattern to frame 0 without necessarily removing bullets
    fn reset_pattern(&mut self) {
        self.core_mut().reset();
    }

    fn delete_all_bullets(&mut self) {
        self.core_mut().delete_all_bullets();
    }

    /// Wave ledger, for patterns that segment their bullets
    fn waves(&self) -> Option<&WaveBook> {
        None
    }

    /// Whether bullets stay drawn while the pattern is paused
    fn draws_when_inactive(&self) -> bool {
        false
    }

    fn bullets(&self) -> &[Bullet] {
        self.core().bullets()
    }

    fn is_active(&self) -> bool {
        self.core().is_active()
    }

    fn set_active(&mut self, active: bool) {
        self.core_mut().set_active(active);
    }

    /// One frame: cull, spawn, advance the frame counter, then move.
    ///
    /// Spawning sees last frame's positions and new bullets take this frame's
    /// motion step before they can be culled.
    fn step(&mut self) {
        if !self.is_active() {
            return;
        }
        self.delete_out_of_bounds_bullets();
        self.spawn_bullets();
        self.increment_frame();
        self.process_movement();
    }
}

/// Pattern without a generation rule; bullets are added by direct calls.
///
/// Used as the persistent test pattern at manager index 0.
#[derive(Debug, Clone)]
pub struct ManualPattern {
    core: PatternCore,
}

impl ManualPattern {
    pub fn new(params: PatternParams) -> Self {
        Self {
            core: PatternCore::new(params),
        }
    }
}

impl Pattern for ManualPattern {
    fn name(&self) -> &'static str {
        "manual"
    }

    fn core(&self) -> &PatternCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PatternCore {
        &mut self.core
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn core_with_frequency(frequency: f32) -> PatternCore {
        PatternCore::new(PatternParams::new(Vec2::new(400.0, 300.0), 1, frequency, 1.0))
    }

    #[test]
    fn test_one_shot_fires_once_until_reset() {
        let mut core = core_with_frequency(0.0);
        let fired: Vec<bool> = (0..5)
            .map(|_| {
                let shot = core.can_shoot();
                core.increment_frame();
                shot
            })
            .collect();
        assert_eq!(fired, vec![true, false, false, false, false]);

        core.reset();
        assert!(core.can_shoot());
        assert!(!core.can_shoot());
    }

    #[test]
    fn test_periodic_shots() {
        // 4 shots per second at 60 FPS -> every 15 frames
        let mut core = core_with_frequency(4.0);
        let mut shots = Vec::new();
        for _ in 0..61 {
            if core.can_shoot() {
                shots.push(core.frame());
            }
            core.increment_frame();
        }
        assert_eq!(shots, vec![0, 15, 30, 45, 60]);
    }

    #[test]
    fn test_frequency_clamped_to_fps() {
        let core = core_with_frequency(500.0);
        assert_eq!(core.shot_frequency, FPS);
        assert_eq!(frames_per_shot(core.shot_frequency), Some(1));
        assert_eq!(frames_per_shot(0.0), None);
        assert_eq!(frames_per_shot(-3.0), None);
    }

    #[test]
    fn test_frame_only_advances_while_active() {
        let mut core = core_with_frequency(1.0);
        core.increment_frame();
        core.set_active(false);
        core.increment_frame();
        assert_eq!(core.frame(), 1);
    }

    #[test]
    fn test_cull_preserves_order() {
        let mut core = core_with_frequency(1.0);
        let inside = core.playfield().center();
        let outside = Vec2::new(-10_000.0, 0.0);
        for (i, pos) in [inside, outside, outside, inside, outside].iter().enumerate() {
            core.spawn(BulletKind::Dot, *pos, i as f32, 0.0);
        }
        core.delete_out_of_bounds_bullets();
        let speeds: Vec<f32> = core.bullets().iter().map(|b| b.speed().round()).collect();
        assert_eq!(speeds, vec![0.0, 3.0]);
    }

    #[test]
    fn test_spawner_inserted_at_front() {
        let mut core = core_with_frequency(1.0);
        core.spawn(BulletKind::Circle, Vec2::ZERO, 0.0, 0.0);
        core.add_spawner(Vec2::ZERO, 1.0, 0.0, false);
        assert!(core.bullets()[0].kind.is_spawner());
        assert_eq!(core.bullets()[1].kind, BulletKind::Circle);
    }

    #[test]
    fn test_random_position_within_variance() {
        let mut core = core_with_frequency(1.0);
        for _ in 0..200 {
            let p = core.random_position(200, 100) - core.source;
            assert!(p.x >= -100.0 && p.x < 100.0);
            assert!(p.y >= -50.0 && p.y < 50.0);
        }
        assert_eq!(core.random_position(0, 0), core.source);
    }

    #[test]
    fn test_reset_replays_randomness() {
        let mut core = core_with_frequency(1.0);
        let first: Vec<f32> = (0..5).map(|_| core.random_angle()).collect();
        core.reset();
        let second: Vec<f32> = (0..5).map(|_| core.random_angle()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_add_bullet_keeps_custom_look() {
        let mut core = core_with_frequency(1.0);
        let bullet = Bullet::new(BulletKind::Bubble, Vec2::new(10.0, 10.0), 1.0, 0.0)
            .with_color(crate::palette::GREEN)
            .with_radius(20.0);
        core.add_bullet(bullet);
        let added = &core.bullets()[0];
        assert_eq!(added.color, crate::palette::GREEN);
        assert_eq!(added.radius, 20.0);
        assert_eq!(added.kind, BulletKind::Bubble);
    }

    #[test]
    fn test_manual_pattern_steps_straight() {
        let params = PatternParams::new(Vec2::new(400.0, 400.0), 0, 0.0, 0.0);
        let mut pattern = ManualPattern::new(params);
        pattern
            .core_mut()
            .spawn(BulletKind::Circle, Vec2::new(400.0, 400.0), 2.0, 0.0);
        pattern.step();
        pattern.step();
        assert_eq!(pattern.bullets().len(), 1);
        assert!((pattern.bullets()[0].position().x - 404.0).abs() < 1e-4);
        assert_eq!(pattern.core().frame(), 2);
    }
}
