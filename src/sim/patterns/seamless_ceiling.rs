//! Seamless Ceiling: sweeping rows that fall, under rotating streams
//!
//! Two generators share the pattern:
//! - Ceilings: on every main shot a row of yellow bullets sweeps sideways from
//!   a jittered source, alternating left and right. Each row is one wave. It
//!   slows to a stop over the last quarter of its delay and then drops.
//! - Streams: up to four spiral streams fire at a higher rate. Later streams
//!   unlock once the pattern frame passes fixed thresholds. Everything a
//!   stream fires between two ceilings forms one wave.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::palette::{self, Rgba};
use crate::sim::bullet::{BulletFlag, BulletKind};
use crate::sim::pattern::{Pattern, PatternCore, PatternParams};
use crate::sim::wave::WaveBook;

const BULLET_RADIUS: f32 = 7.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeamlessCeilingConfig {
    pub ceiling_variance_x: u32,
    pub ceiling_variance_y: u32,
    /// Bullets per ceiling row
    pub ceiling_count: u32,
    /// Bullet `i` of a row starts at `(i + initial_speed) * spacing`
    pub initial_speed: f32,
    pub spacing: f32,
    /// Row age (frames) when the drop starts
    pub drop_delay: u32,
    /// Pixels per frame once dropping
    pub drop_speed: f32,
    pub stream_variance: u32,
    /// Stream rate relative to the ceiling rate
    pub stream_rate_multiplier: f32,
    /// Frames after which the 2nd, 3rd and 4th streams join
    pub phase1_end: u32,
    pub phase2_end: u32,
    pub phase3_end: u32,
    /// Extra culling margin so sideways rows survive until they drop
    pub bounds_expansion: f32,
}

impl Default for SeamlessCeilingConfig {
    fn default() -> Self {
        Self {
            ceiling_variance_x: 300,
            ceiling_variance_y: 60,
            ceiling_count: 24,
            initial_speed: 2.0,
            spacing: 0.5,
            drop_delay: 120,
            drop_speed: 2.0,
            stream_variance: 60,
            stream_rate_multiplier: 14.0,
            phase1_end: 600,
            phase2_end: 1200,
            phase3_end: 1800,
            bounds_expansion: 0.1,
        }
    }
}

/// One spiral stream: its look, speed and how its angle drifts with the frame
struct Stream {
    color: Rgba,
    speed_multiplier: f32,
    base_angle: f32,
    /// Degrees added per pattern frame
    spin: f32,
}

static STREAMS: [Stream; 4] = [
    Stream {
        color: palette::GREEN,
        speed_multiplier: 1.0,
        base_angle: 45.0,
        spin: 0.8,
    },
    Stream {
        color: palette::CYAN,
        speed_multiplier: 1.2,
        base_angle: 20.0,
        spin: -1.0,
    },
    Stream {
        color: palette::BLUE,
        speed_multiplier: 1.0,
        base_angle: 40.0,
        spin: 1.6,
    },
    Stream {
        color: palette::MAGENTA,
        speed_multiplier: 1.1,
        base_angle: 60.0,
        spin: -2.0,
    },
];

#[derive(Debug, Clone)]
pub struct SeamlessCeiling {
    core: PatternCore,
    config: SeamlessCeilingConfig,
    waves: WaveBook,
    /// Next row sweeps left when set
    ceiling_left: bool,
}

impl SeamlessCeiling {
    pub fn new(params: PatternParams, config: SeamlessCeilingConfig) -> Self {
        let mut core = PatternCore::new(params);
        core.expand_bounds(config.bounds_expansion);
        Self {
            core,
            config,
            waves: WaveBook::new(),
            ceiling_left: true,
        }
    }

    fn spawn_ceiling(&mut self) {
        // Close the stream wave collected since the last row
        self.waves.add_wave(0, self.core.bullets.len());

        let cfg = self.config;
        let source = self
            .core
            .random_position(cfg.ceiling_variance_x, cfg.ceiling_variance_y);
        let direction = if self.ceiling_left { 180.0 } else { 0.0 };
        for i in 0..cfg.ceiling_count {
            let speed = (i as f32 + cfg.initial_speed) * cfg.spacing;
            let bullet = self.core.spawn(BulletKind::Circle, source, speed, direction);
            bullet.color = palette::YELLOW;
            bullet.radius = BULLET_RADIUS;
            bullet.set_flag(BulletFlag::IsCeiling);
        }
        self.waves
            .add_wave(cfg.ceiling_count as usize, self.core.bullets.len());
        self.ceiling_left = !self.ceiling_left;
    }

    /// Fire the unlocked members of a pair of streams from one jittered source
    fn spawn_streams(&mut self, pair: &[(usize, bool)]) {
        let variance = self.config.stream_variance;
        let source = self.core.random_position(variance, variance);
        let frame = self.core.frame() as f32;
        let count = self.core.stream_count;
        let speed = self.core.base_speed;
        for &(index, unlocked) in pair {
            if !unlocked {
                continue;
            }
            let stream = &STREAMS[index];
            for i in 0..count {
                let spread = i as f32 * 360.0 / count as f32;
                let angle = stream.base_angle + frame * stream.spin + spread;
                let bullet = self
                    .core
                    .spawn(BulletKind::Circle, source, speed * stream.speed_multiplier, angle);
                bullet.color = stream.color;
                bullet.radius = BULLET_RADIUS;
                self.waves.increment_current_bullet_count();
            }
        }
    }
}

impl Pattern for SeamlessCeiling {
    fn name(&self) -> &'static str {
        "seamless_ceiling"
    }

    fn core(&self) -> &PatternCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PatternCore {
        &mut self.core
    }

    fn spawn_bullets(&mut self) {
        if self.core.can_shoot() {
            self.spawn_ceiling();
        }

        let cfg = self.config;
        let stream_frequency = self.core.shot_frequency * cfg.stream_rate_multiplier;
        let frame = self.core.frame();
        if self.core.can_shoot_at(stream_frequency) {
            self.spawn_streams(&[(0, true), (1, frame > cfg.phase1_end)]);
        }
        if self.core.can_shoot_at(stream_frequency) {
            self.spawn_streams(&[(2, frame > cfg.phase2_end), (3, frame > cfg.phase3_end)]);
        }
    }

    fn process_movement(&mut self) {
        self.core.advance_bullets();
        self.waves.increment_wave_frames();

        let cfg = self.config;
        let delay = cfg.drop_delay as f32;
        for (range, age) in self.waves.spans() {
            let start = range.start;
            if self.core.bullets[start].flag() != BulletFlag::IsCeiling {
                continue;
            }
            if age == cfg.drop_delay {
                for bullet in &mut self.core.bullets[range] {
                    bullet.set_velocity(Vec2::new(0.0, cfg.drop_speed));
                }
            } else if (age as f32) > delay * 0.75 && age < cfg.drop_delay {
                // Bleed off the sweep over the last quarter so each bullet stops
                let direction = if self.core.bullets[start].velocity().x < 0.0 {
                    -1.0
                } else {
                    1.0
                };
                let mut speed = cfg.initial_speed * cfg.spacing;
                for bullet in &mut self.core.bullets[range] {
                    bullet.adjust_velocity(Vec2::new(-speed * 4.0 * direction / delay, 0.0));
                    speed += cfg.spacing;
                }
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
        self.ceiling_left = true;
    }

    fn waves(&self) -> Option<&WaveBook> {
        Some(&self.waves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::bullet::Bullet;

    fn ceiling() -> SeamlessCeiling {
        let params = PatternParams::new(Vec2::new(410.0, 200.0), 4, 0.25, 2.0).with_seed(9);
        SeamlessCeiling::new(params, SeamlessCeilingConfig::default())
    }

    #[test]
    fn test_first_frame_builds_ceiling_then_stream() {
        let mut sc = ceiling();
        sc.step();
        let waves = sc.waves().map(|w| (w.sizes().to_vec(), w.open_count()));
        // Only the first stream is unlocked at frame 0
        assert_eq!(waves, Some((vec![24], 4)));
        assert!(sc.bullets()[..24].iter().all(|b| b.flag() == BulletFlag::IsCeiling));
        assert!(sc.bullets()[24..].iter().all(|b| b.color == palette::GREEN));
    }

    #[test]
    fn test_ceiling_alternates_direction() {
        let mut sc = ceiling();
        sc.spawn_ceiling();
        sc.spawn_ceiling();
        assert!(sc.bullets()[0].velocity().x < 0.0);
        assert!(sc.bullets()[24].velocity().x > 0.0);
    }

    #[test]
    fn test_ceiling_stops_then_drops() {
        let mut sc = ceiling();
        sc.spawn_ceiling();
        for _ in 0..119 {
            sc.process_movement();
        }
        // Deceleration over ages 91..=119 leaves each bullet almost stopped
        for bullet in &sc.bullets()[..24] {
            assert!(bullet.velocity().x.abs() < 0.6, "vx {}", bullet.velocity().x);
        }
        sc.process_movement();
        for bullet in &sc.bullets()[..24] {
            assert_eq!(bullet.velocity(), Vec2::new(0.0, 2.0));
        }
    }

    #[test]
    fn test_late_streams_unlock() {
        let mut sc = ceiling();
        for _ in 0..1208 {
            sc.step();
        }
        let tracked = sc.waves().map(|w| w.tracked_count());
        assert_eq!(tracked, Some(sc.bullets().len()));
        assert!(sc.bullets().iter().any(|b| b.color == palette::CYAN));
        assert!(sc.bullets().iter().any(|b| b.color == palette::BLUE));
        assert!(!sc.bullets().iter().any(|b| b.color == palette::MAGENTA));
    }

    #[test]
    fn test_rows_get_extra_culling_margin() {
        let sc = ceiling();
        // Playfield 720 wide at x = 50, grown by 0.1 twice
        assert!((sc.core().bounds().left - (50.0 - 144.0)).abs() < 1e-3);

        let tight = SeamlessCeilingConfig {
            bounds_expansion: 0.0,
            ..SeamlessCeilingConfig::default()
        };
        let params = PatternParams::new(Vec2::new(410.0, 200.0), 4, 0.25, 2.0);
        let tight = SeamlessCeiling::new(params, tight);
        let straggler = Bullet::new(BulletKind::Circle, Vec2::new(-50.0, 400.0), 0.0, 0.0);
        assert!(tight.core().is_out_of_bounds(&straggler));
        assert!(!sc.core().is_out_of_bounds(&straggler));
    }
}
