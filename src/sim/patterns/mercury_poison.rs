//! Mercury Poison: paired rings that curl for a moment after launch
//!
//! Each shot is a ring of slow bullets interleaved with a ring of fast ones,
//! orange and cyan on alternate shots. Every bullet turns by a fixed angle per
//! frame for a window of its wave's lifetime; orange waves turn one way and
//! cyan waves the other. After a set number of shots the source moves and the
//! pattern pauses before firing again.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::palette;
use crate::sim::bullet::{BulletFlag, BulletKind};
use crate::sim::pattern::{Pattern, PatternCore, PatternParams};
use crate::sim::wave::WaveBook;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MercuryPoisonConfig {
    /// Pause (frames) after the source moves
    pub wave_delay: u32,
    /// Shots fired before the source moves
    pub wave_count: u32,
    /// Speed of the outer ring relative to the base speed
    pub speed_multiplier: f32,
    pub bullet_size: f32,
    /// Rotation runs for wave ages in `(rotation_start, rotation_end]`
    pub rotation_start: u32,
    pub rotation_end: u32,
    /// Degrees per frame
    pub rotation_angle: f32,
    pub variance_x: u32,
    pub variance_y: u32,
    pub bounds_expansion: f32,
}

impl Default for MercuryPoisonConfig {
    fn default() -> Self {
        Self {
            wave_delay: 90,
            wave_count: 16,
            speed_multiplier: 1.5,
            bullet_size: 8.0,
            rotation_start: 20,
            rotation_end: 80,
            rotation_angle: 1.0,
            variance_x: 200,
            variance_y: 100,
            bounds_expansion: 0.2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MercuryPoison {
    core: PatternCore,
    config: MercuryPoisonConfig,
    waves: WaveBook,
    shot_source: Vec2,
    shot_counter: u32,
    /// No shots before this frame
    resume_at: u32,
    /// Orange, reverse-rotating shot when set
    alternate: bool,
}

impl MercuryPoison {
    pub fn new(params: PatternParams, config: MercuryPoisonConfig) -> Self {
        let mut core = PatternCore::new(params);
        core.expand_bounds(config.bounds_expansion);
        let shot_source = core.random_position(config.variance_x, config.variance_y);
        Self {
            core,
            config,
            waves: WaveBook::new(),
            shot_source,
            shot_counter: 0,
            resume_at: 0,
            alternate: true,
        }
    }

    pub fn shot_source(&self) -> Vec2 {
        self.shot_source
    }

    fn reroll_source(&mut self) {
        self.shot_source = self
            .core
            .random_position(self.config.variance_x, self.config.variance_y);
    }
}

impl Pattern for MercuryPoison {
    fn name(&self) -> &'static str {
        "mercury_poison"
    }

    fn core(&self) -> &PatternCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PatternCore {
        &mut self.core
    }

    fn spawn_bullets(&mut self) {
        if self.core.frame() < self.resume_at || !self.core.can_shoot() {
            return;
        }
        let shot_angle = self.core.random_angle();
        let color = if self.alternate { palette::ORANGE } else { palette::CYAN };
        let count = self.core.stream_count;
        let slow = self.core.base_speed;
        let fast = slow * self.config.speed_multiplier;
        let step = 360.0 / count as f32;
        let source = self.shot_source;
        let first = self.core.bullets.len();

        for i in 0..count {
            let angle = shot_angle + i as f32 * step;
            for (speed, offset) in [(slow, 0.0), (fast, 0.5 * step)] {
                let bullet = self.core.spawn(BulletKind::Circle, source, speed, angle + offset);
                bullet.color = color;
                bullet.radius = self.config.bullet_size;
            }
        }
        self.waves.add_wave(count as usize * 2, self.core.bullets.len());

        if self.alternate {
            for bullet in &mut self.core.bullets[first..] {
                bullet.set_flag(BulletFlag::ReverseRotation);
            }
        }
        self.alternate = !self.alternate;

        self.shot_counter += 1;
        if self.shot_counter >= self.config.wave_count {
            self.shot_counter = 0;
            self.reroll_source();
            self.resume_at = self.core.frame() + self.config.wave_delay;
            log::debug!("Mercury Poison source moved to {:?}", self.shot_source);
        }
    }

    fn process_movement(&mut self) {
        self.waves.increment_wave_frames();
        let (start, end) = (self.config.rotation_start, self.config.rotation_end);
        let angle = self.config.rotation_angle;
        for (range, age) in self.waves.spans() {
            let rotating = age > start && age <= end;
            for bullet in &mut self.core.bullets[range] {
                bullet.process_movement();
                if !rotating {
                    continue;
                }
                if bullet.flag() == BulletFlag::ReverseRotation {
                    bullet.rotate(angle);
                } else {
                    bullet.rotate(-angle);
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
        self.resume_at = 0;
        self.shot_counter = 0;
        self.alternate = true;
        self.reroll_source();
    }

    fn waves(&self) -> Option<&WaveBook> {
        Some(&self.waves)
    }
}
