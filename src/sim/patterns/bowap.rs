//! Bowap: a direct stream with accelerating spin
//!
//! The shot angle is `offset + velocity * t + acceleration * t^2` with `t` in
//! seconds of pattern time, so the rotation speeds up the longer it runs.

use serde::{Deserialize, Serialize};

use crate::consts::FPS;
use crate::sim::bullet::BulletKind;
use crate::sim::pattern::{Pattern, PatternCore, PatternParams};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BowapConfig {
    /// Degrees
    pub angle_offset: f32,
    /// Degrees per second
    pub angle_velocity: f32,
    /// Degrees per second squared
    pub angle_acceleration: f32,
}

impl Default for BowapConfig {
    fn default() -> Self {
        Self {
            angle_offset: 0.0,
            angle_velocity: 20.0,
            angle_acceleration: 45.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Bowap {
    core: PatternCore,
    config: BowapConfig,
}

impl Bowap {
    pub fn new(params: PatternParams, config: BowapConfig) -> Self {
        Self {
            core: PatternCore::new(params),
            config,
        }
    }

    /// Base angle of the shot fired on `frame`
    pub fn shot_angle(&self, frame: u32) -> f32 {
        let t = frame as f32 / FPS;
        let cfg = &self.config;
        cfg.angle_offset + cfg.angle_velocity * t + cfg.angle_acceleration * t * t
    }
}

impl Pattern for Bowap {
    fn name(&self) -> &'static str {
        "bowap"
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
        let base = self.shot_angle(self.core.frame());
        let count = self.core.stream_count;
        let (source, speed) = (self.core.source, self.core.base_speed);
        for i in 0..count {
            let angle = base + i as f32 * 360.0 / count as f32;
            self.core.spawn(BulletKind::Rice, source, speed, angle);
        }
    }
}
