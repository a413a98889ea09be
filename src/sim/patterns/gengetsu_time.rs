//! Gengetsu Time: simple but fast rings
//!
//! Every shot picks a random angle, a jittered source and, by coin flip,
//! either dot bullets or blue circles.

use serde::{Deserialize, Serialize};

use crate::palette;
use crate::sim::bullet::BulletKind;
use crate::sim::pattern::{Pattern, PatternCore, PatternParams};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GengetsuTimeConfig {
    pub variance_x: u32,
    pub variance_y: u32,
}

impl Default for GengetsuTimeConfig {
    fn default() -> Self {
        Self {
            variance_x: 200,
            variance_y: 100,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GengetsuTime {
    core: PatternCore,
    config: GengetsuTimeConfig,
}

impl GengetsuTime {
    pub fn new(params: PatternParams, config: GengetsuTimeConfig) -> Self {
        Self {
            core: PatternCore::new(params),
            config,
        }
    }
}

impl Pattern for GengetsuTime {
    fn name(&self) -> &'static str {
        "gengetsu_time"
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
        let shot_angle = self.core.random_angle();
        let use_dots = self.core.coin_flip();
        let shot_source = self
            .core
            .random_position(self.config.variance_x, self.config.variance_y);
        let count = self.core.stream_count;
        let speed = self.core.base_speed;
        for i in 0..count {
            let angle = shot_angle + i as f32 * 360.0 / count as f32;
            if use_dots {
                self.core.spawn(BulletKind::Dot, shot_source, speed, angle);
            } else {
                let bullet = self.core.spawn(BulletKind::Circle, shot_source, speed, angle);
                bullet.color = palette::BLUE;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::bounds::Bounds;
    use glam::Vec2;

    #[test]
    fn test_rings_are_single_kind() {
        // Large playfield so no ring is culled and chunks line up with shots
        let params = PatternParams::new(Vec2::new(410.0, 300.0), 16, 6.0, 8.0)
            .with_playfield(Bounds::new(-2_000.0, -2_000.0, 5_000.0, 5_000.0))
            .with_seed(3);
        let mut gengetsu = GengetsuTime::new(params, GengetsuTimeConfig::default());
        for _ in 0..40 {
            gengetsu.step();
        }
        // 6 shots/s -> frames 0, 10, 20, 30
        let bullets = gengetsu.bullets();
        assert_eq!(bullets.len(), 64);
        for ring in bullets.chunks(16) {
            assert!(ring.iter().all(|b| b.kind == ring[0].kind));
            assert!(matches!(ring[0].kind, BulletKind::Dot | BulletKind::Circle));
        }
    }
}
