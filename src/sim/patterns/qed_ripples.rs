//! QED Ripples: rings that bounce once off the side and top walls
//!
//! Each shot is a ring at a random angle from a jittered source. A bullet that
//! leaves the bounce region through the left, right or top edge has the
//! matching velocity component flipped and is tagged `Bounced` so it never
//! bounces again. The bottom edge never reflects.

use serde::{Deserialize, Serialize};

use crate::palette;
use crate::sim::bounds::Bounds;
use crate::sim::bullet::{BulletFlag, BulletKind};
use crate::sim::pattern::{Pattern, PatternCore, PatternParams};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QedRipplesConfig {
    pub variance_x: u32,
    pub variance_y: u32,
    /// Walls to bounce off; `None` uses the playfield
    pub bounce_bounds: Option<Bounds>,
}

impl Default for QedRipplesConfig {
    fn default() -> Self {
        Self {
            variance_x: 200,
            variance_y: 100,
            bounce_bounds: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct QedRipples {
    core: PatternCore,
    config: QedRipplesConfig,
    bounce_bounds: Bounds,
}

impl QedRipples {
    pub fn new(params: PatternParams, config: QedRipplesConfig) -> Self {
        let core = PatternCore::new(params);
        let bounce_bounds = config.bounce_bounds.unwrap_or(core.playfield());
        Self {
            core,
            config,
            bounce_bounds,
        }
    }

    pub fn bounce_bounds(&self) -> Bounds {
        self.bounce_bounds
    }
}

impl Pattern for QedRipples {
    fn name(&self) -> &'static str {
        "qed_ripples"
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
        // First shot always comes from the fixed source
        let shot_source = if self.core.frame() != 0 {
            self.core
                .random_position(self.config.variance_x, self.config.variance_y)
        } else {
            self.core.source
        };
        let count = self.core.stream_count;
        let speed = self.core.base_speed;
        for i in 0..count {
            let angle = shot_angle + i as f32 * 360.0 / count as f32;
            self.core.spawn(BulletKind::Rice, shot_source, speed, angle).color = palette::BLUE;
        }
    }

    fn process_movement(&mut self) {
        let walls = self.bounce_bounds;
        for bullet in &mut self.core.bullets {
            bullet.process_movement();
            let pos = bullet.position();
            if walls.contains(pos) {
                continue;
            }
            if bullet.flag() == BulletFlag::Bounced || walls.below(pos) {
                continue;
            }
            if walls.outside_horizontally(pos) {
                bullet.flip_x();
            } else {
                bullet.flip_y();
            }
            bullet.set_flag(BulletFlag::Bounced);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn ripples(stream_count: u32) -> QedRipples {
        let params =
            PatternParams::new(Vec2::new(410.0, 300.0), stream_count, 2.0, 6.0).with_seed(7);
        QedRipples::new(params, QedRipplesConfig::default())
    }

    #[test]
    fn test_first_ring_from_fixed_source() {
        let mut qed = ripples(12);
        qed.spawn_bullets();
        assert_eq!(qed.bullets().len(), 12);
        assert!(qed.bullets().iter().all(|b| b.position() == Vec2::new(410.0, 300.0)));
    }

    #[test]
    fn test_bounce_off_side_flips_x_once() {
        let mut qed = ripples(0);
        let walls = qed.bounce_bounds();
        // Heading right, a few pixels from the right wall
        let start = Vec2::new(walls.right() - 2.0, walls.center().y);
        qed.core_mut().spawn(BulletKind::Rice, start, 5.0, 0.0);

        qed.process_movement();
        let b = &qed.bullets()[0];
        assert_eq!(b.flag(), BulletFlag::Bounced);
        assert!(b.velocity().x < 0.0);

        // Stays outside for another frame: no second flip
        qed.process_movement();
        assert!(qed.bullets()[0].velocity().x < 0.0);
    }

    #[test]
    fn test_bounce_off_top_flips_y() {
        let mut qed = ripples(0);
        let walls = qed.bounce_bounds();
        let start = Vec2::new(walls.center().x, walls.top + 1.0);
        qed.core_mut().spawn(BulletKind::Rice, start, 4.0, 270.0);
        qed.process_movement();
        let b = &qed.bullets()[0];
        assert!(b.velocity().y > 0.0);
        assert!(b.velocity().x.abs() < 1e-4);
    }

    #[test]
    fn test_never_bounces_off_bottom() {
        let mut qed = ripples(0);
        let walls = qed.bounce_bounds();
        let start = Vec2::new(walls.center().x, walls.bottom() - 1.0);
        qed.core_mut().spawn(BulletKind::Rice, start, 4.0, 90.0);
        qed.process_movement();
        let b = &qed.bullets()[0];
        assert!(b.velocity().y > 0.0);
        assert_eq!(b.flag(), BulletFlag::Neutral);
    }
}
