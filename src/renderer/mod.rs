//! Rendering contract
//!
//! The simulation never talks to a graphics API. Anything that can draw a
//! bullet implements [`RenderSink`]; patterns and the manager implement
//! [`Drawable`] and submit their visible bullets to it in order.
//! [`InstanceBatch`] is the provided sink: it packs bullets into a
//! GPU-ready instance buffer.

pub mod instance;

pub use instance::{BulletInstance, InstanceBatch};

use crate::sim::{Bullet, Pattern, PatternManager};

/// Opaque per-draw context passed through to the sink
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStates {
    /// Added to every bullet position
    pub offset: glam::Vec2,
    /// Multiplied into every bullet's alpha
    pub alpha: f32,
}

impl Default for RenderStates {
    fn default() -> Self {
        Self {
            offset: glam::Vec2::ZERO,
            alpha: 1.0,
        }
    }
}

/// Receives one bullet at a time
pub trait RenderSink {
    fn draw_bullet(&mut self, bullet: &Bullet, states: &RenderStates);
}

pub trait Drawable {
    fn draw(&self, sink: &mut dyn RenderSink, states: &RenderStates);
}

impl Drawable for Bullet {
    fn draw(&self, sink: &mut dyn RenderSink, states: &RenderStates) {
        if self.is_visible() {
            sink.draw_bullet(self, states);
        }
    }
}

/// Paused patterns are hidden unless they opt in
impl Drawable for dyn Pattern + '_ {
    fn draw(&self, sink: &mut dyn RenderSink, states: &RenderStates) {
        if !self.is_active() && !self.draws_when_inactive() {
            return;
        }
        for bullet in self.bullets() {
            bullet.draw(sink, states);
        }
    }
}

impl Drawable for PatternManager {
    fn draw(&self, sink: &mut dyn RenderSink, states: &RenderStates) {
        for pattern in self.patterns() {
            pattern.draw(sink, states);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::pattern::{ManualPattern, PatternParams};
    use crate::sim::patterns::{FlyingSaucer, FlyingSaucerConfig};
    use crate::sim::BulletKind;
    use glam::Vec2;

    #[derive(Default)]
    struct Counter(usize);

    impl RenderSink for Counter {
        fn draw_bullet(&mut self, _bullet: &Bullet, _states: &RenderStates) {
            self.0 += 1;
        }
    }

    fn manual() -> ManualPattern {
        let mut p = ManualPattern::new(PatternParams::new(Vec2::new(400.0, 400.0), 0, 0.0, 0.0));
        let core = p.core_mut();
        core.spawn(BulletKind::Circle, Vec2::new(400.0, 400.0), 0.0, 0.0);
        core.add_spawner(Vec2::new(400.0, 400.0), 0.0, 0.0, false);
        p
    }

    #[test]
    fn test_hidden_spawners_and_paused_patterns() {
        let mut manager = PatternManager::new();
        manager.add_pattern(Box::new(manual()));
        let mut paused = manual();
        paused.set_active(false);
        manager.add_pattern(Box::new(paused));

        let mut counter = Counter::default();
        manager.draw(&mut counter, &RenderStates::default());
        assert_eq!(counter.0, 1);
    }

    #[test]
    fn test_saucer_draws_while_paused() {
        let params = PatternParams::new(Vec2::new(410.0, 250.0), 4, 1.0, 2.0);
        let mut saucer = FlyingSaucer::new(params, FlyingSaucerConfig::default());
        saucer.step();
        saucer.set_active(false);
        let pattern: &dyn Pattern = &saucer;

        let mut counter = Counter::default();
        pattern.draw(&mut counter, &RenderStates::default());
        assert_eq!(counter.0, 16);
    }
}
