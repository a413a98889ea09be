//! Wind God: two three-layer flowers drawn by moving spawners
//!
//! A small ring of invisible spawners (always the first `petal_count`
//! bullets) traces circular arcs and drops stationary talismans along the way.
//! Each cycle runs eight phases:
//! - Flower 1, layers 1-3, spawners turning one way
//! - Rest
//! - Flower 2, layers 1-3, turning the other way from a new random angle
//! - Rest
//!
//! Each layer's talismans form one wave. Once a wave is old enough its
//! talismans accelerate outward for a short launch window.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::FPS;
use crate::palette::{self, Rgba};
use crate::polar_deg;
use crate::sim::bullet::BulletKind;
use crate::sim::pattern::{Pattern, PatternCore, PatternParams};
use crate::sim::wave::WaveBook;

/// One color per active phase, in phase order
const LAYER_COLORS: [Rgba; 6] = [
    palette::RED,
    palette::ORANGE,
    palette::YELLOW,
    palette::GREEN,
    palette::CYAN,
    palette::VIOLET,
];

/// Extra outward skew of talismans dropped by each flower (degrees)
const FLOWER1_SKEW: f32 = 15.0;
const FLOWER2_SKEW: f32 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindGodConfig {
    pub petal_count: u32,
    /// Spawner speed before per-layer adjustment (pixels per frame)
    pub spawner_move_speed: f32,
    /// Frames spawners are pre-rolled along their arc at cycle start
    pub frame_offset: u32,
    /// Cycle-relative frames where layers 2 and 3 begin and flower 1 ends
    pub layer1_checkpoint: u32,
    pub layer2_checkpoint: u32,
    pub layer3_checkpoint: u32,
    /// Rest between flowers (seconds)
    pub refresh_delay: f32,
    pub radius1: f32,
    pub radius2: f32,
    pub radius3: f32,
    /// Layer 3 spawners start this many `radius2` away from the source
    pub layer3_distance_factor: f32,
    /// Talismans per petal per layer, used to scale the angle variance
    pub expected_bullets: [f32; 3],
    /// Share of layer 1 hidden under layer 2
    pub layer1_cut: f32,
    /// Layer 1 density multiplier for flower 2
    pub flower2_density_factor: f32,
    /// Emission rounds per frame as numerator/denominator
    pub density_ratio: (u32, u32),
    pub layer3_ratio: (u32, u32),
    pub fast_multiplier: f32,
    pub slow_multiplier: f32,
    /// Speed corrections for layers 1, 2 and 3 so petals line up
    pub speed_trims: [f32; 3],
    /// Wave age (frames) when talismans start accelerating
    pub launch_delay: u32,
    /// Speed gained per frame while launching
    pub launch_accel: f32,
    /// Cyclic per-round angle offsets (degrees, divided by layer density)
    pub angle_variance: Vec<f32>,
    pub bounds_expansion: f32,
}

impl Default for WindGodConfig {
    fn default() -> Self {
        Self {
            petal_count: 5,
            spawner_move_speed: 6.0,
            frame_offset: 10,
            layer1_checkpoint: 60,
            layer2_checkpoint: 120,
            layer3_checkpoint: 180,
            refresh_delay: 1.0,
            radius1: 60.0,
            radius2: 90.0,
            radius3: 140.0,
            layer3_distance_factor: 2.365,
            expected_bullets: [20.0, 25.0, 30.0],
            layer1_cut: 0.25,
            flower2_density_factor: 1.2,
            density_ratio: (3, 2),
            layer3_ratio: (2, 1),
            fast_multiplier: 1.5,
            slow_multiplier: 0.8,
            speed_trims: [-0.1, 0.2, -0.25],
            launch_delay: 30,
            launch_accel: 0.1,
            angle_variance: vec![-30.0, -10.0, 10.0, 30.0],
            bounds_expansion: 0.1,
        }
    }
}

impl WindGodConfig {
    pub fn refresh_frames(&self) -> u32 {
        (self.refresh_delay * FPS).round().max(0.0) as u32
    }

    /// Frames between spawner resets: two flowers, each followed by a rest
    pub fn cycle_frames(&self) -> u32 {
        (2 * (self.layer3_checkpoint + self.refresh_frames())).max(1)
    }
}

/// Stage of the eight-phase cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindGodPhase {
    Flower1Layer1,
    Flower1Layer2,
    Flower1Layer3,
    Rest1,
    Flower2Layer1,
    Flower2Layer2,
    Flower2Layer3,
    Rest2,
}

impl WindGodPhase {
    pub fn is_rest(self) -> bool {
        matches!(self, WindGodPhase::Rest1 | WindGodPhase::Rest2)
    }

    pub fn is_second_flower(self) -> bool {
        matches!(
            self,
            WindGodPhase::Flower2Layer1 | WindGodPhase::Flower2Layer2 | WindGodPhase::Flower2Layer3
        )
    }
}

/// Phase for a frame count relative to the cycle start.
///
/// Layer 3 includes its last checkpoint frame; anything past the second
/// flower is the final rest.
pub fn phase_at(elapsed: u32, config: &WindGodConfig) -> WindGodPhase {
    let (l1, l2, l3) = (
        config.layer1_checkpoint,
        config.layer2_checkpoint,
        config.layer3_checkpoint,
    );
    let r = config.refresh_frames();
    let (l4, l5, l6) = (l3 + l1, l3 + l2, 2 * l3);

    if elapsed < l1 {
        WindGodPhase::Flower1Layer1
    } else if elapsed < l2 {
        WindGodPhase::Flower1Layer2
    } else if elapsed <= l3 {
        WindGodPhase::Flower1Layer3
    } else if elapsed < l3 + r {
        WindGodPhase::Rest1
    } else if elapsed < l4 + r {
        WindGodPhase::Flower2Layer1
    } else if elapsed < l5 + r {
        WindGodPhase::Flower2Layer2
    } else if elapsed <= l6 + r {
        WindGodPhase::Flower2Layer3
    } else {
        WindGodPhase::Rest2
    }
}

/// Spawner reposition events at phase boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Layer2,
    Layer3,
    /// Stop the spawners at the end of a flower
    Halt,
    Flower2,
    Flower2Layer2,
    Flower2Layer3,
}

pub fn transition_at(elapsed: u32, config: &WindGodConfig) -> Option<Transition> {
    let (l1, l2, l3) = (
        config.layer1_checkpoint,
        config.layer2_checkpoint,
        config.layer3_checkpoint,
    );
    let r = config.refresh_frames();
    if elapsed == l1 {
        Some(Transition::Layer2)
    } else if elapsed == l2 {
        Some(Transition::Layer3)
    } else if elapsed == l3 || elapsed == 2 * l3 + r {
        Some(Transition::Halt)
    } else if elapsed == l3 + r {
        Some(Transition::Flower2)
    } else if elapsed == l3 + l1 + r {
        Some(Transition::Flower2Layer2)
    } else if elapsed == l3 + l2 + r {
        Some(Transition::Flower2Layer3)
    } else {
        None
    }
}

/// Spawner geometry and emission rate for one layer
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayerParams {
    /// Arc radius the spawners trace
    pub radius: f32,
    /// Scales the angle variance down as more talismans share a petal
    pub density: f32,
    /// Emission rounds per frame as numerator/denominator
    pub ratio: (u32, u32),
    pub spawner_speed: f32,
    pub color: Rgba,
}

impl LayerParams {
    /// Parameters for an active phase; rests have none
    pub fn for_phase(phase: WindGodPhase, config: &WindGodConfig) -> Option<Self> {
        let move_speed = config.spawner_move_speed;
        let scaled = |(num, den): (u32, u32)| move_speed * den as f32 / num.max(1) as f32;
        let [e1, e2, e3] = config.expected_bullets;
        let [trim1, trim2, trim3] = config.speed_trims;
        let ratio = config.density_ratio;
        let ratio3 = config.layer3_ratio;

        let (radius, density, ratio, spawner_speed, color_index) = match phase {
            WindGodPhase::Flower1Layer1 => (
                config.radius1,
                e1 / (1.0 - config.layer1_cut),
                ratio,
                scaled(ratio) + trim1,
                0,
            ),
            WindGodPhase::Flower1Layer2 => (
                config.radius2,
                e2 * 2.0,
                ratio,
                scaled(ratio) + trim2,
                1,
            ),
            WindGodPhase::Flower1Layer3 => (
                config.radius3,
                e3 * 2.0,
                ratio3,
                config.fast_multiplier * scaled(ratio3) + trim3,
                2,
            ),
            WindGodPhase::Flower2Layer1 => (
                config.radius1,
                e1 * config.flower2_density_factor,
                ratio,
                config.slow_multiplier * scaled(ratio) + trim1,
                3,
            ),
            WindGodPhase::Flower2Layer2 => (
                config.radius2,
                e2 * 2.0,
                ratio,
                scaled(ratio) + trim2,
                4,
            ),
            WindGodPhase::Flower2Layer3 => (
                config.radius3,
                e3 * 2.0,
                ratio3,
                config.fast_multiplier * scaled(ratio3) + trim3,
                5,
            ),
            WindGodPhase::Rest1 | WindGodPhase::Rest2 => return None,
        };
        Some(Self {
            radius,
            density,
            ratio,
            spawner_speed,
            color: LAYER_COLORS[color_index],
        })
    }
}

#[derive(Debug, Clone)]
pub struct WindGod {
    core: PatternCore,
    config: WindGodConfig,
    waves: WaveBook,
    phase: WindGodPhase,
    layer: LayerParams,
    /// Frame the current cycle started on
    spawn_point: u32,
    /// Refreshed for every flower
    shot_angle: f32,
    variance_index: usize,
    /// Position in the emission ratio's denominator cycle
    carry: u32,
    /// Whether the front of the bullet vector holds this cycle's spawners
    spawners_live: bool,
}

impl WindGod {
    pub fn new(params: PatternParams, config: WindGodConfig) -> Self {
        let mut core = PatternCore::new(params);
        core.expand_bounds(config.bounds_expansion);
        let phase = WindGodPhase::Flower1Layer1;
        let layer = LayerParams::for_phase(phase, &config).unwrap_or_default();
        Self {
            core,
            config,
            waves: WaveBook::new(),
            phase,
            layer,
            spawn_point: 0,
            shot_angle: 0.0,
            variance_index: 0,
            carry: 0,
            spawners_live: false,
        }
    }

    pub fn phase(&self) -> WindGodPhase {
        self.phase
    }

    pub fn petal_count(&self) -> usize {
        self.config.petal_count as usize
    }

    /// Number of spawners at the front of the bullet vector
    fn spawner_count(&self) -> usize {
        if self.spawners_live {
            self.petal_count().min(self.core.bullets.len())
        } else {
            0
        }
    }

    fn set_phase(&mut self, phase: WindGodPhase) {
        if phase != self.phase {
            log::debug!("Wind God phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }

    fn adjust_spawners(&mut self) {
        if let Some(layer) = LayerParams::for_phase(self.phase, &self.config) {
            self.layer = layer;
        }
    }

    /// Degrees between neighbouring petals
    fn petal_step(&self) -> f32 {
        360.0 / self.config.petal_count.max(1) as f32
    }

    /// Move every spawner onto the ring at `distance` from the source.
    ///
    /// Spawner `i` sits at `angle_of(i)` and heads `heading_offset` further round.
    fn place_spawners<F>(&mut self, distance: f32, heading_offset: f32, angle_of: F)
    where
        F: Fn(f32) -> f32,
    {
        let source = self.core.source;
        let speed = self.layer.spawner_speed;
        let count = self.spawner_count();
        for (i, spawner) in self.core.bullets[..count].iter_mut().enumerate() {
            let angle = angle_of(i as f32);
            spawner.set_velocity_polar(speed, angle + heading_offset);
            spawner.set_position(source + polar_deg(distance, angle));
        }
    }

    fn apply_transition(&mut self, transition: Transition) {
        let cfg = &self.config;
        let step = self.petal_step();
        let quarter = 90.0 / cfg.petal_count.max(1) as f32;
        let half = 2.0 * quarter;
        let inner = 2.0 * cfg.radius1;
        let outer = cfg.layer3_distance_factor * cfg.radius2;
        let shot = self.shot_angle;

        match transition {
            Transition::Layer2 => {
                self.close_layer();
                self.place_spawners(inner, half, |i| step * i + 180.0 + shot + quarter);
            }
            Transition::Layer3 => {
                self.close_layer();
                self.place_spawners(outer, half, |i| step * i + 180.0 + shot - quarter);
            }
            Transition::Halt => {
                self.waves.add_wave(0, self.core.bullets.len());
                let count = self.spawner_count();
                for spawner in &mut self.core.bullets[..count] {
                    spawner.set_velocity(Vec2::ZERO);
                }
            }
            Transition::Flower2 => {
                self.adjust_spawners();
                self.shot_angle = self.core.random_angle();
                let shot = self.shot_angle;
                self.place_spawners(0.0, 0.0, |i| step * i + shot);
            }
            Transition::Flower2Layer2 => {
                self.close_layer();
                self.place_spawners(inner, -half, |i| step * i + shot - quarter);
            }
            Transition::Flower2Layer3 => {
                self.close_layer();
                self.place_spawners(outer, -half, |i| step * i + shot + quarter);
            }
        }
    }

    /// Close the previous layer's wave and load the new layer's parameters
    fn close_layer(&mut self) {
        self.waves.add_wave(0, self.core.bullets.len());
        self.adjust_spawners();
    }

    /// Emission rounds this frame: `num / den` on average, spread so no
    /// frame differs from another by more than one round
    fn emission_rounds(&mut self) -> u32 {
        let (num, den) = self.layer.ratio;
        let den = den.max(1);
        let mut rounds = num / den;
        if self.carry % den < num % den {
            rounds += 1;
        }
        self.carry = if self.carry + 1 >= den { 0 } else { self.carry + 1 };
        rounds
    }

    /// Drop talismans from every spawner and advance the spawners along their arcs
    fn emit(&mut self) {
        let rounds = self.emission_rounds();
        let second = self.phase.is_second_flower();
        let layer = self.layer;
        let count = self.spawner_count();
        let variance_len = self.config.angle_variance.len();

        for _ in 0..rounds {
            let variance = self
                .config
                .angle_variance
                .get(self.variance_index)
                .copied()
                .unwrap_or(0.0)
                / layer.density;
            for j in 0..count {
                let (position, rotation) = {
                    let spawner = &self.core.bullets[j];
                    (spawner.position(), spawner.rotation())
                };
                // Spawners move tangentially; +/-90 aims at the petal centre
                let angle = if second {
                    rotation - 90.0 - FLOWER2_SKEW - variance
                } else {
                    rotation + 90.0 + FLOWER1_SKEW + variance
                };
                self.core.spawn(BulletKind::Talisman, position, 0.0, angle).color = layer.color;
                self.waves.increment_current_bullet_count();

                let spawner = &mut self.core.bullets[j];
                let arc_speed = if second { -layer.spawner_speed } else { layer.spawner_speed };
                spawner.rotate_arc(layer.radius, arc_speed);
                spawner.process_movement();
            }
            if variance_len > 0 {
                self.variance_index = (self.variance_index + 1) % variance_len;
            }
        }
    }

    /// Replace the spawners and pre-roll them into position for a new cycle
    fn start_cycle(&mut self) {
        let frame = self.core.frame();
        self.spawn_point = frame;
        self.set_phase(phase_at(0, &self.config));
        self.adjust_spawners();

        let petals = self.petal_count();
        if self.spawners_live {
            let stale = self.spawner_count();
            self.core.bullets.drain(..stale);
        }
        self.shot_angle = if frame == 0 { 0.0 } else { self.core.random_angle() };

        let (source, move_speed) = (self.core.source, self.config.spawner_move_speed);
        let step = self.petal_step();
        for i in 0..petals {
            let angle = step * i as f32 + 180.0 + self.shot_angle;
            self.core.add_spawner(source, move_speed, angle, false);
        }
        if !self.spawners_live {
            self.waves.insert_leading_wave(petals, self.core.bullets.len());
            self.spawners_live = true;
        }

        let radius = self.layer.radius;
        let speed = self.layer.spawner_speed;
        for spawner in &mut self.core.bullets[..petals] {
            for _ in 0..self.config.frame_offset {
                spawner.rotate_arc(radius, move_speed);
                spawner.process_movement();
            }
            spawner.set_speed(speed);
        }
        log::debug!("Wind God cycle started at frame {} (angle {})", frame, self.shot_angle);
    }

    /// Accelerate talismans whose wave is inside its launch window
    fn launch_waves(&mut self) {
        let delay = self.config.launch_delay;
        let accel = self.config.launch_accel;
        let window_end = delay as f32 + self.core.base_speed / accel;
        let skip = usize::from(self.spawners_live);
        for (range, age) in self.waves.spans().skip(skip) {
            if age < delay || age as f32 > window_end {
                continue;
            }
            for bullet in &mut self.core.bullets[range] {
                bullet.adjust_speed(accel);
            }
        }
    }
}

impl Pattern for WindGod {
    fn name(&self) -> &'static str {
        "wind_god"
    }

    fn core(&self) -> &PatternCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PatternCore {
        &mut self.core
    }

    /// Cycle timing comes from the checkpoints, not `shot_frequency`
    fn spawn_bullets(&mut self) {
        if self.core.can_shoot_every(self.config.cycle_frames()) {
            self.start_cycle();
        }
    }

    fn process_movement(&mut self) {
        self.waves.increment_wave_frames();
        let elapsed = self.core.frame().saturating_sub(self.spawn_point);
        self.set_phase(phase_at(elapsed, &self.config));
        self.launch_waves();

        let spawners = self.spawner_count();
        for bullet in &mut self.core.bullets[spawners..] {
            bullet.process_movement();
        }

        if spawners == 0 || self.phase.is_rest() {
            return;
        }
        match transition_at(elapsed, &self.config) {
            Some(transition) => self.apply_transition(transition),
            None => self.emit(),
        }
    }

    fn delete_out_of_bounds_bullets(&mut self) {
        self.waves
            .delete_out_of_bounds_bullets(&mut self.core, |b| b.kind.is_spawner());
    }

    fn delete_all_bullets(&mut self) {
        self.core.delete_all_bullets();
        self.waves.clear();
        self.spawners_live = false;
    }

    fn reset_pattern(&mut self) {
        self.core.reset();
        self.spawn_point = 0;
        self.shot_angle = 0.0;
        self.variance_index = 0;
        self.carry = 0;
        self.phase = WindGodPhase::Flower1Layer1;
        self.adjust_spawners();
    }

    fn waves(&self) -> Option<&WaveBook> {
        Some(&self.waves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wind_god() -> WindGod {
        let params = PatternParams::new(Vec2::new(410.0, 300.0), 0, 0.0, 3.0).with_seed(21);
        WindGod::new(params, WindGodConfig::default())
    }

    #[test]
    fn test_phase_boundaries() {
        let cfg = WindGodConfig::default();
        let cases = [
            (0, WindGodPhase::Flower1Layer1),
            (59, WindGodPhase::Flower1Layer1),
            (60, WindGodPhase::Flower1Layer2),
            (120, WindGodPhase::Flower1Layer3),
            (180, WindGodPhase::Flower1Layer3),
            (181, WindGodPhase::Rest1),
            (239, WindGodPhase::Rest1),
            (240, WindGodPhase::Flower2Layer1),
            (300, WindGodPhase::Flower2Layer2),
            (360, WindGodPhase::Flower2Layer3),
            (420, WindGodPhase::Flower2Layer3),
            (421, WindGodPhase::Rest2),
            (479, WindGodPhase::Rest2),
            (10_000, WindGodPhase::Rest2),
        ];
        for (elapsed, expected) in cases {
            assert_eq!(phase_at(elapsed, &cfg), expected, "elapsed {elapsed}");
        }
        assert_eq!(cfg.cycle_frames(), 480);
    }

    #[test]
    fn test_transitions() {
        let cfg = WindGodConfig::default();
        assert_eq!(transition_at(60, &cfg), Some(Transition::Layer2));
        assert_eq!(transition_at(120, &cfg), Some(Transition::Layer3));
        assert_eq!(transition_at(180, &cfg), Some(Transition::Halt));
        assert_eq!(transition_at(240, &cfg), Some(Transition::Flower2));
        assert_eq!(transition_at(300, &cfg), Some(Transition::Flower2Layer2));
        assert_eq!(transition_at(360, &cfg), Some(Transition::Flower2Layer3));
        assert_eq!(transition_at(420, &cfg), Some(Transition::Halt));
        assert_eq!(transition_at(61, &cfg), None);
    }

    #[test]
    fn test_layer_params() {
        let cfg = WindGodConfig::default();
        let l1 = LayerParams::for_phase(WindGodPhase::Flower1Layer1, &cfg).map(|l| l.spawner_speed);
        let l3 = LayerParams::for_phase(WindGodPhase::Flower1Layer3, &cfg).map(|l| l.ratio);
        assert!((l1.unwrap_or_default() - 3.9).abs() < 1e-4);
        assert_eq!(l3, Some((2, 1)));
        assert_eq!(LayerParams::for_phase(WindGodPhase::Rest1, &cfg), None);
    }

    #[test]
    fn test_emission_alternates_two_and_one_rounds() {
        let mut god = wind_god();
        for _ in 0..4 {
            god.step();
        }
        // 5 spawners, then 2 + 1 + 2 + 1 rounds of 5 talismans
        assert_eq!(god.bullets().len(), 35);
        assert!(god.bullets()[..5].iter().all(|b| b.kind.is_spawner()));
        assert!(god.bullets()[5..].iter().all(|b| b.kind == BulletKind::Talisman));
        let waves = god.waves().map(|w| (w.sizes().to_vec(), w.open_count()));
        assert_eq!(waves, Some((vec![5], 30)));
    }

    #[test]
    fn test_layer_change_closes_wave() {
        let mut god = wind_god();
        for _ in 0..60 {
            god.step();
        }
        // Frames 1..=59 emit 89 rounds; frame 60 repositions instead
        let waves = god.waves().map(|w| (w.sizes().to_vec(), w.open_count()));
        assert_eq!(waves, Some((vec![5, 445], 0)));
        assert_eq!(god.phase(), WindGodPhase::Flower1Layer2);
    }

    #[test]
    fn test_spawners_survive_full_cycle() {
        let mut god = wind_god();
        for _ in 0..481 {
            god.step();
        }
        let bullets = god.bullets();
        assert!(bullets[..5].iter().all(|b| b.kind.is_spawner()));
        assert!(!bullets[5..].iter().any(|b| b.kind.is_spawner()));
        let waves = god.waves().map(|w| (w.sizes()[0], w.check_valid_waves(bullets.len())));
        assert_eq!(waves, Some((5, true)));
    }

    #[test]
    fn test_delete_all_then_restart() {
        let mut god = wind_god();
        for _ in 0..30 {
            god.step();
        }
        god.reset_pattern();
        god.delete_all_bullets();
        god.step();
        assert_eq!(god.bullets().len(), 15);
        assert_eq!(god.waves().map(|w| w.sizes().to_vec()), Some(vec![5]));
    }
}
