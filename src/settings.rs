//! Scenario settings
//!
//! A scenario is a seed, a playfield and an ordered list of patterns, stored
//! as JSON. Every tunable has a default, so a file only needs to name what it
//! changes.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::SCREEN_BOUNDS;
use crate::sim::patterns::*;
use crate::sim::{Bounds, ManualPattern, Pattern, PatternManager, PatternParams};

/// Constructor values shared by every pattern kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnParams {
    pub source: Vec2,
    pub stream_count: u32,
    /// Shots per second; 0 fires once
    pub shot_frequency: f32,
    pub base_speed: f32,
}

impl Default for SpawnParams {
    fn default() -> Self {
        Self {
            source: SCREEN_BOUNDS.center(),
            stream_count: 0,
            shot_frequency: 0.0,
            base_speed: 0.0,
        }
    }
}

impl SpawnParams {
    pub fn new(source: Vec2, stream_count: u32, shot_frequency: f32, base_speed: f32) -> Self {
        Self {
            source,
            stream_count,
            shot_frequency,
            base_speed,
        }
    }

    pub fn to_pattern_params(self, playfield: Bounds, seed: u64) -> PatternParams {
        PatternParams::new(self.source, self.stream_count, self.shot_frequency, self.base_speed)
            .with_playfield(playfield)
            .with_seed(seed)
    }
}

/// One pattern in a scenario, tagged by `"kind"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PatternSpec {
    Manual {
        #[serde(default)]
        params: SpawnParams,
    },
    Bowap {
        #[serde(default)]
        params: SpawnParams,
        #[serde(default)]
        config: BowapConfig,
    },
    QedRipples {
        #[serde(default)]
        params: SpawnParams,
        #[serde(default)]
        config: QedRipplesConfig,
    },
    FlyingSaucer {
        #[serde(default)]
        params: SpawnParams,
        #[serde(default)]
        config: FlyingSaucerConfig,
    },
    GengetsuTime {
        #[serde(default)]
        params: SpawnParams,
        #[serde(default)]
        config: GengetsuTimeConfig,
    },
    WindGod {
        #[serde(default)]
        params: SpawnParams,
        #[serde(default)]
        config: WindGodConfig,
    },
    MercuryPoison {
        #[serde(default)]
        params: SpawnParams,
        #[serde(default)]
        config: MercuryPoisonConfig,
    },
    SeamlessCeiling {
        #[serde(default)]
        params: SpawnParams,
        #[serde(default)]
        config: SeamlessCeilingConfig,
    },
}

impl PatternSpec {
    pub fn params(&self) -> SpawnParams {
        match self {
            PatternSpec::Manual { params }
            | PatternSpec::Bowap { params, .. }
            | PatternSpec::QedRipples { params, .. }
            | PatternSpec::FlyingSaucer { params, .. }
            | PatternSpec::GengetsuTime { params, .. }
            | PatternSpec::WindGod { params, .. }
            | PatternSpec::MercuryPoison { params, .. }
            | PatternSpec::SeamlessCeiling { params, .. } => *params,
        }
    }

    /// Construct the pattern this entry describes
    pub fn build(&self, params: PatternParams) -> Box<dyn Pattern> {
        match self {
            PatternSpec::Manual { .. } => Box::new(ManualPattern::new(params)),
            PatternSpec::Bowap { config, .. } => Box::new(Bowap::new(params, *config)),
            PatternSpec::QedRipples { config, .. } => Box::new(QedRipples::new(params, *config)),
            PatternSpec::FlyingSaucer { config, .. } => {
                Box::new(FlyingSaucer::new(params, config.clone()))
            }
            PatternSpec::GengetsuTime { config, .. } => {
                Box::new(GengetsuTime::new(params, *config))
            }
            PatternSpec::WindGod { config, .. } => Box::new(WindGod::new(params, config.clone())),
            PatternSpec::MercuryPoison { config, .. } => {
                Box::new(MercuryPoison::new(params, *config))
            }
            PatternSpec::SeamlessCeiling { config, .. } => {
                Box::new(SeamlessCeiling::new(params, *config))
            }
        }
    }
}

/// A complete scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Pattern `i` is seeded with `seed + i`
    pub seed: u64,
    pub playfield: Bounds,
    /// Update and draw order; index 0 survives global resets
    pub patterns: Vec<PatternSpec>,
}

impl Default for Settings {
    /// Demo scenario: the test pattern followed by one of every choreography
    fn default() -> Self {
        let spawn = |x: f32, y: f32, count: u32, frequency: f32, speed: f32| {
            SpawnParams::new(Vec2::new(x, y), count, frequency, speed)
        };
        Self {
            seed: 1,
            playfield: SCREEN_BOUNDS,
            patterns: vec![
                PatternSpec::Manual {
                    params: SpawnParams::default(),
                },
                PatternSpec::Bowap {
                    params: spawn(410.0, 300.0, 8, 10.0, 4.0),
                    config: BowapConfig::default(),
                },
                PatternSpec::QedRipples {
                    params: spawn(410.0, 200.0, 24, 1.0, 2.5),
                    config: QedRipplesConfig::default(),
                },
                PatternSpec::FlyingSaucer {
                    params: spawn(410.0, 250.0, 12, 0.5, 2.0),
                    config: FlyingSaucerConfig::default(),
                },
                PatternSpec::GengetsuTime {
                    params: spawn(410.0, 200.0, 20, 3.0, 5.0),
                    config: GengetsuTimeConfig::default(),
                },
                PatternSpec::WindGod {
                    params: spawn(410.0, 300.0, 0, 0.0, 3.0),
                    config: WindGodConfig::default(),
                },
                PatternSpec::MercuryPoison {
                    params: spawn(410.0, 250.0, 16, 5.0, 2.0),
                    config: MercuryPoisonConfig::default(),
                },
                PatternSpec::SeamlessCeiling {
                    params: spawn(410.0, 150.0, 6, 0.25, 2.5),
                    config: SeamlessCeilingConfig::default(),
                },
            ],
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load a scenario file, falling back to the demo scenario on any error
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not read {}: {}; using default scenario", path.display(), e);
                return Self::default();
            }
        };
        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded scenario from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Invalid scenario {}: {}; using default scenario", path.display(), e);
                Self::default()
            }
        }
    }

    /// Build every pattern in order and hand them to a new manager
    pub fn build_manager(&self) -> PatternManager {
        let mut manager = PatternManager::new();
        for (i, spec) in self.patterns.iter().enumerate() {
            let seed = self.seed.wrapping_add(i as u64);
            let params = spec.params().to_pattern_params(self.playfield, seed);
            manager.add_pattern(spec.build(params));
        }
        log::info!("Built scenario with {} patterns (seed {})", manager.len(), self.seed);
        manager
    }
}
