//! Concrete bullet choreographies
//!
//! Each pattern pairs a [`PatternCore`](super::pattern::PatternCore) with a
//! serde-friendly config struct of tunables.

pub mod bowap;
pub mod flying_saucer;
pub mod gengetsu_time;
pub mod mercury_poison;
pub mod qed_ripples;
pub mod seamless_ceiling;
pub mod wind_god;

pub use bowap::{Bowap, BowapConfig};
pub use flying_saucer::{FlyingSaucer, FlyingSaucerConfig, TargetRadiusCache, target_radius};
pub use gengetsu_time::{GengetsuTime, GengetsuTimeConfig};
pub use mercury_poison::{MercuryPoison, MercuryPoisonConfig};
pub use qed_ripples::{QedRipples, QedRipplesConfig};
pub use seamless_ceiling::{SeamlessCeiling, SeamlessCeilingConfig};
pub use wind_god::{
    LayerParams, Transition, WindGod, WindGodConfig, WindGodPhase, phase_at, transition_at,
};
