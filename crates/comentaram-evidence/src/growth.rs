//! Deterministic growth simulator.
//!
//! Growth is the sum of three terms, all derived from a generator seeded by
//! the topic id:
//!
//! - a fixed baseline offset
//! - a sine wave with per-topic frequency, phase and amplitude
//! - a rare shock, gated by a second, slower sine crossing a high threshold
//!
//! The generator is re-seeded on every call, so growth depends only on
//! `(topic_id, tick)`.

use std::f64::consts::TAU;

use crate::params::EvidenceParams;
use crate::rng::SeededRng;

/// Per-topic wave shape drawn from the seeded generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthProfile {
    pub baseline: f64,
    pub wave_freq: f64,
    pub wave_phase: f64,
    pub wave_amp: f64,
    pub shock_amp: f64,
    pub shock_freq: f64,
    pub shock_phase: f64,
}

impl GrowthProfile {
    /// Draw the profile for a topic. Draw order is part of the contract.
    pub fn for_topic(topic_id: &str, params: &EvidenceParams) -> Self {
        let mut rng = SeededRng::for_topic(topic_id);
        let baseline = (rng.next_f64() - 0.5) * params.baseline_spread;
        let wave_freq = rng.next_in(params.wave_freq_min, params.wave_freq_span);
        let wave_phase = rng.next_f64() * TAU;
        let wave_amp = rng.next_in(params.wave_amp_min, params.wave_amp_span);
        let shock_amp = rng.next_in(params.shock_amp_min, params.shock_amp_span);
        let shock_freq = rng.next_in(params.shock_freq_min, params.shock_freq_span);
        let shock_phase = rng.next_f64() * TAU;

        Self {
            baseline,
            wave_freq,
            wave_phase,
            wave_amp,
            shock_amp,
            shock_freq,
            shock_phase,
        }
    }

    /// Whether the shock term fires at `tick`.
    pub fn shock_active(&self, tick: u64, params: &EvidenceParams) -> bool {
        let t = tick as f64;
        (t * self.shock_freq + self.shock_phase).sin() > params.shock_threshold
    }

    /// Unclamped growth at `tick`.
    pub fn raw_growth(&self, tick: u64, params: &EvidenceParams) -> f64 {
        let t = tick as f64;
        let wave = self.wave_amp * (t * self.wave_freq + self.wave_phase).sin();
        let shock = if self.shock_active(tick, params) {
            self.shock_amp
        } else {
            0.0
        };
        self.baseline + wave + shock
    }
}

/// Simulated growth for a topic at a tick, using the default tuning.
///
/// ```
/// use comentaram_evidence::simulate_growth;
///
/// let g = simulate_growth("flamengo", 0);
/// assert_eq!(g.to_bits(), simulate_growth("flamengo", 0).to_bits());
/// assert!((-0.22..=0.28).contains(&g));
/// ```
pub fn simulate_growth(topic_id: &str, tick: u64) -> f64 {
    EvidenceParams::DEFAULT.simulate_growth(topic_id, tick)
}

impl EvidenceParams {
    /// Simulated growth for a topic at a tick, clamped to the growth range.
    pub fn simulate_growth(&self, topic_id: &str, tick: u64) -> f64 {
        GrowthProfile::for_topic(topic_id, self)
            .raw_growth(tick, self)
            .clamp(self.growth_min, self.growth_max)
    }
}
