//! Tunable constants for the evidence engine.
//!
//! None of these numbers are load-bearing: they were tuned by eye against the
//! board animation. What matters is the shape they describe, and
//! [`EvidenceParams::validate`] checks that shape.

use crate::error::{ParamsError, Result};

/// Every constant used by growth, classification, energy and scoring.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvidenceParams {
    /// Lower clamp for growth
    pub growth_min: f64,
    /// Upper clamp for growth
    pub growth_max: f64,

    /// Width of the per-topic baseline offset, centered on zero
    pub baseline_spread: f64,
    /// Wave frequency range (radians per tick)
    pub wave_freq_min: f64,
    pub wave_freq_span: f64,
    /// Wave amplitude range
    pub wave_amp_min: f64,
    pub wave_amp_span: f64,
    /// Shock amplitude range
    pub shock_amp_min: f64,
    pub shock_amp_span: f64,
    /// Frequency range of the slow wave gating shocks
    pub shock_freq_min: f64,
    pub shock_freq_span: f64,
    /// The slow wave must exceed this for a shock to fire
    pub shock_threshold: f64,

    /// Growth needed to enter hot
    pub hot_in: f64,
    /// Growth needed to stay hot
    pub hot_out: f64,
    /// Growth needed to enter cool
    pub cool_in: f64,
    /// Growth needed to stay cool
    pub cool_out: f64,

    /// Energy resting point
    pub energy_baseline: f64,
    /// Fixed push per step for hot/cool topics
    pub energy_increment: f64,
    /// Pull toward baseline for hot/cool topics, as a fraction of the gap
    pub energy_pull: f64,
    /// Relaxation toward baseline for steady topics, as a fraction of the gap
    pub energy_relax: f64,

    /// Weight of normalized growth in the score
    pub growth_weight: f64,
    /// Weight of energy in the score
    pub energy_weight: f64,
    /// Editorial bonus for hot topics (score points)
    pub hot_bonus: f64,
    /// Editorial penalty for cool topics (score points)
    pub cool_penalty: f64,
    /// Minimum score for the "trending now" badge
    pub trending_badge_min: f64,
    /// Maximum score for the "losing steam" badge
    pub losing_badge_max: f64,
}

impl EvidenceParams {
    /// The tuning used by the board.
    pub const DEFAULT: Self = Self {
        growth_min: -0.22,
        growth_max: 0.28,

        baseline_spread: 0.20,
        wave_freq_min: 0.08,
        wave_freq_span: 0.14,
        wave_amp_min: 0.06,
        wave_amp_span: 0.05,
        shock_amp_min: 0.06,
        shock_amp_span: 0.05,
        shock_freq_min: 0.011,
        shock_freq_span: 0.01,
        shock_threshold: 0.92,

        hot_in: 0.12,
        hot_out: 0.06,
        cool_in: -0.10,
        cool_out: -0.05,

        energy_baseline: 0.5,
        energy_increment: 0.010,
        energy_pull: 0.01,
        energy_relax: 0.03,

        growth_weight: 0.6,
        energy_weight: 0.4,
        hot_bonus: 6.0,
        cool_penalty: 4.0,
        trending_badge_min: 78.0,
        losing_badge_max: 22.0,
    };

    /// Check that the thresholds form a proper hysteresis band and that the
    /// rates and weights are usable.
    pub fn validate(&self) -> Result<()> {
        if !(self.growth_min < self.growth_max) {
            return Err(ParamsError::GrowthRange {
                min: self.growth_min,
                max: self.growth_max,
            });
        }
        if self.hot_out > self.hot_in {
            return Err(ParamsError::Band {
                state: "hot",
                enter: self.hot_in,
                exit: self.hot_out,
            });
        }
        if self.cool_out < self.cool_in {
            return Err(ParamsError::Band {
                state: "cool",
                enter: self.cool_in,
                exit: self.cool_out,
            });
        }
        if self.cool_out >= self.hot_out {
            return Err(ParamsError::OverlappingBands {
                cool_out: self.cool_out,
                hot_out: self.hot_out,
            });
        }
        for (name, value) in [
            ("energy_increment", self.energy_increment),
            ("energy_pull", self.energy_pull),
            ("energy_relax", self.energy_relax),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ParamsError::Rate { name, value });
            }
        }
        if !(0.0..=1.0).contains(&self.energy_baseline) {
            return Err(ParamsError::Rate {
                name: "energy_baseline",
                value: self.energy_baseline,
            });
        }
        let sum = self.growth_weight + self.energy_weight;
        if self.growth_weight < 0.0 || self.energy_weight < 0.0 || (sum - 1.0).abs() > 1e-9 {
            return Err(ParamsError::Weights {
                growth: self.growth_weight,
                energy: self.energy_weight,
            });
        }
        if !(-1.0..=1.0).contains(&self.shock_threshold) {
            return Err(ParamsError::ShockThreshold(self.shock_threshold));
        }
        Ok(())
    }

    /// Width of the growth range.
    pub fn growth_span(&self) -> f64 {
        self.growth_max - self.growth_min
    }
}

impl Default for EvidenceParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(EvidenceParams::default().validate().is_ok());
    }

    #[test]
    fn inverted_hot_band_rejected() {
        let params = EvidenceParams {
            hot_out: 0.2,
            ..EvidenceParams::DEFAULT
        };
        assert!(matches!(
            params.validate(),
            Err(ParamsError::Band { state: "hot", .. })
        ));
    }

    #[test]
    fn inverted_cool_band_rejected() {
        let params = EvidenceParams {
            cool_out: -0.2,
            ..EvidenceParams::DEFAULT
        };
        assert!(matches!(
            params.validate(),
            Err(ParamsError::Band { state: "cool", .. })
        ));
    }

    #[test]
    fn overlapping_bands_rejected() {
        let params = EvidenceParams {
            cool_in: -0.01,
            cool_out: 0.07,
            ..EvidenceParams::DEFAULT
        };
        assert!(matches!(
            params.validate(),
            Err(ParamsError::OverlappingBands { .. })
        ));
    }

    #[test]
    fn weights_must_sum_to_one() {
        let params = EvidenceParams {
            growth_weight: 0.7,
            ..EvidenceParams::DEFAULT
        };
        assert!(matches!(params.validate(), Err(ParamsError::Weights { .. })));
    }

    #[test]
    fn zero_rate_rejected() {
        let params = EvidenceParams {
            energy_relax: 0.0,
            ..EvidenceParams::DEFAULT
        };
        assert!(matches!(
            params.validate(),
            Err(ParamsError::Rate { name: "energy_relax", .. })
        ));
    }

    #[test]
    fn empty_growth_range_rejected() {
        let params = EvidenceParams {
            growth_min: 0.3,
            ..EvidenceParams::DEFAULT
        };
        assert!(matches!(params.validate(), Err(ParamsError::GrowthRange { .. })));
    }
}
