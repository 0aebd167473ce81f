//! Evidence score and editorial badges.

use crate::params::EvidenceParams;
use crate::state::TopicState;

/// Editorial marker shown next to a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EditorialBadge {
    /// Hot topic with a high score
    TrendingNow,
    /// Cool topic with a low score
    LosingSteam,
}

impl EditorialBadge {
    /// Display text.
    pub const fn label(&self) -> &'static str {
        match self {
            EditorialBadge::TrendingNow => "Em alta agora",
            EditorialBadge::LosingSteam => "Perdendo força",
        }
    }
}

/// Composite ranking score in `[0, 100]`, using the default tuning.
///
/// ```
/// use comentaram_evidence::{compute_evidence_score, TopicState};
///
/// let score = compute_evidence_score(0.5, 0.03, TopicState::Steady);
/// assert!((score - 50.0).abs() < 1e-9);
/// ```
pub fn compute_evidence_score(energy: f64, growth: f64, state: TopicState) -> f64 {
    EvidenceParams::DEFAULT.evidence_score(energy, growth, state)
}

/// Badge for a score, using the default thresholds.
pub fn editorial_badge(score: f64, state: TopicState) -> Option<EditorialBadge> {
    EvidenceParams::DEFAULT.editorial_badge(score, state)
}

impl EvidenceParams {
    /// Map growth from its clamp range onto `[0, 1]`.
    pub fn normalize_growth(&self, growth: f64) -> f64 {
        let clamped = growth.clamp(self.growth_min, self.growth_max);
        (clamped - self.growth_min) / self.growth_span()
    }

    /// Composite ranking score in `[0, 100]`.
    pub fn evidence_score(&self, energy: f64, growth: f64, state: TopicState) -> f64 {
        let norm = self.normalize_growth(growth);
        let energy = energy.clamp(0.0, 1.0);
        let mut score = 100.0 * (self.growth_weight * norm + self.energy_weight * energy);
        match state {
            TopicState::Hot => score += self.hot_bonus,
            TopicState::Cool => score -= self.cool_penalty,
            TopicState::Steady => {}
        }
        score.clamp(0.0, 100.0)
    }

    /// Badge for a score, if any.
    pub fn editorial_badge(&self, score: f64, state: TopicState) -> Option<EditorialBadge> {
        match state {
            TopicState::Hot if score >= self.trending_badge_min => Some(EditorialBadge::TrendingNow),
            TopicState::Cool if score <= self.losing_badge_max => Some(EditorialBadge::LosingSteam),
            _ => None,
        }
    }
}
