//! Topic states and the hysteresis classifier.
//!
//! Entry thresholds are stricter than exit thresholds:
//!
//! ```text
//!   cool_in   cool_out              hot_out   hot_in
//!  ---|---------|---------------------|---------|--->  growth
//!   -0.10     -0.05                  0.06      0.12
//! ```
//!
//! A steady topic must reach `hot_in` to become hot, but a hot topic stays
//! hot until growth drops below `hot_out`. Leaving hot or cool always lands
//! on steady, never on the opposite state.

use crate::params::EvidenceParams;

/// Categorical momentum of a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TopicState {
    /// Gaining attention
    Hot,
    /// Neither gaining nor losing
    #[default]
    Steady,
    /// Losing attention
    Cool,
}

impl TopicState {
    /// All states in board order (hot, cool, steady).
    pub const BOARD_ORDER: [Self; 3] = [Self::Hot, Self::Cool, Self::Steady];

    /// Lowercase name used on the wire and in logs.
    pub const fn as_str(&self) -> &'static str {
        match self {
            TopicState::Hot => "hot",
            TopicState::Steady => "steady",
            TopicState::Cool => "cool",
        }
    }
}

impl std::fmt::Display for TopicState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify growth into a state, using the default thresholds.
///
/// ```
/// use comentaram_evidence::{classify_state, TopicState};
///
/// assert_eq!(classify_state(0.12, Some(TopicState::Steady)), TopicState::Hot);
/// assert_eq!(classify_state(0.07, Some(TopicState::Hot)), TopicState::Hot);
/// assert_eq!(classify_state(0.07, Some(TopicState::Steady)), TopicState::Steady);
/// ```
pub fn classify_state(growth: f64, previous: Option<TopicState>) -> TopicState {
    EvidenceParams::DEFAULT.classify_state(growth, previous)
}

impl EvidenceParams {
    /// Classify growth into a state with these thresholds.
    pub fn classify_state(&self, growth: f64, previous: Option<TopicState>) -> TopicState {
        match previous {
            Some(TopicState::Hot) => {
                if growth >= self.hot_out {
                    TopicState::Hot
                } else {
                    TopicState::Steady
                }
            }
            Some(TopicState::Cool) => {
                if growth <= self.cool_out {
                    TopicState::Cool
                } else {
                    TopicState::Steady
                }
            }
            Some(TopicState::Steady) | None => {
                if growth >= self.hot_in {
                    TopicState::Hot
                } else if growth <= self.cool_in {
                    TopicState::Cool
                } else {
                    TopicState::Steady
                }
            }
        }
    }
}
