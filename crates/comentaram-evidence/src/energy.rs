//! Energy inertia.
//!
//! Energy is the slow-moving "mass" of a topic. Hot topics are pushed up by a
//! fixed increment, cool topics pushed down, and both feel a weak pull back
//! toward the baseline. Steady topics relax toward the baseline by a fixed
//! fraction of the remaining gap, so they approach it without overshooting.

use crate::params::EvidenceParams;
use crate::state::TopicState;

/// Clamp to `[0, 1]`.
pub fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Advance energy one step, using the default tuning.
///
/// ```
/// use comentaram_evidence::{step_energy, TopicState};
///
/// let e = step_energy(0.9, TopicState::Steady);
/// assert!(e < 0.9 && e > 0.5);
/// ```
pub fn step_energy(previous: f64, state: TopicState) -> f64 {
    EvidenceParams::DEFAULT.step_energy(previous, state)
}

impl EvidenceParams {
    /// Advance energy one step with these rates.
    pub fn step_energy(&self, previous: f64, state: TopicState) -> f64 {
        let e = clamp01(previous);
        let gap = self.energy_baseline - e;
        let next = match state {
            TopicState::Hot => e + self.energy_increment + gap * self.energy_pull,
            TopicState::Cool => e - self.energy_increment + gap * self.energy_pull,
            TopicState::Steady => e + gap * self.energy_relax,
        };
        clamp01(next)
    }
}
