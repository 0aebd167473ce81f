//! Comentaram Evidence Engine
//!
//! Deterministic signals behind the trending board. Nothing here performs
//! I/O and every function is total over its input domain.
//!
//! # Pipeline
//!
//! Each step, for each topic:
//!
//! 1. `growth = simulate_growth(id, tick)` - seeded wave plus rare shocks
//! 2. `state = classify_state(growth, previous_state)` - hysteresis band
//! 3. `energy = step_energy(energy, state)` - inertia toward 0.5
//! 4. `score = compute_evidence_score(energy, growth, state)` - ranking scalar
//!
//! # Determinism
//!
//! Growth depends only on `(id, tick)`: the generator is seeded from a 32-bit
//! rolling hash of the id and re-created on every call. Replaying the same
//! ticks reproduces the same board bit for bit.
//!
//! # Tuning
//!
//! All constants live in [`EvidenceParams`]. The free functions use
//! [`EvidenceParams::DEFAULT`].

mod energy;
mod error;
mod growth;
mod params;
mod rng;
mod rotation;
mod score;
mod state;

pub use energy::{clamp01, step_energy};
pub use error::{ParamsError, Result};
pub use growth::{simulate_growth, GrowthProfile};
pub use params::EvidenceParams;
pub use rng::{hash32, SeededRng};
pub use rotation::{rotation_picks, ROTATION_COOL_DECREMENT, ROTATION_HOT_INCREMENT, ROTATION_RELAX};
pub use score::{compute_evidence_score, editorial_badge, EditorialBadge};
pub use state::{classify_state, TopicState};
