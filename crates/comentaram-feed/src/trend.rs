//! Presentation values derived from a topic: labels, arrows, evidence level,
//! short history series and the seeded wave profile drawn under featured
//! cards.

use std::collections::VecDeque;

use comentaram_evidence::{clamp01, SeededRng, TopicState};
use serde::{Deserialize, Serialize};

/// Default amplification for [`TrendSeries::boosted_percent`].
pub const DEFAULT_BOOST: f64 = 2.4;

/// Number of bars in a wave profile.
pub const WAVE_BARS: usize = 26;

/// Human label for a state.
pub const fn state_label(state: TopicState) -> &'static str {
    match state {
        TopicState::Hot => "Aquecendo",
        TopicState::Cool => "Esfriando",
        TopicState::Steady => "Estável",
    }
}

/// Round half up, matching how the board has always displayed percentages.
fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Growth as a signed whole percentage: `+12%`, `-8%`, `0%`.
pub fn format_delta_pct(growth: f64) -> String {
    let pct = round_half_up(growth * 100.0) as i64;
    if pct > 0 {
        format!("+{}%", pct)
    } else {
        format!("{}%", pct)
    }
}

/// Direction glyph for a growth value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendArrow {
    SharpUp,
    Up,
    Flat,
    Down,
    SharpDown,
}

impl TrendArrow {
    pub fn from_growth(growth: f64) -> Self {
        if growth > 0.5 {
            TrendArrow::SharpUp
        } else if growth < -0.5 {
            TrendArrow::SharpDown
        } else if growth > 0.0 {
            TrendArrow::Up
        } else if growth < 0.0 {
            TrendArrow::Down
        } else {
            TrendArrow::Flat
        }
    }

    pub const fn symbol(&self) -> &'static str {
        match self {
            TrendArrow::SharpUp => "↑",
            TrendArrow::Up => "↗",
            TrendArrow::Flat => "→",
            TrendArrow::Down => "↘",
            TrendArrow::SharpDown => "↓",
        }
    }
}

/// Coarse evidence bucket from energy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceLevel {
    High,
    Medium,
    Low,
}

impl EvidenceLevel {
    pub fn from_energy(energy: f64) -> Self {
        let v = clamp01(energy);
        if v >= 0.72 {
            EvidenceLevel::High
        } else if v >= 0.45 {
            EvidenceLevel::Medium
        } else {
            EvidenceLevel::Low
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            EvidenceLevel::High => "Alta",
            EvidenceLevel::Medium => "Média",
            EvidenceLevel::Low => "Baixa",
        }
    }
}

/// One sample of a topic's history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub tick: u64,
    /// Sampled value in `[0, 1]`
    pub value: f64,
}

/// Bounded history of samples, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSeries {
    capacity: usize,
    points: VecDeque<TrendPoint>,
}

impl TrendSeries {
    /// Create an empty series holding at most `capacity` points (at least 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            points: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a sample, evicting the oldest when full.
    pub fn push(&mut self, tick: u64, value: f64) {
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(TrendPoint {
            tick,
            value: clamp01(value),
        });
    }

    pub fn points(&self) -> impl Iterator<Item = &TrendPoint> {
        self.points.iter()
    }

    pub fn first(&self) -> Option<&TrendPoint> {
        self.points.front()
    }

    pub fn last(&self) -> Option<&TrendPoint> {
        self.points.back()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change between first and last sample, amplified and expressed as a
    /// whole percentage in `[0, 100]`.
    pub fn boosted_percent(&self, boost: f64) -> u8 {
        let (Some(first), Some(last)) = (self.first(), self.last()) else {
            return 0;
        };
        let delta = (last.value - first.value).abs();
        round_half_up(delta * 100.0 * boost).clamp(0.0, 100.0) as u8
    }
}

/// One bar of the wave drawn under a featured card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveBar {
    /// Resting height as a percentage of the box
    pub height_pct: u8,
    /// Animation delay in milliseconds
    pub delay_ms: f64,
    /// Phase skew, alternating sign
    pub phase: f64,
}

/// Animation parameters for a wave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveProfile {
    pub duration_ms: u32,
    pub amplitude: f64,
    pub bars: Vec<WaveBar>,
}

/// Seeded bar profile for a topic. Hot topics ramp up to the right, cool
/// topics ramp down, steady topics stay level with a little texture.
pub fn wave_profile(id: &str, state: TopicState, energy: f64) -> WaveProfile {
    let (duration_ms, amplitude) = match state {
        TopicState::Hot => (1400, 0.16),
        TopicState::Cool => (1700, 0.10),
        TopicState::Steady => (2200, 0.06),
    };
    let base_level = 0.18 + clamp01(energy) * 0.70;
    let mut rng = SeededRng::for_topic(id);

    let bars = (0..WAVE_BARS)
        .map(|i| {
            let t = i as f64 / (WAVE_BARS - 1) as f64;
            let ramp = match state {
                TopicState::Hot => 0.30 + t * 0.90,
                TopicState::Cool => 1.20 - t * 0.90,
                TopicState::Steady => 0.78 + (rng.next_f64() * 0.06 - 0.03),
            };
            let jitter = rng.next_f64() * 0.05 - 0.025;
            let height_pct = round_half_up(clamp01(base_level * ramp + jitter) * 100.0) as u8;
            let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
            let phase = sign * (0.22 + rng.next_f64() * 0.22);
            WaveBar {
                height_pct,
                delay_ms: i as f64 * 22.0,
                phase,
            }
        })
        .collect();

    WaveProfile {
        duration_ms,
        amplitude,
        bars,
    }
}
