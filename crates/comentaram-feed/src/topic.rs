//! Topic model.
//!
//! A topic is the unit of simulation. Only `state`, `energy`, `growth` and
//! `evidence_score` change after creation, and the setters clamp every write
//! so floating-point drift cannot leave the documented ranges.

use comentaram_evidence::{clamp01, editorial_badge, EditorialBadge, EvidenceParams, TopicState};
use serde::{Deserialize, Serialize};

/// A fixed topic grouping such as sports or politics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    /// Stable identifier
    pub id: String,
    /// Display title
    pub title: String,
}

impl Category {
    /// Create a new category.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// Literal declaration of a topic in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicSeed {
    pub id: String,
    pub label: String,
    pub energy: f64,
    pub growth: f64,
}

impl TopicSeed {
    pub fn new(id: impl Into<String>, label: impl Into<String>, energy: f64, growth: f64) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            energy,
            growth,
        }
    }
}

/// A trending subject on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TopicRecord")]
pub struct Topic {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub label: String,
    /// Id of the enclosing category
    pub category_id: String,
    /// Title of the enclosing category, for display and search
    pub category: String,
    /// Current momentum state
    pub state: TopicState,
    energy: f64,
    growth: f64,
    evidence_score: Option<f64>,
}

/// Wire form of a [`Topic`]. Decoding goes through the clamping setters.
#[derive(Deserialize)]
struct TopicRecord {
    id: String,
    label: String,
    category_id: String,
    category: String,
    state: TopicState,
    energy: f64,
    growth: f64,
    evidence_score: Option<f64>,
}

impl From<TopicRecord> for Topic {
    fn from(record: TopicRecord) -> Self {
        let mut topic = Topic {
            id: record.id,
            label: record.label,
            category_id: record.category_id,
            category: record.category,
            state: record.state,
            energy: 0.0,
            growth: 0.0,
            evidence_score: None,
        };
        topic.set_energy(record.energy);
        topic.set_growth(record.growth, &EvidenceParams::DEFAULT);
        topic.set_evidence_score(record.evidence_score);
        topic
    }
}

impl Topic {
    /// Create a steady topic from its seed.
    pub fn from_seed(seed: &TopicSeed, category: &Category) -> Self {
        let params = EvidenceParams::DEFAULT;
        Self {
            id: seed.id.clone(),
            label: seed.label.clone(),
            category_id: category.id.clone(),
            category: category.title.clone(),
            state: TopicState::Steady,
            energy: clamp01(seed.energy),
            growth: seed.growth.clamp(params.growth_min, params.growth_max),
            evidence_score: None,
        }
    }

    /// Accumulated intensity in `[0, 1]`.
    pub fn energy(&self) -> f64 {
        self.energy
    }

    /// Short-term momentum.
    pub fn growth(&self) -> f64 {
        self.growth
    }

    /// Ranking score in `[0, 100]`, once computed.
    pub fn evidence_score(&self) -> Option<f64> {
        self.evidence_score
    }

    pub fn set_energy(&mut self, energy: f64) {
        self.energy = clamp01(energy);
    }

    pub fn set_growth(&mut self, growth: f64, params: &EvidenceParams) {
        self.growth = growth.clamp(params.growth_min, params.growth_max);
    }

    pub fn set_evidence_score(&mut self, score: Option<f64>) {
        self.evidence_score = score.map(|s| s.clamp(0.0, 100.0));
    }

    /// Ranking key: the evidence score, or energy on the same scale when no
    /// score has been computed yet.
    pub fn rank_key(&self) -> f64 {
        self.evidence_score.unwrap_or(self.energy * 100.0)
    }

    /// Editorial badge, derived from score and state.
    pub fn badge(&self) -> Option<EditorialBadge> {
        self.evidence_score
            .and_then(|score| editorial_badge(score, self.state))
    }
}
