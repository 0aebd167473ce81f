//! Board events and snapshots sent to the frontend.

use comentaram_evidence::{EditorialBadge, TopicState};
use comentaram_feed::{
    format_delta_pct, state_label, wave_profile, Board, EvidenceLevel, Topic, TrendArrow,
    TrendPoint, TrendSeries, WaveProfile, DEFAULT_BOOST,
};
use serde::{Deserialize, Serialize};

use crate::simulation::SimulationMode;

/// Things that happen on the board, in step order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoardEvent {
    /// A topic moved between hot, steady and cool
    StateChanged {
        seq: u64,
        step: u64,
        topic: String,
        from: TopicState,
        to: TopicState,
    },

    /// A topic earned an editorial badge
    BadgeRaised {
        seq: u64,
        step: u64,
        topic: String,
        badge: EditorialBadge,
    },

    /// A topic lost its editorial badge
    BadgeCleared {
        seq: u64,
        step: u64,
        topic: String,
        badge: EditorialBadge,
    },

    /// The slow clock picked new rotation candidates
    RotationAdvanced {
        seq: u64,
        step: u64,
        rotation: u64,
    },
}

impl BoardEvent {
    /// Sequence number, unique and increasing.
    pub fn seq(&self) -> u64 {
        match self {
            BoardEvent::StateChanged { seq, .. } => *seq,
            BoardEvent::BadgeRaised { seq, .. } => *seq,
            BoardEvent::BadgeCleared { seq, .. } => *seq,
            BoardEvent::RotationAdvanced { seq, .. } => *seq,
        }
    }

    /// Step during which the event happened.
    pub fn step(&self) -> u64 {
        match self {
            BoardEvent::StateChanged { step, .. } => *step,
            BoardEvent::BadgeRaised { step, .. } => *step,
            BoardEvent::BadgeCleared { step, .. } => *step,
            BoardEvent::RotationAdvanced { step, .. } => *step,
        }
    }
}

/// The board at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub step: u64,
    pub rotation: u64,
    pub mode: SimulationMode,
    pub board: Board,
    pub featured: Option<String>,
}

/// Everything the detail sheet shows for one topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicDetail {
    pub topic: Topic,
    pub state_label: String,
    pub delta: String,
    pub arrow: TrendArrow,
    pub arrow_symbol: String,
    pub evidence_level: EvidenceLevel,
    pub evidence_label: String,
    pub badge: Option<EditorialBadge>,
    pub badge_label: Option<String>,
    pub series: Vec<TrendPoint>,
    pub boosted_percent: u8,
    pub liked: bool,
    pub wave: WaveProfile,
}

impl TopicDetail {
    /// Derive the detail view for a topic and its history.
    pub fn new(topic: &Topic, series: Option<&TrendSeries>, liked: bool) -> Self {
        let arrow = TrendArrow::from_growth(topic.growth());
        let level = EvidenceLevel::from_energy(topic.energy());
        let badge = topic.badge();
        Self {
            topic: topic.clone(),
            state_label: state_label(topic.state).to_string(),
            delta: format_delta_pct(topic.growth()),
            arrow,
            arrow_symbol: arrow.symbol().to_string(),
            evidence_level: level,
            evidence_label: level.label().to_string(),
            badge,
            badge_label: badge.map(|b| b.label().to_string()),
            series: series.map(|s| s.points().copied().collect()).unwrap_or_default(),
            boosted_percent: series.map(|s| s.boosted_percent(DEFAULT_BOOST)).unwrap_or(0),
            liked,
            wave: wave_profile(&topic.id, topic.state, topic.energy()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use comentaram_feed::Catalog;

    #[test]
    fn event_serialization() {
        let event = BoardEvent::StateChanged {
            seq: 7,
            step: 42,
            topic: "flamengo".into(),
            from: TopicState::Steady,
            to: TopicState::Hot,
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"state_changed\""));
        assert!(json.contains("\"to\":\"hot\""));

        let parsed: BoardEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.step(), 42);
        assert_eq!(parsed.seq(), 7);
    }

    #[test]
    fn detail_derives_view_values() {
        let catalog = Catalog::seed().unwrap();
        let topic = catalog.get("palmeiras").unwrap();
        let mut series = TrendSeries::new(4);
        series.push(0, 0.40);
        series.push(1, 0.50);

        let detail = TopicDetail::new(topic, Some(&series), true);
        assert_eq!(detail.state_label, "Estável");
        assert_eq!(detail.delta, "-8%");
        assert_eq!(detail.arrow, TrendArrow::Down);
        assert_eq!(detail.evidence_label, "Média");
        assert_eq!(detail.badge, None);
        assert_eq!(detail.series.len(), 2);
        assert_eq!(detail.boosted_percent, 24);
        assert!(detail.liked);
    }

    #[test]
    fn detail_without_history() {
        let catalog = Catalog::seed().unwrap();
        let detail = TopicDetail::new(catalog.get("stf").unwrap(), None, false);
        assert!(detail.series.is_empty());
        assert_eq!(detail.boosted_percent, 0);
    }
}
