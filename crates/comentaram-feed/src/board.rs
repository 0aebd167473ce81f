//! Board view: search, grouping by state, ranking and likes.
//!
//! The board is always derived from the current topics; nothing here is
//! stored back on a topic.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use comentaram_evidence::TopicState;
use serde::{Deserialize, Serialize};

use crate::topic::Topic;

/// Case-insensitive match on label or category title. A blank query matches
/// everything.
pub fn matches(topic: &Topic, query: &str) -> bool {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return true;
    }
    topic.label.to_lowercase().contains(&q) || topic.category.to_lowercase().contains(&q)
}

/// Topics matching `query`, in catalog order.
pub fn search<'a>(topics: &'a [Topic], query: &str) -> Vec<&'a Topic> {
    topics.iter().filter(|t| matches(t, query)).collect()
}

fn by_rank(a: &Topic, b: &Topic) -> Ordering {
    b.rank_key()
        .total_cmp(&a.rank_key())
        .then_with(|| a.id.cmp(&b.id))
}

/// Topics grouped by state, each group ranked best first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub query: String,
    pub hot: Vec<Topic>,
    pub cool: Vec<Topic>,
    pub steady: Vec<Topic>,
}

impl Board {
    /// Filter and group topics.
    pub fn build(topics: &[Topic], query: &str) -> Self {
        let mut board = Board {
            query: query.trim().to_string(),
            ..Default::default()
        };
        for topic in search(topics, query) {
            board.group_mut(topic.state).push(topic.clone());
        }
        board.hot.sort_by(by_rank);
        board.cool.sort_by(by_rank);
        board.steady.sort_by(by_rank);
        board
    }

    /// Topics in one state group.
    pub fn group(&self, state: TopicState) -> &[Topic] {
        match state {
            TopicState::Hot => &self.hot,
            TopicState::Cool => &self.cool,
            TopicState::Steady => &self.steady,
        }
    }

    fn group_mut(&mut self, state: TopicState) -> &mut Vec<Topic> {
        match state {
            TopicState::Hot => &mut self.hot,
            TopicState::Cool => &mut self.cool,
            TopicState::Steady => &mut self.steady,
        }
    }

    /// Rendered order: hot, then cool, then steady.
    pub fn flat(&self) -> Vec<&Topic> {
        TopicState::BOARD_ORDER
            .iter()
            .flat_map(|&s| self.group(s).iter())
            .collect()
    }

    /// Ids in rendered order.
    pub fn flat_ids(&self) -> Vec<String> {
        self.flat().into_iter().map(|t| t.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.hot.len() + self.cool.len() + self.steady.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Per-topic like toggles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Likes {
    liked: BTreeSet<String>,
}

impl Likes {
    /// Flip the like for `id`; returns the new state.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.liked.remove(id) {
            false
        } else {
            self.liked.insert(id.to_string());
            true
        }
    }

    pub fn is_liked(&self, id: &str) -> bool {
        self.liked.contains(id)
    }

    pub fn count(&self) -> usize {
        self.liked.len()
    }
}
