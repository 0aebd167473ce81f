//! The in-memory topic catalog.
//!
//! Built once at startup from a literal list; topics are never added or
//! removed afterwards. Topic order is category order, then declaration order,
//! which is also the rotation order used by the legacy board.

use std::collections::{HashMap, HashSet};

use crate::error::{Error, Result};
use crate::topic::{Category, Topic, TopicSeed};

/// Topics grouped by category.
#[derive(Debug, Clone)]
pub struct Catalog {
    categories: Vec<Category>,
    topics: Vec<Topic>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog, rejecting empty and duplicate ids.
    pub fn new(blocks: Vec<(Category, Vec<TopicSeed>)>) -> Result<Self> {
        let mut category_ids = HashSet::new();
        let mut categories = Vec::with_capacity(blocks.len());
        let mut topics = Vec::new();
        let mut index = HashMap::new();

        for (category, seeds) in blocks {
            if category.id.is_empty() {
                return Err(Error::EmptyId("category"));
            }
            if !category_ids.insert(category.id.clone()) {
                return Err(Error::DuplicateCategory(category.id));
            }
            for seed in &seeds {
                if seed.id.is_empty() {
                    return Err(Error::EmptyId("topic"));
                }
                if index.contains_key(&seed.id) {
                    return Err(Error::DuplicateTopic(seed.id.clone()));
                }
                index.insert(seed.id.clone(), topics.len());
                topics.push(Topic::from_seed(seed, &category));
            }
            categories.push(category);
        }

        Ok(Self {
            categories,
            topics,
            index,
        })
    }

    /// The built-in mock catalog.
    pub fn seed() -> Result<Self> {
        Self::new(seed_blocks())
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn topics_mut(&mut self) -> &mut [Topic] {
        &mut self.topics
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Look up a topic by id.
    pub fn get(&self, id: &str) -> Option<&Topic> {
        self.index.get(id).map(|&i| &self.topics[i])
    }

    /// Look up a topic by id, failing with [`Error::UnknownTopic`].
    pub fn require(&self, id: &str) -> Result<&Topic> {
        self.get(id).ok_or_else(|| Error::UnknownTopic(id.to_string()))
    }

    /// Indices into [`Catalog::topics`] for one category, in declaration order.
    pub fn members(&self, category: &Category) -> Vec<usize> {
        self.topics
            .iter()
            .enumerate()
            .filter(|(_, t)| t.category_id == category.id)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Literal seed data for the mock board.
pub fn seed_blocks() -> Vec<(Category, Vec<TopicSeed>)> {
    vec![
        (
            Category::new("esportes", "ESPORTES"),
            vec![
                TopicSeed::new("flamengo", "Flamengo", 0.55, 0.12),
                TopicSeed::new("palmeiras", "Palmeiras", 0.48, -0.08),
                TopicSeed::new("corinthians", "Corinthians", 0.5, 0.05),
                TopicSeed::new("selecao", "Seleção Brasileira", 0.45, 0.18),
                TopicSeed::new("ufc", "UFC", 0.44, -0.04),
                TopicSeed::new("mcgregor", "McGregor", 0.35, 0.22),
                TopicSeed::new("futebol-mundial", "Futebol Mundial", 0.52, 0.11),
            ],
        ),
        (
            Category::new("politica", "POLÍTICA"),
            vec![
                TopicSeed::new("presidencia", "Presidência", 0.56, 0.14),
                TopicSeed::new("congresso", "Congresso", 0.5, -0.06),
                TopicSeed::new("stf", "STF", 0.48, 0.03),
                TopicSeed::new("eleicoes-2026", "Eleições 2026", 0.5, 0.19),
                TopicSeed::new("gastos-publicos", "Gastos Públicos", 0.42, -0.09),
            ],
        ),
    ]
}
