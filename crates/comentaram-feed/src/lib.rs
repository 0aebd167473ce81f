//! Comentaram Feed
//!
//! The board's data model and the pure view policies built on it.
//!
//! - **Catalog**: the fixed set of categories and topics created at startup
//! - **Board**: search, grouping into hot / cool / steady, ranking, likes
//! - **Trend**: labels, arrows, short history series, seeded wave bars
//! - **Featured**: which card is promoted under the sticky header
//!
//! Everything here is synchronous and side-effect free. The simulation that
//! mutates topics lives in `comentaram-board`.

mod board;
mod catalog;
mod error;
mod featured;
mod topic;
mod trend;

pub use board::{matches, search, Board, Likes};
pub use catalog::{seed_blocks, Catalog};
pub use error::{Error, Result};
pub use featured::{
    compute_featured, target_line, Candidate, CardRect, FeaturedChange, FeaturedSelector,
    FrameGuard, TARGET_OFFSET,
};
pub use topic::{Category, Topic, TopicSeed};
pub use trend::{
    format_delta_pct, state_label, wave_profile, EvidenceLevel, TrendArrow, TrendPoint,
    TrendSeries, WaveBar, WaveProfile, DEFAULT_BOOST, WAVE_BARS,
};

pub use comentaram_evidence::{EditorialBadge, TopicState};
