//! # dashclaw-learning
//!
//! The learning loop: deterministic episode scoring and per-(agent,
//! action_type) behavior recommendations mined from scored history.
//!
//! Everything here is pure computation over caller-supplied episodes.

#![deny(unsafe_code)]

pub mod episode;
pub mod recommend;

pub use episode::{score_action_episode, EpisodeScore, OutcomeLabel, ScoreBreakdown};
pub use recommend::{
    build_recommendations_from_episodes, EpisodeRecord, Recommendation, RecommendationHints,
    RecommendationOptions,
};
