pub mod config;
pub mod engine;
pub mod types;

pub use config::WeightMap;
pub use engine::{calculate_score, CategoryContribution, ScoreResult};
pub use types::{Category, ScoreSet};
