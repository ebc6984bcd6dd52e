use anyhow::Result;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;

use crate::collector::{collect, Collection, CollectOptions};
use crate::config::Config;
use crate::inference::{build_sources, ScoreSource};
use crate::scoring::{calculate_score, Category, CategoryContribution, ScoreSet, WeightMap};

pub const NO_DATA_ERROR: &str = "No category data available";

/// Result handed back to the caller for one analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisOutcome {
    pub overall_score: f64,
    pub weights_used: WeightMap,
    pub per_category: ScoreSet,
    pub errors: Vec<String>,
    pub breakdown: Vec<CategoryContribution>,
    pub timestamp: DateTime<Utc>,
}

impl AnalysisOutcome {
    /// False when no category produced data and the score is meaningless
    pub fn has_data(&self) -> bool {
        !self.per_category.is_empty()
    }

    /// True when a category that carries weight has no reading, so the score
    /// was normalized over a subset
    pub fn is_partial(&self) -> bool {
        Category::ALL.into_iter().any(|c| {
            self.weights_used.get(c) > 0.0 && self.per_category.get(c).is_none()
        })
    }
}

/// Score a finished collection.
///
/// When nothing produced data and no source explained why (every source
/// disabled, or none configured), an explicit error is added so a 0.0 is
/// never presented as a genuine score.
pub fn build_outcome(collection: Collection, weights: &WeightMap) -> AnalysisOutcome {
    let result = calculate_score(&collection.scores, weights);
    let mut errors = collection.errors;
    if collection.scores.is_empty() && errors.is_empty() {
        errors.push(NO_DATA_ERROR.to_string());
    }

    AnalysisOutcome {
        overall_score: result.overall,
        weights_used: result.weights_used,
        per_category: collection.scores,
        errors,
        breakdown: result.breakdown,
        timestamp: Utc::now(),
    }
}

/// Long-lived analysis pipeline: the sources and collector options are fixed
/// at startup and reused for every request. The weight policy follows
/// `options.thermal_enabled`, so the two can never disagree.
pub struct Analyzer {
    sources: Vec<Arc<dyn ScoreSource>>,
    options: CollectOptions,
    weights: WeightMap,
}

impl Analyzer {
    pub fn new(sources: Vec<Arc<dyn ScoreSource>>, options: CollectOptions) -> Self {
        Self {
            sources,
            weights: WeightMap::for_hardware(options.thermal_enabled),
            options,
        }
    }

    pub fn from_config(config: &Config, client: &Client) -> Result<Self> {
        Ok(Self::new(
            build_sources(config, client),
            CollectOptions::from_config(config)?,
        ))
    }

    pub fn weights(&self) -> &WeightMap {
        &self.weights
    }

    /// Fan out to every source, then score whatever came back.
    pub async fn run(&self) -> AnalysisOutcome {
        let collection = collect(&self.sources, &self.options).await;
        build_outcome(collection, &self.weights)
    }
}
