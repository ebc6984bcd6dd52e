use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::inference::{Reading, ScoreSource, SourceError};
use crate::scoring::{Category, ScoreSet};

/// Outcome of polling one source
#[derive(Debug)]
pub enum CategoryReading {
    Available(f64),
    /// Feature switched off (ghost service). Not an error.
    Disabled,
    Failed(SourceError),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollectOptions {
    /// Upper bound for each source, retries included
    pub timeout: Duration,
    pub thermal_enabled: bool,
}

impl CollectOptions {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            timeout: config.inference.timeout()?,
            thermal_enabled: config.thermal_enabled,
        })
    }
}

#[derive(Debug)]
pub struct Collection {
    pub scores: ScoreSet,
    /// "Category: reason" for every source that failed, in source order
    pub errors: Vec<String>,
}

/// Poll every source concurrently and wait for all of them to settle.
///
/// Each source is bounded by `options.timeout`; a timeout only abandons that
/// source. When thermal hardware is disabled the thermal source is never
/// called. Results land in per-source slots, so output order is the order of
/// `sources` regardless of which finishes first.
pub async fn collect(sources: &[Arc<dyn ScoreSource>], options: &CollectOptions) -> Collection {
    let mut slots: Vec<Option<CategoryReading>> = sources.iter().map(|_| None).collect();
    let mut futures = FuturesUnordered::new();

    for (index, source) in sources.iter().enumerate() {
        let category = source.category();
        if category == Category::Thermal && !options.thermal_enabled {
            tracing::debug!("Thermal analysis skipped - hardware disabled");
            slots[index] = Some(CategoryReading::Disabled);
            continue;
        }

        let timeout = options.timeout;
        futures.push(async move {
            let reading = match tokio::time::timeout(timeout, source.read()).await {
                Ok(Ok(Reading::Score(score))) => CategoryReading::Available(score),
                Ok(Ok(Reading::Disabled)) => {
                    tracing::debug!(%category, "Source reported itself disabled");
                    CategoryReading::Disabled
                }
                Ok(Err(e)) => CategoryReading::Failed(e),
                Err(_) => CategoryReading::Failed(SourceError::Timeout(timeout)),
            };
            (index, reading)
        });
    }

    while let Some((index, reading)) = futures.next().await {
        slots[index] = Some(reading);
    }

    let mut scores = ScoreSet::default();
    let mut errors = Vec::new();

    for (source, slot) in sources.iter().zip(slots) {
        let category = source.category();
        // Every pushed future has been drained above
        match slot.unwrap_or(CategoryReading::Disabled) {
            CategoryReading::Available(score) => {
                scores = scores.with(category, Some(score));
            }
            CategoryReading::Disabled => {}
            CategoryReading::Failed(e) => {
                tracing::warn!(%category, error = %e, "Source failed");
                errors.push(format!("{}: {}", category.label(), e));
            }
        }
    }

    tracing::info!(
        skin = ?scores.skin,
        posture = ?scores.posture,
        eyes = ?scores.eyes,
        thermal = ?scores.thermal,
        errors = errors.len(),
        "Full analysis complete"
    );

    Collection {
        scores,
        errors,
    }
}
