use serde::Serialize;

use super::config::WeightMap;
use super::types::{Category, ScoreSet};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryContribution {
    pub category: Category,
    pub score: f64,        // Raw category score
    pub weight: f64,       // Configured weight
    pub contribution: f64, // score * weight, before normalization
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    pub overall: f64,
    /// Always the full configured map, not the normalized weights
    pub weights_used: WeightMap,
    pub total_weight: f64,
    pub breakdown: Vec<CategoryContribution>,
}

/// Combine category scores into one 0-100 wellness score.
///
/// Categories with a configured weight of zero never participate, even when a
/// score is present. When weighted categories are missing the weighted sum is
/// divided by the weight actually present, so partial data keeps the 0-100
/// scale instead of being deflated. The result is clamped and rounded to two
/// decimals. This never fails.
pub fn calculate_score(scores: &ScoreSet, weights: &WeightMap) -> ScoreResult {
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    let mut breakdown = Vec::new();

    if scores.is_empty() {
        tracing::warn!("No valid scores provided for wellness calculation");
        return ScoreResult {
            overall: 0.0,
            weights_used: *weights,
            total_weight,
            breakdown,
        };
    }

    for (category, score) in scores.available() {
        let weight = weights.get(category);
        if weight > 0.0 {
            let contribution = score * weight;
            weighted_sum += contribution;
            total_weight += weight;
            breakdown.push(CategoryContribution {
                category,
                score,
                weight,
                contribution,
            });
        }
    }

    let overall = if total_weight <= 0.0 {
        0.0
    } else if total_weight < 1.0 {
        weighted_sum / total_weight
    } else {
        // Float error can push a full set slightly over 1.0
        weighted_sum
    };

    // NaN.max(0.0) is 0.0, so a poisoned input still lands in range
    let overall = round2(overall.max(0.0).min(100.0));

    tracing::debug!(
        overall,
        total_weight,
        skin = ?scores.skin,
        posture = ?scores.posture,
        eyes = ?scores.eyes,
        thermal = ?scores.thermal,
        "Wellness score calculated"
    );

    ScoreResult {
        overall,
        weights_used: *weights,
        total_weight,
        breakdown,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
