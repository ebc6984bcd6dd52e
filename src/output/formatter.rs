use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::analysis::AnalysisOutcome;
use crate::inference::ServiceHealth;
use crate::scoring::{Category, WeightMap};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a score with exactly two decimals.
/// If incomplete is true, appends asterisk to indicate partial scoring
pub fn format_score(score: f64, incomplete: bool) -> String {
    if incomplete {
        format!("{:.2}*", score)
    } else {
        format!("{:.2}", score)
    }
}

/// Format the weight policy, one category per line
pub fn format_weights(weights: &WeightMap) -> String {
    Category::ALL
        .into_iter()
        .map(|c| format!("{:<8} {:.2}", c.label(), weights.get(c)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format an analysis outcome for the terminal.
///
/// Layout:
/// ```text
/// Wellness score: 77.69*
///   Skin       70.00  x0.40
///   Posture        -  x0.35
///   ...
/// * partial: scored from available categories only
/// Errors:
///   - Posture: source reported failure: no pose detected
/// ```
pub fn format_outcome(outcome: &AnalysisOutcome, use_colors: bool) -> String {
    let partial = outcome.is_partial();
    let score_str = format_score(outcome.overall_score, partial);
    let mut lines = Vec::new();

    if use_colors {
        let score = outcome.overall_score;
        let colored = if !outcome.has_data() {
            score_str.dimmed().to_string()
        } else if score >= 70.0 {
            score_str.green().bold().to_string()
        } else if score >= 40.0 {
            score_str.yellow().bold().to_string()
        } else {
            score_str.red().bold().to_string()
        };
        lines.push(format!("{} {}", "Wellness score:".bold(), colored));
    } else {
        lines.push(format!("Wellness score: {}", score_str));
    }

    for category in Category::ALL {
        let value = outcome
            .per_category
            .get(category)
            .map(|s| format!("{:.2}", s))
            .unwrap_or_else(|| "-".to_string());
        let weight = format!("x{:.2}", outcome.weights_used.get(category));
        let line = format!("  {:<8} {:>7}  {}", category.label(), value, weight);
        if use_colors && outcome.per_category.get(category).is_none() {
            lines.push(line.dimmed().to_string());
        } else {
            lines.push(line);
        }
    }

    if partial && outcome.has_data() {
        lines.push("* partial: scored from available categories only".to_string());
    }

    if !outcome.errors.is_empty() {
        if use_colors {
            lines.push("Errors:".red().to_string());
        } else {
            lines.push("Errors:".to_string());
        }
        for error in &outcome.errors {
            lines.push(format!("  - {}", error));
        }
    }

    lines.join("\n")
}

/// Format health probe results, one service per line
pub fn format_health(results: &[ServiceHealth], use_colors: bool) -> String {
    if results.is_empty() {
        return "No inference services to check.".to_string();
    }

    results
        .iter()
        .map(|r| {
            let status = format!("{:<5}", if r.healthy { "ok" } else { "down" });
            let detail = r
                .detail
                .as_deref()
                .map(|d| format!(" ({})", d))
                .unwrap_or_default();
            if use_colors {
                let status = if r.healthy {
                    status.green().to_string()
                } else {
                    status.red().to_string()
                };
                format!("{:<8} {} {}{}", r.category.label(), status, r.url.underline(), detail)
            } else {
                format!("{:<8} {} {}{}", r.category.label(), status, r.url, detail)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
