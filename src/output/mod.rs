pub mod formatter;

pub use formatter::{format_health, format_outcome, format_score, format_weights, should_use_colors};
