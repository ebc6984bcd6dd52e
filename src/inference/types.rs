use serde::Deserialize;

use super::error::SourceError;

/// JSON body returned by an inference service.
///
/// Only `score` is required for a usable reading. Services add their own
/// detail fields, which are ignored here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourcePayload {
    #[serde(default)]
    pub score: Option<f64>,
    /// Ghost services answer `enabled: false` instead of doing real work
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
}

/// A successful answer from a source
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    Score(f64),
    Disabled,
}

impl SourcePayload {
    pub fn into_reading(self) -> Result<Reading, SourceError> {
        if self.enabled == Some(false) {
            return Ok(Reading::Disabled);
        }

        let reported = self.error.filter(|e| !e.trim().is_empty());
        if self.success == Some(false) || reported.is_some() {
            return Err(SourceError::Reported(
                reported.unwrap_or_else(|| "unsuccessful analysis".to_string()),
            ));
        }

        match self.score {
            Some(score) if score.is_finite() => Ok(Reading::Score(score)),
            Some(score) => Err(SourceError::InvalidResponse(format!(
                "non-finite score {}",
                score
            ))),
            None => Err(SourceError::InvalidResponse("missing score".to_string())),
        }
    }
}
