use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four wellness dimensions, each produced by its own inference source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Skin,
    Posture,
    Eyes,
    Thermal,
}

impl Category {
    /// Fixed reporting order. Errors and breakdowns always follow it.
    pub const ALL: [Category; 4] = [
        Category::Skin,
        Category::Posture,
        Category::Eyes,
        Category::Thermal,
    ];

    /// Lowercase key used in config files and JSON output
    pub fn key(self) -> &'static str {
        match self {
            Category::Skin => "skin",
            Category::Posture => "posture",
            Category::Eyes => "eyes",
            Category::Thermal => "thermal",
        }
    }

    /// Human-readable label used to tag error messages ("Skin: timeout after 10s")
    pub fn label(self) -> &'static str {
        match self {
            Category::Skin => "Skin",
            Category::Posture => "Posture",
            Category::Eyes => "Eyes",
            Category::Thermal => "Thermal",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Category scores for one assessment instant.
///
/// A field is `None` exactly when its source produced no usable reading
/// (failed, timed out, or disabled). There is no numeric sentinel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
pub struct ScoreSet {
    pub skin: Option<f64>,
    pub posture: Option<f64>,
    pub eyes: Option<f64>,
    pub thermal: Option<f64>,
}

impl ScoreSet {
    pub fn get(&self, category: Category) -> Option<f64> {
        match category {
            Category::Skin => self.skin,
            Category::Posture => self.posture,
            Category::Eyes => self.eyes,
            Category::Thermal => self.thermal,
        }
    }

    /// Builder-style setter, used when assembling collector slots
    pub fn with(mut self, category: Category, score: Option<f64>) -> Self {
        match category {
            Category::Skin => self.skin = score,
            Category::Posture => self.posture = score,
            Category::Eyes => self.eyes = score,
            Category::Thermal => self.thermal = score,
        }
        self
    }

    /// Present categories, in reporting order
    pub fn available(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        Category::ALL
            .into_iter()
            .filter_map(|c| self.get(c).map(|score| (c, score)))
    }

    pub fn available_count(&self) -> usize {
        self.available().count()
    }

    pub fn is_empty(&self) -> bool {
        self.available_count() == 0
    }
}
