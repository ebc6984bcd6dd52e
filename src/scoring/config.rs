use serde::{Deserialize, Serialize};

use super::types::Category;

/// Category weights used by the scoring engine.
///
/// Only two instances are valid, selected by whether thermal hardware is
/// present. When it is absent, thermal's 0.20 share moves onto skin (+0.10)
/// and posture (+0.10), so the engine never has to know about the hardware.
///
/// Example JSON (thermal disabled):
/// ```json
/// { "skin": 0.4, "posture": 0.35, "eyes": 0.25, "thermal": 0.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct WeightMap {
    pub skin: f64,
    pub posture: f64,
    pub eyes: f64,
    pub thermal: f64,
}

impl WeightMap {
    /// Weights when a thermal sensor is connected
    pub const THERMAL_ENABLED: WeightMap = WeightMap {
        skin: 0.30,
        posture: 0.25,
        eyes: 0.25,
        thermal: 0.20,
    };

    /// Weights when no thermal sensor is connected
    pub const THERMAL_DISABLED: WeightMap = WeightMap {
        skin: 0.40,
        posture: 0.35,
        eyes: 0.25,
        thermal: 0.00,
    };

    /// Select the weight policy for the given hardware configuration.
    pub fn for_hardware(thermal_enabled: bool) -> Self {
        if thermal_enabled {
            Self::THERMAL_ENABLED
        } else {
            Self::THERMAL_DISABLED
        }
    }

    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Skin => self.skin,
            Category::Posture => self.posture,
            Category::Eyes => self.eyes,
            Category::Thermal => self.thermal,
        }
    }

    pub fn sum(&self) -> f64 {
        Category::ALL.into_iter().map(|c| self.get(c)).sum()
    }
}
