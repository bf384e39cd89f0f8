use serde::{Deserialize, Deserializer, Serialize};

use super::super::domain::{AreaKey, AreaMap};

const UNIT_WEIGHT: f64 = 1.0;

/// Relative weight of each area in the overall percentage.
/// Areas left out of a serialized object keep the unit weight.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AreaWeights {
    weights: AreaMap<f64>,
}

fn unit_weight() -> f64 {
    UNIT_WEIGHT
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct WeightsRepr {
    #[serde(default = "unit_weight")]
    goals: f64,
    #[serde(default = "unit_weight")]
    habits: f64,
    #[serde(default = "unit_weight")]
    journal: f64,
    #[serde(default = "unit_weight")]
    vision_board: f64,
    #[serde(default = "unit_weight")]
    life_wheel: f64,
    #[serde(default = "unit_weight")]
    identity: f64,
}

impl<'de> Deserialize<'de> for AreaWeights {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = WeightsRepr::deserialize(deserializer)?;
        Ok(Self::new(AreaMap {
            goals: repr.goals,
            habits: repr.habits,
            journal: repr.journal,
            vision_board: repr.vision_board,
            life_wheel: repr.life_wheel,
            identity: repr.identity,
        }))
    }
}

impl Default for AreaWeights {
    fn default() -> Self {
        Self {
            weights: AreaMap::from_fn(|_| UNIT_WEIGHT),
        }
    }
}

impl AreaWeights {
    pub fn new(weights: AreaMap<f64>) -> Self {
        Self { weights }
    }

    pub fn with_weight(mut self, area: AreaKey, weight: f64) -> Self {
        self.weights[area] = weight;
        self
    }

    /// Negative or non-finite weights count as zero.
    pub fn get(&self, area: AreaKey) -> f64 {
        let weight = self.weights[area];
        if weight.is_finite() {
            weight.max(0.0)
        } else {
            0.0
        }
    }

    pub fn total(&self) -> f64 {
        AreaKey::ALL.into_iter().map(|area| self.get(area)).sum()
    }
}
