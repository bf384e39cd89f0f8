mod config;
mod rules;
pub mod tasks;

pub use config::AreaWeights;
pub use tasks::{task_for, task_id};

use tracing::debug;

use super::domain::{
    AreaKey, AreaMap, ProfileStrengthInput, ProfileStrengthResult, ReasonCode, ResultMeta,
};
use rules::{evaluate_area, AreaEvaluation};

/// Pure scorer turning six area signals into a [`ProfileStrengthResult`].
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    weights: AreaWeights,
}

impl ScoringEngine {
    pub fn new(weights: AreaWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &AreaWeights {
        &self.weights
    }

    pub fn score(&self, input: &ProfileStrengthInput) -> ProfileStrengthResult {
        let mut evaluations: AreaMap<AreaEvaluation> =
            input.signals.map(|area, signal| evaluate_area(area, signal));

        for (area, evaluation) in evaluations.iter() {
            debug!(
                area = area.as_str(),
                score = ?evaluation.score,
                reasons = ?evaluation.reasons,
                "area scored"
            );
        }

        let area_scores = evaluations.map(|_, evaluation| evaluation.score);
        let overall_percent = self.overall_percent(&area_scores);
        let global_next_task = AreaKey::ALL
            .into_iter()
            .find_map(|area| evaluations[area].tasks.first().cloned());

        let reasons_by_area: AreaMap<Vec<ReasonCode>> =
            AreaMap::from_fn(|area| std::mem::take(&mut evaluations[area].reasons));
        let next_tasks_by_area = AreaMap::from_fn(|area| std::mem::take(&mut evaluations[area].tasks));

        ProfileStrengthResult {
            area_scores,
            reasons_by_area,
            next_tasks_by_area,
            global_next_task,
            overall_percent,
            meta: ResultMeta {
                computed_at: input.computed_at,
                used_fallback_data: overall_percent.is_none(),
            },
        }
    }

    /// `None` as soon as any area is unresolved.
    fn overall_percent(&self, scores: &AreaMap<Option<u8>>) -> Option<u8> {
        let mut weighted = 0.0;
        for (area, score) in scores.iter() {
            weighted += self.weights.get(area) * f64::from((*score)?);
        }

        let total_weight = self.weights.total();
        if total_weight <= 0.0 {
            return Some(0);
        }

        let percent = (weighted / (total_weight * 10.0) * 100.0).round();
        Some(percent.clamp(0.0, 100.0) as u8)
    }
}
