use super::super::domain::{AreaKey, AreaSignal, NextTask, ReasonCode, SignalReading};
use super::tasks::task_for;

const COVERAGE_POINTS: f64 = 4.0;
const QUALITY_POINTS: f64 = 3.0;
const RECENCY_POINTS: f64 = 3.0;
const LOW_SIGNAL_THRESHOLD: f64 = 0.4;
const MAX_TASKS_PER_AREA: usize = 2;

pub(crate) struct AreaEvaluation {
    pub score: Option<u8>,
    pub reasons: Vec<ReasonCode>,
    pub tasks: Vec<NextTask>,
}

pub(crate) fn evaluate_area(area: AreaKey, signal: &AreaSignal) -> AreaEvaluation {
    match signal {
        AreaSignal::Unavailable => AreaEvaluation {
            score: None,
            reasons: vec![ReasonCode::ErrorFallback],
            tasks: Vec::new(),
        },
        AreaSignal::NoData => AreaEvaluation {
            score: Some(0),
            reasons: vec![ReasonCode::NoData],
            tasks: task_for(area, ReasonCode::NoData).into_iter().collect(),
        },
        AreaSignal::Ok(reading) => evaluate_reading(area, reading),
    }
}

fn evaluate_reading(area: AreaKey, reading: &SignalReading) -> AreaEvaluation {
    let coverage = clamp_unit(reading.coverage.unwrap_or(0.0));
    let quality = clamp_unit(reading.quality.unwrap_or(0.0));
    let recency = recency_score(reading.recency_days);

    let mut reasons = Vec::new();
    if reading.coverage.is_none() || reading.quality.is_none() || reading.recency_days.is_none()
    {
        reasons.push(ReasonCode::StaleSnapshot);
    }
    if coverage < LOW_SIGNAL_THRESHOLD {
        reasons.push(ReasonCode::LowCoverage);
    }
    if quality < LOW_SIGNAL_THRESHOLD {
        reasons.push(ReasonCode::LowQuality);
    }
    if recency < LOW_SIGNAL_THRESHOLD {
        reasons.push(ReasonCode::LowRecency);
    }
    if reading.needs_review {
        reasons.push(ReasonCode::NeedsReview);
    }

    let raw = coverage * COVERAGE_POINTS + quality * QUALITY_POINTS + recency * RECENCY_POINTS;
    let score = raw.clamp(0.0, 10.0).round() as u8;

    let tasks = reasons
        .iter()
        .copied()
        .filter(|reason| reason.is_actionable())
        .take(MAX_TASKS_PER_AREA)
        .filter_map(|reason| task_for(area, reason))
        .collect();

    AreaEvaluation {
        score: Some(score),
        reasons,
        tasks,
    }
}

/// Step function over days since the latest activity. Unknown recency scores zero.
pub(crate) fn recency_score(days: Option<i64>) -> f64 {
    match days {
        Some(days) if days <= 7 => 1.0,
        Some(days) if days <= 30 => 0.6,
        Some(days) if days <= 90 => 0.3,
        _ => 0.0,
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
