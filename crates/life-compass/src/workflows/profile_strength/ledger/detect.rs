use std::collections::BTreeSet;

use super::super::domain::{
    AreaKey, LifeWheelCategory, NextTask, ProfileStrengthResult, ScoredPass,
};
use super::state::{BonusKind, XpEvent, XpLedgerState};

const GOALS_PER_CATEGORY: u32 = 1;
const HABITS_PER_DOMAIN: u32 = 2;

/// Tasks from `previous` that the `next` pass shows as actively fixed.
///
/// The next signal for the task's area must be `ok`: an area that errored or emptied out has
/// not been fixed, only hidden.
pub fn detect_resolved_tasks(previous: &ProfileStrengthResult, next: &ScoredPass) -> Vec<NextTask> {
    previous
        .next_tasks_by_area
        .iter()
        .filter(|(area, _)| next.input.signals[*area].is_ok())
        .flat_map(|(area, tasks)| {
            let remaining = &next.result.reasons_by_area[area];
            tasks
                .iter()
                .filter(move |task| !task.reasons.iter().any(|reason| remaining.contains(reason)))
        })
        .cloned()
        .collect()
}

/// Coverage milestones the `next` pass has reached and `state` has not yet paid.
pub fn detect_bonus_events(next: &ScoredPass, state: &XpLedgerState) -> Vec<XpEvent> {
    BonusKind::ALL
        .into_iter()
        .filter(|bonus| !state.bonuses.is_awarded(*bonus))
        .filter(|bonus| bonus_reached(*bonus, next))
        .map(XpEvent::bonus)
        .collect()
}

fn bonus_reached(bonus: BonusKind, next: &ScoredPass) -> bool {
    let metrics = &next.input.metrics;
    match bonus {
        BonusKind::GoalsCoverage => {
            next.input.signals[AreaKey::Goals].is_ok()
                && LifeWheelCategory::ALL
                    .into_iter()
                    .all(|category| metrics.goals_in(category) >= GOALS_PER_CATEGORY)
        }
        BonusKind::HabitsCoverage => {
            next.input.signals[AreaKey::Habits].is_ok()
                && LifeWheelCategory::ALL
                    .into_iter()
                    .all(|category| metrics.habits_in(category) >= HABITS_PER_DOMAIN)
        }
    }
}

/// Every award the transition from `previous` to `next` earns, excluding anything `state`
/// already records. Without a previous snapshot only the milestones can fire.
pub fn detect_xp_events(
    previous: Option<&ProfileStrengthResult>,
    next: &ScoredPass,
    state: &XpLedgerState,
) -> Vec<XpEvent> {
    let mut seen = BTreeSet::new();
    let mut events: Vec<XpEvent> = previous
        .map(|previous| detect_resolved_tasks(previous, next))
        .unwrap_or_default()
        .into_iter()
        .filter(|task| !state.is_completed(&task.id))
        .filter(|task| seen.insert(task.id.clone()))
        .map(|task| XpEvent::task(task.id, task.area, task.xp_reward, task.title))
        .collect();

    events.extend(detect_bonus_events(next, state));
    events
}
