mod reducers;

pub use reducers::{
    check_in_signal, goal_signal, goals_by_category, habit_signal, habits_by_domain,
    identity_signal, journal_signal, vision_signal,
};

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::domain::{
    AreaKey, AreaMap, AreaSignal, LifeWheelCategory, ProfileMetrics, ProfileStrengthInput,
    SignalReading,
};
use super::records::{
    CheckInRecord, GoalRecord, HabitRecord, IdentityTestRecord, JournalEntryRecord,
    VisionImageRecord,
};

/// Upper bound on journal entries requested per refresh.
pub const JOURNAL_FETCH_LIMIT: usize = 60;
/// Upper bound on life-wheel check-ins requested per refresh.
pub const CHECK_IN_FETCH_LIMIT: usize = 12;

/// Read side of the six domain stores feeding the engine.
///
/// Every call is scoped to one user; `None` is the signed-out demo profile.
#[async_trait]
pub trait ProfileDataSource: Send + Sync {
    async fn goals(&self, user_id: Option<&str>) -> Result<Vec<GoalRecord>, SourceError>;
    async fn habits(&self, user_id: Option<&str>) -> Result<Vec<HabitRecord>, SourceError>;
    /// Most recent entries first, at most `limit`.
    async fn journal_entries(
        &self,
        user_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<JournalEntryRecord>, SourceError>;
    async fn vision_images(
        &self,
        user_id: Option<&str>,
    ) -> Result<Vec<VisionImageRecord>, SourceError>;
    /// Most recent check-ins first, at most `limit`.
    async fn check_ins(
        &self,
        user_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<CheckInRecord>, SourceError>;
    async fn identity_tests(
        &self,
        user_id: Option<&str>,
    ) -> Result<Vec<IdentityTestRecord>, SourceError>;
}

/// Failure reported by a domain collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error("data source unavailable: {0}")]
    Unavailable(String),
    #[error("data source rejected the request: {0}")]
    Rejected(String),
}

/// Fans out to every domain source and reduces each answer to an [`AreaSignal`].
pub struct SignalBuilder<S> {
    source: Arc<S>,
}

impl<S> SignalBuilder<S>
where
    S: ProfileDataSource + 'static,
{
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    /// Waits for all six fetches to settle. A failing domain only degrades its own area.
    pub async fn build(&self, user_id: Option<&str>, now: DateTime<Utc>) -> ProfileStrengthInput {
        let source = self.source.as_ref();
        let (goals, habits, journal, vision, check_ins, identity) = tokio::join!(
            source.goals(user_id),
            source.habits(user_id),
            source.journal_entries(user_id, JOURNAL_FETCH_LIMIT),
            source.vision_images(user_id),
            source.check_ins(user_id, CHECK_IN_FETCH_LIMIT),
            source.identity_tests(user_id),
        );

        let metrics = ProfileMetrics {
            goals_by_category: goals
                .as_ref()
                .map(|rows| goals_by_category(rows))
                .unwrap_or_else(|_| LifeWheelCategory::zeroed_counts()),
            habits_by_domain: habits
                .as_ref()
                .map(|rows| habits_by_domain(rows))
                .unwrap_or_else(|_| LifeWheelCategory::zeroed_counts()),
        };

        let signals = AreaMap {
            goals: settle(AreaKey::Goals, goals, |rows| goal_signal(rows, now)),
            habits: settle(AreaKey::Habits, habits, |rows| habit_signal(rows, now)),
            journal: settle(AreaKey::Journal, journal, |rows| journal_signal(rows, now)),
            vision_board: settle(AreaKey::VisionBoard, vision, |rows| {
                vision_signal(rows, now)
            }),
            life_wheel: settle(AreaKey::LifeWheel, check_ins, |rows| {
                check_in_signal(rows, now)
            }),
            identity: settle(AreaKey::Identity, identity, |rows| {
                identity_signal(rows, now)
            }),
        };

        ProfileStrengthInput {
            signals,
            metrics,
            computed_at: now,
        }
    }
}

fn settle<T>(
    area: AreaKey,
    fetched: Result<Vec<T>, SourceError>,
    reduce: impl FnOnce(&[T]) -> SignalReading,
) -> AreaSignal {
    match fetched {
        Err(error) => {
            warn!(area = area.as_str(), %error, "domain fetch failed; area marked unavailable");
            AreaSignal::Unavailable
        }
        Ok(rows) if rows.is_empty() => AreaSignal::NoData,
        Ok(rows) => {
            let reading = reduce(&rows);
            debug!(area = area.as_str(), rows = rows.len(), ?reading, "area signal reduced");
            AreaSignal::Ok(reading)
        }
    }
}
