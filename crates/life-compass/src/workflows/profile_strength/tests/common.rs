use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use crate::workflows::profile_strength::domain::{
    AreaKey, AreaMap, AreaSignal, LifeWheelCategory, ProfileMetrics, ProfileStrengthInput,
    ScoredPass, SignalReading,
};
use crate::workflows::profile_strength::ledger::{InMemoryLedgerStore, LedgerStore, LedgerStoreError};
use crate::workflows::profile_strength::records::{
    CheckInRecord, GoalRecord, HabitRecord, IdentityTestRecord, JournalEntryRecord,
    VisionImageRecord,
};
use crate::workflows::profile_strength::scoring::{AreaWeights, ScoringEngine};
use crate::workflows::profile_strength::service::ProfileStrengthService;
use crate::workflows::profile_strength::signals::{ProfileDataSource, SourceError};

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 7, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn ok(
    coverage: f64,
    quality: f64,
    recency_days: Option<i64>,
    needs_review: bool,
) -> AreaSignal {
    AreaSignal::Ok(SignalReading::new(
        coverage,
        quality,
        recency_days,
        needs_review,
    ))
}

/// Scores exactly 7 with no reasons.
pub(super) fn healthy() -> AreaSignal {
    ok(0.5, 0.5, Some(5), false)
}

pub(super) fn input(signals: AreaMap<AreaSignal>) -> ProfileStrengthInput {
    ProfileStrengthInput {
        signals,
        metrics: ProfileMetrics::default(),
        computed_at: now(),
    }
}

pub(super) fn engine() -> ScoringEngine {
    ScoringEngine::new(AreaWeights::default())
}

pub(super) fn scored(input: ProfileStrengthInput) -> ScoredPass {
    let result = engine().score(&input);
    ScoredPass { input, result }
}

pub(super) fn full_metrics(goals: u32, habits: u32) -> ProfileMetrics {
    ProfileMetrics {
        goals_by_category: LifeWheelCategory::ALL
            .into_iter()
            .map(|category| (category, goals))
            .collect(),
        habits_by_domain: LifeWheelCategory::ALL
            .into_iter()
            .map(|category| (category, habits))
            .collect(),
    }
}

pub(super) fn with_area(area: AreaKey, signal: AreaSignal) -> AreaMap<AreaSignal> {
    let mut signals = AreaMap::from_fn(|_| healthy());
    signals[area] = signal;
    signals
}

pub(super) fn rich_goal(category: LifeWheelCategory) -> GoalRecord {
    GoalRecord {
        id: format!("goal-{}", category.as_str()),
        title: format!("Grow {}", category.as_str()),
        category: Some(category.as_str().to_string()),
        description: Some("Specific and measurable".to_string()),
        target_date: Some("2026-12-31".to_string()),
        updated_at: Some("2026-06-29T08:00:00Z".to_string()),
        ..GoalRecord::default()
    }
}

pub(super) fn habit(category: LifeWheelCategory, index: usize) -> HabitRecord {
    HabitRecord {
        id: format!("habit-{}-{index}", category.as_str()),
        name: format!("{} habit {index}", category.as_str()),
        domain: Some(category.as_str().to_string()),
        cue: Some("After breakfast".to_string()),
        last_completed_at: Some("2026-06-30".to_string()),
        ..HabitRecord::default()
    }
}

type Fetched<T> = Result<Vec<T>, SourceError>;

/// Scriptable collaborator: each domain answers with whatever the test last set.
#[derive(Clone)]
pub(super) struct ScriptedSource {
    pub(super) goals: Arc<Mutex<Fetched<GoalRecord>>>,
    pub(super) habits: Arc<Mutex<Fetched<HabitRecord>>>,
    pub(super) journal: Arc<Mutex<Fetched<JournalEntryRecord>>>,
    pub(super) vision: Arc<Mutex<Fetched<VisionImageRecord>>>,
    pub(super) check_ins: Arc<Mutex<Fetched<CheckInRecord>>>,
    pub(super) identity: Arc<Mutex<Fetched<IdentityTestRecord>>>,
}

impl Default for ScriptedSource {
    fn default() -> Self {
        Self {
            goals: Arc::new(Mutex::new(Ok(Vec::new()))),
            habits: Arc::new(Mutex::new(Ok(Vec::new()))),
            journal: Arc::new(Mutex::new(Ok(Vec::new()))),
            vision: Arc::new(Mutex::new(Ok(Vec::new()))),
            check_ins: Arc::new(Mutex::new(Ok(Vec::new()))),
            identity: Arc::new(Mutex::new(Ok(Vec::new()))),
        }
    }
}

impl ScriptedSource {
    /// Every domain populated well enough to clear all thresholds.
    pub(super) fn complete() -> Self {
        let source = Self::default();
        source.set_goals(Ok(LifeWheelCategory::ALL.into_iter().map(rich_goal).collect()));
        source.set_habits(Ok(LifeWheelCategory::ALL
            .into_iter()
            .flat_map(|category| [habit(category, 0), habit(category, 1)])
            .collect()));
        *source.journal.lock().expect("journal mutex") = Ok((0..8)
            .map(|day| JournalEntryRecord {
                id: format!("entry-{day}"),
                entry_date: Some(format!("2026-06-{:02}", 30 - day)),
                content: "Today I noticed".to_string(),
                mood: Some(4),
                tags: vec!["gratitude".to_string()],
                ..JournalEntryRecord::default()
            })
            .collect());
        *source.vision.lock().expect("vision mutex") = Ok(LifeWheelCategory::ALL
            .into_iter()
            .map(|category| VisionImageRecord {
                id: format!("vision-{}", category.as_str()),
                caption: Some("Where I am headed".to_string()),
                category: Some(category.as_str().to_string()),
                created_at: Some("2026-06-20".to_string()),
                last_reviewed_at: Some("2026-06-28".to_string()),
                review_interval_days: Some(30),
            })
            .collect());
        let scores: BTreeMap<String, f64> = LifeWheelCategory::ALL
            .into_iter()
            .map(|category| (category.as_str().to_string(), 7.0))
            .collect();
        *source.check_ins.lock().expect("check-in mutex") = Ok(vec![CheckInRecord {
            id: "check-in-1".to_string(),
            created_at: Some("2026-06-30".to_string()),
            scores,
            note: None,
        }]);
        *source.identity.lock().expect("identity mutex") = Ok(["mbti", "enneagram", "strengths"]
            .into_iter()
            .map(|kind| IdentityTestRecord {
                id: format!("test-{kind}"),
                test_type: kind.to_string(),
                completed_at: Some("2026-06-15".to_string()),
                result_summary: Some("Thoughtful planner".to_string()),
            })
            .collect());
        source
    }

    pub(super) fn set_goals(&self, rows: Fetched<GoalRecord>) {
        *self.goals.lock().expect("goals mutex") = rows;
    }

    pub(super) fn set_habits(&self, rows: Fetched<HabitRecord>) {
        *self.habits.lock().expect("habits mutex") = rows;
    }

    pub(super) fn fail_journal(&self) {
        *self.journal.lock().expect("journal mutex") =
            Err(SourceError::Unavailable("journal service timed out".to_string()));
    }
}

#[async_trait]
impl ProfileDataSource for ScriptedSource {
    async fn goals(&self, _user_id: Option<&str>) -> Result<Vec<GoalRecord>, SourceError> {
        self.goals.lock().expect("goals mutex").clone()
    }

    async fn habits(&self, _user_id: Option<&str>) -> Result<Vec<HabitRecord>, SourceError> {
        self.habits.lock().expect("habits mutex").clone()
    }

    async fn journal_entries(
        &self,
        _user_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<JournalEntryRecord>, SourceError> {
        self.journal
            .lock()
            .expect("journal mutex")
            .clone()
            .map(|rows| rows.into_iter().take(limit).collect())
    }

    async fn vision_images(
        &self,
        _user_id: Option<&str>,
    ) -> Result<Vec<VisionImageRecord>, SourceError> {
        self.vision.lock().expect("vision mutex").clone()
    }

    async fn check_ins(
        &self,
        _user_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<CheckInRecord>, SourceError> {
        self.check_ins
            .lock()
            .expect("check-in mutex")
            .clone()
            .map(|rows| rows.into_iter().take(limit).collect())
    }

    async fn identity_tests(
        &self,
        _user_id: Option<&str>,
    ) -> Result<Vec<IdentityTestRecord>, SourceError> {
        self.identity.lock().expect("identity mutex").clone()
    }
}

/// Answers each user from their own scripted rows; unknown users see an empty profile.
#[derive(Default)]
pub(super) struct PerUserSource {
    by_user: HashMap<String, ScriptedSource>,
    fallback: ScriptedSource,
}

impl PerUserSource {
    pub(super) fn with_user(mut self, user_id: &str, source: ScriptedSource) -> Self {
        self.by_user.insert(user_id.to_string(), source);
        self
    }

    fn rows_for(&self, user_id: Option<&str>) -> &ScriptedSource {
        user_id
            .and_then(|user_id| self.by_user.get(user_id))
            .unwrap_or(&self.fallback)
    }
}

#[async_trait]
impl ProfileDataSource for PerUserSource {
    async fn goals(&self, user_id: Option<&str>) -> Result<Vec<GoalRecord>, SourceError> {
        self.rows_for(user_id).goals(user_id).await
    }

    async fn habits(&self, user_id: Option<&str>) -> Result<Vec<HabitRecord>, SourceError> {
        self.rows_for(user_id).habits(user_id).await
    }

    async fn journal_entries(
        &self,
        user_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<JournalEntryRecord>, SourceError> {
        self.rows_for(user_id).journal_entries(user_id, limit).await
    }

    async fn vision_images(
        &self,
        user_id: Option<&str>,
    ) -> Result<Vec<VisionImageRecord>, SourceError> {
        self.rows_for(user_id).vision_images(user_id).await
    }

    async fn check_ins(
        &self,
        user_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<CheckInRecord>, SourceError> {
        self.rows_for(user_id).check_ins(user_id, limit).await
    }

    async fn identity_tests(
        &self,
        user_id: Option<&str>,
    ) -> Result<Vec<IdentityTestRecord>, SourceError> {
        self.rows_for(user_id).identity_tests(user_id).await
    }
}

pub(super) fn build_service(
    source: ScriptedSource,
) -> (
    ProfileStrengthService<ScriptedSource, InMemoryLedgerStore>,
    Arc<InMemoryLedgerStore>,
) {
    let store = Arc::new(InMemoryLedgerStore::default());
    let service =
        ProfileStrengthService::new(Arc::new(source), store.clone(), AreaWeights::default());
    (service, store)
}

/// Store that reads fine but refuses every write.
pub(super) struct ReadOnlyLedgerStore;

impl LedgerStore for ReadOnlyLedgerStore {
    fn read(&self, _key: &str) -> Result<Option<String>, LedgerStoreError> {
        Ok(None)
    }

    fn write(&self, _key: &str, _payload: &str) -> Result<(), LedgerStoreError> {
        Err(LedgerStoreError::Unavailable("read only".to_string()))
    }
}

pub(super) async fn read_json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
