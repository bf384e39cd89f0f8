use async_trait::async_trait;
use life_compass::error::AppError;
use life_compass::workflows::profile_strength::{
    CheckInRecord, GoalRecord, HabitRecord, IdentityTestRecord, JournalEntryRecord,
    ProfileDataSource, SourceError, VisionImageRecord,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// One domain's rows as written in a fixture, or the error its fetch should fail with.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum FixtureRows<T> {
    Failed { error: String },
    Rows(Vec<T>),
}

impl<T> Default for FixtureRows<T> {
    fn default() -> Self {
        Self::Rows(Vec::new())
    }
}

impl<T: Clone> FixtureRows<T> {
    fn fetch(&self, limit: Option<usize>) -> Result<Vec<T>, SourceError> {
        match self {
            FixtureRows::Failed { error } => Err(SourceError::Unavailable(error.clone())),
            FixtureRows::Rows(rows) => Ok(rows
                .iter()
                .take(limit.unwrap_or(usize::MAX))
                .cloned()
                .collect()),
        }
    }
}

impl<T> From<Vec<T>> for FixtureRows<T> {
    fn from(rows: Vec<T>) -> Self {
        Self::Rows(rows)
    }
}

/// Snapshot of all six domains for one user, as loaded from JSON.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct ProfileFixture {
    pub(crate) goals: FixtureRows<GoalRecord>,
    pub(crate) habits: FixtureRows<HabitRecord>,
    pub(crate) journal_entries: FixtureRows<JournalEntryRecord>,
    pub(crate) vision_images: FixtureRows<VisionImageRecord>,
    pub(crate) check_ins: FixtureRows<CheckInRecord>,
    pub(crate) identity_tests: FixtureRows<IdentityTestRecord>,
}

impl ProfileFixture {
    pub(crate) fn from_json(raw: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub(crate) fn from_path(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }
}

/// Data source answering from an in-process fixture that can be swapped between refreshes.
/// Every user id sees the same fixture.
#[derive(Default)]
pub(crate) struct FixtureDataSource {
    fixture: Mutex<ProfileFixture>,
}

impl FixtureDataSource {
    pub(crate) fn new(fixture: ProfileFixture) -> Self {
        Self {
            fixture: Mutex::new(fixture),
        }
    }

    pub(crate) fn replace(&self, fixture: ProfileFixture) {
        *self.fixture.lock().expect("fixture mutex poisoned") = fixture;
    }

    fn with_fixture<T>(&self, read: impl FnOnce(&ProfileFixture) -> T) -> T {
        let guard = self.fixture.lock().expect("fixture mutex poisoned");
        read(&guard)
    }
}

#[async_trait]
impl ProfileDataSource for FixtureDataSource {
    async fn goals(&self, _user_id: Option<&str>) -> Result<Vec<GoalRecord>, SourceError> {
        self.with_fixture(|fixture| fixture.goals.fetch(None))
    }

    async fn habits(&self, _user_id: Option<&str>) -> Result<Vec<HabitRecord>, SourceError> {
        self.with_fixture(|fixture| fixture.habits.fetch(None))
    }

    async fn journal_entries(
        &self,
        _user_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<JournalEntryRecord>, SourceError> {
        self.with_fixture(|fixture| fixture.journal_entries.fetch(Some(limit)))
    }

    async fn vision_images(
        &self,
        _user_id: Option<&str>,
    ) -> Result<Vec<VisionImageRecord>, SourceError> {
        self.with_fixture(|fixture| fixture.vision_images.fetch(None))
    }

    async fn check_ins(
        &self,
        _user_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<CheckInRecord>, SourceError> {
        self.with_fixture(|fixture| fixture.check_ins.fetch(Some(limit)))
    }

    async fn identity_tests(
        &self,
        _user_id: Option<&str>,
    ) -> Result<Vec<IdentityTestRecord>, SourceError> {
        self.with_fixture(|fixture| fixture.identity_tests.fetch(None))
    }
}
