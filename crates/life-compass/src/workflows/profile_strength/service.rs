use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use super::domain::{ProfileStrengthResult, ScoredPass};
use super::ledger::{
    detect_xp_events, fold_events, ledger_key, LedgerStore, LedgerStoreError, XpEvent, XpLedger,
    XpLedgerState,
};
use super::scoring::{AreaWeights, ScoringEngine};
use super::signals::{ProfileDataSource, SignalBuilder};

/// Service composing the signal builder, scorer, and XP ledger for one refresh cycle.
pub struct ProfileStrengthService<S, L> {
    builder: SignalBuilder<S>,
    engine: ScoringEngine,
    ledger: XpLedger<L>,
    previous: Mutex<SnapshotCache>,
}

/// Users whose last snapshot is kept in memory before the least recently refreshed is dropped.
pub const DEFAULT_SNAPSHOT_CAPACITY: usize = 1024;

/// Last result per ledger key, evicting the least recently refreshed user past capacity.
/// An evicted user's next refresh behaves like a first refresh.
struct SnapshotCache {
    capacity: usize,
    snapshots: HashMap<String, ProfileStrengthResult>,
    order: VecDeque<String>,
}

impl SnapshotCache {
    fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            snapshots: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    fn get(&self, key: &str) -> Option<&ProfileStrengthResult> {
        self.snapshots.get(key)
    }

    fn insert(&mut self, key: String, result: ProfileStrengthResult) {
        if self.snapshots.insert(key.clone(), result).is_some() {
            self.order.retain(|existing| existing != &key);
        }
        self.order.push_back(key);
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.snapshots.remove(&oldest);
            }
        }
    }

    fn len(&self) -> usize {
        self.snapshots.len()
    }
}

/// What a refresh produced: the new snapshot plus anything it paid out.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshOutcome {
    pub result: ProfileStrengthResult,
    pub events: Vec<XpEvent>,
    pub xp_awarded: u32,
    pub ledger: XpLedgerState,
}

impl<S, L> ProfileStrengthService<S, L>
where
    S: ProfileDataSource + 'static,
    L: LedgerStore + 'static,
{
    pub fn new(source: Arc<S>, store: Arc<L>, weights: AreaWeights) -> Self {
        Self {
            builder: SignalBuilder::new(source),
            engine: ScoringEngine::new(weights),
            ledger: XpLedger::new(store),
            previous: Mutex::new(SnapshotCache::new(DEFAULT_SNAPSHOT_CAPACITY)),
        }
    }

    /// Caps how many users keep a cached baseline; existing entries are dropped.
    pub fn with_snapshot_capacity(mut self, capacity: usize) -> Self {
        self.previous = Mutex::new(SnapshotCache::new(capacity));
        self
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    /// Last snapshot this service computed for the user, used as the diff baseline.
    pub fn previous(&self, user_id: Option<&str>) -> Option<ProfileStrengthResult> {
        self.previous
            .lock()
            .expect("previous snapshot mutex poisoned")
            .get(&ledger_key(user_id))
            .cloned()
    }

    pub fn cached_snapshots(&self) -> usize {
        self.previous
            .lock()
            .expect("previous snapshot mutex poisoned")
            .len()
    }

    pub fn ledger(&self, user_id: Option<&str>) -> XpLedgerState {
        self.ledger.load(user_id)
    }

    /// Refresh against the snapshot cached from this service's last refresh for the user.
    pub async fn refresh(
        &self,
        user_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<RefreshOutcome, ProfileStrengthError> {
        let previous = self.previous(user_id);
        self.refresh_from(user_id, previous.as_ref(), now).await
    }

    /// Refresh against a caller-supplied baseline, e.g. a snapshot the host persisted.
    pub async fn refresh_from(
        &self,
        user_id: Option<&str>,
        previous: Option<&ProfileStrengthResult>,
        now: DateTime<Utc>,
    ) -> Result<RefreshOutcome, ProfileStrengthError> {
        let input = self.builder.build(user_id, now).await;
        let result = self.engine.score(&input);
        let pass = ScoredPass { input, result };

        let state = self.ledger.load(user_id);
        let events = detect_xp_events(previous, &pass, &state);
        let ledger = if events.is_empty() {
            state
        } else {
            let folded = fold_events(state, &events);
            self.ledger.persist(user_id, &folded)?;
            folded
        };

        let xp_awarded: u32 = events.iter().map(|event| event.xp).sum();
        let ScoredPass { result, .. } = pass;

        self.previous
            .lock()
            .expect("previous snapshot mutex poisoned")
            .insert(ledger_key(user_id), result.clone());

        info!(
            user = %ledger_key(user_id),
            overall_percent = ?result.overall_percent,
            events = events.len(),
            xp_awarded,
            "profile strength refreshed"
        );

        Ok(RefreshOutcome {
            result,
            events,
            xp_awarded,
            ledger,
        })
    }
}

/// Error raised by the profile strength service.
#[derive(Debug, thiserror::Error)]
pub enum ProfileStrengthError {
    #[error(transparent)]
    Ledger(#[from] LedgerStoreError),
}
