//! Profile strength: per-area signals, the completeness score, and the XP ledger that pays for
//! resolved recommendations exactly once.

pub mod domain;
pub mod ledger;
pub mod records;
pub mod router;
pub mod scoring;
pub mod service;
pub mod signals;

#[cfg(test)]
mod tests;

pub use domain::{
    AreaKey, AreaMap, AreaSignal, LifeWheelCategory, NavigationTarget, NextTask, ProfileMetrics,
    ProfileStrengthInput, ProfileStrengthResult, ReasonCode, ResultMeta, ScoredPass,
    SignalReading, TASK_XP_REWARD,
};
pub use ledger::{
    apply_event, detect_bonus_events, detect_resolved_tasks, detect_xp_events, fold_events,
    ledger_key, BonusKind, FileLedgerStore, InMemoryLedgerStore, LedgerStore, LedgerStoreError,
    XpEvent, XpEventKind, XpLedger, XpLedgerState,
};
pub use records::{
    CheckInRecord, GoalRecord, HabitRecord, IdentityTestRecord, JournalEntryRecord,
    VisionImageRecord,
};
pub use router::{profile_strength_router, ScoreRequest};
pub use scoring::{AreaWeights, ScoringEngine};
pub use service::{
    ProfileStrengthError, ProfileStrengthService, RefreshOutcome, DEFAULT_SNAPSHOT_CAPACITY,
};
pub use signals::{ProfileDataSource, SignalBuilder, SourceError};
