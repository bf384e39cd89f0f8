//! Idempotent XP bookkeeping for profile strength.
//!
//! Detection and folding are pure functions over explicit values; only [`XpLedger`] touches
//! storage. Persistence is a plain read-modify-write per user, so two sessions writing the same
//! key can lose an update or pay a bonus twice. Hosts that run concurrent sessions for one user
//! need to serialise refreshes themselves.

mod detect;
mod state;
mod store;

pub use detect::{detect_bonus_events, detect_resolved_tasks, detect_xp_events};
pub use state::{
    apply_event, fold_events, BonusKind, LedgerBonuses, XpEvent, XpEventKind, XpLedgerState,
    LEDGER_VERSION,
};
pub use store::{ledger_key, FileLedgerStore, InMemoryLedgerStore, LedgerStore, LedgerStoreError};

use std::sync::Arc;

use tracing::warn;

/// Loads and persists per-user ledger state through a [`LedgerStore`].
pub struct XpLedger<L> {
    store: Arc<L>,
}

impl<L> XpLedger<L>
where
    L: LedgerStore + 'static,
{
    pub fn new(store: Arc<L>) -> Self {
        Self { store }
    }

    /// Never fails: missing, unreadable, or corrupt state loads as the zero state.
    pub fn load(&self, user_id: Option<&str>) -> XpLedgerState {
        let key = ledger_key(user_id);
        match self.store.read(&key) {
            Ok(Some(payload)) => XpLedgerState::from_json(&payload),
            Ok(None) => XpLedgerState::default(),
            Err(error) => {
                warn!(%key, %error, "ledger read failed; starting from an empty ledger");
                XpLedgerState::default()
            }
        }
    }

    pub fn persist(
        &self,
        user_id: Option<&str>,
        state: &XpLedgerState,
    ) -> Result<(), LedgerStoreError> {
        self.store.write(&ledger_key(user_id), &state.to_json())
    }
}
