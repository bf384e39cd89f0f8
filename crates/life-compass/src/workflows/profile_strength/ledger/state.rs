use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::super::domain::AreaKey;

/// Schema version written with every persisted ledger.
pub const LEDGER_VERSION: u32 = 1;

/// One-time global milestones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusKind {
    GoalsCoverage,
    HabitsCoverage,
}

impl BonusKind {
    pub const ALL: [BonusKind; 2] = [BonusKind::GoalsCoverage, BonusKind::HabitsCoverage];

    pub const fn id(self) -> &'static str {
        match self {
            BonusKind::GoalsCoverage => "profile-strength-goals-coverage",
            BonusKind::HabitsCoverage => "profile-strength-habits-coverage",
        }
    }

    pub const fn xp(self) -> u32 {
        match self {
            BonusKind::GoalsCoverage => 100,
            BonusKind::HabitsCoverage => 250,
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            BonusKind::GoalsCoverage => "Goals cover every life area",
            BonusKind::HabitsCoverage => "Two habits in every life area",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LedgerBonuses {
    pub goals_coverage: bool,
    pub habits_coverage: bool,
}

impl LedgerBonuses {
    pub fn is_awarded(&self, bonus: BonusKind) -> bool {
        match bonus {
            BonusKind::GoalsCoverage => self.goals_coverage,
            BonusKind::HabitsCoverage => self.habits_coverage,
        }
    }

    fn award(&mut self, bonus: BonusKind) {
        match bonus {
            BonusKind::GoalsCoverage => self.goals_coverage = true,
            BonusKind::HabitsCoverage => self.habits_coverage = true,
        }
    }
}

/// Per-user record of what has already been paid out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XpLedgerState {
    #[serde(default = "legacy_version")]
    pub version: u32,
    #[serde(default)]
    pub completed_task_ids: BTreeSet<String>,
    #[serde(default)]
    pub bonuses: LedgerBonuses,
}

fn legacy_version() -> u32 {
    LEDGER_VERSION
}

impl Default for XpLedgerState {
    fn default() -> Self {
        Self {
            version: LEDGER_VERSION,
            completed_task_ids: BTreeSet::new(),
            bonuses: LedgerBonuses::default(),
        }
    }
}

impl XpLedgerState {
    /// Parses a persisted payload. Anything unreadable yields the zero state, which means a
    /// corrupted ledger can pay already-earned XP once more.
    pub fn from_json(payload: &str) -> Self {
        match serde_json::from_str::<XpLedgerState>(payload) {
            Ok(state) if state.version <= LEDGER_VERSION => Self {
                version: LEDGER_VERSION,
                ..state
            },
            Ok(state) => {
                warn!(
                    version = state.version,
                    supported = LEDGER_VERSION,
                    "ledger written by a newer schema; starting from an empty ledger"
                );
                Self::default()
            }
            Err(error) => {
                warn!(%error, "ledger payload unreadable; starting from an empty ledger");
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{}"))
    }

    pub fn is_completed(&self, task_id: &str) -> bool {
        self.completed_task_ids.contains(task_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XpEventKind {
    Task,
    Bonus,
}

/// One-shot award emitted by the ledger detection step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XpEvent {
    pub id: String,
    pub kind: XpEventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<AreaKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bonus: Option<BonusKind>,
    pub xp: u32,
    pub title: String,
}

impl XpEvent {
    pub fn task(id: impl Into<String>, area: AreaKey, xp: u32, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: XpEventKind::Task,
            area: Some(area),
            bonus: None,
            xp,
            title: title.into(),
        }
    }

    pub fn bonus(bonus: BonusKind) -> Self {
        Self {
            id: bonus.id().to_string(),
            kind: XpEventKind::Bonus,
            area: None,
            bonus: Some(bonus),
            xp: bonus.xp(),
            title: bonus.title().to_string(),
        }
    }
}

/// Folds one event into the ledger. Applying the same event twice is a no-op.
pub fn apply_event(mut state: XpLedgerState, event: &XpEvent) -> XpLedgerState {
    match (event.kind, event.bonus) {
        (XpEventKind::Bonus, Some(bonus)) => state.bonuses.award(bonus),
        (XpEventKind::Bonus, None) => {
            if let Some(bonus) = BonusKind::ALL.into_iter().find(|bonus| bonus.id() == event.id) {
                state.bonuses.award(bonus);
            }
        }
        (XpEventKind::Task, _) => {
            state.completed_task_ids.insert(event.id.clone());
        }
    }
    state
}

pub fn fold_events(state: XpLedgerState, events: &[XpEvent]) -> XpLedgerState {
    events.iter().fold(state, apply_event)
}
