use std::collections::BTreeMap;
use std::ops::{Index, IndexMut};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// XP paid for resolving any individually generated task.
pub const TASK_XP_REWARD: u32 = 25;

/// The six life-management domains scored by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaKey {
    Goals,
    Habits,
    Journal,
    VisionBoard,
    LifeWheel,
    Identity,
}

impl AreaKey {
    /// Declaration order doubles as the priority order for the global next task.
    pub const ALL: [AreaKey; 6] = [
        AreaKey::Goals,
        AreaKey::Habits,
        AreaKey::Journal,
        AreaKey::VisionBoard,
        AreaKey::LifeWheel,
        AreaKey::Identity,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            AreaKey::Goals => "goals",
            AreaKey::Habits => "habits",
            AreaKey::Journal => "journal",
            AreaKey::VisionBoard => "vision_board",
            AreaKey::LifeWheel => "life_wheel",
            AreaKey::Identity => "identity",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            AreaKey::Goals => "Goals",
            AreaKey::Habits => "Habits",
            AreaKey::Journal => "Journal",
            AreaKey::VisionBoard => "Vision board",
            AreaKey::LifeWheel => "Life wheel",
            AreaKey::Identity => "Identity",
        }
    }

    pub const fn navigation_target(self) -> NavigationTarget {
        match self {
            AreaKey::Goals => NavigationTarget::Goals,
            AreaKey::Habits => NavigationTarget::Habits,
            AreaKey::Journal => NavigationTarget::Journal,
            AreaKey::VisionBoard => NavigationTarget::Insights,
            AreaKey::LifeWheel => NavigationTarget::Checkins,
            AreaKey::Identity => NavigationTarget::Identity,
        }
    }
}

/// One value per area. The struct shape makes the closed key set a type-level guarantee.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AreaMap<T> {
    pub goals: T,
    pub habits: T,
    pub journal: T,
    pub vision_board: T,
    pub life_wheel: T,
    pub identity: T,
}

impl<T> AreaMap<T> {
    pub fn from_fn(mut f: impl FnMut(AreaKey) -> T) -> Self {
        Self {
            goals: f(AreaKey::Goals),
            habits: f(AreaKey::Habits),
            journal: f(AreaKey::Journal),
            vision_board: f(AreaKey::VisionBoard),
            life_wheel: f(AreaKey::LifeWheel),
            identity: f(AreaKey::Identity),
        }
    }

    pub fn get(&self, area: AreaKey) -> &T {
        match area {
            AreaKey::Goals => &self.goals,
            AreaKey::Habits => &self.habits,
            AreaKey::Journal => &self.journal,
            AreaKey::VisionBoard => &self.vision_board,
            AreaKey::LifeWheel => &self.life_wheel,
            AreaKey::Identity => &self.identity,
        }
    }

    pub fn get_mut(&mut self, area: AreaKey) -> &mut T {
        match area {
            AreaKey::Goals => &mut self.goals,
            AreaKey::Habits => &mut self.habits,
            AreaKey::Journal => &mut self.journal,
            AreaKey::VisionBoard => &mut self.vision_board,
            AreaKey::LifeWheel => &mut self.life_wheel,
            AreaKey::Identity => &mut self.identity,
        }
    }

    /// Iterates in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (AreaKey, &T)> + '_ {
        AreaKey::ALL.into_iter().map(move |area| (area, self.get(area)))
    }

    pub fn map<U>(&self, mut f: impl FnMut(AreaKey, &T) -> U) -> AreaMap<U> {
        AreaMap::from_fn(|area| f(area, self.get(area)))
    }
}

impl<T> Index<AreaKey> for AreaMap<T> {
    type Output = T;

    fn index(&self, area: AreaKey) -> &T {
        self.get(area)
    }
}

impl<T> IndexMut<AreaKey> for AreaMap<T> {
    fn index_mut(&mut self, area: AreaKey) -> &mut T {
        self.get_mut(area)
    }
}

/// Normalized observation of one area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AreaSignal {
    /// The upstream source failed; the area cannot be scored this pass.
    Unavailable,
    /// The source succeeded but returned no rows.
    NoData,
    Ok(SignalReading),
}

impl AreaSignal {
    pub fn is_ok(&self) -> bool {
        matches!(self, AreaSignal::Ok(_))
    }

    pub fn reading(&self) -> Option<&SignalReading> {
        match self {
            AreaSignal::Ok(reading) => Some(reading),
            _ => None,
        }
    }
}

/// Measurements carried by an `ok` signal. Absent fields degrade to zero during scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalReading {
    pub coverage: Option<f64>,
    pub quality: Option<f64>,
    pub recency_days: Option<i64>,
    #[serde(default)]
    pub needs_review: bool,
}

impl SignalReading {
    pub fn new(coverage: f64, quality: f64, recency_days: Option<i64>, needs_review: bool) -> Self {
        Self {
            coverage: Some(coverage),
            quality: Some(quality),
            recency_days,
            needs_review,
        }
    }
}

/// Fixed vocabulary explaining why an area scored low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    NoData,
    LowCoverage,
    LowRecency,
    LowQuality,
    NeedsReview,
    StaleSnapshot,
    ErrorFallback,
}

impl ReasonCode {
    /// Informational reasons never become tasks.
    pub const fn is_actionable(self) -> bool {
        !matches!(self, ReasonCode::StaleSnapshot | ReasonCode::ErrorFallback)
    }

    /// Suffix used in task ids. Changing one breaks ledger idempotency.
    pub const fn slug(self) -> &'static str {
        match self {
            ReasonCode::NoData => "start",
            ReasonCode::LowCoverage => "coverage",
            ReasonCode::LowRecency => "recency",
            ReasonCode::LowQuality => "quality",
            ReasonCode::NeedsReview => "review",
            ReasonCode::StaleSnapshot => "stale",
            ReasonCode::ErrorFallback => "error",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ReasonCode::NoData => "no data yet",
            ReasonCode::LowCoverage => "low coverage",
            ReasonCode::LowRecency => "not updated recently",
            ReasonCode::LowQuality => "entries lack detail",
            ReasonCode::NeedsReview => "needs review",
            ReasonCode::StaleSnapshot => "partial snapshot",
            ReasonCode::ErrorFallback => "data unavailable",
        }
    }
}

/// Screen a task sends the user to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationTarget {
    Goals,
    Habits,
    Journal,
    Insights,
    Checkins,
    Identity,
}

/// Deterministic micro-recommendation; `id` is the ledger idempotency key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextTask {
    pub id: String,
    pub area: AreaKey,
    pub title: String,
    pub description: String,
    pub eta_minutes: u8,
    pub xp_reward: u32,
    pub reasons: Vec<ReasonCode>,
    pub target: NavigationTarget,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultMeta {
    pub computed_at: DateTime<Utc>,
    pub used_fallback_data: bool,
}

/// Output of one scoring pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStrengthResult {
    pub area_scores: AreaMap<Option<u8>>,
    pub reasons_by_area: AreaMap<Vec<ReasonCode>>,
    pub next_tasks_by_area: AreaMap<Vec<NextTask>>,
    pub global_next_task: Option<NextTask>,
    pub overall_percent: Option<u8>,
    pub meta: ResultMeta,
}

impl ProfileStrengthResult {
    pub fn tasks(&self) -> impl Iterator<Item = &NextTask> + '_ {
        self.next_tasks_by_area
            .iter()
            .flat_map(|(_, tasks)| tasks.iter())
    }
}

/// Categories of the life wheel. Goals, habits, vision images, and check-ins reference them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeWheelCategory {
    Health,
    Career,
    Finances,
    Relationships,
    Family,
    PersonalGrowth,
    Recreation,
    Environment,
}

impl LifeWheelCategory {
    pub const ALL: [LifeWheelCategory; 8] = [
        LifeWheelCategory::Health,
        LifeWheelCategory::Career,
        LifeWheelCategory::Finances,
        LifeWheelCategory::Relationships,
        LifeWheelCategory::Family,
        LifeWheelCategory::PersonalGrowth,
        LifeWheelCategory::Recreation,
        LifeWheelCategory::Environment,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub const fn as_str(self) -> &'static str {
        match self {
            LifeWheelCategory::Health => "health",
            LifeWheelCategory::Career => "career",
            LifeWheelCategory::Finances => "finances",
            LifeWheelCategory::Relationships => "relationships",
            LifeWheelCategory::Family => "family",
            LifeWheelCategory::PersonalGrowth => "personal_growth",
            LifeWheelCategory::Recreation => "recreation",
            LifeWheelCategory::Environment => "environment",
        }
    }

    /// Lenient parse of the free-form category strings stored on rows.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized: String = raw
            .trim()
            .to_ascii_lowercase()
            .chars()
            .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
            .collect();

        let category = match normalized.trim_matches('_') {
            "health" | "fitness" | "health_fitness" | "wellness" => LifeWheelCategory::Health,
            "career" | "work" | "career_work" => LifeWheelCategory::Career,
            "finances" | "finance" | "money" => LifeWheelCategory::Finances,
            "relationships" | "relationship" | "love" | "romance" => {
                LifeWheelCategory::Relationships
            }
            "family" | "friends" | "family_friends" => LifeWheelCategory::Family,
            "personal_growth" | "growth" | "learning" | "personal_development" => {
                LifeWheelCategory::PersonalGrowth
            }
            "recreation" | "fun" | "fun_recreation" | "leisure" => LifeWheelCategory::Recreation,
            "environment" | "home" | "physical_environment" => LifeWheelCategory::Environment,
            _ => return None,
        };

        Some(category)
    }

    /// Count map with every category present, defaulting to zero.
    pub fn zeroed_counts() -> BTreeMap<LifeWheelCategory, u32> {
        Self::ALL.into_iter().map(|category| (category, 0)).collect()
    }
}

/// Detailed counts consumed by the coverage bonuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileMetrics {
    pub goals_by_category: BTreeMap<LifeWheelCategory, u32>,
    pub habits_by_domain: BTreeMap<LifeWheelCategory, u32>,
}

impl Default for ProfileMetrics {
    fn default() -> Self {
        Self {
            goals_by_category: LifeWheelCategory::zeroed_counts(),
            habits_by_domain: LifeWheelCategory::zeroed_counts(),
        }
    }
}

impl ProfileMetrics {
    pub fn goals_in(&self, category: LifeWheelCategory) -> u32 {
        self.goals_by_category.get(&category).copied().unwrap_or(0)
    }

    pub fn habits_in(&self, category: LifeWheelCategory) -> u32 {
        self.habits_by_domain.get(&category).copied().unwrap_or(0)
    }
}

/// Everything the scorer and the bonus detection read from one refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStrengthInput {
    pub signals: AreaMap<AreaSignal>,
    #[serde(default)]
    pub metrics: ProfileMetrics,
    pub computed_at: DateTime<Utc>,
}

/// A scored refresh: the signals and metrics alongside the result computed from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPass {
    pub input: ProfileStrengthInput,
    pub result: ProfileStrengthResult,
}
