use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};

use super::super::domain::{LifeWheelCategory, SignalReading};
use super::super::records::{
    is_present, parse_timestamp, CheckInRecord, GoalRecord, HabitRecord, IdentityTestRecord,
    JournalEntryRecord, VisionImageRecord,
};

const CATEGORY_COUNT: f64 = LifeWheelCategory::COUNT as f64;
const JOURNAL_WINDOW_DAYS: i64 = 14;
const JOURNAL_TARGET_ENTRIES: f64 = 7.0;
const JOURNAL_RICH_WORDS: usize = 50;
const MAX_ACTIVE_HABITS: usize = 12;
const DEFAULT_VISION_REVIEW_DAYS: u32 = 30;
const CHECK_IN_IMBALANCE_SPREAD: f64 = 5.0;
const IDENTITY_TEST_TARGET: f64 = 3.0;
const IDENTITY_RETAKE_DAYS: i64 = 180;

pub fn goal_signal(rows: &[GoalRecord], now: DateTime<Utc>) -> SignalReading {
    let categories: BTreeSet<LifeWheelCategory> = rows
        .iter()
        .filter_map(|goal| goal.category.as_deref().and_then(LifeWheelCategory::parse))
        .collect();

    let rich = rows.iter().filter(|goal| goal_is_rich(goal)).count();
    let latest = latest_timestamp(
        rows.iter()
            .flat_map(|goal| [goal.updated_at.as_deref(), goal.created_at.as_deref()]),
    );
    let needs_review = rows.iter().any(|goal| {
        goal.status
            .as_deref()
            .map(normalize_token)
            .map(|status| status == "at_risk" || status == "off_track")
            .unwrap_or(false)
    });

    SignalReading::new(
        ratio(categories.len() as f64, CATEGORY_COUNT),
        ratio(rich as f64, rows.len() as f64),
        days_since(latest, now),
        needs_review,
    )
}

fn goal_is_rich(goal: &GoalRecord) -> bool {
    [
        goal.description.as_deref(),
        goal.progress_note.as_deref(),
        goal.timing_note.as_deref(),
        goal.target_date.as_deref(),
        goal.estimated_duration.as_deref(),
    ]
    .into_iter()
    .any(is_present)
}

pub fn habit_signal(rows: &[HabitRecord], now: DateTime<Utc>) -> SignalReading {
    let active: Vec<&HabitRecord> = rows.iter().filter(|habit| habit.is_active).collect();
    let domains: BTreeSet<LifeWheelCategory> = active
        .iter()
        .filter_map(|habit| habit.domain.as_deref().and_then(LifeWheelCategory::parse))
        .collect();

    let rich = active
        .iter()
        .filter(|habit| {
            is_present(habit.description.as_deref())
                || is_present(habit.cue.as_deref())
                || habit.target_per_week.is_some()
        })
        .count();

    let latest = latest_timestamp(rows.iter().flat_map(|habit| {
        [
            habit.last_completed_at.as_deref(),
            habit.updated_at.as_deref(),
            habit.created_at.as_deref(),
        ]
    }));

    SignalReading::new(
        ratio(domains.len() as f64, CATEGORY_COUNT),
        ratio(rich as f64, active.len() as f64),
        days_since(latest, now),
        active.len() > MAX_ACTIVE_HABITS,
    )
}

pub fn journal_signal(rows: &[JournalEntryRecord], now: DateTime<Utc>) -> SignalReading {
    let recent = rows
        .iter()
        .filter_map(|entry| days_since(entry_timestamp(entry), now))
        .filter(|days| *days <= JOURNAL_WINDOW_DAYS)
        .count();

    let rich = rows
        .iter()
        .filter(|entry| {
            entry.content.split_whitespace().count() >= JOURNAL_RICH_WORDS
                || (entry.mood.is_some() && !entry.tags.is_empty())
        })
        .count();

    let latest = rows.iter().filter_map(entry_timestamp).max();

    SignalReading::new(
        ratio(recent as f64, JOURNAL_TARGET_ENTRIES),
        ratio(rich as f64, rows.len() as f64),
        days_since(latest, now),
        false,
    )
}

fn entry_timestamp(entry: &JournalEntryRecord) -> Option<DateTime<Utc>> {
    entry
        .entry_date
        .as_deref()
        .and_then(parse_timestamp)
        .or_else(|| entry.created_at.as_deref().and_then(parse_timestamp))
}

pub fn vision_signal(rows: &[VisionImageRecord], now: DateTime<Utc>) -> SignalReading {
    let categories: BTreeSet<LifeWheelCategory> = rows
        .iter()
        .filter_map(|image| image.category.as_deref().and_then(LifeWheelCategory::parse))
        .collect();

    let rich = rows
        .iter()
        .filter(|image| {
            is_present(image.caption.as_deref())
                && image
                    .category
                    .as_deref()
                    .and_then(LifeWheelCategory::parse)
                    .is_some()
        })
        .count();

    let latest = latest_timestamp(rows.iter().flat_map(|image| {
        [
            image.last_reviewed_at.as_deref(),
            image.created_at.as_deref(),
        ]
    }));

    let needs_review = rows.iter().any(|image| {
        let reviewed = image
            .last_reviewed_at
            .as_deref()
            .and_then(parse_timestamp)
            .or_else(|| image.created_at.as_deref().and_then(parse_timestamp));
        let interval = image
            .review_interval_days
            .unwrap_or(DEFAULT_VISION_REVIEW_DAYS);
        days_since(reviewed, now)
            .map(|days| days >= i64::from(interval))
            .unwrap_or(false)
    });

    SignalReading::new(
        ratio(categories.len() as f64, CATEGORY_COUNT),
        ratio(rich as f64, rows.len() as f64),
        days_since(latest, now),
        needs_review,
    )
}

pub fn check_in_signal(rows: &[CheckInRecord], now: DateTime<Utc>) -> SignalReading {
    let latest_at = rows
        .iter()
        .filter_map(|check_in| check_in.created_at.as_deref().and_then(parse_timestamp))
        .max();

    // Rows arrive newest first; fall back to that order when no timestamp parses.
    let latest = rows
        .iter()
        .find(|check_in| {
            latest_at.is_some()
                && check_in.created_at.as_deref().and_then(parse_timestamp) == latest_at
        })
        .or_else(|| rows.first());

    let latest_rated = latest.map(rated_categories).unwrap_or_default();
    let rich = rows
        .iter()
        .filter(|check_in| rated_categories(check_in).len() == LifeWheelCategory::COUNT)
        .count();

    let needs_review = latest
        .map(|check_in| {
            let values: Vec<f64> = rated_categories(check_in).into_values().collect();
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            values.len() >= 2 && max - min >= CHECK_IN_IMBALANCE_SPREAD
        })
        .unwrap_or(false);

    SignalReading::new(
        ratio(latest_rated.len() as f64, CATEGORY_COUNT),
        ratio(rich as f64, rows.len() as f64),
        days_since(latest_at, now),
        needs_review,
    )
}

fn rated_categories(check_in: &CheckInRecord) -> BTreeMap<LifeWheelCategory, f64> {
    check_in
        .scores
        .iter()
        .filter(|(_, value)| value.is_finite())
        .filter_map(|(key, value)| LifeWheelCategory::parse(key).map(|category| (category, *value)))
        .collect()
}

pub fn identity_signal(rows: &[IdentityTestRecord], now: DateTime<Utc>) -> SignalReading {
    let test_types: BTreeSet<String> = rows
        .iter()
        .map(|test| normalize_token(&test.test_type))
        .filter(|kind| !kind.is_empty())
        .collect();

    let rich = rows
        .iter()
        .filter(|test| is_present(test.result_summary.as_deref()))
        .count();

    let latest = latest_timestamp(rows.iter().map(|test| test.completed_at.as_deref()));
    let recency_days = days_since(latest, now);

    SignalReading::new(
        ratio(test_types.len() as f64, IDENTITY_TEST_TARGET),
        ratio(rich as f64, rows.len() as f64),
        recency_days,
        recency_days
            .map(|days| days > IDENTITY_RETAKE_DAYS)
            .unwrap_or(false),
    )
}

/// Goals per life-wheel category, with every category present.
pub fn goals_by_category(rows: &[GoalRecord]) -> BTreeMap<LifeWheelCategory, u32> {
    tally(
        rows.iter()
            .filter_map(|goal| goal.category.as_deref().and_then(LifeWheelCategory::parse)),
    )
}

/// Active habits per life-wheel domain, with every domain present.
pub fn habits_by_domain(rows: &[HabitRecord]) -> BTreeMap<LifeWheelCategory, u32> {
    tally(
        rows.iter()
            .filter(|habit| habit.is_active)
            .filter_map(|habit| habit.domain.as_deref().and_then(LifeWheelCategory::parse)),
    )
}

fn tally(
    categories: impl Iterator<Item = LifeWheelCategory>,
) -> BTreeMap<LifeWheelCategory, u32> {
    let mut counts = LifeWheelCategory::zeroed_counts();
    for category in categories {
        *counts.entry(category).or_insert(0) += 1;
    }
    counts
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator <= 0.0 {
        return 0.0;
    }
    (numerator / denominator).clamp(0.0, 1.0)
}

fn latest_timestamp<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Option<DateTime<Utc>> {
    values.flatten().filter_map(parse_timestamp).max()
}

fn days_since(latest: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Option<i64> {
    latest.map(|timestamp| (now - timestamp).num_days().max(0))
}

fn normalize_token(raw: &str) -> String {
    raw.trim()
        .to_ascii_lowercase()
        .chars()
        .map(|ch| if ch == '-' || ch == ' ' { '_' } else { ch })
        .collect()
}
