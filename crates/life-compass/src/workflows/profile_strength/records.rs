//! Row shapes returned by the six domain collaborators.
//!
//! Only the columns the signal reducers read are modelled. Timestamps stay as the raw strings
//! the store hands back; [`parse_timestamp`] decides what counts as a usable date.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalRecord {
    pub id: String,
    pub title: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub progress_note: Option<String>,
    pub timing_note: Option<String>,
    pub target_date: Option<String>,
    pub estimated_duration: Option<String>,
    pub status: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HabitRecord {
    pub id: String,
    pub name: String,
    pub domain: Option<String>,
    pub is_active: bool,
    pub description: Option<String>,
    pub cue: Option<String>,
    pub target_per_week: Option<u8>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub last_completed_at: Option<String>,
}

impl Default for HabitRecord {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            domain: None,
            is_active: true,
            description: None,
            cue: None,
            target_per_week: None,
            created_at: None,
            updated_at: None,
            last_completed_at: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalEntryRecord {
    pub id: String,
    pub entry_date: Option<String>,
    pub created_at: Option<String>,
    pub content: String,
    /// Self-reported mood on a 1-5 scale.
    pub mood: Option<u8>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionImageRecord {
    pub id: String,
    pub caption: Option<String>,
    pub category: Option<String>,
    pub created_at: Option<String>,
    pub last_reviewed_at: Option<String>,
    pub review_interval_days: Option<u32>,
}

/// A life-wheel check-in: one 0-10 rating per category the user filled in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckInRecord {
    pub id: String,
    pub created_at: Option<String>,
    pub scores: BTreeMap<String, f64>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityTestRecord {
    pub id: String,
    pub test_type: String,
    pub completed_at: Option<String>,
    pub result_summary: Option<String>,
}

/// Accepts RFC 3339, naive `YYYY-MM-DDTHH:MM:SS`, and bare `YYYY-MM-DD` values.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub(crate) fn is_present(value: Option<&str>) -> bool {
    value.map(|text| !text.trim().is_empty()).unwrap_or(false)
}
