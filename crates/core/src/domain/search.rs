// Search filters and result rows

use crate::domain::enums::{JobCategory, PayType};
use crate::domain::user::UserId;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Limit/offset window, clamped to sane bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit: limit.clamp(1, MAX_PAGE_SIZE),
            offset: offset.max(0),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

/// Filters over OPEN jobs; every present filter must match
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobSearch {
    #[serde(default)]
    pub category: Option<JobCategory>,
    /// Case-insensitive substring of the job location
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub min_pay: Option<f64>,
    #[serde(default)]
    pub pay_type: Option<PayType>,
    #[serde(default)]
    pub page: Page,
}

impl JobSearch {
    pub fn location_pattern(&self) -> Option<String> {
        like_pattern(self.location.as_deref())
    }
}

/// Filters over non-banned talents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TalentSearch {
    /// Every skill must be listed on the profile (case-insensitive)
    #[serde(default)]
    pub skills: Vec<String>,
    /// Case-insensitive substring of "city, state"
    #[serde(default)]
    pub location: Option<String>,
    /// Minimum average review rating
    #[serde(default)]
    pub min_rating: Option<f64>,
    #[serde(default)]
    pub page: Page,
}

impl TalentSearch {
    pub fn location_pattern(&self) -> Option<String> {
        like_pattern(self.location.as_deref())
    }

    /// Trimmed, lower-cased, non-empty skill needles
    ///
    /// Folding is ASCII-only to match SQLite's `LOWER()`.
    pub fn skill_needles(&self) -> Vec<String> {
        self.skills
            .iter()
            .map(|s| s.trim().to_ascii_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Talent listing row with aggregates computed from reviews and contracts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TalentSummary {
    pub id: UserId,
    pub name: String,
    pub profile_photo: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub aadhaar_verified: bool,
    pub skills: Vec<String>,
    /// Average rating received, 0 when unreviewed
    pub rating: f64,
    /// Distinct COMPLETED contracts as talent
    pub jobs_completed: i64,
}

/// `%needle%` for a LIKE match with `ESCAPE '\'`, or None for a blank needle
fn like_pattern(needle: Option<&str>) -> Option<String> {
    let needle = needle?.trim();
    if needle.is_empty() {
        return None;
    }
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for c in needle.to_ascii_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    Some(escaped)
}
