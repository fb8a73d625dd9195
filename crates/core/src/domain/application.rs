// Application Domain Model (a talent's bid on a job)

use crate::domain::enums::ApplicationStatus;
use crate::domain::job::JobId;
use crate::domain::user::UserId;
use crate::domain::validation::{RangeRule, TextRule, ValidationErrors, Validator};
use serde::{Deserialize, Serialize};

pub type ApplicationId = i64;

const COVER_LETTER: TextRule =
    TextRule::trimmed(0, 10_000, "", "Cover letter cannot exceed 10000 characters");
const PROPOSED_RATE: RangeRule = RangeRule::new(
    0.0,
    1_000_000.0,
    "Proposed rate must be positive",
    "Proposed rate is too high",
);
const ESTIMATED_DAYS: RangeRule = RangeRule::new(
    1.0,
    365.0,
    "Estimated days must be at least 1",
    "Estimated days cannot exceed 365",
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub talent_id: UserId,
    pub status: ApplicationStatus,
    pub cover_letter: Option<String>,
    pub proposed_rate: Option<f64>,
    pub estimated_days: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Application {
    /// Only undecided applications can turn into a contract
    pub fn is_hireable(&self) -> bool {
        matches!(
            self.status,
            ApplicationStatus::Pending | ApplicationStatus::Shortlisted
        )
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationDraft {
    pub job_id: i64,
    pub talent_id: i64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub cover_letter: Option<String>,
    #[serde(default)]
    pub proposed_rate: Option<f64>,
    #[serde(default)]
    pub estimated_days: Option<i64>,
}

impl ApplicationDraft {
    pub fn new(job_id: JobId, talent_id: UserId) -> Self {
        Self {
            job_id,
            talent_id,
            ..Default::default()
        }
    }

    pub fn validate(self) -> Result<NewApplication, ValidationErrors> {
        let mut v = Validator::new();

        let job_id = v.id("job_id", self.job_id, "Job ID is required");
        let talent_id = v.id("talent_id", self.talent_id, "Talent ID is required");
        let status: ApplicationStatus = v.choice("status", self.status.as_deref());
        let cover_letter =
            v.optional_text("cover_letter", self.cover_letter.as_deref(), &COVER_LETTER);
        let proposed_rate = v.optional_range("proposed_rate", self.proposed_rate, &PROPOSED_RATE);
        let estimated_days = self
            .estimated_days
            .map(|d| v.int_range("estimated_days", d, &ESTIMATED_DAYS));

        v.finish()?;

        Ok(NewApplication {
            job_id,
            talent_id,
            status,
            cover_letter,
            proposed_rate,
            estimated_days,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewApplication {
    pub job_id: JobId,
    pub talent_id: UserId,
    pub status: ApplicationStatus,
    pub cover_letter: Option<String>,
    pub proposed_rate: Option<f64>,
    pub estimated_days: Option<i64>,
}
