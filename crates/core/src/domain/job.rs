// Job Domain Model

use crate::domain::enums::{JobCategory, JobStatus, PayType};
use crate::domain::user::UserId;
use crate::domain::validation::{RangeRule, TextRule, ValidationErrors, Validator};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Job ID (SQLite rowid)
pub type JobId = i64;

const TITLE: TextRule = TextRule::trimmed(
    5,
    200,
    "Title must be at least 5 characters",
    "Title cannot exceed 200 characters",
);
const DESCRIPTION: TextRule = TextRule::trimmed(
    10,
    10_000,
    "Description must be at least 10 characters",
    "Description cannot exceed 10000 characters",
);
const LOCATION: TextRule = TextRule::trimmed(
    1,
    200,
    "Location is required",
    "Location cannot exceed 200 characters",
);
const PAY_AMOUNT: RangeRule = RangeRule::new(
    0.0,
    1_000_000.0,
    "Pay amount must be positive",
    "Pay amount is too high",
);

/// Stored job posting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub company_id: UserId,
    pub title: String,
    pub description: String,
    pub category: JobCategory,
    pub location: String,
    pub pay_type: PayType,
    pub pay_amount: f64,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: JobStatus,
    pub created_at: i64, // epoch ms
    pub updated_at: i64,
}

impl Job {
    pub fn is_open(&self) -> bool {
        self.status == JobStatus::Open
    }
}

/// Public company fields joined onto a job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanySummary {
    pub id: UserId,
    pub name: String,
    pub profile_photo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobWithCompany {
    pub job: Job,
    /// None when the company row is gone
    pub company: Option<CompanySummary>,
}

/// Job posting input
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobDraft {
    pub company_id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    #[serde(default)]
    pub pay_type: Option<String>,
    pub pay_amount: f64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl JobDraft {
    pub fn validate(self) -> Result<NewJob, ValidationErrors> {
        let mut v = Validator::new();

        let company_id = v.id("company_id", self.company_id, "Company ID is required");
        let title = v.text("title", &self.title, &TITLE);
        let description = v.text("description", &self.description, &DESCRIPTION);
        let category = v.required_choice::<JobCategory>("category", &self.category);
        let location = v.text("location", &self.location, &LOCATION);
        let pay_type: PayType = v.choice("pay_type", self.pay_type.as_deref());
        let pay_amount = v.range("pay_amount", self.pay_amount, &PAY_AMOUNT);
        let status: JobStatus = v.choice("status", self.status.as_deref());
        let start_date =
            v.optional_datetime("start_date", self.start_date.as_deref(), "Invalid start date");
        let end_date =
            v.optional_datetime("end_date", self.end_date.as_deref(), "Invalid end date");
        v.date_order(
            "start_date",
            start_date,
            "end_date",
            end_date,
            "End date must be after start date",
        );

        v.finish()?;
        let category =
            category.ok_or_else(|| ValidationErrors::single("category", "Category is required"))?;

        Ok(NewJob {
            company_id,
            title,
            description,
            category,
            location,
            pay_type,
            pay_amount,
            start_date,
            end_date,
            status,
        })
    }
}

/// Insertable job record
#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub company_id: UserId,
    pub title: String,
    pub description: String,
    pub category: JobCategory,
    pub location: String,
    pub pay_type: PayType,
    pub pay_amount: f64,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: JobStatus,
}
