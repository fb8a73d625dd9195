// Contract Domain Model
//
// A contract ties a job to one hired talent and tracks how much of the agreed
// total has been paid.

use crate::domain::enums::{ContractStatus, PaymentStatus};
use crate::domain::job::JobId;
use crate::domain::user::UserId;
use crate::domain::validation::{RangeRule, TextRule, ValidationErrors, Validator};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type ContractId = i64;

pub const MAX_CONTRACT_AMOUNT: f64 = 10_000_000.0;

const TOTAL_AMOUNT: RangeRule = RangeRule::new(
    0.0,
    MAX_CONTRACT_AMOUNT,
    "Total amount must be positive",
    "Total amount is too high",
);
const AMOUNT_PAID: RangeRule = RangeRule::new(
    0.0,
    MAX_CONTRACT_AMOUNT,
    "Amount paid cannot be negative",
    "Amount paid is too high",
);
const TERMS: TextRule = TextRule::trimmed(0, 20_000, "", "Terms cannot exceed 20000 characters");

const MSG_OVERPAID: &str = "Amount paid cannot exceed total amount";
const MSG_PAYMENT_AMOUNT: &str = "Payment amount must be greater than 0";
const MSG_DATE_ORDER: &str = "End date must be after start date";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: ContractId,
    pub job_id: JobId,
    pub talent_id: UserId,
    pub company_id: UserId,
    pub status: ContractStatus,
    pub payment_status: PaymentStatus,
    pub total_amount: f64,
    pub amount_paid: f64,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub terms: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Contract {
    pub fn outstanding(&self) -> f64 {
        (self.total_amount - self.amount_paid).max(0.0)
    }

    /// True when `user_id` is the talent or the company on this contract
    pub fn is_party(&self, user_id: UserId) -> bool {
        self.talent_id == user_id || self.company_id == user_id
    }

    /// The other side of the contract from `user_id`
    pub fn counterparty(&self, user_id: UserId) -> Option<UserId> {
        if user_id == self.talent_id {
            Some(self.company_id)
        } else if user_id == self.company_id {
            Some(self.talent_id)
        } else {
            None
        }
    }

    /// Apply a payment of `amount`, returning the new (amount_paid, payment_status)
    ///
    /// Sums are taken in whole cents, so paying exactly the outstanding
    /// balance always settles the contract.
    pub fn apply_payment(&self, amount: f64) -> Result<(f64, PaymentStatus), ValidationErrors> {
        let paid = to_cents(self.amount_paid) + payment_cents(amount)?;
        if paid > to_cents(self.total_amount) {
            return Err(overpaid());
        }
        let paid = from_cents(paid);
        Ok((paid, PaymentStatus::for_amounts(paid, self.total_amount)))
    }
}

/// Money rounded to whole cents
pub fn to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

pub fn from_cents(cents: i64) -> f64 {
    cents as f64 / 100.0
}

fn round_money(amount: f64) -> f64 {
    from_cents(to_cents(amount))
}

/// A payment in cents; anything that rounds to nothing is rejected
pub fn payment_cents(amount: f64) -> Result<i64, ValidationErrors> {
    if !amount.is_finite() || to_cents(amount) <= 0 {
        return Err(ValidationErrors::single("amount", MSG_PAYMENT_AMOUNT));
    }
    Ok(to_cents(amount))
}

pub fn overpaid() -> ValidationErrors {
    ValidationErrors::single("amount_paid", MSG_OVERPAID)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContractDraft {
    pub job_id: i64,
    pub talent_id: i64,
    pub company_id: i64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
    pub total_amount: f64,
    #[serde(default)]
    pub amount_paid: Option<f64>,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub terms: Option<String>,
}

impl ContractDraft {
    pub fn validate(self) -> Result<NewContract, ValidationErrors> {
        let mut v = Validator::new();

        let job_id = v.id("job_id", self.job_id, "Job ID is required");
        let talent_id = v.id("talent_id", self.talent_id, "Talent ID is required");
        let company_id = v.id("company_id", self.company_id, "Company ID is required");
        let status: ContractStatus = v.choice("status", self.status.as_deref());
        let payment_status: PaymentStatus =
            v.choice("payment_status", self.payment_status.as_deref());
        let total_amount = round_money(v.range("total_amount", self.total_amount, &TOTAL_AMOUNT));
        let amount_paid = v
            .optional_range("amount_paid", self.amount_paid, &AMOUNT_PAID)
            .map(round_money);
        let start_date = v.datetime("start_date", &self.start_date, "Invalid start date");
        let end_date =
            v.optional_datetime("end_date", self.end_date.as_deref(), "Invalid end date");
        let terms = v.optional_text("terms", self.terms.as_deref(), &TERMS);

        if let Some(paid) = amount_paid {
            if v.is_valid("amount_paid") && v.is_valid("total_amount") && to_cents(paid) > to_cents(total_amount) {
                v.fail("amount_paid", MSG_OVERPAID);
            }
        }
        v.date_order("start_date", start_date, "end_date", end_date, MSG_DATE_ORDER);

        v.finish()?;
        let start_date = start_date
            .ok_or_else(|| ValidationErrors::single("start_date", "Invalid start date"))?;

        Ok(NewContract {
            job_id,
            talent_id,
            company_id,
            status,
            payment_status,
            total_amount,
            amount_paid: amount_paid.unwrap_or(0.0),
            start_date,
            end_date,
            terms,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewContract {
    pub job_id: JobId,
    pub talent_id: UserId,
    pub company_id: UserId,
    pub status: ContractStatus,
    pub payment_status: PaymentStatus,
    pub total_amount: f64,
    pub amount_paid: f64,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub terms: Option<String>,
}

/// Commercial terms supplied when hiring from an application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContractTerms {
    pub total_amount: f64,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub terms: Option<String>,
}

impl ContractTerms {
    /// Combine with the parties resolved from the application and job
    pub fn into_draft(self, job_id: JobId, talent_id: UserId, company_id: UserId) -> ContractDraft {
        ContractDraft {
            job_id,
            talent_id,
            company_id,
            status: None,
            payment_status: None,
            total_amount: self.total_amount,
            amount_paid: None,
            start_date: self.start_date,
            end_date: self.end_date,
            terms: self.terms,
        }
    }
}
