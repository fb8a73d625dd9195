// Review Domain Model

use crate::domain::contract::ContractId;
use crate::domain::user::UserId;
use crate::domain::validation::{RangeRule, TextRule, ValidationErrors, Validator};
use serde::{Deserialize, Serialize};

pub type ReviewId = i64;

const RATING: RangeRule = RangeRule::new(
    1.0,
    5.0,
    "Rating must be at least 1",
    "Rating cannot exceed 5",
);
const COMMENT: TextRule = TextRule::trimmed(0, 2000, "", "Comment cannot exceed 2000 characters");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub contract_id: ContractId,
    pub reviewer_id: UserId,
    pub reviewee_id: UserId,
    pub rating: i64,
    pub comment: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewDraft {
    pub contract_id: i64,
    pub reviewer_id: i64,
    pub reviewee_id: i64,
    pub rating: i64,
    #[serde(default)]
    pub comment: Option<String>,
}

impl ReviewDraft {
    pub fn validate(self) -> Result<NewReview, ValidationErrors> {
        let mut v = Validator::new();

        let contract_id = v.id("contract_id", self.contract_id, "Contract ID is required");
        let reviewer_id = v.id("reviewer_id", self.reviewer_id, "Reviewer ID is required");
        let reviewee_id = v.id("reviewee_id", self.reviewee_id, "Reviewee ID is required");
        let rating = v.int_range("rating", self.rating, &RATING);
        let comment = v.optional_text("comment", self.comment.as_deref(), &COMMENT);

        if v.is_valid("reviewer_id") && v.is_valid("reviewee_id") && reviewer_id == reviewee_id {
            v.fail("reviewee_id", "Users cannot review themselves");
        }

        v.finish()?;

        Ok(NewReview {
            contract_id,
            reviewer_id,
            reviewee_id,
            rating,
            comment,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub contract_id: ContractId,
    pub reviewer_id: UserId,
    pub reviewee_id: UserId,
    pub rating: i64,
    pub comment: Option<String>,
}
