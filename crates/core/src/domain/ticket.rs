// Support Ticket Domain Model

use crate::domain::enums::{TicketPriority, TicketStatus};
use crate::domain::user::UserId;
use crate::domain::validation::{TextRule, ValidationErrors, Validator};
use serde::{Deserialize, Serialize};

pub type TicketId = i64;

const SUBJECT: TextRule = TextRule::trimmed(
    5,
    200,
    "Subject must be at least 5 characters",
    "Subject cannot exceed 200 characters",
);
const DESCRIPTION: TextRule = TextRule::verbatim(
    10,
    5000,
    "Description must be at least 10 characters",
    "Description cannot exceed 5000 characters",
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub user_id: UserId,
    pub subject: String,
    pub description: String,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TicketDraft {
    pub user_id: i64,
    pub subject: String,
    pub description: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
}

impl TicketDraft {
    pub fn validate(self) -> Result<NewTicket, ValidationErrors> {
        let mut v = Validator::new();

        let user_id = v.id("user_id", self.user_id, "User ID is required");
        let subject = v.text("subject", &self.subject, &SUBJECT);
        let description = v.text("description", &self.description, &DESCRIPTION);
        let status: TicketStatus = v.choice("status", self.status.as_deref());
        let priority: TicketPriority = v.choice("priority", self.priority.as_deref());

        v.finish()?;

        Ok(NewTicket {
            user_id,
            subject,
            description,
            status,
            priority,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTicket {
    pub user_id: UserId,
    pub subject: String,
    pub description: String,
    pub status: TicketStatus,
    pub priority: TicketPriority,
}
