//! Table rows and JSON printing for command results

use anyhow::Result;
use opskill_core::domain::{Job, TalentSummary, Ticket};
use serde::Serialize;
use tabled::{Table, Tabled};

#[derive(Tabled)]
pub struct JobRow {
    id: i64,
    title: String,
    category: String,
    location: String,
    pay: String,
    status: String,
}

impl From<&Job> for JobRow {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id,
            title: job.title.clone(),
            category: job.category.to_string(),
            location: job.location.clone(),
            pay: format!("{:.2} {}", job.pay_amount, job.pay_type),
            status: job.status.to_string(),
        }
    }
}

#[derive(Tabled)]
pub struct TalentRow {
    id: i64,
    name: String,
    location: String,
    skills: String,
    rating: String,
    jobs: i64,
    verified: String,
}

impl From<&TalentSummary> for TalentRow {
    fn from(talent: &TalentSummary) -> Self {
        let location = match (&talent.city, &talent.state) {
            (Some(city), Some(state)) => format!("{}, {}", city, state),
            (Some(place), None) | (None, Some(place)) => place.clone(),
            (None, None) => "-".to_string(),
        };
        Self {
            id: talent.id,
            name: talent.name.clone(),
            location,
            skills: talent.skills.join(", "),
            rating: format!("{:.1}", talent.rating),
            jobs: talent.jobs_completed,
            verified: if talent.aadhaar_verified { "yes" } else { "no" }.to_string(),
        }
    }
}

#[derive(Tabled)]
pub struct TicketRow {
    id: i64,
    user: i64,
    subject: String,
    status: String,
    priority: String,
}

impl From<&Ticket> for TicketRow {
    fn from(ticket: &Ticket) -> Self {
        Self {
            id: ticket.id,
            user: ticket.user_id,
            subject: ticket.subject.clone(),
            status: ticket.status.to_string(),
            priority: ticket.priority.to_string(),
        }
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Render `items` as a table through the row type `R`
pub fn print_table<'a, T, R>(items: &'a [T]) -> String
where
    R: Tabled + From<&'a T>,
{
    Table::new(items.iter().map(R::from)).to_string()
}
