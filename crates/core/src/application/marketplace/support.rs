// Support tickets

use super::MarketplaceService;
use crate::domain::{Ticket, TicketDraft, TicketId, TicketStatus, UserId};
use crate::error::{AppError, Result};
use tracing::info;

impl MarketplaceService {
    pub async fn open_ticket(&self, draft: TicketDraft) -> Result<Ticket> {
        let new_ticket = draft.validate()?;

        if self
            .repos
            .users
            .find_by_id(new_ticket.user_id)
            .await?
            .is_none()
        {
            return Err(AppError::not_found("User", new_ticket.user_id));
        }

        let ticket = self.repos.tickets.insert(&new_ticket).await?;
        info!(
            ticket_id = ticket.id,
            user_id = ticket.user_id,
            priority = %ticket.priority,
            "Ticket opened"
        );
        Ok(ticket)
    }

    pub async fn update_ticket_status(&self, id: TicketId, status: TicketStatus) -> Result<Ticket> {
        let ticket = self
            .repos
            .tickets
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Ticket", id))?;
        if ticket.status == TicketStatus::Closed && status != TicketStatus::Closed {
            return Err(AppError::InvalidState(format!("Ticket {} is CLOSED", id)));
        }

        self.repos.tickets.update_status(id, status).await?;
        info!(ticket_id = id, from = %ticket.status, to = %status, "Ticket status changed");
        Ok(Ticket { status, ..ticket })
    }

    /// Tickets raised by one user, or every ticket when `user_id` is None
    pub async fn list_tickets(&self, user_id: Option<UserId>) -> Result<Vec<Ticket>> {
        match user_id {
            Some(id) => self.repos.tickets.find_by_user(id).await,
            None => self.repos.tickets.find_all().await,
        }
    }
}
