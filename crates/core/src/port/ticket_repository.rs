// Ticket Repository Port (Interface)

use crate::domain::{NewTicket, Ticket, TicketId, TicketStatus, UserId};
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait TicketRepository: Send + Sync {
    async fn insert(&self, ticket: &NewTicket) -> Result<Ticket>;

    async fn find_by_id(&self, id: TicketId) -> Result<Option<Ticket>>;

    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Ticket>>;

    /// Every ticket, newest first (admin view)
    async fn find_all(&self) -> Result<Vec<Ticket>>;

    async fn update_status(&self, id: TicketId, status: TicketStatus) -> Result<()>;
}
