// SQLite TicketRepository Implementation

use crate::error::map_sqlx_error;
use async_trait::async_trait;
use opskill_core::domain::{NewTicket, Ticket, TicketId, TicketStatus, UserId};
use opskill_core::error::{AppError, Result};
use opskill_core::port::{TicketRepository, TimeProvider};
use sqlx::SqlitePool;
use std::sync::Arc;

pub struct SqliteTicketRepository {
    pool: SqlitePool,
    time_provider: Arc<dyn TimeProvider>,
}

impl SqliteTicketRepository {
    pub fn new(pool: SqlitePool, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            pool,
            time_provider,
        }
    }
}

#[async_trait]
impl TicketRepository for SqliteTicketRepository {
    async fn insert(&self, ticket: &NewTicket) -> Result<Ticket> {
        let now = self.time_provider.now_millis();

        let row = sqlx::query_as::<_, TicketRow>(
            r#"
            INSERT INTO tickets (user_id, subject, description, status, priority, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(ticket.user_id)
        .bind(&ticket.subject)
        .bind(&ticket.description)
        .bind(ticket.status.as_str())
        .bind(ticket.priority.as_str())
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.into_ticket()
    }

    async fn find_by_id(&self, id: TicketId) -> Result<Option<Ticket>> {
        let row = sqlx::query_as::<_, TicketRow>("SELECT * FROM tickets WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(TicketRow::into_ticket).transpose()
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Ticket>> {
        let rows = sqlx::query_as::<_, TicketRow>(
            "SELECT * FROM tickets WHERE user_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(TicketRow::into_ticket).collect()
    }

    async fn find_all(&self) -> Result<Vec<Ticket>> {
        let rows =
            sqlx::query_as::<_, TicketRow>("SELECT * FROM tickets ORDER BY created_at DESC, id DESC")
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        rows.into_iter().map(TicketRow::into_ticket).collect()
    }

    async fn update_status(&self, id: TicketId, status: TicketStatus) -> Result<()> {
        let result = sqlx::query("UPDATE tickets SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(self.time_provider.now_millis())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Ticket", id));
        }
        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TicketRow {
    id: i64,
    user_id: i64,
    subject: String,
    description: String,
    status: String,
    priority: String,
    created_at: i64,
    updated_at: i64,
}

impl TicketRow {
    fn into_ticket(self) -> Result<Ticket> {
        Ok(Ticket {
            id: self.id,
            user_id: self.user_id,
            subject: self.subject,
            description: self.description,
            status: self.status.parse()?,
            priority: self.priority.parse()?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{insert_talent, setup_test_db};
    use opskill_core::domain::TicketPriority;
    use opskill_core::port::FixedTimeProvider;

    fn ticket(user_id: UserId) -> NewTicket {
        NewTicket {
            user_id,
            subject: "Payment not received".to_string(),
            description: "The company marked the gig done last week.".to_string(),
            status: TicketStatus::Open,
            priority: TicketPriority::High,
        }
    }

    #[tokio::test]
    async fn test_ticket_lifecycle() {
        let pool = setup_test_db().await;
        let user_id = insert_talent(&pool, "ravi@example.com").await;
        let other_id = insert_talent(&pool, "asha@example.com").await;
        let repo = SqliteTicketRepository::new(pool, Arc::new(FixedTimeProvider(40)));

        let created = repo.insert(&ticket(user_id)).await.unwrap();
        repo.insert(&ticket(other_id)).await.unwrap();
        assert_eq!(created.priority, TicketPriority::High);

        repo.update_status(created.id, TicketStatus::Resolved)
            .await
            .unwrap();
        let found = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found.status, TicketStatus::Resolved);

        assert_eq!(repo.find_by_user(user_id).await.unwrap().len(), 1);
        assert_eq!(repo.find_all().await.unwrap().len(), 2);

        let err = repo.update_status(999, TicketStatus::Closed).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
