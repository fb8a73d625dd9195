// SQLite ReviewRepository Implementation

use crate::error::map_sqlx_error;
use async_trait::async_trait;
use opskill_core::domain::{ContractId, NewReview, Review, UserId};
use opskill_core::error::Result;
use opskill_core::port::{ReviewRepository, TimeProvider};
use sqlx::SqlitePool;
use std::sync::Arc;

pub struct SqliteReviewRepository {
    pool: SqlitePool,
    time_provider: Arc<dyn TimeProvider>,
}

impl SqliteReviewRepository {
    pub fn new(pool: SqlitePool, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            pool,
            time_provider,
        }
    }
}

#[async_trait]
impl ReviewRepository for SqliteReviewRepository {
    /// Insert and refresh the reviewee's cached `users.rating`
    async fn insert(&self, review: &NewReview) -> Result<Review> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let row = sqlx::query_as::<_, ReviewRow>(
            r#"
            INSERT INTO reviews (contract_id, reviewer_id, reviewee_id, rating, comment, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(review.contract_id)
        .bind(review.reviewer_id)
        .bind(review.reviewee_id)
        .bind(review.rating)
        .bind(&review.comment)
        .bind(self.time_provider.now_millis())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        sqlx::query(
            r#"
            UPDATE users
            SET rating = (SELECT AVG(rating) FROM reviews WHERE reviewee_id = ?)
            WHERE id = ?
            "#,
        )
        .bind(review.reviewee_id)
        .bind(review.reviewee_id)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(row.into_review())
    }

    async fn find_by_reviewee(&self, reviewee_id: UserId) -> Result<Vec<Review>> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            "SELECT * FROM reviews WHERE reviewee_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(reviewee_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ReviewRow::into_review).collect())
    }

    async fn find_by_contract(&self, contract_id: ContractId) -> Result<Vec<Review>> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            "SELECT * FROM reviews WHERE contract_id = ? ORDER BY id ASC",
        )
        .bind(contract_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ReviewRow::into_review).collect())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ReviewRow {
    id: i64,
    contract_id: i64,
    reviewer_id: i64,
    reviewee_id: i64,
    rating: i64,
    comment: Option<String>,
    created_at: i64,
}

impl ReviewRow {
    fn into_review(self) -> Review {
        Review {
            id: self.id,
            contract_id: self.contract_id,
            reviewer_id: self.reviewer_id,
            reviewee_id: self.reviewee_id,
            rating: self.rating,
            comment: self.comment,
            created_at: self.created_at,
        }
    }
}
