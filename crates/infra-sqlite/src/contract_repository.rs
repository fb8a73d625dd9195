// SQLite ContractRepository Implementation

use crate::error::map_sqlx_error;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use opskill_core::domain::contract::{overpaid, payment_cents};
use opskill_core::domain::{
    Contract, ContractId, ContractStatus, NewContract, PaymentStatus, UserId,
};
use opskill_core::error::{AppError, Result};
use opskill_core::port::{ContractRepository, TimeProvider};
use sqlx::{Executor, Sqlite, SqlitePool};
use std::sync::Arc;
use tracing::debug;

pub struct SqliteContractRepository {
    pool: SqlitePool,
    time_provider: Arc<dyn TimeProvider>,
}

impl SqliteContractRepository {
    pub fn new(pool: SqlitePool, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            pool,
            time_provider,
        }
    }
}

/// Shared by the repository and the hiring transaction
pub(crate) async fn insert_contract<'e, E>(
    executor: E,
    contract: &NewContract,
    now: i64,
) -> Result<Contract>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, ContractRow>(
        r#"
        INSERT INTO contracts (
            job_id, talent_id, company_id, status, payment_status,
            total_amount, amount_paid, start_date, end_date, terms,
            created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(contract.job_id)
    .bind(contract.talent_id)
    .bind(contract.company_id)
    .bind(contract.status.as_str())
    .bind(contract.payment_status.as_str())
    .bind(contract.total_amount)
    .bind(contract.amount_paid)
    .bind(contract.start_date)
    .bind(contract.end_date)
    .bind(&contract.terms)
    .bind(now)
    .bind(now)
    .fetch_one(executor)
    .await
    .map_err(map_sqlx_error)?;

    row.into_contract()
}

#[async_trait]
impl ContractRepository for SqliteContractRepository {
    async fn insert(&self, contract: &NewContract) -> Result<Contract> {
        insert_contract(&self.pool, contract, self.time_provider.now_millis()).await
    }

    async fn find_by_id(&self, id: ContractId) -> Result<Option<Contract>> {
        let row = sqlx::query_as::<_, ContractRow>("SELECT * FROM contracts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(ContractRow::into_contract).transpose()
    }

    async fn find_by_talent(&self, talent_id: UserId) -> Result<Vec<Contract>> {
        let rows = sqlx::query_as::<_, ContractRow>(
            "SELECT * FROM contracts WHERE talent_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(talent_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(ContractRow::into_contract).collect()
    }

    async fn find_by_company(&self, company_id: UserId) -> Result<Vec<Contract>> {
        let rows = sqlx::query_as::<_, ContractRow>(
            "SELECT * FROM contracts WHERE company_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(ContractRow::into_contract).collect()
    }

    async fn update_status(&self, id: ContractId, status: ContractStatus) -> Result<()> {
        let result = sqlx::query("UPDATE contracts SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(self.time_provider.now_millis())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Contract", id));
        }
        Ok(())
    }

    async fn record_payment(&self, id: ContractId, amount: f64) -> Result<Contract> {
        let cents = payment_cents(amount)?;

        // Check and write in one statement: concurrent payments queue on the
        // write lock instead of racing on a stale read
        let row = sqlx::query_as::<_, ContractRow>(
            r#"
            UPDATE contracts
            SET amount_paid = (CAST(ROUND(amount_paid * 100) AS INTEGER) + ?) / 100.0,
                payment_status = CASE
                    WHEN CAST(ROUND(amount_paid * 100) AS INTEGER) + ?
                         >= CAST(ROUND(total_amount * 100) AS INTEGER) THEN ?
                    ELSE ?
                END,
                updated_at = ?
            WHERE id = ?
              AND status <> ?
              AND CAST(ROUND(amount_paid * 100) AS INTEGER) + ?
                  <= CAST(ROUND(total_amount * 100) AS INTEGER)
            RETURNING *
            "#,
        )
        .bind(cents)
        .bind(cents)
        .bind(PaymentStatus::Paid.as_str())
        .bind(PaymentStatus::PartiallyPaid.as_str())
        .bind(self.time_provider.now_millis())
        .bind(id)
        .bind(ContractStatus::Terminated.as_str())
        .bind(cents)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if let Some(row) = row {
            let contract = row.into_contract()?;
            debug!(
                contract_id = id,
                amount_paid = contract.amount_paid,
                "Contract payment persisted"
            );
            return Ok(contract);
        }

        // Nothing matched: work out which guard refused the payment
        match self.find_by_id(id).await? {
            None => Err(AppError::not_found("Contract", id)),
            Some(contract) if contract.status == ContractStatus::Terminated => {
                Err(AppError::InvalidState(format!(
                    "Contract {} is TERMINATED and cannot take payments",
                    id
                )))
            }
            Some(_) => Err(overpaid().into()),
        }
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ContractRow {
    id: i64,
    job_id: i64,
    talent_id: i64,
    company_id: i64,
    status: String,
    payment_status: String,
    total_amount: f64,
    amount_paid: f64,
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
    terms: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl ContractRow {
    pub(crate) fn into_contract(self) -> Result<Contract> {
        Ok(Contract {
            id: self.id,
            job_id: self.job_id,
            talent_id: self.talent_id,
            company_id: self.company_id,
            status: self.status.parse()?,
            payment_status: self.payment_status.parse()?,
            total_amount: self.total_amount,
            amount_paid: self.amount_paid,
            start_date: self.start_date,
            end_date: self.end_date,
            terms: self.terms,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
