// Contract Repository Port (Interface)

use crate::domain::{Contract, ContractId, ContractStatus, NewContract, UserId};
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ContractRepository: Send + Sync {
    async fn insert(&self, contract: &NewContract) -> Result<Contract>;

    async fn find_by_id(&self, id: ContractId) -> Result<Option<Contract>>;

    async fn find_by_talent(&self, talent_id: UserId) -> Result<Vec<Contract>>;

    async fn find_by_company(&self, company_id: UserId) -> Result<Vec<Contract>>;

    async fn update_status(&self, id: ContractId, status: ContractStatus) -> Result<()>;

    /// Add `amount` to amount_paid and recompute payment_status.
    ///
    /// Rejects non-positive amounts, overpayment and TERMINATED contracts.
    async fn record_payment(&self, id: ContractId, amount: f64) -> Result<Contract>;
}
