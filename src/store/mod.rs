use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::db::entity::{plan, token_price, transaction, user};
use crate::enums::{Frequency, TxStatus};
use crate::error::Result;

#[cfg(test)]
pub mod memory;

/// Fields needed to persist a new plan. Aggregates start at zero and the
/// plan is born active.
#[derive(Debug, Clone)]
pub struct NewPlan {
    pub user_id: Uuid,
    pub token_symbol: String,
    pub amount: f64,
    pub frequency: Frequency,
    pub to_address: String,
}

/// One ledger row to append. Rows are immutable once written.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub plan_id: Option<Uuid>,
    pub user_id: Uuid,
    pub token_symbol: String,
    pub amount: f64,
    pub token_amount: f64,
    pub token_price: f64,
    pub tx_hash: String,
    pub status: TxStatus,
}

/// Durable storage for plans, users, and the transaction ledger.
///
/// Every operation is atomic at the single-row level; callers get no
/// cross-row transaction and must order their writes accordingly.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn create_plan(&self, plan: NewPlan) -> Result<plan::Model>;
    async fn get_plan(&self, id: Uuid) -> Result<Option<plan::Model>>;
    async fn update_plan(&self, plan: plan::Model) -> Result<plan::Model>;
    async fn list_active_plans(&self) -> Result<Vec<plan::Model>>;
    async fn list_plans_by_user(&self, user_id: Uuid) -> Result<Vec<plan::Model>>;

    async fn get_user(&self, id: Uuid) -> Result<Option<user::Model>>;
    async fn create_user_if_absent(&self, id: Uuid, address: &str) -> Result<user::Model>;
    async fn increment_user_invested(&self, id: Uuid, delta: f64) -> Result<()>;
    async fn set_user_invested(&self, id: Uuid, total: f64) -> Result<()>;

    async fn append_transaction(&self, tx: NewTransaction) -> Result<transaction::Model>;
    /// Ledger rows for one plan, newest first.
    async fn list_transactions_by_plan(&self, plan_id: Uuid) -> Result<Vec<transaction::Model>>;
    /// Sum of `total_invested` across all of a user's plans.
    async fn sum_total_invested_by_user(&self, user_id: Uuid) -> Result<f64>;
}

/// Timestamped price samples persisted by the oracle adapter.
#[async_trait]
pub trait PriceHistoryStore: Send + Sync {
    async fn record_sample(&self, symbol: &str, price: f64) -> Result<()>;
    async fn latest_sample(&self, symbol: &str) -> Result<Option<token_price::Model>>;
    /// Samples for a symbol at or after `since`, oldest first.
    async fn samples_since(
        &self,
        symbol: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<token_price::Model>>;
}
