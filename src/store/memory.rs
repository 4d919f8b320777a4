//! In-memory store used by the scheduler and price tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::db::entity::{plan, token_price, transaction, user};
use crate::error::{AppError, Result};
use crate::store::{LedgerStore, NewPlan, NewTransaction, PriceHistoryStore};

#[derive(Default)]
struct Inner {
    plans: HashMap<Uuid, plan::Model>,
    users: HashMap<Uuid, user::Model>,
    transactions: Vec<transaction::Model>,
    prices: Vec<token_price::Model>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test hook: drop a user so the execution protocol's missing-user
    /// path can be exercised.
    pub fn remove_user(&self, id: Uuid) {
        self.inner.lock().unwrap().users.remove(&id);
    }

    /// Test hook: corrupt a plan's cached aggregate.
    pub fn set_plan_invested(&self, id: Uuid, total: f64) {
        if let Some(plan) = self.inner.lock().unwrap().plans.get_mut(&id) {
            plan.total_invested = total;
        }
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn create_plan(&self, new: NewPlan) -> Result<plan::Model> {
        let now = Utc::now();
        let plan = plan::Model {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            token_symbol: new.token_symbol,
            amount: new.amount,
            frequency: new.frequency.to_string(),
            to_address: new.to_address,
            is_active: true,
            total_invested: 0.0,
            last_execution_time: None,
            created_at: now,
            updated_at: now,
        };
        self.inner.lock().unwrap().plans.insert(plan.id, plan.clone());
        Ok(plan)
    }

    async fn get_plan(&self, id: Uuid) -> Result<Option<plan::Model>> {
        Ok(self.inner.lock().unwrap().plans.get(&id).cloned())
    }

    async fn update_plan(&self, mut plan: plan::Model) -> Result<plan::Model> {
        plan.updated_at = Utc::now();
        let mut inner = self.inner.lock().unwrap();
        if !inner.plans.contains_key(&plan.id) {
            return Err(AppError::PlanNotFound);
        }
        inner.plans.insert(plan.id, plan.clone());
        Ok(plan)
    }

    async fn list_active_plans(&self) -> Result<Vec<plan::Model>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.plans.values().filter(|p| p.is_active).cloned().collect())
    }

    async fn list_plans_by_user(&self, user_id: Uuid) -> Result<Vec<plan::Model>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .plans
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<user::Model>> {
        Ok(self.inner.lock().unwrap().users.get(&id).cloned())
    }

    async fn create_user_if_absent(&self, id: Uuid, address: &str) -> Result<user::Model> {
        let mut inner = self.inner.lock().unwrap();
        let now = Utc::now();
        let user = inner.users.entry(id).or_insert_with(|| user::Model {
            id,
            address: address.to_string(),
            total_invested: 0.0,
            created_at: now,
            updated_at: now,
        });
        Ok(user.clone())
    }

    async fn increment_user_invested(&self, id: Uuid, delta: f64) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        match inner.users.get_mut(&id) {
            Some(user) => {
                user.total_invested += delta;
                user.updated_at = Utc::now();
                Ok(())
            }
            None => Err(AppError::Internal(format!("user {} not found", id))),
        }
    }

    async fn set_user_invested(&self, id: Uuid, total: f64) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        match inner.users.get_mut(&id) {
            Some(user) => {
                user.total_invested = total;
                user.updated_at = Utc::now();
                Ok(())
            }
            None => Err(AppError::Internal(format!("user {} not found", id))),
        }
    }

    async fn append_transaction(&self, new: NewTransaction) -> Result<transaction::Model> {
        let tx = transaction::Model {
            id: Uuid::new_v4(),
            plan_id: new.plan_id,
            user_id: new.user_id,
            token_symbol: new.token_symbol,
            amount: new.amount,
            token_amount: new.token_amount,
            token_price: new.token_price,
            tx_hash: new.tx_hash,
            status: new.status.to_string(),
            timestamp: Utc::now(),
        };
        self.inner.lock().unwrap().transactions.push(tx.clone());
        Ok(tx)
    }

    async fn list_transactions_by_plan(&self, plan_id: Uuid) -> Result<Vec<transaction::Model>> {
        let inner = self.inner.lock().unwrap();
        let mut txs: Vec<_> = inner
            .transactions
            .iter()
            .filter(|t| t.plan_id == Some(plan_id))
            .cloned()
            .collect();
        txs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(txs)
    }

    async fn sum_total_invested_by_user(&self, user_id: Uuid) -> Result<f64> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .plans
            .values()
            .filter(|p| p.user_id == user_id)
            .map(|p| p.total_invested)
            .sum())
    }
}

#[async_trait]
impl PriceHistoryStore for MemoryStore {
    async fn record_sample(&self, symbol: &str, price: f64) -> Result<()> {
        self.inner.lock().unwrap().prices.push(token_price::Model {
            id: Uuid::new_v4(),
            symbol: symbol.to_string(),
            price,
            timestamp: Utc::now(),
        });
        Ok(())
    }

    async fn latest_sample(&self, symbol: &str) -> Result<Option<token_price::Model>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .prices
            .iter()
            .filter(|s| s.symbol == symbol)
            .max_by_key(|s| s.timestamp)
            .cloned())
    }

    async fn samples_since(
        &self,
        symbol: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<token_price::Model>> {
        let inner = self.inner.lock().unwrap();
        let mut samples: Vec<_> = inner
            .prices
            .iter()
            .filter(|s| s.symbol == symbol && s.timestamp >= since)
            .cloned()
            .collect();
        samples.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(samples)
    }
}
