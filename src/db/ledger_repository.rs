use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::Set,
    ColumnTrait,
    DatabaseConnection,
    EntityTrait,
    FromQueryResult,
    QueryFilter,
    QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use crate::db::entity::{plan, transaction, user};
use crate::error::{AppError, Result};
use crate::store::{LedgerStore, NewPlan, NewTransaction};

/// Postgres-backed ledger. Each method is one statement; there are no
/// cross-row transactions.
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[derive(FromQueryResult)]
struct InvestedSum {
    total: Option<f64>,
}

#[async_trait]
impl LedgerStore for LedgerRepository {
    async fn create_plan(&self, new: NewPlan) -> Result<plan::Model> {
        let now = chrono::Utc::now();
        let plan = plan::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(new.user_id),
            token_symbol: Set(new.token_symbol),
            amount: Set(new.amount),
            frequency: Set(new.frequency.to_string()),
            to_address: Set(new.to_address),
            is_active: Set(true),
            total_invested: Set(0.0),
            last_execution_time: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let plan = plan.insert(&self.db).await?;
        Ok(plan)
    }

    async fn get_plan(&self, id: Uuid) -> Result<Option<plan::Model>> {
        let plan = plan::Entity::find_by_id(id).one(&self.db).await?;
        Ok(plan)
    }

    async fn update_plan(&self, updated: plan::Model) -> Result<plan::Model> {
        let existing = plan::Entity::find_by_id(updated.id)
            .one(&self.db)
            .await?
            .ok_or(AppError::PlanNotFound)?;

        let mut active: plan::ActiveModel = existing.into();
        active.is_active = Set(updated.is_active);
        active.total_invested = Set(updated.total_invested);
        active.last_execution_time = Set(updated.last_execution_time);
        active.updated_at = Set(chrono::Utc::now());

        let plan = active.update(&self.db).await?;
        Ok(plan)
    }

    async fn list_active_plans(&self) -> Result<Vec<plan::Model>> {
        let plans = plan::Entity::find()
            .filter(plan::Column::IsActive.eq(true))
            .all(&self.db)
            .await?;
        Ok(plans)
    }

    async fn list_plans_by_user(&self, user_id: Uuid) -> Result<Vec<plan::Model>> {
        let plans = plan::Entity::find()
            .filter(plan::Column::UserId.eq(user_id))
            .all(&self.db)
            .await?;
        Ok(plans)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<user::Model>> {
        let user = user::Entity::find_by_id(id).one(&self.db).await?;
        Ok(user)
    }

    async fn create_user_if_absent(&self, id: Uuid, address: &str) -> Result<user::Model> {
        if let Some(user) = user::Entity::find_by_id(id).one(&self.db).await? {
            return Ok(user);
        }

        let now = chrono::Utc::now();
        let user = user::ActiveModel {
            id: Set(id),
            address: Set(address.to_string()),
            total_invested: Set(0.0),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let user = user.insert(&self.db).await?;
        Ok(user)
    }

    async fn increment_user_invested(&self, id: Uuid, delta: f64) -> Result<()> {
        user::Entity::update_many()
            .col_expr(
                user::Column::TotalInvested,
                Expr::col(user::Column::TotalInvested).add(delta),
            )
            .col_expr(user::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn set_user_invested(&self, id: Uuid, total: f64) -> Result<()> {
        user::Entity::update_many()
            .col_expr(user::Column::TotalInvested, Expr::value(total))
            .col_expr(user::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn append_transaction(&self, new: NewTransaction) -> Result<transaction::Model> {
        let tx = transaction::ActiveModel {
            id: Set(Uuid::new_v4()),
            plan_id: Set(new.plan_id),
            user_id: Set(new.user_id),
            token_symbol: Set(new.token_symbol),
            amount: Set(new.amount),
            token_amount: Set(new.token_amount),
            token_price: Set(new.token_price),
            tx_hash: Set(new.tx_hash),
            status: Set(new.status.to_string()),
            timestamp: Set(chrono::Utc::now()),
        };

        let tx = tx.insert(&self.db).await?;
        Ok(tx)
    }

    async fn list_transactions_by_plan(&self, plan_id: Uuid) -> Result<Vec<transaction::Model>> {
        let txs = transaction::Entity::find()
            .filter(transaction::Column::PlanId.eq(plan_id))
            .order_by_desc(transaction::Column::Timestamp)
            .all(&self.db)
            .await?;
        Ok(txs)
    }

    async fn sum_total_invested_by_user(&self, user_id: Uuid) -> Result<f64> {
        let sum = plan::Entity::find()
            .select_only()
            .column_as(plan::Column::TotalInvested.sum(), "total")
            .filter(plan::Column::UserId.eq(user_id))
            .into_model::<InvestedSum>()
            .one(&self.db)
            .await?;

        Ok(sum.and_then(|s| s.total).unwrap_or(0.0))
    }
}
