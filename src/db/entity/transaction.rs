use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One execution attempt. Rows are append-only; nothing updates them.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transaction")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub plan_id: Option<Uuid>,
    pub user_id: Uuid,
    pub token_symbol: String,
    pub amount: f64,
    pub token_amount: f64,
    pub token_price: f64,
    pub tx_hash: String,
    pub status: String,
    pub timestamp: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
