use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::Set,
    ColumnTrait,
    DatabaseConnection,
    EntityTrait,
    QueryFilter,
    QueryOrder,
};
use uuid::Uuid;

use crate::db::entity::token_price;
use crate::error::Result;
use crate::store::PriceHistoryStore;

pub struct PriceRepository {
    db: DatabaseConnection,
}

impl PriceRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PriceHistoryStore for PriceRepository {
    async fn record_sample(&self, symbol: &str, price: f64) -> Result<()> {
        let sample = token_price::ActiveModel {
            id: Set(Uuid::new_v4()),
            symbol: Set(symbol.to_string()),
            price: Set(price),
            timestamp: Set(Utc::now()),
        };
        sample.insert(&self.db).await?;
        Ok(())
    }

    async fn latest_sample(&self, symbol: &str) -> Result<Option<token_price::Model>> {
        let sample = token_price::Entity::find()
            .filter(token_price::Column::Symbol.eq(symbol))
            .order_by_desc(token_price::Column::Timestamp)
            .one(&self.db)
            .await?;
        Ok(sample)
    }

    async fn samples_since(
        &self,
        symbol: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<token_price::Model>> {
        let samples = token_price::Entity::find()
            .filter(token_price::Column::Symbol.eq(symbol))
            .filter(token_price::Column::Timestamp.gte(since))
            .order_by_asc(token_price::Column::Timestamp)
            .all(&self.db)
            .await?;
        Ok(samples)
    }
}
