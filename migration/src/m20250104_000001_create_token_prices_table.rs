use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(
            Table::create()
                .table(TokenPrice::Table)
                .if_not_exists()
                .col(ColumnDef::new(TokenPrice::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(TokenPrice::Symbol).string_len(20).not_null())
                .col(ColumnDef::new(TokenPrice::Price).double().not_null())
                .col(
                    ColumnDef::new(TokenPrice::Timestamp)
                        .timestamp_with_time_zone()
                        .not_null()
                        .extra("DEFAULT NOW()".to_string())
                )
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create()
                .name("idx_token_price_symbol_timestamp")
                .table(TokenPrice::Table)
                .col(TokenPrice::Symbol)
                .col(TokenPrice::Timestamp)
                .to_owned()
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(TokenPrice::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum TokenPrice {
    Table,
    Id,
    Symbol,
    Price,
    Timestamp,
}
