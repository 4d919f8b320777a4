use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Plan and user ids are stored by value, with no foreign keys: the
        // transaction ledger must outlive anything that references it.
        manager.create_table(
            Table::create()
                .table(Transaction::Table)
                .if_not_exists()
                .col(ColumnDef::new(Transaction::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(Transaction::PlanId).uuid().null())
                .col(ColumnDef::new(Transaction::UserId).uuid().not_null())
                .col(ColumnDef::new(Transaction::TokenSymbol).string_len(20).not_null())
                .col(ColumnDef::new(Transaction::Amount).double().not_null())
                .col(ColumnDef::new(Transaction::TokenAmount).double().not_null())
                .col(ColumnDef::new(Transaction::TokenPrice).double().not_null())
                .col(ColumnDef::new(Transaction::TxHash).string().not_null())
                .col(ColumnDef::new(Transaction::Status).string_len(20).not_null())
                .col(
                    ColumnDef::new(Transaction::Timestamp)
                        .timestamp_with_time_zone()
                        .not_null()
                        .extra("DEFAULT NOW()".to_string())
                )
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create()
                .name("idx_transaction_plan_id")
                .table(Transaction::Table)
                .col(Transaction::PlanId)
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create()
                .name("idx_transaction_user_id")
                .table(Transaction::Table)
                .col(Transaction::UserId)
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create()
                .name("idx_transaction_timestamp")
                .table(Transaction::Table)
                .col(Transaction::Timestamp)
                .to_owned()
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Transaction::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Transaction {
    Table,
    Id,
    PlanId,
    UserId,
    TokenSymbol,
    Amount,
    TokenAmount,
    TokenPrice,
    TxHash,
    Status,
    Timestamp,
}
