use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(
            Table::create()
                .table(Plan::Table)
                .if_not_exists()
                .col(ColumnDef::new(Plan::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(Plan::UserId).uuid().not_null())
                .col(ColumnDef::new(Plan::TokenSymbol).string_len(20).not_null())
                .col(ColumnDef::new(Plan::Amount).double().not_null())
                .col(ColumnDef::new(Plan::Frequency).string_len(20).not_null())
                .col(ColumnDef::new(Plan::ToAddress).string().not_null())
                .col(ColumnDef::new(Plan::IsActive).boolean().not_null().default(true))
                .col(
                    ColumnDef::new(Plan::TotalInvested)
                        .double()
                        .not_null()
                        .default(0.0)
                )
                .col(ColumnDef::new(Plan::LastExecutionTime).timestamp_with_time_zone().null())
                .col(
                    ColumnDef::new(Plan::CreatedAt)
                        .timestamp_with_time_zone()
                        .not_null()
                        .extra("DEFAULT NOW()".to_string())
                )
                .col(
                    ColumnDef::new(Plan::UpdatedAt)
                        .timestamp_with_time_zone()
                        .not_null()
                        .extra("DEFAULT NOW()".to_string())
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_plan_user")
                        .from(Plan::Table, Plan::UserId)
                        .to(User::Table, User::Id)
                )
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create()
                .name("idx_plan_user_id")
                .table(Plan::Table)
                .col(Plan::UserId)
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create()
                .name("idx_plan_is_active")
                .table(Plan::Table)
                .col(Plan::IsActive)
                .to_owned()
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Plan::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Plan {
    Table,
    Id,
    UserId,
    TokenSymbol,
    Amount,
    Frequency,
    ToAddress,
    IsActive,
    TotalInvested,
    LastExecutionTime,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}
