use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CashAdjustments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CashAdjustments::Id)
                            .integer()
                            .primary_key()
                            .auto_increment()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CashAdjustments::AdjustmentDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CashAdjustments::AdjustmentType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CashAdjustments::Amount).decimal().not_null())
                    .col(ColumnDef::new(CashAdjustments::Description).string().null())
                    .col(
                        ColumnDef::new(CashAdjustments::ReferenceNumber)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CashAdjustments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CashAdjustments::CreatedBy).string().null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CashAdjustments::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum CashAdjustments {
    Table,
    Id,
    AdjustmentDate,
    AdjustmentType,
    Amount,
    Description,
    ReferenceNumber,
    CreatedAt,
    CreatedBy,
}
