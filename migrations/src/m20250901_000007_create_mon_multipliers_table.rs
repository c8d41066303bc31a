use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MonMultipliers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MonMultipliers::Id)
                            .integer()
                            .primary_key()
                            .auto_increment()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MonMultipliers::VoucherType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MonMultipliers::Multiplier)
                            .decimal()
                            .not_null()
                            .default(40),
                    )
                    .col(ColumnDef::new(MonMultipliers::Description).string().null())
                    .col(
                        ColumnDef::new(MonMultipliers::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(MonMultipliers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MonMultipliers::UpdatedBy).string().null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MonMultipliers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum MonMultipliers {
    Table,
    Id,
    VoucherType,
    Multiplier,
    Description,
    IsActive,
    UpdatedAt,
    UpdatedBy,
}
