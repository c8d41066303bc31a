use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create page_locks table
        manager
            .create_table(
                Table::create()
                    .table(PageLocks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PageLocks::Id)
                            .integer()
                            .primary_key()
                            .auto_increment()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PageLocks::PageName).string().not_null())
                    .col(
                        ColumnDef::new(PageLocks::PageUrl)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(PageLocks::IsLocked)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(PageLocks::Password).string().null())
                    .col(
                        ColumnDef::new(PageLocks::LockMode)
                            .string()
                            .not_null()
                            .default("JustView"),
                    )
                    .col(ColumnDef::new(PageLocks::UpdatedAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(PageLocks::UpdatedBy).string().null())
                    .to_owned(),
            )
            .await?;

        // Create master_passwords table
        manager
            .create_table(
                Table::create()
                    .table(MasterPasswords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MasterPasswords::Id)
                            .integer()
                            .primary_key()
                            .auto_increment()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MasterPasswords::PasswordType)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(MasterPasswords::Password).string().not_null())
                    .col(
                        ColumnDef::new(MasterPasswords::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(MasterPasswords::UpdatedBy).string().null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MasterPasswords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PageLocks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum PageLocks {
    Table,
    Id,
    PageName,
    PageUrl,
    IsLocked,
    Password,
    LockMode,
    UpdatedAt,
    UpdatedBy,
}

#[derive(DeriveIden)]
pub enum MasterPasswords {
    Table,
    Id,
    PasswordType,
    Password,
    UpdatedAt,
    UpdatedBy,
}
