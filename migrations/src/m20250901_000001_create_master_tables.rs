use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create customers table
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Customers::Id)
                            .integer()
                            .primary_key()
                            .auto_increment()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Customers::Name).string().not_null())
                    .col(ColumnDef::new(Customers::Phone).string().null())
                    .col(ColumnDef::new(Customers::Address).string().null())
                    .col(
                        ColumnDef::new(Customers::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Customers::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Customers::CreatedBy).string().null())
                    .to_owned(),
            )
            .await?;

        // Create items table
        manager
            .create_table(
                Table::create()
                    .table(Items::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Items::Id)
                            .integer()
                            .primary_key()
                            .auto_increment()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Items::Name).string().not_null())
                    .col(ColumnDef::new(Items::Unit).string().null())
                    .col(
                        ColumnDef::new(Items::StockTrackingEnabled)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Items::OpeningStock)
                            .decimal()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Items::DefaultRate)
                            .decimal()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Items::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Items::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Items::CreatedBy).string().null())
                    .col(ColumnDef::new(Items::UpdatedAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Items::UpdatedBy).string().null())
                    .to_owned(),
            )
            .await?;

        // Create banks table
        manager
            .create_table(
                Table::create()
                    .table(Banks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Banks::Id)
                            .integer()
                            .primary_key()
                            .auto_increment()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Banks::Name).string().not_null())
                    .col(ColumnDef::new(Banks::AccountNumber).string().null())
                    .col(
                        ColumnDef::new(Banks::OpeningBalance)
                            .decimal()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Banks::Details).string().null())
                    .col(
                        ColumnDef::new(Banks::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Banks::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Banks::CreatedBy).string().null())
                    .col(ColumnDef::new(Banks::UpdatedAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Banks::UpdatedBy).string().null())
                    .to_owned(),
            )
            .await?;

        // Create projects table
        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Projects::Id)
                            .integer()
                            .primary_key()
                            .auto_increment()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Projects::Name).string().not_null())
                    .col(ColumnDef::new(Projects::Description).string().null())
                    .col(ColumnDef::new(Projects::StartDate).date().not_null())
                    .col(ColumnDef::new(Projects::EndDate).date().null())
                    .col(
                        ColumnDef::new(Projects::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Projects::CreatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        // Create expense_heads table
        manager
            .create_table(
                Table::create()
                    .table(ExpenseHeads::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExpenseHeads::Id)
                            .integer()
                            .primary_key()
                            .auto_increment()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ExpenseHeads::Name).string().not_null())
                    .col(
                        ColumnDef::new(ExpenseHeads::DefaultRate)
                            .decimal()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(ExpenseHeads::Notes).string().null())
                    .col(
                        ColumnDef::new(ExpenseHeads::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ExpenseHeads::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create customer_item_rates table
        manager
            .create_table(
                Table::create()
                    .table(CustomerItemRates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CustomerItemRates::Id)
                            .integer()
                            .primary_key()
                            .auto_increment()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CustomerItemRates::CustomerId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CustomerItemRates::ItemId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CustomerItemRates::Rate).decimal().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_customer_item_rates_customer_id")
                            .from(CustomerItemRates::Table, CustomerItemRates::CustomerId)
                            .to(Customers::Table, Customers::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_customer_item_rates_item_id")
                            .from(CustomerItemRates::Table, CustomerItemRates::ItemId)
                            .to(Items::Table, Items::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_customer_item_rates_customer_item")
                    .table(CustomerItemRates::Table)
                    .col(CustomerItemRates::CustomerId)
                    .col(CustomerItemRates::ItemId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CustomerItemRates::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExpenseHeads::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Projects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Banks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Items::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Customers {
    Table,
    Id,
    Name,
    Phone,
    Address,
    IsActive,
    CreatedAt,
    CreatedBy,
}

#[derive(DeriveIden)]
pub enum Items {
    Table,
    Id,
    Name,
    Unit,
    StockTrackingEnabled,
    OpeningStock,
    DefaultRate,
    IsActive,
    CreatedAt,
    CreatedBy,
    UpdatedAt,
    UpdatedBy,
}

#[derive(DeriveIden)]
pub enum Banks {
    Table,
    Id,
    Name,
    AccountNumber,
    OpeningBalance,
    Details,
    IsActive,
    CreatedAt,
    CreatedBy,
    UpdatedAt,
    UpdatedBy,
}

#[derive(DeriveIden)]
pub enum Projects {
    Table,
    Id,
    Name,
    Description,
    StartDate,
    EndDate,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum ExpenseHeads {
    Table,
    Id,
    Name,
    DefaultRate,
    Notes,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum CustomerItemRates {
    Table,
    Id,
    CustomerId,
    ItemId,
    Rate,
}
