use sea_orm_migration::prelude::*;

use crate::m20250901_000001_create_master_tables::{
    Banks, Customers, ExpenseHeads, Items, Projects,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create vouchers table
        manager
            .create_table(
                Table::create()
                    .table(Vouchers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Vouchers::Id)
                            .integer()
                            .primary_key()
                            .auto_increment()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Vouchers::TransactionNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Vouchers::VoucherType).string().not_null())
                    .col(ColumnDef::new(Vouchers::CashType).string().null())
                    .col(ColumnDef::new(Vouchers::VoucherDate).date().not_null())
                    .col(
                        ColumnDef::new(Vouchers::PurchasingCustomerId)
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Vouchers::ReceivingCustomerId)
                            .integer()
                            .null(),
                    )
                    .col(ColumnDef::new(Vouchers::PayingBankId).integer().null())
                    .col(ColumnDef::new(Vouchers::ReceivingBankId).integer().null())
                    .col(ColumnDef::new(Vouchers::ItemId).integer().null())
                    .col(ColumnDef::new(Vouchers::ExpenseHeadId).integer().null())
                    .col(ColumnDef::new(Vouchers::ProjectId).integer().null())
                    .col(ColumnDef::new(Vouchers::Weight).decimal().null())
                    .col(ColumnDef::new(Vouchers::Kat).decimal().null())
                    .col(ColumnDef::new(Vouchers::Quantity).decimal().null())
                    .col(ColumnDef::new(Vouchers::Rate).decimal().null())
                    .col(
                        ColumnDef::new(Vouchers::Amount)
                            .decimal()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Vouchers::ExpenseHeadRate).decimal().null())
                    .col(ColumnDef::new(Vouchers::Mon).string().null())
                    .col(ColumnDef::new(Vouchers::GariNo).string().null())
                    .col(
                        ColumnDef::new(Vouchers::ExpenseHeadDetails)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Vouchers::StockInclude)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Vouchers::PurchasingCustomerDetails)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Vouchers::ReceivingCustomerDetails)
                            .string()
                            .null(),
                    )
                    .col(ColumnDef::new(Vouchers::PayingBankDetails).string().null())
                    .col(
                        ColumnDef::new(Vouchers::ReceivingBankDetails)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Vouchers::Status)
                            .string()
                            .not_null()
                            .default("Completed"),
                    )
                    .col(ColumnDef::new(Vouchers::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Vouchers::CreatedBy).string().null())
                    .col(ColumnDef::new(Vouchers::UpdatedAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Vouchers::UpdatedBy).string().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vouchers_purchasing_customer_id")
                            .from(Vouchers::Table, Vouchers::PurchasingCustomerId)
                            .to(Customers::Table, Customers::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vouchers_receiving_customer_id")
                            .from(Vouchers::Table, Vouchers::ReceivingCustomerId)
                            .to(Customers::Table, Customers::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vouchers_paying_bank_id")
                            .from(Vouchers::Table, Vouchers::PayingBankId)
                            .to(Banks::Table, Banks::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vouchers_receiving_bank_id")
                            .from(Vouchers::Table, Vouchers::ReceivingBankId)
                            .to(Banks::Table, Banks::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vouchers_item_id")
                            .from(Vouchers::Table, Vouchers::ItemId)
                            .to(Items::Table, Items::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vouchers_expense_head_id")
                            .from(Vouchers::Table, Vouchers::ExpenseHeadId)
                            .to(ExpenseHeads::Table, ExpenseHeads::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vouchers_project_id")
                            .from(Vouchers::Table, Vouchers::ProjectId)
                            .to(Projects::Table, Projects::Id),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Vouchers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Vouchers {
    Table,
    Id,
    TransactionNumber,
    VoucherType,
    CashType,
    VoucherDate,
    PurchasingCustomerId,
    ReceivingCustomerId,
    PayingBankId,
    ReceivingBankId,
    ItemId,
    ExpenseHeadId,
    ProjectId,
    Weight,
    Kat,
    Quantity,
    Rate,
    Amount,
    ExpenseHeadRate,
    Mon,
    GariNo,
    ExpenseHeadDetails,
    StockInclude,
    PurchasingCustomerDetails,
    ReceivingCustomerDetails,
    PayingBankDetails,
    ReceivingBankDetails,
    Status,
    CreatedAt,
    CreatedBy,
    UpdatedAt,
    UpdatedBy,
}
