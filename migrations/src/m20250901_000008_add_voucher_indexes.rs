use sea_orm_migration::prelude::*;

use crate::m20250901_000002_create_vouchers_table::Vouchers;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Ledger replay always filters by date, then by one of the account
        // columns; every report path hits one of these.
        manager
            .create_index(
                Index::create()
                    .name("ix_vouchers_voucher_date")
                    .table(Vouchers::Table)
                    .col(Vouchers::VoucherDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_vouchers_voucher_type")
                    .table(Vouchers::Table)
                    .col(Vouchers::VoucherType)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_vouchers_purchasing_customer_id")
                    .table(Vouchers::Table)
                    .col(Vouchers::PurchasingCustomerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_vouchers_receiving_customer_id")
                    .table(Vouchers::Table)
                    .col(Vouchers::ReceivingCustomerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_vouchers_paying_bank_id")
                    .table(Vouchers::Table)
                    .col(Vouchers::PayingBankId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_vouchers_receiving_bank_id")
                    .table(Vouchers::Table)
                    .col(Vouchers::ReceivingBankId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_vouchers_item_id")
                    .table(Vouchers::Table)
                    .col(Vouchers::ItemId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_vouchers_project_id")
                    .table(Vouchers::Table)
                    .col(Vouchers::ProjectId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "ix_vouchers_voucher_date",
            "ix_vouchers_voucher_type",
            "ix_vouchers_purchasing_customer_id",
            "ix_vouchers_receiving_customer_id",
            "ix_vouchers_paying_bank_id",
            "ix_vouchers_receiving_bank_id",
            "ix_vouchers_item_id",
            "ix_vouchers_project_id",
        ] {
            manager
                .drop_index(
                    Index::drop()
                        .name(name)
                        .table(Vouchers::Table)
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }
}
