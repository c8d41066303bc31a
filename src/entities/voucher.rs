use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Voucher types: every financial transaction in the system is one of these
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
    strum::Display,
    strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum VoucherType {
    #[sea_orm(string_value = "Purchase")]
    Purchase,
    #[sea_orm(string_value = "Sale")]
    Sale,
    #[sea_orm(string_value = "Expense")]
    Expense,
    /// Labor attendance expense
    #[sea_orm(string_value = "Hazri")]
    Hazri,
    #[sea_orm(string_value = "CashPaid")]
    CashPaid,
    #[sea_orm(string_value = "CashReceived")]
    CashReceived,
    /// Customer-to-customer reconciliation
    #[sea_orm(string_value = "CCR")]
    #[serde(rename = "CCR")]
    #[strum(serialize = "CCR")]
    Ccr,
    /// Bank-to-customer reconciliation
    #[sea_orm(string_value = "BCR")]
    #[serde(rename = "BCR")]
    #[strum(serialize = "BCR")]
    Bcr,
}

impl VoucherType {
    /// Transaction number prefix, e.g. `PUR-1`, `SAL-2`
    pub fn prefix(&self) -> &'static str {
        match self {
            VoucherType::Purchase => "PUR",
            VoucherType::Sale => "SAL",
            VoucherType::Expense => "EXP",
            VoucherType::Hazri => "HAZ",
            VoucherType::CashPaid => "CPD",
            VoucherType::CashReceived => "CRC",
            VoucherType::Ccr => "CCR",
            VoucherType::Bcr => "BCR",
        }
    }

    /// Project is mandatory for the operating voucher types
    pub fn requires_project(&self) -> bool {
        matches!(
            self,
            VoucherType::Purchase | VoucherType::Sale | VoucherType::Expense | VoucherType::Hazri
        )
    }
}

/// How the money moved
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum CashType {
    #[sea_orm(string_value = "Credit")]
    Credit,
    #[sea_orm(string_value = "Cash")]
    Cash,
    #[sea_orm(string_value = "Bank")]
    Bank,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum TransactionStatus {
    #[sea_orm(string_value = "Pending")]
    Pending,
    #[sea_orm(string_value = "Completed")]
    Completed,
    #[sea_orm(string_value = "Cancelled")]
    Cancelled,
}

/// The sole transaction record. Which foreign keys are populated depends on
/// the voucher type (convention only, not enforced by the schema): Purchase
/// carries purchasing customer + item, Sale carries receiving customer +
/// item, Expense/Hazri carry an expense head, cash vouchers carry one
/// customer side, CCR carries both customers, BCR carries bank links.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vouchers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub transaction_number: String,

    pub voucher_type: VoucherType,
    pub cash_type: Option<CashType>,
    pub voucher_date: NaiveDate,

    pub purchasing_customer_id: Option<i32>,
    pub receiving_customer_id: Option<i32>,
    pub paying_bank_id: Option<i32>,
    pub receiving_bank_id: Option<i32>,
    pub item_id: Option<i32>,
    pub expense_head_id: Option<i32>,
    pub project_id: Option<i32>,

    pub weight: Option<Decimal>,
    pub kat: Option<Decimal>,
    pub quantity: Option<Decimal>,
    pub rate: Option<Decimal>,
    pub amount: Decimal,
    pub expense_head_rate: Option<Decimal>,

    /// Weight in mon (maund), free text as recorded on the slip
    pub mon: Option<String>,
    pub gari_no: Option<String>,
    pub expense_head_details: Option<String>,

    /// Whether this voucher's quantity counts toward the item's stock level
    pub stock_include: bool,

    pub purchasing_customer_details: Option<String>,
    pub receiving_customer_details: Option<String>,
    pub paying_bank_details: Option<String>,
    pub receiving_bank_details: Option<String>,

    pub status: TransactionStatus,

    pub created_at: DateTime<Utc>,
    pub created_by: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::PurchasingCustomerId",
        to = "super::customer::Column::Id"
    )]
    PurchasingCustomer,
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::ReceivingCustomerId",
        to = "super::customer::Column::Id"
    )]
    ReceivingCustomer,
    #[sea_orm(
        belongs_to = "super::bank::Entity",
        from = "Column::PayingBankId",
        to = "super::bank::Column::Id"
    )]
    PayingBank,
    #[sea_orm(
        belongs_to = "super::bank::Entity",
        from = "Column::ReceivingBankId",
        to = "super::bank::Column::Id"
    )]
    ReceivingBank,
    #[sea_orm(
        belongs_to = "super::item::Entity",
        from = "Column::ItemId",
        to = "super::item::Column::Id"
    )]
    Item,
    #[sea_orm(
        belongs_to = "super::expense_head::Entity",
        from = "Column::ExpenseHeadId",
        to = "super::expense_head::Column::Id"
    )]
    ExpenseHead,
    #[sea_orm(
        belongs_to = "super::project::Entity",
        from = "Column::ProjectId",
        to = "super::project::Column::Id"
    )]
    Project,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// True when the given customer appears on either side of the voucher
    pub fn involves_customer(&self, customer_id: i32) -> bool {
        self.purchasing_customer_id == Some(customer_id)
            || self.receiving_customer_id == Some(customer_id)
    }

    /// True when the given bank appears on either side of the voucher
    pub fn involves_bank(&self, bank_id: i32) -> bool {
        self.paying_bank_id == Some(bank_id) || self.receiving_bank_id == Some(bank_id)
    }

    /// True when the voucher moves physical cash
    pub fn is_cash(&self) -> bool {
        self.cash_type == Some(CashType::Cash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voucher_type_prefixes_are_unique() {
        use std::collections::HashSet;
        let prefixes: HashSet<_> = [
            VoucherType::Purchase,
            VoucherType::Sale,
            VoucherType::Expense,
            VoucherType::Hazri,
            VoucherType::CashPaid,
            VoucherType::CashReceived,
            VoucherType::Ccr,
            VoucherType::Bcr,
        ]
        .iter()
        .map(|t| t.prefix())
        .collect();
        assert_eq!(prefixes.len(), 8);
    }

    #[test]
    fn reconciliation_types_keep_their_acronyms() {
        assert_eq!(VoucherType::Ccr.to_string(), "CCR");
        assert_eq!(VoucherType::Bcr.to_string(), "BCR");
        assert_eq!("BCR".parse::<VoucherType>().unwrap(), VoucherType::Bcr);
    }

    #[test]
    fn project_requirement_covers_operating_types_only() {
        assert!(VoucherType::Purchase.requires_project());
        assert!(VoucherType::Hazri.requires_project());
        assert!(!VoucherType::CashPaid.requires_project());
        assert!(!VoucherType::Ccr.requires_project());
    }
}
