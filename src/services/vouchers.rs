use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Deserialize;
use tracing::{info, instrument};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::db::DbPool;
use crate::entities::voucher::{self, CashType, TransactionStatus, VoucherType};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

/// Request payload shared by voucher create and update
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct VoucherInput {
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
    #[serde(default)]
    pub amount: Decimal,
    pub expense_head_rate: Option<Decimal>,

    #[validate(length(max = 100))]
    pub mon: Option<String>,
    #[validate(length(max = 100))]
    pub gari_no: Option<String>,
    #[validate(length(max = 500))]
    pub expense_head_details: Option<String>,

    #[serde(default)]
    pub stock_include: bool,

    #[validate(length(max = 500))]
    pub purchasing_customer_details: Option<String>,
    #[validate(length(max = 500))]
    pub receiving_customer_details: Option<String>,
    #[validate(length(max = 500))]
    pub paying_bank_details: Option<String>,
    #[validate(length(max = 500))]
    pub receiving_bank_details: Option<String>,

    pub status: Option<TransactionStatus>,
}

impl VoucherInput {
    /// Amount falls back to quantity x rate when not supplied
    fn effective_amount(&self) -> Decimal {
        if self.amount.is_zero() {
            if let (Some(quantity), Some(rate)) = (self.quantity, self.rate) {
                return quantity * rate;
            }
        }
        self.amount
    }

    fn check(&self) -> Result<(), ServiceError> {
        self.validate()?;

        for (label, value) in [
            ("Amount", Some(self.amount)),
            ("Weight", self.weight),
            ("Quantity", self.quantity),
            ("Rate", self.rate),
            ("Expense head rate", self.expense_head_rate),
        ] {
            if let Some(value) = value {
                if value < Decimal::ZERO {
                    return Err(ServiceError::ValidationError(format!(
                        "{} cannot be negative",
                        label
                    )));
                }
            }
        }

        if self.voucher_type.requires_project() && self.project_id.is_none() {
            return Err(ServiceError::VoucherError(format!(
                "Project is required for {} vouchers",
                self.voucher_type
            )));
        }

        Ok(())
    }
}

/// Progressive list filters, all optional
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct VoucherFilter {
    pub voucher_type: Option<VoucherType>,
    /// Matches the customer on either side of the voucher
    pub customer_id: Option<i32>,
    pub project_id: Option<i32>,
    pub item_id: Option<i32>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Service owning the voucher write path. Balances and stock are derived
/// from the voucher history, so create/update/delete are plain row writes;
/// there is no counter to keep in step and nothing to reverse on edit.
#[derive(Clone)]
pub struct VoucherService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl VoucherService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    /// Sequential per-type numbering: PUR-1, PUR-2, SAL-1, ...
    #[instrument(skip(self))]
    pub async fn next_transaction_number(
        &self,
        voucher_type: VoucherType,
    ) -> Result<String, ServiceError> {
        let db = &*self.db;
        let prefix = voucher_type.prefix();
        let last = voucher::Entity::find()
            .filter(voucher::Column::TransactionNumber.starts_with(format!("{}-", prefix)))
            .order_by_desc(voucher::Column::Id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let next = last
            .and_then(|v| {
                v.transaction_number
                    .rsplit('-')
                    .next()
                    .and_then(|n| n.parse::<u32>().ok())
            })
            .map(|n| n + 1)
            .unwrap_or(1);

        Ok(format!("{}-{}", prefix, next))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<voucher::Model, ServiceError> {
        let db = &*self.db;
        voucher::Entity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Voucher with ID {} not found", id)))
    }

    /// Lists vouchers newest-first with progressive filters
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filter: VoucherFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<voucher::Model>, u64), ServiceError> {
        let db = &*self.db;
        let mut query = voucher::Entity::find();

        if let Some(voucher_type) = filter.voucher_type {
            query = query.filter(voucher::Column::VoucherType.eq(voucher_type));
        }
        if let Some(customer_id) = filter.customer_id {
            query = query.filter(
                Condition::any()
                    .add(voucher::Column::PurchasingCustomerId.eq(customer_id))
                    .add(voucher::Column::ReceivingCustomerId.eq(customer_id)),
            );
        }
        if let Some(project_id) = filter.project_id {
            query = query.filter(voucher::Column::ProjectId.eq(project_id));
        }
        if let Some(item_id) = filter.item_id {
            query = query.filter(voucher::Column::ItemId.eq(item_id));
        }
        if let Some(from) = filter.from {
            query = query.filter(voucher::Column::VoucherDate.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(voucher::Column::VoucherDate.lte(to));
        }

        let query = query
            .order_by_desc(voucher::Column::VoucherDate)
            .order_by_desc(voucher::Column::Id);

        let paginator = query.paginate(db, per_page.max(1));
        let total = paginator
            .num_items()
            .await
            .map_err(ServiceError::DatabaseError)?;
        let vouchers = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok((vouchers, total))
    }

    #[instrument(skip(self, input))]
    pub async fn create(
        &self,
        input: VoucherInput,
        actor: &str,
    ) -> Result<voucher::Model, ServiceError> {
        input.check()?;
        let db = &*self.db;

        let transaction_number = self.next_transaction_number(input.voucher_type).await?;
        let amount = input.effective_amount();

        let model = voucher::ActiveModel {
            transaction_number: Set(transaction_number.clone()),
            voucher_type: Set(input.voucher_type),
            cash_type: Set(input.cash_type),
            voucher_date: Set(input.voucher_date),
            purchasing_customer_id: Set(input.purchasing_customer_id),
            receiving_customer_id: Set(input.receiving_customer_id),
            paying_bank_id: Set(input.paying_bank_id),
            receiving_bank_id: Set(input.receiving_bank_id),
            item_id: Set(input.item_id),
            expense_head_id: Set(input.expense_head_id),
            project_id: Set(input.project_id),
            weight: Set(input.weight),
            kat: Set(input.kat),
            quantity: Set(input.quantity),
            rate: Set(input.rate),
            amount: Set(amount),
            expense_head_rate: Set(input.expense_head_rate),
            mon: Set(input.mon),
            gari_no: Set(input.gari_no),
            expense_head_details: Set(input.expense_head_details),
            stock_include: Set(input.stock_include),
            purchasing_customer_details: Set(input.purchasing_customer_details),
            receiving_customer_details: Set(input.receiving_customer_details),
            paying_bank_details: Set(input.paying_bank_details),
            receiving_bank_details: Set(input.receiving_bank_details),
            status: Set(input.status.unwrap_or(TransactionStatus::Completed)),
            created_at: Set(Utc::now()),
            created_by: Set(Some(actor.to_string())),
            ..Default::default()
        };

        let created = model.insert(db).await.map_err(ServiceError::DatabaseError)?;
        self.event_sender.send_or_log(Event::VoucherCreated {
            voucher_id: created.id,
            voucher_type: created.voucher_type,
            transaction_number,
        });
        info!(
            voucher_id = created.id,
            transaction_number = %created.transaction_number,
            "Voucher created"
        );
        Ok(created)
    }

    /// Rewrites a voucher in place. The transaction number is kept; derived
    /// balances pick the change up on the next report.
    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: i32,
        input: VoucherInput,
        actor: &str,
    ) -> Result<voucher::Model, ServiceError> {
        input.check()?;
        let existing = self.get(id).await?;
        let db = &*self.db;
        let amount = input.effective_amount();

        let mut active: voucher::ActiveModel = existing.into();
        active.voucher_type = Set(input.voucher_type);
        active.cash_type = Set(input.cash_type);
        active.voucher_date = Set(input.voucher_date);
        active.purchasing_customer_id = Set(input.purchasing_customer_id);
        active.receiving_customer_id = Set(input.receiving_customer_id);
        active.paying_bank_id = Set(input.paying_bank_id);
        active.receiving_bank_id = Set(input.receiving_bank_id);
        active.item_id = Set(input.item_id);
        active.expense_head_id = Set(input.expense_head_id);
        active.project_id = Set(input.project_id);
        active.weight = Set(input.weight);
        active.kat = Set(input.kat);
        active.quantity = Set(input.quantity);
        active.rate = Set(input.rate);
        active.amount = Set(amount);
        active.expense_head_rate = Set(input.expense_head_rate);
        active.mon = Set(input.mon);
        active.gari_no = Set(input.gari_no);
        active.expense_head_details = Set(input.expense_head_details);
        active.stock_include = Set(input.stock_include);
        active.purchasing_customer_details = Set(input.purchasing_customer_details);
        active.receiving_customer_details = Set(input.receiving_customer_details);
        active.paying_bank_details = Set(input.paying_bank_details);
        active.receiving_bank_details = Set(input.receiving_bank_details);
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        active.updated_at = Set(Some(Utc::now()));
        active.updated_by = Set(Some(actor.to_string()));

        let updated = active.update(db).await.map_err(ServiceError::DatabaseError)?;
        self.event_sender.send_or_log(Event::VoucherUpdated {
            voucher_id: updated.id,
            voucher_type: updated.voucher_type,
        });
        Ok(updated)
    }

    /// Vouchers are the one hard-deleted record kind: removing one removes
    /// its effect from every derived balance
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let existing = self.get(id).await?;
        let db = &*self.db;
        let transaction_number = existing.transaction_number.clone();
        voucher::Entity::delete_by_id(existing.id)
            .exec(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        self.event_sender.send_or_log(Event::VoucherDeleted {
            voucher_id: id,
            transaction_number,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn input(voucher_type: VoucherType) -> VoucherInput {
        VoucherInput {
            voucher_type,
            cash_type: None,
            voucher_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            purchasing_customer_id: None,
            receiving_customer_id: None,
            paying_bank_id: None,
            receiving_bank_id: None,
            item_id: None,
            expense_head_id: None,
            project_id: Some(1),
            weight: None,
            kat: None,
            quantity: None,
            rate: None,
            amount: Decimal::ZERO,
            expense_head_rate: None,
            mon: None,
            gari_no: None,
            expense_head_details: None,
            stock_include: false,
            purchasing_customer_details: None,
            receiving_customer_details: None,
            paying_bank_details: None,
            receiving_bank_details: None,
            status: None,
        }
    }

    #[test]
    fn amount_falls_back_to_quantity_times_rate() {
        let mut v = input(VoucherType::Purchase);
        v.quantity = Some(dec!(12));
        v.rate = Some(dec!(25));
        assert_eq!(v.effective_amount(), dec!(300));
    }

    #[test]
    fn explicit_amount_wins_over_derivation() {
        let mut v = input(VoucherType::Purchase);
        v.quantity = Some(dec!(12));
        v.rate = Some(dec!(25));
        v.amount = dec!(999);
        assert_eq!(v.effective_amount(), dec!(999));
    }

    #[test]
    fn project_is_required_for_operating_vouchers() {
        let mut v = input(VoucherType::Sale);
        v.project_id = None;
        assert!(v.check().is_err());

        let mut cash = input(VoucherType::CashPaid);
        cash.project_id = None;
        assert!(cash.check().is_ok());
    }

    #[test]
    fn negative_numerics_are_rejected() {
        let mut v = input(VoucherType::Expense);
        v.quantity = Some(dec!(-1));
        assert!(v.check().is_err());
    }
}
