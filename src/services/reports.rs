use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Datelike, Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

use crate::db::DbPool;
use crate::entities::{
    bank, cash_adjustment::{self, CashAdjustmentType},
    customer, expense_head, item, project,
    voucher::{self, VoucherType},
};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::ledger::{self, CustomerEntryKind, Side};

/// One row of a running ledger
#[derive(Debug, Serialize, ToSchema)]
pub struct LedgerLine {
    pub date: NaiveDate,
    pub transaction_number: String,
    pub voucher_type: VoucherType,
    pub particulars: String,
    pub debit: Decimal,
    pub credit: Decimal,
    /// Dr-positive running balance after this line
    pub balance: Decimal,
    pub balance_label: String,
}

/// Customer ledger over a reporting period
#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerLedger {
    pub customer_id: i32,
    pub customer_name: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub opening_balance: Decimal,
    pub opening_balance_label: String,
    pub lines: Vec<LedgerLine>,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    pub closing_balance: Decimal,
    pub closing_balance_label: String,
}

/// One bank statement row
#[derive(Debug, Serialize, ToSchema)]
pub struct BankStatementLine {
    pub date: NaiveDate,
    pub transaction_number: String,
    pub voucher_type: VoucherType,
    /// Negative for payments out of the bank
    pub amount: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BankStatement {
    pub bank_id: i32,
    pub bank_name: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub opening_balance: Decimal,
    pub lines: Vec<BankStatementLine>,
    pub closing_balance: Decimal,
}

/// One cash statement row (voucher or adjustment)
#[derive(Debug, Serialize, ToSchema)]
pub struct CashStatementLine {
    pub date: NaiveDate,
    pub reference: String,
    pub description: String,
    pub receipt: Decimal,
    pub payment: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CashStatement {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub customer_id: Option<i32>,
    pub opening_balance: Decimal,
    pub lines: Vec<CashStatementLine>,
    pub total_receipts: Decimal,
    pub total_payments: Decimal,
    pub closing_balance: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CashFlowReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub opening_balance: Decimal,
    pub cash_in: Decimal,
    pub cash_out: Decimal,
    pub closing_balance: Decimal,
}

/// Stock movement of one item over a period
#[derive(Debug, Serialize, ToSchema)]
pub struct StockMovement {
    pub item_id: i32,
    pub item_name: String,
    pub unit: Option<String>,
    pub opening_stock: Decimal,
    pub purchase_qty: Decimal,
    pub sale_qty: Decimal,
    pub closing_stock: Decimal,
    pub current_stock: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StockReport {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub items: Vec<StockMovement>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DailyCashBook {
    pub date: NaiveDate,
    pub opening_balance: Decimal,
    pub lines: Vec<CashStatementLine>,
    pub closing_balance: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfitLossReport {
    pub project_id: i32,
    pub project_name: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub revenue: Decimal,
    pub expenses: Decimal,
    pub profit_loss: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NameAmount {
    pub name: String,
    pub amount: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StockValueEntry {
    pub name: String,
    pub quantity: Decimal,
    pub value: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MonthlyTrendEntry {
    /// e.g. "Sep 2025"
    pub month: String,
    pub sales: Decimal,
    pub purchases: Decimal,
    pub expenses: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VoucherTypeCount {
    pub voucher_type: VoucherType,
    pub count: u64,
    pub amount: Decimal,
}

/// Capital summary: every figure is derived by replaying voucher history
#[derive(Debug, Serialize, ToSchema)]
pub struct CapitalSummary {
    pub total_vouchers: u64,
    pub active_projects: u64,
    pub total_customers: u64,
    pub total_items: u64,
    pub today_transactions: u64,
    pub today_amount: Decimal,

    pub total_stock_value: Decimal,
    pub stock: Vec<StockValueEntry>,

    pub total_receivables: Decimal,
    pub receivables: Vec<NameAmount>,
    pub total_payables: Decimal,
    pub payables: Vec<NameAmount>,

    pub cash_in_hand: Decimal,

    pub total_bank_balance: Decimal,
    pub banks: Vec<NameAmount>,

    /// Expense + Hazri grouped by head, last 30 days, top ten
    pub expense_summary: Vec<NameAmount>,
    pub total_expenses_30_days: Decimal,
    pub total_expenses: Decimal,

    pub monthly_trend: Vec<MonthlyTrendEntry>,
    pub voucher_type_distribution: Vec<VoucherTypeCount>,

    pub total_capital: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NewCashAdjustment {
    pub adjustment_date: NaiveDate,
    pub adjustment_type: CashAdjustmentType,
    pub amount: Decimal,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

/// Service generating the ledgers, statements, and the capital summary.
/// Everything is recomputed per request by replaying the voucher table.
#[derive(Clone)]
pub struct ReportService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl ReportService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    async fn customer_names(&self) -> Result<HashMap<i32, String>, ServiceError> {
        let db = &*self.db;
        Ok(customer::Entity::find()
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect())
    }

    async fn item_names(&self) -> Result<HashMap<i32, String>, ServiceError> {
        let db = &*self.db;
        Ok(item::Entity::find()
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .into_iter()
            .map(|i| (i.id, i.name))
            .collect())
    }

    fn particulars(
        kind: CustomerEntryKind,
        v: &voucher::Model,
        items: &HashMap<i32, String>,
        customers: &HashMap<i32, String>,
    ) -> String {
        let item_name = v
            .item_id
            .and_then(|id| items.get(&id).cloned())
            .unwrap_or_else(|| "N/A".to_string());
        match kind {
            CustomerEntryKind::Purchase => format!("Purchase - {}", item_name),
            CustomerEntryKind::CashPaid => "Cash Paid".to_string(),
            CustomerEntryKind::CcrFrom => {
                let other = v
                    .receiving_customer_id
                    .and_then(|id| customers.get(&id).cloned())
                    .unwrap_or_else(|| "N/A".to_string());
                format!("CCR - From {}", other)
            }
            CustomerEntryKind::Sale => format!("Sale - {}", item_name),
            CustomerEntryKind::CashReceived => "Cash Received".to_string(),
            CustomerEntryKind::CcrTo => {
                let other = v
                    .purchasing_customer_id
                    .and_then(|id| customers.get(&id).cloned())
                    .unwrap_or_else(|| "N/A".to_string());
                format!("CCR - To {}", other)
            }
        }
    }

    /// Customer ledger: opening balance is the fold over everything strictly
    /// before the period, lines run oldest-first with a running balance
    #[instrument(skip(self))]
    pub async fn customer_ledger(
        &self,
        customer_id: i32,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<CustomerLedger, ServiceError> {
        let db = &*self.db;
        let customer = customer::Entity::find_by_id(customer_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Customer with ID {} not found", customer_id))
            })?;

        let to = to.unwrap_or_else(today);
        let from = from.unwrap_or_else(|| to - chrono::Duration::days(90));

        let involved = Condition::any()
            .add(voucher::Column::PurchasingCustomerId.eq(customer_id))
            .add(voucher::Column::ReceivingCustomerId.eq(customer_id));

        let prior = voucher::Entity::find()
            .filter(involved.clone())
            .filter(voucher::Column::VoucherDate.lt(from))
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let opening_balance = ledger::customer_balance(prior.iter(), customer_id);

        let in_range = voucher::Entity::find()
            .filter(involved)
            .filter(voucher::Column::VoucherDate.gte(from))
            .filter(voucher::Column::VoucherDate.lte(to))
            .order_by_asc(voucher::Column::VoucherDate)
            .order_by_asc(voucher::Column::Id)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let items = self.item_names().await?;
        let customers = self.customer_names().await?;

        let mut running = opening_balance;
        let mut total_debit = Decimal::ZERO;
        let mut total_credit = Decimal::ZERO;
        let mut lines = Vec::new();

        for v in &in_range {
            for entry in ledger::customer_entries(v, customer_id) {
                let (debit, credit) = match entry.side {
                    Side::Debit => (entry.amount, Decimal::ZERO),
                    Side::Credit => (Decimal::ZERO, entry.amount),
                };
                running += debit - credit;
                total_debit += debit;
                total_credit += credit;
                lines.push(LedgerLine {
                    date: v.voucher_date,
                    transaction_number: v.transaction_number.clone(),
                    voucher_type: v.voucher_type,
                    particulars: Self::particulars(entry.kind, v, &items, &customers),
                    debit,
                    credit,
                    balance: running,
                    balance_label: ledger::balance_label(running),
                });
            }
        }

        Ok(CustomerLedger {
            customer_id,
            customer_name: customer.name,
            from,
            to,
            opening_balance,
            opening_balance_label: ledger::balance_label(opening_balance),
            lines,
            total_debit,
            total_credit,
            closing_balance: running,
            closing_balance_label: ledger::balance_label(running),
        })
    }

    #[instrument(skip(self))]
    pub async fn bank_statement(
        &self,
        bank_id: i32,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<BankStatement, ServiceError> {
        let db = &*self.db;
        let bank = bank::Entity::find_by_id(bank_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Bank with ID {} not found", bank_id)))?;

        let involved = Condition::any()
            .add(voucher::Column::PayingBankId.eq(bank_id))
            .add(voucher::Column::ReceivingBankId.eq(bank_id));

        let prior = voucher::Entity::find()
            .filter(involved.clone())
            .filter(voucher::Column::VoucherDate.lt(from))
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let opening_balance = bank.opening_balance + ledger::bank_movement(prior.iter(), bank_id);

        let in_range = voucher::Entity::find()
            .filter(involved)
            .filter(voucher::Column::VoucherDate.gte(from))
            .filter(voucher::Column::VoucherDate.lte(to))
            .order_by_asc(voucher::Column::VoucherDate)
            .order_by_asc(voucher::Column::Id)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let mut running = opening_balance;
        let mut lines = Vec::new();
        for v in &in_range {
            let delta = ledger::bank_delta(v, bank_id);
            running += delta;
            lines.push(BankStatementLine {
                date: v.voucher_date,
                transaction_number: v.transaction_number.clone(),
                voucher_type: v.voucher_type,
                amount: delta,
                balance: running,
            });
        }

        Ok(BankStatement {
            bank_id,
            bank_name: bank.name,
            from,
            to,
            opening_balance,
            lines,
            closing_balance: running,
        })
    }

    /// Cash statement: cash vouchers plus admin adjustments. When filtered
    /// to one customer, adjustments are left out (they belong to the drawer,
    /// not the counterparty).
    #[instrument(skip(self))]
    pub async fn cash_statement(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        customer_id: Option<i32>,
        voucher_type: Option<VoucherType>,
    ) -> Result<CashStatement, ServiceError> {
        let db = &*self.db;
        let to = to.unwrap_or_else(today);
        let from = from.unwrap_or_else(|| to - Months::new(1));

        let mut cash_filter =
            Condition::all().add(voucher::Column::CashType.eq(crate::entities::voucher::CashType::Cash));
        if let Some(customer_id) = customer_id {
            cash_filter = cash_filter.add(
                Condition::any()
                    .add(voucher::Column::PurchasingCustomerId.eq(customer_id))
                    .add(voucher::Column::ReceivingCustomerId.eq(customer_id)),
            );
        }

        // Opening balance: everything strictly before the period
        let prior = voucher::Entity::find()
            .filter(cash_filter.clone())
            .filter(voucher::Column::VoucherDate.lt(from))
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let prior_adjustments = if customer_id.is_none() {
            cash_adjustment::Entity::find()
                .filter(cash_adjustment::Column::AdjustmentDate.lt(from))
                .all(db)
                .await
                .map_err(ServiceError::DatabaseError)?
        } else {
            Vec::new()
        };
        let opening_balance = ledger::cash_balance(prior.iter(), prior_adjustments.iter());

        let mut range_filter = cash_filter;
        if let Some(voucher_type) = voucher_type {
            range_filter = range_filter.add(voucher::Column::VoucherType.eq(voucher_type));
        }
        let vouchers = voucher::Entity::find()
            .filter(range_filter)
            .filter(voucher::Column::VoucherDate.gte(from))
            .filter(voucher::Column::VoucherDate.lte(to))
            .order_by_asc(voucher::Column::VoucherDate)
            .order_by_asc(voucher::Column::Id)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let adjustments = if customer_id.is_none() {
            cash_adjustment::Entity::find()
                .filter(cash_adjustment::Column::AdjustmentDate.gte(from))
                .filter(cash_adjustment::Column::AdjustmentDate.lte(to))
                .order_by_asc(cash_adjustment::Column::AdjustmentDate)
                .all(db)
                .await
                .map_err(ServiceError::DatabaseError)?
        } else {
            Vec::new()
        };

        let mut total_receipts = Decimal::ZERO;
        let mut total_payments = Decimal::ZERO;
        let mut lines = Vec::new();

        for v in &vouchers {
            let delta = ledger::cash_delta(v);
            if delta.is_zero() {
                continue;
            }
            let (receipt, payment) = if delta > Decimal::ZERO {
                (delta, Decimal::ZERO)
            } else {
                (Decimal::ZERO, -delta)
            };
            total_receipts += receipt;
            total_payments += payment;
            lines.push(CashStatementLine {
                date: v.voucher_date,
                reference: v.transaction_number.clone(),
                description: v.voucher_type.to_string(),
                receipt,
                payment,
            });
        }

        for adj in &adjustments {
            let (receipt, payment) = match adj.adjustment_type {
                CashAdjustmentType::CashIn => (adj.amount, Decimal::ZERO),
                CashAdjustmentType::CashOut => (Decimal::ZERO, adj.amount),
            };
            total_receipts += receipt;
            total_payments += payment;
            lines.push(CashStatementLine {
                date: adj.adjustment_date,
                reference: adj.reference_number.clone().unwrap_or_default(),
                description: adj
                    .description
                    .clone()
                    .unwrap_or_else(|| "Cash adjustment".to_string()),
                receipt,
                payment,
            });
        }

        lines.sort_by(|a, b| a.date.cmp(&b.date));

        Ok(CashStatement {
            from,
            to,
            customer_id,
            opening_balance,
            lines,
            total_receipts,
            total_payments,
            closing_balance: opening_balance + total_receipts - total_payments,
        })
    }

    #[instrument(skip(self))]
    pub async fn cash_flow(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<CashFlowReport, ServiceError> {
        let db = &*self.db;
        let to = to.unwrap_or_else(today);
        let from = from.unwrap_or_else(|| to - chrono::Duration::days(30));

        let prior = voucher::Entity::find()
            .filter(voucher::Column::VoucherDate.lt(from))
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let opening_balance =
            ledger::cash_balance(prior.iter(), std::iter::empty::<&cash_adjustment::Model>());

        let in_range = voucher::Entity::find()
            .filter(voucher::Column::VoucherDate.gte(from))
            .filter(voucher::Column::VoucherDate.lte(to))
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let mut cash_in = Decimal::ZERO;
        let mut cash_out = Decimal::ZERO;
        for v in &in_range {
            let delta = ledger::cash_delta(v);
            if delta > Decimal::ZERO {
                cash_in += delta;
            } else {
                cash_out += -delta;
            }
        }

        Ok(CashFlowReport {
            from,
            to,
            opening_balance,
            cash_in,
            cash_out,
            closing_balance: opening_balance + cash_in - cash_out,
        })
    }

    /// Stock report: opening/purchase/sale/closing per stock-tracked item.
    /// Without a date range, the movement covers the full history.
    #[instrument(skip(self))]
    pub async fn stock_report(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<StockReport, ServiceError> {
        let db = &*self.db;
        let items = item::Entity::find()
            .filter(item::Column::StockTrackingEnabled.eq(true))
            .filter(item::Column::IsActive.eq(true))
            .order_by_asc(item::Column::Name)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let vouchers = voucher::Entity::find()
            .filter(voucher::Column::ItemId.is_not_null())
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let mut movements = Vec::with_capacity(items.len());
        for item in &items {
            let mut opening = item.opening_stock;
            let mut purchase_qty = Decimal::ZERO;
            let mut sale_qty = Decimal::ZERO;
            let mut current = item.opening_stock;

            for v in &vouchers {
                let delta = ledger::stock_delta(v, item.id);
                if delta.is_zero() {
                    continue;
                }
                current += delta;
                let before_range = from.map(|f| v.voucher_date < f).unwrap_or(false);
                let after_range = to.map(|t| v.voucher_date > t).unwrap_or(false);
                if before_range {
                    opening += delta;
                } else if !after_range {
                    if delta > Decimal::ZERO {
                        purchase_qty += delta;
                    } else {
                        sale_qty += -delta;
                    }
                }
            }

            movements.push(StockMovement {
                item_id: item.id,
                item_name: item.name.clone(),
                unit: item.unit.clone(),
                opening_stock: opening,
                purchase_qty,
                sale_qty,
                closing_stock: opening + purchase_qty - sale_qty,
                current_stock: current,
            });
        }

        Ok(StockReport {
            from,
            to,
            items: movements,
        })
    }

    /// One day's cash vouchers with the opening drawer balance
    #[instrument(skip(self))]
    pub async fn daily_cash_book(
        &self,
        date: Option<NaiveDate>,
    ) -> Result<DailyCashBook, ServiceError> {
        let date = date.unwrap_or_else(today);
        let statement = self
            .cash_statement(Some(date), Some(date), None, None)
            .await?;
        Ok(DailyCashBook {
            date,
            opening_balance: statement.opening_balance,
            closing_balance: statement.closing_balance,
            lines: statement.lines,
        })
    }

    #[instrument(skip(self))]
    pub async fn profit_loss(
        &self,
        project_id: i32,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<ProfitLossReport, ServiceError> {
        let db = &*self.db;
        let project = project::Entity::find_by_id(project_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Project with ID {} not found", project_id))
            })?;

        let vouchers = voucher::Entity::find()
            .filter(voucher::Column::ProjectId.eq(project_id))
            .filter(voucher::Column::VoucherDate.gte(from))
            .filter(voucher::Column::VoucherDate.lte(to))
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let revenue = ledger::project_revenue(vouchers.iter());
        let expenses = ledger::project_expenses(vouchers.iter());

        Ok(ProfitLossReport {
            project_id,
            project_name: project.name,
            from,
            to,
            revenue,
            expenses,
            profit_loss: revenue - expenses,
        })
    }

    /// The dashboard/capital summary: one full replay of the voucher table
    #[instrument(skip(self))]
    pub async fn capital_summary(&self) -> Result<CapitalSummary, ServiceError> {
        let db = &*self.db;
        let today = today();
        let last_30_days = today - chrono::Duration::days(30);

        let vouchers = voucher::Entity::find()
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let adjustments = cash_adjustment::Entity::find()
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let customers = customer::Entity::find()
            .filter(customer::Column::IsActive.eq(true))
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let items = item::Entity::find()
            .filter(item::Column::IsActive.eq(true))
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let banks = bank::Entity::find()
            .filter(bank::Column::IsActive.eq(true))
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let expense_heads = expense_head::Entity::find()
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let active_projects = project::Entity::find()
            .filter(project::Column::IsActive.eq(true))
            .count(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let today_vouchers: Vec<_> = vouchers
            .iter()
            .filter(|v| v.voucher_date == today)
            .collect();
        let today_amount = today_vouchers.iter().map(|v| v.amount).sum();

        // 1. Stock value at the weighted-average purchase rate
        let mut total_stock_value = Decimal::ZERO;
        let mut stock = Vec::new();
        for item in &items {
            if !item.stock_tracking_enabled {
                continue;
            }
            let qty = ledger::stock_level(item.opening_stock, vouchers.iter(), item.id);
            if qty <= Decimal::ZERO {
                continue;
            }
            let rate = ledger::average_purchase_rate(vouchers.iter(), item.id)
                .unwrap_or(item.default_rate);
            let value = qty * rate;
            total_stock_value += value;
            stock.push(StockValueEntry {
                name: item.name.clone(),
                quantity: qty,
                value,
            });
        }

        // 2. Receivables and payables from the net exposure per customer
        let mut total_receivables = Decimal::ZERO;
        let mut total_payables = Decimal::ZERO;
        let mut receivables = Vec::new();
        let mut payables = Vec::new();
        for customer in &customers {
            let net = ledger::customer_exposure(vouchers.iter(), customer.id);
            if net > Decimal::ZERO {
                total_receivables += net;
                receivables.push(NameAmount {
                    name: customer.name.clone(),
                    amount: net,
                });
            } else if net < Decimal::ZERO {
                total_payables += -net;
                payables.push(NameAmount {
                    name: customer.name.clone(),
                    amount: -net,
                });
            }
        }
        receivables.sort_by(|a, b| b.amount.cmp(&a.amount));
        payables.sort_by(|a, b| b.amount.cmp(&a.amount));

        // 3. Cash in hand
        let cash_in_hand = ledger::cash_balance(vouchers.iter(), adjustments.iter());

        // 4. Bank balances
        let mut total_bank_balance = Decimal::ZERO;
        let mut bank_rows = Vec::new();
        for bank in &banks {
            let balance = bank.opening_balance + ledger::bank_movement(vouchers.iter(), bank.id);
            total_bank_balance += balance;
            bank_rows.push(NameAmount {
                name: bank.name.clone(),
                amount: balance,
            });
        }

        // 5. Expense summary, last 30 days, grouped by head
        let head_names: HashMap<i32, String> = expense_heads
            .iter()
            .map(|h| (h.id, h.name.clone()))
            .collect();
        let mut by_head: HashMap<String, Decimal> = HashMap::new();
        let mut total_expenses_30_days = Decimal::ZERO;
        for v in vouchers.iter().filter(|v| {
            matches!(v.voucher_type, VoucherType::Expense | VoucherType::Hazri)
                && v.voucher_date >= last_30_days
        }) {
            let name = v
                .expense_head_id
                .and_then(|id| head_names.get(&id).cloned())
                .unwrap_or_else(|| "Other".to_string());
            *by_head.entry(name).or_default() += v.amount;
            total_expenses_30_days += v.amount;
        }
        let mut expense_summary: Vec<NameAmount> = by_head
            .into_iter()
            .map(|(name, amount)| NameAmount { name, amount })
            .collect();
        expense_summary.sort_by(|a, b| b.amount.cmp(&a.amount));
        expense_summary.truncate(10);

        // 6. Monthly trend, last six months
        let mut monthly_trend = Vec::with_capacity(6);
        let month_start = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)
            .expect("first of month is always valid");
        for i in (0..6).rev() {
            let start = month_start - Months::new(i);
            let end = start + Months::new(1);
            let in_month: Vec<_> = vouchers
                .iter()
                .filter(|v| v.voucher_date >= start && v.voucher_date < end)
                .collect();
            let sales = in_month
                .iter()
                .filter(|v| v.voucher_type == VoucherType::Sale)
                .map(|v| v.amount)
                .sum();
            let purchases = in_month
                .iter()
                .filter(|v| v.voucher_type == VoucherType::Purchase)
                .map(|v| v.amount)
                .sum();
            let expenses = in_month
                .iter()
                .filter(|v| {
                    matches!(v.voucher_type, VoucherType::Expense | VoucherType::Hazri)
                })
                .map(|v| v.amount)
                .sum();
            monthly_trend.push(MonthlyTrendEntry {
                month: start.format("%b %Y").to_string(),
                sales,
                purchases,
                expenses,
            });
        }

        // 7. All-time expenses
        let total_expenses = vouchers
            .iter()
            .filter(|v| matches!(v.voucher_type, VoucherType::Expense | VoucherType::Hazri))
            .map(|v| v.amount)
            .sum::<Decimal>();

        // 8. Voucher type distribution, last 30 days
        let mut distribution: HashMap<VoucherType, (u64, Decimal)> = HashMap::new();
        for v in vouchers.iter().filter(|v| v.voucher_date >= last_30_days) {
            let entry = distribution.entry(v.voucher_type).or_default();
            entry.0 += 1;
            entry.1 += v.amount;
        }
        let mut voucher_type_distribution: Vec<VoucherTypeCount> = distribution
            .into_iter()
            .map(|(voucher_type, (count, amount))| VoucherTypeCount {
                voucher_type,
                count,
                amount,
            })
            .collect();
        voucher_type_distribution.sort_by(|a, b| b.count.cmp(&a.count));

        let total_capital = total_stock_value + total_receivables + cash_in_hand
            + total_bank_balance
            - total_payables
            - total_expenses;

        Ok(CapitalSummary {
            total_vouchers: vouchers.len() as u64,
            active_projects,
            total_customers: customers.len() as u64,
            total_items: items.len() as u64,
            today_transactions: today_vouchers.len() as u64,
            today_amount,
            total_stock_value,
            stock,
            total_receivables,
            receivables,
            total_payables,
            payables,
            cash_in_hand,
            total_bank_balance,
            banks: bank_rows,
            expense_summary,
            total_expenses_30_days,
            total_expenses,
            monthly_trend,
            voucher_type_distribution,
            total_capital,
        })
    }

    /// Records an admin cash adjustment with a generated reference number
    #[instrument(skip(self, input))]
    pub async fn add_cash_adjustment(
        &self,
        input: NewCashAdjustment,
        actor: &str,
    ) -> Result<cash_adjustment::Model, ServiceError> {
        input.validate()?;
        if input.amount <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Amount must be greater than 0".into(),
            ));
        }
        let db = &*self.db;

        let count = cash_adjustment::Entity::find()
            .count(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let direction = match input.adjustment_type {
            CashAdjustmentType::CashIn => "IN",
            CashAdjustmentType::CashOut => "OUT",
        };
        let reference_number = format!(
            "CASH-{}-{}-{:04}",
            direction,
            Utc::now().format("%Y%m%d"),
            count + 1
        );

        let model = cash_adjustment::ActiveModel {
            adjustment_date: Set(input.adjustment_date),
            adjustment_type: Set(input.adjustment_type),
            amount: Set(input.amount),
            description: Set(input.description),
            reference_number: Set(Some(reference_number.clone())),
            created_at: Set(Utc::now()),
            created_by: Set(Some(actor.to_string())),
            ..Default::default()
        };
        let created = model.insert(db).await.map_err(ServiceError::DatabaseError)?;
        self.event_sender.send_or_log(Event::CashAdjusted {
            adjustment_id: created.id,
            reference_number,
        });
        info!(adjustment_id = created.id, "Cash adjustment recorded");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn list_cash_adjustments(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<cash_adjustment::Model>, ServiceError> {
        let db = &*self.db;
        let mut query = cash_adjustment::Entity::find()
            .order_by_asc(cash_adjustment::Column::AdjustmentDate);
        if let Some(from) = from {
            query = query.filter(cash_adjustment::Column::AdjustmentDate.gte(from));
        }
        if let Some(to) = to {
            query = query.filter(cash_adjustment::Column::AdjustmentDate.lte(to));
        }
        query.all(db).await.map_err(ServiceError::DatabaseError)
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}
