//! Balance derivation by ledger replay.
//!
//! Balances, stock levels, and capital figures are never stored; they are
//! folds over the voucher history. Each account kind (customer, bank, cash
//! drawer, stock item) has a fixed debit/credit rule per voucher type, and a
//! report's opening balance is the fold over everything strictly before the
//! reporting period.

use rust_decimal::Decimal;

use crate::entities::{
    cash_adjustment,
    voucher::{self, VoucherType},
};

/// Which side of the ledger an entry lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Side {
    Debit,
    Credit,
}

/// Why a voucher touched a customer's ledger; reports turn this into the
/// human-readable particulars line
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CustomerEntryKind {
    /// Purchase from the customer (we owe them)
    Purchase,
    /// Payment made to the customer
    CashPaid,
    /// Reconciliation, customer is the paying party
    CcrFrom,
    /// Sale to the customer (they owe us)
    Sale,
    /// Payment received from the customer
    CashReceived,
    /// Reconciliation, customer is the receiving party
    CcrTo,
}

/// One customer-ledger contribution of a voucher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomerEntry {
    pub side: Side,
    pub amount: Decimal,
    pub kind: CustomerEntryKind,
}

impl CustomerEntry {
    /// Dr-positive signed amount
    pub fn signed_amount(&self) -> Decimal {
        match self.side {
            Side::Debit => self.amount,
            Side::Credit => -self.amount,
        }
    }
}

/// Customer-ledger contributions of a voucher for the given customer.
///
/// Purchase credits the payable side, CashPaid/CCR debit it back; Sale
/// debits the receivable side, CashReceived/CCR credit it back. A voucher
/// naming the customer on both sides contributes twice.
pub fn customer_entries(v: &voucher::Model, customer_id: i32) -> Vec<CustomerEntry> {
    let mut entries = Vec::new();

    if v.purchasing_customer_id == Some(customer_id) {
        match v.voucher_type {
            VoucherType::Purchase => entries.push(CustomerEntry {
                side: Side::Credit,
                amount: v.amount,
                kind: CustomerEntryKind::Purchase,
            }),
            VoucherType::CashPaid => entries.push(CustomerEntry {
                side: Side::Debit,
                amount: v.amount,
                kind: CustomerEntryKind::CashPaid,
            }),
            VoucherType::Ccr => entries.push(CustomerEntry {
                side: Side::Debit,
                amount: v.amount,
                kind: CustomerEntryKind::CcrFrom,
            }),
            _ => {}
        }
    }

    if v.receiving_customer_id == Some(customer_id) {
        match v.voucher_type {
            VoucherType::Sale => entries.push(CustomerEntry {
                side: Side::Debit,
                amount: v.amount,
                kind: CustomerEntryKind::Sale,
            }),
            VoucherType::CashReceived => entries.push(CustomerEntry {
                side: Side::Credit,
                amount: v.amount,
                kind: CustomerEntryKind::CashReceived,
            }),
            VoucherType::Ccr => entries.push(CustomerEntry {
                side: Side::Credit,
                amount: v.amount,
                kind: CustomerEntryKind::CcrTo,
            }),
            _ => {}
        }
    }

    entries
}

/// Dr-positive customer balance delta of a single voucher
pub fn customer_delta(v: &voucher::Model, customer_id: i32) -> Decimal {
    customer_entries(v, customer_id)
        .iter()
        .map(CustomerEntry::signed_amount)
        .sum()
}

/// Customer balance from a voucher slice (Dr positive, Cr negative)
pub fn customer_balance<'a, I>(vouchers: I, customer_id: i32) -> Decimal
where
    I: IntoIterator<Item = &'a voucher::Model>,
{
    vouchers
        .into_iter()
        .map(|v| customer_delta(v, customer_id))
        .sum()
}

/// Bank balance delta of a single voucher: money paid from the bank reduces
/// the balance, money received into it increases it, regardless of type
pub fn bank_delta(v: &voucher::Model, bank_id: i32) -> Decimal {
    let mut delta = Decimal::ZERO;
    if v.paying_bank_id == Some(bank_id) {
        delta -= v.amount;
    }
    if v.receiving_bank_id == Some(bank_id) {
        delta += v.amount;
    }
    delta
}

/// Bank balance movement from a voucher slice
pub fn bank_movement<'a, I>(vouchers: I, bank_id: i32) -> Decimal
where
    I: IntoIterator<Item = &'a voucher::Model>,
{
    vouchers.into_iter().map(|v| bank_delta(v, bank_id)).sum()
}

/// Cash-drawer delta of a single voucher. Only vouchers settled in physical
/// cash participate; reconciliation vouchers never touch the drawer.
pub fn cash_delta(v: &voucher::Model) -> Decimal {
    if !v.is_cash() {
        return Decimal::ZERO;
    }
    match v.voucher_type {
        VoucherType::Sale | VoucherType::CashReceived => v.amount,
        VoucherType::Purchase
        | VoucherType::Expense
        | VoucherType::CashPaid
        | VoucherType::Hazri => -v.amount,
        VoucherType::Ccr | VoucherType::Bcr => Decimal::ZERO,
    }
}

/// Cash in hand from vouchers plus admin adjustments
pub fn cash_balance<'a, V, A>(vouchers: V, adjustments: A) -> Decimal
where
    V: IntoIterator<Item = &'a voucher::Model>,
    A: IntoIterator<Item = &'a cash_adjustment::Model>,
{
    let from_vouchers: Decimal = vouchers.into_iter().map(cash_delta).sum();
    let from_adjustments: Decimal = adjustments
        .into_iter()
        .map(cash_adjustment::Model::signed_amount)
        .sum();
    from_vouchers + from_adjustments
}

/// Stock delta of a single voucher for an item. Purchases add, sales
/// subtract; both only when the voucher is flagged stock-affecting.
pub fn stock_delta(v: &voucher::Model, item_id: i32) -> Decimal {
    if v.item_id != Some(item_id) || !v.stock_include {
        return Decimal::ZERO;
    }
    let qty = v.quantity.unwrap_or(Decimal::ZERO);
    match v.voucher_type {
        VoucherType::Purchase => qty,
        VoucherType::Sale => -qty,
        _ => Decimal::ZERO,
    }
}

/// Stock level for an item: opening stock plus the fold of its history
pub fn stock_level<'a, I>(opening_stock: Decimal, vouchers: I, item_id: i32) -> Decimal
where
    I: IntoIterator<Item = &'a voucher::Model>,
{
    opening_stock
        + vouchers
            .into_iter()
            .map(|v| stock_delta(v, item_id))
            .sum::<Decimal>()
}

/// Weighted-average purchase rate of an item across its stock-affecting
/// purchases; `None` when nothing was purchased
pub fn average_purchase_rate<'a, I>(vouchers: I, item_id: i32) -> Option<Decimal>
where
    I: IntoIterator<Item = &'a voucher::Model>,
{
    let mut total_amount = Decimal::ZERO;
    let mut total_qty = Decimal::ZERO;
    for v in vouchers {
        if v.item_id == Some(item_id)
            && v.voucher_type == VoucherType::Purchase
            && v.stock_include
        {
            total_amount += v.amount;
            total_qty += v.quantity.unwrap_or(Decimal::ZERO);
        }
    }
    if total_qty.is_zero() {
        None
    } else {
        Some(total_amount / total_qty)
    }
}

/// Net exposure against a customer for the capital summary: positive means
/// they owe us (receivable), negative means we owe them (payable).
/// Reconciliation vouchers are deliberately left out, matching the capital
/// report's definition rather than the running ledger's.
pub fn customer_exposure<'a, I>(vouchers: I, customer_id: i32) -> Decimal
where
    I: IntoIterator<Item = &'a voucher::Model>,
{
    let mut to_receive = Decimal::ZERO;
    let mut to_pay = Decimal::ZERO;
    for v in vouchers {
        if v.receiving_customer_id == Some(customer_id) {
            match v.voucher_type {
                VoucherType::Sale => to_receive += v.amount,
                VoucherType::CashReceived => to_receive -= v.amount,
                _ => {}
            }
        }
        if v.purchasing_customer_id == Some(customer_id) {
            match v.voucher_type {
                VoucherType::Purchase => to_pay += v.amount,
                VoucherType::CashPaid => to_pay -= v.amount,
                _ => {}
            }
        }
    }
    to_receive - to_pay
}

/// Revenue side of a project: sales plus cash received
pub fn project_revenue<'a, I>(vouchers: I) -> Decimal
where
    I: IntoIterator<Item = &'a voucher::Model>,
{
    vouchers
        .into_iter()
        .filter(|v| {
            matches!(
                v.voucher_type,
                VoucherType::Sale | VoucherType::CashReceived
            )
        })
        .map(|v| v.amount)
        .sum()
}

/// Expense side of a project: purchases, expenses, labor, and cash paid
pub fn project_expenses<'a, I>(vouchers: I) -> Decimal
where
    I: IntoIterator<Item = &'a voucher::Model>,
{
    vouchers
        .into_iter()
        .filter(|v| {
            matches!(
                v.voucher_type,
                VoucherType::Purchase
                    | VoucherType::Expense
                    | VoucherType::Hazri
                    | VoucherType::CashPaid
            )
        })
        .map(|v| v.amount)
        .sum()
}

/// Render a Dr-positive balance the way ledgers print it: `1250 Dr` / `300 Cr`
pub fn balance_label(balance: Decimal) -> String {
    let side = if balance >= Decimal::ZERO { "Dr" } else { "Cr" };
    format!("{} {}", balance.abs().normalize(), side)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::voucher::{CashType, Model, TransactionStatus, VoucherType};
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;

    fn base(voucher_type: VoucherType, amount: Decimal) -> Model {
        Model {
            id: 1,
            transaction_number: "TST-1".into(),
            voucher_type,
            cash_type: None,
            voucher_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            purchasing_customer_id: None,
            receiving_customer_id: None,
            paying_bank_id: None,
            receiving_bank_id: None,
            item_id: None,
            expense_head_id: None,
            project_id: None,
            weight: None,
            kat: None,
            quantity: None,
            rate: None,
            amount,
            expense_head_rate: None,
            mon: None,
            gari_no: None,
            expense_head_details: None,
            stock_include: false,
            purchasing_customer_details: None,
            receiving_customer_details: None,
            paying_bank_details: None,
            receiving_bank_details: None,
            status: TransactionStatus::Completed,
            created_at: Utc::now(),
            created_by: None,
            updated_at: None,
            updated_by: None,
        }
    }

    #[test]
    fn purchase_credits_the_supplier() {
        let mut v = base(VoucherType::Purchase, dec!(500));
        v.purchasing_customer_id = Some(7);
        let entries = customer_entries(&v, 7);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].side, Side::Credit);
        assert_eq!(customer_delta(&v, 7), dec!(-500));
    }

    #[test]
    fn cash_paid_debits_the_supplier_back() {
        let mut purchase = base(VoucherType::Purchase, dec!(500));
        purchase.purchasing_customer_id = Some(7);
        let mut paid = base(VoucherType::CashPaid, dec!(200));
        paid.purchasing_customer_id = Some(7);
        assert_eq!(customer_balance([&purchase, &paid], 7), dec!(-300));
    }

    #[test]
    fn sale_then_cash_received_nets_the_receivable() {
        let mut sale = base(VoucherType::Sale, dec!(900));
        sale.receiving_customer_id = Some(3);
        let mut received = base(VoucherType::CashReceived, dec!(400));
        received.receiving_customer_id = Some(3);
        assert_eq!(customer_balance([&sale, &received], 3), dec!(500));
    }

    #[test]
    fn ccr_moves_balance_between_both_parties() {
        let mut ccr = base(VoucherType::Ccr, dec!(150));
        ccr.purchasing_customer_id = Some(1);
        ccr.receiving_customer_id = Some(2);
        assert_eq!(customer_delta(&ccr, 1), dec!(150));
        assert_eq!(customer_delta(&ccr, 2), dec!(-150));
    }

    #[test]
    fn same_customer_on_both_sides_contributes_twice() {
        let mut ccr = base(VoucherType::Ccr, dec!(80));
        ccr.purchasing_customer_id = Some(9);
        ccr.receiving_customer_id = Some(9);
        assert_eq!(customer_entries(&ccr, 9).len(), 2);
        assert_eq!(customer_delta(&ccr, 9), dec!(0));
    }

    #[test]
    fn unrelated_voucher_types_leave_customer_ledger_alone() {
        let mut v = base(VoucherType::Expense, dec!(100));
        v.purchasing_customer_id = Some(5);
        v.receiving_customer_id = Some(5);
        assert!(customer_entries(&v, 5).is_empty());
    }

    #[test]
    fn bank_delta_subtracts_payments_and_adds_receipts() {
        let mut v = base(VoucherType::Bcr, dec!(1000));
        v.paying_bank_id = Some(1);
        v.receiving_bank_id = Some(2);
        assert_eq!(bank_delta(&v, 1), dec!(-1000));
        assert_eq!(bank_delta(&v, 2), dec!(1000));
        assert_eq!(bank_delta(&v, 3), dec!(0));
    }

    #[test]
    fn bank_transfer_to_itself_cancels_out() {
        let mut v = base(VoucherType::Bcr, dec!(1000));
        v.paying_bank_id = Some(1);
        v.receiving_bank_id = Some(1);
        assert_eq!(bank_delta(&v, 1), dec!(0));
    }

    #[rstest::rstest]
    #[case(VoucherType::Sale, dec!(250))]
    #[case(VoucherType::CashReceived, dec!(250))]
    #[case(VoucherType::Purchase, dec!(-250))]
    #[case(VoucherType::Expense, dec!(-250))]
    #[case(VoucherType::CashPaid, dec!(-250))]
    #[case(VoucherType::Hazri, dec!(-250))]
    #[case(VoucherType::Ccr, dec!(0))]
    #[case(VoucherType::Bcr, dec!(0))]
    fn cash_delta_signs_per_voucher_type(
        #[case] voucher_type: VoucherType,
        #[case] expected: Decimal,
    ) {
        let mut v = base(voucher_type, dec!(250));
        v.cash_type = Some(CashType::Cash);
        assert_eq!(cash_delta(&v), expected);
    }

    #[test]
    fn non_cash_vouchers_leave_the_drawer_alone() {
        let mut credit_sale = base(VoucherType::Sale, dec!(250));
        credit_sale.cash_type = Some(CashType::Credit);
        assert_eq!(cash_delta(&credit_sale), dec!(0));

        let no_cash_type = base(VoucherType::Sale, dec!(250));
        assert_eq!(cash_delta(&no_cash_type), dec!(0));
    }

    #[test]
    fn stock_delta_respects_the_stock_include_flag() {
        let mut purchase = base(VoucherType::Purchase, dec!(0));
        purchase.item_id = Some(4);
        purchase.quantity = Some(dec!(10));
        purchase.stock_include = true;
        assert_eq!(stock_delta(&purchase, 4), dec!(10));

        purchase.stock_include = false;
        assert_eq!(stock_delta(&purchase, 4), dec!(0));

        let mut sale = base(VoucherType::Sale, dec!(0));
        sale.item_id = Some(4);
        sale.quantity = Some(dec!(3));
        sale.stock_include = true;
        assert_eq!(stock_delta(&sale, 4), dec!(-3));
        assert_eq!(stock_delta(&sale, 5), dec!(0));
    }

    #[test]
    fn average_purchase_rate_weights_by_quantity() {
        let mut a = base(VoucherType::Purchase, dec!(100));
        a.item_id = Some(1);
        a.quantity = Some(dec!(10));
        a.stock_include = true;
        let mut b = base(VoucherType::Purchase, dec!(300));
        b.item_id = Some(1);
        b.quantity = Some(dec!(10));
        b.stock_include = true;
        assert_eq!(average_purchase_rate([&a, &b], 1), Some(dec!(20)));
        assert_eq!(average_purchase_rate([&a, &b], 2), None);
    }

    #[test]
    fn exposure_ignores_reconciliation() {
        let mut sale = base(VoucherType::Sale, dec!(100));
        sale.receiving_customer_id = Some(1);
        let mut ccr = base(VoucherType::Ccr, dec!(40));
        ccr.receiving_customer_id = Some(1);
        assert_eq!(customer_exposure([&sale, &ccr], 1), dec!(100));
    }

    #[test]
    fn balance_labels_carry_the_side() {
        assert_eq!(balance_label(dec!(1250)), "1250 Dr");
        assert_eq!(balance_label(dec!(-300)), "300 Cr");
        assert_eq!(balance_label(dec!(0)), "0 Dr");
    }
}
