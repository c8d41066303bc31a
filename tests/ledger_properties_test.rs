//! Property tests for the ledger replay engine: the accounting identities
//! must hold for arbitrary voucher histories.

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use munshi_api::entities::voucher::{CashType, Model, TransactionStatus, VoucherType};
use munshi_api::ledger::{self, Side};

const CUSTOMER: i32 = 1;
const ITEM: i32 = 7;

fn voucher_type_strategy() -> impl Strategy<Value = VoucherType> {
    prop_oneof![
        Just(VoucherType::Purchase),
        Just(VoucherType::Sale),
        Just(VoucherType::Expense),
        Just(VoucherType::Hazri),
        Just(VoucherType::CashPaid),
        Just(VoucherType::CashReceived),
        Just(VoucherType::Ccr),
        Just(VoucherType::Bcr),
    ]
}

fn cash_type_strategy() -> impl Strategy<Value = Option<CashType>> {
    prop_oneof![
        Just(None),
        Just(Some(CashType::Cash)),
        Just(Some(CashType::Credit)),
        Just(Some(CashType::Bank)),
    ]
}

prop_compose! {
    fn voucher_strategy()(
        id in 1..100_000i32,
        voucher_type in voucher_type_strategy(),
        cash_type in cash_type_strategy(),
        day in 0u32..365,
        amount in 0u32..1_000_000,
        quantity in proptest::option::of(0u32..10_000),
        as_purchaser in any::<bool>(),
        as_receiver in any::<bool>(),
        stock_include in any::<bool>(),
        with_item in any::<bool>(),
    ) -> Model {
        let base = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        Model {
            id,
            transaction_number: format!("{}-{}", voucher_type.prefix(), id),
            voucher_type,
            cash_type,
            voucher_date: base + chrono::Duration::days(day as i64),
            purchasing_customer_id: as_purchaser.then_some(CUSTOMER),
            receiving_customer_id: as_receiver.then_some(CUSTOMER),
            paying_bank_id: None,
            receiving_bank_id: None,
            item_id: with_item.then_some(ITEM),
            expense_head_id: None,
            project_id: None,
            weight: None,
            kat: None,
            quantity: quantity.map(Decimal::from),
            rate: None,
            amount: Decimal::from(amount),
            expense_head_rate: None,
            mon: None,
            gari_no: None,
            expense_head_details: None,
            stock_include,
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
}

proptest! {
    /// closing balance = opening balance + sum(debits) - sum(credits)
    #[test]
    fn closing_balance_is_opening_plus_debits_minus_credits(
        vouchers in prop::collection::vec(voucher_strategy(), 0..60),
        split_day in 0u32..365,
    ) {
        let split = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
            + chrono::Duration::days(split_day as i64);

        let opening = ledger::customer_balance(
            vouchers.iter().filter(|v| v.voucher_date < split),
            CUSTOMER,
        );

        let mut debits = Decimal::ZERO;
        let mut credits = Decimal::ZERO;
        for v in vouchers.iter().filter(|v| v.voucher_date >= split) {
            for entry in ledger::customer_entries(v, CUSTOMER) {
                match entry.side {
                    Side::Debit => debits += entry.amount,
                    Side::Credit => credits += entry.amount,
                }
            }
        }

        let closing = ledger::customer_balance(vouchers.iter(), CUSTOMER);
        prop_assert_eq!(closing, opening + debits - credits);
    }

    /// closing stock = opening stock + purchases(stock_include) - sales(stock_include)
    #[test]
    fn closing_stock_is_opening_plus_purchases_minus_sales(
        vouchers in prop::collection::vec(voucher_strategy(), 0..60),
        opening_stock in 0u32..10_000,
    ) {
        let opening = Decimal::from(opening_stock);

        let purchases: Decimal = vouchers
            .iter()
            .filter(|v| {
                v.voucher_type == VoucherType::Purchase
                    && v.item_id == Some(ITEM)
                    && v.stock_include
            })
            .map(|v| v.quantity.unwrap_or(Decimal::ZERO))
            .sum();
        let sales: Decimal = vouchers
            .iter()
            .filter(|v| {
                v.voucher_type == VoucherType::Sale
                    && v.item_id == Some(ITEM)
                    && v.stock_include
            })
            .map(|v| v.quantity.unwrap_or(Decimal::ZERO))
            .sum();

        let closing = ledger::stock_level(opening, vouchers.iter(), ITEM);
        prop_assert_eq!(closing, opening + purchases - sales);
    }

    /// Folding in two halves equals folding the whole history
    #[test]
    fn balance_fold_is_splittable(
        vouchers in prop::collection::vec(voucher_strategy(), 0..60),
        split in 0usize..60,
    ) {
        let split = split.min(vouchers.len());
        let (first, second) = vouchers.split_at(split);
        let total = ledger::customer_balance(vouchers.iter(), CUSTOMER);
        let halves = ledger::customer_balance(first.iter(), CUSTOMER)
            + ledger::customer_balance(second.iter(), CUSTOMER);
        prop_assert_eq!(total, halves);
    }

    /// The cash drawer never moves on credit/bank vouchers or reconciliations
    #[test]
    fn only_cash_vouchers_move_the_drawer(v in voucher_strategy()) {
        let delta = ledger::cash_delta(&v);
        if v.cash_type != Some(CashType::Cash) {
            prop_assert_eq!(delta, Decimal::ZERO);
        }
        if matches!(v.voucher_type, VoucherType::Ccr | VoucherType::Bcr) {
            prop_assert_eq!(delta, Decimal::ZERO);
        }
    }

    /// Customer entries are always non-negative on both columns
    #[test]
    fn ledger_entries_carry_nonnegative_amounts(v in voucher_strategy()) {
        for entry in ledger::customer_entries(&v, CUSTOMER) {
            prop_assert!(entry.amount >= Decimal::ZERO);
        }
    }
}
