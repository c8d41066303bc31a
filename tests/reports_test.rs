mod common;

use common::{date, voucher_input, TestHarness};
use rust_decimal_macros::dec;

use munshi_api::entities::cash_adjustment::CashAdjustmentType;
use munshi_api::entities::voucher::{CashType, VoucherType};
use munshi_api::services::reports::NewCashAdjustment;

#[tokio::test]
async fn customer_ledger_splits_opening_and_running_balance() {
    let app = TestHarness::new().await;
    let project = app.project("Plaza Construction").await;
    let customer = app.customer("ABC Trading").await;
    let item = app.item("Cement", dec!(0), dec!(1250)).await;

    // Before the reporting period: a sale of 1000 (customer owes us)
    let mut early_sale = voucher_input(VoucherType::Sale, date(2025, 6, 15), dec!(1000));
    early_sale.project_id = Some(project);
    early_sale.receiving_customer_id = Some(customer);
    early_sale.item_id = Some(item);
    app.services
        .vouchers
        .create(early_sale, "tester")
        .await
        .unwrap();

    // In the period: they pay 400, then buy again for 600
    let mut payment = voucher_input(VoucherType::CashReceived, date(2025, 9, 2), dec!(400));
    payment.receiving_customer_id = Some(customer);
    app.services
        .vouchers
        .create(payment, "tester")
        .await
        .unwrap();

    let mut sale = voucher_input(VoucherType::Sale, date(2025, 9, 5), dec!(600));
    sale.project_id = Some(project);
    sale.receiving_customer_id = Some(customer);
    sale.item_id = Some(item);
    app.services.vouchers.create(sale, "tester").await.unwrap();

    let ledger = app
        .services
        .reports
        .customer_ledger(customer, Some(date(2025, 9, 1)), Some(date(2025, 9, 30)))
        .await
        .unwrap();

    assert_eq!(ledger.opening_balance, dec!(1000));
    assert_eq!(ledger.lines.len(), 2);
    assert_eq!(ledger.total_debit, dec!(600));
    assert_eq!(ledger.total_credit, dec!(400));
    // closing = opening + total debits - total credits
    assert_eq!(
        ledger.closing_balance,
        ledger.opening_balance + ledger.total_debit - ledger.total_credit
    );
    assert_eq!(ledger.closing_balance_label, "1200 Dr");

    // Running balance after the payment, before the second sale
    assert_eq!(ledger.lines[0].balance, dec!(600));
    assert_eq!(ledger.lines[0].particulars, "Cash Received");
    assert_eq!(ledger.lines[1].particulars, "Sale - Cement");
}

#[tokio::test]
async fn supplier_side_uses_credit_for_purchases() {
    let app = TestHarness::new().await;
    let project = app.project("Plaza Construction").await;
    let supplier = app.customer("Steel Mills").await;

    let mut purchase = voucher_input(VoucherType::Purchase, date(2025, 9, 1), dec!(5000));
    purchase.project_id = Some(project);
    purchase.purchasing_customer_id = Some(supplier);
    app.services
        .vouchers
        .create(purchase, "tester")
        .await
        .unwrap();

    let mut paid = voucher_input(VoucherType::CashPaid, date(2025, 9, 3), dec!(2000));
    paid.purchasing_customer_id = Some(supplier);
    app.services.vouchers.create(paid, "tester").await.unwrap();

    let ledger = app
        .services
        .reports
        .customer_ledger(supplier, Some(date(2025, 9, 1)), Some(date(2025, 9, 30)))
        .await
        .unwrap();

    // We owe 3000: purchase credited 5000, payment debited 2000 back
    assert_eq!(ledger.closing_balance, dec!(-3000));
    assert_eq!(ledger.closing_balance_label, "3000 Cr");
}

#[tokio::test]
async fn ccr_moves_balance_between_two_customers() {
    let app = TestHarness::new().await;
    let payer = app.customer("Payer").await;
    let receiver = app.customer("Receiver").await;

    let mut ccr = voucher_input(VoucherType::Ccr, date(2025, 9, 4), dec!(750));
    ccr.purchasing_customer_id = Some(payer);
    ccr.receiving_customer_id = Some(receiver);
    app.services.vouchers.create(ccr, "tester").await.unwrap();

    let payer_balance = app.services.customers.balance(payer, None).await.unwrap();
    let receiver_balance = app
        .services
        .customers
        .balance(receiver, None)
        .await
        .unwrap();
    assert_eq!(payer_balance.balance, dec!(750));
    assert_eq!(receiver_balance.balance, dec!(-750));
}

#[tokio::test]
async fn bank_statement_runs_from_the_opening_balance() {
    let app = TestHarness::new().await;
    let bank = app.bank("HBL", dec!(100000)).await;
    let customer = app.customer("ABC Trading").await;

    // Before the period: 20000 paid out
    let mut early = voucher_input(VoucherType::CashPaid, date(2025, 8, 10), dec!(20000));
    early.purchasing_customer_id = Some(customer);
    early.paying_bank_id = Some(bank);
    app.services.vouchers.create(early, "tester").await.unwrap();

    // In the period: 5000 received
    let mut received = voucher_input(VoucherType::CashReceived, date(2025, 9, 5), dec!(5000));
    received.receiving_customer_id = Some(customer);
    received.receiving_bank_id = Some(bank);
    app.services
        .vouchers
        .create(received, "tester")
        .await
        .unwrap();

    let statement = app
        .services
        .reports
        .bank_statement(bank, date(2025, 9, 1), date(2025, 9, 30))
        .await
        .unwrap();

    assert_eq!(statement.opening_balance, dec!(80000));
    assert_eq!(statement.lines.len(), 1);
    assert_eq!(statement.lines[0].amount, dec!(5000));
    assert_eq!(statement.closing_balance, dec!(85000));
}

#[tokio::test]
async fn cash_statement_includes_adjustments_and_respects_the_customer_filter() {
    let app = TestHarness::new().await;
    let project = app.project("Plaza Construction").await;
    let customer = app.customer("ABC Trading").await;

    let mut cash_sale = voucher_input(VoucherType::Sale, date(2025, 9, 2), dec!(3000));
    cash_sale.project_id = Some(project);
    cash_sale.receiving_customer_id = Some(customer);
    cash_sale.cash_type = Some(CashType::Cash);
    app.services
        .vouchers
        .create(cash_sale, "tester")
        .await
        .unwrap();

    // A credit sale must not show up in the cash statement
    let mut credit_sale = voucher_input(VoucherType::Sale, date(2025, 9, 3), dec!(9999));
    credit_sale.project_id = Some(project);
    credit_sale.receiving_customer_id = Some(customer);
    credit_sale.cash_type = Some(CashType::Credit);
    app.services
        .vouchers
        .create(credit_sale, "tester")
        .await
        .unwrap();

    app.services
        .reports
        .add_cash_adjustment(
            NewCashAdjustment {
                adjustment_date: date(2025, 9, 4),
                adjustment_type: CashAdjustmentType::CashOut,
                amount: dec!(500),
                description: Some("Drawer count correction".to_string()),
            },
            "tester",
        )
        .await
        .unwrap();

    let statement = app
        .services
        .reports
        .cash_statement(Some(date(2025, 9, 1)), Some(date(2025, 9, 30)), None, None)
        .await
        .unwrap();

    assert_eq!(statement.total_receipts, dec!(3000));
    assert_eq!(statement.total_payments, dec!(500));
    assert_eq!(statement.closing_balance, dec!(2500));
    assert_eq!(statement.lines.len(), 2);

    // Customer-filtered view leaves the drawer adjustments out
    let filtered = app
        .services
        .reports
        .cash_statement(
            Some(date(2025, 9, 1)),
            Some(date(2025, 9, 30)),
            Some(customer),
            None,
        )
        .await
        .unwrap();
    assert_eq!(filtered.total_receipts, dec!(3000));
    assert_eq!(filtered.total_payments, dec!(0));
    assert_eq!(filtered.lines.len(), 1);
}

#[tokio::test]
async fn cash_adjustment_reference_numbers_are_generated() {
    let app = TestHarness::new().await;
    let created = app
        .services
        .reports
        .add_cash_adjustment(
            NewCashAdjustment {
                adjustment_date: date(2025, 9, 4),
                adjustment_type: CashAdjustmentType::CashIn,
                amount: dec!(1000),
                description: None,
            },
            "tester",
        )
        .await
        .unwrap();
    let reference = created.reference_number.unwrap();
    assert!(reference.starts_with("CASH-IN-"));
    assert!(reference.ends_with("-0001"));
}

#[tokio::test]
async fn stock_report_tracks_movement_over_the_period() {
    let app = TestHarness::new().await;
    let project = app.project("Plaza Construction").await;
    let customer = app.customer("ABC Trading").await;
    let item = app.item("Cement", dec!(50), dec!(1250)).await;

    // Before the period
    let mut early = voucher_input(VoucherType::Purchase, date(2025, 8, 1), dec!(12500));
    early.project_id = Some(project);
    early.purchasing_customer_id = Some(customer);
    early.item_id = Some(item);
    early.quantity = Some(dec!(10));
    early.stock_include = true;
    app.services.vouchers.create(early, "tester").await.unwrap();

    // In the period: buy 20, sell 5
    let mut purchase = voucher_input(VoucherType::Purchase, date(2025, 9, 2), dec!(25000));
    purchase.project_id = Some(project);
    purchase.purchasing_customer_id = Some(customer);
    purchase.item_id = Some(item);
    purchase.quantity = Some(dec!(20));
    purchase.stock_include = true;
    app.services
        .vouchers
        .create(purchase, "tester")
        .await
        .unwrap();

    let mut sale = voucher_input(VoucherType::Sale, date(2025, 9, 10), dec!(7500));
    sale.project_id = Some(project);
    sale.receiving_customer_id = Some(customer);
    sale.item_id = Some(item);
    sale.quantity = Some(dec!(5));
    sale.stock_include = true;
    app.services.vouchers.create(sale, "tester").await.unwrap();

    // A sale without the stock flag never moves stock
    let mut untracked = voucher_input(VoucherType::Sale, date(2025, 9, 11), dec!(1500));
    untracked.project_id = Some(project);
    untracked.receiving_customer_id = Some(customer);
    untracked.item_id = Some(item);
    untracked.quantity = Some(dec!(99));
    app.services
        .vouchers
        .create(untracked, "tester")
        .await
        .unwrap();

    let report = app
        .services
        .reports
        .stock_report(Some(date(2025, 9, 1)), Some(date(2025, 9, 30)))
        .await
        .unwrap();

    let movement = report.items.iter().find(|m| m.item_id == item).unwrap();
    assert_eq!(movement.opening_stock, dec!(60));
    assert_eq!(movement.purchase_qty, dec!(20));
    assert_eq!(movement.sale_qty, dec!(5));
    assert_eq!(movement.closing_stock, dec!(75));
    assert_eq!(movement.current_stock, dec!(75));
    assert_eq!(
        movement.closing_stock,
        movement.opening_stock + movement.purchase_qty - movement.sale_qty
    );
}

#[tokio::test]
async fn profit_loss_sums_revenue_against_expenses() {
    let app = TestHarness::new().await;
    let project = app.project("Plaza Construction").await;
    let customer = app.customer("ABC Trading").await;
    let head = app.expense_head("Labor Charges").await;

    let mut sale = voucher_input(VoucherType::Sale, date(2025, 9, 1), dec!(100000));
    sale.project_id = Some(project);
    sale.receiving_customer_id = Some(customer);
    app.services.vouchers.create(sale, "tester").await.unwrap();

    let mut purchase = voucher_input(VoucherType::Purchase, date(2025, 9, 2), dec!(60000));
    purchase.project_id = Some(project);
    purchase.purchasing_customer_id = Some(customer);
    app.services
        .vouchers
        .create(purchase, "tester")
        .await
        .unwrap();

    let mut hazri = voucher_input(VoucherType::Hazri, date(2025, 9, 3), dec!(5000));
    hazri.project_id = Some(project);
    hazri.expense_head_id = Some(head);
    app.services.vouchers.create(hazri, "tester").await.unwrap();

    let report = app
        .services
        .reports
        .profit_loss(project, date(2025, 9, 1), date(2025, 9, 30))
        .await
        .unwrap();

    assert_eq!(report.revenue, dec!(100000));
    assert_eq!(report.expenses, dec!(65000));
    assert_eq!(report.profit_loss, dec!(35000));
}

#[tokio::test]
async fn capital_summary_balances_assets_against_liabilities() {
    let app = TestHarness::new().await;
    let project = app.project("Plaza Construction").await;
    let receivable_customer = app.customer("Owes Us").await;
    let payable_customer = app.customer("We Owe").await;
    let bank = app.bank("HBL", dec!(50000)).await;
    let item = app.item("Cement", dec!(0), dec!(1000)).await;
    let head = app.expense_head("Utilities").await;

    // Stock: buy 10 bags at 1200 (weighted-average rate 1200)
    let mut purchase = voucher_input(VoucherType::Purchase, date(2025, 9, 1), dec!(12000));
    purchase.project_id = Some(project);
    purchase.purchasing_customer_id = Some(payable_customer);
    purchase.item_id = Some(item);
    purchase.quantity = Some(dec!(10));
    purchase.stock_include = true;
    app.services
        .vouchers
        .create(purchase, "tester")
        .await
        .unwrap();

    // Receivable: sell for 8000 on credit
    let mut sale = voucher_input(VoucherType::Sale, date(2025, 9, 2), dec!(8000));
    sale.project_id = Some(project);
    sale.receiving_customer_id = Some(receivable_customer);
    app.services.vouchers.create(sale, "tester").await.unwrap();

    // Expense: 1500 against a head
    let mut expense = voucher_input(VoucherType::Expense, date(2025, 9, 3), dec!(1500));
    expense.project_id = Some(project);
    expense.expense_head_id = Some(head);
    app.services
        .vouchers
        .create(expense, "tester")
        .await
        .unwrap();

    let summary = app.services.reports.capital_summary().await.unwrap();

    assert_eq!(summary.total_stock_value, dec!(12000));
    assert_eq!(summary.total_receivables, dec!(8000));
    assert_eq!(summary.total_payables, dec!(12000));
    assert_eq!(summary.total_bank_balance, dec!(50000));
    assert_eq!(summary.total_expenses, dec!(1500));
    assert_eq!(
        summary.total_capital,
        summary.total_stock_value + summary.total_receivables + summary.cash_in_hand
            + summary.total_bank_balance
            - summary.total_payables
            - summary.total_expenses
    );

    let receivable_names: Vec<_> = summary.receivables.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(receivable_names, vec!["Owes Us"]);
    let payable_names: Vec<_> = summary.payables.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(payable_names, vec!["We Owe"]);
}

#[tokio::test]
async fn daily_cash_book_covers_one_day() {
    let app = TestHarness::new().await;
    let project = app.project("Plaza Construction").await;
    let customer = app.customer("ABC Trading").await;

    // Yesterday's cash sale feeds the opening balance
    let mut yesterday = voucher_input(VoucherType::Sale, date(2025, 9, 1), dec!(1000));
    yesterday.project_id = Some(project);
    yesterday.receiving_customer_id = Some(customer);
    yesterday.cash_type = Some(CashType::Cash);
    app.services
        .vouchers
        .create(yesterday, "tester")
        .await
        .unwrap();

    let mut today = voucher_input(VoucherType::CashPaid, date(2025, 9, 2), dec!(300));
    today.purchasing_customer_id = Some(customer);
    today.cash_type = Some(CashType::Cash);
    app.services.vouchers.create(today, "tester").await.unwrap();

    let book = app
        .services
        .reports
        .daily_cash_book(Some(date(2025, 9, 2)))
        .await
        .unwrap();

    assert_eq!(book.opening_balance, dec!(1000));
    assert_eq!(book.lines.len(), 1);
    assert_eq!(book.closing_balance, dec!(700));
}
