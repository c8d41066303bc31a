mod common;

use common::{date, voucher_input, TestHarness};
use rust_decimal_macros::dec;

use munshi_api::entities::voucher::VoucherType;
use munshi_api::errors::ServiceError;

#[tokio::test]
async fn transaction_numbers_are_sequential_per_type() {
    let app = TestHarness::new().await;
    let project = app.project("Plaza Construction").await;
    let customer = app.customer("ABC Trading").await;

    for expected in ["PUR-1", "PUR-2"] {
        let mut input = voucher_input(VoucherType::Purchase, date(2025, 9, 1), dec!(100));
        input.project_id = Some(project);
        input.purchasing_customer_id = Some(customer);
        let created = app
            .services
            .vouchers
            .create(input, "tester")
            .await
            .unwrap();
        assert_eq!(created.transaction_number, expected);
    }

    // A different type starts its own sequence
    let mut sale = voucher_input(VoucherType::Sale, date(2025, 9, 2), dec!(50));
    sale.project_id = Some(project);
    sale.receiving_customer_id = Some(customer);
    let created = app.services.vouchers.create(sale, "tester").await.unwrap();
    assert_eq!(created.transaction_number, "SAL-1");

    let preview = app
        .services
        .vouchers
        .next_transaction_number(VoucherType::Purchase)
        .await
        .unwrap();
    assert_eq!(preview, "PUR-3");
}

#[tokio::test]
async fn amount_is_derived_from_quantity_and_rate_when_omitted() {
    let app = TestHarness::new().await;
    let project = app.project("Plaza Construction").await;
    let customer = app.customer("ABC Trading").await;
    let item = app.item("Cement", dec!(0), dec!(1250)).await;

    let mut input = voucher_input(VoucherType::Purchase, date(2025, 9, 1), dec!(0));
    input.project_id = Some(project);
    input.purchasing_customer_id = Some(customer);
    input.item_id = Some(item);
    input.quantity = Some(dec!(10));
    input.rate = Some(dec!(1250));

    let created = app
        .services
        .vouchers
        .create(input, "tester")
        .await
        .unwrap();
    assert_eq!(created.amount, dec!(12500));
}

#[tokio::test]
async fn operating_vouchers_require_a_project() {
    let app = TestHarness::new().await;
    let customer = app.customer("ABC Trading").await;

    let mut input = voucher_input(VoucherType::Purchase, date(2025, 9, 1), dec!(100));
    input.purchasing_customer_id = Some(customer);

    let err = app
        .services
        .vouchers
        .create(input, "tester")
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::VoucherError(_)));
}

#[tokio::test]
async fn editing_a_voucher_leaves_no_balance_drift() {
    let app = TestHarness::new().await;
    let project = app.project("Plaza Construction").await;
    let customer = app.customer("ABC Trading").await;
    let item = app.item("Cement", dec!(100), dec!(1250)).await;

    let mut input = voucher_input(VoucherType::Purchase, date(2025, 9, 1), dec!(12500));
    input.project_id = Some(project);
    input.purchasing_customer_id = Some(customer);
    input.item_id = Some(item);
    input.quantity = Some(dec!(10));
    input.stock_include = true;
    let created = app
        .services
        .vouchers
        .create(input.clone(), "tester")
        .await
        .unwrap();

    let stock = app.services.items.stock(item).await.unwrap();
    assert_eq!(stock.current_stock, dec!(110));

    // Re-point the voucher at a different quantity; the derived stock must
    // reflect only the new value, with nothing left over from the old one
    input.quantity = Some(dec!(4));
    input.amount = dec!(5000);
    app.services
        .vouchers
        .update(created.id, input, "tester")
        .await
        .unwrap();

    let stock = app.services.items.stock(item).await.unwrap();
    assert_eq!(stock.current_stock, dec!(104));

    // Deleting removes the effect entirely
    app.services.vouchers.delete(created.id).await.unwrap();
    let stock = app.services.items.stock(item).await.unwrap();
    assert_eq!(stock.current_stock, dec!(100));
}

#[tokio::test]
async fn bank_balances_follow_voucher_edits() {
    let app = TestHarness::new().await;
    let bank = app.bank("HBL", dec!(500000)).await;
    let customer = app.customer("ABC Trading").await;

    let mut input = voucher_input(VoucherType::CashPaid, date(2025, 9, 1), dec!(40000));
    input.purchasing_customer_id = Some(customer);
    input.paying_bank_id = Some(bank);
    let created = app
        .services
        .vouchers
        .create(input.clone(), "tester")
        .await
        .unwrap();

    let balance = app.services.banks.balance(bank, None).await.unwrap();
    assert_eq!(balance.balance, dec!(460000));

    input.amount = dec!(10000);
    app.services
        .vouchers
        .update(created.id, input, "tester")
        .await
        .unwrap();
    let balance = app.services.banks.balance(bank, None).await.unwrap();
    assert_eq!(balance.balance, dec!(490000));
}

#[tokio::test]
async fn deactivated_customers_keep_their_history_in_reports() {
    let app = TestHarness::new().await;
    let project = app.project("Plaza Construction").await;
    let customer = app.customer("ABC Trading").await;

    let mut sale = voucher_input(VoucherType::Sale, date(2025, 9, 1), dec!(900));
    sale.project_id = Some(project);
    sale.receiving_customer_id = Some(customer);
    app.services.vouchers.create(sale, "tester").await.unwrap();

    app.services.customers.deactivate(customer).await.unwrap();

    // The customer vanishes from pickers but not from ledgers
    let active = app.services.customers.list(false).await.unwrap();
    assert!(active.iter().all(|c| c.id != customer));

    let ledger = app
        .services
        .reports
        .customer_ledger(customer, Some(date(2025, 8, 1)), Some(date(2025, 9, 30)))
        .await
        .unwrap();
    assert_eq!(ledger.lines.len(), 1);
    assert_eq!(ledger.closing_balance, dec!(900));

    let balance = app.services.customers.balance(customer, None).await.unwrap();
    assert_eq!(balance.balance, dec!(900));
}

#[tokio::test]
async fn voucher_list_filters_compose() {
    let app = TestHarness::new().await;
    let project = app.project("Plaza Construction").await;
    let other_project = app.project("Warehouse").await;
    let customer = app.customer("ABC Trading").await;

    for (ptype, pid, day) in [
        (VoucherType::Sale, project, 1),
        (VoucherType::Sale, other_project, 2),
        (VoucherType::CashReceived, project, 3),
    ] {
        let mut input = voucher_input(ptype, date(2025, 9, day), dec!(100));
        input.project_id = Some(pid);
        input.receiving_customer_id = Some(customer);
        app.services.vouchers.create(input, "tester").await.unwrap();
    }

    let filter = munshi_api::services::vouchers::VoucherFilter {
        voucher_type: Some(VoucherType::Sale),
        project_id: Some(project),
        ..Default::default()
    };
    let (vouchers, total) = app.services.vouchers.list(filter, 1, 20).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(vouchers.len(), 1);
    assert_eq!(vouchers[0].voucher_type, VoucherType::Sale);

    let filter = munshi_api::services::vouchers::VoucherFilter {
        customer_id: Some(customer),
        from: Some(date(2025, 9, 2)),
        to: Some(date(2025, 9, 3)),
        ..Default::default()
    };
    let (_, total) = app.services.vouchers.list(filter, 1, 20).await.unwrap();
    assert_eq!(total, 2);
}
