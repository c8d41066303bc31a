//! CSV renderings of the reports, served as downloadable attachments.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::entities::{customer, item, voucher};
use crate::errors::ServiceError;
use crate::services::reports::CustomerLedger;

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>, ServiceError> {
    writer
        .into_inner()
        .map_err(|e| ServiceError::ExportError(e.to_string()))
}

fn write_row<const N: usize>(
    writer: &mut csv::Writer<Vec<u8>>,
    row: [&str; N],
) -> Result<(), ServiceError> {
    writer
        .write_record(row)
        .map_err(|e| ServiceError::ExportError(e.to_string()))
}

/// Voucher register: one row per voucher with resolved party names
pub fn vouchers_csv(
    vouchers: &[voucher::Model],
    customers: &HashMap<i32, String>,
    projects: &HashMap<i32, String>,
) -> Result<Vec<u8>, ServiceError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    write_row(
        &mut writer,
        ["Transaction No", "Type", "Date", "Amount", "Customer", "Project"],
    )?;

    for v in vouchers {
        let customer_name = v
            .purchasing_customer_id
            .or(v.receiving_customer_id)
            .and_then(|id| customers.get(&id).cloned())
            .unwrap_or_default();
        let project_name = v
            .project_id
            .and_then(|id| projects.get(&id).cloned())
            .unwrap_or_default();
        write_row(
            &mut writer,
            [
                v.transaction_number.as_str(),
                &v.voucher_type.to_string(),
                &v.voucher_date.format("%Y-%m-%d").to_string(),
                &v.amount.to_string(),
                &customer_name,
                &project_name,
            ],
        )?;
    }

    finish(writer)
}

/// Stock listing with the derived stock level and its value at default rate
pub fn stock_csv(items: &[(item::Model, Decimal)]) -> Result<Vec<u8>, ServiceError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    write_row(
        &mut writer,
        ["Item Name", "Unit", "Current Stock", "Default Rate", "Stock Value"],
    )?;

    for (item, current_stock) in items {
        let value = *current_stock * item.default_rate;
        write_row(
            &mut writer,
            [
                item.name.as_str(),
                item.unit.as_deref().unwrap_or(""),
                &current_stock.to_string(),
                &item.default_rate.to_string(),
                &value.to_string(),
            ],
        )?;
    }

    finish(writer)
}

/// Customer directory
pub fn customers_csv(customers: &[customer::Model]) -> Result<Vec<u8>, ServiceError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    write_row(&mut writer, ["Name", "Phone", "Address", "Status"])?;

    for c in customers {
        write_row(
            &mut writer,
            [
                c.name.as_str(),
                c.phone.as_deref().unwrap_or(""),
                c.address.as_deref().unwrap_or(""),
                if c.is_active { "Active" } else { "Inactive" },
            ],
        )?;
    }

    finish(writer)
}

/// Running customer ledger with opening row, line items, and totals
pub fn customer_ledger_csv(ledger: &CustomerLedger) -> Result<Vec<u8>, ServiceError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    write_row(
        &mut writer,
        [
            "Date",
            "Transaction No",
            "Type",
            "Particulars",
            "Debit (Dr)",
            "Credit (Cr)",
            "Balance",
        ],
    )?;

    let opening_debit = if ledger.opening_balance > Decimal::ZERO {
        ledger.opening_balance
    } else {
        Decimal::ZERO
    };
    let opening_credit = if ledger.opening_balance < Decimal::ZERO {
        -ledger.opening_balance
    } else {
        Decimal::ZERO
    };
    write_row(
        &mut writer,
        [
            &ledger.from.format("%d-%b-%Y").to_string(),
            "",
            "",
            "Opening Balance",
            &opening_debit.to_string(),
            &opening_credit.to_string(),
            &ledger.opening_balance_label,
        ],
    )?;

    for line in &ledger.lines {
        write_row(
            &mut writer,
            [
                &line.date.format("%d-%b-%Y").to_string(),
                line.transaction_number.as_str(),
                &line.voucher_type.to_string(),
                line.particulars.as_str(),
                &line.debit.to_string(),
                &line.credit.to_string(),
                &line.balance_label,
            ],
        )?;
    }

    write_row(
        &mut writer,
        [
            "",
            "",
            "",
            "Total:",
            &ledger.total_debit.to_string(),
            &ledger.total_credit.to_string(),
            &ledger.closing_balance_label,
        ],
    )?;

    finish(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;

    #[test]
    fn customers_csv_has_header_and_rows() {
        let customers = vec![customer::Model {
            id: 1,
            name: "ABC Trading".into(),
            phone: Some("0300-1234567".into()),
            address: None,
            is_active: true,
            created_at: Utc::now(),
            created_by: None,
        }];
        let bytes = customers_csv(&customers).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Name,Phone,Address,Status"));
        assert_eq!(lines.next(), Some("ABC Trading,0300-1234567,,Active"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn ledger_csv_splits_opening_balance_by_side() {
        let ledger = CustomerLedger {
            customer_id: 1,
            customer_name: "ABC".into(),
            from: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2025, 8, 31).unwrap(),
            opening_balance: dec!(-500),
            opening_balance_label: "500 Cr".into(),
            lines: vec![],
            total_debit: dec!(0),
            total_credit: dec!(0),
            closing_balance: dec!(-500),
            closing_balance_label: "500 Cr".into(),
        };
        let text = String::from_utf8(customer_ledger_csv(&ledger).unwrap()).unwrap();
        assert!(text.contains("Opening Balance,0,500,500 Cr"));
        assert!(text.contains("Total:,0,0,500 Cr"));
    }
}
