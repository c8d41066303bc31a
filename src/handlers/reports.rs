use axum::{
    extract::{Json, Path, Query, State},
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use super::common::{created_response, success_response};
use crate::auth::AuthenticatedUser;
use crate::entities::voucher::VoucherType;
use crate::errors::ServiceError;
use crate::services::export;
use crate::services::reports::NewCashAdjustment;
use crate::services::vouchers::VoucherFilter;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct DateRangeQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct RequiredRangeQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct CashStatementQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub customer_id: Option<i32>,
    pub voucher_type: Option<VoucherType>,
}

#[derive(Debug, Deserialize)]
pub struct DailyCashBookQuery {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct ProfitLossQuery {
    pub project_id: i32,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub report_type: String,
    pub id: Option<i32>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Capital summary driving the dashboard
#[utoipa::path(
    get,
    path = "/api/v1/reports/dashboard",
    responses((status = 200, description = "Capital summary")),
    tag = "reports"
)]
pub async fn dashboard(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    let summary = state.services.reports.capital_summary().await?;
    Ok(success_response(summary))
}

/// Customer ledger with running Dr/Cr balance
#[utoipa::path(
    get,
    path = "/api/v1/reports/customer-ledger/{customer_id}",
    responses(
        (status = 200, description = "Customer ledger"),
        (status = 404, description = "Customer not found", body = crate::errors::ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn customer_ledger(
    State(state): State<AppState>,
    Path(customer_id): Path<i32>,
    Query(range): Query<DateRangeQuery>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    let ledger = state
        .services
        .reports
        .customer_ledger(customer_id, range.from, range.to)
        .await?;
    Ok(success_response(ledger))
}

/// WhatsApp deep link sharing a customer's ledger summary
async fn customer_ledger_whatsapp_link(
    State(state): State<AppState>,
    Path(customer_id): Path<i32>,
    Query(range): Query<DateRangeQuery>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    let ledger = state
        .services
        .reports
        .customer_ledger(customer_id, range.from, range.to)
        .await?;
    let customer = state.services.customers.get(customer_id).await?;

    let message = state.services.whatsapp.ledger_message(
        &ledger.customer_name,
        ledger.from,
        ledger.to,
        &ledger.closing_balance_label,
    );
    let link = state
        .services
        .whatsapp
        .build_link(customer.phone.as_deref(), &message)?;
    Ok(success_response(link))
}

async fn bank_statement(
    State(state): State<AppState>,
    Path(bank_id): Path<i32>,
    Query(range): Query<RequiredRangeQuery>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    let statement = state
        .services
        .reports
        .bank_statement(bank_id, range.from, range.to)
        .await?;
    Ok(success_response(statement))
}

async fn cash_statement(
    State(state): State<AppState>,
    Query(query): Query<CashStatementQuery>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    let statement = state
        .services
        .reports
        .cash_statement(query.from, query.to, query.customer_id, query.voucher_type)
        .await?;
    Ok(success_response(statement))
}

async fn cash_flow(
    State(state): State<AppState>,
    Query(range): Query<DateRangeQuery>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    let report = state
        .services
        .reports
        .cash_flow(range.from, range.to)
        .await?;
    Ok(success_response(report))
}

/// Stock movement per item over an optional period
#[utoipa::path(
    get,
    path = "/api/v1/reports/stock",
    responses((status = 200, description = "Stock report")),
    tag = "reports"
)]
pub async fn stock_report(
    State(state): State<AppState>,
    Query(range): Query<DateRangeQuery>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    let report = state
        .services
        .reports
        .stock_report(range.from, range.to)
        .await?;
    Ok(success_response(report))
}

async fn daily_cash_book(
    State(state): State<AppState>,
    Query(query): Query<DailyCashBookQuery>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    let book = state.services.reports.daily_cash_book(query.date).await?;
    Ok(success_response(book))
}

async fn profit_loss(
    State(state): State<AppState>,
    Query(query): Query<ProfitLossQuery>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    let report = state
        .services
        .reports
        .profit_loss(query.project_id, query.from, query.to)
        .await?;
    Ok(success_response(report))
}

async fn add_cash_adjustment(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(input): Json<NewCashAdjustment>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = state
        .services
        .reports
        .add_cash_adjustment(input, &user.username)
        .await?;
    Ok(created_response(created))
}

async fn list_cash_adjustments(
    State(state): State<AppState>,
    Query(range): Query<DateRangeQuery>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    let adjustments = state
        .services
        .reports
        .list_cash_adjustments(range.from, range.to)
        .await?;
    Ok(success_response(adjustments))
}

fn csv_attachment(file_stem: &str, bytes: Vec<u8>) -> impl IntoResponse {
    let filename = format!(
        "{}_Report_{}.csv",
        file_stem,
        Utc::now().format("%Y%m%d%H%M%S")
    );
    (
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
}

/// CSV export of the voucher register, stock listing, customer directory,
/// or one customer ledger
async fn export_report(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    match query.report_type.as_str() {
        "vouchers" => {
            let filter = VoucherFilter {
                from: query.from,
                to: query.to,
                ..Default::default()
            };
            let (vouchers, _) = state.services.vouchers.list(filter, 1, 1_000_000).await?;
            let customers = state
                .services
                .customers
                .list(true)
                .await?
                .into_iter()
                .map(|c| (c.id, c.name))
                .collect();
            let projects = state
                .services
                .projects
                .list(true)
                .await?
                .into_iter()
                .map(|p| (p.id, p.name))
                .collect();
            let bytes = export::vouchers_csv(&vouchers, &customers, &projects)?;
            Ok(csv_attachment("vouchers", bytes).into_response())
        }
        "stock" => {
            let report = state.services.reports.stock_report(None, None).await?;
            let items = state.services.items.list(false).await?;
            let rows = items
                .into_iter()
                .filter(|i| i.stock_tracking_enabled)
                .map(|item| {
                    let current = report
                        .items
                        .iter()
                        .find(|m| m.item_id == item.id)
                        .map(|m| m.current_stock)
                        .unwrap_or(item.opening_stock);
                    (item, current)
                })
                .collect::<Vec<_>>();
            let bytes = export::stock_csv(&rows)?;
            Ok(csv_attachment("stock", bytes).into_response())
        }
        "customers" => {
            let customers = state.services.customers.list(false).await?;
            let bytes = export::customers_csv(&customers)?;
            Ok(csv_attachment("customers", bytes).into_response())
        }
        "customer_ledger" => {
            let customer_id = query.id.ok_or_else(|| {
                ServiceError::InvalidInput("id is required for customer_ledger exports".into())
            })?;
            let ledger = state
                .services
                .reports
                .customer_ledger(customer_id, query.from, query.to)
                .await?;
            let bytes = export::customer_ledger_csv(&ledger)?;
            Ok(csv_attachment("customerLedger", bytes).into_response())
        }
        other => Err(ServiceError::InvalidInput(format!(
            "Unknown report type '{}'",
            other
        ))),
    }
}

pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/customer-ledger/:customer_id", get(customer_ledger))
        .route(
            "/customer-ledger/:customer_id/whatsapp-link",
            get(customer_ledger_whatsapp_link),
        )
        .route("/bank-statement/:bank_id", get(bank_statement))
        .route("/cash-statement", get(cash_statement))
        .route("/cash-flow", get(cash_flow))
        .route("/stock", get(stock_report))
        .route("/daily-cash-book", get(daily_cash_book))
        .route("/profit-loss", get(profit_loss))
        .route("/cash-adjustments", post(add_cash_adjustment))
        .route("/cash-adjustments", get(list_cash_adjustments))
        .route("/export", get(export_report))
}
