use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Munshi API",
        version = "0.3.0",
        description = r#"
# Munshi Bookkeeping API

A backend for small-business bookkeeping: customers, items and stock, banks,
expense heads, projects, and a central voucher ledger with derived balances.

## Features

- **Vouchers**: the single transaction record; every balance is derived by
  replaying the voucher history
- **Ledgers**: customer ledgers, bank statements, cash statements, and the
  daily cash book with running Dr/Cr balances
- **Reports**: stock movement, project profit/loss, cash flow, and the
  capital summary dashboard
- **Exports**: CSV downloads of the register, stock, customers, and ledgers
- **Administration**: users, page locks, theming, and mon multipliers

## Authentication

Log in via `POST /auth/login` and pass the returned session token:

```
Authorization: Bearer <session-token>
```

Sessions expire after 30 minutes of inactivity.
        "#,
        contact(
            name = "Munshi Support",
            email = "support@munshi.app"
        ),
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    paths(
        crate::handlers::auth::login,
        crate::handlers::vouchers::list_vouchers,
        crate::handlers::vouchers::get_voucher,
        crate::handlers::vouchers::create_voucher,
        crate::handlers::vouchers::update_voucher,
        crate::handlers::vouchers::delete_voucher,
        crate::handlers::reports::dashboard,
        crate::handlers::reports::customer_ledger,
        crate::handlers::reports::stock_report,
    ),
    components(schemas(
        crate::errors::ErrorResponse,
        crate::handlers::auth::LoginRequest,
        crate::handlers::auth::LoginResponse,
        crate::services::vouchers::VoucherInput,
        crate::services::reports::CustomerLedger,
        crate::services::reports::LedgerLine,
        crate::services::reports::StockReport,
        crate::services::reports::CapitalSummary,
    )),
    tags(
        (name = "auth", description = "Login and session management"),
        (name = "vouchers", description = "The transaction ledger"),
        (name = "reports", description = "Ledgers, statements, and summaries"),
    )
)]
pub struct ApiDoc;

/// Swagger UI mounted next to the API
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}
