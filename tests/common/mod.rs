use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tokio::sync::mpsc;

use munshi_api::auth::{AuthService, SessionStore};
use munshi_api::db::{self, DbConfig, DbPool};
use munshi_api::entities::voucher::VoucherType;
use munshi_api::events::{self, EventSender};
use munshi_api::services::banks::NewBank;
use munshi_api::services::customers::NewCustomer;
use munshi_api::services::expense_heads::NewExpenseHead;
use munshi_api::services::items::NewItem;
use munshi_api::services::projects::NewProject;
use munshi_api::services::vouchers::VoucherInput;
use munshi_api::services::AppServices;

/// Test harness backed by a single-connection in-memory SQLite database
pub struct TestHarness {
    pub db: Arc<DbPool>,
    pub services: AppServices,
    pub sessions: Arc<SessionStore>,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestHarness {
    pub async fn new() -> Self {
        // One connection so every query sees the same in-memory database
        let cfg = DbConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            ..Default::default()
        };
        let pool = db::establish_connection_with_config(&cfg)
            .await
            .expect("in-memory database");
        db::run_migrations(&pool).await.expect("migrations apply");

        let db = Arc::new(pool);
        let (tx, rx) = mpsc::channel(64);
        let event_task = tokio::spawn(events::process_events(rx));

        let sessions = Arc::new(SessionStore::new(Duration::from_secs(1800)));
        let auth = Arc::new(AuthService::new(db.clone(), sessions.clone()));
        let services = AppServices::new(db.clone(), EventSender::new(tx), auth, "92".to_string());

        Self {
            db,
            services,
            sessions,
            _event_task: event_task,
        }
    }

    #[allow(dead_code)]
    pub async fn customer(&self, name: &str) -> i32 {
        self.services
            .customers
            .create(
                NewCustomer {
                    name: name.to_string(),
                    phone: Some("0300-1234567".to_string()),
                    address: None,
                    is_active: true,
                },
                "tester",
            )
            .await
            .expect("customer created")
            .id
    }

    #[allow(dead_code)]
    pub async fn item(&self, name: &str, opening_stock: Decimal, default_rate: Decimal) -> i32 {
        self.services
            .items
            .create(
                NewItem {
                    name: name.to_string(),
                    unit: Some("Bag".to_string()),
                    stock_tracking_enabled: true,
                    opening_stock,
                    default_rate,
                    is_active: true,
                },
                "tester",
            )
            .await
            .expect("item created")
            .id
    }

    #[allow(dead_code)]
    pub async fn bank(&self, name: &str, opening_balance: Decimal) -> i32 {
        self.services
            .banks
            .create(
                NewBank {
                    name: name.to_string(),
                    account_number: Some("1234567890".to_string()),
                    opening_balance,
                    details: None,
                    is_active: true,
                },
                "tester",
            )
            .await
            .expect("bank created")
            .id
    }

    #[allow(dead_code)]
    pub async fn project(&self, name: &str) -> i32 {
        self.services
            .projects
            .create(NewProject {
                name: name.to_string(),
                description: None,
                start_date: date(2025, 1, 1),
                end_date: None,
                is_active: true,
            })
            .await
            .expect("project created")
            .id
    }

    #[allow(dead_code)]
    pub async fn expense_head(&self, name: &str) -> i32 {
        self.services
            .expense_heads
            .create(NewExpenseHead {
                name: name.to_string(),
                default_rate: Decimal::ZERO,
                notes: None,
                is_active: true,
            })
            .await
            .expect("expense head created")
            .id
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// A blank voucher input; tests fill in the parties and amounts they need
#[allow(dead_code)]
pub fn voucher_input(voucher_type: VoucherType, on: NaiveDate, amount: Decimal) -> VoucherInput {
    VoucherInput {
        voucher_type,
        cash_type: None,
        voucher_date: on,
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
        status: None,
    }
}
