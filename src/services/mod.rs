pub mod banks;
pub mod customers;
pub mod expense_heads;
pub mod export;
pub mod items;
pub mod mon_multipliers;
pub mod page_locks;
pub mod projects;
pub mod reports;
pub mod themes;
pub mod users;
pub mod vouchers;
pub mod whatsapp;

use std::sync::Arc;

use crate::auth::AuthService;
use crate::db::DbPool;
use crate::events::EventSender;

/// Aggregate of the application services used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub customers: Arc<customers::CustomerService>,
    pub items: Arc<items::ItemService>,
    pub banks: Arc<banks::BankService>,
    pub projects: Arc<projects::ProjectService>,
    pub expense_heads: Arc<expense_heads::ExpenseHeadService>,
    pub vouchers: Arc<vouchers::VoucherService>,
    pub reports: Arc<reports::ReportService>,
    pub users: Arc<users::UserService>,
    pub page_locks: Arc<page_locks::PageLockService>,
    pub themes: Arc<themes::ThemeService>,
    pub mon_multipliers: Arc<mon_multipliers::MonMultiplierService>,
    pub whatsapp: Arc<whatsapp::WhatsAppService>,
    pub auth: Arc<AuthService>,
}

impl AppServices {
    pub fn new(
        db: Arc<DbPool>,
        event_sender: EventSender,
        auth: Arc<AuthService>,
        whatsapp_country_code: String,
    ) -> Self {
        Self {
            customers: Arc::new(customers::CustomerService::new(
                db.clone(),
                event_sender.clone(),
            )),
            items: Arc::new(items::ItemService::new(db.clone(), event_sender.clone())),
            banks: Arc::new(banks::BankService::new(db.clone(), event_sender.clone())),
            projects: Arc::new(projects::ProjectService::new(
                db.clone(),
                event_sender.clone(),
            )),
            expense_heads: Arc::new(expense_heads::ExpenseHeadService::new(
                db.clone(),
                event_sender.clone(),
            )),
            vouchers: Arc::new(vouchers::VoucherService::new(
                db.clone(),
                event_sender.clone(),
            )),
            reports: Arc::new(reports::ReportService::new(
                db.clone(),
                event_sender.clone(),
            )),
            users: Arc::new(users::UserService::new(db.clone())),
            page_locks: Arc::new(page_locks::PageLockService::new(db.clone())),
            themes: Arc::new(themes::ThemeService::new(db.clone())),
            mon_multipliers: Arc::new(mon_multipliers::MonMultiplierService::new(db)),
            whatsapp: Arc::new(whatsapp::WhatsAppService::new(whatsapp_country_code)),
            auth,
        }
    }
}
