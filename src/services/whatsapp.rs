use serde::Serialize;
use url::Url;
use utoipa::ToSchema;

use crate::errors::ServiceError;

const WHATSAPP_SEND_URL: &str = "https://web.whatsapp.com/send";

/// A ready-to-open WhatsApp Web deep link with its prefilled message
#[derive(Debug, Serialize, ToSchema)]
pub struct WhatsAppLink {
    pub url: String,
    pub phone: Option<String>,
    pub message: String,
}

/// Builds WhatsApp Web deep links for sharing ledger summaries with a
/// customer. Pure string work, no outbound calls.
#[derive(Debug, Clone)]
pub struct WhatsAppService {
    default_country_code: String,
}

impl WhatsAppService {
    pub fn new(default_country_code: String) -> Self {
        Self {
            default_country_code,
        }
    }

    /// Normalizes a phone number for WhatsApp: strips everything but digits
    /// and prepends the default country code when missing (a leading 0 is
    /// replaced by the code).
    pub fn format_phone_number(&self, phone: &str) -> Option<String> {
        let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            return None;
        }
        let code = &self.default_country_code;
        if digits.starts_with(code.as_str()) {
            Some(digits)
        } else if let Some(rest) = digits.strip_prefix('0') {
            Some(format!("{}{}", code, rest))
        } else {
            Some(format!("{}{}", code, digits))
        }
    }

    /// Prefilled ledger-summary message for a customer
    pub fn ledger_message(
        &self,
        customer_name: &str,
        from: chrono::NaiveDate,
        to: chrono::NaiveDate,
        closing_balance_label: &str,
    ) -> String {
        format!(
            "*Customer Ledger Report*\n\
             Customer: {}\n\
             Period: {} to {}\n\
             Closing Balance: Rs. {}\n\n\
             Please find the ledger report attached.",
            customer_name,
            from.format("%d-%b-%Y"),
            to.format("%d-%b-%Y"),
            closing_balance_label
        )
    }

    /// Builds the deep link; a missing phone number still yields a share
    /// link without a recipient
    pub fn build_link(
        &self,
        phone: Option<&str>,
        message: &str,
    ) -> Result<WhatsAppLink, ServiceError> {
        let phone = phone.and_then(|p| self.format_phone_number(p));

        let mut url = Url::parse(WHATSAPP_SEND_URL)
            .map_err(|e| ServiceError::InternalError(format!("Invalid WhatsApp URL: {}", e)))?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(ref phone) = phone {
                query.append_pair("phone", phone);
            }
            query.append_pair("text", message);
        }

        Ok(WhatsAppLink {
            url: url.into(),
            phone,
            message: message.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn service() -> WhatsAppService {
        WhatsAppService::new("92".to_string())
    }

    #[test]
    fn strips_punctuation_and_prepends_country_code() {
        assert_eq!(
            service().format_phone_number("0300-1234567").as_deref(),
            Some("923001234567")
        );
        assert_eq!(
            service().format_phone_number("+92 300 1234567").as_deref(),
            Some("923001234567")
        );
        assert_eq!(
            service().format_phone_number("300 1234567").as_deref(),
            Some("923001234567")
        );
    }

    #[test]
    fn empty_phone_numbers_yield_none() {
        assert!(service().format_phone_number("").is_none());
        assert!(service().format_phone_number("n/a").is_none());
    }

    #[test]
    fn link_includes_phone_and_encoded_message() {
        let link = service()
            .build_link(Some("0300-1234567"), "Balance: Rs. 1,250 Dr")
            .unwrap();
        assert!(link.url.starts_with("https://web.whatsapp.com/send?"));
        assert!(link.url.contains("phone=923001234567"));
        assert!(link.url.contains("text="));
        // URL-encoding must not leave raw spaces behind
        assert!(!link.url.contains(' '));
    }

    #[test]
    fn link_without_phone_omits_the_recipient() {
        let link = service().build_link(None, "hello").unwrap();
        assert!(!link.url.contains("phone="));
        assert!(link.url.contains("text=hello"));
    }

    #[test]
    fn ledger_message_names_the_period() {
        let msg = service().ledger_message(
            "ABC Trading",
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 8, 31).unwrap(),
            "1250 Dr",
        );
        assert!(msg.contains("ABC Trading"));
        assert!(msg.contains("01-Jun-2025 to 31-Aug-2025"));
        assert!(msg.contains("Rs. 1250 Dr"));
    }
}
