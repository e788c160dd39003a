//! SMS gateway stand-in that writes messages to the log instead of a carrier.

use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;

use datables_core::{
    notify::{format_phone, normalize_phone, SmsReceipt},
    ports::{DatablesError, SmsPort},
};

/// Fewest digits a deliverable number can have.
const MIN_DIGITS: usize = 10;

/// Accepts every message to a plausible number and logs it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSmsPort;

#[async_trait]
impl SmsPort for LogSmsPort {
    async fn send(&self, phone: &str, message: &str) -> Result<SmsReceipt, DatablesError> {
        if normalize_phone(phone).len() < MIN_DIGITS {
            warn!(phone, "rejecting message to undeliverable number");
            return Ok(SmsReceipt {
                success: false,
                message_id: String::new(),
            });
        }

        let message_id = Uuid::new_v4().to_string();
        info!(to = %format_phone(phone), %message_id, body = message, "sms sent");
        Ok(SmsReceipt {
            success: true,
            message_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn accepts_full_numbers_and_rejects_short_ones() {
        let sent = LogSmsPort.send("+1 (714) 555-7890", "Your table is ready").await;
        assert!(sent.as_ref().is_ok_and(|receipt| receipt.success && !receipt.message_id.is_empty()));

        let rejected = LogSmsPort.send("555-7890", "Your table is ready").await;
        assert!(rejected.is_ok_and(|receipt| !receipt.success));
    }
}
