//! Stand-in mail transport that only logs the outgoing email

use crate::config::TransportConfig;
use crate::constants::MSG_SEND_OK;
use crate::error::Result;
use crate::workflow::MailTransport;
use async_trait::async_trait;
use composer_types::SendReceipt;
use log::info;
use std::time::Duration;

/// Logs every email it is handed and waits a fixed delay to mimic delivery.
/// Never delivers anything.
pub struct LoggingTransport {
    delay: Duration,
}

impl LoggingTransport {
    pub fn new(config: TransportConfig) -> Self {
        Self {
            delay: Duration::from_millis(config.send_delay_ms),
        }
    }
}

#[async_trait]
impl MailTransport for LoggingTransport {
    async fn send(&self, recipients: &[String], subject: &str, body: &str) -> Result<SendReceipt> {
        info!("====== OUTBOUND EMAIL (not delivered) ======");
        info!("TO: {}", recipients.join(", "));
        info!("SUBJECT: {}", subject);
        info!("------------------ BODY --------------------");
        info!("{}", body);
        info!("============================================");

        tokio::time::sleep(self.delay).await;

        Ok(SendReceipt {
            message: MSG_SEND_OK.to_string(),
            recipients: recipients.len(),
        })
    }
}
