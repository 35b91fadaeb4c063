//! Mailer that only writes to the log. Development default.

use async_trait::async_trait;
use tracing::info;

use emenu_core::services::{MailError, Mailer};
use emenu_shared::utils::mask_email;

#[derive(Debug, Default, Clone)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str) -> Result<(), MailError> {
        info!(
            recipient = %mask_email(recipient),
            subject = %subject,
            bytes = html_body.len(),
            "Mail not sent (log transport)"
        );
        Ok(())
    }
}
