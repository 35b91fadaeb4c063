//! SMTP delivery via lettre

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use emenu_core::services::{MailError, Mailer};
use emenu_shared::config::MailSettings;
use emenu_shared::utils::mask_email;

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(settings: &MailSettings) -> Result<Self, MailError> {
        let from: Mailbox = settings
            .from_address
            .parse()
            .map_err(|e: lettre::address::AddressError| {
                MailError::InvalidAddress(format!("from address: {}", e))
            })?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.smtp_host)
            .map_err(|e: lettre::transport::smtp::Error| MailError::Transport(e.to_string()))?
            .port(settings.smtp_port);
        if !settings.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    fn build_message(&self, recipient: &str, subject: &str, html_body: &str) -> Result<Message, MailError> {
        let to: Mailbox = recipient.parse().map_err(|e: lettre::address::AddressError| {
            MailError::InvalidAddress(format!("{}: {}", mask_email(recipient), e))
        })?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str) -> Result<(), MailError> {
        let message = self.build_message(recipient, subject, html_body)?;
        self.transport
            .send(message)
            .await
            .map_err(|e: lettre::transport::smtp::Error| MailError::Transport(e.to_string()))?;
        debug!("Mail sent to {}", mask_email(recipient));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emenu_shared::config::MailTransport;

    fn settings(from_address: &str) -> MailSettings {
        MailSettings {
            transport: MailTransport::Smtp,
            smtp_host: "localhost".to_string(),
            smtp_port: 2525,
            username: String::new(),
            password: String::new(),
            from_address: from_address.to_string(),
        }
    }

    #[tokio::test]
    async fn test_new_with_valid_settings() {
        assert!(SmtpMailer::new(&settings("emenu@example.com")).is_ok());
    }

    #[tokio::test]
    async fn test_invalid_from_address() {
        let result = SmtpMailer::new(&settings("not an address"));
        assert!(matches!(result, Err(MailError::InvalidAddress(_))));
    }

    #[tokio::test]
    async fn test_invalid_recipient_is_rejected_before_sending() {
        let mailer = SmtpMailer::new(&settings("emenu@example.com")).unwrap();
        let result = mailer.build_message("nobody", "Subject", "<p>Hi</p>");
        assert!(matches!(result, Err(MailError::InvalidAddress(_))));
    }
}
