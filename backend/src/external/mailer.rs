//! SMTP mailer for alert notifications
//!
//! Delivers consolidated alert e-mails through an SMTP server via `lettre`.
//! Credentials are resolved from the `SMTP_USERNAME` and `SMTP_PASSWORD`
//! environment variables; when unset the connection is unauthenticated.

use async_trait::async_trait;
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::error::{AppError, AppResult};

/// An outbound notification e-mail
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Delivery channel for alert notifications.
///
/// The engine attempts exactly one send per evaluation and never retries.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> AppResult<()>;
}

/// Sends notifications as multipart plain+HTML e-mails via SMTP
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Build an `SmtpMailer` from SMTP configuration.
    ///
    /// Port 465 uses implicit TLS; everything else uses STARTTLS.
    pub fn from_config(smtp_host: &str, smtp_port: u16, from: &str) -> AppResult<Self> {
        let from_mailbox: Mailbox = from
            .parse()
            .map_err(|e: lettre::address::AddressError| AppError::Configuration(e.to_string()))?;

        let relay = if smtp_port == 465 {
            AsyncSmtpTransport::<Tokio1Executor>::relay(smtp_host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(smtp_host)
        };
        let mut builder = relay
            .map_err(|e| AppError::Configuration(e.to_string()))?
            .port(smtp_port);

        if let (Ok(username), Ok(password)) =
            (std::env::var("SMTP_USERNAME"), std::env::var("SMTP_PASSWORD"))
        {
            builder = builder.credentials(Credentials::new(username, password));
        }

        Ok(Self {
            transport: builder.build(),
            from: from_mailbox,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutboundEmail) -> AppResult<()> {
        let to: Mailbox = email
            .to
            .parse()
            .map_err(|e: lettre::address::AddressError| AppError::MailError(e.to_string()))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                email.text.clone(),
                email.html.clone(),
            ))
            .map_err(|e| AppError::MailError(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::MailError(e.to_string()))?;

        tracing::info!(
            channel = "email",
            subject = %email.subject,
            to = %email.to,
            "notification delivered"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_recipient_address() {
        let mailbox: Result<Mailbox, _> = "produtor@fazenda.com.br".parse();
        assert!(mailbox.is_ok());
    }

    #[test]
    fn from_config_valid() {
        let mailer = SmtpMailer::from_config("smtp.example.com", 587, "alerts@agrosat.local");
        assert!(mailer.is_ok());
    }

    #[test]
    fn from_config_implicit_tls_port() {
        let mailer = SmtpMailer::from_config("smtp.example.com", 465, "alerts@agrosat.local");
        assert!(mailer.is_ok());
    }

    #[test]
    fn from_config_invalid_from_address() {
        let result = SmtpMailer::from_config("smtp.example.com", 587, "bad-address");
        assert!(result.is_err());
    }
}
