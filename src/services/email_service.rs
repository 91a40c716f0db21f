//! services/email_service.rs
//! Envío SMTP: una conexión por mensaje, texto plano.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::{config::app_config::AppConfig, models::recipient_model::SenderCredential};

pub const SEND_TIMEOUT: Duration = Duration::from_secs(30);

#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send_mail(
        &self,
        sender: &SenderCredential,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct EmailService {
    smtp_host: String,
    smtp_port: u16,
}

impl EmailService {
    pub fn new(smtp_host: &str, smtp_port: u16) -> Self {
        Self {
            smtp_host: smtp_host.to_string(),
            smtp_port,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.smtp_host, config.smtp_port)
    }

    /// Arma el mensaje en texto plano. Falla si alguna dirección es inválida.
    pub fn build_message(
        sender: &SenderCredential,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<Message> {
        let from: Mailbox = sender
            .email
            .parse()
            .with_context(|| format!("Invalid sender address '{}'", sender.email))?;
        let to: Mailbox = recipient
            .parse()
            .with_context(|| format!("Invalid recipient address '{recipient}'"))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .context("Failed to build email message")
    }
}

#[async_trait]
impl MailSender for EmailService {
    async fn send_mail(
        &self,
        sender: &SenderCredential,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<()> {
        let message = Self::build_message(sender, recipient, subject, body)?;

        // STARTTLS sobre el puerto de submission; el transporte muere con esta llamada.
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.smtp_host)
            .with_context(|| format!("Invalid SMTP host '{}'", self.smtp_host))?
            .port(self.smtp_port)
            .credentials(Credentials::new(
                sender.email.clone(),
                sender.app_password.clone(),
            ))
            .build();

        log::info!(
            "(send_mail) {} -> {} via {}:{}",
            sender.email,
            recipient,
            self.smtp_host,
            self.smtp_port
        );

        tokio::time::timeout(SEND_TIMEOUT, mailer.send(message))
            .await
            .context("SMTP send timed out")?
            .context("SMTP send failed")?;

        Ok(())
    }
}
