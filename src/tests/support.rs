//! tests/support.rs
//! Fakes de MailSender / TextMessenger y helpers de tablas.

use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::models::{
    messaging_model::MessagingResult,
    recipient_model::{RecipientTable, Row, SenderCredential, SourceData},
};
use crate::services::{email_service::MailSender, messaging_service::TextMessenger};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// Registra cada envío; falla para las direcciones en `fail_for`.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<SentMail>>,
    pub fail_for: Vec<String>,
}

impl RecordingMailer {
    pub fn failing_for(addresses: &[&str]) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_for: addresses.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn senders_used(&self) -> Vec<String> {
        self.sent().into_iter().map(|m| m.sender).collect()
    }
}

#[async_trait]
impl MailSender for RecordingMailer {
    async fn send_mail(
        &self,
        sender: &SenderCredential,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<()> {
        self.sent.lock().unwrap().push(SentMail {
            sender: sender.email.clone(),
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        if self.fail_for.iter().any(|a| a == recipient) {
            bail!("535 5.7.8 Username and Password not accepted");
        }
        Ok(())
    }
}

/// Simula un bug en el transporte: hace panic en cada envío.
pub struct PanickingMailer;

#[async_trait]
impl MailSender for PanickingMailer {
    async fn send_mail(
        &self,
        _sender: &SenderCredential,
        recipient: &str,
        _subject: &str,
        _body: &str,
    ) -> Result<()> {
        panic!("transport blew up sending to {recipient}");
    }
}

/// Devuelve siempre el mismo resultado y registra (número, texto).
pub struct RecordingMessenger {
    pub sent: Mutex<Vec<(String, String)>>,
    pub reply: MessagingResult,
}

impl RecordingMessenger {
    pub fn replying(reply: MessagingResult) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            reply,
        }
    }

    pub fn ok() -> Self {
        Self::replying(MessagingResult::Response(
            serde_json::json!({ "status": "PENDING" }),
        ))
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextMessenger for RecordingMessenger {
    async fn send_text(&self, number: &str, text: &str) -> MessagingResult {
        self.sent
            .lock()
            .unwrap()
            .push((number.to_string(), text.to_string()));
        self.reply.clone()
    }
}

pub fn row(pairs: &[(&str, &str)]) -> Row {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn table(headers: &[&str], rows: Vec<Row>) -> RecipientTable {
    RecipientTable {
        headers: headers.iter().map(|h| h.to_string()).collect(),
        rows,
    }
}

pub fn sender(email: &str) -> SenderCredential {
    SenderCredential {
        email: email.to_string(),
        app_password: "p".to_string(),
    }
}

/// Los dos destinatarios y el remitente del escenario básico.
pub fn two_recipients_one_sender() -> SourceData {
    SourceData {
        receivers: table(
            &["name", "email"],
            vec![
                row(&[("name", "A"), ("email", "a@x.com")]),
                row(&[("name", "B"), ("email", "b@x.com")]),
            ],
        ),
        senders: vec![sender("s@x.com")],
    }
}
