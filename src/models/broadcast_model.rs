//! models/broadcast_model.rs
//! Request/Response del envío masivo y el resumen de cada corrida.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::recipient_model::{Recipient, SenderCredential};

pub const DEFAULT_DELAY_SECS: f64 = 2.0;
pub const DEFAULT_SUBJECT: &str = "Test Email";
pub const DEFAULT_EMAIL_BODY: &str = "Hello {name},\nThis is a test email from my project!";
pub const DEFAULT_WHATSAPP_BODY: &str = "Hi {name}, this is a test WhatsApp message!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SendMethod {
    #[serde(alias = "email")]
    Email,
    #[serde(alias = "whatsapp")]
    WhatsApp,
}

impl SendMethod {
    pub const ALL: [SendMethod; 2] = [SendMethod::Email, SendMethod::WhatsApp];

    pub fn default_body(self) -> &'static str {
        match self {
            SendMethod::Email => DEFAULT_EMAIL_BODY,
            SendMethod::WhatsApp => DEFAULT_WHATSAPP_BODY,
        }
    }
}

impl std::fmt::Display for SendMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SendMethod::Email => write!(f, "Email"),
            SendMethod::WhatsApp => write!(f, "WhatsApp"),
        }
    }
}

fn default_delay() -> f64 {
    DEFAULT_DELAY_SECS
}

/// Request del botón "Send ... Messages Now"
#[derive(Debug, Clone, Deserialize)]
pub struct BroadcastRequest {
    pub method: SendMethod,

    /// Segundos entre mensajes (fraccionario, puede ser 0)
    #[serde(default = "default_delay")]
    pub delay_secs: f64,

    /// Solo para Email
    pub subject: Option<String>,

    /// Plantilla con `{name}`
    pub body_template: Option<String>,

    /// Vacío = todos los departamentos
    #[serde(default)]
    pub departments: Vec<String>,
}

impl BroadcastRequest {
    pub fn new(method: SendMethod) -> Self {
        BroadcastRequest {
            method,
            delay_secs: DEFAULT_DELAY_SECS,
            subject: None,
            body_template: None,
            departments: Vec::new(),
        }
    }

    pub fn subject(&self) -> &str {
        self.subject.as_deref().unwrap_or(DEFAULT_SUBJECT)
    }

    pub fn body_template(&self) -> &str {
        self.body_template
            .as_deref()
            .unwrap_or_else(|| self.method.default_body())
    }
}

/// Un envío concreto; vive solo durante una iteración del loop.
#[derive(Debug)]
pub struct SendJob<'a> {
    pub recipient: Recipient,
    pub body: String,
    pub sender: Option<&'a SenderCredential>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SendFailure {
    pub recipient: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub method: SendMethod,
    pub total: usize,
    pub sent: usize,
    pub failures: Vec<SendFailure>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.sent, self.total)
    }
}

/// Idle -> Running -> Done
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum BroadcastState {
    Idle,
    Running { run_id: Uuid, started_at: DateTime<Utc> },
    Done { summary: RunSummary },
}

/// Respuesta del endpoint de envío
#[derive(Debug, Clone, Serialize)]
pub struct BroadcastResponse {
    pub success: bool,
    pub message: String,
    pub summary: RunSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormDefaults {
    pub delay_secs: f64,
    pub subject: &'static str,
    pub email_body: &'static str,
    pub whatsapp_body: &'static str,
}

impl Default for FormDefaults {
    fn default() -> Self {
        FormDefaults {
            delay_secs: DEFAULT_DELAY_SECS,
            subject: DEFAULT_SUBJECT,
            email_body: DEFAULT_EMAIL_BODY,
            whatsapp_body: DEFAULT_WHATSAPP_BODY,
        }
    }
}

/// Lo que el formulario necesita mostrar antes de enviar.
#[derive(Debug, Clone, Serialize)]
pub struct FormResponse {
    pub receivers_loaded: usize,
    pub senders_loaded: usize,
    pub methods: [SendMethod; 2],
    /// `None` si el CSV de destinatarios no tiene columna `dept`
    pub departments: Option<Vec<String>>,
    pub defaults: FormDefaults,
}
