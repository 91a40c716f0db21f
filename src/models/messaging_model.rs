//! models/messaging_model.rs
//! Payload y resultado normalizado de la API de mensajería (Evolution API).

use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, Serialize)]
pub struct SendTextPayload<'a> {
    pub number: &'a str,
    pub text: &'a str,
}

/// Resultado de `send_text`: nunca es un error, los fallos van dentro.
#[derive(Debug, Clone, PartialEq)]
pub enum MessagingResult {
    /// Cuerpo JSON de la respuesta, tal cual (cualquier status HTTP).
    Response(Value),
    /// Fallo de conexión / timeout.
    RequestException { detail: String },
    /// La respuesta no era JSON.
    InvalidJson,
}

impl MessagingResult {
    pub fn is_success(&self) -> bool {
        matches!(self, MessagingResult::Response(_))
    }

    /// Etiqueta del fallo (`request_exception`, `invalid_json`).
    pub fn error_tag(&self) -> Option<&'static str> {
        match self {
            MessagingResult::Response(_) => None,
            MessagingResult::RequestException { .. } => Some("request_exception"),
            MessagingResult::InvalidJson => Some("invalid_json"),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            MessagingResult::Response(body) => body.clone(),
            MessagingResult::RequestException { detail } => {
                json!({ "error": "request_exception", "detail": detail })
            }
            MessagingResult::InvalidJson => json!({ "error": "invalid_json" }),
        }
    }
}

impl std::fmt::Display for MessagingResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_json())
    }
}
