//! services/messaging_service.rs
//! Cliente HTTP para la API de mensajería (Evolution API, WhatsApp).

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;

use crate::{
    config::app_config::AppConfig,
    models::messaging_model::{MessagingResult, SendTextPayload},
};

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Envía un texto a un número. Nunca falla: los errores van en el resultado.
#[async_trait]
pub trait TextMessenger: Send + Sync {
    async fn send_text(&self, number: &str, text: &str) -> MessagingResult;
}

#[derive(Clone)]
pub struct EvolutionApi {
    base_url: String,
    instance_name: String,
    api_key: String,
    http_client: Client,
}

impl std::fmt::Debug for EvolutionApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvolutionApi")
            .field("base_url", &self.base_url)
            .field("instance_name", &self.instance_name)
            .finish_non_exhaustive()
    }
}

impl EvolutionApi {
    pub fn new(base_url: &str, instance_name: &str, api_key: &str) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            instance_name: instance_name.to_string(),
            api_key: api_key.to_string(),
            http_client,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            &config.evo_base_url,
            &config.evo_instance_name,
            &config.evo_api_key,
        )
    }

    pub fn send_text_url(&self) -> String {
        format!(
            "{}/message/sendText/{}",
            self.base_url, self.instance_name
        )
    }
}

#[async_trait]
impl TextMessenger for EvolutionApi {
    async fn send_text(&self, number: &str, text: &str) -> MessagingResult {
        let payload = SendTextPayload {
            number: number.trim(),
            text,
        };

        let response = self
            .http_client
            .post(self.send_text_url())
            .header("apikey", &self.api_key)
            .json(&payload)
            .send()
            .await;

        let result = match response {
            Ok(resp) => match resp.text().await {
                Ok(body) => match serde_json::from_str::<serde_json::Value>(&body) {
                    Ok(json) => MessagingResult::Response(json),
                    Err(_) => MessagingResult::InvalidJson,
                },
                Err(e) => MessagingResult::RequestException {
                    detail: e.to_string(),
                },
            },
            Err(e) => MessagingResult::RequestException {
                detail: e.to_string(),
            },
        };

        log::info!("(send_text) API Response: {}", result);
        if let Some(tag) = result.error_tag() {
            log::warn!("(send_text) Envío a {} falló: {}", number.trim(), tag);
        }
        result
    }
}
