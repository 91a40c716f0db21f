//! config/app_config.rs
//! Configuración global del hub (endpoints, rutas de archivos, SMTP, servidor).

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use super::secrets::SecretChain;

/// Configuración global, con valores por defecto
/// (resuelta desde archivo de secretos / entorno).
#[derive(Debug, Clone, Serialize)]
pub struct AppConfig {
    pub evo_base_url: String,
    pub evo_instance_name: String,
    #[serde(skip_serializing)]
    pub evo_api_key: String,
    pub receivers_path: PathBuf,
    pub senders_path: PathBuf,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub host: String,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            evo_base_url: "http://localhost:8080".to_string(),
            evo_instance_name: "test".to_string(),
            evo_api_key: String::new(),
            receivers_path: PathBuf::from("./data/emails.csv"),
            senders_path: PathBuf::from("./data/senders-emails.csv"),
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            host: "0.0.0.0".to_string(),
            port: 5022,
        }
    }
}

impl AppConfig {
    pub fn resolve(chain: &SecretChain) -> Result<Self> {
        let defaults = AppConfig::default();

        let smtp_port = match chain.get("SMTP_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("Invalid SMTP_PORT: {raw}"))?,
            None => defaults.smtp_port,
        };
        let port = match chain.get("HUB_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("Invalid HUB_PORT: {raw}"))?,
            None => defaults.port,
        };

        Ok(AppConfig {
            evo_base_url: chain.get_or("EVO_BASE_URL", &defaults.evo_base_url),
            evo_instance_name: chain.get_or("EVO_INSTANCE_NAME", &defaults.evo_instance_name),
            evo_api_key: chain.get_or("AUTHENTICATION_API_KEY", &defaults.evo_api_key),
            receivers_path: chain
                .get("RECEIVERS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.receivers_path),
            senders_path: chain
                .get("SENDERS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.senders_path),
            smtp_host: chain.get_or("SMTP_HOST", &defaults.smtp_host),
            smtp_port,
            host: chain.get_or("HUB_HOST", &defaults.host),
            port,
        })
    }
}
