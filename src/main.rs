use std::path::PathBuf;
use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use dotenv::dotenv;

use crate::config::app_config::AppConfig;
use crate::config::secrets::{SecretChain, SecretsFile};
use crate::logger::init_logger;
use crate::services::broadcast_service::BroadcastService;
use crate::services::email_service::EmailService;
use crate::services::loader_service;
use crate::services::messaging_service::EvolutionApi;

mod app;
mod config;
mod handlers;
mod logger;
mod models;
mod services;

#[cfg(test)]
mod tests;

fn resolve_config() -> anyhow::Result<AppConfig> {
    let secrets_path = std::env::var("SECRETS_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./secrets.env"));
    let chain = SecretChain::standard(SecretsFile::load(&secrets_path)?);
    AppConfig::resolve(&chain)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok(); // Cargar .env al inicio
    init_logger();

    let config = match resolve_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Configuración inválida: {:#}", e);
            std::process::exit(1);
        }
    };

    // Sin destinatarios/remitentes no hay nada que enviar: se aborta antes de levantar nada.
    let sources = match loader_service::load_sources(&config.receivers_path, &config.senders_path)
    {
        Ok(sources) => sources,
        Err(e) => {
            log::error!("Error loading CSV files: {}", e);
            std::process::exit(1);
        }
    };

    let messenger = match EvolutionApi::from_config(&config) {
        Ok(api) => api,
        Err(e) => {
            log::error!("No se pudo inicializar EvolutionApi: {:#}", e);
            std::process::exit(1);
        }
    };
    log::info!("Evolution API en {}", messenger.send_text_url());

    let broadcast_service = BroadcastService::new(
        Arc::new(EmailService::from_config(&config)),
        Arc::new(messenger),
    );
    let sources = web::Data::new(sources);
    let broadcast_service = web::Data::new(broadcast_service);

    log::info!("Levantando servidor en {}:{}", config.host, config.port);
    HttpServer::new(move || {
        App::new()
            .app_data(sources.clone())
            .app_data(broadcast_service.clone())
            .configure(app::init_app)
    })
    .workers(1)
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
