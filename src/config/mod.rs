//! config/mod.rs
//! Configuración de la app: cadena de secretos y valores por defecto.

pub mod app_config;
pub mod secrets;
