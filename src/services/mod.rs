//! services/mod.rs
//! Módulo que agrupa distintos "servicios" o "capas de negocio" de la app.

pub mod broadcast_service;
pub mod email_service;
pub mod loader_service;
pub mod messaging_service;
pub mod template_service;
