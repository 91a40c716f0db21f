//! handlers/mod.rs
//! Endpoints HTTP del formulario de envío.

pub mod broadcast_handler;
