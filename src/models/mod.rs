//! models/mod.rs
//! Módulo raíz para modelos/estructuras compartidas.

pub mod broadcast_model;
pub mod messaging_model;
pub mod recipient_model;
