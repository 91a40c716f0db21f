//! tests/mod.rs
//! Pruebas del loader, del loop de envío, del cliente HTTP y de los endpoints.

mod handler_tests;
mod support;
