//! app.rs
use crate::handlers::broadcast_handler;
use actix_web::web;

pub fn init_app(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api").service(
            web::scope("/broadcast")
                .route("/form", web::get().to(broadcast_handler::form_endpoint))
                .route(
                    "/send",
                    web::post().to(broadcast_handler::send_broadcast_endpoint),
                )
                .route(
                    "/status",
                    web::get().to(broadcast_handler::broadcast_status_endpoint),
                ),
        ),
    );
}
