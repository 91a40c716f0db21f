//! handlers/broadcast_handler.rs
//! Formulario, disparo y estado del envío masivo.

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::{
    models::{
        broadcast_model::{
            BroadcastRequest, BroadcastResponse, FormDefaults, FormResponse, SendMethod,
        },
        recipient_model::SourceData,
    },
    services::broadcast_service::{BroadcastError, BroadcastService},
};

/// GET /api/broadcast/form
pub async fn form_endpoint(sources: web::Data<SourceData>) -> HttpResponse {
    HttpResponse::Ok().json(FormResponse {
        receivers_loaded: sources.receivers.len(),
        senders_loaded: sources.senders.len(),
        methods: SendMethod::ALL,
        departments: sources.receivers.departments(),
        defaults: FormDefaults::default(),
    })
}

/// POST /api/broadcast/send
pub async fn send_broadcast_endpoint(
    body: web::Json<BroadcastRequest>,
    sources: web::Data<SourceData>,
    broadcast_service: web::Data<BroadcastService>,
) -> HttpResponse {
    let req = body.into_inner();
    let service = broadcast_service.get_ref().clone();
    let sources = sources.into_inner();

    // En su propia task: si el cliente corta la conexión, la corrida sigue.
    let handle = tokio::spawn(async move { service.run(&sources, &req).await });

    match handle.await {
        Ok(Ok(summary)) => HttpResponse::Ok().json(BroadcastResponse {
            success: true,
            message: format!("Done! {summary} messages sent successfully."),
            summary,
        }),
        Ok(Err(e)) => {
            log::error!("Broadcast rejected: {}", e);
            let mut resp = match e {
                BroadcastError::AlreadyRunning => HttpResponse::Conflict(),
                BroadcastError::NoSenders => HttpResponse::UnprocessableEntity(),
                BroadcastError::InvalidDelay(_) => HttpResponse::BadRequest(),
            };
            resp.json(json!({
                "success": false,
                "error": e.to_string()
            }))
        }
        Err(e) => {
            log::error!("Broadcast task error: {:?}", e);
            HttpResponse::InternalServerError().json(json!({
                "success": false,
                "error": format!("Broadcast task error: {}", e)
            }))
        }
    }
}

/// GET /api/broadcast/status
pub async fn broadcast_status_endpoint(
    broadcast_service: web::Data<BroadcastService>,
) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "success": true,
        "status": broadcast_service.state()
    }))
}
