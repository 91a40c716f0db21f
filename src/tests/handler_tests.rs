//! tests/handler_tests.rs
//! Pruebas de los endpoints `/api/broadcast/*`.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_rt::test;
    use actix_web::{http::StatusCode, test as atest, web, App};
    use serde_json::{json, Value};

    use crate::app;
    use crate::models::recipient_model::SourceData;
    use crate::services::broadcast_service::BroadcastService;
    use crate::tests::support::{
        row, sender, table, two_recipients_one_sender, PanickingMailer, RecordingMailer,
        RecordingMessenger,
    };

    macro_rules! init_app {
        ($sources:expr, $mailer:expr) => {
            atest::init_service(
                App::new()
                    .app_data(web::Data::new($sources))
                    .app_data(web::Data::new(BroadcastService::new(
                        $mailer,
                        Arc::new(RecordingMessenger::ok()),
                    )))
                    .configure(app::init_app),
            )
            .await
        };
    }

    #[test]
    async fn form_lists_counts_departments_and_defaults() {
        let sources = SourceData {
            receivers: table(
                &["name", "email", "dept"],
                vec![
                    row(&[("name", "A"), ("email", "a@x.com"), ("dept", "Sales")]),
                    row(&[("name", "B"), ("email", "b@x.com"), ("dept", "IT")]),
                ],
            ),
            senders: vec![sender("s@x.com")],
        };
        let app = init_app!(sources, Arc::new(RecordingMailer::default()));

        let req = atest::TestRequest::get()
            .uri("/api/broadcast/form")
            .to_request();
        let body: Value = atest::call_and_read_body_json(&app, req).await;

        assert_eq!(body["receivers_loaded"], 2);
        assert_eq!(body["senders_loaded"], 1);
        assert_eq!(body["methods"], json!(["Email", "WhatsApp"]));
        assert_eq!(body["departments"], json!(["IT", "Sales"]));
        assert_eq!(body["defaults"]["delay_secs"], 2.0);
        assert_eq!(body["defaults"]["subject"], "Test Email");
    }

    #[test]
    async fn form_without_dept_column_has_no_departments() {
        let app = init_app!(
            two_recipients_one_sender(),
            Arc::new(RecordingMailer::default())
        );

        let req = atest::TestRequest::get()
            .uri("/api/broadcast/form")
            .to_request();
        let body: Value = atest::call_and_read_body_json(&app, req).await;

        assert!(body["departments"].is_null());
    }

    #[test]
    async fn send_runs_and_reports_summary() {
        let mailer = Arc::new(RecordingMailer::default());
        let app = init_app!(two_recipients_one_sender(), mailer.clone());

        let req = atest::TestRequest::post()
            .uri("/api/broadcast/send")
            .set_json(json!({
                "method": "Email",
                "delay_secs": 0.0,
                "subject": "Hello",
                "body_template": "Hello {name}"
            }))
            .to_request();
        let resp = atest::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = atest::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Done! 2/2 messages sent successfully.");
        assert_eq!(body["summary"]["sent"], 2);
        assert_eq!(body["summary"]["total"], 2);
        assert_eq!(mailer.senders_used(), vec!["s@x.com", "s@x.com"]);

        let req = atest::TestRequest::get()
            .uri("/api/broadcast/status")
            .to_request();
        let status: Value = atest::call_and_read_body_json(&app, req).await;
        assert_eq!(status["status"]["state"], "done");
        assert_eq!(status["status"]["summary"]["sent"], 2);
    }

    #[test]
    async fn status_starts_idle() {
        let app = init_app!(
            two_recipients_one_sender(),
            Arc::new(RecordingMailer::default())
        );

        let req = atest::TestRequest::get()
            .uri("/api/broadcast/status")
            .to_request();
        let status: Value = atest::call_and_read_body_json(&app, req).await;
        assert_eq!(status["status"]["state"], "idle");
    }

    #[test]
    async fn email_without_senders_is_unprocessable() {
        let sources = SourceData {
            senders: Vec::new(),
            ..two_recipients_one_sender()
        };
        let mailer = Arc::new(RecordingMailer::default());
        let app = init_app!(sources, mailer.clone());

        let req = atest::TestRequest::post()
            .uri("/api/broadcast/send")
            .set_json(json!({ "method": "Email", "delay_secs": 0 }))
            .to_request();
        let resp = atest::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(mailer.sent().is_empty());
    }

    #[test]
    async fn negative_delay_is_bad_request() {
        let app = init_app!(
            two_recipients_one_sender(),
            Arc::new(RecordingMailer::default())
        );

        let req = atest::TestRequest::post()
            .uri("/api/broadcast/send")
            .set_json(json!({ "method": "Email", "delay_secs": -1.5 }))
            .to_request();
        let resp = atest::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    async fn unknown_method_is_bad_request() {
        let app = init_app!(
            two_recipients_one_sender(),
            Arc::new(RecordingMailer::default())
        );

        let req = atest::TestRequest::post()
            .uri("/api/broadcast/send")
            .set_json(json!({ "method": "Fax" }))
            .to_request();
        let resp = atest::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    async fn panicking_run_returns_500_and_resets_status() {
        let app = init_app!(two_recipients_one_sender(), Arc::new(PanickingMailer));

        let req = atest::TestRequest::post()
            .uri("/api/broadcast/send")
            .set_json(json!({ "method": "Email", "delay_secs": 0 }))
            .to_request();
        let resp = atest::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let req = atest::TestRequest::get()
            .uri("/api/broadcast/status")
            .to_request();
        let status: Value = atest::call_and_read_body_json(&app, req).await;
        assert_eq!(status["status"]["state"], "idle");
    }
}
