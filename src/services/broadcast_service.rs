//! services/broadcast_service.rs
//! Loop secuencial de envío: un destinatario a la vez, con pausa fija.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    models::{
        broadcast_model::{
            BroadcastRequest, BroadcastState, RunSummary, SendFailure, SendJob, SendMethod,
        },
        recipient_model::{Recipient, Row, SenderCredential, SourceData},
    },
    services::{email_service::MailSender, messaging_service::TextMessenger, template_service},
};

#[derive(Debug, Error, PartialEq)]
pub enum BroadcastError {
    #[error("a broadcast is already running")]
    AlreadyRunning,

    #[error("no sender credentials loaded, email mode needs at least one")]
    NoSenders,

    #[error("invalid delay {0}, must be a finite, non-negative number of seconds in range")]
    InvalidDelay(f64),
}

/// Round-robin sobre los remitentes: el i-ésimo envío usa `i mod K`.
#[derive(Debug)]
pub struct SenderRotation<'a> {
    senders: &'a [SenderCredential],
    next: usize,
}

impl<'a> SenderRotation<'a> {
    pub fn new(senders: &'a [SenderCredential]) -> Self {
        Self { senders, next: 0 }
    }
}

impl<'a> Iterator for SenderRotation<'a> {
    type Item = &'a SenderCredential;

    fn next(&mut self) -> Option<Self::Item> {
        if self.senders.is_empty() {
            return None;
        }
        let sender = &self.senders[self.next % self.senders.len()];
        self.next += 1;
        Some(sender)
    }
}

#[derive(Clone)]
pub struct BroadcastService {
    mailer: Arc<dyn MailSender>,
    messenger: Arc<dyn TextMessenger>,
    state: Arc<Mutex<BroadcastState>>,
}

impl BroadcastService {
    pub fn new(mailer: Arc<dyn MailSender>, messenger: Arc<dyn TextMessenger>) -> Self {
        Self {
            mailer,
            messenger,
            state: Arc::new(Mutex::new(BroadcastState::Idle)),
        }
    }

    pub fn state(&self) -> BroadcastState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Corre el envío completo y devuelve el resumen.
    ///
    /// Solo las precondiciones fallan la corrida; los errores por
    /// destinatario quedan en `RunSummary::failures`.
    pub async fn run(
        &self,
        sources: &SourceData,
        req: &BroadcastRequest,
    ) -> Result<RunSummary, BroadcastError> {
        let delay = Duration::try_from_secs_f64(req.delay_secs)
            .map_err(|_| BroadcastError::InvalidDelay(req.delay_secs))?;
        if req.method == SendMethod::Email && sources.senders.is_empty() {
            return Err(BroadcastError::NoSenders);
        }

        let run_id = Uuid::new_v4();
        self.begin(run_id)?;
        let guard = RunGuard {
            state: &self.state,
            run_id,
            armed: true,
        };

        let summary = self.broadcast(run_id, sources, req, delay).await;

        guard.finish(summary.clone());
        Ok(summary)
    }

    fn begin(&self, run_id: Uuid) -> Result<(), BroadcastError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if matches!(*state, BroadcastState::Running { .. }) {
            return Err(BroadcastError::AlreadyRunning);
        }
        *state = BroadcastState::Running {
            run_id,
            started_at: Utc::now(),
        };
        Ok(())
    }

    async fn broadcast(
        &self,
        run_id: Uuid,
        sources: &SourceData,
        req: &BroadcastRequest,
        delay: Duration,
    ) -> RunSummary {
        let started_at = Utc::now();
        let active = sources.receivers.select(&req.departments);
        let total = active.len();
        let mut rotation = SenderRotation::new(&sources.senders);
        let mut sent = 0;
        let mut failures = Vec::new();

        log::info!(
            "(broadcast) run_id={} method={} recipients={} delay={}s",
            run_id,
            req.method,
            total,
            req.delay_secs
        );

        for row in active {
            let job = prepare_job(row, req, &mut rotation);
            match self.dispatch(&job, req).await {
                Ok(()) => sent += 1,
                Err(e) => {
                    let error = format!("{e:#}");
                    log::error!(
                        "(broadcast) Failed for {}: {}",
                        job.recipient.label(),
                        error
                    );
                    failures.push(SendFailure {
                        recipient: job.recipient.label().to_string(),
                        error,
                    });
                }
            }
            tokio::time::sleep(delay).await;
        }

        log::info!(
            "(broadcast) run_id={} Done! {}/{} messages sent successfully.",
            run_id,
            sent,
            total
        );

        RunSummary {
            run_id,
            method: req.method,
            total,
            sent,
            failures,
            started_at,
            finished_at: Utc::now(),
        }
    }

    async fn dispatch(&self, job: &SendJob<'_>, req: &BroadcastRequest) -> Result<()> {
        match req.method {
            SendMethod::Email => {
                let sender = job
                    .sender
                    .ok_or_else(|| anyhow!("no sender credential available"))?;
                let to = job
                    .recipient
                    .contact
                    .as_deref()
                    .ok_or_else(|| anyhow!("missing 'email'"))?;
                self.mailer
                    .send_mail(sender, to, req.subject(), &job.body)
                    .await
            }
            SendMethod::WhatsApp => {
                let number = job
                    .recipient
                    .contact
                    .as_deref()
                    .ok_or_else(|| anyhow!("missing 'number'"))?;
                let result = self.messenger.send_text(number, &job.body).await;
                if result.is_success() {
                    Ok(())
                } else {
                    Err(anyhow!("{}", result))
                }
            }
        }
    }
}

/// Devuelve el estado a `Idle` si la corrida no llega a `Done`
/// (panic en un sender o future abandonado).
struct RunGuard<'a> {
    state: &'a Mutex<BroadcastState>,
    run_id: Uuid,
    armed: bool,
}

impl RunGuard<'_> {
    fn finish(mut self, summary: RunSummary) {
        self.armed = false;
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) =
            BroadcastState::Done { summary };
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            log::error!(
                "(broadcast) run_id={} interrumpida antes de terminar, estado -> idle",
                self.run_id
            );
            *self.state.lock().unwrap_or_else(PoisonError::into_inner) = BroadcastState::Idle;
        }
    }
}

fn prepare_job<'a>(
    row: &Row,
    req: &BroadcastRequest,
    rotation: &mut SenderRotation<'a>,
) -> SendJob<'a> {
    let recipient = Recipient::from_row(row, req.method);
    let body = template_service::render(req.body_template(), recipient.name.as_deref());
    let sender = match req.method {
        SendMethod::Email => rotation.next(),
        SendMethod::WhatsApp => None,
    };
    SendJob {
        recipient,
        body,
        sender,
    }
}
