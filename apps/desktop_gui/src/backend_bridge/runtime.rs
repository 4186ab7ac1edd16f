//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread, time::Duration};

use client_core::{upload::read_upload_file, ExamService, ResultPoller};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use tracing::{debug, error, info, warn};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{classify_stats_failure, UiError, UiErrorContext, UiEvent};

/// Starts the backend worker thread with its own tokio runtime.
pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    service: Arc<dyn ExamService>,
    poll_interval: Duration,
) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                error!("failed to build backend runtime: {err}");
                send_event(
                    &ui_tx,
                    UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        format!("backend worker startup failure: failed to build runtime: {err}"),
                    )),
                );
                return;
            }
        };

        runtime.block_on(async move {
            let mut worker = BackendWorker::new(service, ui_tx, poll_interval);
            while let Ok(cmd) = cmd_rx.recv() {
                worker.handle(cmd).await;
            }
            info!("ui command queue closed; backend worker exiting");
        });
    });
}

/// Hands `event` to the UI thread. Returns `false` when the event was dropped.
pub fn send_event(ui_tx: &Sender<UiEvent>, event: UiEvent) -> bool {
    let name = event.name();
    match ui_tx.try_send(event) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            warn!(event = name, "backend->ui event queue is full; event dropped");
            false
        }
        Err(TrySendError::Disconnected(_)) => {
            warn!(event = name, "backend->ui event queue disconnected; event dropped");
            false
        }
    }
}

pub struct BackendWorker {
    service: Arc<dyn ExamService>,
    ui_tx: Sender<UiEvent>,
    poll_interval: Duration,
    poller: Option<ResultPoller>,
}

impl BackendWorker {
    pub fn new(service: Arc<dyn ExamService>, ui_tx: Sender<UiEvent>, poll_interval: Duration) -> Self {
        Self {
            service,
            ui_tx,
            poll_interval,
            poller: None,
        }
    }

    fn emit(&self, event: UiEvent) {
        send_event(&self.ui_tx, event);
    }

    fn emit_error(&self, context: UiErrorContext, err: &client_core::ClientError) {
        self.emit(UiEvent::Error(UiError::from_client_error(context, err)));
    }

    pub fn is_polling(&self) -> bool {
        self.poller
            .as_ref()
            .is_some_and(|poller| !poller.is_finished())
    }

    pub async fn handle(&mut self, cmd: BackendCommand) {
        match cmd {
            BackendCommand::LoadStats => match self.service.question_stats().await {
                Ok(stats) => self.emit(UiEvent::StatsLoaded(stats)),
                Err(err) => {
                    error!("loading question statistics failed: {err}");
                    let mut ui_err = UiError::from_client_error(UiErrorContext::LoadStats, &err);
                    if !err.is_invalid_input() {
                        ui_err = UiError::from_message(
                            UiErrorContext::LoadStats,
                            classify_stats_failure(&err.to_string()),
                        );
                    }
                    self.emit(UiEvent::Error(ui_err));
                }
            },
            BackendCommand::StartExam { limit, domains } => {
                match self.service.random_questions(limit, &domains).await {
                    Ok(questions) => self.emit(UiEvent::QuestionsLoaded(questions)),
                    Err(err) => self.emit_error(UiErrorContext::StartExam, &err),
                }
            }
            BackendCommand::SubmitExam { submission } => {
                match self.service.submit_exam(&submission).await {
                    Ok(accepted) => self.emit(UiEvent::ExamAccepted {
                        exam_id: accepted.exam_id,
                    }),
                    Err(err) => self.emit_error(UiErrorContext::SubmitExam, &err),
                }
            }
            BackendCommand::PollResults { exam_id } => {
                if self.is_polling() {
                    debug!(exam_id = %exam_id, "replacing running results poll");
                }
                let ui_tx = self.ui_tx.clone();
                // Replacing the handle aborts any poll still running for an older exam.
                self.poller = Some(ResultPoller::spawn(
                    Arc::clone(&self.service),
                    exam_id,
                    self.poll_interval,
                    move |result| {
                        send_event(&ui_tx, UiEvent::ResultsReady { exam_id, result });
                    },
                ));
            }
            BackendCommand::CancelPolling => {
                if let Some(poller) = self.poller.take() {
                    poller.cancel();
                }
            }
            BackendCommand::LoadReview { exam_id } => {
                match self.service.exam_review(exam_id).await {
                    Ok(items) => self.emit(UiEvent::ReviewLoaded { exam_id, items }),
                    Err(err) => self.emit_error(UiErrorContext::LoadReview, &err),
                }
            }
            BackendCommand::UploadQuestions { path } => {
                let payload = match read_upload_file(&path).await {
                    Ok(payload) => payload,
                    Err(err) => {
                        self.emit_error(UiErrorContext::Upload, &err);
                        return;
                    }
                };
                match self.service.upload_questions(&payload).await {
                    Ok(response) => {
                        info!(path = %path.display(), status = %response.status, "question upload finished");
                        self.emit(UiEvent::UploadFinished(response));
                    }
                    Err(err) => self.emit_error(UiErrorContext::Upload, &err),
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/runtime_tests.rs"]
mod tests;
