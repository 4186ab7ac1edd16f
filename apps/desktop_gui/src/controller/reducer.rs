//! View state machine for the exam client.
//!
//! `start -> admin | exam -> processing -> results -> review | feedback -> results | start`
//!
//! User actions and backend events mutate [`ViewController`] and return the
//! backend commands to queue. Nothing here touches egui or the network.

use std::time::Instant;

use client_core::{AnswerSheet, ExamConfig, SelectionOutcome};
use shared::domain::{DomainStats, ExamId, ExamResult, Question, ReviewItem, UserId};
use tracing::{debug, info};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{
    ErrorPresentation, UiError, UiErrorCategory, UiErrorContext, UiEvent,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Start,
    Admin,
    Exam,
    Processing,
    Results,
    Review,
    Feedback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    Sending,
    Succeeded(String),
    Failed(String),
}

impl UploadStatus {
    pub fn is_error(&self) -> bool {
        matches!(self, UploadStatus::Failed(_))
    }

    pub fn text(&self) -> String {
        match self {
            UploadStatus::Sending => "Sending...".to_string(),
            UploadStatus::Succeeded(message) => format!("✅ {message}"),
            UploadStatus::Failed(message) => format!("Error: {message}"),
        }
    }
}

pub struct ViewController {
    view: View,
    user_id: UserId,
    stats: Option<DomainStats>,
    stats_error: Option<String>,
    config: ExamConfig,
    questions: Vec<Question>,
    current_index: usize,
    answers: AnswerSheet,
    question_shown_at: Instant,
    submitting: bool,
    exam_id: Option<ExamId>,
    results: Option<ExamResult>,
    review: Vec<ReviewItem>,
    upload_status: Option<UploadStatus>,
    alert: Option<UiError>,
    status: String,
}

impl ViewController {
    pub fn new(user_id: UserId, config: ExamConfig, now: Instant) -> Self {
        Self {
            view: View::Start,
            user_id,
            stats: None,
            stats_error: None,
            config,
            questions: Vec::new(),
            current_index: 0,
            answers: AnswerSheet::new(),
            question_shown_at: now,
            submitting: false,
            exam_id: None,
            results: None,
            review: Vec::new(),
            upload_status: None,
            alert: None,
            status: String::new(),
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn stats(&self) -> Option<&DomainStats> {
        self.stats.as_ref()
    }

    pub fn stats_error(&self) -> Option<&str> {
        self.stats_error.as_deref()
    }

    pub fn config(&self) -> &ExamConfig {
        &self.config
    }

    pub fn max_questions(&self) -> u32 {
        self.stats
            .as_ref()
            .map(|stats| self.config.max_questions(stats))
            .unwrap_or(0)
    }

    pub fn can_start(&self) -> bool {
        self.stats
            .as_ref()
            .is_some_and(|stats| self.config.can_start(stats))
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    pub fn is_last_question(&self) -> bool {
        self.current_index + 1 >= self.questions.len()
    }

    pub fn current_selection(&self) -> &[String] {
        match self.current_question() {
            Some(question) => self.answers.selected(question.id),
            None => &[],
        }
    }

    pub fn can_advance(&self) -> bool {
        !self.submitting
            && self
                .current_question()
                .is_some_and(|question| self.answers.is_ready(question))
    }

    pub fn exam_id(&self) -> Option<ExamId> {
        self.exam_id
    }

    pub fn results(&self) -> Option<&ExamResult> {
        self.results.as_ref()
    }

    pub fn review(&self) -> &[ReviewItem] {
        &self.review
    }

    pub fn upload_status(&self) -> Option<&UploadStatus> {
        self.upload_status.as_ref()
    }

    pub fn alert(&self) -> Option<&UiError> {
        self.alert.as_ref()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn status_mut(&mut self) -> &mut String {
        &mut self.status
    }

    fn transition(&mut self, next: View) {
        if self.view != next {
            info!(from = ?self.view, to = ?next, "view transition");
            self.view = next;
        }
    }

    fn raise_alert(&mut self, alert: UiError) {
        debug!(context = ?alert.context(), "raising alert: {}", alert.message());
        self.alert = Some(alert);
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// Enters `start`; statistics are reloaded every time.
    pub fn enter_start(&mut self) -> Vec<BackendCommand> {
        self.transition(View::Start);
        vec![BackendCommand::LoadStats]
    }

    pub fn toggle_domain(&mut self, domain: &str) {
        if let Some(stats) = &self.stats {
            self.config.toggle_domain(domain, stats);
        }
    }

    pub fn set_quantity(&mut self, quantity: u32) {
        if let Some(stats) = &self.stats {
            self.config.set_quantity(quantity, stats);
        }
    }

    pub fn restore_selection(&mut self, domains: &[String], quantity: u32) {
        if let Some(stats) = &self.stats {
            self.config.restore(domains, quantity, stats);
        }
    }

    pub fn start_exam(&mut self) -> Vec<BackendCommand> {
        if self.view != View::Start {
            return Vec::new();
        }
        if self.config.selected_domains().is_empty() {
            self.raise_alert(UiError::validation(
                UiErrorContext::StartExam,
                "Please select at least one domain.",
            ));
            return Vec::new();
        }
        if !self.can_start() {
            self.raise_alert(UiError::validation(
                UiErrorContext::StartExam,
                "The selected domains have no questions available.",
            ));
            return Vec::new();
        }
        vec![BackendCommand::StartExam {
            limit: self.config.quantity(),
            domains: self.config.selected_domains().to_vec(),
        }]
    }

    pub fn open_admin(&mut self) {
        self.upload_status = None;
        self.transition(View::Admin);
    }

    pub fn upload_file(&mut self, path: std::path::PathBuf) -> Vec<BackendCommand> {
        if self.view != View::Admin {
            return Vec::new();
        }
        self.upload_status = Some(UploadStatus::Sending);
        vec![BackendCommand::UploadQuestions { path }]
    }

    pub fn select_option(&mut self, key: &str, now: Instant) -> Option<SelectionOutcome> {
        if self.view != View::Exam || self.submitting {
            return None;
        }
        let question = self.questions.get(self.current_index)?;
        let elapsed = now.saturating_duration_since(self.question_shown_at);
        Some(self.answers.select(question, key, elapsed))
    }

    /// Moves to the next question or, on the last one, submits the exam once.
    pub fn next_question(&mut self, now: Instant) -> Vec<BackendCommand> {
        if self.view != View::Exam || !self.can_advance() {
            return Vec::new();
        }
        if !self.is_last_question() {
            self.current_index += 1;
            self.question_shown_at = now;
            return Vec::new();
        }
        self.submitting = true;
        let submission = self.answers.to_submission(self.user_id);
        info!(answers = submission.answers.len(), "submitting exam");
        vec![BackendCommand::SubmitExam { submission }]
    }

    /// Leaves `processing` without waiting for the result.
    pub fn cancel_processing(&mut self) -> Vec<BackendCommand> {
        if self.view != View::Processing {
            return Vec::new();
        }
        let mut cmds = vec![BackendCommand::CancelPolling];
        cmds.extend(self.enter_start());
        cmds
    }

    pub fn open_review(&mut self) -> Vec<BackendCommand> {
        match (self.view, self.exam_id) {
            (View::Results, Some(exam_id)) => vec![BackendCommand::LoadReview { exam_id }],
            _ => Vec::new(),
        }
    }

    pub fn open_feedback(&mut self) {
        if self.view == View::Results {
            self.transition(View::Feedback);
        }
    }

    pub fn back_to_results(&mut self) {
        if matches!(self.view, View::Review | View::Feedback) {
            self.transition(View::Results);
        }
    }

    pub fn apply(&mut self, event: UiEvent, now: Instant) -> Vec<BackendCommand> {
        match event {
            UiEvent::StatsLoaded(stats) => {
                self.config.reconcile(&stats);
                self.stats = Some(stats);
                self.stats_error = None;
            }
            UiEvent::QuestionsLoaded(questions) => {
                if self.view != View::Start {
                    return Vec::new();
                }
                if questions.is_empty() {
                    self.raise_alert(UiError::validation(
                        UiErrorContext::StartExam,
                        "No questions were found for those criteria.",
                    ));
                    return Vec::new();
                }
                info!(questions = questions.len(), "exam started");
                self.questions = questions;
                self.current_index = 0;
                self.answers = AnswerSheet::new();
                self.question_shown_at = now;
                self.submitting = false;
                self.exam_id = None;
                self.results = None;
                self.review.clear();
                self.transition(View::Exam);
            }
            UiEvent::ExamAccepted { exam_id } => {
                if self.view != View::Exam || !self.submitting {
                    return Vec::new();
                }
                self.submitting = false;
                self.exam_id = Some(exam_id);
                self.transition(View::Processing);
                return vec![BackendCommand::PollResults { exam_id }];
            }
            UiEvent::ResultsReady { exam_id, result } => {
                if self.view != View::Processing || self.exam_id != Some(exam_id) {
                    debug!(exam_id = %exam_id, "ignoring results for an exam that is no longer shown");
                    return Vec::new();
                }
                self.results = Some(result);
                self.transition(View::Results);
            }
            UiEvent::ReviewLoaded { exam_id, items } => {
                if self.view != View::Results || self.exam_id != Some(exam_id) {
                    return Vec::new();
                }
                self.review = items;
                self.transition(View::Review);
            }
            UiEvent::UploadFinished(response) => {
                self.upload_status = Some(if response.is_success() {
                    UploadStatus::Succeeded(response.message)
                } else {
                    UploadStatus::Failed(if response.message.is_empty() {
                        "upload was not accepted".to_string()
                    } else {
                        response.message
                    })
                });
                return vec![BackendCommand::LoadStats];
            }
            UiEvent::Error(err) => return self.apply_error(err),
        }
        Vec::new()
    }

    fn apply_error(&mut self, err: UiError) -> Vec<BackendCommand> {
        match err.context() {
            UiErrorContext::LoadStats => {
                self.stats = None;
                self.stats_error = Some(err.message().to_string());
            }
            UiErrorContext::Upload => {
                let message = if err.category() == UiErrorCategory::Validation {
                    format!("invalid file ({})", err.message())
                } else {
                    err.message().to_string()
                };
                self.upload_status = Some(UploadStatus::Failed(message));
            }
            UiErrorContext::SubmitExam => {
                self.submitting = false;
                self.raise_alert(err);
                return self.enter_start();
            }
            _ => match err.presentation() {
                ErrorPresentation::Alert => self.raise_alert(err),
                ErrorPresentation::Inline => self.status = err.message().to_string(),
            },
        }
        Vec::new()
    }
}

#[cfg(test)]
#[path = "../tests/reducer_tests.rs"]
mod tests;
