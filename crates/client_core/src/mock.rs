use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicU32, Ordering},
        Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use shared::{
    domain::{
        DetailedFeedback, DomainStats, ExamId, ExamResult, ExamStatus, Question, QuestionId,
        ReviewItem,
    },
    error::ApiException,
    protocol::{ExamSubmission, SubmitExamResponse, UploadResponse, UPLOAD_STATUS_SUCCESS},
};

use crate::{ClientResult, ExamService};

const MOCK_EXAM_ID: ExamId = ExamId(123);

fn options(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(key, text)| (key.to_string(), text.to_string()))
        .collect()
}

/// In-memory exam service for running the client without a backend.
///
/// Results stay `PROCESSING` for the first `polls_until_complete` polls.
pub struct MockExamService {
    questions: Vec<Question>,
    result: ExamResult,
    review: Vec<ReviewItem>,
    latency: Duration,
    polls_until_complete: u32,
    polls: AtomicU32,
    submissions: Mutex<Vec<ExamSubmission>>,
    uploads: Mutex<Vec<serde_json::Value>>,
}

impl Default for MockExamService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockExamService {
    pub fn new() -> Self {
        let questions = vec![
            Question {
                id: QuestionId(1),
                domain: "Personas".to_string(),
                content: "Two team members disagree on an estimate. What should the project \
                          manager do first? A) Escalate B) Facilitate a discussion C) Decide alone"
                    .to_string(),
                options: options(&[
                    ("A", "Escalate to the sponsor"),
                    ("B", "Facilitate a discussion"),
                    ("C", "Decide alone"),
                ]),
                selection_limit: 1,
            },
            Question {
                id: QuestionId(2),
                domain: "Procesos".to_string(),
                content: "Which two documents are inputs to scope validation?".to_string(),
                options: options(&[
                    ("A", "Verified deliverables"),
                    ("B", "Risk register"),
                    ("C", "Requirements traceability matrix"),
                    ("D", "Issue log"),
                ]),
                selection_limit: 2,
            },
            Question {
                id: QuestionId(3),
                domain: "Entorno Empresarial".to_string(),
                content: "A new regulation affects the product. What is the best next step?"
                    .to_string(),
                options: options(&[
                    ("A", "Ignore it until the next phase"),
                    ("B", "Assess the impact with compliance"),
                ]),
                selection_limit: 1,
            },
        ];

        let result = ExamResult {
            score: Some(85.0),
            domain_weakness: Some(
                [("Procesos".to_string(), 80.0), ("Personas".to_string(), 100.0)]
                    .into_iter()
                    .collect(),
            ),
            status: ExamStatus::Completed,
            detailed_feedback: Some(DetailedFeedback {
                avg_time_per_question_sec: 45.0,
                total_time_min: 15.0,
                best_domain: "Personas (100%)".to_string(),
                worst_domain: "Procesos (80%)".to_string(),
                recommendations: vec!["Review conflict management".to_string()],
            }),
        };

        let review = vec![ReviewItem {
            content: "Two team members disagree on an estimate. What should the project manager do first?"
                .to_string(),
            options: BTreeMap::new(),
            selected_option: Some("B".to_string()),
            correct_option: "B".to_string(),
            is_correct: Some(true),
            explanation: Some("Collaborative problem solving comes before escalation.".to_string()),
            domain: Some("Personas".to_string()),
            time_taken_ms: Some(12_000),
        }];

        Self {
            questions,
            result,
            review,
            latency: Duration::ZERO,
            polls_until_complete: 1,
            polls: AtomicU32::new(0),
            submissions: Mutex::new(Vec::new()),
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn with_questions(mut self, questions: Vec<Question>) -> Self {
        self.questions = questions;
        self
    }

    pub fn with_result(mut self, result: ExamResult) -> Self {
        self.result = result;
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_polls_until_complete(mut self, polls: u32) -> Self {
        self.polls_until_complete = polls;
        self
    }

    pub fn poll_count(&self) -> u32 {
        self.polls.load(Ordering::SeqCst)
    }

    pub fn submissions(&self) -> Vec<ExamSubmission> {
        self.submissions
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn uploads(&self) -> Vec<serde_json::Value> {
        self.uploads
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn stats(&self) -> DomainStats {
        let mut counts = BTreeMap::new();
        for question in &self.questions {
            *counts.entry(question.domain.clone()).or_insert(0) += 1;
        }
        DomainStats::new(counts)
    }
}

#[async_trait]
impl ExamService for MockExamService {
    async fn question_stats(&self) -> ClientResult<DomainStats> {
        self.simulate_latency().await;
        Ok(self.stats())
    }

    async fn random_questions(
        &self,
        limit: u32,
        domains: &[String],
    ) -> ClientResult<Vec<Question>> {
        self.simulate_latency().await;
        Ok(self
            .questions
            .iter()
            .filter(|question| domains.is_empty() || domains.contains(&question.domain))
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn submit_exam(&self, submission: &ExamSubmission) -> ClientResult<SubmitExamResponse> {
        self.simulate_latency().await;
        self.polls.store(0, Ordering::SeqCst);
        if let Ok(mut submissions) = self.submissions.lock() {
            submissions.push(submission.clone());
        }
        Ok(SubmitExamResponse {
            status: Some("received".to_string()),
            exam_id: MOCK_EXAM_ID,
            message: Some("Processing results...".to_string()),
        })
    }

    async fn exam_results(&self, exam_id: ExamId) -> ClientResult<ExamResult> {
        self.simulate_latency().await;
        if exam_id != MOCK_EXAM_ID {
            return Err(ApiException::new(404, "exam not found").into());
        }
        let polls = self.polls.fetch_add(1, Ordering::SeqCst) + 1;
        if polls < self.polls_until_complete {
            return Ok(ExamResult {
                score: None,
                domain_weakness: None,
                status: ExamStatus::Processing,
                detailed_feedback: None,
            });
        }
        Ok(self.result.clone())
    }

    async fn exam_review(&self, exam_id: ExamId) -> ClientResult<Vec<ReviewItem>> {
        self.simulate_latency().await;
        if exam_id != MOCK_EXAM_ID {
            return Err(ApiException::new(400, "exam is not ready for review").into());
        }
        Ok(self.review.clone())
    }

    async fn upload_questions(&self, payload: &serde_json::Value) -> ClientResult<UploadResponse> {
        self.simulate_latency().await;
        let count = match payload {
            serde_json::Value::Array(items) => items.len(),
            _ => {
                return Err(ApiException::new(422, "expected a list of questions").into());
            }
        };
        if let Ok(mut uploads) = self.uploads.lock() {
            uploads.push(payload.clone());
        }
        Ok(UploadResponse {
            status: UPLOAD_STATUS_SUCCESS.to_string(),
            message: format!("Imported {count} questions"),
        })
    }
}

#[cfg(test)]
#[path = "tests/mock_tests.rs"]
mod tests;
