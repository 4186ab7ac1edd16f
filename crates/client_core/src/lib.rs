//! Client core for the exam practice service: the service port, its HTTP and
//! in-memory adapters, exam configuration and answer bookkeeping, and the
//! results poller.

use async_trait::async_trait;
use shared::{
    domain::{DomainStats, ExamId, ExamResult, Question, ReviewItem},
    protocol::{ExamSubmission, SubmitExamResponse, UploadResponse},
};

pub mod error;
pub mod exam;
mod http;
mod mock;
pub mod polling;
pub mod settings;
pub mod upload;

pub use error::{ClientError, ClientResult};
pub use exam::{AnswerRecord, AnswerSheet, ExamConfig, SelectionOutcome, DEFAULT_QUANTITY};
pub use http::{normalize_base_url, HttpExamService, DEFAULT_API_URL};
pub use mock::MockExamService;
pub use polling::{poll_until_completed, ResultPoller, DEFAULT_POLL_INTERVAL};
pub use settings::{build_service, load_settings, ClientSettings};

/// Operations offered by the remote exam service.
#[async_trait]
pub trait ExamService: Send + Sync {
    async fn question_stats(&self) -> ClientResult<DomainStats>;

    /// Randomized question set of at most `limit` questions drawn from `domains`.
    async fn random_questions(&self, limit: u32, domains: &[String])
        -> ClientResult<Vec<Question>>;

    async fn submit_exam(&self, submission: &ExamSubmission) -> ClientResult<SubmitExamResponse>;

    async fn exam_results(&self, exam_id: ExamId) -> ClientResult<ExamResult>;

    async fn exam_review(&self, exam_id: ExamId) -> ClientResult<Vec<ReviewItem>>;

    async fn upload_questions(&self, payload: &serde_json::Value) -> ClientResult<UploadResponse>;
}
