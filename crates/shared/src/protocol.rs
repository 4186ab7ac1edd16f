use serde::{Deserialize, Serialize};

use crate::domain::{ExamId, QuestionId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSubmission {
    pub question_id: QuestionId,
    /// Selected option keys, sorted and comma separated (`"A,C"`).
    pub selected_option: String,
    pub time_taken_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamSubmission {
    pub user_id: UserId,
    pub answers: Vec<AnswerSubmission>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitExamResponse {
    #[serde(default)]
    pub status: Option<String>,
    pub exam_id: ExamId,
    #[serde(default)]
    pub message: Option<String>,
}

pub const UPLOAD_STATUS_SUCCESS: &str = "success";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

impl UploadResponse {
    pub fn is_success(&self) -> bool {
        self.status == UPLOAD_STATUS_SUCCESS
    }
}

/// Query string for `GET /questions/random`: `limit` once, `domains` repeated.
pub fn random_questions_query(limit: u32, domains: &[String]) -> Vec<(&'static str, String)> {
    let mut query = Vec::with_capacity(domains.len() + 1);
    query.push(("limit", limit.to_string()));
    query.extend(domains.iter().map(|domain| ("domains", domain.clone())));
    query
}
