use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{DomainStats, ExamId, ExamResult, Question, ReviewItem},
    error::ApiException,
    protocol::{random_questions_query, ExamSubmission, SubmitExamResponse, UploadResponse},
};
use tracing::{debug, info};
use url::Url;

use crate::{ClientError, ClientResult, ExamService};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Parses the service base URL so that endpoint paths join below it.
///
/// `http://host/api` and `http://host/api/` both resolve `questions/stats`
/// to `http://host/api/questions/stats`.
pub fn normalize_base_url(raw: &str) -> ClientResult<Url> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ClientError::invalid_input("exam service url is empty"));
    }
    let url = Url::parse(&format!("{trimmed}/"))
        .map_err(|err| ClientError::invalid_input(format!("invalid exam service url '{raw}': {err}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ClientError::invalid_input(format!(
            "unsupported exam service url scheme '{other}'"
        ))),
    }
}

#[derive(Debug, Clone)]
pub struct HttpExamService {
    http: Client,
    base_url: Url,
}

impl HttpExamService {
    pub fn new(base_url: &str) -> ClientResult<Self> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Self::with_client(http, base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> ClientResult<Self> {
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::invalid_input(format!("invalid endpoint path '{path}': {err}")))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiException::from_body(status.as_u16(), &body).into());
        }
        serde_json::from_str(&body).map_err(|err| ClientError::Decode(err.to_string()))
    }
}

#[async_trait]
impl ExamService for HttpExamService {
    async fn question_stats(&self) -> ClientResult<DomainStats> {
        let response = self.http.get(self.endpoint("questions/stats")?).send().await?;
        Self::decode(response).await
    }

    async fn random_questions(
        &self,
        limit: u32,
        domains: &[String],
    ) -> ClientResult<Vec<Question>> {
        let response = self
            .http
            .get(self.endpoint("questions/random")?)
            .query(&random_questions_query(limit, domains))
            .send()
            .await?;
        let questions: Vec<Question> = Self::decode(response).await?;
        debug!(requested = limit, received = questions.len(), "fetched random questions");
        Ok(questions)
    }

    async fn submit_exam(&self, submission: &ExamSubmission) -> ClientResult<SubmitExamResponse> {
        let response = self
            .http
            .post(self.endpoint("exam/submit")?)
            .json(submission)
            .send()
            .await?;
        let accepted: SubmitExamResponse = Self::decode(response).await?;
        info!(
            exam_id = %accepted.exam_id,
            answers = submission.answers.len(),
            "exam submitted"
        );
        Ok(accepted)
    }

    async fn exam_results(&self, exam_id: ExamId) -> ClientResult<ExamResult> {
        let response = self
            .http
            .get(self.endpoint(&format!("exam/{exam_id}/results"))?)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn exam_review(&self, exam_id: ExamId) -> ClientResult<Vec<ReviewItem>> {
        let response = self
            .http
            .get(self.endpoint(&format!("exam/{exam_id}/review"))?)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn upload_questions(&self, payload: &serde_json::Value) -> ClientResult<UploadResponse> {
        let response = self
            .http
            .post(self.endpoint("questions/upload")?)
            .json(payload)
            .send()
            .await?;
        Self::decode(response).await
    }
}

#[cfg(test)]
#[path = "tests/http_tests.rs"]
mod tests;
