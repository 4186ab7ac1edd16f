//! Backend-to-UI events and error modeling for the exam controller.

use client_core::ClientError;
use shared::{
    domain::{DomainStats, ExamId, ExamResult, Question, ReviewItem},
    protocol::UploadResponse,
};

pub enum UiEvent {
    StatsLoaded(DomainStats),
    QuestionsLoaded(Vec<Question>),
    ExamAccepted {
        exam_id: ExamId,
    },
    ResultsReady {
        exam_id: ExamId,
        result: ExamResult,
    },
    ReviewLoaded {
        exam_id: ExamId,
        items: Vec<ReviewItem>,
    },
    UploadFinished(UploadResponse),
    Error(UiError),
}

impl UiEvent {
    pub fn name(&self) -> &'static str {
        match self {
            UiEvent::StatsLoaded(_) => "stats_loaded",
            UiEvent::QuestionsLoaded(_) => "questions_loaded",
            UiEvent::ExamAccepted { .. } => "exam_accepted",
            UiEvent::ResultsReady { .. } => "results_ready",
            UiEvent::ReviewLoaded { .. } => "review_loaded",
            UiEvent::UploadFinished(_) => "upload_finished",
            UiEvent::Error(_) => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    LoadStats,
    StartExam,
    SubmitExam,
    LoadReview,
    Upload,
    General,
}

/// How an error reaches the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPresentation {
    /// Modal dialog that has to be dismissed.
    Alert,
    /// Status text next to the control that failed.
    Inline,
}

pub fn classify_stats_failure(message: &str) -> String {
    let lower = message.to_ascii_lowercase();
    if lower.contains("connection refused")
        || lower.contains("failed to reach")
        || lower.contains("dns")
        || lower.contains("timed out")
    {
        "Exam service unreachable; make sure the backend is running.".to_string()
    } else {
        format!("Could not load question statistics: {message}")
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_client_error(context: UiErrorContext, err: &ClientError) -> Self {
        let category = match err {
            ClientError::InvalidInput(_) => UiErrorCategory::Validation,
            ClientError::Transport(_) | ClientError::Api(_) => UiErrorCategory::Transport,
            ClientError::Decode(_) => UiErrorCategory::Unknown,
        };
        Self {
            category,
            context,
            message: err.user_message(),
        }
    }

    pub fn validation(context: UiErrorContext, message: impl Into<String>) -> Self {
        Self {
            category: UiErrorCategory::Validation,
            context,
            message: message.into(),
        }
    }

    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("malformed")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timeout")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("unavailable")
            || message_lower.contains("disconnect")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn presentation(&self) -> ErrorPresentation {
        match self.context {
            UiErrorContext::LoadStats | UiErrorContext::Upload | UiErrorContext::General => {
                ErrorPresentation::Inline
            }
            UiErrorContext::BackendStartup
            | UiErrorContext::StartExam
            | UiErrorContext::SubmitExam
            | UiErrorContext::LoadReview => ErrorPresentation::Alert,
        }
    }

    pub fn title(&self) -> &'static str {
        match self.context {
            UiErrorContext::BackendStartup => "Startup failed",
            UiErrorContext::LoadStats => "Statistics unavailable",
            UiErrorContext::StartExam => "Could not start the exam",
            UiErrorContext::SubmitExam => "Could not submit the exam",
            UiErrorContext::LoadReview => "Could not load the review",
            UiErrorContext::Upload => "Upload failed",
            UiErrorContext::General => "Error",
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Transport => "Network",
        UiErrorCategory::Validation => "Input",
        UiErrorCategory::Unknown => "Unexpected",
    }
}
