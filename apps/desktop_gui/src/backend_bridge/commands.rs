//! Backend commands queued from UI to backend worker.

use shared::{domain::ExamId, protocol::ExamSubmission};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum BackendCommand {
    LoadStats,
    StartExam {
        limit: u32,
        domains: Vec<String>,
    },
    SubmitExam {
        submission: ExamSubmission,
    },
    PollResults {
        exam_id: ExamId,
    },
    CancelPolling,
    LoadReview {
        exam_id: ExamId,
    },
    UploadQuestions {
        path: PathBuf,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::LoadStats => "load_stats",
            BackendCommand::StartExam { .. } => "start_exam",
            BackendCommand::SubmitExam { .. } => "submit_exam",
            BackendCommand::PollResults { .. } => "poll_results",
            BackendCommand::CancelPolling => "cancel_polling",
            BackendCommand::LoadReview { .. } => "load_review",
            BackendCommand::UploadQuestions { .. } => "upload_questions",
        }
    }
}
