//! Fixed-interval polling of exam results.

use std::{sync::Arc, time::Duration};

use shared::domain::{ExamId, ExamResult};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::ExamService;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Waits one `interval` before every fetch and returns the first completed
/// result. Failed fetches are logged and retried on the next tick; there is
/// no overall timeout.
pub async fn poll_until_completed<S>(service: &S, exam_id: ExamId, interval: Duration) -> ExamResult
where
    S: ExamService + ?Sized,
{
    let mut attempt: u64 = 0;
    loop {
        tokio::time::sleep(interval).await;
        attempt += 1;
        match service.exam_results(exam_id).await {
            Ok(result) if result.is_completed() => {
                info!(exam_id = %exam_id, attempt, score = ?result.score, "exam results ready");
                return result;
            }
            Ok(result) => {
                debug!(exam_id = %exam_id, attempt, status = ?result.status, "exam still processing");
            }
            Err(err) => {
                warn!(exam_id = %exam_id, attempt, "results poll failed: {err}");
            }
        }
    }
}

/// Background results poll. Dropping or cancelling the handle stops the poll.
pub struct ResultPoller {
    exam_id: ExamId,
    handle: JoinHandle<()>,
}

impl ResultPoller {
    /// Spawns the poll on the current tokio runtime and hands the completed
    /// result to `on_complete`.
    pub fn spawn<F>(
        service: Arc<dyn ExamService>,
        exam_id: ExamId,
        interval: Duration,
        on_complete: F,
    ) -> Self
    where
        F: FnOnce(ExamResult) + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let result = poll_until_completed(service.as_ref(), exam_id, interval).await;
            on_complete(result);
        });
        Self { exam_id, handle }
    }

    pub fn exam_id(&self) -> ExamId {
        self.exam_id
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn cancel(self) {
        if !self.handle.is_finished() {
            debug!(exam_id = %self.exam_id, "cancelling results poll");
        }
    }
}

impl Drop for ResultPoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
#[path = "tests/polling_tests.rs"]
mod tests;
