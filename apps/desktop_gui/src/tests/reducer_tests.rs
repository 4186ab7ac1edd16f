use std::{
    collections::BTreeMap,
    path::PathBuf,
    time::{Duration, Instant},
};

use client_core::{ClientError, ExamConfig, SelectionOutcome};
use shared::{
    domain::{
        DomainStats, ExamId, ExamResult, ExamStatus, Question, QuestionId, ReviewItem, UserId,
    },
    error::ApiException,
    protocol::UploadResponse,
};

use super::{UploadStatus, View, ViewController};
use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

fn stats(pairs: &[(&str, u32)]) -> DomainStats {
    DomainStats::new(
        pairs
            .iter()
            .map(|(domain, count)| (domain.to_string(), *count))
            .collect(),
    )
}

fn question(id: i64, domain: &str, limit: u32) -> Question {
    Question {
        id: QuestionId(id),
        domain: domain.to_string(),
        content: format!("Question {id}"),
        options: ["A", "B", "C", "D"]
            .iter()
            .map(|key| (key.to_string(), format!("Option {key}")))
            .collect::<BTreeMap<_, _>>(),
        selection_limit: limit,
    }
}

fn completed(score: f64) -> ExamResult {
    ExamResult {
        score: Some(score),
        domain_weakness: None,
        status: ExamStatus::Completed,
        detailed_feedback: None,
    }
}

fn controller_with_stats(now: Instant) -> ViewController {
    let mut controller = ViewController::new(UserId(1), ExamConfig::new(), now);
    assert_eq!(controller.enter_start(), vec![BackendCommand::LoadStats]);
    controller.apply(
        UiEvent::StatsLoaded(stats(&[("Personas", 3), ("Procesos", 4), ("Empty", 0)])),
        now,
    );
    controller
}

fn controller_in_exam(questions: Vec<Question>, now: Instant) -> ViewController {
    let mut controller = controller_with_stats(now);
    controller.toggle_domain("Personas");
    assert!(!controller.start_exam().is_empty());
    controller.apply(UiEvent::QuestionsLoaded(questions), now);
    assert_eq!(controller.view(), View::Exam);
    controller
}

fn controller_processing(now: Instant) -> ViewController {
    let mut controller = controller_in_exam(vec![question(1, "Personas", 1)], now);
    controller.select_option("A", now);
    let cmds = controller.next_question(now);
    assert!(matches!(cmds.as_slice(), [BackendCommand::SubmitExam { .. }]));
    let cmds = controller.apply(UiEvent::ExamAccepted { exam_id: ExamId(7) }, now);
    assert_eq!(cmds, vec![BackendCommand::PollResults { exam_id: ExamId(7) }]);
    controller
}

#[test]
fn entering_start_reloads_stats() {
    let now = Instant::now();
    let mut controller = controller_processing(now);
    let cmds = controller.cancel_processing();
    assert_eq!(
        cmds,
        vec![BackendCommand::CancelPolling, BackendCommand::LoadStats]
    );
    assert_eq!(controller.view(), View::Start);
}

#[test]
fn starting_without_domains_raises_alert_and_stays() {
    let now = Instant::now();
    let mut controller = controller_with_stats(now);

    assert!(controller.start_exam().is_empty());
    assert_eq!(controller.view(), View::Start);
    let alert = controller.alert().expect("alert raised");
    assert!(alert.message().contains("at least one domain"));

    controller.dismiss_alert();
    assert!(controller.alert().is_none());
}

#[test]
fn domains_without_questions_cannot_be_selected() {
    let now = Instant::now();
    let mut controller = controller_with_stats(now);
    controller.toggle_domain("Empty");
    assert!(controller.config().selected_domains().is_empty());
    assert_eq!(controller.config().quantity(), 0);
}

#[test]
fn quantity_tracks_selected_domains() {
    let now = Instant::now();
    let mut controller = controller_with_stats(now);

    controller.toggle_domain("Personas");
    assert_eq!(controller.max_questions(), 3);
    assert_eq!(controller.config().quantity(), 3);

    controller.toggle_domain("Procesos");
    assert_eq!(controller.max_questions(), 7);
    controller.set_quantity(6);
    assert_eq!(controller.config().quantity(), 6);

    controller.toggle_domain("Procesos");
    assert_eq!(controller.config().quantity(), 3);

    controller.toggle_domain("Personas");
    assert_eq!(controller.config().quantity(), 0);
    assert!(!controller.can_start());
}

#[test]
fn start_exam_requests_questions_for_selection() {
    let now = Instant::now();
    let mut controller = controller_with_stats(now);
    controller.toggle_domain("Procesos");
    controller.toggle_domain("Personas");
    controller.set_quantity(2);

    assert_eq!(
        controller.start_exam(),
        vec![BackendCommand::StartExam {
            limit: 2,
            domains: vec!["Procesos".to_string(), "Personas".to_string()],
        }]
    );
}

#[test]
fn empty_question_set_keeps_start_view() {
    let now = Instant::now();
    let mut controller = controller_with_stats(now);
    controller.toggle_domain("Personas");
    controller.start_exam();

    controller.apply(UiEvent::QuestionsLoaded(Vec::new()), now);
    assert_eq!(controller.view(), View::Start);
    assert!(controller.alert().is_some());
}

#[test]
fn single_choice_replaces_selection_and_enables_next() {
    let now = Instant::now();
    let mut controller = controller_in_exam(
        vec![question(1, "Personas", 1), question(2, "Personas", 1)],
        now,
    );

    assert!(!controller.can_advance());
    assert_eq!(controller.select_option("A", now), Some(SelectionOutcome::Replaced));
    assert_eq!(controller.select_option("C", now), Some(SelectionOutcome::Replaced));
    assert_eq!(controller.current_selection(), ["C".to_string()]);
    assert!(controller.can_advance());

    assert!(controller.next_question(now).is_empty());
    assert_eq!(controller.current_index(), 1);
    assert!(!controller.can_advance());
}

#[test]
fn multi_choice_requires_exact_count() {
    let now = Instant::now();
    let mut controller = controller_in_exam(vec![question(1, "Personas", 2)], now);

    controller.select_option("A", now);
    assert!(!controller.can_advance());
    assert!(controller.next_question(now).is_empty());

    controller.select_option("C", now);
    assert!(controller.can_advance());
    assert_eq!(
        controller.select_option("D", now),
        Some(SelectionOutcome::LimitReached)
    );

    assert_eq!(controller.select_option("A", now), Some(SelectionOutcome::Removed));
    assert!(!controller.can_advance());
}

#[test]
fn last_question_submits_once_with_timings() {
    let start = Instant::now();
    let mut controller = controller_in_exam(
        vec![question(1, "Personas", 1), question(2, "Personas", 2)],
        start,
    );

    controller.select_option("B", start + Duration::from_millis(1_500));
    controller.next_question(start + Duration::from_millis(2_000));
    controller.select_option("D", start + Duration::from_millis(2_500));
    controller.select_option("A", start + Duration::from_millis(3_000));

    let cmds = controller.next_question(start + Duration::from_millis(3_100));
    let submission = match cmds.as_slice() {
        [BackendCommand::SubmitExam { submission }] => submission.clone(),
        other => panic!("expected one submit command, got {other:?}"),
    };
    assert_eq!(submission.user_id, UserId(1));
    assert_eq!(submission.answers.len(), 2);
    assert_eq!(submission.answers[0].selected_option, "B");
    assert_eq!(submission.answers[0].time_taken_ms, 1_500);
    assert_eq!(submission.answers[1].selected_option, "A,D");
    assert_eq!(submission.answers[1].time_taken_ms, 1_000);

    assert!(controller.next_question(start + Duration::from_millis(3_200)).is_empty());
    assert!(controller.select_option("B", start).is_none());
}

#[test]
fn submit_failure_alerts_and_returns_to_start() {
    let now = Instant::now();
    let mut controller = controller_in_exam(vec![question(1, "Personas", 1)], now);
    controller.select_option("A", now);
    controller.next_question(now);

    let err = ClientError::from(ApiException::new(500, "database unavailable"));
    let cmds = controller.apply(
        UiEvent::Error(UiError::from_client_error(UiErrorContext::SubmitExam, &err)),
        now,
    );
    assert_eq!(cmds, vec![BackendCommand::LoadStats]);
    assert_eq!(controller.view(), View::Start);
    assert!(controller
        .alert()
        .is_some_and(|alert| alert.message().contains("database unavailable")));
}

#[test]
fn results_move_processing_to_results() {
    let now = Instant::now();
    let mut controller = controller_processing(now);
    assert_eq!(controller.view(), View::Processing);
    assert_eq!(controller.exam_id(), Some(ExamId(7)));

    controller.apply(
        UiEvent::ResultsReady {
            exam_id: ExamId(7),
            result: completed(84.6),
        },
        now,
    );
    assert_eq!(controller.view(), View::Results);
    let result = controller.results().expect("results stored");
    assert_eq!(result.score_percent(), 85);
    assert!(result.is_passing());
}

#[test]
fn stale_results_are_ignored() {
    let now = Instant::now();
    let mut controller = controller_processing(now);

    controller.apply(
        UiEvent::ResultsReady {
            exam_id: ExamId(99),
            result: completed(40.0),
        },
        now,
    );
    assert_eq!(controller.view(), View::Processing);

    controller.cancel_processing();
    controller.apply(
        UiEvent::ResultsReady {
            exam_id: ExamId(7),
            result: completed(40.0),
        },
        now,
    );
    assert_eq!(controller.view(), View::Start);
    assert!(controller.results().is_none());
}

#[test]
fn review_and_feedback_return_to_results() {
    let now = Instant::now();
    let mut controller = controller_processing(now);
    controller.apply(
        UiEvent::ResultsReady {
            exam_id: ExamId(7),
            result: completed(60.0),
        },
        now,
    );

    assert_eq!(
        controller.open_review(),
        vec![BackendCommand::LoadReview { exam_id: ExamId(7) }]
    );
    assert_eq!(controller.view(), View::Results);

    controller.apply(
        UiEvent::ReviewLoaded {
            exam_id: ExamId(7),
            items: vec![ReviewItem {
                content: "Question 1".to_string(),
                options: BTreeMap::new(),
                selected_option: None,
                correct_option: "A".to_string(),
                is_correct: Some(false),
                explanation: None,
                domain: None,
                time_taken_ms: None,
            }],
        },
        now,
    );
    assert_eq!(controller.view(), View::Review);
    assert_eq!(controller.review().len(), 1);
    controller.back_to_results();
    assert_eq!(controller.view(), View::Results);

    controller.open_feedback();
    assert_eq!(controller.view(), View::Feedback);
    controller.back_to_results();
    assert_eq!(controller.view(), View::Results);

    assert_eq!(controller.enter_start(), vec![BackendCommand::LoadStats]);
    assert_eq!(controller.view(), View::Start);
}

#[test]
fn review_failure_raises_alert_and_keeps_results() {
    let now = Instant::now();
    let mut controller = controller_processing(now);
    controller.apply(
        UiEvent::ResultsReady {
            exam_id: ExamId(7),
            result: completed(60.0),
        },
        now,
    );
    let err = ClientError::from(ApiException::new(400, "exam is not ready for review"));
    controller.apply(
        UiEvent::Error(UiError::from_client_error(UiErrorContext::LoadReview, &err)),
        now,
    );
    assert_eq!(controller.view(), View::Results);
    assert!(controller.alert().is_some());
}

#[test]
fn stats_failure_is_shown_inline() {
    let now = Instant::now();
    let mut controller = controller_with_stats(now);
    controller.apply(
        UiEvent::Error(UiError::from_message(
            UiErrorContext::LoadStats,
            "Exam service unreachable; make sure the backend is running.",
        )),
        now,
    );
    assert!(controller.stats().is_none());
    assert!(controller.stats_error().is_some());
    assert!(controller.alert().is_none());
    assert_eq!(controller.max_questions(), 0);
}

#[test]
fn upload_reports_status_and_reloads_stats() {
    let now = Instant::now();
    let mut controller = controller_with_stats(now);
    controller.open_admin();
    assert_eq!(controller.view(), View::Admin);

    let cmds = controller.upload_file(PathBuf::from("questions.json"));
    assert_eq!(
        cmds,
        vec![BackendCommand::UploadQuestions {
            path: PathBuf::from("questions.json")
        }]
    );
    assert_eq!(controller.upload_status(), Some(&UploadStatus::Sending));

    let cmds = controller.apply(
        UiEvent::UploadFinished(UploadResponse {
            status: "success".to_string(),
            message: "Imported 2 questions".to_string(),
        }),
        now,
    );
    assert_eq!(cmds, vec![BackendCommand::LoadStats]);
    let status = controller.upload_status().expect("upload status");
    assert!(!status.is_error());
    assert!(status.text().contains("Imported 2 questions"));
}

#[test]
fn invalid_upload_file_is_reported_as_invalid_file() {
    let now = Instant::now();
    let mut controller = controller_with_stats(now);
    controller.open_admin();
    controller.upload_file(PathBuf::from("broken.json"));

    let err = ClientError::invalid_input("expected value at line 1 column 1");
    controller.apply(
        UiEvent::Error(UiError::from_client_error(UiErrorContext::Upload, &err)),
        now,
    );
    let status = controller.upload_status().expect("upload status");
    assert!(status.is_error());
    assert!(status.text().contains("invalid file"));
    assert_eq!(controller.view(), View::Admin);
}
