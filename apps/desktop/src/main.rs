use std::{path::PathBuf, time::Duration};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    build_service, load_settings, poll_until_completed, upload::check_question_records,
    upload::read_upload_file, ClientSettings, ExamService,
};
use shared::{
    domain::{ExamId, UserId},
    protocol::UploadResponse,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "exam-cli", about = "Command-line client for the exam service")]
struct Args {
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    mock: bool,
    #[arg(long)]
    user_id: Option<i64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Question counts per domain.
    Stats,
    /// Upload a JSON file of questions.
    Upload {
        file: PathBuf,
        /// Validate every record locally and stop on problems.
        #[arg(long)]
        check: bool,
    },
    /// Results of a submitted exam.
    Results {
        exam_id: i64,
        /// Keep polling until grading completes.
        #[arg(long)]
        wait: bool,
        #[arg(long, default_value_t = 2000)]
        interval_ms: u64,
    },
    /// Per-question review of a graded exam.
    Review { exam_id: i64 },
}

fn settings_from(args: &Args) -> ClientSettings {
    let mut settings = load_settings(args.config.as_deref());
    if let Some(api_url) = &args.api_url {
        settings.api_url = api_url.clone();
    }
    if args.mock {
        settings.use_mock_data = true;
    }
    if let Some(user_id) = args.user_id {
        settings.user_id = UserId(user_id);
    }
    settings
}

/// Accepted uploads yield the service message; anything else is an error.
fn upload_outcome(file: &std::path::Path, response: &UploadResponse) -> Result<String> {
    if !response.is_success() {
        bail!("upload rejected: {}", response.message);
    }
    info!(file = %file.display(), "question upload accepted");
    Ok(response.message.clone())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();
    let settings = settings_from(&args);
    let service = build_service(&settings).context("configuring exam service")?;

    match args.command {
        Command::Stats => {
            let stats = service.question_stats().await?;
            for (domain, count) in stats.domains() {
                println!("{domain:<30} {count:>5}");
            }
            println!("{:<30} {:>5}", "total", stats.total());
        }
        Command::Upload { file, check } => {
            let payload = read_upload_file(&file).await?;
            if check {
                let problems = check_question_records(&payload)?;
                if !problems.is_empty() {
                    for problem in &problems {
                        eprintln!("{problem}");
                    }
                    bail!("{} problem(s) in {}", problems.len(), file.display());
                }
            }
            let response = service.upload_questions(&payload).await?;
            println!("{}", upload_outcome(&file, &response)?);
        }
        Command::Results {
            exam_id,
            wait,
            interval_ms,
        } => {
            let exam_id = ExamId(exam_id);
            let result = if wait {
                info!(exam_id = %exam_id, interval_ms, "waiting for grading");
                poll_until_completed(
                    service.as_ref(),
                    exam_id,
                    Duration::from_millis(interval_ms.max(1)),
                )
                .await
            } else {
                service.exam_results(exam_id).await?
            };
            if !result.is_completed() {
                println!("exam {exam_id} is still being graded");
                return Ok(());
            }
            let verdict = if result.is_passing() { "pass" } else { "fail" };
            println!("score: {}% ({verdict})", result.score_percent());
            if let Some(breakdown) = &result.domain_weakness {
                for (domain, score) in breakdown {
                    println!("  {domain:<28} {:>4}%", score.round() as i64);
                }
            }
            let feedback = result.feedback_or_placeholder();
            println!("best domain: {}", feedback.best_domain);
            println!("worst domain: {}", feedback.worst_domain);
            for recommendation in &feedback.recommendations {
                println!("- {recommendation}");
            }
        }
        Command::Review { exam_id } => {
            let items = service.exam_review(ExamId(exam_id)).await?;
            for (index, item) in items.iter().enumerate() {
                let mark = if item.is_correct() { "correct" } else { "wrong" };
                println!("{}. {}", index + 1, item.content);
                println!(
                    "   answer: {} / expected: {} ({mark})",
                    item.selected_display(),
                    item.correct_option
                );
                if let Some(explanation) = &item.explanation {
                    println!("   {explanation}");
                }
            }
        }
    }

    Ok(())
}
