use std::path::PathBuf;

mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use client_core::{build_service, load_settings};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::ui::{load_persisted_selection, ExamDesktopApp};

#[derive(Debug, Parser)]
#[command(name = "exam-desktop-gui", about = "Desktop client for exam practice")]
struct Args {
    /// Settings file (defaults to ./exam_client.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Base URL of the exam service.
    #[arg(long)]
    api_url: Option<String>,
    /// Use built-in sample data instead of the exam service.
    #[arg(long)]
    mock: bool,
    #[arg(long)]
    user_id: Option<i64>,
    #[arg(long)]
    poll_interval_ms: Option<u64>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut settings = load_settings(args.config.as_deref());
    if let Some(api_url) = args.api_url {
        settings.api_url = api_url;
    }
    if args.mock {
        settings.use_mock_data = true;
    }
    if let Some(user_id) = args.user_id {
        settings.user_id = shared::domain::UserId(user_id);
    }
    if let Some(poll_interval_ms) = args.poll_interval_ms {
        settings.poll_interval_ms = poll_interval_ms;
    }

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    match build_service(&settings) {
        Ok(service) => {
            info!(mock = settings.use_mock_data, "starting backend worker");
            backend_bridge::runtime::launch(cmd_rx, ui_tx, service, settings.poll_interval());
        }
        Err(err) => {
            error!("failed to configure exam service: {err}");
            backend_bridge::runtime::send_event(
                &ui_tx,
                UiEvent::Error(UiError::from_client_error(
                    UiErrorContext::BackendStartup,
                    &err,
                )),
            );
        }
    }

    let user_id = settings.user_id;
    let default_quantity = settings.default_quantity;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Exam Practice")
            .with_inner_size([960.0, 720.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Exam Practice",
        options,
        Box::new(move |cc| {
            let persisted = load_persisted_selection(cc.storage);
            Ok(Box::new(ExamDesktopApp::new(
                cmd_tx,
                ui_rx,
                user_id,
                default_quantity,
                persisted,
            )))
        }),
    )
}
