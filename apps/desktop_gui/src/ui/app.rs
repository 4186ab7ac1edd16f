use std::time::{Duration, Instant};

use client_core::ExamConfig;
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use serde::{Deserialize, Serialize};
use shared::domain::UserId;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{err_label, UiEvent};
use crate::controller::orchestration::dispatch_all;
use crate::controller::reducer::{View, ViewController};
use crate::ui::{panels, theme};

pub const SELECTION_STORAGE_KEY: &str = "exam_desktop_gui.selection.v1";

/// Last domain selection and quantity, restored once statistics arrive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSelection {
    #[serde(default)]
    pub domains: Vec<String>,
    #[serde(default)]
    pub quantity: u32,
}

pub struct ExamDesktopApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    controller: ViewController,
    pending_restore: Option<PersistedSelection>,
    upload_path: String,
    theme_applied: bool,
}

impl ExamDesktopApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        user_id: UserId,
        default_quantity: u32,
        persisted: Option<PersistedSelection>,
    ) -> Self {
        let config = ExamConfig::with_preferred_quantity(default_quantity);
        let mut app = Self {
            cmd_tx,
            ui_rx,
            controller: ViewController::new(user_id, config, Instant::now()),
            pending_restore: persisted.filter(|selection| !selection.domains.is_empty()),
            upload_path: String::new(),
            theme_applied: false,
        };
        let cmds = app.controller.enter_start();
        app.queue(cmds);
        app
    }

    fn queue(&mut self, cmds: Vec<BackendCommand>) {
        dispatch_all(&self.cmd_tx, cmds, self.controller.status_mut());
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            let stats_loaded = matches!(event, UiEvent::StatsLoaded(_));
            let cmds = self.controller.apply(event, Instant::now());
            if stats_loaded {
                if let Some(selection) = self.pending_restore.take() {
                    self.controller
                        .restore_selection(&selection.domains, selection.quantity);
                }
            }
            self.queue(cmds);
        }
    }

    fn show_alert(&mut self, ctx: &egui::Context) {
        let Some(alert) = self.controller.alert().cloned() else {
            return;
        };
        let mut dismissed = false;
        egui::Window::new(alert.title())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(theme::muted(err_label(alert.category())));
                ui.label(alert.message());
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if dismissed {
            self.controller.dismiss_alert();
        }
    }

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        if self.controller.status().is_empty() {
            return;
        }
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(theme::muted(self.controller.status()));
                if ui.small_button("✕").clicked() {
                    self.controller.status_mut().clear();
                }
            });
        });
    }

    fn show_view(&mut self, ctx: &egui::Context) {
        let mut cmds = Vec::new();
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::Frame::group(ui.style())
                .inner_margin(16.0)
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    let controller = &mut self.controller;
                    match controller.view() {
                        View::Start => cmds = panels::start_panel(ui, controller),
                        View::Admin => {
                            cmds = panels::admin_panel(ui, controller, &mut self.upload_path)
                        }
                        View::Exam => cmds = panels::exam_panel(ui, controller),
                        View::Processing => cmds = panels::processing_panel(ui, controller),
                        View::Results => cmds = panels::results_panel(ui, controller),
                        View::Review => panels::review_panel(ui, controller),
                        View::Feedback => panels::feedback_panel(ui, controller),
                    }
                });
        });
        self.queue(cmds);
    }
}

impl eframe::App for ExamDesktopApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.theme_applied {
            theme::apply(ctx);
            self.theme_applied = true;
        }

        self.process_ui_events();
        self.show_status_bar(ctx);
        self.show_view(ctx);
        self.show_alert(ctx);

        ctx.request_repaint_after(Duration::from_millis(100));
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let config = self.controller.config();
        let selection = PersistedSelection {
            domains: config.selected_domains().to_vec(),
            quantity: config.quantity(),
        };
        if let Ok(serialized) = serde_json::to_string(&selection) {
            storage.set_string(SELECTION_STORAGE_KEY, serialized);
        }
    }
}

pub fn load_persisted_selection(storage: Option<&dyn eframe::Storage>) -> Option<PersistedSelection> {
    storage.and_then(|storage| {
        storage
            .get_string(SELECTION_STORAGE_KEY)
            .and_then(|text| serde_json::from_str::<PersistedSelection>(&text).ok())
    })
}
