//! One rendering function per view. Panels read the controller, forward user
//! actions to it and return the backend commands those actions produced.

use std::{path::PathBuf, time::Instant};

use eframe::egui::{self, RichText};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::reducer::{UploadStatus, ViewController};
use crate::ui::{format, theme};

pub fn start_panel(ui: &mut egui::Ui, controller: &mut ViewController) -> Vec<BackendCommand> {
    let mut cmds = Vec::new();
    ui.label(theme::heading("Exam practice"));
    ui.add_space(8.0);

    if let Some(err) = controller.stats_error() {
        ui.colored_label(theme::FAIL_COLOR, err);
        if ui.button("Retry").clicked() {
            cmds.extend(controller.enter_start());
        }
        return cmds;
    }

    let domains: Vec<(String, u32)> = match controller.stats() {
        Some(stats) => stats
            .domains()
            .map(|(domain, count)| (domain.to_string(), count))
            .collect(),
        None => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading question statistics...");
            });
            return cmds;
        }
    };

    ui.label(RichText::new("Domains").strong());
    if domains.is_empty() {
        ui.label(theme::muted("No questions available yet. Upload some from the admin view."));
    }
    for (domain, count) in &domains {
        let mut checked = controller.config().is_selected(domain);
        let label = format!("{domain} ({count})");
        let response = ui.add_enabled(*count > 0, egui::Checkbox::new(&mut checked, label));
        if response.changed() {
            controller.toggle_domain(domain);
        }
    }

    ui.add_space(8.0);
    let max = controller.max_questions();
    let mut quantity = controller.config().quantity();
    ui.horizontal(|ui| {
        ui.label("Questions:");
        let slider = egui::Slider::new(&mut quantity, 1..=max.max(1));
        if ui.add_enabled(max > 0, slider).changed() {
            controller.set_quantity(quantity);
        }
        ui.label(theme::muted(format!("of {max} available")));
    });

    ui.add_space(12.0);
    ui.horizontal(|ui| {
        if ui.button("Start exam").clicked() {
            cmds.extend(controller.start_exam());
        }
        if ui.button("Upload questions").clicked() {
            controller.open_admin();
        }
    });
    cmds
}

pub fn admin_panel(
    ui: &mut egui::Ui,
    controller: &mut ViewController,
    upload_path: &mut String,
) -> Vec<BackendCommand> {
    let mut cmds = Vec::new();
    ui.label(theme::heading("Upload questions"));
    ui.label(theme::muted(
        "A JSON list of questions with content, options, correct_option and domain.",
    ));
    ui.add_space(8.0);

    ui.horizontal(|ui| {
        ui.label("File:");
        ui.text_edit_singleline(upload_path);
        if ui.button("Browse...").clicked() {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("JSON", &["json"])
                .pick_file()
            {
                *upload_path = path.display().to_string();
            }
        }
    });

    let sending = matches!(
        controller.upload_status(),
        Some(UploadStatus::Sending)
    );
    let can_send = !sending && !upload_path.trim().is_empty();
    if ui.add_enabled(can_send, egui::Button::new("Send")).clicked() {
        cmds.extend(controller.upload_file(PathBuf::from(upload_path.trim())));
    }

    if let Some(status) = controller.upload_status() {
        let color = theme::outcome_color(!status.is_error());
        ui.colored_label(color, status.text());
    }

    ui.add_space(12.0);
    if ui.button("Back").clicked() {
        cmds.extend(controller.enter_start());
    }
    cmds
}

pub fn exam_panel(ui: &mut egui::Ui, controller: &mut ViewController) -> Vec<BackendCommand> {
    let mut cmds = Vec::new();
    let total = controller.questions().len();
    let index = controller.current_index();
    let Some(question) = controller.current_question().cloned() else {
        return cmds;
    };

    ui.horizontal(|ui| {
        ui.label(theme::muted(format!("Question {} of {total}", index + 1)));
        ui.label(theme::muted(format!("· {}", question.domain)));
    });
    ui.add(egui::ProgressBar::new(index as f32 / total.max(1) as f32));
    ui.add_space(8.0);
    ui.label(RichText::new(format::format_question_text(&question.content)).size(16.0));
    if question.is_multi_choice() {
        ui.label(theme::muted(format!(
            "Select {} options.",
            question.selection_limit()
        )));
        ui.label(format::selection_counter(
            controller.current_selection().len(),
            question.selection_limit(),
        ));
    }
    ui.add_space(8.0);

    for (key, text) in &question.options {
        let selected = controller.current_selection().contains(key);
        let button = egui::Button::new(format!("{key}) {text}")).selected(selected);
        if ui.add_sized([ui.available_width(), 32.0], button).clicked() {
            controller.select_option(key, Instant::now());
        }
    }

    ui.add_space(12.0);
    let label = if controller.is_last_question() {
        "Finish"
    } else {
        "Next"
    };
    if ui
        .add_enabled(controller.can_advance(), egui::Button::new(label))
        .clicked()
    {
        cmds.extend(controller.next_question(Instant::now()));
    }
    cmds
}

pub fn processing_panel(ui: &mut egui::Ui, controller: &mut ViewController) -> Vec<BackendCommand> {
    let mut cmds = Vec::new();
    ui.vertical_centered(|ui| {
        ui.add_space(40.0);
        ui.add(egui::Spinner::new().size(32.0));
        ui.label(theme::heading("Grading your exam..."));
        if let Some(exam_id) = controller.exam_id() {
            ui.label(theme::muted(format!("Exam #{exam_id}")));
        }
        ui.add_space(12.0);
        if ui.button("Cancel").clicked() {
            cmds.extend(controller.cancel_processing());
        }
    });
    cmds
}

pub fn results_panel(ui: &mut egui::Ui, controller: &mut ViewController) -> Vec<BackendCommand> {
    let mut cmds = Vec::new();
    let Some(result) = controller.results().cloned() else {
        return cmds;
    };

    ui.vertical_centered(|ui| {
        ui.label(theme::heading("Results"));
        ui.label(
            RichText::new(format!("{}%", result.score_percent()))
                .size(48.0)
                .strong()
                .color(theme::outcome_color(result.is_passing())),
        );
        ui.label(if result.is_passing() { "Passed" } else { "Keep practicing" });
    });

    if let Some(breakdown) = result.domain_weakness.as_ref().filter(|b| !b.is_empty()) {
        ui.add_space(8.0);
        ui.label(RichText::new("By domain").strong());
        egui::Grid::new("domain_breakdown")
            .striped(true)
            .num_columns(2)
            .show(ui, |ui| {
                for (domain, score) in breakdown {
                    ui.label(domain.as_str());
                    ui.label(format::format_percent(*score));
                    ui.end_row();
                }
            });
    }

    ui.add_space(12.0);
    ui.horizontal(|ui| {
        if ui.button("Review answers").clicked() {
            cmds.extend(controller.open_review());
        }
        if ui.button("Feedback").clicked() {
            controller.open_feedback();
        }
        if ui.button("Back to start").clicked() {
            cmds.extend(controller.enter_start());
        }
    });
    cmds
}

pub fn review_panel(ui: &mut egui::Ui, controller: &mut ViewController) {
    ui.horizontal(|ui| {
        ui.label(theme::heading("Review"));
        if ui.button("Back").clicked() {
            controller.back_to_results();
        }
    });
    if controller.review().is_empty() {
        ui.label(theme::muted("Nothing to review."));
        return;
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        for (index, item) in controller.review().iter().enumerate() {
            egui::Frame::group(ui.style())
                .inner_margin(12.0)
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.label(RichText::new(format!("{}. ", index + 1)).strong());
                    ui.label(format::format_question_text(&item.content));
                    ui.label(
                        RichText::new(format::review_verdict(item.is_correct()))
                            .strong()
                            .color(theme::outcome_color(item.is_correct())),
                    );
                    for (key, text) in &item.options {
                        ui.label(theme::muted(format!("{key}) {text}")));
                    }
                    ui.colored_label(
                        theme::outcome_color(item.is_correct()),
                        format!("Your answer: {}", item.selected_display()),
                    );
                    ui.label(format!("Correct answer: {}", item.correct_option));
                    if let Some(ms) = item.time_taken_ms {
                        ui.label(theme::muted(format!("Time: {}", format::format_millis(ms))));
                    }
                    if let Some(explanation) = &item.explanation {
                        ui.label(RichText::new(explanation.as_str()).italics());
                    }
                });
            ui.add_space(6.0);
        }
    });
}

pub fn feedback_panel(ui: &mut egui::Ui, controller: &mut ViewController) {
    ui.horizontal(|ui| {
        ui.label(theme::heading("Feedback"));
        if ui.button("Back").clicked() {
            controller.back_to_results();
        }
    });
    let Some(feedback) = controller.results().map(|r| r.feedback_or_placeholder()) else {
        return;
    };

    egui::Grid::new("feedback_summary")
        .num_columns(2)
        .show(ui, |ui| {
            ui.label("Average time per question");
            ui.label(format!("{:.1}s", feedback.avg_time_per_question_sec));
            ui.end_row();
            ui.label("Total time");
            ui.label(format!("{:.1} min", feedback.total_time_min));
            ui.end_row();
            ui.label("Best domain");
            ui.colored_label(theme::PASS_COLOR, feedback.best_domain.as_str());
            ui.end_row();
            ui.label("Weakest domain");
            ui.colored_label(theme::FAIL_COLOR, feedback.worst_domain.as_str());
            ui.end_row();
        });

    ui.add_space(8.0);
    ui.label(RichText::new("Recommendations").strong());
    if feedback.recommendations.is_empty() {
        ui.label(theme::muted("No specific recommendations."));
    }
    for recommendation in &feedback.recommendations {
        ui.label(format!("• {recommendation}"));
    }
}
