use eframe::egui::{self, Color32, RichText};

pub const PASS_COLOR: Color32 = Color32::from_rgb(46, 160, 67);
pub const FAIL_COLOR: Color32 = Color32::from_rgb(218, 54, 51);
pub const MUTED_COLOR: Color32 = Color32::from_rgb(140, 140, 150);

pub fn outcome_color(passed: bool) -> Color32 {
    if passed {
        PASS_COLOR
    } else {
        FAIL_COLOR
    }
}

pub fn heading(text: impl Into<String>) -> RichText {
    RichText::new(text).size(22.0).strong()
}

pub fn muted(text: impl Into<String>) -> RichText {
    RichText::new(text).color(MUTED_COLOR)
}

pub fn apply(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();
    style.spacing.item_spacing = egui::vec2(8.0, 8.0);
    style.spacing.button_padding = egui::vec2(10.0, 6.0);
    ctx.set_style(style);
}
