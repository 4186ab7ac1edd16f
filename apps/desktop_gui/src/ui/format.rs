//! Text helpers for question and result rendering.

use std::sync::LazyLock;

use regex::Regex;

static OPTION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\s)([A-D]\))").unwrap());

/// Starts a new line at option markers embedded in question text
/// (`" A)"` to `" D)"`). Only the whitespace character right before a marker
/// is replaced; markers at the very start of the text stay in place.
pub fn format_question_text(text: &str) -> String {
    OPTION_MARKER.replace_all(text, "\n$2").into_owned()
}

/// Progress of a multi-choice answer, e.g. `"Selected 1 / 2"`.
pub fn selection_counter(selected: usize, limit: usize) -> String {
    format!("Selected {selected} / {limit}")
}

pub fn review_verdict(correct: bool) -> &'static str {
    if correct {
        "CORRECT"
    } else {
        "INCORRECT"
    }
}

pub fn format_percent(value: f64) -> String {
    format!("{}%", value.round() as i64)
}

pub fn format_millis(ms: i64) -> String {
    format!("{:.1}s", ms as f64 / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moves_inline_markers_to_new_lines() {
        assert_eq!(
            format_question_text("Pick one: A) red B) green C) blue D) none"),
            "Pick one:\nA) red\nB) green\nC) blue\nD) none"
        );
    }

    #[test]
    fn keeps_extra_whitespace_before_markers() {
        assert_eq!(format_question_text("green  C) blue"), "green \nC) blue");
        assert_eq!(format_question_text("Intro\n\nA) one"), "Intro\n\nA) one");
        assert_eq!(format_question_text("Intro\n \tB) two"), "Intro\n \nB) two");
    }

    #[test]
    fn leaves_other_text_alone() {
        let text = "A) leading marker stays, E) is not an option and (B) neither";
        assert_eq!(format_question_text(text), text);
    }

    #[test]
    fn labels_selection_progress_and_verdicts() {
        assert_eq!(selection_counter(1, 2), "Selected 1 / 2");
        assert_eq!(selection_counter(0, 3), "Selected 0 / 3");
        assert_eq!(review_verdict(true), "CORRECT");
        assert_eq!(review_verdict(false), "INCORRECT");
    }

    #[test]
    fn formats_numbers_for_display() {
        assert_eq!(format_percent(84.5), "85%");
        assert_eq!(format_percent(69.4), "69%");
        assert_eq!(format_millis(12_340), "12.3s");
    }
}
