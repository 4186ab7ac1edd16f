//! Exam configuration and answer bookkeeping.
//!
//! Both types are plain state with no I/O so the view layer can drive them
//! directly and tests can exercise every rule without a service.

use std::time::Duration;

use shared::{
    domain::{DomainStats, Question, QuestionId, UserId},
    protocol::{AnswerSubmission, ExamSubmission},
};

/// Quantity offered when a domain first becomes selected.
pub const DEFAULT_QUANTITY: u32 = 5;

/// Requested quantity plus the selected domains, kept within availability.
///
/// The quantity is always `<=` the combined count of the selected domains and
/// is zero exactly when that combined count is zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamConfig {
    quantity: u32,
    preferred_quantity: u32,
    selected_domains: Vec<String>,
}

impl Default for ExamConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ExamConfig {
    pub fn new() -> Self {
        Self::with_preferred_quantity(DEFAULT_QUANTITY)
    }

    pub fn with_preferred_quantity(preferred_quantity: u32) -> Self {
        Self {
            quantity: 0,
            preferred_quantity: preferred_quantity.max(1),
            selected_domains: Vec::new(),
        }
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn selected_domains(&self) -> &[String] {
        &self.selected_domains
    }

    pub fn is_selected(&self, domain: &str) -> bool {
        self.selected_domains.iter().any(|selected| selected == domain)
    }

    pub fn max_questions(&self, stats: &DomainStats) -> u32 {
        stats.available_for(&self.selected_domains)
    }

    pub fn can_start(&self, stats: &DomainStats) -> bool {
        !self.selected_domains.is_empty() && self.max_questions(stats) > 0 && self.quantity > 0
    }

    /// Selects or deselects `domain`. Domains without questions cannot be
    /// selected, only removed. Returns whether the selection changed.
    pub fn toggle_domain(&mut self, domain: &str, stats: &DomainStats) -> bool {
        if let Some(position) = self
            .selected_domains
            .iter()
            .position(|selected| selected == domain)
        {
            self.selected_domains.remove(position);
        } else if stats.count(domain) > 0 {
            self.selected_domains.push(domain.to_string());
        } else {
            return false;
        }
        self.clamp_to(self.max_questions(stats));
        true
    }

    /// Sets the quantity, clamped to `1..=max` (or 0 when nothing is available).
    pub fn set_quantity(&mut self, requested: u32, stats: &DomainStats) {
        let max = self.max_questions(stats);
        self.quantity = if max == 0 { 0 } else { requested.clamp(1, max) };
        if self.quantity > 0 {
            self.preferred_quantity = self.quantity;
        }
    }

    /// Re-applies the constraints after the statistics changed, dropping
    /// domains that no longer have questions.
    pub fn reconcile(&mut self, stats: &DomainStats) {
        self.selected_domains.retain(|domain| stats.count(domain) > 0);
        self.clamp_to(self.max_questions(stats));
    }

    /// Restores a previously saved selection against fresh statistics.
    pub fn restore(&mut self, domains: &[String], quantity: u32, stats: &DomainStats) {
        self.selected_domains.clear();
        for domain in domains {
            if !self.is_selected(domain) && stats.count(domain) > 0 {
                self.selected_domains.push(domain.clone());
            }
        }
        self.quantity = 0;
        if quantity > 0 {
            self.preferred_quantity = quantity;
        }
        self.clamp_to(self.max_questions(stats));
    }

    fn clamp_to(&mut self, max: u32) {
        if max == 0 {
            self.quantity = 0;
        } else if self.quantity == 0 {
            self.quantity = self.preferred_quantity.min(max);
        } else if self.quantity > max {
            self.quantity = max;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// Single choice: the previous selection was replaced.
    Replaced,
    Added,
    Removed,
    /// Multi choice: the limit is reached, the click was ignored.
    LimitReached,
    UnknownOption,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    pub question_id: QuestionId,
    pub selected: Vec<String>,
    pub time_taken_ms: u64,
}

impl AnswerRecord {
    /// Sorted, comma separated keys as the service expects them (`"A,C"`).
    pub fn selected_option(&self) -> String {
        let mut keys = self.selected.clone();
        keys.sort();
        keys.join(",")
    }
}

/// Answers of one exam attempt, one record per answered question in the order
/// the questions were first answered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSheet {
    records: Vec<AnswerRecord>,
}

impl AnswerSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[AnswerRecord] {
        &self.records
    }

    pub fn record(&self, question_id: QuestionId) -> Option<&AnswerRecord> {
        self.records
            .iter()
            .find(|record| record.question_id == question_id)
    }

    pub fn selected(&self, question_id: QuestionId) -> &[String] {
        self.record(question_id)
            .map(|record| record.selected.as_slice())
            .unwrap_or(&[])
    }

    /// Applies a click on `key`. Single choice replaces, multi choice toggles
    /// up to the question's limit. `elapsed` is the time since the question
    /// was shown and overwrites the previous timing.
    pub fn select(&mut self, question: &Question, key: &str, elapsed: Duration) -> SelectionOutcome {
        if !question.has_option(key) {
            return SelectionOutcome::UnknownOption;
        }
        let limit = question.selection_limit();
        let time_taken_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

        let index = match self
            .records
            .iter()
            .position(|record| record.question_id == question.id)
        {
            Some(index) => index,
            None => {
                self.records.push(AnswerRecord {
                    question_id: question.id,
                    selected: Vec::new(),
                    time_taken_ms,
                });
                self.records.len() - 1
            }
        };
        let record = &mut self.records[index];
        record.time_taken_ms = time_taken_ms;

        if limit == 1 {
            record.selected = vec![key.to_string()];
            return SelectionOutcome::Replaced;
        }
        if let Some(position) = record.selected.iter().position(|selected| selected == key) {
            record.selected.remove(position);
            SelectionOutcome::Removed
        } else if record.selected.len() < limit {
            record.selected.push(key.to_string());
            SelectionOutcome::Added
        } else {
            SelectionOutcome::LimitReached
        }
    }

    /// Whether the user may move past `question`: something is selected and,
    /// for multi choice, exactly the required number of options.
    pub fn is_ready(&self, question: &Question) -> bool {
        let selected = self.selected(question.id).len();
        if selected == 0 {
            return false;
        }
        !question.is_multi_choice() || selected == question.selection_limit()
    }

    pub fn to_submission(&self, user_id: UserId) -> ExamSubmission {
        ExamSubmission {
            user_id,
            answers: self
                .records
                .iter()
                .map(|record| AnswerSubmission {
                    question_id: record.question_id,
                    selected_option: record.selected_option(),
                    time_taken_ms: record.time_taken_ms,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
#[path = "tests/exam_tests.rs"]
mod tests;
