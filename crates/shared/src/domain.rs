use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(UserId);
id_newtype!(QuestionId);
id_newtype!(ExamId);

/// Key of the aggregate count in the `/questions/stats` payload.
pub const STATS_TOTAL_KEY: &str = "total";

/// Score (in percent) at or above which a result is shown as passing.
pub const PASSING_SCORE_PERCENT: i64 = 70;

fn default_selection_limit() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub domain: String,
    pub content: String,
    pub options: BTreeMap<String, String>,
    #[serde(default = "default_selection_limit")]
    pub selection_limit: u32,
}

impl Question {
    /// Number of options the user has to pick. Missing or zero limits count as single choice.
    pub fn selection_limit(&self) -> usize {
        self.selection_limit.max(1) as usize
    }

    pub fn is_multi_choice(&self) -> bool {
        self.selection_limit() > 1
    }

    pub fn has_option(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }
}

/// Available question counts per domain.
///
/// On the wire this is a single flat object where `total` sits next to the
/// domain labels, so it is split out on decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, u32>", into = "BTreeMap<String, u32>")]
pub struct DomainStats {
    counts: BTreeMap<String, u32>,
    total: u32,
}

impl DomainStats {
    pub fn new(counts: BTreeMap<String, u32>) -> Self {
        let total = counts.values().sum();
        Self { counts, total }
    }

    pub fn count(&self, domain: &str) -> u32 {
        self.counts.get(domain).copied().unwrap_or(0)
    }

    pub fn domains(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(domain, count)| (domain.as_str(), *count))
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Combined availability across `domains`; zero when nothing is selected.
    pub fn available_for<'a, I>(&self, domains: I) -> u32
    where
        I: IntoIterator<Item = &'a String>,
    {
        domains.into_iter().map(|domain| self.count(domain)).sum()
    }
}

impl From<BTreeMap<String, u32>> for DomainStats {
    fn from(mut raw: BTreeMap<String, u32>) -> Self {
        let reported_total = raw.remove(STATS_TOTAL_KEY);
        let counted: u32 = raw.values().sum();
        Self {
            counts: raw,
            total: reported_total.unwrap_or(counted),
        }
    }
}

impl From<DomainStats> for BTreeMap<String, u32> {
    fn from(stats: DomainStats) -> Self {
        let mut raw = stats.counts;
        raw.insert(STATS_TOTAL_KEY.to_string(), stats.total);
        raw
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExamStatus {
    Processing,
    Completed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedFeedback {
    #[serde(default)]
    pub avg_time_per_question_sec: f64,
    #[serde(default)]
    pub total_time_min: f64,
    #[serde(default = "not_available")]
    pub best_domain: String,
    #[serde(default = "not_available")]
    pub worst_domain: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

fn not_available() -> String {
    "N/A".to_string()
}

impl DetailedFeedback {
    /// Shown when the analytics worker produced no feedback for an exam.
    pub fn placeholder() -> Self {
        Self {
            avg_time_per_question_sec: 0.0,
            total_time_min: 0.0,
            best_domain: not_available(),
            worst_domain: not_available(),
            recommendations: vec!["Not enough data yet".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamResult {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub score: Option<f64>,
    #[serde(default)]
    pub domain_weakness: Option<BTreeMap<String, f64>>,
    pub status: ExamStatus,
    #[serde(default)]
    pub detailed_feedback: Option<DetailedFeedback>,
}

impl ExamResult {
    pub fn is_completed(&self) -> bool {
        self.status == ExamStatus::Completed
    }

    /// Score rounded to a whole percent, as displayed.
    pub fn score_percent(&self) -> i64 {
        self.score.unwrap_or(0.0).round() as i64
    }

    pub fn is_passing(&self) -> bool {
        self.score_percent() >= PASSING_SCORE_PERCENT
    }

    pub fn feedback_or_placeholder(&self) -> DetailedFeedback {
        self.detailed_feedback
            .clone()
            .unwrap_or_else(DetailedFeedback::placeholder)
    }
}

/// Numeric columns may come back as JSON numbers or decimal strings.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(value)) => Ok(Some(value)),
        Some(NumberOrString::Text(text)) => text
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewItem {
    pub content: String,
    #[serde(default)]
    pub options: BTreeMap<String, String>,
    #[serde(default)]
    pub selected_option: Option<String>,
    pub correct_option: String,
    #[serde(default)]
    pub is_correct: Option<bool>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub time_taken_ms: Option<i64>,
}

impl ReviewItem {
    /// Ungraded answers are treated as incorrect.
    pub fn is_correct(&self) -> bool {
        self.is_correct.unwrap_or(false)
    }

    pub fn selected_display(&self) -> &str {
        match self.selected_option.as_deref().map(str::trim) {
            Some(selected) if !selected.is_empty() => selected,
            _ => "Unanswered",
        }
    }
}

/// One record of a question upload file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionUpload {
    pub content: String,
    pub options: BTreeMap<String, String>,
    pub correct_option: String,
    pub explanation: String,
    pub domain: String,
}

impl QuestionUpload {
    /// Correct option keys with surrounding whitespace removed (`"A, B"` -> `{A, B}`).
    pub fn correct_keys(&self) -> BTreeSet<String> {
        self.correct_option
            .split(',')
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Problems that would make the record unusable once imported.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.content.trim().is_empty() {
            problems.push("content is empty".to_string());
        }
        if self.domain.trim().is_empty() {
            problems.push("domain is empty".to_string());
        }
        if self.options.is_empty() {
            problems.push("no options".to_string());
        }
        let correct = self.correct_keys();
        if correct.is_empty() {
            problems.push("correct_option is empty".to_string());
        }
        for key in &correct {
            if !self.options.contains_key(key) {
                problems.push(format!("correct option {key} is not one of the options"));
            }
        }
        problems
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
