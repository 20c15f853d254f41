//! Aggregated results report models.

use serde::{Deserialize, Serialize};

/// Per-choice tally within a choice-kind question.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ChoiceCount {
    /// Choice identifier.
    pub choice_id: String,
    /// Choice text.
    pub text: String,
    /// Number of answers whose selection set includes this choice.
    pub count: u64,
}

/// Kind-specific summary of one question's answers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum QuestionSummary {
    /// All non-empty free-text answers, in submission order.
    FreeText {
        /// Collected answer texts.
        entries: Vec<String>,
    },
    /// Independent per-choice counts; a multi-choice answer increments
    /// every choice it selected.
    Choices {
        /// Counts in choice insertion order.
        counts: Vec<ChoiceCount>,
    },
    /// Five-bucket histogram for ratings 1..=5.
    Rating {
        /// `histogram[i]` counts answers with rating `i + 1`.
        histogram: [u64; 5],
    },
}

/// One question's results, in display order within the report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct QuestionResults {
    /// Question identifier.
    pub question_id: String,
    /// Question text.
    pub text: String,
    /// Kind-specific tally.
    pub summary: QuestionSummary,
}

/// Aggregated results for a survey, recomputed per request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ResultsReport {
    /// Survey identifier.
    pub survey_id: String,
    /// Total number of responses collected for the survey.
    pub total_responses: u64,
    /// Per-question summaries in display order.
    pub questions: Vec<QuestionResults>,
}
