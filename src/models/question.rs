//! Question and choice models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppError, Result};

/// The tagged variant distinguishing question behaviors. Drives both the
/// form builder's shape selection and the aggregator's summary strategy;
/// all kind-to-behavior dispatch lives in `match` arms over this enum.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// Multi-line free-text input.
    FreeText,
    /// Exactly one selection from the question's choices.
    SingleChoice,
    /// Zero or more selections from the question's choices.
    MultiChoice,
    /// One selection from the fixed set 1..=5.
    Rating,
}

impl QuestionKind {
    /// Whether answers to this kind reference stored choices.
    #[must_use]
    pub fn uses_choices(self) -> bool {
        matches!(self, Self::SingleChoice | Self::MultiChoice)
    }

    /// Stable storage token for this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FreeText => "free_text",
            Self::SingleChoice => "single_choice",
            Self::MultiChoice => "multi_choice",
            Self::Rating => "rating",
        }
    }

    /// Parse a storage token back into a kind.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` for an unrecognized token.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "free_text" => Ok(Self::FreeText),
            "single_choice" => Ok(Self::SingleChoice),
            "multi_choice" => Ok(Self::MultiChoice),
            "rating" => Ok(Self::Rating),
            other => Err(AppError::Db(format!("invalid question kind: {other}"))),
        }
    }
}

/// A single question belonging to a survey.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Question {
    /// Unique record identifier.
    pub id: String,
    /// Owning survey identifier.
    pub survey_id: String,
    /// Question text presented to respondents.
    pub text: String,
    /// Behavior variant.
    pub kind: QuestionKind,
    /// Display order within the survey, ascending. Not required to be
    /// contiguous; ties break by insertion order.
    pub position: u32,
    /// Whether an answer is mandatory.
    pub required: bool,
}

impl Question {
    /// Construct a new question with a fresh identifier.
    #[must_use]
    pub fn new(
        survey_id: String,
        text: String,
        kind: QuestionKind,
        position: u32,
        required: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            survey_id,
            text,
            kind,
            position,
            required,
        }
    }
}

/// Input for adding a question to a survey.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct NewQuestion {
    /// Question text.
    pub text: String,
    /// Behavior variant.
    pub kind: QuestionKind,
    /// Display order.
    #[serde(default)]
    pub position: u32,
    /// Whether an answer is mandatory.
    #[serde(default)]
    pub required: bool,
    /// Initial choice texts, applied only to choice kinds; blank entries
    /// are skipped.
    #[serde(default)]
    pub choices: Vec<String>,
}

/// One selectable option belonging to a choice-kind question.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Choice {
    /// Unique record identifier.
    pub id: String,
    /// Owning question identifier.
    pub question_id: String,
    /// Option text.
    pub text: String,
}

impl Choice {
    /// Construct a new choice with a fresh identifier.
    #[must_use]
    pub fn new(question_id: String, text: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            question_id,
            text,
        }
    }
}

/// A question together with its choices, as read from the schema store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct QuestionDetail {
    /// The question record.
    pub question: Question,
    /// Choices in insertion order; empty for non-choice kinds.
    pub choices: Vec<Choice>,
}
