//! Dynamic form contract: field descriptors and raw submissions.
//!
//! The field descriptor list is the boundary between the engine and any
//! presentation layer — plain structured data, never markup.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::question::Choice;

/// Lowest selectable rating.
pub const RATING_MIN: u8 = 1;
/// Highest selectable rating.
pub const RATING_MAX: u8 = 5;

/// Derive the deterministic input key for a question id.
#[must_use]
pub fn field_key(question_id: &str) -> String {
    format!("question_{question_id}")
}

/// One selectable option as presented to respondents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ChoiceOption {
    /// Choice identifier, the value a respondent submits back.
    pub id: String,
    /// Option text.
    pub text: String,
}

impl From<&Choice> for ChoiceOption {
    fn from(choice: &Choice) -> Self {
        Self {
            id: choice.id.clone(),
            text: choice.text.clone(),
        }
    }
}

/// Typed input shape for one form field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum FieldShape {
    /// Multi-line string input. Length is capped at the storage layer,
    /// not here.
    FreeText,
    /// Exactly one selection from the listed options.
    SingleChoice {
        /// Options in insertion order.
        options: Vec<ChoiceOption>,
    },
    /// Zero or more selections from the listed options.
    MultiChoice {
        /// Options in insertion order.
        options: Vec<ChoiceOption>,
    },
    /// One selection from the fixed integer range; never derived from
    /// stored choices.
    Rating {
        /// Lowest selectable value.
        min: u8,
        /// Highest selectable value.
        max: u8,
    },
}

/// How one question should be presented and validated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct FieldDescriptor {
    /// Deterministic input key, `question_<id>`.
    pub key: String,
    /// Question identifier the key was derived from.
    pub question_id: String,
    /// Label shown to respondents (the question text).
    pub label: String,
    /// Whether a value must be submitted.
    pub required: bool,
    /// Typed input shape.
    pub shape: FieldShape,
}

/// Raw submitted input: field key to submitted values, mirroring HTML
/// form data where a multi-select key repeats.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawSubmission {
    values: HashMap<String, Vec<String>>,
}

impl RawSubmission {
    /// Construct an empty submission.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a single value for a field, replacing any existing values.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), vec![value.into()]);
    }

    /// Set all values for a field, replacing any existing values.
    pub fn set_all(&mut self, key: impl Into<String>, values: Vec<String>) {
        self.values.insert(key.into(), values);
    }

    /// All submitted values for a field, empty if absent.
    #[must_use]
    pub fn get(&self, key: &str) -> &[String] {
        self.values.get(key).map_or(&[], Vec::as_slice)
    }

    /// First submitted value for a field, if any.
    #[must_use]
    pub fn first(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(|v| v.first()).map(String::as_str)
    }
}
