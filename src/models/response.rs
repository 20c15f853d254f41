//! Response and answer models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One anonymous submission to a survey. Created exactly once per
/// successful submission and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct SurveyResponse {
    /// Unique record identifier.
    pub id: String,
    /// Owning survey identifier.
    pub survey_id: String,
    /// Submission timestamp.
    pub submitted_at: DateTime<Utc>,
    /// Best-effort respondent network address; not authenticated.
    pub respondent_addr: Option<String>,
}

impl SurveyResponse {
    /// Construct a new response with a fresh identifier.
    #[must_use]
    pub fn new(survey_id: String, respondent_addr: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            survey_id,
            submitted_at: Utc::now(),
            respondent_addr,
        }
    }
}

/// One validated answer, ready for insertion alongside its response.
///
/// Exactly one of `text_value` and `choice_ids` is populated, per the
/// question's kind: free-text and rating answers carry `text_value`
/// (ratings serialized as the digit), choice answers carry `choice_ids`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct NewAnswer {
    /// The question this answers.
    pub question_id: String,
    /// Free-text or rating value.
    pub text_value: Option<String>,
    /// Selected choice identifiers.
    pub choice_ids: Vec<String>,
}

/// A persisted answer row, as read back from the response store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Answer {
    /// Unique record identifier.
    pub id: String,
    /// Owning response identifier.
    pub response_id: String,
    /// The question this answers.
    pub question_id: String,
    /// Free-text or rating value.
    pub text_value: Option<String>,
    /// Selected choice identifiers.
    pub choice_ids: Vec<String>,
}
