//! Survey model and creation input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A survey owned by a creator, exposed to respondents by public id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Survey {
    /// Unique record identifier.
    pub id: String,
    /// Survey title shown to respondents.
    pub title: String,
    /// Longer description, may be empty.
    pub description: String,
    /// Identity of the creator, supplied by the auth collaborator.
    pub creator_id: String,
    /// Whether the survey currently accepts submissions.
    pub is_active: bool,
    /// Opaque token used in public URLs. Immutable for the survey's life
    /// and unique across all surveys.
    pub public_id: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Survey {
    /// Construct a new active survey with fresh identifiers.
    #[must_use]
    pub fn new(creator_id: String, title: String, description: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            description,
            creator_id,
            is_active: true,
            public_id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
        }
    }
}

/// Input for creating a survey.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct NewSurvey {
    /// Survey title.
    pub title: String,
    /// Survey description, may be empty.
    #[serde(default)]
    pub description: String,
}

/// Partial update applied to a survey. `None` fields are left unchanged;
/// the public id is never updatable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct SurveyUpdate {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement active flag.
    pub is_active: Option<bool>,
}

/// Dashboard row: a survey with its collected response count.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct SurveyOverview {
    /// The survey record.
    pub survey: Survey,
    /// Number of responses collected so far.
    pub response_count: u64,
}
