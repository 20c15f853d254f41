//! Service layer: the engine's public surface.
//!
//! Every owner-scoped operation takes the caller identity as an explicit
//! `creator_id` argument — there is no ambient current-user state. The
//! identity itself comes from the host's auth collaborator and is
//! trusted as-is.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::aggregate::ResultsAggregator;
use crate::config::EngineConfig;
use crate::forms::build_fields;
use crate::models::form::{FieldDescriptor, RawSubmission};
use crate::models::question::{Choice, NewQuestion, Question, QuestionDetail};
use crate::models::response::SurveyResponse;
use crate::models::results::ResultsReport;
use crate::models::survey::{NewSurvey, Survey, SurveyOverview, SurveyUpdate};
use crate::persistence::question_repo::QuestionRepo;
use crate::persistence::response_repo::ResponseRepo;
use crate::persistence::survey_repo::SurveyRepo;
use crate::persistence::SqlitePool;
use crate::qr::LinkEncoder;
use crate::submission::validate;
use crate::{AppError, Result};

/// A survey with its ordered questions and choices, as shown to the
/// owning creator.
#[derive(Debug, Clone)]
pub struct SurveyDetail {
    /// The survey record.
    pub survey: Survey,
    /// Questions in display order with choices attached.
    pub questions: Vec<QuestionDetail>,
}

/// Coordinates the schema store, response store, form builder, and
/// aggregator behind one API.
#[derive(Clone)]
pub struct SurveyService {
    surveys: SurveyRepo,
    questions: QuestionRepo,
    responses: ResponseRepo,
    aggregator: ResultsAggregator,
    config: EngineConfig,
    encoder: Arc<dyn LinkEncoder>,
}

impl SurveyService {
    /// Create a new service over the given pool and collaborators.
    #[must_use]
    pub fn new(pool: SqlitePool, config: EngineConfig, encoder: Arc<dyn LinkEncoder>) -> Self {
        let responses = ResponseRepo::new(pool.clone());
        Self {
            surveys: SurveyRepo::new(pool.clone()),
            questions: QuestionRepo::new(pool),
            aggregator: ResultsAggregator::new(responses.clone()),
            responses,
            config,
            encoder,
        }
    }

    /// Create a survey and best-effort generate its QR image.
    ///
    /// An encoder failure is logged and swallowed — the survey exists
    /// either way.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for an empty title,
    /// `AppError::Conflict` on a public-id collision, or `AppError::Db`
    /// on storage failure.
    pub async fn create_survey(&self, creator_id: &str, input: NewSurvey) -> Result<Survey> {
        let title = input.title.trim().to_owned();
        if title.is_empty() {
            return Err(AppError::validation("title", "title must not be empty"));
        }

        let survey = Survey::new(creator_id.to_owned(), title, input.description);
        let survey = self.surveys.create(&survey).await?;
        info!(survey_id = %survey.id, public_id = %survey.public_id, "survey created");

        let url = self.config.take_url(&survey.public_id);
        match self.encoder.encode(&url) {
            Ok(image) if !image.is_empty() => {
                if let Err(err) = self.surveys.store_qr_image(&survey.id, &image).await {
                    warn!(survey_id = %survey.id, %err, "failed to store qr image");
                }
            }
            Ok(_) => {}
            Err(err) => {
                warn!(survey_id = %survey.id, %err, "qr encoding failed");
            }
        }

        Ok(survey)
    }

    /// Apply a partial update to an owned survey.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the caller does not own the
    /// survey, or `AppError::Db` on storage failure.
    pub async fn update_survey(
        &self,
        creator_id: &str,
        survey_id: &str,
        update: SurveyUpdate,
    ) -> Result<Survey> {
        self.surveys.update(survey_id, creator_id, &update).await
    }

    /// List the caller's surveys with response counts, newest first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` on storage failure.
    pub async fn list_surveys(&self, creator_id: &str) -> Result<Vec<SurveyOverview>> {
        self.surveys.list_for_creator(creator_id).await
    }

    /// Delete an owned survey and everything it owns.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the caller does not own the
    /// survey, or `AppError::Db` on storage failure.
    pub async fn delete_survey(&self, creator_id: &str, survey_id: &str) -> Result<()> {
        self.surveys.delete(survey_id, creator_id).await?;
        info!(%survey_id, "survey deleted");
        Ok(())
    }

    /// Add a question to an owned survey, optionally with initial
    /// choices (choice kinds only; blank entries skipped).
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for empty question text,
    /// `AppError::NotFound` if the caller does not own the survey, or
    /// `AppError::Db` on storage failure.
    pub async fn add_question(
        &self,
        creator_id: &str,
        survey_id: &str,
        input: NewQuestion,
    ) -> Result<Question> {
        let survey = self.surveys.get_owned(survey_id, creator_id).await?;

        let text = input.text.trim().to_owned();
        if text.is_empty() {
            return Err(AppError::validation("text", "question text must not be empty"));
        }

        let question = Question::new(survey.id, text, input.kind, input.position, input.required);
        let question = self.questions.create(&question).await?;

        if question.kind.uses_choices() {
            for choice_text in &input.choices {
                let choice_text = choice_text.trim();
                if choice_text.is_empty() {
                    continue;
                }
                self.questions
                    .create_choice(&Choice::new(question.id.clone(), choice_text.to_owned()))
                    .await?;
            }
        }

        debug!(question_id = %question.id, kind = question.kind.as_str(), "question added");
        Ok(question)
    }

    /// Delete an owned question, cascading to its choices. Sibling
    /// questions are untouched.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the caller does not own the
    /// question, or `AppError::Db` on storage failure.
    pub async fn delete_question(&self, creator_id: &str, question_id: &str) -> Result<()> {
        self.questions.delete(question_id, creator_id).await
    }

    /// Add a choice to an owned choice-kind question.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for empty choice text or a
    /// non-choice question kind, `AppError::NotFound` if the caller does
    /// not own the question, or `AppError::Db` on storage failure.
    pub async fn add_choice(
        &self,
        creator_id: &str,
        question_id: &str,
        text: &str,
    ) -> Result<Choice> {
        let question = self.questions.get_owned(question_id, creator_id).await?;
        if !question.kind.uses_choices() {
            return Err(AppError::validation(
                "choice",
                "this question kind does not take choices",
            ));
        }

        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::validation("choice", "choice text must not be empty"));
        }

        self.questions
            .create_choice(&Choice::new(question.id, text.to_owned()))
            .await
    }

    /// Delete an owned choice, unless a past answer references it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Conflict` if the choice is answer-referenced,
    /// `AppError::NotFound` if the caller does not own it, or
    /// `AppError::Db` on storage failure.
    pub async fn delete_choice(&self, creator_id: &str, choice_id: &str) -> Result<()> {
        self.questions.delete_choice(choice_id, creator_id).await
    }

    /// Fetch an owned survey with its ordered questions and choices.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the caller does not own the
    /// survey, or `AppError::Db` on storage failure.
    pub async fn survey_detail(&self, creator_id: &str, survey_id: &str) -> Result<SurveyDetail> {
        let survey = self.surveys.get_owned(survey_id, creator_id).await?;
        let questions = self.questions.list_for_survey(&survey.id).await?;
        Ok(SurveyDetail { survey, questions })
    }

    /// Public: fetch a survey and its form fields by public identifier.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown public id,
    /// `AppError::Inactive` for a deactivated survey, or `AppError::Db`
    /// on storage failure.
    pub async fn survey_form(&self, public_id: &str) -> Result<(Survey, Vec<FieldDescriptor>)> {
        let survey = self.active_survey(public_id).await?;
        let questions = self.questions.list_for_survey(&survey.id).await?;
        Ok((survey, build_fields(&questions)))
    }

    /// Public: validate and persist one submission, returning the new
    /// response identifier.
    ///
    /// Resolution, validation, and the atomic write follow in order; a
    /// validation failure writes nothing.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown public id,
    /// `AppError::Inactive` for a deactivated survey,
    /// `AppError::Validation` naming the offending field, or
    /// `AppError::Db` on storage failure (fully rolled back).
    pub async fn submit(
        &self,
        public_id: &str,
        input: &RawSubmission,
        respondent_addr: Option<String>,
    ) -> Result<String> {
        let survey = self.active_survey(public_id).await?;
        let questions = self.questions.list_for_survey(&survey.id).await?;
        let fields = build_fields(&questions);
        let answers = validate(&fields, input, self.config.max_free_text_len)?;

        let response = SurveyResponse::new(survey.id.clone(), respondent_addr);
        let response = self.responses.create_submission(&response, &answers).await?;
        info!(survey_id = %survey.id, response_id = %response.id, answers = answers.len(), "submission stored");
        Ok(response.id)
    }

    /// Owner-only: aggregate results for a survey.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the caller does not own the
    /// survey, or `AppError::Db` on storage failure.
    pub async fn results(&self, creator_id: &str, survey_id: &str) -> Result<ResultsReport> {
        let survey = self.surveys.get_owned(survey_id, creator_id).await?;
        let questions = self.questions.list_for_survey(&survey.id).await?;
        self.aggregator.aggregate(&survey.id, &questions).await
    }

    /// Public: fetch the stored QR image for a survey, if one was
    /// generated.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown public id, or
    /// `AppError::Db` on storage failure.
    pub async fn qr_image(&self, public_id: &str) -> Result<Option<Vec<u8>>> {
        self.surveys.qr_image(public_id).await
    }

    /// The public survey-taking URL for a survey.
    #[must_use]
    pub fn take_url(&self, survey: &Survey) -> String {
        self.config.take_url(&survey.public_id)
    }

    async fn active_survey(&self, public_id: &str) -> Result<Survey> {
        let survey = self.surveys.get_by_public_id(public_id).await?;
        if !survey.is_active {
            return Err(AppError::Inactive(format!(
                "survey {public_id} is not accepting responses"
            )));
        }
        Ok(survey)
    }
}
