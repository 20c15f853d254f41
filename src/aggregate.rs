//! Results aggregation.
//!
//! Walks a survey's questions in display order and dispatches on kind to
//! the matching response-store query. Recomputed per request — there is
//! no caching at the expected scale.

use crate::models::question::{QuestionDetail, QuestionKind};
use crate::models::results::{QuestionResults, QuestionSummary, ResultsReport};
use crate::persistence::response_repo::ResponseRepo;
use crate::Result;

/// Computes per-question tallies over the response store.
#[derive(Clone)]
pub struct ResultsAggregator {
    responses: ResponseRepo,
}

impl ResultsAggregator {
    /// Create a new aggregator over the given response repository.
    #[must_use]
    pub fn new(responses: ResponseRepo) -> Self {
        Self { responses }
    }

    /// Aggregate results for a survey's questions, in display order.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if any tally query fails.
    pub async fn aggregate(
        &self,
        survey_id: &str,
        questions: &[QuestionDetail],
    ) -> Result<ResultsReport> {
        let total_responses = self.responses.count_for_survey(survey_id).await?;

        let mut results = Vec::with_capacity(questions.len());
        for detail in questions {
            let question = &detail.question;
            let summary = match question.kind {
                QuestionKind::FreeText => QuestionSummary::FreeText {
                    entries: self.responses.text_answers(&question.id).await?,
                },
                QuestionKind::SingleChoice | QuestionKind::MultiChoice => {
                    QuestionSummary::Choices {
                        counts: self.responses.choice_counts(&question.id).await?,
                    }
                }
                QuestionKind::Rating => QuestionSummary::Rating {
                    histogram: self.responses.rating_histogram(&question.id).await?,
                },
            };

            results.push(QuestionResults {
                question_id: question.id.clone(),
                text: question.text.clone(),
                summary,
            });
        }

        Ok(ResultsReport {
            survey_id: survey_id.to_owned(),
            total_responses,
            questions: results,
        })
    }
}
