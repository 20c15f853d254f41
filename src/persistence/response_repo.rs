//! Response and answer repository for `SQLite` persistence.
//!
//! Submission writes are transactional: the response row, every answer
//! row, and every choice link land together or not at all, so concurrent
//! submissions never interleave partially written rows.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::form::{RATING_MAX, RATING_MIN};
use crate::models::response::{Answer, NewAnswer, SurveyResponse};
use crate::models::results::ChoiceCount;
use crate::Result;

/// Repository wrapper around `SQLite` for response and answer records.
#[derive(Clone)]
pub struct ResponseRepo {
    pool: SqlitePool,
}

impl ResponseRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist one submission atomically: the response row plus every
    /// answer row and choice link, in a single transaction.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if any insert fails; the transaction rolls
    /// back and no rows remain.
    pub async fn create_submission(
        &self,
        response: &SurveyResponse,
        answers: &[NewAnswer],
    ) -> Result<SurveyResponse> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO response (id, survey_id, submitted_at, respondent_addr)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&response.id)
        .bind(&response.survey_id)
        .bind(response.submitted_at.to_rfc3339())
        .bind(&response.respondent_addr)
        .execute(&mut *tx)
        .await?;

        for answer in answers {
            let answer_id = Uuid::new_v4().to_string();
            sqlx::query(
                "INSERT INTO answer (id, response_id, question_id, text_value)
                 VALUES (?1, ?2, ?3, ?4)",
            )
            .bind(&answer_id)
            .bind(&response.id)
            .bind(&answer.question_id)
            .bind(&answer.text_value)
            .execute(&mut *tx)
            .await?;

            for choice_id in &answer.choice_ids {
                sqlx::query("INSERT INTO answer_choice (answer_id, choice_id) VALUES (?1, ?2)")
                    .bind(&answer_id)
                    .bind(choice_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;
        Ok(response.clone())
    }

    /// Read back one response's answers with their choice links, in
    /// insertion order.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if a query fails.
    pub async fn answers_for_response(&self, response_id: &str) -> Result<Vec<Answer>> {
        let rows: Vec<(String, String, String, Option<String>)> = sqlx::query_as(
            "SELECT id, response_id, question_id, text_value FROM answer
             WHERE response_id = ?1 ORDER BY rowid ASC",
        )
        .bind(response_id)
        .fetch_all(&self.pool)
        .await?;

        let mut answers = Vec::with_capacity(rows.len());
        for (id, response_id, question_id, text_value) in rows {
            let links: Vec<(String,)> = sqlx::query_as(
                "SELECT choice_id FROM answer_choice WHERE answer_id = ?1 ORDER BY rowid ASC",
            )
            .bind(&id)
            .fetch_all(&self.pool)
            .await?;

            answers.push(Answer {
                id,
                response_id,
                question_id,
                text_value,
                choice_ids: links.into_iter().map(|(choice_id,)| choice_id).collect(),
            });
        }
        Ok(answers)
    }

    /// Count responses collected for a survey.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn count_for_survey(&self, survey_id: &str) -> Result<u64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM response WHERE survey_id = ?1")
                .bind(survey_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// All non-empty free-text answer values for a question, in
    /// submission order.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn text_answers(&self, question_id: &str) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT text_value FROM answer
             WHERE question_id = ?1 AND text_value IS NOT NULL AND text_value != ''
             ORDER BY rowid ASC",
        )
        .bind(question_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(value,)| value).collect())
    }

    /// Per-choice answer counts for a question, in choice insertion
    /// order. Counts are independent: a multi-choice answer contributes
    /// to every choice it selected.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn choice_counts(&self, question_id: &str) -> Result<Vec<ChoiceCount>> {
        let rows: Vec<(String, String, i64)> = sqlx::query_as(
            "SELECT c.id, c.text, COUNT(ac.answer_id)
             FROM choice c
             LEFT JOIN answer_choice ac ON ac.choice_id = c.id
             WHERE c.question_id = ?1
             GROUP BY c.id
             ORDER BY c.rowid ASC",
        )
        .bind(question_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(choice_id, text, count)| ChoiceCount {
                choice_id,
                text,
                count: u64::try_from(count).unwrap_or(0),
            })
            .collect())
    }

    /// Five-bucket rating histogram for a question: `histogram[i]` counts
    /// answers whose stored value equals rating `i + 1`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn rating_histogram(&self, question_id: &str) -> Result<[u64; 5]> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT text_value, COUNT(*) FROM answer
             WHERE question_id = ?1 AND text_value IS NOT NULL
             GROUP BY text_value",
        )
        .bind(question_id)
        .fetch_all(&self.pool)
        .await?;

        let mut histogram = [0_u64; 5];
        for (value, count) in rows {
            if let Ok(rating) = value.parse::<u8>() {
                if (RATING_MIN..=RATING_MAX).contains(&rating) {
                    histogram[usize::from(rating - RATING_MIN)] =
                        u64::try_from(count).unwrap_or(0);
                }
            }
        }
        Ok(histogram)
    }
}
