//! Question and choice repository for `SQLite` persistence.
//!
//! All mutations are owner-scoped: a question or choice is only reachable
//! through a survey owned by the calling creator.

use sqlx::SqlitePool;

use crate::models::question::{Choice, Question, QuestionDetail, QuestionKind};
use crate::{AppError, Result};

/// Repository wrapper around `SQLite` for question and choice records.
#[derive(Clone)]
pub struct QuestionRepo {
    pool: SqlitePool,
}

/// Internal row struct for `SQLite` deserialization.
#[derive(sqlx::FromRow)]
struct QuestionRow {
    id: String,
    survey_id: String,
    text: String,
    kind: String,
    position: i64,
    required: i64,
}

impl QuestionRow {
    /// Convert a database row into the domain model.
    fn into_question(self) -> Result<Question> {
        let kind = QuestionKind::parse(&self.kind)?;
        let position = u32::try_from(self.position)
            .map_err(|_| AppError::Db(format!("invalid position: {}", self.position)))?;

        Ok(Question {
            id: self.id,
            survey_id: self.survey_id,
            text: self.text,
            kind,
            position,
            required: self.required != 0,
        })
    }
}

impl QuestionRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new question record.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the insert fails.
    pub async fn create(&self, question: &Question) -> Result<Question> {
        sqlx::query(
            "INSERT INTO question (id, survey_id, text, kind, position, required)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(&question.id)
        .bind(&question.survey_id)
        .bind(&question.text)
        .bind(question.kind.as_str())
        .bind(i64::from(question.position))
        .bind(i64::from(question.required))
        .execute(&self.pool)
        .await?;

        Ok(question.clone())
    }

    /// Retrieve a question by identifier, scoped to the creator of its
    /// owning survey.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no owned question matches, or
    /// `AppError::Db` if the query fails.
    pub async fn get_owned(&self, id: &str, creator_id: &str) -> Result<Question> {
        let row: Option<QuestionRow> = sqlx::query_as(
            "SELECT q.id, q.survey_id, q.text, q.kind, q.position, q.required
             FROM question q
             JOIN survey s ON s.id = q.survey_id
             WHERE q.id = ?1 AND s.creator_id = ?2",
        )
        .bind(id)
        .bind(creator_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(QuestionRow::into_question)
            .transpose()?
            .ok_or_else(|| AppError::NotFound(format!("question {id} not found")))
    }

    /// List a survey's questions with their choices attached, ordered by
    /// `position` ascending with ties broken by insertion order.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if a query fails.
    pub async fn list_for_survey(&self, survey_id: &str) -> Result<Vec<QuestionDetail>> {
        let rows: Vec<QuestionRow> = sqlx::query_as(
            "SELECT id, survey_id, text, kind, position, required
             FROM question WHERE survey_id = ?1
             ORDER BY position ASC, rowid ASC",
        )
        .bind(survey_id)
        .fetch_all(&self.pool)
        .await?;

        let mut details = Vec::with_capacity(rows.len());
        for row in rows {
            let question = row.into_question()?;
            let choices = if question.kind.uses_choices() {
                self.choices_for_question(&question.id).await?
            } else {
                Vec::new()
            };
            details.push(QuestionDetail { question, choices });
        }
        Ok(details)
    }

    /// List a question's choices in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn choices_for_question(&self, question_id: &str) -> Result<Vec<Choice>> {
        let rows: Vec<(String, String, String)> = sqlx::query_as(
            "SELECT id, question_id, text FROM choice
             WHERE question_id = ?1 ORDER BY rowid ASC",
        )
        .bind(question_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, question_id, text)| Choice {
                id,
                question_id,
                text,
            })
            .collect())
    }

    /// Delete an owned question together with its choices and any answers
    /// that reference it. Other questions are untouched.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no owned question matches, or
    /// `AppError::Db` if a delete fails.
    pub async fn delete(&self, id: &str, creator_id: &str) -> Result<()> {
        self.get_owned(id, creator_id).await?;

        // Explicit dependency order: answer links, answers, choices,
        // question. Keeps the RESTRICT rule on answer_choice.choice_id
        // from firing against rows this delete is itself removing.
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "DELETE FROM answer_choice WHERE answer_id IN
             (SELECT id FROM answer WHERE question_id = ?1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        sqlx::query("DELETE FROM answer WHERE question_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM choice WHERE question_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM question WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Insert a new choice record.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the insert fails.
    pub async fn create_choice(&self, choice: &Choice) -> Result<Choice> {
        sqlx::query("INSERT INTO choice (id, question_id, text) VALUES (?1, ?2, ?3)")
            .bind(&choice.id)
            .bind(&choice.question_id)
            .bind(&choice.text)
            .execute(&self.pool)
            .await?;

        Ok(choice.clone())
    }

    /// Delete an owned choice, unless any past answer references it.
    ///
    /// Historical results are never silently corrupted: a referenced
    /// choice stays put and the caller gets `Conflict`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no owned choice matches,
    /// `AppError::Conflict` if the choice is answer-referenced, or
    /// `AppError::Db` if a query fails.
    pub async fn delete_choice(&self, id: &str, creator_id: &str) -> Result<()> {
        let owned: Option<(String,)> = sqlx::query_as(
            "SELECT c.id FROM choice c
             JOIN question q ON q.id = c.question_id
             JOIN survey s ON s.id = q.survey_id
             WHERE c.id = ?1 AND s.creator_id = ?2",
        )
        .bind(id)
        .bind(creator_id)
        .fetch_optional(&self.pool)
        .await?;
        if owned.is_none() {
            return Err(AppError::NotFound(format!("choice {id} not found")));
        }

        let (referenced,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM answer_choice WHERE choice_id = ?1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        if referenced > 0 {
            return Err(AppError::Conflict(format!(
                "choice {id} is referenced by {referenced} answer(s)"
            )));
        }

        sqlx::query("DELETE FROM choice WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
