//! Survey repository for `SQLite` persistence.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::survey::{Survey, SurveyOverview, SurveyUpdate};
use crate::{AppError, Result};

/// Repository wrapper around `SQLite` for survey records.
#[derive(Clone)]
pub struct SurveyRepo {
    pool: SqlitePool,
}

/// Internal row struct for `SQLite` deserialization.
#[derive(sqlx::FromRow)]
struct SurveyRow {
    id: String,
    title: String,
    description: String,
    creator_id: String,
    is_active: i64,
    public_id: String,
    created_at: String,
}

impl SurveyRow {
    /// Convert a database row into the domain model.
    fn into_survey(self) -> Result<Survey> {
        let created_at = chrono::DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| AppError::Db(format!("invalid created_at: {e}")))?
            .with_timezone(&Utc);

        Ok(Survey {
            id: self.id,
            title: self.title,
            description: self.description,
            creator_id: self.creator_id,
            is_active: self.is_active != 0,
            public_id: self.public_id,
            created_at,
        })
    }
}

impl SurveyRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new survey record.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Conflict` if the public identifier collides with
    /// an existing survey, `AppError::Db` on any other insert failure.
    pub async fn create(&self, survey: &Survey) -> Result<Survey> {
        sqlx::query(
            "INSERT INTO survey (id, title, description, creator_id, is_active, public_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&survey.id)
        .bind(&survey.title)
        .bind(&survey.description)
        .bind(&survey.creator_id)
        .bind(i64::from(survey.is_active))
        .bind(&survey.public_id)
        .bind(survey.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(survey.clone())
    }

    /// Retrieve a survey by identifier, scoped to its creator.
    ///
    /// A survey owned by someone else is indistinguishable from a missing
    /// one: both return `NotFound`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no owned survey matches, or
    /// `AppError::Db` if the query fails.
    pub async fn get_owned(&self, id: &str, creator_id: &str) -> Result<Survey> {
        let row: Option<SurveyRow> = sqlx::query_as(
            "SELECT id, title, description, creator_id, is_active, public_id, created_at
             FROM survey WHERE id = ?1 AND creator_id = ?2",
        )
        .bind(id)
        .bind(creator_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(SurveyRow::into_survey)
            .transpose()?
            .ok_or_else(|| AppError::NotFound(format!("survey {id} not found")))
    }

    /// Retrieve a survey by its public identifier.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no survey matches, or
    /// `AppError::Db` if the query fails.
    pub async fn get_by_public_id(&self, public_id: &str) -> Result<Survey> {
        let row: Option<SurveyRow> = sqlx::query_as(
            "SELECT id, title, description, creator_id, is_active, public_id, created_at
             FROM survey WHERE public_id = ?1",
        )
        .bind(public_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(SurveyRow::into_survey)
            .transpose()?
            .ok_or_else(|| AppError::NotFound(format!("survey {public_id} not found")))
    }

    /// Apply a partial update to an owned survey. The public identifier
    /// is never touched.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no owned survey matches, or
    /// `AppError::Db` if the update fails.
    pub async fn update(
        &self,
        id: &str,
        creator_id: &str,
        update: &SurveyUpdate,
    ) -> Result<Survey> {
        let mut current = self.get_owned(id, creator_id).await?;
        if let Some(title) = &update.title {
            current.title.clone_from(title);
        }
        if let Some(description) = &update.description {
            current.description.clone_from(description);
        }
        if let Some(is_active) = update.is_active {
            current.is_active = is_active;
        }

        sqlx::query("UPDATE survey SET title = ?1, description = ?2, is_active = ?3 WHERE id = ?4")
            .bind(&current.title)
            .bind(&current.description)
            .bind(i64::from(current.is_active))
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(current)
    }

    /// Delete an owned survey and everything it transitively owns:
    /// questions, choices, responses, answers, and choice links.
    ///
    /// The deletes run in dependency order inside one transaction so the
    /// RESTRICT rule on `answer_choice.choice_id` never fires against
    /// rows that are themselves being removed.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no owned survey matches, or
    /// `AppError::Db` if any delete fails.
    pub async fn delete(&self, id: &str, creator_id: &str) -> Result<()> {
        self.get_owned(id, creator_id).await?;

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "DELETE FROM answer_choice WHERE answer_id IN
             (SELECT a.id FROM answer a
              JOIN response r ON r.id = a.response_id WHERE r.survey_id = ?1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        sqlx::query(
            "DELETE FROM answer WHERE response_id IN
             (SELECT id FROM response WHERE survey_id = ?1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        sqlx::query("DELETE FROM response WHERE survey_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            "DELETE FROM choice WHERE question_id IN
             (SELECT id FROM question WHERE survey_id = ?1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        sqlx::query("DELETE FROM question WHERE survey_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM survey WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// List a creator's surveys with their response counts, newest first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn list_for_creator(&self, creator_id: &str) -> Result<Vec<SurveyOverview>> {
        let rows: Vec<(String, String, String, String, i64, String, String, i64)> =
            sqlx::query_as(
                "SELECT s.id, s.title, s.description, s.creator_id, s.is_active,
                        s.public_id, s.created_at, COUNT(r.id)
                 FROM survey s
                 LEFT JOIN response r ON r.survey_id = s.id
                 WHERE s.creator_id = ?1
                 GROUP BY s.id
                 ORDER BY s.created_at DESC",
            )
            .bind(creator_id)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(
                |(id, title, description, creator_id, is_active, public_id, created_at, count)| {
                    let survey = SurveyRow {
                        id,
                        title,
                        description,
                        creator_id,
                        is_active,
                        public_id,
                        created_at,
                    }
                    .into_survey()?;
                    Ok(SurveyOverview {
                        survey,
                        response_count: u64::try_from(count).unwrap_or(0),
                    })
                },
            )
            .collect()
    }

    /// Store the generated QR image bytes for a survey.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the update fails.
    pub async fn store_qr_image(&self, id: &str, image: &[u8]) -> Result<()> {
        sqlx::query("UPDATE survey SET qr_image = ?1 WHERE id = ?2")
            .bind(image)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Fetch the stored QR image for a survey by public identifier.
    ///
    /// Returns `Ok(None)` when the survey exists but no image was ever
    /// generated.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no survey matches, or
    /// `AppError::Db` if the query fails.
    pub async fn qr_image(&self, public_id: &str) -> Result<Option<Vec<u8>>> {
        let row: Option<(Option<Vec<u8>>,)> =
            sqlx::query_as("SELECT qr_image FROM survey WHERE public_id = ?1")
                .bind(public_id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(|(image,)| image)
            .ok_or_else(|| AppError::NotFound(format!("survey {public_id} not found")))
    }
}
