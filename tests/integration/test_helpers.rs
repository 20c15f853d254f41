//! Shared fixtures for integration tests.

use std::sync::Arc;

use sqlx::SqlitePool;
use survey_engine::models::question::{NewQuestion, QuestionKind};
use survey_engine::models::survey::{NewSurvey, Survey};
use survey_engine::persistence::db;
use survey_engine::qr::{LinkEncoder, NoopEncoder};
use survey_engine::{EngineConfig, Result, SurveyService};

pub const CREATOR: &str = "creator-1";

/// Encoder returning fixed bytes, standing in for a real QR library.
pub struct FixedEncoder(pub Vec<u8>);

impl LinkEncoder for FixedEncoder {
    fn encode(&self, _url: &str) -> Result<Vec<u8>> {
        Ok(self.0.clone())
    }
}

/// Encoder that always fails, for best-effort behavior tests.
pub struct FailingEncoder;

impl LinkEncoder for FailingEncoder {
    fn encode(&self, _url: &str) -> Result<Vec<u8>> {
        Err(survey_engine::AppError::Io("encoder offline".into()))
    }
}

pub fn test_config() -> EngineConfig {
    EngineConfig::from_toml_str(
        r#"
public_base_url = "https://surveys.example.com"
max_free_text_len = 200
"#,
    )
    .expect("test config")
}

/// Service over a fresh in-memory database, plus the pool for direct
/// row assertions.
pub async fn memory_service() -> (SurveyService, SqlitePool) {
    memory_service_with(Arc::new(NoopEncoder)).await
}

pub async fn memory_service_with(
    encoder: Arc<dyn LinkEncoder>,
) -> (SurveyService, SqlitePool) {
    let pool = db::connect_memory().await.expect("db");
    let service = SurveyService::new(pool.clone(), test_config(), encoder);
    (service, pool)
}

/// Create a survey with one question of each kind. Choice kinds get the
/// given option texts.
pub async fn seeded_survey(service: &SurveyService) -> Survey {
    let survey = service
        .create_survey(
            CREATOR,
            NewSurvey {
                title: "Event feedback".into(),
                description: "Tell us how it went".into(),
            },
        )
        .await
        .expect("create survey");

    let specs = [
        ("What did you enjoy most?", QuestionKind::FreeText, true, vec![]),
        (
            "Favourite colour?",
            QuestionKind::SingleChoice,
            true,
            vec!["Red".to_owned(), "Blue".to_owned()],
        ),
        (
            "Which sessions did you attend?",
            QuestionKind::MultiChoice,
            false,
            vec!["Keynote".to_owned(), "Workshop".to_owned()],
        ),
        ("Overall rating", QuestionKind::Rating, true, vec![]),
    ];
    for (index, (text, kind, required, choices)) in specs.into_iter().enumerate() {
        service
            .add_question(
                CREATOR,
                &survey.id,
                NewQuestion {
                    text: text.to_owned(),
                    kind,
                    position: u32::try_from(index).expect("small index"),
                    required,
                    choices,
                },
            )
            .await
            .expect("add question");
    }

    survey
}

pub async fn count_rows(pool: &SqlitePool, table: &str) -> i64 {
    let sql = format!("SELECT COUNT(*) FROM {table}");
    let (count,): (i64,) = sqlx::query_as(&sql).fetch_one(pool).await.expect("count");
    count
}
