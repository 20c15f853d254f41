//! `SQLite` schema bootstrap logic.
//!
//! All table definitions use `CREATE TABLE IF NOT EXISTS` — safe to
//! re-run on every connect. Produces a convergent result.

use sqlx::SqlitePool;

use crate::Result;

/// Apply all table definitions to the connected `SQLite` database.
///
/// Cascade topology: deleting a survey removes its questions, choices,
/// responses, answers, and choice links; deleting a question removes its
/// choices. `answer_choice.choice_id` RESTRICTs instead — a choice that
/// any answer references cannot be deleted, preserving past results.
///
/// # Errors
///
/// Returns `AppError::Db` if any DDL statement fails.
pub async fn bootstrap_schema(pool: &SqlitePool) -> Result<()> {
    let ddl = r"
CREATE TABLE IF NOT EXISTS survey (
    id              TEXT PRIMARY KEY NOT NULL,
    title           TEXT NOT NULL,
    description     TEXT NOT NULL DEFAULT '',
    creator_id      TEXT NOT NULL,
    is_active       INTEGER NOT NULL DEFAULT 1,
    public_id       TEXT NOT NULL UNIQUE,
    qr_image        BLOB,
    created_at      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS question (
    id              TEXT PRIMARY KEY NOT NULL,
    survey_id       TEXT NOT NULL REFERENCES survey(id) ON DELETE CASCADE,
    text            TEXT NOT NULL,
    kind            TEXT NOT NULL CHECK(kind IN ('free_text','single_choice','multi_choice','rating')),
    position        INTEGER NOT NULL DEFAULT 0 CHECK(position >= 0),
    required        INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS choice (
    id              TEXT PRIMARY KEY NOT NULL,
    question_id     TEXT NOT NULL REFERENCES question(id) ON DELETE CASCADE,
    text            TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS response (
    id              TEXT PRIMARY KEY NOT NULL,
    survey_id       TEXT NOT NULL REFERENCES survey(id) ON DELETE CASCADE,
    submitted_at    TEXT NOT NULL,
    respondent_addr TEXT
);

CREATE TABLE IF NOT EXISTS answer (
    id              TEXT PRIMARY KEY NOT NULL,
    response_id     TEXT NOT NULL REFERENCES response(id) ON DELETE CASCADE,
    question_id     TEXT NOT NULL REFERENCES question(id) ON DELETE CASCADE,
    text_value      TEXT
);

CREATE TABLE IF NOT EXISTS answer_choice (
    answer_id       TEXT NOT NULL REFERENCES answer(id) ON DELETE CASCADE,
    choice_id       TEXT NOT NULL REFERENCES choice(id) ON DELETE RESTRICT,
    PRIMARY KEY (answer_id, choice_id)
);

CREATE INDEX IF NOT EXISTS idx_question_survey ON question(survey_id, position);
CREATE INDEX IF NOT EXISTS idx_choice_question ON choice(question_id);
CREATE INDEX IF NOT EXISTS idx_response_survey ON response(survey_id);
CREATE INDEX IF NOT EXISTS idx_answer_question ON answer(question_id);
CREATE INDEX IF NOT EXISTS idx_answer_response ON answer(response_id);
";

    sqlx::raw_sql(ddl).execute(pool).await?;
    Ok(())
}
