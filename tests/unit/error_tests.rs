//! Unit tests for the `AppError` taxonomy.

use survey_engine::AppError;

#[test]
fn display_prefixes_variant() {
    assert_eq!(
        AppError::NotFound("survey x".into()).to_string(),
        "not found: survey x"
    );
    assert_eq!(
        AppError::Inactive("survey y".into()).to_string(),
        "inactive: survey y"
    );
    assert_eq!(AppError::Conflict("dup".into()).to_string(), "conflict: dup");
    assert_eq!(AppError::Db("boom".into()).to_string(), "db: boom");
}

#[test]
fn validation_carries_field_key() {
    let err = AppError::validation("question_42", "required");
    match &err {
        AppError::Validation { field, message } => {
            assert_eq!(field, "question_42");
            assert_eq!(message, "required");
        }
        other => panic!("expected validation error, got {other}"),
    }
    assert_eq!(err.to_string(), "validation: question_42: required");
}

#[test]
fn toml_errors_map_to_config() {
    let parse_err = toml::from_str::<toml::Value>("= broken").expect_err("must fail");
    let err = AppError::from(parse_err);
    assert!(matches!(err, AppError::Config(_)));
}

#[test]
fn plain_sqlx_errors_map_to_db() {
    let err = AppError::from(sqlx::Error::RowNotFound);
    assert!(matches!(err, AppError::Db(_)));
}

#[test]
fn io_errors_map_to_io() {
    let err = AppError::from(std::io::Error::other("disk"));
    assert!(matches!(err, AppError::Io(_)));
}
