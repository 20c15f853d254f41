//! Submission validation.
//!
//! Checks raw submitted input against a field descriptor list and
//! produces the answer set to persist. Any violation fails the whole
//! submission with `Validation` naming the offending field — callers
//! write nothing on error.

use std::collections::HashSet;

use crate::models::form::{FieldDescriptor, FieldShape, RawSubmission};
use crate::models::response::NewAnswer;
use crate::{AppError, Result};

/// Validate raw input against the descriptor list.
///
/// Required fields must be present and non-empty; selections must be
/// drawn from the field's own choice set; ratings must parse as an
/// integer within the field's range; free text is trimmed and capped at
/// `max_free_text_len` characters. Unanswered non-required questions
/// yield no answer at all.
///
/// # Errors
///
/// Returns `AppError::Validation` carrying the offending field key on
/// the first violation encountered.
pub fn validate(
    fields: &[FieldDescriptor],
    input: &RawSubmission,
    max_free_text_len: usize,
) -> Result<Vec<NewAnswer>> {
    let mut answers = Vec::with_capacity(fields.len());

    for field in fields {
        let answer = match &field.shape {
            FieldShape::FreeText => validate_free_text(field, input, max_free_text_len)?,
            FieldShape::SingleChoice { options } => {
                let allowed: HashSet<&str> = options.iter().map(|o| o.id.as_str()).collect();
                validate_single_choice(field, input, &allowed)?
            }
            FieldShape::MultiChoice { options } => {
                let allowed: HashSet<&str> = options.iter().map(|o| o.id.as_str()).collect();
                validate_multi_choice(field, input, &allowed)?
            }
            FieldShape::Rating { min, max } => validate_rating(field, input, *min, *max)?,
        };

        if let Some(answer) = answer {
            answers.push(answer);
        }
    }

    Ok(answers)
}

fn missing(field: &FieldDescriptor) -> AppError {
    AppError::validation(&field.key, "this question requires an answer")
}

fn validate_free_text(
    field: &FieldDescriptor,
    input: &RawSubmission,
    max_len: usize,
) -> Result<Option<NewAnswer>> {
    let value = input.first(&field.key).map(str::trim).unwrap_or("");
    if value.is_empty() {
        if field.required {
            return Err(missing(field));
        }
        return Ok(None);
    }
    if value.chars().count() > max_len {
        return Err(AppError::validation(
            &field.key,
            format!("answer exceeds {max_len} characters"),
        ));
    }

    Ok(Some(NewAnswer {
        question_id: field.question_id.clone(),
        text_value: Some(value.to_owned()),
        choice_ids: Vec::new(),
    }))
}

fn validate_single_choice(
    field: &FieldDescriptor,
    input: &RawSubmission,
    allowed: &HashSet<&str>,
) -> Result<Option<NewAnswer>> {
    let values = input.get(&field.key);
    match values {
        [] => {
            if field.required {
                return Err(missing(field));
            }
            Ok(None)
        }
        [value] => {
            if !allowed.contains(value.as_str()) {
                return Err(AppError::validation(
                    &field.key,
                    "selection is not one of this question's choices",
                ));
            }
            Ok(Some(NewAnswer {
                question_id: field.question_id.clone(),
                text_value: None,
                choice_ids: vec![value.clone()],
            }))
        }
        _ => Err(AppError::validation(
            &field.key,
            "this question accepts a single selection",
        )),
    }
}

fn validate_multi_choice(
    field: &FieldDescriptor,
    input: &RawSubmission,
    allowed: &HashSet<&str>,
) -> Result<Option<NewAnswer>> {
    let values = input.get(&field.key);
    if values.is_empty() {
        if field.required {
            return Err(missing(field));
        }
        return Ok(None);
    }

    let mut seen = HashSet::new();
    let mut choice_ids = Vec::with_capacity(values.len());
    for value in values {
        if !allowed.contains(value.as_str()) {
            return Err(AppError::validation(
                &field.key,
                "selection is not one of this question's choices",
            ));
        }
        if seen.insert(value.as_str()) {
            choice_ids.push(value.clone());
        }
    }

    Ok(Some(NewAnswer {
        question_id: field.question_id.clone(),
        text_value: None,
        choice_ids,
    }))
}

fn validate_rating(
    field: &FieldDescriptor,
    input: &RawSubmission,
    min: u8,
    max: u8,
) -> Result<Option<NewAnswer>> {
    let value = input.first(&field.key).map(str::trim).unwrap_or("");
    if value.is_empty() {
        if field.required {
            return Err(missing(field));
        }
        return Ok(None);
    }

    let rating: u8 = value.parse().map_err(|_| {
        AppError::validation(&field.key, format!("rating must be a whole number {min}-{max}"))
    })?;
    if !(min..=max).contains(&rating) {
        return Err(AppError::validation(
            &field.key,
            format!("rating must be between {min} and {max}"),
        ));
    }

    // Ratings are stored as the digit text, same column as free text.
    Ok(Some(NewAnswer {
        question_id: field.question_id.clone(),
        text_value: Some(rating.to_string()),
        choice_ids: Vec::new(),
    }))
}
