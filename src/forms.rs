//! Dynamic form builder.
//!
//! Turns a survey's ordered questions into the field descriptor list any
//! presentation layer consumes. Pure: no I/O beyond the schema already
//! read, and idempotent for an unmodified survey.

use crate::models::form::{
    field_key, ChoiceOption, FieldDescriptor, FieldShape, RATING_MAX, RATING_MIN,
};
use crate::models::question::{QuestionDetail, QuestionKind};

/// Build one field descriptor per question, in display order.
///
/// The kind-to-shape mapping here and the kind-to-summary mapping in the
/// aggregator are both single `match`es over [`QuestionKind`], so
/// validation and aggregation cannot drift apart.
#[must_use]
pub fn build_fields(questions: &[QuestionDetail]) -> Vec<FieldDescriptor> {
    questions
        .iter()
        .map(|detail| {
            let question = &detail.question;
            let shape = match question.kind {
                QuestionKind::FreeText => FieldShape::FreeText,
                QuestionKind::SingleChoice => FieldShape::SingleChoice {
                    options: detail.choices.iter().map(ChoiceOption::from).collect(),
                },
                QuestionKind::MultiChoice => FieldShape::MultiChoice {
                    options: detail.choices.iter().map(ChoiceOption::from).collect(),
                },
                // The rating scale is fixed, never read from stored choices.
                QuestionKind::Rating => FieldShape::Rating {
                    min: RATING_MIN,
                    max: RATING_MAX,
                },
            };

            FieldDescriptor {
                key: field_key(&question.id),
                question_id: question.id.clone(),
                label: question.text.clone(),
                required: question.required,
                shape,
            }
        })
        .collect()
}
