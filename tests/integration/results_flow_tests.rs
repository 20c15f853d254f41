//! Aggregation tests over real submissions.

use survey_engine::models::form::{FieldShape, RawSubmission};
use survey_engine::models::question::QuestionKind;
use survey_engine::models::results::QuestionSummary;
use survey_engine::AppError;

use super::test_helpers::{memory_service, seeded_survey, CREATOR};

/// Submit one response answering only the given (key, values) pairs.
async fn submit(
    service: &survey_engine::SurveyService,
    public_id: &str,
    free_text: &str,
    single: &str,
    multi: &[String],
    rating: &str,
) {
    let (_, fields) = service.survey_form(public_id).await.expect("form");
    let mut input = RawSubmission::new();
    for field in &fields {
        match &field.shape {
            FieldShape::FreeText => input.set(field.key.clone(), free_text),
            FieldShape::SingleChoice { .. } => input.set(field.key.clone(), single),
            FieldShape::MultiChoice { .. } => {
                input.set_all(field.key.clone(), multi.to_vec());
            }
            FieldShape::Rating { .. } => input.set(field.key.clone(), rating),
        }
    }
    service.submit(public_id, &input, None).await.expect("submit");
}

fn choice_ids(fields: &[survey_engine::models::form::FieldDescriptor]) -> (String, String) {
    for field in fields {
        if let FieldShape::SingleChoice { options } = &field.shape {
            return (options[0].id.clone(), options[1].id.clone());
        }
    }
    panic!("seeded survey has a single choice question");
}

#[tokio::test]
async fn choice_counts_and_total_responses() {
    let (service, _) = memory_service().await;
    let survey = seeded_survey(&service).await;
    let (_, fields) = service.survey_form(&survey.public_id).await.expect("form");
    let (red, blue) = choice_ids(&fields);

    for _ in 0..3 {
        submit(&service, &survey.public_id, "loved it", &red, &[], "5").await;
    }
    submit(&service, &survey.public_id, "fine", &blue, &[], "3").await;

    let report = service.results(CREATOR, &survey.id).await.expect("results");
    assert_eq!(report.total_responses, 4);

    let detail = service.survey_detail(CREATOR, &survey.id).await.expect("detail");
    let single_id = detail
        .questions
        .iter()
        .find(|d| d.question.kind == QuestionKind::SingleChoice)
        .map(|d| d.question.id.clone())
        .expect("single choice question");
    let single = report
        .questions
        .iter()
        .find(|q| q.question_id == single_id)
        .and_then(|q| match &q.summary {
            QuestionSummary::Choices { counts } => Some(counts),
            _ => None,
        })
        .expect("single choice summary");
    assert_eq!(single[0].text, "Red");
    assert_eq!(single[0].count, 3);
    assert_eq!(single[1].text, "Blue");
    assert_eq!(single[1].count, 1);
}

#[tokio::test]
async fn rating_histogram_buckets_answers() {
    let (service, _) = memory_service().await;
    let survey = seeded_survey(&service).await;
    let (_, fields) = service.survey_form(&survey.public_id).await.expect("form");
    let (red, _) = choice_ids(&fields);

    for rating in ["5", "5", "3", "1"] {
        submit(&service, &survey.public_id, "ok", &red, &[], rating).await;
    }

    let report = service.results(CREATOR, &survey.id).await.expect("results");
    let histogram = report
        .questions
        .iter()
        .find_map(|q| match &q.summary {
            QuestionSummary::Rating { histogram } => Some(*histogram),
            _ => None,
        })
        .expect("rating summary");
    assert_eq!(histogram, [1, 0, 1, 0, 2]);
}

#[tokio::test]
async fn free_text_summary_lists_submitted_values() {
    let (service, _) = memory_service().await;
    let survey = seeded_survey(&service).await;
    let (_, fields) = service.survey_form(&survey.public_id).await.expect("form");
    let (red, _) = choice_ids(&fields);

    submit(&service, &survey.public_id, "great venue", &red, &[], "4").await;
    submit(&service, &survey.public_id, "too cold", &red, &[], "2").await;

    let report = service.results(CREATOR, &survey.id).await.expect("results");
    let entries = report
        .questions
        .iter()
        .find_map(|q| match &q.summary {
            QuestionSummary::FreeText { entries } => Some(entries.clone()),
            _ => None,
        })
        .expect("free text summary");
    assert_eq!(entries, ["great venue", "too cold"]);
}

#[tokio::test]
async fn multi_choice_answers_increment_every_selected_choice() {
    let (service, _) = memory_service().await;
    let survey = seeded_survey(&service).await;
    let (_, fields) = service.survey_form(&survey.public_id).await.expect("form");
    let (red, _) = choice_ids(&fields);
    let multi_options: Vec<String> = fields
        .iter()
        .find_map(|f| match &f.shape {
            FieldShape::MultiChoice { options } => {
                Some(options.iter().map(|o| o.id.clone()).collect())
            }
            _ => None,
        })
        .expect("multi choice field");

    submit(&service, &survey.public_id, "x", &red, &multi_options, "4").await;
    submit(
        &service,
        &survey.public_id,
        "y",
        &red,
        &multi_options[..1],
        "4",
    )
    .await;

    let report = service.results(CREATOR, &survey.id).await.expect("results");
    let questions = service.survey_detail(CREATOR, &survey.id).await.expect("detail");
    let multi_question = questions
        .questions
        .iter()
        .find(|d| d.question.kind == QuestionKind::MultiChoice)
        .expect("multi question");

    let counts = report
        .questions
        .iter()
        .find(|q| q.question_id == multi_question.question.id)
        .and_then(|q| match &q.summary {
            QuestionSummary::Choices { counts } => Some(counts.clone()),
            _ => None,
        })
        .expect("multi choice summary");
    // Both responses picked the first option, one also picked the second.
    assert_eq!(counts[0].count, 2);
    assert_eq!(counts[1].count, 1);
}

#[tokio::test]
async fn results_follow_question_display_order() {
    let (service, _) = memory_service().await;
    let survey = seeded_survey(&service).await;

    let report = service.results(CREATOR, &survey.id).await.expect("results");
    let detail = service.survey_detail(CREATOR, &survey.id).await.expect("detail");

    let report_ids: Vec<&str> = report.questions.iter().map(|q| q.question_id.as_str()).collect();
    let detail_ids: Vec<&str> = detail
        .questions
        .iter()
        .map(|d| d.question.id.as_str())
        .collect();
    assert_eq!(report_ids, detail_ids);
}

#[tokio::test]
async fn results_are_owner_only() {
    let (service, _) = memory_service().await;
    let survey = seeded_survey(&service).await;

    let result = service.results("someone-else", &survey.id).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn empty_survey_reports_zero_responses() {
    let (service, _) = memory_service().await;
    let survey = seeded_survey(&service).await;

    let report = service.results(CREATOR, &survey.id).await.expect("results");
    assert_eq!(report.total_responses, 0);
    assert_eq!(report.questions.len(), 4);
}
