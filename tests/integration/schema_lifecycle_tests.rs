//! Schema store lifecycle through the service layer.

use survey_engine::models::question::{NewQuestion, QuestionKind};
use survey_engine::models::survey::{NewSurvey, SurveyUpdate};
use survey_engine::AppError;

use super::test_helpers::{count_rows, memory_service, seeded_survey, CREATOR};

#[tokio::test]
async fn deleting_a_question_is_reflected_in_the_next_form_build() {
    let (service, _) = memory_service().await;
    let survey = seeded_survey(&service).await;

    let detail = service.survey_detail(CREATOR, &survey.id).await.expect("detail");
    assert_eq!(detail.questions.len(), 4);
    let doomed = detail.questions[1].question.id.clone();

    service.delete_question(CREATOR, &doomed).await.expect("delete");

    let (_, fields) = service.survey_form(&survey.public_id).await.expect("form");
    assert_eq!(fields.len(), 3);
    assert!(fields.iter().all(|f| f.question_id != doomed));
}

#[tokio::test]
async fn question_deletion_is_owner_scoped() {
    let (service, _) = memory_service().await;
    let survey = seeded_survey(&service).await;
    let detail = service.survey_detail(CREATOR, &survey.id).await.expect("detail");

    let result = service
        .delete_question("impostor", &detail.questions[0].question.id)
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn add_question_with_inline_choices_skips_blanks() {
    let (service, _) = memory_service().await;
    let survey = service
        .create_survey(
            CREATOR,
            NewSurvey {
                title: "Quick poll".into(),
                description: String::new(),
            },
        )
        .await
        .expect("create");

    let question = service
        .add_question(
            CREATOR,
            &survey.id,
            NewQuestion {
                text: "Pick one".into(),
                kind: QuestionKind::SingleChoice,
                position: 0,
                required: true,
                choices: vec!["Yes".into(), "  ".into(), "No".into()],
            },
        )
        .await
        .expect("add question");

    let detail = service.survey_detail(CREATOR, &survey.id).await.expect("detail");
    let added = detail
        .questions
        .iter()
        .find(|d| d.question.id == question.id)
        .expect("question present");
    let texts: Vec<&str> = added.choices.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, ["Yes", "No"]);
}

#[tokio::test]
async fn choices_on_non_choice_kinds_are_rejected() {
    let (service, _) = memory_service().await;
    let survey = seeded_survey(&service).await;
    let detail = service.survey_detail(CREATOR, &survey.id).await.expect("detail");
    let rating = detail
        .questions
        .iter()
        .find(|d| d.question.kind == QuestionKind::Rating)
        .expect("rating question");

    let result = service
        .add_choice(CREATOR, &rating.question.id, "Excellent")
        .await;
    assert!(matches!(result, Err(AppError::Validation { .. })));
}

#[tokio::test]
async fn empty_titles_and_question_texts_are_rejected() {
    let (service, _) = memory_service().await;

    let result = service
        .create_survey(
            CREATOR,
            NewSurvey {
                title: "   ".into(),
                description: String::new(),
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::Validation { .. })));

    let survey = seeded_survey(&service).await;
    let result = service
        .add_question(
            CREATOR,
            &survey.id,
            NewQuestion {
                text: String::new(),
                kind: QuestionKind::FreeText,
                position: 0,
                required: false,
                choices: vec![],
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::Validation { .. })));
}

#[tokio::test]
async fn update_cannot_touch_the_public_id() {
    let (service, _) = memory_service().await;
    let survey = seeded_survey(&service).await;

    let updated = service
        .update_survey(
            CREATOR,
            &survey.id,
            SurveyUpdate {
                title: Some("Renamed".into()),
                description: Some("New blurb".into()),
                is_active: Some(false),
            },
        )
        .await
        .expect("update");

    assert_eq!(updated.public_id, survey.public_id);
    assert_eq!(updated.title, "Renamed");
    assert!(!updated.is_active);
}

#[tokio::test]
async fn dashboard_lists_only_the_callers_surveys() {
    let (service, _) = memory_service().await;
    seeded_survey(&service).await;
    service
        .create_survey(
            "other-creator",
            NewSurvey {
                title: "Not yours".into(),
                description: String::new(),
            },
        )
        .await
        .expect("create");

    let mine = service.list_surveys(CREATOR).await.expect("list");
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].response_count, 0);
}

#[tokio::test]
async fn deleting_a_survey_removes_every_owned_row() {
    let (service, pool) = memory_service().await;
    let survey = seeded_survey(&service).await;

    service.delete_survey(CREATOR, &survey.id).await.expect("delete");

    for table in ["survey", "question", "choice", "response", "answer", "answer_choice"] {
        assert_eq!(count_rows(&pool, table).await, 0, "{table} not emptied");
    }
}
