mod common;

use learnbase::model::entity::{Submission, SubmissionCreate};
use learnbase::model::{CrudRepository, DatabaseError, GradingError};
use uuid::Uuid;

use crate::common::{
    manager, seed_choice, seed_course, seed_enrollment, seed_lesson, seed_question,
    setup_test_db,
};

#[tokio::test]
async fn submission_scores_through_the_whole_model() {
    let Some(db) = setup_test_db().await else {
        return;
    };
    let mm = manager(&db);

    let course = seed_course(&mm, "Graded course").await;
    let lesson = seed_lesson(&mm, course.id(), 0).await;
    let question = seed_question(&mm, lesson.id(), 10).await;
    let a = seed_choice(&mm, question.id(), "A", true).await;
    let _b = seed_choice(&mm, question.id(), "B", false).await;
    let _c = seed_choice(&mm, question.id(), "C", false).await;

    let enrollment = seed_enrollment(&mm, course.id(), Uuid::new_v4()).await;
    let submission = Submission::create(
        &mm,
        SubmissionCreate {
            enrollment_id: enrollment.id(),
        },
    )
    .await
    .unwrap();
    submission.select_choice(&mm, a.id()).await.unwrap();

    let selected = submission.selected_choice_ids(&mm).await.unwrap();
    let score = question.score(&mm, &selected).await.unwrap();
    assert_eq!(score.earned, 10.0);
    assert_eq!(score.max, 10);
}

#[tokio::test]
async fn empty_submission_still_earns_the_unselected_incorrect_choices() {
    let Some(db) = setup_test_db().await else {
        return;
    };
    let mm = manager(&db);

    let course = seed_course(&mm, "Partial course").await;
    let lesson = seed_lesson(&mm, course.id(), 0).await;
    let question = seed_question(&mm, lesson.id(), 10).await;
    seed_choice(&mm, question.id(), "A", true).await;
    seed_choice(&mm, question.id(), "B", false).await;
    seed_choice(&mm, question.id(), "C", false).await;

    let enrollment = seed_enrollment(&mm, course.id(), Uuid::new_v4()).await;
    let submission = Submission::create(
        &mm,
        SubmissionCreate {
            enrollment_id: enrollment.id(),
        },
    )
    .await
    .unwrap();

    let selected = submission.selected_choice_ids(&mm).await.unwrap();
    assert!(selected.is_empty());

    let score = question.score(&mm, &selected).await.unwrap();
    assert!((score.earned - 10.0 * 2.0 / 3.0).abs() < 1e-9);
    assert_eq!(score.max, 10);
}

#[tokio::test]
async fn scoring_a_question_without_choices_is_an_error() {
    let Some(db) = setup_test_db().await else {
        return;
    };
    let mm = manager(&db);

    let course = seed_course(&mm, "Empty quiz").await;
    let lesson = seed_lesson(&mm, course.id(), 0).await;
    let question = seed_question(&mm, lesson.id(), 4).await;

    let result = question.score(&mm, &Default::default()).await;
    match result {
        Err(DatabaseError::Grading(GradingError::NoChoices(id))) => {
            assert_eq!(id, question.id());
        }
        other => panic!("expected NoChoices, got {other:?}"),
    }
}

#[tokio::test]
async fn selections_from_other_questions_do_not_leak() {
    let Some(db) = setup_test_db().await else {
        return;
    };
    let mm = manager(&db);

    let course = seed_course(&mm, "Two quizzes").await;
    let lesson = seed_lesson(&mm, course.id(), 0).await;
    let q1 = seed_question(&mm, lesson.id(), 10).await;
    let q1_right = seed_choice(&mm, q1.id(), "A", true).await;
    let q2 = seed_question(&mm, lesson.id(), 10).await;
    let q2_wrong = seed_choice(&mm, q2.id(), "X", false).await;

    let enrollment = seed_enrollment(&mm, course.id(), Uuid::new_v4()).await;
    let submission = Submission::create(
        &mm,
        SubmissionCreate {
            enrollment_id: enrollment.id(),
        },
    )
    .await
    .unwrap();
    submission.select_choice(&mm, q1_right.id()).await.unwrap();
    submission.select_choice(&mm, q2_wrong.id()).await.unwrap();

    let selected = submission.selected_choice_ids(&mm).await.unwrap();

    // q1: its only choice is correct and selected
    let s1 = q1.score(&mm, &selected).await.unwrap();
    assert_eq!(s1.earned, 10.0);

    // q2: its only choice is incorrect and selected
    let s2 = q2.score(&mm, &selected).await.unwrap();
    assert_eq!(s2.earned, 0.0);
}

#[tokio::test]
async fn deselecting_a_choice_updates_the_selection() {
    let Some(db) = setup_test_db().await else {
        return;
    };
    let mm = manager(&db);

    let course = seed_course(&mm, "Changed mind").await;
    let lesson = seed_lesson(&mm, course.id(), 0).await;
    let question = seed_question(&mm, lesson.id(), 2).await;
    let choice = seed_choice(&mm, question.id(), "A", true).await;

    let enrollment = seed_enrollment(&mm, course.id(), Uuid::new_v4()).await;
    let submission = Submission::create(
        &mm,
        SubmissionCreate {
            enrollment_id: enrollment.id(),
        },
    )
    .await
    .unwrap();

    submission.select_choice(&mm, choice.id()).await.unwrap();
    let chosen = submission.selected_choices(&mm).await.unwrap();
    assert_eq!(chosen.len(), 1);
    assert_eq!(chosen[0].id(), choice.id());

    submission.deselect_choice(&mm, choice.id()).await.unwrap();
    assert!(submission.selected_choices(&mm).await.unwrap().is_empty());
}
