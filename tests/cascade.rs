mod common;

use learnbase::model::entity::{
    Choice, Enrollment, Lesson, Question, Submission, SubmissionCreate,
};
use learnbase::model::CrudRepository;
use uuid::Uuid;

use crate::common::{
    manager, seed_choice, seed_course, seed_enrollment, seed_lesson, seed_question,
    setup_test_db,
};

#[tokio::test]
async fn deleting_a_course_removes_lessons_and_enrollments() {
    let Some(db) = setup_test_db().await else {
        return;
    };
    let mm = manager(&db);

    let course = seed_course(&mm, "Doomed course").await;
    let lesson = seed_lesson(&mm, course.id(), 0).await;
    let enrollment = seed_enrollment(&mm, course.id(), Uuid::new_v4()).await;

    let survivor = seed_course(&mm, "Survivor").await;
    let surviving_lesson = seed_lesson(&mm, survivor.id(), 0).await;

    course.delete(&mm).await.unwrap();

    assert!(Lesson::find_by_id(&mm, lesson.id()).await.unwrap().is_none());
    assert!(
        Enrollment::find_by_id(&mm, enrollment.id())
            .await
            .unwrap()
            .is_none()
    );
    // unrelated rows are untouched
    assert!(
        Lesson::find_by_id(&mm, surviving_lesson.id())
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn deleting_a_question_removes_its_choices() {
    let Some(db) = setup_test_db().await else {
        return;
    };
    let mm = manager(&db);

    let course = seed_course(&mm, "Quiz course").await;
    let lesson = seed_lesson(&mm, course.id(), 0).await;
    let question = seed_question(&mm, lesson.id(), 5).await;
    let choice = seed_choice(&mm, question.id(), "A", true).await;

    question.delete(&mm).await.unwrap();

    assert!(Choice::find_by_id(&mm, choice.id()).await.unwrap().is_none());
}

#[tokio::test]
async fn deleting_an_enrollment_removes_its_submissions() {
    let Some(db) = setup_test_db().await else {
        return;
    };
    let mm = manager(&db);

    let course = seed_course(&mm, "Submitted course").await;
    let enrollment = seed_enrollment(&mm, course.id(), Uuid::new_v4()).await;
    let submission = Submission::create(
        &mm,
        SubmissionCreate {
            enrollment_id: enrollment.id(),
        },
    )
    .await
    .unwrap();

    enrollment.delete(&mm).await.unwrap();

    assert!(
        Submission::find_by_id(&mm, submission.id())
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn deleting_a_submission_clears_its_selection_rows() {
    let Some(db) = setup_test_db().await else {
        return;
    };
    let mm = manager(&db);

    let course = seed_course(&mm, "Selected course").await;
    let lesson = seed_lesson(&mm, course.id(), 0).await;
    let question = seed_question(&mm, lesson.id(), 5).await;
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

    let submission_id = submission.id();
    submission.delete(&mm).await.unwrap();

    let join_rows: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM submission_choices WHERE submission_id = $1")
            .bind(submission_id)
            .fetch_one(db.pool())
            .await
            .unwrap();
    assert_eq!(join_rows, 0);

    // the choice itself is quiz content and survives
    assert!(Choice::find_by_id(&mm, choice.id()).await.unwrap().is_some());
}

#[tokio::test]
async fn course_cascade_reaches_questions_through_lessons() {
    let Some(db) = setup_test_db().await else {
        return;
    };
    let mm = manager(&db);

    let course = seed_course(&mm, "Deep cascade").await;
    let lesson = seed_lesson(&mm, course.id(), 0).await;
    let question = seed_question(&mm, lesson.id(), 3).await;
    let choice = seed_choice(&mm, question.id(), "A", false).await;

    course.delete(&mm).await.unwrap();

    assert!(Question::find_by_id(&mm, question.id()).await.unwrap().is_none());
    assert!(Choice::find_by_id(&mm, choice.id()).await.unwrap().is_none());
}
