mod instructor;
pub use instructor::{Instructor, InstructorCreate};

mod learner;
pub use learner::{Learner, LearnerCreate, Occupation};

mod course;
pub use course::{Course, CourseCreate, CourseWithEnrollmentRow};

mod lesson;
pub use lesson::{Lesson, LessonCreate};

mod enrollment;
pub use enrollment::{Enrollment, EnrollmentCreate, EnrollmentMode};

mod question;
pub use question::{Question, QuestionCreate};

mod choice;
pub use choice::{Choice, ChoiceCreate};

mod submission;
pub use submission::{Submission, SubmissionCreate};

use crate::model::{DatabaseError, DatabaseResult};

/// Column limits mirror the schema; checked before the INSERT so the caller
/// gets a validation error instead of a driver error.
pub(crate) fn check_text(field: &'static str, value: &str, max: usize) -> DatabaseResult<()> {
    if value.is_empty() {
        return Err(DatabaseError::validation(format!(
            "{field} must not be empty"
        )));
    }
    if value.chars().count() > max {
        return Err(DatabaseError::validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn check_text_rejects_empty_and_overlong() {
        assert!(check_text("name", "rust 101", 30).is_ok());
        assert!(check_text("name", "", 30).is_err());
        assert!(check_text("name", &"x".repeat(31), 30).is_err());
    }
}
