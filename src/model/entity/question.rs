use std::collections::HashSet;

use crate::impl_paginatable_for;
use crate::model::grading::{self, QuestionScore};
use crate::model::repo::ResourceTyped;
use crate::model::{
    DatabaseError, ModelManager, error::DatabaseResult, repo::CrudRepository,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use sqlx::prelude::Row;
use uuid::Uuid;

use super::Choice;

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Question {
    id: Uuid,
    lesson_id: Uuid,
    question_text: String,
    grade: i32,
}

impl ResourceTyped for Question {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Question
    }
}

impl Question {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn lesson_id(&self) -> Uuid {
        self.lesson_id
    }

    pub fn question_text(&self) -> &str {
        &self.question_text
    }

    /// Maximum achievable points, always positive.
    pub fn grade(&self) -> i32 {
        self.grade
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct QuestionCreate {
    pub lesson_id: Uuid,
    pub question_text: String,
    pub grade: Option<i32>,
}

impl QuestionCreate {
    fn validate(&self) -> DatabaseResult<()> {
        super::check_text("question_text", &self.question_text, 256)?;
        if self.grade.is_some_and(|g| g < 1) {
            return Err(DatabaseError::validation("grade must be positive"));
        }
        Ok(())
    }
}

#[async_trait]
impl CrudRepository<Question, QuestionCreate, Uuid> for Question {
    async fn create(mm: &ModelManager, data: QuestionCreate) -> DatabaseResult<Self> {
        data.validate()?;
        let result = sqlx::query("INSERT INTO questions (id, lesson_id, question_text, grade) VALUES ($1,$2,$3,$4) RETURNING id")
            .bind(Uuid::new_v4())
            .bind(data.lesson_id)
            .bind(&data.question_text)
            .bind(data.grade.unwrap_or(1))
            .fetch_one(mm.executor())
            .await?;

        let id = result.try_get("id")?;
        Ok(Question {
            id,
            lesson_id: data.lesson_id,
            question_text: data.question_text,
            grade: data.grade.unwrap_or(1),
        })
    }

    async fn update(mut self, mm: &ModelManager, data: QuestionCreate) -> DatabaseResult<Self> {
        data.validate()?;
        sqlx::query("UPDATE questions SET lesson_id = $1, question_text = $2, grade = $3 WHERE id = $4")
            .bind(data.lesson_id)
            .bind(&data.question_text)
            .bind(data.grade.unwrap_or(1))
            .bind(self.id)
            .execute(mm.executor())
            .await?;

        self.lesson_id = data.lesson_id;
        self.question_text = data.question_text;
        self.grade = data.grade.unwrap_or(1);
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM questions WHERE id = $1")
            .bind(id)
            .fetch_one(mm.executor())
            .await;
        if let Err(sqlx::Error::RowNotFound) = result {
            return Ok(None);
        }

        Ok(Some(result?))
    }

    async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM questions LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(Question, QuestionCreate, Uuid);

// Utils

impl Question {
    pub async fn all_by_lesson(mm: &ModelManager, lesson_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM questions WHERE lesson_id = $1")
            .bind(lesson_id)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    pub async fn choices(&self, mm: &ModelManager) -> DatabaseResult<Vec<Choice>> {
        Choice::find_all_by_question(mm, self.id).await
    }

    /// Loads this question's choices and scores them against the selected
    /// choice ids (typically a submission's selection).
    pub async fn score(
        &self,
        mm: &ModelManager,
        selected: &HashSet<Uuid>,
    ) -> DatabaseResult<QuestionScore> {
        let choices = self.choices(mm).await?;
        Ok(grading::score_question(self, &choices, selected)?)
    }
}
