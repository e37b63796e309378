use crate::impl_paginatable_for;
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use sqlx::prelude::Row;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Choice {
    id: Uuid,
    question_id: Uuid,
    choice_text: String,
    is_correct: bool,
}

impl ResourceTyped for Choice {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Choice
    }
}

impl Choice {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn question_id(&self) -> Uuid {
        self.question_id
    }

    pub fn choice_text(&self) -> &str {
        &self.choice_text
    }

    pub fn is_correct(&self) -> bool {
        self.is_correct
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ChoiceCreate {
    pub question_id: Uuid,
    pub choice_text: String,
    pub is_correct: Option<bool>,
}

impl ChoiceCreate {
    fn validate(&self) -> DatabaseResult<()> {
        super::check_text("choice_text", &self.choice_text, 256)
    }
}

#[async_trait]
impl CrudRepository<Choice, ChoiceCreate, Uuid> for Choice {
    async fn create(mm: &ModelManager, data: ChoiceCreate) -> DatabaseResult<Self> {
        data.validate()?;
        let result = sqlx::query("INSERT INTO choices (id, question_id, choice_text, is_correct) VALUES ($1,$2,$3,$4) RETURNING id")
            .bind(Uuid::new_v4())
            .bind(data.question_id)
            .bind(&data.choice_text)
            .bind(data.is_correct.unwrap_or(false))
            .fetch_one(mm.executor())
            .await?;

        let id = result.try_get("id")?;
        Ok(Choice {
            id,
            question_id: data.question_id,
            choice_text: data.choice_text,
            is_correct: data.is_correct.unwrap_or(false),
        })
    }

    async fn update(mut self, mm: &ModelManager, data: ChoiceCreate) -> DatabaseResult<Self> {
        data.validate()?;
        sqlx::query("UPDATE choices SET question_id = $1, choice_text = $2, is_correct = $3 WHERE id = $4")
            .bind(data.question_id)
            .bind(&data.choice_text)
            .bind(data.is_correct.unwrap_or(false))
            .bind(self.id)
            .execute(mm.executor())
            .await?;

        self.question_id = data.question_id;
        self.choice_text = data.choice_text;
        self.is_correct = data.is_correct.unwrap_or(false);
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM choices WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM choices WHERE id = $1")
            .bind(id)
            .fetch_one(mm.executor())
            .await;
        if let Err(sqlx::Error::RowNotFound) = result {
            return Ok(None);
        }

        Ok(Some(result?))
    }

    async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM choices LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM choices")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(Choice, ChoiceCreate, Uuid);

// Utils

impl Choice {
    pub async fn find_all_by_question(
        mm: &ModelManager,
        question_id: Uuid,
    ) -> DatabaseResult<Vec<Self>> {
        let rows: Vec<Self> = sqlx::query_as(
            r#"
            SELECT *
            FROM choices c
            WHERE c.question_id = $1
            "#,
        )
        .bind(question_id)
        .fetch_all(mm.executor())
        .await?;

        Ok(rows)
    }
}
