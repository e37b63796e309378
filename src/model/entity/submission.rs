use std::collections::HashSet;

use crate::impl_paginatable_for;
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use sqlx::prelude::Row;
use uuid::Uuid;

use super::Choice;

/// A learner's recorded set of selected choices, tied to an enrollment.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Submission {
    id: Uuid,
    enrollment_id: Uuid,
}

impl ResourceTyped for Submission {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Submission
    }
}

impl Submission {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn enrollment_id(&self) -> Uuid {
        self.enrollment_id
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SubmissionCreate {
    pub enrollment_id: Uuid,
}

#[async_trait]
impl CrudRepository<Submission, SubmissionCreate, Uuid> for Submission {
    async fn create(mm: &ModelManager, data: SubmissionCreate) -> DatabaseResult<Self> {
        let result = sqlx::query(
            "INSERT INTO submissions (id, enrollment_id) VALUES ($1,$2) RETURNING id",
        )
        .bind(Uuid::new_v4())
        .bind(data.enrollment_id)
        .fetch_one(mm.executor())
        .await?;

        let id = result.try_get("id")?;
        Ok(Submission {
            id,
            enrollment_id: data.enrollment_id,
        })
    }

    async fn update(mut self, mm: &ModelManager, data: SubmissionCreate) -> DatabaseResult<Self> {
        sqlx::query("UPDATE submissions SET enrollment_id = $1 WHERE id = $2")
            .bind(data.enrollment_id)
            .bind(self.id)
            .execute(mm.executor())
            .await?;

        self.enrollment_id = data.enrollment_id;
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM submissions WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM submissions WHERE id = $1")
            .bind(id)
            .fetch_one(mm.executor())
            .await;
        if let Err(sqlx::Error::RowNotFound) = result {
            return Ok(None);
        }

        Ok(Some(result?))
    }

    async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM submissions LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM submissions")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(Submission, SubmissionCreate, Uuid);

// Utils

impl Submission {
    /// Records a choice as selected. Selecting the same choice twice is a
    /// no-op.
    pub async fn select_choice(&self, mm: &ModelManager, choice_id: Uuid) -> DatabaseResult<()> {
        sqlx::query(
            "INSERT INTO submission_choices (submission_id, choice_id) VALUES ($1,$2) ON CONFLICT DO NOTHING",
        )
        .bind(self.id)
        .bind(choice_id)
        .execute(mm.executor())
        .await?;
        Ok(())
    }

    pub async fn deselect_choice(&self, mm: &ModelManager, choice_id: Uuid) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM submission_choices WHERE submission_id = $1 AND choice_id = $2")
            .bind(self.id)
            .bind(choice_id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    pub async fn selected_choices(&self, mm: &ModelManager) -> DatabaseResult<Vec<Choice>> {
        let rows: Vec<Choice> = sqlx::query_as(
            r#"
            SELECT c.*
            FROM choices c
            JOIN submission_choices sc ON sc.choice_id = c.id
            WHERE sc.submission_id = $1
            "#,
        )
        .bind(self.id)
        .fetch_all(mm.executor())
        .await?;

        Ok(rows)
    }

    /// The selection as a set of ids, the shape the scoring function takes.
    pub async fn selected_choice_ids(&self, mm: &ModelManager) -> DatabaseResult<HashSet<Uuid>> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT choice_id FROM submission_choices WHERE submission_id = $1",
        )
        .bind(self.id)
        .fetch_all(mm.executor())
        .await?;

        Ok(ids.into_iter().collect())
    }

    pub async fn all_by_enrollment(
        mm: &ModelManager,
        enrollment_id: Uuid,
    ) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM submissions WHERE enrollment_id = $1")
            .bind(enrollment_id)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }
}
