use crate::impl_paginatable_for;
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use sqlx::prelude::Row;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Instructor {
    id: Uuid,
    user_id: Uuid,
    full_time: bool,
    total_learners: i32,
}

impl ResourceTyped for Instructor {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Instructor
    }
}

impl Instructor {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Opaque reference to the externally managed user identity.
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn full_time(&self) -> bool {
        self.full_time
    }

    pub fn total_learners(&self) -> i32 {
        self.total_learners
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct InstructorCreate {
    pub user_id: Uuid,
    pub full_time: Option<bool>,
    pub total_learners: i32,
}

#[async_trait]
impl CrudRepository<Instructor, InstructorCreate, Uuid> for Instructor {
    async fn create(mm: &ModelManager, data: InstructorCreate) -> DatabaseResult<Self> {
        let result = sqlx::query("INSERT INTO instructors (id, user_id, full_time, total_learners) VALUES ($1,$2,$3,$4) RETURNING id")
            .bind(Uuid::new_v4())
            .bind(data.user_id)
            .bind(data.full_time.unwrap_or(true))
            .bind(data.total_learners)
            .fetch_one(mm.executor())
            .await?;

        let id = result.try_get("id")?;
        Ok(Instructor {
            id,
            user_id: data.user_id,
            full_time: data.full_time.unwrap_or(true),
            total_learners: data.total_learners,
        })
    }

    async fn update(mut self, mm: &ModelManager, data: InstructorCreate) -> DatabaseResult<Self> {
        sqlx::query("UPDATE instructors SET user_id = $1, full_time = $2, total_learners = $3 WHERE id = $4")
            .bind(data.user_id)
            .bind(data.full_time.unwrap_or(true))
            .bind(data.total_learners)
            .bind(self.id)
            .execute(mm.executor())
            .await?;

        self.user_id = data.user_id;
        self.full_time = data.full_time.unwrap_or(true);
        self.total_learners = data.total_learners;
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM instructors WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM instructors WHERE id = $1")
            .bind(id)
            .fetch_one(mm.executor())
            .await;
        if let Err(sqlx::Error::RowNotFound) = result {
            return Ok(None);
        }

        Ok(Some(result?))
    }

    async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM instructors LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM instructors")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(Instructor, InstructorCreate, Uuid);

// Utils

impl Instructor {
    /// Instructors teaching a given course, via the course_instructors join.
    pub async fn find_all_by_course(
        mm: &ModelManager,
        course_id: Uuid,
    ) -> DatabaseResult<Vec<Self>> {
        let rows: Vec<Self> = sqlx::query_as(
            r#"
            SELECT i.*
            FROM instructors i
            JOIN course_instructors ci ON ci.instructor_id = i.id
            WHERE ci.course_id = $1
            "#,
        )
        .bind(course_id)
        .fetch_all(mm.executor())
        .await?;

        Ok(rows)
    }
}
