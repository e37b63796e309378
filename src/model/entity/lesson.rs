use crate::impl_paginatable_for;
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use sqlx::prelude::Row;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Lesson {
    id: Uuid,
    course_id: Uuid,
    title: String,
    order_index: i32,
    content: String,
}

impl ResourceTyped for Lesson {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Lesson
    }
}

impl Lesson {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn course_id(&self) -> Uuid {
        self.course_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Display position within the course; duplicates are allowed.
    pub fn order_index(&self) -> i32 {
        self.order_index
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LessonCreate {
    pub course_id: Uuid,
    pub title: String,
    pub order_index: Option<i32>,
    pub content: String,
}

impl LessonCreate {
    fn validate(&self) -> DatabaseResult<()> {
        super::check_text("title", &self.title, 200)
    }
}

#[async_trait]
impl CrudRepository<Lesson, LessonCreate, Uuid> for Lesson {
    async fn create(mm: &ModelManager, data: LessonCreate) -> DatabaseResult<Self> {
        data.validate()?;
        let result = sqlx::query("INSERT INTO lessons (id, course_id, title, order_index, content) VALUES ($1,$2,$3,$4,$5) RETURNING id")
            .bind(Uuid::new_v4())
            .bind(data.course_id)
            .bind(&data.title)
            .bind(data.order_index.unwrap_or(0))
            .bind(&data.content)
            .fetch_one(mm.executor())
            .await?;

        let id = result.try_get("id")?;
        Ok(Lesson {
            id,
            course_id: data.course_id,
            title: data.title,
            order_index: data.order_index.unwrap_or(0),
            content: data.content,
        })
    }

    async fn update(mut self, mm: &ModelManager, data: LessonCreate) -> DatabaseResult<Self> {
        data.validate()?;
        sqlx::query("UPDATE lessons SET course_id = $1, title = $2, order_index = $3, content = $4 WHERE id = $5")
            .bind(data.course_id)
            .bind(&data.title)
            .bind(data.order_index.unwrap_or(0))
            .bind(&data.content)
            .bind(self.id)
            .execute(mm.executor())
            .await?;

        self.course_id = data.course_id;
        self.title = data.title;
        self.order_index = data.order_index.unwrap_or(0);
        self.content = data.content;
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM lessons WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM lessons WHERE id = $1")
            .bind(id)
            .fetch_one(mm.executor())
            .await;
        if let Err(sqlx::Error::RowNotFound) = result {
            return Ok(None);
        }

        Ok(Some(result?))
    }

    async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM lessons LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lessons")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(Lesson, LessonCreate, Uuid);

// Utils

impl Lesson {
    pub async fn all_by_course(mm: &ModelManager, course_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as(
            "SELECT * FROM lessons WHERE course_id = $1 ORDER BY order_index ASC",
        )
        .bind(course_id)
        .fetch_all(mm.executor())
        .await?;
        Ok(result)
    }
}
