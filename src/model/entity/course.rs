use crate::impl_paginatable_for;
use crate::model::repo::ResourceTyped;
use crate::model::{
    DatabaseError, ModelManager, error::DatabaseResult, repo::CrudRepository,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use sqlx::prelude::Row;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Course {
    id: Uuid,
    name: String,
    image: String,
    description: String,
    pub_date: Option<NaiveDate>,
    total_enrollment: i32,
}

impl ResourceTyped for Course {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Course
    }
}

impl Course {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reference into the external upload store; the binary itself is not ours.
    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn pub_date(&self) -> Option<NaiveDate> {
        self.pub_date
    }

    pub fn total_enrollment(&self) -> i32 {
        self.total_enrollment
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CourseCreate {
    pub name: String,
    pub image: String,
    pub description: String,
    pub pub_date: Option<NaiveDate>,
}

impl CourseCreate {
    fn validate(&self) -> DatabaseResult<()> {
        super::check_text("name", &self.name, 30)?;
        super::check_text("description", &self.description, 1000)?;
        if self.image.is_empty() {
            return Err(DatabaseError::validation("image reference must not be empty"));
        }
        Ok(())
    }
}

#[async_trait]
impl CrudRepository<Course, CourseCreate, Uuid> for Course {
    async fn create(mm: &ModelManager, data: CourseCreate) -> DatabaseResult<Self> {
        data.validate()?;
        let result = sqlx::query("INSERT INTO courses (id, name, image, description, pub_date) VALUES ($1,$2,$3,$4,$5) RETURNING id")
            .bind(Uuid::new_v4())
            .bind(&data.name)
            .bind(&data.image)
            .bind(&data.description)
            .bind(data.pub_date)
            .fetch_one(mm.executor())
            .await?;

        let id = result.try_get("id")?;
        Ok(Course {
            id,
            name: data.name,
            image: data.image,
            description: data.description,
            pub_date: data.pub_date,
            total_enrollment: 0,
        })
    }

    async fn update(mut self, mm: &ModelManager, data: CourseCreate) -> DatabaseResult<Self> {
        data.validate()?;
        // total_enrollment is maintained by Enrollment writes, never here
        sqlx::query("UPDATE courses SET name = $1, image = $2, description = $3, pub_date = $4 WHERE id = $5")
            .bind(&data.name)
            .bind(&data.image)
            .bind(&data.description)
            .bind(data.pub_date)
            .bind(self.id)
            .execute(mm.executor())
            .await?;

        self.name = data.name;
        self.image = data.image;
        self.description = data.description;
        self.pub_date = data.pub_date;
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM courses WHERE id = $1")
            .bind(id)
            .fetch_one(mm.executor())
            .await;
        if let Err(sqlx::Error::RowNotFound) = result {
            return Ok(None);
        }

        Ok(Some(result?))
    }

    async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM courses LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(Course, CourseCreate, Uuid);

// Utils

impl Course {
    pub async fn assign_instructor(
        &self,
        mm: &ModelManager,
        instructor_id: Uuid,
    ) -> DatabaseResult<()> {
        sqlx::query(
            "INSERT INTO course_instructors (course_id, instructor_id) VALUES ($1,$2) ON CONFLICT DO NOTHING",
        )
        .bind(self.id)
        .bind(instructor_id)
        .execute(mm.executor())
        .await?;
        Ok(())
    }

    pub async fn withdraw_instructor(
        &self,
        mm: &ModelManager,
        instructor_id: Uuid,
    ) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM course_instructors WHERE course_id = $1 AND instructor_id = $2")
            .bind(self.id)
            .bind(instructor_id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    pub async fn all_by_instructor(
        mm: &ModelManager,
        instructor_id: Uuid,
    ) -> DatabaseResult<Vec<Self>> {
        let rows: Vec<Self> = sqlx::query_as(
            r#"
            SELECT c.*
            FROM courses c
            JOIN course_instructors ci ON ci.course_id = c.id
            WHERE ci.instructor_id = $1
            "#,
        )
        .bind(instructor_id)
        .fetch_all(mm.executor())
        .await?;

        Ok(rows)
    }

    /// Whether a given viewer is enrolled in this course. Computed per call;
    /// enrollment status is viewer-dependent and never stored on the course.
    pub async fn is_enrolled_by(&self, mm: &ModelManager, user_id: Uuid) -> DatabaseResult<bool> {
        let enrolled: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM enrollments WHERE course_id = $1 AND user_id = $2)",
        )
        .bind(self.id)
        .bind(user_id)
        .fetch_one(mm.executor())
        .await?;

        Ok(enrolled)
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct CourseWithEnrollmentRow {
    pub id: Uuid,
    pub name: String,
    pub image: String,
    pub description: String,
    pub pub_date: Option<NaiveDate>,
    pub total_enrollment: i32,
    pub is_enrolled: bool,
}

impl CourseWithEnrollmentRow {
    /// Catalog view for one viewer: every course annotated with whether that
    /// viewer is enrolled in it.
    pub async fn fetch_all(mm: &ModelManager, user_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let rows: Vec<Self> = sqlx::query_as(
            r#"
            SELECT
                c.*,
                EXISTS (
                    SELECT 1 FROM enrollments e
                    WHERE e.course_id = c.id AND e.user_id = $1
                ) AS is_enrolled
            FROM courses c
            ORDER BY c.pub_date DESC NULLS LAST
            "#,
        )
        .bind(user_id)
        .fetch_all(mm.executor())
        .await?;

        Ok(rows)
    }
}
