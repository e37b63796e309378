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
pub struct Enrollment {
    id: Uuid,
    user_id: Uuid,
    course_id: Uuid,
    date_enrolled: NaiveDate,
    mode: String,
    rating: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentMode {
    #[default]
    Audit,
    Honor,
    Beta,
}

impl TryFrom<&str> for EnrollmentMode {
    type Error = DatabaseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "audit" => Ok(Self::Audit),
            "honor" => Ok(Self::Honor),
            "beta" => Ok(Self::Beta),
            other => Err(DatabaseError::validation(format!(
                "unknown enrollment mode: {other}"
            ))),
        }
    }
}

impl std::fmt::Display for EnrollmentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Audit => write!(f, "audit"),
            Self::Honor => write!(f, "honor"),
            Self::Beta => write!(f, "beta"),
        }
    }
}

impl ResourceTyped for Enrollment {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Enrollment
    }
}

impl Enrollment {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Opaque reference to the externally managed user identity.
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn course_id(&self) -> Uuid {
        self.course_id
    }

    pub fn date_enrolled(&self) -> NaiveDate {
        self.date_enrolled
    }

    /// Fails when the stored text does not name a known mode; writes only
    /// store values produced by `EnrollmentMode`, so an error here means the
    /// column was edited out of band.
    pub fn mode(&self) -> DatabaseResult<EnrollmentMode> {
        EnrollmentMode::try_from(self.mode.as_str())
    }

    pub fn rating(&self) -> f64 {
        self.rating
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct EnrollmentCreate {
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub date_enrolled: Option<NaiveDate>,
    pub mode: Option<EnrollmentMode>,
    pub rating: Option<f64>,
}

#[async_trait]
impl CrudRepository<Enrollment, EnrollmentCreate, Uuid> for Enrollment {
    /// Inserting the enrollment and bumping the course counter happen in one
    /// transaction so the counter never drifts from the join rows.
    async fn create(mm: &ModelManager, data: EnrollmentCreate) -> DatabaseResult<Self> {
        let date_enrolled = data
            .date_enrolled
            .unwrap_or_else(|| chrono::Utc::now().date_naive());
        let mode = data.mode.unwrap_or_default().to_string();
        let rating = data.rating.unwrap_or(5.0);

        let mut tx = mm.executor().begin().await?;

        let result = sqlx::query(
            "INSERT INTO enrollments (id, user_id, course_id, date_enrolled, mode, rating) VALUES ($1,$2,$3,$4,$5,$6) RETURNING id",
        )
        .bind(Uuid::new_v4())
        .bind(data.user_id)
        .bind(data.course_id)
        .bind(date_enrolled)
        .bind(&mode)
        .bind(rating)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE courses SET total_enrollment = total_enrollment + 1 WHERE id = $1")
            .bind(data.course_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let id = result.try_get("id")?;
        Ok(Enrollment {
            id,
            user_id: data.user_id,
            course_id: data.course_id,
            date_enrolled,
            mode,
            rating,
        })
    }

    async fn update(mut self, mm: &ModelManager, data: EnrollmentCreate) -> DatabaseResult<Self> {
        // user and course are fixed for the lifetime of an enrollment;
        // re-parenting would desync the course counter
        let date_enrolled = data.date_enrolled.unwrap_or(self.date_enrolled);
        let mode = data
            .mode
            .map(|m| m.to_string())
            .unwrap_or_else(|| self.mode.clone());
        let rating = data.rating.unwrap_or(self.rating);

        sqlx::query("UPDATE enrollments SET date_enrolled = $1, mode = $2, rating = $3 WHERE id = $4")
            .bind(date_enrolled)
            .bind(&mode)
            .bind(rating)
            .bind(self.id)
            .execute(mm.executor())
            .await?;

        self.date_enrolled = date_enrolled;
        self.mode = mode;
        self.rating = rating;
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager) -> DatabaseResult<()> {
        let mut tx = mm.executor().begin().await?;

        sqlx::query("DELETE FROM enrollments WHERE id = $1")
            .bind(self.id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE courses SET total_enrollment = total_enrollment - 1 WHERE id = $1")
            .bind(self.course_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn find_by_id(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM enrollments WHERE id = $1")
            .bind(id)
            .fetch_one(mm.executor())
            .await;
        if let Err(sqlx::Error::RowNotFound) = result {
            return Ok(None);
        }

        Ok(Some(result?))
    }

    async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM enrollments LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM enrollments")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(Enrollment, EnrollmentCreate, Uuid);

// Utils

impl Enrollment {
    /// The unique participation record of a user in a course, if any.
    pub async fn find_by_user_and_course(
        mm: &ModelManager,
        user_id: Uuid,
        course_id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as(
            "SELECT * FROM enrollments WHERE user_id = $1 AND course_id = $2",
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_optional(mm.executor())
        .await?;
        Ok(result)
    }

    pub async fn all_by_user(mm: &ModelManager, user_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM enrollments WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn mode_round_trips_through_text() {
        for mode in [
            EnrollmentMode::Audit,
            EnrollmentMode::Honor,
            EnrollmentMode::Beta,
        ] {
            assert_eq!(
                EnrollmentMode::try_from(mode.to_string().as_str()).unwrap(),
                mode
            );
        }
    }

    #[test]
    fn unknown_mode_is_a_validation_error() {
        assert!(matches!(
            EnrollmentMode::try_from("verified"),
            Err(DatabaseError::Validation(_))
        ));
    }

    #[test]
    fn corrupted_mode_column_surfaces_as_an_error() {
        let enrollment: Enrollment = serde_json::from_value(serde_json::json!({
            "id": Uuid::new_v4(),
            "user_id": Uuid::new_v4(),
            "course_id": Uuid::new_v4(),
            "date_enrolled": "2026-01-15",
            "mode": "verified",
            "rating": 5.0,
        }))
        .unwrap();

        assert!(matches!(
            enrollment.mode(),
            Err(DatabaseError::Validation(_))
        ));
    }
}
