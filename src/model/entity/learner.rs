use crate::impl_paginatable_for;
use crate::model::repo::ResourceTyped;
use crate::model::{
    DatabaseError, ModelManager, error::DatabaseResult, repo::CrudRepository,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use sqlx::prelude::Row;
use url::Url;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Learner {
    id: Uuid,
    user_id: Uuid,
    occupation: String,
    social_link: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occupation {
    #[default]
    Student,
    Developer,
    DataScientist,
    #[serde(rename = "dba")]
    DatabaseAdmin,
}

impl TryFrom<&str> for Occupation {
    type Error = DatabaseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "student" => Ok(Self::Student),
            "developer" => Ok(Self::Developer),
            "data_scientist" => Ok(Self::DataScientist),
            "dba" => Ok(Self::DatabaseAdmin),
            other => Err(DatabaseError::validation(format!(
                "unknown occupation: {other}"
            ))),
        }
    }
}

impl std::fmt::Display for Occupation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Student => write!(f, "student"),
            Self::Developer => write!(f, "developer"),
            Self::DataScientist => write!(f, "data_scientist"),
            Self::DatabaseAdmin => write!(f, "dba"),
        }
    }
}

impl ResourceTyped for Learner {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Learner
    }
}

impl Learner {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Opaque reference to the externally managed user identity.
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// Fails when the stored text does not name a known occupation; writes
    /// only store values produced by `Occupation`, so an error here means the
    /// column was edited out of band.
    pub fn occupation(&self) -> DatabaseResult<Occupation> {
        Occupation::try_from(self.occupation.as_str())
    }

    pub fn social_link(&self) -> &str {
        &self.social_link
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LearnerCreate {
    pub user_id: Uuid,
    pub occupation: Option<Occupation>,
    pub social_link: String,
}

impl LearnerCreate {
    fn validate(&self) -> DatabaseResult<()> {
        super::check_text("social_link", &self.social_link, 200)?;
        if Url::parse(&self.social_link).is_err() {
            return Err(DatabaseError::validation(format!(
                "social_link is not a valid URL: {}",
                self.social_link
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl CrudRepository<Learner, LearnerCreate, Uuid> for Learner {
    async fn create(mm: &ModelManager, data: LearnerCreate) -> DatabaseResult<Self> {
        data.validate()?;
        let occupation = data.occupation.unwrap_or_default().to_string();
        let result = sqlx::query("INSERT INTO learners (id, user_id, occupation, social_link) VALUES ($1,$2,$3,$4) RETURNING id")
            .bind(Uuid::new_v4())
            .bind(data.user_id)
            .bind(&occupation)
            .bind(&data.social_link)
            .fetch_one(mm.executor())
            .await?;

        let id = result.try_get("id")?;
        Ok(Learner {
            id,
            user_id: data.user_id,
            occupation,
            social_link: data.social_link,
        })
    }

    async fn update(mut self, mm: &ModelManager, data: LearnerCreate) -> DatabaseResult<Self> {
        data.validate()?;
        let occupation = data.occupation.unwrap_or_default().to_string();
        sqlx::query("UPDATE learners SET user_id = $1, occupation = $2, social_link = $3 WHERE id = $4")
            .bind(data.user_id)
            .bind(&occupation)
            .bind(&data.social_link)
            .bind(self.id)
            .execute(mm.executor())
            .await?;

        self.user_id = data.user_id;
        self.occupation = occupation;
        self.social_link = data.social_link;
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM learners WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(mm: &ModelManager, id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM learners WHERE id = $1")
            .bind(id)
            .fetch_one(mm.executor())
            .await;
        if let Err(sqlx::Error::RowNotFound) = result {
            return Ok(None);
        }

        Ok(Some(result?))
    }

    async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM learners LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM learners")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(Learner, LearnerCreate, Uuid);

// Utils

impl Learner {
    pub async fn find_by_user(mm: &ModelManager, user_id: Uuid) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM learners WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn occupation_round_trips_through_text() {
        for occ in [
            Occupation::Student,
            Occupation::Developer,
            Occupation::DataScientist,
            Occupation::DatabaseAdmin,
        ] {
            assert_eq!(Occupation::try_from(occ.to_string().as_str()).unwrap(), occ);
        }
    }

    #[test]
    fn unknown_occupation_is_a_validation_error() {
        let result = Occupation::try_from("astronaut");
        assert!(matches!(result, Err(DatabaseError::Validation(_))));
    }

    #[test]
    fn corrupted_occupation_column_surfaces_as_an_error() {
        let learner: Learner = serde_json::from_value(serde_json::json!({
            "id": Uuid::new_v4(),
            "user_id": Uuid::new_v4(),
            "occupation": "astronaut",
            "social_link": "https://example.com/profile",
        }))
        .unwrap();

        assert!(matches!(
            learner.occupation(),
            Err(DatabaseError::Validation(_))
        ));
    }

    #[test]
    fn social_link_must_be_a_url() {
        let data = LearnerCreate {
            user_id: Uuid::new_v4(),
            occupation: None,
            social_link: "not a url".to_string(),
        };
        assert!(matches!(
            data.validate(),
            Err(DatabaseError::Validation(_))
        ));
    }
}
