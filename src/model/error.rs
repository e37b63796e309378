use thiserror::Error;

pub type DatabaseResult<T> = std::result::Result<T, DatabaseError>;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("sqlx migrate error: {0}")]
    SqlxMigrateError(#[from] sqlx::migrate::MigrateError),
    #[error("sqlx error: {0}")]
    SqlxError(sqlx::Error),
    #[error("json error: {0}")]
    SerdeError(#[from] serde_json::Error),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("referenced row does not exist: {0}")]
    Referential(sqlx::Error),
    #[error("row already exists: {0}")]
    Duplicate(sqlx::Error),
    #[error(transparent)]
    Grading(#[from] crate::model::grading::GradingError),
}

impl DatabaseError {
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation(reason.into())
    }
}

// Foreign-key and unique violations are part of the write-time contract, so
// they get their own variants instead of hiding inside the driver error.
impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if matches!(db_err.kind(), sqlx::error::ErrorKind::ForeignKeyViolation) {
                return Self::Referential(err);
            }
            if matches!(db_err.kind(), sqlx::error::ErrorKind::UniqueViolation) {
                return Self::Duplicate(err);
            }
        }
        Self::SqlxError(err)
    }
}
