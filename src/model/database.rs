use crate::model::error::DatabaseResult;
use sqlx::PgPool;

#[derive(Debug, Clone)]
pub struct DbConnection {
    pool: PgPool, // PgPool is Arc-backed, so clones share the pool
}

impl DbConnection {
    /// Lazy connect: the first query opens the actual connection.
    pub fn connect(connection_str: &str) -> DatabaseResult<Self> {
        let pool = PgPool::connect_lazy(connection_str)?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}
