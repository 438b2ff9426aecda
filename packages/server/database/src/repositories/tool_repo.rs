use super::ToolRepository;
use crate::models::Tool;
use crate::StoreResult;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PgToolRepository {
    pool: PgPool,
}

impl PgToolRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ToolRepository for PgToolRepository {
    async fn read_all(&self) -> StoreResult<Vec<Tool>> {
        let tools = sqlx::query_as::<_, Tool>("SELECT id, name, version FROM tools ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(tools)
    }

    async fn read_by_id(&self, id: i64) -> StoreResult<Option<Tool>> {
        let tool = sqlx::query_as::<_, Tool>("SELECT id, name, version FROM tools WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(tool)
    }

    async fn find_by_name(&self, name: &str) -> StoreResult<Vec<Tool>> {
        let tools = sqlx::query_as::<_, Tool>(
            "SELECT id, name, version FROM tools WHERE name = $1 ORDER BY id",
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await?;
        Ok(tools)
    }
}
