use super::MachineRepository;
use crate::models::Machine;
use crate::StoreResult;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PgMachineRepository {
    pool: PgPool,
}

impl PgMachineRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MachineRepository for PgMachineRepository {
    async fn read_by_id(&self, id: i64) -> StoreResult<Option<Machine>> {
        let machine = sqlx::query_as::<_, Machine>("SELECT id, name FROM machines WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(machine)
    }
}
