pub mod machine_repo;
pub mod tool_repo;
pub mod tool_setting_repo;

pub use machine_repo::PgMachineRepository;
pub use tool_repo::PgToolRepository;
pub use tool_setting_repo::PgToolSettingRepository;

use crate::memory::MemoryStore;
use crate::models::{Machine, SettingEntry, SettingsSelector, Tool, ToolSetting};
use crate::StoreResult;
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

#[async_trait]
pub trait ToolRepository: Send + Sync {
    async fn read_all(&self) -> StoreResult<Vec<Tool>>;
    async fn read_by_id(&self, id: i64) -> StoreResult<Option<Tool>>;
    /// Every tool record sharing `name`, in id order.
    async fn find_by_name(&self, name: &str) -> StoreResult<Vec<Tool>>;
}

#[async_trait]
pub trait ToolSettingRepository: Send + Sync {
    async fn find(&self, selector: &SettingsSelector) -> StoreResult<Vec<ToolSetting>>;

    /// Replaces every setting of the (machine, tool, version) triple with `entries`.
    /// Either all of it happens or none of it does.
    async fn replace(
        &self,
        machine_name: &str,
        tool_name: &str,
        version: &str,
        entries: &[SettingEntry],
    ) -> StoreResult<()>;

    /// Distinct machines with at least one setting for the tool, in id order.
    async fn machines_for_tool(
        &self,
        tool_name: &str,
        version: Option<&str>,
    ) -> StoreResult<Vec<Machine>>;
}

#[async_trait]
pub trait MachineRepository: Send + Sync {
    async fn read_by_id(&self, id: i64) -> StoreResult<Option<Machine>>;
}

#[derive(Clone)]
pub struct Repositories {
    pub tools: Arc<dyn ToolRepository>,
    pub settings: Arc<dyn ToolSettingRepository>,
    pub machines: Arc<dyn MachineRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            tools: Arc::new(PgToolRepository::new(pool.clone())),
            settings: Arc::new(PgToolSettingRepository::new(pool.clone())),
            machines: Arc::new(PgMachineRepository::new(pool)),
        }
    }

    pub fn in_memory(store: Arc<MemoryStore>) -> Self {
        Self {
            tools: store.clone(),
            settings: store.clone(),
            machines: store,
        }
    }
}
