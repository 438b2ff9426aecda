//! In-process store implementing every repository trait.
//!
//! Backs the test suite and lets the API run without PostgreSQL, starting
//! from a [`Seed`] of tools, machines and settings. All state sits behind one
//! lock, so a replace-write is atomic with respect to readers.

use crate::models::{Machine, SettingEntry, SettingsSelector, Tool, ToolSetting};
use crate::repositories::{MachineRepository, ToolRepository, ToolSettingRepository};
use crate::{StoreError, StoreResult};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// Administrative data loaded into a fresh store, usually from a JSON file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Seed {
    pub tools: Vec<SeedTool>,
    pub machines: Vec<SeedMachine>,
    pub settings: Vec<SeedSetting>,
}

#[derive(Debug, Deserialize)]
pub struct SeedTool {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SeedMachine {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedSetting {
    #[serde(default)]
    pub machine_name: Option<String>,
    pub tool_name: String,
    #[serde(default)]
    pub version: Option<String>,
    pub key: String,
    pub value: String,
}

#[derive(Default)]
struct Tables {
    tools: Vec<Tool>,
    machines: Vec<Machine>,
    settings: Vec<ToolSetting>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

pub struct MemoryStore {
    tables: RwLock<Tables>,
    offline: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            offline: AtomicBool::new(false),
        }
    }

    /// Builds a store holding `seed`. Seeded settings must reference known tools and machines.
    pub async fn from_seed(seed: Seed) -> StoreResult<Self> {
        let store = Self::new();
        for tool in &seed.tools {
            store.add_tool(&tool.name, tool.version.as_deref()).await;
        }
        for machine in &seed.machines {
            store.add_machine(&machine.name).await;
        }
        for setting in seed.settings {
            store
                .add_setting(
                    setting.machine_name.as_deref(),
                    &setting.tool_name,
                    setting.version.as_deref(),
                    SettingEntry::new(setting.key, setting.value),
                )
                .await?;
        }
        Ok(store)
    }

    /// While offline every repository call fails with `StoreError::Unavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> StoreResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    pub async fn add_tool(&self, name: &str, version: Option<&str>) -> Tool {
        let mut tables = self.tables.write().await;
        let tool = Tool {
            id: tables.next_id(),
            name: name.to_string(),
            version: version.map(str::to_string),
        };
        tables.tools.push(tool.clone());
        tool
    }

    pub async fn add_machine(&self, name: &str) -> Machine {
        let mut tables = self.tables.write().await;
        let machine = Machine {
            id: tables.next_id(),
            name: name.to_string(),
        };
        tables.machines.push(machine.clone());
        machine
    }

    /// Inserts a single setting row. `tool_name` must name a known tool and
    /// `machine_name`, when given, a known machine.
    pub async fn add_setting(
        &self,
        machine_name: Option<&str>,
        tool_name: &str,
        version: Option<&str>,
        entry: SettingEntry,
    ) -> StoreResult<ToolSetting> {
        let mut tables = self.tables.write().await;
        if !tables.tools.iter().any(|t| t.name == tool_name) {
            return Err(StoreError::not_found("tool", tool_name));
        }
        let machine_id = match machine_name {
            Some(name) => Some(
                tables
                    .machines
                    .iter()
                    .find(|m| m.name == name)
                    .map(|m| m.id)
                    .ok_or_else(|| StoreError::not_found("machine", name))?,
            ),
            None => None,
        };
        let setting = ToolSetting {
            id: tables.next_id(),
            machine_id,
            machine_name: machine_name.map(str::to_string),
            tool_name: tool_name.to_string(),
            version: version.map(str::to_string),
            key: entry.key,
            value: entry.value,
        };
        tables.settings.push(setting.clone());
        Ok(setting)
    }
}

#[async_trait]
impl ToolRepository for MemoryStore {
    async fn read_all(&self) -> StoreResult<Vec<Tool>> {
        self.ensure_online()?;
        Ok(self.tables.read().await.tools.clone())
    }

    async fn read_by_id(&self, id: i64) -> StoreResult<Option<Tool>> {
        self.ensure_online()?;
        let tables = self.tables.read().await;
        Ok(tables.tools.iter().find(|t| t.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> StoreResult<Vec<Tool>> {
        self.ensure_online()?;
        let tables = self.tables.read().await;
        Ok(tables
            .tools
            .iter()
            .filter(|t| t.name == name)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ToolSettingRepository for MemoryStore {
    async fn find(&self, selector: &SettingsSelector) -> StoreResult<Vec<ToolSetting>> {
        self.ensure_online()?;
        let tables = self.tables.read().await;
        Ok(tables
            .settings
            .iter()
            .filter(|s| selector.matches(s))
            .cloned()
            .collect())
    }

    async fn replace(
        &self,
        machine_name: &str,
        tool_name: &str,
        version: &str,
        entries: &[SettingEntry],
    ) -> StoreResult<()> {
        self.ensure_online()?;
        let mut tables = self.tables.write().await;

        if !tables.tools.iter().any(|t| t.name == tool_name) {
            return Err(StoreError::not_found("tool", tool_name));
        }
        let machine_id = tables
            .machines
            .iter()
            .find(|m| m.name == machine_name)
            .map(|m| m.id)
            .ok_or_else(|| StoreError::not_found("machine", machine_name))?;

        tables.settings.retain(|s| {
            !(s.machine_id == Some(machine_id)
                && s.tool_name == tool_name
                && s.version.as_deref() == Some(version))
        });

        for entry in entries {
            let id = tables.next_id();
            tables.settings.push(ToolSetting {
                id,
                machine_id: Some(machine_id),
                machine_name: Some(machine_name.to_string()),
                tool_name: tool_name.to_string(),
                version: Some(version.to_string()),
                key: entry.key.clone(),
                value: entry.value.clone(),
            });
        }
        Ok(())
    }

    async fn machines_for_tool(
        &self,
        tool_name: &str,
        version: Option<&str>,
    ) -> StoreResult<Vec<Machine>> {
        self.ensure_online()?;
        let tables = self.tables.read().await;
        let mut machines: Vec<Machine> = tables
            .machines
            .iter()
            .filter(|m| {
                tables.settings.iter().any(|s| {
                    s.machine_id == Some(m.id)
                        && s.tool_name == tool_name
                        && version.map_or(true, |v| s.version.as_deref() == Some(v))
                })
            })
            .cloned()
            .collect();
        machines.sort_by_key(|m| m.id);
        Ok(machines)
    }
}

#[async_trait]
impl MachineRepository for MemoryStore {
    async fn read_by_id(&self, id: i64) -> StoreResult<Option<Machine>> {
        self.ensure_online()?;
        let tables = self.tables.read().await;
        Ok(tables.machines.iter().find(|m| m.id == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SettingsScope;

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store.add_tool("compiler", Some("1.0")).await;
        store.add_tool("compiler", Some("2.0")).await;
        store.add_machine("build01").await;
        store.add_machine("build02").await;
        store
            .add_setting(Some("build01"), "compiler", Some("1.0"), SettingEntry::new("OPT", "3"))
            .await
            .unwrap();
        store
            .add_setting(Some("build01"), "compiler", Some("2.0"), SettingEntry::new("OPT", "2"))
            .await
            .unwrap();
        store
            .add_setting(Some("build02"), "compiler", Some("1.0"), SettingEntry::new("LTO", "on"))
            .await
            .unwrap();
        store
    }

    fn triple(machine: &str, version: &str) -> SettingsSelector {
        SettingsSelector::new(
            "compiler",
            SettingsScope::MachineAndVersionScoped {
                machine: machine.to_string(),
                version: version.to_string(),
            },
        )
    }

    #[tokio::test]
    async fn test_replace_only_touches_exact_triple() {
        let store = seeded().await;

        store.replace("build01", "compiler", "1.0", &[]).await.unwrap();

        assert!(store.find(&triple("build01", "1.0")).await.unwrap().is_empty());
        assert_eq!(store.find(&triple("build01", "2.0")).await.unwrap().len(), 1);
        assert_eq!(store.find(&triple("build02", "1.0")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_replace_unknown_machine_leaves_store_untouched() {
        let store = seeded().await;

        let err = store
            .replace("ghost", "compiler", "1.0", &[SettingEntry::new("A", "B")])
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::NotFound { entity: "machine", .. }));
        let all = store
            .find(&SettingsSelector::new("compiler", SettingsScope::Unscoped))
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_replace_unknown_tool_is_not_found() {
        let store = seeded().await;
        let err = store.replace("build01", "linker", "1.0", &[]).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "tool", .. }));
    }

    #[tokio::test]
    async fn test_machines_for_tool_respects_version() {
        let store = seeded().await;

        let v2 = store.machines_for_tool("compiler", Some("2.0")).await.unwrap();
        assert_eq!(v2.iter().map(|m| m.name.as_str()).collect::<Vec<_>>(), ["build01"]);

        let all = store.machines_for_tool("compiler", None).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_add_setting_requires_known_tool() {
        let store = seeded().await;
        let err = store
            .add_setting(Some("build01"), "linker", Some("1.0"), SettingEntry::new("A", "B"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "tool", .. }));
    }

    #[tokio::test]
    async fn test_from_seed_loads_json() {
        let seed: Seed = serde_json::from_str(
            r#"{
                "tools": [{ "name": "compiler", "version": "1.0" }, { "name": "compiler" }],
                "machines": [{ "name": "build01" }],
                "settings": [
                    { "machineName": "build01", "toolName": "compiler", "version": "1.0",
                      "key": "OPT", "value": "3" }
                ]
            }"#,
        )
        .unwrap();
        let store = MemoryStore::from_seed(seed).await.unwrap();

        assert_eq!(store.find_by_name("compiler").await.unwrap().len(), 2);
        let found = store.find(&triple("build01", "1.0")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].machine_name.as_deref(), Some("build01"));
        assert_eq!(found[0].value, "3");
    }

    #[tokio::test]
    async fn test_from_seed_rejects_setting_for_unknown_tool() {
        let seed: Seed = serde_json::from_str(
            r#"{ "settings": [{ "toolName": "ghost", "key": "A", "value": "B" }] }"#,
        )
        .unwrap();
        assert!(matches!(
            MemoryStore::from_seed(seed).await,
            Err(StoreError::NotFound { entity: "tool", .. })
        ));
    }

    #[tokio::test]
    async fn test_offline_store_is_unavailable() {
        let store = seeded().await;
        store.set_offline(true);
        assert!(matches!(
            ToolRepository::read_all(&store).await,
            Err(StoreError::Unavailable(_))
        ));
    }
}
