use crate::error::{ApiError, Result};
use database::models::{Machine, SettingEntry, SettingsSelector, Tool, ToolSetting};
use database::Repositories;

/// Maps tool/machine/version selectors onto repository reads and writes.
pub struct SettingsResolver {
    repos: Repositories,
}

impl SettingsResolver {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub async fn list_tools(&self) -> Result<Vec<Tool>> {
        Ok(self.repos.tools.read_all().await?)
    }

    pub async fn get_tool(&self, id: i64) -> Result<Tool> {
        self.repos
            .tools
            .read_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("tool not found: {}", id)))
    }

    /// Versions of every tool record named `tool_name`, in discovery order.
    /// Records without a version are skipped; duplicates are kept.
    pub async fn list_versions(&self, tool_name: &str) -> Result<Vec<String>> {
        let tools = self.repos.tools.find_by_name(tool_name).await?;
        Ok(tools.into_iter().filter_map(|t| t.version).collect())
    }

    pub async fn settings(&self, selector: &SettingsSelector) -> Result<Vec<ToolSetting>> {
        Ok(self.repos.settings.find(selector).await?)
    }

    pub async fn replace_settings(
        &self,
        machine_name: &str,
        tool_name: &str,
        version: &str,
        entries: &[SettingEntry],
    ) -> Result<()> {
        self.repos
            .settings
            .replace(machine_name, tool_name, version, entries)
            .await?;

        tracing::info!(
            "Replaced settings for {}/{}/{} with {} entries",
            machine_name,
            tool_name,
            version,
            entries.len()
        );
        Ok(())
    }

    /// Machines that have settings for the tool (any version when `version` is None),
    /// plus the requested machine if it is not among them.
    pub async fn machines_for_tool(
        &self,
        tool_name: &str,
        version: Option<&str>,
        machine_id: i64,
    ) -> Result<Vec<Machine>> {
        let requested = self
            .repos
            .machines
            .read_by_id(machine_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("machine not found: {}", machine_id)))?;

        let mut machines = self
            .repos
            .settings
            .machines_for_tool(tool_name, version)
            .await?;

        if !machines.iter().any(|m| m.id == requested.id) {
            machines.push(requested);
        }
        Ok(machines)
    }
}
