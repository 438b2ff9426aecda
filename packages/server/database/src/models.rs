use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Tool {
    pub id: i64,
    pub name: String,
    pub version: Option<String>, // None for a version-agnostic tool record
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Machine {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ToolSetting {
    pub id: i64,
    pub machine_id: Option<i64>,
    pub machine_name: Option<String>,
    pub tool_name: String,
    pub version: Option<String>,
    #[sqlx(rename = "setting_key")]
    pub key: String,
    #[sqlx(rename = "setting_value")]
    pub value: String,
}

/// One key/value pair of a replace-write. Other ToolSetting fields sent by
/// clients are ignored; the scope comes from the request path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingEntry {
    pub key: String,
    pub value: String,
}

impl SettingEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Which machine and version a settings lookup is restricted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsScope {
    Unscoped,
    VersionScoped(String),
    MachineOnlyScoped(String),
    MachineAndVersionScoped { machine: String, version: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsSelector {
    pub tool_name: String,
    pub scope: SettingsScope,
}

impl SettingsSelector {
    pub fn new(tool_name: impl Into<String>, scope: SettingsScope) -> Self {
        Self {
            tool_name: tool_name.into(),
            scope,
        }
    }

    pub fn machine(&self) -> Option<&str> {
        match &self.scope {
            SettingsScope::MachineOnlyScoped(machine)
            | SettingsScope::MachineAndVersionScoped { machine, .. } => Some(machine),
            _ => None,
        }
    }

    pub fn version(&self) -> Option<&str> {
        match &self.scope {
            SettingsScope::VersionScoped(version)
            | SettingsScope::MachineAndVersionScoped { version, .. } => Some(version),
            _ => None,
        }
    }

    /// Exact string comparison on every constrained field.
    pub fn matches(&self, setting: &ToolSetting) -> bool {
        if setting.tool_name != self.tool_name {
            return false;
        }
        if let Some(machine) = self.machine() {
            if setting.machine_name.as_deref() != Some(machine) {
                return false;
            }
        }
        if let Some(version) = self.version() {
            if setting.version.as_deref() != Some(version) {
                return false;
            }
        }
        true
    }
}
