use crate::error::Result;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use database::models::{SettingEntry, SettingsScope, SettingsSelector, ToolSetting};

pub const WRITE_CONFIRMATION: &str = "In Ordnung";

async fn lookup(state: &AppState, selector: SettingsSelector) -> Result<Json<Vec<ToolSetting>>> {
    let settings = state.resolver.settings(&selector).await?;
    Ok(Json(settings))
}

/// Settings of a tool across every machine and version.
pub async fn tool_settings(
    State(state): State<AppState>,
    Path(tool_name): Path<String>,
) -> Result<Json<Vec<ToolSetting>>> {
    tracing::debug!("tool_settings toolName = [{}]", tool_name);
    lookup(&state, SettingsSelector::new(tool_name, SettingsScope::Unscoped)).await
}

pub async fn machine_tool_settings(
    State(state): State<AppState>,
    Path((machine_name, tool_name)): Path<(String, String)>,
) -> Result<Json<Vec<ToolSetting>>> {
    tracing::debug!(
        "machine_tool_settings machineName = [{}], toolName = [{}]",
        machine_name,
        tool_name
    );
    let scope = SettingsScope::MachineOnlyScoped(machine_name);
    lookup(&state, SettingsSelector::new(tool_name, scope)).await
}

pub async fn machine_tool_version_settings(
    State(state): State<AppState>,
    Path((machine_name, tool_name, version)): Path<(String, String, String)>,
) -> Result<Json<Vec<ToolSetting>>> {
    tracing::debug!(
        "machine_tool_version_settings machineName = [{}], toolName = [{}], version = [{}]",
        machine_name,
        tool_name,
        version
    );
    let scope = SettingsScope::MachineAndVersionScoped {
        machine: machine_name,
        version,
    };
    lookup(&state, SettingsSelector::new(tool_name, scope)).await
}

pub async fn tool_version_settings(
    State(state): State<AppState>,
    Path((tool_name, version)): Path<(String, String)>,
) -> Result<Json<Vec<ToolSetting>>> {
    tracing::debug!(
        "tool_version_settings toolName = [{}], version = [{}]",
        tool_name,
        version
    );
    let scope = SettingsScope::VersionScoped(version);
    lookup(&state, SettingsSelector::new(tool_name, scope)).await
}

pub async fn replace_settings(
    State(state): State<AppState>,
    Path((machine_name, tool_name, version)): Path<(String, String, String)>,
    Json(entries): Json<Vec<SettingEntry>>,
) -> Result<(StatusCode, &'static str)> {
    tracing::debug!(
        "replace_settings machineName = [{}], toolName = [{}], version = [{}]",
        machine_name,
        tool_name,
        version
    );
    state
        .resolver
        .replace_settings(&machine_name, &tool_name, &version, &entries)
        .await?;
    Ok((StatusCode::OK, WRITE_CONFIRMATION))
}
