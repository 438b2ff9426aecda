use crate::error::Result;
use crate::handlers::parse_id;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use database::models::Machine;

/// Version path segment that stands for "any version".
const ANY_VERSION: &str = "null";

/// Converts the version path segment into an optional filter.
fn version_filter(raw: &str) -> Option<&str> {
    if raw == ANY_VERSION {
        None
    } else {
        Some(raw)
    }
}

pub async fn machines_for_tool(
    State(state): State<AppState>,
    Path((tool_name, version, machine_id)): Path<(String, String, String)>,
) -> Result<Json<Vec<Machine>>> {
    tracing::debug!(
        "machines_for_tool toolName = [{}], version = [{}], machineId = [{}]",
        tool_name,
        version,
        machine_id
    );
    let machine_id = parse_id(&machine_id, "machineId")?;
    let machines = state
        .resolver
        .machines_for_tool(&tool_name, version_filter(&version), machine_id)
        .await?;
    Ok(Json(machines))
}
