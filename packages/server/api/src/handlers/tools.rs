use crate::error::Result;
use crate::handlers::parse_id;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use database::models::Tool;

pub async fn list_tools(State(state): State<AppState>) -> Result<Json<Vec<Tool>>> {
    let tools = state.resolver.list_tools().await?;
    Ok(Json(tools))
}

pub async fn get_tool(
    State(state): State<AppState>,
    Path(tool_id): Path<String>,
) -> Result<Json<Tool>> {
    tracing::debug!("get_tool toolId = [{}]", tool_id);
    let id = parse_id(&tool_id, "toolId")?;
    let tool = state.resolver.get_tool(id).await?;
    Ok(Json(tool))
}

pub async fn list_versions(
    State(state): State<AppState>,
    Path(tool_name): Path<String>,
) -> Result<Json<Vec<String>>> {
    tracing::debug!("list_versions toolName = [{}]", tool_name);
    let versions = state.resolver.list_versions(&tool_name).await?;
    Ok(Json(versions))
}
