use crate::handlers::{health, machines, settings, tools};
use crate::state::AppState;
use axum::{
    http::{self, HeaderValue},
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/tool", get(tools::list_tools))
        .route("/tool/:key", get(tools::get_tool))
        .route("/tool/:key/variants", get(tools::list_versions))
        .route("/tool/:key/toolsettings", get(settings::tool_settings))
        .route("/tool/:key/:tool", get(settings::machine_tool_settings))
        .route(
            "/tool/:key/:tool/:version",
            get(settings::machine_tool_version_settings).post(settings::replace_settings),
        )
        .route(
            "/tool/nomachine/:tool/:version",
            get(settings::tool_version_settings),
        )
        .route(
            "/tool/machinesForTool/:tool/:version/:machine_id",
            get(machines::machines_for_tool),
        )
}

pub fn app(state: AppState, cors_origin: HeaderValue) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_methods([http::Method::GET, http::Method::POST])
        .allow_headers([http::header::CONTENT_TYPE, http::header::ACCEPT]);

    routes()
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
