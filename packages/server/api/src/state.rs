use crate::services::settings_resolver::SettingsResolver;
use database::Database;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<SettingsResolver>,
    /// None when running on the in-memory store.
    pub db: Option<Arc<Database>>,
}
