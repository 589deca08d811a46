use std::sync::Arc;

use sea_orm::DatabaseConnection;
use spice_common::storage::FileStore;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    /// Rooted at `config.storage.web_root`.
    pub files: Arc<dyn FileStore>,
}
