use std::sync::Arc;

use anyhow::Context;
use spice_common::storage::FileStore;
use spice_common::storage::filesystem::FilesystemFileStore;
use spice_server::config::AppConfig;
use spice_server::database::init_db;
use spice_server::state::AppState;
use spice_server::utils::image::default_image_path;
use tracing::{Level, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = init_db(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    let files = FilesystemFileStore::new(
        config.storage.web_root.clone(),
        config.storage.max_upload_size,
    )
    .await
    .context("Failed to open web root")?;

    let placeholder = default_image_path(&config.storage);
    if !files.exists(&placeholder).await.unwrap_or(false) {
        warn!(
            path = %files.base_path().join(&placeholder).display(),
            "Placeholder image is missing; menu items created without an upload will fail"
        );
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        db,
        config,
        files: Arc::new(files),
    };
    let app = spice_server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
