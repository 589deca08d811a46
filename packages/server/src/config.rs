use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Role claim required to reach the admin area.
    #[serde(default = "default_manager_role")]
    pub manager_role: String,
}

/// Where menu item images live.
///
/// Image references stored on rows are URL paths (`/images/7.png`) relative to
/// `web_root`, which is also the root of the file store.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_web_root")]
    pub web_root: PathBuf,
    #[serde(default = "default_images_dir")]
    pub images_dir: String,
    /// Placeholder copied for items created without an upload. Must already
    /// exist inside `images_dir`.
    #[serde(default = "default_image")]
    pub default_image: String,
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: u64,
}

fn default_manager_role() -> String {
    "Manager".into()
}
fn default_web_root() -> PathBuf {
    PathBuf::from("./wwwroot")
}
fn default_images_dir() -> String {
    "images".into()
}
fn default_image() -> String {
    "default_food.png".into()
}
fn default_max_upload_size() -> u64 {
    16 * 1024 * 1024
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            web_root: default_web_root(),
            images_dir: default_images_dir(),
            default_image: default_image(),
            max_upload_size: default_max_upload_size(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("auth.manager_role", "Manager")?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., SPICE__AUTH__JWT_SECRET)
            .add_source(
                Environment::with_prefix("SPICE")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.cors.allow_origins"),
            )
            .build()?;

        s.try_deserialize()
    }
}
