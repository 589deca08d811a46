use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use reqwest::Client;
use reqwest::header::LOCATION;
use reqwest::multipart::{Form, Part};
use reqwest::redirect::Policy;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Set};
use serde_json::Value;
use tempfile::TempDir;

use spice_common::Spiciness;
use spice_common::storage::filesystem::FilesystemFileStore;
use spice_server::config::{
    AppConfig, AuthConfig, CorsConfig, DatabaseConfig, ServerConfig, StorageConfig,
};
use spice_server::entity::{category, menu_item, sub_category};
use spice_server::state::AppState;
use spice_server::utils::jwt;

pub const JWT_SECRET: &str = "test-secret-for-integration-tests";

/// Bytes of the placeholder image seeded into every test web root.
pub const PLACEHOLDER: &[u8] = b"\x89PNG\r\n\x1a\nplaceholder";

/// Upload cap used by the test server.
pub const MAX_UPLOAD: u64 = 4 * 1024;

pub mod routes {
    pub const CATEGORIES: &str = "/admin/categories";
    pub const CATEGORY_CREATE: &str = "/admin/categories/create";
    pub const MENU_ITEMS: &str = "/admin/menu-items";
    pub const MENU_ITEM_CREATE: &str = "/admin/menu-items/create";

    pub fn category(action: &str, id: i32) -> String {
        format!("/admin/categories/{action}/{id}")
    }

    pub fn menu_item(action: &str, id: i32) -> String {
        format!("/admin/menu-items/{action}/{id}")
    }

    pub fn sub_categories_of(category_id: i32) -> String {
        format!("/admin/sub-categories/by-category/{category_id}")
    }
}

/// A running test server with its own SQLite database and web root.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: DatabaseConnection,
    pub web_root: PathBuf,
    pub manager_token: String,
    _dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
    /// `Location` header of a redirect.
    pub location: Option<String>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");

        let db_url = format!("sqlite://{}?mode=rwc", dir.path().join("spice.db").display());
        let db = spice_server::database::init_db(&db_url)
            .await
            .expect("Failed to initialize test database");

        let web_root = dir.path().join("wwwroot");
        std::fs::create_dir_all(web_root.join("images")).expect("Failed to create images dir");
        std::fs::write(web_root.join("images/default_food.png"), PLACEHOLDER)
            .expect("Failed to write placeholder image");

        let app_config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
            },
            database: DatabaseConfig { url: db_url },
            auth: AuthConfig {
                jwt_secret: JWT_SECRET.to_string(),
                manager_role: "Manager".to_string(),
            },
            storage: StorageConfig {
                web_root: web_root.clone(),
                max_upload_size: MAX_UPLOAD,
                ..StorageConfig::default()
            },
        };

        let files = FilesystemFileStore::new(web_root.clone(), MAX_UPLOAD)
            .await
            .expect("Failed to open file store");

        let state = AppState {
            db: db.clone(),
            config: app_config,
            files: Arc::new(files),
        };

        let app = spice_server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = Client::builder()
            .redirect(Policy::none())
            .build()
            .expect("Failed to build HTTP client");

        Self {
            addr,
            client,
            db,
            web_root,
            manager_token: token_for_role("Manager"),
            _dir: dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.get_with_token(path, &self.manager_token).await
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn get_without_token(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    /// POST an urlencoded form as the manager.
    pub async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        self.post_form_with_token(path, fields, &self.manager_token)
            .await
    }

    pub async fn post_form_with_token(
        &self,
        path: &str,
        fields: &[(&str, &str)],
        token: &str,
    ) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .form(fields)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_form_without_token(&self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .form(fields)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    /// POST a multipart form as the manager.
    pub async fn post_multipart(&self, path: &str, form: Form) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {}", self.manager_token))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send multipart request");

        TestResponse::from_response(res).await
    }

    /// Insert a category directly and return its `id`.
    pub async fn insert_category(&self, name: &str) -> i32 {
        category::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .expect("insert category")
        .id
    }

    /// Insert a sub category directly and return its `id`.
    pub async fn insert_sub_category(&self, name: &str, category_id: i32) -> i32 {
        sub_category::ActiveModel {
            name: Set(name.to_string()),
            category_id: Set(category_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .expect("insert sub category")
        .id
    }

    /// Insert a menu item directly, with `image` as its stored reference.
    pub async fn insert_menu_item(
        &self,
        name: &str,
        category_id: i32,
        sub_category_id: i32,
        image: Option<&str>,
    ) -> i32 {
        menu_item::ActiveModel {
            name: Set(name.to_string()),
            description: Set(None),
            spicyness: Set(Spiciness::Na),
            image: Set(image.map(str::to_string)),
            price: Set(5.0),
            category_id: Set(category_id),
            sub_category_id: Set(sub_category_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .expect("insert menu item")
        .id
    }

    /// A category with one sub category, returned as `(category_id, sub_category_id)`.
    pub async fn seed_pizza(&self) -> (i32, i32) {
        let category_id = self.insert_category("Pizza").await;
        let sub_category_id = self.insert_sub_category("Classic", category_id).await;
        (category_id, sub_category_id)
    }

    pub async fn category_count(&self) -> u64 {
        category::Entity::find()
            .count(&self.db)
            .await
            .expect("count categories")
    }

    pub async fn menu_item_count(&self) -> u64 {
        menu_item::Entity::find()
            .count(&self.db)
            .await
            .expect("count menu items")
    }

    pub async fn find_menu_item(&self, id: i32) -> Option<menu_item::Model> {
        menu_item::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .expect("find menu item")
    }

    /// On-disk location of an image reference such as `/images/7.png`.
    pub fn image_file(&self, reference: &str) -> PathBuf {
        self.web_root.join(Path::new(reference.trim_start_matches('/')))
    }
}

/// A token for user 1 holding `role`, signed with the test secret.
pub fn token_for_role(role: &str) -> String {
    jwt::sign(1, &format!("{}-user", role.to_lowercase()), role, JWT_SECRET)
        .expect("Failed to sign token")
}

/// Text fields of a menu item form. Append an image with [`with_image`].
pub fn menu_item_form(
    name: &str,
    price: &str,
    category_id: i32,
    sub_category_id: i32,
) -> Form {
    Form::new()
        .text("name", name.to_string())
        .text("description", "House special")
        .text("price", price.to_string())
        .text("spicyness", "Spicy")
        .text("category_id", category_id.to_string())
        .text("sub_category_id", sub_category_id.to_string())
}

pub fn with_image(form: Form, file_name: &str, bytes: &[u8]) -> Form {
    let part = Part::bytes(bytes.to_vec()).file_name(file_name.to_string());
    form.part("image", part)
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let location = res
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self {
            status,
            text,
            body,
            location,
        }
    }

    /// Assert a `303 See Other` to `location`.
    pub fn assert_redirect(&self, location: &str) {
        assert_eq!(self.status, 303, "expected redirect, got: {}", self.text);
        assert_eq!(self.location.as_deref(), Some(location));
    }
}
