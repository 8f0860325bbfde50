use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_MEDIA_API_URL: &str = "https://api.cloudinary.com/v1_1";
const DEFAULT_MEDIA_FOLDER: &str = "storefront";

/// Configuration options of the storefront service.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    /// Interface the HTTP server binds to.
    pub address: String,
    /// Port the HTTP server listens on.
    pub port: u16,
    /// SQLite database location.
    pub database_url: String,
    /// Deployment environment name; `development` exposes error details in
    /// API responses.
    #[serde(default = "default_environment")]
    pub environment: String,
    /// Credentials and placement of uploaded images.
    pub media_store: MediaStoreConfig,
}

/// Settings of the remote image host.
#[derive(Clone, Debug, Deserialize)]
pub struct MediaStoreConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// Folder every uploaded object is placed under.
    #[serde(default = "default_media_folder")]
    pub folder: String,
    /// Base URL of the upload API, without the cloud name.
    #[serde(default = "default_media_api_url")]
    pub api_url: String,
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_media_folder() -> String {
    DEFAULT_MEDIA_FOLDER.to_string()
}

fn default_media_api_url() -> String {
    DEFAULT_MEDIA_API_URL.to_string()
}

impl ServerConfig {
    /// Loads `config/default.yaml`, the optional `config/{APP_ENV}.yaml`
    /// overlay and `APP__*` environment overrides, in that order.
    pub fn load() -> Result<Self, ConfigError> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| default_environment());

        Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{app_env}")).required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .set_default("environment", app_env)?
            .build()?
            .try_deserialize()
    }

    /// Whether internal error details may be returned to clients.
    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }

    /// Address string accepted by `HttpServer::bind`.
    pub fn bind_address(&self) -> (String, u16) {
        (self.address.clone(), self.port)
    }
}
