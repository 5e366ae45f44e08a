use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub cors: CorsSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    #[serde(default = "default_records_path")]
    pub records_path: PathBuf,
    #[serde(default = "default_dashboards_path")]
    pub dashboards_path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsSettings {
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            records_path: default_records_path(),
            dashboards_path: default_dashboards_path(),
        }
    }
}

impl Default for CorsSettings {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl ServerSettings {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_records_path() -> PathBuf {
    PathBuf::from("data/mockData.json")
}

fn default_dashboards_path() -> PathBuf {
    PathBuf::from("data/charts.json")
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

/// Load `config/app.*` (optional) overlaid with `DASHBOARD__*` environment variables
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    load_with_file(config::File::with_name("config/app").required(false))
}

fn load_with_file<S>(file: S) -> anyhow::Result<AppConfig>
where
    S: config::Source + Send + Sync + 'static,
{
    let settings = config::Config::builder()
        .add_source(file)
        .add_source(environment())
        .build()?;

    Ok(settings.try_deserialize()?)
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("DASHBOARD")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("cors.allowed_origins")
}
