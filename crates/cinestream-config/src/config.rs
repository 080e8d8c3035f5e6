use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that overrides `tmdb.api_key`
pub const TMDB_API_KEY_ENV: &str = "TMDB_API_KEY";

/// Storage key My List is saved under unless configured otherwise
pub const DEFAULT_LIST_KEY: &str = "cinestream-my-list";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_list_key")]
    pub list_key: String,
    /// Overrides the platform data directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_list_key() -> String {
    DEFAULT_LIST_KEY.to_string()
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            language: default_language(),
            base_url: default_base_url(),
            image_base_url: default_image_base_url(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            list_key: default_list_key(),
            data_dir: None,
        }
    }
}

impl TmdbConfig {
    /// API key from the environment, falling back to the config file
    pub fn resolve_api_key(&self) -> Option<String> {
        pick_api_key(std::env::var(TMDB_API_KEY_ENV).ok(), self.api_key.as_deref())
    }

    pub fn is_configured(&self) -> bool {
        self.resolve_api_key().is_some()
    }
}

fn pick_api_key(env: Option<String>, configured: Option<&str>) -> Option<String> {
    env.filter(|k| !k.trim().is_empty())
        .or_else(|| configured.filter(|k| !k.trim().is_empty()).map(str::to_string))
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load `path`, or defaults when the file does not exist yet
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.storage.list_key.trim().is_empty() {
            return Err(anyhow::anyhow!("storage.list_key cannot be empty"));
        }

        for (name, url) in [
            ("tmdb.base_url", &self.tmdb.base_url),
            ("tmdb.image_base_url", &self.tmdb.image_base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(anyhow::anyhow!("{} must be an http(s) URL, got '{}'", name, url));
            }
        }

        if self.tmdb.language.trim().is_empty() {
            return Err(anyhow::anyhow!("tmdb.language cannot be empty"));
        }

        Ok(())
    }

    /// Where My List is stored: the configured directory or the default one
    pub fn storage_dir(&self, default_dir: PathBuf) -> PathBuf {
        self.storage.data_dir.clone().unwrap_or(default_dir)
    }
}
