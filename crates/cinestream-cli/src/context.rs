use cinestream_config::{Config, PathManager};
use cinestream_core::{FileKeyValueStore, ListChange, SavedListStore, Subscription};
use cinestream_sources::{CatalogSource, TmdbClient};
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;

/// Everything a command needs: resolved paths and the loaded configuration
pub struct AppContext {
    pub paths: PathManager,
    pub config: Config,
}

impl AppContext {
    pub fn load() -> Result<Self> {
        let paths = PathManager::default();
        let config_file = paths.config_file();
        let config = Config::load_or_default(&config_file)
            .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
        config
            .validate()
            .map_err(|e| eyre!("Invalid configuration in {}: {}", config_file.display(), e))?;
        Ok(Self { paths, config })
    }

    /// Open My List from the configured storage directory
    pub fn open_list(&self) -> SavedListStore<FileKeyValueStore> {
        let dir = self.config.storage_dir(self.paths.storage_dir());
        tracing::debug!("Opening My List from {:?}", dir);
        SavedListStore::open_with_key(FileKeyValueStore::new(dir), self.config.storage.list_key.clone())
    }

    pub fn catalog(&self) -> Result<TmdbClient> {
        let client = TmdbClient::from_config(&self.config.tmdb).wrap_err("Cannot reach the catalog")?;
        tracing::debug!(source = client.source_name(), base_url = client.base_url(), "Catalog ready");
        Ok(client)
    }
}

/// Log every change to My List for as long as the returned handle lives
pub fn log_changes(store: &SavedListStore<FileKeyValueStore>) -> Subscription {
    store.subscribe(|change: &ListChange| {
        tracing::info!(operation = "my_list", change = %change, "My List updated");
    })
}
