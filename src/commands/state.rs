//! Application State
//!
//! Shared by all database-backed command handlers.

use crate::config::Config;
use crate::db::SqliteStore;
use crate::error::Result;

pub struct AppState {
    pub store: SqliteStore,
    pub config: Config,
}

impl AppState {
    /// Open the configured database and overlay its persisted settings
    pub async fn open(mut config: Config) -> Result<Self> {
        let store = SqliteStore::open(&config.db_path).await?;
        config.apply_settings(&store).await?;
        Ok(Self { store, config })
    }

    /// Resolve an optional logbook id, failing on unknown ids
    pub(crate) async fn logbook_name(&self, logbook_id: Option<&str>) -> Result<Option<String>> {
        match logbook_id {
            Some(id) => Ok(Some(self.store.get_logbook(id).await?.name)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
impl AppState {
    pub(crate) async fn in_memory() -> Self {
        let store = SqliteStore::in_memory().await.unwrap();
        Self {
            store,
            config: Config::default(),
        }
    }
}
