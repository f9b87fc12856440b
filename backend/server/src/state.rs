use std::sync::Arc;

use anyhow::Result;
use bank::Store;

use super::{config::Config, database::init_store};

pub struct AppState {
    pub config: Config,
    pub store: Store,
}

impl AppState {
    pub fn new(config: Config) -> Result<Arc<Self>> {
        let store = init_store(&config.db_path, config.csv_path.as_deref())?;

        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: Config, store: Store) -> Arc<Self> {
        Arc::new(Self { config, store })
    }
}
