//! Store selection from command-line options

use anyhow::{Context, Result};
use mergebase_core::MergeBaseStore;
use mergebase_db::LocalStore;
use mergebase_rockset::{RocksetConfig, RocksetStore};
use std::path::PathBuf;
use std::sync::Arc;

pub struct StoreArgs {
    pub local_store: Option<PathBuf>,
    pub rockset_server: String,
    pub rockset_api_key: Option<String>,
}

impl StoreArgs {
    /// Local store when `--local-store` is given, Rockset otherwise
    pub fn open(&self) -> Result<Arc<dyn MergeBaseStore>> {
        if self.local_store.is_some() {
            return Ok(Arc::new(self.open_local()?));
        }

        let api_key = self
            .rockset_api_key
            .clone()
            .context("ROCKSET_API_KEY is not set (or pass --local-store)")?;
        log::info!("Using Rockset at {}", self.rockset_server);
        Ok(Arc::new(RocksetStore::new(RocksetConfig::new(
            self.rockset_server.clone(),
            api_key,
        ))))
    }

    pub fn open_local(&self) -> Result<LocalStore> {
        let path = self
            .local_store
            .as_ref()
            .context("This command needs --local-store")?;
        log::info!("Using local store at {:?}", path);
        LocalStore::open(path)
    }
}
