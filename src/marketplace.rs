//! Wires the store, ledger and catalog together over one sled database.
use crate::catalog::Catalog;
use crate::config::LedgerConfig;
use crate::error::{ConfigError, OpenError, StoreError};
use crate::ledger::Ledger;
use crate::store::{Snapshot, Store};
use crate::time::{Clock, SystemClock};
use std::sync::Arc;
use tracing::info;

pub struct Marketplace {
    store: Arc<Store>,
    ledger: Ledger,
    catalog: Catalog,
}

impl Marketplace {
    pub fn new(instance: Arc<sled::Db>, config: LedgerConfig) -> Result<Self, ConfigError> {
        Self::with_clock(instance, config, Arc::new(SystemClock))
    }

    /// Fails when `config` does not validate.
    pub fn with_clock(
        instance: Arc<sled::Db>,
        config: LedgerConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        let store = Arc::new(Store::new(instance));
        let ledger = Ledger::new(store.clone(), Arc::new(config), clock.clone())?;
        let catalog = Catalog::new(store.clone(), clock);
        Ok(Self {
            store,
            ledger,
            catalog,
        })
    }

    /// Open (or create) the database at `config.db_path`. Whatever was stored
    /// there before is picked up as is. The config is checked before the
    /// database is touched.
    pub fn open(config: LedgerConfig) -> Result<Self, OpenError> {
        config.validate()?;
        let db = sled::Config::new()
            .path(&config.db_path)
            .temporary(config.temporary)
            .open()
            .map_err(StoreError::from)?;
        info!(path = %config.db_path.display(), recovered = db.was_recovered(), "marketplace store opened");
        Ok(Self::new(Arc::new(db), config)?)
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn snapshot(&self) -> Result<Snapshot, StoreError> {
        self.store.snapshot()
    }

    pub fn flush(&self) -> Result<(), StoreError> {
        self.store.flush()
    }
}
