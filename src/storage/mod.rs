pub mod connection;
pub mod file;
pub mod mongo;

use crate::config::StoreConfig;
use crate::errors::StoreError;
use crate::models::{TipCalculation, TipCalculationDraft};
use async_trait::async_trait;
use std::sync::Arc;

pub use connection::{ConnectionManager, Connector};
pub use file::FileStore;
pub use mongo::MongoStore;

/// How many records the history list returns.
pub const RECENT_LIMIT: usize = 10;

#[async_trait]
pub trait TipCalculationStore: Send + Sync {
    /// Validates `draft` against the schema, assigns an id, and persists it.
    async fn insert(&self, draft: TipCalculationDraft) -> Result<TipCalculation, StoreError>;

    /// Records ordered by `date`, newest first, at most `limit` of them.
    async fn list_recent(&self, limit: usize) -> Result<Vec<TipCalculation>, StoreError>;
}

/// Builds the configured store. No connection is made until the first operation.
pub fn open(config: &StoreConfig) -> Arc<dyn TipCalculationStore> {
    match config {
        StoreConfig::Mongo { uri } => Arc::new(MongoStore::new(uri.clone())),
        StoreConfig::File { path } => Arc::new(FileStore::new(path.clone())),
    }
}
