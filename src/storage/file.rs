//! JSON file document store. The whole collection lives in one file that is
//! read on connect and rewritten after every insert.

use super::TipCalculationStore;
use super::connection::{ConnectionManager, Connector};
use crate::errors::StoreError;
use crate::models::{TipCalculation, TipCalculationDraft};
use crate::schema::build_record;
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::{fs, sync::Mutex};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct FileData {
    tip_calculations: Vec<TipCalculation>,
}

pub struct FileCollection {
    path: PathBuf,
    data: Mutex<FileData>,
}

pub struct FileConnector {
    path: PathBuf,
}

#[async_trait]
impl Connector for FileConnector {
    type Handle = Arc<FileCollection>;

    async fn connect(&self) -> Result<Self::Handle, StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let data = load_data(&self.path).await?;
        Ok(Arc::new(FileCollection {
            path: self.path.clone(),
            data: Mutex::new(data),
        }))
    }

    fn describe(&self) -> String {
        format!("file store {}", self.path.display())
    }
}

pub struct FileStore {
    connection: ConnectionManager<FileConnector>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            connection: ConnectionManager::new(FileConnector { path: path.into() }),
        }
    }
}

#[async_trait]
impl TipCalculationStore for FileStore {
    async fn insert(&self, draft: TipCalculationDraft) -> Result<TipCalculation, StoreError> {
        let collection = self.connection.connect().await?;
        let record = build_record(draft, Uuid::new_v4().simple().to_string(), Utc::now())?;

        let mut data = collection.data.lock().await;
        data.tip_calculations.push(record.clone());
        if let Err(err) = persist_data(&collection.path, &data).await {
            data.tip_calculations.pop();
            return Err(err);
        }
        Ok(record)
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<TipCalculation>, StoreError> {
        let collection = self.connection.connect().await?;
        let data = collection.data.lock().await;

        // Newest insert first, then a stable sort keeps that order for equal dates.
        let mut records: Vec<TipCalculation> =
            data.tip_calculations.iter().rev().cloned().collect();
        records.sort_by(|a, b| b.date.cmp(&a.date));
        records.truncate(limit);
        Ok(records)
    }
}

async fn load_data(path: &Path) -> Result<FileData, StoreError> {
    match fs::read(path).await {
        Ok(bytes) => serde_json::from_slice(&bytes).map_err(|err| {
            StoreError::Connection(format!("failed to parse {}: {err}", path.display()))
        }),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(FileData::default()),
        Err(err) => Err(StoreError::Connection(format!(
            "failed to read {}: {err}",
            path.display()
        ))),
    }
}

async fn persist_data(path: &Path, data: &FileData) -> Result<(), StoreError> {
    let payload = serde_json::to_vec_pretty(data)?;
    fs::write(path, payload).await?;
    Ok(())
}
