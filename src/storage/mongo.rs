//! MongoDB document store.
//!
//! Records live in the `tipcalculations` collection of the database named in
//! the connection URI. `date` is stored as a BSON datetime so the recent-list
//! query sorts on the server through the descending `date` index that is
//! registered right after the first successful ping.

use super::TipCalculationStore;
use super::connection::{ConnectionManager, Connector};
use crate::errors::StoreError;
use crate::models::{TipCalculation, TipCalculationDraft};
use crate::schema::{COLLECTION_NAME, build_record};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId};
use mongodb::{Client, Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};
use tracing::debug;

const DEFAULT_DATABASE: &str = "tipmate";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TipCalculationDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    customer_name: String,
    mobile_number: String,
    bill_amount: f64,
    tip_amount: f64,
    total_amount: f64,
    tip_percentage: i64,
    date: bson::DateTime,
}

impl TipCalculationDocument {
    fn from_record(id: ObjectId, record: &TipCalculation) -> Self {
        Self {
            id,
            customer_name: record.customer_name.clone(),
            mobile_number: record.mobile_number.clone(),
            bill_amount: record.bill_amount,
            tip_amount: record.tip_amount,
            total_amount: record.total_amount,
            tip_percentage: record.tip_percentage,
            date: bson::DateTime::from_millis(record.date.timestamp_millis()),
        }
    }

    fn into_record(self) -> Result<TipCalculation, StoreError> {
        let millis = self.date.timestamp_millis();
        let date = DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| {
            StoreError::Serialization(format!("date out of range: {millis}"))
        })?;
        Ok(TipCalculation {
            id: self.id.to_hex(),
            customer_name: self.customer_name,
            mobile_number: self.mobile_number,
            bill_amount: self.bill_amount,
            tip_amount: self.tip_amount,
            total_amount: self.total_amount,
            tip_percentage: self.tip_percentage,
            date,
        })
    }
}

pub struct MongoConnector {
    uri: String,
}

#[async_trait]
impl Connector for MongoConnector {
    type Handle = Database;

    async fn connect(&self) -> Result<Database, StoreError> {
        let client = Client::with_uri_str(&self.uri).await.map_err(connection_error)?;
        let database = client
            .default_database()
            .unwrap_or_else(|| client.database(DEFAULT_DATABASE));

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(connection_error)?;
        register_schema(&database).await?;

        Ok(database)
    }

    fn describe(&self) -> String {
        // The URI may carry credentials.
        "mongodb".to_string()
    }
}

async fn register_schema(database: &Database) -> Result<(), StoreError> {
    let index = IndexModel::builder().keys(doc! { "date": -1 }).build();
    collection(database)
        .create_index(index)
        .await
        .map_err(connection_error)?;
    debug!("registered {COLLECTION_NAME} schema");
    Ok(())
}

fn collection(database: &Database) -> Collection<TipCalculationDocument> {
    database.collection(COLLECTION_NAME)
}

fn connection_error(err: mongodb::error::Error) -> StoreError {
    StoreError::Connection(err.to_string())
}

fn query_error(err: mongodb::error::Error) -> StoreError {
    StoreError::Query(err.to_string())
}

pub struct MongoStore {
    connection: ConnectionManager<MongoConnector>,
}

impl MongoStore {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            connection: ConnectionManager::new(MongoConnector { uri: uri.into() }),
        }
    }
}

#[async_trait]
impl TipCalculationStore for MongoStore {
    async fn insert(&self, draft: TipCalculationDraft) -> Result<TipCalculation, StoreError> {
        let database = self.connection.connect().await?;
        let id = ObjectId::new();
        let record = build_record(draft, id.to_hex(), Utc::now())?;

        let document = TipCalculationDocument::from_record(id, &record);
        collection(&database)
            .insert_one(&document)
            .await
            .map_err(query_error)?;

        // Report the millisecond precision the store keeps.
        document.into_record()
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<TipCalculation>, StoreError> {
        let database = self.connection.connect().await?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let documents: Vec<TipCalculationDocument> = collection(&database)
            .find(doc! {})
            .sort(doc! { "date": -1 })
            .limit(limit)
            .await
            .map_err(query_error)?
            .try_collect()
            .await
            .map_err(query_error)?;

        documents
            .into_iter()
            .map(TipCalculationDocument::into_record)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn document_keeps_record_fields() {
        let id = ObjectId::new();
        let record = TipCalculation {
            id: id.to_hex(),
            customer_name: "Nila".to_string(),
            mobile_number: "9000000001".to_string(),
            bill_amount: 120.5,
            tip_amount: 12.05,
            total_amount: 132.55,
            tip_percentage: 10,
            date: Utc.with_ymd_and_hms(2026, 2, 2, 18, 45, 0).unwrap(),
        };

        let document = TipCalculationDocument::from_record(id, &record);
        let bson = bson::to_document(&document).unwrap();
        assert!(bson.contains_key("_id"));
        assert!(bson.contains_key("customerName"));
        assert!(bson.get_datetime("date").is_ok());

        assert_eq!(document.into_record().unwrap(), record);
    }

    #[tokio::test]
    async fn unreachable_server_reports_connection_error() {
        let store = MongoStore::new("not-a-mongodb-uri");
        let err = store.list_recent(10).await.unwrap_err();
        assert!(matches!(err, StoreError::Connection(_)));
    }
}
