//! Record store: persist parsed records as documents in SurrealDB.
//!
//! The connection URI selects the engine — `ws://host:port` for a remote
//! cluster, `mem://` for an embedded in-memory instance (used by the test
//! suite). One handle is opened at process startup and cloned into handlers;
//! the underlying client is internally reference-counted.
//!
//! Inserts are append-only by design: no schema validation, no deduplication,
//! no upsert. Running the pipeline twice over the same document produces two
//! independent records with two distinct generated identifiers.

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use crate::output::{Record, StoredRecord};
use surrealdb::engine::any::{self, Any};
use surrealdb::{RecordId, Surreal};
use tracing::{debug, info};

/// Handle to the record collection.
#[derive(Clone, Debug)]
pub struct RecordStore {
    db: Surreal<Any>,
    table: String,
}

impl RecordStore {
    /// Connect to the store at `uri` and select the configured
    /// namespace/database.
    ///
    /// # Errors
    /// Returns [`ExtractError::StorageWrite`] when the endpoint is
    /// unreachable or namespace selection fails.
    pub async fn connect(uri: &str, config: &ExtractionConfig) -> Result<Self, ExtractError> {
        let db = any::connect(uri)
            .await
            .map_err(|e| ExtractError::StorageWrite {
                detail: format!("failed to connect to '{uri}': {e}"),
            })?;

        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await
            .map_err(|e| ExtractError::StorageWrite {
                detail: format!(
                    "failed to select {}/{}: {e}",
                    config.namespace, config.database
                ),
            })?;

        info!(
            uri,
            namespace = %config.namespace,
            database = %config.database,
            table = %config.table,
            "record store connected"
        );

        Ok(Self {
            db,
            table: config.table.clone(),
        })
    }

    /// Connect using the URI from `PDF2CLAIM_DB_URI`.
    ///
    /// Absence of the variable fails here, at construction time — never
    /// mid-pipeline.
    pub async fn from_env(config: &ExtractionConfig) -> Result<Self, ExtractError> {
        let uri = std::env::var("PDF2CLAIM_DB_URI")
            .ok()
            .filter(|u| !u.is_empty())
            .ok_or(ExtractError::MissingEnv {
                name: "PDF2CLAIM_DB_URI",
                hint: "Set PDF2CLAIM_DB_URI to a SurrealDB endpoint, e.g. ws://localhost:8000 \
                       (or mem:// for an embedded in-memory store).",
            })?;
        Self::connect(&uri, config).await
    }

    /// Insert a record as a new document and return it with its generated
    /// identifier.
    pub async fn insert(&self, record: Record) -> Result<StoredRecord, ExtractError> {
        let created: Option<StoredRecord> = self
            .db
            .create(self.table.as_str())
            .content(record)
            .await
            .map_err(|e| ExtractError::StorageWrite {
                detail: format!("insert into '{}' failed: {e}", self.table),
            })?;

        let stored = created.ok_or_else(|| ExtractError::StorageWrite {
            detail: format!("insert into '{}' returned no record", self.table),
        })?;

        debug!(id = %stored.id, "record inserted");
        Ok(stored)
    }

    /// Fetch a stored record by its generated identifier.
    pub async fn fetch(&self, id: &RecordId) -> Result<Option<StoredRecord>, ExtractError> {
        self.db
            .select(id.clone())
            .await
            .map_err(|e| ExtractError::StorageWrite {
                detail: format!("fetch of '{id}' failed: {e}"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(pairs: &[(&str, serde_json::Value)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    async fn mem_store() -> RecordStore {
        let config = ExtractionConfig::default();
        RecordStore::connect("mem://", &config).await.unwrap()
    }

    #[tokio::test]
    async fn insert_then_fetch_round_trips_fields() {
        let store = mem_store().await;
        let stored = store
            .insert(record(&[
                ("patient_name", json!("Jane Doe")),
                ("claim_number", json!("C123")),
            ]))
            .await
            .unwrap();

        let fetched = store.fetch(&stored.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, stored.id);
        assert_eq!(fetched.fields["patient_name"], json!("Jane Doe"));
        assert_eq!(fetched.fields["claim_number"], json!("C123"));
        assert_eq!(fetched.fields.len(), 2);
    }

    #[tokio::test]
    async fn identical_inserts_get_distinct_ids() {
        let store = mem_store().await;
        let fields = record(&[("claim_number", json!("C123"))]);

        let first = store.insert(fields.clone()).await.unwrap();
        let second = store.insert(fields).await.unwrap();

        assert_ne!(first.id, second.id, "no deduplication is performed");
        assert!(store.fetch(&first.id).await.unwrap().is_some());
        assert!(store.fetch(&second.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn unknown_id_fetch_is_none() {
        let store = mem_store().await;
        let id = RecordId::from_table_key("insurance", "does-not-exist");
        assert!(store.fetch(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unreachable_endpoint_surfaces_a_storage_error() {
        let config = ExtractionConfig::default();
        let err = RecordStore::connect("ws://127.0.0.1:9", &config)
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::StorageWrite { .. }));
    }
}
