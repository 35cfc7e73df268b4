//! Metadata record CRUD operations.
//!
//! One row per canonical URL. A refresh replaces the row wholesale;
//! stale headers or cookies never survive alongside fresh ones.

use super::connection::MetadataStore;
use crate::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// One metadata snapshot for one URL.
///
/// `url` is the canonical key produced by the normalizer and is the
/// document identity; raw input URLs are never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct MetadataRecord {
    pub url: String,
    pub status_code: i32,
    pub headers: BTreeMap<String, String>,
    pub cookies: BTreeMap<String, String>,
    pub page_source: String,
    pub fetched_at: DateTime<Utc>,
}

/// Whether an upsert created a new row or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

fn decode_column<T: serde::de::DeserializeOwned>(idx: usize, json: &str) -> Result<T, rusqlite::Error> {
    serde_json::from_str(json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e)))
}

fn decode_timestamp(idx: usize, text: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(text)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e)))
}

impl MetadataStore {
    /// Insert or replace the snapshot for a canonical URL.
    ///
    /// The existence probe and the write run inside a single connection
    /// call, so the reported outcome matches what this write observed.
    pub async fn upsert(&self, record: &MetadataRecord) -> Result<UpsertOutcome, Error> {
        let headers_json = serde_json::to_string(&record.headers)
            .map_err(|e| Error::InvalidInput(format!("failed to encode headers: {e}")))?;
        let cookies_json = serde_json::to_string(&record.cookies)
            .map_err(|e| Error::InvalidInput(format!("failed to encode cookies: {e}")))?;
        let record = record.clone();

        self.conn
            .call(move |conn| -> Result<UpsertOutcome, Error> {
                let existed: bool = conn
                    .query_row(
                        "SELECT EXISTS(SELECT 1 FROM metadata WHERE url = ?1)",
                        params![record.url],
                        |row| row.get(0),
                    )
                    .map_err(Error::from)?;

                conn.execute(
                    "INSERT INTO metadata (
                        url, status_code, headers_json, cookies_json, page_source, fetched_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                    ON CONFLICT(url) DO UPDATE SET
                        status_code = excluded.status_code,
                        headers_json = excluded.headers_json,
                        cookies_json = excluded.cookies_json,
                        page_source = excluded.page_source,
                        fetched_at = excluded.fetched_at",
                    params![
                        &record.url,
                        record.status_code,
                        &headers_json,
                        &cookies_json,
                        &record.page_source,
                        record.fetched_at.to_rfc3339(),
                    ],
                )
                .map_err(Error::from)?;

                Ok(if existed { UpsertOutcome::Updated } else { UpsertOutcome::Created })
            })
            .await
            .map_err(Error::from)
    }

    /// Get the snapshot for a canonical URL.
    ///
    /// Returns None if no snapshot has been stored for the key.
    pub async fn get(&self, url: &str) -> Result<Option<MetadataRecord>, Error> {
        let url = url.to_string();
        self.conn
            .call(move |conn| -> Result<Option<MetadataRecord>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT url, status_code, headers_json, cookies_json, page_source, fetched_at
                     FROM metadata WHERE url = ?1",
                )?;

                let result = stmt.query_row(params![url], |row| {
                    let headers_json: String = row.get(2)?;
                    let cookies_json: String = row.get(3)?;
                    let fetched_at: String = row.get(5)?;
                    Ok(MetadataRecord {
                        url: row.get(0)?,
                        status_code: row.get(1)?,
                        headers: decode_column(2, &headers_json)?,
                        cookies: decode_column(3, &cookies_json)?,
                        page_source: row.get(4)?,
                        fetched_at: decode_timestamp(5, &fetched_at)?,
                    })
                });

                match result {
                    Ok(record) => Ok(Some(record)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Check whether a snapshot exists for a canonical URL.
    pub async fn exists(&self, url: &str) -> Result<bool, Error> {
        let url = url.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let existed: bool = conn
                    .query_row(
                        "SELECT EXISTS(SELECT 1 FROM metadata WHERE url = ?1)",
                        params![url],
                        |row| row.get(0),
                    )
                    .map_err(Error::from)?;
                Ok(existed)
            })
            .await
            .map_err(Error::from)
    }

    /// Count stored snapshots. Used by tests to assert key uniqueness.
    pub async fn count(&self) -> Result<i64, Error> {
        self.conn
            .call(|conn| conn.query_row("SELECT COUNT(*) FROM metadata", [], |row| row.get(0)))
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_record(url: &str) -> MetadataRecord {
        let mut headers = BTreeMap::new();
        headers.insert("content-type".to_string(), "text/html".to_string());
        headers.insert("server".to_string(), "nginx".to_string());
        let mut cookies = BTreeMap::new();
        cookies.insert("session".to_string(), "abc123".to_string());
        MetadataRecord {
            url: url.to_string(),
            status_code: 200,
            headers,
            cookies,
            page_source: "<html><body>Test Page</body></html>".to_string(),
            fetched_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_upsert_created_then_updated() {
        let store = MetadataStore::open_in_memory().await.unwrap();
        let record = make_test_record("http://test.com/a");

        let first = store.upsert(&record).await.unwrap();
        assert_eq!(first, UpsertOutcome::Created);

        let second = store.upsert(&record).await.unwrap();
        assert_eq!(second, UpsertOutcome::Updated);

        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_roundtrip() {
        let store = MetadataStore::open_in_memory().await.unwrap();
        let record = make_test_record("https://example.com/page");
        store.upsert(&record).await.unwrap();

        let retrieved = store.get("https://example.com/page").await.unwrap().unwrap();
        assert_eq!(retrieved.url, record.url);
        assert_eq!(retrieved.status_code, 200);
        assert_eq!(retrieved.headers.get("server").unwrap(), "nginx");
        assert_eq!(retrieved.cookies.get("session").unwrap(), "abc123");
        assert_eq!(retrieved.page_source, record.page_source);
        assert_eq!(retrieved.fetched_at, record.fetched_at);
    }

    #[tokio::test]
    async fn test_get_missing() {
        let store = MetadataStore::open_in_memory().await.unwrap();
        let result = store.get("https://missing.example").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_exists() {
        let store = MetadataStore::open_in_memory().await.unwrap();
        assert!(!store.exists("https://example.com").await.unwrap());

        store.upsert(&make_test_record("https://example.com")).await.unwrap();
        assert!(store.exists("https://example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_refresh_replaces_row_wholesale() {
        let store = MetadataStore::open_in_memory().await.unwrap();
        store.upsert(&make_test_record("https://example.com")).await.unwrap();

        let mut refreshed = make_test_record("https://example.com");
        refreshed.status_code = 404;
        refreshed.headers = BTreeMap::from([("x-new".to_string(), "1".to_string())]);
        refreshed.cookies = BTreeMap::new();
        refreshed.page_source = "<html>not found</html>".to_string();
        store.upsert(&refreshed).await.unwrap();

        let stored = store.get("https://example.com").await.unwrap().unwrap();
        assert_eq!(stored.status_code, 404);
        // the original headers and cookies must not survive the refresh
        assert!(!stored.headers.contains_key("server"));
        assert!(stored.cookies.is_empty());
        assert_eq!(stored.page_source, "<html>not found</html>");
    }

    #[tokio::test]
    async fn test_distinct_urls_are_distinct_rows() {
        let store = MetadataStore::open_in_memory().await.unwrap();
        store.upsert(&make_test_record("https://example.com/a")).await.unwrap();
        store.upsert(&make_test_record("https://example.com/b")).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 2);
    }
}
