use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use super::{legacy::migrate_stored, ReportStore, StoredReport};
use crate::error::StoreError;
use crate::types::Report;

struct Entry {
    record: StoredReport,
    /// Insertion or refresh order, breaks `created_at` ties.
    seq: u64,
}

#[derive(Default)]
struct Inner {
    entries: HashMap<u64, Entry>,
    by_url: HashMap<String, u64>,
    next_id: u64,
    next_seq: u64,
}

impl Inner {
    /// Keeps `by_url` and `entries` one-to-one: a record replaces both the
    /// previous entry for its URL and whatever URL its id pointed at before.
    fn insert(&mut self, record: StoredReport) {
        if let Some(previous) = self.by_url.get(&record.report.url).copied() {
            if previous != record.id {
                self.entries.remove(&previous);
            }
        }
        if let Some(displaced) = self.entries.get(&record.id) {
            let old_url = &displaced.record.report.url;
            if *old_url != record.report.url && self.by_url.get(old_url) == Some(&record.id) {
                self.by_url.remove(old_url);
            }
        }
        self.next_id = self.next_id.max(record.id.saturating_add(1));
        self.by_url.insert(record.report.url.clone(), record.id);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(record.id, Entry { record, seq });
    }
}

/// Process-local report store.
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_id: 1,
                ..Inner::default()
            }),
        }
    }

    /// Builds a store from a JSON array of stored records, migrating each
    /// one. Records are applied oldest first, so for duplicate URLs the most
    /// recent record wins.
    pub fn seed_from_json(json: &str) -> Result<Self, StoreError> {
        let values: Vec<serde_json::Value> = serde_json::from_str(json)?;
        let mut records = values
            .into_iter()
            .map(migrate_stored)
            .collect::<Result<Vec<_>, _>>()?;
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        let mut inner = Inner {
            next_id: 1,
            ..Inner::default()
        };
        for record in records {
            inner.insert(record);
        }
        debug!(reports = inner.entries.len(), "seeded report store");

        Ok(Self {
            inner: RwLock::new(inner),
        })
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReportStore for MemoryStore {
    async fn create(&self, report: Report) -> Result<StoredReport, StoreError> {
        let mut inner = self.inner.write().await;

        let id = match inner.by_url.get(&report.url) {
            Some(&id) => id,
            None => inner.next_id,
        };
        let record = StoredReport {
            id,
            created_at: Utc::now(),
            report,
        };
        inner.insert(record.clone());

        Ok(record)
    }

    async fn get(&self, id: u64) -> Result<Option<StoredReport>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.entries.get(&id).map(|e| e.record.clone()))
    }

    async fn list(&self, limit: usize) -> Result<Vec<StoredReport>, StoreError> {
        let inner = self.inner.read().await;
        let mut entries: Vec<&Entry> = inner.entries.values().collect();
        entries.sort_by(|a, b| {
            b.record
                .created_at
                .cmp(&a.record.created_at)
                .then(b.seq.cmp(&a.seq))
        });

        Ok(entries
            .into_iter()
            .take(limit)
            .map(|e| e.record.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::assemble;

    fn make_report(url: &str) -> Report {
        assemble(url, vec![])
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = MemoryStore::new();
        let stored = store.create(make_report("https://a.test/")).await.unwrap();

        assert_eq!(stored.id, 1);
        let fetched = store.get(stored.id).await.unwrap().unwrap();
        assert_eq!(fetched, stored);
        assert!(store.get(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_upserts_by_url() {
        let store = MemoryStore::new();
        let first = store.create(make_report("https://a.test/")).await.unwrap();
        store.create(make_report("https://b.test/")).await.unwrap();

        let mut updated = make_report("https://a.test/");
        updated.seo_score = 42;
        let second = store.create(updated).await.unwrap();

        assert_eq!(second.id, first.id);
        assert!(second.created_at >= first.created_at);
        assert_eq!(store.len().await, 2);
        assert_eq!(store.get(first.id).await.unwrap().unwrap().report.seo_score, 42);
    }

    #[tokio::test]
    async fn test_list_newest_first_with_limit() {
        let store = MemoryStore::new();
        for url in ["https://a.test/", "https://b.test/", "https://c.test/"] {
            store.create(make_report(url)).await.unwrap();
        }
        // Re-analysing a moves it to the front.
        store.create(make_report("https://a.test/")).await.unwrap();

        let urls: Vec<String> = store
            .list(10)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.report.url)
            .collect();
        assert_eq!(urls, vec!["https://a.test/", "https://c.test/", "https://b.test/"]);

        assert_eq!(store.list(2).await.unwrap().len(), 2);
        assert!(store.list(0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_seed_from_json_migrates_and_continues_ids() {
        let json = r#"[
            {"id": 4, "createdAt": "2024-03-01T10:00:00Z", "url": "https://old.test/",
             "seoScore": 80, "details": {"seo": {"score": 80, "checks": []}}},
            {"id": 7, "createdAt": "2024-05-01T10:00:00Z", "url": "https://new.test/",
             "overallScore": 55}
        ]"#;
        let store = MemoryStore::seed_from_json(json).unwrap();

        let listed = store.list(10).await.unwrap();
        assert_eq!(listed[0].id, 7);
        assert_eq!(listed[1].report.seo_score, 80);
        assert_eq!(listed[0].report.overall_score, 55);

        let created = store.create(make_report("https://fresh.test/")).await.unwrap();
        assert_eq!(created.id, 8);
    }

    #[tokio::test]
    async fn test_seed_duplicate_id_drops_older_url() {
        let json = r#"[
            {"id": 1, "createdAt": "2024-01-01T00:00:00Z", "url": "https://a.test/"},
            {"id": 1, "createdAt": "2024-02-01T00:00:00Z", "url": "https://b.test/"}
        ]"#;
        let store = MemoryStore::seed_from_json(json).unwrap();
        assert_eq!(store.len().await, 1);
        assert_eq!(store.get(1).await.unwrap().unwrap().report.url, "https://b.test/");

        // a.test no longer owns id 1, so analysing it again must not clobber b.test.
        let created = store.create(make_report("https://a.test/")).await.unwrap();
        assert_eq!(created.id, 2);
        assert_eq!(store.get(1).await.unwrap().unwrap().report.url, "https://b.test/");
        assert_eq!(store.len().await, 2);
    }

    #[test]
    fn test_seed_rejects_non_array() {
        assert!(matches!(
            MemoryStore::seed_from_json(r#"{"id": 1}"#),
            Err(StoreError::Malformed(_))
        ));
    }
}
