// src/store/mod.rs
//
// Persistence for finished reports. The analysis engine never touches this
// module; only the server does.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::types::Report;

/// A report as kept by a store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredReport {
    pub id: u64,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub report: Report,
}

#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Stores a report. A report for an already stored URL replaces it,
    /// keeping the id and refreshing `created_at`.
    async fn create(&self, report: Report) -> Result<StoredReport, StoreError>;

    async fn get(&self, id: u64) -> Result<Option<StoredReport>, StoreError>;

    /// Newest first.
    async fn list(&self, limit: usize) -> Result<Vec<StoredReport>, StoreError>;
}

// Module declarations
pub mod legacy;
pub mod memory;

pub use legacy::{migrate_report, migrate_stored};
pub use memory::MemoryStore;
