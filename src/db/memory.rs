// In-memory QSO store

use tokio::sync::Mutex;

use super::QsoStore;
use crate::error::Result;
use crate::qso::{QsoData, QsoRecord};

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<QsoRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing set of records
    pub fn with_records(records: Vec<QsoRecord>) -> Self {
        Self { records: Mutex::new(records) }
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

impl QsoStore for MemoryStore {
    async fn create_record(&self, data: &QsoData, logbook_id: Option<&str>) -> Result<QsoRecord> {
        let record = QsoRecord {
            id: uuid::Uuid::new_v4().to_string(),
            logbook_id: logbook_id.map(str::to_string),
            data: data.clone(),
        };
        self.records.lock().await.push(record.clone());
        Ok(record)
    }

    async fn list_records(&self, logbook_id: Option<&str>) -> Result<Vec<QsoRecord>> {
        let records = self.records.lock().await;
        let mut matching: Vec<QsoRecord> = records
            .iter()
            .filter(|r| logbook_id.is_none() || r.logbook_id.as_deref() == logbook_id)
            .cloned()
            .collect();
        matching.sort_by_key(|r| r.data.datetime);
        Ok(matching)
    }
}
