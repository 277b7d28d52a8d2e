//! Store-backed imports
//!
//! Both import paths end the same way: each candidate QSO is checked against
//! the records already known for the target logbook, then persisted one at a
//! time. The known set belongs to one import run and grows as records are
//! created, so repeated rows within a single file are skipped too.

pub mod adif;
pub mod csv;
pub mod duplicates;

pub use self::adif::persist_adif_import;
pub use self::csv::{
    import_csv, import_csv_rows, suggest_csv_mapping, validate_csv_mapping, CsvField,
    CsvImportOptions, CsvMapping, CsvTable, MappingError,
};
pub use self::duplicates::{find_duplicate, is_duplicate};

use serde::Serialize;

use crate::db::QsoStore;
use crate::error::Result;
use crate::qso::{QsoData, QsoRecord};

/// Cap on human-readable messages returned with an import result
pub const MAX_ERROR_MESSAGES: usize = 5;

/// Outcome of a store-backed import
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportSummary {
    /// True when at least one record was created
    pub success: bool,
    pub imported: usize,
    pub failed: usize,
    /// Duplicates of existing (or earlier imported) records
    pub skipped: usize,
    pub error_messages: Vec<String>,
    pub records: Vec<QsoRecord>,
}

impl ImportSummary {
    pub(crate) fn record_failure(&mut self, message: String) {
        log::warn!("Import: {}", message);
        self.failed += 1;
        self.push_message(message);
    }

    pub(crate) fn push_message(&mut self, message: String) {
        if self.error_messages.len() < MAX_ERROR_MESSAGES {
            self.error_messages.push(message);
        }
    }

    fn finish(mut self, source: &str) -> Self {
        self.success = self.imported > 0;
        log::info!(
            "{} import: {} imported, {} skipped, {} failed",
            source,
            self.imported,
            self.skipped,
            self.failed
        );
        self
    }
}

pub(crate) enum PersistOutcome {
    Created,
    Duplicate,
    Failed(String),
}

/// One import run against one logbook
pub(crate) struct ImportSession<'a, S: QsoStore> {
    store: &'a S,
    logbook_id: Option<&'a str>,
    known: Vec<QsoRecord>,
    summary: ImportSummary,
}

impl<'a, S: QsoStore> ImportSession<'a, S> {
    /// Fetch the logbook's existing records once, up front
    pub(crate) async fn begin(store: &'a S, logbook_id: Option<&'a str>) -> Result<Self> {
        let existing = store.list_records(logbook_id).await?;
        Ok(Self::with_existing(store, logbook_id, existing))
    }

    pub(crate) fn with_existing(
        store: &'a S,
        logbook_id: Option<&'a str>,
        existing: Vec<QsoRecord>,
    ) -> Self {
        Self {
            store,
            logbook_id,
            known: existing,
            summary: ImportSummary::default(),
        }
    }

    pub(crate) fn summary_mut(&mut self) -> &mut ImportSummary {
        &mut self.summary
    }

    /// Skip if already known, otherwise create and remember it
    pub(crate) async fn persist(&mut self, data: QsoData) -> PersistOutcome {
        if let Some(existing) = find_duplicate(&data, &self.known) {
            log::debug!(
                "Skipping duplicate of {}: {} at {}",
                existing.id,
                data.callsign,
                data.datetime
            );
            self.summary.skipped += 1;
            return PersistOutcome::Duplicate;
        }

        match self.store.create_record(&data, self.logbook_id).await {
            Ok(record) => {
                self.known.push(record.clone());
                self.summary.records.push(record);
                self.summary.imported += 1;
                PersistOutcome::Created
            }
            Err(e) => PersistOutcome::Failed(e.to_string()),
        }
    }

    pub(crate) fn finish(self, source: &str) -> ImportSummary {
        self.summary.finish(source)
    }
}
