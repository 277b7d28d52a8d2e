// ADIF import
// Turns raw ADIF records into validated QSOs and reports per-record problems
// as messages instead of failing the whole file.

use std::path::Path;

use serde::Serialize;

use super::fields::{field_mapping, AdifFields};
use super::parser::{parse_adif, AdifRecord};
use crate::import::MAX_ERROR_MESSAGES;
use crate::qso::QsoData;
use crate::time_utils::{adif_to_canonical, canonical_to_utc};

#[derive(Debug, Clone, Default, Serialize)]
pub struct AdifImportResult {
    /// True when at least one record was imported
    pub success: bool,
    pub imported: usize,
    /// Number of rejected records (exact, even when messages are truncated)
    pub errors: usize,
    /// First few human-readable problems
    pub error_messages: Vec<String>,
    pub records: Vec<QsoData>,
}

impl AdifImportResult {
    /// One rejected record, with every message explaining why
    fn reject(&mut self, messages: Vec<String>) {
        self.errors += 1;
        for message in messages {
            log::warn!("ADIF import: {}", message);
            if self.error_messages.len() < MAX_ERROR_MESSAGES {
                self.error_messages.push(message);
            }
        }
    }
}

/// Parse ADIF text into validated QSO records
pub fn import_adif(content: &str) -> AdifImportResult {
    let file = parse_adif(content);
    let mut result = AdifImportResult::default();

    if file.records.is_empty() {
        result.error_messages.push("No records found in ADIF file".to_string());
        return result;
    }

    for (index, record) in file.records.iter().enumerate() {
        match record_to_qso(record, index + 1) {
            Ok(qso) => result.records.push(qso),
            Err(messages) => result.reject(messages),
        }
    }

    result.imported = result.records.len();
    result.success = result.imported > 0;

    log::info!(
        "ADIF parse: {} records, {} imported, {} errors",
        file.records.len(),
        result.imported,
        result.errors
    );

    result
}

/// Read and import an ADIF file.
///
/// An unreadable file is the only case that produces a single overall
/// failure message rather than per-record messages.
pub fn import_adif_file(path: &Path) -> AdifImportResult {
    match std::fs::read_to_string(path) {
        Ok(content) => import_adif(&content),
        Err(e) => {
            log::error!("Failed to read ADIF file {}: {}", path.display(), e);
            AdifImportResult {
                errors: 1,
                error_messages: vec![format!("Failed to read file: {}", e)],
                ..Default::default()
            }
        }
    }
}

fn collect_fields(record: &AdifRecord) -> AdifFields {
    let mut fields = AdifFields::default();
    for (name, value) in &record.fields {
        if let Some(mapping) = field_mapping(name) {
            (mapping.import)(&mut fields, value.clone());
        }
    }
    fields
}

/// Build one QSO, or the messages explaining why record `number` was rejected
fn record_to_qso(record: &AdifRecord, number: usize) -> Result<QsoData, Vec<String>> {
    let fields = collect_fields(record);

    let Some(callsign) = fields.callsign.filter(|c| !c.trim().is_empty()) else {
        return Err(vec![format!("Record {}: Callsign missing", number)]);
    };
    let Some(qso_date) = fields.qso_date.filter(|d| !d.trim().is_empty()) else {
        return Err(vec![format!("Record {}: Date missing", number)]);
    };

    let datetime = adif_to_canonical(&qso_date, fields.time_on.as_deref())
        .and_then(|canonical| canonical_to_utc(&canonical).ok())
        .ok_or_else(|| vec![format!("Record {}: Invalid date/time", number)])?;

    let qso = QsoData {
        datetime,
        callsign,
        name: fields.name,
        notes: fields.notes,
        qth: fields.qth,
        rst_sent: fields.rst_sent,
        rst_received: fields.rst_received,
        freq: fields.freq,
        mode: fields.mode,
        tx_power: fields.tx_power,
    };

    qso.validate().map_err(|errors| {
        errors
            .into_iter()
            .map(|e| format!("Record {}: {}", number, e))
            .collect::<Vec<_>>()
    })?;

    Ok(qso)
}
