//! ADIF import/export commands
//!
//! This module handles:
//! - import_adif: Import QSOs from an ADIF file into a logbook (or dry-run it)
//! - export_adif: Write a logbook (or every QSO) to an ADIF file

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::state::AppState;
use crate::adif::{export_adif as render_adif, import_adif_file};
use crate::db::{MemoryStore, QsoStore};
use crate::error::Result;
use crate::import::{persist_adif_import, ImportSummary};

// ============================================================================
// Data Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ExportResult {
    pub path: PathBuf,
    pub record_count: usize,
}

// ============================================================================
// Commands
// ============================================================================

/// With `dry_run`, records go to a scratch copy of the logbook instead
pub async fn import_adif(
    state: &AppState,
    path: &Path,
    logbook_id: Option<&str>,
    dry_run: bool,
) -> Result<ImportSummary> {
    state.logbook_name(logbook_id).await?;

    log::info!("Importing ADIF file {}", path.display());
    let parsed = import_adif_file(path);

    if dry_run {
        let scratch = MemoryStore::with_records(state.store.list_records(logbook_id).await?);
        return persist_adif_import(&scratch, parsed, logbook_id).await;
    }
    persist_adif_import(&state.store, parsed, logbook_id).await
}

/// Export to `output`, or to the suggested filename in the current directory
pub async fn export_adif(
    state: &AppState,
    logbook_id: Option<&str>,
    station_callsign: Option<&str>,
    output: Option<&Path>,
) -> Result<ExportResult> {
    let logbook_name = state.logbook_name(logbook_id).await?;
    let station_callsign = station_callsign.or(state.config.station_callsign.as_deref());

    let records = state.store.list_records(logbook_id).await?;
    let export = render_adif(
        records.iter().map(|r| &r.data),
        logbook_name.as_deref(),
        station_callsign,
    );

    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&export.filename));
    std::fs::write(&path, &export.content)?;
    log::info!("Wrote {} QSOs to {}", export.record_count, path.display());

    Ok(ExportResult {
        path,
        record_count: export.record_count,
    })
}
