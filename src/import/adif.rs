// ADIF into a store
// Parsing is done by `crate::adif`; this only persists what parsed cleanly.

use super::{ImportSession, ImportSummary, PersistOutcome};
use crate::adif::AdifImportResult;
use crate::db::QsoStore;
use crate::error::Result;

/// Persist the records of a parsed ADIF file into `logbook_id`.
///
/// Parse rejections carry over as failures, duplicates are skipped, and a
/// record the store refuses is counted as failed without stopping the rest.
pub async fn persist_adif_import<S: QsoStore>(
    store: &S,
    parsed: AdifImportResult,
    logbook_id: Option<&str>,
) -> Result<ImportSummary> {
    let mut session = ImportSession::begin(store, logbook_id).await?;

    {
        let summary = session.summary_mut();
        summary.failed = parsed.errors;
        for message in parsed.error_messages {
            summary.push_message(message);
        }
    }

    for qso in parsed.records {
        let label = format!("{} at {}", qso.callsign, qso.datetime.format("%Y-%m-%d %H:%M"));
        if let PersistOutcome::Failed(reason) = session.persist(qso).await {
            session
                .summary_mut()
                .record_failure(format!("{}: {}", label, reason));
        }
    }

    Ok(session.finish("ADIF"))
}
