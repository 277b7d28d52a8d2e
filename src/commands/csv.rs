//! CSV import commands
//!
//! - import_csv: Import a CSV file with a user-supplied column mapping
//! - suggest_mapping: Propose a mapping from the file's header row

use std::path::Path;

use serde::Serialize;

use super::state::AppState;
use crate::db::{MemoryStore, QsoStore};
use crate::error::{LogbookError, Result};
use crate::import::{
    import_csv as run_import, suggest_csv_mapping, CsvImportOptions, CsvMapping, CsvTable,
    ImportSummary,
};
use crate::time_utils::DateOrder;

#[derive(Debug, Serialize)]
pub struct MappingSuggestion {
    pub headers: Vec<String>,
    pub mapping: CsvMapping,
}

/// Parse `HEADER=FIELD` pairs. The header may itself contain `=`; the last one splits.
pub fn parse_mapping_args(pairs: &[String]) -> Result<CsvMapping> {
    let mut mapping = CsvMapping::new();
    for pair in pairs {
        let (header, field) = pair.rsplit_once('=').ok_or_else(|| {
            LogbookError::InvalidArgument(format!("expected HEADER=FIELD, got '{}'", pair))
        })?;
        mapping.insert(header.trim().to_string(), field.trim().to_string());
    }
    Ok(mapping)
}

/// `date_order` overrides the configured one; `dry_run` imports into a scratch copy
pub async fn import_csv(
    state: &AppState,
    path: &Path,
    mapping: &CsvMapping,
    logbook_id: Option<&str>,
    date_order: Option<DateOrder>,
    dry_run: bool,
) -> Result<ImportSummary> {
    state.logbook_name(logbook_id).await?;

    log::info!("Importing CSV file {}", path.display());
    let text = std::fs::read_to_string(path)?;
    let table = CsvTable::parse(&text)?;

    let options = CsvImportOptions {
        logbook_id: logbook_id.map(str::to_string),
        date_order: date_order.unwrap_or(state.config.date_order),
    };

    if dry_run {
        let scratch = MemoryStore::with_records(state.store.list_records(logbook_id).await?);
        return run_import(&scratch, &table, mapping, &options).await;
    }
    run_import(&state.store, &table, mapping, &options).await
}

pub fn suggest_mapping(path: &Path) -> Result<MappingSuggestion> {
    let text = std::fs::read_to_string(path)?;
    let table = CsvTable::parse(&text)?;
    let mapping = suggest_csv_mapping(&table.headers);
    Ok(MappingSuggestion {
        headers: table.headers,
        mapping,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mapping_args() {
        let args = vec!["Call=callsign".to_string(), "A=B=datetime".to_string()];
        let mapping = parse_mapping_args(&args).unwrap();
        assert_eq!(mapping.get("Call").map(String::as_str), Some("callsign"));
        assert_eq!(mapping.get("A=B").map(String::as_str), Some("datetime"));

        assert!(parse_mapping_args(&["no-separator".to_string()]).is_err());
    }

    #[tokio::test]
    async fn test_import_with_suggested_mapping() {
        let state = AppState::in_memory().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.csv");
        std::fs::write(
            &path,
            "Call,QSO Date,Time On,Mode\nTA1AB,15/01/2024,1230,FT8\nK3AB,bad,1300,CW\n",
        )
        .unwrap();

        let suggestion = suggest_mapping(&path).unwrap();
        assert_eq!(suggestion.headers.len(), 4);

        let preview = import_csv(&state, &path, &suggestion.mapping, None, None, true)
            .await
            .unwrap();
        assert_eq!(preview.imported, 1);
        assert!(state.store.list_records(None).await.unwrap().is_empty());

        let summary = import_csv(&state, &path, &suggestion.mapping, None, None, false)
            .await
            .unwrap();
        assert_eq!(summary.imported, 1);
        assert_eq!(summary.failed, 1);

        let stored = state.store.list_records(None).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].data.mode.as_deref(), Some("FT8"));
    }

    #[tokio::test]
    async fn test_bad_mapping_is_an_error() {
        let state = AppState::in_memory().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.csv");
        std::fs::write(&path, "Call\nTA1AB\n").unwrap();

        let mapping = parse_mapping_args(&["Call=callsign".to_string()]).unwrap();
        let result = import_csv(&state, &path, &mapping, None, None, false).await;
        assert!(matches!(result, Err(LogbookError::Mapping(_))));
    }
}
