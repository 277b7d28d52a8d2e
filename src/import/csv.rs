// CSV import pipeline
// Maps user-chosen CSV columns onto QSO fields, parses each row on its own,
// and persists the good ones through the shared import session.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{ImportSession, ImportSummary, PersistOutcome};
use crate::adif::fields::leading_float;
use crate::db::QsoStore;
use crate::error::Result;
use crate::qso::{QsoData, QsoRecord};
use crate::time_utils::{canonical_to_utc, parse_date_time_with, DateOrder};

/// `{csv header name: target field name}`, as chosen by the user
pub type CsvMapping = BTreeMap<String, String>;

/// QSO fields a CSV column can be mapped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CsvField {
    Callsign,
    Datetime,
    Date,
    Time,
    Name,
    Notes,
    Qth,
    RstSent,
    RstReceived,
    Freq,
    Mode,
    TxPower,
}

impl CsvField {
    pub const ALL: [CsvField; 12] = [
        CsvField::Callsign,
        CsvField::Datetime,
        CsvField::Date,
        CsvField::Time,
        CsvField::Name,
        CsvField::Notes,
        CsvField::Qth,
        CsvField::RstSent,
        CsvField::RstReceived,
        CsvField::Freq,
        CsvField::Mode,
        CsvField::TxPower,
    ];

    /// Target name as used in mappings (`rstSent`, `txPower`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            CsvField::Callsign => "callsign",
            CsvField::Datetime => "datetime",
            CsvField::Date => "date",
            CsvField::Time => "time",
            CsvField::Name => "name",
            CsvField::Notes => "notes",
            CsvField::Qth => "qth",
            CsvField::RstSent => "rstSent",
            CsvField::RstReceived => "rstReceived",
            CsvField::Freq => "freq",
            CsvField::Mode => "mode",
            CsvField::TxPower => "txPower",
        }
    }

    /// Resolve a mapping target, ignoring case and underscores.
    /// Unknown targets (e.g. "ignore") map to nothing.
    pub fn from_target(target: &str) -> Option<CsvField> {
        let wanted: String = target
            .chars()
            .filter(|c| *c != '_')
            .collect::<String>()
            .to_lowercase();
        CsvField::ALL
            .into_iter()
            .find(|field| field.as_str().to_lowercase() == wanted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("A column must be mapped to callsign")]
    CallsignRequired,
    #[error("A column must be mapped to datetime, or columns to both date and time")]
    DatetimeRequired,
}

impl MappingError {
    pub fn code(&self) -> &'static str {
        match self {
            MappingError::CallsignRequired => "CALLSIGN_REQUIRED",
            MappingError::DatetimeRequired => "DATETIME_REQUIRED",
        }
    }
}

/// Field -> header name, one header per field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedMapping {
    fields: HashMap<CsvField, String>,
}

impl ResolvedMapping {
    pub fn header_for(&self, field: CsvField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    pub fn has(&self, field: CsvField) -> bool {
        self.fields.contains_key(&field)
    }
}

/// Check that a mapping covers callsign and a datetime source.
///
/// When several headers target the same field, the first in header-name
/// order wins.
pub fn validate_csv_mapping(mapping: &CsvMapping) -> std::result::Result<ResolvedMapping, MappingError> {
    let mut resolved = ResolvedMapping::default();
    for (header, target) in mapping {
        if let Some(field) = CsvField::from_target(target) {
            resolved.fields.entry(field).or_insert_with(|| header.clone());
        }
    }

    if !resolved.has(CsvField::Callsign) {
        return Err(MappingError::CallsignRequired);
    }
    let has_split = resolved.has(CsvField::Date) && resolved.has(CsvField::Time);
    if !resolved.has(CsvField::Datetime) && !has_split {
        return Err(MappingError::DatetimeRequired);
    }

    Ok(resolved)
}

/// Header-normalized names commonly exported by other loggers
const SUGGESTIONS: &[(CsvField, &[&str])] = &[
    (CsvField::Callsign, &["call", "callsign", "dxcall", "theircall", "station"]),
    (CsvField::Datetime, &["datetime", "timestamp", "qsodatetime", "dateandtime"]),
    (CsvField::Date, &["date", "qsodate", "dateon", "dateutc"]),
    (CsvField::Time, &["time", "timeon", "qsotime", "timeutc", "utc"]),
    (CsvField::Freq, &["freq", "frequency", "freqmhz", "frequencymhz"]),
    (CsvField::Mode, &["mode"]),
    (CsvField::RstSent, &["rstsent", "rsts", "sent", "rsttx"]),
    (CsvField::RstReceived, &["rstrcvd", "rstreceived", "rstr", "rcvd", "rstrx"]),
    (CsvField::Name, &["name", "opname", "operatorname"]),
    (CsvField::Qth, &["qth", "grid", "gridsquare", "locator"]),
    (CsvField::Notes, &["notes", "note", "comment", "comments", "remarks"]),
    (CsvField::TxPower, &["txpwr", "txpower", "power", "pwr"]),
];

fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

/// Propose a mapping from well-known header names.
///
/// Each field is proposed at most once, for the first matching header.
pub fn suggest_csv_mapping(headers: &[String]) -> CsvMapping {
    let mut mapping = CsvMapping::new();
    let mut taken: Vec<CsvField> = Vec::new();

    for header in headers {
        let normalized = normalize_header(header);
        let suggestion = SUGGESTIONS
            .iter()
            .find(|(field, names)| !taken.contains(field) && names.contains(&normalized.as_str()));
        if let Some((field, _)) = suggestion {
            taken.push(*field);
            mapping.insert(header.clone(), field.as_str().to_string());
        }
    }

    mapping
}

/// Header row plus data rows, as plain strings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Read comma-separated text with a header row; ragged rows are allowed
    pub fn parse(text: &str) -> Result<Self> {
        let mut reader = ::csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
        let mut rows: Vec<Vec<String>> = Vec::new();
        for record in reader.records() {
            rows.push(record?.iter().map(str::to_string).collect());
        }

        Ok(Self { headers, rows })
    }
}

#[derive(Debug, Clone, Default)]
pub struct CsvImportOptions {
    pub logbook_id: Option<String>,
    pub date_order: DateOrder,
}

/// Column positions for one file
struct Columns<'m> {
    mapping: &'m ResolvedMapping,
    index: HashMap<&'m str, usize>,
}

impl<'m> Columns<'m> {
    fn new(mapping: &'m ResolvedMapping, headers: &[String]) -> Self {
        let mut index = HashMap::new();
        for field in CsvField::ALL {
            let Some(header) = mapping.header_for(field) else { continue };
            match headers.iter().position(|h| h.trim() == header.trim()) {
                Some(pos) => {
                    index.insert(header, pos);
                }
                None => log::warn!("Mapped column '{}' is not in the CSV header", header),
            }
        }
        Self { mapping, index }
    }

    /// Trimmed cell for a mapped field; `None` when the field is not mapped
    fn cell<'r>(&self, row: &'r [String], field: CsvField) -> Option<&'r str> {
        let header = self.mapping.header_for(field)?;
        let value = self
            .index
            .get(header)
            .and_then(|&pos| row.get(pos))
            .map(|cell| cell.trim())
            .unwrap_or("");
        Some(value)
    }

    fn text(&self, row: &[String], field: CsvField) -> Option<String> {
        self.cell(row, field).map(str::to_string)
    }

    fn number(&self, row: &[String], field: CsvField) -> Option<f64> {
        self.cell(row, field).and_then(leading_float)
    }
}

/// Build a QSO from one data row, or say why the row is unusable
fn row_to_qso(columns: &Columns<'_>, row: &[String], order: DateOrder) -> std::result::Result<QsoData, String> {
    let callsign = columns.cell(row, CsvField::Callsign).unwrap_or("");
    if callsign.is_empty() {
        return Err("callsignRequired".to_string());
    }

    let canonical = match columns.cell(row, CsvField::Datetime) {
        Some(datetime) => parse_date_time_with(datetime, None, order),
        None => parse_date_time_with(
            columns.cell(row, CsvField::Date).unwrap_or(""),
            Some(columns.cell(row, CsvField::Time).unwrap_or("")),
            order,
        ),
    }
    .map_err(|e| e.to_string())?;
    let datetime = canonical_to_utc(&canonical).map_err(|e| e.to_string())?;

    let qso = QsoData {
        datetime,
        callsign: callsign.to_string(),
        name: columns.text(row, CsvField::Name),
        notes: columns.text(row, CsvField::Notes),
        qth: columns.text(row, CsvField::Qth),
        rst_sent: columns.text(row, CsvField::RstSent),
        rst_received: columns.text(row, CsvField::RstReceived),
        freq: columns.number(row, CsvField::Freq),
        mode: columns.text(row, CsvField::Mode),
        tx_power: columns.number(row, CsvField::TxPower),
    };

    qso.validate().map_err(|errors| errors.join(", "))?;
    Ok(qso)
}

/// Import pre-split CSV rows against an already-fetched set of existing records.
///
/// Rows are numbered from 2 (row 1 is the header). A bad row is counted and
/// reported; it never stops the rows after it.
pub async fn import_csv_rows<S: QsoStore>(
    store: &S,
    headers: &[String],
    rows: &[Vec<String>],
    mapping: &CsvMapping,
    options: &CsvImportOptions,
    existing: Vec<QsoRecord>,
) -> std::result::Result<ImportSummary, MappingError> {
    let resolved = validate_csv_mapping(mapping)?;
    let columns = Columns::new(&resolved, headers);

    let mut session = ImportSession::with_existing(store, options.logbook_id.as_deref(), existing);

    for (index, row) in rows.iter().enumerate() {
        let row_number = index + 2;

        let qso = match row_to_qso(&columns, row, options.date_order) {
            Ok(qso) => qso,
            Err(reason) => {
                session
                    .summary_mut()
                    .record_failure(format!("Row {}: {}", row_number, reason));
                continue;
            }
        };

        if let PersistOutcome::Failed(reason) = session.persist(qso).await {
            session
                .summary_mut()
                .record_failure(format!("Row {}: {}", row_number, reason));
        }
    }

    Ok(session.finish("CSV"))
}

/// Import a parsed CSV table, fetching the logbook's existing records first
pub async fn import_csv<S: QsoStore>(
    store: &S,
    table: &CsvTable,
    mapping: &CsvMapping,
    options: &CsvImportOptions,
) -> Result<ImportSummary> {
    validate_csv_mapping(mapping)?;
    let existing = store.list_records(options.logbook_id.as_deref()).await?;
    let summary = import_csv_rows(store, &table.headers, &table.rows, mapping, options, existing).await?;
    Ok(summary)
}
