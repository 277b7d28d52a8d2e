// ADIF Writer
// Serializes QSOs to ADIF 3.1.4 text and suggests an export filename.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::fields::ADIF_FIELDS;
use crate::qso::QsoData;

pub const ADIF_VERSION: &str = "3.1.4";
pub const PROGRAM_ID: &str = "QSOBook";
pub const PROGRAM_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Header metadata for an export
#[derive(Debug, Clone)]
pub struct ExportOptions<'a> {
    pub program_id: &'a str,
    pub program_version: &'a str,
    pub logbook_name: Option<&'a str>,
    pub station_callsign: Option<&'a str>,
}

impl Default for ExportOptions<'_> {
    fn default() -> Self {
        Self {
            program_id: PROGRAM_ID,
            program_version: PROGRAM_VERSION,
            logbook_name: None,
            station_callsign: None,
        }
    }
}

/// ADIF document plus the filename it should be saved under
#[derive(Debug, Clone, Serialize)]
pub struct AdifExport {
    pub content: String,
    pub filename: String,
    pub record_count: usize,
}

/// Append one `<NAME:LEN>value` field; LEN counts characters
pub fn write_field(out: &mut String, name: &str, value: &str) {
    out.push_str(&format!("<{}:{}>{}", name, value.chars().count(), value));
}

/// Export QSOs with the default program metadata, timestamped now
pub fn export_adif<'a>(
    records: impl IntoIterator<Item = &'a QsoData>,
    logbook_name: Option<&str>,
    station_callsign: Option<&str>,
) -> AdifExport {
    let options = ExportOptions {
        logbook_name,
        station_callsign,
        ..Default::default()
    };
    export_adif_at(records, &options, Utc::now())
}

/// Export QSOs as of `now` (used for CREATED_TIMESTAMP and the filename date)
pub fn export_adif_at<'a>(
    records: impl IntoIterator<Item = &'a QsoData>,
    options: &ExportOptions<'_>,
    now: DateTime<Utc>,
) -> AdifExport {
    let mut content = String::new();

    content.push_str(&format!("ADIF export from {}\n", options.program_id));
    write_field(&mut content, "ADIF_VER", ADIF_VERSION);
    content.push('\n');
    write_field(&mut content, "PROGRAMID", options.program_id);
    content.push('\n');
    write_field(&mut content, "PROGRAMVERSION", options.program_version);
    content.push('\n');
    write_field(
        &mut content,
        "CREATED_TIMESTAMP",
        &now.format("%Y%m%d %H%M%S").to_string(),
    );
    content.push('\n');
    if let Some(call) = options.station_callsign.filter(|c| !c.is_empty()) {
        write_field(&mut content, "STATION_CALLSIGN", call);
        content.push('\n');
    }
    content.push_str("<EOH>\n\n");

    let mut record_count = 0;
    for qso in records {
        for mapping in ADIF_FIELDS {
            if let Some(value) = (mapping.export)(qso) {
                write_field(&mut content, mapping.name, &value);
                content.push(' ');
            }
        }
        content.push_str("<EOR>\n");
        record_count += 1;
    }

    log::info!("ADIF export: {} records", record_count);

    AdifExport {
        content,
        filename: export_filename(options.logbook_name, now.date_naive()),
        record_count,
    }
}

/// `qso-export-<name>-<YYYY-MM-DD>.adi`, with the name reduced to
/// `[A-Za-z0-9-]` and hyphen runs collapsed. No name gives `QSO`.
pub fn export_filename(logbook_name: Option<&str>, date: NaiveDate) -> String {
    let name = logbook_name.filter(|n| !n.is_empty()).unwrap_or("QSO");

    let mut sanitized = String::with_capacity(name.len());
    for c in name.chars() {
        let c = if c.is_ascii_alphanumeric() || c == '-' { c } else { '-' };
        if c == '-' && sanitized.ends_with('-') {
            continue;
        }
        sanitized.push(c);
    }

    format!("qso-export-{}-{}.adi", sanitized, date.format("%Y-%m-%d"))
}
