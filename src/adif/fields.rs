// ADIF field table
// One entry per ADIF field this logbook models, used in both directions:
// import applies the raw value to a partially built record, export renders
// the value from a QSO (None = field omitted).
//
// Table order is the export order.

use std::sync::OnceLock;

use regex::Regex;

use crate::qso::QsoData;
use crate::time_utils::{to_adif_date, to_adif_time};

/// Fields collected from one ADIF record before validation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdifFields {
    pub callsign: Option<String>,
    pub qso_date: Option<String>,
    pub time_on: Option<String>,
    pub freq: Option<f64>,
    pub mode: Option<String>,
    pub tx_power: Option<f64>,
    pub rst_sent: Option<String>,
    pub rst_received: Option<String>,
    pub name: Option<String>,
    pub qth: Option<String>,
    pub notes: Option<String>,
}

pub type ImportSetter = fn(&mut AdifFields, String);
pub type ExportGetter = fn(&QsoData) -> Option<String>;

pub struct FieldMapping {
    pub name: &'static str,
    pub import: ImportSetter,
    pub export: ExportGetter,
}

pub static ADIF_FIELDS: &[FieldMapping] = &[
    FieldMapping {
        name: "CALL",
        import: |f, v| f.callsign = Some(v),
        export: |q| text(Some(&q.callsign)),
    },
    FieldMapping {
        name: "QSO_DATE",
        import: |f, v| f.qso_date = Some(v),
        export: |q| Some(to_adif_date(&q.datetime)),
    },
    FieldMapping {
        name: "TIME_ON",
        import: |f, v| f.time_on = Some(v),
        export: |q| Some(to_adif_time(&q.datetime)),
    },
    FieldMapping {
        name: "FREQ",
        import: |f, v| f.freq = Some(lenient_float(&v)),
        export: |q| number(q.freq).map(|mhz| format!("{:.6}", mhz)),
    },
    FieldMapping {
        name: "MODE",
        import: |f, v| f.mode = Some(v),
        export: |q| text(q.mode.as_ref()),
    },
    FieldMapping {
        name: "TX_PWR",
        import: |f, v| f.tx_power = Some(lenient_float(&v)),
        export: |q| number(q.tx_power).map(|watts| watts.to_string()),
    },
    FieldMapping {
        name: "RST_SENT",
        import: |f, v| f.rst_sent = Some(v),
        export: |q| text(q.rst_sent.as_ref()),
    },
    FieldMapping {
        name: "RST_RCVD",
        import: |f, v| f.rst_received = Some(v),
        export: |q| text(q.rst_received.as_ref()),
    },
    FieldMapping {
        name: "NAME",
        import: |f, v| f.name = Some(v),
        export: |q| text(q.name.as_ref()),
    },
    FieldMapping {
        name: "GRIDSQUARE",
        import: |f, v| f.qth = Some(v),
        export: |q| text(q.qth.as_ref()),
    },
    FieldMapping {
        name: "COMMENT",
        import: |f, v| f.notes = Some(v),
        export: |q| text(q.notes.as_ref()),
    },
];

/// Look up the mapping for an ADIF field name (case-insensitive)
pub fn field_mapping(name: &str) -> Option<&'static FieldMapping> {
    ADIF_FIELDS.iter().find(|m| m.name.eq_ignore_ascii_case(name))
}

/// Empty strings count as absent
fn text(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.is_empty()).cloned()
}

/// Zero and NaN count as absent, so a 0 MHz frequency is never exported
fn number(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && !v.is_nan())
}

fn leading_number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?").expect("static number pattern")
    })
}

/// Read the leading number of a value ("14.074 MHz" -> 14.074)
pub fn leading_float(value: &str) -> Option<f64> {
    leading_number_re()
        .find(value.trim())
        .and_then(|m| m.as_str().parse().ok())
}

/// Like `leading_float`, but unparseable values become 0 rather than an
/// error, matching how other loggers treat sloppy numeric ADIF fields.
pub fn lenient_float(value: &str) -> f64 {
    leading_float(value).unwrap_or(0.0)
}
