// QSO record types
//
// `QsoData` is the contact itself as produced by the importers.
// `QsoRecord` is what the persistence layer hands back once it has assigned an id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One logged contact, without storage identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QsoData {
    /// UTC instant of the contact
    pub datetime: DateTime<Utc>,
    /// The other station, stored verbatim (not upper-cased)
    pub callsign: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Maidenhead locator of the other station
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rst_sent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rst_received: Option<String>,
    /// MHz
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freq: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    /// Watts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_power: Option<f64>,
}

impl QsoData {
    /// A contact with only the mandatory fields set
    pub fn new(callsign: impl Into<String>, datetime: DateTime<Utc>) -> Self {
        Self {
            datetime,
            callsign: callsign.into(),
            name: None,
            notes: None,
            qth: None,
            rst_sent: None,
            rst_received: None,
            freq: None,
            mode: None,
            tx_power: None,
        }
    }

    /// Shared record validator used by the ADIF and CSV importers.
    ///
    /// Only the mandatory fields are enforced here. A malformed `qth` is
    /// tolerated: it simply has no map position.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if self.callsign.trim().is_empty() {
            errors.push("Callsign is required".to_string());
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// A contact owned by the persistence layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QsoRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logbook_id: Option<String>,
    #[serde(flatten)]
    pub data: QsoData,
}

/// A named collection of QSOs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Logbook {
    pub id: String,
    pub name: String,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at_noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_validate_accepts_minimal_record() {
        let qso = QsoData::new("TA1AB", at_noon());
        assert!(qso.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_callsign() {
        let qso = QsoData::new("   ", at_noon());
        let errors = qso.validate().unwrap_err();
        assert_eq!(errors, vec!["Callsign is required".to_string()]);
    }

    #[test]
    fn test_validate_ignores_bad_grid() {
        let mut qso = QsoData::new("TA1AB", at_noon());
        qso.qth = Some("RR73".to_string());
        assert!(qso.validate().is_ok());
    }

    #[test]
    fn test_record_serializes_flat() {
        let record = QsoRecord {
            id: "abc".to_string(),
            logbook_id: None,
            data: QsoData::new("TA1AB", at_noon()),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], "abc");
        assert_eq!(json["callsign"], "TA1AB");
        assert!(json.get("freq").is_none());
    }
}
