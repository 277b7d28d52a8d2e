// Duplicate detection shared by ADIF and CSV imports
//
// Key: same instant, same callsign ignoring case, same frequency (missing = 0).
// Nothing else participates; a duplicate is skipped, never merged.

use crate::qso::{QsoData, QsoRecord};

fn freq_key(freq: Option<f64>) -> f64 {
    freq.filter(|f| !f.is_nan()).unwrap_or(0.0)
}

/// True when `a` and `b` describe the same contact
pub fn is_duplicate(a: &QsoData, b: &QsoData) -> bool {
    a.datetime == b.datetime
        && a.callsign.to_lowercase() == b.callsign.to_lowercase()
        && freq_key(a.freq) == freq_key(b.freq)
}

/// First existing record that `candidate` duplicates
pub fn find_duplicate<'a>(candidate: &QsoData, existing: &'a [QsoRecord]) -> Option<&'a QsoRecord> {
    existing.iter().find(|record| is_duplicate(candidate, &record.data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone, Utc};

    fn qso(call: &str, freq: Option<f64>) -> QsoData {
        let mut qso = QsoData::new(call, Utc.with_ymd_and_hms(2024, 1, 15, 12, 30, 0).unwrap());
        qso.freq = freq;
        qso
    }

    #[test]
    fn test_same_key_is_duplicate() {
        assert!(is_duplicate(&qso("TA1AB", Some(14.074)), &qso("ta1ab", Some(14.074))));
    }

    #[test]
    fn test_missing_and_zero_frequency_match() {
        assert!(is_duplicate(&qso("TA1AB", None), &qso("TA1AB", None)));
        assert!(is_duplicate(&qso("TA1AB", None), &qso("TA1AB", Some(0.0))));
        assert!(!is_duplicate(&qso("TA1AB", None), &qso("TA1AB", Some(7.1))));
    }

    #[test]
    fn test_frequency_is_exact() {
        assert!(!is_duplicate(&qso("TA1AB", Some(14.074)), &qso("TA1AB", Some(14.0741))));
    }

    #[test]
    fn test_other_fields_are_ignored() {
        let a = qso("TA1AB", Some(14.074));
        let mut b = a.clone();
        b.notes = Some("different".to_string());
        b.mode = Some("CW".to_string());
        b.name = Some("Someone".to_string());
        assert!(is_duplicate(&a, &b));
    }

    #[test]
    fn test_same_instant_in_other_offset() {
        let a = qso("TA1AB", None);
        let mut b = a.clone();
        let istanbul = FixedOffset::east_opt(3 * 3600).unwrap();
        b.datetime = istanbul
            .with_ymd_and_hms(2024, 1, 15, 15, 30, 0)
            .unwrap()
            .with_timezone(&Utc);
        assert!(is_duplicate(&a, &b));

        b.datetime = b.datetime + chrono::Duration::seconds(1);
        assert!(!is_duplicate(&a, &b));
    }

    #[test]
    fn test_find_duplicate() {
        let existing = vec![QsoRecord {
            id: "1".to_string(),
            logbook_id: None,
            data: qso("K3AB", None),
        }];
        assert_eq!(find_duplicate(&qso("k3ab", None), &existing).map(|r| r.id.as_str()), Some("1"));
        assert!(find_duplicate(&qso("W1AW", None), &existing).is_none());
    }
}
