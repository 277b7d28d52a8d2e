use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

use qsobook_lib::adif::{export_adif, import_adif};
use qsobook_lib::import::is_duplicate;
use qsobook_lib::time_utils::parse_date_time;
use qsobook_lib::QsoData;

fn callsign_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z]{1,2}[0-9][A-Za-z]{1,3}"
}

proptest! {
    #[test]
    fn canonical_strings_parse_to_themselves(
        days in 0i64..40_000,
        seconds in 0i64..86_400,
    ) {
        let base = Utc.with_ymd_and_hms(1950, 1, 1, 0, 0, 0).unwrap();
        let dt = base + Duration::days(days) + Duration::seconds(seconds);
        let canonical = dt.format("%Y-%m-%dT%H:%M:%S").to_string();
        prop_assert_eq!(parse_date_time(&canonical, None).unwrap(), canonical);
    }

    #[test]
    fn duplicate_check_ignores_callsign_case(call in callsign_strategy(), minutes in 0i64..100_000) {
        let dt = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes);
        let a = QsoData::new(call.to_uppercase(), dt);
        let b = QsoData::new(call.to_lowercase(), dt);
        prop_assert!(is_duplicate(&a, &b));
        prop_assert!(is_duplicate(&b, &a));
    }

    #[test]
    fn exported_records_import_back(
        calls in prop::collection::vec(callsign_strategy(), 1..20),
        name in "[\\p{L} ]{0,12}",
    ) {
        let dt = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 30).unwrap();
        let qsos: Vec<QsoData> = calls
            .iter()
            .map(|call| {
                let mut qso = QsoData::new(call.clone(), dt);
                qso.name = Some(name.clone()).filter(|n| !n.is_empty());
                qso
            })
            .collect();

        let export = export_adif(&qsos, None, None);
        let result = import_adif(&export.content);

        prop_assert_eq!(result.errors, 0);
        prop_assert_eq!(result.records, qsos);
    }
}
