// ADIF Parser
// Lenient reader for the tagged-length format: <NAME:LEN[:TYPE]>VALUE
//
// The declared length is the only value delimiter. Anything that does not
// look like a tag is skipped up to the next '<', so one broken field never
// costs the rest of its record.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

/// A single ADIF record (one QSO) as raw text fields
#[derive(Debug, Clone, Default)]
pub struct AdifRecord {
    /// All fields as key-value pairs (uppercase keys)
    pub fields: HashMap<String, String>,
}

impl AdifRecord {
    pub fn new() -> Self {
        Self { fields: HashMap::new() }
    }

    /// Get a field value (case-insensitive lookup)
    pub fn get(&self, key: &str) -> Option<&String> {
        self.fields.get(&key.to_ascii_uppercase())
    }

    /// Check if a field exists
    pub fn has(&self, key: &str) -> bool {
        self.fields.contains_key(&key.to_ascii_uppercase())
    }

    pub fn call(&self) -> Option<&String> { self.get("CALL") }
    pub fn qso_date(&self) -> Option<&String> { self.get("QSO_DATE") }
    pub fn time_on(&self) -> Option<&String> { self.get("TIME_ON") }
}

/// Parsed ADIF document
#[derive(Debug, Clone, Default)]
pub struct AdifFile {
    /// Header fields (before <EOH>), empty for headerless files
    pub header: HashMap<String, String>,
    /// Every non-empty record fragment, in file order
    pub records: Vec<AdifRecord>,
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^<([^:>]+):(\d+)(?::[^>]*)?>").expect("static ADIF tag pattern"))
}

/// Find `tag` in `haystack` ignoring ASCII case, returning the byte offset
fn find_tag(haystack: &str, tag: &str) -> Option<usize> {
    let tag = tag.as_bytes();
    haystack
        .as_bytes()
        .windows(tag.len())
        .position(|window| window.eq_ignore_ascii_case(tag))
}

/// Parse an ADIF string into header and records.
///
/// Never fails: headerless files are read from the start, malformed tags are
/// skipped. Fragments between `<EOR>` markers that hold only whitespace are dropped.
pub fn parse_adif(content: &str) -> AdifFile {
    let mut file = AdifFile::default();

    let body = match find_tag(content, "<EOH>") {
        Some(eoh_pos) => {
            parse_fields_into(&content[..eoh_pos], &mut file.header);
            &content[eoh_pos + 5..]
        }
        None => content,
    };

    let mut rest = body;
    loop {
        let (fragment, next) = match find_tag(rest, "<EOR>") {
            Some(eor_pos) => (&rest[..eor_pos], Some(&rest[eor_pos + 5..])),
            None => (rest, None),
        };

        if !fragment.trim().is_empty() {
            let mut record = AdifRecord::new();
            parse_fields_into(fragment, &mut record.fields);
            file.records.push(record);
        }

        match next {
            Some(next) => rest = next,
            None => break,
        }
    }

    file
}

/// Parse ADIF fields from a string section into a HashMap
fn parse_fields_into(content: &str, map: &mut HashMap<String, String>) {
    let mut rest = content;

    loop {
        if !rest.starts_with('<') {
            match rest.find('<') {
                Some(offset) => rest = &rest[offset..],
                None => break,
            }
        }

        let parsed = tag_re().captures(rest).and_then(|caps| {
            let length: usize = caps[2].parse().ok()?;
            let tag_end = caps.get(0)?.end();
            Some((caps[1].trim().to_ascii_uppercase(), length, tag_end))
        });

        let Some((name, length, tag_end)) = parsed else {
            log::debug!("Skipping malformed ADIF tag near: {:.20}", rest);
            match rest[1..].find('<') {
                Some(offset) => {
                    rest = &rest[1 + offset..];
                    continue;
                }
                None => break,
            }
        };

        // LENGTH counts characters; a short value takes what is left
        let after = &rest[tag_end..];
        let value_end = after
            .char_indices()
            .nth(length)
            .map(|(idx, _)| idx)
            .unwrap_or(after.len());

        map.insert(name, after[..value_end].to_string());
        rest = &after[value_end..];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_record() {
        let adif = r#"
<CALL:5>W1ABC
<MODE:3>FT8
<QSO_DATE:8>20260103
<TIME_ON:6>152600
<RST_SENT:3>-12
<RST_RCVD:3>-08
<GRIDSQUARE:4>FN31
<EOR>
"#;

        let file = parse_adif(adif);
        assert_eq!(file.records.len(), 1);

        let rec = &file.records[0];
        assert_eq!(rec.call(), Some(&"W1ABC".to_string()));
        assert_eq!(rec.get("mode"), Some(&"FT8".to_string()));
        assert_eq!(rec.get("GRIDSQUARE"), Some(&"FN31".to_string()));
        assert_eq!(rec.qso_date(), Some(&"20260103".to_string()));
        assert_eq!(rec.time_on(), Some(&"152600".to_string()));
    }

    #[test]
    fn test_parse_header() {
        let adif = "Exported by hand\n<ADIF_VER:5>3.1.4 <PROGRAMID:4>Test\n<eoh>\n<CALL:4>K3AB<eor>";

        let file = parse_adif(adif);
        assert_eq!(file.header.get("ADIF_VER"), Some(&"3.1.4".to_string()));
        assert_eq!(file.header.get("PROGRAMID"), Some(&"Test".to_string()));
        assert_eq!(file.records.len(), 1);
        assert!(!file.records[0].has("PROGRAMID"));
    }

    #[test]
    fn test_parse_multiple_records_without_header() {
        let adif = r#"
<CALL:5>W1ABC<MODE:3>FT8<QSO_DATE:8>20260103<TIME_ON:4>1526<EOR>
<CALL:5>N2XYZ<MODE:2>CW<QSO_DATE:8>20260103<TIME_ON:4>1630<eor>
<CALL:4>K3AB<MODE:3>SSB<QSO_DATE:8>20260103<TIME_ON:4>1745<EOR>

"#;

        let file = parse_adif(adif);
        assert!(file.header.is_empty());
        assert_eq!(file.records.len(), 3);
        assert_eq!(file.records[0].call(), Some(&"W1ABC".to_string()));
        assert_eq!(file.records[1].call(), Some(&"N2XYZ".to_string()));
        assert_eq!(file.records[2].call(), Some(&"K3AB".to_string()));
    }

    #[test]
    fn test_length_delimits_value() {
        // Value contains '<' and '>' which must not end the field
        let file = parse_adif("<COMMENT:9>a<b>c d e<CALL:4>K3AB<EOR>");
        let rec = &file.records[0];
        assert_eq!(rec.get("COMMENT"), Some(&"a<b>c d e".to_string()));
        assert_eq!(rec.call(), Some(&"K3AB".to_string()));
    }

    #[test]
    fn test_type_indicator_is_ignored() {
        let file = parse_adif("<FREQ:6:N>14.074<CALL:4>K3AB<EOR>");
        assert_eq!(file.records[0].get("FREQ"), Some(&"14.074".to_string()));
    }

    #[test]
    fn test_malformed_tag_keeps_other_fields() {
        let file = parse_adif("<CALL:5>TA1AB <BROKEN> junk <MODE:x>?? <NAME:3>Ali<EOR>");
        let rec = &file.records[0];
        assert_eq!(rec.call(), Some(&"TA1AB".to_string()));
        assert_eq!(rec.get("NAME"), Some(&"Ali".to_string()));
        assert!(!rec.has("MODE"));
        assert!(!rec.has("BROKEN"));
    }

    #[test]
    fn test_length_counts_characters() {
        let file = parse_adif("<NAME:5>Şükrü<CALL:5>TA1AB<EOR>");
        let rec = &file.records[0];
        assert_eq!(rec.get("NAME"), Some(&"Şükrü".to_string()));
        assert_eq!(rec.call(), Some(&"TA1AB".to_string()));
    }

    #[test]
    fn test_truncated_value_takes_remainder() {
        let file = parse_adif("<CALL:10>K3AB");
        assert_eq!(file.records[0].call(), Some(&"K3AB".to_string()));
    }

    #[test]
    fn test_empty_input() {
        let file = parse_adif("   \n");
        assert!(file.records.is_empty());
        assert!(parse_adif("header only<EOH>\n").records.is_empty());
    }
}
