//! Register CSV parsing.
//!
//! One bad row never aborts the batch: rows that are short, malformed or
//! missing a required field are recorded in [`IngestReport::skipped`] and
//! the rest of the document is still processed.

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sponsorgrid_core::Sponsor;

use crate::error::IngestError;
use crate::headers::{Field, HeaderMap};
use crate::normalize::{Normalizer, RawRow};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    /// Fewer values than header columns.
    ShortRow,
    MissingOrganisation,
    MissingTown,
    Malformed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShortRow => write!(f, "fewer values than headers"),
            Self::MissingOrganisation => write!(f, "missing organisation name"),
            Self::MissingTown => write!(f, "missing town/city"),
            Self::Malformed(msg) => write!(f, "malformed row: {msg}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    /// 1-based line number in the source document.
    pub line: u64,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IngestReport {
    pub sponsors: Vec<Sponsor>,
    pub skipped: Vec<SkippedRow>,
}

/// Strip quote characters and surrounding whitespace.
fn clean(field: &str) -> String {
    field.replace('"', "").trim().to_string()
}

/// Split one physical line into trimmed fields. Quotes never carry a field
/// past the end of the line, so an unbalanced quote costs only its own row.
fn split_line(line: &str) -> Result<Option<Vec<String>>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(line.as_bytes());

    let record = reader.records().next().transpose()?;
    Ok(record.map(|r| r.iter().map(clean).collect()))
}

/// Parse a register document into sponsors.
///
/// The document is split into lines first and each line is read as one
/// record. Headers are resolved once through the alias table; `now` is the
/// date given to rows whose `Date Added` is missing or unparsable.
pub fn parse_register_csv(
    text: &str,
    normalizer: &mut Normalizer,
    now: DateTime<Utc>,
) -> Result<IngestReport, IngestError> {
    let text = text.trim_start_matches('\u{feff}');
    let mut lines = text
        .split('\n')
        .enumerate()
        .map(|(i, l)| (i as u64 + 1, l.trim_end_matches('\r')))
        .filter(|(_, l)| !l.trim().is_empty());

    let Some((_, header_line)) = lines.next() else {
        return Err(IngestError::EmptyDocument);
    };
    let headers = match split_line(header_line) {
        Ok(Some(h)) => h,
        Ok(None) => return Err(IngestError::EmptyDocument),
        Err(e) => return Err(IngestError::Csv(e.to_string())),
    };
    let map = HeaderMap::resolve(&headers)?;

    let mut sponsors = Vec::new();
    let mut skipped = Vec::new();

    let mut skip = |line: u64, reason: SkipReason| {
        tracing::debug!(line, %reason, "skipping register row");
        skipped.push(SkippedRow { line, reason });
    };

    for (line, text) in lines {
        let values = match split_line(text) {
            Ok(Some(v)) => v,
            Ok(None) => continue,
            Err(e) => {
                skip(line, SkipReason::Malformed(e.to_string()));
                continue;
            }
        };

        if values.iter().all(|v| v.is_empty()) {
            continue;
        }
        if values.len() < map.width() {
            skip(line, SkipReason::ShortRow);
            continue;
        }

        let Some(organisation) = map.value(Field::Organisation, &values) else {
            skip(line, SkipReason::MissingOrganisation);
            continue;
        };
        let Some(town) = map.value(Field::Town, &values) else {
            skip(line, SkipReason::MissingTown);
            continue;
        };

        let row = RawRow {
            organisation,
            town,
            county: map.value(Field::County, &values),
            licence: map.value(Field::Licence, &values),
            route: map.value(Field::Route, &values),
            date_added: map.value(Field::DateAdded, &values),
        };
        sponsors.push(normalizer.sponsor(row, now));
    }

    tracing::info!(kept = sponsors.len(), skipped = skipped.len(), "parsed register CSV");
    Ok(IngestReport { sponsors, skipped })
}

/// Decode a fetched payload: UTF-8 first, then Windows-1252 (the usual
/// encoding of spreadsheet-exported CSVs). A leading BOM is removed.
pub fn decode_payload(bytes: Vec<u8>) -> String {
    let text = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    };
    match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    }
}

/// Read a local register file through [`decode_payload`].
pub fn read_register_file(path: &Path) -> std::io::Result<String> {
    std::fs::read(path).map(decode_payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use sponsorgrid_core::dates::format_iso;
    use sponsorgrid_core::{SponsorRoute, SponsorType};

    const HEADER: &str = "Organisation,Town/City,County,Sponsor Licence No,Route,Date Added";

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn parse(text: &str) -> IngestReport {
        parse_register_csv(text, &mut Normalizer::seeded(0), now()).unwrap()
    }

    #[test]
    fn quoted_comma_stays_in_one_field() {
        let doc = format!("{HEADER}\n\"Acme & Co, Ltd\",London,,AC123,Skilled Worker,2024-01-15\n");
        let report = parse(&doc);
        assert!(report.skipped.is_empty());
        let s = &report.sponsors[0];
        assert_eq!(s.organisation_name, "Acme & Co, Ltd");
        assert_eq!(s.town_city, "London");
        assert_eq!(s.county, None);
        assert_eq!(s.sponsor_licence_number.as_deref(), Some("AC123"));
        assert_eq!(s.route, SponsorRoute::SkilledWorker);
        assert_eq!(s.sponsor_type(), SponsorType::Worker);
        assert_eq!(format_iso(&s.date_added), "2024-01-15T00:00:00.000Z");
        assert!(s.date_added_known);
    }

    #[test]
    fn skips_are_reported_with_lines() {
        let doc = format!(
            "{HEADER}\n\
             Good Ltd,Leeds,,G1,Student,2024-02-01\n\
             Short Ltd,Leeds\n\
             ,York,,X1,Skilled Worker,2024-02-01\n\
             Nowhere Ltd,,,X2,Skilled Worker,2024-02-01\n"
        );
        let report = parse(&doc);
        assert_eq!(report.sponsors.len(), 1);
        assert_eq!(
            report.skipped,
            vec![
                SkippedRow { line: 3, reason: SkipReason::ShortRow },
                SkippedRow { line: 4, reason: SkipReason::MissingOrganisation },
                SkippedRow { line: 5, reason: SkipReason::MissingTown },
            ]
        );
    }

    #[test]
    fn unbalanced_quote_costs_one_line() {
        let doc = format!(
            "{HEADER}\n\
             \"Broken Ltd,Leeds,,B1,Skilled Worker,2024-01-01\n\
             \n\
             Good Ltd,York,,G1,Student,2024-02-01\n"
        );
        let report = parse(&doc);
        assert_eq!(report.sponsors.len(), 1);
        assert_eq!(report.sponsors[0].organisation_name, "Good Ltd");
        assert_eq!(report.skipped, vec![SkippedRow { line: 2, reason: SkipReason::ShortRow }]);
    }

    #[test]
    fn blank_lines_are_ignored() {
        let doc = format!("{HEADER}\n\nA,B,,,,\n   \n");
        let report = parse(&doc);
        assert_eq!(report.sponsors.len(), 1);
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn alternate_headers_and_extra_columns() {
        let doc = "\"Organisation Name\",\"Town\",\"Type & Rating\",\"Route\"\n\
                   Uni of Bath,Bath,Worker (A rating),Student\n";
        let report = parse(doc);
        let s = &report.sponsors[0];
        assert_eq!(s.organisation_name, "Uni of Bath");
        assert_eq!(s.route, SponsorRoute::Student);
        assert_eq!(s.sponsor_type(), SponsorType::Student);
        assert_eq!(s.industry.as_deref(), Some("Other"));
        assert!(!s.date_added_known);
        assert_eq!(s.date_added, now());
    }

    #[test]
    fn crlf_and_bom() {
        let doc = format!("\u{feff}{HEADER}\r\nA Ltd,Hull,East Riding,L9,Seasonal Worker,01/02/2024\r\n");
        let report = parse(&doc);
        let s = &report.sponsors[0];
        assert_eq!(s.county.as_deref(), Some("East Riding"));
        assert_eq!(s.sponsor_type(), SponsorType::TemporaryWorker);
        assert_eq!(format_iso(&s.date_added), "2024-02-01T00:00:00.000Z");
    }

    #[test]
    fn empty_document_is_an_error() {
        let err = parse_register_csv("", &mut Normalizer::seeded(0), now()).unwrap_err();
        assert_eq!(err, IngestError::EmptyDocument);
    }

    #[test]
    fn unrecognised_header_is_an_error() {
        let err = parse_register_csv("Name,Place\nA,B\n", &mut Normalizer::seeded(0), now()).unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn { field: "organisation", .. }));
    }

    #[test]
    fn ids_are_stable_across_runs() {
        let doc = format!("{HEADER}\nA Ltd,Hull,,L1,,\n");
        let a = parse_register_csv(&doc, &mut Normalizer::seeded(1), now()).unwrap();
        let b = parse_register_csv(&doc, &mut Normalizer::seeded(2), now()).unwrap();
        assert_eq!(a.sponsors[0].id, b.sponsors[0].id);
    }

    #[test]
    fn decode_falls_back_to_windows_1252() {
        // "Caf\xe9" is not valid UTF-8
        assert_eq!(decode_payload(b"Caf\xe9".to_vec()), "Café");
        assert_eq!(decode_payload("\u{feff}Org".as_bytes().to_vec()), "Org");
        assert_eq!(decode_payload(b"plain".to_vec()), "plain");
    }
}
