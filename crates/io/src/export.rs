//! CSV export of tabular rows.

use std::io::Write;

use sponsorgrid_core::table::SPONSOR_DATA_COLUMNS;
use sponsorgrid_core::SponsorData;

use crate::error::ExportError;

/// Write a header row plus one record per row, quoting where needed.
pub fn write_sponsor_data<W: Write>(rows: &[SponsorData], out: W) -> Result<(), ExportError> {
    let mut writer = csv::WriterBuilder::new().from_writer(out);

    writer.write_record(SPONSOR_DATA_COLUMNS)?;
    for row in rows {
        writer.write_record(row.to_record())?;
    }

    writer.flush()?;
    Ok(())
}

pub fn sponsor_data_to_csv(rows: &[SponsorData]) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_sponsor_data(rows, &mut buf)?;
    // Every field came from a String, so the output is UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_and_quoting() {
        let rows = vec![SponsorData {
            company: "Acme & Co, Ltd".into(),
            website: Some("https://acme.example".into()),
            town: "London".into(),
            industry: "Retail".into(),
            main_tier: "Worker".into(),
            sub_tier: "Skilled Worker".into(),
            ..Default::default()
        }];
        let csv = sponsor_data_to_csv(&rows).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("Company,Website,Social website,Town,Industry,Main tier,Sub tier,Date Added")
        );
        assert_eq!(
            lines.next(),
            Some("\"Acme & Co, Ltd\",https://acme.example,,London,Retail,Worker,Skilled Worker,")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn empty_rows_still_have_header() {
        let csv = sponsor_data_to_csv(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }
}
