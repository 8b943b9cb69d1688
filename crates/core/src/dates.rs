//! Date handling for `dateAdded`.
//!
//! The register publishes dates in whatever shape the export tool produced,
//! so parsing is lenient. Output is always the millisecond ISO-8601 UTC form
//! (`2024-01-15T00:00:00.000Z`).

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Day-first numeric forms: the source is a UK register.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
];

const ISO_MILLIS: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Parse a raw date string. Returns `None` for empty or unrecognised input.
pub fn parse_date_added(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    // Slashed dates are day-first (`01/02/2024` is 1 February), unlike a
    // US-style month-first reading, which would also reject `15/01/2024`.

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
    }

    None
}

/// Format as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn format_iso(dt: &DateTime<Utc>) -> String {
    dt.format(ISO_MILLIS).to_string()
}

/// Serde adapter for `DateTime<Utc>` fields using the lenient parser on the
/// way in and [`format_iso`] on the way out.
pub mod iso_millis {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_iso(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_date_added(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("cannot parse date '{raw}'")))
    }
}
