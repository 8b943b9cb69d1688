//! Header alias resolution.
//!
//! The register has shipped under several header spellings. Each logical
//! field has a prioritised alias list, resolved once against the actual
//! header row; per data row the first alias with a non-empty value wins.

use crate::error::IngestError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Organisation,
    Town,
    County,
    Licence,
    Route,
    DateAdded,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Organisation,
        Field::Town,
        Field::County,
        Field::Licence,
        Field::Route,
        Field::DateAdded,
    ];

    /// Accepted header spellings, highest priority first. Matching is
    /// case-sensitive.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Field::Organisation => &["Organisation", "Organisation Name"],
            Field::Town => &["Town/City", "Town", "City"],
            Field::County => &["County"],
            Field::Licence => &["Sponsor Licence No"],
            Field::Route => &["Route"],
            Field::DateAdded => &["Date Added"],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Organisation => "organisation",
            Field::Town => "town",
            Field::County => "county",
            Field::Licence => "licence",
            Field::Route => "route",
            Field::DateAdded => "date added",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// Column indices per field, in alias priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMap {
    columns: [Vec<usize>; 6],
    width: usize,
}

impl HeaderMap {
    /// Resolve aliases against `headers` (already trimmed and unquoted).
    ///
    /// Fails when neither organisation nor town has any alias present.
    pub fn resolve(headers: &[String]) -> Result<Self, IngestError> {
        let mut columns: [Vec<usize>; 6] = Default::default();
        for field in Field::ALL {
            columns[field.slot()] = field
                .aliases()
                .iter()
                .filter_map(|alias| headers.iter().position(|h| h == alias))
                .collect();
        }

        let map = Self { columns, width: headers.len() };
        for required in [Field::Organisation, Field::Town] {
            if map.columns[required.slot()].is_empty() {
                return Err(IngestError::MissingColumn {
                    field: required.label(),
                    aliases: required.aliases(),
                });
            }
        }
        Ok(map)
    }

    /// Number of header columns; shorter rows are rejected.
    pub fn width(&self) -> usize {
        self.width
    }

    /// First non-empty value among the field's aliases.
    pub fn value<'a>(&self, field: Field, row: &'a [String]) -> Option<&'a str> {
        self.columns[field.slot()]
            .iter()
            .filter_map(|&i| row.get(i))
            .map(String::as_str)
            .find(|v| !v.is_empty())
    }
}
