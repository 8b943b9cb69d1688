//! Static tabular datasets (`all-data.json`, `recent-data.json`,
//! `deleted-data.json`).

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;
use sponsorgrid_core::SponsorData;

use crate::error::FixtureError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataSection {
    All,
    Recent,
    Deleted,
}

impl DataSection {
    pub const ALL: [DataSection; 3] = [DataSection::All, DataSection::Recent, DataSection::Deleted];

    pub fn as_str(self) -> &'static str {
        match self {
            DataSection::All => "all",
            DataSection::Recent => "recent",
            DataSection::Deleted => "deleted",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            DataSection::All => "all-data.json",
            DataSection::Recent => "recent-data.json",
            DataSection::Deleted => "deleted-data.json",
        }
    }
}

impl fmt::Display for DataSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataSection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataSection::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| format!("unknown data section '{s}' (expected all, recent or deleted)"))
    }
}

/// Load one section's rows from `dir`.
pub fn load_section(dir: &Path, section: DataSection) -> Result<Vec<SponsorData>, FixtureError> {
    let path = dir.join(section.file_name());
    let bytes = std::fs::read(&path).map_err(|source| FixtureError::Io { path: path.clone(), source })?;
    serde_json::from_slice(&bytes).map_err(|source| FixtureError::Json { path, source })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SectionCounts {
    pub all: usize,
    pub recent: usize,
    pub deleted: usize,
}

/// Row counts per section. An unreadable section counts as zero.
pub fn section_counts(dir: &Path) -> SectionCounts {
    let count = |section: DataSection| match load_section(dir, section) {
        Ok(rows) => rows.len(),
        Err(e) => {
            tracing::warn!(%section, error = %e, "data section unavailable");
            0
        }
    };
    SectionCounts {
        all: count(DataSection::All),
        recent: count(DataSection::Recent),
        deleted: count(DataSection::Deleted),
    }
}
