use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Route
// ---------------------------------------------------------------------------

/// Immigration route a sponsor is licensed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SponsorRoute {
    #[serde(rename = "Skilled Worker")]
    SkilledWorker,
    #[serde(rename = "Health and Care Worker")]
    HealthAndCareWorker,
    #[serde(rename = "Seasonal Worker")]
    SeasonalWorker,
    #[serde(rename = "Charity Worker")]
    CharityWorker,
    #[serde(rename = "Religious Worker")]
    ReligiousWorker,
    #[serde(rename = "International Sportsperson")]
    InternationalSportsperson,
    #[serde(rename = "Creative Worker")]
    CreativeWorker,
    #[serde(rename = "Global Talent")]
    GlobalTalent,
    #[serde(rename = "Student")]
    Student,
}

impl SponsorRoute {
    pub const ALL: [SponsorRoute; 9] = [
        Self::SkilledWorker,
        Self::HealthAndCareWorker,
        Self::SeasonalWorker,
        Self::CharityWorker,
        Self::ReligiousWorker,
        Self::InternationalSportsperson,
        Self::CreativeWorker,
        Self::GlobalTalent,
        Self::Student,
    ];

    /// Display name, identical to the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SkilledWorker => "Skilled Worker",
            Self::HealthAndCareWorker => "Health and Care Worker",
            Self::SeasonalWorker => "Seasonal Worker",
            Self::CharityWorker => "Charity Worker",
            Self::ReligiousWorker => "Religious Worker",
            Self::InternationalSportsperson => "International Sportsperson",
            Self::CreativeWorker => "Creative Worker",
            Self::GlobalTalent => "Global Talent",
            Self::Student => "Student",
        }
    }
}

impl fmt::Display for SponsorRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SponsorRoute {
    type Err = String;

    /// Exact match against the display name. Fuzzy classification of raw
    /// register text lives in the ingestion rules, not here.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("unknown route: {s}"))
    }
}

// ---------------------------------------------------------------------------
// Type
// ---------------------------------------------------------------------------

/// Sponsor category. Always derived from the route, never read from a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SponsorType {
    #[serde(rename = "Worker")]
    Worker,
    #[serde(rename = "Temporary Worker")]
    TemporaryWorker,
    #[serde(rename = "Student")]
    Student,
}

impl SponsorType {
    pub const ALL: [SponsorType; 3] = [Self::Worker, Self::TemporaryWorker, Self::Student];

    pub fn for_route(route: SponsorRoute) -> Self {
        match route {
            SponsorRoute::Student => Self::Student,
            SponsorRoute::SeasonalWorker => Self::TemporaryWorker,
            _ => Self::Worker,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Worker => "Worker",
            Self::TemporaryWorker => "Temporary Worker",
            Self::Student => "Student",
        }
    }
}

impl fmt::Display for SponsorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SponsorType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown sponsor type: {s}"))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
