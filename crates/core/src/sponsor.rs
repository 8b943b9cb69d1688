use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dates::iso_millis;
use crate::route::{SponsorRoute, SponsorType};

/// Canonical sponsor record.
///
/// There is no stored `type`: it is a pure function of `route` and is
/// recomputed whenever the record is serialized, so a sponsor with
/// `route = Student` and `type = Worker` cannot be represented. Any `type`
/// supplied on deserialization is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SponsorIn", into = "SponsorOut")]
pub struct Sponsor {
    pub id: String,
    pub organisation_name: String,
    pub town_city: String,
    pub county: Option<String>,
    pub route: SponsorRoute,
    pub date_added: DateTime<Utc>,
    /// False when the source date was missing or unparsable and
    /// `date_added` holds the ingestion instant instead.
    pub date_added_known: bool,
    pub sponsor_licence_number: Option<String>,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub employees: Option<u32>,
    pub description: Option<String>,
}

impl Sponsor {
    pub fn sponsor_type(&self) -> SponsorType {
        SponsorType::for_route(self.route)
    }

    /// Free-text haystack: organisation, town, county, industry joined by spaces.
    pub fn search_text(&self) -> String {
        [
            self.organisation_name.as_str(),
            self.town_city.as_str(),
            self.county.as_deref().unwrap_or(""),
            self.industry.as_deref().unwrap_or(""),
        ]
        .join(" ")
    }

    /// Town and county (when present) joined by a space.
    pub fn location_text(&self) -> String {
        match self.county.as_deref().filter(|c| !c.is_empty()) {
            Some(county) => format!("{} {}", self.town_city, county),
            None => self.town_city.clone(),
        }
    }

    /// Display label used by statistics and facets: `Town, County` or `Town`.
    pub fn location_label(&self) -> String {
        match self.county.as_deref().filter(|c| !c.is_empty()) {
            Some(county) => format!("{}, {}", self.town_city, county),
            None => self.town_city.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

fn default_true() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SponsorIn {
    id: String,
    organisation_name: String,
    town_city: String,
    #[serde(default)]
    county: Option<String>,
    route: SponsorRoute,
    #[serde(with = "iso_millis")]
    date_added: DateTime<Utc>,
    #[serde(default = "default_true")]
    date_added_known: bool,
    #[serde(default)]
    sponsor_licence_number: Option<String>,
    #[serde(default)]
    website: Option<String>,
    #[serde(default)]
    industry: Option<String>,
    #[serde(default)]
    employees: Option<u32>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SponsorOut {
    id: String,
    organisation_name: String,
    town_city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    county: Option<String>,
    #[serde(rename = "type")]
    sponsor_type: SponsorType,
    route: SponsorRoute,
    #[serde(with = "iso_millis")]
    date_added: DateTime<Utc>,
    date_added_known: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    sponsor_licence_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    employees: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl From<SponsorIn> for Sponsor {
    fn from(w: SponsorIn) -> Self {
        Self {
            id: w.id,
            organisation_name: w.organisation_name,
            town_city: w.town_city,
            county: w.county,
            route: w.route,
            date_added: w.date_added,
            date_added_known: w.date_added_known,
            sponsor_licence_number: w.sponsor_licence_number,
            website: w.website,
            industry: w.industry,
            employees: w.employees,
            description: w.description,
        }
    }
}

impl From<Sponsor> for SponsorOut {
    fn from(s: Sponsor) -> Self {
        Self {
            sponsor_type: s.sponsor_type(),
            id: s.id,
            organisation_name: s.organisation_name,
            town_city: s.town_city,
            county: s.county,
            route: s.route,
            date_added: s.date_added,
            date_added_known: s.date_added_known,
            sponsor_licence_number: s.sponsor_licence_number,
            website: s.website,
            industry: s.industry,
            employees: s.employees,
            description: s.description,
        }
    }
}
