use serde::{Deserialize, Serialize};

/// Column order used for tabular export and display.
pub const SPONSOR_DATA_COLUMNS: [&str; 8] = [
    "Company",
    "Website",
    "Social website",
    "Town",
    "Industry",
    "Main tier",
    "Sub tier",
    "Date Added",
];

/// Flat register row keyed by display column names, as stored in the
/// static fixture files. Unrelated to [`crate::Sponsor`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SponsorData {
    #[serde(rename = "Company")]
    pub company: String,
    #[serde(rename = "Website", default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(rename = "Social website", default, skip_serializing_if = "Option::is_none")]
    pub social_website: Option<String>,
    #[serde(rename = "Town")]
    pub town: String,
    #[serde(rename = "Industry", default)]
    pub industry: String,
    #[serde(rename = "Main tier", default)]
    pub main_tier: String,
    #[serde(rename = "Sub tier", default)]
    pub sub_tier: String,
    #[serde(rename = "Date Added", default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<String>,
}

impl SponsorData {
    /// Values in [`SPONSOR_DATA_COLUMNS`] order; absent optionals are empty.
    pub fn to_record(&self) -> [&str; 8] {
        [
            self.company.as_str(),
            self.website.as_deref().unwrap_or(""),
            self.social_website.as_deref().unwrap_or(""),
            self.town.as_str(),
            self.industry.as_str(),
            self.main_tier.as_str(),
            self.sub_tier.as_str(),
            self.date_added.as_deref().unwrap_or(""),
        ]
    }
}
