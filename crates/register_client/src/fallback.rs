//! Fixed dataset served when the live register is unavailable.

use chrono::{DateTime, Utc};
use sponsorgrid_core::{Sponsor, SponsorRoute};

struct Seed {
    id: &'static str,
    organisation: &'static str,
    town: &'static str,
    county: &'static str,
    route: SponsorRoute,
    licence: &'static str,
    website: &'static str,
    industry: &'static str,
    employees: u32,
    description: &'static str,
}

const SEEDS: [Seed; 3] = [
    Seed {
        id: "mock-1",
        organisation: "NHS Foundation Trust",
        town: "London",
        county: "Greater London",
        route: SponsorRoute::HealthAndCareWorker,
        licence: "NHS001",
        website: "https://www.nhs.uk",
        industry: "Healthcare",
        employees: 5000,
        description: "Major NHS healthcare provider in London",
    },
    Seed {
        id: "mock-2",
        organisation: "Imperial College London",
        town: "London",
        county: "Greater London",
        route: SponsorRoute::Student,
        licence: "ICL001",
        website: "https://www.imperial.ac.uk",
        industry: "Education",
        employees: 2500,
        description: "World-class university in London",
    },
    Seed {
        id: "mock-3",
        organisation: "HSBC UK Bank",
        town: "Birmingham",
        county: "West Midlands",
        route: SponsorRoute::SkilledWorker,
        licence: "HSBC001",
        website: "https://www.hsbc.co.uk",
        industry: "Financial Services",
        employees: 10000,
        description: "Major international bank with UK operations",
    },
];

/// The three fallback sponsors, dated `now`. The date is a placeholder,
/// so `date_added_known` is false.
pub fn fallback_sponsors(now: DateTime<Utc>) -> Vec<Sponsor> {
    SEEDS
        .iter()
        .map(|s| Sponsor {
            id: s.id.to_string(),
            organisation_name: s.organisation.to_string(),
            town_city: s.town.to_string(),
            county: Some(s.county.to_string()),
            route: s.route,
            date_added: now,
            date_added_known: false,
            sponsor_licence_number: Some(s.licence.to_string()),
            website: Some(s.website.to_string()),
            industry: Some(s.industry.to_string()),
            employees: Some(s.employees),
            description: Some(s.description.to_string()),
        })
        .collect()
}
