//! Ordered classification rules for fields the register does not carry
//! in a usable form. The first rule with a matching keyword wins; every
//! table has a catch-all so a classification is never empty.

use sponsorgrid_core::SponsorRoute;

pub struct RouteRule {
    pub keywords: &'static [&'static str],
    pub route: SponsorRoute,
}

pub struct IndustryRule {
    pub keywords: &'static [&'static str],
    pub industry: &'static str,
}

pub const DEFAULT_ROUTE: SponsorRoute = SponsorRoute::SkilledWorker;
pub const OTHER_INDUSTRY: &str = "Other";

pub const ROUTE_RULES: &[RouteRule] = &[
    RouteRule { keywords: &["skilled worker"], route: SponsorRoute::SkilledWorker },
    RouteRule { keywords: &["health", "care"], route: SponsorRoute::HealthAndCareWorker },
    RouteRule { keywords: &["seasonal"], route: SponsorRoute::SeasonalWorker },
    RouteRule { keywords: &["charity"], route: SponsorRoute::CharityWorker },
    RouteRule { keywords: &["religious"], route: SponsorRoute::ReligiousWorker },
    RouteRule { keywords: &["sport"], route: SponsorRoute::InternationalSportsperson },
    RouteRule { keywords: &["creative"], route: SponsorRoute::CreativeWorker },
    RouteRule { keywords: &["global talent"], route: SponsorRoute::GlobalTalent },
    RouteRule { keywords: &["student"], route: SponsorRoute::Student },
];

pub const INDUSTRY_RULES: &[IndustryRule] = &[
    IndustryRule { keywords: &["nhs", "hospital", "health", "medical"], industry: "Healthcare" },
    IndustryRule { keywords: &["university", "college", "school", "education"], industry: "Education" },
    // "it " keeps words like "limited" from matching
    IndustryRule { keywords: &["tech", "software", "digital", "it "], industry: "Technology" },
    IndustryRule { keywords: &["bank", "finance", "financial"], industry: "Financial Services" },
    IndustryRule {
        keywords: &["engineering", "construction", "building"],
        industry: "Engineering & Construction",
    },
    IndustryRule { keywords: &["retail", "shop", "store"], industry: "Retail" },
    IndustryRule { keywords: &["hotel", "restaurant", "hospitality"], industry: "Hospitality" },
];

fn hits(keywords: &[&str], haystack: &str) -> bool {
    keywords.iter().any(|k| haystack.contains(k))
}

/// Classify the raw `Route` text.
pub fn infer_route(raw: &str) -> SponsorRoute {
    let text = raw.trim().to_lowercase();
    ROUTE_RULES
        .iter()
        .find(|rule| hits(rule.keywords, &text))
        .map(|rule| rule.route)
        .unwrap_or(DEFAULT_ROUTE)
}

/// Guess an industry from the organisation name.
pub fn infer_industry(organisation: &str) -> &'static str {
    let name = organisation.to_lowercase();
    INDUSTRY_RULES
        .iter()
        .find(|rule| hits(rule.keywords, &name))
        .map(|rule| rule.industry)
        .unwrap_or(OTHER_INDUSTRY)
}
