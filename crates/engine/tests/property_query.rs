// Property-based tests for pagination and sorting laws.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use sponsorgrid_core::{Sponsor, SponsorRoute};
use sponsorgrid_engine::{paginate, search, PageRequest, Params, SearchFilters};

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

fn arb_route() -> impl Strategy<Value = SponsorRoute> {
    prop::sample::select(SponsorRoute::ALL.to_vec())
}

fn arb_sponsor() -> impl Strategy<Value = Sponsor> {
    (
        r"[A-Za-z ]{1,12}",
        prop::sample::select(vec!["London", "Leeds", "York", "Cardiff"]),
        prop::option::of(prop::sample::select(vec!["Greater London", "West Yorkshire"])),
        prop::option::of(prop::sample::select(vec!["Retail", "Healthcare", "Technology"])),
        arb_route(),
        0i64..2_000,
    )
        .prop_map(|(name, town, county, industry, route, day)| Sponsor {
            id: format!("{name}-{town}-{day}"),
            organisation_name: name,
            town_city: town.to_string(),
            county: county.map(str::to_string),
            route,
            date_added: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::days(day),
            date_added_known: true,
            sponsor_licence_number: None,
            website: None,
            industry: industry.map(str::to_string),
            employees: None,
            description: None,
        })
}

fn arb_params() -> impl Strategy<Value = Params> {
    (
        prop::option::of(prop::sample::select(vec!["lon", "a", "care", "LEEDS"])),
        prop::option::of(prop::sample::select(vec!["name", "location", "dateAdded", "bogus"])),
        prop::option::of(prop::sample::select(vec!["asc", "desc"])),
        prop::option::of(prop::sample::select(vec!["Retail", "tech"])),
    )
        .prop_map(|(query, sort_by, sort_order, industry)| {
            let mut p = Params::new();
            let pairs = [("query", query), ("sortBy", sort_by), ("sortOrder", sort_order), ("industry", industry)];
            for (k, v) in pairs {
                if let Some(v) = v {
                    p.insert(k.to_string(), v.to_string());
                }
            }
            p
        })
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn pages_reassemble_the_full_list(total in 0usize..200, limit in 1usize..50) {
        let items: Vec<usize> = (0..total).collect();
        let first = paginate(items.clone(), PageRequest::new(1, limit));

        prop_assert_eq!(first.total_pages, (total + limit - 1) / limit);

        let mut joined = Vec::new();
        for page in 1..=first.total_pages {
            let p = paginate(items.clone(), PageRequest::new(page, limit));
            prop_assert_eq!(p.has_next, page < p.total_pages);
            prop_assert_eq!(p.has_prev, page > 1);
            joined.extend(p.items);
        }
        prop_assert_eq!(joined, items);
    }

    #[test]
    fn search_is_deterministic(
        sponsors in prop::collection::vec(arb_sponsor(), 0..40),
        params in arb_params(),
    ) {
        let filters = SearchFilters::from_params(&params);
        let a = serde_json::to_string(&search(&sponsors, &filters)).unwrap();
        let b = serde_json::to_string(&search(&sponsors, &filters)).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn search_pages_cover_matches_once(
        sponsors in prop::collection::vec(arb_sponsor(), 0..40),
        params in arb_params(),
        limit in 1usize..7,
    ) {
        let mut params = params;
        params.insert("limit".into(), limit.to_string());
        params.insert("page".into(), "1".into());
        let filters = SearchFilters::from_params(&params);
        let first = search(&sponsors, &filters);

        let mut seen = Vec::new();
        for page in 1..=first.total_pages {
            params.insert("page".into(), page.to_string());
            seen.extend(search(&sponsors, &SearchFilters::from_params(&params)).items);
        }
        prop_assert_eq!(seen.len(), first.total);

        let mut all = params.clone();
        all.insert("page".into(), "1".into());
        all.insert("limit".into(), usize::MAX.to_string());
        prop_assert_eq!(seen, search(&sponsors, &SearchFilters::from_params(&all)).items);
    }

    #[test]
    fn distinct_names_reverse_exactly(
        names in prop::collection::btree_set(r"[a-z]{1,8}", 0..25),
    ) {
        let sponsors: Vec<Sponsor> = names
            .into_iter()
            .rev()
            .enumerate()
            .map(|(i, name)| Sponsor {
                id: i.to_string(),
                organisation_name: name,
                town_city: "London".into(),
                county: None,
                route: SponsorRoute::SkilledWorker,
                date_added: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                date_added_known: true,
                sponsor_licence_number: None,
                website: None,
                industry: None,
                employees: None,
                description: None,
            })
            .collect();

        let mut asc_params = Params::new();
        asc_params.insert("limit".into(), "100".into());
        let mut desc_params = asc_params.clone();
        desc_params.insert("sortOrder".into(), "desc".into());

        let asc = search(&sponsors, &SearchFilters::from_params(&asc_params)).items;
        let mut desc = search(&sponsors, &SearchFilters::from_params(&desc_params)).items;
        desc.reverse();
        prop_assert_eq!(asc, desc);
    }
}
