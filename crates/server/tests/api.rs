use std::fs;
use std::sync::Arc;

use reqwest::header::{self, HeaderMap};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use sponsorgrid_config::Settings;
use sponsorgrid_core::catalog::mock_sponsors;
use sponsorgrid_register_client::{CsvSource, FetchError};
use sponsorgrid_server::{router, serve, AppState};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

enum Stub {
    Csv(&'static str),
    Offline,
}

impl CsvSource for Stub {
    fn fetch_csv(&self) -> Result<String, FetchError> {
        match self {
            Stub::Csv(text) => Ok((*text).to_string()),
            Stub::Offline => Err(FetchError::Network("connection refused".into())),
        }
    }

    fn describe(&self) -> String {
        "stub://register.csv".into()
    }
}

const REGISTER_CSV: &str = "Organisation Name,Town/City,County,Type & Rating,Route\n\
Acme Ltd,Leeds,West Yorkshire,Worker (A rating),Skilled Worker\n\
,Leeds,,Worker (A rating),Skilled Worker\n\
Care Homes Ltd,York,,Worker (A rating),Health and Care Worker\n";

const ALL_DATA: &str = r#"[
  {"Company":"Zeta Foods","Town":"Leeds","Industry":"Retail","Main tier":"Worker","Sub tier":"Skilled Worker","Date Added":"2024-02-01"},
  {"Company":"alpha labs","Town":"London","Industry":"Technology","Main tier":"Worker","Sub tier":"Global Business Mobility"},
  {"Company":"Mid Retail","Town":"York","Industry":"Retail","Main tier":"Worker","Sub tier":"Skilled Worker","Date Added":"2024-01-10"}
]"#;

struct Harness {
    base: String,
    client: reqwest::Client,
    _dir: TempDir,
}

async fn harness(stub: Stub) -> Harness {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("all-data.json"), ALL_DATA).unwrap();
    fs::write(dir.path().join("recent-data.json"), "[]").unwrap();

    let mut settings = Settings::default();
    settings.data.dir = dir.path().to_path_buf();
    settings.register.latest_limit = 1;

    let state = AppState::new(settings, Arc::new(stub), mock_sponsors().unwrap());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });

    Harness {
        base: format!("http://{addr}"),
        client: reqwest::Client::new(),
        _dir: dir,
    }
}

async fn send(h: &Harness, method: Method, uri: &str) -> (StatusCode, HeaderMap, Vec<u8>) {
    let response = h
        .client
        .request(method, format!("{}{uri}", h.base))
        .send()
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.bytes().await.unwrap();
    (status, headers, body.to_vec())
}

async fn get_json(h: &Harness, uri: &str) -> (StatusCode, Value) {
    let (status, _, body) = send(h, Method::GET, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

fn ids(data: &Value) -> Vec<&str> {
    data["sponsors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect()
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Same order as `sgrid serve`: state with the real register client is
/// built first, the runtime second.
#[test]
fn serves_with_state_built_from_settings() {
    let dir = TempDir::new().unwrap();
    let mut settings = Settings::default();
    settings.data.dir = dir.path().to_path_buf();
    let state = AppState::from_settings(settings).unwrap();

    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build().unwrap();
    runtime.block_on(async move {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop, stopped) = oneshot::channel::<()>();
        let server = tokio::spawn(serve(listener, state, async {
            let _ = stopped.await;
        }));

        let response = reqwest::get(format!("http://{addr}/api/ping")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_slice(&response.bytes().await.unwrap()).unwrap();
        assert_eq!(body["success"], true);

        stop.send(()).unwrap();
        server.await.unwrap().unwrap();
    });
}

#[tokio::test]
async fn ping_and_health() {
    let h = harness(Stub::Offline).await;

    let (status, body) = get_json(&h, "/api/ping").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["message"], "ping");

    let (_, body) = get_json(&h, "/api/health").await;
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["environment"], "development");
    assert!(body["data"]["uptime"].as_f64().unwrap() >= 0.0);
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_defaults_to_first_page_of_twenty_by_name() {
    let h = harness(Stub::Offline).await;
    let (status, body) = get_json(&h, "/api/sponsors/search").await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["total"], 20);
    assert_eq!(data["page"], 1);
    assert_eq!(data["limit"], 20);
    assert_eq!(data["totalPages"], 1);
    assert_eq!(data["hasNext"], false);
    assert_eq!(data["hasPrev"], false);
    // Case-folded: Accenture, ARM, Aston Martin
    assert_eq!(ids(data)[..2], ["1", "10"]);
}

#[tokio::test]
async fn search_location_paginates() {
    let h = harness(Stub::Offline).await;
    let (_, body) = get_json(&h, "/api/sponsors/search?location=london&page=2&limit=5").await;

    let data = &body["data"];
    assert_eq!(data["total"], 12);
    assert_eq!(data["totalPages"], 3);
    assert_eq!(data["hasNext"], true);
    assert_eq!(data["hasPrev"], true);
    assert_eq!(ids(data).len(), 5);
}

#[tokio::test]
async fn search_by_type_and_sort_desc() {
    let h = harness(Stub::Offline).await;
    let (_, body) =
        get_json(&h, "/api/sponsors/search?type=Student&sortBy=dateAdded&sortOrder=desc").await;

    let data = &body["data"];
    assert_eq!(data["total"], 3);
    assert_eq!(ids(data), ["15", "3", "9"]);
    for s in data["sponsors"].as_array().unwrap() {
        assert_eq!(s["type"], "Student");
    }
}

#[tokio::test]
async fn unknown_route_value_matches_nothing() {
    let h = harness(Stub::Offline).await;
    let (_, body) = get_json(&h, "/api/sponsors/search?route=Astronaut").await;
    assert_eq!(body["data"]["total"], 0);
    assert_eq!(body["data"]["totalPages"], 0);
}

#[tokio::test]
async fn sponsor_by_id() {
    let h = harness(Stub::Offline).await;

    let (status, body) = get_json(&h, "/api/sponsors/6").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["organisationName"], "DeepMind Technologies Limited");
    assert_eq!(body["data"]["type"], "Worker");

    let (status, body) = get_json(&h, "/api/sponsors/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Sponsor not found");
}

#[tokio::test]
async fn stats_and_facets() {
    let h = harness(Stub::Offline).await;

    let (_, body) = get_json(&h, "/api/sponsors/stats").await;
    let stats = &body["data"];
    assert_eq!(stats["totalSponsors"], 20);
    assert_eq!(stats["byType"]["Student"], 3);
    assert_eq!(stats["topLocations"][0]["location"], "London, Greater London");
    assert_eq!(stats["topLocations"][0]["count"], 9);

    let (_, body) = get_json(&h, "/api/sponsors/industries").await;
    let industries = body["data"].as_array().unwrap();
    assert_eq!(industries.first().unwrap(), "Aerospace & Defense");
    assert_eq!(industries.iter().filter(|i| *i == "Retail").count(), 1);

    let (_, body) = get_json(&h, "/api/sponsors/locations").await;
    assert!(body["data"].as_array().unwrap().iter().any(|l| l == "Derby, Derbyshire"));
}

// ---------------------------------------------------------------------------
// Tabular datasets
// ---------------------------------------------------------------------------

#[tokio::test]
async fn data_counts_tolerate_missing_files() {
    let h = harness(Stub::Offline).await;
    let (status, body) = get_json(&h, "/api/data/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], serde_json::json!({ "all": 3, "recent": 0, "deleted": 0 }));
}

#[tokio::test]
async fn missing_section_file_returns_empty_data() {
    let h = harness(Stub::Offline).await;
    let (status, body) = get_json(&h, "/api/data/deleted").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["data"], serde_json::json!([]));
    assert_eq!(body["error"], "Failed to load deleted data");
}

#[tokio::test]
async fn unknown_section_is_not_found() {
    let h = harness(Stub::Offline).await;
    let (status, body) = get_json(&h, "/api/data/archive").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn data_search_filters_industry_and_sorts_company() {
    let h = harness(Stub::Offline).await;
    let (_, body) = get_json(&h, "/api/data/all/search?industry=Retail&sortOrder=desc").await;

    let data = &body["data"];
    assert_eq!(data["total"], 2);
    let companies: Vec<_> =
        data["sponsors"].as_array().unwrap().iter().map(|r| r["Company"].as_str().unwrap()).collect();
    assert_eq!(companies, ["Zeta Foods", "Mid Retail"]);

    let (_, body) = get_json(&h, "/api/data/all/search?industry=all&query=ALPHA").await;
    assert_eq!(body["data"]["total"], 1);
}

#[tokio::test]
async fn data_industries_are_sorted_and_distinct() {
    let h = harness(Stub::Offline).await;
    let (_, body) = get_json(&h, "/api/data/all/industries").await;
    assert_eq!(body["data"], serde_json::json!(["Retail", "Technology"]));
}

#[tokio::test]
async fn export_is_a_csv_download() {
    let h = harness(Stub::Offline).await;
    let (status, headers, body) = send(&h, Method::GET, "/api/data/all/export").await;

    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/csv"));
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"all-sponsors.csv\""
    );
    let text = String::from_utf8(body).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next().unwrap(),
        "Company,Website,Social website,Town,Industry,Main tier,Sub tier,Date Added"
    );
    assert_eq!(lines.count(), 3);
}

// ---------------------------------------------------------------------------
// Live register
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sync_reports_live_records_and_skips() {
    let h = harness(Stub::Csv(REGISTER_CSV)).await;
    let (_, body) = get_json(&h, "/api/uk-gov/sync").await;

    let data = &body["data"];
    assert_eq!(body["success"], true);
    assert_eq!(data["source"], "live");
    assert_eq!(data["recordCount"], 2);
    assert_eq!(data["skippedCount"], 1);
    assert!(data.get("fallbackReason").is_none());
}

#[tokio::test]
async fn sync_falls_back_when_offline() {
    let h = harness(Stub::Offline).await;
    let (status, body) = get_json(&h, "/api/uk-gov/sync").await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["source"], "fallback");
    assert_eq!(data["recordCount"], 3);
    assert!(data["fallbackReason"].as_str().unwrap().contains("connection refused"));
}

#[tokio::test]
async fn status_reflects_fallback() {
    let h = harness(Stub::Offline).await;
    let (_, body) = get_json(&h, "/api/uk-gov/status").await;

    let data = &body["data"];
    assert_eq!(data["status"], "error");
    assert_eq!(data["totalRecords"], 0);
    assert_eq!(data["registerUrl"], "stub://register.csv");
    assert_eq!(data["features"]["dailySync"], false);
}

#[tokio::test]
async fn latest_is_capped() {
    let h = harness(Stub::Csv(REGISTER_CSV)).await;
    let (_, body) = get_json(&h, "/api/uk-gov/latest").await;

    let data = &body["data"];
    assert_eq!(data["sponsors"].as_array().unwrap().len(), 1);
    assert_eq!(data["totalAvailable"], 2);
    assert_eq!(data["fallback"], false);
    assert_eq!(data["sponsors"][0]["organisationName"], "Acme Ltd");
}

#[tokio::test]
async fn schedule_is_idempotent() {
    let h = harness(Stub::Offline).await;

    let (_, _, body) = send(&h, Method::POST, "/api/uk-gov/schedule").await;
    let first: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(first["data"]["message"], "Daily updates scheduled successfully");
    assert_eq!(first["data"]["interval"], "24 hours");
    assert!(first["data"]["nextUpdate"].is_string());

    let (_, _, body) = send(&h, Method::POST, "/api/uk-gov/schedule").await;
    let second: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(second["data"]["message"], "Daily updates already scheduled");

    let (_, status) = get_json(&h, "/api/uk-gov/status").await;
    assert_eq!(status["data"]["features"]["dailySync"], true);
}
