//! HTTP fetch of the published register CSV.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CSV_URL: &str = "https://assets.publishing.service.gov.uk/media/65b6a4ce0a3a1c000c5a7c0e/2024-01-26_Register_of_licensed_sponsors_Worker.csv";
pub const SOURCE_PAGE_URL: &str =
    "https://www.gov.uk/government/publications/register-of-licensed-sponsors-workers";
pub const DEFAULT_USER_AGENT: &str = "UK-Tier-Sponsors-Platform/1.0";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug)]
pub enum FetchError {
    /// The HTTP client could not be constructed
    Client(String),
    /// Connection or transport failure
    Network(String),
    /// Request exceeded the configured timeout
    Timeout(String),
    /// Non-2xx response
    Http(u16, String),
    /// Response body could not be read
    Body(String),
    /// Local register file could not be read
    File { path: PathBuf, source: std::io::Error },
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Client(msg) => write!(f, "HTTP client error: {msg}"),
            FetchError::Network(msg) => write!(f, "Network error: {msg}"),
            FetchError::Timeout(msg) => write!(f, "Timeout: {msg}"),
            FetchError::Http(code, msg) => write!(f, "HTTP {code}: {msg}"),
            FetchError::Body(msg) => write!(f, "Body read error: {msg}"),
            FetchError::File { path, source } => write!(f, "cannot read {}: {source}", path.display()),
        }
    }
}

impl std::error::Error for FetchError {}

fn classify(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout(e.to_string())
    } else {
        FetchError::Network(e.to_string())
    }
}

/// Register client (blocking). One attempt per fetch; no retries.
#[derive(Clone)]
pub struct RegisterClient {
    http: reqwest::blocking::Client,
    csv_url: String,
}

impl RegisterClient {
    pub fn new(csv_url: impl Into<String>, user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { http, csv_url: csv_url.into() })
    }

    /// Client for the public register with the stock user agent and timeout.
    pub fn with_defaults() -> Result<Self, FetchError> {
        Self::new(DEFAULT_CSV_URL, DEFAULT_USER_AGENT, DEFAULT_TIMEOUT)
    }

    pub fn csv_url(&self) -> &str {
        &self.csv_url
    }

    /// GET the register and return the raw body.
    pub fn fetch_bytes(&self) -> Result<Vec<u8>, FetchError> {
        let response = self
            .http
            .get(&self.csv_url)
            .header(reqwest::header::ACCEPT, "text/csv")
            .send()
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(FetchError::Http(status.as_u16(), body));
        }

        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| FetchError::Body(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_the_public_register() {
        let client = RegisterClient::with_defaults().unwrap();
        assert_eq!(client.csv_url(), DEFAULT_CSV_URL);
        assert!(DEFAULT_CSV_URL.starts_with("https://assets.publishing.service.gov.uk/"));
    }

    #[test]
    fn http_error_display() {
        let err = FetchError::Http(503, "maintenance".into());
        assert_eq!(err.to_string(), "HTTP 503: maintenance");
    }
}
