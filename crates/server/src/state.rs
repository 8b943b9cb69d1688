use std::sync::Arc;
use std::time::Instant;

use sponsorgrid_config::Settings;
use sponsorgrid_core::catalog::mock_sponsors;
use sponsorgrid_core::Sponsor;
use sponsorgrid_register_client::{CsvSource, RegisterClient};

use crate::error::ServerError;
use crate::refresh::RefreshScheduler;

/// Shared, read-only request state. The refresh scheduler is the only
/// mutable part and guards itself.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Vec<Sponsor>>,
    pub settings: Arc<Settings>,
    pub source: Arc<dyn CsvSource>,
    pub refresh: Arc<RefreshScheduler>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(settings: Settings, source: Arc<dyn CsvSource>, catalog: Vec<Sponsor>) -> Self {
        Self {
            catalog: Arc::new(catalog),
            settings: Arc::new(settings),
            source,
            refresh: Arc::new(RefreshScheduler::default()),
            started_at: Instant::now(),
        }
    }

    /// Built-in catalog plus a register client configured from `settings`.
    ///
    /// Blocking: call it before entering a runtime or from `spawn_blocking`.
    pub fn from_settings(settings: Settings) -> Result<Self, ServerError> {
        let catalog = mock_sponsors().map_err(ServerError::Catalog)?;
        let client = RegisterClient::new(
            settings.register.csv_url.clone(),
            &settings.register.user_agent,
            settings.register.timeout(),
        )
        .map_err(ServerError::Client)?;

        Ok(Self::new(settings, Arc::new(client), catalog))
    }
}
