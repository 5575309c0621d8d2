//! Shared application state for request handlers.

use std::sync::Arc;
use std::time::Duration;
use tera::Tera;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::health::HealthReporter;
use crate::viewer::{HealthSource, HttpHealthSource, LocalHealthSource};

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Contains the application configuration, Tera template engine, the health
/// reporter behind `/api/health`, and the source the status page reads from.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tera: Arc<Tera>,
    pub reporter: Arc<HealthReporter>,
    pub page_source: Arc<dyn HealthSource>,
}

impl AppState {
    /// Creates application state. The page reads the configured upstream if
    /// there is one, otherwise the in-process reporter.
    pub fn new(config: AppConfig, tera: Tera, reporter: HealthReporter) -> Result<Self, AppError> {
        let reporter = Arc::new(reporter);
        let page_source: Arc<dyn HealthSource> = match config.viewer.upstream_url()? {
            Some(base) => {
                let timeout = Duration::from_secs(config.viewer.timeout_seconds);
                let source = HttpHealthSource::new(&base, timeout)
                    .map_err(|e| {
                        AppError::Internal(format!("Failed to build HTTP client: {}", e))
                    })?;
                Arc::new(source)
            }
            None => Arc::new(LocalHealthSource::new(Arc::clone(&reporter))),
        };

        Ok(Self {
            config: Arc::new(config),
            tera: Arc::new(tera),
            reporter,
            page_source,
        })
    }
}
