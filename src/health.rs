//! Health reporting for the running process.
//!
//! `HealthReporter` produces a fresh `HealthSnapshot` on every call from the
//! process start instant and the wall clock. It holds no mutable state, so any
//! number of handlers can call it concurrently.

use std::fmt;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{
    DeploymentConfig, DEFAULT_ENVIRONMENT, ENV_VAR_ENVIRONMENT, ENV_VAR_VERSION, SERVICE_NAME,
};

/// Reported service status.
///
/// Only `Healthy` is ever produced here; any other string received from a
/// remote reporter is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HealthStatus {
    Healthy,
    Other(String),
}

impl HealthStatus {
    pub fn as_str(&self) -> &str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Other(s) => s,
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }
}

impl From<String> for HealthStatus {
    fn from(value: String) -> Self {
        if value == "healthy" {
            HealthStatus::Healthy
        } else {
            HealthStatus::Other(value)
        }
    }
}

impl From<HealthStatus> for String {
    fn from(value: HealthStatus) -> Self {
        match value {
            HealthStatus::Healthy => "healthy".to_string(),
            HealthStatus::Other(s) => s,
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time status record returned by the health endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSnapshot {
    pub status: HealthStatus,
    pub timestamp: DateTime<Utc>,
    /// Seconds since process start
    pub uptime: f64,
    pub environment: String,
    pub version: String,
    pub service: String,
}

/// Deployment labels resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    pub environment: String,
    pub version: String,
}

impl Deployment {
    /// Resolve labels from the process environment, then config, then defaults.
    pub fn from_env(config: &DeploymentConfig) -> Self {
        Self::resolve(config, |key| std::env::var(key).ok())
    }

    /// Resolve labels with a custom variable lookup.
    pub fn resolve<F>(config: &DeploymentConfig, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        let environment = non_empty(lookup(ENV_VAR_ENVIRONMENT))
            .or_else(|| non_empty(config.environment.clone()))
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());
        let version = non_empty(lookup(ENV_VAR_VERSION))
            .or_else(|| non_empty(config.version.clone()))
            .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());

        Self {
            environment,
            version,
        }
    }
}

/// Produces health snapshots for this process.
#[derive(Debug, Clone)]
pub struct HealthReporter {
    started: Instant,
    deployment: Deployment,
}

impl HealthReporter {
    /// Creates a reporter whose uptime counts from now.
    ///
    /// Construct it as early as possible in `main` so uptime tracks the process.
    pub fn new(deployment: Deployment) -> Self {
        Self::started_at(Instant::now(), deployment)
    }

    pub fn started_at(started: Instant, deployment: Deployment) -> Self {
        Self {
            started,
            deployment,
        }
    }

    pub fn deployment(&self) -> &Deployment {
        &self.deployment
    }

    /// Builds a fresh snapshot. Never fails and never caches.
    pub fn snapshot(&self) -> HealthSnapshot {
        HealthSnapshot {
            status: HealthStatus::Healthy,
            timestamp: Utc::now(),
            uptime: self.started.elapsed().as_secs_f64(),
            environment: self.deployment.environment.clone(),
            version: self.deployment.version.clone(),
            service: SERVICE_NAME.to_string(),
        }
    }
}
