use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

use medgrid_metrics::EngineError;

/// Alert source family.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Wastage,
    Pandemic,
}

/// One actionable finding from a scan.
///
/// This is not a domain event; it is an insight handed to the notification
/// transport without mutating domain state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub kind: AlertKind,
    /// What the alert is about (item name, condition, ...).
    pub subject: String,
    pub message: String,
    /// Free-form detail payload for downstream rendering.
    pub metadata: JsonValue,
}

/// Everything one job run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertBatch {
    pub job: String,
    pub generated_at: DateTime<Utc>,
    pub alerts: Vec<Alert>,
}

impl AlertBatch {
    pub fn new(job: impl Into<String>, generated_at: DateTime<Utc>) -> Self {
        Self {
            job: job.into(),
            generated_at,
            alerts: Vec::new(),
        }
    }

    pub fn push(&mut self, alert: Alert) {
        self.alerts.push(alert);
    }
}

#[derive(Debug, Error)]
pub enum AlertError {
    #[error("invalid job configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// A one-shot scan over engine state.
///
/// Jobs must be deterministic for fixed store contents and must not mutate
/// domain state. Cadence (cron, interval, manual trigger) is the caller's
/// concern.
pub trait AlertJob: Send + Sync {
    /// Stable job name for logs and batch attribution.
    fn name(&self) -> &'static str;

    /// Execute the scan and return the produced alerts.
    fn run(&self) -> Result<AlertBatch, AlertError>;
}
