use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use medgrid_core::{DomainError, DomainResult, RecordId};

use crate::event::Event;

/// Reporting cadence for disease surveillance.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
        }
    }
}

/// Severity declared on a report, and the scale used for computed outbreak
/// tiers. Ordered: `Mild < Moderate < Severe < Critical`.
///
/// The baseline detector only ever *computes* mild/moderate/severe; `Critical`
/// can enter a pandemic alert through a report's declared severity.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Mild => "mild",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
            Severity::Critical => "critical",
        }
    }
}

/// One surveillance report for a (location, condition, period) reporting
/// window.
///
/// The persistence layer enforces at most one report per
/// `(location, condition, period, period_start, period_end)`; the engine only
/// reads them back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiseaseReport {
    pub id: RecordId,
    pub location: String,
    pub condition: String,
    pub case_count: u64,
    pub period: Period,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub severity: Severity,
}

impl DiseaseReport {
    #[allow(clippy::too_many_arguments)]
    pub fn file(
        location: impl Into<String>,
        condition: impl Into<String>,
        case_count: u64,
        period: Period,
        period_start: DateTime<Utc>,
        period_end: DateTime<Utc>,
        severity: Severity,
    ) -> DomainResult<Self> {
        let location = location.into();
        let condition = condition.into();
        if location.trim().is_empty() {
            return Err(DomainError::validation("location cannot be empty"));
        }
        if condition.trim().is_empty() {
            return Err(DomainError::validation("condition cannot be empty"));
        }
        if period_end <= period_start {
            return Err(DomainError::validation(
                "period_end must be after period_start",
            ));
        }
        Ok(Self {
            id: RecordId::new(),
            location,
            condition,
            case_count,
            period,
            period_start,
            period_end,
            severity,
        })
    }
}

impl Event for DiseaseReport {
    fn event_type(&self) -> &'static str {
        "surveillance.report.filed"
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.period_end
    }
}
