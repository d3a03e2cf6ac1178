//! Outbreak baseline detector: statistical classification of the latest
//! reporting period against a rolling historical baseline.
//!
//! Stateless across calls — the baseline is reconstructed from stored reports
//! every time. A fixed rolling window plus population variance keeps the
//! detector parameter-light and reproducible; the three-tier z-score ladder is
//! an explainable substitute for a full anomaly model, which sparse reporting
//! cadences (daily/weekly/monthly) could not feed anyway.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use medgrid_events::{DiseaseReport, Period, Severity};
use medgrid_store::{AppendLog, ReportFilter};

use crate::aggregate::group_by;
use crate::error::EngineResult;

/// Detector tuning. The tier multipliers and pandemic fraction are policy
/// choices, not laws; they default to the network's standing values but stay
/// swappable per deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutbreakConfig {
    /// Baseline sample size N; the detector fetches the most recent N+1
    /// reports per key.
    pub baseline_window: usize,
    /// Outbreak line: `mean + outbreak_z * stddev`.
    pub outbreak_z: f64,
    /// Moderate tier line.
    pub moderate_z: f64,
    /// Severe tier line.
    pub severe_z: f64,
    /// Fraction of known locations that must be in outbreak before a
    /// condition escalates to a pandemic alert.
    pub pandemic_location_fraction: f64,
}

impl Default for OutbreakConfig {
    fn default() -> Self {
        Self {
            baseline_window: 12,
            outbreak_z: 2.0,
            moderate_z: 2.5,
            severe_z: 3.0,
            pandemic_location_fraction: 0.3,
        }
    }
}

impl OutbreakConfig {
    pub fn with_baseline_window(mut self, window: usize) -> Self {
        self.baseline_window = window;
        self
    }

    pub fn with_pandemic_location_fraction(mut self, fraction: f64) -> Self {
        self.pandemic_location_fraction = fraction;
        self
    }
}

/// Statistical assessment of the latest period for one
/// (location, condition, period) key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineAnalysis {
    pub location: String,
    pub condition: String,
    pub period: Period,
    pub current_cases: u64,
    /// Severity declared on the current report by the reporter.
    pub declared_severity: Severity,
    /// Number of historical reports in the baseline sample.
    pub baseline_size: usize,
    pub mean: f64,
    pub std_dev: f64,
    /// `mean + outbreak_z * stddev`.
    pub outbreak_threshold: f64,
    pub is_outbreak: bool,
    /// Computed tier; `None` for a report below the outbreak line.
    pub severity: Option<Severity>,
}

impl BaselineAnalysis {
    /// Severity for escalation purposes: the computed tier, upgraded by the
    /// reporter's declared severity when that is higher (the only way
    /// `Critical` enters an alert).
    pub fn effective_severity(&self) -> Option<Severity> {
        self.severity.map(|computed| computed.max(self.declared_severity))
    }
}

/// Outcome of a baseline query. Fewer than 2 reports is a structured
/// insufficient-data result — an explicit flag, not an error and not a default
/// baseline of zero — so callers can render a friendly empty state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BaselineOutcome {
    InsufficientData { reports_found: usize },
    Analyzed(BaselineAnalysis),
}

impl BaselineOutcome {
    pub fn has_enough_data(&self) -> bool {
        matches!(self, BaselineOutcome::Analyzed(_))
    }

    pub fn analysis(&self) -> Option<&BaselineAnalysis> {
        match self {
            BaselineOutcome::Analyzed(analysis) => Some(analysis),
            BaselineOutcome::InsufficientData { .. } => None,
        }
    }
}

/// A condition in outbreak across enough of the network to count as a
/// pandemic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PandemicAlert {
    pub condition: String,
    /// Worst severity observed among affected locations.
    pub severity: Severity,
    pub affected_locations: Vec<String>,
    pub total_current_cases: u64,
}

/// Network-wide pandemic assessment for one reporting period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PandemicReport {
    pub period: Period,
    pub alerts: Vec<PandemicAlert>,
    /// Affected-location count required for escalation:
    /// `ceil(fraction * total_locations)`.
    pub threshold: usize,
    pub total_locations: usize,
}

/// Stateless outbreak computations over an injected report log.
#[derive(Debug)]
pub struct OutbreakDetector<R> {
    reports: R,
    config: OutbreakConfig,
}

impl<R> OutbreakDetector<R>
where
    R: AppendLog<Record = DiseaseReport, Filter = ReportFilter>,
{
    pub fn new(reports: R, config: OutbreakConfig) -> Self {
        Self { reports, config }
    }

    /// Classify the latest period for one (location, condition, period) key.
    pub fn outbreak_baseline(
        &self,
        location: &str,
        condition: &str,
        period: Period,
    ) -> EngineResult<BaselineOutcome> {
        let reports = self
            .reports
            .query(&ReportFilter::for_key(location, condition, period))?;
        Ok(self.analyze_group(reports))
    }

    /// Pandemic escalation across every (location, condition) pair reporting
    /// at this cadence, in one pass over the report log.
    pub fn pandemic_alerts(&self, period: Period) -> EngineResult<PandemicReport> {
        let reports = self.reports.query(&ReportFilter::for_period(period))?;

        let total_locations = {
            let mut locations: Vec<&str> =
                reports.iter().map(|r| r.location.as_str()).collect();
            locations.sort_unstable();
            locations.dedup();
            locations.len()
        };
        let threshold = pandemic_threshold(
            self.config.pandemic_location_fraction,
            total_locations,
        );

        // condition -> outbreak analyses per affected location
        let mut outbreaks: HashMap<String, Vec<BaselineAnalysis>> = HashMap::new();
        let keyed = group_by(&reports, |r| (r.location.clone(), r.condition.clone()));
        for ((_, condition), group) in keyed {
            let group = group.into_iter().cloned().collect::<Vec<_>>();
            if let BaselineOutcome::Analyzed(analysis) = self.analyze_group(group) {
                if analysis.is_outbreak {
                    outbreaks.entry(condition).or_default().push(analysis);
                }
            }
        }

        let mut alerts = Vec::new();
        for (condition, analyses) in outbreaks {
            if threshold == 0 || analyses.len() < threshold {
                continue;
            }
            let severity = analyses
                .iter()
                .filter_map(BaselineAnalysis::effective_severity)
                .max()
                .unwrap_or(Severity::Mild);
            let mut affected_locations: Vec<String> =
                analyses.iter().map(|a| a.location.clone()).collect();
            affected_locations.sort_unstable();
            let total_current_cases = analyses.iter().map(|a| a.current_cases).sum();

            alerts.push(PandemicAlert {
                condition,
                severity,
                affected_locations,
                total_current_cases,
            });
        }
        alerts.sort_by(|a, b| {
            b.severity
                .cmp(&a.severity)
                .then_with(|| a.condition.cmp(&b.condition))
        });

        tracing::info!(
            period = period.as_str(),
            alerts = alerts.len(),
            threshold,
            total_locations,
            "pandemic scan complete"
        );

        Ok(PandemicReport {
            period,
            alerts,
            threshold,
            total_locations,
        })
    }

    /// Analyze one key's reports: newest report is "current", the next
    /// `baseline_window` form the baseline sample.
    fn analyze_group(&self, mut reports: Vec<DiseaseReport>) -> BaselineOutcome {
        reports.sort_by(|a, b| b.period_start.cmp(&a.period_start));
        reports.truncate(self.config.baseline_window + 1);

        if reports.len() < 2 {
            return BaselineOutcome::InsufficientData {
                reports_found: reports.len(),
            };
        }

        let current = &reports[0];
        let baseline: Vec<f64> = reports[1..].iter().map(|r| r.case_count as f64).collect();

        let mean = mean(&baseline);
        let std_dev = stddev_population(&baseline, mean);
        let outbreak_threshold = mean + self.config.outbreak_z * std_dev;

        let current_cases = current.case_count as f64;
        let is_outbreak = current_cases > outbreak_threshold;
        let severity = if !is_outbreak {
            None
        } else if current_cases > mean + self.config.severe_z * std_dev {
            Some(Severity::Severe)
        } else if current_cases > mean + self.config.moderate_z * std_dev {
            Some(Severity::Moderate)
        } else {
            Some(Severity::Mild)
        };

        BaselineOutcome::Analyzed(BaselineAnalysis {
            location: current.location.clone(),
            condition: current.condition.clone(),
            period: current.period,
            current_cases: current.case_count,
            declared_severity: current.severity,
            baseline_size: baseline.len(),
            mean,
            std_dev,
            outbreak_threshold,
            is_outbreak,
            severity,
        })
    }
}

/// Affected-location count required for pandemic escalation.
pub fn pandemic_threshold(fraction: f64, total_locations: usize) -> usize {
    (fraction * total_locations as f64).ceil() as usize
}

fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

/// Population standard deviation (divide by N, not N-1).
fn stddev_population(xs: &[f64], mean: f64) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    let var = xs
        .iter()
        .map(|x| {
            let d = x - mean;
            d * d
        })
        .sum::<f64>()
        / xs.len() as f64;
    var.sqrt()
}
