//! Concrete scan jobs: wastage and pandemic sweeps.

use chrono::{DateTime, Utc};
use serde_json::json;

use medgrid_core::FacilityId;
use medgrid_events::{DiseaseReport, Period, UsageEvent};
use medgrid_registry::{Facility, InventoryItem};
use medgrid_metrics::{OutbreakDetector, WastageBand, WastageScorer};
use medgrid_store::{
    AppendLog, ItemFilter, ReferenceStore, ReportFilter, UsageEventFilter,
};

use crate::job::{Alert, AlertBatch, AlertError, AlertJob, AlertKind};

/// Sweeps the whole network for items at wastage risk.
#[derive(Debug)]
pub struct WastageScanJob<U, I, F> {
    scorer: WastageScorer<U, I, F>,
    /// Items scoring below this are left out of the batch.
    score_cutoff: u32,
    as_of: DateTime<Utc>,
}

impl<U, I, F> WastageScanJob<U, I, F>
where
    U: AppendLog<Record = UsageEvent, Filter = UsageEventFilter>,
    I: ReferenceStore<
            Key = (FacilityId, String),
            Record = InventoryItem,
            Filter = ItemFilter,
        >,
    F: ReferenceStore<Key = FacilityId, Record = Facility>,
{
    pub fn new(scorer: WastageScorer<U, I, F>, score_cutoff: u32, as_of: DateTime<Utc>) -> Self {
        Self {
            scorer,
            score_cutoff,
            as_of,
        }
    }
}

impl<U, I, F> AlertJob for WastageScanJob<U, I, F>
where
    U: AppendLog<Record = UsageEvent, Filter = UsageEventFilter>,
    I: ReferenceStore<
            Key = (FacilityId, String),
            Record = InventoryItem,
            Filter = ItemFilter,
        >,
    F: ReferenceStore<Key = FacilityId, Record = Facility>,
{
    fn name(&self) -> &'static str {
        "wastage_scan"
    }

    fn run(&self) -> Result<AlertBatch, AlertError> {
        let summary = self.scorer.city_wastage_summary(self.as_of)?;

        let mut batch = AlertBatch::new(self.name(), self.as_of);
        for result in summary
            .top_risk
            .iter()
            .filter(|r| r.band != WastageBand::Normal && r.score >= self.score_cutoff)
        {
            batch.push(Alert {
                kind: AlertKind::Wastage,
                subject: result.item_name.clone(),
                message: format!(
                    "{} at facility {} classified {} (score {})",
                    result.item_name,
                    result.facility_id,
                    result.band.as_str(),
                    result.score
                ),
                metadata: json!({
                    "facility_id": result.facility_id,
                    "category": result.category.as_str(),
                    "band": result.band.as_str(),
                    "score": result.score,
                    "current_stock": result.current_stock,
                    "potential_waste": result.potential_waste,
                    "days_to_expiry": result.days_to_expiry,
                }),
            });
        }
        Ok(batch)
    }
}

/// Sweeps one reporting cadence for pandemic escalations.
#[derive(Debug)]
pub struct OutbreakScanJob<R> {
    detector: OutbreakDetector<R>,
    period: Period,
    as_of: DateTime<Utc>,
}

impl<R> OutbreakScanJob<R>
where
    R: AppendLog<Record = DiseaseReport, Filter = ReportFilter>,
{
    pub fn new(detector: OutbreakDetector<R>, period: Period, as_of: DateTime<Utc>) -> Self {
        Self {
            detector,
            period,
            as_of,
        }
    }
}

impl<R> AlertJob for OutbreakScanJob<R>
where
    R: AppendLog<Record = DiseaseReport, Filter = ReportFilter>,
{
    fn name(&self) -> &'static str {
        "outbreak_scan"
    }

    fn run(&self) -> Result<AlertBatch, AlertError> {
        let report = self.detector.pandemic_alerts(self.period)?;

        let mut batch = AlertBatch::new(self.name(), self.as_of);
        for alert in &report.alerts {
            batch.push(Alert {
                kind: AlertKind::Pandemic,
                subject: alert.condition.clone(),
                message: format!(
                    "{} in outbreak across {} of {} known locations ({})",
                    alert.condition,
                    alert.affected_locations.len(),
                    report.total_locations,
                    alert.severity.as_str()
                ),
                metadata: json!({
                    "period": self.period.as_str(),
                    "severity": alert.severity.as_str(),
                    "affected_locations": alert.affected_locations,
                    "total_current_cases": alert.total_current_cases,
                    "threshold": report.threshold,
                    "total_locations": report.total_locations,
                }),
            });
        }
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Duration;
    use medgrid_metrics::{OutbreakConfig, WastageThresholds};
    use medgrid_registry::Category;
    use medgrid_events::Severity;
    use medgrid_store::{
        InMemoryFacilityRegistry, InMemoryItemRegistry, InMemoryReportLog, InMemoryUsageLog,
    };

    #[test]
    fn wastage_scan_reports_only_items_at_or_above_cutoff() {
        let usage = Arc::new(InMemoryUsageLog::new());
        let items = Arc::new(InMemoryItemRegistry::new());
        let facilities = Arc::new(InMemoryFacilityRegistry::new());
        let facility_id = FacilityId::new();
        let now = Utc::now();
        facilities
            .upsert_facility(Facility::new(facility_id, "City Hospital", "Karachi", 100).unwrap())
            .unwrap();
        // Unused and expiring in 5 days: WASTE_RISK score 100.
        items
            .upsert_item(
                InventoryItem::new(
                    facility_id,
                    "Insulin",
                    Category::Medicine,
                    100,
                    "vials",
                    Some(now + Duration::days(5)),
                )
                .unwrap(),
            )
            .unwrap();
        // Mildly underused: LOW_USAGE with a small score.
        items
            .upsert_item(
                InventoryItem::new(facility_id, "Gauze", Category::Supplies, 100, "rolls", None)
                    .unwrap(),
            )
            .unwrap();
        usage
            .append(
                UsageEvent::record(
                    facility_id,
                    "Gauze",
                    55,
                    "ER",
                    "dressing",
                    now,
                    "nurse-1",
                    None,
                )
                .unwrap(),
            )
            .unwrap();

        let scorer = WastageScorer::new(usage, items, facilities, WastageThresholds::default());
        let job = WastageScanJob::new(scorer, 50, now);

        let batch = job.run().unwrap();

        assert_eq!(batch.job, "wastage_scan");
        assert_eq!(batch.alerts.len(), 1);
        assert_eq!(batch.alerts[0].subject, "Insulin");
        assert_eq!(batch.alerts[0].kind, AlertKind::Wastage);
    }

    #[test]
    fn outbreak_scan_emits_one_alert_per_pandemic_condition() {
        let log = Arc::new(InMemoryReportLog::new());
        let now = Utc::now();
        for i in 0..3 {
            for (week, cases) in [(3i64, 10u64), (2, 10), (1, 10), (0, 40)] {
                let period_end = now - Duration::weeks(week);
                log.append(
                    DiseaseReport::file(
                        format!("district-{i}"),
                        "cholera",
                        cases,
                        Period::Weekly,
                        period_end - Duration::weeks(1),
                        period_end,
                        Severity::Mild,
                    )
                    .unwrap(),
                )
                .unwrap();
            }
        }

        let detector = OutbreakDetector::new(log, OutbreakConfig::default());
        let job = OutbreakScanJob::new(detector, Period::Weekly, now);

        let batch = job.run().unwrap();

        assert_eq!(batch.job, "outbreak_scan");
        assert_eq!(batch.alerts.len(), 1);
        assert_eq!(batch.alerts[0].subject, "cholera");
        assert_eq!(batch.alerts[0].kind, AlertKind::Pandemic);
    }
}
