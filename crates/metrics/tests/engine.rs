//! End-to-end pass over all three metric modules sharing one set of
//! in-memory stores: the shape the HTTP summary layer drives in production.

use std::sync::Arc;

use chrono::{Duration, Utc};

use medgrid_core::FacilityId;
use medgrid_events::{BedEventKind, DiseaseReport, Period, Severity};
use medgrid_metrics::{
    OccupancyLedger, OutbreakConfig, OutbreakDetector, WastageBand, WastageScorer,
    WastageThresholds,
};
use medgrid_registry::{Category, Facility, InventoryItem};
use medgrid_store::{
    AppendLog, InMemoryBedLog, InMemoryFacilityRegistry, InMemoryItemRegistry,
    InMemoryReportLog, InMemoryUsageLog,
};

#[test]
fn dashboard_summary_flow() {
    let now = Utc::now();
    let beds = Arc::new(InMemoryBedLog::new());
    let usage = Arc::new(InMemoryUsageLog::new());
    let reports = Arc::new(InMemoryReportLog::new());
    let items = Arc::new(InMemoryItemRegistry::new());
    let facilities = Arc::new(InMemoryFacilityRegistry::new());

    let general = FacilityId::new();
    let clinic = FacilityId::new();
    facilities
        .upsert_facility(Facility::new(general, "General Hospital", "Karachi", 120).unwrap())
        .unwrap();
    facilities
        .upsert_facility(Facility::new(clinic, "District Clinic", "Karachi", 30).unwrap())
        .unwrap();

    // Occupancy: concurrent-writer-safe because everyone only appends.
    let ledger = OccupancyLedger::new(beds.clone(), facilities.clone());
    ledger
        .record_event(general, BedEventKind::Admission, 25, now)
        .unwrap();
    ledger
        .record_event(general, BedEventKind::Discharge, 5, now)
        .unwrap();
    ledger
        .record_event(clinic, BedEventKind::Admission, 8, now)
        .unwrap();

    let occupancy = ledger.current_occupancy_batch(&[general, clinic]).unwrap();
    assert_eq!(occupancy[&general], 20);
    assert_eq!(occupancy[&clinic], 8);
    assert_eq!(ledger.available_beds(general).unwrap(), 100);

    // Inventory: provision, consume, score.
    items
        .upsert_item(
            InventoryItem::new(
                general,
                "Insulin",
                Category::Medicine,
                100,
                "vials",
                Some(now + Duration::days(12)),
            )
            .unwrap(),
        )
        .unwrap();
    let scorer = WastageScorer::new(
        usage.clone(),
        items.clone(),
        facilities.clone(),
        WastageThresholds::default(),
    );
    scorer
        .record_usage(general, "insulin", 15, "ICU", "treatment", now, "nurse-1", None)
        .unwrap();

    let insulin = scorer
        .item_wastage(general, "Insulin", now)
        .unwrap()
        .unwrap();
    assert_eq!(insulin.current_stock, 85);
    assert_eq!(insulin.band, WastageBand::WasteRisk);

    let city = scorer.city_wastage_summary(now).unwrap();
    assert_eq!(city.totals.potential_waste, 85);
    assert_eq!(city.by_category[&Category::Medicine].waste_percent, 85);

    // Surveillance: baseline plus escalation.
    for (weeks_back, cases) in [(4i64, 10u64), (3, 12), (2, 9), (1, 11), (0, 35)] {
        let period_end = now - Duration::weeks(weeks_back);
        reports
            .append(
                DiseaseReport::file(
                    "karachi-south",
                    "dengue",
                    cases,
                    Period::Weekly,
                    period_end - Duration::weeks(1),
                    period_end,
                    Severity::Moderate,
                )
                .unwrap(),
            )
            .unwrap();
    }

    let detector = OutbreakDetector::new(reports.clone(), OutbreakConfig::default());
    let outcome = detector
        .outbreak_baseline("karachi-south", "dengue", Period::Weekly)
        .unwrap();
    let analysis = outcome.analysis().expect("enough data");
    assert!(analysis.is_outbreak);
    assert_eq!(analysis.severity, Some(Severity::Severe));

    // One location of one is enough to cross ceil(0.3 * 1) = 1.
    let pandemic = detector.pandemic_alerts(Period::Weekly).unwrap();
    assert_eq!(pandemic.total_locations, 1);
    assert_eq!(pandemic.threshold, 1);
    assert_eq!(pandemic.alerts.len(), 1);
    assert_eq!(pandemic.alerts[0].condition, "dengue");
}
