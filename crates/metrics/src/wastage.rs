//! Wastage risk scorer: per-item risk classification derived from usage logs
//! and provisioned inventory records.
//!
//! Current stock is never stored; it is `max(0, initial_stock - total_used)`
//! recomputed on every call, with usage totals matched case-insensitively
//! against item names.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use medgrid_core::FacilityId;
use medgrid_events::UsageEvent;
use medgrid_registry::{Category, Facility, InventoryItem};
use medgrid_store::{
    AppendLog, ItemFilter, ReferenceStore, UsageEventFilter,
};

use crate::aggregate::sum_by;
use crate::error::{EngineError, EngineResult};

/// Days-to-expiry horizon under which an item counts as expiring.
const EXPIRY_HORIZON_DAYS: i64 = 30;

/// Expected-usage thresholds: fraction of initial stock an item should have
/// consumed by now.
///
/// Lookup order: `(category, item)` override, then per-category default, then
/// the global default of 0.6. This is static configuration passed into the
/// scorer per deployment/test; there is no module-level table.
#[derive(Debug, Clone)]
pub struct WastageThresholds {
    global_default: f64,
    category_defaults: HashMap<Category, f64>,
    item_overrides: HashMap<(Category, String), f64>,
}

impl Default for WastageThresholds {
    fn default() -> Self {
        Self {
            global_default: 0.6,
            category_defaults: HashMap::new(),
            item_overrides: HashMap::new(),
        }
    }
}

impl WastageThresholds {
    pub fn new(global_default: f64) -> Self {
        Self {
            global_default,
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: Category, fraction: f64) -> Self {
        self.category_defaults.insert(category, fraction);
        self
    }

    pub fn with_item(mut self, category: Category, name: &str, fraction: f64) -> Self {
        self.item_overrides
            .insert((category, name.trim().to_lowercase()), fraction);
        self
    }

    /// Expected-usage fraction for one item.
    pub fn expected_usage(&self, category: Category, name: &str) -> f64 {
        let key = (category, name.trim().to_lowercase());
        if let Some(fraction) = self.item_overrides.get(&key) {
            return *fraction;
        }
        if let Some(fraction) = self.category_defaults.get(&category) {
            return *fraction;
        }
        self.global_default
    }
}

/// Wastage classification band. Exactly one band applies per item, evaluated
/// in this priority order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WastageBand {
    WasteRisk,
    ExpiringSoon,
    LowUsage,
    Normal,
}

impl WastageBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            WastageBand::WasteRisk => "WASTE_RISK",
            WastageBand::ExpiringSoon => "EXPIRING_SOON",
            WastageBand::LowUsage => "LOW_USAGE",
            WastageBand::Normal => "NORMAL",
        }
    }
}

/// Per-item wastage assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WastageResult {
    pub facility_id: FacilityId,
    pub item_name: String,
    pub category: Category,
    pub initial_stock: u64,
    pub total_used: u64,
    pub current_stock: u64,
    pub usage_rate: f64,
    /// Whole days until expiry (ceiling); negative once expired, `None` when
    /// the item has no expiry date.
    pub days_to_expiry: Option<i64>,
    pub band: WastageBand,
    pub score: u32,
    /// Units likely never consumed before expiry. Numerically equal to
    /// `current_stock`, reported separately because it drives a different
    /// downstream metric.
    pub potential_waste: u64,
}

/// Score one inventory item against its usage total to date.
///
/// Pure function of its inputs; `as_of` is the evaluation instant for the
/// expiry horizon.
pub fn score_item(
    item: &InventoryItem,
    total_used: u64,
    thresholds: &WastageThresholds,
    as_of: DateTime<Utc>,
) -> WastageResult {
    let current_stock = item.initial_stock.saturating_sub(total_used);
    let days_to_expiry = item.expiry_date.map(|expiry| ceil_days(expiry - as_of));

    let threshold = thresholds.expected_usage(item.category, &item.name);
    let usage_rate = if item.initial_stock > 0 {
        total_used as f64 / item.initial_stock as f64
    } else {
        0.0
    };

    let expiring = days_to_expiry.is_some_and(|d| d < EXPIRY_HORIZON_DAYS);
    let low_usage = usage_rate < threshold;

    // First match wins.
    let (band, score) = if expiring && low_usage {
        (WastageBand::WasteRisk, round_score((1.0 - usage_rate) * 100.0))
    } else if expiring {
        let days = days_to_expiry.unwrap_or(EXPIRY_HORIZON_DAYS);
        let raw = (EXPIRY_HORIZON_DAYS - days) as f64 / EXPIRY_HORIZON_DAYS as f64 * 50.0;
        (WastageBand::ExpiringSoon, round_score(raw.max(0.0)))
    } else if low_usage {
        (WastageBand::LowUsage, round_score((threshold - usage_rate) * 100.0))
    } else {
        (WastageBand::Normal, 0)
    };

    WastageResult {
        facility_id: item.facility_id,
        item_name: item.name.clone(),
        category: item.category,
        initial_stock: item.initial_stock,
        total_used,
        current_stock,
        usage_rate,
        days_to_expiry,
        band,
        score,
        potential_waste: current_stock,
    }
}

/// Category-level wastage bucket: `sum(potential_waste) / sum(initial_stock)`
/// as a whole percent (0 when the denominator is 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryWastage {
    pub initial_stock: u64,
    pub total_used: u64,
    pub potential_waste: u64,
    pub waste_percent: u32,
}

/// Network-wide totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WastageTotals {
    pub items: usize,
    pub initial_stock: u64,
    pub total_used: u64,
    pub potential_waste: u64,
    pub waste_percent: u32,
}

/// City-wide (all-facility) wastage summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityWastageSummary {
    pub totals: WastageTotals,
    pub by_category: HashMap<Category, CategoryWastage>,
    /// Highest-scoring at-risk items, descending by score.
    pub top_risk: Vec<WastageResult>,
}

/// One category across every facility in the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: Category,
    pub totals: CategoryWastage,
    pub items: Vec<WastageResult>,
}

const TOP_RISK_LIMIT: usize = 10;

/// Stateless wastage computations over injected usage logs and reference
/// stores.
#[derive(Debug)]
pub struct WastageScorer<U, I, F> {
    usage: U,
    items: I,
    facilities: F,
    thresholds: WastageThresholds,
}

impl<U, I, F> WastageScorer<U, I, F>
where
    U: AppendLog<Record = UsageEvent, Filter = UsageEventFilter>,
    I: ReferenceStore<
            Key = (FacilityId, String),
            Record = InventoryItem,
            Filter = ItemFilter,
        >,
    F: ReferenceStore<Key = FacilityId, Record = Facility>,
{
    pub fn new(usage: U, items: I, facilities: F, thresholds: WastageThresholds) -> Self {
        Self {
            usage,
            items,
            facilities,
            thresholds,
        }
    }

    /// Total quantity consumed to date for one item (case-insensitive match).
    pub fn total_used(&self, facility_id: FacilityId, item_name: &str) -> EngineResult<u64> {
        let events = self
            .usage
            .query(&UsageEventFilter::for_item(facility_id, item_name))?;
        Ok(events.iter().map(|e| u64::from(e.quantity_used)).sum())
    }

    /// Derived current stock for one item; `Ok(None)` when the item is not
    /// provisioned at the facility.
    pub fn current_stock(
        &self,
        facility_id: FacilityId,
        item_name: &str,
    ) -> EngineResult<Option<u64>> {
        let Some(item) = self.lookup_item(facility_id, item_name)? else {
            return Ok(None);
        };
        let used = self.total_used(facility_id, item_name)?;
        Ok(Some(item.initial_stock.saturating_sub(used)))
    }

    /// Score one item.
    ///
    /// Unknown facility is a not-found error; an item absent from the
    /// facility's inventory yields `Ok(None)` — it simply isn't scored.
    pub fn item_wastage(
        &self,
        facility_id: FacilityId,
        item_name: &str,
        as_of: DateTime<Utc>,
    ) -> EngineResult<Option<WastageResult>> {
        self.ensure_facility(facility_id)?;
        let Some(item) = self.lookup_item(facility_id, item_name)? else {
            return Ok(None);
        };
        let used = self.total_used(facility_id, &item.name)?;
        Ok(Some(score_item(&item, used, &self.thresholds, as_of)))
    }

    /// Score every item provisioned at one facility, aggregating its usage
    /// log in a single pass.
    pub fn facility_wastage_summary(
        &self,
        facility_id: FacilityId,
        as_of: DateTime<Utc>,
    ) -> EngineResult<Vec<WastageResult>> {
        self.ensure_facility(facility_id)?;
        let items = self.items.list(&ItemFilter::for_facility(facility_id))?;
        let usage = self.usage.query(&UsageEventFilter::for_facility(facility_id))?;
        let used_by_item = sum_by(
            &usage,
            |e| e.normalized_item_name(),
            |e| u64::from(e.quantity_used),
        );

        Ok(items
            .iter()
            .map(|item| {
                let used = used_by_item
                    .get(&item.normalized_name())
                    .copied()
                    .unwrap_or(0);
                score_item(item, used, &self.thresholds, as_of)
            })
            .collect())
    }

    /// Network-wide summary: totals, category buckets, and the top-risk list.
    pub fn city_wastage_summary(&self, as_of: DateTime<Utc>) -> EngineResult<CityWastageSummary> {
        let results = self.score_all(ItemFilter::all(), as_of)?;

        let mut totals = WastageTotals {
            items: results.len(),
            ..WastageTotals::default()
        };
        let mut by_category: HashMap<Category, CategoryWastage> = HashMap::new();
        for r in &results {
            totals.initial_stock += r.initial_stock;
            totals.total_used += r.total_used;
            totals.potential_waste += r.potential_waste;

            let bucket = by_category.entry(r.category).or_default();
            bucket.initial_stock += r.initial_stock;
            bucket.total_used += r.total_used;
            bucket.potential_waste += r.potential_waste;
        }
        totals.waste_percent = whole_percent(totals.potential_waste, totals.initial_stock);
        for bucket in by_category.values_mut() {
            bucket.waste_percent = whole_percent(bucket.potential_waste, bucket.initial_stock);
        }

        let mut top_risk: Vec<WastageResult> = results
            .into_iter()
            .filter(|r| r.band != WastageBand::Normal)
            .collect();
        top_risk.sort_by(|a, b| b.score.cmp(&a.score).then(a.item_name.cmp(&b.item_name)));
        top_risk.truncate(TOP_RISK_LIMIT);

        Ok(CityWastageSummary {
            totals,
            by_category,
            top_risk,
        })
    }

    /// One category across all facilities (e.g. medicine wastage
    /// network-wide).
    pub fn category_wastage_across_facilities(
        &self,
        category: Category,
        as_of: DateTime<Utc>,
    ) -> EngineResult<CategorySummary> {
        let items = self.score_all(ItemFilter::for_category(category), as_of)?;

        let mut totals = CategoryWastage::default();
        for r in &items {
            totals.initial_stock += r.initial_stock;
            totals.total_used += r.total_used;
            totals.potential_waste += r.potential_waste;
        }
        totals.waste_percent = whole_percent(totals.potential_waste, totals.initial_stock);

        Ok(CategorySummary {
            category,
            totals,
            items,
        })
    }

    /// Append a new usage fact.
    ///
    /// Rejected as a validation error when the quantity would drive derived
    /// current stock negative — checked against the recomputed value, never a
    /// stored counter. An exact-exhaustion usage is accepted and drives stock
    /// to 0.
    #[allow(clippy::too_many_arguments)]
    pub fn record_usage(
        &self,
        facility_id: FacilityId,
        item_name: &str,
        quantity: u32,
        department: &str,
        purpose: &str,
        occurred_at: DateTime<Utc>,
        recorded_by: &str,
        patient_id: Option<String>,
    ) -> EngineResult<UsageEvent> {
        self.ensure_facility(facility_id)?;
        let item = self
            .lookup_item(facility_id, item_name)?
            .ok_or_else(|| {
                EngineError::not_found(format!(
                    "item '{item_name}' at facility {facility_id}"
                ))
            })?;

        let event = UsageEvent::record(
            facility_id,
            item.name.clone(),
            quantity,
            department,
            purpose,
            occurred_at,
            recorded_by,
            patient_id,
        )?;

        let used = self.total_used(facility_id, &item.name)?;
        let remaining = item.initial_stock.saturating_sub(used);
        if u64::from(quantity) > remaining {
            return Err(EngineError::validation(format!(
                "usage of {quantity} exceeds remaining stock {remaining} for '{}'",
                item.name
            )));
        }

        let stored = self.usage.append(event)?;
        tracing::debug!(
            facility_id = %facility_id,
            item = %stored.item_name,
            quantity,
            remaining = remaining - u64::from(quantity),
            "usage event recorded"
        );
        Ok(stored)
    }

    fn score_all(
        &self,
        filter: ItemFilter,
        as_of: DateTime<Utc>,
    ) -> EngineResult<Vec<WastageResult>> {
        let items = self.items.list(&filter)?;
        let usage = self.usage.query(&UsageEventFilter::all())?;
        let used_by_item = sum_by(
            &usage,
            |e| (e.facility_id, e.normalized_item_name()),
            |e| u64::from(e.quantity_used),
        );

        Ok(items
            .iter()
            .map(|item| {
                let used = used_by_item
                    .get(&(item.facility_id, item.normalized_name()))
                    .copied()
                    .unwrap_or(0);
                score_item(item, used, &self.thresholds, as_of)
            })
            .collect())
    }

    fn lookup_item(
        &self,
        facility_id: FacilityId,
        item_name: &str,
    ) -> EngineResult<Option<InventoryItem>> {
        let key = (facility_id, item_name.trim().to_lowercase());
        Ok(self.items.get(&key)?)
    }

    fn ensure_facility(&self, facility_id: FacilityId) -> EngineResult<Facility> {
        self.facilities
            .get(&facility_id)?
            .ok_or_else(|| EngineError::not_found(format!("facility {facility_id}")))
    }
}

fn round_score(raw: f64) -> u32 {
    raw.max(0.0).round() as u32
}

fn whole_percent(numerator: u64, denominator: u64) -> u32 {
    if denominator == 0 {
        return 0;
    }
    (numerator as f64 / denominator as f64 * 100.0).round() as u32
}

fn ceil_days(delta: chrono::TimeDelta) -> i64 {
    (delta.num_seconds() as f64 / 86_400.0).ceil() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Duration;
    use medgrid_store::{
        InMemoryFacilityRegistry, InMemoryItemRegistry, InMemoryUsageLog,
    };

    type TestScorer = WastageScorer<
        Arc<InMemoryUsageLog>,
        Arc<InMemoryItemRegistry>,
        Arc<InMemoryFacilityRegistry>,
    >;

    struct Fixture {
        scorer: TestScorer,
        usage: Arc<InMemoryUsageLog>,
        items: Arc<InMemoryItemRegistry>,
        facilities: Arc<InMemoryFacilityRegistry>,
        facility_id: FacilityId,
        now: DateTime<Utc>,
    }

    fn fixture() -> Fixture {
        fixture_with(WastageThresholds::default())
    }

    fn fixture_with(thresholds: WastageThresholds) -> Fixture {
        let usage = Arc::new(InMemoryUsageLog::new());
        let items = Arc::new(InMemoryItemRegistry::new());
        let facilities = Arc::new(InMemoryFacilityRegistry::new());
        let facility_id = FacilityId::new();
        facilities
            .upsert_facility(
                Facility::new(facility_id, "City Hospital", "Karachi", 200).unwrap(),
            )
            .unwrap();
        Fixture {
            scorer: WastageScorer::new(
                usage.clone(),
                items.clone(),
                facilities.clone(),
                thresholds,
            ),
            usage,
            items,
            facilities,
            facility_id,
            now: Utc::now(),
        }
    }

    fn item(
        fx: &Fixture,
        name: &str,
        category: Category,
        initial_stock: u64,
        expires_in_days: Option<i64>,
    ) -> InventoryItem {
        let item = InventoryItem::new(
            fx.facility_id,
            name,
            category,
            initial_stock,
            "units",
            expires_in_days.map(|d| fx.now + Duration::days(d)),
        )
        .unwrap();
        fx.items.upsert_item(item.clone()).unwrap();
        item
    }

    fn use_item(fx: &Fixture, name: &str, quantity: u32) {
        fx.usage
            .append(
                UsageEvent::record(
                    fx.facility_id,
                    name,
                    quantity,
                    "ER",
                    "treatment",
                    fx.now,
                    "nurse-1",
                    None,
                )
                .unwrap(),
            )
            .unwrap();
    }

    #[test]
    fn adequate_usage_on_expiring_item_is_expiring_soon_not_waste_risk() {
        // days=10, rate=0.9, threshold=0.6: usage is adequate, so the
        // waste-risk arm must not fire.
        let fx = fixture();
        item(&fx, "Insulin", Category::Medicine, 100, Some(10));
        use_item(&fx, "Insulin", 90);

        let result = fx
            .scorer
            .item_wastage(fx.facility_id, "Insulin", fx.now)
            .unwrap()
            .unwrap();

        assert_eq!(result.band, WastageBand::ExpiringSoon);
        // round((30 - 10) / 30 * 50) = 33
        assert_eq!(result.score, 33);
    }

    #[test]
    fn low_usage_on_expiring_item_is_waste_risk() {
        let fx = fixture();
        item(&fx, "Insulin", Category::Medicine, 100, Some(10));
        use_item(&fx, "Insulin", 20);

        let result = fx
            .scorer
            .item_wastage(fx.facility_id, "Insulin", fx.now)
            .unwrap()
            .unwrap();

        assert_eq!(result.band, WastageBand::WasteRisk);
        // round((1 - 0.2) * 100) = 80
        assert_eq!(result.score, 80);
        assert_eq!(result.potential_waste, 80);
        assert_eq!(result.current_stock, 80);
    }

    #[test]
    fn low_usage_without_expiry_pressure_is_low_usage() {
        let fx = fixture();
        item(&fx, "Gauze", Category::Supplies, 100, None);
        use_item(&fx, "Gauze", 20);

        let result = fx
            .scorer
            .item_wastage(fx.facility_id, "Gauze", fx.now)
            .unwrap()
            .unwrap();

        assert_eq!(result.band, WastageBand::LowUsage);
        // round((0.6 - 0.2) * 100) = 40
        assert_eq!(result.score, 40);
    }

    #[test]
    fn adequate_usage_without_expiry_pressure_is_normal() {
        let fx = fixture();
        item(&fx, "Gloves", Category::Supplies, 100, Some(90));
        use_item(&fx, "Gloves", 70);

        let result = fx
            .scorer
            .item_wastage(fx.facility_id, "Gloves", fx.now)
            .unwrap()
            .unwrap();

        assert_eq!(result.band, WastageBand::Normal);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn zero_initial_stock_defaults_rate_to_zero() {
        let fx = fixture();
        item(&fx, "Ventilator", Category::Equipment, 0, None);

        let result = fx
            .scorer
            .item_wastage(fx.facility_id, "Ventilator", fx.now)
            .unwrap()
            .unwrap();

        assert_eq!(result.usage_rate, 0.0);
        assert_eq!(result.potential_waste, 0);
        assert_eq!(result.band, WastageBand::LowUsage);
    }

    #[test]
    fn usage_totals_match_case_insensitively() {
        let fx = fixture();
        item(&fx, "Paracetamol", Category::Medicine, 100, None);
        use_item(&fx, "PARACETAMOL", 30);
        use_item(&fx, " paracetamol ", 10);

        assert_eq!(fx.scorer.total_used(fx.facility_id, "Paracetamol").unwrap(), 40);
        assert_eq!(
            fx.scorer.current_stock(fx.facility_id, "paracetamol").unwrap(),
            Some(60)
        );
    }

    #[test]
    fn unknown_facility_is_not_found() {
        let fx = fixture();
        let err = fx
            .scorer
            .item_wastage(FacilityId::new(), "Anything", fx.now)
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn unprovisioned_item_is_simply_not_scored() {
        let fx = fixture();
        let result = fx
            .scorer
            .item_wastage(fx.facility_id, "Unicorn Dust", fx.now)
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn threshold_lookup_prefers_item_then_category_then_global() {
        let thresholds = WastageThresholds::default()
            .with_category(Category::Medicine, 0.8)
            .with_item(Category::Medicine, "Insulin", 0.95);

        assert_eq!(thresholds.expected_usage(Category::Medicine, "insulin"), 0.95);
        assert_eq!(thresholds.expected_usage(Category::Medicine, "Aspirin"), 0.8);
        assert_eq!(thresholds.expected_usage(Category::Supplies, "Gauze"), 0.6);
    }

    #[test]
    fn exactly_one_band_is_produced_for_every_quadrant() {
        let fx = fixture();
        let cases = [
            (Some(10), 20, WastageBand::WasteRisk),
            (Some(10), 90, WastageBand::ExpiringSoon),
            (None, 20, WastageBand::LowUsage),
            (None, 90, WastageBand::Normal),
        ];
        for (i, (expiry, used, expected)) in cases.into_iter().enumerate() {
            let name = format!("Item-{i}");
            let record = item(&fx, &name, Category::Medicine, 100, expiry);
            let result = score_item(&record, used, &WastageThresholds::default(), fx.now);
            assert_eq!(result.band, expected, "case {i}");
        }
    }

    #[test]
    fn facility_summary_scores_every_provisioned_item() {
        let fx = fixture();
        item(&fx, "Insulin", Category::Medicine, 100, Some(10));
        item(&fx, "Gauze", Category::Supplies, 50, None);
        use_item(&fx, "Insulin", 20);

        let summary = fx
            .scorer
            .facility_wastage_summary(fx.facility_id, fx.now)
            .unwrap();

        assert_eq!(summary.len(), 2);
        let insulin = summary.iter().find(|r| r.item_name == "Insulin").unwrap();
        assert_eq!(insulin.band, WastageBand::WasteRisk);
        let gauze = summary.iter().find(|r| r.item_name == "Gauze").unwrap();
        assert_eq!(gauze.total_used, 0);
    }

    #[test]
    fn city_summary_buckets_by_category_with_zero_denominator_guard() {
        let fx = fixture();
        item(&fx, "Insulin", Category::Medicine, 100, None);
        item(&fx, "Syringes", Category::Medicine, 100, None);
        item(&fx, "Ventilator", Category::Equipment, 0, None);
        use_item(&fx, "Insulin", 50);

        let summary = fx.scorer.city_wastage_summary(fx.now).unwrap();

        // Medicine: potential waste 150 of 200 provisioned.
        assert_eq!(summary.by_category[&Category::Medicine].waste_percent, 75);
        // Equipment has zero provisioned stock: percent defaults to 0.
        assert_eq!(summary.by_category[&Category::Equipment].waste_percent, 0);
        assert_eq!(summary.totals.items, 3);
        assert_eq!(summary.totals.initial_stock, 200);
        assert_eq!(summary.totals.potential_waste, 150);
        assert!(!summary.top_risk.is_empty());
        // Top-risk list is sorted by descending score.
        for pair in summary.top_risk.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn category_summary_spans_facilities() {
        let fx = fixture();
        let other = FacilityId::new();
        fx.facilities
            .upsert_facility(Facility::new(other, "District Clinic", "Lahore", 40).unwrap())
            .unwrap();
        item(&fx, "Insulin", Category::Medicine, 100, None);
        fx.items
            .upsert_item(
                InventoryItem::new(other, "Insulin", Category::Medicine, 60, "vials", None)
                    .unwrap(),
            )
            .unwrap();
        item(&fx, "Gauze", Category::Supplies, 50, None);

        let summary = fx
            .scorer
            .category_wastage_across_facilities(Category::Medicine, fx.now)
            .unwrap();

        assert_eq!(summary.items.len(), 2);
        assert_eq!(summary.totals.initial_stock, 160);
    }

    #[test]
    fn record_usage_drives_stock_to_exactly_zero_then_rejects_overdraw() {
        let fx = fixture();
        item(&fx, "Insulin", Category::Medicine, 10, None);

        fx.scorer
            .record_usage(
                fx.facility_id,
                "Insulin",
                10,
                "ICU",
                "treatment",
                fx.now,
                "nurse-2",
                None,
            )
            .unwrap();
        assert_eq!(
            fx.scorer.current_stock(fx.facility_id, "Insulin").unwrap(),
            Some(0)
        );

        let err = fx
            .scorer
            .record_usage(
                fx.facility_id,
                "Insulin",
                1,
                "ICU",
                "treatment",
                fx.now,
                "nurse-2",
                None,
            )
            .unwrap_err();
        match err {
            EngineError::Domain(medgrid_core::DomainError::Validation(_)) => {}
            other => panic!("expected Validation error, got {other:?}"),
        }
        // The rejected usage must not have been appended.
        assert_eq!(fx.usage.len(), 1);
    }

    #[test]
    fn record_usage_rejects_unprovisioned_item() {
        let fx = fixture();
        let err = fx
            .scorer
            .record_usage(
                fx.facility_id,
                "Unicorn Dust",
                1,
                "ER",
                "??",
                fx.now,
                "nurse-3",
                None,
            )
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn expired_item_scores_above_fifty_on_expiring_arm() {
        let fx = fixture();
        // Expired 10 days ago with adequate usage: (30 - (-10)) / 30 * 50 ≈ 67.
        let record = item(&fx, "Saline", Category::Medicine, 100, Some(-10));
        let result = score_item(&record, 90, &WastageThresholds::default(), fx.now);
        assert_eq!(result.band, WastageBand::ExpiringSoon);
        assert_eq!(result.score, 67);
    }
}
