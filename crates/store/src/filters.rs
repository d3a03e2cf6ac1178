//! Typed filter criteria for log and reference queries.

use serde::{Deserialize, Serialize};

use medgrid_core::FacilityId;
use medgrid_events::{BedEvent, DiseaseReport, Period, UsageEvent};
use medgrid_registry::{Category, Facility, InventoryItem};

use crate::log::RecordFilter;

/// Filter criteria for bed event queries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BedEventFilter {
    /// Restrict to these facilities (None = all facilities).
    pub facility_ids: Option<Vec<FacilityId>>,
}

impl BedEventFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_facility(facility_id: FacilityId) -> Self {
        Self {
            facility_ids: Some(vec![facility_id]),
        }
    }

    pub fn for_facilities(facility_ids: impl Into<Vec<FacilityId>>) -> Self {
        Self {
            facility_ids: Some(facility_ids.into()),
        }
    }
}

impl RecordFilter<BedEvent> for BedEventFilter {
    fn matches(&self, record: &BedEvent) -> bool {
        match &self.facility_ids {
            Some(ids) => ids.contains(&record.facility_id),
            None => true,
        }
    }
}

/// Filter criteria for usage event queries.
///
/// Item names are matched case-insensitively (normalized at construction).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageEventFilter {
    pub facility_id: Option<FacilityId>,
    pub item_name: Option<String>,
}

impl UsageEventFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_facility(facility_id: FacilityId) -> Self {
        Self {
            facility_id: Some(facility_id),
            item_name: None,
        }
    }

    pub fn for_item(facility_id: FacilityId, item_name: &str) -> Self {
        Self {
            facility_id: Some(facility_id),
            item_name: Some(item_name.trim().to_lowercase()),
        }
    }
}

impl RecordFilter<UsageEvent> for UsageEventFilter {
    fn matches(&self, record: &UsageEvent) -> bool {
        if let Some(facility_id) = self.facility_id {
            if record.facility_id != facility_id {
                return false;
            }
        }
        if let Some(item_name) = &self.item_name {
            if record.normalized_item_name() != *item_name {
                return false;
            }
        }
        true
    }
}

/// Filter criteria for disease report queries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportFilter {
    pub location: Option<String>,
    pub condition: Option<String>,
    pub period: Option<Period>,
}

impl ReportFilter {
    pub fn for_period(period: Period) -> Self {
        Self {
            location: None,
            condition: None,
            period: Some(period),
        }
    }

    pub fn for_key(location: &str, condition: &str, period: Period) -> Self {
        Self {
            location: Some(location.to_string()),
            condition: Some(condition.to_string()),
            period: Some(period),
        }
    }
}

impl RecordFilter<DiseaseReport> for ReportFilter {
    fn matches(&self, record: &DiseaseReport) -> bool {
        if let Some(location) = &self.location {
            if record.location != *location {
                return false;
            }
        }
        if let Some(condition) = &self.condition {
            if record.condition != *condition {
                return false;
            }
        }
        if let Some(period) = self.period {
            if record.period != period {
                return false;
            }
        }
        true
    }
}

/// Filter criteria for facility listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FacilityFilter {
    pub city: Option<String>,
}

impl FacilityFilter {
    pub fn all() -> Self {
        Self::default()
    }
}

impl RecordFilter<Facility> for FacilityFilter {
    fn matches(&self, record: &Facility) -> bool {
        match &self.city {
            Some(city) => record.city == *city,
            None => true,
        }
    }
}

/// Filter criteria for inventory item listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemFilter {
    pub facility_id: Option<FacilityId>,
    pub category: Option<Category>,
}

impl ItemFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_facility(facility_id: FacilityId) -> Self {
        Self {
            facility_id: Some(facility_id),
            category: None,
        }
    }

    pub fn for_category(category: Category) -> Self {
        Self {
            facility_id: None,
            category: Some(category),
        }
    }
}

impl RecordFilter<InventoryItem> for ItemFilter {
    fn matches(&self, record: &InventoryItem) -> bool {
        if let Some(facility_id) = self.facility_id {
            if record.facility_id != facility_id {
                return false;
            }
        }
        if let Some(category) = self.category {
            if record.category != category {
                return false;
            }
        }
        true
    }
}
