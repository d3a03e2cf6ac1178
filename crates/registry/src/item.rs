use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use medgrid_core::{DomainError, DomainResult, FacilityId};

/// Inventory item category.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Medicine,
    Equipment,
    Supplies,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Medicine => "Medicine",
            Category::Equipment => "Equipment",
            Category::Supplies => "Supplies",
        }
    }
}

/// A provisioned inventory record, owned by exactly one facility.
///
/// `initial_stock` is the amount provisioned, not the current level; current
/// stock is derived as `max(0, initial_stock - total_used)` by the wastage
/// module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub facility_id: FacilityId,
    pub name: String,
    pub category: Category,
    pub initial_stock: u64,
    pub unit: String,
    pub expiry_date: Option<DateTime<Utc>>,
}

impl InventoryItem {
    pub fn new(
        facility_id: FacilityId,
        name: impl Into<String>,
        category: Category,
        initial_stock: u64,
        unit: impl Into<String>,
        expiry_date: Option<DateTime<Utc>>,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("item name cannot be empty"));
        }
        Ok(Self {
            facility_id,
            name,
            category,
            initial_stock,
            unit: unit.into(),
            expiry_date,
        })
    }

    /// Name normalized for case-insensitive matching against usage logs.
    pub fn normalized_name(&self) -> String {
        self.name.trim().to_lowercase()
    }

    /// Whether `candidate` refers to this item (case-insensitive).
    pub fn matches_name(&self, candidate: &str) -> bool {
        self.normalized_name() == candidate.trim().to_lowercase()
    }
}
