use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use medgrid_core::{DomainError, DomainResult, FacilityId, RecordId};

use crate::event::Event;

/// A consumption fact for one inventory item at one facility.
///
/// Acceptance-time stock sufficiency is checked by the wastage/stock module
/// against the *derived* current stock, not here: the constructor only
/// validates the record's own shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageEvent {
    pub id: RecordId,
    pub facility_id: FacilityId,
    pub item_name: String,
    pub quantity_used: u32,
    pub department: String,
    pub purpose: String,
    pub occurred_at: DateTime<Utc>,
    pub recorded_by: String,
    pub patient_id: Option<String>,
}

impl UsageEvent {
    #[allow(clippy::too_many_arguments)]
    pub fn record(
        facility_id: FacilityId,
        item_name: impl Into<String>,
        quantity_used: u32,
        department: impl Into<String>,
        purpose: impl Into<String>,
        occurred_at: DateTime<Utc>,
        recorded_by: impl Into<String>,
        patient_id: Option<String>,
    ) -> DomainResult<Self> {
        let item_name = item_name.into();
        if item_name.trim().is_empty() {
            return Err(DomainError::validation("item name cannot be empty"));
        }
        if quantity_used < 1 {
            return Err(DomainError::validation("quantity used must be >= 1"));
        }
        Ok(Self {
            id: RecordId::new(),
            facility_id,
            item_name,
            quantity_used,
            department: department.into(),
            purpose: purpose.into(),
            occurred_at,
            recorded_by: recorded_by.into(),
            patient_id,
        })
    }

    /// Item name normalized for matching (usage logs and inventory records are
    /// matched case-insensitively).
    pub fn normalized_item_name(&self) -> String {
        self.item_name.trim().to_lowercase()
    }
}

impl Event for UsageEvent {
    fn event_type(&self) -> &'static str {
        "inventory.usage.recorded"
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_rejects_zero_quantity() {
        let err = UsageEvent::record(
            FacilityId::new(),
            "Paracetamol",
            0,
            "ER",
            "pain relief",
            Utc::now(),
            "nurse-7",
            None,
        )
        .unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn record_rejects_blank_item_name() {
        let err = UsageEvent::record(
            FacilityId::new(),
            "   ",
            2,
            "ER",
            "pain relief",
            Utc::now(),
            "nurse-7",
            None,
        )
        .unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn normalized_item_name_lowercases_and_trims() {
        let event = UsageEvent::record(
            FacilityId::new(),
            " Paracetamol ",
            2,
            "ER",
            "pain relief",
            Utc::now(),
            "nurse-7",
            Some("patient-42".to_string()),
        )
        .unwrap();
        assert_eq!(event.normalized_item_name(), "paracetamol");
    }
}
